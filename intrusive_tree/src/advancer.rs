/// An iterator that does not borrow the collection between steps.
///
/// Rust's external iterators hold a borrow of the collection for their whole
/// lifetime, which rules out the most common intrusive container pattern:
/// visiting every element in order while unlinking some of them. An
/// `Advancer` only borrows the collection for the duration of each `advance`
/// call, so arbitrary mutation can happen in the loop body:
///
/// ```text
/// let mut adv = tree.advancer(&arena);
/// while let Some(p) = adv.advance(&arena) {
///     ... arena.get(p) ...
///     ... arena.get_mut(p) ...
///     // unlinking the current element is fine, the next element was
///     // captured before `p` was returned
///     ... tree.remove(&mut arena, p) ...
///     ... arena.remove(p) ...
/// }
/// ```
///
/// # Note
///
/// Unlinking the element that comes right after the one just returned causes
/// the advancer to return the unlinked element and then stop early. Unlinking
/// anything else is fine. Elements inserted during the loop may or may not be
/// witnessed.
pub trait Advancer {
    type Collection;
    type Item;

    fn advance(&mut self, collection: &Self::Collection) -> Option<Self::Item>;
}
