use core::cmp::Ordering;

use log::debug;

use crate::{bst, Adapter, Advancer, ArenaOf, Iter, TreeAdvancer, TreeError};

/// The operation set shared by every balancing engine.
///
/// Each engine implements the required methods, everything else is provided
/// in terms of the links. Code generic over `OrderedTree` works with either
/// engine, and is monomorphized per engine and adapter.
///
/// All operations take the arena owning the elements explicitly. The tree
/// itself only knows its root.
pub trait OrderedTree<A: Adapter>: Sized {
    /// Creates an empty tree
    fn new() -> Self;

    fn root(&self) -> Option<A::P>;

    /// Links the element at `p` into the tree.
    ///
    /// Returns `Ok(None)` if it was linked. If an element comparing equal is
    /// already in the tree, returns `Ok(Some(existing))` and `p` is left
    /// unlinked.
    ///
    /// # Errors
    ///
    /// [TreeError::InvalidPtr] if `p` is invalid, [TreeError::AlreadyLinked]
    /// if it is linked into this or any other tree
    fn insert(&mut self, a: &mut ArenaOf<A>, p: A::P) -> Result<Option<A::P>, TreeError>;

    /// Unlinks the element at `p` from the tree and returns `p`. The element
    /// stays in the arena.
    ///
    /// # Errors
    ///
    /// If `p` is invalid, not linked, or linked into a different tree
    fn remove(&mut self, a: &mut ArenaOf<A>, p: A::P) -> Result<A::P, TreeError>;

    /// Finds the element for which `f` returns `Ordering::Equal`. `f` returns
    /// the ordering of the target relative to the element it is given.
    fn find_by<F: FnMut(&A::Elem) -> Ordering>(
        &mut self,
        a: &mut ArenaOf<A>,
        f: F,
    ) -> Option<A::P>;

    /// Like `find_by` except it returns the least element that the target is
    /// less than or equal to
    fn lower_bound_by<F: FnMut(&A::Elem) -> Ordering>(
        &mut self,
        a: &mut ArenaOf<A>,
        f: F,
    ) -> Option<A::P>;

    /// Unlinks every element without any rebalancing and returns how many
    /// were unlinked. The elements stay in the arena.
    fn clear(&mut self, a: &mut ArenaOf<A>) -> usize;

    #[doc(hidden)]
    fn _check_invariants(this: &Self, a: &ArenaOf<A>) -> Result<(), &'static str>;

    fn is_empty(&self) -> bool {
        self.root().is_none()
    }

    /// Finds the linked element comparing equal to `target`. `target` is
    /// usually an unlinked element with only the compared fields filled in.
    fn find(&mut self, a: &mut ArenaOf<A>, target: &A::Elem) -> Option<A::P> {
        self.find_by(a, |elem| A::cmp(target, elem))
    }

    /// Returns the least element not less than `target`
    fn lower_bound(&mut self, a: &mut ArenaOf<A>, target: &A::Elem) -> Option<A::P> {
        self.lower_bound_by(a, |elem| A::cmp(target, elem))
    }

    fn min(&self, a: &ArenaOf<A>) -> Option<A::P> {
        self.root().map(|p| bst::leftmost::<A>(a, p))
    }

    fn max(&self, a: &ArenaOf<A>) -> Option<A::P> {
        self.root().map(|p| bst::rightmost::<A>(a, p))
    }

    /// Returns the element after `p` in order, or `None` if `p` is the
    /// maximum.
    ///
    /// # Errors
    ///
    /// If `p` is not a member of this tree. Checking membership walks up to
    /// the root, use [iter](OrderedTree::iter) or
    /// [advancer](OrderedTree::advancer) to traverse.
    fn successor(&self, a: &ArenaOf<A>, p: A::P) -> Result<Option<A::P>, TreeError> {
        bst::check_member::<A>(a, self.root(), p)?;
        Ok(bst::next::<A>(a, p))
    }

    /// Returns the element before `p` in order. Errors the same way as
    /// [successor](OrderedTree::successor).
    fn predecessor(&self, a: &ArenaOf<A>, p: A::P) -> Result<Option<A::P>, TreeError> {
        bst::check_member::<A>(a, self.root(), p)?;
        Ok(bst::prev::<A>(a, p))
    }

    /// Returns if `p` is linked into this tree
    fn contains(&self, a: &ArenaOf<A>, p: A::P) -> bool {
        bst::check_member::<A>(a, self.root(), p).is_ok()
    }

    fn iter<'a>(&self, a: &'a ArenaOf<A>) -> Iter<'a, A> {
        Iter::new(a, self.root())
    }

    /// Returns an [Advancer] over the tree in order, which allows unlinking
    /// visited elements during the traversal
    fn advancer(&self, a: &ArenaOf<A>) -> TreeAdvancer<A> {
        TreeAdvancer::new(self.min(a))
    }

    /// Calls `f` on every element in ascending order
    fn for_each<F: FnMut(A::P, &A::Elem)>(&self, a: &ArenaOf<A>, mut f: F) {
        for (p, elem) in self.iter(a) {
            f(p, elem)
        }
    }

    /// Calls `f` on every element in ascending order with mutable access.
    /// `f` must not change the compared fields or touch the link.
    fn for_each_mut<F: FnMut(A::P, &mut A::Elem)>(&self, a: &mut ArenaOf<A>, mut f: F) {
        let mut adv = self.advancer(a);
        while let Some(p) = adv.advance(a) {
            f(p, &mut a[p])
        }
    }

    /// Removes every element in ascending order and hands each to `cleanup`
    /// right after it is unlinked, which commonly removes it from the arena.
    /// Returns the number of removed elements.
    fn destroy<F: FnMut(&mut ArenaOf<A>, A::P)>(
        &mut self,
        a: &mut ArenaOf<A>,
        mut cleanup: F,
    ) -> usize {
        let mut n = 0;
        while let Some(p) = self.min(a) {
            let removed = self.remove(a, p);
            // the minimum is always a member
            debug_assert_eq!(removed, Ok(p));
            if removed.is_err() {
                break
            }
            cleanup(a, p);
            n += 1;
        }
        debug!("destroyed tree of {n} elements");
        n
    }

    /// Number of elements, found by walking the tree
    fn count(&self, a: &ArenaOf<A>) -> usize {
        self.iter(a).count()
    }

    /// Number of edges on the longest path from the root to a leaf. Trees
    /// with zero or one element have height 0.
    fn height(&self, a: &ArenaOf<A>) -> usize {
        bst::height::<A>(a, self.root())
    }
}
