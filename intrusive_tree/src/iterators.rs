//! Traversal over the trees. Both engines share these since in-order
//! traversal only needs the edges.

use core::{iter::FusedIterator, marker::PhantomData};

use crate::{bst, Adapter, Advancer, ArenaOf};

/// Safe in-order traversal of a tree, see [Advancer](crate::Advancer) for the
/// usage pattern.
///
/// The element after the one being returned is captured before returning, so
/// the returned element can be unlinked (and even removed from the arena) in
/// the loop body. Made by [advancer](crate::OrderedTree::advancer).
pub struct TreeAdvancer<A: Adapter> {
    next: Option<A::P>,
    _boo: PhantomData<fn() -> A>,
}

impl<A: Adapter> TreeAdvancer<A> {
    pub(crate) fn new(first: Option<A::P>) -> Self {
        Self {
            next: first,
            _boo: PhantomData,
        }
    }
}

impl<A: Adapter> Clone for TreeAdvancer<A> {
    fn clone(&self) -> Self {
        Self::new(self.next)
    }
}

impl<A: Adapter> Advancer for TreeAdvancer<A> {
    type Collection = ArenaOf<A>;
    type Item = A::P;

    fn advance(&mut self, collection: &Self::Collection) -> Option<Self::Item> {
        let p = self.next?;
        if collection.contains(p) {
            // an unlinked element has empty edges and ends the traversal here
            self.next = bst::next::<A>(collection, p);
            Some(p)
        } else {
            self.next = None;
            None
        }
    }
}

/// Lazy in-order iterator over `(P, &Elem)` tuples of a tree. Iterates from
/// both ends. Made by [iter](crate::OrderedTree::iter).
pub struct Iter<'a, A: Adapter> {
    arena: &'a ArenaOf<A>,
    front: Option<A::P>,
    back: Option<A::P>,
}

impl<'a, A: Adapter> Iter<'a, A> {
    pub(crate) fn new(arena: &'a ArenaOf<A>, root: Option<A::P>) -> Self {
        Self {
            arena,
            front: root.map(|p| bst::leftmost::<A>(arena, p)),
            back: root.map(|p| bst::rightmost::<A>(arena, p)),
        }
    }

    fn finish(&mut self) {
        self.front = None;
        self.back = None;
    }
}

impl<'a, A: Adapter> Clone for Iter<'a, A> {
    fn clone(&self) -> Self {
        Self {
            arena: self.arena,
            front: self.front,
            back: self.back,
        }
    }
}

impl<'a, A: Adapter> Iterator for Iter<'a, A> {
    type Item = (A::P, &'a A::Elem);

    fn next(&mut self) -> Option<Self::Item> {
        let p = self.front?;
        if self.front == self.back {
            self.finish();
        } else {
            self.front = bst::next::<A>(self.arena, p);
        }
        let arena = self.arena;
        Some((p, &arena[p]))
    }
}

impl<'a, A: Adapter> DoubleEndedIterator for Iter<'a, A> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let p = self.back?;
        if self.front == self.back {
            self.finish();
        } else {
            self.back = bst::prev::<A>(self.arena, p);
        }
        let arena = self.arena;
        Some((p, &arena[p]))
    }
}

impl<'a, A: Adapter> FusedIterator for Iter<'a, A> {}
