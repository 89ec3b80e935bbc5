use core::{cmp::Ordering, fmt, marker::PhantomData};

use log::{debug, trace};
use recasting::{Recast, Recaster};

use crate::{
    bst::{self, Search},
    Adapter, ArenaOf, Linkage, OrderedTree, TreeError,
};

/// An intrusive splay tree over the elements of an arena.
///
/// Has the same contract as [RbTree](crate::RbTree) but every `insert`,
/// `remove`, `find_by` and `lower_bound_by` moves the accessed element to the
/// root. Operations are amortized O(log n) instead of worst case, recently
/// accessed elements are cheap to access again, and no balancing metadata is
/// needed. Any [Linkage](crate::Linkage) can be used, normally
/// [SplayLink](crate::SplayLink).
///
/// Because lookups restructure the tree, they need mutable access to both
/// the tree and the arena.
pub struct SplayTree<A: Adapter> {
    root: Option<A::P>,
    _boo: PhantomData<fn() -> A>,
}

#[inline]
fn is_left_child<A: Adapter>(a: &ArenaOf<A>, parent: A::P, p: A::P) -> bool {
    bst::edges::<A>(a, parent).left == Some(p)
}

/// Brings `x` to the top of the (sub)tree rooted at `root` with zig, zig-zig,
/// and zig-zag steps
fn splay<A: Adapter>(a: &mut ArenaOf<A>, root: &mut Option<A::P>, x: A::P) {
    while let Some(p) = bst::edges::<A>(a, x).parent {
        let x_is_left = is_left_child::<A>(a, p, x);
        match bst::edges::<A>(a, p).parent {
            None => {
                if x_is_left {
                    bst::rotate_right::<A>(a, root, p);
                } else {
                    bst::rotate_left::<A>(a, root, p);
                }
            }
            Some(g) => {
                let p_is_left = is_left_child::<A>(a, g, p);
                match (x_is_left, p_is_left) {
                    (true, true) => {
                        bst::rotate_right::<A>(a, root, g);
                        bst::rotate_right::<A>(a, root, p);
                    }
                    (false, false) => {
                        bst::rotate_left::<A>(a, root, g);
                        bst::rotate_left::<A>(a, root, p);
                    }
                    (false, true) => {
                        bst::rotate_left::<A>(a, root, p);
                        bst::rotate_right::<A>(a, root, g);
                    }
                    (true, false) => {
                        bst::rotate_right::<A>(a, root, p);
                        bst::rotate_left::<A>(a, root, g);
                    }
                }
            }
        }
    }
    trace!("splayed {x:?}");
}

impl<A: Adapter> SplayTree<A> {
    pub const fn new() -> Self {
        Self {
            root: None,
            _boo: PhantomData,
        }
    }

    pub fn root(&self) -> Option<A::P> {
        self.root
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Moves the linked element `p` to the root
    ///
    /// # Errors
    ///
    /// If `p` is not a member of this tree
    pub fn splay(&mut self, a: &mut ArenaOf<A>, p: A::P) -> Result<(), TreeError> {
        bst::check_member::<A>(a, self.root, p)?;
        splay::<A>(a, &mut self.root, p);
        Ok(())
    }
}

impl<A: Adapter> OrderedTree<A> for SplayTree<A> {
    fn new() -> Self {
        SplayTree::new()
    }

    fn root(&self) -> Option<A::P> {
        self.root
    }

    fn insert(&mut self, a: &mut ArenaOf<A>, p: A::P) -> Result<Option<A::P>, TreeError> {
        bst::check_unlinked::<A>(a, p)?;
        let elem = &a[p];
        let search = bst::search::<A, _>(a, self.root, |other| A::cmp(elem, other));
        match search {
            Search::Found(existing) => {
                splay::<A>(a, &mut self.root, existing);
                Ok(Some(existing))
            }
            Search::Vacant(spot) => {
                bst::attach::<A>(a, &mut self.root, p, spot);
                splay::<A>(a, &mut self.root, p);
                Ok(None)
            }
        }
    }

    fn remove(&mut self, a: &mut ArenaOf<A>, z: A::P) -> Result<A::P, TreeError> {
        bst::check_member::<A>(a, self.root, z)?;
        splay::<A>(a, &mut self.root, z);
        let ze = *bst::edges::<A>(a, z);
        match ze.left {
            None => {
                if let Some(right) = ze.right {
                    bst::edges_mut::<A>(a, right).parent = None;
                }
                self.root = ze.right;
            }
            Some(left) => {
                // join: the maximum of the left side becomes the root, it has
                // no right child after being splayed within its subtree
                bst::edges_mut::<A>(a, left).parent = None;
                let mut sub_root = Some(left);
                let max = bst::rightmost::<A>(a, left);
                splay::<A>(a, &mut sub_root, max);
                bst::edges_mut::<A>(a, max).right = ze.right;
                if let Some(right) = ze.right {
                    bst::edges_mut::<A>(a, right).parent = Some(max);
                }
                self.root = Some(max);
            }
        }
        A::link_mut(&mut a[z]).reset(false);
        Ok(z)
    }

    /// Splays the found element, or the last element visited if there is no
    /// match
    fn find_by<F: FnMut(&A::Elem) -> Ordering>(
        &mut self,
        a: &mut ArenaOf<A>,
        f: F,
    ) -> Option<A::P> {
        match bst::search::<A, F>(a, self.root, f) {
            Search::Found(p) => {
                splay::<A>(a, &mut self.root, p);
                Some(p)
            }
            Search::Vacant(Some((last, _))) => {
                splay::<A>(a, &mut self.root, last);
                None
            }
            Search::Vacant(None) => None,
        }
    }

    /// Splays the last element visited
    fn lower_bound_by<F: FnMut(&A::Elem) -> Ordering>(
        &mut self,
        a: &mut ArenaOf<A>,
        mut f: F,
    ) -> Option<A::P> {
        let mut candidate = None;
        let mut last = None;
        let mut cur = self.root;
        while let Some(p) = cur {
            last = Some(p);
            match f(&a[p]) {
                Ordering::Less => {
                    candidate = Some(p);
                    cur = bst::edges::<A>(a, p).left;
                }
                Ordering::Equal => {
                    candidate = Some(p);
                    break
                }
                Ordering::Greater => cur = bst::edges::<A>(a, p).right,
            }
        }
        if let Some(last) = last {
            splay::<A>(a, &mut self.root, last);
        }
        candidate
    }

    fn clear(&mut self, a: &mut ArenaOf<A>) -> usize {
        let n = bst::unlink_all::<A>(a, self.root.take());
        debug!("cleared splay tree of {n} elements");
        n
    }

    fn _check_invariants(this: &Self, a: &ArenaOf<A>) -> Result<(), &'static str> {
        bst::check_structure::<A>(a, this.root).map(|_| ())
    }
}

impl<A: Adapter> Default for SplayTree<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Adapter> fmt::Debug for SplayTree<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SplayTree").field("root", &self.root).finish()
    }
}

impl<A: Adapter> Recast<A::P> for SplayTree<A> {
    fn recast<R: Recaster<Item = A::P>>(&mut self, recaster: &R) -> Result<(), <R as Recaster>::Item> {
        if let Some(root) = self.root.as_mut() {
            recaster.recast_item(root)?;
        }
        Ok(())
    }
}
