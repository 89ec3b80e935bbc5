use core::{cmp::Ordering, fmt, marker::PhantomData};

use log::{debug, trace};
use recasting::{Recast, Recaster};

use crate::{
    bst::{self, Search},
    Adapter, ArenaOf, Color, Linkage, OrderedTree, RbLinkage, TreeError,
};

// Red-black tree with parent links, the fix-ups are the textbook ones. The
// nil leaves are `None` children and count as black. Removal relinks the in
// order successor into the place of the removed element instead of moving
// payloads around, so that handles to every other element stay valid.

/// An intrusive red-black tree over the elements of an arena.
///
/// The height is at most `2 * log2(n + 1)` for `n` elements, which bounds
/// every operation to O(log n) in the worst case. Lookups do not restructure
/// the tree and only need shared references.
///
/// ```
/// use intrusive_tree::{ptr_struct, tree_adapter, Arena, OrderedTree, RbLink, RbTree};
///
/// ptr_struct!(P0);
///
/// struct Num {
///     x: u32,
///     link: RbLink<P0>,
/// }
///
/// tree_adapter! {
///     struct NumAdapter for Num {
///         link: link as RbLink<P0>,
///         cmp: |a: &Num, b: &Num| a.x.cmp(&b.x),
///     }
/// }
///
/// let mut a: Arena<P0, Num> = Arena::new();
/// let mut tree: RbTree<NumAdapter> = RbTree::new();
/// for x in [3, 1, 2] {
///     let p = a.insert(Num { x, link: RbLink::new() });
///     tree.insert(&mut a, p).unwrap();
/// }
/// let xs: Vec<u32> = tree.iter(&a).map(|(_, n)| n.x).collect();
/// assert_eq!(xs, [1, 2, 3]);
/// ```
pub struct RbTree<A: Adapter> {
    root: Option<A::P>,
    _boo: PhantomData<fn() -> A>,
}

#[inline]
fn is_red<A: Adapter>(a: &ArenaOf<A>, p: Option<A::P>) -> bool
where
    A::Link: RbLinkage,
{
    match p {
        Some(p) => A::link(&a[p]).color() == Color::Red,
        None => false,
    }
}

#[inline]
fn color_of<A: Adapter>(a: &ArenaOf<A>, p: A::P) -> Color
where
    A::Link: RbLinkage,
{
    A::link(&a[p]).color()
}

#[inline]
fn set_color<A: Adapter>(a: &mut ArenaOf<A>, p: A::P, color: Color)
where
    A::Link: RbLinkage,
{
    A::link_mut(&mut a[p]).set_color(color)
}

#[inline]
fn child<A: Adapter>(a: &ArenaOf<A>, p: A::P, left: bool) -> Option<A::P> {
    let e = bst::edges::<A>(a, p);
    if left {
        e.left
    } else {
        e.right
    }
}

/// Rotates `p` down towards the side given by `left`
#[inline]
fn rotate<A: Adapter>(a: &mut ArenaOf<A>, root: &mut Option<A::P>, p: A::P, left: bool) {
    if left {
        bst::rotate_left::<A>(a, root, p)
    } else {
        bst::rotate_right::<A>(a, root, p)
    }
}

impl<A: Adapter> RbTree<A>
where
    A::Link: RbLinkage,
{
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

    /// Finds the element for which `f` returns `Ordering::Equal`, where `f`
    /// returns the ordering of the target relative to the given element
    pub fn find_by<F: FnMut(&A::Elem) -> Ordering>(&self, a: &ArenaOf<A>, f: F) -> Option<A::P> {
        match bst::search::<A, F>(a, self.root, f) {
            Search::Found(p) => Some(p),
            Search::Vacant(_) => None,
        }
    }

    /// Finds the linked element comparing equal to `target`
    pub fn find(&self, a: &ArenaOf<A>, target: &A::Elem) -> Option<A::P> {
        self.find_by(a, |elem| A::cmp(target, elem))
    }

    /// Returns the least element the target is less than or equal to
    pub fn lower_bound_by<F: FnMut(&A::Elem) -> Ordering>(
        &self,
        a: &ArenaOf<A>,
        f: F,
    ) -> Option<A::P> {
        bst::lower_bound::<A, F>(a, self.root, f)
    }

    pub fn lower_bound(&self, a: &ArenaOf<A>, target: &A::Elem) -> Option<A::P> {
        self.lower_bound_by(a, |elem| A::cmp(target, elem))
    }

    /// Returns the color of the root, or `None` if the tree is empty
    pub fn root_color(&self, a: &ArenaOf<A>) -> Option<Color> {
        self.root.map(|p| color_of::<A>(a, p))
    }

    fn insert_fixup(&mut self, a: &mut ArenaOf<A>, mut z: A::P) {
        while let Some(zp) = bst::edges::<A>(a, z).parent {
            if !is_red::<A>(a, Some(zp)) {
                break
            }
            // a red parent is never the root
            let Some(zpp) = bst::edges::<A>(a, zp).parent else {
                break
            };
            let parent_is_left = child::<A>(a, zpp, true) == Some(zp);
            let uncle = child::<A>(a, zpp, !parent_is_left);
            if let Some(uncle) = uncle.filter(|u| is_red::<A>(a, Some(*u))) {
                trace!("rb insert: recolor at {zpp:?}");
                set_color::<A>(a, zp, Color::Black);
                set_color::<A>(a, uncle, Color::Black);
                set_color::<A>(a, zpp, Color::Red);
                z = zpp;
                continue
            }
            let mut zp = zp;
            if child::<A>(a, zp, !parent_is_left) == Some(z) {
                // inner grandchild, straighten it out first
                trace!("rb insert: rotate {zp:?}");
                rotate::<A>(a, &mut self.root, zp, parent_is_left);
                zp = z;
            }
            trace!("rb insert: rotate {zpp:?}");
            set_color::<A>(a, zp, Color::Black);
            set_color::<A>(a, zpp, Color::Red);
            rotate::<A>(a, &mut self.root, zpp, !parent_is_left);
            break
        }
        if let Some(root) = self.root {
            set_color::<A>(a, root, Color::Black);
        }
    }

    /// `x` is the subtree missing a black, `x_parent` its parent (needed
    /// because `x` can be a nil leaf)
    fn remove_fixup(&mut self, a: &mut ArenaOf<A>, mut x: Option<A::P>, mut x_parent: Option<A::P>) {
        while x != self.root && !is_red::<A>(a, x) {
            let Some(p) = x_parent else { break };
            let x_is_left = child::<A>(a, p, true) == x;
            // the sibling always exists because its side has an extra black
            let Some(mut w) = child::<A>(a, p, !x_is_left) else {
                break
            };
            if is_red::<A>(a, Some(w)) {
                trace!("rb remove: red sibling {w:?}");
                set_color::<A>(a, w, Color::Black);
                set_color::<A>(a, p, Color::Red);
                rotate::<A>(a, &mut self.root, p, x_is_left);
                let Some(new_w) = child::<A>(a, p, !x_is_left) else {
                    break
                };
                w = new_w;
            }
            let near = child::<A>(a, w, x_is_left);
            let far = child::<A>(a, w, !x_is_left);
            if !is_red::<A>(a, near) && !is_red::<A>(a, far) {
                trace!("rb remove: recolor {w:?}");
                set_color::<A>(a, w, Color::Red);
                x = Some(p);
                x_parent = bst::edges::<A>(a, p).parent;
                continue
            }
            if !is_red::<A>(a, far) {
                // the near nephew is red
                if let Some(near) = near {
                    set_color::<A>(a, near, Color::Black);
                }
                set_color::<A>(a, w, Color::Red);
                rotate::<A>(a, &mut self.root, w, !x_is_left);
                let Some(new_w) = child::<A>(a, p, !x_is_left) else {
                    break
                };
                w = new_w;
            }
            trace!("rb remove: rotate {p:?}");
            set_color::<A>(a, w, color_of::<A>(a, p));
            set_color::<A>(a, p, Color::Black);
            if let Some(far) = child::<A>(a, w, !x_is_left) {
                set_color::<A>(a, far, Color::Black);
            }
            rotate::<A>(a, &mut self.root, p, x_is_left);
            x = self.root;
            break
        }
        if let Some(x) = x {
            set_color::<A>(a, x, Color::Black);
        }
    }
}

impl<A: Adapter> OrderedTree<A> for RbTree<A>
where
    A::Link: RbLinkage,
{
    fn new() -> Self {
        RbTree::new()
    }

    fn root(&self) -> Option<A::P> {
        self.root
    }

    fn insert(&mut self, a: &mut ArenaOf<A>, p: A::P) -> Result<Option<A::P>, TreeError> {
        bst::check_unlinked::<A>(a, p)?;
        let elem = &a[p];
        let spot = match bst::search::<A, _>(a, self.root, |other| A::cmp(elem, other)) {
            Search::Found(existing) => return Ok(Some(existing)),
            Search::Vacant(spot) => spot,
        };
        bst::attach::<A>(a, &mut self.root, p, spot);
        set_color::<A>(a, p, Color::Red);
        self.insert_fixup(a, p);
        Ok(None)
    }

    fn remove(&mut self, a: &mut ArenaOf<A>, z: A::P) -> Result<A::P, TreeError> {
        bst::check_member::<A>(a, self.root, z)?;
        let ze = *bst::edges::<A>(a, z);
        let z_color = color_of::<A>(a, z);
        let (x, x_parent, removed_color) = match (ze.left, ze.right) {
            (None, x) | (x, None) => {
                bst::transplant::<A>(a, &mut self.root, z, x);
                (x, ze.parent, z_color)
            }
            (Some(zl), Some(zr)) => {
                let y = bst::leftmost::<A>(a, zr);
                let y_color = color_of::<A>(a, y);
                let x = bst::edges::<A>(a, y).right;
                let x_parent = if y == zr {
                    Some(y)
                } else {
                    let y_parent = bst::edges::<A>(a, y).parent;
                    bst::transplant::<A>(a, &mut self.root, y, x);
                    bst::edges_mut::<A>(a, y).right = Some(zr);
                    bst::edges_mut::<A>(a, zr).parent = Some(y);
                    y_parent
                };
                bst::transplant::<A>(a, &mut self.root, z, Some(y));
                bst::edges_mut::<A>(a, y).left = Some(zl);
                bst::edges_mut::<A>(a, zl).parent = Some(y);
                set_color::<A>(a, y, z_color);
                (x, x_parent, y_color)
            }
        };
        A::link_mut(&mut a[z]).reset(false);
        if removed_color == Color::Black {
            self.remove_fixup(a, x, x_parent);
        }
        Ok(z)
    }

    fn find_by<F: FnMut(&A::Elem) -> Ordering>(
        &mut self,
        a: &mut ArenaOf<A>,
        f: F,
    ) -> Option<A::P> {
        RbTree::find_by(self, a, f)
    }

    fn lower_bound_by<F: FnMut(&A::Elem) -> Ordering>(
        &mut self,
        a: &mut ArenaOf<A>,
        f: F,
    ) -> Option<A::P> {
        RbTree::lower_bound_by(self, a, f)
    }

    fn clear(&mut self, a: &mut ArenaOf<A>) -> usize {
        let n = bst::unlink_all::<A>(a, self.root.take());
        debug!("cleared red-black tree of {n} elements");
        n
    }

    fn _check_invariants(this: &Self, a: &ArenaOf<A>) -> Result<(), &'static str> {
        bst::check_structure::<A>(a, this.root)?;
        let Some(root) = this.root else {
            return Ok(())
        };
        if color_of::<A>(a, root) != Color::Black {
            return Err("root is not black")
        }
        // walk down every path and compare black heights at the nil leaves
        let mut leaf_black_height = None;
        let mut stack = alloc::vec![(root, 0usize)];
        while let Some((p, above)) = stack.pop() {
            let red = is_red::<A>(a, Some(p));
            let black_height = above + usize::from(!red);
            let e = *bst::edges::<A>(a, p);
            if red && (is_red::<A>(a, e.left) || is_red::<A>(a, e.right)) {
                return Err("red element has a red child")
            }
            for c in [e.left, e.right] {
                match c {
                    Some(c) => stack.push((c, black_height)),
                    None => match leaf_black_height {
                        None => leaf_black_height = Some(black_height),
                        Some(h) if h != black_height => return Err("black heights differ"),
                        Some(_) => (),
                    },
                }
            }
        }
        Ok(())
    }
}

impl<A: Adapter> Default for RbTree<A>
where
    A::Link: RbLinkage,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<A: Adapter> fmt::Debug for RbTree<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RbTree").field("root", &self.root).finish()
    }
}

impl<A: Adapter> Recast<A::P> for RbTree<A> {
    fn recast<R: Recaster<Item = A::P>>(&mut self, recaster: &R) -> Result<(), <R as Recaster>::Item> {
        if let Some(root) = self.root.as_mut() {
            recaster.recast_item(root)?;
        }
        Ok(())
    }
}
