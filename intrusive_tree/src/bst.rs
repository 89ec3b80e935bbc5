//! Engine agnostic binary search tree plumbing. Everything here works purely
//! on `Edges` and the adapter comparator.

use alloc::vec::Vec;
use core::cmp::Ordering;

use crate::{Adapter, ArenaOf, Edges, Linkage, TreeError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Side {
    Left,
    Right,
}

pub(crate) enum Search<P> {
    Found(P),
    /// Where a new leaf would go: the parent and the side under it, or `None`
    /// for an empty tree
    Vacant(Option<(P, Side)>),
}

#[inline]
pub(crate) fn edges<A: Adapter>(a: &ArenaOf<A>, p: A::P) -> &Edges<A::P> {
    A::link(&a[p]).edges()
}

#[inline]
pub(crate) fn edges_mut<A: Adapter>(a: &mut ArenaOf<A>, p: A::P) -> &mut Edges<A::P> {
    A::link_mut(&mut a[p]).edges_mut()
}

pub(crate) fn leftmost<A: Adapter>(a: &ArenaOf<A>, mut p: A::P) -> A::P {
    while let Some(left) = edges::<A>(a, p).left {
        p = left;
    }
    p
}

pub(crate) fn rightmost<A: Adapter>(a: &ArenaOf<A>, mut p: A::P) -> A::P {
    while let Some(right) = edges::<A>(a, p).right {
        p = right;
    }
    p
}

/// In-order successor. Does not depend on the root, so it works on any
/// linked element.
pub fn next<A: Adapter>(a: &ArenaOf<A>, p: A::P) -> Option<A::P> {
    if let Some(right) = edges::<A>(a, p).right {
        return Some(leftmost::<A>(a, right))
    }
    let mut child = p;
    while let Some(parent) = edges::<A>(a, child).parent {
        if edges::<A>(a, parent).left == Some(child) {
            return Some(parent)
        }
        child = parent;
    }
    None
}

pub fn prev<A: Adapter>(a: &ArenaOf<A>, p: A::P) -> Option<A::P> {
    if let Some(left) = edges::<A>(a, p).left {
        return Some(rightmost::<A>(a, left))
    }
    let mut child = p;
    while let Some(parent) = edges::<A>(a, child).parent {
        if edges::<A>(a, parent).right == Some(child) {
            return Some(parent)
        }
        child = parent;
    }
    None
}

/// Points whatever referenced `old` from above (`parent` or the root handle)
/// at `new`. Does not touch the back link of `new`.
pub(crate) fn replace_child<A: Adapter>(
    a: &mut ArenaOf<A>,
    root: &mut Option<A::P>,
    parent: Option<A::P>,
    old: A::P,
    new: Option<A::P>,
) {
    match parent {
        None => *root = new,
        Some(parent) => {
            let e = edges_mut::<A>(a, parent);
            if e.left == Some(old) {
                e.left = new;
            } else {
                e.right = new;
            }
        }
    }
}

/// Puts the subtree `v` where `u` is, leaving the edges of `u` untouched
pub(crate) fn transplant<A: Adapter>(
    a: &mut ArenaOf<A>,
    root: &mut Option<A::P>,
    u: A::P,
    v: Option<A::P>,
) {
    let u_parent = edges::<A>(a, u).parent;
    replace_child::<A>(a, root, u_parent, u, v);
    if let Some(v) = v {
        edges_mut::<A>(a, v).parent = u_parent;
    }
}

/// Rotates `x` down to the left, its right child takes its place. No-op if
/// there is no right child.
pub(crate) fn rotate_left<A: Adapter>(a: &mut ArenaOf<A>, root: &mut Option<A::P>, x: A::P) {
    let Some(y) = edges::<A>(a, x).right else {
        return
    };
    let inner = edges::<A>(a, y).left;
    let x_parent = edges::<A>(a, x).parent;
    edges_mut::<A>(a, x).right = inner;
    if let Some(inner) = inner {
        edges_mut::<A>(a, inner).parent = Some(x);
    }
    edges_mut::<A>(a, y).parent = x_parent;
    replace_child::<A>(a, root, x_parent, x, Some(y));
    edges_mut::<A>(a, y).left = Some(x);
    edges_mut::<A>(a, x).parent = Some(y);
}

/// Rotates `x` down to the right, its left child takes its place. No-op if
/// there is no left child.
pub(crate) fn rotate_right<A: Adapter>(a: &mut ArenaOf<A>, root: &mut Option<A::P>, x: A::P) {
    let Some(y) = edges::<A>(a, x).left else {
        return
    };
    let inner = edges::<A>(a, y).right;
    let x_parent = edges::<A>(a, x).parent;
    edges_mut::<A>(a, x).left = inner;
    if let Some(inner) = inner {
        edges_mut::<A>(a, inner).parent = Some(x);
    }
    edges_mut::<A>(a, y).parent = x_parent;
    replace_child::<A>(a, root, x_parent, x, Some(y));
    edges_mut::<A>(a, y).right = Some(x);
    edges_mut::<A>(a, x).parent = Some(y);
}

/// Descends from `root`. `f` returns the ordering of the target relative to
/// the visited element.
pub(crate) fn search<A: Adapter, F: FnMut(&A::Elem) -> Ordering>(
    a: &ArenaOf<A>,
    root: Option<A::P>,
    mut f: F,
) -> Search<A::P> {
    let Some(mut p) = root else {
        return Search::Vacant(None)
    };
    loop {
        let e = edges::<A>(a, p);
        let (child, side) = match f(&a[p]) {
            Ordering::Less => (e.left, Side::Left),
            Ordering::Equal => return Search::Found(p),
            Ordering::Greater => (e.right, Side::Right),
        };
        match child {
            Some(child) => p = child,
            None => return Search::Vacant(Some((p, side))),
        }
    }
}

/// Returns the least element that the target is not greater than
pub(crate) fn lower_bound<A: Adapter, F: FnMut(&A::Elem) -> Ordering>(
    a: &ArenaOf<A>,
    root: Option<A::P>,
    mut f: F,
) -> Option<A::P> {
    let mut candidate = None;
    let mut cur = root;
    while let Some(p) = cur {
        match f(&a[p]) {
            Ordering::Less => {
                candidate = Some(p);
                cur = edges::<A>(a, p).left;
            }
            Ordering::Equal => return Some(p),
            Ordering::Greater => cur = edges::<A>(a, p).right,
        }
    }
    candidate
}

/// Marks `p` as linked and hangs it as a leaf at `spot`
pub(crate) fn attach<A: Adapter>(
    a: &mut ArenaOf<A>,
    root: &mut Option<A::P>,
    p: A::P,
    spot: Option<(A::P, Side)>,
) {
    A::link_mut(&mut a[p]).reset(true);
    match spot {
        None => *root = Some(p),
        Some((parent, side)) => {
            edges_mut::<A>(a, p).parent = Some(parent);
            let e = edges_mut::<A>(a, parent);
            match side {
                Side::Left => e.left = Some(p),
                Side::Right => e.right = Some(p),
            }
        }
    }
}

pub(crate) fn check_unlinked<A: Adapter>(a: &ArenaOf<A>, p: A::P) -> Result<(), TreeError> {
    let elem = a.get(p).ok_or(TreeError::InvalidPtr)?;
    if A::link(elem).is_linked() {
        Err(TreeError::AlreadyLinked)
    } else {
        Ok(())
    }
}

/// Checks that `p` is live and linked into the tree rooted at `root`, by
/// walking up to the top of the tree `p` is in. Every parent on the way has
/// to point back down, a copy of a linked element only has the parent half
/// of the relation.
pub(crate) fn check_member<A: Adapter>(
    a: &ArenaOf<A>,
    root: Option<A::P>,
    p: A::P,
) -> Result<(), TreeError> {
    let elem = a.get(p).ok_or(TreeError::InvalidPtr)?;
    if !A::link(elem).is_linked() {
        return Err(TreeError::NotLinked)
    }
    let mut top = p;
    while let Some(parent) = edges::<A>(a, top).parent {
        let Some(parent_elem) = a.get(parent) else {
            return Err(TreeError::NotMember)
        };
        let pe = A::link(parent_elem).edges();
        if (pe.left != Some(top)) && (pe.right != Some(top)) {
            return Err(TreeError::NotMember)
        }
        top = parent;
    }
    if root == Some(top) {
        Ok(())
    } else {
        Err(TreeError::NotMember)
    }
}

/// Unlinks the whole tree at `root` in post order without any rebalancing.
/// Returns the number of unlinked elements.
pub(crate) fn unlink_all<A: Adapter>(a: &mut ArenaOf<A>, root: Option<A::P>) -> usize {
    let mut n = 0;
    let mut cur = root;
    while let Some(p) = cur {
        let e = *edges::<A>(a, p);
        if e.left.is_some() {
            cur = e.left;
            continue
        }
        if e.right.is_some() {
            cur = e.right;
            continue
        }
        // leaf, detach from above and go back up
        if let Some(parent) = e.parent {
            let pe = edges_mut::<A>(a, parent);
            if pe.left == Some(p) {
                pe.left = None;
            } else {
                pe.right = None;
            }
        }
        A::link_mut(&mut a[p]).reset(false);
        n += 1;
        cur = e.parent;
    }
    n
}

/// Number of edges on the longest root to leaf path
pub(crate) fn height<A: Adapter>(a: &ArenaOf<A>, root: Option<A::P>) -> usize {
    let mut max = 0;
    let mut stack: Vec<(A::P, usize)> = root.map(|p| (p, 0)).into_iter().collect();
    while let Some((p, depth)) = stack.pop() {
        max = max.max(depth);
        let e = edges::<A>(a, p);
        for child in [e.left, e.right].into_iter().flatten() {
            stack.push((child, depth + 1));
        }
    }
    max
}

/// Checks everything every engine must uphold: valid and consistent links,
/// membership flags, strictly increasing in-order comparisons, and that no
/// linked element of the arena has its parent links ending at `root` without
/// being reachable from it. Returns the number of elements.
pub fn check_structure<A: Adapter>(
    a: &ArenaOf<A>,
    root: Option<A::P>,
) -> Result<usize, &'static str> {
    let Some(root) = root else { return Ok(0) };
    let mut count = 0;
    let mut stack = alloc::vec![(root, None)];
    while let Some((p, parent)) = stack.pop() {
        count += 1;
        if count > a.len() {
            return Err("cycle in tree")
        }
        let Some(elem) = a.get(p) else {
            return Err("link to an invalid `Ptr`")
        };
        let link = A::link(elem);
        if !link.is_linked() {
            return Err("reachable element is not marked as linked")
        }
        let e = link.edges();
        if e.parent != parent {
            return Err("broken parent link")
        }
        if e.left.is_some() && (e.left == e.right) {
            return Err("both children are the same")
        }
        for child in [e.left, e.right].into_iter().flatten() {
            stack.push((child, Some(p)));
        }
    }
    // the links are sound, now check the ordering
    let mut in_order = 0;
    let mut prev: Option<A::P> = None;
    let mut cur = Some(leftmost::<A>(a, root));
    while let Some(p) = cur {
        if let Some(prev) = prev {
            if A::cmp(&a[prev], &a[p]) != Ordering::Less {
                return Err("incorrect ordering")
            }
        }
        in_order += 1;
        prev = Some(p);
        cur = next::<A>(a, p);
    }
    if in_order != count {
        return Err("in-order traversal does not visit every element")
    }
    // everything that claims to hang below `root` has to be reachable from it
    let mut claimed = 0;
    for (p, elem) in a.iter() {
        if !A::link(elem).is_linked() {
            continue
        }
        let mut top = p;
        let mut steps = 0;
        let reaches_root = loop {
            match a.get(top).map(|elem| A::link(elem).edges().parent) {
                None => break false,
                Some(None) => break top == root,
                Some(Some(parent)) => {
                    steps += 1;
                    if steps > a.len() {
                        return Err("cycle of parent links")
                    }
                    top = parent;
                }
            }
        };
        if reaches_root {
            claimed += 1;
        }
    }
    if claimed != count {
        return Err("linked element is not reachable from the root")
    }
    Ok(count)
}
