use recasting::{Recast, Recaster};

use crate::Ptr;

/// The structural part of a link: references to the parent and both children.
///
/// A root has no parent. Everything else about a link (balancing metadata,
/// whether it is linked at all) is engine specific.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Edges<P: Ptr> {
    pub(crate) parent: Option<P>,
    pub(crate) left: Option<P>,
    pub(crate) right: Option<P>,
}

impl<P: Ptr> Edges<P> {
    pub(crate) const EMPTY: Self = Self {
        parent: None,
        left: None,
        right: None,
    };

    pub fn parent(&self) -> Option<P> {
        self.parent
    }

    pub fn left(&self) -> Option<P> {
        self.left
    }

    pub fn right(&self) -> Option<P> {
        self.right
    }
}

impl<P: Ptr> Default for Edges<P> {
    fn default() -> Self {
        Self::EMPTY
    }
}

impl<P: Ptr> core::fmt::Debug for Edges<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Edges")
            .field("parent", &self.parent)
            .field("left", &self.left)
            .field("right", &self.right)
            .finish()
    }
}

impl<P: Ptr> Recast<P> for Edges<P> {
    fn recast<R: Recaster<Item = P>>(&mut self, recaster: &R) -> Result<(), <R as Recaster>::Item> {
        for p in [&mut self.parent, &mut self.left, &mut self.right]
            .into_iter()
            .flatten()
        {
            recaster.recast_item(p)?;
        }
        Ok(())
    }
}

/// Implemented by link types that can be embedded in elements.
///
/// The engines only ever touch an element through this trait (and
/// [RbLinkage] for the red-black engine), never its payload.
pub trait Linkage {
    type P: Ptr;

    fn edges(&self) -> &Edges<Self::P>;

    fn edges_mut(&mut self) -> &mut Edges<Self::P>;

    /// Returns if the element is currently a member of some tree
    fn is_linked(&self) -> bool;

    /// Resets the edges and sets the membership flag
    fn reset(&mut self, linked: bool);
}

/// Extra metadata needed by the red-black engine
pub trait RbLinkage: Linkage {
    fn color(&self) -> Color;

    fn set_color(&mut self, color: Color);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Color {
    Red,
    Black,
}

/// A link for red-black trees. It can also be used in a
/// [SplayTree](crate::SplayTree), the color is then ignored.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct RbLink<P: Ptr> {
    edges: Edges<P>,
    color: Color,
    linked: bool,
}

impl<P: Ptr> RbLink<P> {
    /// Creates an unlinked link
    pub const fn new() -> Self {
        Self {
            edges: Edges::EMPTY,
            color: Color::Black,
            linked: false,
        }
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn color(&self) -> Color {
        self.color
    }

    pub fn edges(&self) -> &Edges<P> {
        &self.edges
    }
}

impl<P: Ptr> Default for RbLink<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Ptr> core::fmt::Debug for RbLink<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.linked {
            f.write_fmt(format_args!(
                "{:?} p: {:?} l: {:?} r: {:?}",
                self.color, self.edges.parent, self.edges.left, self.edges.right
            ))
        } else {
            f.write_str("unlinked")
        }
    }
}

impl<P: Ptr> Linkage for RbLink<P> {
    type P = P;

    #[inline]
    fn edges(&self) -> &Edges<P> {
        &self.edges
    }

    #[inline]
    fn edges_mut(&mut self) -> &mut Edges<P> {
        &mut self.edges
    }

    #[inline]
    fn is_linked(&self) -> bool {
        self.linked
    }

    fn reset(&mut self, linked: bool) {
        self.edges = Edges::EMPTY;
        self.color = Color::Black;
        self.linked = linked;
    }
}

impl<P: Ptr> RbLinkage for RbLink<P> {
    #[inline]
    fn color(&self) -> Color {
        self.color
    }

    #[inline]
    fn set_color(&mut self, color: Color) {
        self.color = color;
    }
}

impl<P: Ptr> Recast<P> for RbLink<P> {
    fn recast<R: Recaster<Item = P>>(&mut self, recaster: &R) -> Result<(), <R as Recaster>::Item> {
        self.edges.recast(recaster)
    }
}

/// A link for splay trees, which need no balancing metadata
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct SplayLink<P: Ptr> {
    edges: Edges<P>,
    linked: bool,
}

impl<P: Ptr> SplayLink<P> {
    /// Creates an unlinked link
    pub const fn new() -> Self {
        Self {
            edges: Edges::EMPTY,
            linked: false,
        }
    }

    pub fn is_linked(&self) -> bool {
        self.linked
    }

    pub fn edges(&self) -> &Edges<P> {
        &self.edges
    }
}

impl<P: Ptr> Default for SplayLink<P> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Ptr> core::fmt::Debug for SplayLink<P> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.linked {
            f.write_fmt(format_args!(
                "p: {:?} l: {:?} r: {:?}",
                self.edges.parent, self.edges.left, self.edges.right
            ))
        } else {
            f.write_str("unlinked")
        }
    }
}

impl<P: Ptr> Linkage for SplayLink<P> {
    type P = P;

    #[inline]
    fn edges(&self) -> &Edges<P> {
        &self.edges
    }

    #[inline]
    fn edges_mut(&mut self) -> &mut Edges<P> {
        &mut self.edges
    }

    #[inline]
    fn is_linked(&self) -> bool {
        self.linked
    }

    fn reset(&mut self, linked: bool) {
        self.edges = Edges::EMPTY;
        self.linked = linked;
    }
}

impl<P: Ptr> Recast<P> for SplayLink<P> {
    fn recast<R: Recaster<Item = P>>(&mut self, recaster: &R) -> Result<(), <R as Recaster>::Item> {
        self.edges.recast(recaster)
    }
}
