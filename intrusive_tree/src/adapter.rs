use core::cmp::Ordering;

use crate::{Arena, Linkage, Ptr};

/// Binds a tree to an element type, the link embedded in that element type,
/// and a comparator over elements.
///
/// Adapters are zero sized marker types and are normally made with the
/// [tree_adapter](crate::tree_adapter) macro. Every tree type is generic over
/// an adapter and is monomorphized per adapter, there is no runtime dispatch.
///
/// `cmp` must be a total order that stays consistent for as long as an
/// element is linked. Mutating the compared fields of a linked element breaks
/// the tree.
pub trait Adapter {
    type P: Ptr;
    type Elem;
    /// Links only hold `Ptr`s, so they never borrow anything
    type Link: Linkage<P = Self::P> + 'static;

    fn link(elem: &Self::Elem) -> &Self::Link;

    fn link_mut(elem: &mut Self::Elem) -> &mut Self::Link;

    fn cmp(lhs: &Self::Elem, rhs: &Self::Elem) -> Ordering;
}

/// The arena type that trees using adapter `A` operate over
pub type ArenaOf<A> = Arena<<A as Adapter>::P, <A as Adapter>::Elem>;

/// Makes a zero sized struct implementing [Adapter](crate::Adapter).
///
/// The link field is named along with its type, and the comparator can be a
/// function path or a non capturing closure.
///
/// ```
/// use intrusive_tree::{ptr_struct, tree_adapter, Arena, OrderedTree, RbLink, RbTree};
///
/// ptr_struct!(P0);
///
/// struct Line {
///     text: String,
///     entry: RbLink<P0>,
/// }
///
/// tree_adapter! {
///     /// Orders lines lexicographically
///     struct LineAdapter for Line {
///         link: entry as RbLink<P0>,
///         cmp: |a: &Line, b: &Line| a.text.cmp(&b.text),
///     }
/// }
///
/// let mut a: Arena<P0, Line> = Arena::new();
/// let mut tree: RbTree<LineAdapter> = RbTree::new();
/// let p = a.insert(Line {
///     text: "hello".to_owned(),
///     entry: RbLink::new(),
/// });
/// assert_eq!(tree.insert(&mut a, p), Ok(None));
/// assert_eq!(tree.min(&a), Some(p));
/// ```
#[macro_export]
macro_rules! tree_adapter {
    (
        $(#[$attributes:meta])*
        $vis:vis struct $name:ident for $elem:ty {
            link: $field:ident as $link:ty,
            cmp: $cmp:expr $(,)?
        }
    ) => {
        $(#[$attributes])*
        #[derive(
            core::fmt::Debug,
            core::clone::Clone,
            core::marker::Copy,
            core::default::Default,
            core::cmp::PartialEq,
            core::cmp::Eq,
            core::hash::Hash
        )]
        $vis struct $name;

        impl $crate::Adapter for $name {
            type P = <$link as $crate::Linkage>::P;
            type Elem = $elem;
            type Link = $link;

            #[inline]
            fn link(elem: &Self::Elem) -> &Self::Link {
                &elem.$field
            }

            #[inline]
            fn link_mut(elem: &mut Self::Elem) -> &mut Self::Link {
                &mut elem.$field
            }

            #[inline]
            fn cmp(lhs: &Self::Elem, rhs: &Self::Elem) -> core::cmp::Ordering {
                let cmp: fn(&$elem, &$elem) -> core::cmp::Ordering = $cmp;
                cmp(lhs, rhs)
            }
        }
    };
}
