//! Intrusive ordered containers over caller owned arenas.
//!
//! Elements embed their own tree links, so linking an element into a tree
//! never allocates. The elements live in an [Arena] owned by the caller and
//! the trees only store the `Ptr` of their root, every operation takes the
//! arena explicitly. Removing an element from a tree hands it back to the
//! caller, it stays in the arena until the caller removes it from there.
//!
//! Two balancing engines share the same [OrderedTree] contract:
//!
//! - [RbTree], a red-black tree with worst case O(log n) operations
//! - [SplayTree], a splay tree with amortized O(log n) operations that moves
//!   accessed elements to the root
//!
//! A tree is bound to an element type, the link field, and a comparator by an
//! [Adapter], which is normally generated with [tree_adapter]. Everything is
//! monomorphized per adapter.
//!
//! ```
//! use intrusive_tree::{ptr_struct, tree_adapter, Advancer, Arena, OrderedTree, RbLink, RbTree};
//!
//! ptr_struct!(P0);
//!
//! struct Fruit {
//!     name: &'static str,
//!     link: RbLink<P0>,
//! }
//!
//! impl Fruit {
//!     fn new(name: &'static str) -> Self {
//!         Self {
//!             name,
//!             link: RbLink::new(),
//!         }
//!     }
//! }
//!
//! tree_adapter! {
//!     struct ByName for Fruit {
//!         link: link as RbLink<P0>,
//!         cmp: |a: &Fruit, b: &Fruit| a.name.cmp(b.name),
//!     }
//! }
//!
//! let mut a: Arena<P0, Fruit> = Arena::new();
//! let mut tree: RbTree<ByName> = RbTree::new();
//!
//! let banana = a.insert(Fruit::new("banana"));
//! let apple = a.insert(Fruit::new("apple"));
//! let cherry = a.insert(Fruit::new("cherry"));
//! let apple2 = a.insert(Fruit::new("apple"));
//! assert_eq!(tree.insert(&mut a, banana), Ok(None));
//! assert_eq!(tree.insert(&mut a, apple), Ok(None));
//! assert_eq!(tree.insert(&mut a, cherry), Ok(None));
//! // equal elements are not inserted, the existing one is returned
//! assert_eq!(tree.insert(&mut a, apple2), Ok(Some(apple)));
//!
//! let names: Vec<&str> = tree.iter(&a).map(|(_, f)| f.name).collect();
//! assert_eq!(names, ["apple", "banana", "cherry"]);
//! assert_eq!(tree.find(&a, &Fruit::new("cherry")), Some(cherry));
//!
//! // remove everything while traversing
//! let mut adv = tree.advancer(&a);
//! while let Some(p) = adv.advance(&a) {
//!     tree.remove(&mut a, p).unwrap();
//!     a.remove(p).unwrap();
//! }
//! assert!(tree.is_empty());
//! assert_eq!(a.len(), 1);
//! ```

#![no_std]
// because `Ptr` is based on user-controlled code we will not use unsafe code
#![deny(unsafe_code)]
// false positives
#![allow(clippy::while_let_on_iterator)]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod adapter;
mod advancer;
mod arena;
mod bst;
mod error;
mod iterators;
mod link;
mod ptr;
mod rb;
mod splay;
mod tree;

pub use adapter::{Adapter, ArenaOf};
pub use advancer::Advancer;
pub use arena::Arena;
pub use error::TreeError;
pub use iterators::{Iter, TreeAdvancer};
pub use link::{Color, Edges, Linkage, RbLink, RbLinkage, SplayLink};
pub use ptr::{Ptr, PtrGen, PtrInx};
pub use rb::RbTree;
pub use recasting;
pub use splay::SplayTree;
pub use tree::OrderedTree;

/// Internal traversal and validation helpers, only for testing purposes
#[cfg(feature = "expose_internal_utils")]
pub mod utils {
    pub use crate::bst::{check_structure, next, prev};
}
