use alloc::vec::Vec;
use core::{
    borrow::Borrow,
    fmt, mem,
    ops::{Index, IndexMut},
};

use recasting::{Recast, Recaster};
use Entry::*;

use crate::{Ptr, PtrGen, PtrInx};

#[derive(Clone)]
pub(crate) enum Entry<P: Ptr, T> {
    /// Points to the next free entry, the last free entry has `None`
    Free(Option<P::Inx>),
    Allocated(P::Gen, T),
}

/// Caller owned storage for tree elements.
///
/// Every element gets a stable `P: Ptr` handle on insertion. Trees never
/// insert into or remove from an `Arena`, they only rewrite the links embedded
/// in the elements, so the lifetime of an element is entirely under the
/// control of whoever owns the arena.
///
/// If `P` has a generation counter, handles to removed elements are
/// guaranteed to never work again, which is how trees detect stale handles
/// passed to them.
///
/// ```
/// use intrusive_tree::{ptr_struct, Arena};
///
/// ptr_struct!(P0);
///
/// let mut a: Arena<P0, u64> = Arena::new();
/// let p = a.insert(42);
/// assert_eq!(a[p], 42);
/// assert_eq!(a.remove(p), Some(42));
/// assert!(a.get(p).is_none());
/// ```
pub struct Arena<P: Ptr, T> {
    // Invariants:
    // - `gen` starts at 2 so that `Ptr::invalid` never matches
    // - all `Free` entries form one singly linked list starting at
    //   `freelist_root`
    m: Vec<Entry<P, T>>,
    len: usize,
    freelist_root: Option<P::Inx>,
    gen: P::Gen,
}

impl<P: Ptr, T> Arena<P, T> {
    /// Used by tests
    #[doc(hidden)]
    pub fn _check_invariants(this: &Self) -> Result<(), &'static str> {
        if this.gen < P::Gen::two() {
            return Err("bad generation")
        }
        let n_allocated = this.m.iter().filter(|e| matches!(e, Allocated(..))).count();
        if n_allocated != this.len {
            return Err("len != n_allocated")
        }
        let mut n_free = 0;
        let mut inx = this.freelist_root;
        while let Some(i) = inx {
            match this.m.get(PtrInx::get(i)) {
                Some(Free(next)) => inx = *next,
                _ => return Err("bad freelist node"),
            }
            n_free += 1;
            if n_free > this.m.len() {
                return Err("endless freelist")
            }
        }
        if n_free + n_allocated != this.m.len() {
            return Err("freelist discontinuous")
        }
        Ok(())
    }

    pub fn new() -> Self {
        Self {
            m: Vec::new(),
            len: 0,
            freelist_root: None,
            gen: PtrGen::two(),
        }
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            m: Vec::with_capacity(capacity),
            len: 0,
            freelist_root: None,
            gen: PtrGen::two(),
        }
    }

    /// Returns the number of elements in the arena
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.m.capacity()
    }

    /// Returns the generation counter, which is the number of invalidation
    /// operations performed on this arena plus 2
    #[inline]
    pub fn gen(&self) -> P::Gen {
        self.gen
    }

    #[inline]
    fn inc_gen(&mut self) {
        self.gen = PtrGen::increment(self.gen);
    }

    pub fn reserve(&mut self, additional: usize) {
        self.m.reserve(additional);
    }

    /// Inserts `t` and returns a `Ptr` to it. Freed entries are reused before
    /// the arena grows.
    ///
    /// # Panics
    ///
    /// If the number of entries would exceed what `P::Inx` can represent
    pub fn insert(&mut self, t: T) -> P {
        self.insert_with(|_| t)
    }

    /// Inserts the `T` returned by `create`, which is given the same `Ptr` that
    /// is returned. Useful for elements that need to know their own handle.
    pub fn insert_with<F: FnOnce(P) -> T>(&mut self, create: F) -> P {
        let gen = self.gen;
        let p = if let Some(inx) = self.freelist_root {
            let p: P = Ptr::_from_raw(inx, gen);
            let entry = &mut self.m[PtrInx::get(inx)];
            if let Free(next) = *entry {
                self.freelist_root = next;
            }
            *entry = Allocated(gen, create(p));
            p
        } else {
            let p: P = Ptr::_from_raw(PtrInx::new(self.m.len()), gen);
            self.m.push(Allocated(gen, create(p)));
            p
        };
        self.len += 1;
        p
    }

    /// Returns if `p` is a valid `Ptr`
    pub fn contains(&self, p: P) -> bool {
        matches!(self.m.get(PtrInx::get(p.inx())), Some(Allocated(gen, _)) if *gen == p.gen())
    }

    #[must_use]
    pub fn get(&self, p: P) -> Option<&T> {
        match self.m.get(PtrInx::get(p.inx())) {
            Some(Allocated(gen, t)) if *gen == p.gen() => Some(t),
            _ => None,
        }
    }

    #[must_use]
    pub fn get_mut(&mut self, p: P) -> Option<&mut T> {
        match self.m.get_mut(PtrInx::get(p.inx())) {
            Some(Allocated(gen, t)) if *gen == p.gen() => Some(t),
            _ => None,
        }
    }

    /// Removes the `T` pointed to by `p`, returns it, and invalidates all
    /// `Ptr`s to it. Returns `None` if `p` is invalid.
    ///
    /// Removing an element that is still linked into a tree leaves that tree
    /// pointing at a dead entry, unlink it first.
    #[must_use]
    pub fn remove(&mut self, p: P) -> Option<T> {
        if !self.contains(p) {
            return None
        }
        let inx = p.inx();
        let old = mem::replace(&mut self.m[PtrInx::get(inx)], Free(self.freelist_root));
        self.freelist_root = Some(inx);
        self.len -= 1;
        self.inc_gen();
        match old {
            Allocated(_, t) => Some(t),
            Free(_) => unreachable!(),
        }
    }

    /// Drops all `T` and invalidates all `Ptr`s, keeping capacity
    pub fn clear(&mut self) {
        self.m.clear();
        self.freelist_root = None;
        self.len = 0;
        self.inc_gen();
    }

    /// Iteration over `(P, &T)` in storage order
    pub fn iter(&self) -> impl Iterator<Item = (P, &T)> {
        self.m.iter().enumerate().filter_map(|(i, entry)| match entry {
            Allocated(gen, t) => Some((Ptr::_from_raw(PtrInx::new(i), *gen), t)),
            Free(_) => None,
        })
    }

    /// Iteration over all valid `P` in storage order
    pub fn ptrs(&self) -> impl Iterator<Item = P> + '_ {
        self.iter().map(|(p, _)| p)
    }

    /// Mutable iteration over `&mut T` in storage order
    pub fn vals_mut(&mut self) -> impl Iterator<Item = &mut T> {
        self.m.iter_mut().filter_map(|entry| match entry {
            Allocated(_, t) => Some(t),
            Free(_) => None,
        })
    }

    /// Moves all elements to the front of storage, removing all free entries
    /// and shrinking capacity. All old `Ptr`s are invalidated. `map` is run on
    /// `(old P, &mut T, new P)` for every element.
    pub fn compress_and_shrink_with<F: FnMut(P, &mut T, P)>(&mut self, mut map: F) {
        self.inc_gen();
        let gen = self.gen;
        let old_m = mem::take(&mut self.m);
        let mut new_m = Vec::with_capacity(self.len);
        for (i, entry) in old_m.into_iter().enumerate() {
            if let Allocated(old_gen, mut t) = entry {
                let q: P = Ptr::_from_raw(PtrInx::new(new_m.len()), gen);
                map(Ptr::_from_raw(PtrInx::new(i), old_gen), &mut t, q);
                new_m.push(Allocated(gen, t));
            }
        }
        self.m = new_m;
        self.freelist_root = None;
    }

    /// Performs [Arena::compress_and_shrink_with] and returns an `Arena<P, P>`
    /// mapping old `Ptr`s to new ones, which can be used for [Recast]ing links
    /// and tree roots that pointed into the old layout.
    pub fn compress_and_shrink_recaster(&mut self) -> Arena<P, P> {
        let mut res = Arena::<P, P> {
            m: self
                .m
                .iter()
                .map(|entry| match entry {
                    Free(next) => Free(*next),
                    Allocated(gen, _) => Allocated(*gen, P::invalid()),
                })
                .collect(),
            len: self.len,
            freelist_root: self.freelist_root,
            gen: self.gen,
        };
        self.compress_and_shrink_with(|p, _, q| {
            if let Some(slot) = res.get_mut(p) {
                *slot = q;
            }
        });
        res
    }
}

impl<P: Ptr, T> Default for Arena<P, T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<P: Ptr, T: Clone> Clone for Arena<P, T> {
    /// `Ptr`s into `self` are valid in the clone and point to the
    /// corresponding clones of the elements. This includes the embedded tree
    /// links, so a tree root handle can be copied along with the arena.
    fn clone(&self) -> Self {
        Self {
            m: self.m.clone(),
            len: self.len,
            freelist_root: self.freelist_root,
            gen: self.gen,
        }
    }
}

impl<P: Ptr, T, B: Borrow<P>> Index<B> for Arena<P, T> {
    type Output = T;

    fn index(&self, inx: B) -> &T {
        let p: P = *inx.borrow();
        self.get(p).expect("indexed arena with invalidated `Ptr`")
    }
}

impl<P: Ptr, T, B: Borrow<P>> IndexMut<B> for Arena<P, T> {
    fn index_mut(&mut self, inx: B) -> &mut T {
        let p: P = *inx.borrow();
        self.get_mut(p)
            .expect("indexed arena with invalidated `Ptr`")
    }
}

impl<P: Ptr, T: fmt::Debug> fmt::Debug for Arena<P, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<P: Ptr> Recaster for Arena<P, P> {
    type Item = P;

    fn recast_item(&self, item: &mut Self::Item) -> Result<(), Self::Item> {
        if let Some(res) = self.get(*item) {
            *item = *res;
            Ok(())
        } else {
            Err(*item)
        }
    }
}

impl<P: Ptr, I, T: Recast<I>> Recast<I> for Arena<P, T> {
    fn recast<R: Recaster<Item = I>>(&mut self, recaster: &R) -> Result<(), <R as Recaster>::Item> {
        for val in self.vals_mut() {
            val.recast(recaster)?;
        }
        Ok(())
    }
}
