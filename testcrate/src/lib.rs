use std::{cell::Cell, cmp::Ordering, num::NonZeroU32};

use intrusive_tree::{
    ptr_struct,
    recasting::{Recast, Recaster},
    tree_adapter, Arena, OrderedTree, RbLink, RbTree, SplayLink, TreeError,
};
use rand_xoshiro::{rand_core::RngCore, Xoshiro128StarStar};
use simplelog::{Config, LevelFilter, TestLogger};

ptr_struct!(P0);
ptr_struct!(P1[NonZeroU32]());

/// Installs the test logger, later calls are no-ops
pub fn init_logging(level: LevelFilter) {
    let _ = TestLogger::init(level, Config::default());
}

/// A keyed element, generic over the link it embeds
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Item<L> {
    pub key: u64,
    /// Not compared, for telling apart elements with equal keys
    pub id: u64,
    pub link: L,
}

impl<L: Default> Item<L> {
    pub fn new(key: u64, id: u64) -> Self {
        Self {
            key,
            id,
            link: L::default(),
        }
    }

    /// An unlinked element only meant for lookups
    pub fn query(key: u64) -> Self {
        Self::new(key, u64::MAX)
    }
}

impl<L: Recast<P0>> Recast<P0> for Item<L> {
    fn recast<R: Recaster<Item = P0>>(&mut self, recaster: &R) -> Result<(), <R as Recaster>::Item> {
        self.link.recast(recaster)
    }
}

pub fn cmp_key<L>(lhs: &Item<L>, rhs: &Item<L>) -> Ordering {
    lhs.key.cmp(&rhs.key)
}

/// A line of text, what the demo binary sorts
#[derive(Debug, Clone)]
pub struct Line<L> {
    pub text: String,
    pub link: L,
}

impl<L: Default> Line<L> {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            link: L::default(),
        }
    }
}

pub fn cmp_text<L>(lhs: &Line<L>, rhs: &Line<L>) -> Ordering {
    lhs.text.cmp(&rhs.text)
}

// the same adapters work for both engines as long as the link has what the
// engine needs

tree_adapter! {
    /// `Item`s with red-black links ordered by key
    pub struct RbItems for Item<RbLink<P0>> {
        link: link as RbLink<P0>,
        cmp: cmp_key,
    }
}

tree_adapter! {
    /// `Item`s with splay links ordered by key
    pub struct SplayItems for Item<SplayLink<P0>> {
        link: link as SplayLink<P0>,
        cmp: cmp_key,
    }
}

tree_adapter! {
    pub struct RbLines for Line<RbLink<P0>> {
        link: link as RbLink<P0>,
        cmp: cmp_text,
    }
}

tree_adapter! {
    pub struct SplayLines for Line<SplayLink<P0>> {
        link: link as SplayLink<P0>,
        cmp: cmp_text,
    }
}

/// Collects unique lines in sorted order, what the `sort_lines` binary runs
#[derive(Debug, Default)]
pub struct LineSorter {
    arena: Arena<P0, Line<RbLink<P0>>>,
    tree: RbTree<RbLines>,
}

impl LineSorter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `Ok(true)` if `text` was not seen before
    pub fn push(&mut self, text: &str) -> Result<bool, TreeError> {
        let line = Line::new(text);
        if self.tree.find(&self.arena, &line).is_some() {
            return Ok(false)
        }
        let p = self.arena.insert(line);
        match self.tree.insert(&mut self.arena, p)? {
            None => Ok(true),
            Some(_) => {
                // the lookup above rules this out
                let rejected = self.arena.remove(p);
                debug_assert!(rejected.is_some());
                Ok(false)
            }
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arena.is_empty()
    }

    /// Unlinks and frees every line, returning them in ascending order
    pub fn into_sorted(mut self) -> Vec<String> {
        let mut res = Vec::with_capacity(self.arena.len());
        self.tree.destroy(&mut self.arena, |a, p| {
            if let Some(line) = a.remove(p) {
                res.push(line.text);
            }
        });
        res
    }
}

thread_local! {
    static CMP_COUNT: Cell<u64> = Cell::new(0);
}

/// Returns the number of comparisons made through the counting adapters
/// since the last call
pub fn take_cmp_count() -> u64 {
    CMP_COUNT.with(|c| c.replace(0))
}

pub fn counting_cmp_key<L>(lhs: &Item<L>, rhs: &Item<L>) -> Ordering {
    CMP_COUNT.with(|c| c.set(c.get() + 1));
    lhs.key.cmp(&rhs.key)
}

tree_adapter! {
    /// Counts every comparison, for checking the number of comparisons each
    /// operation needs
    pub struct CountingRbItems for Item<RbLink<P1>> {
        link: link as RbLink<P1>,
        cmp: counting_cmp_key,
    }
}

tree_adapter! {
    pub struct CountingSplayItems for Item<SplayLink<P1>> {
        link: link as SplayLink<P1>,
        cmp: counting_cmp_key,
    }
}

/// Fisher-Yates shuffle
pub fn shuffle<T>(rng: &mut Xoshiro128StarStar, v: &mut [T]) {
    for i in (1..v.len()).rev() {
        let j = (rng.next_u64() % ((i + 1) as u64)) as usize;
        v.swap(i, j);
    }
}

/// Generates a workload of `Ok(key)` insertions and `Err(i)` removals of the
/// `i`th live element (in the order they were inserted, with `swap_remove`
/// semantics). Fills up to `fill` elements, does `churn` random operations
/// while keeping roughly the same size, then drains everything. Keys are
/// unique.
pub fn workload(
    rng: &mut Xoshiro128StarStar,
    fill: usize,
    churn: usize,
) -> Vec<Result<u64, usize>> {
    let mut res = vec![];
    let mut live = 0usize;
    let mut next_key = {
        let mut keys: Vec<u64> = (0..((fill + churn) as u64)).collect();
        shuffle(rng, &mut keys);
        keys.into_iter()
    };
    for _ in 0..fill {
        if let Some(k) = next_key.next() {
            res.push(Ok(k));
            live += 1;
        }
    }
    for _ in 0..churn {
        if live != 0 && (rng.next_u32() % 2) == 0 {
            res.push(Err((rng.next_u64() % (live as u64)) as usize));
            live -= 1;
        } else if let Some(k) = next_key.next() {
            res.push(Ok(k));
            live += 1;
        }
    }
    while live != 0 {
        res.push(Err((rng.next_u64() % (live as u64)) as usize));
        live -= 1;
    }
    res
}
