//! Scenarios every balancing engine has to pass, run against each engine and
//! link combination at the bottom of this file

use std::fmt::Debug;

use intrusive_tree::{
    recasting::Recast, Adapter, Advancer, Arena, ArenaOf, Linkage, OrderedTree, RbLink, RbTree,
    SplayLink, SplayTree, TreeError,
};
use log::LevelFilter;
use rand_xoshiro::{rand_core::SeedableRng, Xoshiro128StarStar};
use testcrate::{init_logging, shuffle, Item, Line, RbItems, RbLines, SplayItems, SplayLines, P0};

fn check<A: Adapter, T: OrderedTree<A>>(tree: &T, a: &ArenaOf<A>) {
    if let Err(e) = T::_check_invariants(tree, a) {
        panic!("{e}");
    }
}

fn build<L, A, T>(keys: &[u64]) -> (ArenaOf<A>, T, Vec<P0>)
where
    L: Linkage<P = P0> + Default,
    A: Adapter<P = P0, Elem = Item<L>>,
    T: OrderedTree<A>,
{
    let mut a: ArenaOf<A> = Arena::new();
    let mut tree = T::new();
    let mut ptrs = vec![];
    for (id, key) in keys.iter().enumerate() {
        let p = a.insert(Item::new(*key, id as u64));
        assert_eq!(tree.insert(&mut a, p), Ok(None));
        ptrs.push(p);
    }
    check::<A, T>(&tree, &a);
    (a, tree, ptrs)
}

fn keys<L, A, T>(tree: &T, a: &ArenaOf<A>) -> Vec<u64>
where
    A: Adapter<P = P0, Elem = Item<L>>,
    T: OrderedTree<A>,
{
    tree.iter(a).map(|(_, item)| item.key).collect()
}

fn duplicate_insertion<L, A, T>()
where
    L: Linkage<P = P0> + Default,
    A: Adapter<P = P0, Elem = Line<L>>,
    T: OrderedTree<A>,
{
    init_logging(LevelFilter::Debug);
    let mut a: ArenaOf<A> = Arena::new();
    let mut tree = T::new();
    let banana = a.insert(Line::new("banana"));
    let apple = a.insert(Line::new("apple"));
    let cherry = a.insert(Line::new("cherry"));
    let apple2 = a.insert(Line::new("apple"));
    assert_eq!(tree.insert(&mut a, banana), Ok(None));
    assert_eq!(tree.insert(&mut a, apple), Ok(None));
    assert_eq!(tree.insert(&mut a, cherry), Ok(None));
    assert_eq!(tree.count(&a), 3);
    assert_eq!(tree.insert(&mut a, apple2), Ok(Some(apple)));
    assert_eq!(tree.count(&a), 3);
    assert!(!A::link(&a[apple2]).is_linked());
    check::<A, T>(&tree, &a);
    let texts: Vec<&str> = tree.iter(&a).map(|(_, line)| line.text.as_str()).collect();
    assert_eq!(texts, ["apple", "banana", "cherry"]);

    // the rejected element is free to go into another tree
    let mut other = T::new();
    assert_eq!(other.insert(&mut a, apple2), Ok(None));
    assert!(other.contains(&a, apple2));
    assert!(!tree.contains(&a, apple2));
    check::<A, T>(&other, &a);
}

fn remove_min_repeatedly<L, A, T>()
where
    L: Linkage<P = P0> + Default,
    A: Adapter<P = P0, Elem = Item<L>>,
    T: OrderedTree<A>,
{
    init_logging(LevelFilter::Debug);
    let (mut a, mut tree, _) = build::<L, A, T>(&[3, 1, 5, 2, 4]);
    let mut removed = vec![];
    while let Some(p) = tree.min(&a) {
        assert_eq!(tree.remove(&mut a, p), Ok(p));
        assert!(!A::link(&a[p]).is_linked());
        check::<A, T>(&tree, &a);
        removed.push(a[p].key);
    }
    assert_eq!(removed, [1, 2, 3, 4, 5]);
    assert!(tree.is_empty());
    assert_eq!(tree.max(&a), None);
    assert_eq!(tree.count(&a), 0);
    // the elements were handed back and not destroyed
    assert_eq!(a.len(), 5);
}

fn safe_traversal_removal<L, A, T>()
where
    L: Linkage<P = P0> + Default,
    A: Adapter<P = P0, Elem = Item<L>>,
    T: OrderedTree<A>,
{
    init_logging(LevelFilter::Debug);
    let (mut a, mut tree, _) = build::<L, A, T>(&[2, 3, 1]);
    let mut visited = vec![];
    let mut adv = tree.advancer(&a);
    while let Some(p) = adv.advance(&a) {
        visited.push(a[p].key);
        tree.remove(&mut a, p).unwrap();
        a.remove(p).unwrap();
        check::<A, T>(&tree, &a);
    }
    assert_eq!(visited, [1, 2, 3]);
    assert!(tree.is_empty());
    assert!(a.is_empty());

    // removing only some elements while traversing
    let keys_in: Vec<u64> = (1..=20).collect();
    let (mut a, mut tree, _) = build::<L, A, T>(&keys_in);
    let mut visited = vec![];
    let mut adv = tree.advancer(&a);
    while let Some(p) = adv.advance(&a) {
        let key = a[p].key;
        visited.push(key);
        if (key % 2) == 0 {
            tree.remove(&mut a, p).unwrap();
        }
    }
    check::<A, T>(&tree, &a);
    assert_eq!(visited, keys_in);
    assert_eq!(keys::<L, A, T>(&tree, &a), (1..=20).step_by(2).collect::<Vec<u64>>());
}

fn round_trip<L, A, T>()
where
    L: Linkage<P = P0> + Default,
    A: Adapter<P = P0, Elem = Item<L>>,
    T: OrderedTree<A>,
{
    let mut rng = Xoshiro128StarStar::seed_from_u64(0);
    for n in [0u64, 1, 2, 3, 10, 100, 500] {
        let mut keys_in: Vec<u64> = (0..n).collect();
        shuffle(&mut rng, &mut keys_in);
        let (mut a, mut tree, mut ptrs) = build::<L, A, T>(&keys_in);
        assert_eq!(tree.count(&a), n as usize);
        let mut removal_order = ptrs.clone();
        shuffle(&mut rng, &mut removal_order);
        let mut returned = vec![];
        for p in removal_order {
            returned.push(tree.remove(&mut a, p).unwrap());
            check::<A, T>(&tree, &a);
        }
        assert!(tree.is_empty());
        returned.sort();
        ptrs.sort();
        assert_eq!(returned, ptrs);
        for (_, item) in a.iter() {
            assert!(!item.link.is_linked());
        }
    }
}

fn find_idempotence<L, A, T>()
where
    L: Linkage<P = P0> + Default + Clone + PartialEq + Debug,
    A: Adapter<P = P0, Elem = Item<L>>,
    T: OrderedTree<A>,
{
    let mut rng = Xoshiro128StarStar::seed_from_u64(1);
    let mut keys_in: Vec<u64> = (1..=50).collect();
    shuffle(&mut rng, &mut keys_in);
    let (mut a, mut tree, _) = build::<L, A, T>(&keys_in);
    let snapshot = |tree: &T, a: &ArenaOf<A>| {
        let links: Vec<(P0, L)> = a.iter().map(|(p, item)| (p, item.link.clone())).collect();
        (tree.root(), links)
    };

    let found = tree.find(&mut a, &Item::query(17)).unwrap();
    assert_eq!(a[found].key, 17);
    let before = snapshot(&tree, &a);
    for _ in 0..10 {
        assert_eq!(tree.find(&mut a, &Item::query(17)), Some(found));
        assert_eq!(snapshot(&tree, &a), before);
    }

    assert_eq!(tree.find(&mut a, &Item::query(1000)), None);
    let before = snapshot(&tree, &a);
    for _ in 0..10 {
        assert_eq!(tree.find(&mut a, &Item::query(1000)), None);
        assert_eq!(snapshot(&tree, &a), before);
    }
    check::<A, T>(&tree, &a);
}

fn traversal<L, A, T>()
where
    L: Linkage<P = P0> + Default,
    A: Adapter<P = P0, Elem = Item<L>>,
    T: OrderedTree<A>,
{
    let mut rng = Xoshiro128StarStar::seed_from_u64(2);
    // only even keys
    let mut keys_in: Vec<u64> = (0..100).map(|x| x * 2).collect();
    shuffle(&mut rng, &mut keys_in);
    let (mut a, mut tree, _) = build::<L, A, T>(&keys_in);
    let expected: Vec<u64> = (0..100).map(|x| x * 2).collect();

    assert_eq!(keys::<L, A, T>(&tree, &a), expected);
    let rev: Vec<u64> = tree.iter(&a).rev().map(|(_, item)| item.key).collect();
    assert_eq!(rev, expected.iter().rev().copied().collect::<Vec<u64>>());

    // meeting in the middle
    let mut iter = tree.iter(&a);
    let mut front = vec![];
    let mut back = vec![];
    loop {
        match iter.next() {
            Some((_, item)) => front.push(item.key),
            None => break,
        }
        match iter.next_back() {
            Some((_, item)) => back.push(item.key),
            None => break,
        }
    }
    assert!(iter.next().is_none());
    assert_eq!(front.len() + back.len(), 100);
    back.reverse();
    front.extend(back);
    assert_eq!(front, expected);

    // successor and predecessor chains
    let mut chain = vec![];
    let mut cur = tree.min(&a);
    while let Some(p) = cur {
        chain.push(a[p].key);
        cur = tree.successor(&a, p).unwrap();
    }
    assert_eq!(chain, expected);
    let mut chain = vec![];
    let mut cur = tree.max(&a);
    while let Some(p) = cur {
        chain.push(a[p].key);
        cur = tree.predecessor(&a, p).unwrap();
    }
    chain.reverse();
    assert_eq!(chain, expected);

    // bulk traversal
    let mut visited = vec![];
    tree.for_each(&a, |_, item| visited.push(item.key));
    assert_eq!(visited, expected);
    tree.for_each_mut(&mut a, |_, item| item.id = item.key * 10);
    tree.for_each(&a, |_, item| assert_eq!(item.id, item.key * 10));

    // lower bounds
    for key in 0..210 {
        let bound = tree
            .lower_bound(&mut a, &Item::query(key))
            .map(|p| a[p].key);
        let expected_bound = if key >= 199 {
            None
        } else {
            Some(key + (key % 2))
        };
        assert_eq!(bound, expected_bound);
    }
    check::<A, T>(&tree, &a);
}

fn destroy<L, A, T>()
where
    L: Linkage<P = P0> + Default,
    A: Adapter<P = P0, Elem = Item<L>>,
    T: OrderedTree<A>,
{
    init_logging(LevelFilter::Debug);
    let mut rng = Xoshiro128StarStar::seed_from_u64(3);
    let mut keys_in: Vec<u64> = (0..40).collect();
    shuffle(&mut rng, &mut keys_in);
    let (mut a, mut tree, _) = build::<L, A, T>(&keys_in);
    let mut cleaned = vec![];
    let n = tree.destroy(&mut a, |a: &mut ArenaOf<A>, p| {
        cleaned.push(a.remove(p).unwrap().key);
    });
    assert_eq!(n, 40);
    assert_eq!(cleaned, (0..40).collect::<Vec<u64>>());
    assert!(tree.is_empty());
    assert!(a.is_empty());
    assert_eq!(tree.destroy(&mut a, |_, _| ()), 0);
}

fn clear<L, A, T>()
where
    L: Linkage<P = P0> + Default,
    A: Adapter<P = P0, Elem = Item<L>>,
    T: OrderedTree<A>,
{
    init_logging(LevelFilter::Debug);
    let mut rng = Xoshiro128StarStar::seed_from_u64(4);
    let mut keys_in: Vec<u64> = (0..40).collect();
    shuffle(&mut rng, &mut keys_in);
    let (mut a, mut tree, ptrs) = build::<L, A, T>(&keys_in);
    assert_eq!(tree.clear(&mut a), 40);
    assert!(tree.is_empty());
    assert_eq!(a.len(), 40);
    for p in &ptrs {
        assert!(!A::link(&a[p]).is_linked());
    }
    // everything can be linked again
    for p in &ptrs {
        assert_eq!(tree.insert(&mut a, *p), Ok(None));
    }
    check::<A, T>(&tree, &a);
    assert_eq!(keys::<L, A, T>(&tree, &a), (0..40).collect::<Vec<u64>>());
    assert_eq!(T::new().clear(&mut a), 0);
}

fn misuse<L, A, T>()
where
    L: Linkage<P = P0> + Default,
    A: Adapter<P = P0, Elem = Item<L>>,
    T: OrderedTree<A>,
{
    let (mut a, mut tree, ptrs) = build::<L, A, T>(&[1, 2, 3]);
    let mut other = T::new();
    let lone = a.insert(Item::new(4, 4));

    assert_eq!(tree.insert(&mut a, ptrs[0]), Err(TreeError::AlreadyLinked));
    assert_eq!(other.insert(&mut a, ptrs[0]), Err(TreeError::AlreadyLinked));
    assert_eq!(tree.remove(&mut a, lone), Err(TreeError::NotLinked));
    assert_eq!(tree.successor(&a, lone), Err(TreeError::NotLinked));

    assert_eq!(other.insert(&mut a, lone), Ok(None));
    assert_eq!(tree.remove(&mut a, lone), Err(TreeError::NotMember));
    assert_eq!(other.remove(&mut a, ptrs[1]), Err(TreeError::NotMember));
    assert_eq!(tree.successor(&a, lone), Err(TreeError::NotMember));
    assert_eq!(tree.predecessor(&a, lone), Err(TreeError::NotMember));
    assert!(tree.contains(&a, ptrs[1]));
    assert!(!tree.contains(&a, lone));

    // stale handles are caught by the generation counter
    assert_eq!(other.remove(&mut a, lone), Ok(lone));
    a.remove(lone).unwrap();
    assert_eq!(tree.insert(&mut a, lone), Err(TreeError::InvalidPtr));
    assert_eq!(tree.remove(&mut a, lone), Err(TreeError::InvalidPtr));
    assert_eq!(tree.successor(&a, lone), Err(TreeError::InvalidPtr));

    // nothing changed
    assert_eq!(keys::<L, A, T>(&tree, &a), [1, 2, 3]);
    assert!(other.is_empty());
    check::<A, T>(&tree, &a);
}

fn cloned_links<L, A, T>()
where
    L: Linkage<P = P0> + Default + Clone,
    A: Adapter<P = P0, Elem = Item<L>>,
    T: OrderedTree<A>,
{
    let keys_in: Vec<u64> = (0..7).collect();
    let (mut a, mut tree, ptrs) = build::<L, A, T>(&keys_in);
    for p in ptrs.iter().copied() {
        // a copy carries the links and the linked flag of a real member
        let copy = a[p].clone();
        let q = a.insert(copy);
        assert!(A::link(&a[q]).is_linked());
        assert!(!tree.contains(&a, q));
        assert_eq!(tree.remove(&mut a, q), Err(TreeError::NotMember));
        assert_eq!(tree.successor(&a, q), Err(TreeError::NotMember));
        assert_eq!(tree.predecessor(&a, q), Err(TreeError::NotMember));
        assert_eq!(tree.insert(&mut a, q), Err(TreeError::AlreadyLinked));
        if tree.root() != Some(p) {
            // the copy claims a place below the root that it does not have
            assert!(T::_check_invariants(&tree, &a).is_err());
        }
        a.remove(q).unwrap();
        check::<A, T>(&tree, &a);
        assert_eq!(keys::<L, A, T>(&tree, &a), keys_in);
        assert!(tree.contains(&a, p));
    }
}

fn recast_after_compaction<L, A, T>()
where
    L: Linkage<P = P0> + Default + Recast<P0>,
    A: Adapter<P = P0, Elem = Item<L>>,
    T: OrderedTree<A> + Recast<P0>,
{
    let keys_in: Vec<u64> = (0..64).collect();
    let (mut a, mut tree, ptrs) = build::<L, A, T>(&keys_in);
    // punch holes into the arena
    for p in ptrs.iter().step_by(3) {
        tree.remove(&mut a, *p).unwrap();
        a.remove(*p).unwrap();
    }
    let before = keys::<L, A, T>(&tree, &a);
    let recaster = a.compress_and_shrink_recaster();
    a.recast(&recaster).unwrap();
    tree.recast(&recaster).unwrap();
    Arena::_check_invariants(&a).unwrap();
    check::<A, T>(&tree, &a);
    assert_eq!(keys::<L, A, T>(&tree, &a), before);
    // the old handles are stale now
    assert!(!a.contains(ptrs[1]));
}

fn random_heights<L, A, T>()
where
    L: Linkage<P = P0> + Default,
    A: Adapter<P = P0, Elem = Item<L>>,
    T: OrderedTree<A>,
{
    let mut rng = Xoshiro128StarStar::seed_from_u64(5);
    let n = 1000u64;
    let ascending: Vec<u64> = (0..n).collect();
    let descending: Vec<u64> = (0..n).rev().collect();
    let mut random: Vec<u64> = (0..n).collect();
    shuffle(&mut rng, &mut random);
    for keys_in in [ascending, descending, random] {
        let (mut a, mut tree, _) = build::<L, A, T>(&keys_in);
        assert_eq!(tree.count(&a), n as usize);
        assert!(tree.height(&a) < n as usize);
        for k in 0..n {
            let p = tree.find(&mut a, &Item::query(k)).unwrap();
            assert_eq!(a[p].key, k);
        }
        check::<A, T>(&tree, &a);
        assert_eq!(keys::<L, A, T>(&tree, &a), (0..n).collect::<Vec<u64>>());
    }
}

macro_rules! conformance {
    ($($name:ident: $tree:ident, $link:ty, $items:ty, $lines:ty;)*) => {
        $(
            mod $name {
                use super::*;

                type L = $link;
                type Items = $tree<$items>;
                type Lines = $tree<$lines>;

                #[test]
                fn duplicate_insertion() {
                    super::duplicate_insertion::<L, $lines, Lines>()
                }

                #[test]
                fn remove_min_repeatedly() {
                    super::remove_min_repeatedly::<L, $items, Items>()
                }

                #[test]
                fn safe_traversal_removal() {
                    super::safe_traversal_removal::<L, $items, Items>()
                }

                #[test]
                fn round_trip() {
                    super::round_trip::<L, $items, Items>()
                }

                #[test]
                fn find_idempotence() {
                    super::find_idempotence::<L, $items, Items>()
                }

                #[test]
                fn traversal() {
                    super::traversal::<L, $items, Items>()
                }

                #[test]
                fn destroy() {
                    super::destroy::<L, $items, Items>()
                }

                #[test]
                fn clear() {
                    super::clear::<L, $items, Items>()
                }

                #[test]
                fn misuse() {
                    super::misuse::<L, $items, Items>()
                }

                #[test]
                fn cloned_links() {
                    super::cloned_links::<L, $items, Items>()
                }

                #[test]
                fn recast_after_compaction() {
                    super::recast_after_compaction::<L, $items, Items>()
                }

                #[test]
                fn random_heights() {
                    super::random_heights::<L, $items, Items>()
                }
            }
        )*
    };
}

conformance!(
    rb: RbTree, RbLink<P0>, RbItems, RbLines;
    splay: SplayTree, SplayLink<P0>, SplayItems, SplayLines;
    // the color of `RbLink` is ignored by splay trees
    splay_with_rb_link: SplayTree, RbLink<P0>, RbItems, RbLines;
);
