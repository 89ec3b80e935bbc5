//! insures that the crate is `no_std` and also has some `cargo-show-asm`
//! targets to check
//!
//! `cargo asm --target=riscv32i-unknown-none-elf -p no_std_test`

#![no_std]
#![allow(clippy::all)]

use core::cmp::Ordering;

use intrusive_tree::{
    ptr_struct, tree_adapter, utils::next, Arena, OrderedTree, RbLink, RbTree, SplayLink,
    SplayTree, TreeError,
};

ptr_struct!(P0());
ptr_struct!(P1);

pub struct Node<L> {
    pub key: u64,
    pub link: L,
}

fn cmp_node<L>(lhs: &Node<L>, rhs: &Node<L>) -> Ordering {
    lhs.key.cmp(&rhs.key)
}

tree_adapter! {
    pub struct RbNoGen for Node<RbLink<P0>> {
        link: link as RbLink<P0>,
        cmp: cmp_node,
    }
}

tree_adapter! {
    pub struct RbGen for Node<RbLink<P1>> {
        link: link as RbLink<P1>,
        cmp: cmp_node,
    }
}

tree_adapter! {
    pub struct SplayGen for Node<SplayLink<P1>> {
        link: link as SplayLink<P1>,
        cmp: cmp_node,
    }
}

pub fn asm_arena_get(a: &Arena<P0, u64>, inx: P0) -> u64 {
    *a.get(inx).unwrap()
}

pub fn asm_arena_get_gen(a: &Arena<P1, u64>, inx: P1) -> u64 {
    *a.get(inx).unwrap()
}

pub fn asm_rb_find(t: &RbTree<RbNoGen>, a: &Arena<P0, Node<RbLink<P0>>>, key: u64) -> Option<P0> {
    t.find_by(a, |node| key.cmp(&node.key))
}

pub fn asm_rb_find_gen(
    t: &RbTree<RbGen>,
    a: &Arena<P1, Node<RbLink<P1>>>,
    key: u64,
) -> Option<P1> {
    t.find_by(a, |node| key.cmp(&node.key))
}

pub fn asm_rb_insert(
    t: &mut RbTree<RbGen>,
    a: &mut Arena<P1, Node<RbLink<P1>>>,
    p: P1,
) -> Result<Option<P1>, TreeError> {
    t.insert(a, p)
}

pub fn asm_rb_remove(
    t: &mut RbTree<RbGen>,
    a: &mut Arena<P1, Node<RbLink<P1>>>,
    p: P1,
) -> Result<P1, TreeError> {
    t.remove(a, p)
}

// make sure this especially is minimal
pub fn asm_rb_next(a: &Arena<P0, Node<RbLink<P0>>>, p: P0) -> Option<P0> {
    next::<RbNoGen>(a, p)
}

pub fn asm_splay_find(
    t: &mut SplayTree<SplayGen>,
    a: &mut Arena<P1, Node<SplayLink<P1>>>,
    key: u64,
) -> Option<P1> {
    t.find_by(a, |node| key.cmp(&node.key))
}
