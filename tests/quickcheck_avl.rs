use itertools::Itertools;
use quickcheck::{Arbitrary, Gen, TestResult};
use quickcheck_macros::*;
use std::collections::BTreeMap;

use avlbst::{AvlTree, BinarySearchTree};

#[derive(Clone, Debug)]
enum MapOp {
    Insert(u8, u32),
    Remove(u8),
    Get(u8),
}

impl Arbitrary for MapOp {
    fn arbitrary(g: &mut Gen) -> Self {
        let op = usize::arbitrary(g) % 100;
        let key = u8::arbitrary(g);
        match op {
            0..55 => MapOp::Insert(key, u32::arbitrary(g)),
            55..90 => MapOp::Remove(key),
            90..100 => MapOp::Get(key),
            _ => unreachable!(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum OpRes {
    Previous(Option<u32>),
    Found(Option<u32>),
}

fn apply_avl(tree: &mut AvlTree<u8, u32>, op: &MapOp) -> OpRes {
    match op {
        MapOp::Insert(k, v) => OpRes::Previous(tree.insert(*k, *v)),
        MapOp::Remove(k) => OpRes::Previous(tree.remove(k)),
        MapOp::Get(k) => OpRes::Found(tree.get(k).copied()),
    }
}

fn apply_naive(map: &mut BTreeMap<u8, u32>, op: &MapOp) -> OpRes {
    match op {
        MapOp::Insert(k, v) => OpRes::Previous(map.insert(*k, *v)),
        MapOp::Remove(k) => OpRes::Previous(map.remove(k)),
        MapOp::Get(k) => OpRes::Found(map.get(k).copied()),
    }
}

fn height_bound(len: usize) -> usize {
    (1.44 * ((len + 2) as f64).log2()).ceil() as usize
}

#[quickcheck]
fn qc_avl_matches_btree_map(ops: Vec<MapOp>) -> TestResult {
    let mut tree = AvlTree::new();
    let mut naive = BTreeMap::new();

    for op in &ops {
        let res = apply_avl(&mut tree, op);
        let res_naive = apply_naive(&mut naive, op);
        if res != res_naive {
            println!(
                "Failed on op: {:?}\ngood: {:?}\nnaive: {:?} ({:?})",
                op, res, res_naive, naive
            );
            return TestResult::failed();
        }
        match tree.check() {
            Ok(height) if height <= height_bound(tree.len()) => (),
            Ok(height) => {
                println!("Height {} too large for {} nodes after {:?}", height, tree.len(), op);
                return TestResult::failed();
            }
            Err(violation) => {
                println!("Broken after {:?}: {}\n{:?}", op, violation, tree);
                return TestResult::failed();
            }
        }
        if !tree.iter().eq(naive.iter()) || tree.len() != naive.len() {
            println!("Contents diverged after {:?}\ngood: {:?}\nnaive: {:?}", op, tree, naive);
            return TestResult::failed();
        }
    }

    TestResult::passed()
}

#[quickcheck]
fn qc_remove_everything_empties(keys: Vec<u16>, seed: u64) -> bool {
    let mut tree: AvlTree<u16, usize> = keys.iter().copied().zip(0..).collect();
    let distinct = keys.iter().unique().count();
    assert_eq!(tree.len(), distinct);

    // Remove in an order unrelated to insertion.
    let order = keys
        .iter()
        .copied()
        .unique()
        .sorted_by_key(|k| (*k as u64).wrapping_mul(seed | 1).rotate_left(17))
        .collect_vec();
    for (removed, k) in order.iter().enumerate() {
        if tree.remove(k).is_none() || tree.check().is_err() {
            return false;
        }
        if tree.len() != distinct - removed - 1 {
            return false;
        }
    }
    tree.is_empty() && tree.height() == 0 && tree.iter().next().is_none()
}

#[quickcheck]
fn qc_reverse_iteration_matches_forward(keys: Vec<i32>) -> bool {
    let tree: AvlTree<i32, ()> = keys.into_iter().map(|k| (k, ())).collect();
    let forward = tree.keys().copied().collect_vec();
    let mut backward = tree.keys().rev().copied().collect_vec();
    backward.reverse();
    forward == backward && forward.iter().tuple_windows().all(|(a, b)| a < b)
}

#[quickcheck]
fn qc_plain_tree_matches_btree_map(pairs: Vec<(u8, u32)>) -> bool {
    let mut plain = BinarySearchTree::new();
    let mut naive = BTreeMap::new();
    for (k, v) in pairs {
        if plain.insert(k, v) != naive.insert(k, v) {
            return false;
        }
    }
    plain.check_structure().is_ok()
        && plain.iter().eq(naive.iter())
        && (0..=u8::MAX).all(|k| plain.get(&k) == naive.get(&k))
}
