use avlbst::{AvlTree, BinarySearchTree, CheckedAvlTree, DebugAvlTree};
use itertools::Itertools;
use rand::prelude::*;
use rand_pcg::Pcg64;

fn insert_and_print(keys: &[i32]) {
    let mut tree = DebugAvlTree::new();
    for &k in keys {
        tree.insert(k, k * 10);
    }
    println!("\ninsert {}:\n{}", keys.iter().join(", "), tree.render());
}

fn remove_root_of_perfect_tree() {
    let mut tree: DebugAvlTree<i32, i32> = [4, 2, 6, 1, 3, 5, 7]
        .into_iter()
        .map(|k| (k, k * 10))
        .collect();
    tree.remove(&4);
    println!("\nremove 4:\n{}", tree.render());
}

fn plain_versus_balanced() {
    let mut plain = BinarySearchTree::new();
    let mut balanced: AvlTree<u32, ()> = AvlTree::new();
    for k in 0..1000 {
        plain.insert(k, ());
        balanced.insert(k, ());
    }
    println!(
        "\n1000 ascending keys: plain height {}, balanced height {}",
        plain.height(),
        balanced.height()
    );
}

fn random_churn() {
    let mut rng = Pcg64::seed_from_u64(5);
    let mut keys = (0..100).collect_vec();
    keys.shuffle(&mut rng);
    let mut tree = CheckedAvlTree::new();
    for &k in &keys {
        tree.insert(k, ());
    }
    let full_height = tree.height();
    keys.shuffle(&mut rng);
    for k in &keys {
        tree.remove(k);
    }
    println!(
        "\n100 random keys: height {} when full, {} left after removing all",
        full_height,
        tree.len()
    );
}

pub fn main() {
    insert_and_print(&[1, 2, 3]);
    insert_and_print(&[3, 1, 2]);
    remove_root_of_perfect_tree();
    plain_versus_balanced();
    random_churn();
}
