#[macro_use]
pub mod config;

pub mod avl_tree;
pub mod bst;
pub mod invariants;
mod node;
mod pool;
mod rebalance;
pub mod trace_buffer;
mod slot;

pub use avl_tree::{AvlTree, CheckedAvlTree, DebugAvlTree};
pub use bst::BinarySearchTree;
pub use config::{CheckedConfig, ConfigT, DebugConfig, DefaultConfig};
pub use invariants::InvariantViolation;
