use std::cmp::max;

use thiserror::Error;

use crate::bst::BinarySearchTree;
use crate::node::Side;

/// A structural defect found by walking the tree. None of these can arise
/// through the public API; seeing one means the rebalancing logic is broken.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("slot {slot}: parent link is {found:?}, expected {expected:?}")]
    BrokenParentLink {
        slot: usize,
        expected: Option<usize>,
        found: Option<usize>,
    },
    #[error("slot {slot}: key is out of in-order position")]
    OutOfOrder { slot: usize },
    #[error("slot {slot}: stored balance {stored} but subtree heights differ by {actual}")]
    StaleBalance { slot: usize, stored: i8, actual: isize },
    #[error("slot {slot}: subtree heights differ by {difference}")]
    Unbalanced { slot: usize, difference: isize },
    #[error("{recorded} nodes recorded but {counted} reachable from the root")]
    LengthMismatch { recorded: usize, counted: usize },
}

struct Walk<'a, K, V> {
    tree: &'a BinarySearchTree<K, V>,
    balanced: bool,
    counted: usize,
}

impl<'a, K: Ord, V> Walk<'a, K, V> {
    // Post-order, so the deepest defect is reported first. `lower`/`upper` are
    // the exclusive key bounds inherited from the ancestors.
    fn visit(
        &mut self,
        idx: Option<usize>,
        parent: Option<usize>,
        lower: Option<&'a K>,
        upper: Option<&'a K>,
    ) -> Result<usize, InvariantViolation> {
        let Some(slot) = idx else {
            return Ok(0);
        };
        let tree = self.tree;
        let node = tree.node(slot);
        if node.parent() != parent {
            return Err(InvariantViolation::BrokenParentLink {
                slot,
                expected: parent,
                found: node.parent(),
            });
        }
        let key = node.key();
        if lower.is_some_and(|lo| key <= lo) || upper.is_some_and(|hi| key >= hi) {
            return Err(InvariantViolation::OutOfOrder { slot });
        }
        self.counted += 1;

        let lh = self.visit(node.child(Side::Left), Some(slot), lower, Some(key))?;
        let rh = self.visit(node.child(Side::Right), Some(slot), Some(key), upper)?;
        if self.balanced {
            let actual = rh as isize - lh as isize;
            if actual.abs() > 1 {
                return Err(InvariantViolation::Unbalanced {
                    slot,
                    difference: actual,
                });
            }
            if node.balance() as isize != actual {
                return Err(InvariantViolation::StaleBalance {
                    slot,
                    stored: node.balance(),
                    actual,
                });
            }
        }
        Ok(max(lh, rh) + 1)
    }
}

/// Walks the whole tree and returns its height. With `balanced` set, also
/// demands the AVL property and exact balance fields at every node.
pub(crate) fn verify<K: Ord, V>(
    tree: &BinarySearchTree<K, V>,
    balanced: bool,
) -> Result<usize, InvariantViolation> {
    let mut walk = Walk {
        tree,
        balanced,
        counted: 0,
    };
    let height = walk.visit(tree.root(), None, None, None)?;
    if walk.counted != tree.len() {
        return Err(InvariantViolation::LengthMismatch {
            recorded: tree.len(),
            counted: walk.counted,
        });
    }
    Ok(height)
}
