//! Case tables for the two fix-up walks. Each step of a walk is classified
//! once into one of these variants; the walk in `avl_tree` then performs the
//! matching rotation and writes the balances these helpers compute. Every case
//! carries the heavy `Side`, so mirror images share one row.

use crate::node::Side;

/// One step of the insertion walk, looking at grandparent `g` after it has
/// been charged for the growth of its child `p`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InsertCase {
    /// `g` is level again; nothing above it changed height.
    Absorbed,
    /// `g` leans one way and grew by one level; continue at `g`.
    Grew,
    /// Two levels heavy, and the growth below `p` is on the same side
    /// (zig-zig): one rotation at `g`.
    Straight(Side),
    /// Two levels heavy, growth below `p` on the inner side (zig-zag):
    /// rotate at `p`, then at `g`.
    Zigzag(Side),
}

impl InsertCase {
    /// `g_balance` is `g`'s balance after the update, `heavy` the side of `g`
    /// holding `p`, `grown` the side of `p` holding the node that grew.
    pub fn classify(g_balance: i8, heavy: Side, grown: Side) -> InsertCase {
        match g_balance {
            0 => InsertCase::Absorbed,
            -1 | 1 => InsertCase::Grew,
            b if b == 2 * heavy.sign() => {
                if grown == heavy {
                    InsertCase::Straight(heavy)
                } else {
                    InsertCase::Zigzag(heavy)
                }
            }
            b => unreachable!("insert fix-up saw balance {b} leaning {heavy:?}"),
        }
    }
}

/// Final `(p, g)` balances after the insertion double rotation, given the
/// balance the inner node `n` had before it was lifted. `n` always ends level.
pub fn zigzag_insert_balances(heavy: Side, inner: i8) -> (i8, i8) {
    match inner {
        0 => (0, 0),
        b if b == heavy.sign() => (0, -heavy.sign()),
        _ => (heavy.sign(), 0),
    }
}

/// One step of the deletion walk at node `n`, one of whose subtrees just lost
/// a level. `heavy` is the side that did not shrink.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RemoveCase {
    /// `n` was level and now leans to `heavy`; its height is unchanged. Stop.
    Tilted(Side),
    /// `n` was leaning the shrunk way and is now level, one level shorter.
    /// Continue at the parent.
    Shrunk,
    /// Two heavy, child `c` leans the same way: one rotation, subtree ends one
    /// level shorter. Continue.
    Straight(Side),
    /// Two heavy, child `c` level: one rotation, height unchanged. Stop.
    Flat(Side),
    /// Two heavy, child `c` leans inward: double rotation through `c`'s inner
    /// child, subtree ends one level shorter. Continue.
    Zigzag(Side),
}

impl RemoveCase {
    /// `tilt` is `n`'s balance plus the shift caused by the shrink. The heavy
    /// child's balance is only asked for when `n` is out of balance.
    pub fn classify(tilt: i8, heavy: Side, child_balance: impl FnOnce() -> i8) -> RemoveCase {
        match tilt {
            0 => RemoveCase::Shrunk,
            t if t == heavy.sign() => RemoveCase::Tilted(heavy),
            t if t == 2 * heavy.sign() => match child_balance() {
                0 => RemoveCase::Flat(heavy),
                c if c == heavy.sign() => RemoveCase::Straight(heavy),
                _ => RemoveCase::Zigzag(heavy),
            },
            t => unreachable!("remove fix-up saw tilt {t} leaning {heavy:?}"),
        }
    }

    /// Whether the subtree got shorter, so the walk must go on upwards.
    pub fn continues(self) -> bool {
        !matches!(self, RemoveCase::Tilted(_) | RemoveCase::Flat(_))
    }
}

/// Final `(n, c)` balances after the deletion double rotation, given the
/// balance of `c`'s inner child before it was lifted. That child ends level.
pub fn zigzag_remove_balances(heavy: Side, inner: i8) -> (i8, i8) {
    match inner {
        0 => (0, 0),
        b if b == heavy.sign() => (-heavy.sign(), 0),
        _ => (0, heavy.sign()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use Side::*;

    #[test]
    fn test_insert_classification() {
        assert_eq!(InsertCase::classify(0, Left, Left), InsertCase::Absorbed);
        assert_eq!(InsertCase::classify(-1, Left, Right), InsertCase::Grew);
        assert_eq!(InsertCase::classify(1, Right, Left), InsertCase::Grew);
        assert_eq!(InsertCase::classify(-2, Left, Left), InsertCase::Straight(Left));
        assert_eq!(InsertCase::classify(-2, Left, Right), InsertCase::Zigzag(Left));
        assert_eq!(InsertCase::classify(2, Right, Right), InsertCase::Straight(Right));
        assert_eq!(InsertCase::classify(2, Right, Left), InsertCase::Zigzag(Right));
    }

    #[test]
    #[should_panic(expected = "insert fix-up saw balance 2")]
    fn test_insert_classification_rejects_wrong_lean() {
        InsertCase::classify(2, Left, Left);
    }

    #[test]
    fn test_insert_zigzag_balances() {
        // left-right: n was -1, 0, +1
        assert_eq!(zigzag_insert_balances(Left, -1), (0, 1));
        assert_eq!(zigzag_insert_balances(Left, 0), (0, 0));
        assert_eq!(zigzag_insert_balances(Left, 1), (-1, 0));
        // right-left
        assert_eq!(zigzag_insert_balances(Right, 1), (0, -1));
        assert_eq!(zigzag_insert_balances(Right, 0), (0, 0));
        assert_eq!(zigzag_insert_balances(Right, -1), (1, 0));
    }

    #[test]
    fn test_remove_classification() {
        let unused = || -> i8 { panic!("child balance read for a balanced node") };
        assert_eq!(RemoveCase::classify(0, Left, unused), RemoveCase::Shrunk);
        assert_eq!(RemoveCase::classify(-1, Left, unused), RemoveCase::Tilted(Left));
        assert_eq!(RemoveCase::classify(1, Right, unused), RemoveCase::Tilted(Right));

        assert_eq!(RemoveCase::classify(-2, Left, || -1), RemoveCase::Straight(Left));
        assert_eq!(RemoveCase::classify(-2, Left, || 0), RemoveCase::Flat(Left));
        assert_eq!(RemoveCase::classify(-2, Left, || 1), RemoveCase::Zigzag(Left));
        assert_eq!(RemoveCase::classify(2, Right, || 1), RemoveCase::Straight(Right));
        assert_eq!(RemoveCase::classify(2, Right, || 0), RemoveCase::Flat(Right));
        assert_eq!(RemoveCase::classify(2, Right, || -1), RemoveCase::Zigzag(Right));
    }

    #[test]
    fn test_remove_continuation() {
        assert!(RemoveCase::Shrunk.continues());
        assert!(RemoveCase::Straight(Left).continues());
        assert!(RemoveCase::Zigzag(Right).continues());
        assert!(!RemoveCase::Tilted(Left).continues());
        assert!(!RemoveCase::Flat(Right).continues());
    }

    #[test]
    fn test_remove_zigzag_balances() {
        // n leaning left, c = n.left leaning right, g = c.right
        assert_eq!(zigzag_remove_balances(Left, 1), (0, -1));
        assert_eq!(zigzag_remove_balances(Left, 0), (0, 0));
        assert_eq!(zigzag_remove_balances(Left, -1), (1, 0));
        // mirror
        assert_eq!(zigzag_remove_balances(Right, -1), (0, 1));
        assert_eq!(zigzag_remove_balances(Right, 0), (0, 0));
        assert_eq!(zigzag_remove_balances(Right, 1), (-1, 0));
    }
}
