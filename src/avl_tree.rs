use std::cell::RefCell;
use std::fmt::{self, Display};
use std::marker::PhantomData;

use crate::bst::{BinarySearchTree, Iter, Search};
use crate::config::{CheckedConfig, ConfigT, DebugConfig, DefaultConfig};
use crate::invariants::{self, InvariantViolation};
use crate::node::Side;
use crate::rebalance::{self, InsertCase, RemoveCase};

/// Ordered map kept height-balanced: the two subtrees of every node differ in
/// height by at most one, and each node stores that difference (right minus
/// left) as its balance.
///
/// Not thread-safe. Callers sharing a tree across threads must lock it
/// themselves.
pub struct AvlTree<K, V, Config: ConfigT = DefaultConfig> {
    tree: BinarySearchTree<K, V>,
    debug_writer: Option<RefCell<Box<dyn fmt::Write>>>,
    _config: PhantomData<Config>,
}

pub type CheckedAvlTree<K, V> = AvlTree<K, V, CheckedConfig>;
pub type DebugAvlTree<K, V> = AvlTree<K, V, DebugConfig>;

impl<K, V, Config: ConfigT> AvlTree<K, V, Config> {
    pub fn new() -> Self {
        Self::new_with_debug_writer::<String>(None)
    }

    /// Trace lines go to `debug_writer` when `Config::DEBUG` is set, or to
    /// stderr if it is `None`.
    pub fn new_with_debug_writer<Writer: fmt::Write + 'static>(
        debug_writer: Option<Writer>,
    ) -> Self {
        AvlTree {
            tree: BinarySearchTree::new(),
            debug_writer: debug_writer
                .map(|w| RefCell::new(Box::new(w) as Box<dyn fmt::Write>)),
            _config: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.tree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Number of levels: 0 when empty, 1 for a lone root.
    pub fn height(&self) -> usize {
        self.tree.height()
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        self.tree.iter()
    }

    pub fn keys(&self) -> impl DoubleEndedIterator<Item = &K> + ExactSizeIterator + '_ {
        self.tree.iter().map(|(k, _)| k)
    }

    pub fn values(&self) -> impl DoubleEndedIterator<Item = &V> + ExactSizeIterator + '_ {
        self.tree.iter().map(|(_, v)| v)
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.tree.first_key_value()
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.tree.last_key_value()
    }

    pub fn render(&self) -> String
    where
        K: Display,
        V: Display,
    {
        self.tree.render()
    }

    fn rotate_right(&mut self, g: usize) {
        debug!(self.debug_writer, "rotate_right at slot {}", g);
        let tree = &mut self.tree;
        let p = tree
            .child(g, Side::Left)
            .expect("rotate_right on node without left child");
        let parent = tree.parent(g);
        tree.replace_child(parent, g, Some(p));
        let inner = tree.child(p, Side::Right);
        tree.set_left(g, inner);
        if let Some(inner) = inner {
            tree.set_parent(inner, Some(g));
        }
        tree.set_right(p, Some(g));
        tree.set_parent(g, Some(p));
    }

    fn rotate_left(&mut self, p: usize) {
        debug!(self.debug_writer, "rotate_left at slot {}", p);
        let tree = &mut self.tree;
        let n = tree
            .child(p, Side::Right)
            .expect("rotate_left on node without right child");
        let parent = tree.parent(p);
        tree.replace_child(parent, p, Some(n));
        let inner = tree.child(n, Side::Left);
        tree.set_right(p, inner);
        if let Some(inner) = inner {
            tree.set_parent(inner, Some(p));
        }
        tree.set_left(n, Some(p));
        tree.set_parent(p, Some(n));
    }

    /// Rotates the child on `side` of `idx` up into `idx`'s place.
    fn lift(&mut self, side: Side, idx: usize) {
        match side {
            Side::Left => self.rotate_right(idx),
            Side::Right => self.rotate_left(idx),
        }
    }

    // `n` just grew by one level as `p`'s child, and `p` has already been
    // charged for it.
    fn insert_fix(&mut self, mut p: usize, mut n: usize) {
        while let Some(g) = self.tree.parent(p) {
            let heavy = self.tree.side_of(g, p);
            let g_balance = self.tree.balance(g) + heavy.sign();
            self.tree.set_balance(g, g_balance);
            let case = InsertCase::classify(g_balance, heavy, self.tree.side_of(p, n));
            debug!(self.debug_writer, "insert_fix: {:?} at slot {}", case, g);
            match case {
                InsertCase::Absorbed => return,
                InsertCase::Grew => {
                    n = p;
                    p = g;
                }
                InsertCase::Straight(heavy) => {
                    self.lift(heavy, g);
                    self.tree.set_balance(p, 0);
                    self.tree.set_balance(g, 0);
                    return;
                }
                InsertCase::Zigzag(heavy) => {
                    let inner = self.tree.balance(n);
                    self.lift(heavy.opposite(), p);
                    self.lift(heavy, g);
                    let (p_balance, g_balance) = rebalance::zigzag_insert_balances(heavy, inner);
                    self.tree.set_balance(p, p_balance);
                    self.tree.set_balance(g, g_balance);
                    self.tree.set_balance(n, 0);
                    return;
                }
            }
        }
    }

    // `at` is the node whose subtree on the given side just lost a level, or
    // `None` once the walk has passed the root.
    fn remove_fix(&mut self, mut at: Option<(usize, Side)>) {
        while let Some((n, shrunk)) = at {
            let next = self.tree.parent(n).map(|p| (p, self.tree.side_of(p, n)));
            let heavy = shrunk.opposite();
            let tilt = self.tree.balance(n) + heavy.sign();
            let case = RemoveCase::classify(tilt, heavy, || {
                let c = self
                    .tree
                    .child(n, heavy)
                    .expect("heavy side of an imbalanced node is empty");
                self.tree.balance(c)
            });
            debug!(self.debug_writer, "remove_fix: {:?} at slot {}", case, n);
            match case {
                RemoveCase::Tilted(_) => self.tree.set_balance(n, tilt),
                RemoveCase::Shrunk => self.tree.set_balance(n, 0),
                RemoveCase::Straight(heavy) => {
                    let c = self.heavy_child(n, heavy);
                    self.lift(heavy, n);
                    self.tree.set_balance(n, 0);
                    self.tree.set_balance(c, 0);
                }
                RemoveCase::Flat(heavy) => {
                    let c = self.heavy_child(n, heavy);
                    self.lift(heavy, n);
                    self.tree.set_balance(n, heavy.sign());
                    self.tree.set_balance(c, -heavy.sign());
                }
                RemoveCase::Zigzag(heavy) => {
                    let c = self.heavy_child(n, heavy);
                    let g = self
                        .tree
                        .child(c, heavy.opposite())
                        .expect("inward-leaning child has no inner child");
                    let inner = self.tree.balance(g);
                    self.lift(heavy.opposite(), c);
                    self.lift(heavy, n);
                    let (n_balance, c_balance) = rebalance::zigzag_remove_balances(heavy, inner);
                    self.tree.set_balance(n, n_balance);
                    self.tree.set_balance(c, c_balance);
                    self.tree.set_balance(g, 0);
                }
            }
            at = if case.continues() { next } else { None };
        }
    }

    fn heavy_child(&self, n: usize, heavy: Side) -> usize {
        self.tree
            .child(n, heavy)
            .expect("heavy side of an imbalanced node is empty")
    }
}

impl<K: Ord, V, Config: ConfigT> AvlTree<K, V, Config> {
    /// Inserts `key`, or overwrites its value in place when already present.
    /// Returns the previous value in the latter case.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        let at = match self.tree.search(&key) {
            Search::Found(idx) => {
                debug!(self.debug_writer, "insert: updated value at slot {}", idx);
                return Some(std::mem::replace(self.tree.value_mut(idx), value));
            }
            Search::Vacant(at) => at,
        };
        let n = self.tree.attach(key, value, at);
        match at {
            None => {
                debug!(self.debug_writer, "insert: new root at slot {}", n);
            }
            Some((p, side)) => {
                debug!(
                    self.debug_writer,
                    "insert: slot {} attached {:?} of slot {}", n, side, p
                );
                if self.tree.balance(p) != 0 {
                    // `p` had a single child on the other side; it is level now
                    // and no taller than before.
                    self.tree.set_balance(p, 0);
                } else {
                    self.tree.set_balance(p, side.sign());
                    self.insert_fix(p, n);
                }
            }
        }
        self.verify("insert");
        None
    }

    /// Removes `key` and returns its value; a no-op when absent.
    pub fn remove(&mut self, key: &K) -> Option<V> {
        let mut n = self.tree.find(key)?;
        if self.tree.node(n).has_two_children() {
            let x = self
                .tree
                .predecessor(n)
                .expect("node with a left subtree has a predecessor");
            debug!(
                self.debug_writer,
                "remove: slot {} swapped with predecessor slot {}", n, x
            );
            self.tree.node_swap(n, x);
            n = x;
        }

        let parent = self.tree.parent(n);
        let shrunk = parent.map(|p| (p, self.tree.side_of(p, n)));
        let child = self
            .tree
            .child(n, Side::Left)
            .or(self.tree.child(n, Side::Right));
        self.tree.replace_child(parent, n, child);
        let removed = self.tree.release(n);
        debug!(self.debug_writer, "remove: slot {} detached", n);

        self.remove_fix(shrunk);
        self.verify("remove");
        Some(removed.value)
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.tree.get(key)
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.tree.get_mut(key)
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.tree.contains_key(key)
    }

    /// Verifies links, key order, the node count, the height bound at every
    /// node and every stored balance. Returns the height.
    pub fn check(&self) -> Result<usize, InvariantViolation> {
        invariants::verify(&self.tree, true)
    }

    fn verify(&self, op: &str) {
        if Config::CHECK_INVARIANTS {
            if let Err(violation) = self.check() {
                panic!("invariant violated after {op}: {violation}");
            }
        }
    }
}

impl<K, V, Config: ConfigT> Default for AvlTree<K, V, Config> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug, Config: ConfigT> fmt::Debug for AvlTree<K, V, Config> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<K: Ord, V, Config: ConfigT> Extend<(K, V)> for AvlTree<K, V, Config> {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (k, v) in iter {
            self.insert(k, v);
        }
    }
}

impl<K: Ord, V, Config: ConfigT> FromIterator<(K, V)> for AvlTree<K, V, Config> {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut tree = Self::new();
        tree.extend(iter);
        tree
    }
}

impl<'a, K, V, Config: ConfigT> IntoIterator for &'a AvlTree<K, V, Config> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}
