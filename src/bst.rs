use std::cmp::{max, Ordering};
use std::fmt::{self, Display, Write};

use crate::invariants::{self, InvariantViolation};
use crate::node::{Node, Side};
use crate::pool::NodePool;

/// Result of an ordered descent from the root.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Search {
    Found(usize),
    /// The key is absent. A node for it belongs on the given side of the given
    /// parent, or at the root when the tree is empty.
    Vacant(Option<(usize, Side)>),
}

/// Plain ordered map over an arena of nodes. Never rebalances; `AvlTree`
/// uses it as storage and layers the balancing on top.
pub struct BinarySearchTree<K, V> {
    pool: NodePool<K, V>,
    root: Option<usize>,
}

impl<K, V> BinarySearchTree<K, V> {
    pub fn new() -> Self {
        BinarySearchTree {
            pool: NodePool::new(),
            root: None,
        }
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub fn clear(&mut self) {
        self.pool.clear();
        self.root = None;
    }

    /// Number of levels: 0 when empty, 1 for a lone root.
    pub fn height(&self) -> usize {
        self.height_of(self.root)
    }

    pub fn iter(&self) -> Iter<'_, K, V> {
        Iter {
            tree: self,
            front: self.root.map(|r| self.extreme(r, Side::Left)),
            back: self.root.map(|r| self.extreme(r, Side::Right)),
            remaining: self.len(),
        }
    }

    pub fn first_key_value(&self) -> Option<(&K, &V)> {
        self.root.map(|r| self.entry(self.extreme(r, Side::Left)))
    }

    pub fn last_key_value(&self) -> Option<(&K, &V)> {
        self.root.map(|r| self.entry(self.extreme(r, Side::Right)))
    }

    /// One line per node in key order, indented two spaces per level below
    /// the root: `key: value [balance]`.
    pub fn render(&self) -> String
    where
        K: Display,
        V: Display,
    {
        fn traverse<K: Display, V: Display>(
            tree: &BinarySearchTree<K, V>,
            idx: Option<usize>,
            level: usize,
            out: &mut String,
        ) {
            if let Some(i) = idx {
                let node = tree.node(i);
                traverse(tree, node.child(Side::Left), level + 1, out);
                writeln!(
                    out,
                    "{}{}: {} [{}]",
                    "  ".repeat(level),
                    node.key(),
                    node.value(),
                    node.balance()
                )
                .expect("writing to String cannot fail");
                traverse(tree, node.child(Side::Right), level + 1, out);
            }
        }
        let mut out = String::new();
        traverse(self, self.root, 0, &mut out);
        out
    }

    pub(crate) fn root(&self) -> Option<usize> {
        self.root
    }

    pub(crate) fn node(&self, idx: usize) -> &Node<K, V> {
        &self.pool[idx]
    }

    pub(crate) fn entry(&self, idx: usize) -> (&K, &V) {
        let node = &self.pool[idx];
        (node.key(), node.value())
    }

    pub(crate) fn value_mut(&mut self, idx: usize) -> &mut V {
        &mut self.pool[idx].value
    }

    pub(crate) fn parent(&self, idx: usize) -> Option<usize> {
        self.pool[idx].parent()
    }

    pub(crate) fn child(&self, idx: usize, side: Side) -> Option<usize> {
        self.pool[idx].child(side)
    }

    pub(crate) fn balance(&self, idx: usize) -> i8 {
        self.pool[idx].balance()
    }

    pub(crate) fn set_balance(&mut self, idx: usize, balance: i8) {
        self.pool[idx].balance = balance;
    }

    /// Downward link only; the child's parent link is left alone.
    pub(crate) fn set_left(&mut self, idx: usize, child: Option<usize>) {
        self.pool[idx].left = child;
    }

    /// Downward link only; the child's parent link is left alone.
    pub(crate) fn set_right(&mut self, idx: usize, child: Option<usize>) {
        self.pool[idx].right = child;
    }

    pub(crate) fn set_child(&mut self, idx: usize, side: Side, child: Option<usize>) {
        *self.pool[idx].child_mut(side) = child;
    }

    pub(crate) fn set_parent(&mut self, idx: usize, parent: Option<usize>) {
        self.pool[idx].parent = parent;
    }

    /// Which child of `parent` the node `child` is.
    pub(crate) fn side_of(&self, parent: usize, child: usize) -> Side {
        if self.pool[parent].left == Some(child) {
            Side::Left
        } else {
            debug_assert_eq!(self.pool[parent].right, Some(child), "not a child");
            Side::Right
        }
    }

    /// Puts `new` where `old` hangs under `parent` (or at the root when
    /// `parent` is `None`) and points `new` back at `parent`.
    pub(crate) fn replace_child(&mut self, parent: Option<usize>, old: usize, new: Option<usize>) {
        match parent {
            None => self.root = new,
            Some(p) => {
                let side = self.side_of(p, old);
                self.set_child(p, side, new);
            }
        }
        if let Some(n) = new {
            self.set_parent(n, parent);
        }
    }

    /// Allocates a leaf for `key` at a position returned by `search`.
    pub(crate) fn attach(&mut self, key: K, value: V, at: Option<(usize, Side)>) -> usize {
        let idx = self
            .pool
            .alloc(Node::new(key, value, at.map(|(parent, _)| parent)));
        match at {
            None => self.root = Some(idx),
            Some((parent, side)) => self.set_child(parent, side, Some(idx)),
        }
        idx
    }

    /// Frees a node that has already been unlinked from the tree.
    pub(crate) fn release(&mut self, idx: usize) -> Node<K, V> {
        self.pool.free(idx)
    }

    /// Exchanges the key/value payloads of two nodes. Both nodes keep their
    /// position, links and balance.
    pub(crate) fn node_swap(&mut self, a: usize, b: usize) {
        let (x, y) = self.pool.pair_mut(a, b);
        std::mem::swap(&mut x.key, &mut y.key);
        std::mem::swap(&mut x.value, &mut y.value);
    }

    /// Leftmost (`Side::Left`) or rightmost node of the subtree at `idx`.
    pub(crate) fn extreme(&self, mut idx: usize, side: Side) -> usize {
        while let Some(next) = self.child(idx, side) {
            idx = next;
        }
        idx
    }

    pub(crate) fn predecessor(&self, idx: usize) -> Option<usize> {
        self.neighbour(idx, Side::Left)
    }

    pub(crate) fn successor(&self, idx: usize) -> Option<usize> {
        self.neighbour(idx, Side::Right)
    }

    // In-order neighbour towards `side`: the nearest node of the subtree on
    // that side if there is one, else the first ancestor reached from its
    // opposite side.
    fn neighbour(&self, idx: usize, side: Side) -> Option<usize> {
        if let Some(c) = self.child(idx, side) {
            return Some(self.extreme(c, side.opposite()));
        }
        let mut cur = idx;
        while let Some(p) = self.parent(cur) {
            if self.child(p, side.opposite()) == Some(cur) {
                return Some(p);
            }
            cur = p;
        }
        None
    }

    pub(crate) fn height_of(&self, idx: Option<usize>) -> usize {
        idx.map_or(0, |i| {
            let node = &self.pool[i];
            max(
                self.height_of(node.child(Side::Left)),
                self.height_of(node.child(Side::Right)),
            ) + 1
        })
    }
}

impl<K: Ord, V> BinarySearchTree<K, V> {
    pub(crate) fn search(&self, key: &K) -> Search {
        let Some(mut cur) = self.root else {
            return Search::Vacant(None);
        };
        loop {
            let node = &self.pool[cur];
            let side = match key.cmp(node.key()) {
                Ordering::Less => Side::Left,
                Ordering::Greater => Side::Right,
                Ordering::Equal => return Search::Found(cur),
            };
            match node.child(side) {
                Some(next) => cur = next,
                None => return Search::Vacant(Some((cur, side))),
            }
        }
    }

    pub(crate) fn find(&self, key: &K) -> Option<usize> {
        match self.search(key) {
            Search::Found(idx) => Some(idx),
            Search::Vacant(_) => None,
        }
    }

    /// Ordered insert without rebalancing. Returns the previous value when
    /// `key` was already present.
    pub fn insert(&mut self, key: K, value: V) -> Option<V> {
        match self.search(&key) {
            Search::Found(idx) => Some(std::mem::replace(self.value_mut(idx), value)),
            Search::Vacant(at) => {
                self.attach(key, value, at);
                None
            }
        }
    }

    pub fn get(&self, key: &K) -> Option<&V> {
        self.find(key).map(|idx| self.node(idx).value())
    }

    pub fn get_mut(&mut self, key: &K) -> Option<&mut V> {
        self.find(key).map(|idx| self.value_mut(idx))
    }

    pub fn contains_key(&self, key: &K) -> bool {
        self.find(key).is_some()
    }

    /// Verifies parent links, key order and the node count. Returns the height.
    pub fn check_structure(&self) -> Result<usize, InvariantViolation> {
        invariants::verify(self, false)
    }
}

impl<K, V> Default for BinarySearchTree<K, V> {
    fn default() -> Self {
        BinarySearchTree::new()
    }
}

impl<K: fmt::Debug, V: fmt::Debug> fmt::Debug for BinarySearchTree<K, V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V> IntoIterator for &'a BinarySearchTree<K, V> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V>;

    fn into_iter(self) -> Iter<'a, K, V> {
        self.iter()
    }
}

/// In-order iterator. Walks forwards with `successor` and backwards with
/// `predecessor`, so both directions must agree on the order.
pub struct Iter<'a, K, V> {
    tree: &'a BinarySearchTree<K, V>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, K, V> Iterator for Iter<'a, K, V> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.front?;
        self.remaining -= 1;
        self.front = self.tree.successor(idx);
        Some(self.tree.entry(idx))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V> DoubleEndedIterator for Iter<'a, K, V> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let idx = self.back?;
        self.remaining -= 1;
        self.back = self.tree.predecessor(idx);
        Some(self.tree.entry(idx))
    }
}

impl<'a, K, V> ExactSizeIterator for Iter<'a, K, V> {}
