use std::ops::{Index, IndexMut};

use crate::node::Node;
use crate::slot::Slot;

/// Arena of tree nodes. Freed slots are chained through `Slot::Vacant` and
/// handed out again before the backing vector grows.
pub struct NodePool<K, V> {
    slots: Vec<Slot<Node<K, V>>>,
    free_head: Option<usize>,
    live: usize,
}

impl<K, V> NodePool<K, V> {
    pub fn new() -> Self {
        NodePool {
            slots: Vec::new(),
            free_head: None,
            live: 0,
        }
    }

    pub fn alloc(&mut self, node: Node<K, V>) -> usize {
        self.live += 1;
        match self.free_head {
            Some(idx) => {
                self.free_head = self.slots[idx].next_free_exn();
                self.slots[idx] = Slot::Occupied(node);
                idx
            }
            None => {
                let idx = self.slots.len();
                self.slots.push(Slot::Occupied(node));
                idx
            }
        }
    }

    /// Vacates `idx` and hands back its node, so the key and value are dropped
    /// (or returned) right away rather than when the slot is reused.
    pub fn free(&mut self, idx: usize) -> Node<K, V> {
        let slot = std::mem::replace(&mut self.slots[idx], Slot::Vacant(self.free_head));
        self.free_head = Some(idx);
        self.live -= 1;
        slot.into_value_exn()
    }

    pub fn len(&self) -> usize {
        self.live
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.live = 0;
    }

    /// Mutable access to two distinct nodes at once.
    pub fn pair_mut(&mut self, a: usize, b: usize) -> (&mut Node<K, V>, &mut Node<K, V>) {
        assert_ne!(a, b, "pair_mut on a single slot");
        if a < b {
            let (l, r) = self.slots.split_at_mut(b);
            (l[a].value_mut_exn(), r[0].value_mut_exn())
        } else {
            let (l, r) = self.slots.split_at_mut(a);
            (r[0].value_mut_exn(), l[b].value_mut_exn())
        }
    }
}

impl<K, V> Default for NodePool<K, V> {
    fn default() -> Self {
        NodePool::new()
    }
}

impl<K, V> Index<usize> for NodePool<K, V> {
    type Output = Node<K, V>;

    fn index(&self, idx: usize) -> &Node<K, V> {
        self.slots[idx].value_exn()
    }
}

impl<K, V> IndexMut<usize> for NodePool<K, V> {
    fn index_mut(&mut self, idx: usize) -> &mut Node<K, V> {
        self.slots[idx].value_mut_exn()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_free_slots_are_reused_lifo() {
        let mut pool = NodePool::new();
        let a = pool.alloc(Node::new(1, "a", None));
        let b = pool.alloc(Node::new(2, "b", None));
        let c = pool.alloc(Node::new(3, "c", None));
        assert_eq!((a, b, c), (0, 1, 2));
        assert_eq!(pool.len(), 3);

        assert_eq!(pool.free(b).value, "b");
        assert_eq!(pool.free(a).value, "a");
        assert_eq!(pool.len(), 1);

        assert_eq!(pool.alloc(Node::new(4, "d", None)), a);
        assert_eq!(pool.alloc(Node::new(5, "e", None)), b);
        assert_eq!(pool.alloc(Node::new(6, "f", None)), 3);
        assert_eq!(pool[b].key, 5);
        assert_eq!(pool.len(), 4);
    }

    #[test]
    fn test_free_drops_payload_immediately() {
        use std::rc::Rc;

        let payload = Rc::new(());
        let mut pool = NodePool::new();
        let idx = pool.alloc(Node::new(0, Rc::clone(&payload), None));
        assert_eq!(Rc::strong_count(&payload), 2);
        drop(pool.free(idx));
        assert_eq!(Rc::strong_count(&payload), 1);
    }

    #[test]
    fn test_pair_mut_either_order() {
        let mut pool = NodePool::new();
        let a = pool.alloc(Node::new(1, 10, None));
        let b = pool.alloc(Node::new(2, 20, None));
        {
            let (x, y) = pool.pair_mut(b, a);
            std::mem::swap(&mut x.value, &mut y.value);
        }
        assert_eq!(pool[a].value, 20);
        assert_eq!(pool[b].value, 10);
    }

    #[test]
    #[should_panic(expected = "expected occupied slot")]
    fn test_index_into_vacant_slot_panics() {
        let mut pool = NodePool::new();
        let idx = pool.alloc(Node::new(1, (), None));
        pool.free(idx);
        let _ = &pool[idx];
    }
}
