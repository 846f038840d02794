/// Which child link of a node. Balance is measured right minus left, so
/// `Left` contributes `-1` and `Right` contributes `+1`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    pub fn sign(self) -> i8 {
        match self {
            Side::Left => -1,
            Side::Right => 1,
        }
    }

    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

pub struct Node<K, V> {
    pub(crate) key: K,
    pub(crate) value: V,
    pub(crate) balance: i8,
    pub(crate) parent: Option<usize>,
    pub(crate) left: Option<usize>,
    pub(crate) right: Option<usize>,
}

impl<K, V> Node<K, V> {
    pub fn new(key: K, value: V, parent: Option<usize>) -> Self {
        Node {
            key,
            value,
            balance: 0,
            parent,
            left: None,
            right: None,
        }
    }

    pub fn key(&self) -> &K {
        &self.key
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn balance(&self) -> i8 {
        self.balance
    }

    pub fn parent(&self) -> Option<usize> {
        self.parent
    }

    pub fn child(&self, side: Side) -> Option<usize> {
        match side {
            Side::Left => self.left,
            Side::Right => self.right,
        }
    }

    pub fn child_mut(&mut self, side: Side) -> &mut Option<usize> {
        match side {
            Side::Left => &mut self.left,
            Side::Right => &mut self.right,
        }
    }

    pub fn has_two_children(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }
}
