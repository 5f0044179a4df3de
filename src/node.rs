use std::fmt;

/// Handle to a live entry in [RbMap][crate::RbMap].
///
/// Handles are returned by `find_node`, `first`, `last`, `next` and `prev`
/// and stay valid until the node they address is deleted. Deleting an
/// entry that has two children relocates its in-order predecessor into the
/// handle's node, so a handle may observe a different {key, value} after an
/// unrelated delete; only the predecessor's handle goes stale.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) usize);

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Node corresponds to a single entry in RbMap instance.
///
/// `left` and `right` own the subtrees below, `parent` is a back-link used
/// only for navigation.
pub struct Node<K, V> {
    pub key: K,
    pub value: V,
    pub color: Color,
    pub parent: Option<NodeId>,
    pub left: Option<NodeId>,
    pub right: Option<NodeId>,
}

impl<K, V> Node<K, V> {
    /// New nodes are red and detached.
    pub fn new(key: K, value: V) -> Node<K, V> {
        Node {
            key,
            value,
            color: Color::Red,
            parent: None,
            left: None,
            right: None,
        }
    }

    #[inline]
    pub fn set_red(&mut self) {
        self.color = Color::Red
    }

    #[inline]
    pub fn set_black(&mut self) {
        self.color = Color::Black
    }

    #[inline]
    pub fn is_black(&self) -> bool {
        self.color == Color::Black
    }

    #[inline]
    pub fn is_red(&self) -> bool {
        self.color == Color::Red
    }

    #[inline]
    pub fn into_entry(self) -> (K, V) {
        (self.key, self.value)
    }
}

#[cfg(test)]
#[path = "node_test.rs"]
mod node_test;
