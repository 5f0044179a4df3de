//! Slot storage for tree nodes.
//!
//! Nodes are addressed by [NodeId], an index into a growable vector of
//! slots. Freed slots are chained into a free-list through the vacant
//! slots themselves and handed out again by the next allocation.

use std::{
    mem,
    ops::{Index, IndexMut},
};

use crate::node::{Node, NodeId};

enum Slot<K, V> {
    Occupied(Node<K, V>),
    Vacant { next_free: Option<usize> },
}

pub struct Arena<K, V> {
    slots: Vec<Slot<K, V>>,
    free_head: Option<usize>,
    n_live: usize,
}

impl<K, V> Arena<K, V> {
    pub fn new() -> Arena<K, V> {
        Arena {
            slots: Vec::default(),
            free_head: None,
            n_live: 0,
        }
    }

    /// Number of occupied slots.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_live
    }

    /// Number of slots, occupied or vacant.
    #[cfg(test)]
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    pub fn alloc(&mut self, node: Node<K, V>) -> NodeId {
        self.n_live += 1;
        match self.free_head {
            Some(off) => {
                self.free_head = match &self.slots[off] {
                    Slot::Vacant { next_free } => *next_free,
                    Slot::Occupied(_) => panic!("alloc(): free-list points to a live slot"),
                };
                self.slots[off] = Slot::Occupied(node);
                NodeId(off)
            }
            None => {
                self.slots.push(Slot::Occupied(node));
                NodeId(self.slots.len() - 1)
            }
        }
    }

    pub fn free(&mut self, id: NodeId) -> Node<K, V> {
        let vacant = Slot::Vacant {
            next_free: self.free_head,
        };
        match mem::replace(&mut self.slots[id.0], vacant) {
            Slot::Occupied(node) => {
                self.free_head = Some(id.0);
                self.n_live -= 1;
                node
            }
            Slot::Vacant { next_free } => {
                self.slots[id.0] = Slot::Vacant { next_free };
                panic!("free(): {:?} is already vacant", id)
            }
        }
    }

    #[inline]
    pub fn get(&self, id: NodeId) -> Option<&Node<K, V>> {
        match self.slots.get(id.0) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    #[inline]
    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut Node<K, V>> {
        match self.slots.get_mut(id.0) {
            Some(Slot::Occupied(node)) => Some(node),
            _ => None,
        }
    }

    /// Exchange key and value between two live nodes, links and colors
    /// stay where they are.
    pub fn swap_entries(&mut self, a: NodeId, b: NodeId) {
        if a == b {
            return;
        }
        let (lo, hi) = if a.0 < b.0 { (a.0, b.0) } else { (b.0, a.0) };
        let (head, tail) = self.slots.split_at_mut(hi);
        match (&mut head[lo], &mut tail[0]) {
            (Slot::Occupied(x), Slot::Occupied(y)) => {
                mem::swap(&mut x.key, &mut y.key);
                mem::swap(&mut x.value, &mut y.value);
            }
            _ => panic!("swap_entries(): stale node {:?} or {:?}", a, b),
        }
    }

    pub fn clear(&mut self) {
        self.slots.clear();
        self.free_head = None;
        self.n_live = 0;
    }
}

impl<K, V> Index<NodeId> for Arena<K, V> {
    type Output = Node<K, V>;

    #[inline]
    fn index(&self, id: NodeId) -> &Node<K, V> {
        match self.get(id) {
            Some(node) => node,
            None => panic!("stale node handle {:?}", id),
        }
    }
}

impl<K, V> IndexMut<NodeId> for Arena<K, V> {
    #[inline]
    fn index_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        match self.get_mut(id) {
            Some(node) => node,
            None => panic!("stale node handle {:?}", id),
        }
    }
}

#[cfg(test)]
#[path = "arena_test.rs"]
mod arena_test;
