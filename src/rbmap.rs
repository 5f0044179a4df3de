//! Module provide ordered-map implemented by [RbMap] type.
//!
//! RbMap is implemented using a [red-black][wiki-rb] tree with parent
//! links, ordered by a caller supplied `less(a, b)` predicate.
//!
//! Full table scan:
//! ```
//! use rbmap::RbMap;
//!
//! let mut index: RbMap<String, String> = RbMap::new();
//! index.insert("key1".to_string(), "value1".to_string());
//! index.insert("key2".to_string(), "value2".to_string());
//!
//! for (i, (key, value)) in index.iter().enumerate() {
//!     let refkey = format!("key{}", i+1);
//!     let refval = format!("value{}", i+1);
//!     assert_eq!(&refkey, key);
//!     assert_eq!(&refval, value);
//! }
//! ```
//!
//! Reverse scan:
//! ```
//! use rbmap::RbMap;
//!
//! let index: RbMap<u32, u32> = (0..10).map(|i| (i, i * i)).collect();
//! let keys: Vec<u32> = index.iter().rev().map(|(k, _)| *k).collect();
//! assert_eq!(keys, (0..10).rev().collect::<Vec<u32>>());
//! ```
//!
//! Draining through node handles:
//! ```
//! use rbmap::RbMap;
//!
//! let mut index: RbMap<u32, u32> = (0..10).map(|i| (i, i)).collect();
//! while let Some(node) = index.last() {
//!     let (key, _) = index.delete_node(node);
//!     assert_eq!(key as usize, index.len());
//! }
//! assert!(index.is_empty());
//! ```
//!
//! [wiki-rb]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree

use std::{fmt, iter::FromIterator};

use crate::{
    node::NodeId,
    tree::{Side, Tree},
    Error, Result,
};

/// Ordering predicate used by [RbMap::new], `a < b` under [Ord].
pub type NaturalLess<K> = fn(&K, &K) -> bool;

fn natural_less<K: Ord>(a: &K, b: &K) -> bool {
    a < b
}

/// RbMap manage a single instance of in-memory ordered-map using
/// [red-black][rb] tree.
///
/// Keys are ordered by `less`, which must be a strict weak order. Two keys
/// for which neither `less(a, b)` nor `less(b, a)` holds are the same key.
///
/// [rb]: https://en.wikipedia.org/wiki/Red%E2%80%93black_tree
pub struct RbMap<K, V, F = NaturalLess<K>> {
    tree: Tree<K, V>,
    less: F,
    n_count: usize, // number of entries in the tree.
}

impl<K, V> RbMap<K, V>
where
    K: Ord,
{
    /// Create an empty instance of RbMap, ordered by [Ord].
    pub fn new() -> RbMap<K, V> {
        RbMap::with_less(natural_less::<K> as NaturalLess<K>)
    }
}

impl<K, V, F> RbMap<K, V, F>
where
    F: Fn(&K, &K) -> bool,
{
    /// Create an empty instance of RbMap, ordered by `less`. The
    /// predicate stays with the instance for its whole life.
    pub fn with_less(less: F) -> RbMap<K, V, F> {
        RbMap {
            tree: Tree::new(),
            less,
            n_count: Default::default(),
        }
    }
}

/// Maintenance API.
impl<K, V, F> RbMap<K, V, F> {
    /// Return number of entries in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        self.n_count
    }

    /// Check whether this index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.n_count == 0
    }

    /// Remove all entries. Every outstanding node handle goes stale.
    pub fn clear(&mut self) {
        self.tree.clear();
        self.n_count = 0;
    }

    #[allow(dead_code)]
    #[cfg(test)]
    pub(crate) fn pretty_print(&self)
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        self.tree.pretty_print()
    }

    #[cfg(test)]
    pub(crate) fn as_tree(&self) -> &Tree<K, V> {
        &self.tree
    }
}

impl<K, V, F> RbMap<K, V, F>
where
    F: Fn(&K, &K) -> bool,
{
    /// Find the node holding `key`.
    pub fn find_node(&self, key: &K) -> Option<NodeId> {
        let mut node = self.tree.root();
        while let Some(id) = node {
            let nref = self.tree.node(id);
            node = if (self.less)(&nref.key, key) {
                nref.right
            } else if (self.less)(key, &nref.key) {
                nref.left
            } else {
                return Some(id);
            };
        }
        None
    }

    /// Get the value for key.
    pub fn find(&self, key: &K) -> Option<&V> {
        let id = self.find_node(key)?;
        Some(&self.tree.node(id).value)
    }

    /// Get the value for key, for in-place update.
    pub fn find_mut(&mut self, key: &K) -> Option<&mut V> {
        let id = self.find_node(key)?;
        Some(&mut self.tree.node_mut(id).value)
    }

    /// Insert `key` with `value`. Return true if a new entry is created,
    /// otherwise the existing entry keeps its key, takes the new value,
    /// and the tree shape is left untouched.
    pub fn insert(&mut self, key: K, value: V) -> bool {
        let mut node = self.tree.root();
        let (mut parent, mut side) = (None, Side::Left);

        while let Some(id) = node {
            parent = Some(id);
            let nref = self.tree.node(id);
            if (self.less)(&nref.key, &key) {
                side = Side::Right;
                node = nref.right;
            } else if (self.less)(&key, &nref.key) {
                side = Side::Left;
                node = nref.left;
            } else {
                self.tree.node_mut(id).value = value;
                return false;
            }
        }

        self.tree.attach(parent, side, key, value);
        self.n_count += 1;
        true
    }

    /// Delete key from this instance. Return false if key is not present,
    /// which is not an error.
    pub fn delete(&mut self, key: &K) -> bool {
        match self.find_node(key) {
            Some(id) => {
                self.delete_node(id);
                true
            }
            None => false,
        }
    }

    /// Validate the red-black tree with following rules:
    ///
    /// * Root is black.
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * Number of blacks is the same on every path from a node down to
    ///   an absent child.
    /// * Keys are in sorted order under `less`, and parent links agree
    ///   with child links.
    /// * Every live node is reachable and [RbMap::len] counts them.
    ///
    /// Meant for tests and debugging, no other operation depends on it.
    pub fn validate(&self) -> Result<()>
    where
        K: fmt::Debug,
    {
        let n_nodes = self.tree.validate(&self.less)?;
        if n_nodes != self.n_count {
            return err_at!(Fatal, msg: "n_count {} reachable {}", self.n_count, n_nodes);
        }
        Ok(())
    }
}

/// Node handle API.
impl<K, V, F> RbMap<K, V, F> {
    /// Node with the smallest key.
    pub fn first(&self) -> Option<NodeId> {
        Some(self.tree.min(self.tree.root()?))
    }

    /// Node with the largest key.
    pub fn last(&self) -> Option<NodeId> {
        Some(self.tree.max(self.tree.root()?))
    }

    /// Node with the next larger key, in ascending order.
    pub fn next(&self, node: NodeId) -> Option<NodeId> {
        self.tree.next(node)
    }

    /// Node with the next smaller key, in descending order.
    pub fn prev(&self, node: NodeId) -> Option<NodeId> {
        self.tree.prev(node)
    }

    pub fn key(&self, node: NodeId) -> &K {
        &self.tree.node(node).key
    }

    pub fn value(&self, node: NodeId) -> &V {
        &self.tree.node(node).value
    }

    /// Value can be overwritten in-place, it plays no part in ordering.
    pub fn value_mut(&mut self, node: NodeId) -> &mut V {
        &mut self.tree.node_mut(node).value
    }

    pub fn entry(&self, node: NodeId) -> (&K, &V) {
        let nref = self.tree.node(node);
        (&nref.key, &nref.value)
    }

    /// Delete the entry at `node` and return it.
    ///
    /// If `node` has two children, the entry of its in-order predecessor
    /// is moved into `node` and the predecessor's handle becomes stale,
    /// while `node` stays valid. Otherwise `node` itself becomes stale.
    pub fn delete_node(&mut self, node: NodeId) -> (K, V) {
        let entry = self.tree.remove(node);
        self.n_count -= 1;
        entry
    }

    /// Return an iterator over all entries in this instance, in ascending
    /// order of keys.
    pub fn iter(&self) -> Iter<K, V, F> {
        Iter {
            index: self,
            front: self.first(),
            back: self.last(),
            remaining: self.n_count,
        }
    }
}

impl<K, V> Default for RbMap<K, V>
where
    K: Ord,
{
    fn default() -> RbMap<K, V> {
        RbMap::new()
    }
}

impl<K, V, F> Extend<(K, V)> for RbMap<K, V, F>
where
    F: Fn(&K, &K) -> bool,
{
    fn extend<I>(&mut self, iter: I)
    where
        I: IntoIterator<Item = (K, V)>,
    {
        iter.into_iter().for_each(|(key, value)| {
            self.insert(key, value);
        });
    }
}

impl<K, V> FromIterator<(K, V)> for RbMap<K, V>
where
    K: Ord,
{
    fn from_iter<I>(iter: I) -> RbMap<K, V>
    where
        I: IntoIterator<Item = (K, V)>,
    {
        let mut index = RbMap::new();
        index.extend(iter);
        index
    }
}

impl<K, V, F> fmt::Debug for RbMap<K, V, F>
where
    K: fmt::Debug,
    V: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_map().entries(self.iter()).finish()
    }
}

impl<'a, K, V, F> IntoIterator for &'a RbMap<K, V, F> {
    type Item = (&'a K, &'a V);
    type IntoIter = Iter<'a, K, V, F>;

    fn into_iter(self) -> Iter<'a, K, V, F> {
        self.iter()
    }
}

/// Iterator over entries of [RbMap], walking node handles with
/// [RbMap::next] from the front and [RbMap::prev] from the back.
pub struct Iter<'a, K, V, F> {
    index: &'a RbMap<K, V, F>,
    front: Option<NodeId>,
    back: Option<NodeId>,
    remaining: usize,
}

impl<'a, K, V, F> Iterator for Iter<'a, K, V, F> {
    type Item = (&'a K, &'a V);

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.front?;
        self.remaining -= 1;
        self.front = self.index.next(node);
        Some(self.index.entry(node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, K, V, F> DoubleEndedIterator for Iter<'a, K, V, F> {
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.back?;
        self.remaining -= 1;
        self.back = self.index.prev(node);
        Some(self.index.entry(node))
    }
}

impl<'a, K, V, F> ExactSizeIterator for Iter<'a, K, V, F> {}

#[cfg(test)]
#[path = "rbmap_test.rs"]
mod rbmap_test;
