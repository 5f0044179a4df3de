//! Structural half of the red-black tree.
//!
//! [Tree] knows nothing about key ordering. It owns the node arena and the
//! root link, and implements everything that only rearranges links and
//! colors: min/max descent, in-order stepping through parent links,
//! rotations, transplant, and the two fixup procedures that restore the
//! red-black invariants after a node is linked in or spliced out.
//!
//! Left and right cases of every algorithm are written once, over a
//! [Side], the mirror case being the same code with `side.opposite()`.

use std::fmt;

use crate::{
    arena::Arena,
    node::{Node, NodeId},
    Error, Result,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[inline]
    pub fn opposite(self) -> Side {
        match self {
            Side::Left => Side::Right,
            Side::Right => Side::Left,
        }
    }
}

pub struct Tree<K, V> {
    arena: Arena<K, V>,
    root: Option<NodeId>,
}

impl<K, V> Tree<K, V> {
    pub fn new() -> Tree<K, V> {
        Tree {
            arena: Arena::new(),
            root: None,
        }
    }

    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Number of live nodes in the arena.
    #[cfg(test)]
    pub fn n_nodes(&self) -> usize {
        self.arena.len()
    }

    #[inline]
    pub fn node(&self, id: NodeId) -> &Node<K, V> {
        &self.arena[id]
    }

    #[inline]
    pub fn node_mut(&mut self, id: NodeId) -> &mut Node<K, V> {
        &mut self.arena[id]
    }

    pub fn clear(&mut self) {
        self.arena.clear();
        self.root = None;
    }

    #[inline]
    fn is_red(&self, id: Option<NodeId>) -> bool {
        id.map_or(false, |id| self.arena[id].is_red())
    }

    // absent children count as black.
    #[inline]
    fn is_black(&self, id: Option<NodeId>) -> bool {
        !self.is_red(id)
    }

    #[inline]
    pub fn child(&self, id: NodeId, side: Side) -> Option<NodeId> {
        let node = &self.arena[id];
        match side {
            Side::Left => node.left,
            Side::Right => node.right,
        }
    }

    #[inline]
    fn set_child(&mut self, id: NodeId, side: Side, child: Option<NodeId>) {
        let node = &mut self.arena[id];
        match side {
            Side::Left => node.left = child,
            Side::Right => node.right = child,
        }
    }

    fn expect_child(&self, id: NodeId, side: Side) -> NodeId {
        match self.child(id, side) {
            Some(child) => child,
            None => panic!("{:?} has no {:?} child, call the programmer", id, side),
        }
    }

    /// Which side of `parent` holds `id`.
    #[inline]
    fn side_of(&self, id: NodeId, parent: NodeId) -> Side {
        if self.arena[parent].left == Some(id) {
            Side::Left
        } else {
            Side::Right
        }
    }

    /// Other child of `id`'s parent, None for root or a lone child.
    pub fn sibling(&self, id: NodeId) -> Option<NodeId> {
        let parent = self.arena[id].parent?;
        self.child(parent, self.side_of(id, parent).opposite())
    }

    /// Descend from `id` towards `side` until there is no child left.
    pub fn extreme(&self, mut id: NodeId, side: Side) -> NodeId {
        while let Some(child) = self.child(id, side) {
            id = child;
        }
        id
    }

    #[inline]
    pub fn min(&self, id: NodeId) -> NodeId {
        self.extreme(id, Side::Left)
    }

    #[inline]
    pub fn max(&self, id: NodeId) -> NodeId {
        self.extreme(id, Side::Right)
    }

    /// In-order neighbour of `id` towards `side`, `Side::Right` being the
    /// next larger entry. Uses only child and parent links.
    pub fn step(&self, id: NodeId, side: Side) -> Option<NodeId> {
        if let Some(child) = self.child(id, side) {
            return Some(self.extreme(child, side.opposite()));
        }

        let mut x = id;
        let mut y = self.arena[x].parent;
        while let Some(parent) = y {
            if self.child(parent, side) != Some(x) {
                break;
            }
            x = parent;
            y = self.arena[parent].parent;
        }
        y
    }

    #[inline]
    pub fn next(&self, id: NodeId) -> Option<NodeId> {
        self.step(id, Side::Right)
    }

    #[inline]
    pub fn prev(&self, id: NodeId) -> Option<NodeId> {
        self.step(id, Side::Left)
    }
}

impl<K, V> Tree<K, V> {
    /// Replace the subtree rooted at `u` with the subtree rooted at `v`,
    /// fixing the link from `u`'s parent and `v`'s parent back-link.
    /// `u` keeps its own stale links.
    pub fn transplant(&mut self, u: NodeId, v: Option<NodeId>) {
        let parent = self.arena[u].parent;
        match parent {
            None => self.root = v,
            Some(p) => {
                let side = self.side_of(u, p);
                self.set_child(p, side, v);
            }
        }
        if let Some(v) = v {
            self.arena[v].parent = parent;
        }
    }

    //           |                      |
    //           x                      y
    //          / \     rotate(x,      / \
    //         a   y       Left)      x   c
    //            / \     ----->     / \
    //           b   c              a   b
    //
    // That is a left-rotate, `Side::Right` gives the mirror right-rotate.
    // `x` moves down towards `dir`, its child on the opposite side moves up.
    pub fn rotate(&mut self, x: NodeId, dir: Side) {
        let far = dir.opposite();
        let y = self.expect_child(x, far);

        let inner = self.child(y, dir);
        self.set_child(x, far, inner);
        if let Some(inner) = inner {
            self.arena[inner].parent = Some(x);
        }

        self.transplant(x, Some(y));
        self.set_child(y, dir, Some(x));
        self.arena[x].parent = Some(y);
    }
}

impl<K, V> Tree<K, V> {
    /// Link a new red node as the `side` child of `parent`, root when
    /// `parent` is None, and rebalance. The chosen slot must be empty.
    pub fn attach(&mut self, parent: Option<NodeId>, side: Side, key: K, value: V) -> NodeId {
        let mut node = Node::new(key, value);
        node.parent = parent;
        let id = self.arena.alloc(node);

        match parent {
            None => self.root = Some(id),
            Some(parent) => self.set_child(parent, side, Some(id)),
        }
        self.insert_fixup(id);

        id
    }

    fn insert_fixup(&mut self, mut z: NodeId) {
        loop {
            let mut p = match self.arena[z].parent {
                Some(p) if self.arena[p].is_red() => p,
                _ => break,
            };
            // a red parent is never the root once the root is black, this
            // only guards a red root.
            let g = match self.arena[p].parent {
                Some(g) => g,
                None => break,
            };
            let side = self.side_of(p, g);
            let uncle = self.sibling(p);

            if self.is_red(uncle) {
                self.arena[p].set_black();
                if let Some(uncle) = uncle {
                    self.arena[uncle].set_black();
                }
                self.arena[g].set_red();
                z = g;
                continue;
            }

            // inner grandchild, turn it into an outer one.
            if self.child(p, side.opposite()) == Some(z) {
                self.rotate(p, side);
                std::mem::swap(&mut z, &mut p);
            }
            self.arena[p].set_black();
            self.arena[g].set_red();
            self.rotate(g, side.opposite());
            break;
        }

        if let Some(root) = self.root {
            self.arena[root].set_black();
        }
    }

    /// Unlink node `z` and return its entry. When `z` has two children the
    /// entry of its in-order predecessor moves into `z` and the
    /// predecessor's node is the one released.
    pub fn remove(&mut self, mut z: NodeId) -> (K, V) {
        if let (Some(left), Some(_)) = (self.arena[z].left, self.arena[z].right) {
            let pred = self.max(left);
            self.arena.swap_entries(z, pred);
            z = pred;
        }

        let node = &self.arena[z];
        let (child, parent, black) = (node.left.or(node.right), node.parent, node.is_black());
        self.transplant(z, child);
        if black {
            self.remove_fixup(child, parent);
        }

        self.arena.free(z).into_entry()
    }

    // `x` carries an extra black. It may be absent, hence the explicit
    // `parent`.
    fn remove_fixup(&mut self, mut x: Option<NodeId>, mut parent: Option<NodeId>) {
        while x != self.root && self.is_black(x) {
            let p = match parent {
                Some(p) => p,
                None => break,
            };
            let side = if self.arena[p].left == x {
                Side::Left
            } else {
                Side::Right
            };
            let far = side.opposite();
            let mut w = self.expect_child(p, far);

            if self.arena[w].is_red() {
                self.arena[w].set_black();
                self.arena[p].set_red();
                self.rotate(p, side);
                w = self.expect_child(p, far);
            }

            let (near_c, far_c) = (self.child(w, side), self.child(w, far));
            if self.is_black(near_c) && self.is_black(far_c) {
                self.arena[w].set_red();
                x = Some(p);
                parent = self.arena[p].parent;
                continue;
            }

            if self.is_black(far_c) {
                if let Some(near_c) = near_c {
                    self.arena[near_c].set_black();
                }
                self.arena[w].set_red();
                self.rotate(w, far);
                w = self.expect_child(p, far);
            }

            self.arena[w].color = self.arena[p].color;
            self.arena[p].set_black();
            if let Some(far_c) = self.child(w, far) {
                self.arena[far_c].set_black();
            }
            self.rotate(p, side);
            x = self.root;
            break;
        }

        if let Some(x) = x {
            self.arena[x].set_black();
        }
    }
}

impl<K, V> Tree<K, V> {
    /// Check red-black rules, search order under `less` and link
    /// consistency, then return the number of reachable nodes.
    pub fn validate<F>(&self, less: &F) -> Result<usize>
    where
        F: Fn(&K, &K) -> bool,
        K: fmt::Debug,
    {
        let root = match self.root {
            Some(root) => root,
            None if self.arena.len() == 0 => return Ok(0),
            None => return err_at!(Fatal, msg: "empty tree with {} live nodes", self.arena.len()),
        };

        match self.arena.get(root) {
            None => return err_at!(Fatal, msg: "root {:?} is not a live node", root),
            Some(node) if node.parent.is_some() => {
                return err_at!(Fatal, msg: "root {:?} has parent {:?}", root, node.parent)
            }
            Some(node) if node.is_red() => return err_at!(Fatal, msg: "root is red"),
            Some(_) => (),
        }

        let (n_nodes, _) = self.validate_tree(root, None, None, less)?;
        if n_nodes != self.arena.len() {
            return err_at!(Fatal, msg: "reachable {} live {}", n_nodes, self.arena.len());
        }
        Ok(n_nodes)
    }

    // Return (n_nodes, n_blacks) for subtree under `id`, absent children
    // counting as one black.
    fn validate_tree<F>(
        &self,
        id: NodeId,
        low: Option<&K>,
        high: Option<&K>,
        less: &F,
    ) -> Result<(usize, usize)>
    where
        F: Fn(&K, &K) -> bool,
        K: fmt::Debug,
    {
        let node = &self.arena[id];

        if let Some(low) = low {
            if !less(low, &node.key) {
                return err_at!(Fatal, msg: "sort key:{:?} low:{:?}", node.key, low);
            }
        }
        if let Some(high) = high {
            if !less(&node.key, high) {
                return err_at!(Fatal, msg: "sort key:{:?} high:{:?}", node.key, high);
            }
        }

        let mut counts = [(0, 1), (0, 1)];
        let children = [(node.left, low, Some(&node.key)), (node.right, Some(&node.key), high)];
        for (i, (child, low, high)) in children.iter().enumerate() {
            let child = match child {
                Some(child) => *child,
                None => continue,
            };
            match self.arena.get(child) {
                None => return err_at!(Fatal, msg: "dangling link {:?}->{:?}", id, child),
                Some(c) if c.parent != Some(id) => {
                    return err_at!(Fatal, msg: "back-link {:?}->{:?}", child, c.parent)
                }
                Some(c) if c.is_red() && node.is_red() => {
                    return err_at!(Fatal, msg: "consecutive reds at key:{:?}", node.key)
                }
                Some(_) => (),
            }
            counts[i] = self.validate_tree(child, *low, *high, less)?;
        }

        let [(lnodes, lblacks), (rnodes, rblacks)] = counts;
        if lblacks != rblacks {
            return err_at!(Fatal, msg: "unbalanced blacks {} {}", lblacks, rblacks);
        }

        let n_blacks = lblacks + if node.is_black() { 1 } else { 0 };
        Ok((lnodes + rnodes + 1, n_blacks))
    }

    #[allow(dead_code)]
    #[cfg(test)]
    pub fn pretty_print(&self)
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        match self.root {
            Some(root) => self.pretty_print_node(root, 0, "*"),
            None => println!("<NULL TREE>"),
        }
    }

    #[cfg(test)]
    fn pretty_print_node(&self, id: NodeId, depth: usize, tag: &str)
    where
        K: fmt::Debug,
        V: fmt::Debug,
    {
        let node = &self.arena[id];
        let color = if node.is_red() { 'R' } else { 'B' };
        let indent = "    ".repeat(depth);
        println!("{}{}[{:?}:{:?}]{}", indent, tag, node.key, node.value, color);
        if let Some(left) = node.left {
            self.pretty_print_node(left, depth + 1, "L:");
        }
        if let Some(right) = node.right {
            self.pretty_print_node(right, depth + 1, "R:");
        }
    }
}

#[cfg(test)]
#[path = "tree_test.rs"]
mod tree_test;
