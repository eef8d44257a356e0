//! An unbalanced binary search tree over `i32` keys.

use std::cmp::Ordering;

use log::debug;

use crate::node::{Link, NodeArena, NodeId};

/// An unbalanced binary search tree.
///
/// Nodes are addressed through [`NodeId`] handles. Each node keeps a link to
/// its parent, so successor queries and traversals walk the tree without
/// recursion.
///
/// ```
/// use treeheap::Bst;
/// let mut bst = Bst::new();
/// for key in [15, 6, 18, 3, 7] {
///     bst.insert(key);
/// }
/// let six = bst.search(6).unwrap();
/// assert_eq!(bst.key(bst.successor(six).unwrap()), 7);
/// bst.delete(six);
/// assert_eq!(bst.inorder_traversal(), vec![3, 7, 15, 18]);
/// ```
#[derive(Debug, Default)]
pub struct Bst {
    pub(crate) nodes: NodeArena,
    pub(crate) root: Link,
    num_nodes: usize,
}

#[allow(clippy::enum_variant_names)]
enum Direction {
    FromParent,
    FromLeft,
    FromRight,
}

impl Bst {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self {
            nodes: NodeArena::new(),
            root: None,
            num_nodes: 0,
        }
    }

    /// Returns true if the tree contains no keys.
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.num_nodes
    }

    /// Removes all keys. Every outstanding handle becomes stale.
    pub fn clear(&mut self) {
        self.nodes.clear();
        self.root = None;
        self.num_nodes = 0;
    }

    /// Returns the root node, if any.
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Returns the key stored at `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is stale or belongs to another tree.
    pub fn key(&self, node: NodeId) -> i32 {
        self.nodes[node].key
    }

    /// Returns the left child of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is stale or belongs to another tree.
    pub fn left(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node].left
    }

    /// Returns the right child of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is stale or belongs to another tree.
    pub fn right(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node].right
    }

    /// Returns the parent of `node`, or `None` for the root.
    ///
    /// # Panics
    ///
    /// Panics if `node` is stale or belongs to another tree.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes[node].parent
    }

    /// Returns the node holding `key`.
    pub fn search(&self, key: i32) -> Option<NodeId> {
        let mut current = self.root;
        while let Some(node) = current {
            current = match key.cmp(&self.nodes[node].key) {
                Ordering::Equal => break,
                Ordering::Less => self.nodes[node].left,
                Ordering::Greater => self.nodes[node].right,
            }
        }
        current
    }

    /// Returns true if the tree contains `key`.
    pub fn contains(&self, key: i32) -> bool {
        self.search(key).is_some()
    }

    /// Returns the node with the smallest key in the subtree rooted at `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is stale or belongs to another tree.
    pub fn min(&self, mut node: NodeId) -> NodeId {
        while let Some(left) = self.nodes[node].left {
            node = left;
        }
        node
    }

    /// Returns the node with the largest key in the subtree rooted at `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is stale or belongs to another tree.
    pub fn max(&self, mut node: NodeId) -> NodeId {
        while let Some(right) = self.nodes[node].right {
            node = right;
        }
        node
    }

    /// Returns the node with the smallest key greater than the key of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is stale or belongs to another tree.
    pub fn successor(&self, mut node: NodeId) -> Option<NodeId> {
        if let Some(right) = self.nodes[node].right {
            return Some(self.min(right));
        }
        let mut parent = self.nodes[node].parent;
        while let Some(parent_id) = parent {
            if self.nodes[parent_id].right != Some(node) {
                break;
            }
            node = parent_id;
            parent = self.nodes[parent_id].parent;
        }
        parent
    }

    /// Returns the node with the largest key smaller than the key of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is stale or belongs to another tree.
    pub fn predecessor(&self, mut node: NodeId) -> Option<NodeId> {
        if let Some(left) = self.nodes[node].left {
            return Some(self.max(left));
        }
        let mut parent = self.nodes[node].parent;
        while let Some(parent_id) = parent {
            if self.nodes[parent_id].left != Some(node) {
                break;
            }
            node = parent_id;
            parent = self.nodes[parent_id].parent;
        }
        parent
    }

    /// Inserts `key` and returns its node.
    /// If the key is already present, the tree is left unchanged and the
    /// existing node is returned.
    pub fn insert(&mut self, key: i32) -> NodeId {
        let mut parent: Link = None;
        let mut current = self.root;
        while let Some(node) = current {
            parent = current;
            current = match key.cmp(&self.nodes[node].key) {
                Ordering::Equal => return node,
                Ordering::Less => self.nodes[node].left,
                Ordering::Greater => self.nodes[node].right,
            }
        }
        self.attach(parent, key)
    }

    /// Removes `node` from the tree. The handle becomes stale.
    ///
    /// # Panics
    ///
    /// Panics if `node` is stale or belongs to another tree.
    pub fn delete(&mut self, node: NodeId) {
        self.unlink(node);
        self.release(node);
    }

    /// Returns all keys in ascending order.
    pub fn inorder_traversal(&self) -> Vec<i32> {
        let mut keys = Vec::with_capacity(self.num_nodes);
        self.inorder(|node| keys.push(self.nodes[node].key));
        keys
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        // Check root link
        if let Some(root) = self.root {
            assert!(self.nodes[root].parent.is_none());
        }

        // Check tree nodes
        let mut num_nodes = 0;
        self.preorder(|node| {
            if let Some(left) = self.nodes[node].left {
                assert_eq!(self.nodes[left].parent, Some(node));
                assert!(self.nodes[left].key < self.nodes[node].key);
            }
            if let Some(right) = self.nodes[node].right {
                assert_eq!(self.nodes[right].parent, Some(node));
                assert!(self.nodes[right].key > self.nodes[node].key);
            }
            num_nodes += 1;
        });

        // Check ordering across subtrees
        let keys = self.inorder_traversal();
        assert!(keys.windows(2).all(|pair| pair[0] < pair[1]));

        // Check number of nodes
        assert_eq!(num_nodes, self.num_nodes);
    }

    /// Creates a leaf for `key` below `parent`, or as root if `parent` is `None`.
    /// The caller must have found `parent` by descending on `key`.
    pub(crate) fn attach(&mut self, parent: Link, key: i32) -> NodeId {
        let node = self.nodes.create(parent, key);
        match parent {
            None => self.root = Some(node),
            Some(parent) => {
                if key < self.nodes[parent].key {
                    debug_assert!(self.nodes[parent].left.is_none());
                    self.nodes[parent].left = Some(node);
                } else {
                    debug_assert!(self.nodes[parent].right.is_none());
                    self.nodes[parent].right = Some(node);
                }
            }
        }
        self.num_nodes += 1;
        debug!("attached key {} below {:?}", key, parent);
        node
    }

    /// Replaces the subtree rooted at `u` by the subtree rooted at `v`.
    /// Children of `u` are left untouched.
    pub(crate) fn transplant(&mut self, u: NodeId, v: Link) {
        let parent = self.nodes[u].parent;
        match parent {
            None => self.root = v,
            Some(parent) => {
                if self.nodes[parent].left == Some(u) {
                    self.nodes[parent].left = v;
                } else {
                    self.nodes[parent].right = v;
                }
            }
        }
        if let Some(v) = v {
            self.nodes[v].parent = parent;
        }
    }

    /// Splices `node` out of the tree without freeing it.
    /// Returns the lowest node whose subtree changed shape, if any.
    pub(crate) fn unlink(&mut self, node: NodeId) -> Link {
        let (left, right, parent) = {
            let z = &self.nodes[node];
            (z.left, z.right, z.parent)
        };
        match (left, right) {
            (None, _) => {
                self.transplant(node, right);
                parent
            }
            (Some(_), None) => {
                self.transplant(node, left);
                parent
            }
            (Some(left), Some(right)) => {
                // Successor has no left child
                let successor = self.min(right);
                let disturbed = if self.nodes[successor].parent != Some(node) {
                    let successor_parent = self.nodes[successor].parent;
                    let successor_right = self.nodes[successor].right;
                    self.transplant(successor, successor_right);
                    self.nodes[successor].right = Some(right);
                    self.nodes[right].parent = Some(successor);
                    successor_parent
                } else {
                    Some(successor)
                };
                self.transplant(node, Some(successor));
                self.nodes[successor].left = Some(left);
                self.nodes[left].parent = Some(successor);
                disturbed
            }
        }
    }

    /// Frees a node previously spliced out by `unlink`.
    pub(crate) fn release(&mut self, node: NodeId) {
        debug_assert!(self.num_nodes >= 1);
        let removed = self.nodes.destroy(node);
        self.num_nodes -= 1;
        debug!("released key {}", removed.key);
    }

    #[cfg(any(test, feature = "consistency_check"))]
    pub(crate) fn preorder<F: FnMut(NodeId)>(&self, f: F) {
        self.traverse(f, |_| {});
    }

    pub(crate) fn inorder<F: FnMut(NodeId)>(&self, f: F) {
        self.traverse(|_| {}, f);
    }

    fn traverse<Pre, In>(&self, mut preorder: Pre, mut inorder: In)
    where
        Pre: FnMut(NodeId),
        In: FnMut(NodeId),
    {
        if let Some(mut node) = self.root {
            let mut dir = Direction::FromParent;
            loop {
                match dir {
                    Direction::FromParent => {
                        preorder(node);
                        if let Some(left) = self.nodes[node].left {
                            node = left;
                        } else {
                            dir = Direction::FromLeft;
                        }
                    }
                    Direction::FromLeft => {
                        inorder(node);
                        if let Some(right) = self.nodes[node].right {
                            node = right;
                            dir = Direction::FromParent;
                        } else {
                            dir = Direction::FromRight;
                        }
                    }
                    Direction::FromRight => {
                        match self.nodes[node].parent {
                            Some(parent) => {
                                if self.nodes[parent].left == Some(node) {
                                    dir = Direction::FromLeft;
                                } else {
                                    dir = Direction::FromRight;
                                }
                                node = parent;
                            }
                            None => break,
                        }
                    }
                }
            }
        }
    }
}
