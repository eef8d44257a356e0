//! A height-balanced binary search tree over `i32` keys.

use std::cmp::{self, Ordering};

use log::trace;

use crate::bst::Bst;
use crate::node::{Link, NodeId};

/// An AVL tree.
///
/// Structural search and splicing are shared with [`Bst`]; every insert and
/// delete restores the balance condition before returning, so the heights of
/// sibling subtrees never differ by more than one.
///
/// ```
/// use treeheap::AvlTree;
/// let mut tree = AvlTree::new();
/// for key in 1..=7 {
///     tree.insert(key);
/// }
/// assert_eq!(tree.height(), 2);
/// tree.delete(4);
/// assert_eq!(tree.inorder_traversal(), vec![1, 2, 3, 5, 6, 7]);
/// ```
#[derive(Debug, Default)]
pub struct AvlTree {
    tree: Bst,
}

impl AvlTree {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self { tree: Bst::new() }
    }

    /// Returns true if the tree contains no keys.
    pub fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }

    /// Returns the number of keys in the tree.
    pub fn len(&self) -> usize {
        self.tree.len()
    }

    /// Removes all keys. Every outstanding handle becomes stale.
    pub fn clear(&mut self) {
        self.tree.clear();
    }

    /// Returns the root node, if any.
    pub fn root(&self) -> Option<NodeId> {
        self.tree.root()
    }

    /// Returns the key stored at `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is stale or belongs to another tree.
    pub fn key(&self, node: NodeId) -> i32 {
        self.tree.key(node)
    }

    /// Returns the height of the tree: `-1` if empty, `0` for a single node.
    pub fn height(&self) -> i32 {
        self.link_height(self.tree.root)
    }

    /// Returns the cached height of the subtree rooted at `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is stale or belongs to another tree.
    pub fn node_height(&self, node: NodeId) -> i32 {
        self.tree.nodes[node].height
    }

    /// Returns `height(right) - height(left)` for `node`.
    /// Negative values mean the node is left-heavy.
    ///
    /// # Panics
    ///
    /// Panics if `node` is stale or belongs to another tree.
    pub fn balance_factor(&self, node: NodeId) -> i32 {
        let node = &self.tree.nodes[node];
        self.link_height(node.right) - self.link_height(node.left)
    }

    /// Returns the node holding `key`.
    pub fn search(&self, key: i32) -> Option<NodeId> {
        self.tree.search(key)
    }

    /// Returns true if the tree contains `key`.
    pub fn contains(&self, key: i32) -> bool {
        self.tree.contains(key)
    }

    /// Returns the node with the smallest key in the subtree rooted at `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is stale or belongs to another tree.
    pub fn min(&self, node: NodeId) -> NodeId {
        self.tree.min(node)
    }

    /// Returns the node with the largest key in the subtree rooted at `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is stale or belongs to another tree.
    pub fn max(&self, node: NodeId) -> NodeId {
        self.tree.max(node)
    }

    /// Returns the node with the smallest key greater than the key of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is stale or belongs to another tree.
    pub fn successor(&self, node: NodeId) -> Option<NodeId> {
        self.tree.successor(node)
    }

    /// Returns the node with the largest key smaller than the key of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is stale or belongs to another tree.
    pub fn predecessor(&self, node: NodeId) -> Option<NodeId> {
        self.tree.predecessor(node)
    }

    /// Inserts a key into the tree.
    /// Returns false if the key was already present.
    pub fn insert(&mut self, key: i32) -> bool {
        match self.tree.root {
            None => {
                self.tree.attach(None, key);
                true
            }
            Some(root) => self.insert_below(root, key),
        }
    }

    /// Removes a key from the tree.
    /// Returns whether the key was previously in the tree.
    pub fn delete(&mut self, key: i32) -> bool {
        let Some(node) = self.tree.search(key) else {
            return false;
        };
        let disturbed = self.tree.unlink(node);
        self.tree.release(node);
        self.rebalance_path(disturbed.or(self.tree.root));
        debug_assert!(!self.tree.contains(key));
        true
    }

    /// Returns all keys in ascending order.
    pub fn inorder_traversal(&self) -> Vec<i32> {
        self.tree.inorder_traversal()
    }

    /// Returns `(key, height)` pairs in ascending key order.
    pub fn inorder_traversal_with_height(&self) -> Vec<(i32, i32)> {
        let mut pairs = Vec::with_capacity(self.tree.len());
        self.tree.inorder(|node| {
            let node = &self.tree.nodes[node];
            pairs.push((node.key, node.height));
        });
        pairs
    }

    /// Asserts that the internal tree structure is consistent.
    #[cfg(any(test, feature = "consistency_check"))]
    pub fn check_consistency(&self) {
        self.tree.check_consistency();

        self.tree.preorder(|node_id| {
            let node = &self.tree.nodes[node_id];
            let left_height = self.link_height(node.left);
            let right_height = self.link_height(node.right);

            // Check height
            assert_eq!(node.height, cmp::max(left_height, right_height) + 1);

            // Check AVL condition (nearly balance)
            assert!((right_height - left_height).abs() <= 1);
        });
    }

    // Descends to the free slot for `key`, then restores heights and balance
    // on every node of the way back up.
    fn insert_below(&mut self, node: NodeId, key: i32) -> bool {
        let next = match key.cmp(&self.tree.nodes[node].key) {
            Ordering::Equal => return false,
            Ordering::Less => self.tree.nodes[node].left,
            Ordering::Greater => self.tree.nodes[node].right,
        };
        match next {
            Some(child) => {
                if !self.insert_below(child, key) {
                    return false;
                }
            }
            None => {
                self.tree.attach(Some(node), key);
            }
        }
        self.adjust_height(node);
        self.rebalance(node);
        true
    }

    // Rebalances nodes starting from given position up to the root node.
    fn rebalance_path(&mut self, start_from: Link) {
        let mut current = start_from;
        while let Some(node) = current {
            self.adjust_height(node);
            let top = self.rebalance(node);
            current = self.tree.nodes[top].parent;
        }
    }

    /// Restores the AVL condition at `node` if its balance factor left [-1, 1].
    /// Returns the root of the (possibly rotated) subtree.
    fn rebalance(&mut self, node: NodeId) -> NodeId {
        let balance = self.balance_factor(node);
        if balance < -1 {
            if let Some(left) = self.tree.nodes[node].left {
                if self.balance_factor(left) > 0 {
                    // Left-Right
                    self.rotate_left(left);
                }
            }
            // Left-Left
            self.rotate_right(node)
        } else if balance > 1 {
            if let Some(right) = self.tree.nodes[node].right {
                if self.balance_factor(right) < 0 {
                    // Right-Left
                    self.rotate_right(right);
                }
            }
            // Right-Right
            self.rotate_left(node)
        } else {
            node
        }
    }

    fn link_height(&self, link: Link) -> i32 {
        match link {
            None => -1,
            Some(node) => self.tree.nodes[node].height,
        }
    }

    fn adjust_height(&mut self, node: NodeId) {
        let (left, right) = {
            let node = &self.tree.nodes[node];
            (node.left, node.right)
        };
        let height = cmp::max(self.link_height(left), self.link_height(right)) + 1;
        self.tree.nodes[node].height = height;
    }

    fn rotate_left(&mut self, node: NodeId) -> NodeId {
        let Some(right) = self.tree.nodes[node].right else {
            return node;
        };
        trace!("rotate left at key {}", self.tree.nodes[node].key);

        let right_left = self.tree.nodes[right].left;
        self.tree.nodes[node].right = right_left;
        if let Some(right_left) = right_left {
            self.tree.nodes[right_left].parent = Some(node);
        }

        self.tree.transplant(node, Some(right));

        self.tree.nodes[right].left = Some(node);
        self.tree.nodes[node].parent = Some(right);

        self.adjust_height(node);
        self.adjust_height(right);
        right
    }

    fn rotate_right(&mut self, node: NodeId) -> NodeId {
        let Some(left) = self.tree.nodes[node].left else {
            return node;
        };
        trace!("rotate right at key {}", self.tree.nodes[node].key);

        let left_right = self.tree.nodes[left].right;
        self.tree.nodes[node].left = left_right;
        if let Some(left_right) = left_right {
            self.tree.nodes[left_right].parent = Some(node);
        }

        self.tree.transplant(node, Some(left));

        self.tree.nodes[left].right = Some(node);
        self.tree.nodes[node].parent = Some(left);

        self.adjust_height(node);
        self.adjust_height(left);
        left
    }
}

#[cfg(test)]
mod tests {
    use super::AvlTree;

    const SAMPLE_KEYS: [i32; 9] = [25, 65, 9, 22, 3, 50, 21, 17, 55];

    fn sample_tree() -> AvlTree {
        let mut tree = AvlTree::new();
        for key in SAMPLE_KEYS {
            assert!(tree.insert(key));
            tree.check_consistency();
        }
        tree
    }

    #[test]
    fn test_new() {
        let tree = AvlTree::new();
        assert!(tree.is_empty());
        assert_eq!(tree.height(), -1);
        assert!(tree.inorder_traversal_with_height().is_empty());
        tree.check_consistency();
    }

    #[test]
    fn test_rebalance() {
        {
            //     3 ->   2
            //    /      / \
            //   2      1   3
            //  /
            // 1
            let mut tree = AvlTree::new();
            tree.insert(3);
            tree.insert(2);
            tree.insert(1);
            tree.check_consistency();
            assert_eq!(tree.height(), 1);
            assert_eq!(tree.key(tree.root().unwrap()), 2);
        }
        {
            //   3  ->   2
            //  /       / \
            // 1       1   3
            //  \
            //   2
            let mut tree = AvlTree::new();
            tree.insert(3);
            tree.insert(1);
            tree.insert(2);
            tree.check_consistency();
            assert_eq!(tree.height(), 1);
            assert_eq!(tree.key(tree.root().unwrap()), 2);
        }
        {
            // 1 ->    2
            //  \     / \
            //   2   1   3
            //    \
            //     3
            let mut tree = AvlTree::new();
            tree.insert(1);
            tree.insert(2);
            tree.insert(3);
            tree.check_consistency();
            assert_eq!(tree.height(), 1);
            assert_eq!(tree.key(tree.root().unwrap()), 2);
        }
        {
            // 1   ->  2
            //  \     / \
            //   3   1   3
            //  /
            // 2
            let mut tree = AvlTree::new();
            tree.insert(1);
            tree.insert(3);
            tree.insert(2);
            tree.check_consistency();
            assert_eq!(tree.height(), 1);
            assert_eq!(tree.key(tree.root().unwrap()), 2);
        }
    }

    #[test]
    fn test_rebalance_on_delete() {
        {
            //     3   ->     3 ->   2
            //    / \        /      / \
            //   2   4      2      1   3
            //  /          /
            // 1          1
            let mut tree = AvlTree::new();
            for key in [3, 2, 4, 1] {
                tree.insert(key);
            }
            assert_eq!(tree.height(), 2);
            assert!(tree.delete(4));
            tree.check_consistency();
            assert_eq!(tree.height(), 1);
        }
        {
            //   1     -> 1     ->    2
            //  / \        \         / \
            // 0   3        3       1   3
            //    /        /
            //   2        2
            let mut tree = AvlTree::new();
            for key in [1, 0, 3, 2] {
                tree.insert(key);
            }
            assert_eq!(tree.height(), 2);
            assert!(tree.delete(0));
            tree.check_consistency();
            assert_eq!(tree.height(), 1);
        }
        {
            // Successor is the direct right child and ends up left-heavy
            //      2          3
            //     / \        /
            //    1   3  ->  1   ->   1
            //   /          /        / \
            //  0          0        0   3
            let mut tree = AvlTree::new();
            for key in [2, 1, 3, 0] {
                tree.insert(key);
            }
            assert!(tree.delete(2));
            tree.check_consistency();
            assert_eq!(tree.key(tree.root().unwrap()), 1);
            assert_eq!(tree.inorder_traversal(), vec![0, 1, 3]);
        }
    }

    #[test]
    fn test_sample_inserts() {
        //        25
        //       /  \
        //      9    65
        //     / \   /
        //    3  22 50
        //       /
        //      21
        let mut tree = AvlTree::new();
        for key in &SAMPLE_KEYS[..7] {
            tree.insert(*key);
        }
        tree.check_consistency();
        assert_eq!(
            tree.inorder_traversal_with_height(),
            vec![(3, 0), (9, 2), (21, 0), (22, 1), (25, 3), (50, 0), (65, 1)]
        );

        // Left-Left at 22
        tree.insert(17);
        tree.check_consistency();
        assert_eq!(
            tree.inorder_traversal_with_height(),
            vec![(3, 0), (9, 2), (17, 0), (21, 1), (22, 0), (25, 3), (50, 0), (65, 1)]
        );

        // Left-Right at 65
        tree.insert(55);
        tree.check_consistency();
        assert_eq!(
            tree.inorder_traversal_with_height(),
            vec![
                (3, 0),
                (9, 2),
                (17, 0),
                (21, 1),
                (22, 0),
                (25, 3),
                (50, 0),
                (55, 1),
                (65, 0)
            ]
        );
        assert_eq!(tree.key(tree.root().unwrap()), 25);
    }

    #[test]
    fn test_sample_deletes() {
        let mut tree = sample_tree();
        assert_eq!(tree.inorder_traversal(), vec![3, 9, 17, 21, 22, 25, 50, 55, 65]);

        assert!(tree.delete(65));
        tree.check_consistency();
        assert_eq!(tree.inorder_traversal(), vec![3, 9, 17, 21, 22, 25, 50, 55]);

        assert!(tree.delete(55));
        tree.check_consistency();
        assert_eq!(tree.inorder_traversal(), vec![3, 9, 17, 21, 22, 25, 50]);
        assert_eq!(tree.len(), 7);

        // Left-Right at the root
        assert_eq!(tree.key(tree.root().unwrap()), 21);
        assert_eq!(tree.height(), 2);
    }

    #[test]
    fn test_insert_duplicate() {
        let mut tree = sample_tree();
        let before = tree.inorder_traversal_with_height();
        for key in SAMPLE_KEYS {
            assert!(!tree.insert(key));
        }
        assert_eq!(tree.inorder_traversal_with_height(), before);
        assert_eq!(tree.len(), SAMPLE_KEYS.len());
    }

    #[test]
    fn test_delete_absent() {
        let mut tree = sample_tree();
        let root = tree.root();
        let before = tree.inorder_traversal_with_height();
        assert!(!tree.delete(42));
        assert_eq!(tree.root(), root);
        assert_eq!(tree.inorder_traversal_with_height(), before);

        let mut empty = AvlTree::new();
        assert!(!empty.delete(1));
        assert!(empty.is_empty());
    }

    #[test]
    #[should_panic]
    fn test_deleted_handle_panics() {
        let mut tree = sample_tree();
        let node = tree.search(9).unwrap();
        assert!(tree.delete(9));
        assert!(tree.insert(10));
        tree.successor(node);
    }

    #[test]
    fn test_balance_factor() {
        let mut tree = AvlTree::new();
        tree.insert(2);
        tree.insert(1);
        let root = tree.root().unwrap();
        assert_eq!(tree.balance_factor(root), -1);
        assert_eq!(tree.node_height(root), 1);
        tree.insert(3);
        assert_eq!(tree.balance_factor(root), 0);
    }

    #[test]
    fn test_navigation() {
        let tree = sample_tree();
        let root = tree.root().unwrap();
        assert_eq!(tree.key(tree.min(root)), 3);
        assert_eq!(tree.key(tree.max(root)), 65);

        let node = tree.search(25).unwrap();
        assert_eq!(tree.successor(node).map(|n| tree.key(n)), Some(50));
        assert_eq!(tree.predecessor(node).map(|n| tree.key(n)), Some(22));
        assert!(tree.successor(tree.max(root)).is_none());
        assert!(tree.contains(17));
        assert!(!tree.contains(18));
    }

    #[test]
    fn test_sorted_range() {
        let mut tree = AvlTree::new();
        for key in 0..1_000 {
            assert!(tree.insert(key));
        }
        tree.check_consistency();
        // 1.44 * log2(1000) bounds the height of any AVL tree of that size
        assert!(tree.height() <= 14);

        for key in (0..1_000).step_by(2) {
            assert!(tree.delete(key));
        }
        tree.check_consistency();
        assert_eq!(tree.len(), 500);
    }
}
