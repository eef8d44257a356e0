//! Ordered and priority collections over `i32` keys: an unbalanced binary
//! search tree, an AVL tree layered on top of it, and an array-backed
//! max-heap with heap sort.

mod avl;
mod bst;
mod error;
mod heap;
mod node;

pub use avl::AvlTree;
pub use bst::Bst;
pub use error::{HeapError, Result};
pub use heap::MaxHeap;
pub use node::NodeId;
