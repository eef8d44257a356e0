use std::ops::{Index, IndexMut};
use std::sync::atomic::{AtomicU32, Ordering};

static NEXT_ARENA_ID: AtomicU32 = AtomicU32::new(0);

/// Handle to a node owned by a tree.
///
/// A handle is only meaningful for the tree that returned it and becomes
/// stale once its node has been deleted or the tree has been cleared.
/// Using a stale or foreign handle panics.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct NodeId {
    arena: u32,
    index: usize,
    generation: u32,
}

pub(crate) type Link = Option<NodeId>;

#[derive(Debug)]
pub(crate) struct Node {
    pub(crate) key: i32,
    pub(crate) left: Link,
    pub(crate) right: Link,
    pub(crate) parent: Link,
    pub(crate) height: i32,
}

#[derive(Debug)]
struct Slot {
    generation: u32,
    node: Option<Node>,
}

/// Owns every node of a tree. Links between nodes are plain indices,
/// tagged with the arena id and the generation of their slot.
#[derive(Debug)]
pub(crate) struct NodeArena {
    id: u32,
    slots: Vec<Slot>,
    free_list: Vec<usize>,
}

impl NodeArena {
    pub(crate) fn new() -> Self {
        Self {
            id: NEXT_ARENA_ID.fetch_add(1, Ordering::Relaxed),
            slots: Vec::new(),
            free_list: Vec::new(),
        }
    }

    pub(crate) fn create(&mut self, parent: Link, key: i32) -> NodeId {
        let node = Node {
            key,
            parent,
            left: None,
            right: None,
            height: 0,
        };
        let index = match self.free_list.pop() {
            Some(index) => {
                debug_assert!(self.slots[index].node.is_none());
                self.slots[index].node = Some(node);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    node: Some(node),
                });
                self.slots.len() - 1
            }
        };
        NodeId {
            arena: self.id,
            index,
            generation: self.slots[index].generation,
        }
    }

    pub(crate) fn destroy(&mut self, id: NodeId) -> Node {
        let node = match self.slot_mut(id) {
            Some(slot) => {
                slot.generation = slot.generation.wrapping_add(1);
                slot.node.take()
            }
            None => None,
        };
        match node {
            Some(node) => {
                self.free_list.push(id.index);
                node
            }
            None => stale(id),
        }
    }

    /// Drops all nodes. Handles issued before are rejected afterwards.
    pub(crate) fn clear(&mut self) {
        *self = Self::new();
    }

    fn slot_mut(&mut self, id: NodeId) -> Option<&mut Slot> {
        if id.arena != self.id {
            return None;
        }
        self.slots
            .get_mut(id.index)
            .filter(|slot| slot.generation == id.generation && slot.node.is_some())
    }
}

impl Default for NodeArena {
    fn default() -> Self {
        Self::new()
    }
}

impl Index<NodeId> for NodeArena {
    type Output = Node;

    fn index(&self, id: NodeId) -> &Node {
        if id.arena == self.id {
            if let Some(Slot {
                generation,
                node: Some(node),
            }) = self.slots.get(id.index)
            {
                if *generation == id.generation {
                    return node;
                }
            }
        }
        stale(id)
    }
}

impl IndexMut<NodeId> for NodeArena {
    fn index_mut(&mut self, id: NodeId) -> &mut Node {
        match self.slot_mut(id).and_then(|slot| slot.node.as_mut()) {
            Some(node) => node,
            None => stale(id),
        }
    }
}

#[cold]
fn stale(id: NodeId) -> ! {
    panic!("stale or foreign node handle {:?}", id)
}

#[cfg(test)]
mod tests {
    use super::NodeArena;

    #[test]
    fn test_reuse_freed_slot() {
        let mut arena = NodeArena::new();
        let a = arena.create(None, 1);
        let b = arena.create(Some(a), 2);
        assert_ne!(a, b);
        assert_eq!(arena[b].parent, Some(a));
        assert_eq!(arena[b].height, 0);

        assert_eq!(arena.destroy(a).key, 1);
        let c = arena.create(None, 3);
        assert_ne!(c, a);
        assert_eq!(c.index, a.index);
        assert_eq!(arena[c].key, 3);
    }

    #[test]
    #[should_panic]
    fn test_stale_handle() {
        let mut arena = NodeArena::new();
        let a = arena.create(None, 1);
        arena.destroy(a);
        let _ = arena[a].key;
    }

    #[test]
    #[should_panic]
    fn test_stale_handle_after_reuse() {
        let mut arena = NodeArena::new();
        let a = arena.create(None, 1);
        arena.destroy(a);
        arena.create(None, 2);
        let _ = arena[a].key;
    }

    #[test]
    #[should_panic]
    fn test_destroy_twice() {
        let mut arena = NodeArena::new();
        let a = arena.create(None, 1);
        arena.destroy(a);
        arena.create(None, 2);
        arena.destroy(a);
    }

    #[test]
    #[should_panic]
    fn test_foreign_handle() {
        let mut arena = NodeArena::new();
        let mut other = NodeArena::new();
        let a = arena.create(None, 1);
        other.create(None, 2);
        let _ = other[a].key;
    }

    #[test]
    #[should_panic]
    fn test_handle_after_clear() {
        let mut arena = NodeArena::new();
        let a = arena.create(None, 1);
        arena.clear();
        arena.create(None, 2);
        let _ = arena[a].key;
    }
}
