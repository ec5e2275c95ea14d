//! In-memory node storage.
//!
//! A single owner of all node storage, addressed by an opaque id rather
//! than a raw pointer, so a node's `parent` field can name its own
//! ancestor without the aliasing a pointer-based graph would require.

use crate::node::Node;
use crate::node_id::NodeId;

/// Owns every [`Node`] in a tree and recycles freed slots.
///
/// A removed node's slot is pushed onto `free` and handed back out by a
/// later `store_node` call rather than shrinking the backing `Vec`, so
/// `NodeId`s stay stable for the lifetime of the slot they name.
#[derive(Debug, Default)]
pub struct Arena<U> {
    slots: Vec<Option<Node<U>>>,
    free: Vec<NodeId>,
}

impl<U> Arena<U> {
    pub fn new() -> Self {
        Arena {
            slots: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Store `node`, returning the id it can be retrieved by.
    pub fn store_node(&mut self, node: Node<U>) -> NodeId {
        if let Some(id) = self.free.pop() {
            self.slots[id.index()] = Some(node);
            id
        } else {
            let id = NodeId(self.slots.len() as u32);
            self.slots.push(Some(node));
            id
        }
    }

    pub fn retrieve_node(&self, id: NodeId) -> &Node<U> {
        self.slots[id.index()]
            .as_ref()
            .expect("dangling NodeId: slot was released")
    }

    pub fn retrieve_node_mut(&mut self, id: NodeId) -> &mut Node<U> {
        self.slots[id.index()]
            .as_mut()
            .expect("dangling NodeId: slot was released")
    }

    /// Release a node's slot for reuse, returning its owned contents so
    /// the caller can run the payload destructor over its prefix.
    pub fn release_node(&mut self, id: NodeId) -> Node<U> {
        let node = self.slots[id.index()]
            .take()
            .expect("dangling NodeId: slot already released");
        self.free.push(id);
        node
    }

    pub fn len(&self) -> usize {
        self.slots.len() - self.free.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
