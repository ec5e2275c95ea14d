//! Insertion: walks the tree to the new key's attachment point, then
//! splices it in as an exact match, a strict prefix of an existing key, or
//! a fresh divergence, propagating the inserted netmask to its covering
//! ancestor along the way.

use crate::af::{AddressFamily, GENERIC_NETMASK};
use crate::arena::Arena;
use crate::bitops::{bit_test, chop, first_differ};
use crate::errors::Result;
use crate::node::Node;
use crate::node_id::NodeId;
use crate::prefix::Prefix;
use crate::tree::Tree;
use log::trace;

/// Find some stream belonging to a node's subtree, for nodes that don't
/// carry a prefix of their own (a two-child interior node never does —
/// see the note in `Tree::add_core`). Any leaf under such a node shares
/// the same leading `node.bit` bits as every other leaf in the subtree,
/// so it doesn't matter which one we pick.
fn representative_stream<U>(arena: &Arena<U>, mut id: NodeId) -> NodeId {
    loop {
        let n = arena.retrieve_node(id);
        if n.prefix.is_some() {
            return id;
        }
        id = n.left.or(n.right).expect(
            "a prefix-less node must have at least one child (Patricia compression invariant)",
        );
    }
}

/// Register `netmask` on the first ancestor (climbing up from `start`,
/// `start` itself included) whose subtree is fully inside the `netmask`
/// netblock (see [`crate::propagation`]).
pub(crate) fn register_netmask_ancestor<U>(arena: &mut Arena<U>, start: NodeId, netmask: u8) {
    if let Some(id) = crate::propagation::find_netmask_ancestor(arena, start, netmask) {
        arena.retrieve_node_mut(id).register_netmask(netmask);
    }
}

impl<A: AddressFamily, U> Tree<A, U> {
    /// Core of every `add_*` entry point.
    ///
    /// `stream`/`bitlen` describe the full-width key (4 bytes/32 for
    /// IPv4, 16 bytes/128 for IPv6, caller-chosen for generic keys);
    /// `netmask` is the CIDR length tag recorded against it, or
    /// [`GENERIC_NETMASK`] for a non-IP generic key.
    pub(crate) fn add_core(&mut self, stream: &[u8], bitlen: u8, user: U, netmask: u8) -> Result<NodeId> {
        // Canonicalize. A generic key is never netmask-chopped; an IP key
        // is chopped to `netmask` bits (a no-op for host routes).
        let canon: Vec<u8> = if netmask == GENERIC_NETMASK {
            stream[..(bitlen / 8) as usize].to_vec()
        } else {
            let mut buf = stream[..(bitlen / 8) as usize].to_vec();
            chop(&mut buf, netmask);
            buf
        };

        // Materialize the detached prefix.
        let new_prefix = Prefix::new(&canon, bitlen, netmask, user)?;

        // Empty tree: the new leaf becomes the root outright.
        let Some(root) = self.root else {
            let id = self.arena.store_node(Node::new_leaf(new_prefix));
            if netmask != GENERIC_NETMASK && netmask < bitlen {
                self.arena.retrieve_node_mut(id).register_netmask(netmask);
            }
            self.root = Some(id);
            trace!("insert: empty tree, {id:?} becomes root");
            return Ok(id);
        };

        // Descend as far as the key's own discriminator bits take us.
        let mut cur = root;
        loop {
            let n = self.arena.retrieve_node(cur);
            if n.bit as u16 >= bitlen as u16 {
                break;
            }
            let next = if bit_test(&canon, n.bit) { n.right } else { n.left };
            match next {
                Some(nx) => cur = nx,
                None => break,
            }
        }

        // Find where the new key diverges from a representative stored
        // stream reachable from where the descent stopped.
        let repr_id = representative_stream(&self.arena, cur);
        let repr_stream = self.arena.retrieve_node(repr_id).prefix.as_ref().unwrap().stream.clone();
        let check = self.arena.retrieve_node(cur).bit.min(bitlen);
        let differ_bit = first_differ(&canon, &repr_stream, check);

        // Climb back up to the node the divergence actually attaches to.
        let mut node = cur;
        while let Some(parent) = self.arena.retrieve_node(node).parent {
            if differ_bit as u16 <= self.arena.retrieve_node(parent).bit as u16 {
                node = parent;
            } else {
                break;
            }
        }

        let node_bit = self.arena.retrieve_node(node).bit;

        if differ_bit == bitlen && node_bit == bitlen {
            self.add_case_exact(node, &canon, bitlen, netmask, new_prefix)
        } else if differ_bit == bitlen && node_bit > bitlen {
            self.add_case_strict_prefix(node, differ_bit, bitlen, netmask, new_prefix)
        } else {
            self.add_case_divergent(node, differ_bit, bitlen, netmask, new_prefix)
        }
    }

    /// Case A — exact structural match: the key already names a node.
    fn add_case_exact(
        &mut self,
        node: NodeId,
        canon: &[u8],
        bitlen: u8,
        netmask: u8,
        new_prefix: Prefix<U>,
    ) -> Result<NodeId> {
        let user = new_prefix.users.into_iter().next().unwrap().user;
        let has_prefix = self.arena.retrieve_node(node).prefix.is_some();

        if has_prefix {
            let existing = self.arena.retrieve_node_mut(node).prefix.as_mut().unwrap();
            debug_assert!(existing.stream_eq(canon));
            if existing.contains_netmask(netmask) {
                trace!("insert: duplicate ({netmask}) at {node:?}, ignored");
                return Ok(node);
            }
            existing.add_netmask(netmask, user);
        } else {
            // The position exists (a prior insert needed a branch here)
            // but nothing has been stored at this exact address yet.
            // Attach the caller's prefix as-is, keeping the netmask the
            // caller actually asked for rather than forcing it to the
            // generic-key sentinel, which would silently hide a real
            // netblock or host entry behind that marker.
            let prefix = Prefix::new(canon, bitlen, netmask, user)?;
            self.arena.retrieve_node_mut(node).prefix = Some(prefix);
        }

        if netmask != GENERIC_NETMASK && netmask < bitlen {
            register_netmask_ancestor(&mut self.arena, node, netmask);
        }
        trace!("insert: attached netmask {netmask} at existing node {node:?}");
        Ok(node)
    }

    /// Case B — the new key is a strict prefix of an existing, deeper key.
    /// Only reachable with variable-length generic keys.
    fn add_case_strict_prefix(
        &mut self,
        node: NodeId,
        differ_bit: u8,
        bitlen: u8,
        netmask: u8,
        new_prefix: Prefix<U>,
    ) -> Result<NodeId> {
        let repr_id = representative_stream(&self.arena, node);
        let repr_stream = self.arena.retrieve_node(repr_id).prefix.as_ref().unwrap().stream.clone();
        let node_goes_right = bit_test(&repr_stream, differ_bit);

        let old_parent = self.arena.retrieve_node(node).parent;
        let mut leaf = Node::new_leaf(new_prefix);
        leaf.parent = old_parent;
        if node_goes_right {
            leaf.right = Some(node);
        } else {
            leaf.left = Some(node);
        }
        let leaf_id = self.arena.store_node(leaf);

        self.arena.retrieve_node_mut(node).parent = Some(leaf_id);
        self.reparent_child(old_parent, node, leaf_id);

        if self.root == Some(node) {
            self.root = Some(leaf_id);
        }

        if netmask != GENERIC_NETMASK && netmask < bitlen {
            register_netmask_ancestor(&mut self.arena, leaf_id, netmask);
        }
        trace!("insert: spliced {leaf_id:?} above {node:?} (strict prefix)");
        Ok(leaf_id)
    }

    /// Case C — general divergence: splits `node`'s subtree off a
    /// brand-new prefix-less intermediate node.
    fn add_case_divergent(
        &mut self,
        node: NodeId,
        differ_bit: u8,
        bitlen: u8,
        netmask: u8,
        new_prefix: Prefix<U>,
    ) -> Result<NodeId> {
        let new_key_goes_right = bit_test(&new_prefix.stream, differ_bit);

        let mut intermediate = Node::new_interior(differ_bit);
        let old_parent = self.arena.retrieve_node(node).parent;

        // Partition the propagation list: entries covering a netblock
        // that is still fully inside the new, shorter subtree move to
        // the intermediate node; the rest stay with the original node.
        let old_netmasks = std::mem::take(&mut self.arena.retrieve_node_mut(node).netmasks);
        let (moved, kept): (Vec<u8>, Vec<u8>) = old_netmasks
            .into_iter()
            .partition(|m| *m as u16 >= differ_bit as u16 + 1);
        self.arena.retrieve_node_mut(node).netmasks = kept;
        intermediate.netmasks = moved;

        let leaf = Node::new_leaf(new_prefix);
        let leaf_id = self.arena.store_node(leaf);

        if new_key_goes_right {
            intermediate.right = Some(leaf_id);
            intermediate.left = Some(node);
        } else {
            intermediate.left = Some(leaf_id);
            intermediate.right = Some(node);
        }
        intermediate.parent = old_parent;
        let intermediate_id = self.arena.store_node(intermediate);

        self.arena.retrieve_node_mut(leaf_id).parent = Some(intermediate_id);
        self.arena.retrieve_node_mut(node).parent = Some(intermediate_id);
        self.reparent_child(old_parent, node, intermediate_id);

        if self.root == Some(node) {
            self.root = Some(intermediate_id);
        }

        if netmask != GENERIC_NETMASK && netmask < bitlen {
            register_netmask_ancestor(&mut self.arena, leaf_id, netmask);
        }
        trace!(
            "insert: new intermediate {intermediate_id:?} at bit {differ_bit} splits {node:?}"
        );
        Ok(leaf_id)
    }

    /// Point whichever of `parent`'s children used to be `old_child` at
    /// `new_child` instead. No-op if `parent` is `None` (the tree root
    /// case is handled separately by the caller).
    fn reparent_child(&mut self, parent: Option<NodeId>, old_child: NodeId, new_child: NodeId) {
        let Some(parent) = parent else { return };
        let p = self.arena.retrieve_node_mut(parent);
        if p.left == Some(old_child) {
            p.left = Some(new_child);
        } else if p.right == Some(old_child) {
            p.right = Some(new_child);
        }
    }
}
