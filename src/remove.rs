//! Removal: retires a netmask tag, then collapses the tree back down if
//! that was the last tenant at its key.

use crate::af::{AddressFamily, GENERIC_NETMASK};
use crate::arena::Arena;
use crate::bitops::{bit_test, chop};
use crate::node_id::NodeId;
use crate::propagation::find_netmask_ancestor;
use crate::tree::Tree;
use log::trace;

impl<A: AddressFamily, U> Tree<A, U> {
    /// Core of every `remove_*` entry point. Silent no-op if `stream` /
    /// `netmask` don't name a stored entry.
    pub(crate) fn remove_core(&mut self, stream: &[u8], bitlen: u8, netmask: u8) {
        let Some(root) = self.root else { return };

        let mut canon = stream[..(bitlen / 8) as usize].to_vec();
        chop(&mut canon, bitlen);

        // Descend strictly by the Patricia rule.
        let mut cur = root;
        loop {
            let n = self.arena.retrieve_node(cur);
            if n.bit as u16 >= bitlen as u16 {
                break;
            }
            let next = if bit_test(&canon, n.bit) { n.right } else { n.left };
            match next {
                Some(nx) => cur = nx,
                None => return,
            }
        }

        let node = self.arena.retrieve_node(cur);
        if node.bit != bitlen {
            return;
        }
        let Some(prefix) = node.prefix.as_ref() else {
            return;
        };
        if !prefix.stream_eq(&canon) || !prefix.contains_netmask(netmask) {
            return;
        }

        // Multi-tenant: drop just this UserData entry.
        if prefix.users.len() > 1 {
            let user = self
                .arena
                .retrieve_node_mut(cur)
                .prefix
                .as_mut()
                .unwrap()
                .remove_netmask(netmask)
                .expect("checked above");
            self.run_destructor(user);
            if netmask != GENERIC_NETMASK && netmask < bitlen {
                if let Some(target) = find_netmask_ancestor(&self.arena, cur, netmask) {
                    self.arena.retrieve_node_mut(target).unregister_netmask(netmask);
                }
            }
            trace!("remove: dropped netmask {netmask} from multi-tenant {cur:?}");
            return;
        }

        // Sole tenant: drop the prefix entirely.
        let user = self
            .arena
            .retrieve_node_mut(cur)
            .prefix
            .as_mut()
            .unwrap()
            .remove_netmask(netmask)
            .expect("checked above");
        self.run_destructor(user);
        self.arena.retrieve_node_mut(cur).prefix = None;

        let has_children = {
            let n = self.arena.retrieve_node(cur);
            n.left.is_some() || n.right.is_some()
        };
        if has_children {
            // An overhang node (only reachable via the strict-prefix
            // insertion case) demotes to a plain interior node; the
            // subtree below it is untouched.
            trace!("remove: demoted overhang node {cur:?} to interior");
            return;
        }

        self.collapse_after_removal(cur);
    }

    /// Physically unlink a now-empty leaf `node` and collapse its former
    /// parent into `node`'s sibling if the parent was a two-child interior
    /// node.
    fn collapse_after_removal(&mut self, node: NodeId) {
        if self.root == Some(node) {
            self.arena.release_node(node);
            self.root = None;
            trace!("remove: root collapsed to empty tree");
            return;
        }

        let parent = self
            .arena
            .retrieve_node(node)
            .parent
            .expect("non-root node has a parent");
        let p = self.arena.retrieve_node(parent);
        let sibling = if p.left == Some(node) { p.right } else { p.left };

        match sibling {
            Some(sib) => {
                // Standard two-child collapse: parent disappears, sibling
                // takes its place, parent's propagation list moves along.
                let grandparent = self.arena.retrieve_node(parent).parent;
                self.arena.retrieve_node_mut(sib).parent = grandparent;
                self.reparent_child(grandparent, parent, sib);
                if self.root == Some(parent) {
                    self.root = Some(sib);
                }
                let moved = std::mem::take(&mut self.arena.retrieve_node_mut(parent).netmasks);
                self.arena.retrieve_node_mut(sib).transfer_netmasks(moved);

                debug_assert!(self.arena.retrieve_node(parent).prefix.is_none());
                self.arena.release_node(parent);
                self.arena.release_node(node);
                trace!("remove: collapsed {parent:?}, {sib:?} takes its place");
            }
            None => {
                // Only reachable via the generic-key overhang case: the
                // parent itself carried a prefix and had `node` as its
                // only child. Just detach the child pointer.
                let p_mut = self.arena.retrieve_node_mut(parent);
                if p_mut.left == Some(node) {
                    p_mut.left = None;
                } else {
                    p_mut.right = None;
                }
                self.arena.release_node(node);
                trace!("remove: detached {node:?} from overhang parent {parent:?}");

                let parent_is_empty = {
                    let p = self.arena.retrieve_node(parent);
                    p.prefix.is_none() && p.left.is_none() && p.right.is_none()
                };
                if parent_is_empty {
                    // A dangling childless, prefix-less node should never
                    // arise for fixed-width keys; collapse it defensively
                    // for the variable-length generic-key path.
                    if self.root == Some(parent) {
                        self.root = None;
                    } else if let Some(gp) = self.arena.retrieve_node(parent).parent {
                        self.reparent_to_none(gp, parent);
                    }
                    self.arena.release_node(parent);
                }
            }
        }
    }

    fn reparent_child(&mut self, parent: Option<NodeId>, old_child: NodeId, new_child: NodeId) {
        let Some(parent) = parent else { return };
        let p = self.arena.retrieve_node_mut(parent);
        if p.left == Some(old_child) {
            p.left = Some(new_child);
        } else if p.right == Some(old_child) {
            p.right = Some(new_child);
        }
    }

    fn reparent_to_none(&mut self, parent: NodeId, child: NodeId) {
        let p = self.arena.retrieve_node_mut(parent);
        if p.left == Some(child) {
            p.left = None;
        } else if p.right == Some(child) {
            p.right = None;
        }
    }
}
