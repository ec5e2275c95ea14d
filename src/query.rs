//! Lookup: exact match, best match, and the netblock-search ascent that
//! powers best match.

use crate::af::AddressFamily;
use crate::bitops::{bit_test, chopped};
use crate::node_id::NodeId;
use crate::tree::Tree;

impl<A: AddressFamily, U> Tree<A, U> {
    /// Strict Patricia descent from `start`: follow `bit_test(key, bit)`
    /// at each node until a child would be null or the node's own `bit`
    /// reaches `bitlen` (the key's full width). Shared by every lookup
    /// and by the netblock-search re-descent.
    fn descend_from(&self, start: NodeId, key: &[u8], bitlen: u8) -> NodeId {
        let mut cur = start;
        loop {
            let n = self.arena.retrieve_node(cur);
            if n.bit as u16 >= bitlen as u16 {
                break;
            }
            let next = if bit_test(key, n.bit) { n.right } else { n.left };
            match next {
                Some(nx) => cur = nx,
                None => break,
            }
        }
        cur
    }

    /// Descend to the leaf named by `stream`/`bitlen` and return the user
    /// payload tagged with exactly `netmask`, if both the key and the tag
    /// are present. Used for `find_exact_generic`, where the stored tag is
    /// always [`crate::af::GENERIC_NETMASK`] rather than `bitlen` itself,
    /// so the host-vs-netblock convention `find_exact_core` relies on
    /// doesn't apply.
    pub(crate) fn find_tagged_core(&self, stream: &[u8], bitlen: u8, netmask: u8) -> Option<(NodeId, &U)> {
        let root = self.root?;
        let leaf = self.descend_from(root, stream, bitlen);
        let n = self.arena.retrieve_node(leaf);
        if n.bit != bitlen {
            return None;
        }
        let prefix = n.prefix.as_ref()?;
        if !prefix.stream_eq(stream) {
            return None;
        }
        let entry = prefix.users.iter().find(|u| u.netmask == netmask)?;
        Some((leaf, &entry.user))
    }

    /// Core of every `find_exact_*` entry point.
    pub(crate) fn find_exact_core(&self, stream: &[u8], bitlen: u8) -> Option<(NodeId, &U)> {
        let root = self.root?;
        let leaf = self.descend_from(root, stream, bitlen);
        let n = self.arena.retrieve_node(leaf);
        if n.bit != bitlen {
            return None;
        }
        let prefix = n.prefix.as_ref()?;
        if !prefix.stream_eq(stream) {
            return None;
        }
        let user = prefix.lookup_and_select_user(true)?;
        Some((leaf, user))
    }

    /// Core of `find_best_ipv4`/`find_best_ipv6`: first try the query's
    /// own leaf (relaxed — a non-host head entry is fine too), then climb
    /// and retry with each ancestor's propagated netmasks.
    pub(crate) fn find_best_core(&self, stream: &[u8], bitlen: u8) -> Option<(NodeId, &U)> {
        let root = self.root?;
        let leaf = self.descend_from(root, stream, bitlen);

        {
            let n = self.arena.retrieve_node(leaf);
            if n.bit == bitlen {
                if let Some(prefix) = n.prefix.as_ref() {
                    if prefix.stream_eq(stream) {
                        if let Some(user) = prefix.lookup_and_select_user(false) {
                            return Some((leaf, user));
                        }
                    }
                }
            }
        }

        self.netblock_search(leaf, stream, bitlen)
    }

    /// Ascend from `start` towards the root, retrying the query under
    /// each propagated netmask found along the way.
    fn netblock_search(&self, start: NodeId, stream: &[u8], bitlen: u8) -> Option<(NodeId, &U)> {
        let mut ascend = Some(start);
        while let Some(id) = ascend {
            let netmasks = self.arena.retrieve_node(id).netmasks.clone();
            for m in netmasks {
                let clipped = chopped(stream, m);
                let candidate = self.descend_from(id, &clipped, bitlen);
                let n = self.arena.retrieve_node(candidate);
                if n.bit == bitlen {
                    if let Some(prefix) = n.prefix.as_ref() {
                        if prefix.stream_eq(&clipped) {
                            if let Some(entry) = prefix.users.iter().find(|u| u.netmask == m) {
                                return Some((candidate, &entry.user));
                            }
                        }
                    }
                }
            }
            ascend = self.arena.retrieve_node(id).parent;
        }
        None
    }
}
