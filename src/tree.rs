//! The public `Tree<A, U>` type: lifecycle and the family-specific entry
//! points built on top of the shared insert/remove/lookup core.

use std::marker::PhantomData;
use std::net::{Ipv4Addr, Ipv6Addr};

use crate::af::{AddressFamily, Generic, Ipv4, Ipv6, GENERIC_NETMASK};
use crate::arena::Arena;
use crate::errors::Result;
use crate::node_id::NodeId;

/// A binary Patricia trie over fixed-width keys of one [`AddressFamily`],
/// storing a netmask-tagged list of `U` payloads at each distinct key.
///
/// `Tree<Ipv4, U>` and `Tree<Ipv6, U>` are the two sanctioned instantiations
/// for routing lookups; `Tree<Generic, U>` accepts arbitrary byte-string
/// keys of caller-chosen bit-length through the `*_generic` entry points.
pub struct Tree<A: AddressFamily, U> {
    pub(crate) root: Option<NodeId>,
    pub(crate) arena: Arena<U>,
    destructor: Option<Box<dyn FnMut(U)>>,
    _af: PhantomData<A>,
}

impl<A: AddressFamily, U> Default for Tree<A, U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: AddressFamily, U> Tree<A, U> {
    pub fn new() -> Self {
        Tree {
            root: None,
            arena: Arena::new(),
            destructor: None,
            _af: PhantomData,
        }
    }

    /// Like [`Tree::new`], but `destructor` runs over every payload removed
    /// from the tree, whether by an explicit `remove_*` call or by the
    /// tree being dropped with entries still in it.
    pub fn with_destructor(destructor: impl FnMut(U) + 'static) -> Self {
        Tree {
            root: None,
            arena: Arena::new(),
            destructor: Some(Box::new(destructor)),
            _af: PhantomData,
        }
    }

    pub fn len(&self) -> usize {
        self.arena.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    pub(crate) fn run_destructor(&mut self, user: U) {
        if let Some(d) = self.destructor.as_mut() {
            d(user);
        }
    }
}

impl<A: AddressFamily, U> Drop for Tree<A, U> {
    /// Iterative post-order teardown, so a tree holding a long unbalanced
    /// chain of entries doesn't blow the stack on drop. Runs the
    /// destructor, if any, over every surviving payload.
    fn drop(&mut self) {
        let Some(root) = self.root.take() else { return };
        let mut stack = vec![root];
        while let Some(id) = stack.pop() {
            let node = self.arena.release_node(id);
            if let Some(l) = node.left {
                stack.push(l);
            }
            if let Some(r) = node.right {
                stack.push(r);
            }
            if let Some(prefix) = node.prefix {
                for entry in prefix.users {
                    self.run_destructor(entry.user);
                }
            }
        }
    }
}

impl<U> Tree<Generic, U> {
    /// Insert `stream` (at least `(bitlen + 7) / 8` bytes) under `user`,
    /// tagged with the [`GENERIC_NETMASK`] sentinel since a generic key
    /// carries no CIDR-length concept of its own.
    pub fn add_generic(&mut self, stream: &[u8], bitlen: u8, user: U) -> Result<()> {
        self.add_core(stream, bitlen, user, GENERIC_NETMASK)?;
        Ok(())
    }

    pub fn remove_generic(&mut self, stream: &[u8], bitlen: u8) {
        self.remove_core(stream, bitlen, GENERIC_NETMASK);
    }

    pub fn find_exact_generic(&self, stream: &[u8], bitlen: u8) -> Option<&U> {
        self.find_tagged_core(stream, bitlen, GENERIC_NETMASK)
            .map(|(_, u)| u)
    }
}

impl<U> Tree<Ipv4, U> {
    /// Insert a host entry: `addr` tagged with netmask 32.
    pub fn add_ipv4(&mut self, addr: Ipv4Addr, user: U) -> Result<()> {
        self.add_core(&addr.octets(), Ipv4::BITS, user, Ipv4::BITS)?;
        Ok(())
    }

    /// Insert a netblock: `addr` masked to `prefix_len` bits, tagged with
    /// `prefix_len` as its netmask.
    pub fn add_ipv4_net(&mut self, addr: Ipv4Addr, prefix_len: u8, user: U) -> Result<()> {
        self.add_core(&addr.octets(), Ipv4::BITS, user, prefix_len)?;
        Ok(())
    }

    pub fn remove_ipv4(&mut self, addr: Ipv4Addr) {
        self.remove_core(&addr.octets(), Ipv4::BITS, Ipv4::BITS);
    }

    pub fn remove_ipv4_net(&mut self, addr: Ipv4Addr, prefix_len: u8) {
        self.remove_core(&addr.octets(), Ipv4::BITS, prefix_len);
    }

    pub fn find_exact_ipv4(&self, addr: Ipv4Addr) -> Option<&U> {
        self.find_exact_core(&addr.octets(), Ipv4::BITS).map(|(_, u)| u)
    }

    /// Longest-prefix match for `addr`: the host entry if one exists,
    /// otherwise the most specific enclosing netblock.
    pub fn find_best_ipv4(&self, addr: Ipv4Addr) -> Option<&U> {
        self.find_best_core(&addr.octets(), Ipv4::BITS).map(|(_, u)| u)
    }
}

impl<U> Tree<Ipv6, U> {
    /// Insert a host entry: `addr` tagged with netmask 128.
    pub fn add_ipv6(&mut self, addr: Ipv6Addr, user: U) -> Result<()> {
        self.add_core(&addr.octets(), Ipv6::BITS, user, Ipv6::BITS)?;
        Ok(())
    }

    pub fn add_ipv6_net(&mut self, addr: Ipv6Addr, prefix_len: u8, user: U) -> Result<()> {
        self.add_core(&addr.octets(), Ipv6::BITS, user, prefix_len)?;
        Ok(())
    }

    pub fn remove_ipv6(&mut self, addr: Ipv6Addr) {
        self.remove_core(&addr.octets(), Ipv6::BITS, Ipv6::BITS);
    }

    pub fn remove_ipv6_net(&mut self, addr: Ipv6Addr, prefix_len: u8) {
        self.remove_core(&addr.octets(), Ipv6::BITS, prefix_len);
    }

    pub fn find_exact_ipv6(&self, addr: Ipv6Addr) -> Option<&U> {
        self.find_exact_core(&addr.octets(), Ipv6::BITS).map(|(_, u)| u)
    }

    pub fn find_best_ipv6(&self, addr: Ipv6Addr) -> Option<&U> {
        self.find_best_core(&addr.octets(), Ipv6::BITS).map(|(_, u)| u)
    }
}
