//! A convenience pair of trees covering both IP address families.

use crate::af::{Ipv4, Ipv6};
use crate::tree::Tree;

/// Bundles one IPv4 and one IPv6 [`Tree`] under the same payload type,
/// mirroring how callers typically keep a routing table: two independent
/// lookup structures, queried by whichever family a given address belongs
/// to.
pub struct PrefixStore<U> {
    pub v4: Tree<Ipv4, U>,
    pub v6: Tree<Ipv6, U>,
}

impl<U> Default for PrefixStore<U> {
    fn default() -> Self {
        Self::new()
    }
}

impl<U> PrefixStore<U> {
    pub fn new() -> Self {
        PrefixStore {
            v4: Tree::new(),
            v6: Tree::new(),
        }
    }
}

impl<U: 'static> PrefixStore<U> {
    /// Like [`PrefixStore::new`], but each tree runs its own destructor
    /// over every payload it drops or has explicitly removed.
    pub fn with_destructors(
        v4_destructor: impl FnMut(U) + 'static,
        v6_destructor: impl FnMut(U) + 'static,
    ) -> Self {
        PrefixStore {
            v4: Tree::with_destructor(v4_destructor),
            v6: Tree::with_destructor(v6_destructor),
        }
    }
}
