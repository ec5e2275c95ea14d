//! Prefix values and their netmask-tagged user payloads.

use crate::af::GENERIC_NETMASK;
use crate::errors::{Result, TrieError};

/// One `(netmask, user)` tag attached to a stored [`Prefix`].
///
/// A single stored key can carry several of these: an exact host entry
/// (`netmask == bitlen`) alongside one or more enclosing netblocks, or a
/// single generic entry tagged with [`GENERIC_NETMASK`].
#[derive(Debug, Clone)]
pub struct UserData<U> {
    pub netmask: u8,
    pub user: U,
}

/// An immutable key plus the netmask-tagged payloads stored against it.
///
/// `users` is always kept sorted by `netmask` in **descending** order with
/// no duplicate netmask values; this lets
/// [`Prefix::lookup_and_select_user`] find the head/second entry in O(1).
#[derive(Debug, Clone)]
pub struct Prefix<U> {
    pub stream: Box<[u8]>,
    pub bitlen: u8,
    pub users: Vec<UserData<U>>,
}

impl<U> Prefix<U> {
    /// Build a detached prefix holding a single `(netmask, user)` tag.
    ///
    /// `bitlen` must be a positive multiple of eight and `stream` must
    /// contain at least `bitlen / 8` bytes, otherwise `InvalidKey` is
    /// returned — this is the only error the insertion path can raise.
    pub fn new(stream: &[u8], bitlen: u8, netmask: u8, user: U) -> Result<Self> {
        if bitlen == 0 || bitlen % 8 != 0 {
            return Err(TrieError::InvalidKey);
        }
        let nbytes = (bitlen / 8) as usize;
        if stream.len() < nbytes {
            return Err(TrieError::InvalidKey);
        }
        Ok(Prefix {
            stream: stream[..nbytes].into(),
            bitlen,
            users: vec![UserData { netmask, user }],
        })
    }

    /// Insert a new `(netmask, user)` tag, preserving descending order.
    ///
    /// A duplicate netmask is a silent no-op: callers should check
    /// [`Prefix::contains_netmask`] first if they need to distinguish
    /// "already present" from "newly added".
    pub fn add_netmask(&mut self, netmask: u8, user: U) {
        if self.contains_netmask(netmask) {
            return;
        }
        let pos = self
            .users
            .iter()
            .position(|u| u.netmask < netmask)
            .unwrap_or(self.users.len());
        self.users.insert(pos, UserData { netmask, user });
    }

    /// Remove the UserData entry for `netmask`, if any, returning its
    /// payload so the caller's destructor (if configured) can run on it.
    pub fn remove_netmask(&mut self, netmask: u8) -> Option<U> {
        let pos = self.users.iter().position(|u| u.netmask == netmask)?;
        Some(self.users.remove(pos).user)
    }

    pub fn contains_netmask(&self, netmask: u8) -> bool {
        self.users.iter().any(|u| u.netmask == netmask)
    }

    /// Select the user payload for an exact-match or best-match query
    /// against this prefix.
    ///
    /// `exact`: succeed only if the head netmask equals `bitlen`.
    /// not `exact` (best-match inside a netblock): skip a head that is the
    /// exact-host entry in favour of the second (largest non-host) entry.
    pub fn lookup_and_select_user(&self, exact: bool) -> Option<&U> {
        let head = self.users.first()?;
        if exact {
            return if head.netmask == self.bitlen {
                Some(&head.user)
            } else {
                None
            };
        }
        if head.netmask == self.bitlen {
            self.users.get(1).map(|u| &u.user)
        } else {
            Some(&head.user)
        }
    }

    /// `true` if this prefix's stream equals `other` over all `bitlen`
    /// bits (used after a structural descent to confirm an actual match).
    pub fn stream_eq(&self, other: &[u8]) -> bool {
        self.stream.as_ref() == &other[..self.stream.len()]
    }

    pub fn is_generic(netmask: u8) -> bool {
        netmask == GENERIC_NETMASK
    }
}
