//! Address-family markers.
//!
//! The trie core (`Tree<A, U>`) works on opaque byte streams and never
//! needs to know whether those bytes are an IPv4 address, an IPv6 address
//! or something else entirely. `AddressFamily` exists purely to let the
//! convenience entry points in [`crate::tree`] fix the host bit-length and
//! render a stream for `Debug`/`Display` without duplicating the walk,
//! insert and remove algorithms once per family.

use std::net::{Ipv4Addr, Ipv6Addr};

/// Host bit-length and formatting for one flavour of fixed-width key.
///
/// Implemented for [`Ipv4`] and [`Ipv6`]; a tree instance is always
/// monomorphized over exactly one `AddressFamily`, which is what gives us
/// "no variable-bit-length keys within a single trie instance" for free
/// from the type system rather than from a runtime check.
pub trait AddressFamily: Copy + Clone + std::fmt::Debug {
    /// Number of bits in a host route for this family (32 for IPv4, 128
    /// for IPv6). Equal to the netmask of an exact-match ("host") entry.
    const BITS: u8;

    /// Number of bytes in a host route for this family.
    const BYTES: usize = (Self::BITS / 8) as usize;

    /// Render a big-endian byte stream of `BYTES` bytes for diagnostics.
    fn fmt_net(stream: &[u8]) -> String;
}

/// IPv4 address family: 32-bit, 4-byte, big-endian streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv4;

impl AddressFamily for Ipv4 {
    const BITS: u8 = 32;

    fn fmt_net(stream: &[u8]) -> String {
        let mut octets = [0u8; 4];
        octets.copy_from_slice(&stream[..4]);
        Ipv4Addr::from(octets).to_string()
    }
}

/// IPv6 address family: 128-bit, 16-byte, big-endian streams.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ipv6;

impl AddressFamily for Ipv6 {
    const BITS: u8 = 128;

    fn fmt_net(stream: &[u8]) -> String {
        let mut octets = [0u8; 16];
        octets.copy_from_slice(&stream[..16]);
        Ipv6Addr::from(octets).to_string()
    }
}

/// Marker for a tree of generic byte-string keys whose bit-length is fixed
/// per instance by convention of the caller rather than by this type (the
/// `BITS`/`fmt_net` machinery is unused for this family; generic keys are
/// always driven through `add_generic`/`find_exact_generic`/`remove_generic`,
/// which take the bit-length as an explicit argument).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Generic;

impl AddressFamily for Generic {
    const BITS: u8 = 0;

    fn fmt_net(stream: &[u8]) -> String {
        stream.iter().map(|b| format!("{b:02x}")).collect()
    }
}

/// Sentinel netmask marking a "generic", non-IP key.
///
/// A host route's netmask equals the family's `BITS`; this value never
/// collides with a real netmask because both IPv4 (32) and IPv6 (128)
/// host lengths are well below it.
pub const GENERIC_NETMASK: u8 = 255;
