//! Shared ancestor search for the netmask propagation list.
//!
//! Both insertion (registering a new netmask) and removal (retiring one)
//! need to find the *same* unique node for a given `(start, netmask)`
//! pair: the first ancestor, climbing from `start` towards the root, whose
//! subtree is entirely inside the `netmask`-bit netblock. That target is
//! deterministic, so both call sites go through this one search.

use crate::arena::Arena;
use crate::node_id::NodeId;

/// First ancestor of (and including) `start`, climbing towards the root,
/// whose own discriminator bit still lies inside the netblock named by
/// `netmask` — i.e. the deepest node whose subtree is entirely covered by
/// that netmask.
///
/// `netmask == 0` names the whole address space, which every node's
/// subtree is trivially inside, so it always resolves straight to the
/// root rather than through the `bit + 1` comparison below (that
/// comparison can never hold for `netmask == 0` since `node.bit + 1` is
/// always at least 1).
pub(crate) fn find_netmask_ancestor<U>(
    arena: &Arena<U>,
    start: NodeId,
    netmask: u8,
) -> Option<NodeId> {
    if netmask == 0 {
        let mut cur = start;
        loop {
            match arena.retrieve_node(cur).parent {
                Some(parent) => cur = parent,
                None => return Some(cur),
            }
        }
    }

    let mut cur = Some(start);
    while let Some(id) = cur {
        let n = arena.retrieve_node(id);
        if netmask as u16 >= n.bit as u16 + 1 {
            return Some(id);
        }
        cur = n.parent;
    }
    None
}
