use core::cmp::Ordering;

use crate::{
    compare::KeyComparator,
    raw::{NodeArena, NodeId},
};

/// Walk from `root` looking for `key` under `comparator`.
///
/// Descends left on [`Ordering::Less`], right on [`Ordering::Greater`], and
/// stops at the first [`Ordering::Equal`] node. Reaching an empty link is a
/// miss. Performs no mutation and no allocation.
pub(crate) fn search(
    arena: &NodeArena,
    root: Option<NodeId>,
    comparator: KeyComparator,
    key: &[u8],
) -> Option<NodeId> {
    let mut current = root;
    while let Some(node) = current {
        current = match comparator(key, arena.node(node).key.as_ref()) {
            Ordering::Equal => return Some(node),
            Ordering::Less => arena.left(node),
            Ordering::Greater => arena.right(node),
        };
    }
    None
}
