use core::cmp::Ordering;
use std::{error::Error, fmt};

use crate::{
    compare::KeyComparator,
    raw::{Color, NodeArena, NodeId, PathEntry, TreePath},
};

/// The key of a rejected insert that collided with an existing entry.
///
/// The map is left completely unchanged when this error is reported: the
/// collision is detected while winding down the tree, before any node is
/// allocated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateKeyError {
    /// The key bytes that were already present in the map.
    pub key: Box<[u8]>,
}

impl fmt::Display for DuplicateKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "attempted to insert key {:?} which is already present in the map",
            self.key
        )
    }
}

impl Error for DuplicateKeyError {}

/// Insert a new node holding `key`/`val` into the tree rooted at `root`,
/// returning the new root.
///
/// Winds down from the root recording each visited node and the comparison
/// direction in a bounded [`TreePath`], attaches a fresh red node at the
/// first empty link, then unwinds the recorded path restoring the
/// left-leaning red-black invariants:
///
///  - a red left child whose own left child is also red is a forming 4-node;
///    the grandchild is recolored black and the current node rotated right,
///  - a red right child next to a red left child is split by a color flip,
///    pushing the possible violation one level up,
///  - a red right child next to a black left child is rotated back onto the
///    left side, preserving the subtree's incoming color.
///
/// If the unwind consumes the whole path, the final node becomes the tree
/// root and is forced black. The tree height grows by at most one level.
pub(crate) fn insert(
    arena: &mut NodeArena,
    root: Option<NodeId>,
    comparator: KeyComparator,
    key: Box<[u8]>,
    val: Box<[u8]>,
) -> Result<NodeId, DuplicateKeyError> {
    // Wind.
    let mut path = TreePath::new();
    let mut current = root;
    while let Some(node) = current {
        let ordering = comparator(key.as_ref(), arena.node(node).key.as_ref());
        if ordering == Ordering::Equal {
            return Err(DuplicateKeyError { key });
        }
        path.push(node, ordering);
        current = match ordering {
            Ordering::Less => arena.left(node),
            _ => arena.right(node),
        };
    }

    let mut attached = arena.allocate(key, val);

    // Unwind.
    while let Some(PathEntry { node, ordering }) = path.pop() {
        let mut cnode = node;
        match ordering {
            Ordering::Less => {
                arena.set_left(cnode, Some(attached));
                if arena.color(attached) == Color::Black {
                    return Ok(root.expect("a recorded path implies a non-empty tree"));
                }
                let leftleft = arena.left(attached);
                if arena.is_red(leftleft) {
                    // Fix up 4-node.
                    let leftleft = leftleft.expect("a red link points at a node");
                    arena.set_color(leftleft, Color::Black);
                    cnode = arena.rotate_right(cnode);
                }
            },
            _ => {
                arena.set_right(cnode, Some(attached));
                if arena.color(attached) == Color::Black {
                    return Ok(root.expect("a recorded path implies a non-empty tree"));
                }
                let left = arena.left(cnode);
                if arena.is_red(left) {
                    // Split 4-node.
                    let left = left.expect("a red link points at a node");
                    arena.set_color(left, Color::Black);
                    arena.set_color(attached, Color::Black);
                    arena.set_color(cnode, Color::Red);
                } else {
                    // Lean left.
                    let carried = arena.color(cnode);
                    let pivot = arena.rotate_left(cnode);
                    arena.set_color(pivot, carried);
                    arena.set_color(cnode, Color::Red);
                    cnode = pivot;
                }
            },
        }
        attached = cnode;
    }

    // The unwind consumed the whole path: the surviving node is the root.
    arena.set_color(attached, Color::Black);
    Ok(attached)
}
