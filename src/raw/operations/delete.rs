use core::cmp::Ordering;

use crate::{
    compare::KeyComparator,
    raw::{Color, NodeArena, NodeId, TreePath},
};

/// Remove `node` from the tree rooted at `root`, returning the new root
/// (`None` when the last node was removed).
///
/// The path from the root down to `node` is rebuilt by comparing against the
/// node's key, regenerating the direction stack the rebalancing unwind
/// needs. When the node has a right subtree, the descent continues to its
/// leftmost descendant, the in-order successor, which is then spliced into
/// the node's structural position (links and color); the node itself drops
/// into the successor's old slot and becomes the one physically pruned, so
/// the payload removed is always the one that was asked for while the node
/// unlinked always has at most one child.
///
/// Pruning then falls into one of four cases:
///
///  - left child only: splice the child up and recolor it black,
///  - sole node of the tree: clear the root,
///  - red childless node: unlink it directly,
///  - black childless node: unwind the recorded path restoring the lost
///    black level (see [`rebalance_after_prune`]).
///
/// The pruned node's slot is released after it is fully detached.
pub(crate) fn remove(
    arena: &mut NodeArena,
    root: NodeId,
    comparator: KeyComparator,
    node: NodeId,
) -> Option<NodeId> {
    // Wind, comparing against the key of the node being removed.
    let mut path = TreePath::new();
    let mut current = Some(root);
    let mut target_index = None;
    while let Some(cur) = current {
        let ordering = comparator(arena.node(node).key.as_ref(), arena.node(cur).key.as_ref());
        match ordering {
            Ordering::Less => {
                path.push(cur, Ordering::Less);
                current = arena.left(cur);
            },
            Ordering::Greater => {
                path.push(cur, Ordering::Greater);
                current = arena.right(cur);
            },
            Ordering::Equal => {
                // Record the target with a rightward direction and keep
                // descending to the leftmost node of its right subtree, the
                // in-order successor.
                path.push(cur, Ordering::Greater);
                target_index = Some(path.len() - 1);
                current = arena.right(cur);
                while let Some(succ) = current {
                    path.push(succ, Ordering::Less);
                    current = arena.left(succ);
                }
                break;
            },
        }
    }
    let target_index = target_index.expect("the node to remove is reachable from the root");
    debug_assert_eq!(path.node(target_index), node);

    let top = path.len() - 1;
    let mut new_root = root;

    if path.node(top) != node {
        // Swap the node with its successor: the successor takes over the
        // node's links and color, the node takes the successor's color and
        // becomes the entry to prune at the bottom of the path.
        let successor = path.node(top);
        let successor_color = arena.color(successor);
        arena.set_color(successor, arena.color(node));
        arena.set_left(successor, arena.left(node));
        // When the successor is the node's own right child this makes the
        // successor its own right link; the unwind relinks that side before
        // it is ever followed.
        arena.set_right(successor, arena.right(node));
        arena.set_color(node, successor_color);
        path.set_node(target_index, successor);
        path.set_node(top, node);
        new_root = reparent(arena, &path, target_index, successor, new_root);
    } else {
        if let Some(left) = arena.left(node) {
            // No successor, but a left child: splice the child up. Recoloring
            // it black replaces the black level the spliced-out node
            // provided, so no further rebalancing is needed.
            debug_assert_eq!(arena.color(node), Color::Black);
            debug_assert_eq!(arena.color(left), Color::Red);
            arena.set_color(left, Color::Black);
            let new_root = reparent(arena, &path, top, left, new_root);
            arena.free(node);
            return Some(new_root);
        }
        if top == 0 {
            // The tree only contained this node.
            arena.free(node);
            return None;
        }
    }

    if arena.color(path.node(top)) == Color::Red {
        // Pruning a red childless node cannot change any black-height. Red
        // nodes lean left, so the parent reaches it through its left link.
        debug_assert_eq!(path.ordering(top - 1), Ordering::Less);
        arena.set_left(path.node(top - 1), None);
        arena.free(node);
        return Some(new_root);
    }

    let new_root = rebalance_after_prune(arena, &path, top, new_root);
    arena.free(node);
    Some(new_root)
}

/// Relink the rotated subtree root at `index` into its parent entry, or
/// return it as the new tree root when the entry has no parent.
fn reparent(
    arena: &mut NodeArena,
    path: &TreePath,
    index: usize,
    subtree: NodeId,
    root: NodeId,
) -> NodeId {
    if index == 0 {
        return subtree;
    }
    match path.ordering(index - 1) {
        Ordering::Less => arena.set_left(path.node(index - 1), Some(subtree)),
        _ => arena.set_right(path.node(index - 1), Some(subtree)),
    }
    root
}

/// Unwind the recorded path after pruning the black childless node at
/// `path[top]`, restoring the uniform black-height.
///
/// At every level one side of the current node is one black level short.
/// The case analysis keys on which side that is, the current node's color,
/// and the colors of the sibling's children. Every case but one restores
/// balance with at most two rotations and some recoloring and stops; the
/// sole case with both of the sibling's children black recolors and carries
/// the deficit one level up. If the path is exhausted the surviving node
/// becomes the root and is forced black.
fn rebalance_after_prune(
    arena: &mut NodeArena,
    path: &TreePath,
    top: usize,
    root: NodeId,
) -> NodeId {
    // The subtree (possibly empty) standing where the pruned node was.
    let mut child: Option<NodeId> = None;
    for index in (0..top).rev() {
        let pnode = path.node(index);
        match path.ordering(index) {
            Ordering::Less => {
                // The left side is short one black node.
                arena.set_left(pnode, child);
                let right = arena
                    .right(pnode)
                    .expect("the sibling of a pruned black node exists");
                let near = arena.left(right);
                if arena.color(pnode) == Color::Red {
                    let pivot = if arena.is_red(near) {
                        arena.set_color(pnode, Color::Black);
                        let turned = arena.rotate_right(right);
                        arena.set_right(pnode, Some(turned));
                        arena.rotate_left(pnode)
                    } else {
                        arena.rotate_left(pnode)
                    };
                    return reparent(arena, path, index, pivot, root);
                }
                if arena.is_red(near) {
                    let near = near.expect("a red link points at a node");
                    arena.set_color(near, Color::Black);
                    let turned = arena.rotate_right(right);
                    arena.set_right(pnode, Some(turned));
                    let pivot = arena.rotate_left(pnode);
                    return reparent(arena, path, index, pivot, root);
                }
                // Sibling and both of its children black: lean the subtree
                // left and carry the deficit one level up.
                arena.set_color(pnode, Color::Red);
                child = Some(arena.rotate_left(pnode));
            },
            _ => {
                // The right side is short one black node.
                arena.set_right(pnode, child);
                let left = arena
                    .left(pnode)
                    .expect("the sibling of a pruned black node exists");
                if arena.color(left) == Color::Red {
                    let left_right = arena
                        .right(left)
                        .expect("a red sibling has two black children");
                    let near = arena.left(left_right);
                    let pivot = if arena.is_red(near) {
                        let near = near.expect("a red link points at a node");
                        arena.set_color(near, Color::Black);
                        let upper = arena.rotate_right(pnode);
                        let turned = arena.rotate_right(pnode);
                        arena.set_right(upper, Some(turned));
                        arena.rotate_left(upper)
                    } else {
                        arena.set_color(left_right, Color::Red);
                        let turned = arena.rotate_right(pnode);
                        arena.set_color(turned, Color::Black);
                        turned
                    };
                    return reparent(arena, path, index, pivot, root);
                }
                if arena.color(pnode) == Color::Red {
                    let left_left = arena.left(left);
                    if arena.is_red(left_left) {
                        let left_left = left_left.expect("a red link points at a node");
                        arena.set_color(pnode, Color::Black);
                        arena.set_color(left, Color::Red);
                        arena.set_color(left_left, Color::Black);
                        let pivot = arena.rotate_right(pnode);
                        return reparent(arena, path, index, pivot, root);
                    }
                    // Trade the node's red for the sibling's: balance is
                    // restored without moving any link.
                    arena.set_color(left, Color::Red);
                    arena.set_color(pnode, Color::Black);
                    return root;
                }
                let left_left = arena.left(left);
                if arena.is_red(left_left) {
                    let left_left = left_left.expect("a red link points at a node");
                    arena.set_color(left_left, Color::Black);
                    let pivot = arena.rotate_right(pnode);
                    return reparent(arena, path, index, pivot, root);
                }
                // Everything black around the deficit: recolor the sibling
                // and carry the deficit one level up.
                arena.set_color(left, Color::Red);
                child = Some(pnode);
            },
        }
    }
    let new_root = child.expect("the unwind consumed a non-empty path");
    arena.set_color(new_root, Color::Black);
    new_root
}
