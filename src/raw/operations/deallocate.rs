use crate::raw::{NodeArena, NodeId};

/// Tear down the whole subtree under `root`, returning every slot to the
/// arena free list and dropping each node's key/value buffers.
///
/// Uses an explicit work stack instead of recursing over the tree shape, so
/// the call depth stays constant regardless of the subtree's height. Each
/// node is detached (its links taken over by the stack) before its slot is
/// released.
pub(crate) fn deallocate_subtree(arena: &mut NodeArena, root: NodeId) {
    let mut stack = Vec::new();

    stack.push(root);

    while let Some(id) = stack.pop() {
        let node = arena.free(id);
        if let Some(left) = node.left {
            stack.push(left);
        }
        if let Some(right) = node.right {
            stack.push(right);
        }
    }
}
