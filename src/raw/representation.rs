//! Node, color, and arena representation for the tree engine.
//!
//! Nodes live in an index-based arena and refer to each other through
//! [`NodeId`] handles instead of pointers. Erased slots are chained into a
//! free list and reused by later allocations, so a long-lived map does not
//! grow its arena past its high-water mark.

use core::cmp::Ordering;

/// Color tag carried by every node.
///
/// A freshly allocated node is always [`Color::Red`]; the insertion unwind
/// is responsible for restoring the coloring invariants afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Color {
    Red,
    Black,
}

/// Handle to an occupied slot in a [`NodeArena`].
///
/// A `NodeId` is only meaningful together with the arena that produced it,
/// and only until that slot is freed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NodeId(u32);

impl NodeId {
    fn index(self) -> usize {
        self.0 as usize
    }
}

/// A single tree node: two child links, a color, and the owned key/value
/// payload buffers.
#[derive(Debug, Clone)]
pub(crate) struct Node {
    pub(crate) left: Option<NodeId>,
    pub(crate) right: Option<NodeId>,
    pub(crate) color: Color,
    pub(crate) key: Box<[u8]>,
    pub(crate) val: Box<[u8]>,
}

#[derive(Debug, Clone)]
enum Slot {
    Occupied(Node),
    Vacant { next_free: Option<NodeId> },
}

/// Arena of node slots with free-list reuse.
#[derive(Debug, Clone)]
pub(crate) struct NodeArena {
    slots: Vec<Slot>,
    free_head: Option<NodeId>,
    num_occupied: usize,
}

impl NodeArena {
    pub(crate) fn new() -> Self {
        NodeArena {
            slots: Vec::new(),
            free_head: None,
            num_occupied: 0,
        }
    }

    /// Number of live nodes in the arena.
    pub(crate) fn len(&self) -> usize {
        self.num_occupied
    }

    /// Allocate a red node with empty links holding the given payload.
    pub(crate) fn allocate(&mut self, key: Box<[u8]>, val: Box<[u8]>) -> NodeId {
        let node = Node {
            left: None,
            right: None,
            color: Color::Red,
            key,
            val,
        };
        self.num_occupied += 1;
        match self.free_head {
            Some(id) => {
                self.free_head = match self.slots[id.index()] {
                    Slot::Vacant { next_free } => next_free,
                    Slot::Occupied(_) => unreachable!("free list points at an occupied slot"),
                };
                self.slots[id.index()] = Slot::Occupied(node);
                id
            },
            None => {
                let raw = u32::try_from(self.slots.len())
                    .expect("arena exceeded the u32 index space");
                self.slots.push(Slot::Occupied(node));
                NodeId(raw)
            },
        }
    }

    /// Release the slot back to the free list, returning the node it held.
    ///
    /// The caller must have already detached the node from the tree; the
    /// payload buffers drop with the returned [`Node`].
    pub(crate) fn free(&mut self, id: NodeId) -> Node {
        let slot = core::mem::replace(
            &mut self.slots[id.index()],
            Slot::Vacant {
                next_free: self.free_head,
            },
        );
        match slot {
            Slot::Occupied(node) => {
                self.free_head = Some(id);
                self.num_occupied -= 1;
                node
            },
            Slot::Vacant { next_free } => {
                // Undo the replacement so a double free does not corrupt the
                // free list before the panic below surfaces.
                self.slots[id.index()] = Slot::Vacant { next_free };
                panic!("freed a vacant arena slot: {id:?}")
            },
        }
    }

    pub(crate) fn node(&self, id: NodeId) -> &Node {
        match &self.slots[id.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("no live node at {id:?}"),
        }
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> &mut Node {
        match &mut self.slots[id.index()] {
            Slot::Occupied(node) => node,
            Slot::Vacant { .. } => panic!("no live node at {id:?}"),
        }
    }

    pub(crate) fn left(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).left
    }

    pub(crate) fn set_left(&mut self, id: NodeId, left: Option<NodeId>) {
        self.node_mut(id).left = left;
    }

    pub(crate) fn right(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).right
    }

    pub(crate) fn set_right(&mut self, id: NodeId, right: Option<NodeId>) {
        self.node_mut(id).right = right;
    }

    pub(crate) fn color(&self, id: NodeId) -> Color {
        self.node(id).color
    }

    pub(crate) fn set_color(&mut self, id: NodeId, color: Color) {
        self.node_mut(id).color = color;
    }

    /// Whether the link points at a red node. The empty link counts as
    /// black.
    pub(crate) fn is_red(&self, link: Option<NodeId>) -> bool {
        link.is_some_and(|id| self.color(id) == Color::Red)
    }

    /// Rotate the subtree rooted at `node` to the left and return the new
    /// subtree root (the former right child). The caller relinks the result
    /// into the parent.
    pub(crate) fn rotate_left(&mut self, node: NodeId) -> NodeId {
        let pivot = self.right(node).expect("rotate_left requires a right child");
        self.set_right(node, self.left(pivot));
        self.set_left(pivot, Some(node));
        pivot
    }

    /// Mirror image of [`NodeArena::rotate_left`].
    pub(crate) fn rotate_right(&mut self, node: NodeId) -> NodeId {
        let pivot = self.left(node).expect("rotate_right requires a left child");
        self.set_left(node, self.right(pivot));
        self.set_right(pivot, Some(node));
        pivot
    }
}

/// A red-black tree over `u32`-indexed slots holds at most `u32::MAX` nodes,
/// and its height is bounded by twice the binary log of the node count, so a
/// descent never records more than 64 entries.
pub(crate) const MAX_DEPTH: usize = (u32::BITS as usize) * 2;

/// One recorded step of a descent: the node visited and the direction taken
/// away from it ([`Ordering::Less`] went left, anything else went right).
#[derive(Debug, Clone, Copy)]
pub(crate) struct PathEntry {
    pub(crate) node: NodeId,
    pub(crate) ordering: Ordering,
}

/// Bounded stack of [`PathEntry`] values recorded while winding down the
/// tree, consumed while unwinding back up.
pub(crate) struct TreePath {
    entries: [PathEntry; MAX_DEPTH],
    len: usize,
}

impl TreePath {
    const EMPTY_ENTRY: PathEntry = PathEntry {
        node: NodeId(0),
        ordering: Ordering::Equal,
    };

    pub(crate) fn new() -> Self {
        TreePath {
            entries: [Self::EMPTY_ENTRY; MAX_DEPTH],
            len: 0,
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.len
    }

    pub(crate) fn push(&mut self, node: NodeId, ordering: Ordering) {
        self.entries[self.len] = PathEntry { node, ordering };
        self.len += 1;
    }

    pub(crate) fn pop(&mut self) -> Option<PathEntry> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.entries[self.len])
    }

    pub(crate) fn node(&self, index: usize) -> NodeId {
        debug_assert!(index < self.len);
        self.entries[index].node
    }

    pub(crate) fn ordering(&self, index: usize) -> Ordering {
        debug_assert!(index < self.len);
        self.entries[index].ordering
    }

    pub(crate) fn set_node(&mut self, index: usize, node: NodeId) {
        debug_assert!(index < self.len);
        self.entries[index].node = node;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(byte: u8) -> (Box<[u8]>, Box<[u8]>) {
        (Box::from([byte]), Box::from([byte]))
    }

    #[test]
    fn fresh_node_is_red_with_empty_links() {
        let mut arena = NodeArena::new();
        let (key, val) = payload(1);
        let id = arena.allocate(key, val);

        assert_eq!(arena.color(id), Color::Red);
        assert_eq!(arena.left(id), None);
        assert_eq!(arena.right(id), None);
        assert_eq!(arena.len(), 1);
    }

    #[test]
    fn freed_slots_are_reused_in_lifo_order() {
        let mut arena = NodeArena::new();
        let ids: Vec<_> = (0..4u8)
            .map(|b| {
                let (key, val) = payload(b);
                arena.allocate(key, val)
            })
            .collect();

        let second = arena.free(ids[1]);
        assert_eq!(second.key.as_ref(), &[1]);
        arena.free(ids[3]);
        assert_eq!(arena.len(), 2);

        let (key, val) = payload(9);
        assert_eq!(arena.allocate(key, val), ids[3]);
        let (key, val) = payload(10);
        assert_eq!(arena.allocate(key, val), ids[1]);
        assert_eq!(arena.len(), 4);
    }

    #[test]
    #[should_panic(expected = "freed a vacant arena slot")]
    fn double_free_panics() {
        let mut arena = NodeArena::new();
        let (key, val) = payload(1);
        let id = arena.allocate(key, val);
        arena.free(id);
        arena.free(id);
    }

    #[test]
    fn rotations_permute_the_three_links() {
        let mut arena = NodeArena::new();
        let (key, val) = payload(2);
        let root = arena.allocate(key, val);
        let (key, val) = payload(3);
        let right = arena.allocate(key, val);
        let (key, val) = payload(1);
        let inner = arena.allocate(key, val);

        arena.set_right(root, Some(right));
        arena.set_left(right, Some(inner));

        let pivot = arena.rotate_left(root);
        assert_eq!(pivot, right);
        assert_eq!(arena.left(pivot), Some(root));
        assert_eq!(arena.right(root), Some(inner));

        let back = arena.rotate_right(pivot);
        assert_eq!(back, root);
        assert_eq!(arena.right(root), Some(right));
        assert_eq!(arena.left(right), Some(inner));
    }

    #[test]
    fn tree_path_pushes_and_pops_in_stack_order() {
        let mut arena = NodeArena::new();
        let (key, val) = payload(0);
        let a = arena.allocate(key, val);
        let (key, val) = payload(1);
        let b = arena.allocate(key, val);

        let mut path = TreePath::new();
        assert!(path.pop().is_none());

        path.push(a, Ordering::Less);
        path.push(b, Ordering::Greater);
        assert_eq!(path.len(), 2);
        assert_eq!(path.node(0), a);
        assert_eq!(path.ordering(1), Ordering::Greater);

        path.set_node(0, b);
        assert_eq!(path.node(0), b);

        let top = path.pop().expect("two entries were pushed");
        assert_eq!(top.node, b);
        assert_eq!(top.ordering, Ordering::Greater);
        assert_eq!(path.len(), 1);
    }
}
