use core::cmp::Ordering;
use std::{error::Error, fmt};

use crate::{
    raw::{Color, NodeId},
    ByteMap,
};

/// An issue with the well-formed-ness of a tree. See the documentation on
/// [`WellFormedChecker`] for the full list of checks.
///
/// Offending nodes are identified by a copy of their key bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MalformedTreeError {
    /// The root node is red.
    RedRoot,
    /// A red node has a red left child.
    RedRedViolation {
        /// Key of the red parent.
        parent_key: Box<[u8]>,
    },
    /// A red node hangs off a right link, which the left-leaning discipline
    /// never leaves behind between operations.
    RightLeaningViolation {
        /// Key of the node whose right child is red.
        parent_key: Box<[u8]>,
    },
    /// The two subtrees of a node disagree on their black-height.
    BlackHeightMismatch {
        /// Key of the node where the disagreement was observed.
        key: Box<[u8]>,
        /// Black-height of the left subtree.
        left_height: usize,
        /// Black-height of the right subtree.
        right_height: usize,
    },
    /// An in-order walk produced a key pair out of order (or equal) under
    /// the map's comparator.
    OrderViolation {
        /// The earlier key of the offending pair.
        previous_key: Box<[u8]>,
        /// The later key, which did not compare strictly greater.
        key: Box<[u8]>,
    },
    /// A node's key buffer does not match the map's key slot width.
    WrongKeyWidth {
        /// The map's key slot width.
        expected: usize,
        /// The width found on the node.
        found: usize,
    },
    /// A node's value buffer does not match the map's value slot width.
    WrongValueWidth {
        /// The map's value slot width.
        expected: usize,
        /// The width found on the node.
        found: usize,
    },
    /// The map's recorded entry count differs from the number of nodes
    /// reachable from the root.
    EntryCountMismatch {
        /// The count recorded on the map handle.
        recorded: usize,
        /// The number of nodes reached by walking the tree.
        reachable: usize,
    },
    /// The map's recorded entry count differs from the number of occupied
    /// arena slots, meaning slots leaked or were freed while still linked.
    SlotCountMismatch {
        /// The count recorded on the map handle.
        recorded: usize,
        /// The number of occupied arena slots.
        occupied: usize,
    },
}

impl fmt::Display for MalformedTreeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MalformedTreeError::RedRoot => {
                write!(f, "the root node is red")
            },
            MalformedTreeError::RedRedViolation { parent_key } => {
                write!(f, "red node {parent_key:?} has a red left child")
            },
            MalformedTreeError::RightLeaningViolation { parent_key } => {
                write!(f, "node {parent_key:?} has a red right child")
            },
            MalformedTreeError::BlackHeightMismatch {
                key,
                left_height,
                right_height,
            } => {
                write!(
                    f,
                    "node {key:?} has black-height {left_height} on the left but \
                     {right_height} on the right"
                )
            },
            MalformedTreeError::OrderViolation { previous_key, key } => {
                write!(
                    f,
                    "in-order walk produced {key:?} after {previous_key:?}, which does not \
                     compare strictly greater"
                )
            },
            MalformedTreeError::WrongKeyWidth { expected, found } => {
                write!(f, "key buffer is {found} bytes wide, expected {expected}")
            },
            MalformedTreeError::WrongValueWidth { expected, found } => {
                write!(f, "value buffer is {found} bytes wide, expected {expected}")
            },
            MalformedTreeError::EntryCountMismatch {
                recorded,
                reachable,
            } => {
                write!(
                    f,
                    "map records {recorded} entries but {reachable} nodes are reachable"
                )
            },
            MalformedTreeError::SlotCountMismatch { recorded, occupied } => {
                write!(
                    f,
                    "map records {recorded} entries but {occupied} arena slots are occupied"
                )
            },
        }
    }
}

impl Error for MalformedTreeError {}

/// Aggregate figures collected while checking a tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeStats {
    /// Number of nodes reachable from the root.
    pub num_entries: usize,
    /// Number of black nodes on any root-to-empty-link path.
    pub black_height: usize,
    /// Length of the longest root-to-node path, counting nodes.
    pub max_depth: usize,
}

/// Walks a whole [`ByteMap`] tree and verifies every structural invariant
/// the engine promises to maintain:
///
///  - strict binary-search-tree order and key uniqueness under the map's
///    comparator,
///  - a black root,
///  - no red node with a red left child and no red right children at all
///    (the left-leaning normal form),
///  - the same number of black nodes on every path from the root down to an
///    empty link,
///  - every key and value buffer matching the map's slot widths,
///  - the recorded entry count agreeing with both the reachable node count
///    and the occupied arena slot count.
pub struct WellFormedChecker<'a> {
    map: &'a ByteMap,
    previous_key: Option<&'a [u8]>,
    reachable: usize,
    max_depth: usize,
}

impl<'a> WellFormedChecker<'a> {
    /// Check `map`, returning collected [`TreeStats`] if the tree is well
    /// formed.
    pub fn check(map: &'a ByteMap) -> Result<TreeStats, MalformedTreeError> {
        let mut checker = WellFormedChecker {
            map,
            previous_key: None,
            reachable: 0,
            max_depth: 0,
        };

        let black_height = match map.root {
            Some(root) => {
                if map.arena.color(root) == Color::Red {
                    return Err(MalformedTreeError::RedRoot);
                }
                checker.check_subtree(root, 1)?
            },
            None => 0,
        };

        if checker.reachable != map.num_entries {
            return Err(MalformedTreeError::EntryCountMismatch {
                recorded: map.num_entries,
                reachable: checker.reachable,
            });
        }
        if map.arena.len() != map.num_entries {
            return Err(MalformedTreeError::SlotCountMismatch {
                recorded: map.num_entries,
                occupied: map.arena.len(),
            });
        }

        Ok(TreeStats {
            num_entries: checker.reachable,
            black_height,
            max_depth: checker.max_depth,
        })
    }

    /// Verify the subtree under `node`, returning its black-height.
    ///
    /// Recursion is acceptable here: this is a diagnostic pass over trees
    /// whose height the engine already bounds logarithmically.
    fn check_subtree(&mut self, node: NodeId, depth: usize) -> Result<usize, MalformedTreeError> {
        let arena = &self.map.arena;
        let key = arena.node(node).key.as_ref();

        let left_height = match arena.left(node) {
            Some(left) => {
                if arena.color(node) == Color::Red && arena.color(left) == Color::Red {
                    return Err(MalformedTreeError::RedRedViolation {
                        parent_key: Box::from(key),
                    });
                }
                self.check_subtree(left, depth + 1)?
            },
            None => 0,
        };

        let entry = self.map.arena.node(node);
        if entry.key.len() != self.map.key_size() {
            return Err(MalformedTreeError::WrongKeyWidth {
                expected: self.map.key_size(),
                found: entry.key.len(),
            });
        }
        if entry.val.len() != self.map.val_size() {
            return Err(MalformedTreeError::WrongValueWidth {
                expected: self.map.val_size(),
                found: entry.val.len(),
            });
        }
        if let Some(previous_key) = self.previous_key {
            if (self.map.comparator)(previous_key, entry.key.as_ref()) != Ordering::Less {
                return Err(MalformedTreeError::OrderViolation {
                    previous_key: Box::from(previous_key),
                    key: entry.key.clone(),
                });
            }
        }
        self.previous_key = Some(self.map.arena.node(node).key.as_ref());
        self.reachable += 1;
        self.max_depth = self.max_depth.max(depth);

        let arena = &self.map.arena;
        let right_height = match arena.right(node) {
            Some(right) => {
                if arena.color(right) == Color::Red {
                    return Err(MalformedTreeError::RightLeaningViolation {
                        parent_key: Box::from(arena.node(node).key.as_ref()),
                    });
                }
                self.check_subtree(right, depth + 1)?
            },
            None => 0,
        };

        if left_height != right_height {
            return Err(MalformedTreeError::BlackHeightMismatch {
                key: Box::from(self.map.arena.node(node).key.as_ref()),
                left_height,
                right_height,
            });
        }

        let own = usize::from(self.map.arena.color(node) == Color::Black);
        Ok(left_height + own)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexicographic, ByteMap};

    fn small_map(keys: &[u8]) -> ByteMap {
        let mut map = ByteMap::with_comparator(1, 1, lexicographic);
        for &k in keys {
            map.try_insert(Some(&[k]), Some(&[k]))
                .expect("keys are pairwise distinct");
        }
        map
    }

    #[test]
    fn empty_map_is_well_formed() {
        let map = ByteMap::new(4, 4);
        let stats = WellFormedChecker::check(&map).expect("empty tree is trivially well formed");
        assert_eq!(stats.num_entries, 0);
        assert_eq!(stats.black_height, 0);
        assert_eq!(stats.max_depth, 0);
    }

    #[test]
    fn built_trees_pass_the_checker() {
        let map = small_map(&[16, 8, 24, 4, 12, 20, 28, 2, 6]);
        let stats = WellFormedChecker::check(&map).expect("engine output is well formed");
        assert_eq!(stats.num_entries, 9);
        assert!(stats.black_height >= 2);
        assert!(stats.max_depth <= 2 * stats.black_height);
    }

    #[test]
    fn detects_a_red_root() {
        let mut map = small_map(&[1]);
        let root = map.root.expect("one entry present");
        map.arena.set_color(root, crate::raw::Color::Red);

        assert_eq!(
            WellFormedChecker::check(&map),
            Err(MalformedTreeError::RedRoot)
        );
    }

    #[test]
    fn detects_a_right_leaning_red_link() {
        let mut map = small_map(&[2, 1, 3]);
        let root = map.root.expect("three entries present");
        let right = map.arena.right(root).expect("right child present");
        map.arena.set_color(right, crate::raw::Color::Red);

        assert_eq!(
            WellFormedChecker::check(&map),
            Err(MalformedTreeError::RightLeaningViolation {
                parent_key: Box::from([2u8].as_slice()),
            })
        );
    }

    #[test]
    fn detects_a_black_height_mismatch() {
        let mut map = small_map(&[2, 1, 3]);
        let root = map.root.expect("three entries present");
        let left = map.arena.left(root).expect("left child present");
        // Orphan the left leaf: entry accounting and black-heights both
        // break; the walk trips on the black-height first.
        map.arena.set_left(root, None);
        let _ = left;

        assert!(matches!(
            WellFormedChecker::check(&map),
            Err(MalformedTreeError::BlackHeightMismatch { .. })
        ));
    }

    #[test]
    fn detects_an_order_violation() {
        let mut map = small_map(&[2, 1, 3]);
        let root = map.root.expect("three entries present");
        map.arena.node_mut(root).key = Box::from([9u8].as_slice());

        assert!(matches!(
            WellFormedChecker::check(&map),
            Err(MalformedTreeError::OrderViolation { .. })
        ));
    }

    #[test]
    fn detects_an_entry_count_mismatch() {
        let mut map = small_map(&[2, 1, 3]);
        map.num_entries = 5;

        assert_eq!(
            WellFormedChecker::check(&map),
            Err(MalformedTreeError::EntryCountMismatch {
                recorded: 5,
                reachable: 3,
            })
        );
    }
}
