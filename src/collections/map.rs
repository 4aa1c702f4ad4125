//! Module containing the implementation of [`ByteMap`] and its lookup
//! token.

use core::fmt::Debug;

use crate::{
    compare::{lexicographic, KeyComparator},
    raw::{deallocate_subtree, insert, remove, search, DuplicateKeyError, NodeArena, NodeId},
};

/// An ordered map of fixed-width byte keys to fixed-width byte values,
/// backed by a left-leaning red-black tree.
///
/// Every key is exactly [`key_size`](ByteMap::key_size) bytes and every
/// value exactly [`val_size`](ByteMap::val_size) bytes, both fixed for the
/// map's whole lifetime. Entries are ordered by the comparator supplied at
/// creation. Each map owns its nodes exclusively; no tree structure is ever
/// shared between maps, and [`Clone`] produces a fully independent copy.
///
/// # Examples
///
/// ```rust
/// use carmine::ByteMap;
///
/// let mut map = ByteMap::new(4, 4);
///
/// map.try_insert(Some(b"bike".as_slice()), Some(b"shed".as_slice()))
///     .unwrap();
/// map.try_insert(Some(b"dark".as_slice()), Some(b"room".as_slice()))
///     .unwrap();
///
/// assert_eq!(map.get(b"bike"), Some(b"shed".as_slice()));
/// assert_eq!(map.len(), 2);
/// ```
#[derive(Clone)]
pub struct ByteMap {
    /// Width in bytes of every key in this map.
    key_size: usize,
    /// Width in bytes of every value in this map.
    val_size: usize,
    /// Three-way ordering over raw key buffers.
    pub(crate) comparator: KeyComparator,
    /// The map's exclusively owned root link, if any entry is present.
    pub(crate) root: Option<NodeId>,
    /// Storage for all of this map's nodes.
    pub(crate) arena: NodeArena,
    /// The number of entries present in the tree.
    pub(crate) num_entries: usize,
}

/// The transient result of a point lookup on a [`ByteMap`].
///
/// A `Lookup` is a non-owning token: it stays meaningful only until the
/// next mutating operation (`try_insert`, `erase`, `remove`, `clear`) on
/// the map that produced it. Passing a stale token back to that map is
/// never memory-unsafe, but it may panic or address a different entry whose
/// node reused the same slot.
///
/// # Examples
///
/// ```rust
/// use carmine::ByteMap;
///
/// let mut map = ByteMap::new(1, 1);
/// map.try_insert(Some(&[1]), Some(&[10])).unwrap();
///
/// let hit = map.find(&[1]);
/// assert!(!hit.is_miss());
/// assert_eq!(map.value(hit), Some([10].as_slice()));
///
/// let miss = map.find(&[2]);
/// assert!(miss.is_miss());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lookup {
    pub(crate) node: Option<NodeId>,
}

impl Lookup {
    /// Returns `true` iff the lookup found no matching entry.
    pub fn is_miss(&self) -> bool {
        self.node.is_none()
    }
}

impl ByteMap {
    /// Create a new, empty map with the given key and value slot widths,
    /// ordered by the [`lexicographic`] comparator.
    ///
    /// This function will not pre-allocate anything.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use carmine::ByteMap;
    ///
    /// let map = ByteMap::new(8, 16);
    /// assert!(map.is_empty());
    /// assert_eq!(map.key_size(), 8);
    /// assert_eq!(map.val_size(), 16);
    /// ```
    pub fn new(key_size: usize, val_size: usize) -> Self {
        Self::with_comparator(key_size, val_size, lexicographic)
    }

    /// Create a new, empty map with the given slot widths and key
    /// comparator.
    ///
    /// The comparator must implement a strict total order over `key_size`
    /// wide buffers and is fixed for the map's lifetime.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use carmine::{u32_native, ByteMap};
    ///
    /// let mut map = ByteMap::with_comparator(4, 4, u32_native);
    ///
    /// // Numerically, 256 > 2 even though little-endian bytes say otherwise.
    /// map.try_insert(Some(&2u32.to_ne_bytes()), None).unwrap();
    /// map.try_insert(Some(&256u32.to_ne_bytes()), None).unwrap();
    /// assert!(!map.find(&256u32.to_ne_bytes()).is_miss());
    /// ```
    pub fn with_comparator(key_size: usize, val_size: usize, comparator: KeyComparator) -> Self {
        ByteMap {
            key_size,
            val_size,
            comparator,
            root: None,
            arena: NodeArena::new(),
            num_entries: 0,
        }
    }

    /// Width in bytes of every key in this map.
    pub fn key_size(&self) -> usize {
        self.key_size
    }

    /// Width in bytes of every value in this map.
    pub fn val_size(&self) -> usize {
        self.val_size
    }

    /// Returns the number of entries in the map.
    pub fn len(&self) -> usize {
        self.num_entries
    }

    /// Returns `true` iff the map holds no entries.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use carmine::ByteMap;
    ///
    /// let mut map = ByteMap::new(1, 1);
    /// assert!(map.is_empty());
    ///
    /// map.try_insert(Some(&[1]), None).unwrap();
    /// assert!(!map.is_empty());
    /// ```
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Insert a new entry, copying `key_size` bytes of key and `val_size`
    /// bytes of value into a newly owned node. A `None` buffer is
    /// zero-filled.
    ///
    /// If an entry with an equal key already exists the map is left
    /// completely unchanged and a [`DuplicateKeyError`] carrying the
    /// rejected key is returned.
    ///
    /// # Panics
    ///
    /// Panics if a provided buffer's length differs from the corresponding
    /// slot width.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use carmine::ByteMap;
    ///
    /// let mut map = ByteMap::new(1, 4);
    ///
    /// map.try_insert(Some(&[10]), Some(b"aaaa".as_slice())).unwrap();
    ///
    /// // Duplicate keys are rejected and the original value survives.
    /// let err = map.try_insert(Some(&[10]), Some(b"bbbb".as_slice()));
    /// assert!(err.is_err());
    /// assert_eq!(map.get(&[10]), Some(b"aaaa".as_slice()));
    ///
    /// // An omitted value is zero-filled.
    /// map.try_insert(Some(&[11]), None).unwrap();
    /// assert_eq!(map.get(&[11]), Some([0, 0, 0, 0].as_slice()));
    /// ```
    pub fn try_insert(
        &mut self,
        key: Option<&[u8]>,
        value: Option<&[u8]>,
    ) -> Result<(), DuplicateKeyError> {
        let key = fill_slot(key, self.key_size, "key");
        let value = fill_slot(value, self.val_size, "value");
        let new_root = insert(&mut self.arena, self.root, self.comparator, key, value)?;
        self.root = Some(new_root);
        self.num_entries += 1;
        Ok(())
    }

    /// Look up `key`, returning a [`Lookup`] token that is either a hit or
    /// a miss.
    ///
    /// The token is invalidated by the next mutating operation on this map;
    /// see [`Lookup`].
    ///
    /// # Panics
    ///
    /// Panics if `key` is not exactly [`key_size`](ByteMap::key_size) bytes
    /// wide.
    pub fn find(&self, key: &[u8]) -> Lookup {
        assert_eq!(
            key.len(),
            self.key_size,
            "lookup key must match the map's key width"
        );
        Lookup {
            node: search(&self.arena, self.root, self.comparator, key),
        }
    }

    /// Returns the key bytes behind a lookup token, or `None` for a miss.
    pub fn key(&self, lookup: Lookup) -> Option<&[u8]> {
        lookup.node.map(|node| self.arena.node(node).key.as_ref())
    }

    /// Returns the value bytes behind a lookup token, or `None` for a miss.
    pub fn value(&self, lookup: Lookup) -> Option<&[u8]> {
        lookup.node.map(|node| self.arena.node(node).val.as_ref())
    }

    /// Look up `key` and return its value bytes, or `None` if the key is
    /// absent.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not exactly [`key_size`](ByteMap::key_size) bytes
    /// wide.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use carmine::ByteMap;
    ///
    /// let mut map = ByteMap::new(2, 2);
    /// map.try_insert(Some(b"ab".as_slice()), Some(b"cd".as_slice())).unwrap();
    ///
    /// assert_eq!(map.get(b"ab"), Some(b"cd".as_slice()));
    /// assert_eq!(map.get(b"xy"), None);
    /// ```
    pub fn get(&self, key: &[u8]) -> Option<&[u8]> {
        self.value(self.find(key))
    }

    /// Erase the entry behind a lookup token, freeing its node. A miss
    /// token is silently a no-op.
    ///
    /// Returns `true` iff an entry was removed.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use carmine::ByteMap;
    ///
    /// let mut map = ByteMap::new(1, 1);
    /// map.try_insert(Some(&[1]), Some(&[10])).unwrap();
    ///
    /// assert!(map.erase(map.find(&[1])));
    /// assert!(map.find(&[1]).is_miss());
    ///
    /// // Erasing a miss does nothing.
    /// assert!(!map.erase(map.find(&[1])));
    /// ```
    pub fn erase(&mut self, lookup: Lookup) -> bool {
        let Some(node) = lookup.node else {
            return false;
        };
        let root = self.root.expect("a hit lookup implies a non-empty tree");
        self.root = remove(&mut self.arena, root, self.comparator, node);
        self.num_entries -= 1;
        true
    }

    /// Look up `key` and erase its entry if present.
    ///
    /// Returns `true` iff an entry was removed.
    ///
    /// # Panics
    ///
    /// Panics if `key` is not exactly [`key_size`](ByteMap::key_size) bytes
    /// wide.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use carmine::ByteMap;
    ///
    /// let mut map = ByteMap::new(1, 1);
    /// map.try_insert(Some(&[7]), None).unwrap();
    ///
    /// assert!(map.remove(&[7]));
    /// assert!(!map.remove(&[7]));
    /// assert!(map.is_empty());
    /// ```
    pub fn remove(&mut self, key: &[u8]) -> bool {
        self.erase(self.find(key))
    }

    /// Remove every entry from the map.
    ///
    /// Tears the whole tree down with an explicit work stack and returns
    /// every node slot to the arena free list; the arena keeps its capacity
    /// for later inserts.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use carmine::ByteMap;
    ///
    /// let mut map = ByteMap::new(1, 1);
    /// for k in 0..16u8 {
    ///     map.try_insert(Some(&[k]), None).unwrap();
    /// }
    ///
    /// map.clear();
    /// assert!(map.is_empty());
    /// assert!(map.find(&[4]).is_miss());
    /// ```
    pub fn clear(&mut self) {
        if let Some(root) = self.root.take() {
            deallocate_subtree(&mut self.arena, root);
        }
        self.num_entries = 0;
    }
}

/// Materialize one owned slot buffer, copying the caller's bytes or
/// zero-filling an omitted buffer.
fn fill_slot(buffer: Option<&[u8]>, width: usize, what: &str) -> Box<[u8]> {
    match buffer {
        Some(bytes) => {
            assert_eq!(
                bytes.len(),
                width,
                "{what} buffer must match the map's {what} width"
            );
            Box::from(bytes)
        },
        None => vec![0u8; width].into_boxed_slice(),
    }
}

impl Drop for ByteMap {
    fn drop(&mut self) {
        self.clear();
    }
}

impl Debug for ByteMap {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("ByteMap")
            .field("key_size", &self.key_size)
            .field("val_size", &self.val_size)
            .field("len", &self.num_entries)
            .finish_non_exhaustive()
    }
}
