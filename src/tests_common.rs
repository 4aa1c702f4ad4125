//! Utilities for testing and benchmarking. Not public API.

use crate::{u32_native, ByteMap};

/// Encode an integer (or any other plain-old-data value) as a key or value
/// buffer.
pub fn int_key<T: bytemuck::Pod>(value: T) -> Vec<u8> {
    bytemuck::bytes_of(&value).to_vec()
}

/// A map keyed and valued by native-endian `u32` buffers.
pub fn u32_map() -> ByteMap {
    ByteMap::with_comparator(4, 4, u32_native)
}

/// Collect every key in the map in comparator order, walking the tree with
/// an explicit stack.
pub fn collect_keys(map: &ByteMap) -> Vec<Box<[u8]>> {
    let mut keys = Vec::with_capacity(map.len());
    let mut stack = Vec::new();
    let mut cursor = map.root;
    while cursor.is_some() || !stack.is_empty() {
        while let Some(node) = cursor {
            stack.push(node);
            cursor = map.arena.left(node);
        }
        let node = stack.pop().expect("loop condition guarantees an entry");
        keys.push(map.arena.node(node).key.clone());
        cursor = map.arena.right(node);
    }
    keys
}
