#![forbid(unsafe_code)]
#![deny(
    // missing_docs,
    deprecated_in_future,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    rustdoc::invalid_codeblock_attributes
)]
#![doc(test(attr(deny(warnings))))]

//! Fixed-slot ordered map backed by a left-leaning red-black tree.
//!
//! Every key in a [`ByteMap`] is exactly `key_size` bytes wide and every
//! value exactly `val_size` bytes wide, both chosen when the map is created.
//! Ordering comes from a caller-supplied [`KeyComparator`] over raw key
//! buffers. The tree engine is fully iterative: insertion and removal record
//! the descent in a bounded path stack and restore the red-black invariants
//! by unwinding it, so the structure never needs parent pointers or
//! recursion over the tree shape.
//!
//! # References
//!
//!  - Sedgewick, R. (2008). Left-leaning red-black trees. Department of
//!    Computer Science, Princeton University.
//!  - The `rb.h` intrusive red-black tree shipped with jemalloc, which
//!    pioneered the iterative wind/unwind formulation used here.

mod collections;
mod compare;
mod raw;

#[doc(hidden)]
pub mod tests_common;

pub use collections::*;
pub use compare::*;
pub use raw::{visitor, DuplicateKeyError};

#[doc = include_str!("../README.md")]
#[cfg(doctest)]
pub struct ReadmeDoctests;
