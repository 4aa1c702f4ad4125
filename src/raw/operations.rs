//! Tree node lookup and manipulation.

mod search;
pub(crate) use search::*;

mod insert;
pub(crate) use insert::insert;
pub use insert::DuplicateKeyError;

mod delete;
pub(crate) use delete::*;

mod deallocate;
pub(crate) use deallocate::*;
