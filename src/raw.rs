//! Tree engine: node representation and the link-level operations that
//! maintain the red-black invariants.

mod representation;
pub(crate) use representation::*;

mod operations;
pub(crate) use operations::*;
pub use operations::DuplicateKeyError;

pub mod visitor;
