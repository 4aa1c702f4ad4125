//! Diagnostic passes over a whole tree.

mod well_formed;
pub use well_formed::*;
