//! Map facade built on top of the raw tree engine.

pub mod map;

pub use map::*;
