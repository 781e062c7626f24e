//! # Data structures
//!
//! Representations of conservation planning problems and the linear-algebra
//! primitives they compile into.
pub mod adjacency;
pub mod linear_algebra;
pub mod problem;
