//! # Linear algebra
//!
//! A sparse matrix tailored to problem compilation: rows are assembled once
//! and never change afterwards, columns are read back during validation.
pub mod matrix;

/// A (index, value) pair as used in sparse data structures.
pub type SparseTuple<F> = (usize, F);
