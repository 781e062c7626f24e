//! # A conservation planning problem compiler
//!
//! Spatial land/resource-allocation decisions are formulated as mixed-integer
//! linear programs and handed to external optimization engines. This crate
//! covers the formulation side: a declarative problem specification (planning
//! units × features × zones, with targets, constraints and penalties) is
//! compiled into an objective vector, a sparse constraint matrix, row senses
//! and right-hand sides, and variable bounds. A presolve battery then checks
//! the compiled matrix for numerically unstable scales before any solver sees
//! it.
#![warn(missing_docs)]

pub mod compile;
pub mod data;
pub mod presolve;
pub mod solver;

#[cfg(test)]
mod tests;
