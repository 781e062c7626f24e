//! # End-to-end scenarios
//!
//! Full specification → compilation → presolve runs over small but
//! realistic planning problems.
mod problem_2;
mod problem_3;
