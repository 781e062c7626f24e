//! # Solver backends
//!
//! Solving is delegated to external mixed-integer programming engines; this
//! module only defines the seam. A backend consumes a compiled problem in
//! generic MILP form and reports back an assignment, an objective value, a
//! runtime and a status string. Backend failures (infeasibility, timeouts,
//! license problems) are surfaced verbatim through the status; this crate
//! never interprets or retries them.
use std::time::Duration;

use crate::compile::CompiledProblem;

/// The assignment a backend returned, with bookkeeping.
#[derive(Debug, Clone, PartialEq)]
pub struct Solution {
    values: Vec<f64>,
    objective_value: f64,
    runtime: Duration,
    status: String,
}

impl Solution {
    /// Create a new `Solution` instance.
    ///
    /// A plain constructor.
    #[must_use]
    pub fn new(
        values: Vec<f64>,
        objective_value: f64,
        runtime: Duration,
        status: impl Into<String>,
    ) -> Self {
        Self {
            values,
            objective_value,
            runtime,
            status: status.into(),
        }
    }

    /// One value per column of the compiled problem.
    #[must_use]
    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Value of the objective function for this assignment.
    #[must_use]
    pub fn objective_value(&self) -> f64 {
        self.objective_value
    }

    /// How long the backend ran.
    #[must_use]
    pub fn runtime(&self) -> Duration {
        self.runtime
    }

    /// The backend's status, verbatim.
    #[must_use]
    pub fn status(&self) -> &str {
        &self.status
    }
}

/// An external mixed-integer programming engine.
///
/// Implementations live outside this crate, one per engine. Solving may be
/// long-running; a backend is free to implement its own time limits and
/// report expiry through the status string.
pub trait SolverBackend {
    /// Name of the engine, for logs and diagnostics.
    fn name(&self) -> &str;

    /// Solve a compiled problem.
    ///
    /// Must be callable arbitrarily many times without residual state
    /// between invocations.
    fn solve(&mut self, problem: &CompiledProblem) -> Solution;
}
