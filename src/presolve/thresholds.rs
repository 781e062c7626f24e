//! # Numerical thresholds
//!
//! The limits the presolve checks compare against. Historical advice for
//! this kind of tooling quotes 1e9 or 1e10 as the magnitudes at which
//! solvers genuinely destabilize; the operative default here is the far
//! more conservative 1e6, at which point solutions tend to degrade in
//! quality long before they become wrong. All limits are plain named
//! values, tunable through [`Thresholds`] without touching the checks
//! themselves.

/// Largest coefficient magnitude considered safe, in the objective, the
/// constraint matrix and right-hand sides. Values at the threshold itself
/// do not warn; values strictly above do.
pub const COEFFICIENT_MAXIMUM: f64 = 1e6;

/// Smallest right-hand side solvers reliably distinguish from zero.
pub const RHS_MINIMUM: f64 = 1e-6;

/// Values at or below this floor are treated as exact zeros rather than as
/// suspiciously small.
pub const ZERO_FLOOR: f64 = 1e-300;

/// A decision with an upper bound below this is considered locked out.
pub const LOCKED_OUT_TOLERANCE: f64 = 1e-5;

/// A decision with a lower bound above this is considered locked in.
pub const LOCKED_IN_TOLERANCE: f64 = 0.9999;

/// A planning unit whose feature amounts sum to at most this holds no
/// feature data.
pub const SPARSITY_EPSILON: f64 = ZERO_FLOOR;

/// Fraction of planning units without feature data at which the data
/// quality warning fires.
pub const SPARSITY_FRACTION: f64 = 0.5;

/// Tunable limits for the presolve checks.
#[derive(Debug, Clone, PartialEq)]
pub struct Thresholds {
    /// See [`COEFFICIENT_MAXIMUM`].
    pub coefficient_maximum: f64,
    /// See [`RHS_MINIMUM`].
    pub rhs_minimum: f64,
    /// See [`ZERO_FLOOR`].
    pub zero_floor: f64,
    /// See [`LOCKED_OUT_TOLERANCE`].
    pub locked_out_tolerance: f64,
    /// See [`LOCKED_IN_TOLERANCE`].
    pub locked_in_tolerance: f64,
    /// See [`SPARSITY_EPSILON`].
    pub sparsity_epsilon: f64,
    /// See [`SPARSITY_FRACTION`].
    pub sparsity_fraction: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            coefficient_maximum: COEFFICIENT_MAXIMUM,
            rhs_minimum: RHS_MINIMUM,
            zero_floor: ZERO_FLOOR,
            locked_out_tolerance: LOCKED_OUT_TOLERANCE,
            locked_in_tolerance: LOCKED_IN_TOLERANCE,
            sparsity_epsilon: SPARSITY_EPSILON,
            sparsity_fraction: SPARSITY_FRACTION,
        }
    }
}
