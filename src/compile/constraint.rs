//! # Structural constraints
//!
//! Zone assignment rows, lock bounds, neighbor-count rows and
//! caller-supplied linear rows.
use itertools::repeat_n;

use crate::compile::{Assembly, Layout};
use crate::data::problem::Problem;
use crate::data::problem::elements::{ConstraintSense, RowTag};

/// One row per planning unit restricting it to at most one zone.
///
/// Single-zone problems need no such rows; the variable bounds already
/// restrict the decision to `[0, 1]`.
pub(crate) fn assignment_rows(problem: &Problem, layout: &Layout, assembly: &mut Assembly) {
    if problem.nr_zones() < 2 {
        return;
    }

    for unit in 0..problem.nr_units() {
        let tuples = (0..problem.nr_zones())
            .map(|zone| layout.pu(unit, zone))
            .zip(repeat_n(1_f64, problem.nr_zones()))
            .collect();
        assembly.push_row(RowTag::ZoneAssignment, tuples, ConstraintSense::Less, 1_f64);
    }
}

/// One row per (unit, zone): a selected unit needs at least `nr_neighbors`
/// selected neighbors in the same zone.
///
/// A unit with fewer neighbors than required is forced out by its own row.
/// Adjacency values are ignored here; only the sparsity pattern defines the
/// neighborhood.
pub(crate) fn neighbor_rows(problem: &Problem, layout: &Layout, assembly: &mut Assembly) {
    let Some(constraint) = &problem.neighbor else {
        return;
    };
    if constraint.nr_neighbors == 0 {
        return;
    }

    for zone in 0..problem.nr_zones() {
        for unit in 0..problem.nr_units() {
            let mut tuples: Vec<_> = constraint.data.pairs().iter()
                .filter_map(|&(first, second, _)| {
                    if first == unit {
                        Some(second)
                    } else if second == unit {
                        Some(first)
                    } else {
                        None
                    }
                })
                .map(|neighbor| (layout.pu(neighbor, zone), 1_f64))
                .collect();
            tuples.push((layout.pu(unit, zone), -(constraint.nr_neighbors as f64)));
            assembly.push_row(RowTag::NeighborCount, tuples, ConstraintSense::Greater, 0_f64);
        }
    }
}

/// Caller-supplied linear rows over the allocation decisions.
///
/// Coefficients are laid out zone major, so their index is the decision
/// column index directly.
pub(crate) fn linear_rows(problem: &Problem, assembly: &mut Assembly) {
    for constraint in &problem.linear {
        let tuples = constraint.coefficients.iter()
            .enumerate()
            .map(|(column, &value)| (column, value))
            .collect();
        assembly.push_row(RowTag::Linear, tuples, constraint.sense, constraint.rhs);
    }
}

/// Locked allocations become degenerate variable bounds.
pub(crate) fn apply_locks(problem: &Problem, layout: &Layout, assembly: &mut Assembly) {
    for &(unit, zone) in &problem.locked_in {
        assembly.set_bounds(layout.pu(unit, zone), 1_f64, 1_f64);
    }
    for &(unit, zone) in &problem.locked_out {
        assembly.set_bounds(layout.pu(unit, zone), 0_f64, 0_f64);
    }
}
