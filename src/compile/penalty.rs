//! # Fragmentation penalties
//!
//! Boundary, connectivity and asymmetric connectivity penalties each add a
//! block of auxiliary columns (one per pair, per zone) together with the two
//! linearization rows `z − x_i ≤ 0` and `z − x_j ≤ 0` tying an auxiliary to
//! its pair of allocation decisions. Objective contributions flip sign with
//! the direction of optimization so that a penalty always hurts and a
//! connectivity reward always helps.
use crate::compile::{Assembly, Layout};
use crate::data::problem::Problem;
use crate::data::problem::elements::{ConstraintSense, Direction, RowTag};

pub(crate) fn emit(problem: &Problem, layout: &Layout, assembly: &mut Assembly) {
    // +1 when minimizing: penalties add cost, rewards subtract it.
    let sign = match assembly.direction {
        Direction::Minimize => 1_f64,
        Direction::Maximize => -1_f64,
    };

    boundary(problem, layout, assembly, sign);
    connectivity(problem, layout, assembly, sign);
    asymmetric_connectivity(problem, layout, assembly, sign);
}

/// Exposed boundary length of the selection.
///
/// For a shared edge (i, j) of length `len`, the exposed contribution is
/// `len · (x_i + x_j − 2 z_ij)`: both full edges count unless both units
/// are selected, in which case the shared edge is interior. Diagonal
/// entries are always-exposed lengths on single units.
fn boundary(problem: &Problem, layout: &Layout, assembly: &mut Assembly, sign: f64) {
    let Some(penalty) = &problem.boundary else {
        return;
    };
    let factor = sign * penalty.penalty;

    for zone in 0..problem.nr_zones() {
        for (unit, &exposed) in penalty.data.diagonal().iter().enumerate() {
            assembly.add_objective(layout.pu(unit, zone), factor * exposed);
        }
        for (pair, &(first, second, length)) in penalty.data.pairs().iter().enumerate() {
            let auxiliary = layout.boundary(zone, pair);
            assembly.add_objective(layout.pu(first, zone), factor * length);
            assembly.add_objective(layout.pu(second, zone), factor * length);
            assembly.add_objective(auxiliary, -2_f64 * factor * length);

            linearization_rows(
                RowTag::Boundary,
                auxiliary,
                layout.pu(first, zone),
                layout.pu(second, zone),
                assembly,
            );
        }
    }
}

/// Realized symmetric connectivity of the selection.
///
/// A score is realized when both of its units are selected; realized
/// connectivity is rewarded. Diagonal scores attach to single units.
fn connectivity(problem: &Problem, layout: &Layout, assembly: &mut Assembly, sign: f64) {
    let Some(penalty) = &problem.connectivity else {
        return;
    };
    let factor = -sign * penalty.penalty;

    for zone in 0..problem.nr_zones() {
        for (unit, &score) in penalty.data.diagonal().iter().enumerate() {
            assembly.add_objective(layout.pu(unit, zone), factor * score);
        }
        for (pair, &(first, second, score)) in penalty.data.pairs().iter().enumerate() {
            let auxiliary = layout.connectivity(zone, pair);
            assembly.add_objective(auxiliary, factor * score);

            linearization_rows(
                RowTag::Connectivity,
                auxiliary,
                layout.pu(first, zone),
                layout.pu(second, zone),
                assembly,
            );
        }
    }
}

/// Realized directed connectivity, one auxiliary per ordered scored pair.
fn asymmetric_connectivity(
    problem: &Problem,
    layout: &Layout,
    assembly: &mut Assembly,
    sign: f64,
) {
    let Some(penalty) = &problem.asymmetric_connectivity else {
        return;
    };
    let factor = -sign * penalty.penalty;
    let nr_pairs = penalty.data.pairs().len();

    for zone in 0..problem.nr_zones() {
        for (pair, &(from, to, score)) in penalty.data.pairs().iter().enumerate() {
            let auxiliary = layout.asymmetric(zone * nr_pairs + pair);
            assembly.add_objective(auxiliary, factor * score);

            linearization_rows(
                RowTag::AsymmetricConnectivity,
                auxiliary,
                layout.pu(from, zone),
                layout.pu(to, zone),
                assembly,
            );
        }
    }
}

/// The two rows forcing an auxiliary below both of its decisions.
fn linearization_rows(
    tag: RowTag,
    auxiliary: usize,
    first: usize,
    second: usize,
    assembly: &mut Assembly,
) {
    assembly.push_row(
        tag,
        vec![(auxiliary, 1_f64), (first, -1_f64)],
        ConstraintSense::Less,
        0_f64,
    );
    assembly.push_row(
        tag,
        vec![(auxiliary, 1_f64), (second, -1_f64)],
        ConstraintSense::Less,
        0_f64,
    );
}
