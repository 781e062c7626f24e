//! # Objective translation
//!
//! Emits the objective coefficients and the rows each objective family
//! brings along: a budget row for the maximizing objectives, target rows
//! relating held feature amounts to their targets, link rows for the
//! `amount` auxiliaries, and branch link rows for phylogenetic diversity.
use crate::compile::{Assembly, Layout, target_values};
use crate::data::linear_algebra::SparseTuple;
use crate::data::problem::{Objective, Problem, Targets};
use crate::data::problem::elements::{ConstraintSense, RowTag};
use crate::data::problem::error::InvalidSpecificationError;

pub(crate) fn emit(
    problem: &Problem,
    objective: &Objective,
    layout: &Layout,
    assembly: &mut Assembly,
) -> Result<(), InvalidSpecificationError> {
    match objective {
        Objective::MinimumSet => {
            cost_objective(problem, layout, assembly);
            let targets = required_targets(problem)?;
            for (feature, target) in target_values(problem, targets).into_iter().enumerate() {
                let tuples = amount_tuples(problem, layout, feature);
                assembly.push_row(RowTag::Target, tuples, ConstraintSense::Greater, target);
            }
        },
        Objective::MaximumUtility { budget } => {
            budget_row(problem, layout, assembly, *budget);
            for (feature, weight) in problem.feature_weights().into_iter().enumerate() {
                assembly.add_objective(layout.amount(feature), weight);
            }
            for feature in 0..problem.nr_features() {
                let mut tuples = amount_tuples(problem, layout, feature);
                tuples.push((layout.amount(feature), -1_f64));
                assembly.push_row(RowTag::AmountLink, tuples, ConstraintSense::Equal, 0_f64);
            }
        },
        Objective::MaximumFeatures { budget } => {
            budget_row(problem, layout, assembly, *budget);
            for (feature, weight) in problem.feature_weights().into_iter().enumerate() {
                assembly.add_objective(layout.feature_met(feature), weight);
            }
            met_target_rows(problem, layout, assembly)?;
        },
        Objective::MaximumPhylogeneticDiversity { budget, phylogeny } => {
            budget_row(problem, layout, assembly, *budget);
            for (branch, &length) in phylogeny.branch_lengths.iter().enumerate() {
                assembly.add_objective(layout.branch_met(branch), length);
            }
            met_target_rows(problem, layout, assembly)?;
            for (branch, features) in phylogeny.branch_features.iter().enumerate() {
                let mut tuples: Vec<SparseTuple<f64>> = features.iter()
                    .map(|&feature| (layout.feature_met(feature), 1_f64))
                    .collect();
                tuples.push((layout.branch_met(branch), -1_f64));
                assembly.push_row(RowTag::BranchLink, tuples, ConstraintSense::Greater, 0_f64);
            }
        },
    }

    Ok(())
}

/// Planning unit costs as the objective, for the minimum set objective.
fn cost_objective(problem: &Problem, layout: &Layout, assembly: &mut Assembly) {
    for (zone, costs) in problem.costs.iter().enumerate() {
        for (unit, &cost) in costs.iter().enumerate() {
            assembly.add_objective(layout.pu(unit, zone), cost);
        }
    }
}

/// The single budget row: total cost of the selection stays within budget.
fn budget_row(problem: &Problem, layout: &Layout, assembly: &mut Assembly, budget: f64) {
    let tuples = problem.costs.iter()
        .enumerate()
        .flat_map(|(zone, costs)| {
            costs.iter()
                .enumerate()
                .map(move |(unit, &cost)| (layout.pu(unit, zone), cost))
        })
        .collect();
    assembly.push_row(RowTag::Budget, tuples, ConstraintSense::Less, budget);
}

/// Target rows tying each feature's `spp_met` auxiliary to its held amount:
/// the auxiliary can only be one when the amount reaches the target.
fn met_target_rows(
    problem: &Problem,
    layout: &Layout,
    assembly: &mut Assembly,
) -> Result<(), InvalidSpecificationError> {
    let targets = required_targets(problem)?;
    for (feature, target) in target_values(problem, targets).into_iter().enumerate() {
        let mut tuples = amount_tuples(problem, layout, feature);
        tuples.push((layout.feature_met(feature), -target));
        assembly.push_row(RowTag::Target, tuples, ConstraintSense::Greater, 0_f64);
    }

    Ok(())
}

/// The held amount of a feature as (column, coefficient) tuples over all
/// allocation decisions.
fn amount_tuples(problem: &Problem, layout: &Layout, feature: usize) -> Vec<SparseTuple<f64>> {
    problem.amounts.iter()
        .enumerate()
        .flat_map(|(zone, matrix)| {
            matrix.row(feature).iter()
                .map(move |&(unit, amount)| (layout.pu(unit, zone), amount))
        })
        .collect()
}

fn required_targets(problem: &Problem) -> Result<&Targets, InvalidSpecificationError> {
    problem.targets.as_ref().ok_or_else(|| {
        InvalidSpecificationError::new("this objective requires representation targets")
    })
}
