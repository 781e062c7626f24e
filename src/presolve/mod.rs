//! # Presolve checks
//!
//! An exhaustive battery of scale and sanity checks over a compiled
//! problem, run before it is handed to a solver. Every check always runs,
//! even after an earlier check failed, because each produces its own
//! actionable warning. The result is advisory: a failed
//! report never blocks solving, the caller decides whether to proceed,
//! abort or re-parametrize.
//!
//! The checks target two different problem classes: scale pathologies that
//! make the formulation numerically unstable (huge coefficients, right-hand
//! sides that round to zero) and specification accidents that are formally
//! valid but almost certainly unintended (everything locked out, hardly any
//! feature data).
use enum_map::EnumMap;

use crate::compile::CompiledProblem;
use crate::data::problem::elements::{ColumnTag, RowTag};
use crate::presolve::thresholds::Thresholds;

pub mod thresholds;

/// Outcome of the presolve battery.
///
/// A pass/fail verdict plus one human-readable warning per violated rule,
/// in check order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Report {
    warnings: Vec<String>,
}

impl Report {
    /// Whether no check fired.
    #[must_use]
    pub fn pass(&self) -> bool {
        self.warnings.is_empty()
    }

    /// One warning per violated rule, in check order.
    #[must_use]
    pub fn warnings(&self) -> &[String] {
        &self.warnings
    }
}

/// Run all checks with the default thresholds.
#[must_use]
pub fn check(compiled: &CompiledProblem) -> Report {
    check_with(compiled, &Thresholds::default())
}

/// Run all checks with caller-supplied thresholds.
#[must_use]
pub fn check_with(compiled: &CompiledProblem, limits: &Thresholds) -> Report {
    let mut warnings = Vec::new();

    all_locked_out(compiled, limits, &mut warnings);
    all_locked_in(compiled, limits, &mut warnings);
    objective_magnitude(compiled, limits, &mut warnings);
    rhs_magnitude(compiled, limits, &mut warnings);
    rhs_rounds_to_zero(compiled, limits, &mut warnings);
    matrix_magnitude(compiled, limits, &mut warnings);
    feature_data(compiled, limits, &mut warnings);

    Report { warnings }
}

/// Every allocation decision has an upper bound of effectively zero.
fn all_locked_out(compiled: &CompiledProblem, limits: &Thresholds, warnings: &mut Vec<String>) {
    let locked = planning_columns(compiled)
        .all(|column| compiled.bounds()[column].1 < limits.locked_out_tolerance);
    if locked {
        warnings.push("all planning units are locked out".to_string());
    }
}

/// Every allocation decision has a lower bound of effectively one.
fn all_locked_in(compiled: &CompiledProblem, limits: &Thresholds, warnings: &mut Vec<String>) {
    let locked = planning_columns(compiled)
        .all(|column| compiled.bounds()[column].0 > limits.locked_in_tolerance);
    if locked {
        warnings.push("all planning units are locked in".to_string());
    }
}

/// Objective coefficients beyond the safe magnitude, reported once per
/// column category with advice tailored to what that category holds.
fn objective_magnitude(
    compiled: &CompiledProblem,
    limits: &Thresholds,
    warnings: &mut Vec<String>,
) {
    let mut flagged: EnumMap<ColumnTag, bool> = EnumMap::default();
    for (&value, &tag) in compiled.objective().iter().zip(compiled.column_tags()) {
        if value.abs() > limits.coefficient_maximum {
            flagged[tag] = true;
        }
    }

    for (tag, &fired) in &flagged {
        if !fired {
            continue;
        }
        warnings.push(match tag {
            ColumnTag::PlanningUnit => {
                "planning unit costs are very high, consider rescaling the cost data"
            },
            ColumnTag::Amount
            | ColumnTag::FeatureMet => {
                "feature weights are very high, consider rescaling the weights"
            },
            ColumnTag::BranchMet => {
                "phylogeny branch lengths are very high, consider rescaling the branch lengths"
            },
            ColumnTag::Boundary => {
                "the boundary penalty is very high, consider a smaller penalty value"
            },
            ColumnTag::Connectivity => {
                "the connectivity penalty is very high, consider a smaller penalty value"
            },
            ColumnTag::AsymmetricConnectivity => {
                "the asymmetric connectivity penalty is very high, consider a smaller penalty \
                 value"
            },
        }.to_string());
    }
}

/// Right-hand sides beyond the safe magnitude, once per row category.
fn rhs_magnitude(compiled: &CompiledProblem, limits: &Thresholds, warnings: &mut Vec<String>) {
    let mut flagged: EnumMap<RowTag, bool> = EnumMap::default();
    for (&value, &tag) in compiled.rhs().iter().zip(compiled.row_tags()) {
        if value.abs() > limits.coefficient_maximum {
            flagged[tag] = true;
        }
    }

    for (tag, &fired) in &flagged {
        if !fired {
            continue;
        }
        warnings.push(match tag {
            RowTag::Budget => "the budget is very high, consider rescaling the cost data",
            RowTag::Target => "feature targets are very high, consider rescaling the feature data",
            _ => "some constraint right-hand side values are very high",
        }.to_string());
    }
}

/// Right-hand sides so small that solvers will treat them as zero.
///
/// Values at or below the zero floor are taken as intentional zeros and
/// left alone.
fn rhs_rounds_to_zero(
    compiled: &CompiledProblem,
    limits: &Thresholds,
    warnings: &mut Vec<String>,
) {
    let mut flagged: EnumMap<RowTag, bool> = EnumMap::default();
    for (&value, &tag) in compiled.rhs().iter().zip(compiled.row_tags()) {
        if value > limits.zero_floor && value < limits.rhs_minimum {
            flagged[tag] = true;
        }
    }

    for (tag, &fired) in &flagged {
        if !fired {
            continue;
        }
        warnings.push(match tag {
            RowTag::Budget => "the budget is so small it will be rounded down to zero",
            RowTag::Target => {
                "some feature targets are so small they will be rounded down to zero"
            },
            _ => {
                "some constraint right-hand side values are so small they will be rounded down \
                 to zero"
            },
        }.to_string());
    }
}

/// Constraint matrix entries beyond the safe magnitude, once per row
/// category.
fn matrix_magnitude(compiled: &CompiledProblem, limits: &Thresholds, warnings: &mut Vec<String>) {
    let mut flagged: EnumMap<RowTag, bool> = EnumMap::default();
    for (row, &tag) in compiled.row_tags().iter().enumerate() {
        if compiled.constraints().row(row).iter()
            .any(|&(_, value)| value.abs() > limits.coefficient_maximum)
        {
            flagged[tag] = true;
        }
    }

    for (tag, &fired) in &flagged {
        if !fired {
            continue;
        }
        warnings.push(match tag {
            RowTag::Budget => "planning unit costs are very high, consider rescaling the cost data",
            RowTag::NeighborCount => {
                "the required number of neighbors is very high, consider requiring fewer \
                 neighbors"
            },
            _ => "some constraint coefficients are very high",
        }.to_string());
    }
}

/// Scale and sparsity of the feature amount data.
///
/// Restricted to the submatrix of feature-amount rows (targets and amount
/// links) by allocation decision columns. The sparsity finding is a data
/// quality signal rather than a numerical one: when most planning units
/// hold no feature data at all, the inputs were probably misaligned.
fn feature_data(compiled: &CompiledProblem, limits: &Thresholds, warnings: &mut Vec<String>) {
    let mut column_sums = vec![0_f64; compiled.nr_columns()];
    let mut nr_feature_rows = 0;
    let mut magnitude_fired = false;
    for (row, &tag) in compiled.row_tags().iter().enumerate() {
        if !matches!(tag, RowTag::Target | RowTag::AmountLink) {
            continue;
        }
        nr_feature_rows += 1;
        for &(column, value) in compiled.constraints().row(row) {
            if compiled.column_tags()[column] != ColumnTag::PlanningUnit {
                continue;
            }
            column_sums[column] += value.abs();
            if value.abs() > limits.coefficient_maximum {
                magnitude_fired = true;
            }
        }
    }
    if magnitude_fired {
        warnings.push(
            "feature amounts are very high, consider rescaling the feature data".to_string(),
        );
    }

    if nr_feature_rows > 0 {
        let nr_planning = planning_columns(compiled).count();
        let nr_without_data = planning_columns(compiled)
            .filter(|&column| column_sums[column] <= limits.sparsity_epsilon)
            .count();
        if nr_without_data as f64 >= limits.sparsity_fraction * nr_planning as f64 {
            warnings.push(
                "most planning units contain no feature data, check the feature data for \
                 mistakes".to_string(),
            );
        }
    }
}

/// Indices of the allocation decision columns.
fn planning_columns(compiled: &CompiledProblem) -> impl Iterator<Item = usize> + '_ {
    compiled.column_tags().iter()
        .enumerate()
        .filter(|&(_, &tag)| tag == ColumnTag::PlanningUnit)
        .map(|(column, _)| column)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::data::linear_algebra::matrix::Sparse;
    use crate::data::problem::elements::{ConstraintSense, Direction, VariableKind};

    /// A single-row artifact over planning unit columns only.
    fn synthetic(
        objective: Vec<f64>,
        bounds: Vec<(f64, f64)>,
        row_tag: RowTag,
        row: Vec<(usize, f64)>,
        rhs: f64,
    ) -> CompiledProblem {
        let nr_columns = objective.len();
        CompiledProblem::new(
            Direction::Minimize,
            objective,
            bounds,
            vec![VariableKind::Binary; nr_columns],
            Sparse::from_rows(nr_columns, vec![row]),
            vec![ConstraintSense::Greater],
            vec![rhs],
            vec![ColumnTag::PlanningUnit; nr_columns],
            vec![row_tag],
        )
    }

    #[test]
    fn moderate_problem_passes() {
        let report = check(&synthetic(
            vec![100.0, 50.0],
            vec![(0.0, 1.0); 2],
            RowTag::Target,
            vec![(0, 1.0), (1, 2.0)],
            0.9,
        ));

        assert!(report.pass());
        assert!(report.warnings().is_empty());
    }

    #[test]
    fn objective_at_threshold_is_silent() {
        let report = check(&synthetic(
            vec![1e6],
            vec![(0.0, 1.0)],
            RowTag::Target,
            vec![(0, 1.0)],
            1.0,
        ));

        assert!(report.pass());
    }

    #[test]
    fn objective_above_threshold_warns() {
        let report = check(&synthetic(
            vec![1e6 * (1.0 + 1e-9)],
            vec![(0.0, 1.0)],
            RowTag::Target,
            vec![(0, 1.0)],
            1.0,
        ));

        assert!(!report.pass());
        assert!(report.warnings().iter().any(|warning| warning.contains("costs")));
    }

    #[test]
    fn all_locked_out_warns_exactly_once() {
        let report = check(&synthetic(
            vec![1.0, 1.0],
            vec![(0.0, 0.0); 2],
            RowTag::Target,
            vec![(0, 1.0), (1, 1.0)],
            1.0,
        ));

        assert!(!report.pass());
        let nr_matches = report.warnings().iter()
            .filter(|warning| warning.contains("locked out"))
            .count();
        assert_eq!(nr_matches, 1);
    }

    #[test]
    fn all_locked_in_warns() {
        let report = check(&synthetic(
            vec![1.0],
            vec![(1.0, 1.0)],
            RowTag::Target,
            vec![(0, 1.0)],
            1.0,
        ));

        assert!(report.warnings().iter().any(|warning| warning.contains("locked in")));
    }

    #[test]
    fn tiny_budget_rounds_to_zero() {
        let report = check(&synthetic(
            vec![1.0],
            vec![(0.0, 1.0)],
            RowTag::Budget,
            vec![(0, 1.0)],
            1e-7,
        ));

        assert!(!report.pass());
        assert!(report.warnings().iter()
            .any(|warning| warning.contains("budget") && warning.contains("zero")));
    }

    #[test]
    fn exact_zero_rhs_is_not_suspicious() {
        let report = check(&synthetic(
            vec![1.0],
            vec![(0.0, 1.0)],
            RowTag::Budget,
            vec![(0, 1.0)],
            0.0,
        ));

        assert!(report.pass());
    }

    #[test]
    fn checks_never_short_circuit() {
        // Violates the lock out check, the objective magnitude check and
        // both feature data checks at once; every warning must appear.
        let report = check(&synthetic(
            vec![2e6, 1.0],
            vec![(0.0, 0.0); 2],
            RowTag::Target,
            vec![(0, 2e6)],
            1.0,
        ));

        let warnings = report.warnings();
        assert!(warnings.iter().any(|warning| warning.contains("locked out")));
        assert!(warnings.iter().any(|warning| warning.contains("costs")));
        assert!(warnings.iter().any(|warning| warning.contains("feature amounts")));
        assert!(warnings.iter().any(|warning| warning.contains("no feature data")));
    }

    #[test]
    fn neighbor_rows_get_tailored_advice() {
        let report = check(&synthetic(
            vec![1.0],
            vec![(0.0, 1.0)],
            RowTag::NeighborCount,
            vec![(0, -2e6)],
            0.0,
        ));

        assert!(report.warnings().iter().any(|warning| warning.contains("neighbors")));
    }

    #[test]
    fn custom_thresholds() {
        let limits = Thresholds {
            coefficient_maximum: 10.0,
            ..Thresholds::default()
        };
        let compiled = synthetic(
            vec![100.0],
            vec![(0.0, 1.0)],
            RowTag::Target,
            vec![(0, 1.0)],
            1.0,
        );

        assert!(check(&compiled).pass());
        assert!(!check_with(&compiled, &limits).pass());
    }
}
