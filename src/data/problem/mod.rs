//! # Conservation planning problems
//!
//! Declarative description of a planning problem: which planning units exist
//! and what they cost per zone, how much of each feature every unit holds,
//! the objective, representation targets, structural constraints and
//! fragmentation penalties.
//!
//! A specification is built additively: every modifier consumes the value
//! and returns a new one, so a base specification can be cloned and extended
//! into multiple variants without shared mutable state. Modifiers validate
//! their own input and fail fast; cross-cutting conditions (such as a unit
//! locked both in and out) are verified when the problem is compiled.
use crate::compile;
use crate::compile::CompiledProblem;
use crate::data::adjacency::{Adjacency, Directed};
use crate::data::linear_algebra::matrix::Sparse;
use crate::data::problem::elements::{ConstraintSense, DecisionKind};
use crate::data::problem::error::InvalidSpecificationError;
use crate::presolve;
use crate::presolve::Report;

pub mod elements;
pub mod error;

/// Representation targets, one value per feature.
#[derive(Debug, Clone, PartialEq)]
pub enum Targets {
    /// Fraction of the total available amount of each feature, in `[0, 1]`.
    Relative(Vec<f64>),
    /// Absolute amount of each feature.
    Absolute(Vec<f64>),
}

/// Objective function of a planning problem.
#[derive(Debug, Clone, PartialEq)]
pub enum Objective {
    /// Minimize total cost subject to every representation target being met.
    MinimumSet,
    /// Maximize the total weighted amount held, subject to a budget.
    MaximumUtility {
        /// Maximum total cost of the selected units.
        budget: f64,
    },
    /// Maximize the weighted number of features whose target is met, subject
    /// to a budget.
    MaximumFeatures {
        /// Maximum total cost of the selected units.
        budget: f64,
    },
    /// Maximize the summed length of phylogeny branches with at least one
    /// represented feature below them, subject to a budget.
    MaximumPhylogeneticDiversity {
        /// Maximum total cost of the selected units.
        budget: f64,
        /// The phylogenetic tree over the features.
        phylogeny: Phylogeny,
    },
}

/// A phylogenetic tree, summarized as branches.
#[derive(Debug, Clone, PartialEq)]
pub struct Phylogeny {
    /// Length of each branch.
    pub branch_lengths: Vec<f64>,
    /// For each branch, the indices of the features descending from it.
    pub branch_features: Vec<Vec<usize>>,
}

/// A caller-supplied linear constraint over the allocation decisions.
#[derive(Debug, Clone, PartialEq)]
pub struct LinearConstraint {
    /// One coefficient per (unit, zone) decision, laid out zone major: the
    /// coefficient for unit `i` in zone `z` sits at `z * nr_units + i`,
    /// matching the compiled column order.
    pub coefficients: Vec<f64>,
    /// Relation between the weighted sum and the threshold.
    pub sense: ConstraintSense,
    /// The threshold.
    pub rhs: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct BoundaryPenalty {
    pub penalty: f64,
    pub data: Adjacency,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct ConnectivityPenalty {
    pub penalty: f64,
    pub data: Adjacency,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AsymmetricConnectivityPenalty {
    pub penalty: f64,
    pub data: Directed,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct NeighborConstraint {
    pub nr_neighbors: usize,
    pub data: Adjacency,
}

/// A declarative conservation planning problem.
///
/// Created from cost and feature data, then extended through the `with_*`
/// modifiers. Compilation (`compile`) is a pure function of this value;
/// compiling twice yields identical artifacts.
#[derive(Debug, Clone, PartialEq)]
pub struct Problem {
    nr_units: usize,
    nr_features: usize,
    /// Cost per planning unit, one vector per zone.
    pub(crate) costs: Vec<Vec<f64>>,
    /// Feature amounts, one (features × units) matrix per zone.
    pub(crate) amounts: Vec<Sparse<f64>>,
    pub(crate) decisions: DecisionKind,
    pub(crate) objective: Option<Objective>,
    pub(crate) targets: Option<Targets>,
    pub(crate) weights: Option<Vec<f64>>,
    /// (unit, zone) pairs forced into the solution.
    pub(crate) locked_in: Vec<(usize, usize)>,
    /// (unit, zone) pairs forced out of the solution.
    pub(crate) locked_out: Vec<(usize, usize)>,
    pub(crate) neighbor: Option<NeighborConstraint>,
    pub(crate) linear: Vec<LinearConstraint>,
    pub(crate) boundary: Option<BoundaryPenalty>,
    pub(crate) connectivity: Option<ConnectivityPenalty>,
    pub(crate) asymmetric_connectivity: Option<AsymmetricConnectivityPenalty>,
}

impl Problem {
    /// Create a problem from per-zone cost and feature data.
    ///
    /// # Arguments
    ///
    /// * `costs`: One cost vector per zone, each with one value per planning
    /// unit.
    /// * `amounts`: One (features × planning units) matrix per zone.
    ///
    /// # Errors
    ///
    /// When there are no zones, units or features, dimensions disagree, a
    /// cost is not finite, or an amount is not finite and non-negative.
    pub fn new(
        costs: Vec<Vec<f64>>,
        amounts: Vec<Sparse<f64>>,
    ) -> Result<Self, InvalidSpecificationError> {
        if costs.is_empty() {
            return Err(InvalidSpecificationError::new("a problem needs at least one zone"));
        }
        let nr_units = costs[0].len();
        if nr_units == 0 {
            return Err(InvalidSpecificationError::new(
                "a problem needs at least one planning unit",
            ));
        }
        if costs.iter().any(|zone| zone.len() != nr_units) {
            return Err(InvalidSpecificationError::new(
                "cost vectors disagree on the number of planning units",
            ));
        }
        if costs.iter().flatten().any(|cost| !cost.is_finite()) {
            return Err(InvalidSpecificationError::new("cost values must be finite"));
        }

        if amounts.len() != costs.len() {
            return Err(InvalidSpecificationError::new(
                "the number of amount matrices disagrees with the number of zones",
            ));
        }
        let nr_features = amounts[0].nr_rows();
        if nr_features == 0 {
            return Err(InvalidSpecificationError::new("a problem needs at least one feature"));
        }
        for matrix in &amounts {
            if matrix.nr_rows() != nr_features || matrix.nr_columns() != nr_units {
                return Err(InvalidSpecificationError::new(
                    "amount matrices disagree on dimensions",
                ));
            }
            for row in matrix.iter_rows() {
                if row.iter().any(|&(_, amount)| !amount.is_finite() || amount < 0_f64) {
                    return Err(InvalidSpecificationError::new(
                        "feature amounts must be finite and non-negative",
                    ));
                }
            }
        }

        Ok(Self {
            nr_units,
            nr_features,
            costs,
            amounts,
            decisions: DecisionKind::Binary,
            objective: None,
            targets: None,
            weights: None,
            locked_in: Vec::new(),
            locked_out: Vec::new(),
            neighbor: None,
            linear: Vec::new(),
            boundary: None,
            connectivity: None,
            asymmetric_connectivity: None,
        })
    }

    /// Create a single-zone problem.
    ///
    /// # Errors
    ///
    /// See [`Problem::new`].
    pub fn single_zone(
        costs: Vec<f64>,
        amounts: Sparse<f64>,
    ) -> Result<Self, InvalidSpecificationError> {
        Self::new(vec![costs], vec![amounts])
    }

    /// The number of planning units.
    #[must_use]
    pub fn nr_units(&self) -> usize {
        self.nr_units
    }

    /// The number of features.
    #[must_use]
    pub fn nr_features(&self) -> usize {
        self.nr_features
    }

    /// The number of zones.
    #[must_use]
    pub fn nr_zones(&self) -> usize {
        self.costs.len()
    }

    /// Set the objective.
    ///
    /// # Errors
    ///
    /// When a budget is not finite and positive, or a phylogeny is
    /// inconsistent with the features.
    pub fn with_objective(
        mut self,
        objective: Objective,
    ) -> Result<Self, InvalidSpecificationError> {
        match &objective {
            Objective::MinimumSet => {},
            Objective::MaximumUtility { budget }
            | Objective::MaximumFeatures { budget } => {
                validate_budget(*budget)?;
            },
            Objective::MaximumPhylogeneticDiversity { budget, phylogeny } => {
                validate_budget(*budget)?;
                if phylogeny.branch_lengths.len() != phylogeny.branch_features.len() {
                    return Err(InvalidSpecificationError::new(
                        "phylogeny branch lengths and branch features disagree in number",
                    ));
                }
                if phylogeny.branch_lengths.iter().any(|length| !length.is_finite() || *length < 0_f64) {
                    return Err(InvalidSpecificationError::new(
                        "phylogeny branch lengths must be finite and non-negative",
                    ));
                }
                for features in &phylogeny.branch_features {
                    if features.is_empty() {
                        return Err(InvalidSpecificationError::new(
                            "every phylogeny branch needs at least one feature below it",
                        ));
                    }
                    if features.iter().any(|&feature| feature >= self.nr_features) {
                        return Err(InvalidSpecificationError::new(
                            "phylogeny branch references an unknown feature",
                        ));
                    }
                }
            },
        }

        self.objective = Some(objective);
        Ok(self)
    }

    /// Set the representation targets.
    ///
    /// # Errors
    ///
    /// When the number of targets disagrees with the number of features,
    /// a relative target lies outside `[0, 1]`, or an absolute target is
    /// not finite and non-negative.
    pub fn with_targets(mut self, targets: Targets) -> Result<Self, InvalidSpecificationError> {
        let values = match &targets {
            Targets::Relative(values) | Targets::Absolute(values) => values,
        };
        if values.len() != self.nr_features {
            return Err(InvalidSpecificationError::new(
                "the number of targets disagrees with the number of features",
            ));
        }
        match &targets {
            Targets::Relative(values) => {
                if values.iter().any(|fraction| !(0_f64..=1_f64).contains(fraction)) {
                    return Err(InvalidSpecificationError::new(
                        "relative targets must lie in [0, 1]",
                    ));
                }
            },
            Targets::Absolute(values) => {
                if values.iter().any(|amount| !amount.is_finite() || *amount < 0_f64) {
                    return Err(InvalidSpecificationError::new(
                        "absolute targets must be finite and non-negative",
                    ));
                }
            },
        }

        self.targets = Some(targets);
        Ok(self)
    }

    /// Set per-feature weights, used by the maximizing objectives.
    ///
    /// # Errors
    ///
    /// When the number of weights disagrees with the number of features or
    /// a weight is not finite and non-negative.
    pub fn with_feature_weights(
        mut self,
        weights: Vec<f64>,
    ) -> Result<Self, InvalidSpecificationError> {
        if weights.len() != self.nr_features {
            return Err(InvalidSpecificationError::new(
                "the number of weights disagrees with the number of features",
            ));
        }
        if weights.iter().any(|weight| !weight.is_finite() || *weight < 0_f64) {
            return Err(InvalidSpecificationError::new(
                "feature weights must be finite and non-negative",
            ));
        }

        self.weights = Some(weights);
        Ok(self)
    }

    /// Force (unit, zone) allocations into the solution.
    ///
    /// # Errors
    ///
    /// When an index is out of range.
    pub fn with_locked_in(
        mut self,
        locks: Vec<(usize, usize)>,
    ) -> Result<Self, InvalidSpecificationError> {
        self.validate_locks(&locks)?;
        self.locked_in.extend(locks);
        Ok(self)
    }

    /// Force (unit, zone) allocations out of the solution.
    ///
    /// # Errors
    ///
    /// When an index is out of range.
    pub fn with_locked_out(
        mut self,
        locks: Vec<(usize, usize)>,
    ) -> Result<Self, InvalidSpecificationError> {
        self.validate_locks(&locks)?;
        self.locked_out.extend(locks);
        Ok(self)
    }

    /// Require every selected unit to have at least `nr_neighbors` selected
    /// neighbors in the same zone.
    ///
    /// # Errors
    ///
    /// When the adjacency data spans a different number of units.
    pub fn with_neighbor_constraint(
        mut self,
        nr_neighbors: usize,
        data: Adjacency,
    ) -> Result<Self, InvalidSpecificationError> {
        if data.nr_units() != self.nr_units {
            return Err(InvalidSpecificationError::new(
                "neighbor data spans a different number of planning units",
            ));
        }

        self.neighbor = Some(NeighborConstraint { nr_neighbors, data });
        Ok(self)
    }

    /// Add a caller-supplied linear constraint over the allocation decisions.
    ///
    /// # Errors
    ///
    /// When the coefficient vector has the wrong length or a value is not
    /// finite.
    pub fn with_linear_constraint(
        mut self,
        constraint: LinearConstraint,
    ) -> Result<Self, InvalidSpecificationError> {
        if constraint.coefficients.len() != self.nr_units * self.nr_zones() {
            return Err(InvalidSpecificationError::new(
                "linear constraint coefficients disagree with the number of decisions",
            ));
        }
        if constraint.coefficients.iter().any(|value| !value.is_finite()) {
            return Err(InvalidSpecificationError::new(
                "linear constraint coefficients must be finite",
            ));
        }
        if !constraint.rhs.is_finite() {
            return Err(InvalidSpecificationError::new(
                "linear constraint right-hand side must be finite",
            ));
        }

        self.linear.push(constraint);
        Ok(self)
    }

    /// Penalize exposed boundary length of the selection.
    ///
    /// # Errors
    ///
    /// When the penalty is not finite and non-negative or the boundary data
    /// spans a different number of units.
    pub fn with_boundary_penalty(
        mut self,
        penalty: f64,
        data: Adjacency,
    ) -> Result<Self, InvalidSpecificationError> {
        validate_penalty(penalty, self.nr_units, data.nr_units())?;
        self.boundary = Some(BoundaryPenalty { penalty, data });
        Ok(self)
    }

    /// Reward realized symmetric connectivity of the selection.
    ///
    /// # Errors
    ///
    /// When the penalty is not finite and non-negative or the connectivity
    /// data spans a different number of units.
    pub fn with_connectivity_penalty(
        mut self,
        penalty: f64,
        data: Adjacency,
    ) -> Result<Self, InvalidSpecificationError> {
        validate_penalty(penalty, self.nr_units, data.nr_units())?;
        self.connectivity = Some(ConnectivityPenalty { penalty, data });
        Ok(self)
    }

    /// Reward realized directed connectivity of the selection.
    ///
    /// # Errors
    ///
    /// When the penalty is not finite and non-negative or the connectivity
    /// data spans a different number of units.
    pub fn with_asymmetric_connectivity_penalty(
        mut self,
        penalty: f64,
        data: Directed,
    ) -> Result<Self, InvalidSpecificationError> {
        validate_penalty(penalty, self.nr_units, data.nr_units())?;
        self.asymmetric_connectivity = Some(AsymmetricConnectivityPenalty { penalty, data });
        Ok(self)
    }

    /// Allocate units to zones fractionally instead of binarily.
    #[must_use]
    pub fn with_proportion_decisions(mut self) -> Self {
        self.decisions = DecisionKind::Proportion;
        self
    }

    /// Compile this specification into a solver-ready problem.
    ///
    /// # Errors
    ///
    /// When cross-cutting preconditions are violated, such as a missing
    /// objective, missing targets for an objective that needs them, or a
    /// (unit, zone) allocation that is locked both in and out.
    pub fn compile(&self) -> Result<CompiledProblem, InvalidSpecificationError> {
        compile::compile(self)
    }

    /// Compile this specification and run the presolve battery on the
    /// result.
    ///
    /// # Errors
    ///
    /// When compilation fails; presolve findings are never errors.
    pub fn check(&self) -> Result<Report, InvalidSpecificationError> {
        Ok(presolve::check(&self.compile()?))
    }

    /// The total available amount of feature `f`, summed over all zones.
    pub(crate) fn total_amount(&self, feature: usize) -> f64 {
        debug_assert!(feature < self.nr_features);

        self.amounts.iter().map(|matrix| matrix.row_sum(feature)).sum()
    }

    /// Per-feature weights, defaulting to one.
    pub(crate) fn feature_weights(&self) -> Vec<f64> {
        self.weights.clone().unwrap_or_else(|| vec![1_f64; self.nr_features])
    }

    fn validate_locks(
        &self,
        locks: &[(usize, usize)],
    ) -> Result<(), InvalidSpecificationError> {
        for &(unit, zone) in locks {
            if unit >= self.nr_units || zone >= self.nr_zones() {
                return Err(InvalidSpecificationError::new(format!(
                    "lock ({}, {}) is out of range for {} planning units and {} zones",
                    unit, zone, self.nr_units, self.nr_zones(),
                )));
            }
        }
        Ok(())
    }
}

fn validate_budget(budget: f64) -> Result<(), InvalidSpecificationError> {
    if !budget.is_finite() || budget <= 0_f64 {
        return Err(InvalidSpecificationError::new("the budget must be finite and positive"));
    }
    Ok(())
}

fn validate_penalty(
    penalty: f64,
    nr_units: usize,
    data_nr_units: usize,
) -> Result<(), InvalidSpecificationError> {
    if !penalty.is_finite() || penalty < 0_f64 {
        return Err(InvalidSpecificationError::new(
            "penalty factors must be finite and non-negative",
        ));
    }
    if data_nr_units != nr_units {
        return Err(InvalidSpecificationError::new(
            "penalty data spans a different number of planning units",
        ));
    }
    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    fn amounts() -> Sparse<f64> {
        Sparse::from_rows(2, vec![
            vec![(0, 1_f64), (1, 2_f64)],
            vec![(1, 3_f64)],
        ])
    }

    #[test]
    fn well_formed() {
        let problem = Problem::single_zone(vec![1.0, 2.0], amounts()).unwrap();

        assert_eq!(problem.nr_units(), 2);
        assert_eq!(problem.nr_features(), 2);
        assert_eq!(problem.nr_zones(), 1);
        assert_eq!(problem.total_amount(0), 3.0);
        assert_eq!(problem.total_amount(1), 3.0);
    }

    #[test]
    fn non_finite_cost() {
        assert!(Problem::single_zone(vec![1.0, f64::INFINITY], amounts()).is_err());
    }

    #[test]
    fn no_planning_units() {
        assert!(Problem::new(vec![vec![]], vec![Sparse::from_rows(1, vec![vec![]])]).is_err());
    }

    #[test]
    fn negative_amount() {
        let bad = Sparse::from_rows(2, vec![vec![(0, -1_f64)]]);
        assert!(Problem::single_zone(vec![1.0, 2.0], bad).is_err());
    }

    #[test]
    fn relative_target_out_of_range() {
        let problem = Problem::single_zone(vec![1.0, 2.0], amounts()).unwrap();
        assert!(problem.with_targets(Targets::Relative(vec![0.5, 1.5])).is_err());
    }

    #[test]
    fn target_count_disagrees() {
        let problem = Problem::single_zone(vec![1.0, 2.0], amounts()).unwrap();
        assert!(problem.with_targets(Targets::Relative(vec![0.5])).is_err());
    }

    #[test]
    fn non_positive_budget() {
        let problem = Problem::single_zone(vec![1.0, 2.0], amounts()).unwrap();
        assert!(problem.with_objective(Objective::MaximumUtility { budget: 0.0 }).is_err());
    }

    #[test]
    fn lock_out_of_range() {
        let problem = Problem::single_zone(vec![1.0, 2.0], amounts()).unwrap();
        assert!(problem.with_locked_in(vec![(2, 0)]).is_err());
    }

    #[test]
    fn phylogeny_references_unknown_feature() {
        let problem = Problem::single_zone(vec![1.0, 2.0], amounts()).unwrap();
        let objective = Objective::MaximumPhylogeneticDiversity {
            budget: 10.0,
            phylogeny: Phylogeny {
                branch_lengths: vec![1.0],
                branch_features: vec![vec![2]],
            },
        };
        assert!(problem.with_objective(objective).is_err());
    }

    #[test]
    fn modifiers_leave_base_intact() {
        let base = Problem::single_zone(vec![1.0, 2.0], amounts()).unwrap();
        let derived = base.clone()
            .with_targets(Targets::Relative(vec![0.5, 0.5])).unwrap();

        assert!(base.targets.is_none());
        assert!(derived.targets.is_some());
    }
}
