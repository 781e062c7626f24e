//! # Building blocks to describe planning problems.
use std::fmt;
use std::fmt::Display;

use enum_map::Enum;

/// A `ConstraintSense` relates a constraint row to its right-hand side.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ConstraintSense {
    Equal,
    Greater,
    Less,
}

/// Direction of optimization.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Direction {
    Minimize,
    Maximize,
}

/// Kind of a decision variable, as declared to the solver backend.
#[allow(missing_docs)]
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum VariableKind {
    Binary,
    Continuous,
}

/// How planning units are allocated to zones.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum DecisionKind {
    /// A unit is allocated to a zone entirely or not at all.
    Binary,
    /// A unit may be allocated to a zone fractionally, in `[0, 1]`.
    Proportion,
}

/// Category of a column, used for diagnostics only.
///
/// The variant order is the column block order of a compiled problem: all
/// planning unit decisions come first, auxiliary blocks follow in this
/// order.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Enum)]
pub enum ColumnTag {
    /// A (planning unit, zone) allocation decision.
    PlanningUnit,
    /// Continuous auxiliary holding the amount of a feature (maximum
    /// utility objective).
    Amount,
    /// Binary auxiliary indicating a feature's target is met (maximum
    /// features and phylogenetic objectives).
    FeatureMet,
    /// Binary auxiliary indicating a phylogeny branch is represented.
    BranchMet,
    /// Boundary penalty linearization auxiliary.
    Boundary,
    /// Connectivity penalty linearization auxiliary.
    Connectivity,
    /// Asymmetric connectivity penalty linearization auxiliary.
    AsymmetricConnectivity,
}

impl ColumnTag {
    /// Short symbolic label, as reported in diagnostics.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::PlanningUnit => "pu",
            Self::Amount => "amount",
            Self::FeatureMet => "spp_met",
            Self::BranchMet => "branch_met",
            Self::Boundary => "b",
            Self::Connectivity => "c",
            Self::AsymmetricConnectivity => "ac",
        }
    }
}

impl Display for ColumnTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category of a constraint row, used for diagnostics only.
///
/// The variant order is the row block order of a compiled problem.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Enum)]
pub enum RowTag {
    /// A unit is allocated to at most one zone.
    ZoneAssignment,
    /// Total cost stays within the budget.
    Budget,
    /// A feature's held amount reaches its target.
    Target,
    /// Links an `amount` auxiliary to the held amount of its feature.
    AmountLink,
    /// Links a `branch_met` auxiliary to its features' `spp_met` columns.
    BranchLink,
    /// A selected unit has enough selected neighbors.
    NeighborCount,
    /// Caller-supplied linear constraint.
    Linear,
    /// Boundary penalty linearization row.
    Boundary,
    /// Connectivity penalty linearization row.
    Connectivity,
    /// Asymmetric connectivity penalty linearization row.
    AsymmetricConnectivity,
}

impl RowTag {
    /// Short symbolic label, as reported in diagnostics.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            Self::ZoneAssignment => "pu",
            Self::Budget => "budget",
            Self::Target => "spp_target",
            Self::AmountLink => "amount",
            Self::BranchLink => "branch_met",
            Self::NeighborCount => "n",
            Self::Linear => "linear",
            Self::Boundary => "b",
            Self::Connectivity => "c",
            Self::AsymmetricConnectivity => "ac",
        }
    }
}

impl Display for RowTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.label())
    }
}
