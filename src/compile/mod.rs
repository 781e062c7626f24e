//! # Problem compilation
//!
//! Deterministic, side-effect-free translation of a declarative planning
//! problem into a solver-ready mixed-integer linear program: an objective
//! vector, a sparse constraint matrix, row senses and right-hand sides,
//! variable bounds and kinds, and per-column/per-row diagnostic tags.
//!
//! Columns are laid out in tagged blocks: all (planning unit × zone)
//! decisions first, then the auxiliary blocks each active module
//! contributes. Rows mirror this with one block per structural constraint
//! family. Block offsets are cumulative sums of the block sizes.
use cumsum::cumsum_array_owned;
use enum_map::{Enum, EnumMap, enum_map};
use itertools::repeat_n;

use crate::data::linear_algebra::SparseTuple;
use crate::data::linear_algebra::matrix::Sparse;
use crate::data::problem::{Objective, Problem, Targets};
use crate::data::problem::elements::{
    ColumnTag, ConstraintSense, DecisionKind, Direction, RowTag, VariableKind,
};
use crate::data::problem::error::InvalidSpecificationError;

mod constraint;
mod objective;
mod penalty;

/// A compiled optimization problem.
///
/// The artifact handed to solver backends: a generic MILP in the form
/// optimize `objective · x` subject to `A x {≤, =, ≥} b` and
/// `lb ≤ x ≤ ub`, with declared variable kinds. The tag sequences exist for
/// diagnostics only and play no role in solving.
///
/// Built once per solve invocation from an immutable specification and
/// never mutated afterwards.
#[derive(Debug, Clone, PartialEq)]
pub struct CompiledProblem {
    direction: Direction,
    objective: Vec<f64>,
    bounds: Vec<(f64, f64)>,
    kinds: Vec<VariableKind>,
    constraints: Sparse<f64>,
    senses: Vec<ConstraintSense>,
    rhs: Vec<f64>,
    column_tags: Vec<ColumnTag>,
    row_tags: Vec<RowTag>,
}

impl CompiledProblem {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        direction: Direction,
        objective: Vec<f64>,
        bounds: Vec<(f64, f64)>,
        kinds: Vec<VariableKind>,
        constraints: Sparse<f64>,
        senses: Vec<ConstraintSense>,
        rhs: Vec<f64>,
        column_tags: Vec<ColumnTag>,
        row_tags: Vec<RowTag>,
    ) -> Self {
        let compiled = Self {
            direction,
            objective,
            bounds,
            kinds,
            constraints,
            senses,
            rhs,
            column_tags,
            row_tags,
        };
        debug_assert!(is_consistent(&compiled));

        compiled
    }

    /// Direction of optimization.
    #[must_use]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Objective coefficients, one per column.
    #[must_use]
    pub fn objective(&self) -> &[f64] {
        &self.objective
    }

    /// Per-column (lower, upper) bounds.
    ///
    /// A column is locked in when both are one, locked out when both are
    /// zero.
    #[must_use]
    pub fn bounds(&self) -> &[(f64, f64)] {
        &self.bounds
    }

    /// Per-column variable kinds, as declared to the backend.
    #[must_use]
    pub fn kinds(&self) -> &[VariableKind] {
        &self.kinds
    }

    /// The sparse constraint matrix, rows = constraints, columns =
    /// variables.
    #[must_use]
    pub fn constraints(&self) -> &Sparse<f64> {
        &self.constraints
    }

    /// Per-row relational senses.
    #[must_use]
    pub fn senses(&self) -> &[ConstraintSense] {
        &self.senses
    }

    /// Per-row right-hand sides.
    #[must_use]
    pub fn rhs(&self) -> &[f64] {
        &self.rhs
    }

    /// Per-column diagnostic tags.
    #[must_use]
    pub fn column_tags(&self) -> &[ColumnTag] {
        &self.column_tags
    }

    /// Per-row diagnostic tags.
    #[must_use]
    pub fn row_tags(&self) -> &[RowTag] {
        &self.row_tags
    }

    /// The number of columns (decision variables).
    #[must_use]
    pub fn nr_columns(&self) -> usize {
        self.objective.len()
    }

    /// The number of rows (structural constraints).
    #[must_use]
    pub fn nr_rows(&self) -> usize {
        self.rhs.len()
    }
}

/// Check whether the dimensions and orderings of a `CompiledProblem` agree.
///
/// Expensive; use in debugging only. Doubles as documentation of the
/// invariants on the artifact: all per-column sequences have one entry per
/// matrix column, all per-row sequences one entry per matrix row, and both
/// tag sequences are grouped in block order.
fn is_consistent(compiled: &CompiledProblem) -> bool {
    use itertools::Itertools;

    let nr_columns = compiled.constraints.nr_columns();
    let nr_rows = compiled.constraints.nr_rows();

    let columns = [
        compiled.objective.len(),
        compiled.bounds.len(),
        compiled.kinds.len(),
        compiled.column_tags.len(),
    ].iter().all(|&length| length == nr_columns);
    let rows = [
        compiled.senses.len(),
        compiled.rhs.len(),
        compiled.row_tags.len(),
    ].iter().all(|&length| length == nr_rows);

    let columns_grouped = compiled.column_tags.iter()
        .tuple_windows()
        .all(|(first, second)| first.into_usize() <= second.into_usize());
    let rows_grouped = compiled.row_tags.iter()
        .tuple_windows()
        .all(|(first, second)| first.into_usize() <= second.into_usize());

    let finite = compiled.objective.iter().all(|value| value.is_finite())
        && compiled.rhs.iter().all(|value| value.is_finite());

    [columns, rows, columns_grouped, rows_grouped, finite].iter().all(|&v| v)
}

/// Column layout of a compiled problem.
///
/// Knows where every tagged block starts and ends; all column index
/// arithmetic lives here.
pub(crate) struct Layout {
    nr_units: usize,
    /// End index (exclusive) of each tagged column block.
    group_end: EnumMap<ColumnTag, usize>,
    /// Number of off-diagonal pairs per penalty, per zone.
    nr_boundary_pairs: usize,
    nr_connectivity_pairs: usize,
}

impl Layout {
    fn new(problem: &Problem) -> Self {
        let objective = problem.objective.as_ref();
        let nr_amount = match objective {
            Some(Objective::MaximumUtility { .. }) => problem.nr_features(),
            _ => 0,
        };
        let nr_feature_met = match objective {
            Some(Objective::MaximumFeatures { .. })
            | Some(Objective::MaximumPhylogeneticDiversity { .. }) => problem.nr_features(),
            _ => 0,
        };
        let nr_branch_met = match objective {
            Some(Objective::MaximumPhylogeneticDiversity { phylogeny, .. }) => {
                phylogeny.branch_lengths.len()
            },
            _ => 0,
        };

        let nr_zones = problem.nr_zones();
        let nr_boundary_pairs = problem.boundary.as_ref()
            .map_or(0, |penalty| penalty.data.pairs().len());
        let nr_connectivity_pairs = problem.connectivity.as_ref()
            .map_or(0, |penalty| penalty.data.pairs().len());
        let nr_asymmetric_pairs = problem.asymmetric_connectivity.as_ref()
            .map_or(0, |penalty| penalty.data.pairs().len());

        let cumulative = cumsum_array_owned([
            problem.nr_units() * nr_zones,
            nr_amount,
            nr_feature_met,
            nr_branch_met,
            nr_boundary_pairs * nr_zones,
            nr_connectivity_pairs * nr_zones,
            nr_asymmetric_pairs * nr_zones,
        ]);
        let group_end = enum_map! {
            ColumnTag::PlanningUnit           => cumulative[0],
            ColumnTag::Amount                 => cumulative[1],
            ColumnTag::FeatureMet             => cumulative[2],
            ColumnTag::BranchMet              => cumulative[3],
            ColumnTag::Boundary               => cumulative[4],
            ColumnTag::Connectivity           => cumulative[5],
            ColumnTag::AsymmetricConnectivity => cumulative[6],
        };

        Self {
            nr_units: problem.nr_units(),
            group_end,
            nr_boundary_pairs,
            nr_connectivity_pairs,
        }
    }

    /// Column of the (unit, zone) allocation decision.
    pub fn pu(&self, unit: usize, zone: usize) -> usize {
        debug_assert!(unit < self.nr_units);

        zone * self.nr_units + unit
    }

    /// Column of the `amount` auxiliary of a feature.
    pub fn amount(&self, feature: usize) -> usize {
        self.group_end[ColumnTag::PlanningUnit] + feature
    }

    /// Column of the `spp_met` auxiliary of a feature.
    pub fn feature_met(&self, feature: usize) -> usize {
        self.group_end[ColumnTag::Amount] + feature
    }

    /// Column of the `branch_met` auxiliary of a phylogeny branch.
    pub fn branch_met(&self, branch: usize) -> usize {
        self.group_end[ColumnTag::FeatureMet] + branch
    }

    /// Column of a boundary auxiliary: pair `pair` within zone `zone`.
    pub fn boundary(&self, zone: usize, pair: usize) -> usize {
        debug_assert!(pair < self.nr_boundary_pairs);

        self.group_end[ColumnTag::BranchMet] + zone * self.nr_boundary_pairs + pair
    }

    /// Column of a connectivity auxiliary: pair `pair` within zone `zone`.
    pub fn connectivity(&self, zone: usize, pair: usize) -> usize {
        debug_assert!(pair < self.nr_connectivity_pairs);

        self.group_end[ColumnTag::Boundary] + zone * self.nr_connectivity_pairs + pair
    }

    /// Column of an asymmetric connectivity auxiliary.
    pub fn asymmetric(&self, index: usize) -> usize {
        self.group_end[ColumnTag::Connectivity] + index
    }

    /// Total number of columns.
    pub fn nr_columns(&self) -> usize {
        self.group_end[ColumnTag::AsymmetricConnectivity]
    }

    /// Tag of every column, in block order.
    fn column_tags(&self) -> Vec<ColumnTag> {
        let mut tags = Vec::with_capacity(self.nr_columns());
        let mut block_start = 0;
        for (tag, &block_end) in &self.group_end {
            tags.extend(repeat_n(tag, block_end - block_start));
            block_start = block_end;
        }

        tags
    }
}

/// The artifact under construction.
///
/// Columns exist from the start (the layout fixes their number); rows are
/// appended one structural family at a time, tags recorded alongside.
pub(crate) struct Assembly {
    direction: Direction,
    objective: Vec<f64>,
    bounds: Vec<(f64, f64)>,
    kinds: Vec<VariableKind>,
    constraints: Sparse<f64>,
    senses: Vec<ConstraintSense>,
    rhs: Vec<f64>,
    row_tags: Vec<RowTag>,
}

impl Assembly {
    fn new(problem: &Problem, layout: &Layout, direction: Direction) -> Self {
        let decision_kind = match problem.decisions {
            DecisionKind::Binary => VariableKind::Binary,
            DecisionKind::Proportion => VariableKind::Continuous,
        };

        let mut bounds = Vec::with_capacity(layout.nr_columns());
        let mut kinds = Vec::with_capacity(layout.nr_columns());
        for tag in layout.column_tags() {
            let (bound, kind) = match tag {
                ColumnTag::PlanningUnit => ((0_f64, 1_f64), decision_kind),
                ColumnTag::Amount => ((0_f64, f64::INFINITY), VariableKind::Continuous),
                ColumnTag::FeatureMet
                | ColumnTag::BranchMet => ((0_f64, 1_f64), VariableKind::Binary),
                ColumnTag::Boundary
                | ColumnTag::Connectivity
                | ColumnTag::AsymmetricConnectivity => {
                    ((0_f64, 1_f64), VariableKind::Continuous)
                },
            };
            bounds.push(bound);
            kinds.push(kind);
        }

        Self {
            direction,
            objective: vec![0_f64; layout.nr_columns()],
            bounds,
            kinds,
            constraints: Sparse::new(layout.nr_columns()),
            senses: Vec::new(),
            rhs: Vec::new(),
            row_tags: Vec::new(),
        }
    }

    /// Add to an objective coefficient.
    pub fn add_objective(&mut self, column: usize, value: f64) {
        self.objective[column] += value;
    }

    /// Fix the bounds of a column.
    pub fn set_bounds(&mut self, column: usize, lower: f64, upper: f64) {
        self.bounds[column] = (lower, upper);
    }

    /// Append a constraint row.
    pub fn push_row(
        &mut self,
        tag: RowTag,
        tuples: Vec<SparseTuple<f64>>,
        sense: ConstraintSense,
        rhs: f64,
    ) {
        debug_assert!(self.row_tags.last()
            .map_or(true, |&last| last.into_usize() <= tag.into_usize()));

        self.constraints.push_row(tuples);
        self.senses.push(sense);
        self.rhs.push(rhs);
        self.row_tags.push(tag);
    }

    fn into_compiled(self, column_tags: Vec<ColumnTag>) -> CompiledProblem {
        CompiledProblem::new(
            self.direction,
            self.objective,
            self.bounds,
            self.kinds,
            self.constraints,
            self.senses,
            self.rhs,
            column_tags,
            self.row_tags,
        )
    }
}

/// Compile a specification into a solver-ready problem.
///
/// A pure function: the specification is only read, and identical
/// specifications compile to identical artifacts.
///
/// # Errors
///
/// When cross-cutting preconditions are violated: no objective, missing
/// targets for an objective that needs them, or a (unit, zone) allocation
/// locked both in and out.
pub fn compile(problem: &Problem) -> Result<CompiledProblem, InvalidSpecificationError> {
    let objective = problem.objective.as_ref()
        .ok_or_else(|| InvalidSpecificationError::new("an objective is required to compile"))?;

    if let Some(&(unit, zone)) = problem.locked_in.iter()
        .find(|lock| problem.locked_out.contains(lock))
    {
        return Err(InvalidSpecificationError::new(format!(
            "planning unit {} is locked both in and out in zone {}",
            unit, zone,
        )));
    }

    let direction = match objective {
        Objective::MinimumSet => Direction::Minimize,
        _ => Direction::Maximize,
    };
    let layout = Layout::new(problem);
    let mut assembly = Assembly::new(problem, &layout, direction);

    constraint::assignment_rows(problem, &layout, &mut assembly);
    objective::emit(problem, objective, &layout, &mut assembly)?;
    constraint::neighbor_rows(problem, &layout, &mut assembly);
    constraint::linear_rows(problem, &mut assembly);
    constraint::apply_locks(problem, &layout, &mut assembly);
    penalty::emit(problem, &layout, &mut assembly);

    Ok(assembly.into_compiled(layout.column_tags()))
}

/// Representation target of every feature, as absolute amounts.
///
/// Relative targets scale with the total available amount of their feature;
/// exact values are preserved, rounding concerns live in the presolve
/// checks only.
fn target_values(problem: &Problem, targets: &Targets) -> Vec<f64> {
    match targets {
        Targets::Absolute(values) => values.clone(),
        Targets::Relative(fractions) => fractions.iter()
            .enumerate()
            .map(|(feature, fraction)| fraction * problem.total_amount(feature))
            .collect(),
    }
}
