//! A maximum features problem over a 2 × 2 grid with a boundary penalty and
//! deliberately pathological scales: huge feature weights, a budget that
//! rounds to zero, and every planning unit locked out. The compiled
//! structure is still well formed, and presolve reports every finding at
//! once.
use crate::data::adjacency::Adjacency;
use crate::data::linear_algebra::matrix::Sparse;
use crate::data::problem::{Objective, Problem, Targets};
use crate::data::problem::elements::{ColumnTag, ConstraintSense, Direction, RowTag};
use crate::presolve;

/// Shared edges of a 2 × 2 grid of unit squares, with the outer sides as
/// exposed lengths.
fn grid_boundary() -> Adjacency {
    Adjacency::from_entries(4, vec![
        (0, 1, 1.0), (0, 2, 1.0), (1, 3, 1.0), (2, 3, 1.0),
        (0, 0, 2.0), (1, 1, 2.0), (2, 2, 2.0), (3, 3, 2.0),
    ]).unwrap()
}

fn problem() -> Problem {
    let amounts = Sparse::from_rows(4, vec![
        vec![(0, 1_f64), (1, 1_f64)],
        vec![(2, 1_f64), (3, 1_f64)],
    ]);
    Problem::single_zone(vec![1.0, 1.0, 1.0, 1.0], amounts).unwrap()
        .with_objective(Objective::MaximumFeatures { budget: 1e-7 }).unwrap()
        .with_targets(Targets::Absolute(vec![1.0, 1.0])).unwrap()
        .with_feature_weights(vec![2e6, 2e6]).unwrap()
        .with_boundary_penalty(0.5, grid_boundary()).unwrap()
        .with_locked_out(vec![(0, 0), (1, 0), (2, 0), (3, 0)]).unwrap()
}

#[test]
fn compiles_to_expected_structure() {
    let compiled = problem().compile().unwrap();

    assert_eq!(compiled.direction(), Direction::Maximize);
    // 4 decisions, 2 spp_met auxiliaries, 4 boundary auxiliaries
    assert_eq!(compiled.nr_columns(), 10);
    assert_eq!(&compiled.column_tags()[..4], &[ColumnTag::PlanningUnit; 4]);
    assert_eq!(&compiled.column_tags()[4..6], &[ColumnTag::FeatureMet; 2]);
    assert_eq!(&compiled.column_tags()[6..], &[ColumnTag::Boundary; 4]);

    // one budget row, two target rows, two linearization rows per edge
    assert_eq!(compiled.nr_rows(), 1 + 2 + 2 * 4);
    assert_eq!(compiled.row_tags()[0], RowTag::Budget);
    assert_eq!(compiled.senses()[0], ConstraintSense::Less);
    assert_eq!(&compiled.row_tags()[1..3], &[RowTag::Target; 2]);
    assert_eq!(&compiled.row_tags()[3..], &[RowTag::Boundary; 8]);

    // maximizing: the penalty subtracts from the objective, so a realized
    // shared edge earns its length back twice
    assert_eq!(compiled.objective()[6], 2.0 * 0.5 * 1.0);
    // exposed plus both shared edges of unit 0, penalized
    assert_eq!(compiled.objective()[0], -0.5 * (2.0 + 1.0 + 1.0));
    // target rows tie the met auxiliary to the held amount
    assert_eq!(compiled.constraints().get(1, 4), -1.0);
    assert_eq!(compiled.constraints().get(1, 0), 1.0);

    // everything locked out
    assert!(compiled.bounds()[..4].iter().all(|&bound| bound == (0.0, 0.0)));
}

#[test]
fn presolve_reports_every_finding() {
    let report = presolve::check(&problem().compile().unwrap());

    assert!(!report.pass());
    let warnings = report.warnings();
    assert!(warnings.iter().any(|warning| warning.contains("locked out")));
    assert!(warnings.iter().any(|warning| warning.contains("feature weights")));
    assert!(warnings.iter()
        .any(|warning| warning.contains("budget") && warning.contains("zero")));
    assert_eq!(
        warnings.iter().filter(|warning| warning.contains("locked out")).count(),
        1,
    );
}

#[test]
fn rescaled_variant_only_reports_the_locks() {
    let problem = problem()
        .with_feature_weights(vec![1.0, 1.0]).unwrap();
    let report = presolve::check(&problem.compile().unwrap());

    assert!(!report.pass());
    assert!(report.warnings().iter().all(|warning| !warning.contains("feature weights")));
}
