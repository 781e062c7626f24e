//! A maximum utility problem across two zones, allocated fractionally, with
//! a connectivity reward, a directed connectivity reward, a neighbor
//! requirement and a caller-supplied linear row. Together these exercise
//! every auxiliary block and structural row family the single-zone
//! scenarios leave out.
use crate::data::adjacency::{Adjacency, Directed};
use crate::data::linear_algebra::matrix::Sparse;
use crate::data::problem::{LinearConstraint, Objective, Problem};
use crate::data::problem::elements::{ColumnTag, ConstraintSense, Direction, RowTag, VariableKind};
use crate::presolve;

fn problem() -> Problem {
    let zone_0 = Sparse::from_rows(3, vec![
        vec![(0, 1_f64), (1, 2_f64)],
        vec![(1, 1_f64)],
    ]);
    let zone_1 = Sparse::from_rows(3, vec![
        vec![(2, 3_f64)],
        vec![(0, 2_f64), (2, 1_f64)],
    ]);
    let connectivity = Adjacency::from_entries(3, vec![
        (0, 1, 1.0),
        (1, 1, 2.0),
    ]).unwrap();
    let corridors = Directed::from_entries(3, vec![(2, 0, 2.0)]).unwrap();
    let neighbors = Adjacency::from_entries(3, vec![
        (0, 1, 1.0),
        (1, 2, 1.0),
    ]).unwrap();

    Problem::new(
        vec![vec![10.0, 10.0, 10.0], vec![20.0, 20.0, 20.0]],
        vec![zone_0, zone_1],
    ).unwrap()
        .with_objective(Objective::MaximumUtility { budget: 100.0 }).unwrap()
        .with_connectivity_penalty(0.5, connectivity).unwrap()
        .with_asymmetric_connectivity_penalty(0.25, corridors).unwrap()
        .with_neighbor_constraint(1, neighbors).unwrap()
        .with_linear_constraint(LinearConstraint {
            coefficients: vec![1.0, 0.0, 0.0, 0.0, 0.0, 2.0],
            sense: ConstraintSense::Less,
            rhs: 5.0,
        }).unwrap()
        .with_proportion_decisions()
}

#[test]
fn compiles_to_expected_structure() {
    let compiled = problem().compile().unwrap();

    assert_eq!(compiled.direction(), Direction::Maximize);
    // 6 decisions, 2 amount auxiliaries, one scored pair per zone for each
    // connectivity kind
    assert_eq!(compiled.nr_columns(), 12);
    assert_eq!(&compiled.column_tags()[..6], &[ColumnTag::PlanningUnit; 6]);
    assert_eq!(&compiled.column_tags()[6..8], &[ColumnTag::Amount; 2]);
    assert_eq!(&compiled.column_tags()[8..10], &[ColumnTag::Connectivity; 2]);
    assert_eq!(&compiled.column_tags()[10..], &[ColumnTag::AsymmetricConnectivity; 2]);

    // fractional allocation
    assert!(compiled.kinds()[..6].iter().all(|&kind| kind == VariableKind::Continuous));
    assert!(compiled.bounds()[..6].iter().all(|&bound| bound == (0.0, 1.0)));
    assert_eq!(compiled.kinds()[6], VariableKind::Continuous);
    assert_eq!(compiled.bounds()[6], (0.0, f64::INFINITY));

    // default unit weights on the amounts; maximizing, so realized
    // connectivity earns its score on the auxiliary and diagonal scores
    // reward their unit directly, in both zones
    assert_eq!(
        compiled.objective(),
        &[0.0, 1.0, 0.0, 0.0, 1.0, 0.0, 1.0, 1.0, 0.5, 0.5, 0.5, 0.5],
    );
}

#[test]
fn rows_come_out_in_block_order() {
    let compiled = problem().compile().unwrap();

    // 3 assignment, 1 budget, 2 amount links, 6 neighbor counts, 1 linear,
    // 2 linearization rows per scored pair per zone for each kind
    assert_eq!(compiled.nr_rows(), 3 + 1 + 2 + 6 + 1 + 4 + 4);
    assert_eq!(&compiled.row_tags()[..3], &[RowTag::ZoneAssignment; 3]);
    assert_eq!(compiled.row_tags()[3], RowTag::Budget);
    assert_eq!(&compiled.row_tags()[4..6], &[RowTag::AmountLink; 2]);
    assert_eq!(&compiled.row_tags()[6..12], &[RowTag::NeighborCount; 6]);
    assert_eq!(compiled.row_tags()[12], RowTag::Linear);
    assert_eq!(&compiled.row_tags()[13..17], &[RowTag::Connectivity; 4]);
    assert_eq!(&compiled.row_tags()[17..], &[RowTag::AsymmetricConnectivity; 4]);

    // a unit is allocated to at most one zone
    assert_eq!(compiled.constraints().get(0, 0), 1.0);
    assert_eq!(compiled.constraints().get(0, 3), 1.0);
    assert_eq!(compiled.senses()[0], ConstraintSense::Less);
    assert_eq!(compiled.rhs()[0], 1.0);

    // per-zone costs against the budget
    assert_eq!(compiled.constraints().get(3, 0), 10.0);
    assert_eq!(compiled.constraints().get(3, 3), 20.0);
    assert_eq!(compiled.rhs()[3], 100.0);

    // the amount auxiliary equals the held amount over both zones
    assert_eq!(compiled.senses()[4], ConstraintSense::Equal);
    assert_eq!(compiled.constraints().get(4, 0), 1.0);
    assert_eq!(compiled.constraints().get(4, 5), 3.0);
    assert_eq!(compiled.constraints().get(4, 6), -1.0);
    assert_eq!(compiled.rhs()[4], 0.0);

    // unit 0's single neighbor in zone 0
    assert_eq!(compiled.constraints().get(6, 1), 1.0);
    assert_eq!(compiled.constraints().get(6, 0), -1.0);
    assert_eq!(compiled.senses()[6], ConstraintSense::Greater);

    // the caller-supplied row, coefficients in compiled column order
    assert_eq!(compiled.constraints().get(12, 0), 1.0);
    assert_eq!(compiled.constraints().get(12, 5), 2.0);
    assert_eq!(compiled.rhs()[12], 5.0);

    // each auxiliary is forced below both of its decisions
    assert_eq!(compiled.constraints().get(13, 8), 1.0);
    assert_eq!(compiled.constraints().get(13, 0), -1.0);
    assert_eq!(compiled.constraints().get(17, 10), 1.0);
    assert_eq!(compiled.constraints().get(17, 2), -1.0);
    assert_eq!(compiled.constraints().get(18, 10), 1.0);
    assert_eq!(compiled.constraints().get(18, 0), -1.0);
}

#[test]
fn passes_presolve_cleanly() {
    let report = presolve::check(&problem().compile().unwrap());

    assert!(report.pass());
}
