//! # Boundary and connectivity data
//!
//! The geometry layer summarizes spatial relations between planning units as
//! sparse pairwise structures. For boundary data, off-diagonal entries carry
//! shared-edge lengths and diagonal entries carry exposed-edge lengths; for
//! connectivity data the values are scores of the same shape. This module
//! defines those structures and the seam through which geometry backends
//! provide them; the geometry computations themselves live outside this
//! crate.
use crate::data::problem::error::InvalidSpecificationError;

/// Sparse symmetric pairwise data over planning units.
///
/// Each unordered pair is stored once, with `first < second`. Diagonal
/// entries are kept separately, one slot per planning unit.
#[derive(Debug, Clone, PartialEq)]
pub struct Adjacency {
    nr_units: usize,
    diagonal: Vec<f64>,
    pairs: Vec<(usize, usize, f64)>,
}

impl Adjacency {
    /// Create a structure from (row, column, value) entries.
    ///
    /// Entries with `row == column` fill the diagonal. Every unordered pair
    /// may appear at most once, in either orientation.
    ///
    /// # Errors
    ///
    /// When an index is out of range, a value is not finite, or a pair or
    /// diagonal slot is provided twice.
    pub fn from_entries(
        nr_units: usize,
        entries: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Result<Self, InvalidSpecificationError> {
        if nr_units == 0 {
            return Err(InvalidSpecificationError::new(
                "adjacency data needs at least one planning unit",
            ));
        }

        let mut diagonal = vec![0_f64; nr_units];
        let mut seen_diagonal = vec![false; nr_units];
        let mut pairs = Vec::new();
        for (row, column, value) in entries {
            if row >= nr_units || column >= nr_units {
                return Err(InvalidSpecificationError::new(format!(
                    "adjacency entry ({}, {}) is out of range for {} planning units",
                    row, column, nr_units,
                )));
            }
            if !value.is_finite() {
                return Err(InvalidSpecificationError::new(format!(
                    "adjacency entry ({}, {}) has a non finite value",
                    row, column,
                )));
            }

            if row == column {
                if seen_diagonal[row] {
                    return Err(InvalidSpecificationError::new(format!(
                        "diagonal adjacency entry {} was provided twice",
                        row,
                    )));
                }
                seen_diagonal[row] = true;
                diagonal[row] = value;
            } else {
                let (first, second) = if row < column { (row, column) } else { (column, row) };
                if pairs.iter().any(|&(i, j, _)| (i, j) == (first, second)) {
                    return Err(InvalidSpecificationError::new(format!(
                        "adjacency pair ({}, {}) was provided twice",
                        first, second,
                    )));
                }
                pairs.push((first, second, value));
            }
        }
        pairs.sort_unstable_by_key(|&(first, second, _)| (first, second));

        Ok(Self { nr_units, diagonal, pairs })
    }

    /// The number of planning units this structure spans.
    #[must_use]
    pub fn nr_units(&self) -> usize {
        self.nr_units
    }

    /// Diagonal values, one per planning unit.
    #[must_use]
    pub fn diagonal(&self) -> &[f64] {
        &self.diagonal
    }

    /// Off-diagonal entries as (first, second, value) with `first < second`,
    /// ordered lexicographically.
    #[must_use]
    pub fn pairs(&self) -> &[(usize, usize, f64)] {
        &self.pairs
    }
}

/// Sparse directed pairwise scores over planning units.
///
/// Used for asymmetric connectivity, where the score from unit `i` to unit
/// `j` need not equal the reverse. Diagonal entries are not meaningful and
/// rejected.
#[derive(Debug, Clone, PartialEq)]
pub struct Directed {
    nr_units: usize,
    pairs: Vec<(usize, usize, f64)>,
}

impl Directed {
    /// Create a structure from directed (from, to, score) entries.
    ///
    /// # Errors
    ///
    /// When an index is out of range, a score is not finite, an entry lies
    /// on the diagonal, or an ordered pair is provided twice.
    pub fn from_entries(
        nr_units: usize,
        entries: impl IntoIterator<Item = (usize, usize, f64)>,
    ) -> Result<Self, InvalidSpecificationError> {
        if nr_units == 0 {
            return Err(InvalidSpecificationError::new(
                "connectivity data needs at least one planning unit",
            ));
        }

        let mut pairs = Vec::new();
        for (from, to, value) in entries {
            if from >= nr_units || to >= nr_units {
                return Err(InvalidSpecificationError::new(format!(
                    "connectivity entry ({}, {}) is out of range for {} planning units",
                    from, to, nr_units,
                )));
            }
            if from == to {
                return Err(InvalidSpecificationError::new(format!(
                    "directed connectivity entry ({}, {}) lies on the diagonal",
                    from, to,
                )));
            }
            if !value.is_finite() {
                return Err(InvalidSpecificationError::new(format!(
                    "connectivity entry ({}, {}) has a non finite value",
                    from, to,
                )));
            }
            if pairs.iter().any(|&(i, j, _)| (i, j) == (from, to)) {
                return Err(InvalidSpecificationError::new(format!(
                    "connectivity pair ({}, {}) was provided twice",
                    from, to,
                )));
            }
            pairs.push((from, to, value));
        }
        pairs.sort_unstable_by_key(|&(from, to, _)| (from, to));

        Ok(Self { nr_units, pairs })
    }

    /// The number of planning units this structure spans.
    #[must_use]
    pub fn nr_units(&self) -> usize {
        self.nr_units
    }

    /// Directed entries as (from, to, score), ordered lexicographically.
    #[must_use]
    pub fn pairs(&self) -> &[(usize, usize, f64)] {
        &self.pairs
    }
}

/// Computes boundary and connectivity summaries for one geometry kind.
///
/// Raster, polygon, line and point geometries each get their own
/// implementation outside this crate; the compiler only ever consumes the
/// resulting [`Adjacency`] values.
pub trait GeometrySource {
    /// Shared- and exposed-edge lengths between planning units.
    fn boundary(&self) -> Result<Adjacency, InvalidSpecificationError>;

    /// Symmetric connectivity scores between planning units.
    fn connectivity(&self) -> Result<Adjacency, InvalidSpecificationError>;
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn pairs_are_normalized_and_sorted() {
        let data = Adjacency::from_entries(3, vec![
            (2, 1, 3.0),
            (0, 1, 4.0),
            (0, 0, 10.0),
        ]).unwrap();

        assert_eq!(data.pairs(), &[(0, 1, 4.0), (1, 2, 3.0)]);
        assert_eq!(data.diagonal(), &[10.0, 0.0, 0.0]);
    }

    #[test]
    fn out_of_range_entry() {
        assert!(Adjacency::from_entries(2, vec![(0, 2, 1.0)]).is_err());
    }

    #[test]
    fn non_finite_entry() {
        assert!(Adjacency::from_entries(2, vec![(0, 1, f64::NAN)]).is_err());
    }

    #[test]
    fn duplicate_pair_in_either_orientation() {
        assert!(Adjacency::from_entries(2, vec![(0, 1, 1.0), (1, 0, 1.0)]).is_err());
    }

    #[test]
    fn directed_rejects_diagonal() {
        assert!(Directed::from_entries(2, vec![(1, 1, 1.0)]).is_err());
    }

    #[test]
    fn directed_keeps_both_orientations() {
        let data = Directed::from_entries(2, vec![(1, 0, 2.0), (0, 1, 5.0)]).unwrap();

        assert_eq!(data.pairs(), &[(0, 1, 5.0), (1, 0, 2.0)]);
    }
}
