//! # Sparse matrices
//!
//! A sparse matrix with both a row major and a column major index. The row
//! major side is the one that gets written during compilation; the column
//! major mirror exists because the presolve checks read per-column data
//! (bounds, feature amounts per planning unit).
use num_traits::Float;

use crate::data::linear_algebra::SparseTuple;

/// Sparse matrix with dual row major and column major storage.
///
/// The number of columns is fixed at creation; rows are appended one at a
/// time. Indices start at `0`.
#[derive(Debug, Clone, PartialEq)]
pub struct Sparse<F> {
    rows: Vec<Vec<SparseTuple<F>>>,
    columns: Vec<Vec<SparseTuple<F>>>,
}

impl<F: Float> Sparse<F> {
    /// Create a matrix with no rows and `nr_columns` columns.
    #[must_use]
    pub fn new(nr_columns: usize) -> Self {
        debug_assert!(nr_columns > 0);

        Self {
            rows: Vec::new(),
            columns: vec![Vec::new(); nr_columns],
        }
    }

    /// Create a matrix from row data.
    ///
    /// Tuples don't need to be sorted; explicit zeros are dropped.
    #[must_use]
    pub fn from_rows(nr_columns: usize, rows: Vec<Vec<SparseTuple<F>>>) -> Self {
        let mut matrix = Self::new(nr_columns);
        for row in rows {
            matrix.push_row(row);
        }

        matrix
    }

    /// Append a row, returning its index.
    ///
    /// Column indices within the row must be unique and within bounds.
    pub fn push_row(&mut self, mut row: Vec<SparseTuple<F>>) -> usize {
        row.retain(|&(_, value)| value != F::zero());
        row.sort_unstable_by_key(|&(column, _)| column);
        debug_assert!(row.iter().all(|&(column, _)| column < self.nr_columns()));
        debug_assert!(row.windows(2).all(|window| window[0].0 < window[1].0));

        let index = self.rows.len();
        for &(column, value) in &row {
            self.columns[column].push((index, value));
        }
        self.rows.push(row);

        index
    }

    /// All (`column`, `value`) tuples of row `i`, ordered by column.
    #[must_use]
    pub fn row(&self, i: usize) -> &[SparseTuple<F>] {
        debug_assert!(i < self.nr_rows());

        &self.rows[i]
    }

    /// All (`row`, `value`) tuples of column `j`, ordered by row.
    #[must_use]
    pub fn column(&self, j: usize) -> &[SparseTuple<F>] {
        debug_assert!(j < self.nr_columns());

        &self.columns[j]
    }

    /// The value at coordinate (`i`, `j`), zero when no entry is stored.
    #[must_use]
    pub fn get(&self, i: usize, j: usize) -> F {
        debug_assert!(i < self.nr_rows());
        debug_assert!(j < self.nr_columns());

        match self.rows[i].iter().find(|&&(column, _)| column == j) {
            Some(&(_, value)) => value,
            None => F::zero(),
        }
    }

    /// Sum of all values in row `i`.
    #[must_use]
    pub fn row_sum(&self, i: usize) -> F {
        debug_assert!(i < self.nr_rows());

        self.rows[i].iter().fold(F::zero(), |total, &(_, value)| total + value)
    }

    /// Iterate over all rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[SparseTuple<F>]> {
        self.rows.iter().map(Vec::as_slice)
    }

    /// The number of rows.
    #[must_use]
    pub fn nr_rows(&self) -> usize {
        self.rows.len()
    }

    /// The number of columns.
    #[must_use]
    pub fn nr_columns(&self) -> usize {
        self.columns.len()
    }

    /// The number of stored (nonzero) values.
    #[must_use]
    pub fn size(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn test_matrix() -> Sparse<f64> {
        Sparse::from_rows(3, vec![
            vec![(0, 1_f64), (1, 2_f64)],
            vec![(2, 6_f64), (1, 5_f64)],
        ])
    }

    #[test]
    fn create() {
        let m = test_matrix();

        assert_eq!(m.nr_rows(), 2);
        assert_eq!(m.nr_columns(), 3);
        assert_eq!(m.size(), 4);
    }

    #[test]
    fn get() {
        let m = test_matrix();

        assert_eq!(m.get(0, 0), 1_f64);
        assert_eq!(m.get(0, 2), 0_f64);
        assert_eq!(m.get(1, 2), 6_f64);
    }

    #[test]
    fn rows_are_sorted() {
        let m = test_matrix();

        assert_eq!(m.row(1), &[(1, 5_f64), (2, 6_f64)]);
    }

    #[test]
    fn explicit_zeros_are_dropped() {
        let mut m = Sparse::new(2);
        m.push_row(vec![(0, 0_f64), (1, 3_f64)]);

        assert_eq!(m.size(), 1);
        assert_eq!(m.row(0), &[(1, 3_f64)]);
    }

    #[test]
    fn column_mirror() {
        let m = test_matrix();

        assert_eq!(m.column(1), &[(0, 2_f64), (1, 5_f64)]);
        assert_eq!(m.column(2), &[(1, 6_f64)]);
    }

    #[test]
    fn row_sum() {
        let m = test_matrix();

        assert_eq!(m.row_sum(0), 3_f64);
        assert_eq!(m.row_sum(1), 11_f64);
    }

    #[test]
    #[should_panic]
    fn out_of_bounds_get() {
        let m = test_matrix();

        let _ = m.get(2, 0);
    }
}
