use fxhash::FxHashMap;
use log::debug;

use super::*;

/// Iterator over the rows of an unrolled [`DistanceMatrix`].
///
/// Rows are produced in index order and, within a row, in column order.
/// Self pairs are always skipped. If `UPPER` is set, only pairs `(i, j)` with `i < j` are
/// produced, ie. every unordered pair exactly once.
pub struct UnrollIter<'a, I, const UPPER: bool> {
    matrix: &'a DistanceMatrix<I>,
    row: usize,
    col: usize,
}

impl<'a, I, const UPPER: bool> Iterator for UnrollIter<'a, I, UPPER>
where
    I: Identifier,
{
    type Item = UnrolledEdge<I>;

    fn next(&mut self) -> Option<Self::Item> {
        let n = self.matrix.len();
        loop {
            if self.col >= n {
                self.row += 1;
                self.col = if UPPER { self.row + 1 } else { 0 };
            }

            if self.row >= n {
                return None;
            }

            let (i, j) = (self.row, self.col);
            self.col += 1;
            if i == j || j >= n {
                continue;
            }

            let ids = self.matrix.ids();
            return Some(UnrolledEdge::new(
                ids[i].clone(),
                ids[j].clone(),
                self.matrix.get_at(i, j),
            ));
        }
    }
}

/// Flattening a matrix into a row-per-pair edge list
pub trait Unroll<I> {
    /// Returns an iterator over one [`UnrolledEdge`] per ordered pair of distinct identifiers.
    ///
    /// Pairs without a direct edge are **not** omitted: they are produced with
    /// `distance: None`.
    ///
    /// # Example
    /// ```
    /// use tollgraph::{prelude::*, algo::*};
    ///
    /// let matrix = DistanceMatrix::from_edges([(1u64, 2, 10.0), (2, 3, 5.0)]).unwrap();
    /// let rows: Vec<_> = matrix.unroll().collect();
    ///
    /// assert_eq!(rows.len(), 6);
    /// assert_eq!(rows[0], UnrolledEdge::new(1, 2, Some(10.0)));
    /// assert_eq!(rows[1], UnrolledEdge::new(1, 3, None));
    /// ```
    fn unroll(&self) -> UnrollIter<'_, I, false>;

    /// Returns an iterator over one [`UnrolledEdge`] per unordered pair of distinct
    /// identifiers, oriented along the index order.
    fn unroll_upper(&self) -> UnrollIter<'_, I, true>;

    /// Shorthand for collecting [`Unroll::unroll`]
    fn unrolled(&self) -> Vec<UnrolledEdge<I>>;
}

impl<I: Identifier> Unroll<I> for DistanceMatrix<I> {
    fn unroll(&self) -> UnrollIter<'_, I, false> {
        UnrollIter {
            matrix: self,
            row: 0,
            col: 0,
        }
    }

    fn unroll_upper(&self) -> UnrollIter<'_, I, true> {
        UnrollIter {
            matrix: self,
            row: 0,
            col: 1,
        }
    }

    fn unrolled(&self) -> Vec<UnrolledEdge<I>> {
        let rows: Vec<_> = self.unroll().collect();
        debug!(
            "Unrolled {} identifiers into {} rows",
            self.len(),
            rows.len()
        );
        rows
    }
}

/// Unrolls a raw square table given by its identifiers and rows.
///
/// # Errors
/// Returns [`Error::InvalidInput`] if the table is non-square, inconsistently indexed or
/// otherwise violates the invariants checked by [`DistanceMatrix::from_rows`].
pub fn unroll_table<I, T>(ids: T, rows: Vec<Vec<Option<Distance>>>) -> Result<Vec<UnrolledEdge<I>>>
where
    I: Identifier,
    T: IntoIterator<Item = I>,
{
    Ok(DistanceMatrix::from_rows(ids, rows)?.unrolled())
}

impl<I: Identifier> DistanceMatrix<I> {
    /// Rebuilds a matrix from an unrolled edge list.
    ///
    /// This is the inverse of [`Unroll::unroll`]: cells are **set**, not accumulated, as every
    /// unordered pair appears twice in an unrolled list. Identifiers are indexed in order of
    /// first appearance, so `from_unrolled(matrix.unroll())` reproduces the identifier order of
    /// any matrix with at least two identifiers.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if
    /// - a row is a self pair,
    /// - a distance is negative or not finite,
    /// - the same ordered pair occurs twice with different distances,
    /// - `(a, b)` and `(b, a)` carry different distances.
    pub fn from_unrolled<E, T>(rows: T) -> Result<Self>
    where
        E: Into<UnrolledEdge<I>>,
        T: IntoIterator<Item = E>,
    {
        let mut index = IdIndex::new();
        let mut cells: FxHashMap<(usize, usize), Option<Distance>> = FxHashMap::default();

        for (pos, row) in rows.into_iter().enumerate() {
            let row: UnrolledEdge<I> = row.into();
            invalid_input_unless!(
                !row.is_self_pair(),
                "Row #{pos} is a self pair of {:?}",
                row.id_start
            );
            if let Some(d) = row.distance {
                check_distance(d, || format!("row #{pos} {row:?}"))?;
            }

            let i = index.insert(row.id_start.clone());
            let j = index.insert(row.id_end.clone());

            if let Some(prev) = cells.insert((i, j), row.distance) {
                invalid_input_unless!(
                    prev == row.distance,
                    "Row #{pos} {row:?} conflicts with an earlier distance {prev:?}"
                );
            }
            if let Some(&mirrored) = cells.get(&(j, i)) {
                invalid_input_unless!(
                    mirrored == row.distance,
                    "Row #{pos} {row:?} is not symmetric to distance {mirrored:?}"
                );
            }
        }

        Ok(Self::from_symmetric_cells(
            index,
            cells
                .into_iter()
                .filter_map(|((i, j), d)| d.map(|d| (i, j, d))),
        ))
    }
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::*;

    #[test]
    fn scenario() {
        let matrix =
            DistanceMatrix::from_edges([(1001u64, 1002, 10.0), (1002, 1003, 5.0)]).unwrap();

        assert_eq!(
            matrix.unrolled(),
            vec![
                UnrolledEdge::new(1001, 1002, Some(10.0)),
                UnrolledEdge::new(1001, 1003, None),
                UnrolledEdge::new(1002, 1001, Some(10.0)),
                UnrolledEdge::new(1002, 1003, Some(5.0)),
                UnrolledEdge::new(1003, 1001, None),
                UnrolledEdge::new(1003, 1002, Some(5.0)),
            ]
        );

        let with_distance = matrix.unroll().filter_map(|e| e.to_edge()).collect_vec();
        assert_eq!(
            with_distance,
            vec![
                WeightedEdge(1001, 1002, 10.0),
                WeightedEdge(1002, 1001, 10.0),
                WeightedEdge(1002, 1003, 5.0),
                WeightedEdge(1003, 1002, 5.0),
            ]
        );
    }

    #[test]
    fn upper_triangle() {
        let matrix =
            DistanceMatrix::from_edges([(1u32, 2, 1.0), (2, 3, 2.0), (3, 1, 3.0)]).unwrap();

        assert_eq!(
            matrix.unroll_upper().collect_vec(),
            vec![
                UnrolledEdge::new(1, 2, Some(1.0)),
                UnrolledEdge::new(1, 3, Some(3.0)),
                UnrolledEdge::new(2, 3, Some(2.0)),
            ]
        );

        // Each unordered pair once, so feeding them as edges does not double count
        let rebuilt =
            DistanceMatrix::from_edges(matrix.unroll_upper().filter_map(|e| e.to_edge())).unwrap();
        assert_eq!(rebuilt, matrix);
    }

    #[test]
    fn tiny_matrices() {
        let single = DistanceMatrix::from_edges([(5u32, 5, 1.0)]).unwrap();
        assert_eq!(single.len(), 1);
        assert_eq!(single.unroll().count(), 0);
        assert_eq!(single.unroll_upper().count(), 0);

        let empty = DistanceMatrix::<u32>::from_rows([], vec![]).unwrap();
        assert_eq!(empty.unroll().count(), 0);
    }

    #[test]
    fn round_trip() {
        let matrix = DistanceMatrix::from_edges([
            (4u64, 2, 1.0),
            (2, 9, 2.5),
            (9, 4, 0.0),
            (7, 7, 3.0),
            (2, 7, 1.0),
        ])
        .unwrap();

        let rebuilt = DistanceMatrix::from_unrolled(matrix.unroll()).unwrap();
        assert_eq!(rebuilt, matrix);
    }

    #[test]
    fn from_unrolled_rejects() {
        let self_pair = vec![UnrolledEdge::new(1u32, 1, Some(0.0))];
        let negative = vec![UnrolledEdge::new(1u32, 2, Some(-2.0))];
        let conflicting = vec![
            UnrolledEdge::new(1u32, 2, Some(2.0)),
            UnrolledEdge::new(1, 2, Some(3.0)),
        ];
        let asymmetric = vec![
            UnrolledEdge::new(1u32, 2, Some(2.0)),
            UnrolledEdge::new(2, 1, None),
        ];

        for rows in [self_pair, negative, conflicting, asymmetric] {
            assert!(matches!(
                DistanceMatrix::from_unrolled(rows),
                Err(Error::InvalidInput(_))
            ));
        }

        // Exact duplicates and one-sided rows are fine
        let matrix = DistanceMatrix::from_unrolled(vec![
            UnrolledEdge::new(1u32, 2, Some(2.0)),
            UnrolledEdge::new(1, 2, Some(2.0)),
            UnrolledEdge::new(3, 1, None),
        ])
        .unwrap();
        assert_eq!(matrix.ids(), &[1, 2, 3]);
        assert_eq!(matrix.get(&2, &1), Some(2.0));
        assert_eq!(matrix.get(&1, &3), None);
    }

    #[test]
    fn unroll_raw_tables() {
        let rows = unroll_table(
            ["x", "y"],
            vec![vec![Some(0.0), Some(1.0)], vec![Some(1.0), Some(0.0)]],
        )
        .unwrap();
        assert_eq!(
            rows,
            vec![
                UnrolledEdge::new("x", "y", Some(1.0)),
                UnrolledEdge::new("y", "x", Some(1.0)),
            ]
        );

        let non_square = unroll_table(["x", "y"], vec![vec![Some(0.0), Some(1.0)]]);
        assert!(matches!(non_square, Err(Error::InvalidInput(_))));
    }
}
