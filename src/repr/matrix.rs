use std::fmt;

use log::{debug, trace, warn};

use super::*;

/// A dense symmetric matrix of accumulated direct-edge distances.
///
/// Rows and columns share one identifier universe: every identifier that appears as either
/// endpoint of an input edge, in order of first appearance. Cells are stored row-major as
/// `Option<Distance>`, where `None` marks a pair without any direct edge. This is **not** a
/// shortest-path matrix; only direct edges (summed over duplicates) are reflected.
///
/// Invariants maintained by every constructor:
/// - `get(a, b) == get(b, a)` for all `a, b`,
/// - `get(a, a) == Some(0.0)` for all `a`,
/// - all present values are finite and non-negative.
#[derive(Clone)]
pub struct DistanceMatrix<I = Id> {
    index: IdIndex<I>,
    cells: Vec<Option<Distance>>,
}

impl<I: Identifier> DistanceMatrix<I> {
    /// Creates a matrix over the given identifiers where only the diagonal is set
    fn with_index(index: IdIndex<I>) -> Self {
        let n = index.len();
        let mut cells = vec![None; n * n];
        for i in 0..n {
            cells[i * n + i] = Some(0.0);
        }

        Self { index, cells }
    }

    /// Builds the matrix from a sequence of undirected edges.
    ///
    /// The first edge between an unordered pair sets both cells, every further edge between the
    /// same pair adds its distance to both cells. Self-loops register their identifier but
    /// never change the diagonal, which is always `0`.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if any distance is negative or not finite, or if the
    /// accumulated distance of a pair overflows.
    ///
    /// # Example
    /// ```
    /// use tollgraph::prelude::*;
    ///
    /// let matrix = DistanceMatrix::from_edges([(1001u64, 1002, 10.0), (1002, 1003, 5.0)]).unwrap();
    ///
    /// assert_eq!(matrix.ids(), &[1001, 1002, 1003]);
    /// assert_eq!(matrix.get(&1002, &1001), Some(10.0));
    /// assert_eq!(matrix.get(&1003, &1003), Some(0.0));
    /// assert_eq!(matrix.get(&1001, &1003), None);
    /// ```
    pub fn from_edges<E, T>(edges: T) -> Result<Self>
    where
        E: Into<WeightedEdge<I>>,
        T: IntoIterator<Item = E>,
    {
        let edges: Vec<WeightedEdge<I>> = edges.into_iter().map(|e| e.into()).collect();

        let mut index = IdIndex::with_capacity(edges.len());
        for (pos, edge) in edges.iter().enumerate() {
            check_distance(edge.2, || format!("edge #{pos} {edge:?}"))?;
            index.insert(edge.0.clone());
            index.insert(edge.1.clone());
        }

        let mut matrix = Self::with_index(index);
        for (pos, WeightedEdge(u, v, d)) in edges.iter().enumerate() {
            if u == v {
                if *d != 0.0 {
                    warn!("Ignoring distance {d} of self-loop at {u:?}");
                }
                continue;
            }

            // Both positions exist since all endpoints were inserted above
            let (i, j) = (matrix.position(u), matrix.position(v));
            match matrix.get_at(i, j) {
                Some(prev) => {
                    trace!("Accumulating {u:?} <-> {v:?}: {prev} + {d}");
                    let sum = check_distance(prev + d, || {
                        format!("accumulated pair ({u:?}, {v:?}) after edge #{pos}")
                    })?;
                    matrix.set_symmetric(i, j, sum);
                }
                None => matrix.set_symmetric(i, j, *d),
            }
        }

        debug!(
            "Built distance matrix over {} identifiers from {} edges ({} pairs set)",
            matrix.len(),
            edges.len(),
            matrix.number_of_set_pairs()
        );

        Ok(matrix)
    }

    /// Builds a matrix from a raw square table.
    /// `rows[i][j]` is the cell of the `i`-th and `j`-th identifier.
    ///
    /// # Errors
    /// Returns [`Error::InvalidInput`] if
    /// - the number of rows or the length of any row does not match the number of identifiers,
    /// - an identifier occurs twice,
    /// - the table is not symmetric or has a diagonal entry other than `0`,
    /// - any value is negative or not finite.
    pub fn from_rows<T>(ids: T, rows: Vec<Vec<Option<Distance>>>) -> Result<Self>
    where
        T: IntoIterator<Item = I>,
    {
        let ids: Vec<I> = ids.into_iter().collect();
        let index: IdIndex<I> = ids.iter().cloned().collect();
        let n = ids.len();

        invalid_input_unless!(index.len() == n, "Matrix index contains duplicate identifiers");
        invalid_input_unless!(
            rows.len() == n,
            "Matrix has {} rows but {n} identifiers",
            rows.len()
        );

        let mut cells = Vec::with_capacity(n * n);
        for (i, row) in rows.into_iter().enumerate() {
            invalid_input_unless!(
                row.len() == n,
                "Row {:?} has {} columns but the matrix has {n} identifiers",
                ids[i],
                row.len()
            );
            for (j, cell) in row.iter().enumerate() {
                if let Some(d) = *cell {
                    check_distance(d, || format!("cell ({:?}, {:?})", ids[i], ids[j]))?;
                }
            }
            cells.extend(row);
        }

        let matrix = Self { index, cells };
        for i in 0..n {
            invalid_input_unless!(
                matrix.get_at(i, i) == Some(0.0),
                "Diagonal entry of {:?} is {:?} instead of 0",
                ids[i],
                matrix.get_at(i, i)
            );
            for j in (i + 1)..n {
                invalid_input_unless!(
                    matrix.get_at(i, j) == matrix.get_at(j, i),
                    "Matrix is not symmetric at ({:?}, {:?})",
                    ids[i],
                    ids[j]
                );
            }
        }

        Ok(matrix)
    }

    /// Returns the number of identifiers (ie. rows/columns)
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// Returns *true* if the matrix has no identifiers
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Returns all identifiers in row/column order
    pub fn ids(&self) -> &[I] {
        self.index.ids()
    }

    /// Returns the identifier index of the matrix
    pub fn index(&self) -> &IdIndex<I> {
        &self.index
    }

    /// Returns the distance between `a` and `b`.
    /// Returns `None` if no direct edge exists or either identifier is unknown.
    pub fn get(&self, a: &I, b: &I) -> Option<Distance> {
        let i = self.index.position_of(a)?;
        let j = self.index.position_of(b)?;
        self.get_at(i, j)
    }

    /// Returns the cell at positions `(i, j)`
    /// ** Panics if `i >= n || j >= n` **
    pub fn get_at(&self, i: usize, j: usize) -> Option<Distance> {
        self.cells[i * self.len() + j]
    }

    /// Returns the row of `id` if it exists
    pub fn row(&self, id: &I) -> Option<&[Option<Distance>]> {
        let i = self.index.position_of(id)?;
        Some(self.row_at(i))
    }

    /// Returns the `i`-th row
    /// ** Panics if `i >= n` **
    pub fn row_at(&self, i: usize) -> &[Option<Distance>] {
        let n = self.len();
        &self.cells[i * n..(i + 1) * n]
    }

    /// Returns an iterator over all rows alongside their identifiers
    pub fn rows(&self) -> impl Iterator<Item = (&I, &[Option<Distance>])> + '_ {
        self.index
            .iter()
            .enumerate()
            .map(|(i, id)| (id, self.row_at(i)))
    }

    /// Returns the number of unordered pairs `{a, b}` with `a != b` that carry a distance
    pub fn number_of_set_pairs(&self) -> usize {
        let n = self.len();
        (0..n)
            .map(|i| ((i + 1)..n).filter(|&j| self.get_at(i, j).is_some()).count())
            .sum()
    }

    /// Returns *true* if every cell carries a distance
    pub fn is_dense(&self) -> bool {
        self.cells.iter().all(Option::is_some)
    }

    /// Returns *true* if `get(a, b) == get(b, a)` for all identifiers
    pub fn is_symmetric(&self) -> bool {
        let n = self.len();
        (0..n).all(|i| ((i + 1)..n).all(|j| self.get_at(i, j) == self.get_at(j, i)))
    }

    /// Returns the position of a known identifier
    /// ** Panics if `id` is not part of the matrix **
    fn position(&self, id: &I) -> usize {
        self.index.position_of(id).unwrap()
    }

    fn set_symmetric(&mut self, i: usize, j: usize, d: Distance) {
        let n = self.len();
        self.cells[i * n + j] = Some(d);
        self.cells[j * n + i] = Some(d);
    }

    /// Creates an empty matrix over the given index and sets cells `(i, j)` and `(j, i)`
    pub(crate) fn from_symmetric_cells<T>(index: IdIndex<I>, cells: T) -> Self
    where
        T: IntoIterator<Item = (usize, usize, Distance)>,
    {
        let mut matrix = Self::with_index(index);
        for (i, j, d) in cells {
            if i != j {
                matrix.set_symmetric(i, j, d);
            }
        }
        matrix
    }
}

/// Two matrices are equal if they have the same identifier order and the same cells
impl<I: Identifier> PartialEq for DistanceMatrix<I> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index && self.cells == other.cells
    }
}

impl<I: Identifier> fmt::Debug for DistanceMatrix<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DistanceMatrix {:?}", self.index)?;
        for (id, row) in self.rows() {
            write!(f, "{id:?}:")?;
            for cell in row {
                match cell {
                    Some(d) => write!(f, " {d}")?,
                    None => write!(f, " -")?,
                }
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
