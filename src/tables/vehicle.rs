use std::{collections::BTreeMap, fmt};

use fxhash::FxHashSet;
use itertools::Itertools;
use log::debug;

use super::*;

/// One row of the vehicle dataset: per-vehicle counts between two identifiers on a route
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VehicleRecord<I = Id> {
    pub id_1: I,
    pub id_2: I,
    pub route: String,
    pub moto: f64,
    pub car: f64,
    pub rv: f64,
    pub bus: f64,
    pub truck: f64,
}

/// A dense table with separately indexed rows and columns
#[derive(Clone, PartialEq)]
pub struct PivotTable<I = Id> {
    rows: Vec<I>,
    columns: Vec<I>,
    cells: Vec<f64>,
}

impl<I: Identifier> PivotTable<I> {
    /// Returns the row identifiers in order
    pub fn row_ids(&self) -> &[I] {
        &self.rows
    }

    /// Returns the column identifiers in order
    pub fn column_ids(&self) -> &[I] {
        &self.columns
    }

    /// Returns the cell of row `r` and column `c` if both exist
    pub fn get(&self, r: &I, c: &I) -> Option<f64> {
        let i = self.rows.binary_search(r).ok()?;
        let j = self.columns.binary_search(c).ok()?;
        Some(self.cells[i * self.columns.len() + j])
    }

    /// Returns the `i`-th row
    /// ** Panics if `i` is out of bounds **
    pub fn row_at(&self, i: usize) -> &[f64] {
        let m = self.columns.len();
        &self.cells[i * m..(i + 1) * m]
    }

    /// Returns a new table where `f` was applied to every cell
    pub fn map<F: FnMut(f64) -> f64>(&self, f: F) -> Self {
        Self {
            rows: self.rows.clone(),
            columns: self.columns.clone(),
            cells: self.cells.iter().copied().map(f).collect(),
        }
    }
}

impl<I: Identifier> fmt::Debug for PivotTable<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "PivotTable {:?}", self.columns)?;
        for (i, id) in self.rows.iter().enumerate() {
            writeln!(f, "{id:?}: {:?}", self.row_at(i))?;
        }
        Ok(())
    }
}

/// Pivots the `car` values into a table indexed by `id_1` (rows) and `id_2` (columns).
///
/// Rows and columns are the sorted distinct values of `id_1` and `id_2`. Missing combinations
/// are `0`, as are all cells whose row and column identifier coincide.
///
/// # Errors
/// Returns [`Error::InvalidInput`] if a `(id_1, id_2)` combination occurs twice or a `car`
/// value is not finite.
pub fn car_matrix<I: Identifier>(records: &[VehicleRecord<I>]) -> Result<PivotTable<I>> {
    let rows = records.iter().map(|r| r.id_1.clone()).sorted().dedup().collect_vec();
    let columns = records.iter().map(|r| r.id_2.clone()).sorted().dedup().collect_vec();
    let m = columns.len();

    let mut cells = vec![0.0; rows.len() * m];
    let mut seen = FxHashSet::default();
    for (pos, record) in records.iter().enumerate() {
        invalid_input_unless!(
            record.car.is_finite(),
            "Record #{pos} has a non-finite car value {}",
            record.car
        );
        invalid_input_unless!(
            seen.insert((&record.id_1, &record.id_2)),
            "Record #{pos} duplicates the combination ({:?}, {:?})",
            record.id_1,
            record.id_2
        );

        // Both searches succeed as rows/columns were collected from the records
        if let (Ok(i), Ok(j)) = (
            rows.binary_search(&record.id_1),
            columns.binary_search(&record.id_2),
        ) {
            cells[i * m + j] = record.car;
        }
    }

    for (i, id) in rows.iter().enumerate() {
        if let Ok(j) = columns.binary_search(id) {
            cells[i * m + j] = 0.0;
        }
    }

    debug!("Pivoted {} records into {}x{} car matrix", records.len(), rows.len(), m);
    Ok(PivotTable {
        rows,
        columns,
        cells,
    })
}

/// Classifies the `car` value of every record with `rules` and counts the labels
pub fn type_counts<I>(records: &[VehicleRecord<I>], rules: &CategoryRules) -> BTreeMap<String, usize> {
    rules.count(records.iter().map(|r| r.car))
}

/// Returns the (sorted) positions of all records whose `bus` value exceeds twice the mean
/// `bus` value
pub fn bus_indexes<I>(records: &[VehicleRecord<I>]) -> Vec<usize> {
    if records.is_empty() {
        return Vec::new();
    }

    let mean = records.iter().map(|r| r.bus).sum::<f64>() / records.len() as f64;
    records
        .iter()
        .positions(|r| r.bus > 2.0 * mean)
        .collect()
}

/// Returns the sorted names of all routes whose mean `truck` value is strictly greater than
/// `threshold` (`7.0` in the vehicle dataset)
pub fn filter_routes<I>(records: &[VehicleRecord<I>], threshold: f64) -> Vec<String> {
    records
        .iter()
        .into_group_map_by(|r| r.route.as_str())
        .into_iter()
        .filter(|(_, group)| {
            let mean = group.iter().map(|r| r.truck).sum::<f64>() / group.len() as f64;
            mean > threshold
        })
        .map(|(route, _)| route.to_string())
        .sorted()
        .collect()
}

/// Multiplies every cell by one of two factors depending on whether it exceeds a threshold,
/// then rounds to a fixed number of decimals
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct MultiplyRule {
    pub threshold: f64,
    /// Factor for values `> threshold`
    pub above: f64,
    /// Factor for values `<= threshold`
    pub otherwise: f64,
    pub decimals: i32,
}

impl Default for MultiplyRule {
    /// Values above `20` are multiplied by `0.75`, all others by `1.25`; one decimal
    fn default() -> Self {
        Self {
            threshold: 20.0,
            above: 0.75,
            otherwise: 1.25,
            decimals: 1,
        }
    }
}

impl MultiplyRule {
    /// Applies the rule to a single value
    pub fn apply(&self, x: f64) -> f64 {
        let factor = if x > self.threshold {
            self.above
        } else {
            self.otherwise
        };
        let scale = 10f64.powi(self.decimals);
        (x * factor * scale).round() / scale
    }
}

/// Returns a copy of `table` with `rule` applied to every cell
pub fn multiply_matrix<I: Identifier>(table: &PivotTable<I>, rule: &MultiplyRule) -> PivotTable<I> {
    table.map(|x| rule.apply(x))
}
