/*!
# Tables

Summaries over the tabular vehicle dataset and the weekly coverage dataset:
- [`car_matrix`] pivots `car` values into an `id_1` x `id_2` [`PivotTable`],
- [`type_counts`] classifies `car` values with [`CategoryRules`],
- [`bus_indexes`] and [`filter_routes`] select outliers by `bus` and `truck` values,
- [`multiply_matrix`] rescales a [`PivotTable`] with a [`MultiplyRule`],
- [`time_check`] reports whether the [`CoverageRecord`]s of a pair span a whole week.
*/

mod category;
mod coverage;
mod vehicle;

use crate::{error::invalid_input_unless, prelude::*};

pub use category::*;
pub use coverage::*;
pub use vehicle::*;
