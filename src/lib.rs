/*!
`tollgraph` builds symmetric distance matrices from weighted, undirected edge lists between
location identifiers, flattens them back into row-per-pair tables and runs simple queries and
toll computations on top.

# Representation

Identifiers are any `Clone + Eq + Hash + Ord + Debug` values (see [`id::Identifier`]); the
datasets use integers, so the default is `Id = u64`. Distances are finite, non-negative `f64`.

A [`DistanceMatrix`](crate::repr::DistanceMatrix) stores one `Option<Distance>` cell per ordered
pair of identifiers:
- the diagonal is always `Some(0.0)`,
- `None` marks pairs without a direct edge (this is different from a distance of `0`),
- the matrix is symmetric and duplicate edges between the same pair add up.

Distances are **not** propagated: if `a-b` and `b-c` are known, `a-c` stays `None`.

# Design

Algorithms are configurable structs ([`ThresholdQuery`](crate::algo::ThresholdQuery),
[`VehicleRates`](crate::toll::VehicleRates), [`DiscountSchedule`](crate::toll::DiscountSchedule), ...)
which are altered with the *Builder* pattern before they run.
The common operations are also available as traits on the data itself:
```
use tollgraph::{prelude::*, algo::*};

let matrix = DistanceMatrix::from_edges([(1001u64, 1002, 10.0), (1002, 1003, 5.0)]).unwrap();
let rows = matrix.unrolled();

assert_eq!(rows.len(), 6);
// mean of `1001` is 10, only `1002 -> 1001` lies within 10% of it
assert_eq!(rows.ids_within_ten_percentage_threshold(&1001).unwrap(), vec![1002]);
```

All operations are pure: inputs are never modified and every result is a new value.
Failures are reported as [`Error`].

# Usage

- [`prelude`] includes identifiers, edges, errors and the matrix,
- [`algo`] unrolls matrices and runs threshold queries,
- [`tables`] summarizes the vehicle and weekly coverage datasets,
- [`toll`] computes per-vehicle tolls and time based discounts,
- [`io`] reads and writes edge tables and matrix tables,
- [`gens`] generates random edge lists,
- [`repr::digest`] computes a `Sha256` digest of a matrix.

In most use-cases, `use tollgraph::{prelude::*, algo::*};` suffices.

Nothing is logged unless the application installs a [`log`] implementation.
*/

pub mod algo;
pub mod edge;
pub mod error;
pub mod gens;
pub mod id;
pub mod io;
pub mod repr;
pub mod tables;
pub(crate) mod testing;
pub mod toll;
pub mod utils;

pub use error::{Error, Result};

/// `tollgraph::prelude` includes identifiers, edges, errors and the distance matrix.
pub mod prelude {
    pub use super::{
        edge::*,
        error::{Error, Result},
        id::*,
        repr::*,
    };
}
