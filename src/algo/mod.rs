/*!
# Algorithms

Operations on top of a [`DistanceMatrix`]:
- [`Unroll`] flattens a matrix into a row-per-pair edge list, [`DistanceMatrix::from_unrolled`]
  is its inverse,
- [`ThresholdQuery`] (or the shorthand trait [`WithinThreshold`]) finds identifiers whose
  distances lie close to the mean distance of a reference identifier.

All algorithms are re-exported at the top level of this module:
```rust
use tollgraph::algo::*;
```
*/

mod threshold;
mod unroll;

use crate::{prelude::*, utils::IdIndex};
use crate::error::invalid_input_unless;
use crate::id::check_distance;

pub use threshold::*;
pub use unroll::*;
