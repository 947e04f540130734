/*!
# Identifiers & Distances

Identifiers name locations in the distance graph. In the source datasets these are integers
such as `1001400`, so the default is `Id = u64`. Any other type that is comparable, hashable and
cloneable (strings for example) can be used as well through the [`Identifier`] trait.

Distances are plain `f64` values which must be finite and non-negative.
*/

use std::{fmt::Debug, hash::Hash};

use crate::error::{Result, invalid_input_unless};

/// Default identifier type of the datasets
pub type Id = u64;

/// Distance of a direct path segment
pub type Distance = f64;

/// Everything that can name a node/location in a distance graph
pub trait Identifier: Clone + Eq + Hash + Ord + Debug {}

impl<T> Identifier for T where T: Clone + Eq + Hash + Ord + Debug {}

/// Returns *true* if `d` is usable as a distance (ie. finite and `>= 0`)
pub fn is_valid_distance(d: Distance) -> bool {
    d.is_finite() && d >= 0.0
}

/// Returns `Err(Error::InvalidInput)` if `d` is not a valid distance.
/// `context` describes where the value was found.
pub(crate) fn check_distance(d: Distance, context: impl FnOnce() -> String) -> Result<Distance> {
    invalid_input_unless!(
        is_valid_distance(d),
        "Distance {d} of {} is not a finite non-negative number",
        context()
    );
    Ok(d)
}
