/*!
# Utilities

[`IdIndex`] maps arbitrary identifiers to dense positions and back; it is the row and column
index of every [`DistanceMatrix`](crate::repr::DistanceMatrix).
*/

pub mod id_index;

pub use id_index::IdIndex;
