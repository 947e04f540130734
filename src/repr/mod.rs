/*!
# Representations

[`DistanceMatrix`] is the only matrix representation: a dense row-major table of
`Option<Distance>` cells indexed by an [`IdIndex`].
It is built from edges ([`DistanceMatrix::from_edges`]), from raw square tables
([`DistanceMatrix::from_rows`]) or from unrolled edge lists
([`DistanceMatrix::from_unrolled`]).

[`digest`] computes canonical hashes of matrices.
*/

use crate::{
    edge::*,
    error::*,
    id::*,
    utils::IdIndex,
};

mod matrix;

pub mod digest;

pub use matrix::*;
