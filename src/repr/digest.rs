/*!
# Matrix Hash Digests

This module provides the [`MatrixDigest`] trait, which computes **hash-based digests** of
distance matrices that are independent of the order in which identifiers were first seen.

The digest encodes:
- the number of identifiers, and
- all set cells `(a, b, distance)` with `a < b`, sorted by identifier,

before feeding them into a cryptographic hash function.
Identifiers are encoded through their [`Hash`] implementation, so digests are stable for
a given identifier type on a given platform.

## Example
```
use tollgraph::{prelude::*, repr::digest::MatrixDigest};

let a = DistanceMatrix::from_edges([(1u64, 2, 3.0), (2, 3, 1.0)]).unwrap();
let b = DistanceMatrix::from_edges([(3u64, 2, 1.0), (1, 2, 3.0)]).unwrap();

// Different identifier order, same distances
assert_ne!(a.ids(), b.ids());
assert_eq!(a.digest_sha256(), b.digest_sha256());
```
*/

use std::{fmt::LowerHex, hash::Hasher};

use ::digest::{Digest, Output};
use itertools::Itertools;

use super::*;

/// Trait for computing a **canonical hash digest** of a distance matrix.
pub trait MatrixDigest {
    /// Computes a digest of the matrix using the provided hash function `D`.
    ///
    /// The result is returned as a **hexadecimal string**.
    fn digest<D>(&self) -> String
    where
        Output<D>: LowerHex,
        D: Digest;

    /// Computes a **SHA-256 digest** of the matrix.
    ///
    /// The returned string is exactly 64 characters long.
    fn digest_sha256(&self) -> String {
        self.digest::<sha2::Sha256>()
    }
}

/// Forwards everything written by [`Hash`] into a [`Digest`]
struct DigestHasher<'a, D>(&'a mut D);

impl<D: Digest> Hasher for DigestHasher<'_, D> {
    fn write(&mut self, bytes: &[u8]) {
        self.0.update(bytes);
    }

    fn finish(&self) -> u64 {
        // Never used; the digest is finalized separately
        0
    }
}

impl<I: Identifier> MatrixDigest for DistanceMatrix<I> {
    fn digest<D>(&self) -> String
    where
        Output<D>: LowerHex,
        D: Digest,
    {
        let mut hasher = D::new();

        // first encode the number of identifiers
        hasher.update((self.len() as u64).to_le_bytes());

        // then append all set cells of the upper triangle in sorted order
        let order = (0..self.len())
            .sorted_by(|&i, &j| self.ids()[i].cmp(&self.ids()[j]))
            .collect_vec();

        for (x, &i) in order.iter().enumerate() {
            for &j in &order[x + 1..] {
                if let Some(d) = self.get_at(i, j) {
                    self.ids()[i].hash(&mut DigestHasher(&mut hasher));
                    self.ids()[j].hash(&mut DigestHasher(&mut hasher));
                    hasher.update(d.to_bits().to_le_bytes());
                }
            }
        }

        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_independent() {
        let a = DistanceMatrix::from_edges([(1u32, 2, 1.0), (2, 3, 2.0), (3, 1, 4.0)]).unwrap();
        let b = DistanceMatrix::from_edges([(3u32, 1, 4.0), (3, 2, 2.0), (2, 1, 1.0)]).unwrap();
        assert_eq!(a.digest_sha256(), b.digest_sha256());
        assert_eq!(a.digest_sha256().len(), 64);
    }

    #[test]
    fn sensitive_to_values_and_ids() {
        let base = DistanceMatrix::from_edges([(1u32, 2, 1.0)]).unwrap();
        let other_distance = DistanceMatrix::from_edges([(1u32, 2, 1.5)]).unwrap();
        let other_ids = DistanceMatrix::from_edges([(1u32, 3, 1.0)]).unwrap();
        let extra_id = DistanceMatrix::from_edges([(1u32, 2, 1.0), (4, 4, 0.0)]).unwrap();

        for other in [other_distance, other_ids, extra_id] {
            assert_ne!(base.digest_sha256(), other.digest_sha256());
        }
    }
}
