use itertools::Itertools;
use log::debug;

use super::*;

/// Finds all identifiers whose distance lies within a percentage of the mean distance of a
/// reference identifier.
///
/// Use the *Builder*-Pattern to configure the query before running it:
/// ```
/// use tollgraph::{prelude::*, algo::*};
///
/// let rows = vec![
///     UnrolledEdge::new(1u64, 2, Some(10.0)),
///     UnrolledEdge::new(1, 3, Some(20.0)),
///     UnrolledEdge::new(2, 1, Some(14.0)),
///     UnrolledEdge::new(3, 1, Some(17.0)),
///     UnrolledEdge::new(4, 1, Some(30.0)),
/// ];
///
/// // mean of reference `1` is 15
/// assert_eq!(ThresholdQuery::new().run(&rows, &1).unwrap(), vec![2]);
/// assert_eq!(ThresholdQuery::new().percentage(0.2).run(&rows, &1).unwrap(), vec![2, 3]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ThresholdQuery {
    /// Allowed deviation from the mean as a fraction (`0.1` is 10%)
    percentage: f64,
}

impl Default for ThresholdQuery {
    /// Default to a 10% threshold
    fn default() -> Self {
        Self { percentage: 0.1 }
    }
}

impl ThresholdQuery {
    /// Creates a new query with a 10% threshold
    pub fn new() -> Self {
        Self::default()
    }

    /// Updates the threshold; `p` is a fraction, ie. `0.25` for 25%
    pub fn percentage(mut self, p: f64) -> Self {
        self.percentage = p;
        self
    }

    /// Returns the inclusive range `[mean - p * mean, mean + p * mean]`
    pub fn bounds(&self, mean: Distance) -> (Distance, Distance) {
        let delta = self.percentage * mean;
        (mean - delta, mean + delta)
    }

    /// Computes the mean over all non-null distances of rows starting at `reference` and
    /// returns the sorted distinct `id_start` values (other than `reference`) of all rows whose
    /// distance lies within [`ThresholdQuery::bounds`] of that mean.
    ///
    /// # Errors
    /// - [`Error::InvalidInput`] if the percentage is negative or not finite,
    /// - [`Error::InvalidReference`] if `reference` has no outgoing row with a distance.
    pub fn run<I: Identifier>(&self, rows: &[UnrolledEdge<I>], reference: &I) -> Result<Vec<I>> {
        invalid_input_unless!(
            self.percentage.is_finite() && self.percentage >= 0.0,
            "Threshold percentage {} is not a finite non-negative number",
            self.percentage
        );

        let (sum, count) = rows
            .iter()
            .filter(|row| &row.id_start == reference)
            .filter_map(|row| row.distance)
            .fold((0.0, 0usize), |(sum, count), d| (sum + d, count + 1));

        if count == 0 {
            return Err(Error::InvalidReference(format!(
                "{reference:?} has no outgoing distances"
            )));
        }

        let mean = sum / count as f64;
        let (lower, upper) = self.bounds(mean);

        let ids = rows
            .iter()
            .filter(|row| &row.id_start != reference)
            .filter(|row| row.distance.is_some_and(|d| lower <= d && d <= upper))
            .map(|row| row.id_start.clone())
            .sorted()
            .dedup()
            .collect_vec();

        debug!(
            "Reference {reference:?}: mean {mean} over {count} rows, {} ids within [{lower}, {upper}]",
            ids.len()
        );

        Ok(ids)
    }
}

/// Shorthand for running a [`ThresholdQuery`] on an unrolled edge list
pub trait WithinThreshold<I> {
    /// Runs a [`ThresholdQuery`] with the given percentage (as a fraction)
    fn ids_within_percentage_threshold(&self, reference: &I, percentage: f64) -> Result<Vec<I>>;

    /// Runs a [`ThresholdQuery`] with the default 10% threshold
    fn ids_within_ten_percentage_threshold(&self, reference: &I) -> Result<Vec<I>> {
        self.ids_within_percentage_threshold(reference, ThresholdQuery::default().percentage)
    }
}

impl<I: Identifier> WithinThreshold<I> for [UnrolledEdge<I>] {
    fn ids_within_percentage_threshold(&self, reference: &I, percentage: f64) -> Result<Vec<I>> {
        ThresholdQuery::new().percentage(percentage).run(self, reference)
    }
}

#[cfg(test)]
mod tests {
    use rand::{Rng, SeedableRng};
    use rand_pcg::Pcg64Mcg;

    use super::*;

    fn rows(raw: &[(u64, u64, Option<f64>)]) -> Vec<UnrolledEdge<u64>> {
        raw.iter()
            .map(|&(s, e, d)| UnrolledEdge::new(s, e, d))
            .collect()
    }

    #[test]
    fn inclusive_bounds() {
        // mean of 1 is 10 -> [9, 11]
        let rows = rows(&[
            (1, 2, Some(10.0)),
            (1, 3, Some(10.0)),
            (2, 1, Some(9.0)),
            (3, 1, Some(11.0)),
            (4, 1, Some(8.99)),
            (5, 1, Some(11.01)),
        ]);

        assert_eq!(rows.ids_within_ten_percentage_threshold(&1).unwrap(), vec![2, 3]);
        assert_eq!(
            rows.ids_within_percentage_threshold(&1, 0.0).unwrap(),
            Vec::<u64>::new()
        );
        assert_eq!(
            rows.ids_within_percentage_threshold(&1, 0.5).unwrap(),
            vec![2, 3, 4, 5]
        );
    }

    #[test]
    fn reference_excluded_and_deduplicated() {
        let rows = rows(&[
            (1, 2, Some(4.0)),
            (1, 3, Some(4.0)),
            (3, 2, Some(4.0)),
            (3, 1, Some(4.0)),
            (2, 1, Some(4.0)),
        ]);

        assert_eq!(rows.ids_within_ten_percentage_threshold(&1).unwrap(), vec![2, 3]);
    }

    #[test]
    fn null_distances() {
        let rows = rows(&[
            (1, 2, Some(6.0)),
            (1, 3, None),
            (2, 1, Some(6.0)),
            (3, 1, None),
        ]);

        // null rows neither count towards the mean nor match
        assert_eq!(rows.ids_within_ten_percentage_threshold(&1).unwrap(), vec![2]);
    }

    #[test]
    fn invalid_reference() {
        let rows = rows(&[(1, 2, Some(6.0)), (3, 1, None), (2, 1, Some(6.0))]);

        assert!(matches!(
            rows.ids_within_ten_percentage_threshold(&9),
            Err(Error::InvalidReference(_))
        ));
        assert!(matches!(
            rows.ids_within_ten_percentage_threshold(&3),
            Err(Error::InvalidReference(_))
        ));
        assert!(matches!(
            rows.ids_within_percentage_threshold(&1, -0.1),
            Err(Error::InvalidInput(_))
        ));
        assert!(matches!(
            rows.ids_within_percentage_threshold(&1, f64::NAN),
            Err(Error::InvalidInput(_))
        ));
    }

    #[test]
    fn random_bounds() {
        let rng = &mut Pcg64Mcg::seed_from_u64(3);

        for _ in 0..50 {
            let n = rng.random_range(2..20u64);
            let rows = (0..n * 4)
                .map(|_| {
                    let s = rng.random_range(0..n);
                    let e = (s + rng.random_range(1..n)) % n;
                    UnrolledEdge::new(s, e, Some(rng.random_range(0.0..100.0)))
                })
                .collect_vec();

            let Some(reference) = rows.first().map(|r| r.id_start) else {
                continue;
            };
            let p = rng.random_range(0.0..0.5);

            let distances = rows
                .iter()
                .filter(|r| r.id_start == reference)
                .filter_map(|r| r.distance)
                .collect_vec();
            let mean = distances.iter().sum::<f64>() / distances.len() as f64;
            let (lower, upper) = ThresholdQuery::new().percentage(p).bounds(mean);

            let ids = rows.ids_within_percentage_threshold(&reference, p).unwrap();

            assert!(!ids.contains(&reference));
            assert!(ids.windows(2).all(|w| w[0] < w[1]));
            for id in &ids {
                assert!(rows.iter().any(|r| r.id_start == *id
                    && r.distance.is_some_and(|d| lower <= d && d <= upper)));
            }
        }
    }
}
