/// Generates a test module checking the invariants every [`DistanceMatrix`](crate::repr::DistanceMatrix)
/// must satisfy for identifier type `$id`.
/// Generated edges use `u64` identifiers which are converted with `$map`.
macro_rules! test_matrix_invariants {
    ($env:ident, $id:ty, $map:expr, ($($check:ident),*)) => {
        #[cfg(test)]
        mod $env {
            use crate::{algo::*, gens::*, prelude::*, testing::test_matrix_invariants};
            use fxhash::{FxHashMap, FxHashSet};
            use itertools::Itertools;
            use rand::{Rng, SeedableRng};
            use rand_pcg::Pcg64Mcg;

            fn convert(edges: Vec<WeightedEdge>) -> Vec<WeightedEdge<$id>> {
                let map = $map;
                edges
                    .into_iter()
                    .map(|WeightedEdge(u, v, d)| WeightedEdge(map(u), map(v), d))
                    .collect()
            }

            /// Random edges including duplicates and self-loops
            fn random_edges<R: Rng>(rng: &mut R, n: u64, m: usize) -> Vec<WeightedEdge<$id>> {
                let _ = env_logger::builder().is_test(true).try_init();
                convert(
                    RandomEdges::new()
                        .ids(n)
                        .edges(m)
                        .first_id(1001)
                        .max_distance(50.0)
                        .loops(true)
                        .generate(rng),
                )
            }

            fn complete_edges<R: Rng>(rng: &mut R, n: u64) -> Vec<WeightedEdge<$id>> {
                convert(CompleteEdges::new().ids(n).first_id(1001).generate(rng))
            }

            $(
                test_matrix_invariants!($id: $check);
            )*
        }
    };
    ($id:ty: Symmetry) => {
        #[test]
        fn symmetric_with_zero_diagonal() {
            let rng = &mut Pcg64Mcg::seed_from_u64(3);

            for n in [2u64, 5, 20] {
                for m in [n as usize, 3 * n as usize] {
                    for _ in 0..10 {
                        let edges = random_edges(rng, n, m);
                        let matrix = DistanceMatrix::<$id>::from_edges(edges.iter()).unwrap();

                        let ids: FxHashSet<$id> =
                            edges.iter().flat_map(|e| [e.0.clone(), e.1.clone()]).collect();
                        assert_eq!(matrix.len(), ids.len());
                        assert!(matrix.is_symmetric());

                        for i in 0..matrix.len() {
                            assert_eq!(matrix.get_at(i, i), Some(0.0));
                            for j in 0..matrix.len() {
                                assert_eq!(matrix.get_at(i, j), matrix.get_at(j, i));
                            }
                        }
                    }
                }
            }
        }
    };
    ($id:ty: Accumulation) => {
        #[test]
        fn duplicates_accumulate() {
            let rng = &mut Pcg64Mcg::seed_from_u64(5);

            for n in [3u64, 10] {
                for _ in 0..10 {
                    // many more edges than pairs to force duplicates
                    let edges = random_edges(rng, n, 4 * (n * n) as usize);
                    let matrix = DistanceMatrix::<$id>::from_edges(edges.iter()).unwrap();

                    let mut sums: FxHashMap<($id, $id), f64> = FxHashMap::default();
                    for edge in edges.iter().filter(|e| !e.is_loop()) {
                        let WeightedEdge(u, v, d) = edge.normalized();
                        *sums.entry((u, v)).or_insert(0.0) += d;
                    }

                    for (a, b) in matrix.ids().iter().tuple_combinations() {
                        let key = if a < b {
                            (a.clone(), b.clone())
                        } else {
                            (b.clone(), a.clone())
                        };
                        assert_eq!(matrix.get(a, b), sums.get(&key).copied());
                    }
                    assert_eq!(matrix.number_of_set_pairs(), sums.len());
                }
            }
        }
    };
    ($id:ty: DenseRoundTrip) => {
        #[test]
        fn dense_round_trip() {
            let rng = &mut Pcg64Mcg::seed_from_u64(7);

            for n in [2u64, 5, 12] {
                for _ in 0..5 {
                    let matrix = DistanceMatrix::<$id>::from_edges(complete_edges(rng, n)).unwrap();
                    assert!(matrix.is_dense());

                    let rows = matrix.unrolled();
                    assert_eq!(DistanceMatrix::<$id>::from_unrolled(rows.iter().cloned()).unwrap(), matrix);

                    let upper = matrix.unroll_upper().filter_map(|r| r.to_edge()).collect_vec();
                    assert_eq!(upper.len(), (n * (n - 1) / 2) as usize);
                    assert_eq!(DistanceMatrix::<$id>::from_edges(upper).unwrap(), matrix);
                }
            }
        }
    };
    ($id:ty: NoSelfPairs) => {
        #[test]
        fn unroll_skips_self_pairs() {
            let rng = &mut Pcg64Mcg::seed_from_u64(11);

            for n in [2u64, 8, 15] {
                for _ in 0..5 {
                    let matrix = DistanceMatrix::<$id>::from_edges(random_edges(rng, n, n as usize)).unwrap();
                    let rows = matrix.unrolled();
                    let k = matrix.len();
                    if k < 2 {
                        // only self-loops were drawn
                        assert!(rows.is_empty());
                        continue;
                    }

                    assert_eq!(rows.len(), k * (k - 1));
                    assert!(rows.iter().all(|r| !r.is_self_pair()));
                    assert_eq!(
                        rows.iter().filter(|r| r.distance.is_some()).count(),
                        2 * matrix.number_of_set_pairs()
                    );

                    // rows are emitted in index order
                    let starts = rows.iter().map(|r| r.id_start.clone()).dedup().collect_vec();
                    assert_eq!(starts, matrix.ids());
                }
            }
        }
    };
    ($id:ty: Threshold) => {
        #[test]
        fn threshold_query() {
            let rng = &mut Pcg64Mcg::seed_from_u64(13);

            for n in [4u64, 10] {
                for _ in 0..5 {
                    let matrix = DistanceMatrix::<$id>::from_edges(random_edges(rng, n, 2 * n as usize)).unwrap();
                    let rows = matrix.unrolled();
                    let p = rng.random_range(0.0..0.5);
                    let query = ThresholdQuery::new().percentage(p);

                    for reference in matrix.ids() {
                        let own = rows
                            .iter()
                            .filter(|r| &r.id_start == reference)
                            .filter_map(|r| r.distance)
                            .collect_vec();

                        let result = query.run(&rows, reference);
                        if own.is_empty() {
                            assert!(matches!(result, Err(Error::InvalidReference(_))));
                            continue;
                        }

                        let ids = result.unwrap();
                        let mean = own.iter().sum::<f64>() / own.len() as f64;
                        let (lower, upper) = (mean * (1.0 - p), mean * (1.0 + p));
                        let in_range = |id: &$id| {
                            rows.iter()
                                .filter(|r| &r.id_start == id)
                                .filter_map(|r| r.distance)
                                .any(|d| lower <= d && d <= upper)
                        };

                        assert!(ids.windows(2).all(|w| w[0] < w[1]));
                        for id in matrix.ids().iter().filter(|&id| id != reference) {
                            assert_eq!(ids.contains(id), in_range(id), "{id:?} vs [{lower}, {upper}]");
                        }
                        assert!(!ids.contains(reference));
                    }
                }
            }
        }
    };
}

pub(crate) use test_matrix_invariants;

test_matrix_invariants!(
    test_u64_ids,
    u64,
    |id: u64| id,
    (Symmetry, Accumulation, DenseRoundTrip, NoSelfPairs, Threshold)
);

test_matrix_invariants!(
    test_u32_ids,
    u32,
    |id: u64| id as u32,
    (Symmetry, Accumulation, DenseRoundTrip, NoSelfPairs, Threshold)
);

test_matrix_invariants!(
    test_string_ids,
    String,
    |id: u64| format!("loc{id}"),
    (Symmetry, Accumulation, DenseRoundTrip, NoSelfPairs)
);
