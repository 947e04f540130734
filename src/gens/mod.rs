/*!
# Edge Generators

Random weighted edge lists over integer identifiers, mainly used to exercise the invariants of
[`DistanceMatrix`](crate::repr::DistanceMatrix) on inputs of all shapes.

Generators follow a builder-style pattern:

1. Create a generator instance (e.g., `RandomEdges::new()`).
2. Set parameters (e.g., `.ids(n).edges(m).max_distance(d)`).
3. Generate edges via `generate()` or `stream()`.

Supported models:
- [`RandomEdges`]: `m` uniformly drawn edges; duplicates (and optionally self-loops) may occur,
- [`CompleteEdges`]: every unordered pair exactly once, yielding a dense matrix.

Identifiers are `first_id..first_id + n`, mimicking the consecutive ids of the datasets.
*/

use rand::{Rng, seq::SliceRandom};

use crate::prelude::*;

/// General trait for a configurable random edge generator.
pub trait EdgeGenerator {
    /// Generates a list of random edges.
    fn generate<R>(&self, rng: &mut R) -> Vec<WeightedEdge>
    where
        R: Rng,
    {
        self.stream(rng).collect()
    }

    /// Creates a lazy iterator over generated edges.
    fn stream<R>(&self, rng: &mut R) -> impl Iterator<Item = WeightedEdge>
    where
        R: Rng;
}

/// Generator for `m` uniformly drawn edges between `n` identifiers.
///
/// # Example
/// ```
/// use rand::SeedableRng;
/// use rand_pcg::Pcg64Mcg;
/// use tollgraph::{gens::*, prelude::*};
///
/// let rng = &mut Pcg64Mcg::seed_from_u64(1);
/// let edges = RandomEdges::new().ids(10).edges(25).first_id(1001).generate(rng);
///
/// assert_eq!(edges.len(), 25);
/// assert!(edges.iter().all(|e| (1001..1011).contains(&e.0) && !e.is_loop()));
/// ```
#[derive(Debug, Copy, Clone)]
pub struct RandomEdges {
    n: u64,
    m: usize,
    first_id: Id,
    max_distance: Distance,
    loops: bool,
}

impl Default for RandomEdges {
    fn default() -> Self {
        Self {
            n: 0,
            m: 0,
            first_id: 0,
            max_distance: 100.0,
            loops: false,
        }
    }
}

impl RandomEdges {
    /// Creates a new generator without identifiers or edges
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of identifiers
    pub fn ids(mut self, n: u64) -> Self {
        self.n = n;
        self
    }

    /// Sets the number of edges
    pub fn edges(mut self, m: usize) -> Self {
        self.m = m;
        self
    }

    /// Sets the smallest identifier
    pub fn first_id(mut self, id: Id) -> Self {
        self.first_id = id;
        self
    }

    /// Distances are drawn uniformly from `[0, d)`
    pub fn max_distance(mut self, d: Distance) -> Self {
        assert!(d > 0.0 && d.is_finite());
        self.max_distance = d;
        self
    }

    /// Allows self-loops
    pub fn loops(mut self, loops: bool) -> Self {
        self.loops = loops;
        self
    }
}

impl EdgeGenerator for RandomEdges {
    fn stream<R>(&self, rng: &mut R) -> impl Iterator<Item = WeightedEdge>
    where
        R: Rng,
    {
        assert!(self.n > 1 || (self.n == 1 && self.loops) || self.m == 0);

        let RandomEdges {
            n,
            m,
            first_id,
            max_distance,
            loops,
        } = *self;

        (0..m).map(move |_| {
            let u = rng.random_range(0..n);
            let v = if loops {
                rng.random_range(0..n)
            } else {
                // Shift by a non-zero offset so that `u != v`
                (u + rng.random_range(1..n)) % n
            };
            let d = rng.random_range(0.0..max_distance);
            WeightedEdge(first_id + u, first_id + v, d)
        })
    }
}

/// Generator for complete graphs: every unordered pair of the `n` identifiers is connected by
/// exactly one edge of random orientation. Edges are emitted in random order.
#[derive(Debug, Copy, Clone)]
pub struct CompleteEdges {
    n: u64,
    first_id: Id,
    max_distance: Distance,
}

impl Default for CompleteEdges {
    fn default() -> Self {
        Self {
            n: 0,
            first_id: 0,
            max_distance: 100.0,
        }
    }
}

impl CompleteEdges {
    /// Creates a new generator without identifiers
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the number of identifiers
    pub fn ids(mut self, n: u64) -> Self {
        self.n = n;
        self
    }

    /// Sets the smallest identifier
    pub fn first_id(mut self, id: Id) -> Self {
        self.first_id = id;
        self
    }

    /// Distances are drawn uniformly from `[0, d)`
    pub fn max_distance(mut self, d: Distance) -> Self {
        assert!(d > 0.0 && d.is_finite());
        self.max_distance = d;
        self
    }
}

impl EdgeGenerator for CompleteEdges {
    fn stream<R>(&self, rng: &mut R) -> impl Iterator<Item = WeightedEdge>
    where
        R: Rng,
    {
        let (n, first) = (self.n, self.first_id);
        let mut edges: Vec<WeightedEdge> = (0..n)
            .flat_map(|u| ((u + 1)..n).map(move |v| (u, v)))
            .map(|(u, v)| {
                let d = rng.random_range(0.0..self.max_distance);
                let edge = WeightedEdge(first + u, first + v, d);
                if rng.random_bool(0.5) {
                    edge.reverse()
                } else {
                    edge
                }
            })
            .collect();

        edges.shuffle(rng);
        edges.into_iter()
    }
}
