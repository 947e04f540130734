use std::fmt::{Debug, Display};

use crate::id::*;

/// A weighted edge is defined by two endpoints and the distance between them.
/// Edges are undirected when fed into a [`DistanceMatrix`](crate::repr::DistanceMatrix):
/// `WeightedEdge(u, v, d)` and `WeightedEdge(v, u, d)` describe the same path segment.
#[derive(Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct WeightedEdge<I = Id>(pub I, pub I, pub Distance);

impl<I: Display> Display for WeightedEdge<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({},{}:{})", self.0, self.1, self.2)
    }
}

impl<I: Debug> Debug for WeightedEdge<I> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({:?},{:?}:{})", self.0, self.1, self.2)
    }
}

impl<I: Identifier> WeightedEdge<I> {
    /// Normalizes the edge such that the endpoint with smaller value comes first
    pub fn normalized(&self) -> Self {
        if self.is_normalized() {
            self.clone()
        } else {
            self.reverse()
        }
    }

    /// Returns true if the endpoint with smaller value comes first
    pub fn is_normalized(&self) -> bool {
        self.0 <= self.1
    }

    /// Returns true if both endpoints are equal
    pub fn is_loop(&self) -> bool {
        self.0 == self.1
    }

    /// Reverses the edge by switching the endpoints
    pub fn reverse(&self) -> Self {
        WeightedEdge(self.1.clone(), self.0.clone(), self.2)
    }

    /// Returns the distance of the edge
    pub fn distance(&self) -> Distance {
        self.2
    }
}

impl<I> From<(I, I, Distance)> for WeightedEdge<I> {
    fn from(value: (I, I, Distance)) -> Self {
        WeightedEdge(value.0, value.1, value.2)
    }
}

impl<I: Clone> From<&(I, I, Distance)> for WeightedEdge<I> {
    fn from(value: &(I, I, Distance)) -> Self {
        WeightedEdge(value.0.clone(), value.1.clone(), value.2)
    }
}

impl<I: Clone> From<&WeightedEdge<I>> for WeightedEdge<I> {
    fn from(value: &WeightedEdge<I>) -> Self {
        value.clone()
    }
}

/// A single row of an unrolled distance matrix.
///
/// Field names match the columns `id_start`, `id_end`, `distance` expected by downstream
/// toll computations. A `distance` of `None` marks a pair without a direct edge.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct UnrolledEdge<I = Id> {
    pub id_start: I,
    pub id_end: I,
    pub distance: Option<Distance>,
}

impl<I: Identifier> UnrolledEdge<I> {
    pub fn new(id_start: I, id_end: I, distance: Option<Distance>) -> Self {
        Self {
            id_start,
            id_end,
            distance,
        }
    }

    /// Converts the row into a [`WeightedEdge`] if it carries a distance
    pub fn to_edge(&self) -> Option<WeightedEdge<I>> {
        self.distance
            .map(|d| WeightedEdge(self.id_start.clone(), self.id_end.clone(), d))
    }

    /// Returns true if both identifiers are equal
    pub fn is_self_pair(&self) -> bool {
        self.id_start == self.id_end
    }
}

impl<I: Identifier> From<WeightedEdge<I>> for UnrolledEdge<I> {
    fn from(value: WeightedEdge<I>) -> Self {
        UnrolledEdge::new(value.0, value.1, Some(value.2))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize() {
        let e = WeightedEdge(5u64, 3, 1.5);
        assert!(!e.is_normalized());
        assert_eq!(e.normalized(), WeightedEdge(3, 5, 1.5));
        assert_eq!(e.reverse().reverse(), e);
        assert!(WeightedEdge("a", "a", 0.0).is_loop());

        assert_eq!(format!("{e}"), "(5,3:1.5)");
        assert_eq!(format!("{:?}", WeightedEdge("x", "y", 2.0)), "(\"x\",\"y\":2)");
    }

    #[test]
    fn unrolled_rows() {
        let row = UnrolledEdge::new(1u64, 2, Some(4.0));
        assert_eq!(row.to_edge(), Some(WeightedEdge(1, 2, 4.0)));
        assert!(!row.is_self_pair());

        assert_eq!(UnrolledEdge::new(1u64, 3, None).to_edge(), None);
        assert_eq!(UnrolledEdge::from(WeightedEdge(7u64, 8, 1.0)), UnrolledEdge::new(7, 8, Some(1.0)));
    }
}
