/*!
# Identifier Index

Maps opaque identifiers to dense positions `0..n` and back.
Positions are handed out in first-insertion order, which is the row/column order of a
[`DistanceMatrix`](crate::repr::DistanceMatrix).
*/
use std::fmt;

use fxhash::FxHashMap;

use crate::id::*;

/// A bidirectional mapping `identifier <-> position`.
///
/// # Example
/// ```
/// use tollgraph::utils::*;
///
/// let mut index = IdIndex::new();
/// assert_eq!(index.insert(1002u64), 0);
/// assert_eq!(index.insert(1001), 1);
/// assert_eq!(index.insert(1002), 0);
///
/// assert_eq!(index.position_of(&1001), Some(1));
/// assert_eq!(index.id_at(0), Some(&1002));
/// assert_eq!(index.ids(), &[1002, 1001]);
/// ```
#[derive(Clone)]
pub struct IdIndex<I = Id> {
    ids: Vec<I>,
    positions: FxHashMap<I, usize>,
}

impl<I: Identifier> Default for IdIndex<I> {
    fn default() -> Self {
        Self {
            ids: Vec::new(),
            positions: FxHashMap::default(),
        }
    }
}

impl<I: Identifier> IdIndex<I> {
    /// Creates an empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an empty index with space for `capacity` identifiers
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            ids: Vec::with_capacity(capacity),
            positions: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
        }
    }

    /// Returns the position of `id`, assigning the next free position if it was not present
    pub fn insert(&mut self, id: I) -> usize {
        if let Some(&pos) = self.positions.get(&id) {
            return pos;
        }

        let pos = self.ids.len();
        self.positions.insert(id.clone(), pos);
        self.ids.push(id);
        pos
    }

    /// Inserts `id` only if it is not present yet.
    /// Returns *true* if the identifier was newly inserted.
    pub fn try_insert(&mut self, id: I) -> bool {
        let len = self.len();
        self.insert(id) == len
    }

    /// If `id` is present, returns `Some(position)`, otherwise `None`
    pub fn position_of(&self, id: &I) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// If `pos < len`, returns the identifier stored at `pos`
    pub fn id_at(&self, pos: usize) -> Option<&I> {
        self.ids.get(pos)
    }

    /// Returns *true* if `id` is present
    pub fn contains(&self, id: &I) -> bool {
        self.positions.contains_key(id)
    }

    /// Returns all identifiers in position order
    pub fn ids(&self) -> &[I] {
        &self.ids
    }

    /// Returns an iterator over all identifiers in position order
    pub fn iter(&self) -> std::slice::Iter<'_, I> {
        self.ids.iter()
    }

    /// Returns the number of stored identifiers
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Returns *true* if no identifier is stored
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

impl<I: Identifier> FromIterator<I> for IdIndex<I> {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        let mut index = Self::new();
        for id in iter {
            index.insert(id);
        }
        index
    }
}

/// Two indices are equal if they store the same identifiers in the same order
impl<I: Identifier> PartialEq for IdIndex<I> {
    fn eq(&self, other: &Self) -> bool {
        self.ids == other.ids
    }
}

impl<I: Identifier> Eq for IdIndex<I> {}

impl<I: Identifier> fmt::Debug for IdIndex<I> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.ids.iter()).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_insertion_order() {
        let index: IdIndex<u64> = [5, 3, 5, 9, 3, 1].into_iter().collect();

        assert_eq!(index.ids(), &[5, 3, 9, 1]);
        assert_eq!(index.len(), 4);
        for (pos, id) in index.iter().enumerate() {
            assert_eq!(index.position_of(id), Some(pos));
            assert_eq!(index.id_at(pos), Some(id));
        }

        assert_eq!(index.position_of(&7), None);
        assert_eq!(index.id_at(4), None);
    }

    #[test]
    fn try_insert() {
        let mut index = IdIndex::new();
        assert!(index.try_insert("a".to_string()));
        assert!(index.try_insert("b".to_string()));
        assert!(!index.try_insert("a".to_string()));
        assert!(index.contains(&"b".to_string()));
        assert_eq!(format!("{index:?}"), "[\"a\", \"b\"]");
    }

    #[test]
    fn equality_respects_order() {
        let a: IdIndex<u32> = [1, 2].into_iter().collect();
        let b: IdIndex<u32> = [2, 1].into_iter().collect();
        assert_ne!(a, b);
        assert_eq!(a, [1, 2, 1].into_iter().collect());
        assert!(IdIndex::<u32>::new().is_empty());
    }
}
