//! The level collection
//!
//! Ordered, append-only store of every level loaded from every source. A
//! level's position here is its absolute index, which is what pack-local
//! "next level" references resolve against.

use crate::formats::level::{Level, ScoreKey};
use crate::formats::pack::ResolutionContext;

/// Two levels sharing the same score key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DuplicateKey {
    /// Index of the newly appended level
    pub index: usize,
    /// Index of the earlier level that wins score lookups
    pub existing: usize,
}

#[derive(Debug, Clone, Default)]
pub struct LevelCollection {
    levels: Vec<Level>,
}

impl LevelCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Level> {
        self.levels.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Level> {
        self.levels.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Level> {
        self.levels.iter()
    }

    /// Context for loading the next source.
    pub fn context(&self) -> ResolutionContext {
        ResolutionContext::new(self.levels.len())
    }

    /// Append the levels of one fully loaded source.
    ///
    /// Returns every appended level whose score key was already taken.
    pub fn append(&mut self, levels: Vec<Level>) -> Vec<DuplicateKey> {
        let mut duplicates = Vec::new();
        for level in levels {
            debug_assert_eq!(level.index(), self.levels.len());
            if let Some(existing) = self.position_by_key(level.key()) {
                duplicates.push(DuplicateKey {
                    index: self.levels.len(),
                    existing,
                });
            }
            self.levels.push(level);
        }
        duplicates
    }

    /// Index of the first level carrying `key`.
    pub fn position_by_key(&self, key: &ScoreKey) -> Option<usize> {
        self.levels.iter().position(|level| level.key() == key)
    }

    /// The level that follows `index`, if it names one that was loaded.
    pub fn next_of(&self, index: usize) -> Option<usize> {
        self.levels
            .get(index)?
            .next_index()
            .filter(|&next| next < self.levels.len())
    }

    /// Levels whose successor index points past the collection.
    pub fn dangling_next(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.levels.iter().filter_map(|level| {
            level
                .next_index()
                .filter(|&next| next >= self.levels.len())
                .map(|next| (level.index(), next))
        })
    }
}

impl<'a> IntoIterator for &'a LevelCollection {
    type Item = &'a Level;
    type IntoIter = std::slice::Iter<'a, Level>;

    fn into_iter(self) -> Self::IntoIter {
        self.levels.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{keyed_record, level_record, pack_bytes, pattern};
    use crate::formats::level::Location;
    use crate::formats::pack::load_levels;

    fn load_into(collection: &mut LevelCollection, data: &[u8]) -> Vec<DuplicateKey> {
        let pack = load_levels(data, Location::Rom, collection.context()).unwrap();
        collection.append(pack.levels)
    }

    #[test]
    fn test_append_preserves_insertion_order() {
        let mut collection = LevelCollection::new();
        load_into(
            &mut collection,
            &pack_bytes(&[pattern("p")], &[level_record("A", &[0]), level_record("B", &[0])]),
        );
        load_into(
            &mut collection,
            &pack_bytes(&[pattern("p")], &[level_record("C", &[0])]),
        );

        let names: Vec<_> = collection.iter().map(|l| l.name().to_string()).collect();
        assert_eq!(names, vec!["A", "B", "C"]);
        assert_eq!(collection.get(2).unwrap().index(), 2);
        assert_eq!(collection.context().level_offset(), 3);
    }

    #[test]
    fn test_duplicate_keys_are_reported() {
        let mut collection = LevelCollection::new();
        let dups = load_into(
            &mut collection,
            &pack_bytes(
                &[pattern("p")],
                &[
                    level_record("A", &[0]),
                    keyed_record("A", "Easy", "Normal", "Dev", &[0]),
                ],
            ),
        );
        assert!(dups.is_empty());

        let dups = load_into(
            &mut collection,
            &pack_bytes(&[pattern("p")], &[level_record("A", &[0])]),
        );
        assert_eq!(
            dups,
            vec![DuplicateKey {
                index: 2,
                existing: 0,
            }]
        );
    }

    #[test]
    fn test_find_by_key_takes_first_match() {
        let mut collection = LevelCollection::new();
        load_into(
            &mut collection,
            &pack_bytes(&[pattern("p")], &[level_record("A", &[0]), level_record("A", &[0])]),
        );
        let key = collection.get(1).unwrap().key().clone();
        assert_eq!(collection.position_by_key(&key), Some(0));
    }

    #[test]
    fn test_next_of_ignores_dangling_references() {
        let mut a = level_record("A", &[0]);
        a.next_index = 1;
        let mut b = level_record("B", &[0]);
        b.next_index = 7;

        let mut collection = LevelCollection::new();
        load_into(&mut collection, &pack_bytes(&[pattern("p")], &[a, b]));

        assert_eq!(collection.next_of(0), Some(1));
        assert_eq!(collection.next_of(1), None);
        assert_eq!(collection.next_of(5), None);
        assert_eq!(collection.dangling_next().collect::<Vec<_>>(), vec![(1, 7)]);
    }
}
