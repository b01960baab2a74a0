use std::hash::Hash;

use ahash::RandomState;
use std::collections::HashMap;

/// Bidirectional map between keys and dense indices `[0, len)`.
///
/// Indices are handed out in insertion order and never reused: the reverse direction is a
/// plain `Vec` indexed by the assigned value.
#[derive(Debug, Clone)]
pub struct BiMap<K>
where
    K: Eq + Hash + Clone,
{
    forward: HashMap<K, usize, RandomState>,
    reverse: Vec<K>,
}

impl<K> Default for BiMap<K>
where
    K: Eq + Hash + Clone,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<K> BiMap<K>
where
    K: Eq + Hash + Clone,
{
    pub fn new() -> Self {
        Self {
            forward: HashMap::default(),
            reverse: Vec::new(),
        }
    }

    /// Index of `key`, inserting it with the next free index if unseen.
    pub fn entry_or_insert_by_key(&mut self, key: &K) -> usize {
        if let Some(&idx) = self.forward.get(key) {
            return idx;
        }
        let idx = self.reverse.len();
        self.forward.insert(key.clone(), idx);
        self.reverse.push(key.clone());
        idx
    }

    pub fn get_by_key<Q>(&self, key: &Q) -> Option<usize>
    where
        K: std::borrow::Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.forward.get(key).copied()
    }

    pub fn get_by_value(&self, value: usize) -> Option<&K> {
        self.reverse.get(value)
    }

    /// Keys in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&K, usize)> {
        self.reverse.iter().enumerate().map(|(i, k)| (k, i))
    }

    pub fn clear(&mut self) {
        self.forward.clear();
        self.reverse.clear();
    }

    pub fn len(&self) -> usize {
        self.reverse.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
