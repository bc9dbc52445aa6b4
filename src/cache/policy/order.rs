//! Sequenced key index shared by the order-based policies.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

/// Keys ordered by a monotonically increasing sequence number.
///
/// - First = oldest sequence
/// - Last = newest sequence
#[derive(Debug)]
pub(crate) struct SequencedKeys<K> {
    positions: HashMap<K, u64>,
    order: BTreeMap<u64, K>,
    next_seq: u64,
}

impl<K> Default for SequencedKeys<K> {
    fn default() -> Self {
        Self {
            positions: HashMap::new(),
            order: BTreeMap::new(),
            next_seq: 0,
        }
    }
}

impl<K: Eq + Hash + Clone> SequencedKeys<K> {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Moves `key` to the newest position, inserting it if needed.
    pub(crate) fn touch(&mut self, key: &K) {
        let seq = self.bump();
        if let Some(old) = self.positions.insert(key.clone(), seq) {
            self.order.remove(&old);
        }
        self.order.insert(seq, key.clone());
    }

    /// Appends `key` at the newest position unless it is already tracked.
    pub(crate) fn push_if_absent(&mut self, key: &K) {
        if self.positions.contains_key(key) {
            return;
        }
        let seq = self.bump();
        self.positions.insert(key.clone(), seq);
        self.order.insert(seq, key.clone());
    }

    /// Forgets `key`, returning whether it was tracked.
    pub(crate) fn remove(&mut self, key: &K) -> bool {
        match self.positions.remove(key) {
            Some(seq) => {
                self.order.remove(&seq);
                true
            }
            None => false,
        }
    }

    pub(crate) fn oldest(&self) -> Option<&K> {
        self.order.first_key_value().map(|(_, key)| key)
    }

    pub(crate) fn newest(&self) -> Option<&K> {
        self.order.last_key_value().map(|(_, key)| key)
    }

    pub(crate) fn contains(&self, key: &K) -> bool {
        self.positions.contains_key(key)
    }

    pub(crate) fn len(&self) -> usize {
        self.positions.len()
    }

    pub(crate) fn clear(&mut self) {
        self.positions.clear();
        self.order.clear();
    }

    fn bump(&mut self) -> u64 {
        let seq = self.next_seq;
        self.next_seq += 1;
        seq
    }
}
