//! Tuple identity within a single collection's history.
//!
//! `LocalTupleId` is the lineage primary key: a fact is uniquely identified
//! by the collection it lives in, the hash of its value, and the logical
//! time at which it was inserted. `CollectionTupleIds` is the per-value
//! ledger a collection keeps of every logical time a given hash was seen,
//! mirroring the original engine's `fluent::CollectionTupleIds` map.

use std::collections::BTreeSet;
use std::fmt;

pub type LogicalTime = i64;

/// Uniquely identifies one inserted fact for lineage-tracking purposes.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LocalTupleId {
    pub collection_name: String,
    pub hash: u64,
    pub logical_time_inserted: LogicalTime,
}

impl LocalTupleId {
    pub fn new(collection_name: impl Into<String>, hash: u64, logical_time_inserted: LogicalTime) -> Self {
        LocalTupleId {
            collection_name: collection_name.into(),
            hash,
            logical_time_inserted,
        }
    }
}

impl fmt::Display for LocalTupleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({}, {}, {})",
            self.collection_name, self.hash, self.logical_time_inserted
        )
    }
}

/// The set of logical times at which each distinct tuple hash has been
/// inserted into a collection. A hash maps to multiple times when the same
/// value is merged repeatedly across ticks (§4.2 Table).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CollectionTupleIds {
    entries: std::collections::BTreeMap<u64, BTreeSet<LogicalTime>>,
}

impl CollectionTupleIds {
    pub fn new() -> Self {
        CollectionTupleIds::default()
    }

    /// Record that `hash` was seen (again) at `time`. Returns `true` if this
    /// is the first time this exact `(hash, time)` pair has been recorded.
    pub fn record(&mut self, hash: u64, time: LogicalTime) -> bool {
        self.entries.entry(hash).or_default().insert(time)
    }

    pub fn times_for(&self, hash: u64) -> impl Iterator<Item = LogicalTime> + '_ {
        self.entries.get(&hash).into_iter().flat_map(|s| s.iter().copied())
    }

    pub fn contains(&self, hash: u64) -> bool {
        self.entries.contains_key(&hash)
    }

    pub fn remove_hash(&mut self, hash: u64) {
        self.entries.remove(&hash);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, &BTreeSet<LogicalTime>)> {
        self.entries.iter().map(|(h, ts)| (*h, ts))
    }
}
