use super::{Collection, CollectionKind, Mergeable};
use crate::tuple_id::{CollectionTupleIds, LogicalTime};
use crate::value::Tuple;
use std::collections::HashMap;

struct Entry {
    tuple: Tuple,
    times: CollectionTupleIds,
}

/// A persistent collection: rows survive `tick()` and accumulate over the
/// node's lifetime. Writes can be applied immediately (`merge`) or deferred
/// to the next tick boundary (`deferred_merge`, `deferred_delete`); deferred
/// deletes are applied after deferred merges within the same tick, so a
/// tuple that is both deferred-merged and deferred-deleted in one tick ends
/// up absent (§8 scenario 3, grounded on `collections/table_test.cc`).
#[derive(Default)]
pub struct Table {
    rows: HashMap<u64, Entry>,
    deferred_merges: Vec<Tuple>,
    deferred_deletes: Vec<Tuple>,
}

impl Table {
    pub fn new() -> Self {
        Table::default()
    }

    /// Merge a tuple in immediately at logical time `now`.
    pub fn merge(&mut self, tuple: Tuple, now: LogicalTime) {
        let hash = tuple.hash();
        let entry = self.rows.entry(hash).or_insert_with(|| Entry {
            tuple: tuple.clone(),
            times: CollectionTupleIds::new(),
        });
        entry.times.record(hash, now);
    }

    /// Queue a tuple to be merged in at the start of the next `tick()`.
    pub fn deferred_merge(&mut self, tuple: Tuple) {
        self.deferred_merges.push(tuple);
    }

    /// Queue a tuple to be deleted at the start of the next `tick()`.
    /// Deleting a tuple not present in the table is a no-op.
    pub fn deferred_delete(&mut self, tuple: Tuple) {
        self.deferred_deletes.push(tuple);
    }

    pub fn contains(&self, tuple: &Tuple) -> bool {
        self.rows.contains_key(&tuple.hash())
    }

    pub fn tuple_ids(&self, hash: u64) -> Option<&CollectionTupleIds> {
        self.rows.get(&hash).map(|e| &e.times)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty_table(&self) -> bool {
        self.rows.is_empty()
    }
}

impl Mergeable for Table {
    fn merge(&mut self, rows: Vec<Tuple>) {
        for t in rows {
            Table::merge(self, t, 0);
        }
    }
}

impl Collection for Table {
    fn kind(&self) -> CollectionKind {
        CollectionKind::Table
    }

    fn rows_with_times(&self) -> Box<dyn Iterator<Item = (&Tuple, LogicalTime)> + '_> {
        Box::new(self.rows.values().flat_map(|entry| {
            let tuple = &entry.tuple;
            entry.times.times_for(tuple.hash()).map(move |t| (tuple, t))
        }))
    }

    /// Apply all deferred merges, then all deferred deletes — delete wins
    /// when the same tuple appears in both queues within one tick.
    fn tick(&mut self, now: LogicalTime) {
        for tuple in self.deferred_merges.drain(..) {
            let hash = tuple.hash();
            let entry = self.rows.entry(hash).or_insert_with(|| Entry {
                tuple: tuple.clone(),
                times: CollectionTupleIds::new(),
            });
            entry.times.record(hash, now);
        }
        for tuple in self.deferred_deletes.drain(..) {
            self.rows.remove(&tuple.hash());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    fn row(tag: &str) -> Tuple {
        Tuple::new(vec![Value::string(tag), Value::string(tag)])
    }

    #[test]
    fn table_starts_empty() {
        let t = Table::new();
        assert!(t.is_empty_table());
    }

    #[test]
    fn merge_accumulates_times_for_same_hash() {
        let mut t = Table::new();
        let b = row("b");
        t.merge(b.clone(), 1);
        t.merge(b.clone(), 2);
        let times: Vec<_> = t.tuple_ids(b.hash()).unwrap().times_for(b.hash()).collect();
        assert_eq!(times, vec![1, 2]);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn tick_does_not_clear_table() {
        let mut t = Table::new();
        t.merge(row("a"), 1);
        Collection::tick(&mut t, 2);
        assert_eq!(t.len(), 1);
    }

    #[test]
    fn deferred_merge_is_not_visible_until_tick() {
        let mut t = Table::new();
        t.deferred_merge(row("a"));
        assert!(t.is_empty_table());
        Collection::tick(&mut t, 1);
        assert!(t.contains(&row("a")));
    }

    #[test]
    fn deferred_delete_of_absent_tuple_is_noop() {
        let mut t = Table::new();
        t.deferred_delete(row("c"));
        Collection::tick(&mut t, 1);
        assert!(t.is_empty_table());
    }

    #[test]
    fn deferred_merge_and_deferred_delete_same_tick_delete_wins() {
        let mut t = Table::new();
        t.merge(row("a"), 1);
        t.deferred_merge(row("b"));
        t.deferred_delete(row("a"));
        t.deferred_delete(row("c"));
        Collection::tick(&mut t, 2);
        assert!(!t.contains(&row("a")));
        assert!(t.contains(&row("b")));
        assert_eq!(t.len(), 1);
    }
}
