use super::Lattice;
use crate::value::Value;

/// Last-writer-wins register, keyed by a totally ordered timestamp. Merge
/// keeps the entry with the larger timestamp; ties keep the existing entry
/// (merge is still idempotent and commutative because equal timestamps are
/// only possible by merging a value with itself or a duplicate).
#[derive(Debug, Clone, PartialEq)]
pub struct LwwLattice {
    entry: Option<(i64, Value)>,
}

impl Default for LwwLattice {
    fn default() -> Self {
        LwwLattice { entry: None }
    }
}

impl LwwLattice {
    pub fn new(timestamp: i64, value: Value) -> Self {
        LwwLattice {
            entry: Some((timestamp, value)),
        }
    }

    pub fn value(&self) -> Option<&Value> {
        self.entry.as_ref().map(|(_, v)| v)
    }

    pub fn timestamp(&self) -> Option<i64> {
        self.entry.as_ref().map(|(t, _)| *t)
    }
}

impl Lattice for LwwLattice {
    type MergeIn = (i64, Value);

    fn merge(&mut self, other: Self) {
        if let Some((t, v)) = other.entry {
            self.merge_expr_one((t, v));
        }
    }

    fn merge_expr_one(&mut self, expr: (i64, Value)) {
        let (new_t, new_v) = expr;
        let replace = match &self.entry {
            None => true,
            Some((cur_t, _)) => new_t > *cur_t,
        };
        if replace {
            self.entry = Some((new_t, new_v));
        }
    }

    fn reveal(&self) -> &Self {
        self
    }
}
