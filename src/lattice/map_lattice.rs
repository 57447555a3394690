use super::Lattice;
use crate::value::Value;
use std::collections::BTreeMap;

/// Map lattice keyed by `Value`, whose values are themselves lattices.
/// Merge proceeds key-wise: a key present in only one side is copied over;
/// a key present in both has its values merged recursively.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MapLattice<V: Lattice + Eq> {
    entries: BTreeMap<Value, V>,
}

impl<V: Lattice + Eq> Default for MapLattice<V> {
    fn default() -> Self {
        MapLattice {
            entries: BTreeMap::new(),
        }
    }
}

impl<V: Lattice + Eq> MapLattice<V> {
    pub fn get(&self, key: &Value) -> Option<&V> {
        self.entries.get(key)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Value, &V)> {
        self.entries.iter()
    }
}

impl<V: Lattice + Eq> Lattice for MapLattice<V> {
    type MergeIn = (Value, V);

    fn merge(&mut self, other: Self) {
        for (k, v) in other.entries {
            self.merge_expr_one((k, v));
        }
    }

    fn merge_expr_one(&mut self, expr: (Value, V)) {
        let (key, value) = expr;
        self.entries
            .entry(key)
            .and_modify(|existing| existing.merge(value.clone()))
            .or_insert(value);
    }

    fn reveal(&self) -> &Self {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lattice::MaxLattice;

    #[test]
    fn disjoint_keys_are_both_kept() {
        let mut a = MapLattice::<MaxLattice>::default();
        a.merge_expr_one((Value::Int32(1), MaxLattice::new(10)));
        a.merge_expr_one((Value::Int32(2), MaxLattice::new(20)));
        assert_eq!(a.get(&Value::Int32(1)).unwrap().value(), 10);
        assert_eq!(a.get(&Value::Int32(2)).unwrap().value(), 20);
    }

    #[test]
    fn shared_keys_merge_recursively() {
        let mut a = MapLattice::<MaxLattice>::default();
        a.merge_expr_one((Value::Int32(1), MaxLattice::new(10)));
        a.merge_expr_one((Value::Int32(1), MaxLattice::new(30)));
        assert_eq!(a.get(&Value::Int32(1)).unwrap().value(), 30);
    }

    #[test]
    fn bottom_is_empty_map() {
        assert!(MapLattice::<MaxLattice>::default().is_empty());
    }

    #[test]
    fn merge_expr_applies_every_row_of_an_expression() {
        let mut a = MapLattice::<MaxLattice>::default();
        a.merge_expr([
            (Value::Int32(1), MaxLattice::new(10)),
            (Value::Int32(1), MaxLattice::new(30)),
            (Value::Int32(2), MaxLattice::new(5)),
        ]);
        assert_eq!(a.get(&Value::Int32(1)).unwrap().value(), 30);
        assert_eq!(a.get(&Value::Int32(2)).unwrap().value(), 5);
    }
}
