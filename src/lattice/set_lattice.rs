use super::Lattice;
use crate::value::Value;
use std::collections::BTreeSet;

/// Set-union lattice: bottom is the empty set, merge is set union.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SetLattice {
    elements: BTreeSet<Value>,
}

impl SetLattice {
    pub fn singleton(value: Value) -> Self {
        let mut elements = BTreeSet::new();
        elements.insert(value);
        SetLattice { elements }
    }

    pub fn from_values(values: impl IntoIterator<Item = Value>) -> Self {
        SetLattice {
            elements: values.into_iter().collect(),
        }
    }

    pub fn contains(&self, value: &Value) -> bool {
        self.elements.contains(value)
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.elements.iter()
    }
}

impl Lattice for SetLattice {
    type MergeIn = Value;

    fn merge(&mut self, other: Self) {
        self.elements.extend(other.elements);
    }

    fn merge_expr_one(&mut self, expr: Value) {
        self.elements.insert(expr);
    }

    fn reveal(&self) -> &Self {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_is_union() {
        let mut a = SetLattice::singleton(Value::Int32(1));
        a.merge(SetLattice::singleton(Value::Int32(2)));
        assert_eq!(a.len(), 2);
        assert!(a.contains(&Value::Int32(1)));
        assert!(a.contains(&Value::Int32(2)));
    }

    #[test]
    fn merge_is_idempotent() {
        let mut a = SetLattice::singleton(Value::Int32(1));
        a.merge(SetLattice::singleton(Value::Int32(1)));
        assert_eq!(a.len(), 1);
    }

    #[test]
    fn bottom_is_empty() {
        assert!(SetLattice::default().is_empty());
    }

    #[test]
    fn merge_expr_inserts_every_row() {
        let mut a = SetLattice::default();
        a.merge_expr([Value::Int32(1), Value::Int32(2), Value::Int32(1)]);
        assert_eq!(a.len(), 2);
    }
}
