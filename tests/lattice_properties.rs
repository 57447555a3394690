//! Property tests for the join-semilattice laws: associativity, commutativity,
//! and idempotence of `merge`, for every lattice kind.

use fluent::lattice::{BoolLattice, Lattice, MaxLattice, SetLattice};
use fluent::value::Value;
use proptest::prelude::*;

fn bool_lattice_strategy() -> impl Strategy<Value = BoolLattice> {
    any::<bool>().prop_map(BoolLattice::new)
}

fn max_lattice_strategy() -> impl Strategy<Value = MaxLattice> {
    any::<i64>().prop_map(MaxLattice::new)
}

proptest! {
    #[test]
    fn bool_merge_is_commutative(a in bool_lattice_strategy(), b in bool_lattice_strategy()) {
        let mut ab = a.clone();
        ab.merge(b.clone());
        let mut ba = b;
        ba.merge(a);
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn bool_merge_is_idempotent(a in bool_lattice_strategy()) {
        let mut merged = a.clone();
        merged.merge(a.clone());
        prop_assert_eq!(merged, a);
    }

    #[test]
    fn max_merge_is_associative(a in max_lattice_strategy(), b in max_lattice_strategy(), c in max_lattice_strategy()) {
        let mut left = a.clone();
        left.merge(b.clone());
        left.merge(c.clone());

        let mut right = b;
        right.merge(c);
        let mut combined = a;
        combined.merge(right);

        prop_assert_eq!(left, combined);
    }

    #[test]
    fn max_merge_is_commutative(a in max_lattice_strategy(), b in max_lattice_strategy()) {
        let mut ab = a.clone();
        ab.merge(b.clone());
        let mut ba = b;
        ba.merge(a);
        prop_assert_eq!(ab, ba);
    }

    #[test]
    fn set_merge_is_idempotent(values in prop::collection::vec(0..50i32, 0..10)) {
        let set = SetLattice::from_values(values.into_iter().map(Value::Int32));
        let mut merged = set.clone();
        merged.merge(set.clone());
        prop_assert_eq!(merged, set);
    }
}
