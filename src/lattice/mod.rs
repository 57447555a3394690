//! Join-semilattice collections (§4.3).
//!
//! Every lattice type exposes `merge` (combine with another instance of the
//! same lattice), `merge_expr` (fold in every row a relational expression
//! evaluated to — the form a rule actually produces), `merge_expr_one`
//! (the single-item primitive `merge_expr` folds), and `reveal` (read the
//! current value without mutating it). `tick` is always a no-op: lattices
//! have no notion of transient vs. persistent state, unlike the row
//! collections in [`crate::collections`].

mod bool_lattice;
mod lww;
mod map_lattice;
mod max_min;
mod set_lattice;

pub use bool_lattice::BoolLattice;
pub use lww::LwwLattice;
pub use map_lattice::MapLattice;
pub use max_min::{MaxLattice, MinLattice};
pub use set_lattice::SetLattice;

/// A join-semilattice: a type with an associative, commutative, idempotent
/// `merge` and a distinguished bottom element reachable via `Default`.
pub trait Lattice: Default + Clone + PartialEq {
    /// The type a rule's relational expression evaluates to before it is
    /// merged in; for most lattices this is `Self`, but it is a named
    /// associated type so call sites read naturally for collections whose
    /// merge input differs in shape from their revealed value.
    type MergeIn;

    fn merge(&mut self, other: Self);

    /// Merge in a single item of `MergeIn`. The primitive every concrete
    /// lattice implements; `merge_expr` folds this over a whole relational
    /// expression's output rows.
    fn merge_expr_one(&mut self, expr: Self::MergeIn);

    /// Merge in every item a rule's relational expression evaluated to
    /// (§4.3: a rule merges a *relation*, not one pre-evaluated scalar).
    fn merge_expr<I: IntoIterator<Item = Self::MergeIn>>(&mut self, expr: I) {
        for item in expr {
            self.merge_expr_one(item);
        }
    }

    fn reveal(&self) -> &Self;

    /// No-op: lattices carry no per-tick transient state.
    fn tick(&mut self) {}
}

#[cfg(test)]
mod shared_tests {
    use super::*;

    /// Generic check any `Lattice` impl under test can reuse: merging bottom
    /// into `x` leaves `x` unchanged.
    pub fn assert_bottom_is_identity<L: Lattice>(x: L) {
        let mut merged = x.clone();
        merged.merge(L::default());
        assert_eq!(merged, x);
    }
}
