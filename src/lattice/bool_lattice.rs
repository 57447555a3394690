use super::Lattice;

/// Boolean-OR lattice: bottom is `false`, merge is logical OR.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BoolLattice(bool);

impl BoolLattice {
    pub fn new(value: bool) -> Self {
        BoolLattice(value)
    }
}

impl Lattice for BoolLattice {
    type MergeIn = bool;

    fn merge(&mut self, other: Self) {
        self.0 |= other.0;
    }

    fn merge_expr_one(&mut self, expr: bool) {
        self.0 |= expr;
    }

    fn reveal(&self) -> &Self {
        self
    }
}

impl std::ops::Deref for BoolLattice {
    type Target = bool;
    fn deref(&self) -> &bool {
        &self.0
    }
}
