use super::Lattice;

/// Integer-max lattice: bottom is `i64::MIN`, merge keeps the larger value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MaxLattice(i64);

impl Default for MaxLattice {
    fn default() -> Self {
        MaxLattice(i64::MIN)
    }
}

impl MaxLattice {
    pub fn new(value: i64) -> Self {
        MaxLattice(value)
    }

    pub fn value(&self) -> i64 {
        self.0
    }
}

impl Lattice for MaxLattice {
    type MergeIn = i64;

    fn merge(&mut self, other: Self) {
        self.0 = self.0.max(other.0);
    }

    fn merge_expr_one(&mut self, expr: i64) {
        self.0 = self.0.max(expr);
    }

    fn reveal(&self) -> &Self {
        self
    }
}

/// Integer-min lattice. Unlike the original engine, the bottom element is a
/// builder-supplied parameter rather than a hardcoded sentinel (`1_000_000`);
/// the previous hardcoded bound silently misbehaved for domains that
/// legitimately use larger values (§9 resolved open question).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MinLattice {
    value: i64,
    bottom: i64,
}

impl MinLattice {
    /// Construct a `MinLattice` whose bottom (identity element for merge) is
    /// `bottom`. Callers choose `bottom` to be at least as large as any value
    /// that will ever be merged in.
    pub fn with_bottom(bottom: i64) -> Self {
        MinLattice {
            value: bottom,
            bottom,
        }
    }

    pub fn new(value: i64, bottom: i64) -> Self {
        MinLattice { value, bottom }
    }

    pub fn value(&self) -> i64 {
        self.value
    }
}

impl Default for MinLattice {
    /// The default bottom is `i64::MAX`; use [`MinLattice::with_bottom`] to
    /// pick a tighter bound for a specific domain.
    fn default() -> Self {
        MinLattice::with_bottom(i64::MAX)
    }
}

impl Lattice for MinLattice {
    type MergeIn = i64;

    fn merge(&mut self, other: Self) {
        self.value = self.value.min(other.value);
        self.bottom = self.bottom.max(other.bottom);
    }

    fn merge_expr_one(&mut self, expr: i64) {
        self.value = self.value.min(expr);
    }

    fn reveal(&self) -> &Self {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn max_merge_keeps_larger() {
        let mut a = MaxLattice::new(3);
        a.merge(MaxLattice::new(7));
        assert_eq!(a.value(), 7);
        a.merge(MaxLattice::new(2));
        assert_eq!(a.value(), 7);
    }

    #[test]
    fn min_merge_keeps_smaller() {
        let mut a = MinLattice::with_bottom(1_000);
        a.merge_expr_one(42);
        a.merge_expr_one(7);
        assert_eq!(a.value(), 7);
    }

    #[test]
    fn merge_expr_folds_every_row_of_an_expression() {
        let mut a = MaxLattice::new(0);
        a.merge_expr([3, 9, 5]);
        assert_eq!(a.value(), 9);
    }

    #[test]
    fn min_bottom_is_parameterized_not_hardcoded() {
        let a = MinLattice::with_bottom(5);
        assert_eq!(a.value(), 5);
        let b = MinLattice::with_bottom(1_000_000_000);
        assert_eq!(b.value(), 1_000_000_000);
    }

    #[test]
    fn max_bottom_is_identity() {
        super::super::shared_tests::assert_bottom_is_identity(MaxLattice::new(10));
    }
}
