use super::aggregates::add_values;
use super::{LineagedRow, PhysicalOp};
use crate::value::Value;

/// Sums one column across an entire scan, with no grouping, emitting a
/// single output row. Distinct from [`super::SumAgg`], the per-group
/// accumulator `GroupBy` folds internally; this is the bare operator form
/// used when a rule sums a whole relation rather than grouping it first.
pub struct Sum {
    index: usize,
}

impl Sum {
    pub fn new(index: usize) -> Self {
        Sum { index }
    }

    /// Fold `input` down to one row: the type-preserving sum of column
    /// `index` across every row, or `{0}` if `input` is empty. Provenance is
    /// the union of every summed row's provenance.
    pub fn apply<'a>(&self, input: PhysicalOp<'a>) -> PhysicalOp<'a> {
        let index = self.index;
        let mut total: Option<Value> = None;
        let mut provenance = Vec::new();
        for row in input {
            if let Some(v) = row.tuple.get(index) {
                total = Some(match total.take() {
                    Some(acc) => add_values(acc, v.clone()),
                    None => v.clone(),
                });
            }
            provenance.extend(row.provenance);
        }
        let sum = total.unwrap_or(Value::Int32(0));
        Box::new(std::iter::once(LineagedRow::new(
            crate::value::Tuple::new(vec![sum]),
            provenance,
        )))
    }
}
