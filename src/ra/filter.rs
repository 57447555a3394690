use super::{LineagedRow, PhysicalOp};
use crate::value::Tuple;

/// Keeps only rows whose tuple satisfies `predicate`.
pub struct Filter;

impl Filter {
    pub fn apply<'a>(
        input: PhysicalOp<'a>,
        predicate: impl Fn(&Tuple) -> bool + 'a,
    ) -> PhysicalOp<'a> {
        Box::new(input.filter(move |row: &LineagedRow| predicate(&row.tuple)))
    }
}
