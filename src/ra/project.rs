use super::{LineagedRow, PhysicalOp, RaConfigError};
use crate::value::Tuple;

pub type ProjectError = RaConfigError;

/// Projects each row's tuple onto `indices`, which may repeat or reorder
/// columns. An empty index list is valid and yields one zero-arity row per
/// input row (useful as the trivial case of `GroupBy` with no aggregates).
///
/// Construction validates `indices` against `arity` up front; an
/// out-of-range index is a configuration error discovered when the rule is
/// compiled, not a runtime surprise on the first row that happens to be
/// too short.
pub struct Project {
    indices: Vec<usize>,
}

impl Project {
    pub fn new(indices: Vec<usize>, arity: usize) -> Result<Self, ProjectError> {
        for &i in &indices {
            if i >= arity {
                return Err(RaConfigError::ColumnIndexOutOfRange { index: i, arity });
            }
        }
        Ok(Project { indices })
    }

    pub fn apply<'a>(self, input: PhysicalOp<'a>) -> PhysicalOp<'a> {
        Box::new(input.map(move |row| {
            let projected = row
                .tuple
                .project(&self.indices)
                .expect("indices validated against declared arity at construction");
            LineagedRow::new(projected, row.provenance)
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ra::Scan;
    use crate::value::Value;

    #[test]
    fn rejects_out_of_range_index_at_construction() {
        let err = Project::new(vec![5], 2).unwrap_err();
        assert!(matches!(
            err,
            RaConfigError::ColumnIndexOutOfRange { index: 5, arity: 2 }
        ));
    }

    #[test]
    fn empty_index_list_yields_empty_row_per_input_row() {
        let rows = vec![
            Tuple::new(vec![Value::Int32(1), Value::Int32(2)]),
            Tuple::new(vec![Value::Int32(3), Value::Int32(4)]),
        ];
        let scanned = Scan::over_collection("t", rows.iter().map(|t| (t, 0)));
        let project = Project::new(vec![], 2).unwrap();
        let out: Vec<_> = project.apply(scanned).collect();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].tuple.arity(), 0);
    }

    #[test]
    fn reorders_and_duplicates_columns() {
        let rows = vec![Tuple::new(vec![Value::Int32(1), Value::Int32(2)])];
        let scanned = Scan::over_collection("t", rows.iter().map(|t| (t, 0)));
        let project = Project::new(vec![1, 0, 1], 2).unwrap();
        let out: Vec<_> = project.apply(scanned).collect();
        assert_eq!(
            out[0].tuple,
            Tuple::new(vec![Value::Int32(2), Value::Int32(1), Value::Int32(2)])
        );
    }
}
