use super::{LineagedRow, PhysicalOp, RaConfigError};
use crate::value::Tuple;
use std::collections::HashMap;

/// Equi-join keyed by column indices on each side. The left input is
/// materialized into a hash index keyed by the projected key tuple before
/// any right row is pulled; the right input then streams, probing the
/// index once per row. Repeating an index within a key list is legal — it
/// simply adds an extra equality constraint between those columns.
pub struct HashJoin {
    left_keys: Vec<usize>,
    right_keys: Vec<usize>,
}

impl HashJoin {
    pub fn new(left_keys: Vec<usize>, right_keys: Vec<usize>) -> Result<Self, RaConfigError> {
        if left_keys.len() != right_keys.len() {
            return Err(RaConfigError::JoinKeyArityMismatch {
                left: left_keys.len(),
                right: right_keys.len(),
            });
        }
        Ok(HashJoin {
            left_keys,
            right_keys,
        })
    }

    pub fn apply<'a>(self, left: PhysicalOp<'a>, right: PhysicalOp<'a>) -> PhysicalOp<'a> {
        let HashJoin {
            left_keys,
            right_keys,
        } = self;

        let mut index: HashMap<Tuple, Vec<LineagedRow>> = HashMap::new();
        for row in left {
            let key = row
                .tuple
                .project(&left_keys)
                .expect("left key indices validated against the left schema by the caller");
            index.entry(key).or_default().push(row);
        }

        Box::new(right.flat_map(move |r_row| {
            let key = r_row
                .tuple
                .project(&right_keys)
                .expect("right key indices validated against the right schema by the caller");
            let matches = index.get(&key).cloned().unwrap_or_default();
            matches.into_iter().map(move |l_row| {
                let provenance = LineagedRow::union_provenance(&l_row, &r_row);
                LineagedRow::new(l_row.tuple.concat(&r_row.tuple), provenance)
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ra::Scan;
    use crate::value::Value;

    fn t(vals: Vec<i32>) -> Tuple {
        Tuple::new(vals.into_iter().map(Value::Int32).collect())
    }

    #[test]
    fn rejects_mismatched_key_arity() {
        let err = HashJoin::new(vec![0], vec![0, 1]).unwrap_err();
        assert!(matches!(
            err,
            RaConfigError::JoinKeyArityMismatch { left: 1, right: 2 }
        ));
    }

    #[test]
    fn joins_on_equal_keys() {
        let left_rows = vec![t(vec![1, 10]), t(vec![2, 20]), t(vec![1, 11])];
        let right_rows = vec![t(vec![100, 1]), t(vec![200, 2])];
        let left = Scan::over_collection("l", left_rows.iter().map(|t| (t, 0)));
        let right = Scan::over_collection("r", right_rows.iter().map(|t| (t, 0)));
        let join = HashJoin::new(vec![0], vec![1]).unwrap();
        let mut out: Vec<_> = join.apply(left, right).map(|r| r.tuple).collect();
        out.sort_by_key(|t| format!("{t}"));
        assert_eq!(out.len(), 3);
        assert!(out.contains(&t(vec![1, 10, 100, 1])));
        assert!(out.contains(&t(vec![1, 11, 100, 1])));
        assert!(out.contains(&t(vec![2, 20, 200, 2])));
    }

    #[test]
    fn repeated_key_index_adds_equality_constraint() {
        let left_rows = vec![t(vec![5, 5]), t(vec![5, 6])];
        let right_rows = vec![t(vec![5])];
        let left = Scan::over_collection("l", left_rows.iter().map(|t| (t, 0)));
        let right = Scan::over_collection("r", right_rows.iter().map(|t| (t, 0)));
        let join = HashJoin::new(vec![0, 1], vec![0, 0]).unwrap();
        let out: Vec<_> = join.apply(left, right).collect();
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].tuple, t(vec![5, 5, 5]));
    }
}
