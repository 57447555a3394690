use super::{LineagedRow, PhysicalOp};

/// Cartesian product of two inputs. The right side is materialized once (it
/// is iterated once per left row), the left side streams.
pub struct Cross;

impl Cross {
    pub fn apply<'a>(left: PhysicalOp<'a>, right: PhysicalOp<'a>) -> PhysicalOp<'a> {
        let right: Vec<LineagedRow> = right.collect();
        Box::new(left.flat_map(move |l| {
            right.clone().into_iter().map(move |r| {
                let provenance = LineagedRow::union_provenance(&l, &r);
                LineagedRow::new(l.tuple.concat(&r.tuple), provenance)
            })
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ra::Scan;
    use crate::value::{Tuple, Value};

    #[test]
    fn cross_product_has_left_times_right_rows() {
        let left_rows = vec![Tuple::new(vec![Value::Int32(1)]), Tuple::new(vec![Value::Int32(2)])];
        let right_rows = vec![Tuple::new(vec![Value::string("a")])];
        let left = Scan::over_collection("l", left_rows.iter().map(|t| (t, 0)));
        let right = Scan::over_collection("r", right_rows.iter().map(|t| (t, 0)));
        let out: Vec<_> = Cross::apply(left, right).collect();
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].tuple, Tuple::new(vec![Value::Int32(1), Value::string("a")]));
        assert_eq!(out[0].provenance.len(), 2);
    }
}
