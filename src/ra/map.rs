use super::{LineagedRow, PhysicalOp};
use crate::value::Tuple;

/// Applies `f` to each row's tuple, preserving its provenance unchanged.
pub struct Map;

impl Map {
    pub fn apply<'a>(
        input: PhysicalOp<'a>,
        f: impl Fn(&Tuple) -> Tuple + 'a,
    ) -> PhysicalOp<'a> {
        Box::new(input.map(move |row| LineagedRow::new(f(&row.tuple), row.provenance)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ra::Scan;
    use crate::value::Value;

    #[test]
    fn map_transforms_tuple_keeps_provenance() {
        let rows = vec![Tuple::new(vec![Value::Int32(1)])];
        let scanned = Scan::over_collection("t", rows.iter().map(|t| (t, 0)));
        let mapped = Map::apply(scanned, |t| {
            Tuple::new(vec![Value::Int32(t.get(0).unwrap().as_f64().unwrap() as i32 * 2)])
        });
        let out: Vec<_> = mapped.collect();
        assert_eq!(out[0].tuple, Tuple::new(vec![Value::Int32(2)]));
        assert_eq!(out[0].provenance.len(), 1);
    }
}
