use super::LineagedRow;
use crate::tuple_id::{LocalTupleId, LogicalTime};
use crate::value::Tuple;

/// Scans a named collection, attaching one provenance entry per row: the
/// `LocalTupleId` of the stored fact the row came from, stamped with that
/// row's own insertion time rather than one time shared by the whole scan
/// (a `Table` row merged at two distinct logical times is a distinct fact at
/// each, see [`crate::collections::Collection::rows_with_times`]). Use
/// [`Scan::over_external`] to scan an arbitrary iterable (e.g. a literal
/// fact set supplied by a rule) instead; those rows carry no provenance,
/// since they were never stored under a collection name.
pub struct Scan;

impl Scan {
    /// Scan `rows`, each paired with the logical time it was inserted into
    /// `collection_name` at.
    pub fn over_collection<'a>(
        collection_name: &'a str,
        rows: impl Iterator<Item = (&'a Tuple, LogicalTime)> + 'a,
    ) -> super::PhysicalOp<'a> {
        Box::new(rows.map(move |(tuple, logical_time)| {
            let id = LocalTupleId::new(collection_name, tuple.hash(), logical_time);
            LineagedRow::new(tuple.clone(), vec![id])
        }))
    }

    /// Scan an externally supplied iterable with no provenance attached.
    pub fn over_external<'a>(rows: impl Iterator<Item = Tuple> + 'a) -> super::PhysicalOp<'a> {
        Box::new(rows.map(LineagedRow::without_provenance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Value;

    #[test]
    fn collection_scan_attaches_provenance() {
        let rows = vec![Tuple::new(vec![Value::Int32(1)])];
        let mut out = Scan::over_collection("t", rows.iter().map(|t| (t, 3)));
        let row = out.next().unwrap();
        assert_eq!(row.provenance.len(), 1);
        assert_eq!(row.provenance[0].collection_name, "t");
        assert_eq!(row.provenance[0].logical_time_inserted, 3);
    }

    #[test]
    fn collection_scan_reports_each_rows_own_insertion_time() {
        let rows = vec![
            Tuple::new(vec![Value::Int32(1)]),
            Tuple::new(vec![Value::Int32(2)]),
        ];
        let times = [1, 2];
        let paired = rows.iter().zip(times);
        let out: Vec<_> = Scan::over_collection("t", paired).collect();
        assert_eq!(out[0].provenance[0].logical_time_inserted, 1);
        assert_eq!(out[1].provenance[0].logical_time_inserted, 2);
    }

    #[test]
    fn external_scan_has_no_provenance() {
        let rows = vec![Tuple::new(vec![Value::Int32(1)])];
        let mut out = Scan::over_external(rows.into_iter());
        let row = out.next().unwrap();
        assert!(row.provenance.is_empty());
    }
}
