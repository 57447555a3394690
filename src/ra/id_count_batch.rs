use super::{LineagedRow, PhysicalOp};
use crate::pickler::BincodePickler;
use crate::value::{Tuple, Value};

/// Passes rows through unchanged. Exists so a rule's operator tree can name
/// an explicit no-op stage (e.g. as the identity arm of a conditional rule
/// graph) rather than special-casing "no operator here".
pub struct Id;

impl Id {
    pub fn apply<'a>(input: PhysicalOp<'a>) -> PhysicalOp<'a> {
        input
    }
}

/// Counts the rows pulled from `input` and emits exactly one row: `(count)`.
/// An empty input still yields one row, `(0)`, with no provenance — there is
/// nothing to attribute the zero to.
pub struct Count;

impl Count {
    pub fn apply<'a>(input: PhysicalOp<'a>) -> PhysicalOp<'a> {
        let mut total: i64 = 0;
        let mut provenance = Vec::new();
        for row in input {
            total += 1;
            provenance.extend(row.provenance);
        }
        let row = LineagedRow::new(Tuple::new(vec![Value::Int64(total)]), provenance);
        Box::new(std::iter::once(row))
    }
}

/// Collapses every row pulled from `input` into a single row whose one
/// column is the pickled batch of all input tuples (§4.2, used to fold a
/// tick's worth of channel output into one wire message). The inverse,
/// [`Unbatch`], expands such a row back out.
pub struct Batch;

impl Batch {
    pub fn apply<'a>(input: PhysicalOp<'a>) -> PhysicalOp<'a> {
        let mut tuples = Vec::new();
        let mut provenance = Vec::new();
        for row in input {
            tuples.push(row.tuple);
            provenance.extend(row.provenance);
        }
        let payload =
            BincodePickler::dump_batch(&tuples).expect("in-memory tuples always encode");
        let row = LineagedRow::new(Tuple::new(vec![Value::Bytes(payload)]), provenance);
        Box::new(std::iter::once(row))
    }
}

/// Expands a single-column batched row (as produced by [`Batch`]) back into
/// one output row per tuple in the batch. Rows produced this way carry no
/// per-tuple provenance of their own; the batch row's combined provenance is
/// attached to every unbatched row, since that is the finest-grained
/// attribution available once the tuples have been folded together.
pub struct Unbatch;

impl Unbatch {
    pub fn apply<'a>(input: PhysicalOp<'a>) -> PhysicalOp<'a> {
        Box::new(input.flat_map(|row| {
            let provenance = row.provenance;
            let payload = match row.tuple.get(0) {
                Some(Value::Bytes(b)) => b.clone(),
                _ => Vec::new(),
            };
            let tuples = BincodePickler::load_batch(&payload).unwrap_or_default();
            tuples
                .into_iter()
                .map(move |t| LineagedRow::new(t, provenance.clone()))
                .collect::<Vec<_>>()
                .into_iter()
        }))
    }
}
