//! Relational algebra (§4.4): the lazy, lineage-carrying operator tree rules
//! are compiled to. Every physical operator is ultimately an
//! `Iterator<Item = LineagedRow>` built from pull-based combinators — there
//! is no incremental/diff machinery here, by design (§9): each tick
//! re-evaluates its rules' operator trees from scratch against that tick's
//! collection snapshots.

mod aggregates;
mod cross;
mod filter;
mod group_by;
mod hash_join;
mod id_count_batch;
mod map;
mod project;
mod scan;
mod sum;

pub use aggregates::{Agg, Avg, Count as CountAgg, Sum as SumAgg, Union as UnionAgg};
pub use cross::Cross;
pub use filter::Filter;
pub use group_by::GroupBy;
pub use hash_join::HashJoin;
pub use id_count_batch::{Batch, Count, Id, Unbatch};
pub use map::Map;
pub use project::{Project, ProjectError};
pub use scan::Scan;
pub use sum::Sum;

use crate::tuple_id::LocalTupleId;
use crate::value::Tuple;

/// A row paired with the set of stored facts it was derived from, used to
/// build derived-lineage records when a rule's output is merged into a
/// collection.
#[derive(Debug, Clone, PartialEq)]
pub struct LineagedRow {
    pub tuple: Tuple,
    pub provenance: Vec<LocalTupleId>,
}

impl LineagedRow {
    pub fn new(tuple: Tuple, provenance: Vec<LocalTupleId>) -> Self {
        LineagedRow { tuple, provenance }
    }

    /// A row with no provenance, e.g. one produced by scanning an external
    /// iterable rather than a stored collection.
    pub fn without_provenance(tuple: Tuple) -> Self {
        LineagedRow {
            tuple,
            provenance: Vec::new(),
        }
    }

    fn union_provenance(left: &LineagedRow, right: &LineagedRow) -> Vec<LocalTupleId> {
        let mut out = left.provenance.clone();
        out.extend(right.provenance.iter().cloned());
        out
    }
}

/// A physical operator: a lazily pulled stream of lineaged rows. Type
/// alias rather than a distinct trait since every operator in this module is
/// itself `impl Iterator<Item = LineagedRow>` and composes via ordinary
/// iterator adapters plus the handful of relational combinators below.
pub type PhysicalOp<'a> = Box<dyn Iterator<Item = LineagedRow> + 'a>;

/// A setup-time error: something about how an operator was configured (an
/// out-of-range column index, a key-list arity mismatch) rather than a
/// runtime data condition.
#[derive(Debug, Clone, thiserror::Error)]
pub enum RaConfigError {
    #[error("column index {index} out of range for arity {arity}")]
    ColumnIndexOutOfRange { index: usize, arity: usize },
    #[error("join key lists have mismatched arity: left has {left}, right has {right}")]
    JoinKeyArityMismatch { left: usize, right: usize },
}
