//! Row collections (§4.2): the six kinds of named state a node can declare,
//! distinguished by how they behave across a tick.

mod channel;
mod periodic;
mod scratch;
mod stdin;
mod stdout;
mod table;

pub use channel::{Channel, ChannelError, OutboundMessage};
pub use periodic::Periodic;
pub use scratch::Scratch;
pub use stdin::Stdin;
pub use stdout::Stdout;
pub use table::Table;

use crate::tuple_id::LogicalTime;
use crate::value::Tuple;

/// Discriminates the six collection kinds without requiring a trait object,
/// mirroring the original engine's `CollectionType` enum
/// (`collections/collection_util.h`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionKind {
    Table,
    Scratch,
    Channel,
    Stdin,
    Stdout,
    Periodic,
}

impl CollectionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionKind::Table => "Table",
            CollectionKind::Scratch => "Scratch",
            CollectionKind::Channel => "Channel",
            CollectionKind::Stdin => "Stdin",
            CollectionKind::Stdout => "Stdout",
            CollectionKind::Periodic => "Periodic",
        }
    }
}

/// Common capability every collection kind provides: inspecting its current
/// rows and advancing to the next logical time.
pub trait Collection {
    fn kind(&self) -> CollectionKind;

    /// The rows currently visible to a rule evaluated against this
    /// collection, each paired with the logical time it was inserted at. A
    /// row merged at two distinct logical times (legal for `Table`, see
    /// `CollectionTupleIds`) is yielded once per time, since each is a
    /// distinct fact for lineage purposes.
    fn rows_with_times(&self) -> Box<dyn Iterator<Item = (&Tuple, LogicalTime)> + '_>;

    /// The rows currently visible to a rule, without their insertion times.
    fn rows(&self) -> Box<dyn Iterator<Item = &Tuple> + '_> {
        Box::new(self.rows_with_times().map(|(tuple, _)| tuple))
    }

    fn is_empty(&self) -> bool {
        self.rows_with_times().next().is_none()
    }

    /// Apply end-of-tick behavior (merge deferred rows, clear transient
    /// rows, fire periodics, etc.) and advance the logical clock.
    fn tick(&mut self, now: LogicalTime);
}

/// Collections that accept new rows through the rule engine's merge step.
pub trait Mergeable: Collection {
    /// Merge `rows` in immediately (Table, Scratch) or defer them to the next
    /// tick boundary (Table's deferred variants); the caller distinguishes
    /// by calling the specific method on the concrete type rather than
    /// through this trait, which only guarantees the unconditional form.
    fn merge(&mut self, rows: Vec<Tuple>);
}
