use super::{Collection, CollectionKind};
use crate::tuple_id::LogicalTime;
use crate::value::Tuple;
use std::io::Write;

/// A line-delimited external sink. `merge` writes and flushes immediately;
/// `deferred_merge` buffers rows and only writes (with a single flush) on
/// the next `tick()` — useful for rules that want to batch output without
/// reordering relative to other immediate writers sharing the same sink.
pub struct Stdout<W: Write> {
    sink: W,
    deferred: Vec<Tuple>,
}

impl<W: Write> Stdout<W> {
    pub fn new(sink: W) -> Self {
        Stdout {
            sink,
            deferred: Vec::new(),
        }
    }

    /// Write `tuple` as one line and flush immediately.
    pub fn merge(&mut self, tuple: &Tuple) -> std::io::Result<()> {
        writeln!(self.sink, "{tuple}")?;
        self.sink.flush()
    }

    /// Queue `tuple` to be written at the next tick boundary.
    pub fn deferred_merge(&mut self, tuple: Tuple) {
        self.deferred.push(tuple);
    }
}

impl<W: Write> Collection for Stdout<W> {
    fn kind(&self) -> CollectionKind {
        CollectionKind::Stdout
    }

    fn rows_with_times(&self) -> Box<dyn Iterator<Item = (&Tuple, LogicalTime)> + '_> {
        // An output-only collection has nothing for rules to scan.
        Box::new(std::iter::empty())
    }

    fn tick(&mut self, _now: LogicalTime) {
        if self.deferred.is_empty() {
            return;
        }
        for tuple in self.deferred.drain(..) {
            let _ = writeln!(self.sink, "{tuple}");
        }
        let _ = self.sink.flush();
    }
}
