use super::{Collection, CollectionKind};
use crate::tuple_id::LogicalTime;
use crate::value::{Tuple, Value};

/// A line-delimited external source. Each line read from the process's
/// standard input since the last tick becomes a single-column string row,
/// visible for exactly one tick like [`super::Scratch`].
#[derive(Default)]
pub struct Stdin {
    lines: Vec<Tuple>,
    current_time: LogicalTime,
}

impl Stdin {
    pub fn new() -> Self {
        Stdin::default()
    }

    /// Record a line read by the node's event loop.
    pub fn push_line(&mut self, line: String) {
        self.lines.push(Tuple::new(vec![Value::String(line)]));
    }
}

impl Collection for Stdin {
    fn kind(&self) -> CollectionKind {
        CollectionKind::Stdin
    }

    fn rows_with_times(&self) -> Box<dyn Iterator<Item = (&Tuple, LogicalTime)> + '_> {
        let t = self.current_time;
        Box::new(self.lines.iter().map(move |tuple| (tuple, t)))
    }

    fn tick(&mut self, now: LogicalTime) {
        self.lines.clear();
        self.current_time = now;
    }
}
