use super::{Collection, CollectionKind, Mergeable};
use crate::tuple_id::LogicalTime;
use crate::value::Tuple;

/// A transient collection: rows exist only for the tick in which they were
/// merged in and are discarded by the next `tick()`.
#[derive(Default)]
pub struct Scratch {
    rows: Vec<Tuple>,
    current_time: LogicalTime,
}

impl Scratch {
    pub fn new() -> Self {
        Scratch::default()
    }
}

impl Mergeable for Scratch {
    fn merge(&mut self, mut rows: Vec<Tuple>) {
        self.rows.append(&mut rows);
    }
}

impl Collection for Scratch {
    fn kind(&self) -> CollectionKind {
        CollectionKind::Scratch
    }

    fn rows_with_times(&self) -> Box<dyn Iterator<Item = (&Tuple, LogicalTime)> + '_> {
        let t = self.current_time;
        Box::new(self.rows.iter().map(move |tuple| (tuple, t)))
    }

    fn tick(&mut self, now: LogicalTime) {
        self.rows.clear();
        self.current_time = now;
    }
}
