use super::{Collection, CollectionKind};
use crate::tuple_id::LogicalTime;
use crate::value::{Tuple, Value};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

/// A timer collection. The node's event loop arms the timer for `period`;
/// when it fires, `Periodic` becomes visible for exactly one tick as a
/// single row `(id, timestamp)`, where `id` increases by one on every firing
/// and `timestamp` is the firing's wall-clock time in milliseconds since the
/// Unix epoch.
pub struct Periodic {
    period: Duration,
    next_id: i64,
    fired: Option<Tuple>,
    current_time: LogicalTime,
}

impl Periodic {
    pub fn new(period: Duration) -> Self {
        Periodic {
            period,
            next_id: 0,
            fired: None,
            current_time: 0,
        }
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Record a firing. Called by the node's event loop when the armed
    /// timer elapses; the id handed to rules is monotonically increasing
    /// and never reused.
    pub fn fire(&mut self) {
        let id = self.next_id;
        self.next_id += 1;
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as i64)
            .unwrap_or(0);
        self.fired = Some(Tuple::new(vec![Value::Int64(id), Value::Int64(timestamp)]));
    }

    pub fn is_armed(&self) -> bool {
        self.fired.is_none()
    }
}

impl Collection for Periodic {
    fn kind(&self) -> CollectionKind {
        CollectionKind::Periodic
    }

    fn rows_with_times(&self) -> Box<dyn Iterator<Item = (&Tuple, LogicalTime)> + '_> {
        let t = self.current_time;
        Box::new(self.fired.iter().map(move |tuple| (tuple, t)))
    }

    fn tick(&mut self, now: LogicalTime) {
        self.fired = None;
        self.current_time = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn starts_armed_with_no_rows() {
        let p = Periodic::new(Duration::from_secs(1));
        assert!(p.is_armed());
        assert_eq!(p.rows().count(), 0);
    }

    #[test]
    fn fire_produces_monotonic_id() {
        let mut p = Periodic::new(Duration::from_millis(10));
        p.fire();
        assert_eq!(p.rows().next().unwrap().get(0), Some(&Value::Int64(0)));
        Collection::tick(&mut p, 1);
        p.fire();
        assert_eq!(p.rows().next().unwrap().get(0), Some(&Value::Int64(1)));
    }

    #[test]
    fn fire_attaches_a_wall_clock_timestamp() {
        let mut p = Periodic::new(Duration::from_millis(10));
        p.fire();
        let row = p.rows().next().unwrap();
        assert_eq!(row.arity(), 2);
        assert!(matches!(row.get(1), Some(Value::Int64(_))));
    }

    #[test]
    fn tick_disarms_until_next_fire() {
        let mut p = Periodic::new(Duration::from_millis(10));
        p.fire();
        Collection::tick(&mut p, 1);
        assert!(p.is_armed());
        assert_eq!(p.rows().count(), 0);
    }
}
