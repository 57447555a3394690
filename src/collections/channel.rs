use super::{Collection, CollectionKind, Mergeable};
use crate::pickler::{BincodePickler, Pickler};
use crate::tuple_id::LogicalTime;
use crate::value::{Tuple, Value};
use tracing::warn;

/// An outbound payload queued for delivery by the node's transport loop:
/// the destination address (the channel tuple's first column) paired with
/// the pickled remainder of the tuple.
#[derive(Debug, Clone, PartialEq)]
pub struct OutboundMessage {
    pub address: String,
    pub payload: Vec<u8>,
}

/// A wire collection. Merging a tuple whose first column is a peer address
/// queues a pickled copy of the remaining columns for that peer; rows
/// visible to local rules are whatever has arrived from peers since the
/// last tick, a transient set exactly like [`super::Scratch`].
#[derive(Default)]
pub struct Channel {
    inbox: Vec<Tuple>,
    outbox: Vec<OutboundMessage>,
    current_time: LogicalTime,
}

#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("channel tuple has no address column")]
    MissingAddress,
    #[error("channel address column must be a string, got {0:?}")]
    NonStringAddress(crate::value::DataType),
    #[error(transparent)]
    Pickle(#[from] crate::pickler::PickleError),
}

impl Channel {
    pub fn new() -> Self {
        Channel::default()
    }

    /// Queue `tuple` for delivery. `tuple`'s first column must be the
    /// destination address; the rest is pickled as the message body.
    pub fn send(&mut self, tuple: &Tuple) -> Result<(), ChannelError> {
        let address = match tuple.get(0) {
            Some(Value::String(s)) => s.clone(),
            Some(other) => return Err(ChannelError::NonStringAddress(other.data_type())),
            None => return Err(ChannelError::MissingAddress),
        };
        let body = Tuple::new(tuple.values()[1..].to_vec());
        let payload = BincodePickler::dump(&body)?;
        self.outbox.push(OutboundMessage { address, payload });
        Ok(())
    }

    /// Called by the node's transport loop when a peer's payload arrives;
    /// the decoded body becomes visible to local rules this tick.
    pub fn receive(&mut self, body: Tuple) {
        self.inbox.push(body);
    }

    /// Drain and return everything queued for delivery since the last call.
    pub fn take_outbox(&mut self) -> Vec<OutboundMessage> {
        std::mem::take(&mut self.outbox)
    }
}

impl Mergeable for Channel {
    fn merge(&mut self, rows: Vec<Tuple>) {
        for tuple in &rows {
            if let Err(e) = self.send(tuple) {
                warn!(error = %e, "channel merge failed, tuple dropped at sender");
            }
        }
    }
}

impl Collection for Channel {
    fn kind(&self) -> CollectionKind {
        CollectionKind::Channel
    }

    fn rows_with_times(&self) -> Box<dyn Iterator<Item = (&Tuple, LogicalTime)> + '_> {
        let t = self.current_time;
        Box::new(self.inbox.iter().map(move |tuple| (tuple, t)))
    }

    fn tick(&mut self, now: LogicalTime) {
        self.inbox.clear();
        self.current_time = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn send_queues_pickled_body_by_address() {
        let mut c = Channel::new();
        let tuple = Tuple::new(vec![Value::string("10.0.0.1:9000"), Value::Int32(42)]);
        c.send(&tuple).unwrap();
        let outbox = c.take_outbox();
        assert_eq!(outbox.len(), 1);
        assert_eq!(outbox[0].address, "10.0.0.1:9000");
        let body = BincodePickler::load(&outbox[0].payload).unwrap();
        assert_eq!(body, Tuple::new(vec![Value::Int32(42)]));
    }

    #[test]
    fn send_rejects_non_string_address() {
        let mut c = Channel::new();
        let tuple = Tuple::new(vec![Value::Int32(1), Value::Int32(2)]);
        assert!(matches!(c.send(&tuple), Err(ChannelError::NonStringAddress(_))));
    }

    #[test]
    fn received_rows_visible_until_tick() {
        let mut c = Channel::new();
        c.receive(Tuple::new(vec![Value::Int32(1)]));
        assert_eq!(c.rows().count(), 1);
        Collection::tick(&mut c, 1);
        assert_eq!(c.rows().count(), 0);
    }
}
