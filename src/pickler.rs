//! Wire serialization for values crossing a channel boundary.
//!
//! `bincode` gives us a compact, deterministic binary encoding; the
//! [`Pickler`] trait exists so the rest of the crate depends on the
//! operation (`dump`/`load`) rather than on `bincode` directly, matching the
//! original engine's separation between the wire format and the collections
//! that use it.

use crate::value::{Tuple, Value};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PickleError {
    #[error("failed to encode value: {0}")]
    Encode(String),
    #[error("failed to decode value: {0}")]
    Decode(String),
}

/// A value's wire representation: serde-friendly so `bincode` can encode it
/// without us hand-rolling a byte layout for every `Value` variant.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
enum WireValue {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
}

impl From<&Value> for WireValue {
    fn from(v: &Value) -> Self {
        match v {
            Value::Bool(b) => WireValue::Bool(*b),
            Value::Int32(i) => WireValue::Int32(*i),
            Value::Int64(i) => WireValue::Int64(*i),
            Value::Float(f) => WireValue::Float(*f),
            Value::String(s) => WireValue::String(s.clone()),
            Value::Bytes(b) => WireValue::Bytes(b.clone()),
        }
    }
}

impl From<WireValue> for Value {
    fn from(v: WireValue) -> Self {
        match v {
            WireValue::Bool(b) => Value::Bool(b),
            WireValue::Int32(i) => Value::Int32(i),
            WireValue::Int64(i) => Value::Int64(i),
            WireValue::Float(f) => Value::Float(f),
            WireValue::String(s) => Value::String(s),
            WireValue::Bytes(b) => Value::Bytes(b),
        }
    }
}

pub trait Pickler {
    fn dump(tuple: &Tuple) -> Result<Vec<u8>, PickleError>;
    fn load(bytes: &[u8]) -> Result<Tuple, PickleError>;
}

/// The bincode-backed `Pickler` used by [`crate::collections::Channel`] and
/// [`crate::collections::Stdin`]/[`crate::collections::Stdout`].
pub struct BincodePickler;

impl Pickler for BincodePickler {
    fn dump(tuple: &Tuple) -> Result<Vec<u8>, PickleError> {
        let wire: Vec<WireValue> = tuple.values().iter().map(WireValue::from).collect();
        bincode::serialize(&wire).map_err(|e| PickleError::Encode(e.to_string()))
    }

    fn load(bytes: &[u8]) -> Result<Tuple, PickleError> {
        let wire: Vec<WireValue> =
            bincode::deserialize(bytes).map_err(|e| PickleError::Decode(e.to_string()))?;
        Ok(Tuple::new(wire.into_iter().map(Value::from).collect()))
    }
}

impl BincodePickler {
    /// Pickle a whole batch of tuples into one payload, used by the `Batch`
    /// relational operator to fold several rows into a single wire row.
    pub fn dump_batch(tuples: &[Tuple]) -> Result<Vec<u8>, PickleError> {
        let wire: Vec<Vec<WireValue>> = tuples
            .iter()
            .map(|t| t.values().iter().map(WireValue::from).collect())
            .collect();
        bincode::serialize(&wire).map_err(|e| PickleError::Encode(e.to_string()))
    }

    pub fn load_batch(bytes: &[u8]) -> Result<Vec<Tuple>, PickleError> {
        let wire: Vec<Vec<WireValue>> =
            bincode::deserialize(bytes).map_err(|e| PickleError::Decode(e.to_string()))?;
        Ok(wire
            .into_iter()
            .map(|cols| Tuple::new(cols.into_iter().map(Value::from).collect()))
            .collect())
    }
}
