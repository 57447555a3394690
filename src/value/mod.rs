//! # Value Type System
//!
//! Scalar values and fixed-arity tuples, plus the deterministic hashing that
//! backs tuple identity (`hash(t)` in the design docs). Every hash in this
//! module is computed with a fixed-seed FNV-1a mixer rather than
//! [`std::collections::hash_map::RandomState`], so the same tuple hashes to
//! the same `u64` across processes and across runs — a requirement of the
//! lineage store, which uses the hash as part of a tuple's primary key.

mod hash;

pub use hash::{hash_bytes, hash_tuple, hash_value, FNV_OFFSET_BASIS, FNV_PRIME};

use std::cmp::Ordering;
use std::fmt;

/// A single scalar value flowing through collections and the operator tree.
///
/// `Float` deliberately does not implement a total `Eq`/`Hash` derive; see
/// [`Value::eq`] and [`Value::data_type`] for the bit-pattern semantics the
/// specification calls for (NaN keys are explicitly out of contract).
#[derive(Debug, Clone)]
pub enum Value {
    Bool(bool),
    Int32(i32),
    Int64(i64),
    Float(f64),
    String(String),
    Bytes(Vec<u8>),
}

/// The type tag of a [`Value`], used by schema validation and the lineage
/// client's `add_collection` call (§4.5 / §6).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataType {
    Bool,
    Int32,
    Int64,
    Float,
    String,
    Bytes,
}

impl Value {
    pub fn data_type(&self) -> DataType {
        match self {
            Value::Bool(_) => DataType::Bool,
            Value::Int32(_) => DataType::Int32,
            Value::Int64(_) => DataType::Int64,
            Value::Float(_) => DataType::Float,
            Value::String(_) => DataType::String,
            Value::Bytes(_) => DataType::Bytes,
        }
    }

    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int32(i) => Some(f64::from(*i)),
            Value::Int64(i) => Some(*i as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    pub fn string(s: impl Into<String>) -> Value {
        Value::String(s.into())
    }
}

// Equality is defined bit-for-bit on floats (per §4.1: "floats are hashed by
// bit pattern; NaN tuples may compare unequal even with equal bit patterns").
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int32(a), Value::Int32(b)) => a == b,
            (Value::Int64(a), Value::Int64(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a.to_bits() == b.to_bits(),
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bytes(a), Value::Bytes(b)) => a == b,
            _ => false,
        }
    }
}
impl Eq for Value {}

impl PartialOrd for Value {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Value {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Value::Bool(a), Value::Bool(b)) => a.cmp(b),
            (Value::Int32(a), Value::Int32(b)) => a.cmp(b),
            (Value::Int64(a), Value::Int64(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.to_bits().cmp(&b.to_bits()),
            (Value::String(a), Value::String(b)) => a.cmp(b),
            (Value::Bytes(a), Value::Bytes(b)) => a.cmp(b),
            // Cross-type comparisons only arise from misuse (comparing
            // columns of different declared types); order by type tag so
            // that collection iteration stays deterministic regardless.
            (a, b) => (a.data_type() as u8).cmp(&(b.data_type() as u8)),
        }
    }
}

impl std::hash::Hash for Value {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        state.write_u64(hash_value(self));
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int32(i) => write!(f, "{i}"),
            Value::Int64(i) => write!(f, "{i}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Bytes(b) => write!(f, "{b:?}"),
        }
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}
impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int32(v)
    }
}
impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Int64(v)
    }
}
impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}
impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}
impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

/// A fixed-arity heterogeneous ordered record (§3 "Tuple").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Tuple(Vec<Value>);

impl Tuple {
    pub fn new(values: Vec<Value>) -> Self {
        Tuple(values)
    }

    pub fn arity(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, i: usize) -> Option<&Value> {
        self.0.get(i)
    }

    pub fn values(&self) -> &[Value] {
        &self.0
    }

    pub fn into_values(self) -> Vec<Value> {
        self.0
    }

    /// Build a new tuple by projecting (and possibly duplicating) columns.
    /// Out-of-range indices are the caller's responsibility to reject at
    /// setup time (§4.4 Project); this is the mechanical projection itself.
    pub fn project(&self, indices: &[usize]) -> Option<Tuple> {
        let mut out = Vec::with_capacity(indices.len());
        for &i in indices {
            out.push(self.0.get(i)?.clone());
        }
        Some(Tuple(out))
    }

    /// Concatenate two tuples column-wise (used by Cross and HashJoin).
    pub fn concat(&self, other: &Tuple) -> Tuple {
        let mut out = Vec::with_capacity(self.arity() + other.arity());
        out.extend(self.0.iter().cloned());
        out.extend(other.0.iter().cloned());
        Tuple(out)
    }

    /// The deterministic, process-stable hash of this tuple's value (§4.1).
    pub fn hash(&self) -> u64 {
        hash_tuple(&self.0)
    }
}

impl fmt::Display for Tuple {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "(")?;
        for (i, v) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{v}")?;
        }
        write!(f, ")")
    }
}

impl FromIterator<Value> for Tuple {
    fn from_iter<T: IntoIterator<Item = Value>>(iter: T) -> Self {
        Tuple(iter.into_iter().collect())
    }
}

/// A named, typed column list describing a relation's shape.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TupleSchema {
    fields: Vec<(String, DataType)>,
}

impl TupleSchema {
    pub fn new(fields: Vec<(String, DataType)>) -> Self {
        TupleSchema { fields }
    }

    pub fn arity(&self) -> usize {
        self.fields.len()
    }

    pub fn field_names(&self) -> Vec<&str> {
        self.fields.iter().map(|(n, _)| n.as_str()).collect()
    }

    /// Owned column names, in declaration order, for handing to a lineage
    /// client's `add_collection` call.
    pub fn column_names(&self) -> Vec<String> {
        self.fields.iter().map(|(n, _)| n.clone()).collect()
    }

    /// Column types, in declaration order, for handing to a lineage client's
    /// `add_collection` call.
    pub fn column_types(&self) -> Vec<DataType> {
        self.fields.iter().map(|(_, t)| *t).collect()
    }

    pub fn field_type(&self, i: usize) -> Option<&DataType> {
        self.fields.get(i).map(|(_, t)| t)
    }

    pub fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|(n, _)| n == name)
    }

    pub fn validate(&self, tuple: &Tuple) -> Result<(), SchemaValidationError> {
        if tuple.arity() != self.arity() {
            return Err(SchemaValidationError::ArityMismatch {
                expected: self.arity(),
                got: tuple.arity(),
            });
        }
        for (i, (name, expected)) in self.fields.iter().enumerate() {
            let got = tuple.get(i).expect("arity already checked").data_type();
            if got != *expected {
                return Err(SchemaValidationError::TypeMismatch {
                    column: name.clone(),
                    index: i,
                    expected: *expected,
                    got,
                });
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, thiserror::Error)]
pub enum SchemaValidationError {
    #[error("arity mismatch: schema expects {expected} columns, tuple has {got}")]
    ArityMismatch { expected: usize, got: usize },
    #[error("column '{column}' (index {index}): expected {expected:?}, got {got:?}")]
    TypeMismatch {
        column: String,
        index: usize,
        expected: DataType,
        got: DataType,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_values_hash_equal() {
        let a = Value::Int64(42);
        let b = Value::Int64(42);
        assert_eq!(hash_value(&a), hash_value(&b));
    }

    #[test]
    fn float_hash_is_bit_pattern() {
        let a = Value::Float(0.1 + 0.2);
        let b = Value::Float(0.3);
        // Famously not bit-equal.
        assert_ne!(a, b);
    }

    #[test]
    fn tuple_hash_stable_across_instances() {
        let t1 = Tuple::new(vec![Value::Int32(1), Value::string("a")]);
        let t2 = Tuple::new(vec![Value::Int32(1), Value::string("a")]);
        assert_eq!(t1.hash(), t2.hash());
    }

    #[test]
    fn tuple_hash_order_sensitive() {
        let t1 = Tuple::new(vec![Value::Int32(1), Value::Int32(2)]);
        let t2 = Tuple::new(vec![Value::Int32(2), Value::Int32(1)]);
        assert_ne!(t1.hash(), t2.hash());
    }

    #[test]
    fn project_duplicates_and_selects_columns() {
        let t = Tuple::new(vec![Value::Int32(1), Value::Int32(2), Value::Int32(3)]);
        let projected = t.project(&[2, 0, 0]).unwrap();
        assert_eq!(
            projected,
            Tuple::new(vec![Value::Int32(3), Value::Int32(1), Value::Int32(1)])
        );
    }

    #[test]
    fn project_out_of_range_is_none() {
        let t = Tuple::new(vec![Value::Int32(1)]);
        assert!(t.project(&[5]).is_none());
    }

    #[test]
    fn schema_validate_arity_mismatch() {
        let schema = TupleSchema::new(vec![("x".into(), DataType::Int32)]);
        let tuple = Tuple::new(vec![Value::Int32(1), Value::Int32(2)]);
        let err = schema.validate(&tuple).unwrap_err();
        assert!(matches!(err, SchemaValidationError::ArityMismatch { expected: 1, got: 2 }));
    }
}
