use crate::value::{Tuple, Value};
use std::collections::BTreeSet;

/// An aggregate function folded over the rows of one `GroupBy` group.
/// `update` sees every row in the group exactly once; `finalize` is called
/// after the last row to produce the aggregate's output column(s).
pub trait Agg {
    fn update(&mut self, tuple: &Tuple);
    fn finalize(&self) -> Value;
}

/// Adds two numeric values, preserving their shared type (`Int32 + Int32 =
/// Int32`, etc). Mixed-type pairs fall back to float addition; `GroupBy`
/// columns are expected to share a declared type, so this only bites misuse.
pub(crate) fn add_values(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Int32(x), Value::Int32(y)) => Value::Int32(x + y),
        (Value::Int64(x), Value::Int64(y)) => Value::Int64(x + y),
        (Value::Float(x), Value::Float(y)) => Value::Float(x + y),
        (a, b) => Value::Float(a.as_f64().unwrap_or(0.0) + b.as_f64().unwrap_or(0.0)),
    }
}

/// Sums the numeric values found at `indices` of every row in the group,
/// preserving the column's type rather than always widening to float.
/// Summing a zero-length index list, or a group that never updates, yields
/// `Int32(0)`, matching the bare `Sum` relational operator's behavior on an
/// empty scan — see [`super::Sum`] for that standalone operator.
pub struct Sum {
    indices: Vec<usize>,
    total: Option<Value>,
}

impl Sum {
    pub fn new(indices: Vec<usize>) -> Self {
        Sum {
            indices,
            total: None,
        }
    }
}

impl Agg for Sum {
    fn update(&mut self, tuple: &Tuple) {
        for &i in &self.indices {
            if let Some(v) = tuple.get(i) {
                self.total = Some(match self.total.take() {
                    Some(acc) => add_values(acc, v.clone()),
                    None => v.clone(),
                });
            }
        }
    }

    fn finalize(&self) -> Value {
        self.total.clone().unwrap_or(Value::Int32(0))
    }
}

/// Counts the rows in the group, ignoring column values entirely.
pub struct Count {
    count: i64,
}

impl Count {
    pub fn new() -> Self {
        Count { count: 0 }
    }
}

impl Default for Count {
    fn default() -> Self {
        Count::new()
    }
}

impl Agg for Count {
    fn update(&mut self, _tuple: &Tuple) {
        self.count += 1;
    }

    fn finalize(&self) -> Value {
        Value::Int64(self.count)
    }
}

/// Arithmetic mean of the numeric values at `indices`; `0` for a group that
/// never calls `update` (cannot happen for `GroupBy`, which never manufactures
/// empty groups, but keeps `finalize` total).
pub struct Avg {
    indices: Vec<usize>,
    total: f64,
    count: i64,
}

impl Avg {
    pub fn new(indices: Vec<usize>) -> Self {
        Avg {
            indices,
            total: 0.0,
            count: 0,
        }
    }
}

impl Agg for Avg {
    fn update(&mut self, tuple: &Tuple) {
        for &i in &self.indices {
            if let Some(v) = tuple.get(i).and_then(Value::as_f64) {
                self.total += v;
                self.count += 1;
            }
        }
    }

    fn finalize(&self) -> Value {
        if self.count == 0 {
            Value::Float(0.0)
        } else {
            Value::Float(self.total / self.count as f64)
        }
    }
}

/// Collects the distinct values seen at `indices` across the group into a
/// canonical, sorted set representation (rendered as a single string column
/// since a row's columns are fixed-arity scalars).
pub struct Union {
    indices: Vec<usize>,
    seen: BTreeSet<Value>,
}

impl Union {
    pub fn new(indices: Vec<usize>) -> Self {
        Union {
            indices,
            seen: BTreeSet::new(),
        }
    }
}

impl Agg for Union {
    fn update(&mut self, tuple: &Tuple) {
        for &i in &self.indices {
            if let Some(v) = tuple.get(i) {
                self.seen.insert(v.clone());
            }
        }
    }

    fn finalize(&self) -> Value {
        let rendered: Vec<String> = self.seen.iter().map(ToString::to_string).collect();
        Value::String(format!("{{{}}}", rendered.join(",")))
    }
}
