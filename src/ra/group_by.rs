use super::aggregates::Agg;
use super::{LineagedRow, PhysicalOp};
use crate::value::{Tuple, Value};
use std::collections::HashMap;

struct Group {
    key: Tuple,
    aggs: Vec<Box<dyn Agg>>,
    provenance: Vec<crate::tuple_id::LocalTupleId>,
}

/// Groups rows by the tuple projected from `key_indices`, folding each of
/// `agg_factories` over every row in a group. A group is created lazily the
/// first time a row maps to it, so groups with no matching input rows are
/// never emitted — there is no "zero row per missing group" behavior, unlike
/// a `GROUP BY` with `COUNT` in SQL. An empty input with an empty key list
/// still produces zero rows, since there are no input rows to seed even one
/// group.
pub struct GroupBy {
    key_indices: Vec<usize>,
    agg_factories: Vec<Box<dyn Fn() -> Box<dyn Agg>>>,
}

impl GroupBy {
    pub fn new(key_indices: Vec<usize>, agg_factories: Vec<Box<dyn Fn() -> Box<dyn Agg>>>) -> Self {
        GroupBy {
            key_indices,
            agg_factories,
        }
    }

    pub fn apply<'a>(self, input: PhysicalOp<'a>) -> PhysicalOp<'a> {
        let GroupBy {
            key_indices,
            agg_factories,
        } = self;

        let mut groups: HashMap<Tuple, Group> = HashMap::new();
        let mut order: Vec<Tuple> = Vec::new();

        for row in input {
            let key = row
                .tuple
                .project(&key_indices)
                .expect("key indices validated against the input schema by the caller");
            let group = groups.entry(key.clone()).or_insert_with(|| {
                order.push(key.clone());
                Group {
                    key: key.clone(),
                    aggs: agg_factories.iter().map(|f| f()).collect(),
                    provenance: Vec::new(),
                }
            });
            for agg in &mut group.aggs {
                agg.update(&row.tuple);
            }
            group.provenance.extend(row.provenance);
        }

        let rows: Vec<LineagedRow> = order
            .into_iter()
            .map(|key| {
                let group = groups.remove(&key).expect("key was just inserted above");
                let mut values: Vec<Value> = group.key.into_values();
                values.extend(group.aggs.iter().map(|a| a.finalize()));
                LineagedRow::new(Tuple::new(values), group.provenance)
            })
            .collect();

        Box::new(rows.into_iter())
    }
}
