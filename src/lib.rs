//! # Fluent
//!
//! A framework for building distributed dataflow programs out of
//! lineage-tracked collections, join-semilattices, and a small relational
//! algebra.
//!
//! ## Shape of a program
//!
//! A program is a [`node::Node`], assembled with [`node::FluentBuilder`]:
//! a set of named [`collections`] (tables, scratches, channels, stdin,
//! stdout, periodics), a list of [`rule::Rule`]s that compute new rows from
//! the current collection snapshots, and a [`lineage::LineageClient`] that
//! records which facts and rule firings produced which other facts.
//!
//! `Node::tick()` evaluates every rule once, applies its output, then
//! advances every collection to the next logical time. `Node::run()` drives
//! `tick()` forever, suspending only to wait for the next external event —
//! a periodic timer, an inbound channel connection, or a line of stdin.
//!
//! ```text
//! FluentBuilder
//!     ├── collections: Table / Scratch / Channel / Stdin / Stdout / Periodic
//!     ├── rules: Vec<Rule>                  (§4.4 relational algebra output)
//!     └── lineage_client: dyn LineageClient
//!           ↓ .build()
//! Node::run()
//!     loop { await next event; tick(); flush outbound channels }
//! ```

pub mod collections;
pub mod config;
pub mod error;
pub mod lattice;
pub mod lineage;
pub mod node;
pub mod pickler;
pub mod ra;
pub mod rule;
pub mod tuple_id;
pub mod value;

pub use config::Config;
pub use error::{ConfigError, FluentError, FluentResult};
pub use node::{FluentBuilder, Node};
pub use rule::{Rule, RuleOp};
pub use tuple_id::{CollectionTupleIds, LocalTupleId, LogicalTime};
pub use value::{DataType, Tuple, TupleSchema, Value};

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lineage::MockLineageClient;
    use crate::ra::LineagedRow;

    #[test]
    fn builds_a_node_with_a_table_and_rule() {
        let mut builder = FluentBuilder::new("n1", "127.0.0.1:0", Box::new(MockLineageClient::new()));
        builder.table("seen", TupleSchema::new(vec![("x".to_string(), DataType::Int32)]));
        let rule = Rule::new(0, "seen", RuleOp::ImmediateMerge, false, "seen <= [1]", || {
            vec![LineagedRow::without_provenance(Tuple::new(vec![Value::Int32(1)]))]
        });
        builder.rule(rule);
        let mut node = builder.build().unwrap();
        node.tick().unwrap();
        assert_eq!(node.table("seen").unwrap().len(), 1);
    }
}
