//! Lineage tracking (§4.5): recording which stored facts, network messages,
//! and rule firings produced each tuple, so the history of a fact can be
//! reconstructed after the fact.

mod mock;
mod schema;
mod sql;

pub use mock::MockLineageClient;
pub use schema::{collection_table_name, lineage_table_name, RESERVED_LINEAGE_COLLECTION_NAME};
pub use sql::{BatchingSqlLineageClient, LineageSink, SqlSinkError};

use crate::tuple_id::LogicalTime;
use crate::value::DataType;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum LineageError {
    #[error("collection name '{0}' is reserved for lineage bookkeeping")]
    ReservedCollectionName(String),
    #[error("collection '{0}' was never registered with add_collection")]
    UnknownCollection(String),
    #[error(transparent)]
    Sink(#[from] SqlSinkError),
}

/// The capability a `Node` needs from its lineage backend: record facts,
/// rules, and the dependency edges between them as they happen. See
/// [`MockLineageClient`] for an in-memory test double and
/// [`BatchingSqlLineageClient`] for the production batching implementation.
pub trait LineageClient {
    /// Prepare the backend's storage (create tables, etc.) before any other
    /// call is made.
    fn init(&mut self) -> Result<(), LineageError>;

    /// Declare a collection's name, kind (`"Table"`, `"Scratch"`, ...),
    /// column names, and column types. `"lineage"` is reserved and rejected
    /// (§4.5).
    fn add_collection(
        &mut self,
        name: &str,
        collection_type: &str,
        column_names: &[String],
        column_types: Vec<DataType>,
    ) -> Result<(), LineageError>;

    /// Record a rule's source text. `is_bootstrap` marks a rule that only
    /// ever fires once, at startup.
    fn add_rule(&mut self, rule_number: i64, is_bootstrap: bool, rule_text: &str) -> Result<(), LineageError>;

    fn insert_tuple(
        &mut self,
        collection_name: &str,
        time_inserted: LogicalTime,
        hash: u64,
        physical_time: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), LineageError>;

    fn delete_tuple(
        &mut self,
        collection_name: &str,
        time_deleted: LogicalTime,
        hash: u64,
        physical_time: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), LineageError>;

    /// Record that `tuple_hash` in `collection_name` at `time` was derived
    /// by `rule_number` from `dep_tuple_hash` in `dep_collection_name`,
    /// inserted (`true`) or deleted (`false`) as indicated by `inserted`.
    #[allow(clippy::too_many_arguments)]
    fn add_derived_lineage(
        &mut self,
        dep_collection_name: &str,
        dep_tuple_hash: u64,
        rule_number: i64,
        inserted: bool,
        collection_name: &str,
        tuple_hash: u64,
        time: LogicalTime,
    ) -> Result<(), LineageError>;

    /// Record that a fact in `collection_name` depends on a fact that
    /// arrived over the network from `dep_node_id` at `dep_time` (that
    /// node's logical time). The *receiving* node's wall clock is always
    /// the canonical `physical_time` for this edge (§9 resolved open
    /// question): the sender's physical time travels only as `dep_time`,
    /// never as an independent timestamp.
    fn add_networked_lineage(
        &mut self,
        dep_node_id: &str,
        dep_time: LogicalTime,
        collection_name: &str,
        tuple_hash: u64,
        time: LogicalTime,
        physical_time: chrono::DateTime<chrono::Utc>,
    ) -> Result<(), LineageError>;
}
