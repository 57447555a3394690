use super::schema::{collection_table_name, lineage_table_name, RESERVED_LINEAGE_COLLECTION_NAME};
use super::{LineageClient, LineageError};
use crate::tuple_id::LogicalTime;
use crate::value::DataType;
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SqlSinkError {
    #[error("lineage sink rejected a batch: {0}")]
    Rejected(String),
}

/// The narrow capability `BatchingSqlLineageClient` needs from a concrete
/// database connection: execute a batch of already-built SQL statements.
/// Kept deliberately thin and driver-agnostic so this crate never depends
/// on a concrete SQL client crate (§9 design notes: the lineage store is
/// specified only as an external interface).
pub trait LineageSink {
    fn execute_batch(&mut self, statements: &[String]) -> Result<(), SqlSinkError>;
}

fn sql_quote(s: &str) -> String {
    format!("'{}'", s.replace('\'', "''"))
}

fn data_type_to_sql(t: DataType) -> &'static str {
    match t {
        DataType::Bool => "BOOLEAN",
        DataType::Int32 => "INTEGER",
        DataType::Int64 => "BIGINT",
        DataType::Float => "DOUBLE PRECISION",
        DataType::String => "TEXT",
        DataType::Bytes => "BYTEA",
    }
}

/// A `LineageClient` that turns every call into a SQL statement and batches
/// them up, flushing to a caller-supplied [`LineageSink`] once `batch_size`
/// statements have accumulated (or on an explicit [`Self::flush`]).
pub struct BatchingSqlLineageClient<S: LineageSink> {
    node_id: String,
    sink: S,
    batch_size: usize,
    pending: Vec<String>,
    known_collections: HashSet<String>,
}

impl<S: LineageSink> BatchingSqlLineageClient<S> {
    pub fn new(node_id: impl Into<String>, sink: S, batch_size: usize) -> Self {
        BatchingSqlLineageClient {
            node_id: node_id.into(),
            sink,
            batch_size: batch_size.max(1),
            pending: Vec::new(),
            known_collections: HashSet::new(),
        }
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    fn push(&mut self, statement: String) -> Result<(), LineageError> {
        self.pending.push(statement);
        if self.pending.len() >= self.batch_size {
            self.flush()?;
        }
        Ok(())
    }

    /// Hand everything queued so far to the sink, regardless of batch size.
    pub fn flush(&mut self) -> Result<(), LineageError> {
        if self.pending.is_empty() {
            return Ok(());
        }
        self.sink.execute_batch(&self.pending)?;
        self.pending.clear();
        Ok(())
    }
}

impl<S: LineageSink> LineageClient for BatchingSqlLineageClient<S> {
    fn init(&mut self) -> Result<(), LineageError> {
        let statements = vec![
            format!(
                "CREATE TABLE IF NOT EXISTS {} (id TEXT PRIMARY KEY, address TEXT NOT NULL)",
                super::schema::NODES_TABLE
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {} (name TEXT PRIMARY KEY, collection_type TEXT NOT NULL, column_types TEXT NOT NULL)",
                super::schema::COLLECTIONS_TABLE
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {} (rule_number BIGINT PRIMARY KEY, is_bootstrap BOOLEAN NOT NULL, rule_text TEXT NOT NULL)",
                super::schema::RULES_TABLE
            ),
            format!(
                "CREATE TABLE IF NOT EXISTS {} (hash BIGINT, logical_time BIGINT, dep_node_id TEXT, dep_time BIGINT, physical_time TIMESTAMPTZ)",
                lineage_table_name(&self.node_id)
            ),
        ];
        for s in statements {
            self.push(s)?;
        }
        self.flush()
    }

    fn add_collection(
        &mut self,
        name: &str,
        collection_type: &str,
        column_names: &[String],
        column_types: Vec<DataType>,
    ) -> Result<(), LineageError> {
        if name == RESERVED_LINEAGE_COLLECTION_NAME {
            return Err(LineageError::ReservedCollectionName(name.to_string()));
        }
        let columns_sql: Vec<String> = column_names
            .iter()
            .zip(column_types.iter())
            .map(|(name, t)| format!("{name} {}", data_type_to_sql(*t)))
            .collect();
        let table = collection_table_name(&self.node_id, name);
        self.push(format!(
            "CREATE TABLE IF NOT EXISTS {table} (hash BIGINT, logical_time BIGINT, {})",
            columns_sql.join(", ")
        ))?;
        self.push(format!(
            "INSERT INTO {} (name, collection_type, column_types) VALUES ({}, {}, {})",
            super::schema::COLLECTIONS_TABLE,
            sql_quote(name),
            sql_quote(collection_type),
            sql_quote(&format!("{column_types:?}"))
        ))?;
        self.known_collections.insert(name.to_string());
        Ok(())
    }

    fn add_rule(&mut self, rule_number: i64, is_bootstrap: bool, rule_text: &str) -> Result<(), LineageError> {
        self.push(format!(
            "INSERT INTO {} (rule_number, is_bootstrap, rule_text) VALUES ({rule_number}, {is_bootstrap}, {})",
            super::schema::RULES_TABLE,
            sql_quote(rule_text)
        ))
    }

    fn insert_tuple(
        &mut self,
        collection_name: &str,
        time_inserted: LogicalTime,
        hash: u64,
        physical_time: DateTime<Utc>,
    ) -> Result<(), LineageError> {
        if !self.known_collections.contains(collection_name) {
            return Err(LineageError::UnknownCollection(collection_name.to_string()));
        }
        let table = collection_table_name(&self.node_id, collection_name);
        self.push(format!(
            "INSERT INTO {table} (hash, logical_time) VALUES ({hash}, {time_inserted}) -- {physical_time}"
        ))
    }

    fn delete_tuple(
        &mut self,
        collection_name: &str,
        time_deleted: LogicalTime,
        hash: u64,
        physical_time: DateTime<Utc>,
    ) -> Result<(), LineageError> {
        if !self.known_collections.contains(collection_name) {
            return Err(LineageError::UnknownCollection(collection_name.to_string()));
        }
        let table = collection_table_name(&self.node_id, collection_name);
        self.push(format!(
            "DELETE FROM {table} WHERE hash = {hash} AND logical_time = {time_deleted} -- {physical_time}"
        ))
    }

    fn add_derived_lineage(
        &mut self,
        dep_collection_name: &str,
        dep_tuple_hash: u64,
        rule_number: i64,
        inserted: bool,
        collection_name: &str,
        tuple_hash: u64,
        time: LogicalTime,
    ) -> Result<(), LineageError> {
        let table = lineage_table_name(&self.node_id);
        self.push(format!(
            "INSERT INTO {table} (hash, logical_time, dep_node_id, dep_time) VALUES ({tuple_hash}, {time}, NULL, NULL) -- derived from {dep_collection_name}:{dep_tuple_hash} by rule {rule_number} (inserted={inserted}) into {collection_name}"
        ))
    }

    fn add_networked_lineage(
        &mut self,
        dep_node_id: &str,
        dep_time: LogicalTime,
        collection_name: &str,
        tuple_hash: u64,
        time: LogicalTime,
        physical_time: DateTime<Utc>,
    ) -> Result<(), LineageError> {
        let table = lineage_table_name(&self.node_id);
        self.push(format!(
            "INSERT INTO {table} (hash, logical_time, dep_node_id, dep_time, physical_time) VALUES ({tuple_hash}, {time}, {}, {dep_time}, '{physical_time}') -- into {collection_name}",
            sql_quote(dep_node_id)
        ))
    }
}
