use super::{LineageClient, LineageError, RESERVED_LINEAGE_COLLECTION_NAME};
use crate::tuple_id::LogicalTime;
use crate::value::DataType;
use chrono::{DateTime, Utc};

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedCollection {
    pub name: String,
    pub collection_type: String,
    pub column_names: Vec<String>,
    pub column_types: Vec<DataType>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedRule {
    pub rule_number: i64,
    pub is_bootstrap: bool,
    pub rule_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedInsert {
    pub collection_name: String,
    pub time_inserted: LogicalTime,
    pub hash: u64,
    pub physical_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDelete {
    pub collection_name: String,
    pub time_deleted: LogicalTime,
    pub hash: u64,
    pub physical_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedDerivedLineage {
    pub dep_collection_name: String,
    pub dep_tuple_hash: u64,
    pub rule_number: i64,
    pub inserted: bool,
    pub collection_name: String,
    pub tuple_hash: u64,
    pub time: LogicalTime,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecordedNetworkedLineage {
    pub dep_node_id: String,
    pub dep_time: LogicalTime,
    pub collection_name: String,
    pub tuple_hash: u64,
    pub time: LogicalTime,
    pub physical_time: DateTime<Utc>,
}

/// An in-memory `LineageClient` that records every call it receives rather
/// than writing anywhere, for use in rule and node tests that want to
/// assert on the exact lineage calls a tick produced (grounded on
/// `lineagedb::MockClient`).
#[derive(Debug, Default)]
pub struct MockLineageClient {
    initialized: bool,
    collections: Vec<RecordedCollection>,
    rules: Vec<RecordedRule>,
    inserts: Vec<RecordedInsert>,
    deletes: Vec<RecordedDelete>,
    derived_lineage: Vec<RecordedDerivedLineage>,
    networked_lineage: Vec<RecordedNetworkedLineage>,
}

impl MockLineageClient {
    pub fn new() -> Self {
        MockLineageClient::default()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    pub fn collections(&self) -> &[RecordedCollection] {
        &self.collections
    }

    pub fn rules(&self) -> &[RecordedRule] {
        &self.rules
    }

    pub fn inserts(&self) -> &[RecordedInsert] {
        &self.inserts
    }

    pub fn deletes(&self) -> &[RecordedDelete] {
        &self.deletes
    }

    pub fn derived_lineage(&self) -> &[RecordedDerivedLineage] {
        &self.derived_lineage
    }

    pub fn networked_lineage(&self) -> &[RecordedNetworkedLineage] {
        &self.networked_lineage
    }
}

impl LineageClient for MockLineageClient {
    fn init(&mut self) -> Result<(), LineageError> {
        self.initialized = true;
        Ok(())
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
        self.collections.push(RecordedCollection {
            name: name.to_string(),
            collection_type: collection_type.to_string(),
            column_names: column_names.to_vec(),
            column_types,
        });
        Ok(())
    }

    fn add_rule(&mut self, rule_number: i64, is_bootstrap: bool, rule_text: &str) -> Result<(), LineageError> {
        self.rules.push(RecordedRule {
            rule_number,
            is_bootstrap,
            rule_text: rule_text.to_string(),
        });
        Ok(())
    }

    fn insert_tuple(
        &mut self,
        collection_name: &str,
        time_inserted: LogicalTime,
        hash: u64,
        physical_time: DateTime<Utc>,
    ) -> Result<(), LineageError> {
        self.inserts.push(RecordedInsert {
            collection_name: collection_name.to_string(),
            time_inserted,
            hash,
            physical_time,
        });
        Ok(())
    }

    fn delete_tuple(
        &mut self,
        collection_name: &str,
        time_deleted: LogicalTime,
        hash: u64,
        physical_time: DateTime<Utc>,
    ) -> Result<(), LineageError> {
        self.deletes.push(RecordedDelete {
            collection_name: collection_name.to_string(),
            time_deleted,
            hash,
            physical_time,
        });
        Ok(())
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
        self.derived_lineage.push(RecordedDerivedLineage {
            dep_collection_name: dep_collection_name.to_string(),
            dep_tuple_hash,
            rule_number,
            inserted,
            collection_name: collection_name.to_string(),
            tuple_hash,
            time,
        });
        Ok(())
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
        self.networked_lineage.push(RecordedNetworkedLineage {
            dep_node_id: dep_node_id.to_string(),
            dep_time,
            collection_name: collection_name.to_string(),
            tuple_hash,
            time,
            physical_time,
        });
        Ok(())
    }
}
