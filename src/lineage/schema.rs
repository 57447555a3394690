//! Fixed column layout of the lineage store's tables (§6). Kept as plain
//! functions/constants rather than a query builder: the store is an
//! external system, and these names are the only contract this crate has
//! with it.

pub const RESERVED_LINEAGE_COLLECTION_NAME: &str = "lineage";

pub const NODES_TABLE: &str = "Nodes";
pub const COLLECTIONS_TABLE: &str = "Collections";
pub const RULES_TABLE: &str = "Rules";

/// The per-node, per-collection tuple table: `{node}_{collection}`.
pub fn collection_table_name(node_id: &str, collection_name: &str) -> String {
    format!("{node_id}_{collection_name}")
}

/// The per-node lineage edge table: `{node}_lineage`.
pub fn lineage_table_name(node_id: &str) -> String {
    format!("{node_id}_lineage")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_names_follow_node_prefix_convention() {
        assert_eq!(collection_table_name("n1", "seen"), "n1_seen");
        assert_eq!(lineage_table_name("n1"), "n1_lineage");
    }
}
