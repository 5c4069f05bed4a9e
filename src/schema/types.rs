//! Warehouse schema definitions.
//!
//! A schema describes the system-layer tables: table names, column names, and
//! the descriptions that become platform comments. Column order from the YAML
//! file is preserved; script generation re-orders columns by role.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Complete warehouse schema
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SchemaDef {
    #[serde(default)]
    pub tables: IndexMap<String, TableDef>,
}

/// One system-layer table
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TableDef {
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default)]
    pub columns: IndexMap<String, ColumnDef>,
}

/// One column; only the description is consumed by script generation
/// (everything loads as text on the platform side)
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct ColumnDef {
    #[serde(default)]
    pub description: Option<String>,
}

/// Role a column plays in the generated load order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnRole {
    PrimaryKey,
    ForeignKey,
    Regular,
    System,
}

/// Extract the entity name from a qualified table name.
///
/// Table names are `schema__entity`; the entity is the last segment.
pub fn entity_name(table_name: &str) -> &str {
    table_name.rsplit("__").next().unwrap_or(table_name)
}

/// Classify a column by name.
///
/// Returns None for ingestion bookkeeping columns (`_dlt_*`), which are
/// dropped from generated scripts entirely.
pub fn classify_column(column_name: &str, entity: &str) -> Option<ColumnRole> {
    if column_name.starts_with("_dlt_") {
        return None;
    }

    if column_name == "rowguid" || column_name == "modified_date" {
        return Some(ColumnRole::System);
    }

    if column_name.ends_with("_id") {
        if column_name.contains(entity) {
            return Some(ColumnRole::PrimaryKey);
        }
        return Some(ColumnRole::ForeignKey);
    }

    Some(ColumnRole::Regular)
}

/// Columns of a table in generated load order: primary keys, foreign keys,
/// regular fields, system fields, each group sorted by name.
pub fn ordered_columns<'a>(
    table_name: &str,
    table: &'a TableDef,
) -> Vec<(&'a str, &'a ColumnDef, ColumnRole)> {
    let entity = entity_name(table_name);

    let mut groups: [Vec<(&str, &ColumnDef, ColumnRole)>; 4] =
        [Vec::new(), Vec::new(), Vec::new(), Vec::new()];

    for (name, column) in &table.columns {
        let role = match classify_column(name, entity) {
            Some(role) => role,
            None => continue,
        };

        let group = match role {
            ColumnRole::PrimaryKey => 0,
            ColumnRole::ForeignKey => 1,
            ColumnRole::Regular => 2,
            ColumnRole::System => 3,
        };

        groups[group].push((name.as_str(), column, role));
    }

    for group in &mut groups {
        group.sort_by_key(|(name, _, _)| *name);
    }

    groups.into_iter().flatten().collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_name_from_qualified_table() {
        assert_eq!(entity_name("sales__sales_order"), "sales_order");
        assert_eq!(entity_name("person"), "person");
    }

    #[test]
    fn test_classify_column_roles() {
        assert_eq!(
            classify_column("sales_order_id", "sales_order"),
            Some(ColumnRole::PrimaryKey)
        );
        assert_eq!(
            classify_column("customer_id", "sales_order"),
            Some(ColumnRole::ForeignKey)
        );
        assert_eq!(
            classify_column("order_date", "sales_order"),
            Some(ColumnRole::Regular)
        );
        assert_eq!(
            classify_column("rowguid", "sales_order"),
            Some(ColumnRole::System)
        );
        assert_eq!(
            classify_column("modified_date", "sales_order"),
            Some(ColumnRole::System)
        );
        assert_eq!(classify_column("_dlt_load_id", "sales_order"), None);
    }

    #[test]
    fn test_ordered_columns_groups_and_sorts() {
        let mut columns = IndexMap::new();
        for name in [
            "status",
            "modified_date",
            "customer_id",
            "sales_order_id",
            "_dlt_id",
            "rowguid",
            "account_number",
            "territory_id",
        ] {
            columns.insert(name.to_string(), ColumnDef::default());
        }

        let table = TableDef {
            description: None,
            columns,
        };

        let ordered: Vec<&str> = ordered_columns("sales__sales_order", &table)
            .iter()
            .map(|(name, _, _)| *name)
            .collect();

        assert_eq!(
            ordered,
            vec![
                "sales_order_id",
                "customer_id",
                "territory_id",
                "account_number",
                "status",
                "modified_date",
                "rowguid",
            ]
        );
    }
}
