//! YAML schema loader.
//!
//! Loads a warehouse schema from a single YAML file and validates it before
//! any script generation runs.

use crate::schema::types::SchemaDef;
use std::path::Path;

/// Load a warehouse schema from a YAML file
///
/// # Example
///
/// ```ignore
/// use layercake::schema::load_schema;
///
/// let schema = load_schema("schemas/raw_schema.yaml").unwrap();
/// ```
pub fn load_schema<P: AsRef<Path>>(path: P) -> Result<SchemaDef, String> {
    let path = path.as_ref();

    let yaml_content = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let schema: SchemaDef = serde_yaml::from_str(&yaml_content)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

    validate_schema(&schema)?;

    Ok(schema)
}

/// Validate a schema definition
///
/// Checks for:
/// - At least one table
/// - Non-empty table names
/// - At least one column per table, with non-empty names
pub fn validate_schema(schema: &SchemaDef) -> Result<(), String> {
    if schema.tables.is_empty() {
        return Err("Schema contains no tables".to_string());
    }

    for (table_name, table) in &schema.tables {
        if table_name.is_empty() {
            return Err("Table name cannot be empty".to_string());
        }

        if table.columns.is_empty() {
            return Err(format!("Table '{}' has no columns", table_name));
        }

        for column_name in table.columns.keys() {
            if column_name.is_empty() {
                return Err(format!(
                    "Table '{}' contains a column with an empty name",
                    table_name
                ));
            }
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::types::{ColumnDef, TableDef};
    use indexmap::IndexMap;

    fn schema_with_table(table_name: &str, columns: &[&str]) -> SchemaDef {
        let mut column_map = IndexMap::new();
        for name in columns {
            column_map.insert(name.to_string(), ColumnDef::default());
        }

        let mut tables = IndexMap::new();
        tables.insert(
            table_name.to_string(),
            TableDef {
                description: None,
                columns: column_map,
            },
        );

        SchemaDef { tables }
    }

    #[test]
    fn test_validate_accepts_simple_schema() {
        let schema = schema_with_table("sales__order", &["order_id", "modified_date"]);

        assert!(validate_schema(&schema).is_ok());
    }

    #[test]
    fn test_validate_rejects_empty_schema() {
        let schema = SchemaDef::default();

        assert!(validate_schema(&schema).is_err());
    }

    #[test]
    fn test_validate_rejects_table_without_columns() {
        let schema = schema_with_table("sales__order", &[]);

        let err = validate_schema(&schema).unwrap_err();
        assert!(err.contains("sales__order"));
    }

    #[test]
    fn test_parse_schema_yaml() {
        let yaml = r#"
tables:
  sales__sales_order:
    description: "Sales order headers"
    columns:
      sales_order_id:
        description: "Order primary key"
      customer_id: {}
      modified_date: {}
"#;
        let schema: SchemaDef = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(schema.tables.len(), 1);
        let table = &schema.tables["sales__sales_order"];
        assert_eq!(table.description.as_deref(), Some("Sales order headers"));
        assert_eq!(table.columns.len(), 3);
        assert_eq!(
            table.columns["sales_order_id"].description.as_deref(),
            Some("Order primary key")
        );
    }
}
