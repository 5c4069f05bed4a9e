//! Swagger/OpenAPI schema importer.
//!
//! Builds a warehouse schema from an API document: one system-layer table per
//! unique GET-operation tag, columns taken from the referenced component
//! schema's properties. Property names arrive in camelCase and are converted
//! to snake_case; a fixed table handles compound words the mechanical split
//! gets wrong.

use crate::schema::types::{ColumnDef, SchemaDef, TableDef};
use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;
use std::path::Path;

/// Compound resource names the mechanical camelCase split cannot recover
const COMPOUND_WORDS: &[(&str, &str)] = &[
    ("billofmaterials", "bill_of_materials"),
    ("businessentity", "business_entity"),
    ("countryregion", "country_region"),
    ("creditcard", "credit_card"),
    ("currencyrate", "currency_rate"),
    ("emailaddress", "email_address"),
    ("personphone", "person_phone"),
    ("phonenumber", "phone_number"),
    ("productcategory", "product_category"),
    ("productinventory", "product_inventory"),
    ("productmodel", "product_model"),
    ("productsubcategory", "product_subcategory"),
    ("purchaseorder", "purchase_order"),
    ("salesorder", "sales_order"),
    ("salesperson", "sales_person"),
    ("salesreason", "sales_reason"),
    ("salesterritory", "sales_territory"),
    ("shipmethod", "ship_method"),
    ("shoppingcart", "shopping_cart"),
    ("specialoffer", "special_offer"),
    ("stateprovince", "state_province"),
    ("unitmeasure", "unit_measure"),
    ("workorder", "work_order"),
    ("workorderrouting", "work_order_routing"),
];

/// Convert camelCase to snake_case
pub fn camel_to_snake(name: &str) -> String {
    let boundary_upper = Regex::new(r"(.)([A-Z][a-z]+)").unwrap();
    let boundary_lower = Regex::new(r"([a-z0-9])([A-Z])").unwrap();

    let pass = boundary_upper.replace_all(name, "${1}_${2}");
    boundary_lower.replace_all(&pass, "${1}_${2}").to_lowercase()
}

/// Convert a resource name to snake_case, resolving known compound words
pub fn resource_to_snake(name: &str) -> String {
    let lower = name.to_lowercase();

    for (compound, snake) in COMPOUND_WORDS {
        if lower == *compound {
            return snake.to_string();
        }
    }

    if lower.contains('_') {
        return lower;
    }

    camel_to_snake(name)
}

/// Import a warehouse schema from a Swagger/OpenAPI JSON document.
///
/// Generated table names are `raw__{api_name}__{resource}`. Resources with no
/// resolvable component schema get an empty column set, which the script
/// generator turns into a `*` load.
pub fn import<P: AsRef<Path>>(path: P, api_name: &str) -> Result<SchemaDef, String> {
    let path = path.as_ref();

    let contents = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {}: {}", path.display(), e))?;

    let document: Value = serde_json::from_str(&contents)
        .map_err(|e| format!("Failed to parse {}: {}", path.display(), e))?;

    import_document(&document, api_name)
}

/// Import from an already-parsed API document
pub fn import_document(document: &Value, api_name: &str) -> Result<SchemaDef, String> {
    let paths = document
        .get("paths")
        .and_then(Value::as_object)
        .ok_or_else(|| "API document has no paths object".to_string())?;

    let mut tables = IndexMap::new();

    for path_item in paths.values() {
        let get_operation = match path_item.get("get") {
            Some(op) => op,
            None => continue,
        };

        // First tag names the resource; each tag becomes one table
        let tag = match get_operation
            .get("tags")
            .and_then(Value::as_array)
            .and_then(|tags| tags.first())
            .and_then(Value::as_str)
        {
            Some(tag) => tag,
            None => continue,
        };

        let resource = resource_to_snake(tag);
        let table_name = format!("raw__{}__{}", api_name, resource);

        if tables.contains_key(&table_name) {
            continue;
        }

        let columns = response_schema_ref(get_operation)
            .and_then(|model_ref| resolve_properties(document, &model_ref))
            .unwrap_or_default();

        tables.insert(
            table_name,
            TableDef {
                description: get_operation
                    .get("summary")
                    .and_then(Value::as_str)
                    .map(|s| s.to_string()),
                columns,
            },
        );
    }

    if tables.is_empty() {
        return Err("API document contains no taggable GET operations".to_string());
    }

    Ok(SchemaDef { tables })
}

/// Pull the component-schema reference out of a GET operation's 200 response.
///
/// Array responses reference their item schema.
fn response_schema_ref(operation: &Value) -> Option<String> {
    let schema = operation
        .get("responses")?
        .get("200")?
        .get("content")?
        .get("application/json")?
        .get("schema")?;

    let reference = if schema.get("type").and_then(Value::as_str) == Some("array") {
        schema.get("items")?.get("$ref")?
    } else {
        schema.get("$ref")?
    };

    reference.as_str().map(|s| s.to_string())
}

/// Resolve a `#/components/schemas/Model` reference into columns
fn resolve_properties(document: &Value, model_ref: &str) -> Option<IndexMap<String, ColumnDef>> {
    let model_name = model_ref.rsplit('/').next()?;

    let properties = document
        .get("components")?
        .get("schemas")?
        .get(model_name)?
        .get("properties")?
        .as_object()?;

    let mut columns = IndexMap::new();
    for (property_name, property) in properties {
        columns.insert(
            camel_to_snake(property_name),
            ColumnDef {
                description: property
                    .get("description")
                    .and_then(Value::as_str)
                    .map(|s| s.to_string()),
            },
        );
    }

    Some(columns)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_camel_to_snake() {
        assert_eq!(camel_to_snake("salesOrderId"), "sales_order_id");
        assert_eq!(camel_to_snake("SalesOrderID"), "sales_order_id");
        assert_eq!(camel_to_snake("rowguid"), "rowguid");
    }

    #[test]
    fn test_resource_to_snake_compounds() {
        assert_eq!(resource_to_snake("SalesOrder"), "sales_order");
        assert_eq!(resource_to_snake("billofmaterials"), "bill_of_materials");
        assert_eq!(resource_to_snake("already_snake"), "already_snake");
        assert_eq!(resource_to_snake("Product"), "product");
    }

    fn sample_document() -> Value {
        json!({
            "paths": {
                "/api/v1/salesorder": {
                    "get": {
                        "tags": ["SalesOrder"],
                        "summary": "List sales orders",
                        "responses": {
                            "200": {
                                "content": {
                                    "application/json": {
                                        "schema": {
                                            "type": "array",
                                            "items": {"$ref": "#/components/schemas/SalesOrder"}
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
                "/api/v1/salesorder/{id}": {
                    "get": {
                        "tags": ["SalesOrder"],
                        "responses": {}
                    }
                },
                "/api/v1/product": {
                    "get": {
                        "tags": ["Product"],
                        "responses": {}
                    }
                }
            },
            "components": {
                "schemas": {
                    "SalesOrder": {
                        "properties": {
                            "salesOrderId": {"type": "integer", "description": "Order key"},
                            "orderDate": {"type": "string"}
                        }
                    }
                }
            }
        })
    }

    #[test]
    fn test_import_document_one_table_per_tag() {
        let schema = import_document(&sample_document(), "adventure_works").unwrap();

        assert_eq!(schema.tables.len(), 2);
        assert!(schema.tables.contains_key("raw__adventure_works__sales_order"));
        assert!(schema.tables.contains_key("raw__adventure_works__product"));
    }

    #[test]
    fn test_import_document_resolves_columns() {
        let schema = import_document(&sample_document(), "adventure_works").unwrap();
        let table = &schema.tables["raw__adventure_works__sales_order"];

        assert_eq!(table.description.as_deref(), Some("List sales orders"));
        assert_eq!(table.columns.len(), 2);
        assert_eq!(
            table.columns["sales_order_id"].description.as_deref(),
            Some("Order key")
        );
        assert!(table.columns.contains_key("order_date"));
    }

    #[test]
    fn test_import_document_unresolved_schema_gets_empty_columns() {
        let schema = import_document(&sample_document(), "adventure_works").unwrap();

        assert!(schema.tables["raw__adventure_works__product"].columns.is_empty());
    }

    #[test]
    fn test_import_document_rejects_empty_paths() {
        let document = json!({"paths": {}});

        assert!(import_document(&document, "api").is_err());
    }
}
