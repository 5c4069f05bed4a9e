//! Warehouse schema model and loaders.
//!
//! Schemas come from a declarative YAML file or from a Swagger/OpenAPI
//! document imported into the same form; script generation consumes either.

pub mod swagger_loader;
pub mod types;
pub mod yaml_loader;

// Re-export key types
pub use types::{classify_column, entity_name, ordered_columns, ColumnDef, ColumnRole, SchemaDef, TableDef};
pub use yaml_loader::{load_schema, validate_schema};
