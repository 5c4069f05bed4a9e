//! # Layercake: Layered Data Warehouse Reload Tooling
//!
//! Layercake operates a branch-scoped, three-layer analytical data warehouse
//! on a QVD/QVS-based BI platform: it orchestrates the layered reload and
//! generates the platform-side scripts from a declarative YAML schema.
//!
//! ## Features
//!
//! - **Branch-scoped addressing**: storage and script paths derived from the
//!   active branch, so every environment/version gets its own warehouse
//! - **Ordered stage runner**: system layer (mandatory), then business, then
//!   requirements (both optional) — a missing optional stage is skipped, a
//!   missing or failing mandatory stage aborts the run
//! - **Script generation**: the reload entry point and the system-layer
//!   extraction script (incremental, hash-based change detection) generated
//!   from a YAML warehouse schema
//! - **Swagger import**: build the warehouse schema from an API document
//!
//! ## Example: warehouse schema
//!
//! ```yaml
//! tables:
//!   sales__sales_order:
//!     description: "Sales order headers"
//!     columns:
//!       sales_order_id:
//!         description: "Order primary key"
//!       customer_id: {}
//!       order_date: {}
//!       modified_date: {}
//! ```
//!
//! ## Example: reload configuration
//!
//! ```yaml
//! reload:
//!   storage_root: "lib://DataFiles"
//!   scripts_root: "lib://Scripts"
//!   engine:
//!     command: qvs-runner
//! ```

// Reload orchestration
pub mod reload;

// Warehouse schema model and loaders
pub mod schema;

// QVS script generation
pub mod codegen;

// Re-export key types
pub use reload::{
    resolve_branch, run_stages, stage_plan, CommandEngine, Layer, LayerPaths, PlanEngine,
    ReloadConfig, ReloadContext, ReloadEngine, ReloadError, ReloadReport, StageDescriptor,
    StageError, StageOutcome,
};
pub use schema::{load_schema, validate_schema, ColumnDef, SchemaDef, TableDef};
pub use codegen::{generate_entry_qvs, generate_system_qvs, EntryScriptConfig, SystemScriptOptions};
