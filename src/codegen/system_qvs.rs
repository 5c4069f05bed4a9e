//! System-layer script generation.
//!
//! Generates `data_according_to_system.qvs` from a warehouse schema: one load
//! block per table, with hash-based change detection and incremental loading
//! against the table's existing QVD. Tables whose columns are unknown (e.g.
//! imported from an API document without a resolvable model) fall back to a
//! full `*` load without change detection.
//!
//! The generated script reads `val__qvd_path__das` and `val__utc` from the
//! entry point.

use crate::codegen::utils::{escape_qvs_string, to_display_name};
use crate::schema::types::{entity_name, ordered_columns, SchemaDef, TableDef};
use std::fmt::Write;

/// Per-invocation generation options
#[derive(Debug, Clone)]
pub struct SystemScriptOptions {
    /// Root of the landed source files; tables load from
    /// `{source_root}/data/das.{table}.parquet`
    pub source_root: String,
}

impl Default for SystemScriptOptions {
    fn default() -> Self {
        SystemScriptOptions {
            source_root: "lib://Landing".to_string(),
        }
    }
}

/// Generate the complete system-layer script
pub fn generate_system_qvs(schema: &SchemaDef, options: &SystemScriptOptions) -> String {
    let mut script = String::new();

    writeln!(script, "Trace").unwrap();
    writeln!(script, "{}", "=".repeat(65)).unwrap();
    writeln!(script, "    DATA ACCORDING TO SYSTEM").unwrap();
    writeln!(script, "{}", "=".repeat(65)).unwrap();
    writeln!(script, ";").unwrap();
    writeln!(script).unwrap();

    for (table_name, table) in &schema.tables {
        generate_table_block(&mut script, table_name, table, options);
    }

    script
}

fn generate_table_block(
    script: &mut String,
    table_name: &str,
    table: &TableDef,
    options: &SystemScriptOptions,
) {
    let columns = ordered_columns(table_name, table);
    let display = to_display_name(entity_name(table_name));
    let source = format!("{}/data/das.{}.parquet", options.source_root, table_name);

    writeln!(script, "Trace").unwrap();
    writeln!(script, "{}", "-".repeat(65)).unwrap();
    writeln!(script, "    Extracting {}", display).unwrap();
    writeln!(script, "{}", "-".repeat(65)).unwrap();
    writeln!(script, ";").unwrap();
    writeln!(script).unwrap();

    if columns.is_empty() {
        generate_full_load_block(script, table_name, table, &source);
        return;
    }

    // Variables
    writeln!(script, "Trace Setting variables...;").unwrap();
    writeln!(
        script,
        "Let val__qvd_target = '$(val__qvd_path__das)/{}.qvd';",
        table_name
    )
    .unwrap();
    writeln!(
        script,
        "Let val__target_qvd_exists = Not IsNull(QvdCreateTime('$(val__qvd_target)'));"
    )
    .unwrap();
    writeln!(script, "Let val__incremental_value = '1970-01-01';").unwrap();
    writeln!(script).unwrap();

    // Hash table seeded empty so Exists() is well-defined on first load
    writeln!(script, "Trace Define hash table...;").unwrap();
    writeln!(script, "[processed_record_hashes]:").unwrap();
    writeln!(script, "Load").unwrap();
    writeln!(script, "    Null() As [old_record_hash]").unwrap();
    writeln!(script, "AutoGenerate 0").unwrap();
    writeln!(script, ";").unwrap();
    writeln!(script).unwrap();

    // Prior state, when the target QVD already exists
    writeln!(script, "Trace Checking if target QVD exists...;").unwrap();
    writeln!(script, "If $(val__target_qvd_exists) Then").unwrap();
    writeln!(
        script,
        "    Trace Target found, loading hashes and max incremental value...;"
    )
    .unwrap();
    writeln!(script).unwrap();
    writeln!(script, "    Concatenate([processed_record_hashes])").unwrap();
    writeln!(script, "    Load").unwrap();
    writeln!(script, "        [record_hash] As [old_record_hash]").unwrap();
    writeln!(script, "    From").unwrap();
    writeln!(script, "        [$(val__qvd_target)] (qvd)").unwrap();
    writeln!(script, "    ;").unwrap();
    writeln!(script).unwrap();
    writeln!(script, "    [max_incremental_value]:").unwrap();
    writeln!(script, "    Load").unwrap();
    writeln!(
        script,
        "        Date(Max(Num#([modified_date])), 'YYYY-MM-DD') As [max_incremental_value]"
    )
    .unwrap();
    writeln!(script, "    From").unwrap();
    writeln!(script, "        [$(val__qvd_target)] (qvd)").unwrap();
    writeln!(script, "    ;").unwrap();
    writeln!(script).unwrap();
    writeln!(
        script,
        "    Let val__incremental_value = Coalesce(Peek('max_incremental_value', -1, 'max_incremental_value'), '$(val__incremental_value)');"
    )
    .unwrap();
    writeln!(script, "    Drop Table [max_incremental_value];").unwrap();
    writeln!(script).unwrap();
    writeln!(script, "Else").unwrap();
    writeln!(script, "    Trace Target not found, starting full load...;").unwrap();
    writeln!(script).unwrap();
    writeln!(script, "End If").unwrap();
    writeln!(script).unwrap();

    // Record hash over every loaded column
    writeln!(
        script,
        "Trace Loading new data with incremental value $(val__incremental_value)...;"
    )
    .unwrap();
    writeln!(script, "Set var__record_hash = Hash256(").unwrap();
    for (i, (name, _, _)) in columns.iter().enumerate() {
        let comma = if i < columns.len() - 1 { "," } else { "" };
        writeln!(script, "    [{}]{}", name, comma).unwrap();
    }
    writeln!(script, ")").unwrap();
    writeln!(script, ";").unwrap();
    writeln!(script).unwrap();

    // Incremental load, keeping only unseen records
    writeln!(script, "[{}]:", table_name).unwrap();
    writeln!(script, "Load").unwrap();
    writeln!(script, "    *,").unwrap();
    writeln!(script, "    $(var__record_hash) As [record_hash],").unwrap();
    writeln!(
        script,
        "    Timestamp#('$(val__utc)', 'YYYY-MM-DD hh:mm:ss.ffffff') As [record_loaded_at]"
    )
    .unwrap();
    writeln!(script, "Where").unwrap();
    writeln!(
        script,
        "    Not Exists ([old_record_hash], $(var__record_hash))"
    )
    .unwrap();
    writeln!(script, ";").unwrap();
    writeln!(script).unwrap();
    writeln!(script, "Load").unwrap();
    for (i, (name, _, _)) in columns.iter().enumerate() {
        let comma = if i < columns.len() - 1 { "," } else { "" };
        writeln!(script, "    Text([{}]) As [{}]{}", name, name, comma).unwrap();
    }
    writeln!(script, "From").unwrap();
    writeln!(script, "    [{}] (parquet)", source).unwrap();
    writeln!(script, "Where").unwrap();
    writeln!(
        script,
        "    Date([modified_date], 'YYYY-MM-DD') >= Date#('$(val__incremental_value)', 'YYYY-MM-DD')"
    )
    .unwrap();
    writeln!(script, ";").unwrap();
    writeln!(script).unwrap();

    writeln!(script, "Trace Dropping hash table...;").unwrap();
    writeln!(script, "Drop Table [processed_record_hashes];").unwrap();
    writeln!(script).unwrap();

    writeln!(script, "Trace Counting new records...;").unwrap();
    writeln!(
        script,
        "Set val__no_of_new_records = Alt(NoOfRows('{}'), 0);",
        table_name
    )
    .unwrap();
    writeln!(script).unwrap();

    writeln!(script, "Trace Checking if there are new records...;").unwrap();
    writeln!(script, "If $(val__no_of_new_records) > 0 Then").unwrap();
    writeln!(script).unwrap();
    writeln!(script, "    Trace Checking if target QVD exists...;").unwrap();
    writeln!(script, "    If $(val__target_qvd_exists) Then").unwrap();
    writeln!(script, "        Trace Appending previously ingested data...;").unwrap();
    writeln!(script).unwrap();
    writeln!(script, "        Concatenate([{}])", table_name).unwrap();
    writeln!(
        script,
        "        Load * From [$(val__qvd_target)] (qvd) Where Not Exists ([record_hash]);"
    )
    .unwrap();
    writeln!(script).unwrap();
    writeln!(script, "    Else").unwrap();
    writeln!(script, "        Trace Target not found, skipping append...;").unwrap();
    writeln!(script).unwrap();
    writeln!(script, "    End If").unwrap();
    writeln!(script).unwrap();

    generate_comments(script, table_name, table);

    writeln!(script, "    Trace Storing data...;").unwrap();
    writeln!(script, "    Store [{}] Into [$(val__qvd_target)] (qvd);", table_name).unwrap();
    writeln!(script).unwrap();
    writeln!(script, "Else").unwrap();
    writeln!(script, "    Trace No new records loaded...;").unwrap();
    writeln!(script).unwrap();
    writeln!(script, "End If").unwrap();
    writeln!(script).unwrap();

    writeln!(script, "Trace Dropping table...;").unwrap();
    writeln!(script, "Drop Table [{}];", table_name).unwrap();
    writeln!(script).unwrap();

    writeln!(script, "Trace Resetting variables...;").unwrap();
    writeln!(script, "Let val__qvd_target = Null();").unwrap();
    writeln!(script, "Let val__target_qvd_exists = Null();").unwrap();
    writeln!(script, "Let val__incremental_value = Null();").unwrap();
    writeln!(script, "Let var__record_hash = Null();").unwrap();
    writeln!(script, "Let val__no_of_new_records = Null();").unwrap();
    writeln!(script).unwrap();
}

/// Full reload for tables with unknown columns: no hashing, no incremental
/// window, the stored QVD is replaced wholesale.
fn generate_full_load_block(script: &mut String, table_name: &str, table: &TableDef, source: &str) {
    writeln!(script, "Trace Columns unknown, performing full load...;").unwrap();
    writeln!(
        script,
        "Let val__qvd_target = '$(val__qvd_path__das)/{}.qvd';",
        table_name
    )
    .unwrap();
    writeln!(script).unwrap();

    writeln!(script, "[{}]:", table_name).unwrap();
    writeln!(script, "Load").unwrap();
    writeln!(script, "    *,").unwrap();
    writeln!(
        script,
        "    Timestamp#('$(val__utc)', 'YYYY-MM-DD hh:mm:ss.ffffff') As [record_loaded_at]"
    )
    .unwrap();
    writeln!(script, "From").unwrap();
    writeln!(script, "    [{}] (parquet)", source).unwrap();
    writeln!(script, ";").unwrap();
    writeln!(script).unwrap();

    if let Some(ref description) = table.description {
        writeln!(
            script,
            "Comment Table [{}] With '{}';",
            table_name,
            escape_qvs_string(description)
        )
        .unwrap();
        writeln!(script).unwrap();
    }

    writeln!(script, "Trace Storing data...;").unwrap();
    writeln!(script, "Store [{}] Into [$(val__qvd_target)] (qvd);", table_name).unwrap();
    writeln!(script, "Drop Table [{}];", table_name).unwrap();
    writeln!(script).unwrap();
    writeln!(script, "Let val__qvd_target = Null();").unwrap();
    writeln!(script).unwrap();
}

fn generate_comments(script: &mut String, table_name: &str, table: &TableDef) {
    if let Some(ref description) = table.description {
        writeln!(script, "    Trace Commenting table...;").unwrap();
        writeln!(
            script,
            "    Comment Table [{}] With '{}';",
            table_name,
            escape_qvs_string(description)
        )
        .unwrap();
        writeln!(script).unwrap();
    }

    let field_comments: Vec<(&str, &str)> = ordered_columns(table_name, table)
        .iter()
        .filter_map(|(name, column, _)| {
            column.description.as_deref().map(|desc| (*name, desc))
        })
        .collect();

    if !field_comments.is_empty() {
        writeln!(script, "    Trace Commenting fields...;").unwrap();
        for (name, description) in field_comments {
            writeln!(
                script,
                "    Comment Field [{}] With '{}';",
                name,
                escape_qvs_string(description)
            )
            .unwrap();
        }
        writeln!(script).unwrap();
    }
}
