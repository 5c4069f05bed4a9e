//! Entry-point script generation.
//!
//! Generates the branch reload entry point: it captures the load timestamp,
//! derives the branch-scoped storage and script paths, emits the branch trace
//! block, and includes the three stage scripts in order. The system layer is
//! included with `Must_Include` (a missing script aborts the reload); the
//! business and requirements layers use `Include` (a missing script is
//! skipped).
//!
//! The generated script expects the platform session to supply
//! `val__branch`. The `val__qvd_path__da{s,b,r}` and `val__script_path`
//! variables it sets are the data contract with the stage scripts, which read
//! them to address their layer's storage.

use std::fmt::Write;

/// Roots baked into the generated entry point
#[derive(Debug, Clone)]
pub struct EntryScriptConfig {
    pub storage_root: String,
    pub scripts_root: String,
}

impl Default for EntryScriptConfig {
    fn default() -> Self {
        EntryScriptConfig {
            storage_root: "lib://DataFiles".to_string(),
            scripts_root: "lib://Scripts".to_string(),
        }
    }
}

/// Generate the reload entry-point script
pub fn generate_entry_qvs(config: &EntryScriptConfig) -> String {
    let mut script = String::new();

    writeln!(script, "Trace").unwrap();
    writeln!(script, "{}", "=".repeat(65)).unwrap();
    writeln!(script, "    GIT Branch: $(val__branch)").unwrap();
    writeln!(script, "{}", "=".repeat(65)).unwrap();
    writeln!(script, ";").unwrap();
    writeln!(script).unwrap();

    writeln!(
        script,
        "Let val__utc = Timestamp(UTC(), 'YYYY-MM-DD hh:mm:ss.ffffff');"
    )
    .unwrap();
    writeln!(script).unwrap();

    for (variable, layer_dir) in [
        ("val__qvd_path__das", "data_according_to_system"),
        ("val__qvd_path__dab", "data_according_to_business"),
        ("val__qvd_path__dar", "data_according_to_requirements"),
    ] {
        writeln!(
            script,
            "Let {} = '{}/Analytical Data Storage System/QVD/$(val__branch)/{}';",
            variable, config.storage_root, layer_dir
        )
        .unwrap();
    }

    writeln!(
        script,
        "Let val__script_path = '{}/Analytical Data Storage System/$(val__branch)/scripts';",
        config.scripts_root
    )
    .unwrap();
    writeln!(script).unwrap();

    writeln!(
        script,
        "$(Must_Include=[$(val__script_path)/data_according_to_system.qvs]);"
    )
    .unwrap();
    writeln!(
        script,
        "$(Include=[$(val__script_path)/data_according_to_business.qvs]);"
    )
    .unwrap();
    writeln!(
        script,
        "$(Include=[$(val__script_path)/data_according_to_requirements.qvs]);"
    )
    .unwrap();

    script
}
