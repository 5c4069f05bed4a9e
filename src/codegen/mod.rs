//! QVS script generation.
//!
//! Generates the platform-side scripts the layered reload includes: the
//! branch entry point and the system-layer extraction script. Business- and
//! requirements-layer scripts are authored by analysts and never generated.

pub mod entrypoint_qvs;
pub mod system_qvs;
pub mod utils;

// Re-export key types
pub use entrypoint_qvs::{generate_entry_qvs, EntryScriptConfig};
pub use system_qvs::{generate_system_qvs, SystemScriptOptions};

use crate::schema::types::SchemaDef;
use std::error::Error;
use std::path::Path;

/// Options for a full generation run
#[derive(Debug, Clone, Default)]
pub struct GenerationOptions {
    pub entry: EntryScriptConfig,
    pub system: SystemScriptOptions,
}

/// Generate both reload scripts into an output directory
pub fn generate_all(
    schema: &SchemaDef,
    output_dir: &Path,
    options: &GenerationOptions,
) -> Result<(), Box<dyn Error>> {
    std::fs::create_dir_all(output_dir)?;

    println!("  ✓ Generating reload_entry_point.qvs...");
    let entry_script = generate_entry_qvs(&options.entry);
    std::fs::write(output_dir.join("reload_entry_point.qvs"), entry_script)?;

    println!("  ✓ Generating data_according_to_system.qvs...");
    let system_script = generate_system_qvs(schema, &options.system);
    std::fs::write(output_dir.join("data_according_to_system.qvs"), system_script)?;

    Ok(())
}
