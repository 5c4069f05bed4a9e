//! layercake CLI - branch-scoped layered warehouse reload and script generation
//!
//! Orchestrates the three-stage reload (system, business, requirements) and
//! generates the platform-side QVS scripts from YAML warehouse schemas.

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process;

use layercake::codegen::{GenerationOptions, EntryScriptConfig, SystemScriptOptions};
use layercake::reload::{
    resolve_branch, run_stages, stage_plan, CommandEngine, PlanEngine, ReloadConfig,
    ReloadContext, ReloadEngine, StageOutcome,
};
use layercake::schema::{self, SchemaDef};

#[derive(Parser)]
#[command(name = "layercake")]
#[command(version, about = "Branch-scoped layered warehouse reload and QVS script generation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the layered reload for a branch
    Run {
        /// Path to layercake.yaml configuration file
        #[arg(short, long, default_value = "layercake.yaml")]
        config: PathBuf,

        /// Branch identifier (overrides LAYERCAKE_BRANCH and the config file)
        #[arg(short, long)]
        branch: Option<String>,

        /// Verify stage scripts without executing them
        #[arg(short, long)]
        plan: bool,
    },

    /// Generate reload scripts from a warehouse schema
    Generate {
        /// Path to YAML warehouse schema
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Path to Swagger/OpenAPI JSON document (alternative to --schema)
        #[arg(short = 'w', long)]
        swagger: Option<PathBuf>,

        /// API name used as table prefix for swagger import
        #[arg(short, long, default_value = "adventure_works")]
        api_name: String,

        /// Output directory for generated scripts
        #[arg(short, long, default_value = "scripts")]
        output: PathBuf,

        /// Root of the landed source files read by the system layer
        #[arg(long, default_value = "lib://Landing")]
        source_root: String,

        /// Storage root baked into the entry-point script
        #[arg(long, default_value = "lib://DataFiles")]
        storage_root: String,

        /// Scripts root baked into the entry-point script
        #[arg(long, default_value = "lib://Scripts")]
        scripts_root: String,
    },

    /// Validate a warehouse schema without generating scripts
    Validate {
        /// Path to YAML warehouse schema
        #[arg(short, long)]
        schema: Option<PathBuf>,

        /// Path to Swagger/OpenAPI JSON document (alternative to --schema)
        #[arg(short = 'w', long)]
        swagger: Option<PathBuf>,

        /// API name used as table prefix for swagger import
        #[arg(short, long, default_value = "adventure_works")]
        api_name: String,
    },
}

fn main() {
    tracing_subscriber::fmt::init();
    dotenv::dotenv().ok();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run { config, branch, plan } => run_reload(config, branch, plan),
        Commands::Generate {
            schema,
            swagger,
            api_name,
            output,
            source_root,
            storage_root,
            scripts_root,
        } => generate_scripts(
            schema,
            swagger,
            api_name,
            output,
            source_root,
            storage_root,
            scripts_root,
        ),
        Commands::Validate {
            schema,
            swagger,
            api_name,
        } => validate_schema_input(schema, swagger, api_name),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

/// Run the layered reload for a branch
fn run_reload(config_path: PathBuf, branch: Option<String>, plan_only: bool) -> Result<(), String> {
    let config = if config_path.exists() {
        let loaded = ReloadConfig::from_file(&config_path)?;
        println!("  ✓ Loaded configuration from {}", config_path.display());
        loaded
    } else {
        println!(
            "  ℹ No configuration file at {}, using defaults",
            config_path.display()
        );
        ReloadConfig::default()
    };

    config.validate()?;

    let branch = resolve_branch(branch, &config)?;
    let ctx = ReloadContext::new(&config.storage_root, &config.scripts_root, &branch);

    print!("{}", ctx.trace_header());
    println!();

    println!("🔄 Reloading branch '{}' (started {})", ctx.branch, ctx.started_at);
    println!("  📁 Storage: {}", ctx.paths.system_storage);
    println!("  📁 Scripts: {}", ctx.paths.script_base);
    println!();

    let plan = stage_plan(&ctx.paths);

    let mut engine: Box<dyn ReloadEngine> = match (&config.engine, plan_only) {
        (Some(engine_config), false) => Box::new(CommandEngine::new(
            engine_config.command.clone(),
            engine_config.args.clone(),
        )),
        (None, false) => {
            println!("  ℹ No engine command configured, running in plan mode");
            Box::new(PlanEngine)
        }
        (_, true) => Box::new(PlanEngine),
    };

    let report = run_stages(&ctx, &plan, engine.as_mut()).map_err(|e| e.to_string())?;

    for stage in &report.stages {
        match stage.outcome {
            StageOutcome::Completed => {
                println!("  ✓ {} stage completed", stage.layer);
            }
            StageOutcome::Skipped => {
                println!("  ℹ {} stage skipped (script absent)", stage.layer);
            }
        }
    }

    println!();
    println!("✨ Reload complete!");

    Ok(())
}

/// Generate reload scripts from a warehouse schema
fn generate_scripts(
    schema: Option<PathBuf>,
    swagger: Option<PathBuf>,
    api_name: String,
    output: PathBuf,
    source_root: String,
    storage_root: String,
    scripts_root: String,
) -> Result<(), String> {
    let schema = load_schema_input(schema, swagger, &api_name)?;

    println!("🔧 Generating reload scripts for {} tables...", schema.tables.len());

    let options = GenerationOptions {
        entry: EntryScriptConfig {
            storage_root,
            scripts_root,
        },
        system: SystemScriptOptions { source_root },
    };

    layercake::codegen::generate_all(&schema, &output, &options)
        .map_err(|e| format!("Script generation failed: {}", e))?;

    println!();
    println!("✨ Script generation complete!");
    println!("  📁 Output directory: {}", output.display());

    Ok(())
}

/// Validate a warehouse schema without generating scripts
fn validate_schema_input(
    schema: Option<PathBuf>,
    swagger: Option<PathBuf>,
    api_name: String,
) -> Result<(), String> {
    let schema = load_schema_input(schema, swagger, &api_name)?;

    println!("  ✓ {} tables validated", schema.tables.len());
    for (table_name, table) in &schema.tables {
        println!("    - {} ({} columns)", table_name, table.columns.len());
    }

    println!("✅ Schema is valid!");

    Ok(())
}

/// Load a schema from exactly one of the two input forms
fn load_schema_input(
    schema: Option<PathBuf>,
    swagger: Option<PathBuf>,
    api_name: &str,
) -> Result<SchemaDef, String> {
    match (schema, swagger) {
        (Some(schema_path), None) => {
            println!("📋 Loading schema from {}...", schema_path.display());
            schema::load_schema(&schema_path)
        }
        (None, Some(swagger_path)) => {
            println!("📋 Importing schema from {}...", swagger_path.display());
            schema::swagger_loader::import(&swagger_path, api_name)
        }
        (Some(_), Some(_)) => {
            Err("Supply either --schema or --swagger, not both".to_string())
        }
        (None, None) => Err("Supply a schema with --schema or --swagger".to_string()),
    }
}
