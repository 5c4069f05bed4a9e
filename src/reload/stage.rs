//! Stage descriptors and reload engines.
//!
//! A stage is one externally defined transformation script, addressed by a
//! branch-scoped path and marked mandatory or optional. The `ReloadEngine`
//! trait is the seam to the host platform: the runner decides policy, the
//! engine locates and executes scripts.

use crate::reload::paths::{Layer, LayerPaths};
use std::fmt;
use std::path::Path;
use std::process::Command;

/// One entry in the ordered reload plan
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageDescriptor {
    pub layer: Layer,
    pub script_path: String,
    pub required: bool,
}

/// How a single stage ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StageOutcome {
    Completed,
    Skipped,
}

/// Failure modes reported by an engine
#[derive(Debug)]
pub enum StageError {
    ScriptNotFound(String),
    Failed { layer: Layer, reason: String },
}

impl fmt::Display for StageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StageError::ScriptNotFound(path) => {
                write!(f, "Stage script not found: {}", path)
            }
            StageError::Failed { layer, reason } => {
                write!(f, "Stage '{}' failed: {}", layer, reason)
            }
        }
    }
}

impl std::error::Error for StageError {}

/// Capability interface to the host platform's reload engine.
///
/// Implementations locate the stage script and execute it. Missing scripts
/// are reported as `ScriptNotFound` so the runner can apply the
/// mandatory/optional policy; any other failure is `Failed`.
pub trait ReloadEngine {
    fn include(&mut self, stage: &StageDescriptor) -> Result<(), StageError>;
}

/// Build the reload plan for a resolved set of paths.
///
/// The order is fixed: system, then business, then requirements. The system
/// layer is the only required stage.
pub fn stage_plan(paths: &LayerPaths) -> Vec<StageDescriptor> {
    Layer::ALL
        .iter()
        .map(|&layer| StageDescriptor {
            layer,
            script_path: paths.script_path(layer),
            required: layer == Layer::System,
        })
        .collect()
}

/// Engine that hands each located script to a configured host command.
pub struct CommandEngine {
    command: String,
    args: Vec<String>,
}

impl CommandEngine {
    pub fn new(command: String, args: Vec<String>) -> Self {
        CommandEngine { command, args }
    }
}

impl ReloadEngine for CommandEngine {
    fn include(&mut self, stage: &StageDescriptor) -> Result<(), StageError> {
        if !Path::new(&stage.script_path).exists() {
            return Err(StageError::ScriptNotFound(stage.script_path.clone()));
        }

        tracing::info!(layer = %stage.layer, script = %stage.script_path, "Executing stage script");

        let output = Command::new(&self.command)
            .args(&self.args)
            .arg(&stage.script_path)
            .output()
            .map_err(|e| StageError::Failed {
                layer: stage.layer,
                reason: format!("Failed to run {}: {}", self.command, e),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(StageError::Failed {
                layer: stage.layer,
                reason: format!("{} exited with {}:\n{}", self.command, output.status, stderr),
            });
        }

        Ok(())
    }
}

/// Engine that only verifies script presence, executing nothing.
///
/// Used when no engine command is configured, and under `--plan`.
pub struct PlanEngine;

impl ReloadEngine for PlanEngine {
    fn include(&mut self, stage: &StageDescriptor) -> Result<(), StageError> {
        if !Path::new(&stage.script_path).exists() {
            return Err(StageError::ScriptNotFound(stage.script_path.clone()));
        }

        tracing::info!(layer = %stage.layer, script = %stage.script_path, "Stage script located");

        Ok(())
    }
}
