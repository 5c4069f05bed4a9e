//! Ordered stage runner.
//!
//! Drives the reload plan strictly in sequence. A required stage that cannot
//! be located or fails aborts the run; an optional stage whose script is
//! absent is recorded as skipped and the sequence continues. An optional
//! stage that is located but fails still aborts: the inclusion policy only
//! swallows not-found.

use crate::reload::paths::{Layer, LayerPaths};
use crate::reload::stage::{ReloadEngine, StageDescriptor, StageError, StageOutcome};
use crate::reload::trace;
use std::fmt;

/// Everything a run needs, computed once at startup and read-only thereafter.
#[derive(Debug, Clone)]
pub struct ReloadContext {
    pub branch: String,
    pub started_at: String,
    pub paths: LayerPaths,
}

impl ReloadContext {
    /// Resolve paths for a branch and stamp the run start time.
    pub fn new(storage_root: &str, scripts_root: &str, branch: &str) -> Self {
        ReloadContext {
            branch: branch.to_string(),
            started_at: trace::utc_timestamp(),
            paths: LayerPaths::resolve(storage_root, scripts_root, branch),
        }
    }

    /// The branch trace block for this run.
    pub fn trace_header(&self) -> String {
        trace::branch_header(&self.branch)
    }
}

/// Result of one attempted stage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StageResult {
    pub layer: Layer,
    pub script_path: String,
    pub outcome: StageOutcome,
}

/// Summary of a completed run
#[derive(Debug, Clone)]
pub struct ReloadReport {
    pub branch: String,
    pub started_at: String,
    pub stages: Vec<StageResult>,
}

/// Fatal run failure
#[derive(Debug)]
pub enum ReloadError {
    StageFailed { layer: Layer, source: StageError },
}

impl fmt::Display for ReloadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReloadError::StageFailed { layer, source } => {
                write!(f, "Reload aborted at stage '{}': {}", layer, source)
            }
        }
    }
}

impl std::error::Error for ReloadError {}

/// Run the plan in order against an engine.
///
/// Stage N+1 never starts before stage N has completed or been skipped.
pub fn run_stages(
    ctx: &ReloadContext,
    plan: &[StageDescriptor],
    engine: &mut dyn ReloadEngine,
) -> Result<ReloadReport, ReloadError> {
    let mut stages = Vec::with_capacity(plan.len());

    for stage in plan {
        match engine.include(stage) {
            Ok(()) => {
                tracing::info!(layer = %stage.layer, "Stage completed");
                stages.push(StageResult {
                    layer: stage.layer,
                    script_path: stage.script_path.clone(),
                    outcome: StageOutcome::Completed,
                });
            }
            Err(StageError::ScriptNotFound(path)) if !stage.required => {
                tracing::warn!(layer = %stage.layer, script = %path, "Optional stage script absent, skipping");
                stages.push(StageResult {
                    layer: stage.layer,
                    script_path: stage.script_path.clone(),
                    outcome: StageOutcome::Skipped,
                });
            }
            Err(source) => {
                tracing::error!(layer = %stage.layer, error = %source, "Stage failed, aborting reload");
                return Err(ReloadError::StageFailed {
                    layer: stage.layer,
                    source,
                });
            }
        }
    }

    Ok(ReloadReport {
        branch: ctx.branch.clone(),
        started_at: ctx.started_at.clone(),
        stages,
    })
}
