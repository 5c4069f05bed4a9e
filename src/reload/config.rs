//! Run configuration for the layered reload.
//!
//! Loaded from `layercake.yaml`. The branch identifier can come from three
//! places; resolution precedence is CLI flag > `LAYERCAKE_BRANCH` environment
//! variable > config file.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Wrapper for the `reload:` top-level key in layercake.yaml
#[derive(Debug, Deserialize)]
struct ConfigFile {
    reload: ReloadConfig,
}

/// Reload run configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ReloadConfig {
    /// Branch identifier; usually supplied by the environment instead
    #[serde(default)]
    pub branch: Option<String>,

    /// Root under which the branch-scoped QVD layers live
    #[serde(default = "default_storage_root")]
    pub storage_root: String,

    /// Root under which the branch-scoped stage scripts live
    #[serde(default = "default_scripts_root")]
    pub scripts_root: String,

    /// Host command that executes a stage script; absent means plan mode
    #[serde(default)]
    pub engine: Option<EngineConfig>,
}

/// External reload engine invocation
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EngineConfig {
    pub command: String,
    #[serde(default)]
    pub args: Vec<String>,
}

fn default_storage_root() -> String {
    "lib://DataFiles".to_string()
}

fn default_scripts_root() -> String {
    "lib://Scripts".to_string()
}

impl Default for ReloadConfig {
    fn default() -> Self {
        ReloadConfig {
            branch: None,
            storage_root: default_storage_root(),
            scripts_root: default_scripts_root(),
            engine: None,
        }
    }
}

impl ReloadConfig {
    /// Load reload configuration from layercake.yaml
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, String> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| format!("Failed to read {}: {}", path.as_ref().display(), e))?;

        let config: ConfigFile = serde_yaml::from_str(&contents)
            .map_err(|e| format!("Failed to parse {}: {}", path.as_ref().display(), e))?;

        Ok(config.reload)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), String> {
        if self.storage_root.is_empty() {
            return Err("storage_root cannot be empty".to_string());
        }

        if self.scripts_root.is_empty() {
            return Err("scripts_root cannot be empty".to_string());
        }

        if let Some(ref engine) = self.engine {
            if engine.command.is_empty() {
                return Err("engine.command cannot be empty".to_string());
            }
        }

        Ok(())
    }
}

/// Determine the branch identifier with precedence: CLI > ENV > config file
pub fn resolve_branch(
    cli_override: Option<String>,
    config: &ReloadConfig,
) -> Result<String, String> {
    // 1. CLI flag (highest priority)
    if let Some(branch) = cli_override {
        if !branch.is_empty() {
            return Ok(branch);
        }
        return Err("Branch supplied via --branch is empty".to_string());
    }

    // 2. Environment variable LAYERCAKE_BRANCH
    if let Ok(branch) = std::env::var("LAYERCAKE_BRANCH") {
        if !branch.is_empty() {
            return Ok(branch);
        }
    }

    // 3. Config file reload.branch
    if let Some(ref branch) = config.branch {
        if !branch.is_empty() {
            return Ok(branch.clone());
        }
    }

    Err(
        "No branch identifier found. Supply --branch, set LAYERCAKE_BRANCH, \
         or set reload.branch in layercake.yaml"
            .to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_config() {
        let yaml = r#"
reload:
  branch: main
  storage_root: "lib://DataFiles"
  scripts_root: "lib://Scripts"
  engine:
    command: qvs-runner
    args: ["--quiet"]
"#;
        let config: ConfigFile = serde_yaml::from_str(yaml).unwrap();
        let reload = config.reload;

        assert_eq!(reload.branch.as_deref(), Some("main"));
        assert_eq!(reload.storage_root, "lib://DataFiles");
        let engine = reload.engine.unwrap();
        assert_eq!(engine.command, "qvs-runner");
        assert_eq!(engine.args, vec!["--quiet"]);
    }

    #[test]
    fn test_parse_minimal_config_uses_defaults() {
        let yaml = "reload: {}";
        let config: ConfigFile = serde_yaml::from_str(yaml).unwrap();
        let reload = config.reload;

        assert!(reload.branch.is_none());
        assert_eq!(reload.storage_root, "lib://DataFiles");
        assert_eq!(reload.scripts_root, "lib://Scripts");
        assert!(reload.engine.is_none());
    }

    #[test]
    fn test_validate_rejects_empty_roots() {
        let config = ReloadConfig {
            storage_root: "".to_string(),
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_engine_command() {
        let config = ReloadConfig {
            engine: Some(EngineConfig {
                command: "".to_string(),
                args: vec![],
            }),
            ..Default::default()
        };

        assert!(config.validate().is_err());
    }

    #[test]
    fn test_resolve_branch_cli_wins() {
        let config = ReloadConfig {
            branch: Some("from-config".to_string()),
            ..Default::default()
        };

        let branch = resolve_branch(Some("from-cli".to_string()), &config).unwrap();
        assert_eq!(branch, "from-cli");
    }

    #[test]
    fn test_resolve_branch_falls_back_to_config() {
        let config = ReloadConfig {
            branch: Some("from-config".to_string()),
            ..Default::default()
        };

        let branch = resolve_branch(None, &config).unwrap();
        assert_eq!(branch, "from-config");
    }

    #[test]
    fn test_resolve_branch_errors_when_absent() {
        let config = ReloadConfig::default();

        assert!(resolve_branch(None, &config).is_err());
    }

    #[test]
    fn test_resolve_branch_rejects_empty_cli_value() {
        let config = ReloadConfig::default();

        assert!(resolve_branch(Some("".to_string()), &config).is_err());
    }
}
