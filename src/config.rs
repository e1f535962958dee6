use anyhow::{Context, Result};
use armkit::SettleConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Get the config directory path
pub fn config_dir() -> Result<PathBuf> {
    let home = dirs::home_dir().context("Could not determine home directory")?;
    Ok(home.join(".config").join("docstack"))
}

// ============================================================================
// Top-level Config
// ============================================================================

/// Configuration loaded from a TOML file, with defaults matching the
/// standard document-intelligence stack.
///
/// Secrets never live here: the Content Understanding API key is read
/// from the `CONTENT_UNDERSTANDING_KEY` environment variable only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub deploy: DeployConfig,
    pub content: ContentConfig,
}

impl Config {
    /// Load configuration, trying in order:
    ///
    /// 1. An explicit `--config` path (missing file is an error)
    /// 2. `./docstack.toml` in the working directory
    /// 3. `~/.config/docstack/config.toml`
    /// 4. Built-in defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::read(path);
        }

        let local = PathBuf::from("docstack.toml");
        if local.exists() {
            return Self::read(&local);
        }

        let global = config_dir()?.join("config.toml");
        if global.exists() {
            return Self::read(&global);
        }

        Ok(Self::default())
    }

    fn read(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Could not read {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid config in {}", path.display()))
    }
}

// ============================================================================
// Deploy Config
// ============================================================================

/// Settings for the reconciling deployer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DeployConfig {
    /// Target resource group
    pub resource_group: String,
    /// Region for the group and for soft-delete filtering
    pub location: String,
    /// Deployment record name within the group
    pub deployment_name: String,
    /// Path to the declarative template, `~` expanded
    pub template_file: String,
    /// Account kind to match when scanning soft-deleted accounts
    pub account_kind: String,
    /// Delete all group resources before redeploying over a prior deployment
    pub wipe_on_redeploy: bool,
    /// Wall-clock budget for purges to settle, in seconds
    pub purge_settle_secs: u64,
    /// Wall-clock budget for resource deletions to settle, in seconds
    pub cleanup_settle_secs: u64,
}

impl Default for DeployConfig {
    fn default() -> Self {
        Self {
            resource_group: "rg-document-intelligence".to_string(),
            location: "westus".to_string(),
            deployment_name: "main".to_string(),
            template_file: "infra/main.bicep".to_string(),
            account_kind: "AIServices".to_string(),
            wipe_on_redeploy: true,
            purge_settle_secs: 60,
            cleanup_settle_secs: 180,
        }
    }
}

impl DeployConfig {
    /// Get expanded template path
    pub fn template_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.template_file);
        PathBuf::from(expanded.as_ref())
    }

    /// Settle budget for the purge phase
    pub fn purge_settle(&self) -> SettleConfig {
        SettleConfig::with_max_wait(Duration::from_secs(self.purge_settle_secs))
    }

    /// Settle budget for the cleanup phase
    pub fn cleanup_settle(&self) -> SettleConfig {
        SettleConfig::with_max_wait(Duration::from_secs(self.cleanup_settle_secs))
    }
}

// ============================================================================
// Content Config
// ============================================================================

/// Settings for the Content Understanding commands.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ContentConfig {
    /// Service endpoint; can also come from `CONTENT_UNDERSTANDING_ENDPOINT`
    pub endpoint: String,
    /// Directory holding extraction schema files
    pub schemas_dir: String,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            schemas_dir: "schemas".to_string(),
        }
    }
}

impl ContentConfig {
    /// Get expanded schemas directory path
    pub fn schemas_path(&self) -> PathBuf {
        let expanded = shellexpand::tilde(&self.schemas_dir);
        PathBuf::from(expanded.as_ref())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.deploy.resource_group, "rg-document-intelligence");
        assert_eq!(config.deploy.location, "westus");
        assert_eq!(config.deploy.deployment_name, "main");
        assert_eq!(config.deploy.account_kind, "AIServices");
        assert!(config.deploy.wipe_on_redeploy);
        assert_eq!(config.content.schemas_dir, "schemas");
    }

    #[test]
    fn test_load_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        fs::write(
            &path,
            r#"
[deploy]
resource_group = "rg-staging"
location = "eastus2"
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.deploy.resource_group, "rg-staging");
        assert_eq!(config.deploy.location, "eastus2");
        // Unset keys fall back to defaults
        assert_eq!(config.deploy.deployment_name, "main");
        assert!(config.deploy.wipe_on_redeploy);
    }

    #[test]
    fn test_load_explicit_path_missing_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load(Some(&dir.path().join("nope.toml")));
        assert!(result.is_err());
    }

    #[test]
    fn test_load_rejects_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "deploy = not valid").unwrap();
        assert!(Config::load(Some(&path)).is_err());
    }

    #[test]
    fn test_template_path_expands_tilde() {
        let config = DeployConfig {
            template_file: "~/infra/main.bicep".to_string(),
            ..DeployConfig::default()
        };
        let path = config.template_path();
        assert!(!path.to_string_lossy().starts_with('~'));
        assert!(path.to_string_lossy().ends_with("infra/main.bicep"));
    }

    #[test]
    fn test_template_path_plain() {
        let config = DeployConfig::default();
        assert_eq!(config.template_path(), PathBuf::from("infra/main.bicep"));
    }

    #[test]
    fn test_settle_budgets() {
        let config = DeployConfig::default();
        assert_eq!(config.purge_settle().max_wait, Duration::from_secs(60));
        assert_eq!(config.cleanup_settle().max_wait, Duration::from_secs(180));
    }
}
