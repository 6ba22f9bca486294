//! Workspace configuration for rcaloop

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Configuration for a governance workspace
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Environments accepted on upload
    #[serde(default = "default_environments")]
    pub environments: Vec<String>,

    /// Minimum similarity score surfaced by recurrence detection (0.0 - 1.0)
    #[serde(default = "default_similarity_threshold")]
    pub similarity_threshold: f32,

    /// Number of matches returned by recurrence detection
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    /// Days from ingestion to the default action due date
    #[serde(default = "default_action_due_days")]
    pub action_due_days: i64,

    /// Team assigned to extracted actions by default
    #[serde(default = "default_owner_team")]
    pub default_owner_team: String,

    /// Verification method stamped on extracted actions
    #[serde(default = "default_verification")]
    pub default_verification: String,

    /// Shared secret gating uploads; unset means ungated
    #[serde(default)]
    pub upload_password: Option<String>,
}

fn default_environments() -> Vec<String> {
    vec![
        "Pre-Live".to_string(),
        "UAT".to_string(),
        "Production".to_string(),
        "Testing".to_string(),
    ]
}

fn default_similarity_threshold() -> f32 {
    0.3
}

fn default_top_k() -> usize {
    5
}

fn default_action_due_days() -> i64 {
    14
}

fn default_owner_team() -> String {
    "Tech".to_string()
}

fn default_verification() -> String {
    "Evidence link + independent verification".to_string()
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            environments: default_environments(),
            similarity_threshold: default_similarity_threshold(),
            top_k: default_top_k(),
            action_due_days: default_action_due_days(),
            default_owner_team: default_owner_team(),
            default_verification: default_verification(),
            upload_password: None,
        }
    }
}

impl AppConfig {
    /// Load configuration from the workspace or return defaults
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let config_path = root.join(".rcaloop").join("config.toml");

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)
                .with_context(|| format!("Failed to read config file: {:?}", config_path))?;
            let config: AppConfig = toml::from_str(&content)
                .with_context(|| format!("Failed to parse config file: {:?}", config_path))?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Save configuration to the workspace
    pub fn save(&self, root: &Path) -> Result<()> {
        let data_dir = root.join(".rcaloop");
        std::fs::create_dir_all(&data_dir)?;

        let config_path = data_dir.join("config.toml");
        let content = toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        std::fs::write(&config_path, content)
            .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

        Ok(())
    }

    /// Whether an environment name is on the allow-list
    pub fn is_known_environment(&self, environment: &str) -> bool {
        self.environments
            .iter()
            .any(|e| e.eq_ignore_ascii_case(environment))
    }

    /// Check a supplied password against the configured shared secret.
    /// Returns false only when a secret is set and the input doesn't match.
    pub fn upload_authorised(&self, supplied: Option<&str>) -> bool {
        match self.upload_password.as_deref() {
            None | Some("") => true,
            Some(secret) => supplied == Some(secret),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = AppConfig::default();
        assert_eq!(config.top_k, 5);
        assert_eq!(config.action_due_days, 14);
        assert!(config.is_known_environment("UAT"));
        assert!(config.is_known_environment("production"));
        assert!(!config.is_known_environment("Staging"));
    }

    #[test]
    fn test_upload_gate() {
        let mut config = AppConfig::default();
        assert!(config.upload_authorised(None));

        config.upload_password = Some("s3cret".to_string());
        assert!(config.upload_authorised(Some("s3cret")));
        assert!(!config.upload_authorised(Some("wrong")));
        assert!(!config.upload_authorised(None));

        config.upload_password = Some(String::new());
        assert!(config.upload_authorised(None));
    }

    #[test]
    fn test_save_and_reload() {
        let dir = tempfile::tempdir().unwrap();

        let mut config = AppConfig::default();
        config.top_k = 9;
        config.upload_password = Some("hunter2".to_string());
        config.save(dir.path()).unwrap();

        let loaded = AppConfig::load_or_default(dir.path()).unwrap();
        assert_eq!(loaded.top_k, 9);
        assert_eq!(loaded.upload_password.as_deref(), Some("hunter2"));
    }
}
