//! Storefront configuration.
//!
//! Settings resolve in layers, later layers overriding earlier ones:
//! built-in defaults, then the user-level `settings.json`, then the
//! project's `.storefront/settings.json`, then `STOREFRONT_*`
//! environment variables.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Complete Storefront configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct StorefrontConfig {
    #[serde(default)]
    pub database: DatabaseConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub workflow: WorkflowConfig,
}

/// Database location and logging.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub path: Option<PathBuf>,
    pub log_level: String,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            path: None,
            log_level: "info".to_string(),
        }
    }
}

/// Catalog listing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Page size applied when a filter does not set a limit.
    pub default_page_size: u32,
    /// Hard cap on any requested page size.
    pub max_page_size: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

/// Developer-application workflow policy.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// When `true`, a user whose most recent application was rejected may
    /// submit a new one. When `false`, any prior application permanently
    /// blocks resubmission.
    pub allow_resubmission_after_rejection: bool,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            allow_resubmission_after_rejection: false,
        }
    }
}

/// Resolve the effective configuration for a project directory.
pub fn load_config(project_dir: Option<&Path>) -> Result<StorefrontConfig> {
    let mut config = StorefrontConfig::default();

    if let Some(global_path) = global_config_path() {
        if global_path.exists() {
            let global = load_config_file(&global_path)?;
            merge_config(&mut config, global);
        }
    }

    if let Some(dir) = project_dir {
        let project_path = dir.join(".storefront").join("settings.json");
        if project_path.exists() {
            let project = load_config_file(&project_path)?;
            merge_config(&mut config, project);
        }
    }

    // Env vars win over both files.
    apply_env_overrides(&mut config);

    Ok(config)
}

/// Platform-specific path of the user-level settings file.
pub fn global_config_path() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .ok()
            .map(|h| PathBuf::from(h).join(".storefront").join("settings.json"))
    }
    #[cfg(target_os = "macos")]
    {
        std::env::var("HOME")
            .ok()
            .map(|h| PathBuf::from(h).join("Library/Application Support/storefront/settings.json"))
    }
    #[cfg(target_os = "linux")]
    {
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| std::env::var("HOME").ok().map(|h| PathBuf::from(h).join(".config")))
            .map(|p| p.join("storefront").join("settings.json"))
    }
    #[cfg(not(any(target_os = "windows", target_os = "macos", target_os = "linux")))]
    {
        None
    }
}

fn load_config_file(path: &Path) -> Result<StorefrontConfig> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Validation(format!("Failed to read config file {}: {}", path.display(), e))
    })?;
    serde_json::from_str(&content).map_err(|e| {
        Error::Validation(format!("Failed to parse config file {}: {}", path.display(), e))
    })
}

fn merge_config(base: &mut StorefrontConfig, overlay: StorefrontConfig) {
    if overlay.database.path.is_some() {
        base.database.path = overlay.database.path;
    }
    base.database.log_level = overlay.database.log_level;
    base.catalog = overlay.catalog;
    base.workflow = overlay.workflow;
}

fn apply_env_overrides(config: &mut StorefrontConfig) {
    if let Ok(val) = std::env::var("STOREFRONT_DATABASE_PATH") {
        config.database.path = Some(PathBuf::from(val));
    }
    if let Ok(val) = std::env::var("STOREFRONT_LOG_LEVEL") {
        config.database.log_level = val;
    }
    if let Ok(val) = std::env::var("STOREFRONT_PAGE_SIZE") {
        if let Ok(n) = val.parse() {
            config.catalog.default_page_size = n;
        }
    }
    if let Ok(val) = std::env::var("STOREFRONT_ALLOW_RESUBMISSION") {
        if let Ok(b) = val.parse() {
            config.workflow.allow_resubmission_after_rejection = b;
        }
    }
}
