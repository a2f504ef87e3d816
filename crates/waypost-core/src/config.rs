//! Configuration for Waypost components
//!
//! This module provides configuration for the outbound webhook dispatcher
//! and the document upload helper, loaded from `waypost.toml` next to the
//! host application.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::Result;

/// Top-level Waypost configuration
///
/// Loaded from `waypost.toml` in the given root directory.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WaypostConfig {
    /// Outbound task notification settings
    #[serde(default)]
    pub dispatch: DispatchConfig,

    /// Document upload settings
    #[serde(default)]
    pub upload: UploadConfig,
}

/// Settings for the outbound task notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    /// Webhook endpoint that receives task-start notifications
    #[serde(default = "default_webhook_url")]
    pub webhook_url: String,

    /// Timeout for a single outbound request, in seconds
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

/// Settings for the single-shot document upload helper
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UploadConfig {
    /// Document upload endpoint
    #[serde(default = "default_upload_url")]
    pub upload_url: String,
}

// Default value providers
fn default_webhook_url() -> String {
    "https://localhost:44301/api/services/app/Webhook/HandleRunTaskWebhook".to_string()
}

fn default_request_timeout_secs() -> u64 {
    30
}

fn default_upload_url() -> String {
    "http://localhost:8880/api/v4/documents/upload/".to_string()
}

impl WaypostConfig {
    /// Load configuration from `waypost.toml` or use defaults
    pub fn load_or_default(root: &Path) -> Result<Self> {
        let config_path = root.join("waypost.toml");

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            Ok(toml::from_str(&content).map_err(|e| {
                crate::WaypostError::Config(format!("Failed to parse config file: {}", e))
            })?)
        } else {
            Ok(Self::default())
        }
    }

    /// Write default configuration to `waypost.toml`
    pub fn write_default(root: &Path) -> Result<()> {
        let config_path = root.join("waypost.toml");
        let config = Self::default();
        let content = toml::to_string_pretty(&config)
            .map_err(|e| crate::WaypostError::Config(format!("Failed to serialize config: {}", e)))?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            webhook_url: default_webhook_url(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            upload_url: default_upload_url(),
        }
    }
}
