// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Configuration management for the listing editor

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main application configuration
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct AppConfig {
    /// Web server settings
    #[serde(default)]
    pub web: WebConfig,

    /// Where the authentication flag is persisted
    #[serde(default)]
    pub auth: AuthConfig,

    /// Form catalog source
    #[serde(default)]
    pub catalog: CatalogConfig,

    /// Editor page settings
    #[serde(default)]
    pub editor: EditorConfig,

    /// Photo intake settings
    #[serde(default)]
    pub photos: PhotoConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct WebConfig {
    #[serde(default = "default_web_host")]
    pub host: String,
    #[serde(default = "default_web_port")]
    pub port: u16,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AuthConfig {
    /// JSON key-value file holding the authentication flag
    #[serde(default = "default_store_path")]
    pub store_path: String,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct CatalogConfig {
    /// Optional JSON catalog replacing the built-in property form
    #[serde(default)]
    pub path: Option<String>,
    /// Reject fields with an unrecognized `type` instead of skipping them
    #[serde(default = "default_true")]
    pub strict_field_types: bool,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct EditorConfig {
    #[serde(default = "default_listing_title")]
    pub listing_title: String,
    /// Pixels left above a section when jumping to it from the sidebar
    #[serde(default = "default_scroll_offset")]
    pub scroll_offset: u32,
    /// Selection bound for multiselect fields that do not set one
    #[serde(default = "default_multiselect_max")]
    pub multiselect_default_max: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct PhotoConfig {
    /// Request body limit for photo uploads
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

// Default value functions
fn default_true() -> bool { true }
fn default_web_host() -> String { "127.0.0.1".to_string() }
fn default_web_port() -> u16 { 8080 }
fn default_store_path() -> String { "mls-editor-state.json".to_string() }
fn default_listing_title() -> String { "New Listing | 5701 Avenue G -".to_string() }
fn default_scroll_offset() -> u32 { 24 }
fn default_multiselect_max() -> usize { crate::form::DEFAULT_MAX_SELECTIONS }
fn default_max_upload_bytes() -> usize { 25 * 1024 * 1024 }

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_web_host(),
            port: default_web_port(),
        }
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            store_path: default_store_path(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: None,
            strict_field_types: true,
        }
    }
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            listing_title: default_listing_title(),
            scroll_offset: default_scroll_offset(),
            multiselect_default_max: default_multiselect_max(),
        }
    }
}

impl Default for PhotoConfig {
    fn default() -> Self {
        Self {
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> crate::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Self = serde_json::from_str(&content)
                .map_err(|e| crate::EditorError::Config(format!("Failed to parse config: {}", e)))?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::info!("Config file not found at {:?}, using defaults", path);
            Ok(Self::default())
        }
    }

    /// Save configuration to a JSON file
    pub fn save(&self, path: &Path) -> crate::Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    fn validate(&self) -> crate::Result<()> {
        if self.editor.multiselect_default_max == 0 {
            return Err(crate::EditorError::Config(
                "editor.multiselect_default_max must be at least 1".to_string(),
            ));
        }
        if self.auth.store_path.trim().is_empty() {
            return Err(crate::EditorError::Config(
                "auth.store_path must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempdir().unwrap();
        let config = AppConfig::load(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config.web.port, 8080);
        assert_eq!(config.editor.scroll_offset, 24);
        assert_eq!(config.editor.multiselect_default_max, 10);
        assert!(config.catalog.strict_field_types);
        assert!(config.catalog.path.is_none());
    }

    #[test]
    fn test_partial_file_fills_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "web": { "port": 9000 }, "catalog": { "strict_field_types": false } }"#).unwrap();

        let config = AppConfig::load(&path).unwrap();
        assert_eq!(config.web.port, 9000);
        assert_eq!(config.web.host, "127.0.0.1");
        assert!(!config.catalog.strict_field_types);
        assert_eq!(config.auth.store_path, "mls-editor-state.json");
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        let mut config = AppConfig::default();
        config.editor.listing_title = "Lot 7".to_string();
        config.save(&path).unwrap();

        let loaded = AppConfig::load(&path).unwrap();
        assert_eq!(loaded.editor.listing_title, "Lot 7");
    }

    #[test]
    fn test_rejects_zero_multiselect_bound() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{ "editor": { "multiselect_default_max": 0 } }"#).unwrap();

        let err = AppConfig::load(&path).unwrap_err();
        assert!(matches!(err, crate::EditorError::Config(_)));
    }

    #[test]
    fn test_malformed_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(AppConfig::load(&path), Err(crate::EditorError::Config(_))));
    }
}
