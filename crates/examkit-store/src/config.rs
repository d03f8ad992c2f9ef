//! Store configuration and factory.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use examkit_core::traits::ContentStore;

use crate::file::FileStore;
use crate::http::HttpStore;
use crate::mock::MockStore;

/// Configuration for a single content store.
///
/// Note: Custom Debug impl masks API tokens to prevent accidental exposure
/// in logs.
#[derive(Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StoreConfig {
    Http {
        base_url: String,
        #[serde(default)]
        api_token: Option<String>,
    },
    File {
        root: PathBuf,
    },
    Mock,
}

impl std::fmt::Debug for StoreConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StoreConfig::Http {
                api_token: _,
                base_url,
            } => f
                .debug_struct("Http")
                .field("base_url", base_url)
                .field("api_token", &"***")
                .finish(),
            StoreConfig::File { root } => f.debug_struct("File").field("root", root).finish(),
            StoreConfig::Mock => f.debug_struct("Mock").finish(),
        }
    }
}

/// Top-level examkit configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExamkitConfig {
    /// Store configurations keyed by name.
    #[serde(default)]
    pub stores: HashMap<String, StoreConfig>,
    /// Default store to use.
    #[serde(default = "default_store")]
    pub default_store: String,
}

fn default_store() -> String {
    "file".to_string()
}

impl Default for ExamkitConfig {
    fn default() -> Self {
        let mut stores = HashMap::new();
        stores.insert(
            "file".to_string(),
            StoreConfig::File {
                root: PathBuf::from("."),
            },
        );
        Self {
            stores,
            default_store: default_store(),
        }
    }
}

/// Load configuration from `examkit.toml` in the working directory, or from
/// an explicit path. A missing default file yields the default config.
pub fn load_config(path: Option<&Path>) -> Result<ExamkitConfig> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let default = PathBuf::from("examkit.toml");
            if !default.exists() {
                return Ok(ExamkitConfig::default());
            }
            default
        }
    };

    let content = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config: {}", path.display()))?;
    let config: ExamkitConfig = toml::from_str(&content)
        .with_context(|| format!("failed to parse config: {}", path.display()))?;
    Ok(config)
}

/// Instantiate a store from its configuration.
pub fn create_store(config: &StoreConfig) -> Arc<dyn ContentStore> {
    match config {
        StoreConfig::Http {
            base_url,
            api_token,
        } => Arc::new(HttpStore::new(base_url, api_token.clone())),
        StoreConfig::File { root } => Arc::new(FileStore::new(root.clone())),
        StoreConfig::Mock => Arc::new(MockStore::new()),
    }
}
