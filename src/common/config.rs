//! # Configuration Utilities
//!
//! Client configuration and the TOML loader used by the binaries.

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fs;

/// Load a TOML configuration file and deserialize it into the specified type.
///
/// # Arguments
/// - `path`: Path to the TOML configuration file
///
/// # Returns
/// - `Ok(T)`: Successfully loaded and parsed configuration
/// - `Err`: File I/O or parsing error
///
/// # Example
/// ```ignore
/// let config: ClientConfig = load_config("config/client.toml")?;
/// ```
pub fn load_config<T>(path: &str) -> Result<T>
where
    T: for<'de> Deserialize<'de>,
{
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Client configuration loaded from TOML file.
///
/// Every section and field is optional; an empty file is the default config.
///
/// # Example TOML
///
/// ```toml
/// [api]
/// base_url = "http://localhost:8000"
/// expected_dimensions = [256, 256]
///
/// [output]
/// directory = "downloads"
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub api: ApiConfig,
    pub output: OutputConfig,
}

/// Where the remote encode/decode service lives.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL, without trailing `/api/v1`
    pub base_url: String,
    /// Width and height the service expects for encode input. Only used to
    /// warn early; the service stays the authority.
    pub expected_dimensions: Option<[u32; 2]>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: "http://localhost:8000".to_string(),
            expected_dimensions: None,
        }
    }
}

/// Where downloads are written.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: ".".to_string(),
        }
    }
}
