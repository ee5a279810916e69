use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct FileConfig {
    pub db: Option<String>,
    pub bind: Option<String>,
    pub port: Option<u16>,
    pub logging_level: Option<String>,
    pub read_pool_size: Option<usize>,
    pub notls: Option<bool>,

    pub tls: Option<TlsConfig>,
}

/// `[tls]` section.
#[derive(Debug, Deserialize, Clone)]
pub struct TlsConfig {
    pub cert_path: String,
    pub key_path: String,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        toml::from_str(&content).with_context(|| format!("Failed to parse config file: {:?}", path))
    }
}
