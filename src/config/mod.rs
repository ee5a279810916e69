mod file_config;

pub use file_config::{FileConfig, TlsConfig};

use crate::server::{RequestsLoggingLevel, ServerConfig};
use anyhow::{anyhow, bail, Context, Result};
use clap::ValueEnum;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;

pub const DEFAULT_PORT: u16 = 4001;
pub const DEFAULT_READ_POOL_SIZE: usize = 4;

/// CLI arguments that can be used for config resolution.
/// This struct mirrors the CLI arguments that can be overridden by TOML config.
#[derive(Debug, Clone)]
pub struct CliConfig {
    pub db: Option<PathBuf>,
    pub bind: IpAddr,
    pub port: u16,
    pub cert: Option<PathBuf>,
    pub key: Option<PathBuf>,
    pub notls: bool,
    pub logging_level: RequestsLoggingLevel,
    pub read_pool_size: usize,
}

impl Default for CliConfig {
    fn default() -> Self {
        CliConfig {
            db: None,
            bind: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: DEFAULT_PORT,
            cert: None,
            key: None,
            notls: false,
            logging_level: RequestsLoggingLevel::Path,
            read_pool_size: DEFAULT_READ_POOL_SIZE,
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub db_path: PathBuf,
    pub bind: IpAddr,
    pub port: u16,
    pub logging_level: RequestsLoggingLevel,
    pub read_pool_size: usize,

    /// `None` when serving plain HTTP.
    pub tls: Option<TlsSettings>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TlsSettings {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
}

impl TlsSettings {
    fn checked(cert_path: PathBuf, key_path: PathBuf) -> Result<Self> {
        if !cert_path.exists() {
            bail!("TLS certificate file not found: {:?}", cert_path);
        }
        if !key_path.exists() {
            bail!("TLS key file not found: {:?}", key_path);
        }
        Ok(TlsSettings {
            cert_path,
            key_path,
        })
    }
}

impl AppConfig {
    /// Resolve configuration from CLI arguments and optional TOML file config.
    /// TOML values override CLI values where present.
    pub fn resolve(cli: &CliConfig, file_config: Option<FileConfig>) -> Result<Self> {
        let file = file_config.unwrap_or_default();

        let db_path = file
            .db
            .map(PathBuf::from)
            .or_else(|| cli.db.clone())
            .ok_or_else(|| anyhow!("db must be specified via --db or in config file"))?;
        if !db_path.exists() {
            bail!("Database file does not exist: {:?}", db_path);
        }
        if !db_path.is_file() {
            bail!("db is not a file: {:?}", db_path);
        }

        let bind = match file.bind {
            Some(bind) => bind
                .parse::<IpAddr>()
                .with_context(|| format!("Invalid bind address: {}", bind))?,
            None => cli.bind,
        };
        let port = file.port.unwrap_or(cli.port);

        let logging_level = match file.logging_level {
            Some(level) => parse_logging_level(&level)
                .ok_or_else(|| anyhow!("Invalid logging level: {}", level))?,
            None => cli.logging_level.clone(),
        };

        let read_pool_size = file.read_pool_size.unwrap_or(cli.read_pool_size);
        if read_pool_size == 0 {
            bail!("read_pool_size must be at least 1");
        }

        // The [tls] section takes precedence over --cert/--key.
        let notls = file.notls.unwrap_or(cli.notls);
        let tls = if notls {
            None
        } else if let Some(tls_file) = file.tls {
            Some(TlsSettings::checked(
                PathBuf::from(tls_file.cert_path),
                PathBuf::from(tls_file.key_path),
            )?)
        } else {
            match (&cli.cert, &cli.key) {
                (Some(cert), Some(key)) => Some(TlsSettings::checked(cert.clone(), key.clone())?),
                (None, None) => bail!("TLS certificate and key are required unless --notls is given"),
                _ => bail!("Both --cert and --key must be provided together"),
            }
        };

        Ok(Self {
            db_path,
            bind,
            port,
            logging_level,
            read_pool_size,
            tls,
        })
    }

    pub fn server_config(&self) -> ServerConfig {
        ServerConfig {
            requests_logging_level: self.logging_level.clone(),
            bind_address: self.bind,
            port: self.port,
        }
    }
}

/// Parses a logging level string into RequestsLoggingLevel.
/// Uses clap's ValueEnum trait for parsing.
fn parse_logging_level(s: &str) -> Option<RequestsLoggingLevel> {
    RequestsLoggingLevel::from_str(s, true).ok()
}
