use anyhow::{Context, Result};
use clap::Parser;
use std::net::{IpAddr, Ipv4Addr};
use std::path::PathBuf;
use tracing::{info, level_filters::LevelFilter, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use subsonic_catalog_server::config::{self, AppConfig, CliConfig, FileConfig};
use subsonic_catalog_server::{run_server, RequestsLoggingLevel, SqliteCatalogStore};

fn parse_path(s: &str) -> Result<PathBuf> {
    let path_buf = PathBuf::from(s);
    let original_path = match path_buf.canonicalize() {
        Ok(path) => path,
        Err(msg) => {
            if msg.kind() == std::io::ErrorKind::NotFound {
                path_buf
            } else {
                return Err(msg).with_context(|| format!("Error resolving path: {}", s));
            }
        }
    };
    if original_path.is_absolute() {
        return Ok(original_path);
    }
    let cwd = std::env::current_dir()?;
    Ok(cwd.join(original_path))
}

#[derive(Parser, Debug)]
struct CliArgs {
    /// Path to the SQLite library database written by the indexer.
    #[clap(long, value_parser = parse_path)]
    pub db: Option<PathBuf>,

    /// The port to listen on.
    #[clap(short, long, default_value_t = config::DEFAULT_PORT)]
    pub port: u16,

    /// The address to listen on.
    #[clap(long, default_value_t = IpAddr::V4(Ipv4Addr::UNSPECIFIED))]
    pub bind: IpAddr,

    /// PEM certificate chain for HTTPS.
    #[clap(long, value_parser = parse_path)]
    pub cert: Option<PathBuf>,

    /// PEM private key for HTTPS.
    #[clap(long, value_parser = parse_path)]
    pub key: Option<PathBuf>,

    /// Serve plain HTTP.
    #[clap(long)]
    pub notls: bool,

    /// The level of logging to perform on each request.
    #[clap(long, default_value = "path")]
    pub logging_level: RequestsLoggingLevel,

    /// Number of read-only database connections.
    #[clap(long, default_value_t = config::DEFAULT_READ_POOL_SIZE)]
    pub read_pool_size: usize,

    /// Optional TOML config file. Values found there override the flags.
    #[clap(long, value_parser = parse_path)]
    pub config: Option<PathBuf>,
}

impl CliArgs {
    fn to_cli_config(&self) -> CliConfig {
        CliConfig {
            db: self.db.clone(),
            bind: self.bind,
            port: self.port,
            cert: self.cert.clone(),
            key: self.key.clone(),
            notls: self.notls,
            logging_level: self.logging_level.clone(),
            read_pool_size: self.read_pool_size,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli_args = CliArgs::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("LOG_LEVEL")
                .from_env_lossy(),
        )
        .try_init()
        .context("Failed to initialize logging")?;

    let file_config = match &cli_args.config {
        Some(path) => {
            info!("Loading config from {:?}", path);
            Some(FileConfig::load(path)?)
        }
        None => None,
    };
    let app_config = AppConfig::resolve(&cli_args.to_cli_config(), file_config)?;

    if app_config.tls.is_none() {
        warn!("TLS disabled: credentials will travel in clear text");
    }

    info!("Opening library database at {:?}...", app_config.db_path);
    let catalog_store = SqliteCatalogStore::open(&app_config.db_path, app_config.read_pool_size)?;

    run_server(
        app_config.server_config(),
        catalog_store,
        app_config.tls.clone(),
    )
    .await
}
