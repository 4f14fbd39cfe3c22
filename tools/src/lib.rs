use std::time::Duration;

use clap::Parser;
use typenv::{EnvError, EnvReader, parse_duration, with_sensitive};
use url::Url;

pub fn init_log() {
    use tracing::level_filters::LevelFilter;
    use tracing_subscriber::{
        EnvFilter, layer::SubscriberExt, util::SubscriberInitExt,
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(
            EnvFilter::builder()
                .with_default_directive(LevelFilter::INFO.into())
                .with_env_var("TYPENV_LOG")
                .from_env_lossy(),
        )
        .init();
}

/// Print the effective service settings. Every flag defaults to the
/// environment variable named in its help text.
#[derive(Parser, Debug, Default, Clone)]
#[command(version)]
pub struct Opts {
    /// Port to listen on [env: HTTP_PORT]
    #[arg(long)]
    pub port: Option<u16>,
    /// Request timeout such as 30s or 1m30s [env: REQUEST_TIMEOUT]
    #[arg(long, value_parser = parse_duration)]
    pub timeout: Option<Duration>,
    /// Upstream peers, comma separated [env: PEERS]
    #[arg(long, value_delimiter = ',')]
    pub peers: Option<Vec<Url>>,
    /// Enabled feature names [env: FEATURES]
    #[arg(long, value_delimiter = ',')]
    pub features: Option<Vec<String>>,
    /// Database connection string [env: DATABASE_URL]
    #[arg(long)]
    pub database_url: Option<Url>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub port: u16,
    pub timeout: Duration,
    pub peers: Vec<Url>,
    pub features: Vec<String>,
    pub database_url: Url,
}

impl Settings {
    /// Flags win; anything not given on the command line is read through
    /// `reader`.
    pub fn resolve(reader: &EnvReader, opts: Opts) -> Result<Self, EnvError> {
        let port = match opts.port {
            Some(port) => port,
            None => reader.parse("HTTP_PORT", 8080, &[])?,
        };
        let timeout = match opts.timeout {
            Some(timeout) => timeout,
            None => reader.parse(
                "REQUEST_TIMEOUT",
                Duration::from_secs(30),
                &[],
            )?,
        };
        let peers = match opts.peers {
            Some(peers) => peers,
            None => reader.parse("PEERS", Vec::new(), &[])?,
        };
        let features = match opts.features {
            Some(features) => features,
            None => reader.parse("FEATURES", Vec::new(), &[])?,
        };
        let database_url = match opts.database_url {
            Some(url) => url,
            None => reader.parse(
                "DATABASE_URL",
                default_database_url(),
                &[with_sensitive(true)],
            )?,
        };
        Ok(Settings {
            port,
            timeout,
            peers,
            features,
            database_url,
        })
    }
}

const DEFAULT_DATABASE_URL: &str = "postgres://localhost/app";

fn default_database_url() -> Url {
    Url::parse(DEFAULT_DATABASE_URL).expect("default database url is valid")
}
