// src/config.rs
use crate::errors::ConfigError;
use crate::podcast_form::DEFAULT_ARTICLE_COUNT;
use crate::podcast_request::GENERATE_PODCAST_PATH;
use clap::{Parser, Subcommand};
use log::LevelFilter;
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

pub const DEFAULT_ENDPOINT: &str = "http://localhost:8000";

/// Terminal client for an AI podcast script generator.
#[derive(Debug, Clone, Parser)]
#[command(name = "podscript", version)]
pub struct Cli {
    /// Base URL of the server exposing `POST /generate_podcast`.
    #[arg(long, global = true, default_value = DEFAULT_ENDPOINT)]
    pub endpoint: String,

    /// File receiving the log while the terminal UI is running.
    #[arg(long, global = true, default_value = "podscript.log")]
    pub log_file: PathBuf,

    #[arg(long, global = true, default_value = "info")]
    pub log_level: LevelFilter,

    /// Give up on the request after this many seconds. Unset means no limit.
    #[arg(long, global = true)]
    pub timeout_secs: Option<u64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Generate one script without the UI and print it to stdout.
    Generate {
        #[arg(long)]
        topic: String,

        #[arg(long, default_value_t = DEFAULT_ARTICLE_COUNT, allow_negative_numbers = true)]
        articles: i64,

        #[arg(long, default_value = "")]
        message: String,
    },
}

impl Cli {
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }

    pub fn generate_url(&self) -> Result<Url, ConfigError> {
        generate_url(&self.endpoint)
    }
}

/// Resolves `generate_podcast` against the server base URL.
///
/// The base is treated as a directory, so `http://host/api` and
/// `http://host/api/` both give `http://host/api/generate_podcast`.
pub fn generate_url(endpoint: &str) -> Result<Url, ConfigError> {
    let mut base = Url::parse(endpoint.trim()).map_err(|source| ConfigError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        source,
    })?;
    if !matches!(base.scheme(), "http" | "https") {
        return Err(ConfigError::UnsupportedScheme(endpoint.to_string()));
    }
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(GENERATE_PODCAST_PATH).map_err(|source| ConfigError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        source,
    })
}
