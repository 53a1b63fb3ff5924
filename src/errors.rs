// errors.rs
use std::path::PathBuf;
use thiserror::Error;

/// Everything that can go wrong between pressing "generate" and holding a script.
///
/// The user only ever sees one generic alert for any of these; the variants
/// exist for the diagnostic log line.
#[derive(Error, Debug)]
pub enum GenerateError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server responded with status {0}")]
    HttpStatus(u16),

    #[error("Malformed response: {0}")]
    MalformedResponse(String),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid endpoint '{endpoint}': {source}")]
    InvalidEndpoint {
        endpoint: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Endpoint must be an http(s) URL: {0}")]
    UnsupportedScheme(String),

    #[error("Failed to open log file '{path}': {source}")]
    LogFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to install logger: {0}")]
    Logger(#[from] log::SetLoggerError),

    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[source] reqwest::Error),
}
