// src/script_generator.rs
use crate::errors::{ConfigError, GenerateError};
use crate::podcast_request::{GeneratePodcastRequest, GeneratePodcastResponse};
use async_trait::async_trait;
use log::{debug, info};
use reqwest::{Client, Response};
use std::sync::Mutex;
use std::time::Duration;
use url::Url;

// ===== generator
#[async_trait]
pub trait ScriptGenerator: Send + Sync {
    /// Sends one request and returns the script text. Never retries.
    async fn generate(&self, request: &GeneratePodcastRequest) -> Result<String, GenerateError>;
}

// ===== Live http generator
pub struct HttpScriptGenerator {
    client: Client,
    endpoint: Url,
}

impl HttpScriptGenerator {
    /// `endpoint` is the full URL of `generate_podcast`. With `timeout` unset
    /// the request waits as long as the transport lets it.
    pub fn new(endpoint: Url, timeout: Option<Duration>) -> Result<Self, ConfigError> {
        const APP_USER_AGENT: &str = concat!("podscript/", env!("CARGO_PKG_VERSION"));

        let mut builder = reqwest::Client::builder().user_agent(APP_USER_AGENT);
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let client: Client = builder.build().map_err(ConfigError::HttpClient)?;

        Ok(Self { client, endpoint })
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }
}

#[async_trait]
impl ScriptGenerator for HttpScriptGenerator {
    async fn generate(&self, request: &GeneratePodcastRequest) -> Result<String, GenerateError> {
        info!("HttpScriptGenerator: POST {}", self.endpoint);
        let response: Response =
            self.client.post(self.endpoint.clone()).json(request).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerateError::HttpStatus(status.as_u16()));
        }

        let body: String = response.text().await?;
        debug!("HttpScriptGenerator: response body length: {}", body.len());
        let parsed: GeneratePodcastResponse = serde_json::from_str(&body)
            .map_err(|e| GenerateError::MalformedResponse(e.to_string()))?;
        Ok(parsed.script)
    }
}

// ===== Fake generator for testing
/// Answers every request with `script`, or with HTTP 500 when `script` is `None`,
/// and remembers what it was asked.
#[derive(Default)]
pub struct FakeGenerator {
    pub script: Option<String>,
    pub received: Mutex<Vec<GeneratePodcastRequest>>,
}

impl FakeGenerator {
    pub fn with_script(script: &str) -> Self {
        Self { script: Some(script.to_string()), received: Mutex::new(Vec::new()) }
    }

    pub fn failing() -> Self {
        Self::default()
    }

    pub fn received(&self) -> Vec<GeneratePodcastRequest> {
        self.received.lock().map(|r| r.clone()).unwrap_or_default()
    }
}

#[async_trait]
impl ScriptGenerator for FakeGenerator {
    async fn generate(&self, request: &GeneratePodcastRequest) -> Result<String, GenerateError> {
        if let Ok(mut received) = self.received.lock() {
            received.push(request.clone());
        }
        self.script.clone().ok_or(GenerateError::HttpStatus(500))
    }
}
