// src/podcast_form.rs
use crate::errors::GenerateError;
use crate::podcast_request::GeneratePodcastRequest;
use log::{error, info, warn};

pub const DEFAULT_ARTICLE_COUNT: i64 = 3;
/// Bounds of the article count control. Only the spinner respects them;
/// typed values and `set_article_count` pass through untouched.
pub const MIN_ARTICLE_COUNT: i64 = 1;
pub const MAX_ARTICLE_COUNT: i64 = 5;

/// Lifecycle of the one request this form may have in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RequestPhase {
    #[default]
    Idle,
    Requesting,
    Succeeded,
    Failed,
}

/// Local state of the podcast generator form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PodcastForm {
    topic: String,
    article_count: Option<i64>,
    listener_message: String,
    script: Option<String>,
    phase: RequestPhase,
}

impl Default for PodcastForm {
    fn default() -> Self {
        Self {
            topic: String::new(),
            article_count: Some(DEFAULT_ARTICLE_COUNT),
            listener_message: String::new(),
            script: None,
            phase: RequestPhase::Idle,
        }
    }
}

impl PodcastForm {
    pub fn new() -> Self {
        Self::default()
    }

    // ===================================== Field edits ===========================================

    pub fn set_topic(&mut self, topic: impl Into<String>) {
        self.topic = topic.into();
    }

    pub fn set_article_count(&mut self, count: Option<i64>) {
        self.article_count = count;
    }

    pub fn set_listener_message(&mut self, message: impl Into<String>) {
        self.listener_message = message.into();
    }

    // ================================== Request lifecycle ========================================

    /// Starts a generation if none is outstanding.
    ///
    /// Returns the request to send, or `None` when the submit control is
    /// disabled because a previous request has not resolved yet.
    pub fn begin_generate(&mut self) -> Option<GeneratePodcastRequest> {
        if self.is_loading() {
            warn!("PodcastForm: generate ignored, a request is already outstanding");
            return None;
        }
        self.phase = RequestPhase::Requesting;
        let request =
            GeneratePodcastRequest::new(&self.topic, self.article_count, &self.listener_message);
        info!(
            "PodcastForm: requesting script (topic_len={}, num_articles={:?}, message_len={})",
            request.topic.chars().count(),
            request.num_articles,
            request.listener_message.chars().count()
        );
        Some(request)
    }

    /// Resolves the outstanding request. A failure leaves the previous script in place.
    pub fn finish_generate(&mut self, result: Result<String, GenerateError>) -> RequestPhase {
        if !self.is_loading() {
            warn!("PodcastForm: completion received with no outstanding request, ignoring");
            return self.phase;
        }
        self.phase = match result {
            Ok(script) => {
                info!("PodcastForm: script received, length: {}", script.len());
                self.script = Some(script);
                RequestPhase::Succeeded
            }
            Err(e) => {
                error!("Error generating podcast: {}", e);
                RequestPhase::Failed
            }
        };
        self.phase
    }

    // ======================================== Getters ============================================

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn article_count(&self) -> Option<i64> {
        self.article_count
    }

    pub fn listener_message(&self) -> &str {
        &self.listener_message
    }

    pub fn script(&self) -> Option<&str> {
        self.script.as_deref()
    }

    pub fn phase(&self) -> RequestPhase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == RequestPhase::Requesting
    }
}
