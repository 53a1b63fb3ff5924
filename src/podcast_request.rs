// src/podcast_request.rs
use serde::{Deserialize, Serialize};

/// Path of the generation endpoint, relative to the configured server.
pub const GENERATE_PODCAST_PATH: &str = "generate_podcast";

// === WIRE STRUCTURES ===

/// Body of `POST /generate_podcast`.
///
/// `num_articles` is `None` when the count field held something that is not
/// an integer; it goes out as JSON `null` and the server decides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratePodcastRequest {
    pub topic: String,
    pub num_articles: Option<i64>,
    pub listener_message: String,
}

impl GeneratePodcastRequest {
    pub fn new(topic: &str, num_articles: Option<i64>, listener_message: &str) -> Self {
        Self {
            topic: topic.to_string(),
            num_articles,
            listener_message: listener_message.to_string(),
        }
    }
}

/// Success body. Extra fields from the server are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratePodcastResponse {
    pub script: String,
}
