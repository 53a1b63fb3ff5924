// src/event.rs
use crate::errors::GenerateError;
use crate::podcast_request::GeneratePodcastRequest;

/// Things that happen to the app from outside the keyboard.
#[derive(Debug)]
pub enum AppEvent {
    /// The outstanding generation request resolved.
    ScriptGenerated(Result<String, GenerateError>),
}

/// Work the app asks the run loop to perform on its behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitRequest(GeneratePodcastRequest),
}
