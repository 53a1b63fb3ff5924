// src/lib.rs
pub mod app;
pub mod config;
pub mod errors;
pub mod event;
pub mod headless;
pub mod logging;
pub mod podcast_form;
pub mod podcast_request;
pub mod script_generator;
pub mod ui;

pub mod widgets;
