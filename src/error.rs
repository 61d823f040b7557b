//! Error types for Gaitflux

use thiserror::Error;

/// Errors that can occur while extracting features
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("Missing required channel {}{}", .channel, window_suffix(.window_id))]
    MissingChannel {
        channel: String,
        window_id: Option<u64>,
    },

    #[error("Unknown channel {0}")]
    UnknownChannel(String),

    #[error("Channel {channel} is not numeric: {value}")]
    InvalidChannelValue { channel: String, value: String },

    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    #[error("Reading {index} is earlier than its predecessor")]
    UnorderedStream { index: usize },

    #[error("Unsupported fill method: {0}")]
    UnsupportedFillMethod(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid JSON: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Encoding error: {0}")]
    EncodingError(String),
}

fn window_suffix(window_id: &Option<u64>) -> String {
    match window_id {
        Some(id) => format!(" in window {id}"),
        None => String::new(),
    }
}
