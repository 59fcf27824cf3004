//! Error taxonomy for the forecast pipeline.
//!
//! Every variant is recoverable: callers warn the user and keep the last
//! good model.

use std::path::PathBuf;

use thiserror::Error;

/// The city index could not be built.
#[derive(Debug, Error)]
pub enum DataLoadError {
    #[error("Failed to read city index {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("City index is not valid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("City index must be a JSON array of {{city_name, city_code}} objects")]
    NotAnArray,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("Unknown city '{city}'. Please check the spelling and try again.")]
    NotFound { city: String },
}

#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("Request to {url} failed: {source}")]
    Request {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request to {url} failed with status {status}: {body}")]
    Status { url: String, status: u16, body: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("Forecast payload is not valid JSON: {0}")]
    MalformedJson(String),

    #[error("Forecast payload is missing `{0}`")]
    MissingField(String),

    #[error("Malformed temperature in `{field}`: {text:?}")]
    MalformedTemperature { field: String, text: String },
}

/// Anything that can go wrong during one refresh cycle.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error(transparent)]
    Parse(#[from] ParseError),
}
