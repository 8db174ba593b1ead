//! Error types for the sketch surface and the generation orchestrator

use thiserror::Error;

/// Result type alias for scribblegen operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while drawing or generating
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Neither an uploaded image nor a non-blank sketch is available
    #[error("No image available: upload a file or draw something first")]
    NoImageSource,

    /// The prompt was empty or only whitespace
    #[error("Prompt must not be empty")]
    EmptyPrompt,

    /// A generation request is already in flight
    #[error("A generation request is already pending")]
    AlreadyPending,

    /// The uploaded bytes are not a recognised raster image
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// The outbound call could not complete
    #[error("Network error: {0}")]
    TransportError(String),

    /// The service answered with a failure
    #[error("Service error (status {status}): {message}")]
    ServiceError { status: u16, message: String },

    /// The service answered with something we cannot interpret
    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    /// Failed to rasterize or encode the surface
    #[error("Rendering failed: {0}")]
    RenderError(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    ConfigError(String),

    /// The studio event loop is gone
    #[error("Studio closed: {0}")]
    Closed(String),
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::MalformedResponse(format!("reply is not JSON ({})", err))
    }
}
