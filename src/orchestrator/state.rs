/// Generation lifecycle state

use super::response::GeneratedImage;
use crate::Error;

/// Failure classes surfaced to the display layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    NoImageSource,
    TransportError,
    ServiceError,
    MalformedResponse,
    /// Local failures: encoding the sketch, bad uploads, bad prompts
    Other,
}

impl FailureKind {
    pub fn of(err: &Error) -> Self {
        match err {
            Error::NoImageSource => FailureKind::NoImageSource,
            Error::TransportError(_) => FailureKind::TransportError,
            Error::ServiceError { .. } => FailureKind::ServiceError,
            Error::MalformedResponse(_) => FailureKind::MalformedResponse,
            _ => FailureKind::Other,
        }
    }
}

/// Why the last generation failed
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    pub kind: FailureKind,
    /// Human-readable reason
    pub reason: String,
}

impl From<&Error> for Failure {
    fn from(err: &Error) -> Self {
        Self {
            kind: FailureKind::of(err),
            reason: err.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub enum GenerationState {
    #[default]
    Idle,
    Pending,
    Succeeded(GeneratedImage),
    Failed(Failure),
}

impl GenerationState {
    pub fn is_pending(&self) -> bool {
        matches!(self, GenerationState::Pending)
    }

    /// Whether the submit control should be enabled
    pub fn can_submit(&self) -> bool {
        !self.is_pending()
    }

    pub fn output(&self) -> Option<&GeneratedImage> {
        match self {
            GenerationState::Succeeded(img) => Some(img),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&Failure> {
        match self {
            GenerationState::Failed(f) => Some(f),
            _ => None,
        }
    }

    /// Short label for a submit button
    pub fn submit_label(&self) -> &'static str {
        if self.is_pending() {
            "Generating..."
        } else {
            "Generate"
        }
    }
}
