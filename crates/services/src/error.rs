//! Shared error types for the services crate.

use thiserror::Error;

use practice_core::ModelError;
use practice_core::model::TopicType;

use crate::sessions::PracticeMode;

/// Machine-readable failure category some service builds attach to error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamErrorKind {
    /// The service lacks a model credential or has exhausted its quota.
    Configuration,
    Transport,
}

impl UpstreamErrorKind {
    #[must_use]
    pub fn from_wire(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "configuration" | "config" => Some(Self::Configuration),
            "transport" => Some(Self::Transport),
            _ => None,
        }
    }
}

/// Errors emitted by `PracticeApiClient` and the collaborator traits.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PracticeApiError {
    /// Non-success status; `message` is the upstream `detail`/`message` verbatim.
    #[error("{message}")]
    Service {
        status: reqwest::StatusCode,
        message: String,
        kind: Option<UpstreamErrorKind>,
    },
    #[error("a topic id is required for {0} topics")]
    MissingTopicId(TopicType),
    #[error("request cancelled")]
    Cancelled,
    #[error(transparent)]
    Model(#[from] ModelError),
    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

impl PracticeApiError {
    /// Structured category reported by the service, if any.
    #[must_use]
    pub fn upstream_kind(&self) -> Option<UpstreamErrorKind> {
        match self {
            PracticeApiError::Service { kind, .. } => *kind,
            _ => None,
        }
    }
}

/// Errors emitted by the writing practice session.
///
/// The `Display` text of each variant is what the presentation layer shows.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionError {
    #[error("Please write your essay before submitting")]
    EmptyEssay,
    #[error("Essay is too short. Please write at least {min} words.")]
    EssayTooShort { words: usize, min: usize },
    #[error(
        "The language model service is not configured (missing API key or quota exhausted). Check the practice service setup."
    )]
    Configuration { upstream: String },
    #[error("{0}")]
    Transport(String),
    #[error("cannot submit while the session is in {mode} mode")]
    NotWriting { mode: PracticeMode },
    #[error("response arrived after the session moved on")]
    Superseded,
    #[error("request cancelled")]
    Cancelled,
}

impl SessionError {
    /// Local precondition failures that never reach the network.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, SessionError::EmptyEssay | SessionError::EssayTooShort { .. })
    }

    #[must_use]
    pub fn is_configuration(&self) -> bool {
        matches!(self, SessionError::Configuration { .. })
    }
}

/// Errors emitted by `VideoRecommendations`; terminal for the attempt.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum VideoError {
    #[error("Could not load recommended videos")]
    Fetch(#[from] PracticeApiError),
}
