#![forbid(unsafe_code)]

pub mod api;
pub mod config;
pub mod error;
pub mod logging;
pub mod sessions;
pub mod videos;

pub use api::{Evaluator, HealthStatus, PracticeApiClient, TopicProvider, VideoRecommender};
pub use config::PracticeApiConfig;
pub use error::{PracticeApiError, SessionError, UpstreamErrorKind, VideoError};
pub use logging::{LogFormat, LoggingConfig};
pub use sessions::{PracticeMode, PracticeSession, SessionSnapshot};
pub use videos::{FetchOutcome, VideoPanel, VideoRecommendations};
