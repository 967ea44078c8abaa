use crate::error::{PracticeApiError, SessionError, UpstreamErrorKind};

/// Fragments of upstream messages that mean the model backend is not set up.
const CONFIGURATION_MARKERS: [&str; 3] = ["No Groq", "API key", "quota"];

/// Map a collaborator failure onto the session error taxonomy.
///
/// A structured `error_kind` wins over message sniffing. `fallback` replaces
/// an empty upstream message.
pub(super) fn classify(error: &PracticeApiError, fallback: &str) -> SessionError {
    if matches!(error, PracticeApiError::Cancelled) {
        return SessionError::Cancelled;
    }

    let message = error.to_string();
    let message = if message.trim().is_empty() {
        fallback.to_string()
    } else {
        message
    };

    let is_configuration = match error.upstream_kind() {
        Some(kind) => kind == UpstreamErrorKind::Configuration,
        None => CONFIGURATION_MARKERS
            .iter()
            .any(|marker| message.contains(marker)),
    };

    if is_configuration {
        SessionError::Configuration { upstream: message }
    } else {
        SessionError::Transport(message)
    }
}
