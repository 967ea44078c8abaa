use std::fmt;

use practice_core::model::{Essay, EvaluationResult, Topic, TopicCatalog, TopicType};

use crate::error::SessionError;

//
// ─── MODE ──────────────────────────────────────────────────────────────────────
//

/// Where a practice attempt currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PracticeMode {
    #[default]
    TopicSelect,
    Writing,
    Evaluating,
    Result,
}

impl PracticeMode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            PracticeMode::TopicSelect => "topic-select",
            PracticeMode::Writing => "writing",
            PracticeMode::Evaluating => "evaluating",
            PracticeMode::Result => "result",
        }
    }
}

impl fmt::Display for PracticeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

//
// ─── SNAPSHOT ──────────────────────────────────────────────────────────────────
//

/// Read-only view of a session handed to the presentation layer.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub mode: PracticeMode,
    pub topics: Option<TopicCatalog>,
    pub topic_type: TopicType,
    pub current_topic: Option<Topic>,
    pub essay: String,
    pub evaluation: Option<EvaluationResult>,
    pub is_loading: bool,
    pub error: Option<SessionError>,
    pub word_count: usize,
}

impl SessionSnapshot {
    /// The one human-readable error line, if any.
    #[must_use]
    pub fn error_message(&self) -> Option<String> {
        self.error.as_ref().map(ToString::to_string)
    }
}

//
// ─── AUTHORITATIVE STATE ───────────────────────────────────────────────────────
//

/// Marker captured when a request starts; a response is applied only while
/// the session is still on the same generation.
pub(super) type Generation = u64;

/// The single source of truth for a session, mutated only through the
/// transition methods below.
#[derive(Debug, Default)]
pub(super) struct SessionState {
    mode: PracticeMode,
    topics: Option<TopicCatalog>,
    topic_type: TopicType,
    current_topic: Option<Topic>,
    essay: Essay,
    evaluation: Option<EvaluationResult>,
    error: Option<SessionError>,
    in_flight: usize,
    generation: Generation,
}

impl SessionState {
    pub fn mode(&self) -> PracticeMode {
        self.mode
    }

    pub fn topic_type(&self) -> TopicType {
        self.topic_type
    }

    pub fn current_topic(&self) -> Option<&Topic> {
        self.current_topic.as_ref()
    }

    pub fn essay(&self) -> &Essay {
        &self.essay
    }

    pub fn is_current(&self, generation: Generation) -> bool {
        self.generation == generation
    }

    /// Register a request that does not supersede anything (catalog loads).
    pub fn begin_request(&mut self) -> Generation {
        self.in_flight += 1;
        self.error = None;
        self.generation
    }

    /// Register a topic request; it supersedes every response still in flight.
    pub fn begin_topic_request(&mut self) -> Generation {
        self.generation += 1;
        self.begin_request()
    }

    pub fn finish_request(&mut self) {
        self.in_flight = self.in_flight.saturating_sub(1);
    }

    pub fn set_topic_type(&mut self, topic_type: TopicType) {
        self.topic_type = topic_type;
    }

    pub fn apply_catalog(&mut self, catalog: TopicCatalog) {
        self.topics = Some(catalog);
    }

    pub fn record_error(&mut self, error: SessionError) {
        self.error = Some(error);
    }

    pub fn apply_topic(&mut self, topic: Topic) {
        self.generation += 1;
        self.mode = PracticeMode::Writing;
        self.current_topic = Some(topic);
        self.essay = Essay::default();
        self.evaluation = None;
        self.error = None;
    }

    /// A failed topic request keeps the current topic and draft. An evaluation
    /// it superseded will never land, so that attempt goes back to writing.
    pub fn topic_failed(&mut self, error: Option<SessionError>) {
        if self.mode == PracticeMode::Evaluating {
            self.mode = PracticeMode::Writing;
        }
        self.error = error;
    }

    pub fn set_essay(&mut self, text: String) {
        self.essay = Essay::new(text);
    }

    pub fn start_evaluation(&mut self) -> Generation {
        self.mode = PracticeMode::Evaluating;
        self.begin_request()
    }

    pub fn apply_evaluation(&mut self, evaluation: EvaluationResult) {
        self.evaluation = Some(evaluation);
        self.mode = PracticeMode::Result;
        self.error = None;
    }

    /// Back to drafting with the essay intact.
    pub fn evaluation_failed(&mut self, error: Option<SessionError>) {
        self.mode = PracticeMode::Writing;
        self.evaluation = None;
        self.error = error;
    }

    pub fn reset(&mut self) {
        self.generation += 1;
        self.clear_attempt();
        self.error = None;
    }

    fn clear_attempt(&mut self) {
        self.mode = PracticeMode::TopicSelect;
        self.current_topic = None;
        self.essay = Essay::default();
        self.evaluation = None;
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            mode: self.mode,
            topics: self.topics.clone(),
            topic_type: self.topic_type,
            current_topic: self.current_topic.clone(),
            essay: self.essay.text().to_string(),
            evaluation: self.evaluation.clone(),
            is_loading: self.in_flight > 0,
            error: self.error.clone(),
            word_count: self.essay.word_count(),
        }
    }
}
