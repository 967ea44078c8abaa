use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, info, warn};

use practice_core::model::{EvaluationResult, MIN_ESSAY_WORDS, TopicId, TopicType};

use super::classify::classify;
use super::state::{Generation, PracticeMode, SessionSnapshot, SessionState};
use crate::api::{Evaluator, PracticeApiClient, TopicProvider};
use crate::error::{PracticeApiError, SessionError};

const LOAD_TOPICS_FAILED: &str = "Could not load the topic list";
const SELECT_TOPIC_FAILED: &str = "Could not load the topic";
const GENERATE_TOPIC_FAILED: &str = "Could not generate a topic";
const EVALUATION_FAILED: &str = "Evaluation failed";

/// One writing practice attempt, from topic selection through scored result.
///
/// Actions take `&self` so the presentation layer can keep reading snapshots
/// while a request is pending. The state lock is never held across an await;
/// responses that arrive after the session moved on are dropped.
pub struct PracticeSession {
    topics: Arc<dyn TopicProvider>,
    evaluator: Arc<dyn Evaluator>,
    state: Mutex<SessionState>,
}

impl PracticeSession {
    #[must_use]
    pub fn new(topics: Arc<dyn TopicProvider>, evaluator: Arc<dyn Evaluator>) -> Self {
        Self {
            topics,
            evaluator,
            state: Mutex::new(SessionState::default()),
        }
    }

    /// Build a session backed by a single HTTP client for both collaborators.
    #[must_use]
    pub fn with_client(client: Arc<PracticeApiClient>) -> Self {
        let topics: Arc<dyn TopicProvider> = client.clone();
        Self::new(topics, client)
    }

    #[must_use]
    pub fn snapshot(&self) -> SessionSnapshot {
        self.state().snapshot()
    }

    #[must_use]
    pub fn mode(&self) -> PracticeMode {
        self.state().mode()
    }

    /// Populate the topic catalog. The mode never changes.
    ///
    /// # Errors
    ///
    /// Returns the classified failure, which is also stored in the snapshot.
    pub async fn load_topics(&self) -> Result<(), SessionError> {
        let generation = self.state().begin_request();
        let outcome = self.topics.list_topics().await;

        let mut state = self.state();
        state.finish_request();
        match outcome {
            Ok(catalog) => {
                debug!(
                    exam = catalog.exam.len(),
                    custom = catalog.custom.len(),
                    "topic catalog loaded"
                );
                state.apply_catalog(catalog);
                Ok(())
            }
            Err(err) => {
                let error = classify(&err, LOAD_TOPICS_FAILED);
                warn!(%error, "loading topics failed");
                if state.is_current(generation) && error != SessionError::Cancelled {
                    state.record_error(error.clone());
                }
                Err(error)
            }
        }
    }

    /// Choose which catalog partition `select_topic` draws from.
    pub fn set_topic_type(&self, topic_type: TopicType) {
        self.state().set_topic_type(topic_type);
    }

    /// Fetch a prompt of the current topic type and start writing.
    ///
    /// # Errors
    ///
    /// Returns the classified failure; the current topic and draft are kept.
    pub async fn select_topic(
        &self,
        id: Option<TopicId>,
        category: Option<String>,
    ) -> Result<(), SessionError> {
        let topic_type = self.state().topic_type();
        self.fetch_topic(topic_type, id, category, SELECT_TOPIC_FAILED)
            .await
    }

    /// Ask the model for a fresh prompt and start writing.
    ///
    /// # Errors
    ///
    /// Returns the classified failure; the current topic and draft are kept.
    pub async fn generate_topic(&self, category: Option<String>) -> Result<(), SessionError> {
        self.state().set_topic_type(TopicType::Generated);
        self.fetch_topic(TopicType::Generated, None, category, GENERATE_TOPIC_FAILED)
            .await
    }

    async fn fetch_topic(
        &self,
        topic_type: TopicType,
        id: Option<TopicId>,
        category: Option<String>,
        fallback: &str,
    ) -> Result<(), SessionError> {
        let generation = self.state().begin_topic_request();
        let outcome = self
            .topics
            .fetch_topic(topic_type, id.as_ref(), category.as_deref())
            .await;

        let mut state = self.state();
        state.finish_request();
        if !state.is_current(generation) {
            debug!(%topic_type, "discarding superseded topic response");
            return Err(SessionError::Superseded);
        }
        match outcome {
            Ok(topic) => {
                debug!(topic_id = %topic.id(), %topic_type, "topic ready, writing");
                state.apply_topic(topic);
                Ok(())
            }
            Err(err) => Err(Self::topic_failed(&mut state, &err, fallback)),
        }
    }

    fn topic_failed(
        state: &mut SessionState,
        err: &PracticeApiError,
        fallback: &str,
    ) -> SessionError {
        let error = classify(err, fallback);
        if error == SessionError::Cancelled {
            state.topic_failed(None);
        } else {
            warn!(%error, "topic request failed");
            state.topic_failed(Some(error.clone()));
        }
        error
    }

    /// Replace the draft; the word count follows.
    pub fn set_essay(&self, text: impl Into<String>) {
        self.state().set_essay(text.into());
    }

    /// Validate the draft and send it for evaluation.
    ///
    /// Validation failures never reach the network. An evaluation failure
    /// returns the session to writing with the draft preserved.
    ///
    /// # Errors
    ///
    /// Returns `SessionError::NotWriting` when the session is not drafting,
    /// a validation error, or the classified evaluation failure.
    pub async fn submit_essay(&self) -> Result<(), SessionError> {
        let (generation, topic_id, context, essay) = {
            let mut state = self.state();
            let mode = state.mode();
            if matches!(mode, PracticeMode::Evaluating | PracticeMode::Result) {
                return Err(SessionError::NotWriting { mode });
            }

            let topic = state
                .current_topic()
                .map(|topic| (topic.id().clone(), topic.context().to_string()));
            let Some((topic_id, context)) = topic.filter(|_| !state.essay().is_blank()) else {
                state.record_error(SessionError::EmptyEssay);
                return Err(SessionError::EmptyEssay);
            };
            if !state.essay().meets_minimum() {
                let error = SessionError::EssayTooShort {
                    words: state.essay().word_count(),
                    min: MIN_ESSAY_WORDS,
                };
                state.record_error(error.clone());
                return Err(error);
            }

            let essay = state.essay().text().to_string();
            let generation = state.start_evaluation();
            (generation, topic_id, context, essay)
        };

        debug!(%topic_id, "submitting essay");
        let outcome = self.evaluator.evaluate(&topic_id, &context, &essay).await;
        self.finish_evaluation(generation, outcome)
    }

    fn finish_evaluation(
        &self,
        generation: Generation,
        outcome: Result<EvaluationResult, PracticeApiError>,
    ) -> Result<(), SessionError> {
        let mut state = self.state();
        state.finish_request();
        if !state.is_current(generation) {
            debug!("discarding superseded evaluation");
            return Err(SessionError::Superseded);
        }
        match outcome {
            Ok(evaluation) => {
                info!(
                    topic_id = %evaluation.topic_id(),
                    overall = evaluation.scores().overall,
                    weaknesses = evaluation.weaknesses().len(),
                    "essay evaluated"
                );
                state.apply_evaluation(evaluation);
                Ok(())
            }
            Err(err) => {
                let error = classify(&err, EVALUATION_FAILED);
                if error == SessionError::Cancelled {
                    state.evaluation_failed(None);
                } else {
                    warn!(%error, "evaluation failed");
                    state.evaluation_failed(Some(error.clone()));
                }
                Err(error)
            }
        }
    }

    /// Abandon the attempt and return to topic selection.
    pub fn reset(&self) {
        debug!("session reset");
        self.state().reset();
    }

    /// Start over with a different prompt.
    pub fn try_another(&self) {
        debug!("trying another topic");
        self.state().reset();
    }

    fn state(&self) -> MutexGuard<'_, SessionState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for PracticeSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PracticeSession")
            .field("state", &*self.state())
            .finish_non_exhaustive()
    }
}
