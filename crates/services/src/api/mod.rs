//! Collaborator contracts for the practice session and their HTTP implementation.

mod client;
mod wire;

use async_trait::async_trait;

use practice_core::model::{
    EvaluationResult, Topic, TopicCatalog, TopicId, TopicType, Video, VideoQuery,
};

use crate::error::PracticeApiError;

pub use client::PracticeApiClient;
pub use wire::HealthStatus;

/// Source of practice prompts.
#[async_trait]
pub trait TopicProvider: Send + Sync {
    /// Fetch the selectable catalog, partitioned by type.
    ///
    /// # Errors
    ///
    /// Returns `PracticeApiError` with the upstream message on failure.
    async fn list_topics(&self) -> Result<TopicCatalog, PracticeApiError>;

    /// Fetch a single prompt.
    ///
    /// `id` is required for exam and custom lookups; `category` is a hint.
    /// Generated prompts are never cached, so repeated calls may differ.
    ///
    /// # Errors
    ///
    /// Returns `PracticeApiError` with the upstream message on failure.
    async fn fetch_topic(
        &self,
        topic_type: TopicType,
        id: Option<&TopicId>,
        category: Option<&str>,
    ) -> Result<Topic, PracticeApiError>;
}

/// Scores a drafted response. Stateless, so safe to retry.
#[async_trait]
pub trait Evaluator: Send + Sync {
    /// # Errors
    ///
    /// Returns `PracticeApiError` unchanged; classification happens in the session.
    async fn evaluate(
        &self,
        topic_id: &TopicId,
        context: &str,
        essay: &str,
    ) -> Result<EvaluationResult, PracticeApiError>;
}

/// Suggests instructional videos from evaluation feedback.
#[async_trait]
pub trait VideoRecommender: Send + Sync {
    /// Returns at most `limit` videos, in relevance order.
    ///
    /// # Errors
    ///
    /// Returns `PracticeApiError` on transport or decoding failures.
    async fn recommend(
        &self,
        query: &VideoQuery,
        limit: usize,
    ) -> Result<Vec<Video>, PracticeApiError>;
}
