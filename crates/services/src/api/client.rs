use async_trait::async_trait;
use reqwest::{Client, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};

use practice_core::model::{
    EvaluationResult, SpeakingEvaluation, SpeakingTopic, Topic, TopicCatalog, TopicId, TopicType,
    Video, VideoQuery, WeaknessTag,
};

use super::wire::{
    HealthStatus, SpeakingEvaluateRequest, SpeakingEvaluationWire, SpeakingTopicRequest,
    SpeakingTopicWire, TopicListWire, VideoListWire, VideoRequest, WritingEvaluateRequest,
    WritingEvaluationWire, WritingTopicRequest, WritingTopicWire, parse_error_body,
};
use super::{Evaluator, TopicProvider, VideoRecommender};
use crate::config::PracticeApiConfig;
use crate::error::PracticeApiError;

/// HTTP client for the practice language-model service.
#[derive(Clone, Debug)]
pub struct PracticeApiClient {
    client: Client,
    config: PracticeApiConfig,
}

impl PracticeApiClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(PracticeApiConfig::from_env())
    }

    #[must_use]
    pub fn new(config: PracticeApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &PracticeApiConfig {
        &self.config
    }

    /// Probe service liveness.
    ///
    /// # Errors
    ///
    /// Returns `PracticeApiError` if the service is unreachable or unhealthy.
    pub async fn health(&self) -> Result<HealthStatus, PracticeApiError> {
        self.send(self.client.get(self.config.endpoint("/health")))
            .await
    }

    /// # Errors
    ///
    /// Returns `PracticeApiError` with the upstream message on failure.
    #[instrument(skip_all)]
    pub async fn topics(&self) -> Result<TopicCatalog, PracticeApiError> {
        let wire: TopicListWire = self
            .send(self.client.get(self.config.endpoint("/topics")))
            .await?;
        Ok(wire.into_catalog()?)
    }

    /// # Errors
    ///
    /// Returns `PracticeApiError::MissingTopicId` when an exam or custom lookup
    /// has no id, otherwise the upstream failure.
    #[instrument(skip_all, fields(%topic_type, topic_id = ?id.map(TopicId::as_str)))]
    pub async fn writing_topic(
        &self,
        topic_type: TopicType,
        id: Option<&TopicId>,
        category: Option<&str>,
    ) -> Result<Topic, PracticeApiError> {
        if topic_type.requires_id() && id.is_none() {
            return Err(PracticeApiError::MissingTopicId(topic_type));
        }
        let body = WritingTopicRequest {
            topic_type,
            topic_id: id.map(TopicId::as_str),
            category: category.filter(|c| !c.trim().is_empty()),
        };
        let wire: WritingTopicWire = self
            .send(
                self.client
                    .post(self.config.endpoint("/writing/topic"))
                    .json(&body),
            )
            .await?;
        Ok(wire.into_topic(topic_type)?)
    }

    /// # Errors
    ///
    /// Returns `PracticeApiError` with the upstream message on failure.
    #[instrument(skip_all, fields(%topic_id, essay_len = essay.len()))]
    pub async fn evaluate_writing(
        &self,
        topic_id: &TopicId,
        context: &str,
        essay: &str,
    ) -> Result<EvaluationResult, PracticeApiError> {
        let body = WritingEvaluateRequest {
            topic_id: topic_id.as_str(),
            topic_context: context,
            essay,
        };
        let wire: WritingEvaluationWire = self
            .send(
                self.client
                    .post(self.config.endpoint("/writing/evaluate"))
                    .json(&body),
            )
            .await?;
        Ok(wire.into_result(topic_id)?)
    }

    /// # Errors
    ///
    /// Returns `PracticeApiError` on transport failures or malformed video records.
    #[instrument(skip_all, fields(skill = %query.skill_type(), weaknesses = query.weaknesses().len(), limit = limit))]
    pub async fn video_recommendations(
        &self,
        query: &VideoQuery,
        limit: usize,
    ) -> Result<Vec<Video>, PracticeApiError> {
        let body = VideoRequest {
            feedback: query.feedback(),
            weaknesses: query.weaknesses().iter().map(WeaknessTag::as_str).collect(),
            skill_type: query.skill_type(),
            limit,
        };
        let wire: VideoListWire = self
            .send(
                self.client
                    .post(self.config.endpoint("/youtube/recommendations"))
                    .json(&body),
            )
            .await?;
        Ok(wire.into_videos(limit))
    }

    /// Fetch a speaking prompt; a random one when `id` is `None`.
    ///
    /// # Errors
    ///
    /// Returns `PracticeApiError` with the upstream message on failure.
    pub async fn speaking_topic(
        &self,
        id: Option<&TopicId>,
    ) -> Result<SpeakingTopic, PracticeApiError> {
        let body = SpeakingTopicRequest {
            topic_id: id.map(TopicId::as_str),
        };
        let wire: SpeakingTopicWire = self
            .send(
                self.client
                    .post(self.config.endpoint("/speaking/topic"))
                    .json(&body),
            )
            .await?;
        Ok(wire.into_topic()?)
    }

    /// Score a transcribed spoken answer.
    ///
    /// # Errors
    ///
    /// Returns `PracticeApiError::Service` when the service reports `success: false`.
    #[instrument(skip_all, fields(%topic_id))]
    pub async fn evaluate_speaking(
        &self,
        topic_id: &TopicId,
        transcript: &str,
        context: Option<&str>,
    ) -> Result<SpeakingEvaluation, PracticeApiError> {
        let body = SpeakingEvaluateRequest {
            topic_id: topic_id.as_str(),
            transcript,
            topic_context: context,
        };
        let wire: SpeakingEvaluationWire = self
            .send(
                self.client
                    .post(self.config.endpoint("/speaking/evaluate-full"))
                    .json(&body),
            )
            .await?;
        if !wire.success {
            return Err(PracticeApiError::Service {
                status: reqwest::StatusCode::OK,
                message: wire
                    .error
                    .clone()
                    .unwrap_or_else(|| "speaking evaluation failed".to_string()),
                kind: None,
            });
        }
        Ok(wire.into_evaluation(topic_id)?)
    }

    async fn send<T: DeserializeOwned>(
        &self,
        request: RequestBuilder,
    ) -> Result<T, PracticeApiError> {
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            let body = response.bytes().await.unwrap_or_default();
            let (message, kind) = parse_error_body(&body);
            debug!(%status, %message, "practice service returned an error");
            return Err(PracticeApiError::Service {
                status,
                message,
                kind,
            });
        }
        Ok(response.json::<T>().await?)
    }
}

#[async_trait]
impl TopicProvider for PracticeApiClient {
    async fn list_topics(&self) -> Result<TopicCatalog, PracticeApiError> {
        self.topics().await
    }

    async fn fetch_topic(
        &self,
        topic_type: TopicType,
        id: Option<&TopicId>,
        category: Option<&str>,
    ) -> Result<Topic, PracticeApiError> {
        self.writing_topic(topic_type, id, category).await
    }
}

#[async_trait]
impl Evaluator for PracticeApiClient {
    async fn evaluate(
        &self,
        topic_id: &TopicId,
        context: &str,
        essay: &str,
    ) -> Result<EvaluationResult, PracticeApiError> {
        self.evaluate_writing(topic_id, context, essay).await
    }
}

#[async_trait]
impl VideoRecommender for PracticeApiClient {
    async fn recommend(
        &self,
        query: &VideoQuery,
        limit: usize,
    ) -> Result<Vec<Video>, PracticeApiError> {
        self.video_recommendations(query, limit).await
    }
}
