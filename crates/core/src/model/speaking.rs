use crate::model::evaluation::{WeaknessTag, weakness_tags};
use crate::model::ids::TopicId;

/// A speaking prompt, optionally illustrated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpeakingTopic {
    pub id: TopicId,
    pub test_name: String,
    pub question_type: String,
    pub context: String,
    pub image_urls: Vec<String>,
}

/// Scores and coaching for a transcribed spoken answer.
#[derive(Debug, Clone, PartialEq)]
pub struct SpeakingEvaluation {
    topic_id: TopicId,
    transcript: String,
    overall: Option<f32>,
    summary: String,
    strengths: Vec<String>,
    weaknesses: Vec<WeaknessTag>,
    off_topic: bool,
}

impl SpeakingEvaluation {
    /// `improvements` become the weakness tags, in order.
    #[must_use]
    pub fn new(
        topic_id: TopicId,
        transcript: impl Into<String>,
        overall: Option<f32>,
        summary: impl Into<String>,
        strengths: Vec<String>,
        improvements: Vec<String>,
        off_topic: bool,
    ) -> Self {
        Self {
            topic_id,
            transcript: transcript.into(),
            overall,
            summary: summary.into(),
            strengths,
            weaknesses: weakness_tags(improvements),
            off_topic,
        }
    }

    #[must_use]
    pub fn topic_id(&self) -> &TopicId {
        &self.topic_id
    }

    #[must_use]
    pub fn transcript(&self) -> &str {
        &self.transcript
    }

    /// `None` when the service could not score the answer.
    #[must_use]
    pub fn overall(&self) -> Option<f32> {
        self.overall
    }

    #[must_use]
    pub fn summary(&self) -> &str {
        &self.summary
    }

    #[must_use]
    pub fn strengths(&self) -> &[String] {
        &self.strengths
    }

    #[must_use]
    pub fn weaknesses(&self) -> &[WeaknessTag] {
        &self.weaknesses
    }

    #[must_use]
    pub fn is_off_topic(&self) -> bool {
        self.off_topic
    }
}
