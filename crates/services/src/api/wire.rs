//! JSON shapes exchanged with the practice service.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use practice_core::ModelError;
use practice_core::model::{
    CatalogEntry, CustomCatalogEntry, EssayIssue, EvaluationResult, EvaluationScores, SkillType,
    SpeakingEvaluation, SpeakingTopic, Topic, TopicCatalog, TopicId, TopicType, Video, VideoId,
    parse_video_url, weakness_tags,
};

use crate::error::UpstreamErrorKind;

const FALLBACK_ERROR_MESSAGE: &str = "request failed";

//
// ─── REQUESTS ──────────────────────────────────────────────────────────────────
//

#[derive(Debug, Serialize)]
pub(super) struct WritingTopicRequest<'a> {
    pub topic_type: TopicType,
    pub topic_id: Option<&'a str>,
    pub category: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(super) struct WritingEvaluateRequest<'a> {
    pub topic_id: &'a str,
    pub topic_context: &'a str,
    pub essay: &'a str,
}

#[derive(Debug, Serialize)]
pub(super) struct VideoRequest<'a> {
    pub feedback: &'a str,
    pub weaknesses: Vec<&'a str>,
    pub skill_type: SkillType,
    #[serde(rename = "max_videos")]
    pub limit: usize,
}

#[derive(Debug, Serialize)]
pub(super) struct SpeakingTopicRequest<'a> {
    pub topic_id: Option<&'a str>,
}

#[derive(Debug, Serialize)]
pub(super) struct SpeakingEvaluateRequest<'a> {
    pub topic_id: &'a str,
    pub transcript: &'a str,
    pub topic_context: Option<&'a str>,
}

//
// ─── RESPONSES ─────────────────────────────────────────────────────────────────
//

/// Service liveness report from `GET /health`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub minio_connected: bool,
    #[serde(default)]
    pub data_loaded: bool,
}

impl HealthStatus {
    #[must_use]
    pub fn is_ready(&self) -> bool {
        self.status.eq_ignore_ascii_case("ok") && self.data_loaded
    }
}

#[derive(Debug, Deserialize)]
struct NamedTopicWire {
    id: String,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CustomTopicWire {
    id: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(super) struct TopicListWire {
    #[serde(default)]
    speaking_topics: Vec<NamedTopicWire>,
    #[serde(default)]
    writing_exam_topics: Vec<NamedTopicWire>,
    #[serde(default)]
    writing_custom_topics: Vec<CustomTopicWire>,
}

impl TopicListWire {
    pub fn into_catalog(self) -> Result<TopicCatalog, ModelError> {
        let named = |entries: Vec<NamedTopicWire>| {
            entries
                .into_iter()
                .map(|entry| {
                    Ok(CatalogEntry {
                        id: TopicId::new(entry.id)?,
                        name: entry.name.unwrap_or_default(),
                    })
                })
                .collect::<Result<Vec<_>, ModelError>>()
        };
        let custom = self
            .writing_custom_topics
            .into_iter()
            .map(|entry| {
                Ok(CustomCatalogEntry {
                    id: TopicId::new(entry.id)?,
                    category: entry.category.unwrap_or_default(),
                    kind: entry.kind.unwrap_or_default(),
                })
            })
            .collect::<Result<Vec<_>, ModelError>>()?;

        Ok(TopicCatalog {
            speaking: named(self.speaking_topics)?,
            exam: named(self.writing_exam_topics)?,
            custom,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct WritingTopicWire {
    topic_id: String,
    #[serde(default)]
    topic_type: Option<String>,
    #[serde(default)]
    test_name: Option<String>,
    #[serde(default)]
    question_type: String,
    #[serde(default)]
    context: String,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    prompt_type: Option<String>,
}

impl WritingTopicWire {
    /// `requested` stands in when the service omits or garbles `topic_type`.
    pub fn into_topic(self, requested: TopicType) -> Result<Topic, ModelError> {
        let topic_type = self
            .topic_type
            .as_deref()
            .and_then(|raw| raw.parse().ok())
            .unwrap_or(requested);
        Ok(Topic::new(TopicId::new(self.topic_id)?, topic_type, self.context)
            .with_category(self.category)
            .with_question_type(self.question_type)
            .with_test_name(self.test_name)
            .with_prompt_type(self.prompt_type))
    }
}

#[derive(Debug, Default, Deserialize)]
struct ScoresWire {
    #[serde(default)]
    task_achievement: f32,
    #[serde(default)]
    coherence_cohesion: f32,
    #[serde(default)]
    lexical_resource: f32,
    #[serde(default)]
    grammar_accuracy: f32,
    #[serde(default)]
    overall: f32,
}

#[derive(Debug, Deserialize)]
struct IssueWire {
    #[serde(rename = "type", default)]
    kind: Option<String>,
    #[serde(default)]
    text: Option<String>,
    #[serde(default)]
    correction: Option<String>,
    #[serde(default)]
    explanation: Option<String>,
}

/// Evaluation body; scores arrive nested under `scores` or flat as `*_score`.
#[derive(Debug, Deserialize)]
pub(super) struct WritingEvaluationWire {
    #[serde(default)]
    topic_id: Option<String>,
    #[serde(default)]
    scores: Option<ScoresWire>,
    #[serde(default)]
    task_achievement_score: Option<f32>,
    #[serde(default)]
    coherence_cohesion_score: Option<f32>,
    #[serde(default)]
    lexical_resource_score: Option<f32>,
    #[serde(default)]
    grammar_accuracy_score: Option<f32>,
    #[serde(default)]
    overall_score: Option<f32>,
    #[serde(default)]
    feedback: String,
    #[serde(default)]
    weaknesses: Vec<String>,
    #[serde(default)]
    errors: Vec<IssueWire>,
    #[serde(default)]
    suggestions: Vec<String>,
    #[serde(default)]
    improved_version: Option<String>,
}

impl WritingEvaluationWire {
    pub fn into_result(self, requested: &TopicId) -> Result<EvaluationResult, ModelError> {
        let topic_id = match self.topic_id {
            Some(raw) if !raw.trim().is_empty() => TopicId::new(raw)?,
            _ => requested.clone(),
        };
        let nested = self.scores.unwrap_or_default();
        let scores = EvaluationScores {
            task_achievement: self.task_achievement_score.unwrap_or(nested.task_achievement),
            coherence_cohesion: self
                .coherence_cohesion_score
                .unwrap_or(nested.coherence_cohesion),
            lexical_resource: self.lexical_resource_score.unwrap_or(nested.lexical_resource),
            grammar_accuracy: self.grammar_accuracy_score.unwrap_or(nested.grammar_accuracy),
            overall: self.overall_score.unwrap_or(nested.overall),
        };
        let issues = self
            .errors
            .into_iter()
            .map(|issue| EssayIssue {
                kind: issue.kind.unwrap_or_default(),
                text: issue.text.unwrap_or_default(),
                correction: issue.correction.filter(|text| !text.trim().is_empty()),
                explanation: issue.explanation,
            })
            .collect();

        Ok(EvaluationResult::new(
            topic_id,
            scores,
            self.feedback,
            weakness_tags(self.weaknesses),
            issues,
        )
        .with_suggestions(self.suggestions)
        .with_improved_version(self.improved_version.filter(|text| !text.trim().is_empty())))
    }
}

#[derive(Debug, Deserialize)]
struct VideoWire {
    video_id: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    channel: String,
    #[serde(default)]
    thumbnail: Option<String>,
    url: String,
    embed_url: String,
    #[serde(default)]
    description: String,
}

impl VideoWire {
    fn into_video(self) -> Result<Video, ModelError> {
        Ok(Video {
            id: VideoId::new(self.video_id)?,
            title: self.title,
            channel: self.channel,
            description: self.description,
            thumbnail: self
                .thumbnail
                .filter(|raw| !raw.trim().is_empty())
                .and_then(|raw| parse_video_url(&raw).ok()),
            embed_url: parse_video_url(&self.embed_url)?,
            url: parse_video_url(&self.url)?,
        })
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct VideoListWire {
    #[serde(default)]
    videos: Vec<VideoWire>,
}

impl VideoListWire {
    /// Records with an unusable id or player URL are skipped, not fatal.
    pub fn into_videos(self, limit: usize) -> Vec<Video> {
        self.videos
            .into_iter()
            .filter_map(|wire| match wire.into_video() {
                Ok(video) => Some(video),
                Err(err) => {
                    warn!(error = %err, "skipping malformed video record");
                    None
                }
            })
            .take(limit)
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub(super) struct SpeakingTopicWire {
    topic_id: String,
    #[serde(default)]
    test_name: String,
    #[serde(default)]
    question_type: String,
    #[serde(default)]
    context: String,
    #[serde(default)]
    image_urls: Vec<String>,
}

impl SpeakingTopicWire {
    pub fn into_topic(self) -> Result<SpeakingTopic, ModelError> {
        Ok(SpeakingTopic {
            id: TopicId::new(self.topic_id)?,
            test_name: self.test_name,
            question_type: self.question_type,
            context: self.context,
            image_urls: self.image_urls,
        })
    }
}

#[derive(Debug, Deserialize)]
struct SpeakingScoresWire {
    #[serde(default)]
    overall: Option<f32>,
    /// Scores travel as a float map, so the flag may arrive as `0.0`/`1.0`.
    #[serde(default)]
    is_off_topic: Option<FlagWire>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum FlagWire {
    Bool(bool),
    Number(f64),
}

impl FlagWire {
    fn is_set(&self) -> bool {
        match self {
            FlagWire::Bool(flag) => *flag,
            FlagWire::Number(value) => *value != 0.0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
struct SpeakingFeedbackWire {
    #[serde(default)]
    summary: String,
    #[serde(default)]
    strengths: Vec<String>,
    #[serde(default)]
    improvements: Vec<String>,
    #[serde(default)]
    is_off_topic: bool,
}

#[derive(Debug, Deserialize)]
pub(super) struct SpeakingEvaluationWire {
    #[serde(default)]
    topic_id: Option<String>,
    #[serde(default)]
    transcript: Option<String>,
    #[serde(default = "default_true")]
    pub success: bool,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default)]
    scores: Option<SpeakingScoresWire>,
    #[serde(default)]
    feedback: Option<SpeakingFeedbackWire>,
}

fn default_true() -> bool {
    true
}

impl SpeakingEvaluationWire {
    pub fn into_evaluation(self, requested: &TopicId) -> Result<SpeakingEvaluation, ModelError> {
        let topic_id = match self.topic_id {
            Some(raw) if !raw.trim().is_empty() => TopicId::new(raw)?,
            _ => requested.clone(),
        };
        let feedback = self.feedback.unwrap_or_default();
        let (overall, scored_off_topic) = self
            .scores
            .map_or((None, false), |scores| {
                let off_topic = scores.is_off_topic.as_ref().is_some_and(FlagWire::is_set);
                (scores.overall, off_topic)
            });
        Ok(SpeakingEvaluation::new(
            topic_id,
            self.transcript.unwrap_or_default(),
            overall,
            feedback.summary,
            feedback.strengths,
            feedback.improvements,
            scored_off_topic || feedback.is_off_topic,
        ))
    }
}

//
// ─── ERROR BODIES ──────────────────────────────────────────────────────────────
//

#[derive(Debug, Default, Deserialize)]
struct ErrorBodyWire {
    #[serde(default)]
    detail: Option<Value>,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error_kind: Option<String>,
}

/// Pull the human-readable message and optional category out of an error body.
///
/// Unparsable bodies yield the generic fallback message.
pub(super) fn parse_error_body(bytes: &[u8]) -> (String, Option<UpstreamErrorKind>) {
    let body: ErrorBodyWire = serde_json::from_slice(bytes).unwrap_or_default();
    let detail = match body.detail {
        Some(Value::String(text)) => Some(text),
        Some(Value::Null) | None => None,
        Some(other) => Some(other.to_string()),
    };
    let message = detail
        .or(body.message)
        .filter(|text| !text.trim().is_empty())
        .unwrap_or_else(|| FALLBACK_ERROR_MESSAGE.to_string());
    let kind = body.error_kind.as_deref().and_then(UpstreamErrorKind::from_wire);
    (message, kind)
}
