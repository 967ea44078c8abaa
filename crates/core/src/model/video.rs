use url::Url;

use crate::error::ModelError;
use crate::model::evaluation::{EvaluationResult, WeaknessTag};
use crate::model::ids::VideoId;
use crate::model::speaking::SpeakingEvaluation;
use crate::model::topic::SkillType;

/// An instructional video suggested after an evaluation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Video {
    pub id: VideoId,
    pub title: String,
    pub channel: String,
    pub description: String,
    /// `None` when the search result carried no usable thumbnail.
    pub thumbnail: Option<Url>,
    pub embed_url: Url,
    pub url: Url,
}

impl Video {
    /// Embed URL with autoplay enabled, used when the player is mounted.
    #[must_use]
    pub fn autoplay_url(&self) -> Url {
        let mut url = self.embed_url.clone();
        url.query_pairs_mut().append_pair("autoplay", "1");
        url
    }
}

/// Parse a URL field of a video record.
///
/// # Errors
///
/// Returns `ModelError::InvalidVideoUrl` when the value is not an absolute URL.
pub fn parse_video_url(raw: &str) -> Result<Url, ModelError> {
    Url::parse(raw.trim()).map_err(|err| ModelError::InvalidVideoUrl {
        raw: raw.to_string(),
        reason: err.to_string(),
    })
}

/// The input triple that drives a video search.
///
/// Two queries are equal when feedback, weaknesses (in order) and skill all match.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VideoQuery {
    feedback: String,
    weaknesses: Vec<WeaknessTag>,
    skill_type: SkillType,
}

impl VideoQuery {
    #[must_use]
    pub fn new(
        feedback: impl Into<String>,
        weaknesses: Vec<WeaknessTag>,
        skill_type: SkillType,
    ) -> Self {
        Self {
            feedback: feedback.into(),
            weaknesses,
            skill_type,
        }
    }

    #[must_use]
    pub fn from_evaluation(evaluation: &EvaluationResult) -> Self {
        Self::new(
            evaluation.feedback(),
            evaluation.weaknesses().to_vec(),
            SkillType::Writing,
        )
    }

    #[must_use]
    pub fn from_speaking(evaluation: &SpeakingEvaluation) -> Self {
        Self::new(
            evaluation.summary(),
            evaluation.weaknesses().to_vec(),
            SkillType::Speaking,
        )
    }

    #[must_use]
    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    #[must_use]
    pub fn weaknesses(&self) -> &[WeaknessTag] {
        &self.weaknesses
    }

    #[must_use]
    pub fn skill_type(&self) -> SkillType {
        self.skill_type
    }

    /// Nothing to search on: no feedback text and no weakness tags.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.feedback.trim().is_empty() && self.weaknesses.is_empty()
    }
}
