use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;
use crate::model::ids::TopicId;

//
// ─── TOPIC TYPE ────────────────────────────────────────────────────────────────
//

/// Where a writing prompt comes from.
///
/// - `Exam`: taken from a past exam paper, looked up by id.
/// - `Custom`: curated by the content team, looked up by id.
/// - `Generated`: produced on demand by the language model; never cached.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TopicType {
    #[default]
    Exam,
    Custom,
    Generated,
}

impl TopicType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            TopicType::Exam => "exam",
            TopicType::Custom => "custom",
            TopicType::Generated => "generated",
        }
    }

    /// Exam and custom prompts are addressed by id; generated ones are not.
    #[must_use]
    pub fn requires_id(self) -> bool {
        matches!(self, TopicType::Exam | TopicType::Custom)
    }
}

impl fmt::Display for TopicType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TopicType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "exam" => Ok(TopicType::Exam),
            "custom" => Ok(TopicType::Custom),
            "generated" => Ok(TopicType::Generated),
            other => Err(ModelError::UnknownTopicType(other.to_string())),
        }
    }
}

//
// ─── SKILL TYPE ────────────────────────────────────────────────────────────────
//

/// Skill a practice attempt exercises; steers video search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SkillType {
    Speaking,
    Writing,
}

impl SkillType {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            SkillType::Speaking => "speaking",
            SkillType::Writing => "writing",
        }
    }
}

impl fmt::Display for SkillType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SkillType {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "speaking" => Ok(SkillType::Speaking),
            "writing" => Ok(SkillType::Writing),
            other => Err(ModelError::UnknownSkillType(other.to_string())),
        }
    }
}

//
// ─── TOPIC ─────────────────────────────────────────────────────────────────────
//

/// A writing prompt the learner responds to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Topic {
    id: TopicId,
    topic_type: TopicType,
    category: Option<String>,
    context: String,
    question_type: String,
    test_name: Option<String>,
    prompt_type: Option<String>,
}

impl Topic {
    #[must_use]
    pub fn new(id: TopicId, topic_type: TopicType, context: impl Into<String>) -> Self {
        Self {
            id,
            topic_type,
            category: None,
            context: context.into(),
            question_type: String::new(),
            test_name: None,
            prompt_type: None,
        }
    }

    #[must_use]
    pub fn with_category(mut self, category: Option<String>) -> Self {
        self.category = category.filter(|c| !c.trim().is_empty());
        self
    }

    #[must_use]
    pub fn with_question_type(mut self, question_type: impl Into<String>) -> Self {
        self.question_type = question_type.into();
        self
    }

    #[must_use]
    pub fn with_test_name(mut self, test_name: Option<String>) -> Self {
        self.test_name = test_name;
        self
    }

    #[must_use]
    pub fn with_prompt_type(mut self, prompt_type: Option<String>) -> Self {
        self.prompt_type = prompt_type;
        self
    }

    #[must_use]
    pub fn id(&self) -> &TopicId {
        &self.id
    }

    #[must_use]
    pub fn topic_type(&self) -> TopicType {
        self.topic_type
    }

    #[must_use]
    pub fn category(&self) -> Option<&str> {
        self.category.as_deref()
    }

    /// The prompt text shown to the learner and sent along with the essay.
    #[must_use]
    pub fn context(&self) -> &str {
        &self.context
    }

    #[must_use]
    pub fn question_type(&self) -> &str {
        &self.question_type
    }

    #[must_use]
    pub fn test_name(&self) -> Option<&str> {
        self.test_name.as_deref()
    }

    #[must_use]
    pub fn prompt_type(&self) -> Option<&str> {
        self.prompt_type.as_deref()
    }
}

//
// ─── CATALOG ───────────────────────────────────────────────────────────────────
//

/// A named entry in the exam or speaking catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: TopicId,
    pub name: String,
}

/// A curated custom prompt, listed by category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CustomCatalogEntry {
    pub id: TopicId,
    pub category: String,
    pub kind: String,
}

/// Every selectable prompt, partitioned by type.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicCatalog {
    pub speaking: Vec<CatalogEntry>,
    pub exam: Vec<CatalogEntry>,
    pub custom: Vec<CustomCatalogEntry>,
}

impl TopicCatalog {
    /// Number of writing prompts selectable for the given type.
    ///
    /// Generated prompts are never listed.
    #[must_use]
    pub fn writing_len(&self, topic_type: TopicType) -> usize {
        match topic_type {
            TopicType::Exam => self.exam.len(),
            TopicType::Custom => self.custom.len(),
            TopicType::Generated => 0,
        }
    }

    /// Distinct non-blank custom categories in first-seen order.
    #[must_use]
    pub fn custom_categories(&self) -> Vec<&str> {
        let mut seen: Vec<&str> = Vec::new();
        for entry in &self.custom {
            let category = entry.category.trim();
            if !category.is_empty() && !seen.contains(&category) {
                seen.push(category);
            }
        }
        seen
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.speaking.is_empty() && self.exam.is_empty() && self.custom.is_empty()
    }
}
