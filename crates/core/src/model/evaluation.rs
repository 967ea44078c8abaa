use crate::error::ModelError;
use crate::model::ids::TopicId;

/// Issue type the evaluator uses for praise rather than a fault.
const STRENGTH_ISSUE: &str = "strength";

//
// ─── WEAKNESS TAG ──────────────────────────────────────────────────────────────
//

/// Short categorical label for something the learner should work on
/// (e.g. `tense`, `cohesion`). Trimmed, non-empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WeaknessTag(String);

impl WeaknessTag {
    /// Create a validated weakness tag.
    ///
    /// # Errors
    ///
    /// Returns `ModelError::EmptyTag` if the value is empty after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, ModelError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ModelError::EmptyTag);
        }
        Ok(Self(trimmed.to_string()))
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for WeaknessTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Build an ordered, de-duplicated tag list, skipping blank entries.
#[must_use]
pub fn weakness_tags<I, S>(raw: I) -> Vec<WeaknessTag>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut tags: Vec<WeaknessTag> = Vec::new();
    for tag in raw.into_iter().filter_map(|s| WeaknessTag::new(s).ok()) {
        if !tags.contains(&tag) {
            tags.push(tag);
        }
    }
    tags
}

//
// ─── SCORES ────────────────────────────────────────────────────────────────────
//

/// Band scores for a written response.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EvaluationScores {
    pub task_achievement: f32,
    pub coherence_cohesion: f32,
    pub lexical_resource: f32,
    pub grammar_accuracy: f32,
    pub overall: f32,
}

//
// ─── ISSUES ────────────────────────────────────────────────────────────────────
//

/// A single remark on the essay: an error with its fix, or a strength.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EssayIssue {
    pub kind: String,
    pub text: String,
    pub correction: Option<String>,
    pub explanation: Option<String>,
}

impl EssayIssue {
    #[must_use]
    pub fn is_strength(&self) -> bool {
        self.kind.eq_ignore_ascii_case(STRENGTH_ISSUE)
    }
}

//
// ─── RESULT ────────────────────────────────────────────────────────────────────
//

/// Scored feedback for one submitted essay.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationResult {
    topic_id: TopicId,
    scores: EvaluationScores,
    feedback: String,
    weaknesses: Vec<WeaknessTag>,
    issues: Vec<EssayIssue>,
    suggestions: Vec<String>,
    improved_version: Option<String>,
}

impl EvaluationResult {
    /// `weaknesses` falls back to the distinct non-strength issue kinds when empty.
    #[must_use]
    pub fn new(
        topic_id: TopicId,
        scores: EvaluationScores,
        feedback: impl Into<String>,
        weaknesses: Vec<WeaknessTag>,
        issues: Vec<EssayIssue>,
    ) -> Self {
        let weaknesses = if weaknesses.is_empty() {
            weakness_tags(
                issues
                    .iter()
                    .filter(|issue| !issue.is_strength())
                    .map(|issue| issue.kind.clone()),
            )
        } else {
            weaknesses
        };
        Self {
            topic_id,
            scores,
            feedback: feedback.into(),
            weaknesses,
            issues,
            suggestions: Vec::new(),
            improved_version: None,
        }
    }

    #[must_use]
    pub fn with_suggestions(mut self, suggestions: Vec<String>) -> Self {
        self.suggestions = suggestions;
        self
    }

    #[must_use]
    pub fn with_improved_version(mut self, improved: Option<String>) -> Self {
        self.improved_version = improved.filter(|text| !text.trim().is_empty());
        self
    }

    #[must_use]
    pub fn topic_id(&self) -> &TopicId {
        &self.topic_id
    }

    #[must_use]
    pub fn scores(&self) -> EvaluationScores {
        self.scores
    }

    #[must_use]
    pub fn feedback(&self) -> &str {
        &self.feedback
    }

    /// Ordered weakness tags, most relevant first.
    #[must_use]
    pub fn weaknesses(&self) -> &[WeaknessTag] {
        &self.weaknesses
    }

    /// All remarks, strengths included.
    #[must_use]
    pub fn issues(&self) -> &[EssayIssue] {
        &self.issues
    }

    /// Remarks that point at mistakes, in evaluator order.
    pub fn errors(&self) -> impl Iterator<Item = &EssayIssue> {
        self.issues.iter().filter(|issue| !issue.is_strength())
    }

    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    #[must_use]
    pub fn improved_version(&self) -> Option<&str> {
        self.improved_version.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issue(kind: &str) -> EssayIssue {
        EssayIssue {
            kind: kind.to_string(),
            text: "x".to_string(),
            correction: None,
            explanation: None,
        }
    }

    #[test]
    fn explicit_weaknesses_win() {
        let result = EvaluationResult::new(
            TopicId::new("t1").unwrap(),
            EvaluationScores::default(),
            "Good structure",
            weakness_tags(["tense"]),
            vec![issue("grammar")],
        );
        let tags: Vec<_> = result.weaknesses().iter().map(WeaknessTag::as_str).collect();
        assert_eq!(tags, vec!["tense"]);
    }

    #[test]
    fn weaknesses_derive_from_issue_kinds_without_strengths() {
        let result = EvaluationResult::new(
            TopicId::new("t1").unwrap(),
            EvaluationScores::default(),
            "",
            Vec::new(),
            vec![issue("grammar"), issue("Strength"), issue("vocabulary"), issue("grammar")],
        );
        let tags: Vec<_> = result.weaknesses().iter().map(WeaknessTag::as_str).collect();
        assert_eq!(tags, vec!["grammar", "vocabulary"]);
        assert_eq!(result.errors().count(), 3);
    }

    #[test]
    fn weakness_tags_skip_blank_and_duplicates() {
        let tags = weakness_tags([" tense ", "", "tense", "articles"]);
        assert_eq!(tags.len(), 2);
        assert_eq!(tags[0].as_str(), "tense");
        assert_eq!(WeaknessTag::new("  ").unwrap_err(), ModelError::EmptyTag);
    }
}
