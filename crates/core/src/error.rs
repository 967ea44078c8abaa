use thiserror::Error;

/// Errors raised while building domain values from raw input.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ModelError {
    #[error("{kind} cannot be empty")]
    EmptyId { kind: &'static str },

    #[error("weakness tag cannot be empty")]
    EmptyTag,

    #[error("unknown topic type: {0}")]
    UnknownTopicType(String),

    #[error("unknown skill type: {0}")]
    UnknownSkillType(String),

    #[error("invalid video url `{raw}`: {reason}")]
    InvalidVideoUrl { raw: String, reason: String },
}
