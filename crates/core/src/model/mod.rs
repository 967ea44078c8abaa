mod essay;
mod evaluation;
mod ids;
mod speaking;
mod topic;
mod video;

pub use essay::{Essay, MIN_ESSAY_WORDS, count_words};
pub use evaluation::{EssayIssue, EvaluationResult, EvaluationScores, WeaknessTag, weakness_tags};
pub use ids::{TopicId, VideoId};
pub use speaking::{SpeakingEvaluation, SpeakingTopic};
pub use topic::{CatalogEntry, CustomCatalogEntry, SkillType, Topic, TopicCatalog, TopicType};
pub use video::{Video, VideoQuery, parse_video_url};
