use std::env;

const DEFAULT_BASE_URL: &str = "http://localhost:8002";
const DEFAULT_VIDEO_LIMIT: usize = 3;
const MAX_VIDEO_LIMIT: usize = 10;

/// Where the practice language-model service lives and how much to ask of it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PracticeApiConfig {
    pub base_url: String,
    pub video_limit: usize,
}

impl PracticeApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            video_limit: DEFAULT_VIDEO_LIMIT,
        }
    }

    #[must_use]
    pub fn with_video_limit(mut self, limit: usize) -> Self {
        self.video_limit = limit.clamp(1, MAX_VIDEO_LIMIT);
        self
    }

    /// Read `PRACTICE_API_URL` and `PRACTICE_VIDEO_LIMIT`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let base_url = lookup("PRACTICE_API_URL")
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BASE_URL.into());
        let video_limit = lookup("PRACTICE_VIDEO_LIMIT")
            .and_then(|raw| raw.trim().parse::<usize>().ok())
            .unwrap_or(DEFAULT_VIDEO_LIMIT);
        Self::new(base_url).with_video_limit(video_limit)
    }

    /// Join an endpoint path onto the base URL.
    #[must_use]
    pub fn endpoint(&self, path: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            path.trim_start_matches('/')
        )
    }
}

impl Default for PracticeApiConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_apply_when_unset() {
        let config = PracticeApiConfig::from_lookup(|_| None);
        assert_eq!(config, PracticeApiConfig::default());
        assert_eq!(config.video_limit, 3);
    }

    #[test]
    fn env_values_are_read_and_clamped() {
        let config = PracticeApiConfig::from_lookup(|key| match key {
            "PRACTICE_API_URL" => Some("http://llm.internal:9000/".into()),
            "PRACTICE_VIDEO_LIMIT" => Some("40".into()),
            _ => None,
        });
        assert_eq!(config.video_limit, 10);
        assert_eq!(config.endpoint("/topics"), "http://llm.internal:9000/topics");
    }

    #[test]
    fn unparsable_limit_falls_back() {
        let config = PracticeApiConfig::from_lookup(|key| {
            (key == "PRACTICE_VIDEO_LIMIT").then(|| "lots".to_string())
        });
        assert_eq!(config.video_limit, 3);
    }
}
