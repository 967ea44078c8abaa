/// Minimum number of words an essay needs before it can be evaluated.
pub const MIN_ESSAY_WORDS: usize = 50;

/// Count whitespace-delimited tokens in the trimmed text.
#[must_use]
pub fn count_words(text: &str) -> usize {
    text.split_whitespace().count()
}

/// The learner's draft response, with its word count kept in sync.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Essay {
    text: String,
    word_count: usize,
}

impl Essay {
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let word_count = count_words(&text);
        Self { text, word_count }
    }

    /// Raw draft text, untrimmed.
    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }

    #[must_use]
    pub fn word_count(&self) -> usize {
        self.word_count
    }

    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    #[must_use]
    pub fn meets_minimum(&self) -> bool {
        self.word_count >= MIN_ESSAY_WORDS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_counts_zero_words() {
        assert_eq!(count_words(""), 0);
        assert_eq!(count_words(" \n\t  "), 0);
        assert!(Essay::new("   ").is_blank());
    }

    #[test]
    fn runs_of_whitespace_separate_single_tokens() {
        assert_eq!(count_words("  short   text\n"), 2);
        assert_eq!(count_words("one\ttwo\nthree  four"), 4);
    }

    #[test]
    fn minimum_is_inclusive() {
        let text = vec!["word"; MIN_ESSAY_WORDS].join(" ");
        assert!(Essay::new(text).meets_minimum());
        let text = vec!["word"; MIN_ESSAY_WORDS - 1].join(" ");
        assert!(!Essay::new(text).meets_minimum());
    }
}
