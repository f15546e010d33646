//! Built-in English stop word list.

use once_cell::sync::Lazy;
use std::collections::HashSet;

static ENGLISH: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "a", "about", "above", "after", "again", "against", "all", "am", "an", "and", "any",
        "are", "as", "at", "be", "because", "been", "before", "being", "below", "between",
        "both", "but", "by", "can", "did", "do", "does", "doing", "down", "during", "each",
        "few", "for", "from", "further", "had", "has", "have", "having", "he", "her", "here",
        "hers", "herself", "him", "himself", "his", "how", "i", "if", "in", "into", "is", "it",
        "its", "itself", "just", "me", "more", "most", "my", "myself", "no", "nor", "not",
        "now", "of", "off", "on", "once", "only", "or", "other", "our", "ours", "ourselves",
        "out", "over", "own", "same", "she", "should", "so", "some", "such", "than", "that",
        "the", "their", "theirs", "them", "themselves", "then", "there", "these", "they",
        "this", "those", "through", "to", "too", "under", "until", "up", "very", "was", "we",
        "were", "what", "when", "where", "which", "while", "who", "whom", "why", "will",
        "with", "you", "your", "yours", "yourself", "yourselves",
    ]
    .into_iter()
    .collect()
});

/// Which tokens to drop before they reach a vocabulary.
#[derive(Debug, Clone, Default)]
pub enum StopWords {
    /// Keep every token.
    #[default]
    None,
    /// Drop the built-in English list.
    English,
    /// Drop a caller-supplied list (compared against standardized tokens).
    Custom(Vec<String>),
}

impl StopWords {
    /// Reports whether `token` should be dropped.
    pub fn contains(&self, token: &str) -> bool {
        match self {
            StopWords::None => false,
            StopWords::English => ENGLISH.contains(token),
            StopWords::Custom(words) => words.iter().any(|w| w == token),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn english_list_drops_common_words_only() {
        assert!(StopWords::English.contains("the"));
        assert!(!StopWords::English.contains("tensor"));
        assert!(!StopWords::None.contains("the"));
    }

    #[test]
    fn custom_list_matches_exactly() {
        let custom = StopWords::Custom(vec!["foo".to_string()]);
        assert!(custom.contains("foo"));
        assert!(!custom.contains("food"));
    }
}
