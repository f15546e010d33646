//! Text standardization applied before tokenization.

use once_cell::sync::Lazy;
use regex::Regex;

static HTML_TAG: Lazy<Regex> = Lazy::new(|| Regex::new(r"<[^>]+>").expect("valid literal regex"));
static MULTI_WHITESPACE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s\s+").expect("valid literal regex"));

/// Options controlling [`standardize`].
#[derive(Debug, Clone)]
pub struct StandardizeConfig {
    /// Convert everything to lowercase before fitting / transforming.
    pub lowercase: bool,
    /// Replace HTML tags with spaces.
    pub strip_html: bool,
    /// Collapse runs of whitespace into a single space.
    pub normalize_whitespace: bool,
}

impl Default for StandardizeConfig {
    fn default() -> Self {
        StandardizeConfig {
            lowercase: true,
            strip_html: false,
            normalize_whitespace: true,
        }
    }
}

/// Applies the configured cleanup steps to a document.
pub fn standardize(text: &str, config: &StandardizeConfig) -> String {
    let mut text = if config.lowercase {
        text.to_lowercase()
    } else {
        text.to_string()
    };
    if config.strip_html {
        text = HTML_TAG.replace_all(&text, " ").into_owned();
    }
    if config.normalize_whitespace {
        text = MULTI_WHITESPACE.replace_all(&text, " ").into_owned();
    }
    text
}

/// Splits a standardized document into tokens.
pub fn tokenize(text: &str) -> impl Iterator<Item = &str> {
    text.split_whitespace()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_lowercases_and_collapses_whitespace() {
        let out = standardize("Hello   World", &StandardizeConfig::default());
        assert_eq!(out, "hello world");
    }

    #[test]
    fn strip_html_replaces_tags_with_spaces() {
        let config = StandardizeConfig {
            strip_html: true,
            ..StandardizeConfig::default()
        };
        let out = standardize("<p>hi</p> there", &config);
        assert_eq!(tokenize(&out).collect::<Vec<_>>(), vec!["hi", "there"]);
    }
}
