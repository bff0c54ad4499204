//! Tag and attribute blacklists.
//!
//! Tags compare exactly after trimming and lower-casing. Attributes are
//! tested against case-insensitive patterns, so a literal entry such as
//! `"prefixed[a-z]*"` matches anywhere in the name.

use regex::{Regex, RegexBuilder};
use tracing::warn;

/// An attribute blacklist entry: a literal compiled on demand, or a ready pattern.
#[derive(Debug, Clone)]
pub enum AttrPattern {
    Literal(String),
    Pattern(Regex),
}

impl From<&str> for AttrPattern {
    fn from(value: &str) -> Self {
        AttrPattern::Literal(value.to_string())
    }
}

impl From<String> for AttrPattern {
    fn from(value: String) -> Self {
        AttrPattern::Literal(value)
    }
}

impl From<Regex> for AttrPattern {
    fn from(value: Regex) -> Self {
        AttrPattern::Pattern(value)
    }
}

/// `/^on.+/i`
pub fn default_attribute_blacklist() -> Vec<AttrPattern> {
    vec![AttrPattern::Literal("^on.+".to_string())]
}

pub fn default_tag_blacklist() -> Vec<String> {
    vec!["script".to_string()]
}

#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    tags: Vec<String>,
    attrs: Vec<Regex>,
}

impl Sanitizer {
    pub fn new(tags: &[String], attrs: &[AttrPattern]) -> Self {
        let tags = tags.iter().map(|tag| tag.trim().to_lowercase()).collect();
        let attrs = attrs
            .iter()
            .filter_map(|pattern| match pattern {
                AttrPattern::Pattern(regex) => Some(regex.clone()),
                AttrPattern::Literal(source) => {
                    match RegexBuilder::new(source).case_insensitive(true).build() {
                        Ok(regex) => Some(regex),
                        Err(err) => {
                            warn!(pattern = %source, error = %err, "skipping invalid attribute blacklist pattern");
                            None
                        }
                    }
                }
            })
            .collect();
        Self { tags, attrs }
    }

    pub fn is_tag_blacklisted(&self, tag: &str) -> bool {
        let normalized = tag.trim().to_lowercase();
        self.tags.iter().any(|blocked| *blocked == normalized)
    }

    /// Supplied patterns keep their own flags; literals are case-insensitive.
    pub fn is_attribute_blacklisted(&self, name: &str) -> bool {
        self.attrs.iter().any(|pattern| pattern.is_match(name))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_blacklist_is_exact_after_normalization() {
        let sanitizer = Sanitizer::new(&["Foo ".to_string()], &[]);
        assert!(sanitizer.is_tag_blacklisted("foo"));
        assert!(sanitizer.is_tag_blacklisted(" FOO"));
        assert!(!sanitizer.is_tag_blacklisted("foobar"));
    }

    #[test]
    fn test_default_attribute_blacklist_strips_handlers() {
        let sanitizer = Sanitizer::new(&default_tag_blacklist(), &default_attribute_blacklist());
        assert!(sanitizer.is_attribute_blacklisted("onClick"));
        assert!(sanitizer.is_attribute_blacklisted("ONLOAD"));
        assert!(!sanitizer.is_attribute_blacklisted("on"));
        assert!(!sanitizer.is_attribute_blacklisted("className"));
        assert!(sanitizer.is_tag_blacklisted("script"));
    }

    #[test]
    fn test_literal_patterns_match_anywhere() {
        let sanitizer = Sanitizer::new(&[], &["prefixed[a-z]*".into()]);
        assert!(sanitizer.is_attribute_blacklisted("prefixedFoo"));
        assert!(sanitizer.is_attribute_blacklisted("prefixedBar"));
        assert!(!sanitizer.is_attribute_blacklisted("unrelated"));
    }

    #[test]
    fn test_invalid_pattern_is_skipped() {
        let sanitizer = Sanitizer::new(&[], &["(unclosed".into(), "^data-".into()]);
        assert!(sanitizer.is_attribute_blacklisted("data-x"));
        assert!(!sanitizer.is_attribute_blacklisted("(unclosed"));
    }
}
