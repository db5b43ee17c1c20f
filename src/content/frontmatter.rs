//! Front-matter parsing

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::{Error, Result};

lazy_static! {
    static ref DOCUMENT: Regex = Regex::new(r"(?s)^\s*---\s*(.*?)\s*---\s*(.*)$").unwrap();
}

/// Default value of a missing `title`
pub const DEFAULT_TITLE: &str = "Untitled";

/// Front-matter data from a post or page
///
/// Keys are kept exactly as written. A key that appears more than once keeps
/// the value of its last occurrence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FrontMatter {
    fields: IndexMap<String, String>,
}

impl FrontMatter {
    /// Split a document into its front matter and body
    ///
    /// `file` is only used to label the error.
    pub fn split<'a>(content: &'a str, file: &str) -> Result<(&'a str, &'a str)> {
        let caps = DOCUMENT
            .captures(content)
            .ok_or_else(|| Error::MalformedDocument {
                file: file.to_string(),
            })?;

        let meta = caps.get(1).map_or("", |m| m.as_str());
        let body = caps.get(2).map_or("", |m| m.as_str());
        Ok((meta, body))
    }

    /// Split a document and parse its front matter
    /// Returns (front_matter, body)
    pub fn parse<'a>(content: &'a str, file: &str) -> Result<(Self, &'a str)> {
        let (meta, body) = Self::split(content, file)?;
        Ok((Self::from_block(meta), body))
    }

    /// Parse the `key: value` lines of a front-matter block
    pub fn from_block(block: &str) -> Self {
        let mut fields = IndexMap::new();
        for line in block.lines() {
            if line.trim().is_empty() {
                continue;
            }
            let Some((key, value)) = line.split_once(':') else {
                tracing::debug!("Ignoring front-matter line without a key: {}", line);
                continue;
            };
            fields.insert(key.trim().to_string(), value.trim().to_string());
        }
        Self { fields }
    }

    /// Raw value with surrounding double quotes removed
    pub fn get(&self, key: &str) -> Option<&str> {
        self.fields.get(key).map(|v| v.trim_matches('"'))
    }

    /// Value or empty string
    pub fn get_or_empty(&self, key: &str) -> String {
        self.get(key).unwrap_or_default().to_string()
    }

    pub fn title(&self) -> String {
        self.get("title").unwrap_or(DEFAULT_TITLE).to_string()
    }

    pub fn subtitle(&self) -> String {
        self.get_or_empty("subtitle")
    }

    pub fn author(&self) -> String {
        self.get_or_empty("author")
    }

    pub fn description(&self) -> String {
        self.get_or_empty("description")
    }

    /// Layout name, falling back to the given default
    pub fn layout(&self, default: &str) -> String {
        match self.get("layout") {
            Some(layout) if !layout.trim().is_empty() => layout.to_string(),
            _ => default.to_string(),
        }
    }

    /// Navigation order for pages; anything that is not an integer sorts as 0
    pub fn nav_order(&self) -> i32 {
        self.get("navorder")
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(0)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_front_matter() {
        let content = "---\ntitle: Hello\n---\n\nBody text.\n";
        let (meta, body) = FrontMatter::split(content, "hello.md").unwrap();
        assert_eq!(meta, "title: Hello");
        assert_eq!(body, "Body text.\n");
    }

    #[test]
    fn test_split_allows_leading_whitespace() {
        let content = "\n  ---\ntitle: Hello\n---\nBody";
        let (meta, body) = FrontMatter::split(content, "hello.md").unwrap();
        assert_eq!(meta, "title: Hello");
        assert_eq!(body, "Body");
    }

    #[test]
    fn test_missing_delimiters_is_malformed() {
        for content in ["Just a body", "---\ntitle: Hello\nno closing", "title: x\n---\n"] {
            let err = FrontMatter::split(content, "bad.md").unwrap_err();
            assert!(matches!(err, Error::MalformedDocument { ref file } if file == "bad.md"));
        }
    }

    #[test]
    fn test_parse_fields() {
        let content = r#"---
title: "Hello"
subtitle: A first post
author: Tim
layout: wide
navorder: 3
---
Body"#;
        let (fm, body) = FrontMatter::parse(content, "post.md").unwrap();
        assert_eq!(body, "Body");
        assert_eq!(fm.title(), "Hello");
        assert_eq!(fm.subtitle(), "A first post");
        assert_eq!(fm.author(), "Tim");
        assert_eq!(fm.layout("post"), "wide");
        assert_eq!(fm.nav_order(), 3);
        assert_eq!(fm.len(), 5);
    }

    #[test]
    fn test_last_occurrence_wins() {
        let fm = FrontMatter::from_block("title: First\nauthor: A\ntitle: Second");
        assert_eq!(fm.title(), "Second");
        assert_eq!(fm.len(), 2);
    }

    #[test]
    fn test_value_keeps_text_after_first_colon() {
        let fm = FrontMatter::from_block("description: Time: 10:30");
        assert_eq!(fm.description(), "Time: 10:30");
    }

    #[test]
    fn test_keys_are_case_sensitive() {
        let fm = FrontMatter::from_block("Title: Upper");
        assert_eq!(fm.title(), DEFAULT_TITLE);
        assert_eq!(fm.get("Title"), Some("Upper"));
    }

    #[test]
    fn test_defaults() {
        let fm = FrontMatter::from_block("");
        assert!(fm.is_empty());
        assert_eq!(fm.title(), "Untitled");
        assert_eq!(fm.layout("page"), "page");
        assert_eq!(fm.nav_order(), 0);
        assert_eq!(fm.subtitle(), "");
        assert_eq!(fm.author(), "");
    }

    #[test]
    fn test_non_integer_nav_order_is_zero() {
        let fm = FrontMatter::from_block("navorder: first");
        assert_eq!(fm.nav_order(), 0);
    }
}
