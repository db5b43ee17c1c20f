//! `@*NAME*@` placeholder substitution

use lazy_static::lazy_static;
use regex::{Captures, Regex};
use std::collections::HashMap;

lazy_static! {
    static ref TOKEN: Regex = Regex::new(r"@\*([A-Z][A-Za-z0-9_ ,:\-]*)\*@").unwrap();
}

pub const TITLE: &str = "TITLE";
pub const SUBTITLE: &str = "SUBTITLE";
pub const DESCRIPTION: &str = "DESCRIPTION";
pub const CONTENT: &str = "CONTENT";
pub const URL: &str = "URL";
pub const AUTHOR: &str = "AUTHOR";
pub const PUBLISHED_DATE_ISO: &str = "PUBLISHED_DATE_yyyy-MM-ddTHH:mm:ssZ";
pub const PUBLISHED_DATE_SHORT: &str = "PUBLISHED_DATE_MMM dd, yyyy";
pub const NAV_ORDER: &str = "NAV_ORDER";
pub const NAV: &str = "NAV";
pub const PAGE_NAV: &str = "PAGE_NAV";
pub const SCRIPTS: &str = "SCRIPTS";
pub const SITE_NAME: &str = "SITE_NAME";
pub const SITE_TITLE: &str = "SITE_TITLE";
pub const SITE_DESCRIPTION: &str = "SITE_DESCRIPTION";
pub const HEADER_LINKS: &str = "HEADER_LINKS";
pub const LAYOUT: &str = "LAYOUT";

/// Values for the placeholders of one template
///
/// # Examples
/// ```ignore
/// let html = Bindings::new()
///     .set(TITLE, "Hello")
///     .bind("<h1>@*TITLE*@</h1>"); // -> "<h1>Hello</h1>"
/// ```
#[derive(Debug, Clone, Default)]
pub struct Bindings {
    values: HashMap<&'static str, String>,
}

impl Bindings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.values.insert(name, value.into());
        self
    }

    /// Substitute every known token in one pass
    ///
    /// Substituted values are not scanned again, so content that happens to
    /// contain `@*TITLE*@` stays literal. Unknown tokens are left as written.
    pub fn bind(&self, template: &str) -> String {
        TOKEN
            .replace_all(template, |caps: &Captures| match self.values.get(&caps[1]) {
                Some(value) => value.clone(),
                None => caps[0].to_string(),
            })
            .into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bind_known_tokens() {
        let html = Bindings::new()
            .set(TITLE, "Hello")
            .set(PUBLISHED_DATE_SHORT, "Jan 05, 2024")
            .set(PUBLISHED_DATE_ISO, "2024-01-05T00:00:00Z")
            .bind("<h1>@*TITLE*@</h1><time datetime=\"@*PUBLISHED_DATE_yyyy-MM-ddTHH:mm:ssZ*@\">@*PUBLISHED_DATE_MMM dd, yyyy*@</time>");
        assert_eq!(
            html,
            "<h1>Hello</h1><time datetime=\"2024-01-05T00:00:00Z\">Jan 05, 2024</time>"
        );
    }

    #[test]
    fn test_unknown_tokens_are_kept() {
        let html = Bindings::new().set(TITLE, "x").bind("@*TITLE*@ @*FOOTER*@");
        assert_eq!(html, "x @*FOOTER*@");
    }

    #[test]
    fn test_repeated_tokens() {
        let html = Bindings::new()
            .set(SITE_NAME, "Blog")
            .bind("<title>@*SITE_NAME*@</title><h1>@*SITE_NAME*@</h1>");
        assert_eq!(html, "<title>Blog</title><h1>Blog</h1>");
    }

    #[test]
    fn test_values_are_not_rescanned() {
        let html = Bindings::new()
            .set(CONTENT, "<p>write @*TITLE*@ in templates</p>")
            .set(TITLE, "Oops")
            .bind("@*CONTENT*@");
        assert_eq!(html, "<p>write @*TITLE*@ in templates</p>");
    }

    #[test]
    fn test_razor_at_signs_untouched() {
        let html = Bindings::new().set(TITLE, "T").bind("@page \"/x\"\n@code { }\n@*TITLE*@");
        assert_eq!(html, "@page \"/x\"\n@code { }\nT");
    }
}
