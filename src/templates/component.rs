//! Component rendering
//!
//! Extracted component blocks (and the residual markup of component pages)
//! are rendered independently of the surrounding document. The generator only
//! knows the [`ComponentRenderer`] trait; the shipped implementation evaluates
//! the source as a Tera template.

use indexmap::IndexMap;
use std::collections::HashMap;
use tera::{Context, Tera};

use crate::{Error, Result};

/// Named parameters handed to a component
pub type ComponentParams = IndexMap<String, serde_json::Value>;

/// Turns component source markup into HTML
pub trait ComponentRenderer {
    /// Render `source`; `key` labels errors
    fn render_component(&self, key: &str, source: &str, params: &ComponentParams) -> Result<String>;
}

/// Tera-backed component renderer
///
/// Autoescaping is off: components produce markup, and values passed in are
/// already HTML.
#[derive(Clone)]
pub struct TeraComponentRenderer {
    tera: Tera,
}

impl TeraComponentRenderer {
    pub fn new() -> Self {
        let mut tera = Tera::default();
        tera.autoescape_on(vec![]);
        tera.register_filter("strip_html", strip_html_filter);
        tera.register_filter("truncate_chars", truncate_chars_filter);
        tera.register_filter("date_format", date_format_filter);
        Self { tera }
    }
}

impl Default for TeraComponentRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl ComponentRenderer for TeraComponentRenderer {
    fn render_component(&self, key: &str, source: &str, params: &ComponentParams) -> Result<String> {
        let to_error = |source: tera::Error| Error::ComponentRender {
            key: key.to_string(),
            source,
        };

        let context = Context::from_serialize(params).map_err(to_error)?;
        // render_str registers a one-off template, so work on a copy
        let mut tera = self.tera.clone();
        tera.render_str(source, &context).map_err(to_error)
    }
}

/// Tera filter: strip HTML tags
fn strip_html_filter(
    value: &tera::Value,
    _args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("strip_html", "value", String, value);
    let mut result = String::with_capacity(s.len());
    let mut in_tag = false;
    for c in s.chars() {
        match c {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => result.push(c),
            _ => {}
        }
    }
    Ok(tera::Value::String(result))
}

/// Tera filter: truncate by character count
fn truncate_chars_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("truncate_chars", "value", String, value);
    let length = match args.get("length") {
        Some(val) => tera::try_get_value!("truncate_chars", "length", usize, val),
        None => 150,
    };

    if s.chars().count() <= length {
        Ok(tera::Value::String(s))
    } else {
        let truncated: String = s.chars().take(length).collect();
        Ok(tera::Value::String(format!("{}...", truncated.trim_end())))
    }
}

/// Tera filter: reformat a `YYYY-MM-DD` date
///
/// `format` is a chrono pattern, `%b %d, %Y` by default.
fn date_format_filter(
    value: &tera::Value,
    args: &HashMap<String, tera::Value>,
) -> tera::Result<tera::Value> {
    let s = tera::try_get_value!("date_format", "value", String, value);
    let format = match args.get("format") {
        Some(val) => tera::try_get_value!("date_format", "format", String, val),
        None => "%b %d, %Y".to_string(),
    };

    match chrono::NaiveDate::parse_from_str(&s, "%Y-%m-%d") {
        Ok(date) => Ok(tera::Value::String(date.format(&format).to_string())),
        Err(_) => Ok(tera::Value::String(s)),
    }
}
