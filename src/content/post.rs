//! Post and Page models

use chrono::NaiveDate;
use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::{Error, Result};

lazy_static! {
    static ref POST_NAME: Regex =
        Regex::new(r"^(\d{4})-(\d{1,2})-(\d{1,2})-(?<slug>.+)$").unwrap();
}

/// What a content file turns into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContentKind {
    /// Dated Markdown post
    Post,
    /// Markdown page
    Page,
    /// Page written as component markup (`.razor`)
    PageComponent,
}

/// Raw text of one content file
#[derive(Debug, Clone)]
pub struct SourceDocument {
    /// Full source file path
    pub path: PathBuf,
    /// File name without extension
    pub stem: String,
    /// Full file text
    pub text: String,
    pub kind: ContentKind,
}

impl SourceDocument {
    /// Read a content file from disk
    pub fn read(path: &Path, kind: ContentKind) -> Result<Self> {
        let text = fs::read_to_string(path)?;
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        Ok(Self {
            path: path.to_path_buf(),
            stem,
            text,
            kind,
        })
    }

    /// File name used in diagnostics
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_else(|| self.stem.clone())
    }
}

/// Date and slug encoded in a post file name (`2024-1-5-hello`)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostName {
    pub date: NaiveDate,
    pub slug: String,
}

impl PostName {
    pub fn parse(stem: &str) -> Result<Self> {
        let invalid = || Error::InvalidPostName {
            file: stem.to_string(),
        };
        let caps = POST_NAME.captures(stem).ok_or_else(invalid)?;

        let year: i32 = caps[1].parse().map_err(|_| invalid())?;
        let month: u32 = caps[2].parse().map_err(|_| invalid())?;
        let day: u32 = caps[3].parse().map_err(|_| invalid())?;
        let date = NaiveDate::from_ymd_opt(year, month, day).ok_or_else(invalid)?;

        Ok(Self {
            date,
            slug: caps["slug"].to_string(),
        })
    }
}

/// A rendered blog post
#[derive(Debug, Clone, Serialize)]
pub struct PostMetaData {
    pub title: String,
    pub subtitle: String,
    /// Site-relative URL (`/post/2024/1/5/hello`)
    pub url: String,
    pub date: NaiveDate,
    pub author: String,
    /// Rendered HTML body
    pub content: String,
    /// Placeholder key -> component source
    pub components: IndexMap<String, String>,
    pub scripts: Vec<String>,
    pub layout: String,
    pub description: String,
    pub slug: String,
}

impl PostMetaData {
    /// Navigation entry for this post
    pub fn link(&self) -> LinkData {
        LinkData {
            title: self.title.clone(),
            subtitle: self.subtitle.clone(),
            url: self.url.clone(),
            date: self.date,
            author: self.author.clone(),
        }
    }
}

/// A rendered page
#[derive(Debug, Clone, Serialize)]
pub struct PageMetaData {
    pub title: String,
    pub subtitle: String,
    /// Site-relative URL; `/` for the index page
    pub url: String,
    pub content: String,
    pub components: IndexMap<String, String>,
    pub scripts: Vec<String>,
    pub layout: String,
    pub description: String,
    pub nav_order: i32,
    pub kind: ContentKind,
}

/// Read-only navigation projection of a post
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LinkData {
    pub title: String,
    pub subtitle: String,
    pub url: String,
    pub date: NaiveDate,
    pub author: String,
}
