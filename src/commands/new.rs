//! Create a new post or page

use anyhow::Result;
use chrono::{Datelike, NaiveDate};
use std::fs;
use std::path::PathBuf;

use crate::templates::PAGE_LAYOUT;
use crate::Site;

/// Create a post dated today, or a page when `layout` is `page`
pub fn create(site: &Site, title: &str, layout: &str) -> Result<PathBuf> {
    create_dated(site, title, layout, chrono::Local::now().date_naive())
}

/// Create a post or page with an explicit post date
pub fn create_dated(site: &Site, title: &str, layout: &str, date: NaiveDate) -> Result<PathBuf> {
    let slug = slug::slugify(title);
    if slug.is_empty() {
        anyhow::bail!("Title {:?} does not produce a usable file name", title);
    }

    let (file_path, content) = if layout == PAGE_LAYOUT {
        (
            site.pages_dir.join(format!("{}.md", slug)),
            format!("---\ntitle: {}\nnavorder: 0\n---\n", title),
        )
    } else {
        (
            site.posts_dir.join(format!(
                "{}-{}-{}-{}.md",
                date.year(),
                date.month(),
                date.day(),
                slug
            )),
            format!(
                "---\ntitle: {}\nsubtitle: \nauthor: \nlayout: {}\n---\n",
                title, layout
            ),
        )
    };

    if file_path.exists() {
        anyhow::bail!("File already exists: {:?}", file_path);
    }

    if let Some(parent) = file_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&file_path, content)?;
    tracing::info!("Created: {:?}", file_path);

    Ok(file_path)
}
