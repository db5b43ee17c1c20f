//! Remove generated output

use anyhow::Result;
use std::fs;

use crate::generator::{self, FEED_FILE};
use crate::Site;

/// Delete generated HTML, extracted components and the feed
pub fn run(site: &Site) -> Result<()> {
    let mut removed = generator::clear_outputs(site)?;

    let feed = site.web_root.join(FEED_FILE);
    if feed.exists() {
        fs::remove_file(&feed)?;
        removed += 1;
    }

    tracing::info!("Deleted {} generated files", removed);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlogSettings;

    #[test]
    fn test_clean_keeps_static_assets() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::with_settings(dir.path(), BlogSettings::default());
        fs::create_dir_all(site.web_root.join("post/2024/1/5")).unwrap();
        fs::create_dir_all(site.web_root.join("css")).unwrap();
        fs::create_dir_all(&site.components_dir).unwrap();
        fs::write(site.web_root.join("index.html"), "x").unwrap();
        fs::write(site.web_root.join("post/2024/1/5/hello.html"), "x").unwrap();
        fs::write(site.web_root.join(FEED_FILE), "x").unwrap();
        fs::write(site.web_root.join("css/site.css"), "x").unwrap();
        fs::write(site.components_dir.join("Counter1.html"), "x").unwrap();

        run(&site).unwrap();

        assert!(!site.web_root.join("index.html").exists());
        assert!(!site.web_root.join("post/2024/1/5/hello.html").exists());
        assert!(!site.web_root.join(FEED_FILE).exists());
        assert!(!site.components_dir.join("Counter1.html").exists());
        assert!(site.web_root.join("css/site.css").exists());
    }

    #[test]
    fn test_clean_empty_site() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::with_settings(dir.path(), BlogSettings::default());
        run(&site).unwrap();
    }
}
