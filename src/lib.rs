//! blogweave: a static blog generator for component-enabled Markdown
//!
//! Posts and pages are Markdown files with front matter. Fenced
//! `blazor-component` blocks and inline scripts are lifted out of the body
//! before Markdown conversion; each component is rendered into its own file
//! and leaves a placeholder `div` behind for the client runtime to mount.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod generator;
pub mod helpers;
pub mod templates;

pub use error::{Error, Result};

use std::path::{Path, PathBuf};

/// A blog site rooted at one directory
#[derive(Debug, Clone)]
pub struct Site {
    /// Site configuration
    pub settings: config::BlogSettings,
    /// Base directory
    pub base_dir: PathBuf,
    /// Markdown posts
    pub posts_dir: PathBuf,
    /// Markdown and component pages
    pub pages_dir: PathBuf,
    /// Output root for HTML and the feed
    pub web_root: PathBuf,
    /// Output directory for extracted components
    pub components_dir: PathBuf,
    /// Layout templates
    pub templates_dir: PathBuf,
    /// Output root of the `convert` command
    pub converter_output_dir: PathBuf,
}

impl Site {
    /// Open the site in `base_dir`, discovering its settings
    pub fn new<P: AsRef<Path>>(base_dir: P) -> anyhow::Result<Self> {
        let base_dir = base_dir.as_ref();
        let settings = config::BlogSettings::discover(base_dir)?;
        Ok(Self::with_settings(base_dir, settings))
    }

    /// Resolve the configured directories against `base_dir`
    pub fn with_settings<P: AsRef<Path>>(base_dir: P, settings: config::BlogSettings) -> Self {
        let base_dir = base_dir.as_ref().to_path_buf();

        Self {
            posts_dir: base_dir.join(&settings.posts_content_path),
            pages_dir: base_dir.join(&settings.pages_content_path),
            web_root: base_dir.join(&settings.output_web_root_path),
            components_dir: base_dir.join(&settings.output_components_path),
            templates_dir: base_dir.join(&settings.source_templates_path),
            converter_output_dir: base_dir.join(&settings.converter_output_path),
            settings,
            base_dir,
        }
    }

    /// Generate the static site
    pub fn generate(&self) -> anyhow::Result<()> {
        commands::generate::run(self)
    }

    /// Convert content into component source pages
    pub fn convert(&self) -> anyhow::Result<()> {
        commands::convert::run(self)
    }

    /// Remove generated output
    pub fn clean(&self) -> anyhow::Result<()> {
        commands::clean::run(self)
    }

    /// Create a new post or page
    pub fn new_post(&self, title: &str, layout: &str) -> anyhow::Result<PathBuf> {
        commands::new::create(self, title, layout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_paths_resolve_against_base_dir() {
        let site = Site::with_settings("/srv/blog", config::BlogSettings::default());
        assert_eq!(site.posts_dir, PathBuf::from("/srv/blog/Source/Content/Posts"));
        assert_eq!(site.web_root, PathBuf::from("/srv/blog/wwwroot"));
        assert_eq!(site.components_dir, PathBuf::from("/srv/blog/Components"));
        assert_eq!(site.templates_dir, PathBuf::from("/srv/blog/Source/Templates"));
    }

    #[test]
    fn test_absolute_paths_are_kept() {
        let settings = config::BlogSettings {
            output_web_root_path: "/var/www".to_string(),
            ..config::BlogSettings::default()
        };
        let site = Site::with_settings("/srv/blog", settings);
        assert_eq!(site.web_root, PathBuf::from("/var/www"));
    }
}
