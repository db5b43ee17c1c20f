//! Blog settings (_config.yml or wwwroot/appsettings.json)

use crate::Result;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Name of the primary settings file in the site root
pub const CONFIG_FILE: &str = "_config.yml";

/// Main blog configuration
///
/// Field names are snake_case in `_config.yml`; the PascalCase aliases let the
/// same record be read from the `BlogSettings` section of an `appsettings.json`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BlogSettings {
    // Site
    #[serde(alias = "SiteName")]
    pub site_name: String,
    #[serde(alias = "SiteTitle")]
    pub site_title: String,
    #[serde(alias = "SiteUrl")]
    pub site_url: String,
    #[serde(alias = "SiteDescription")]
    pub site_description: String,
    #[serde(alias = "HeaderLinks")]
    pub header_links: Vec<String>,

    // Directory
    #[serde(alias = "PostsContentPath")]
    pub posts_content_path: String,
    #[serde(alias = "PagesContentPath")]
    pub pages_content_path: String,
    #[serde(alias = "OutputWebRootPath")]
    pub output_web_root_path: String,
    #[serde(alias = "OutputComponentsPath")]
    pub output_components_path: String,
    #[serde(alias = "SourceTemplatesPath")]
    pub source_templates_path: String,
    #[serde(alias = "ConverterOutputPath")]
    pub converter_output_path: String,

    // Rendering
    #[serde(alias = "Highlight")]
    pub highlight: HighlightConfig,
    #[serde(alias = "PrerenderComponents")]
    pub prerender_components: bool,
}

impl Default for BlogSettings {
    fn default() -> Self {
        Self {
            site_name: "MyBlog".to_string(),
            site_title: "A Component Blog".to_string(),
            site_url: "https://www.example.com".to_string(),
            site_description: "A blog about software development and technology.".to_string(),
            header_links: Vec::new(),

            posts_content_path: "Source/Content/Posts".to_string(),
            pages_content_path: "Source/Content/Pages".to_string(),
            output_web_root_path: "wwwroot".to_string(),
            output_components_path: "Components".to_string(),
            source_templates_path: "Source/Templates".to_string(),
            converter_output_path: "Pages".to_string(),

            highlight: HighlightConfig::default(),
            prerender_components: true,
        }
    }
}

/// Section of `appsettings.json` holding the settings
#[derive(Debug, Deserialize)]
struct AppSettings {
    #[serde(rename = "BlogSettings", default)]
    blog_settings: BlogSettings,
}

impl BlogSettings {
    /// Load settings from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let settings: BlogSettings = serde_yaml::from_str(&content)?;
        Ok(settings)
    }

    /// Load the `BlogSettings` section of an `appsettings.json` file
    pub fn load_app_settings<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let app: AppSettings = serde_json::from_str(&content)?;
        Ok(app.blog_settings)
    }

    /// Discover settings for a site rooted at `base_dir`
    ///
    /// `_config.yml` wins over `wwwroot/appsettings.json`; with neither present
    /// the defaults are used.
    pub fn discover<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref();
        let yaml_path = base_dir.join(CONFIG_FILE);
        if yaml_path.exists() {
            tracing::debug!("Loading settings from {:?}", yaml_path);
            return Self::load(&yaml_path);
        }

        let json_path = base_dir.join("wwwroot").join("appsettings.json");
        if json_path.exists() {
            tracing::debug!("Loading settings from {:?}", json_path);
            return Self::load_app_settings(&json_path);
        }

        Ok(Self::default())
    }

    /// Header links joined into one markup block
    pub fn header_links_markup(&self) -> String {
        self.header_links.join("\n")
    }
}

/// Syntax highlighting for sample code blocks
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HighlightConfig {
    #[serde(alias = "Enable")]
    pub enable: bool,
    #[serde(alias = "Theme")]
    pub theme: String,
}

impl Default for HighlightConfig {
    fn default() -> Self {
        Self {
            enable: false,
            theme: "base16-ocean.dark".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_settings() {
        let settings = BlogSettings::default();
        assert_eq!(settings.posts_content_path, "Source/Content/Posts");
        assert_eq!(settings.output_web_root_path, "wwwroot");
        assert!(!settings.highlight.enable);
        assert!(settings.prerender_components);
    }

    #[test]
    fn test_parse_yaml_settings() {
        let yaml = r#"
site_name: Tim's Blog
site_url: https://blog.example.org
header_links:
  - <link href="a.css" />
highlight:
  enable: true
"#;
        let settings: BlogSettings = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(settings.site_name, "Tim's Blog");
        assert_eq!(settings.site_url, "https://blog.example.org");
        assert_eq!(settings.header_links.len(), 1);
        assert!(settings.highlight.enable);
        assert_eq!(settings.pages_content_path, "Source/Content/Pages");
    }

    #[test]
    fn test_parse_app_settings_json() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("appsettings.json");
        fs::write(
            &path,
            r#"{ "Logging": {}, "BlogSettings": { "SiteName": "Json Blog", "OutputWebRootPath": "public" } }"#,
        )
        .unwrap();

        let settings = BlogSettings::load_app_settings(&path).unwrap();
        assert_eq!(settings.site_name, "Json Blog");
        assert_eq!(settings.output_web_root_path, "public");
        assert_eq!(settings.output_components_path, "Components");
    }

    #[test]
    fn test_discover_prefers_yaml() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir_all(dir.path().join("wwwroot")).unwrap();
        fs::write(
            dir.path().join("wwwroot/appsettings.json"),
            r#"{ "BlogSettings": { "SiteName": "From Json" } }"#,
        )
        .unwrap();
        assert_eq!(
            BlogSettings::discover(dir.path()).unwrap().site_name,
            "From Json"
        );

        fs::write(dir.path().join(CONFIG_FILE), "site_name: From Yaml\n").unwrap();
        assert_eq!(
            BlogSettings::discover(dir.path()).unwrap().site_name,
            "From Yaml"
        );
    }

    #[test]
    fn test_invalid_yaml_is_a_yaml_error() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE), "site_name: [unclosed\n").unwrap();
        let err = BlogSettings::discover(dir.path()).unwrap_err();
        assert!(matches!(err, crate::Error::Yaml(_)));
    }
}
