//! Layout template registry
//!
//! A layout named `wide` lives in `WideTemplate.html` (or `widetemplate.html`,
//! names are matched case-insensitively). The registry is read once per run.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::helpers::upper_first;
use crate::{Error, Result};

/// File name suffix shared by all layout templates
const TEMPLATE_SUFFIX: &str = "template";

/// Layout templates of one file type, keyed by lowercase layout name
#[derive(Debug, Clone)]
pub struct LayoutRegistry {
    dir: PathBuf,
    ext: String,
    templates: HashMap<String, String>,
}

impl LayoutRegistry {
    /// Load every `{layout}template.{ext}` file in `dir`
    ///
    /// Fails with [`Error::MissingLayout`] if any of `required` has no file.
    pub fn load(dir: &Path, ext: &str, required: &[&str]) -> Result<Self> {
        let mut templates = HashMap::new();

        if dir.is_dir() {
            for entry in fs::read_dir(dir)? {
                let path = entry?.path();
                if !path.is_file() {
                    continue;
                }
                if let Some(layout) = layout_name(&path, ext) {
                    let content = fs::read_to_string(&path)?;
                    tracing::debug!("Loaded layout '{}' from {:?}", layout, path);
                    templates.insert(layout, content);
                }
            }
        }

        let registry = Self {
            dir: dir.to_path_buf(),
            ext: ext.to_string(),
            templates,
        };

        for layout in required {
            if !registry.contains(layout) {
                return Err(Error::MissingLayout {
                    file: template_file_name(layout, ext),
                    dir: registry.dir.clone(),
                });
            }
        }

        Ok(registry)
    }

    pub fn contains(&self, layout: &str) -> bool {
        self.templates.contains_key(&layout.to_lowercase())
    }

    /// Template for `layout`, or for `default` when no such layout exists
    ///
    /// Returns `None` when the chosen template is blank; callers skip the
    /// document without treating it as an error.
    pub fn resolve(&self, layout: &str, default: &str) -> Option<&str> {
        let template = match self.templates.get(&layout.to_lowercase()) {
            Some(template) => template,
            None => {
                tracing::warn!(
                    "No {} in {:?}, using the '{}' layout",
                    self.file_name(layout),
                    self.dir,
                    default
                );
                self.templates.get(&default.to_lowercase())?
            }
        };

        if template.trim().is_empty() {
            tracing::debug!("Layout '{}' is empty, skipping", layout);
            return None;
        }
        Some(template)
    }

    /// Expected file name of a layout: `post` -> `PostTemplate.html`
    pub fn file_name(&self, layout: &str) -> String {
        template_file_name(layout, &self.ext)
    }
}

fn template_file_name(layout: &str, ext: &str) -> String {
    format!("{}Template.{}", upper_first(layout), ext)
}

/// `PostTemplate.html` -> `post`
fn layout_name(path: &Path, ext: &str) -> Option<String> {
    let file_ext = path.extension()?.to_str()?;
    if !file_ext.eq_ignore_ascii_case(ext) {
        return None;
    }
    let stem = path.file_stem()?.to_str()?.to_lowercase();
    let layout = stem.strip_suffix(TEMPLATE_SUFFIX)?;
    if layout.is_empty() {
        None
    } else {
        Some(layout.to_string())
    }
}
