//! Error types shared by the content, template and generator layers

use std::path::PathBuf;
use thiserror::Error;

/// Errors raised while turning one content file (or the feed) into output
#[derive(Error, Debug)]
pub enum Error {
    #[error("{file}: content does not contain valid front-matter")]
    MalformedDocument { file: String },

    #[error("{file}: post file names must look like YYYY-M-D-slug")]
    InvalidPostName { file: String },

    #[error("{file}: component page does not contain a valid @page directive")]
    MissingPageDirective { file: String },

    #[error("failed to render component '{key}': {source}")]
    ComponentRender {
        key: String,
        #[source]
        source: tera::Error,
    },

    #[error("layout template {file} not found in {dir:?}")]
    MissingLayout { file: String, dir: PathBuf },

    #[error("feed error: {0}")]
    Feed(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
