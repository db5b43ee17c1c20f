//! Configuration module

mod settings;

pub use settings::{BlogSettings, HighlightConfig, CONFIG_FILE};
