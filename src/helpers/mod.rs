//! Helper functions shared by the content pipeline and the templates
//!
//! Casing conversions for component names, URL building against the site
//! base, date formats used by templates and feeds, and small HTML snippets.

mod casing;
mod date;
mod html;
mod url;

pub use casing::*;
pub use date::*;
pub use html::*;
pub use url::*;
