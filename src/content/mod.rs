//! Content module - front matter, segment scanning and Markdown rendering

mod frontmatter;
pub mod loader;
mod markdown;
mod post;
pub mod scanner;

pub use frontmatter::FrontMatter;
pub use markdown::MarkdownRenderer;
pub use post::{ContentKind, LinkData, PageMetaData, PostMetaData, PostName, SourceDocument};
pub use scanner::{ScanMode, ScanResult, Scanner};
