//! Content loader - reads posts and pages and renders their bodies

use lazy_static::lazy_static;
use regex::Regex;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{
    ContentKind, FrontMatter, LinkData, MarkdownRenderer, PageMetaData, PostMetaData, PostName,
    ScanMode, Scanner, SourceDocument,
};
use crate::helpers::{kebab_to_title, page_url, pascal_to_title, post_url};
use crate::templates::{ComponentParams, ComponentRenderer, PAGE_LAYOUT, POST_LAYOUT};
use crate::{Error, Result, Site};

lazy_static! {
    static ref PAGE_DIRECTIVE: Regex = Regex::new(r#"^\s*@page\s+"(.+?)""#).unwrap();
    static ref PAGE_TITLE: Regex = Regex::new(r"<PageTitle>(.*?)</PageTitle>").unwrap();
}

/// Loads content from the posts and pages directories
pub struct ContentLoader<'a> {
    site: &'a Site,
    markdown: MarkdownRenderer,
    components: &'a dyn ComponentRenderer,
}

impl<'a> ContentLoader<'a> {
    /// Create a new content loader
    ///
    /// `components` renders the markup of component pages.
    pub fn new(site: &'a Site, components: &'a dyn ComponentRenderer) -> Self {
        let markdown = MarkdownRenderer::with_options(&site.settings.highlight);
        Self {
            site,
            markdown,
            components,
        }
    }

    /// Load all posts, sorted by file name
    ///
    /// Files that fail to load are logged and skipped.
    pub fn load_posts(&self) -> Result<Vec<PostMetaData>> {
        let mut posts = Vec::new();
        for path in content_files(&self.site.posts_dir, &["md"]) {
            match self.load_post(&path) {
                Ok(post) => posts.push(post),
                Err(e) => tracing::warn!("Skipping post {:?}: {}", path, e),
            }
        }
        Ok(posts)
    }

    /// Load a single post
    pub fn load_post(&self, path: &Path) -> Result<PostMetaData> {
        let doc = SourceDocument::read(path, ContentKind::Post)?;
        let name = PostName::parse(&doc.stem)?;
        let (fm, body) = FrontMatter::parse(&doc.text, &doc.file_name())?;

        let scan = Scanner::new(ScanMode::MarkdownPost).scan(body);
        if scan.unclosed_wrappers > 0 {
            tracing::debug!("{}: {} unclosed wrapper(s)", doc.file_name(), scan.unclosed_wrappers);
        }
        let content = self.markdown.render(&scan.residual_unescaped());

        Ok(PostMetaData {
            title: fm.title(),
            subtitle: fm.subtitle(),
            url: post_url(name.date, &name.slug),
            date: name.date,
            author: fm.author(),
            content,
            components: scan.component_blocks,
            scripts: scan.scripts,
            layout: fm.layout(POST_LAYOUT),
            description: fm.description(),
            slug: name.slug,
        })
    }

    /// Load all pages (`.md` and `.razor`), sorted by file name
    ///
    /// `links` feeds the navigation of component pages.
    pub fn load_pages(&self, links: &[LinkData]) -> Result<Vec<PageMetaData>> {
        let mut pages = Vec::new();
        for path in content_files(&self.site.pages_dir, &["md", "razor"]) {
            let loaded = if has_extension(&path, "razor") {
                self.load_component_page(&path, links)
            } else {
                self.load_markdown_page(&path)
            };
            match loaded {
                Ok(page) => pages.push(page),
                Err(e) => tracing::warn!("Skipping page {:?}: {}", path, e),
            }
        }
        Ok(pages)
    }

    /// Load a Markdown page
    pub fn load_markdown_page(&self, path: &Path) -> Result<PageMetaData> {
        let doc = SourceDocument::read(path, ContentKind::Page)?;
        let (fm, body) = FrontMatter::parse(&doc.text, &doc.file_name())?;

        let scan = Scanner::new(ScanMode::MarkdownPage).scan(body);
        let content = self.markdown.render(&scan.residual_unescaped());

        Ok(PageMetaData {
            title: fm.title(),
            subtitle: fm.subtitle(),
            url: page_url(&doc.stem),
            content,
            components: scan.component_blocks,
            scripts: scan.scripts,
            layout: fm.layout(PAGE_LAYOUT),
            description: fm.description(),
            nav_order: fm.nav_order(),
            kind: doc.kind,
        })
    }

    /// Load a page written as component markup
    ///
    /// The file must start with an `@page "/url"` directive. Embedded
    /// components are extracted, then the remaining markup is rendered as a
    /// whole with the page and site values as parameters.
    pub fn load_component_page(&self, path: &Path, links: &[LinkData]) -> Result<PageMetaData> {
        let doc = SourceDocument::read(path, ContentKind::PageComponent)?;
        let file = doc.file_name();

        let directive = PAGE_DIRECTIVE
            .captures(&doc.text)
            .ok_or_else(|| Error::MissingPageDirective { file: file.clone() })?;
        let url = directive[1].to_string();

        let title = PAGE_TITLE
            .captures(&doc.text)
            .map(|c| c[1].trim().to_string())
            .unwrap_or_else(|| stem_title(&doc.stem));

        // Everything after the directive line
        let after = directive.get(0).map_or(0, |m| m.end());
        let body = doc.text[after..]
            .split_once('\n')
            .map_or("", |(_, rest)| rest);

        let scan = Scanner::new(ScanMode::RazorPage).scan(body);

        let settings = &self.site.settings;
        let mut params = ComponentParams::new();
        params.insert("title".to_string(), title.clone().into());
        params.insert("url".to_string(), url.clone().into());
        params.insert("nav_links".to_string(), serde_json::to_value(links)?);
        params.insert("site_name".to_string(), settings.site_name.clone().into());
        params.insert("site_title".to_string(), settings.site_title.clone().into());
        params.insert(
            "site_description".to_string(),
            settings.site_description.clone().into(),
        );
        params.insert(
            "header_links".to_string(),
            settings.header_links_markup().into(),
        );

        let content = self
            .components
            .render_component(&doc.stem, &scan.residual(), &params)?;

        Ok(PageMetaData {
            title,
            subtitle: String::new(),
            url,
            content,
            components: scan.component_blocks,
            scripts: scan.scripts,
            layout: PAGE_LAYOUT.to_string(),
            description: String::new(),
            nav_order: 0,
            kind: doc.kind,
        })
    }
}

/// Files under `dir` with one of `extensions`, sorted by file name
///
/// A missing directory yields no files.
pub fn content_files(dir: &Path, extensions: &[&str]) -> Vec<PathBuf> {
    if !dir.exists() {
        tracing::debug!("Content directory {:?} does not exist", dir);
        return Vec::new();
    }

    WalkDir::new(dir)
        .follow_links(true)
        .sort_by_file_name()
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file())
        .map(|e| e.into_path())
        .filter(|path| extensions.iter().any(|ext| has_extension(path, ext)))
        .collect()
}

/// Check a file extension, ignoring case
/// Fallback title of a component page: `AboutMe` or `about-me` -> `About Me`
fn stem_title(stem: &str) -> String {
    if stem.contains('-') {
        kebab_to_title(stem)
    } else {
        pascal_to_title(stem)
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case(ext))
        .unwrap_or(false)
}
