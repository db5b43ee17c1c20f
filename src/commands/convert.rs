//! Convert Markdown content into component source pages
//!
//! Unlike `generate`, nothing is extracted: component fences stay in the
//! Markdown, `@` in prose is doubled so it survives as a literal in the
//! component markup, and a trailing `@code` section is appended verbatim
//! after the converted HTML.

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::loader::content_files;
use crate::content::{ContentKind, FrontMatter, MarkdownRenderer, PostName, ScanMode, Scanner, SourceDocument};
use crate::helpers::{iso_date, page_url, post_url, short_date};
use crate::templates::binder::{self, Bindings};
use crate::templates::{LayoutRegistry, PAGE_LAYOUT, POST_LAYOUT};
use crate::Site;

/// Extension of converter templates and output files
pub const RAZOR_EXTENSION: &str = "razor";

/// One converted file, not yet written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Converted {
    pub path: PathBuf,
    pub contents: String,
}

/// Converts posts and pages with the `.razor` layouts
pub struct Converter {
    layouts: LayoutRegistry,
    markdown: MarkdownRenderer,
    posts_out: PathBuf,
    pages_out: PathBuf,
}

impl Converter {
    pub fn new(site: &Site) -> crate::Result<Self> {
        let layouts = LayoutRegistry::load(
            &site.templates_dir,
            RAZOR_EXTENSION,
            &[POST_LAYOUT, PAGE_LAYOUT],
        )?;
        Ok(Self {
            layouts,
            markdown: MarkdownRenderer::new(),
            posts_out: site.converter_output_dir.join("Posts"),
            pages_out: site.converter_output_dir.join("Pages"),
        })
    }

    /// Convert one dated post; `None` when its layout is blank
    pub fn convert_post(&self, path: &Path) -> crate::Result<Option<Converted>> {
        let doc = SourceDocument::read(path, ContentKind::Post)?;
        let name = PostName::parse(&doc.stem)?;
        let (fm, body) = FrontMatter::parse(&doc.text, &doc.file_name())?;

        let scan = Scanner::new(ScanMode::Converter).scan(body);
        let mut content = self.markdown.render(&scan.residual());
        if let Some(code) = &scan.trailing_code {
            content.push_str("\n\n");
            content.push_str(code);
        }

        let layout = fm.layout(POST_LAYOUT);
        let Some(template) = self.layouts.resolve(&layout, POST_LAYOUT) else {
            return Ok(None);
        };

        let contents = Bindings::new()
            .set(binder::TITLE, fm.title())
            .set(binder::SUBTITLE, fm.subtitle())
            .set(binder::CONTENT, content)
            .set(binder::PUBLISHED_DATE_ISO, iso_date(name.date))
            .set(binder::PUBLISHED_DATE_SHORT, short_date(name.date))
            .set(binder::AUTHOR, fm.author())
            .set(binder::URL, post_url(name.date, &name.slug))
            .bind(template);

        Ok(Some(Converted {
            path: self.posts_out.join(format!("{}.{}", name.slug, RAZOR_EXTENSION)),
            contents,
        }))
    }

    /// Convert one page; its body is not scanned
    pub fn convert_page(&self, path: &Path) -> crate::Result<Option<Converted>> {
        let doc = SourceDocument::read(path, ContentKind::Page)?;
        let (fm, body) = FrontMatter::parse(&doc.text, &doc.file_name())?;
        let content = self.markdown.render(body);

        let layout = fm.layout(PAGE_LAYOUT);
        let Some(template) = self.layouts.resolve(&layout, PAGE_LAYOUT) else {
            return Ok(None);
        };

        let contents = Bindings::new()
            .set(binder::TITLE, fm.title())
            .set(binder::CONTENT, content)
            .set(binder::NAV_ORDER, fm.nav_order().to_string())
            .set(binder::URL, page_url(&doc.stem))
            .bind(template);

        Ok(Some(Converted {
            path: self.pages_out.join(format!("{}.{}", doc.stem, RAZOR_EXTENSION)),
            contents,
        }))
    }
}

/// Convert every post and page, writing the results
pub fn run(site: &Site) -> Result<()> {
    let converter = Converter::new(site)?;
    let mut written = 0;

    let posts = content_files(&site.posts_dir, &["md"])
        .into_iter()
        .map(|path| (converter.convert_post(&path), path));
    let pages = content_files(&site.pages_dir, &["md"])
        .into_iter()
        .map(|path| (converter.convert_page(&path), path));

    for (result, source) in posts.chain(pages) {
        match result {
            Ok(Some(converted)) => {
                if let Some(parent) = converted.path.parent() {
                    fs::create_dir_all(parent)?;
                }
                fs::write(&converted.path, &converted.contents)?;
                tracing::debug!("Converted {:?} -> {:?}", source, converted.path);
                written += 1;
            }
            Ok(None) => tracing::debug!("Skipped {:?}: blank layout", source),
            Err(e) => tracing::warn!("Failed to convert {:?}: {}", source, e),
        }
    }

    tracing::info!(
        "Converted {} files into {:?}",
        written,
        site.converter_output_dir
    );
    Ok(())
}
