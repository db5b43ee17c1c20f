//! Generator module - binds rendered content into layouts and writes the site

mod feed;

pub use feed::build_feed;

use glob::Pattern;
use indexmap::IndexMap;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use crate::content::{LinkData, PageMetaData, PostMetaData};
use crate::helpers::{
    iso_date, kebab_to_pascal, nav_menu, page_file_stem, page_menu, script_tags, short_date,
};
use crate::templates::binder::{self, Bindings};
use crate::templates::{ComponentParams, ComponentRenderer, LayoutRegistry, PAGE_LAYOUT, POST_LAYOUT};
use crate::{Result, Site};

/// Extension of the HTML layout templates
pub const TEMPLATE_EXTENSION: &str = "html";

/// File name of the feed in the web root
pub const FEED_FILE: &str = "feed.xml";

/// Counts of what one run wrote
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GenerateSummary {
    pub pages: usize,
    pub posts: usize,
    pub components: usize,
    /// Documents that produced no output
    pub skipped: usize,
}

/// Static site generator
pub struct Generator<'a> {
    site: &'a Site,
    layouts: LayoutRegistry,
    components: &'a dyn ComponentRenderer,
}

impl<'a> Generator<'a> {
    /// Create a new generator
    ///
    /// Fails if the templates directory lacks the default post or page layout.
    pub fn new(site: &'a Site, components: &'a dyn ComponentRenderer) -> Result<Self> {
        let layouts = LayoutRegistry::load(
            &site.templates_dir,
            TEMPLATE_EXTENSION,
            &[POST_LAYOUT, PAGE_LAYOUT],
        )?;

        Ok(Self {
            site,
            layouts,
            components,
        })
    }

    /// Delete the outputs of a previous run
    pub fn clear_outputs(&self) -> Result<()> {
        let removed = clear_outputs(self.site)?;
        tracing::debug!("Removed {} generated files", removed);
        Ok(())
    }

    /// Write pages, posts, extracted components and the feed
    ///
    /// A document that fails is logged and left out; the feed lists only the
    /// posts that were written.
    pub fn generate(&self, posts: &[PostMetaData], pages: &[PageMetaData]) -> Result<GenerateSummary> {
        let mut summary = GenerateSummary::default();

        let links: Vec<LinkData> = posts.iter().map(PostMetaData::link).collect();
        let page_links: Vec<(i32, String, String)> = pages
            .iter()
            .map(|p| (p.nav_order, p.title.clone(), p.url.clone()))
            .collect();
        let nav = nav_menu(&links);
        let page_nav = page_menu(&page_links);

        // Component key -> source of every component file written so far
        let mut written: HashMap<String, String> = HashMap::new();

        for page in pages {
            match self.write_page(page, &nav, &page_nav, &mut written) {
                Ok(Some(path)) => {
                    tracing::debug!("Generated page: {:?}", path);
                    summary.pages += 1;
                }
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    tracing::warn!("Failed to write page {}: {}", page.url, e);
                    summary.skipped += 1;
                }
            }
        }

        let mut published = Vec::new();
        for post in posts {
            match self.write_post(post, &nav, &page_nav, &mut written) {
                Ok(Some(path)) => {
                    tracing::debug!("Generated post: {:?}", path);
                    summary.posts += 1;
                    published.push(post.clone());
                }
                Ok(None) => summary.skipped += 1,
                Err(e) => {
                    tracing::warn!("Failed to write post {}: {}", post.url, e);
                    summary.skipped += 1;
                }
            }
        }
        summary.components = written.len();

        match build_feed(&self.site.settings, &published) {
            Ok(xml) => {
                let path = self.site.web_root.join(FEED_FILE);
                write_file(&path, &xml)?;
                tracing::debug!("Generated feed: {:?}", path);
            }
            Err(e) => tracing::error!("Failed to build {}: {}", FEED_FILE, e),
        }

        Ok(summary)
    }

    /// Bind and write one post; `None` when its layout is blank
    ///
    /// Its components are rendered first; if any fails, nothing of the post
    /// is written.
    fn write_post(
        &self,
        post: &PostMetaData,
        nav: &str,
        page_nav: &str,
        written: &mut HashMap<String, String>,
    ) -> Result<Option<PathBuf>> {
        let Some(template) = self.layouts.resolve(&post.layout, POST_LAYOUT) else {
            return Ok(None);
        };
        let rendered = self.render_components(&post.components)?;

        let html = self
            .site_bindings(nav, page_nav)
            .set(binder::TITLE, post.title.as_str())
            .set(binder::SUBTITLE, post.subtitle.as_str())
            .set(binder::DESCRIPTION, post.description.as_str())
            .set(binder::CONTENT, post.content.as_str())
            .set(binder::URL, post.url.as_str())
            .set(binder::AUTHOR, post.author.as_str())
            .set(binder::PUBLISHED_DATE_ISO, iso_date(post.date))
            .set(binder::PUBLISHED_DATE_SHORT, short_date(post.date))
            .set(binder::SCRIPTS, script_tags(&post.scripts))
            .set(binder::LAYOUT, post.layout.as_str())
            .bind(template);

        self.write_components(&post.components, rendered, written)?;
        let path = self.post_path(post);
        write_file(&path, &html)?;
        Ok(Some(path))
    }

    /// Bind and write one page; `None` when its layout is blank
    fn write_page(
        &self,
        page: &PageMetaData,
        nav: &str,
        page_nav: &str,
        written: &mut HashMap<String, String>,
    ) -> Result<Option<PathBuf>> {
        let Some(template) = self.layouts.resolve(&page.layout, PAGE_LAYOUT) else {
            return Ok(None);
        };
        let rendered = self.render_components(&page.components)?;

        let html = self
            .site_bindings(nav, page_nav)
            .set(binder::TITLE, page.title.as_str())
            .set(binder::SUBTITLE, page.subtitle.as_str())
            .set(binder::DESCRIPTION, page.description.as_str())
            .set(binder::CONTENT, page.content.as_str())
            .set(binder::URL, page.url.as_str())
            .set(binder::NAV_ORDER, page.nav_order.to_string())
            .set(binder::SCRIPTS, script_tags(&page.scripts))
            .set(binder::LAYOUT, page.layout.as_str())
            .bind(template);

        self.write_components(&page.components, rendered, written)?;
        let path = self.page_path(page);
        write_file(&path, &html)?;
        Ok(Some(path))
    }

    fn site_bindings(&self, nav: &str, page_nav: &str) -> Bindings {
        let settings = &self.site.settings;
        Bindings::new()
            .set(binder::SITE_NAME, settings.site_name.as_str())
            .set(binder::SITE_TITLE, settings.site_title.as_str())
            .set(binder::SITE_DESCRIPTION, settings.site_description.as_str())
            .set(binder::HEADER_LINKS, settings.header_links_markup())
            .set(binder::NAV, nav)
            .set(binder::PAGE_NAV, page_nav)
    }

    /// Render every component of one document, in document order
    fn render_components(&self, blocks: &IndexMap<String, String>) -> Result<Vec<String>> {
        blocks
            .iter()
            .map(|(key, source)| self.render_component(key, source))
            .collect()
    }

    fn render_component(&self, key: &str, source: &str) -> Result<String> {
        if !self.site.settings.prerender_components {
            return Ok(source.to_string());
        }

        let settings = &self.site.settings;
        let mut params = ComponentParams::new();
        params.insert("key".to_string(), key.into());
        params.insert("site_name".to_string(), settings.site_name.clone().into());
        params.insert("site_url".to_string(), settings.site_url.clone().into());
        self.components.render_component(key, source, &params)
    }

    /// Write the rendered components of one document
    ///
    /// Keys are only unique within one document. When two documents use the
    /// same key with different sources, the later one wins.
    fn write_components(
        &self,
        blocks: &IndexMap<String, String>,
        rendered: Vec<String>,
        written: &mut HashMap<String, String>,
    ) -> Result<()> {
        for ((key, source), html) in blocks.iter().zip(rendered) {
            if let Some(previous) = written.get(key) {
                if previous != source {
                    tracing::warn!("Component '{}' is defined more than once, keeping the last", key);
                }
            }

            let path = self.component_path(key);
            write_file(&path, &html)?;
            tracing::debug!("Generated component: {:?}", path);
            written.insert(key.clone(), source.clone());
        }
        Ok(())
    }

    /// `{web_root}/post/{y}/{m}/{d}/{slug}.html`
    pub fn post_path(&self, post: &PostMetaData) -> PathBuf {
        self.site
            .web_root
            .join(format!("{}.html", post.url.trim_start_matches('/')))
    }

    /// `{web_root}/{slug}.html`, `index.html` for the root page
    pub fn page_path(&self, page: &PageMetaData) -> PathBuf {
        self.site
            .web_root
            .join(format!("{}.html", page_file_stem(&page.url)))
    }

    /// `{components}/{PascalCaseKey}.html`
    pub fn component_path(&self, key: &str) -> PathBuf {
        self.site
            .components_dir
            .join(format!("{}.html", kebab_to_pascal(key)))
    }
}

/// Delete generated HTML under the web root and every file in the
/// components directory; returns how many files were removed
///
/// Other files in the web root (stylesheets, scripts, images) are kept.
pub fn clear_outputs(site: &Site) -> Result<usize> {
    let mut removed = 0;

    let pattern = format!(
        "{}/**/*.html",
        Pattern::escape(&site.web_root.to_string_lossy())
    );
    if let Ok(paths) = glob::glob(&pattern) {
        for path in paths.filter_map(|p| p.ok()) {
            if path.is_file() {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
    }

    if site.components_dir.is_dir() {
        for entry in fs::read_dir(&site.components_dir)? {
            let path = entry?.path();
            if path.is_file() {
                fs::remove_file(&path)?;
                removed += 1;
            }
        }
    }

    Ok(removed)
}

/// Write a file, creating parent directories
fn write_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BlogSettings;
    use crate::content::loader::ContentLoader;
    use crate::templates::TeraComponentRenderer;
    use tempfile::TempDir;

    const POST_TEMPLATE: &str = "<html><title>@*TITLE*@ - @*SITE_NAME*@</title><time>@*PUBLISHED_DATE_MMM dd, yyyy*@</time><nav>@*NAV*@</nav>@*CONTENT*@@*SCRIPTS*@</html>";
    const PAGE_TEMPLATE: &str = "<html><title>@*TITLE*@</title><nav>@*PAGE_NAV*@</nav>@*CONTENT*@</html>";

    fn site(dir: &TempDir) -> Site {
        let settings = BlogSettings {
            site_name: "Test Blog".to_string(),
            site_url: "https://blog.example.com".to_string(),
            ..BlogSettings::default()
        };
        let site = Site::with_settings(dir.path(), settings);
        fs::create_dir_all(&site.posts_dir).unwrap();
        fs::create_dir_all(&site.pages_dir).unwrap();
        fs::create_dir_all(&site.templates_dir).unwrap();
        fs::write(site.templates_dir.join("PostTemplate.html"), POST_TEMPLATE).unwrap();
        fs::write(site.templates_dir.join("PageTemplate.html"), PAGE_TEMPLATE).unwrap();
        site
    }

    fn run(site: &Site) -> GenerateSummary {
        let components = TeraComponentRenderer::new();
        let generator = Generator::new(site, &components).unwrap();
        generator.clear_outputs().unwrap();
        let loader = ContentLoader::new(site, &components);
        let posts = loader.load_posts().unwrap();
        let links: Vec<_> = posts.iter().map(PostMetaData::link).collect();
        let pages = loader.load_pages(&links).unwrap();
        generator.generate(&posts, &pages).unwrap()
    }

    #[test]
    fn test_missing_layouts_fail_fast() {
        let dir = tempfile::tempdir().unwrap();
        let site = Site::with_settings(dir.path(), BlogSettings::default());
        let components = TeraComponentRenderer::new();
        assert!(Generator::new(&site, &components).is_err());
    }

    #[test]
    fn test_generate_site() {
        let dir = tempfile::tempdir().unwrap();
        let site = site(&dir);
        fs::write(
            site.posts_dir.join("2024-1-5-hello.md"),
            "---\ntitle: Hello\nauthor: Tim\n---\nHi @you\n```blazor-component counter\n<button>{{ site_name }}</button>\n```\n<script>\nstart();\n</script>\n",
        )
        .unwrap();
        fs::write(
            site.posts_dir.join("2024-2-1-second.md"),
            "---\ntitle: Second\n---\nBody",
        )
        .unwrap();
        fs::write(site.posts_dir.join("draft.md"), "---\ntitle: Draft\n---\n").unwrap();
        fs::write(
            site.pages_dir.join("index.md"),
            "---\ntitle: Home\nnavorder: 1\n---\n# Welcome",
        )
        .unwrap();
        fs::write(
            site.pages_dir.join("about.md"),
            "---\ntitle: About\nnavorder: 2\n---\nAbout me",
        )
        .unwrap();

        let summary = run(&site);
        assert_eq!(
            summary,
            GenerateSummary {
                pages: 2,
                posts: 2,
                components: 1,
                skipped: 0
            }
        );

        let post = fs::read_to_string(site.web_root.join("post/2024/1/5/hello.html")).unwrap();
        assert!(post.contains("<title>Hello - Test Blog</title>"));
        assert!(post.contains("<time>Jan 05, 2024</time>"));
        assert!(post.contains("Hi @you"));
        assert!(post.contains(r#"<div id="counter1" class="component-block">"#));
        assert!(post.contains("<script>\nstart();\n</script></html>"));
        assert!(post.contains(r#"<a href="/post/2024/2/1/second""#));

        let index = fs::read_to_string(site.web_root.join("index.html")).unwrap();
        assert!(index.contains("<h1>Welcome</h1>"));
        assert!(index.contains(r#"<li><a href="/">Home</a></li><li><a href="/about">About</a></li>"#));
        assert!(site.web_root.join("about.html").exists());

        let component = fs::read_to_string(site.components_dir.join("Counter1.html")).unwrap();
        assert_eq!(component, "<button>Test Blog</button>");

        let feed = fs::read_to_string(site.web_root.join(FEED_FILE)).unwrap();
        let first = feed.find("/post/2024/1/5/hello").unwrap();
        let second = feed.find("/post/2024/2/1/second").unwrap();
        assert!(first < second);
    }

    #[test]
    fn test_component_render_failure_drops_document() {
        let dir = tempfile::tempdir().unwrap();
        let site = site(&dir);
        fs::write(
            site.posts_dir.join("2024-1-5-broken.md"),
            "---\ntitle: Broken\n---\nText\n```blazor-component widget\n{% if %}\n```\n",
        )
        .unwrap();
        fs::write(
            site.posts_dir.join("2024-1-6-fine.md"),
            "---\ntitle: Fine\n---\n```blazor-component widget\n<b>ok</b>\n```\n",
        )
        .unwrap();

        let summary = run(&site);
        assert_eq!(
            summary,
            GenerateSummary {
                pages: 0,
                posts: 1,
                components: 1,
                skipped: 1
            }
        );
        assert!(!site.web_root.join("post/2024/1/5/broken.html").exists());
        assert!(site.web_root.join("post/2024/1/6/fine.html").exists());

        let component = fs::read_to_string(site.components_dir.join("Widget1.html")).unwrap();
        assert_eq!(component, "<b>ok</b>");

        let feed = fs::read_to_string(site.web_root.join(FEED_FILE)).unwrap();
        assert!(!feed.contains("/post/2024/1/5/broken"));
        assert!(feed.contains("/post/2024/1/6/fine"));
    }

    #[test]
    fn test_double_at_in_sample_code_survives() {
        let dir = tempfile::tempdir().unwrap();
        let site = site(&dir);
        fs::write(
            site.posts_dir.join("2024-1-5-mail.md"),
            "---\ntitle: Mail\n---\nReach me@example.com\n```razor\n<a href=\"mailto:me@@example.com\">x</a>\n```\n",
        )
        .unwrap();

        run(&site);
        let html = fs::read_to_string(site.web_root.join("post/2024/1/5/mail.html")).unwrap();
        assert!(html.contains("<p>Reach me@example.com</p>"));
        assert!(html.contains("mailto:me@@example.com"));
    }

    #[test]
    fn test_stale_outputs_are_cleared() {
        let dir = tempfile::tempdir().unwrap();
        let site = site(&dir);
        fs::create_dir_all(site.web_root.join("post/2020/1/1")).unwrap();
        fs::write(site.web_root.join("post/2020/1/1/old.html"), "old").unwrap();
        fs::write(site.web_root.join("style.css"), "body {}").unwrap();
        fs::create_dir_all(&site.components_dir).unwrap();
        fs::write(site.components_dir.join("Old1.html"), "old").unwrap();

        run(&site);

        assert!(!site.web_root.join("post/2020/1/1/old.html").exists());
        assert!(!site.components_dir.join("Old1.html").exists());
        assert!(site.web_root.join("style.css").exists());
        assert!(site.web_root.join(FEED_FILE).exists());
    }

    #[test]
    fn test_blank_layout_skips_document() {
        let dir = tempfile::tempdir().unwrap();
        let site = site(&dir);
        fs::write(site.templates_dir.join("HiddenTemplate.html"), "\n").unwrap();
        fs::write(
            site.posts_dir.join("2024-1-1-hidden.md"),
            "---\ntitle: Hidden\nlayout: hidden\n---\nSecret",
        )
        .unwrap();
        fs::write(
            site.posts_dir.join("2024-1-2-shown.md"),
            "---\ntitle: Shown\n---\nVisible",
        )
        .unwrap();

        let summary = run(&site);
        assert_eq!(summary.posts, 1);
        assert_eq!(summary.skipped, 1);
        assert!(!site.web_root.join("post/2024/1/1/hidden.html").exists());

        let feed = fs::read_to_string(site.web_root.join(FEED_FILE)).unwrap();
        assert!(!feed.contains("hidden"));
        assert!(feed.contains("shown"));
    }

    #[test]
    fn test_unknown_layout_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let site = site(&dir);
        fs::write(
            site.pages_dir.join("contact.md"),
            "---\ntitle: Contact\nlayout: fancy\n---\nWrite",
        )
        .unwrap();

        run(&site);
        let html = fs::read_to_string(site.web_root.join("contact.html")).unwrap();
        assert!(html.starts_with("<html><title>Contact</title>"));
    }

    #[test]
    fn test_raw_components_when_prerender_is_off() {
        let dir = tempfile::tempdir().unwrap();
        let mut site = site(&dir);
        site.settings.prerender_components = false;
        fs::write(
            site.pages_dir.join("demo.md"),
            "---\ntitle: Demo\n---\n```blazor-component\n<Counter Start=\"@start\" />\n```",
        )
        .unwrap();

        let summary = run(&site);
        assert_eq!(summary.components, 1);
        let component = fs::read_to_string(site.components_dir.join("CodeBlock1.html")).unwrap();
        assert_eq!(component, "<Counter Start=\"@start\" />");
    }
}
