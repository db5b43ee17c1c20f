//! List site content

use anyhow::Result;

use crate::content::loader::ContentLoader;
use crate::content::{ContentKind, LinkData, PostMetaData};
use crate::templates::TeraComponentRenderer;
use crate::Site;

/// List site content by type
pub fn run(site: &Site, content_type: &str) -> Result<()> {
    let components = TeraComponentRenderer::new();
    let loader = ContentLoader::new(site, &components);

    match content_type {
        "post" | "posts" => {
            let posts = loader.load_posts()?;
            println!("Posts ({}):", posts.len());
            for post in posts {
                println!(
                    "  {} - {} [{}] ({} components, {} scripts)",
                    post.date.format("%Y-%m-%d"),
                    post.title,
                    post.url,
                    post.components.len(),
                    post.scripts.len()
                );
            }
        }
        "page" | "pages" => {
            let posts = loader.load_posts()?;
            let links: Vec<LinkData> = posts.iter().map(PostMetaData::link).collect();
            let mut pages = loader.load_pages(&links)?;
            pages.sort_by_key(|p| p.nav_order);
            println!("Pages ({}):", pages.len());
            for page in pages {
                let kind = match page.kind {
                    ContentKind::PageComponent => "component",
                    _ => "markdown",
                };
                println!("  {} {} [{}] ({})", page.nav_order, page.title, page.url, kind);
            }
        }
        "component" | "components" => {
            let posts = loader.load_posts()?;
            let links: Vec<LinkData> = posts.iter().map(PostMetaData::link).collect();
            let pages = loader.load_pages(&links)?;
            let keys: Vec<(&str, &str)> = pages
                .iter()
                .flat_map(|p| p.components.keys().map(move |k| (k.as_str(), p.url.as_str())))
                .chain(
                    posts
                        .iter()
                        .flat_map(|p| p.components.keys().map(move |k| (k.as_str(), p.url.as_str()))),
                )
                .collect();
            println!("Components ({}):", keys.len());
            for (key, url) in keys {
                println!("  {} [{}]", key, url);
            }
        }
        _ => {
            anyhow::bail!(
                "Unknown type: {}. Available: post, page, component",
                content_type
            );
        }
    }

    Ok(())
}
