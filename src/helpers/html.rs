//! HTML helper functions

use crate::content::LinkData;

/// Markup left in the document at every extraction point
///
/// The client runtime mounts the real component by matching the element id
/// against the component name, so the shape must stay fixed. The surrounding
/// blank lines keep the Markdown renderer treating it as a raw HTML block.
pub fn component_placeholder(key: &str) -> String {
    format!(
        r#"
<div id="{}" class="component-block">
    <svg class="loading-progress">
        <circle r="40%" cx="50%" cy="50%" />
        <circle r="40%" cx="50%" cy="50%" />
    </svg>
    <div class="loading-progress-text"></div>
</div>
"#,
        key
    )
}

/// Navigation list of posts, in the order they were discovered
///
/// # Examples
/// ```ignore
/// nav_menu(&links) // -> <ul class="nav-links"><li><a href="/post/2024/1/5/hello" title="...">Hello</a></li></ul>
/// ```
pub fn nav_menu(links: &[LinkData]) -> String {
    let mut html = String::from(r#"<ul class="nav-links">"#);
    for link in links {
        html.push_str(&format!(
            r#"<li><a href="{}" title="{}">{}</a></li>"#,
            link.url,
            html_escape(&link.subtitle),
            link.title
        ));
    }
    html.push_str("</ul>");
    html
}

/// Navigation list of pages ordered by their `navorder`
pub fn page_menu(pages: &[(i32, String, String)]) -> String {
    let mut ordered: Vec<_> = pages.iter().collect();
    ordered.sort_by_key(|(order, _, _)| *order);

    let mut html = String::from(r#"<ul class="page-links">"#);
    for (_, title, url) in ordered {
        let href = if url.starts_with('/') {
            url.clone()
        } else {
            format!("/{}", url)
        };
        html.push_str(&format!(r#"<li><a href="{}">{}</a></li>"#, href, title));
    }
    html.push_str("</ul>");
    html
}

/// Hoisted script blocks, re-emitted in document order
pub fn script_tags(scripts: &[String]) -> String {
    scripts.join("\n")
}

/// Simple HTML escaping for attribute values
pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
