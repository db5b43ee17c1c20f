//! URL helper functions

use chrono::{Datelike, NaiveDate};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};

/// Characters that must be escaped inside one path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// Site-relative URL of a post
///
/// Month and day are not zero padded: `/post/2024/1/5/hello`.
pub fn post_url(date: NaiveDate, slug: &str) -> String {
    format!(
        "/post/{}/{}/{}/{}",
        date.year(),
        date.month(),
        date.day(),
        slug
    )
}

/// Site-relative URL of a Markdown page; `index` maps to the root
pub fn page_url(slug: &str) -> String {
    if slug == "index" {
        "/".to_string()
    } else {
        slug.to_string()
    }
}

/// Resolve a site-relative path against the absolute site URL
///
/// # Examples
/// ```ignore
/// full_url("https://example.com/", "/post/2024/1/5/hello") // -> "https://example.com/post/2024/1/5/hello"
/// ```
pub fn full_url(base: &str, path: &str) -> String {
    let base = base.trim_end_matches('/');
    let path = path.trim_start_matches('/');
    if path.is_empty() {
        return format!("{}/", base);
    }

    let encoded: Vec<String> = path
        .split('/')
        .map(|segment| utf8_percent_encode(segment, PATH_SEGMENT).to_string())
        .collect();
    format!("{}/{}", base, encoded.join("/"))
}

/// File stem of a page URL used for its output file, `index` for the root
pub fn page_file_stem(url: &str) -> String {
    let stem = url
        .trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or_default();
    let stem = stem.rsplit_once('.').map(|(s, _)| s).unwrap_or(stem);
    if stem.trim().is_empty() {
        "index".to_string()
    } else {
        stem.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_url_is_not_padded() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 5).unwrap();
        assert_eq!(post_url(date, "hello"), "/post/2024/1/5/hello");
    }

    #[test]
    fn test_page_url() {
        assert_eq!(page_url("index"), "/");
        assert_eq!(page_url("about"), "about");
    }

    #[test]
    fn test_full_url() {
        assert_eq!(
            full_url("https://example.com/", "/post/2024/1/5/hello"),
            "https://example.com/post/2024/1/5/hello"
        );
        assert_eq!(full_url("https://example.com", "about"), "https://example.com/about");
        assert_eq!(full_url("https://example.com", "/"), "https://example.com/");
        assert_eq!(
            full_url("https://example.com", "/post/2024/1/5/a b"),
            "https://example.com/post/2024/1/5/a%20b"
        );
    }

    #[test]
    fn test_page_file_stem() {
        assert_eq!(page_file_stem("/"), "index");
        assert_eq!(page_file_stem(""), "index");
        assert_eq!(page_file_stem("about"), "about");
        assert_eq!(page_file_stem("/projects/maps"), "maps");
        assert_eq!(page_file_stem("/contact.html"), "contact");
    }
}
