//! RSS feed generation
//!
//! The channel is built and validated with the `rss` crate, then streamed
//! once more through quick-xml to append a `<content>` element carrying each
//! post's full HTML as CDATA. `rss` has no field for that element.

use quick_xml::events::{BytesCData, BytesEnd, BytesStart, Event};
use quick_xml::{Reader, Writer};
use rss::validation::Validate;
use rss::{ChannelBuilder, GuidBuilder, ItemBuilder};
use std::io::Cursor;

use crate::config::BlogSettings;
use crate::content::PostMetaData;
use crate::helpers::{full_url, rfc2822_date};
use crate::{Error, Result};

/// Build the feed XML for `posts`, one item per post in the given order
pub fn build_feed(settings: &BlogSettings, posts: &[PostMetaData]) -> Result<String> {
    let items: Vec<rss::Item> = posts
        .iter()
        .map(|post| post_to_item(post, settings))
        .collect();

    let channel = ChannelBuilder::default()
        .title(settings.site_name.clone())
        .link(settings.site_url.clone())
        .description(settings.site_description.clone())
        .generator("blogweave".to_string())
        .items(items)
        .build();

    channel
        .validate()
        .map_err(|e| Error::Feed(format!("rss validation failed: {}", e)))?;

    inject_content(&channel.to_string(), settings, posts)
}

fn post_to_item(post: &PostMetaData, settings: &BlogSettings) -> rss::Item {
    let link = full_url(&settings.site_url, &post.url);
    let author = if post.author.is_empty() {
        None
    } else {
        Some(post.author.clone())
    };

    ItemBuilder::default()
        .title(post.title.clone())
        .link(link.clone())
        .guid(GuidBuilder::default().permalink(true).value(link).build())
        .description(post.subtitle.clone())
        .pub_date(rfc2822_date(post.date))
        .author(author)
        .build()
}

/// Append `<content type="html" xml:base="...">` to the n-th `<item>` for
/// the n-th post
fn inject_content(xml: &str, settings: &BlogSettings, posts: &[PostMetaData]) -> Result<String> {
    let mut reader = Reader::from_str(xml);
    let mut writer = Writer::new(Cursor::new(Vec::with_capacity(xml.len() * 2)));
    let mut posts = posts.iter();

    loop {
        match reader.read_event()? {
            Event::End(end) if end.name().as_ref() == b"item" => {
                if let Some(post) = posts.next() {
                    write_content(&mut writer, &full_url(&settings.site_url, &post.url), &post.content)?;
                }
                writer.write_event(Event::End(end))?;
            }
            Event::Eof => break,
            event => writer.write_event(event)?,
        }
    }

    String::from_utf8(writer.into_inner().into_inner())
        .map_err(|e| Error::Feed(format!("feed is not valid UTF-8: {}", e)))
}

fn write_content(writer: &mut Writer<Cursor<Vec<u8>>>, base: &str, html: &str) -> Result<()> {
    let mut start = BytesStart::new("content");
    start.push_attribute(("type", "html"));
    start.push_attribute(("xml:base", base));
    writer.write_event(Event::Start(start))?;
    for section in cdata_sections(html) {
        writer.write_event(Event::CData(BytesCData::new(section)))?;
    }
    writer.write_event(Event::End(BytesEnd::new("content")))?;
    Ok(())
}

/// Split text so no section contains `]]>`; the sections concatenate back
/// to the input
fn cdata_sections(text: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut rest = text;
    while let Some(pos) = rest.find("]]>") {
        sections.push(&rest[..pos + 2]);
        rest = &rest[pos + 2..];
    }
    sections.push(rest);
    sections
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use indexmap::IndexMap;

    fn settings() -> BlogSettings {
        BlogSettings {
            site_name: "Test Blog".to_string(),
            site_url: "https://blog.example.com".to_string(),
            site_description: "Testing".to_string(),
            ..BlogSettings::default()
        }
    }

    fn post(day: u32, slug: &str, content: &str) -> PostMetaData {
        let date = NaiveDate::from_ymd_opt(2024, 3, day).unwrap();
        PostMetaData {
            title: format!("Post {}", slug),
            subtitle: format!("About {}", slug),
            url: crate::helpers::post_url(date, slug),
            date,
            author: "Tim".to_string(),
            content: content.to_string(),
            components: IndexMap::new(),
            scripts: Vec::new(),
            layout: "post".to_string(),
            description: String::new(),
            slug: slug.to_string(),
        }
    }

    /// (link, content CDATA) per item, in document order
    fn read_items(xml: &str) -> Vec<(String, String)> {
        let mut reader = Reader::from_str(xml);
        let mut items = Vec::new();
        let mut in_link = false;
        let mut in_content = false;
        let mut link = String::new();
        let mut content = String::new();

        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) if e.name().as_ref() == b"link" => in_link = true,
                Event::End(e) if e.name().as_ref() == b"link" => in_link = false,
                Event::Start(e) if e.name().as_ref() == b"content" => in_content = true,
                Event::End(e) if e.name().as_ref() == b"content" => in_content = false,
                Event::Text(t) if in_link => {
                    link = String::from_utf8(t.into_inner().into_owned()).unwrap();
                }
                Event::CData(c) if in_content => {
                    content.push_str(&String::from_utf8(c.into_inner().into_owned()).unwrap());
                }
                Event::End(e) if e.name().as_ref() == b"item" => {
                    items.push((std::mem::take(&mut link), std::mem::take(&mut content)));
                }
                Event::Eof => break,
                _ => {}
            }
        }
        items
    }

    #[test]
    fn test_items_keep_input_order_and_content() {
        let posts = vec![
            post(3, "third", "<p>Third & last</p>"),
            post(1, "first", "<div id=\"counter1\" class=\"component-block\"></div>"),
            post(2, "second", "<pre><code>a[b[0]]>c</code></pre>"),
        ];
        let xml = build_feed(&settings(), &posts).unwrap();
        let items = read_items(&xml);

        assert_eq!(items.len(), 3);
        for (item, post) in items.iter().zip(&posts) {
            assert_eq!(item.0, format!("https://blog.example.com{}", post.url));
            assert_eq!(item.1, post.content);
        }
    }

    #[test]
    fn test_content_element_attributes() {
        let posts = vec![post(5, "hello", "<p>Hi</p>")];
        let xml = build_feed(&settings(), &posts).unwrap();
        assert!(xml.contains(
            r#"<content type="html" xml:base="https://blog.example.com/post/2024/3/5/hello"><![CDATA[<p>Hi</p>]]></content></item>"#
        ));
        assert!(xml.contains("<title>Test Blog</title>"));
        assert!(xml.contains("About hello"));
        assert!(xml.contains("<pubDate>"));
    }

    #[test]
    fn test_empty_feed() {
        let xml = build_feed(&settings(), &[]).unwrap();
        assert!(xml.contains("<channel>"));
        assert!(read_items(&xml).is_empty());
    }

    #[test]
    fn test_invalid_site_url_fails_validation() {
        let settings = BlogSettings {
            site_url: "not a url".to_string(),
            ..settings()
        };
        let err = build_feed(&settings, &[]).unwrap_err();
        assert!(matches!(err, Error::Feed(_)));
    }

    #[test]
    fn test_cdata_sections() {
        assert_eq!(cdata_sections("plain"), vec!["plain"]);
        assert_eq!(cdata_sections("a]]>b"), vec!["a]]", ">b"]);
        assert_eq!(cdata_sections("a]]>b").concat(), "a]]>b");
    }
}
