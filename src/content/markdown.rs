//! Markdown rendering with optional syntax highlighting

use pulldown_cmark::{html, CodeBlockKind, CowStr, Event, Options, Parser, Tag, TagEnd};
use syntect::highlighting::ThemeSet;
use syntect::html::highlighted_html_for_string;
use syntect::parsing::SyntaxSet;

use crate::config::HighlightConfig;
use crate::helpers::html_escape;

/// Markdown renderer
///
/// Sample code is emitted as plain `<pre><code>` unless highlighting is
/// enabled, in which case fenced blocks with a known language go through
/// syntect.
pub struct MarkdownRenderer {
    highlighter: Option<Highlighter>,
}

struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
    theme_name: String,
}

impl MarkdownRenderer {
    /// Create a renderer without highlighting
    pub fn new() -> Self {
        Self { highlighter: None }
    }

    /// Create with highlight settings
    pub fn with_options(config: &HighlightConfig) -> Self {
        if !config.enable {
            return Self::new();
        }
        Self {
            highlighter: Some(Highlighter {
                syntax_set: SyntaxSet::load_defaults_newlines(),
                theme_set: ThemeSet::load_defaults(),
                theme_name: config.theme.clone(),
            }),
        }
    }

    /// Render markdown to HTML
    pub fn render(&self, markdown: &str) -> String {
        // No YAML metadata blocks: front matter is split off before this point
        let options = Options::ENABLE_TABLES
            | Options::ENABLE_FOOTNOTES
            | Options::ENABLE_STRIKETHROUGH
            | Options::ENABLE_TASKLISTS
            | Options::ENABLE_HEADING_ATTRIBUTES;
        let parser = Parser::new_ext(markdown, options);

        let mut html_output = String::new();
        match &self.highlighter {
            None => html::push_html(&mut html_output, parser),
            Some(highlighter) => {
                html::push_html(&mut html_output, highlighter.apply(parser).into_iter())
            }
        }
        html_output
    }
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Highlighter {
    fn apply<'a>(&self, parser: Parser<'a>) -> Vec<Event<'a>> {
        let mut events = Vec::new();
        let mut code_lang: Option<String> = None;
        let mut code = String::new();
        let mut in_code = false;

        for event in parser {
            match event {
                Event::Start(Tag::CodeBlock(CodeBlockKind::Fenced(lang))) if !lang.is_empty() => {
                    in_code = true;
                    code_lang = Some(lang.to_string());
                    code.clear();
                }
                Event::Text(text) if in_code => code.push_str(&text),
                Event::End(TagEnd::CodeBlock) if in_code => {
                    let lang = code_lang.take().unwrap_or_default();
                    events.push(Event::Html(CowStr::from(self.highlight(&code, &lang))));
                    in_code = false;
                }
                _ => events.push(event),
            }
        }

        events
    }

    fn highlight(&self, code: &str, lang: &str) -> String {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .or_else(|| self.syntax_set.find_syntax_by_extension(lang));
        let theme = self
            .theme_set
            .themes
            .get(&self.theme_name)
            .or_else(|| self.theme_set.themes.values().next());

        let highlighted = match (syntax, theme) {
            (Some(syntax), Some(theme)) => {
                highlighted_html_for_string(code, &self.syntax_set, syntax, theme).ok()
            }
            _ => None,
        };

        match highlighted {
            Some(html) => format!(r#"<div class="highlight language-{}">{}</div>"#, lang, html),
            None => format!(
                r#"<pre><code class="language-{}">{}</code></pre>"#,
                lang,
                html_escape(code)
            ),
        }
    }
}
