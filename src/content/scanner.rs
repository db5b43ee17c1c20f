//! Line-oriented segment scanner
//!
//! Walks a document body line by line and partitions it into prose, fenced
//! sample code, embedded component blocks and inline scripts. Components and
//! scripts are lifted out of the body; every component leaves a placeholder
//! `div` behind whose id is the key the component is stored under.
//!
//! The scanner only looks at line prefixes. It never parses Markdown or
//! markup, so precedence between the rules below is what defines behavior:
//!
//! 1. an open component capture only looks for its terminator
//! 2. an open script only looks for `</script>`
//! 3. an open sample block only looks for a closing fence
//! 4. in prose: wrapper close, fence open, wrapper open, `@code`, script open,
//!    then plain prose, in that order
//!
//! Which rules are active depends on the [`ScanMode`].

use indexmap::IndexMap;
use lazy_static::lazy_static;
use regex::Regex;

use crate::helpers::{component_placeholder, pascal_to_kebab};

lazy_static! {
    static ref SCRIPT_START: Regex = Regex::new(r"<script\b[^>]*>").unwrap();
    static ref SCRIPT_END: Regex = Regex::new(r"</script>").unwrap();
    static ref COMPONENT_START: Regex = Regex::new(r"^\s*<([A-Z][A-Za-z]+)").unwrap();
    static ref COMPONENT_END: Regex = Regex::new(r"^\s*</([A-Z][A-Za-z]+)>").unwrap();
}

/// Info-string tag marking a fenced block as an embedded component
pub const COMPONENT_FENCE_TAG: &str = "blazor-component";

/// Key prefix for component fences that do not name themselves
pub const GENERIC_KEY_PREFIX: &str = "code-block";

/// Component tags that belong to the page chrome and are never extracted
const RESERVED_COMPONENTS: [&str; 2] = ["PageTitle", "NavMenu"];

/// Which flavor of source the scanner is reading
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanMode {
    /// Markdown post body
    MarkdownPost,
    /// Markdown page body
    MarkdownPage,
    /// Component-markup page (`.razor` file)
    RazorPage,
    /// Single-pass converter: escaping and `@code` tail, no extraction
    Converter,
}

/// How components are recognized
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ComponentSyntax {
    None,
    /// ```` ```blazor-component name ```` fences
    Fenced,
    /// Capitalized tags such as `<MapView ...>`
    Tagged,
}

/// Rule set derived from a [`ScanMode`]
#[derive(Debug, Clone, Copy)]
struct Policy {
    components: ComponentSyntax,
    track_wrappers: bool,
    escape_at: bool,
    hoist_scripts: bool,
    split_at_code: bool,
    recognize_fences: bool,
}

impl ScanMode {
    fn policy(self) -> Policy {
        match self {
            ScanMode::MarkdownPost | ScanMode::MarkdownPage => Policy {
                components: ComponentSyntax::Fenced,
                track_wrappers: true,
                escape_at: true,
                hoist_scripts: true,
                split_at_code: false,
                recognize_fences: true,
            },
            ScanMode::RazorPage => Policy {
                components: ComponentSyntax::Tagged,
                track_wrappers: false,
                escape_at: false,
                hoist_scripts: true,
                split_at_code: false,
                recognize_fences: false,
            },
            ScanMode::Converter => Policy {
                components: ComponentSyntax::None,
                track_wrappers: true,
                escape_at: true,
                hoist_scripts: false,
                split_at_code: true,
                recognize_fences: true,
            },
        }
    }
}

/// Scanner state; exactly one is active at a time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Prose,
    InSampleCode,
    InComponentBlock,
    InScriptBlock,
}

/// Output of one scan
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanResult {
    /// Document lines left after extraction, placeholders included
    pub residual_lines: Vec<String>,
    /// Placeholder key -> captured component source, in document order
    pub component_blocks: IndexMap<String, String>,
    /// Hoisted script blocks, in document order
    pub scripts: Vec<String>,
    /// Everything from the first `@code` line on (converter mode only)
    pub trailing_code: Option<String>,
    /// Custom-tag wrappers still open at end of input
    pub unclosed_wrappers: usize,
    /// Indices into `residual_lines` whose `@` was doubled
    pub escaped_lines: Vec<usize>,
}

impl ScanResult {
    /// Residual lines joined back into a document
    pub fn residual(&self) -> String {
        self.residual_lines.join("\n")
    }

    /// Residual with the prose `@` doubling undone
    ///
    /// Only lines the scanner escaped are touched, so an `@@` written inside
    /// sample code or a custom-tag wrapper survives.
    pub fn residual_unescaped(&self) -> String {
        let mut escaped = self.escaped_lines.iter().peekable();
        let lines: Vec<String> = self
            .residual_lines
            .iter()
            .enumerate()
            .map(|(i, line)| {
                if escaped.next_if_eq(&&i).is_some() {
                    line.replace("@@", "@")
                } else {
                    line.clone()
                }
            })
            .collect();
        lines.join("\n")
    }
}

/// Parameterized segment scanner
#[derive(Debug, Clone, Copy)]
pub struct Scanner {
    policy: Policy,
}

impl Scanner {
    pub fn new(mode: ScanMode) -> Self {
        Self {
            policy: mode.policy(),
        }
    }

    /// Scan a document body
    pub fn scan(&self, body: &str) -> ScanResult {
        let lines: Vec<&str> = body.lines().collect();
        let mut run = ScanRun::new(self.policy);

        for (i, line) in lines.iter().enumerate() {
            if run.step(line) == Step::Stop {
                run.result.trailing_code = Some(lines[i..].join("\n"));
                break;
            }
        }

        run.finish()
    }
}

#[derive(Debug, PartialEq, Eq)]
enum Step {
    Continue,
    Stop,
}

/// Mutable state of a single scan
struct ScanRun<'a> {
    policy: Policy,
    state: State,
    wrapper_depth: usize,
    next_index: usize,
    current_key: String,
    current_component: Option<String>,
    buffer: Vec<&'a str>,
    result: ScanResult,
}

impl<'a> ScanRun<'a> {
    fn new(policy: Policy) -> Self {
        Self {
            policy,
            state: State::Prose,
            wrapper_depth: 0,
            next_index: 1,
            current_key: String::new(),
            current_component: None,
            buffer: Vec::new(),
            result: ScanResult::default(),
        }
    }

    fn step(&mut self, line: &'a str) -> Step {
        match self.state {
            State::InComponentBlock => self.in_component(line),
            State::InScriptBlock => self.in_script(line),
            State::InSampleCode => {
                if is_fence(line) {
                    self.state = State::Prose;
                }
                self.emit(line);
            }
            State::Prose => return self.in_prose(line),
        }
        Step::Continue
    }

    fn in_prose(&mut self, line: &'a str) -> Step {
        let policy = self.policy;

        if policy.components == ComponentSyntax::Tagged {
            if let Some(name) = opening_component(line) {
                if !RESERVED_COMPONENTS.contains(&name) {
                    self.start_tagged_component(line, name);
                }
                return Step::Continue;
            }
        }

        if policy.track_wrappers && self.wrapper_depth > 0 && is_wrapper_close(line) {
            self.wrapper_depth -= 1;
            self.emit(line);
        } else if policy.recognize_fences && self.wrapper_depth == 0 && is_fence(line) {
            if policy.components == ComponentSyntax::Fenced && is_component_fence(line) {
                self.start_fenced_component(line);
                return Step::Continue;
            }
            self.state = State::InSampleCode;
            self.emit(line);
        } else if policy.track_wrappers && is_wrapper_open(line) {
            self.wrapper_depth += 1;
            self.emit(line);
        } else if policy.split_at_code && line.starts_with("@code") {
            return Step::Stop;
        } else if policy.hoist_scripts && self.script_start(line) {
            return Step::Continue;
        } else {
            self.emit(line);
        }

        Step::Continue
    }

    fn in_component(&mut self, line: &'a str) {
        match self.policy.components {
            ComponentSyntax::Tagged => {
                self.buffer.push(line);
                let closes = closing_component(line)
                    .is_some_and(|name| Some(name) == self.current_component.as_deref());
                if closes {
                    self.finish_component();
                }
            }
            _ => {
                if is_fence(line) {
                    self.finish_component();
                } else {
                    self.buffer.push(line);
                }
            }
        }
    }

    fn in_script(&mut self, line: &'a str) {
        self.buffer.push(line);
        if SCRIPT_END.is_match(line) {
            self.finish_script();
        }
    }

    /// Returns true when the line opened a script and was captured
    fn script_start(&mut self, line: &'a str) -> bool {
        let Some(open) = SCRIPT_START.find(line) else {
            return false;
        };

        if SCRIPT_END.is_match(&line[open.end()..]) {
            self.result.scripts.push(line.to_string());
        } else {
            self.state = State::InScriptBlock;
            self.buffer.clear();
            self.buffer.push(line);
        }
        true
    }

    fn start_fenced_component(&mut self, line: &str) {
        let name = line
            .split_whitespace()
            .nth(1)
            .unwrap_or(GENERIC_KEY_PREFIX);
        self.current_key = self.next_key(name);
        self.buffer.clear();
        self.state = State::InComponentBlock;
    }

    fn start_tagged_component(&mut self, line: &'a str, name: &str) {
        self.current_key = self.next_key(&pascal_to_kebab(name));
        self.buffer.clear();
        self.buffer.push(line);

        let self_closing = line.trim_end().ends_with("/>") || line.contains(&format!("</{}>", name));
        if self_closing {
            self.finish_component();
        } else {
            self.current_component = Some(name.to_string());
            self.state = State::InComponentBlock;
        }
    }

    fn next_key(&mut self, name: &str) -> String {
        let key = format!("{}{}", name, self.next_index);
        self.next_index += 1;
        key
    }

    fn finish_component(&mut self) {
        let key = std::mem::take(&mut self.current_key);
        let source = self.buffer.join("\n");
        self.buffer.clear();
        self.current_component = None;
        self.state = State::Prose;

        self.result.residual_lines.push(component_placeholder(&key));
        self.result.component_blocks.insert(key, source);
    }

    fn finish_script(&mut self) {
        self.result.scripts.push(self.buffer.join("\n"));
        self.buffer.clear();
        self.state = State::Prose;
    }

    fn emit(&mut self, line: &str) {
        let escape =
            self.policy.escape_at && self.wrapper_depth == 0 && self.state == State::Prose;
        if escape && line.contains('@') {
            let index = self.result.residual_lines.len();
            self.result.escaped_lines.push(index);
            self.result.residual_lines.push(line.replace('@', "@@"));
        } else {
            self.result.residual_lines.push(line.to_string());
        }
    }

    /// Flush whatever is still open; none of it is an error
    fn finish(mut self) -> ScanResult {
        match self.state {
            State::InComponentBlock => {
                tracing::warn!(
                    "Component block '{}' is never closed; keeping it up to end of input",
                    self.current_key
                );
                self.finish_component();
            }
            State::InScriptBlock => {
                tracing::warn!("Script block is never closed; keeping it up to end of input");
                self.finish_script();
            }
            State::InSampleCode => {
                tracing::debug!("Sample code block is never closed");
            }
            State::Prose => {}
        }

        if self.wrapper_depth > 0 {
            tracing::debug!("{} custom tag wrapper(s) never closed", self.wrapper_depth);
        }
        self.result.unclosed_wrappers = self.wrapper_depth;
        self.result
    }
}

fn is_fence(line: &str) -> bool {
    line.starts_with("```") || line.starts_with("~~~")
}

fn is_component_fence(line: &str) -> bool {
    line.get(3..)
        .is_some_and(|info| info.starts_with(COMPONENT_FENCE_TAG))
}

/// `<Foo` at the very start of the line
fn is_wrapper_open(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() > 1 && bytes[0] == b'<' && bytes[1].is_ascii_uppercase()
}

/// `</Foo` at the very start of the line
fn is_wrapper_close(line: &str) -> bool {
    let bytes = line.as_bytes();
    bytes.len() > 2 && line.starts_with("</") && bytes[2].is_ascii_uppercase()
}

fn opening_component(line: &str) -> Option<&str> {
    COMPONENT_START
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}

fn closing_component(line: &str) -> Option<&str> {
    COMPONENT_END
        .captures(line)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str())
}
