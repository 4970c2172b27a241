//! HTML / documentation text → plain text with code kept as fenced blocks.

use std::sync::LazyLock;

use itertools::Itertools;
use regex::{Captures, Regex};
use scraper::{ElementRef, Html, Node};
use tracing::debug;

/// Private-use code points that delimit a placeholder. They are stripped from
/// the source text, so a placeholder can never collide with document content.
const SENTINEL_OPEN: char = '\u{E000}';
const SENTINEL_CLOSE: char = '\u{E001}';

/// Reserved prefix of every code placeholder.
pub const PLACEHOLDER_PREFIX: &str = "\u{E000}CODE_BLOCK_";

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new("\u{E000}CODE_BLOCK_(\\d+)\u{E001}").unwrap());
static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?ms)^```([^\n`]*)\n(.*?)\n```[ \t\r]*$").unwrap());
static HTML_SPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[ \t\r\n\x0C]+").unwrap());
static BLANK_RUN_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

const CODE_TAGS: &[&str] = &["code", "pre"];
const HIDDEN_TAGS: &[&str] = &["head", "script", "style", "noscript", "template"];
const CELL_TAGS: &[&str] = &["td", "th"];
const BLOCK_TAGS: &[&str] = &[
    "address", "article", "aside", "blockquote", "body", "dd", "details", "div", "dl", "dt",
    "figcaption", "figure", "footer", "form", "h1", "h2", "h3", "h4", "h5", "h6", "header", "hr",
    "li", "main", "nav", "ol", "p", "section", "summary", "table", "tr", "ul",
];
const INLINE_TAGS: &[&str] = &[
    "a", "abbr", "b", "br", "caption", "cite", "em", "i", "img", "kbd", "link", "mark", "meta",
    "q", "s", "samp", "small", "span", "strong", "sub", "sup", "tbody", "tfoot", "thead", "title",
    "u", "var",
];

/// A protected code region and the info string of its fence.
#[derive(Debug, Clone, Default)]
struct Fragment {
    info: String,
    code: String,
}

impl Fragment {
    fn fenced(&self) -> String {
        format!("```{}\n{}\n```", self.info, self.code)
    }
}

/// Convert HTML (or plain text) into plain text, keeping every `<code>` and
/// `<pre>` element as a fenced code block on its own lines.
///
/// Never fails: malformed markup degrades to whatever text the parser
/// recovers. Input that parses to no HTML elements (a bare `x < 3`, a
/// `Vec<u8>` outside a fence) is plain text and only whitespace-tidied.
/// Fenced blocks already present in the input are kept verbatim.
pub fn clean_content(content: &str) -> String {
    let mut fragments = Vec::new();
    let protected = protect_fences(&strip_sentinels(content), &mut fragments);

    let markup = if protected.contains('<') {
        let document = Html::parse_document(&protected);
        if has_markup(&document) {
            Some(extract_text(&document, &mut fragments))
        } else {
            debug!("no html elements found, treating input as plain text");
            None
        }
    } else {
        None
    };

    // Line-start whitespace left after markup extraction is collapsed
    // inter-tag whitespace; plain text keeps its indentation.
    let tidy = match markup {
        Some(text) => tidy_whitespace(&text, true),
        None => tidy_whitespace(&protected, false),
    };
    debug!(
        input_len = content.len(),
        text_len = tidy.len(),
        code_blocks = fragments.len(),
        "normalized content"
    );
    restore_code(&tidy, &fragments)
}

/// Swap fenced blocks in the raw input for placeholders.
fn protect_fences(content: &str, fragments: &mut Vec<Fragment>) -> String {
    FENCE_RE
        .replace_all(content, |caps: &Captures<'_>| {
            let index = fragments.len();
            fragments.push(Fragment {
                info: caps[1].trim().to_string(),
                code: caps[2].to_string(),
            });
            placeholder(index)
        })
        .into_owned()
}

fn placeholder(index: usize) -> String {
    format!("{}{}{}", PLACEHOLDER_PREFIX, index, SENTINEL_CLOSE)
}

/// True when the tree holds a real HTML element beyond the implied
/// `html`/`head`/`body` wrapper.
fn has_markup(document: &Html) -> bool {
    document
        .root_element()
        .descendants()
        .filter_map(ElementRef::wrap)
        .map(|el| el.value().name())
        .filter(|name| !matches!(*name, "html" | "head" | "body"))
        .any(|name| {
            [BLOCK_TAGS, CODE_TAGS, HIDDEN_TAGS, CELL_TAGS, INLINE_TAGS]
                .iter()
                .any(|tags| tags.contains(&name))
        })
}

fn extract_text(document: &Html, fragments: &mut Vec<Fragment>) -> String {
    if !document.errors.is_empty() {
        debug!(
            errors = document.errors.len(),
            first = %document.errors[0],
            "html parsed with errors, continuing with recovered tree"
        );
    }

    let mut walker = TextWalker {
        out: String::new(),
        fragments,
    };
    walker.visit(document.root_element());
    walker.out
}

/// Collects visible text, swapping code elements for placeholders.
struct TextWalker<'a> {
    out: String,
    fragments: &'a mut Vec<Fragment>,
}

impl TextWalker<'_> {
    fn visit(&mut self, element: ElementRef<'_>) {
        let name = element.value().name();

        if HIDDEN_TAGS.contains(&name) {
            return;
        }

        if CODE_TAGS.contains(&name) {
            let raw: String = element.text().collect();
            let code = expand_placeholders(&raw, &self.fragments);
            self.push_placeholder(code.trim_matches(['\n', '\r']).to_string());
            return;
        }

        if name == "br" {
            self.out.push('\n');
            return;
        }

        for child in element.children() {
            match child.value() {
                Node::Text(text) => self.push_text(text),
                Node::Element(_) => {
                    if let Some(el) = ElementRef::wrap(child) {
                        self.visit(el);
                    }
                }
                _ => {}
            }
        }

        if CELL_TAGS.contains(&name) {
            self.out.push('\t');
        } else if BLOCK_TAGS.contains(&name) {
            self.end_line();
        }
    }

    /// Append a text node with HTML whitespace collapsing.
    fn push_text(&mut self, text: &str) {
        let collapsed = HTML_SPACE_RE.replace_all(text, " ");
        let mut collapsed: &str = &collapsed;
        if self.out.is_empty() || self.out.ends_with([' ', '\t', '\n']) {
            collapsed = collapsed.trim_start_matches(' ');
        }
        self.out.push_str(collapsed);
    }

    fn push_placeholder(&mut self, code: String) {
        let index = self.fragments.len();
        self.fragments.push(Fragment {
            info: String::new(),
            code,
        });
        self.out.push_str(&placeholder(index));
    }

    fn end_line(&mut self) {
        if !self.out.is_empty() && !self.out.ends_with('\n') {
            self.out.push('\n');
        }
    }
}

fn strip_sentinels(text: &str) -> String {
    text.replace([SENTINEL_OPEN, SENTINEL_CLOSE], "")
}

/// Put protected fences found inside a code element back as raw text.
fn expand_placeholders(text: &str, fragments: &[Fragment]) -> String {
    PLACEHOLDER_RE
        .replace_all(text, |caps: &Captures<'_>| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|i| fragments.get(i))
                .map(Fragment::fenced)
                .unwrap_or_default()
        })
        .into_owned()
}

/// Trim line ends (and starts, for markup), collapse runs of blank lines,
/// drop outer blank lines.
fn tidy_whitespace(text: &str, trim_start: bool) -> String {
    let trimmed = text
        .lines()
        .map(|l| if trim_start { l.trim() } else { l.trim_end() })
        .join("\n");
    let collapsed = BLANK_RUN_RE.replace_all(&trimmed, "\n\n");
    collapsed.trim_matches('\n').to_string()
}

/// Swap placeholders back for fenced code, each fence on its own line.
fn restore_code(text: &str, fragments: &[Fragment]) -> String {
    if fragments.is_empty() {
        return text.to_string();
    }

    let extra: usize = fragments.iter().map(|f| f.code.len() + f.info.len() + 10).sum();
    let mut out = String::with_capacity(text.len() + extra);
    let mut last = 0;

    for caps in PLACEHOLDER_RE.captures_iter(text) {
        let Some(whole) = caps.get(0) else { continue };
        if whole.start() < last {
            continue;
        }

        out.push_str(&text[last..whole.start()]);
        let kept = out.trim_end_matches([' ', '\t']).len();
        out.truncate(kept);
        if !out.is_empty() && !out.ends_with('\n') {
            out.push('\n');
        }

        let fenced = caps[1]
            .parse::<usize>()
            .ok()
            .and_then(|i| fragments.get(i))
            .cloned()
            .unwrap_or_default()
            .fenced();
        out.push_str(&fenced);

        let rest = &text[whole.end()..];
        let rest_trimmed = rest.trim_start_matches([' ', '\t']);
        last = whole.end() + (rest.len() - rest_trimmed.len());
        if !rest_trimmed.is_empty() && !rest_trimmed.starts_with('\n') {
            out.push('\n');
        }
    }

    out.push_str(&text[last..]);
    out
}
