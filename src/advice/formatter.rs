//! Advice text formatter
//!
//! Converts the loosely structured Markdown that text-generation models
//! return into a sanitized HTML fragment. The pipeline runs in a fixed order:
//!
//! 1. normalize (zero-width characters, escaped newlines, CRLF, blank runs)
//! 2. HTML-escape `& < > " '`
//! 3. headings, bold spans, list items, line breaks
//! 4. section-title emphasis
//! 5. cleanup of list boundaries
//! 6. wrap in the outer container
//!
//! Escaping happens before any tag is generated, so every `<` in the output
//! belongs to a tag this module produced. Malformed input never fails; the
//! worst case is imperfect markup.

use crate::errors::{AdvisorError, Result};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Section headers emphasised when followed by a colon
pub const DEFAULT_SECTION_TITLES: [&str; 6] = [
    "Overall Analysis",
    "Weight Recommendation",
    "Dietary Advice",
    "Exercise Advice",
    "Precautions",
    "Summary",
];

const CONTAINER_OPEN: &str = r#"<div class="ai-advice-container">"#;
const CONTAINER_CLOSE: &str = "</div>";
const SECTION_TITLE_CLASS: &str = "advice-section-title";

static ZERO_WIDTH_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[\x{FEFF}\x{200B}\x{200C}\x{200D}\x{2060}]").expect("zero-width regex")
});

static EXCESS_NEWLINES_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n{3,}").expect("excess newline regex"));

static HEADING_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*#+\s+(.*\S)\s*$").expect("heading regex"));

static BOLD_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\*\*(.+?)\*\*").expect("bold regex"));

static UNORDERED_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*-\s+(.*\S)\s*$").expect("unordered item regex"));

static ORDERED_ITEM_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\s*\d+\.\s+(.*\S)\s*$").expect("ordered item regex"));

static BR_BEFORE_LIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?:<br>)+(<[uo]l>)").expect("br before list regex"));

static BR_AFTER_LIST_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(</[uo]l>)(?:<br>)+").expect("br after list regex"));

static DEFAULT_TITLES_RE: Lazy<Regex> = Lazy::new(|| {
    build_titles_regex(&DEFAULT_SECTION_TITLES)
        .expect("default section title regex")
        .expect("default section titles are non-empty")
});

/// Sanitized HTML produced from raw advice text
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AdviceFragment(String);

impl AdviceFragment {
    /// The empty fragment returned for empty input
    pub fn empty() -> Self {
        Self(String::new())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for AdviceFragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for AdviceFragment {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListKind {
    Unordered,
    Ordered,
}

impl ListKind {
    fn open_tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "<ul>",
            ListKind::Ordered => "<ol>",
        }
    }

    fn close_tag(self) -> &'static str {
        match self {
            ListKind::Unordered => "</ul>",
            ListKind::Ordered => "</ol>",
        }
    }
}

/// One input line after classification
#[derive(Debug, PartialEq)]
enum Line<'a> {
    Heading(&'a str),
    Item(ListKind, &'a str),
    Text(&'a str),
}

/// Markdown-to-HTML converter for advice text
#[derive(Debug, Clone)]
pub struct AdviceFormatter {
    section_titles: Vec<String>,
    titles_re: Option<Regex>,
}

impl Default for AdviceFormatter {
    fn default() -> Self {
        Self {
            section_titles: DEFAULT_SECTION_TITLES.iter().map(|t| t.to_string()).collect(),
            titles_re: Some(DEFAULT_TITLES_RE.clone()),
        }
    }
}

impl AdviceFormatter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a formatter emphasising a custom set of section titles
    ///
    /// An empty list disables section-title emphasis.
    pub fn with_section_titles<I, S>(titles: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let section_titles: Vec<String> = titles.into_iter().map(Into::into).collect();
        if section_titles.iter().any(|t| t.trim().is_empty()) {
            return Err(AdvisorError::ConfigError(
                "section titles must not be blank".to_string(),
            ));
        }

        let titles_re = build_titles_regex(&section_titles)?;
        Ok(Self {
            section_titles,
            titles_re,
        })
    }

    pub fn section_titles(&self) -> &[String] {
        &self.section_titles
    }

    /// Format raw advice text into an HTML fragment
    pub fn format(&self, raw: &str) -> AdviceFragment {
        let normalized = normalize(raw);
        let normalized = normalized.trim_matches('\n');
        if normalized.trim().is_empty() {
            return AdviceFragment::empty();
        }

        let escaped = escape_html(normalized);
        let structured = render_lines(&escaped);
        let titled = self.emphasize_section_titles(&structured);
        let cleaned = cleanup_lists(&titled);

        AdviceFragment(format!("{}{}{}", CONTAINER_OPEN, cleaned, CONTAINER_CLOSE))
    }

    /// Format optional text; absent input yields the empty fragment
    pub fn format_optional(&self, raw: Option<&str>) -> AdviceFragment {
        raw.map(|text| self.format(text)).unwrap_or_default()
    }

    fn emphasize_section_titles(&self, html: &str) -> String {
        match &self.titles_re {
            Some(re) => re
                .replace_all(html, |caps: &regex::Captures<'_>| {
                    format!(r#"<div class="{}">{}:</div>"#, SECTION_TITLE_CLASS, &caps[1])
                })
                .into_owned(),
            None => html.to_string(),
        }
    }
}

/// Format with the default section titles
pub fn format_advice(raw: &str) -> AdviceFragment {
    AdviceFormatter::default().format(raw)
}

/// Normalize raw model output
///
/// Strips zero-width and BOM characters, turns the two-character sequence
/// `\n` into a real newline, converts CRLF to LF and collapses three or more
/// consecutive newlines into two.
pub fn normalize(raw: &str) -> String {
    let text = ZERO_WIDTH_RE.replace_all(raw, "");
    let text = text.replace("\\n", "\n").replace("\r\n", "\n");
    EXCESS_NEWLINES_RE.replace_all(&text, "\n\n").into_owned()
}

/// Escape the five HTML-significant characters
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len() + text.len() / 8);
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#039;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn classify_line(line: &str) -> Line<'_> {
    if let Some(caps) = HEADING_RE.captures(line) {
        if let Some(text) = caps.get(1) {
            return Line::Heading(text.as_str());
        }
    }
    if let Some(caps) = UNORDERED_ITEM_RE.captures(line) {
        if let Some(text) = caps.get(1) {
            return Line::Item(ListKind::Unordered, text.as_str());
        }
    }
    if let Some(caps) = ORDERED_ITEM_RE.captures(line) {
        if let Some(text) = caps.get(1) {
            return Line::Item(ListKind::Ordered, text.as_str());
        }
    }
    Line::Text(line)
}

fn bold(text: &str) -> std::borrow::Cow<'_, str> {
    BOLD_RE.replace_all(text, "<strong>$1</strong>")
}

/// Render escaped text line by line
///
/// Consecutive items of one kind share a single list element. A newline
/// becomes `<br>` only when both neighbouring lines are plain text.
fn render_lines(escaped: &str) -> String {
    let mut html = String::with_capacity(escaped.len() * 2);
    let mut open_list: Option<ListKind> = None;
    let mut prev_was_text = false;

    for line in escaped.split('\n') {
        match classify_line(line) {
            Line::Heading(text) => {
                close_list(&mut html, &mut open_list);
                html.push_str("<h4>");
                html.push_str(&bold(text));
                html.push_str("</h4>");
                prev_was_text = false;
            }
            Line::Item(kind, text) => {
                if open_list != Some(kind) {
                    close_list(&mut html, &mut open_list);
                    html.push_str(kind.open_tag());
                    open_list = Some(kind);
                }
                html.push_str("<li>");
                html.push_str(&bold(text));
                html.push_str("</li>");
                prev_was_text = false;
            }
            Line::Text(text) => {
                if open_list.is_some() {
                    close_list(&mut html, &mut open_list);
                } else if prev_was_text {
                    html.push_str("<br>");
                }
                html.push_str(&bold(text));
                prev_was_text = true;
            }
        }
    }
    close_list(&mut html, &mut open_list);

    html
}

fn close_list(html: &mut String, open_list: &mut Option<ListKind>) {
    if let Some(kind) = open_list.take() {
        html.push_str(kind.close_tag());
    }
}

fn cleanup_lists(html: &str) -> String {
    let html = BR_BEFORE_LIST_RE.replace_all(html, "$1");
    let html = BR_AFTER_LIST_RE.replace_all(&html, "$1");
    html.replace("</ul><ul>", "").replace("</ol><ol>", "")
}

/// Build one alternation so overlapping titles never nest
///
/// Longer titles come first so "Dietary Advice" wins over a shorter
/// "Advice" at the same position.
fn build_titles_regex<S: AsRef<str>>(titles: &[S]) -> Result<Option<Regex>> {
    if titles.is_empty() {
        return Ok(None);
    }

    let mut escaped: Vec<String> = titles
        .iter()
        .map(|t| regex::escape(&escape_html(t.as_ref().trim())))
        .collect();
    escaped.sort_by(|a, b| b.len().cmp(&a.len()).then_with(|| a.cmp(b)));
    escaped.dedup();

    let pattern = format!("({})[:：]", escaped.join("|"));
    Regex::new(&pattern)
        .map(Some)
        .map_err(|e| AdvisorError::ConfigError(format!("Invalid section titles: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inner(fragment: &AdviceFragment) -> &str {
        fragment
            .as_str()
            .strip_prefix(CONTAINER_OPEN)
            .and_then(|s| s.strip_suffix(CONTAINER_CLOSE))
            .unwrap()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(format_advice("").as_str(), "");
        assert!(format_advice("\u{feff}\n\n").is_empty());
        assert!(AdviceFormatter::new().format_optional(None).is_empty());
    }

    #[test]
    fn test_plain_text_unchanged() {
        let fragment = format_advice("Keep a balanced diet and sleep well");
        assert_eq!(inner(&fragment), "Keep a balanced diet and sleep well");
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize("a\u{200b}b\u{feff}"), "ab");
        assert_eq!(normalize("a\\nb"), "a\nb");
        assert_eq!(normalize("a\r\nb"), "a\nb");
        assert_eq!(normalize("a\n\n\n\n\nb"), "a\n\nb");
    }

    #[test]
    fn test_escape_html() {
        assert_eq!(
            escape_html(r#"<a href="x">Tom's & co</a>"#),
            "&lt;a href=&quot;x&quot;&gt;Tom&#039;s &amp; co&lt;/a&gt;"
        );
    }

    #[test]
    fn test_heading() {
        let fragment = format_advice("## Your plan\nEat well");
        assert_eq!(inner(&fragment), "<h4>Your plan</h4>Eat well");
    }

    #[test]
    fn test_hash_without_space_is_text() {
        let fragment = format_advice("#hashtag");
        assert_eq!(inner(&fragment), "#hashtag");
    }

    #[test]
    fn test_bold() {
        let fragment = format_advice("This is **important** and **urgent**");
        assert_eq!(
            inner(&fragment),
            "This is <strong>important</strong> and <strong>urgent</strong>"
        );
    }

    #[test]
    fn test_unordered_list_merges() {
        let fragment = format_advice("Tips\n- walk\n- swim\n- sleep\nDone");
        assert_eq!(
            inner(&fragment),
            "Tips<ul><li>walk</li><li>swim</li><li>sleep</li></ul>Done"
        );
    }

    #[test]
    fn test_ordered_list() {
        let fragment = format_advice("1. breakfast\n2. lunch");
        assert_eq!(inner(&fragment), "<ol><li>breakfast</li><li>lunch</li></ol>");
    }

    #[test]
    fn test_lists_separated_by_blank_line_collapse() {
        let fragment = format_advice("- a\n\n- b");
        assert_eq!(inner(&fragment), "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn test_mixed_list_kinds_stay_separate() {
        let fragment = format_advice("- a\n1. b");
        assert_eq!(inner(&fragment), "<ul><li>a</li></ul><ol><li>b</li></ol>");
    }

    #[test]
    fn test_line_breaks() {
        let fragment = format_advice("first\nsecond\n\nthird");
        assert_eq!(inner(&fragment), "first<br>second<br><br>third");
    }

    #[test]
    fn test_no_br_next_to_lists() {
        let fragment = format_advice("intro\n\n- a\n\nafter");
        assert_eq!(inner(&fragment), "intro<ul><li>a</li></ul>after");
    }

    #[test]
    fn test_section_titles() {
        let fragment = format_advice("Summary: stay active");
        assert_eq!(
            inner(&fragment),
            r#"<div class="advice-section-title">Summary:</div> stay active"#
        );
        let fragment = format_advice("Precautions：rest");
        let title = r#"<div class="advice-section-title">Precautions:</div>rest"#;
        assert!(fragment.as_str().contains(title));
    }

    #[test]
    fn test_section_title_without_colon_untouched() {
        let fragment = format_advice("In summary we recommend Summary reading");
        assert!(!fragment.as_str().contains("advice-section-title"));
    }

    #[test]
    fn test_overlapping_custom_titles_do_not_nest() {
        let formatter = AdviceFormatter::with_section_titles(["Advice", "Dietary Advice"]).unwrap();
        let fragment = formatter.format("Dietary Advice: less sugar");
        assert_eq!(
            inner(&fragment),
            r#"<div class="advice-section-title">Dietary Advice:</div> less sugar"#
        );
    }

    #[test]
    fn test_custom_titles_are_escaped() {
        let formatter = AdviceFormatter::with_section_titles(["Q&A"]).unwrap();
        let fragment = formatter.format("Q&A: ask away");
        assert_eq!(
            inner(&fragment),
            r#"<div class="advice-section-title">Q&amp;A:</div> ask away"#
        );
    }

    #[test]
    fn test_blank_title_rejected() {
        assert!(AdviceFormatter::with_section_titles(["Summary", "  "]).is_err());
    }

    #[test]
    fn test_no_titles_disables_emphasis() {
        let formatter = AdviceFormatter::with_section_titles(Vec::<String>::new()).unwrap();
        let fragment = formatter.format("Summary: x");
        assert_eq!(inner(&fragment), "Summary: x");
    }

    #[test]
    fn test_script_is_escaped() {
        let fragment = format_advice("<script>alert('x')</script>");
        assert_eq!(
            inner(&fragment),
            "&lt;script&gt;alert(&#039;x&#039;)&lt;/script&gt;"
        );
    }

    #[test]
    fn test_apostrophe_does_not_become_heading() {
        let fragment = format_advice("'# quoted");
        assert_eq!(inner(&fragment), "&#039;# quoted");
    }

    #[test]
    fn test_unclosed_bold_is_left_alone() {
        let fragment = format_advice("**never closed");
        assert_eq!(inner(&fragment), "**never closed");
    }

    #[test]
    fn test_surrounding_newlines_trimmed() {
        let fragment = format_advice("\n\nhello\n");
        assert_eq!(inner(&fragment), "hello");
    }
}
