//! Sentence counting for LaTeX documents.
//!
//! List items and table cells are counted with their own rules and then cut
//! out of the document before the remaining prose is split into sentences,
//! so nothing is counted twice.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

/// List environments whose items are counted individually.
pub const LIST_ENVIRONMENTS: &[&str] = &["itemize", "enumerate", "description"];

/// Table environments whose cells are counted individually.
pub const TABLE_ENVIRONMENTS: &[&str] = &["tabular", "table", "longtable"];

static COMMAND_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\[a-zA-Z]+(\[[^\]]*\])?(\{[^}]*\})?").unwrap());
static BRACES_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\{[^}]*\}").unwrap());
static COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)%.*$").unwrap());
static SENTENCE_BREAK_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.\s+").unwrap());

/// Prose fragments at or below this many characters are not sentences.
const MIN_PROSE_SENTENCE_CHARS: usize = 3;

/// Sentence count split by where the sentences were found.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentenceBreakdown {
    pub list_items: usize,
    pub table_cells: usize,
    pub prose: usize,
}

impl SentenceBreakdown {
    pub fn total(&self) -> usize {
        self.list_items + self.table_cells + self.prose
    }
}

/// A top-level environment occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvironmentSpan<'a> {
    pub name: &'a str,
    /// Text between `\begin{name}` and `\end{name}`.
    pub content: &'a str,
    /// Byte range of the whole environment, including both tags.
    pub start: usize,
    pub end: usize,
}

/// Count the sentences in a document.
pub fn count_sentences(text: &str) -> usize {
    sentence_breakdown(text).total()
}

/// Count the sentences in a document, keeping the per-source counts.
pub fn sentence_breakdown(text: &str) -> SentenceBreakdown {
    let lists = find_environments(text, LIST_ENVIRONMENTS);
    let tables = find_environments(text, TABLE_ENVIRONMENTS);

    let list_items: usize = lists
        .iter()
        .flat_map(|env| item_bodies(env.content))
        .map(|item| count_unit_sentences(&strip_markup(item)))
        .sum();

    let table_cells: usize = tables
        .iter()
        .flat_map(|env| table_cell_texts(env.content))
        .map(|cell| count_unit_sentences(&strip_markup(cell)))
        .sum();

    let ranges = lists.iter().chain(tables.iter()).map(|env| (env.start, env.end));
    let main_text = remove_ranges(text, ranges);

    SentenceBreakdown {
        list_items,
        table_cells,
        prose: count_prose_sentences(&main_text),
    }
}

/// Find non-overlapping `\begin{name}...\end{name}` spans, left to right.
///
/// The first `\end{name}` closes the environment, so a nested environment of
/// the same kind ends the outer one early. Environments of the other kinds
/// nested inside a match are swallowed as content.
pub fn find_environments<'a>(text: &'a str, names: &[&str]) -> Vec<EnvironmentSpan<'a>> {
    const BEGIN: &str = "\\begin{";

    let mut spans = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = text[cursor..].find(BEGIN) {
        let start = cursor + offset;
        let name_start = start + BEGIN.len();
        let Some(name_len) = text[name_start..].find('}') else {
            break;
        };
        let name = &text[name_start..name_start + name_len];

        if names.contains(&name) {
            let content_start = name_start + name_len + 1;
            let end_tag = format!("\\end{{{}}}", name);
            if let Some(content_len) = text[content_start..].find(&end_tag) {
                let content_end = content_start + content_len;
                let end = content_end + end_tag.len();
                spans.push(EnvironmentSpan {
                    name,
                    content: &text[content_start..content_end],
                    start,
                    end,
                });
                cursor = end;
                continue;
            }
        }

        cursor = start + 1;
    }

    spans
}

/// Text following each `\item`, up to the next `\item`, `\end` or the end.
fn item_bodies(content: &str) -> Vec<&str> {
    const ITEM: &str = "\\item";

    let mut items = Vec::new();
    let mut cursor = 0;

    while let Some(offset) = content[cursor..].find(ITEM) {
        let body_start = cursor + offset + ITEM.len();
        let rest = &content[body_start..];
        let body_len = [rest.find(ITEM), rest.find("\\end")]
            .into_iter()
            .flatten()
            .min()
            .unwrap_or(rest.len());
        items.push(&rest[..body_len]);
        cursor = body_start + body_len;
    }

    items
}

/// Cells of a table body: rows split on `\\`, cells on unescaped `&`.
fn table_cell_texts(content: &str) -> Vec<&str> {
    content
        .split("\\\\")
        .filter(|row| !row.trim().is_empty())
        .flat_map(split_unescaped_ampersand)
        .collect()
}

fn split_unescaped_ampersand(row: &str) -> Vec<&str> {
    let bytes = row.as_bytes();
    let mut cells = Vec::new();
    let mut cell_start = 0;

    for (i, &b) in bytes.iter().enumerate() {
        if b == b'&' && (i == 0 || bytes[i - 1] != b'\\') {
            cells.push(&row[cell_start..i]);
            cell_start = i + 1;
        }
    }
    cells.push(&row[cell_start..]);

    cells
}

/// Remove commands (with one optional and one braced argument) and any
/// remaining brace groups, then trim.
fn strip_markup(text: &str) -> String {
    let without_commands = COMMAND_RE.replace_all(text, "");
    BRACES_RE.replace_all(&without_commands, "").trim().to_string()
}

/// Sentences in a single list item or table cell.
///
/// Text without a period is one sentence; otherwise every non-empty
/// fragment between `. ` breaks counts.
fn count_unit_sentences(unit: &str) -> usize {
    if unit.is_empty() {
        return 0;
    }
    if !unit.contains('.') {
        return 1;
    }
    SENTENCE_BREAK_RE
        .split(unit)
        .filter(|fragment| !fragment.trim().is_empty())
        .count()
}

fn count_prose_sentences(main_text: &str) -> usize {
    let text = COMMAND_RE.replace_all(main_text, "");
    let text = COMMENT_RE.replace_all(&text, "");
    let text = BRACES_RE.replace_all(&text, "");

    SENTENCE_BREAK_RE
        .split(&text)
        .filter(|fragment| fragment.trim().chars().count() > MIN_PROSE_SENTENCE_CHARS)
        .count()
}

/// Replace each byte range with a single space.
///
/// Overlapping or nested ranges are merged first so every character is
/// removed at most once. Removal runs from the last range to the first so
/// earlier offsets stay valid.
fn remove_ranges(text: &str, ranges: impl Iterator<Item = (usize, usize)>) -> String {
    let mut ranges: Vec<(usize, usize)> = ranges.collect();
    ranges.sort_unstable();

    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(ranges.len());
    for (start, end) in ranges {
        match merged.last_mut() {
            Some(last) if start < last.1 => last.1 = last.1.max(end),
            _ => merged.push((start, end)),
        }
    }

    let mut result = text.to_string();
    for &(start, end) in merged.iter().rev() {
        result.replace_range(start..end, " ");
    }
    result
}
