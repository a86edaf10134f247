//! Sectioning command extraction.

use serde::{Deserialize, Serialize};

use super::scan::{scan_commands, Argument};

/// A LaTeX sectioning command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HeadingKind {
    Part,
    Chapter,
    Section,
    Subsection,
    Subsubsection,
    Paragraph,
    Subparagraph,
}

impl HeadingKind {
    /// Every kind, shallowest first.
    pub const ALL: [HeadingKind; 7] = [
        HeadingKind::Part,
        HeadingKind::Chapter,
        HeadingKind::Section,
        HeadingKind::Subsection,
        HeadingKind::Subsubsection,
        HeadingKind::Paragraph,
        HeadingKind::Subparagraph,
    ];

    /// Deepest level a heading can have.
    pub const MAX_LEVEL: u8 = 6;

    /// Look up a command name (without the backslash).
    pub fn from_command(name: &str) -> Option<Self> {
        match name {
            "part" => Some(Self::Part),
            "chapter" => Some(Self::Chapter),
            "section" => Some(Self::Section),
            "subsection" => Some(Self::Subsection),
            "subsubsection" => Some(Self::Subsubsection),
            "paragraph" => Some(Self::Paragraph),
            "subparagraph" => Some(Self::Subparagraph),
            _ => None,
        }
    }

    pub fn command(&self) -> &'static str {
        match self {
            Self::Part => "part",
            Self::Chapter => "chapter",
            Self::Section => "section",
            Self::Subsection => "subsection",
            Self::Subsubsection => "subsubsection",
            Self::Paragraph => "paragraph",
            Self::Subparagraph => "subparagraph",
        }
    }

    /// Nesting level, 0 for `\part` through 6 for `\subparagraph`.
    pub fn level(&self) -> u8 {
        match self {
            Self::Part => 0,
            Self::Chapter => 1,
            Self::Section => 2,
            Self::Subsection => 3,
            Self::Subsubsection => 4,
            Self::Paragraph => 5,
            Self::Subparagraph => 6,
        }
    }
}

impl std::fmt::Display for HeadingKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.command())
    }
}

/// A heading found in a document.
///
/// Citation fields are empty after extraction and filled in by
/// [`crate::latex::aggregate::aggregate_citations`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HeadingNode {
    pub level: u8,
    #[serde(rename = "type")]
    pub kind: HeadingKind,
    pub title: String,
    /// 1-based line of the heading command.
    pub line_number: usize,
    pub citations: Vec<String>,
    pub unique_citation_commands: usize,
    /// Set once the node is copied into a project report.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_path: Option<String>,
}

impl HeadingNode {
    pub fn new(kind: HeadingKind, title: impl Into<String>, line_number: usize) -> Self {
        Self {
            level: kind.level(),
            kind,
            title: title.into(),
            line_number,
            citations: Vec::new(),
            unique_citation_commands: 0,
            file_path: None,
        }
    }

    /// This node tagged with the file it came from.
    pub fn with_file_path(mut self, path: &str) -> Self {
        self.file_path = Some(path.to_string());
        self
    }
}

/// Split text into lines the way headings are numbered.
///
/// Only `\n` separates lines; a trailing `\r` stays on its line.
pub fn split_lines(text: &str) -> Vec<&str> {
    text.split('\n').collect()
}

/// Find the first sectioning command on a line, if any.
pub fn parse_heading(line: &str, line_number: usize) -> Option<HeadingNode> {
    scan_commands(line, Argument::MaybeEmpty, |name| {
        HeadingKind::from_command(name).is_some()
    })
    .into_iter()
    .next()
    .and_then(|found| {
        HeadingKind::from_command(found.name)
            .map(|kind| HeadingNode::new(kind, found.argument, line_number))
    })
}

/// Extract every heading from a document, in order.
///
/// At most one heading is recognized per line. No nesting validation is
/// done, so a `\subsection` before any `\section` is kept as is.
pub fn extract_structure(text: &str) -> Vec<HeadingNode> {
    extract_structure_from_lines(&split_lines(text))
}

/// Same as [`extract_structure`] over pre-split lines.
pub fn extract_structure_from_lines(lines: &[&str]) -> Vec<HeadingNode> {
    lines
        .iter()
        .enumerate()
        .filter_map(|(index, line)| parse_heading(line, index + 1))
        .collect()
}
