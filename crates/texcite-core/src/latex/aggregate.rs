//! Hierarchical citation attribution.
//!
//! Every heading gets the citations of the full line range it spans, which
//! includes all of its descendants. Each range is re-extracted from the raw
//! lines rather than summed from children, so a node's numbers always agree
//! with a single extraction over its own span.

use tracing::trace;

use super::citations::{extract_citations, CitationExtractionResult};
use super::structure::{HeadingKind, HeadingNode};

/// Line range of a heading as 1-based `[start, end)` line numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LineSpan {
    pub start: usize,
    pub end: usize,
}

/// Span from a heading to the next heading at the same or a shallower level,
/// or to the end of the file.
pub fn full_span(headings: &[HeadingNode], index: usize, line_count: usize) -> LineSpan {
    let node = &headings[index];
    let end = headings[index + 1..]
        .iter()
        .find(|next| next.level <= node.level)
        .map(|next| next.line_number)
        .unwrap_or(line_count + 1);

    LineSpan {
        start: node.line_number,
        end,
    }
}

/// Span from a heading to its first child, i.e. the content that belongs to
/// the heading itself and none of its descendants.
pub fn direct_span(headings: &[HeadingNode], index: usize, line_count: usize) -> LineSpan {
    let full = full_span(headings, index, line_count);
    let node = &headings[index];
    let end = headings[index + 1..]
        .iter()
        .take_while(|next| next.line_number < full.end)
        .find(|next| next.level > node.level)
        .map(|next| next.line_number)
        .unwrap_or(full.end);

    LineSpan {
        start: node.line_number,
        end,
    }
}

/// Extract citations from the 1-based `[start, end)` lines.
pub fn extract_span(lines: &[&str], span: LineSpan) -> CitationExtractionResult {
    let start = span.start.saturating_sub(1).min(lines.len());
    let end = span.end.saturating_sub(1).clamp(start, lines.len());
    extract_citations(&lines[start..end].join("\n"))
}

fn assign(node: &mut HeadingNode, result: CitationExtractionResult) {
    node.unique_citation_commands = result.unique_citation_commands.min(result.citations.len());
    node.citations = result.citations;
}

/// Populate `citations` and `unique_citation_commands` on every heading.
///
/// The first pass records each heading's direct content. The second pass
/// works from the deepest level up and overwrites every node with the
/// citations of its full span, clamping the command count to the number of
/// keys.
pub fn aggregate_citations(lines: &[&str], headings: &mut [HeadingNode]) {
    let line_count = lines.len();

    for index in 0..headings.len() {
        let span = direct_span(headings, index, line_count);
        let direct = extract_span(lines, span);
        trace!(
            title = %headings[index].title,
            start = span.start,
            end = span.end,
            direct = direct.citations.len(),
            "direct heading content"
        );
        assign(&mut headings[index], direct);
    }

    for level in (0..=HeadingKind::MAX_LEVEL).rev() {
        for index in 0..headings.len() {
            if headings[index].level != level {
                continue;
            }
            let span = full_span(headings, index, line_count);
            let cumulative = extract_span(lines, span);
            assign(&mut headings[index], cumulative);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::latex::structure::{extract_structure_from_lines, split_lines};

    fn outline(text: &str) -> Vec<HeadingNode> {
        let lines = split_lines(text);
        let mut headings = extract_structure_from_lines(&lines);
        aggregate_citations(&lines, &mut headings);
        headings
    }

    #[test]
    fn test_section_includes_subsection_citations() {
        let headings = outline(
            "\\section{Intro}\n\\cite{smith2020}\n\\subsection{Background}\n\\cite{jones2019}",
        );
        assert_eq!(headings[0].citations, vec!["smith2020", "jones2019"]);
        assert_eq!(headings[0].unique_citation_commands, 2);
        assert_eq!(headings[1].citations, vec!["jones2019"]);
        assert_eq!(headings[1].unique_citation_commands, 1);
    }

    #[test]
    fn test_siblings_do_not_share_citations() {
        let headings = outline(
            "\\section{A}\n\\cite{a}\n\\section{B}\n\\cite{b1,b2}\n\\subsection{B.1}\n\\citep{b3}",
        );
        assert_eq!(headings[0].citations, vec!["a"]);
        assert_eq!(headings[1].citations, vec!["b1", "b2", "b3"]);
        assert_eq!(headings[1].unique_citation_commands, 2);
        assert_eq!(headings[2].citations, vec!["b3"]);
    }

    #[test]
    fn test_citation_on_heading_line_belongs_to_heading() {
        let headings = outline("\\chapter{One}\n\\section{Two} see \\cite{k}");
        assert_eq!(headings[0].citations, vec!["k"]);
        assert_eq!(headings[1].citations, vec!["k"]);
    }

    #[test]
    fn test_cumulative_and_clamp_properties() {
        let text = "\\part{P}\n\\cite{p}\n\\chapter{C}\n\\cite{c1,c2}\n\\section{S}\n\\cite{s}\n\
                    \\paragraph{Para}\n\\textcite{x}\n\\chapter{D}\n\\cite{d}";
        let headings = outline(text);

        for node in &headings {
            assert!(node.unique_citation_commands <= node.citations.len());
        }

        // Every node at a deeper level following a node is its descendant
        // until a node at the same or shallower level appears.
        for (i, parent) in headings.iter().enumerate() {
            for child in headings[i + 1..].iter().take_while(|c| c.level > parent.level) {
                for key in &child.citations {
                    assert!(parent.citations.contains(key), "{} missing {}", parent.title, key);
                }
            }
        }

        assert_eq!(headings[0].citations, vec!["p", "c1", "c2", "s", "x", "d"]);
        assert_eq!(headings[1].citations, vec!["c1", "c2", "s", "x"]);
        assert_eq!(headings[4].citations, vec!["d"]);
    }

    #[test]
    fn test_spans() {
        let lines = split_lines("\\section{A}\nx\n\\subsection{A1}\ny\n\\section{B}\nz");
        let headings = extract_structure_from_lines(&lines);

        assert_eq!(full_span(&headings, 0, lines.len()), LineSpan { start: 1, end: 5 });
        assert_eq!(direct_span(&headings, 0, lines.len()), LineSpan { start: 1, end: 3 });
        assert_eq!(full_span(&headings, 1, lines.len()), LineSpan { start: 3, end: 5 });
        assert_eq!(full_span(&headings, 2, lines.len()), LineSpan { start: 5, end: 7 });
        assert_eq!(direct_span(&headings, 2, lines.len()), LineSpan { start: 5, end: 7 });
    }

    #[test]
    fn test_no_headings() {
        let lines = split_lines("\\cite{a}");
        let mut headings: Vec<HeadingNode> = Vec::new();
        aggregate_citations(&lines, &mut headings);
        assert!(headings.is_empty());
    }

    #[test]
    fn test_extract_span_clamps_to_lines() {
        let lines = split_lines("\\cite{a}\n\\cite{b}");
        let result = extract_span(&lines, LineSpan { start: 2, end: 99 });
        assert_eq!(result.citations, vec!["b"]);
    }
}
