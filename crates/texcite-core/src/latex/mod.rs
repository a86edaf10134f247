//! LaTeX source analysis: citations, sentences and document outline.

pub mod aggregate;
pub mod citations;
pub mod scan;
pub mod sentences;
pub mod structure;

use serde::{Deserialize, Serialize};

pub use aggregate::aggregate_citations;
pub use citations::{extract_citations, CitationExtractionResult, CitationOccurrence};
pub use sentences::{count_sentences, sentence_breakdown, SentenceBreakdown};
pub use structure::{extract_structure, HeadingKind, HeadingNode};

/// Everything derived from a single document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DocumentAnalysis {
    pub citations: CitationExtractionResult,
    pub sentences: SentenceBreakdown,
    pub structure: Vec<HeadingNode>,
}

impl DocumentAnalysis {
    pub fn sentence_count(&self) -> usize {
        self.sentences.total()
    }

    /// Sum of citation counts over the shallowest headings in the document.
    pub fn top_level_citation_count(&self) -> usize {
        let Some(min_level) = self.structure.iter().map(|h| h.level).min() else {
            return 0;
        };
        self.structure
            .iter()
            .filter(|h| h.level == min_level)
            .map(|h| h.citations.len())
            .sum()
    }
}

/// Run citation extraction, sentence counting and outline aggregation.
///
/// File totals come from a scan of the whole text, independent of the
/// outline, so text before the first heading still counts.
pub fn analyze_document(text: &str) -> DocumentAnalysis {
    let lines = structure::split_lines(text);
    let mut headings = structure::extract_structure_from_lines(&lines);
    aggregate_citations(&lines, &mut headings);

    DocumentAnalysis {
        citations: extract_citations(text),
        sentences: sentence_breakdown(text),
        structure: headings,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preamble_citations_count_toward_totals() {
        let analysis = analyze_document("Preamble \\cite{early}.\n\\section{Body}\nText \\cite{late}.");
        assert_eq!(analysis.citations.citations, vec!["early", "late"]);
        assert_eq!(analysis.top_level_citation_count(), 1);
    }

    #[test]
    fn test_document_without_headings() {
        let analysis = analyze_document("Only prose here. With a \\cite{k} citation.");
        assert!(analysis.structure.is_empty());
        assert_eq!(analysis.citations.unique_citation_commands, 1);
        assert_eq!(analysis.top_level_citation_count(), 0);
        assert_eq!(analysis.sentence_count(), 2);
    }

    #[test]
    fn test_top_level_uses_minimum_level() {
        let text = "\\section{A}\n\\cite{a}\n\\subsection{A1}\n\\cite{b}\n\\section{B}\n\\cite{c}";
        let analysis = analyze_document(text);
        assert_eq!(analysis.top_level_citation_count(), 3);
    }
}
