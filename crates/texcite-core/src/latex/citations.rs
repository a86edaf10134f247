//! Citation command matching.
//!
//! Finds `\cite`-family invocations and splits their argument into keys.
//! Keys are trimmed but never deduplicated or filtered, so `\cite{a,,b}`
//! yields an empty key between `a` and `b`.

use serde::{Deserialize, Serialize};

use super::scan::{scan_commands, Argument};

/// Citation command names recognized by the matcher.
pub const CITATION_COMMANDS: &[&str] = &[
    "cite",
    "parencite",
    "parencites",
    "textcite",
    "footcite",
    "autocite",
    "fullcite",
    "citeauthor",
    "citeyear",
    "citep",
    "citet",
    "footfullcite",
];

/// Returns true if `name` is one of [`CITATION_COMMANDS`].
pub fn is_citation_command(name: &str) -> bool {
    CITATION_COMMANDS.contains(&name)
}

/// One matched citation command invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CitationOccurrence {
    pub keys: Vec<String>,
}

/// Citations found in a span of text.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CitationExtractionResult {
    /// Every key in order of appearance, duplicates kept.
    pub citations: Vec<String>,
    /// Number of citation command invocations, not distinct keys.
    pub unique_citation_commands: usize,
}

impl CitationExtractionResult {
    /// Append one occurrence.
    pub fn push(&mut self, occurrence: CitationOccurrence) {
        self.unique_citation_commands += 1;
        self.citations.extend(occurrence.keys);
    }

    pub fn is_empty(&self) -> bool {
        self.unique_citation_commands == 0
    }
}

/// Scan `text` for citation commands, one occurrence per invocation.
pub fn scan_citations(text: &str) -> Vec<CitationOccurrence> {
    scan_commands(text, Argument::Required, is_citation_command)
        .into_iter()
        .map(|found| CitationOccurrence {
            keys: found
                .argument
                .split(',')
                .map(|key| key.trim().to_string())
                .collect(),
        })
        .collect()
}

/// Extract all citation keys and the command count from `text`.
pub fn extract_citations(text: &str) -> CitationExtractionResult {
    let mut result = CitationExtractionResult::default();
    for occurrence in scan_citations(text) {
        result.push(occurrence);
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_citations() {
        let result = extract_citations("Plain prose with a \\textbf{bold} word.");
        assert!(result.citations.is_empty());
        assert_eq!(result.unique_citation_commands, 0);
        assert!(result.is_empty());
    }

    #[test]
    fn test_multi_key_command_counts_once() {
        let result = extract_citations(r"\cite{a,b,c}");
        assert_eq!(result.citations, vec!["a", "b", "c"]);
        assert_eq!(result.unique_citation_commands, 1);
    }

    #[test]
    fn test_adjacent_commands() {
        let result = extract_citations(r"\cite{a}\cite{b}");
        assert_eq!(result.citations, vec!["a", "b"]);
        assert_eq!(result.unique_citation_commands, 2);
    }

    #[test]
    fn test_keys_are_trimmed() {
        let result = extract_citations("\\parencite{ smith2020 ,\n jones2019 }");
        assert_eq!(result.citations, vec!["smith2020", "jones2019"]);
    }

    #[test]
    fn test_empty_keys_are_kept() {
        let result = extract_citations(r"\cite{a,,b}");
        assert_eq!(result.citations, vec!["a", "", "b"]);
        assert_eq!(result.unique_citation_commands, 1);
    }

    #[test]
    fn test_all_aliases_match() {
        for name in CITATION_COMMANDS {
            let text = format!("\\{}{{k}}", name);
            assert_eq!(extract_citations(&text).citations, vec!["k"], "{}", name);
        }
    }

    #[test]
    fn test_star_and_optional_argument() {
        let result = extract_citations(r"see \textcite*[p.~12]{knuth1984} and \autocite[ch. 2]{lamport}");
        assert_eq!(result.citations, vec!["knuth1984", "lamport"]);
        assert_eq!(result.unique_citation_commands, 2);
    }

    #[test]
    fn test_second_optional_group_does_not_match() {
        let result = extract_citations(r"\parencite[see][12]{key}");
        assert!(result.is_empty());
    }

    #[test]
    fn test_unknown_and_prefixed_commands_ignored() {
        let result = extract_citations(r"\nocite{x} \citealp{y} \cites{z} \Cite{w}");
        assert!(result.is_empty());
    }

    #[test]
    fn test_malformed_command_does_not_match() {
        assert!(extract_citations(r"\cite{unterminated").is_empty());
        assert!(extract_citations(r"\cite[oops{key}").is_empty());
        assert!(extract_citations(r"\cite{}").is_empty());
    }

    #[test]
    fn test_order_of_appearance_with_duplicates() {
        let result = extract_citations(r"\citet{b} \citep{a,b} \citeyear{b}");
        assert_eq!(result.citations, vec!["b", "a", "b", "b"]);
        assert_eq!(result.unique_citation_commands, 3);
    }
}
