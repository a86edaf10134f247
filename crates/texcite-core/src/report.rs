//! Project citation reports.
//!
//! Holds the report record returned to callers, the source/topic usage
//! resolution against the catalog, and a terminal rendering.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::catalog::{Catalog, Source, Tag};
use crate::latex::{DocumentAnalysis, HeadingNode, SentenceBreakdown};

/// Per-file numbers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FileSummary {
    pub path: String,
    pub citations: usize,
    pub unique_citation_commands: usize,
    pub sentences: usize,
    /// Where the sentences were counted: prose, list items, table cells.
    pub sentence_breakdown: SentenceBreakdown,
    pub headings: usize,
}

/// A selected file that could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailedFile {
    pub path: String,
    pub reason: String,
}

/// Citation analytics for a whole project.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectCitationReport {
    /// Every key, in file order then in-file order.
    pub citations: Vec<String>,
    pub total_citations: usize,
    pub total_unique_citations: usize,
    /// Source id to number of matching keys.
    pub source_usage: BTreeMap<String, usize>,
    /// Topic name to summed usage of the sources tagged with it.
    pub topic_usage: BTreeMap<String, usize>,
    pub average_citations_per_sentence: f64,
    pub average_unique_citations_per_sentence: f64,
    pub document_structure: Vec<HeadingNode>,
    pub total_sentences: usize,
    pub files: Vec<FileSummary>,
    pub failed_files: Vec<FailedFile>,
    /// Distinct keys that matched no source, in order of first appearance.
    pub unresolved_citations: Vec<String>,
    pub sources: Vec<Source>,
    pub tags: Vec<Tag>,
    pub generated_at: String,
}

impl ProjectCitationReport {
    /// A zero-valued report that still carries the catalog.
    pub fn empty(catalog: &Catalog) -> Self {
        ReportBuilder::new().finish(catalog)
    }

    /// Format the report as a human-readable string.
    pub fn to_display_string(&self) -> String {
        let mut output = String::new();

        output.push_str("Citation Report\n");
        output.push_str(&format!("{}\n", "─".repeat(50)));
        output.push_str(&format!("Files analyzed:     {:>8}\n", self.files.len()));
        output.push_str(&format!("Total citations:    {:>8}\n", self.total_citations));
        output.push_str(&format!("Citation commands:  {:>8}\n", self.total_unique_citations));
        output.push_str(&format!("Total sentences:    {:>8}\n", self.total_sentences));
        output.push_str(&format!(
            "Citations/sentence: {:>8.3}\n",
            self.average_citations_per_sentence
        ));
        output.push_str(&format!(
            "Commands/sentence:  {:>8.3}\n",
            self.average_unique_citations_per_sentence
        ));
        output.push_str(&format!("{}\n\n", "─".repeat(50)));

        if !self.source_usage.is_empty() {
            output.push_str("Sources by usage:\n");

            let mut sorted: Vec<(&String, &usize)> = self.source_usage.iter().collect();
            sorted.sort_by(|a, b| b.1.cmp(a.1).then_with(|| a.0.cmp(b.0)));

            for (id, count) in sorted {
                let pct = if self.total_citations > 0 {
                    count * 100 / self.total_citations
                } else {
                    0
                };
                let bar_len = (pct / 2).max(1);
                output.push_str(&format!(
                    "  {:>6} ({:>2}%) {} {}\n",
                    count,
                    pct,
                    "█".repeat(bar_len),
                    self.source_label(id)
                ));
            }
            output.push('\n');
        }

        if !self.topic_usage.is_empty() {
            output.push_str("Topics:\n");
            for (topic, count) in &self.topic_usage {
                output.push_str(&format!("  {:>6}  {}\n", count, topic));
            }
            output.push('\n');
        }

        if !self.unresolved_citations.is_empty() {
            output.push_str(&format!(
                "Unresolved keys: {}\n\n",
                self.unresolved_citations.join(", ")
            ));
        }

        if !self.failed_files.is_empty() {
            output.push_str("Skipped files:\n");
            for failed in &self.failed_files {
                output.push_str(&format!("  {}: {}\n", failed.path, failed.reason));
            }
            output.push('\n');
        }

        if !self.document_structure.is_empty() {
            output.push_str("Outline:\n");
            output.push_str(&format_outline(&self.document_structure));
        }

        output
    }

    fn source_label(&self, id: &str) -> String {
        let source = self.sources.iter().find(|s| s.id == id);
        match source.and_then(|s| s.abbreviation.as_deref().or(s.title.as_deref())) {
            Some(label) => label.to_string(),
            None => id.to_string(),
        }
    }
}

/// Indented outline with per-heading citation counts.
pub fn format_outline(headings: &[HeadingNode]) -> String {
    let base = headings.iter().map(|h| h.level).min().unwrap_or(0);
    let mut output = String::new();
    let mut current_file: Option<&str> = None;

    for heading in headings {
        if heading.file_path.is_some() && heading.file_path.as_deref() != current_file {
            current_file = heading.file_path.as_deref();
            output.push_str(&format!("  [{}]\n", current_file.unwrap_or_default()));
        }
        let indent = "  ".repeat(usize::from(heading.level - base) + 1);
        output.push_str(&format!(
            "{}{} {} (line {}, {} citations)\n",
            indent,
            heading.kind,
            heading.title,
            heading.line_number,
            heading.citations.len()
        ));
    }

    output
}

/// Count of keys per source id, matching abbreviations case-insensitively.
/// Sources without matches are left out.
pub fn resolve_source_usage(citations: &[String], sources: &[Source]) -> BTreeMap<String, usize> {
    sources
        .iter()
        .filter_map(|source| {
            let count = citations.iter().filter(|key| source.matches_key(key)).count();
            (count > 0).then(|| (source.id.clone(), count))
        })
        .collect()
}

/// Usage per topic name.
///
/// A source with several tags adds its full count to each of them, so the
/// topic totals can exceed the number of citations.
pub fn resolve_topic_usage(
    source_usage: &BTreeMap<String, usize>,
    catalog: &Catalog,
) -> BTreeMap<String, usize> {
    let mut topics = BTreeMap::new();
    for source in &catalog.sources {
        let Some(&count) = source_usage.get(&source.id) else {
            continue;
        };
        for tag_id in &source.tags {
            if let Some(name) = catalog.tag_name(tag_id) {
                *topics.entry(name.to_string()).or_default() += count;
            }
        }
    }
    topics
}

/// Distinct keys matching no source, in first-appearance order.
pub fn unresolved_keys(citations: &[String], sources: &[Source]) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut unresolved = Vec::new();
    for key in citations {
        if !seen.insert(key.as_str()) {
            continue;
        }
        if !sources.iter().any(|source| source.matches_key(key)) {
            unresolved.push(key.clone());
        }
    }
    unresolved
}

fn per_sentence(count: usize, sentences: usize) -> f64 {
    if sentences == 0 {
        0.0
    } else {
        count as f64 / sentences as f64
    }
}

/// Accumulates per-file results into a report.
#[derive(Debug, Default)]
pub struct ReportBuilder {
    citations: Vec<String>,
    total_unique_citations: usize,
    total_sentences: usize,
    document_structure: Vec<HeadingNode>,
    files: Vec<FileSummary>,
    failed_files: Vec<FailedFile>,
}

impl ReportBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Merge one analyzed file. Headings are tagged with `path`.
    pub fn add_file(&mut self, path: &str, analysis: DocumentAnalysis) {
        let sentences = analysis.sentence_count();
        self.files.push(FileSummary {
            path: path.to_string(),
            citations: analysis.citations.citations.len(),
            unique_citation_commands: analysis.citations.unique_citation_commands,
            sentences,
            sentence_breakdown: analysis.sentences,
            headings: analysis.structure.len(),
        });

        self.total_unique_citations += analysis.citations.unique_citation_commands;
        self.total_sentences += sentences;
        self.citations.extend(analysis.citations.citations);
        self.document_structure.extend(
            analysis
                .structure
                .into_iter()
                .map(|heading| heading.with_file_path(path)),
        );
    }

    pub fn add_failure(&mut self, path: &str, reason: impl Into<String>) {
        self.failed_files.push(FailedFile {
            path: path.to_string(),
            reason: reason.into(),
        });
    }

    /// Compute averages and resolve usage against the catalog.
    pub fn finish(self, catalog: &Catalog) -> ProjectCitationReport {
        let total_citations = self.citations.len();
        let source_usage = resolve_source_usage(&self.citations, &catalog.sources);
        let topic_usage = resolve_topic_usage(&source_usage, catalog);
        let unresolved_citations = unresolved_keys(&self.citations, &catalog.sources);

        ProjectCitationReport {
            average_citations_per_sentence: per_sentence(total_citations, self.total_sentences),
            average_unique_citations_per_sentence: per_sentence(
                self.total_unique_citations,
                self.total_sentences,
            ),
            citations: self.citations,
            total_citations,
            total_unique_citations: self.total_unique_citations,
            source_usage,
            topic_usage,
            document_structure: self.document_structure,
            total_sentences: self.total_sentences,
            files: self.files,
            failed_files: self.failed_files,
            unresolved_citations,
            sources: catalog.sources.clone(),
            tags: catalog.tags.clone(),
            generated_at: chrono::Utc::now().to_rfc3339(),
        }
    }
}
