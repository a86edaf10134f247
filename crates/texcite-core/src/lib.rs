//! # texcite core
//!
//! Citation extraction and document structure analysis for LaTeX projects.
//!
//! Parses LaTeX sources to extract citation keys, count sentences, and build
//! a heading outline with citations aggregated up the hierarchy, then merges
//! per-file results into project-level usage reports.

pub mod analysis;
pub mod catalog;
pub mod config;
pub mod error;
pub mod fetch;
pub mod latex;
pub mod report;

pub use analysis::CitationAnalyzer;
pub use catalog::{Catalog, Project, RepoRef, Source, Tag};
pub use config::TexciteConfig;
pub use error::{TexciteError, TexciteResult};
pub use fetch::{FetchError, FileFetcher, LocalFetcher};
pub use latex::{analyze_document, DocumentAnalysis, HeadingNode};
pub use report::ProjectCitationReport;
