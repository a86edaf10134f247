//! Project, source and tag records.
//!
//! These are owned by the persistence layer; texcite only reads them.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::error::{TexciteError, TexciteResult};

/// A repository the project's documents live in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
    /// Branch, tag or commit the files are read at.
    #[serde(rename = "ref", default = "default_ref")]
    pub git_ref: String,
}

fn default_ref() -> String {
    "main".to_string()
}

impl RepoRef {
    pub fn new(owner: &str, name: &str, git_ref: &str) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
            git_ref: git_ref.to_string(),
        }
    }

    /// Reference to a working tree on disk. The ref is not used to read it.
    pub fn local(root: &Path) -> Self {
        Self::new("local", &root.display().to_string(), "HEAD")
    }

    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }
}

/// A bibliographic source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    pub id: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Citation key this source is cited by.
    #[serde(default)]
    pub abbreviation: Option<String>,
    /// Ids of the tags attached to this source.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl Source {
    /// Case-insensitive match of a citation key against the abbreviation.
    /// Sources without an abbreviation, or with an empty one, match nothing.
    pub fn matches_key(&self, key: &str) -> bool {
        match self.abbreviation.as_deref() {
            Some(abbreviation) if !abbreviation.is_empty() => {
                abbreviation.to_lowercase() == key.to_lowercase()
            }
            _ => false,
        }
    }
}

/// A topic sources can be tagged with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: String,
    pub name: String,
}

/// Sources and tags of a project.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    #[serde(default)]
    pub sources: Vec<Source>,
    #[serde(default)]
    pub tags: Vec<Tag>,
}

impl Catalog {
    /// Parse a catalog from JSON.
    pub fn from_json(json: &str) -> TexciteResult<Self> {
        let catalog: Catalog = serde_json::from_str(json)?;
        catalog.validate()?;
        Ok(catalog)
    }

    /// Load a catalog from a JSON file.
    pub fn load(path: &Path) -> TexciteResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TexciteError::catalog(format!("failed to read {}: {}", path.display(), e))
        })?;
        Self::from_json(&content)
    }

    /// Name of the tag with the given id.
    pub fn tag_name(&self, id: &str) -> Option<&str> {
        self.tags.iter().find(|t| t.id == id).map(|t| t.name.as_str())
    }

    fn validate(&self) -> TexciteResult<()> {
        let mut seen = std::collections::HashSet::new();
        for source in &self.sources {
            if !seen.insert(source.id.as_str()) {
                return Err(TexciteError::catalog(format!("duplicate source id: {}", source.id)));
            }
        }
        Ok(())
    }
}

/// A project: where its documents are, which ones are selected, and its catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub repository: Option<RepoRef>,
    #[serde(default)]
    pub repo_files_selected: Vec<String>,
    #[serde(flatten)]
    pub catalog: Catalog,
}

impl Project {
    pub fn new(id: &str, name: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            repository: None,
            repo_files_selected: Vec::new(),
            catalog: Catalog::default(),
        }
    }

    /// Selected files with a `.tex` extension, in selection order.
    pub fn tex_files(&self) -> Vec<&str> {
        self.repo_files_selected
            .iter()
            .map(String::as_str)
            .filter(|path| is_tex_file(path))
            .collect()
    }
}

/// Whether a path names a LaTeX source file.
pub fn is_tex_file(path: &str) -> bool {
    Path::new(path)
        .extension()
        .map_or(false, |ext| ext == "tex")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_key_case_insensitive() {
        let source = Source {
            id: "s1".to_string(),
            title: None,
            abbreviation: Some("Smith2020".to_string()),
            tags: Vec::new(),
        };
        assert!(source.matches_key("smith2020"));
        assert!(source.matches_key("SMITH2020"));
        assert!(!source.matches_key("smith2021"));
    }

    #[test]
    fn test_empty_abbreviation_matches_nothing() {
        let source = Source {
            id: "s1".to_string(),
            title: None,
            abbreviation: Some(String::new()),
            tags: Vec::new(),
        };
        assert!(!source.matches_key(""));
    }

    #[test]
    fn test_tex_file_filter() {
        let mut project = Project::new("p", "Thesis");
        project.repo_files_selected = vec![
            "main.tex".to_string(),
            "refs.bib".to_string(),
            "chapters/intro.tex".to_string(),
            "README".to_string(),
            "notes.tex.bak".to_string(),
        ];
        assert_eq!(project.tex_files(), vec!["main.tex", "chapters/intro.tex"]);
    }

    #[test]
    fn test_catalog_from_json() {
        let json = r#"{
            "sources": [
                {"id": "1", "abbreviation": "knuth1984", "tags": ["t1"]},
                {"id": "2"}
            ],
            "tags": [{"id": "t1", "name": "Typesetting"}]
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        assert_eq!(catalog.sources.len(), 2);
        assert_eq!(catalog.sources[1].abbreviation, None);
        assert_eq!(catalog.tag_name("t1"), Some("Typesetting"));
        assert_eq!(catalog.tag_name("missing"), None);
    }

    #[test]
    fn test_catalog_rejects_duplicate_source_ids() {
        let json = r#"{"sources": [{"id": "1"}, {"id": "1"}]}"#;
        assert!(matches!(Catalog::from_json(json), Err(TexciteError::Catalog(_))));
    }

    #[test]
    fn test_project_record_from_json() {
        let json = r#"{
            "id": "p1",
            "name": "Thesis",
            "repository": {"owner": "ada", "name": "thesis"},
            "repoFilesSelected": ["main.tex"],
            "sources": [],
            "tags": []
        }"#;
        let project: Project = serde_json::from_str(json).unwrap();
        let repo = project.repository.unwrap();
        assert_eq!(repo.git_ref, "main");
        assert_eq!(repo.full_name(), "ada/thesis");
        assert_eq!(project.repo_files_selected, vec!["main.tex"]);
    }
}
