//! Project configuration (`texcite.toml`).

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::catalog::{Catalog, Project, RepoRef};
use crate::error::{TexciteError, TexciteResult};

/// Default configuration file name, looked up in the project directory.
pub const CONFIG_FILE: &str = "texcite.toml";

/// Default GitHub API URL.
pub const DEFAULT_GITHUB_API_URL: &str = "https://api.github.com";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct TexciteConfig {
    #[serde(default)]
    pub project: ProjectSettings,
    /// Remote repository holding the documents.
    pub repository: Option<RepoRef>,
    /// Working tree on disk, used instead of `repository`.
    pub local: Option<LocalSettings>,
    /// Selected document paths.
    #[serde(default)]
    pub files: Vec<String>,
    /// Path to the JSON source/tag catalog.
    pub catalog: Option<PathBuf>,
    #[serde(default)]
    pub analysis: AnalysisSettings,
    #[serde(default)]
    pub github: GithubSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProjectSettings {
    #[serde(default = "default_project_id")]
    pub id: String,
    #[serde(default = "default_project_name")]
    pub name: String,
}

impl Default for ProjectSettings {
    fn default() -> Self {
        Self {
            id: default_project_id(),
            name: default_project_name(),
        }
    }
}

fn default_project_id() -> String {
    "default".to_string()
}

fn default_project_name() -> String {
    "Untitled project".to_string()
}

#[derive(Debug, Clone, Deserialize)]
pub struct LocalSettings {
    pub root: PathBuf,
}

/// Knobs for the project analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct AnalysisSettings {
    /// Number of file fetches in flight at once.
    #[serde(default = "default_concurrency")]
    pub concurrency: usize,
    /// Allowed gap between the top-level heading citation sum and the file
    /// total before a warning is logged.
    #[serde(default = "default_mismatch_tolerance")]
    pub mismatch_tolerance: usize,
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self {
            concurrency: default_concurrency(),
            mismatch_tolerance: default_mismatch_tolerance(),
        }
    }
}

fn default_concurrency() -> usize {
    4
}

fn default_mismatch_tolerance() -> usize {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct GithubSettings {
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Environment variable holding the access token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GithubSettings {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            token_env: default_token_env(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GithubSettings {
    /// Token from the configured environment variable, if set and non-empty.
    pub fn token(&self) -> Option<String> {
        std::env::var(&self.token_env).ok().filter(|t| !t.trim().is_empty())
    }
}

fn default_api_url() -> String {
    DEFAULT_GITHUB_API_URL.to_string()
}

fn default_token_env() -> String {
    "GITHUB_TOKEN".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl TexciteConfig {
    /// Parse a configuration from TOML text.
    pub fn from_toml_str(content: &str) -> TexciteResult<Self> {
        let mut config: TexciteConfig = toml::from_str(content)?;
        config.analysis.concurrency = config.analysis.concurrency.max(1);
        if config.repository.is_some() && config.local.is_some() {
            return Err(TexciteError::config(
                "`repository` and `local` are mutually exclusive",
            ));
        }
        Ok(config)
    }

    /// Load a configuration file. Relative paths inside it are resolved
    /// against the file's directory.
    pub fn load(path: &Path) -> TexciteResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TexciteError::config(format!("failed to read {}: {}", path.display(), e))
        })?;
        let mut config = Self::from_toml_str(&content)?;
        if let Some(base) = path.parent() {
            config.resolve_paths(base);
        }
        Ok(config)
    }

    /// Load `texcite.toml` from a project directory.
    pub fn load_from_dir(project_dir: &Path) -> TexciteResult<Self> {
        Self::load(&project_dir.join(CONFIG_FILE))
    }

    fn resolve_paths(&mut self, base: &Path) {
        if let Some(catalog) = self.catalog.as_mut() {
            if catalog.is_relative() {
                *catalog = base.join(&*catalog);
            }
        }
        if let Some(local) = self.local.as_mut() {
            if local.root.is_relative() {
                local.root = base.join(&local.root);
            }
        }
    }

    /// Repository reference for the configured document source.
    pub fn repo_ref(&self) -> Option<RepoRef> {
        match (&self.repository, &self.local) {
            (Some(repo), _) => Some(repo.clone()),
            (None, Some(local)) => Some(RepoRef::local(&local.root)),
            (None, None) => None,
        }
    }

    /// Build the project record, reading the catalog if one is configured.
    pub fn load_project(&self) -> TexciteResult<Project> {
        let catalog = match &self.catalog {
            Some(path) => Catalog::load(path)?,
            None => Catalog::default(),
        };

        Ok(Project {
            id: self.project.id.clone(),
            name: self.project.name.clone(),
            repository: self.repo_ref(),
            repo_files_selected: self.files.clone(),
            catalog,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = TexciteConfig::from_toml_str("").unwrap();
        assert!(config.repository.is_none());
        assert!(config.files.is_empty());
        assert_eq!(config.analysis, AnalysisSettings::default());
        assert_eq!(config.analysis.concurrency, 4);
        assert_eq!(config.analysis.mismatch_tolerance, 5);
        assert_eq!(config.github.api_url, DEFAULT_GITHUB_API_URL);
        assert_eq!(config.github.token_env, "GITHUB_TOKEN");
    }

    #[test]
    fn test_full_config() {
        let toml = r#"
            files = ["main.tex", "chapters/intro.tex"]
            catalog = "catalog.json"

            [project]
            id = "thesis"
            name = "My Thesis"

            [repository]
            owner = "ada"
            name = "thesis"
            ref = "draft"

            [analysis]
            concurrency = 0

            [github]
            token_env = "THESIS_TOKEN"
        "#;
        let config = TexciteConfig::from_toml_str(toml).unwrap();
        assert_eq!(config.project.id, "thesis");
        assert_eq!(config.files.len(), 2);
        assert_eq!(config.analysis.concurrency, 1);
        assert_eq!(config.github.token_env, "THESIS_TOKEN");
        let repo = config.repo_ref().unwrap();
        assert_eq!(repo.git_ref, "draft");
        assert_eq!(repo.full_name(), "ada/thesis");
    }

    #[test]
    fn test_repository_and_local_conflict() {
        let toml = r#"
            [repository]
            owner = "a"
            name = "b"

            [local]
            root = "."
        "#;
        assert!(matches!(
            TexciteConfig::from_toml_str(toml),
            Err(TexciteError::Config(_))
        ));
    }

    #[test]
    fn test_invalid_toml() {
        assert!(matches!(
            TexciteConfig::from_toml_str("files = ["),
            Err(TexciteError::Toml(_))
        ));
    }

    #[test]
    fn test_load_resolves_relative_paths() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE),
            "files = [\"main.tex\"]\ncatalog = \"catalog.json\"\n\n[local]\nroot = \"docs\"\n",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("catalog.json"),
            r#"{"sources": [{"id": "1", "abbreviation": "k", "tags": []}], "tags": []}"#,
        )
        .unwrap();

        let config = TexciteConfig::load_from_dir(dir.path()).unwrap();
        assert_eq!(config.local.as_ref().unwrap().root, dir.path().join("docs"));

        let project = config.load_project().unwrap();
        assert_eq!(project.repo_files_selected, vec!["main.tex"]);
        assert_eq!(project.catalog.sources.len(), 1);
        assert_eq!(project.repository.unwrap().owner, "local");
    }

    #[test]
    fn test_missing_catalog_file_is_an_error() {
        let config = TexciteConfig {
            catalog: Some(PathBuf::from("/nonexistent/catalog.json")),
            ..Default::default()
        };
        assert!(matches!(config.load_project(), Err(TexciteError::Catalog(_))));
    }
}
