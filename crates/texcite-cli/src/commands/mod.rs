//! CLI command definitions and handlers.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use texcite_core::config::CONFIG_FILE;
use texcite_core::{CitationAnalyzer, FileFetcher, LocalFetcher, Project, TexciteConfig};
use texcite_github::GitHubFetcher;

pub mod analyze;
pub mod inspect;
pub mod serve;

/// texcite - citation analytics for LaTeX projects
#[derive(Parser)]
#[command(name = "texcite")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory (defaults to current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Path to the configuration file (defaults to <project>/texcite.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Build the citation report for the configured project
    Analyze(analyze::AnalyzeArgs),

    /// Show citations, sentences and outline of a single LaTeX file
    Inspect(inspect::InspectArgs),

    /// Print the heading outline of a single LaTeX file
    Outline(inspect::OutlineArgs),

    /// Start the JSON API server
    Serve(serve::ServeArgs),
}

impl Cli {
    pub fn project_dir(&self) -> Result<PathBuf> {
        match &self.project {
            Some(dir) => Ok(dir.clone()),
            None => std::env::current_dir().context("Failed to read current directory"),
        }
    }

    pub async fn execute(self) -> Result<()> {
        let project_dir = self.project_dir()?;
        let config_path = self.config.as_deref();

        match self.command {
            Commands::Analyze(args) => analyze::execute(args, &project_dir, config_path).await,
            Commands::Inspect(args) => inspect::execute_inspect(args).await,
            Commands::Outline(args) => inspect::execute_outline(args).await,
            Commands::Serve(args) => serve::execute(args, &project_dir, config_path).await,
        }
    }
}

/// Configured project together with an analyzer bound to its document source.
pub struct ProjectContext {
    pub config: TexciteConfig,
    pub project: Project,
    pub analyzer: CitationAnalyzer,
}

impl ProjectContext {
    pub fn load(project_dir: &Path, config_path: Option<&Path>) -> Result<Self> {
        let config = load_config(project_dir, config_path)?;
        let project = config.load_project()?;
        let fetcher = build_fetcher(&config, project_dir)?;
        let analyzer = CitationAnalyzer::with_settings(fetcher, config.analysis);

        Ok(Self {
            config,
            project,
            analyzer,
        })
    }
}

fn load_config(project_dir: &Path, config_path: Option<&Path>) -> Result<TexciteConfig> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => project_dir.join(CONFIG_FILE),
    };
    if !path.exists() {
        anyhow::bail!(
            "No configuration found at {}. Create a {} or pass --config.",
            path.display(),
            CONFIG_FILE
        );
    }
    debug!(path = %path.display(), "Loading configuration");

    let config = match config_path {
        Some(path) => TexciteConfig::load(path)?,
        None => TexciteConfig::load_from_dir(project_dir)?,
    };
    Ok(config)
}

/// Pick the document source: a local working tree, GitHub, or the project
/// directory when neither is configured.
fn build_fetcher(config: &TexciteConfig, project_dir: &Path) -> Result<Arc<dyn FileFetcher>> {
    if let Some(local) = &config.local {
        debug!(root = %local.root.display(), "Reading documents from local tree");
        return Ok(Arc::new(LocalFetcher::new(local.root.clone())));
    }
    if let Some(repo) = &config.repository {
        debug!(repository = %repo.full_name(), api = %config.github.api_url, "Reading documents from GitHub");
        return Ok(Arc::new(GitHubFetcher::from_config(config)?));
    }
    debug!(dir = %project_dir.display(), "No document source configured");
    Ok(Arc::new(LocalFetcher::new(project_dir)))
}
