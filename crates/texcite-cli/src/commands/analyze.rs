//! Project citation report command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::Path;

use super::ProjectContext;
use crate::output;

#[derive(Args)]
pub struct AnalyzeArgs {
    /// Print the report as JSON
    #[arg(long)]
    pub json: bool,

    /// Analyze these files instead of the configured selection
    #[arg(long = "file", value_name = "PATH")]
    pub files: Vec<String>,

    /// Override the configured git ref
    #[arg(long = "ref", value_name = "REF")]
    pub git_ref: Option<String>,
}

pub async fn execute(args: AnalyzeArgs, project_dir: &Path, config_path: Option<&Path>) -> Result<()> {
    let ProjectContext {
        mut project,
        analyzer,
        ..
    } = ProjectContext::load(project_dir, config_path)?;

    if !args.files.is_empty() {
        project.repo_files_selected = args.files;
    }
    if let (Some(git_ref), Some(repo)) = (args.git_ref, project.repository.as_mut()) {
        repo.git_ref = git_ref;
    }

    let report = analyzer.analyze_project(&project).await;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    if project.repository.is_none() {
        println!(
            "{}",
            "No repository configured; add [repository] or [local] to the configuration.".yellow()
        );
        println!();
    }

    println!("{}", project.name.cyan().bold());
    println!();
    print!("{}", report.to_display_string());

    println!();
    output::print_file_table(&report.files);
    output::print_failed_files(&report.failed_files);

    if !report.unresolved_citations.is_empty() {
        println!();
        println!("{}", "Unresolved keys".bold());
        output::print_keys(&report.unresolved_citations);
    }

    Ok(())
}
