//! Web server command.

use anyhow::Result;
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

use texcite_github::GitHubFetcher;
use texcite_web::AppState;
use tracing::warn;

use super::ProjectContext;

#[derive(Args)]
pub struct ServeArgs {
    /// Port to listen on
    #[arg(long, env = "TEXCITE_WEB_PORT", default_value = "3030")]
    pub port: u16,

    /// Host to bind to
    #[arg(long, default_value = "127.0.0.1")]
    pub host: String,

    /// Also write logs to a file
    #[arg(long)]
    pub log: bool,

    /// Log file path (defaults to <project>/.texcite/serve.log)
    #[arg(long, requires = "log")]
    pub log_file: Option<PathBuf>,
}

pub async fn execute(args: ServeArgs, project_dir: &Path, config_path: Option<&Path>) -> Result<()> {
    let ctx = ProjectContext::load(project_dir, config_path)?;
    let source = ctx
        .project
        .repository
        .as_ref()
        .map(|repo| format!("{}@{}", repo.full_name(), repo.git_ref))
        .unwrap_or_else(|| "none".to_string());

    let github_status = match &ctx.config.repository {
        Some(repo) => {
            let reachable = GitHubFetcher::from_config(&ctx.config)?.health_check().await;
            if !reachable {
                warn!(
                    repository = %repo.full_name(),
                    "Repository not reachable with the configured credentials"
                );
            }
            Some(reachable)
        }
        None => None,
    };

    println!();
    println!("  {} {}", "texcite".cyan().bold(), "API Server".bold());
    println!();
    println!("  {}  {}", "Project".green(), ctx.project.name);
    match github_status {
        Some(true) => println!("  {}   {} {}", "Source".green(), source, "(reachable)".green()),
        Some(false) => println!("  {}   {} {}", "Source".green(), source, "(unreachable)".red()),
        None => println!("  {}   {}", "Source".green(), source),
    }
    println!(
        "  {}  {} concurrent fetches",
        "Workers".green(),
        ctx.analyzer.settings().concurrency
    );
    println!(
        "  {}      http://{}:{}/api",
        "API".green(),
        args.host,
        args.port
    );
    println!();
    println!("  {}", "Ctrl+C to stop".dimmed());
    println!();

    let state = AppState::new(ctx.project, ctx.analyzer);
    texcite_web::run_server(state, &args.host, args.port).await
}
