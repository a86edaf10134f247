//! Single-file inspection commands.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};

use texcite_core::report::unresolved_keys;
use texcite_core::{analyze_document, Catalog, DocumentAnalysis};

use crate::output;

#[derive(Args)]
pub struct InspectArgs {
    /// LaTeX file to inspect
    pub file: PathBuf,

    /// Print the analysis as JSON
    #[arg(long)]
    pub json: bool,

    /// Catalog JSON used to flag keys that match no source
    #[arg(long, value_name = "PATH")]
    pub catalog: Option<PathBuf>,
}

#[derive(Args)]
pub struct OutlineArgs {
    /// LaTeX file to outline
    pub file: PathBuf,

    /// Deepest heading level to show (0 = part, 6 = subparagraph)
    #[arg(long, default_value = "6")]
    pub depth: u8,
}

async fn analyze_file(path: &Path) -> Result<DocumentAnalysis> {
    let text = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(analyze_document(&text))
}

pub async fn execute_inspect(args: InspectArgs) -> Result<()> {
    let analysis = analyze_file(&args.file).await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&analysis)?);
        return Ok(());
    }

    let keys = &analysis.citations.citations;

    println!("{}", args.file.display().to_string().cyan().bold());
    println!("{}", "─".repeat(40));
    println!("  Citations:  {}", keys.len().to_string().cyan());
    println!("  Commands:   {}", analysis.citations.unique_citation_commands);
    println!("  Sentences:  {}", analysis.sentence_count().to_string().cyan());
    println!(
        "              {} prose, {} list items, {} table cells",
        analysis.sentences.prose, analysis.sentences.list_items, analysis.sentences.table_cells
    );
    println!("  Headings:   {}", analysis.structure.len());
    println!("{}", "─".repeat(40));

    if !keys.is_empty() {
        println!();
        println!("{}", "Keys".bold());
        output::print_keys(keys);
    }

    if let Some(path) = &args.catalog {
        let catalog = Catalog::load(path)?;
        let unresolved = unresolved_keys(keys, &catalog.sources);
        println!();
        if unresolved.is_empty() {
            println!("{}", "All keys resolve to a catalog source.".green());
        } else {
            println!("{}", "Unresolved keys".yellow().bold());
            output::print_keys(&unresolved);
        }
    }

    println!();
    println!("{}", "Outline".bold());
    output::print_outline(&analysis.structure, u8::MAX);

    Ok(())
}

pub async fn execute_outline(args: OutlineArgs) -> Result<()> {
    let analysis = analyze_file(&args.file).await?;
    output::print_outline(&analysis.structure, args.depth);
    Ok(())
}
