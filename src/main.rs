use anyhow::Result;
use clap::Parser;

use riksdag_corpus::config::Config;
use riksdag_corpus::pipeline::{self, RunOptions};

/// Download AI-related documents from Riksdagen
#[derive(Debug, Parser)]
#[command(name = "riksdag-corpus", version, about)]
struct Cli {
    /// Count documents without downloading
    #[arg(long)]
    dry_run: bool,

    /// Limit documents per type/term (for testing)
    #[arg(long, value_name = "N")]
    limit: Option<usize>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::default();

    println!("Riksdagen AI Discourse Corpus Downloader");
    println!("Search terms: {:?}", config.search_terms);
    println!(
        "Document types: {:?}",
        config
            .document_types
            .iter()
            .map(|t| t.code.as_str())
            .collect::<Vec<_>>()
    );
    println!("Date range: {} onwards", config.date_from);
    println!("Output directory: {}", config.data_dir.display());

    if cli.dry_run {
        println!("\n[DRY RUN MODE - no files will be downloaded]");
    }

    let options = RunOptions {
        dry_run: cli.dry_run,
        limit: cli.limit,
    };

    let summaries = pipeline::download_corpus(&config, options).await?;
    pipeline::print_summary(&config, &summaries);

    Ok(())
}
