//! CLI binary for dossier.

use clap::{Parser, Subcommand};
use dossier::{
    ContentExtractor, DossierConfig, DossierError, GenerationRouter, ResearchOrchestrator,
    SearchAggregator,
};
use serde_json::Map;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Dossier: multi-provider web research and text generation.
#[derive(Parser)]
#[command(name = "dossier", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Search the web through the provider chain.
    Search {
        query: String,
        /// Maximum number of results.
        #[arg(short = 'n', long)]
        max_results: Option<usize>,
        /// Print results as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Fetch one page and print its cleaned text.
    Extract { url: String },

    /// Build a research corpus for a query, optionally answering a prompt with it.
    Research {
        query: String,
        /// Maximum number of search results to extract.
        #[arg(short = 'n', long)]
        max_results: Option<usize>,
        /// Prompt to answer using the corpus as context.
        #[arg(short, long)]
        prompt: Option<String>,
        /// Token budget for the generated answer.
        #[arg(long)]
        max_tokens: Option<u32>,
        /// Print the corpus as JSON.
        #[arg(long)]
        json: bool,
    },

    /// Show provider chains and which providers have credentials.
    Providers,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("dossier=info,dossier_search=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = DossierConfig::load(cli.config.as_deref())?;

    match cli.command {
        Command::Search {
            query,
            max_results,
            json,
        } => run_search(&config, &query, max_results, json).await,
        Command::Extract { url } => run_extract(&config, &url).await,
        Command::Research {
            query,
            max_results,
            prompt,
            max_tokens,
            json,
        } => run_research(&config, &query, max_results, prompt, max_tokens, json).await,
        Command::Providers => {
            show_providers(&config);
            Ok(())
        }
    }
}

async fn run_search(
    config: &DossierConfig,
    query: &str,
    max_results: Option<usize>,
    json: bool,
) -> anyhow::Result<()> {
    let aggregator = SearchAggregator::from_config(&config.search)?;
    let results = aggregator
        .multi_search(query, max_results.unwrap_or(config.search.max_results))
        .await;

    if json {
        println!("{}", serde_json::to_string_pretty(&results)?);
        return Ok(());
    }
    if results.is_empty() {
        println!("No results.");
    }
    for (i, result) in results.iter().enumerate() {
        println!("{}. {} [{}]", i + 1, result.title, result.provider);
        println!("   {}", result.url);
        if !result.snippet.is_empty() {
            println!("   {}", result.snippet);
        }
    }
    Ok(())
}

async fn run_extract(config: &DossierConfig, url: &str) -> anyhow::Result<()> {
    let extractor = ContentExtractor::from_config(config.extraction.clone())?;
    match extractor.extract_page(url).await {
        Some(page) => {
            if !page.title.is_empty() {
                println!("# {}\n", page.title);
            }
            println!("{}", page.text);
            Ok(())
        }
        None => anyhow::bail!("no usable content extracted from {url}"),
    }
}

async fn run_research(
    config: &DossierConfig,
    query: &str,
    max_results: Option<usize>,
    prompt: Option<String>,
    max_tokens: Option<u32>,
    json: bool,
) -> anyhow::Result<()> {
    let orchestrator = ResearchOrchestrator::from_config(config)?;

    // Ctrl+C stops extraction and keeps what was collected.
    let cancel = CancellationToken::new();
    let cancel_clone = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            info!("received Ctrl+C, finishing with pages collected so far");
            cancel_clone.cancel();
        }
    });

    let corpus = orchestrator
        .research(
            query,
            &Map::new(),
            max_results.unwrap_or(config.research.max_results),
            &cancel,
        )
        .await;

    let Some(prompt) = prompt else {
        if json {
            println!("{}", serde_json::to_string_pretty(&corpus)?);
        } else {
            println!("{}", corpus.combined_text);
        }
        return Ok(());
    };

    let router = GenerationRouter::from_config(&config.generation)?;
    let full_prompt = format!("{prompt}\n\n{}", corpus.combined_text);
    let outcome = router.generate_outcome(&full_prompt, max_tokens).await;
    match (outcome.text, outcome.provider_used) {
        (Some(text), Some(provider)) => {
            info!(%provider, "answer generated");
            println!("{text}");
            Ok(())
        }
        _ => Err(DossierError::ExhaustedFallback {
            chain: "generation",
        }
        .into()),
    }
}

fn show_providers(config: &DossierConfig) {
    println!("Search (in order):");
    match SearchAggregator::from_config(&config.search) {
        Ok(aggregator) => {
            for (provider, configured) in aggregator.availability() {
                println!("  {:<14} {}", provider.name(), status(configured));
            }
        }
        Err(e) => println!("  unavailable: {e}"),
    }

    println!("\nExtraction (in order):");
    println!(
        "  {:<14} {}",
        "rendered",
        status(config.extraction.has_render_credentials())
    );
    println!("  {:<14} {}", "direct", status(true));

    println!("\nGeneration (in order):");
    match GenerationRouter::from_config(&config.generation) {
        Ok(router) => {
            for (kind, configured) in router.availability() {
                println!("  {:<14} {}", kind.name(), status(configured));
            }
        }
        Err(e) => println!("  unavailable: {e}"),
    }
}

fn status(configured: bool) -> &'static str {
    if configured {
        "ready"
    } else {
        "no credentials"
    }
}
