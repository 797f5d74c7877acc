use std::io::Read;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use tracing::info;

use cornerstone::comments::parse_comments;
use cornerstone::config::Config;
use cornerstone::discovery::cluster::KMeansClusterer;
use cornerstone::discovery::LabelPolicy;
use cornerstone::embedding::onnx::OnnxEmbedder;
use cornerstone::matching::{DEFAULT_MULTI_THRESHOLD, DEFAULT_SINGLE_THRESHOLD, MatchMode};
use cornerstone::pillars::EmbeddedPillars;
use cornerstone::pipeline::{self, BucketOptions};
use cornerstone::report;

/// Cornerstone: EVP theme bucketing for employee feedback.
///
/// Matches free-text comments against the EVP pillar taxonomy by semantic
/// similarity and surfaces emerging themes in whatever doesn't match.
#[derive(Parser)]
#[command(name = "cornerstone", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Bucket comments into EVP themes (one comment per line)
    Bucket {
        /// File to read comments from (defaults to stdin)
        #[arg(long)]
        input: Option<PathBuf>,

        /// Assign every pillar above the threshold instead of only the best
        #[arg(long)]
        multi: bool,

        /// Similarity threshold (default: 0.3 single-match, 0.45 multi-match)
        #[arg(long)]
        threshold: Option<f64>,

        /// Smallest unmatched subset worth clustering
        #[arg(long, default_value = "3")]
        min_cluster_size: usize,

        /// Upper bound on discovered topics
        #[arg(long, default_value = "10")]
        max_topics: usize,

        /// File with pre-authored candidate theme names, one per line.
        /// Switches emerging-theme labeling from keyword extraction to the
        /// curated list.
        #[arg(long)]
        candidate_themes: Option<PathBuf>,

        /// Print results as JSON instead of the formatted listing
        #[arg(long)]
        json: bool,

        /// Directory for the report file
        #[arg(long, default_value = ".")]
        output_dir: PathBuf,

        /// Skip writing the report file
        #[arg(long)]
        no_report: bool,
    },

    /// Download the sentence embedding model (~90 MB)
    DownloadModel,

    /// Print the EVP pillar taxonomy
    Pillars,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if missing)
    let _ = dotenvy::dotenv();

    // Set up structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("cornerstone=info")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Bucket {
            input,
            multi,
            threshold,
            min_cluster_size,
            max_topics,
            candidate_themes,
            json,
            output_dir,
            no_report,
        } => {
            let config = Config::load()?;
            config.require_model()?;

            let raw = read_input(input.as_deref())?;
            let comments = parse_comments(&raw);
            if comments.is_empty() {
                println!("{}", "Please enter at least one comment.".yellow());
                return Ok(());
            }

            let mode = if multi {
                MatchMode::Multi
            } else {
                MatchMode::Single
            };
            let threshold = threshold.unwrap_or(match mode {
                MatchMode::Single => DEFAULT_SINGLE_THRESHOLD,
                MatchMode::Multi => DEFAULT_MULTI_THRESHOLD,
            });
            let label_policy = match candidate_themes.as_deref() {
                Some(path) => LabelPolicy::Curated(read_candidate_themes(path)?),
                None => LabelPolicy::Keyword,
            };

            // One-time model initialization — everything downstream depends
            // on this completing
            let embedder = OnnxEmbedder::load(&config.model_dir)?;
            let pillars = EmbeddedPillars::embed(&embedder).await?;

            let clusterer = KMeansClusterer {
                max_topics,
                ..Default::default()
            };
            let options = BucketOptions {
                mode,
                threshold,
                min_cluster_size,
                label_policy,
            };

            println!("Bucketing {} comments...", comments.len());
            info!(
                comments = comments.len(),
                threshold,
                multi,
                "Starting bucketing run"
            );

            let assignments =
                pipeline::run(&embedder, &pillars, &comments, &clusterer, &options).await?;

            if json {
                println!("{}", serde_json::to_string_pretty(&assignments)?);
            } else {
                report::terminal::display_results(&assignments, &pillars.names);
            }

            if !no_report {
                let path = report::save_report(&assignments, &output_dir)?;
                println!("Report written to {}", path.display().to_string().bold());
            }
        }

        Commands::DownloadModel => {
            let config = Config::load()?;

            println!("Downloading the sentence embedding model...");
            println!("  Destination: {}", config.model_dir.display());

            cornerstone::embedding::download::download_model(&config.model_dir).await?;

            println!("\n{}", "Model downloaded successfully.".bold());
            println!("You can now run `cornerstone bucket`.");
        }

        Commands::Pillars => {
            report::terminal::display_pillars();
        }
    }

    Ok(())
}

/// Read the raw submission from a file, or from stdin when no file is given.
fn read_input(path: Option<&std::path::Path>) -> Result<String> {
    match path {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read comments from {}", path.display())),
        None => {
            let mut raw = String::new();
            std::io::stdin()
                .read_to_string(&mut raw)
                .context("Failed to read comments from stdin")?;
            Ok(raw)
        }
    }
}

/// Read the curated candidate theme list: one name per line, blanks dropped.
fn read_candidate_themes(path: &std::path::Path) -> Result<Vec<String>> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read candidate themes from {}", path.display()))?;

    let themes: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect();

    if themes.is_empty() {
        anyhow::bail!(
            "Candidate theme file {} contains no theme names",
            path.display()
        );
    }

    Ok(themes)
}
