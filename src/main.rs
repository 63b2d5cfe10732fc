use anyhow::{Context, Result};
use clap::Parser;
use dblpgraph::config;
use dblpgraph::emit::OutputPaths;
use dblpgraph::extract::{run_extraction, ExtractConfig};
use dblpgraph::models::VenueFilter;
use dblpgraph::stats::ExtractionStats;
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Instant;
use tracing::{error, info, Level};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

#[derive(Parser)]
#[command(name = "dblpgraph")]
#[command(about = "Build a venue-filtered co-authorship graph from a DBLP text dump")]
struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to the tagged DBLP text dump (.txt or .txt.bz2)
    #[arg(short, long, default_value = config::DEFAULT_INPUT)]
    input: PathBuf,

    /// Output path for the co-author edge list
    #[arg(long, default_value = config::DEFAULT_GRAPH_PATH)]
    graph_out: PathBuf,

    /// Output path for the author id table
    #[arg(long, default_value = config::DEFAULT_AUTHORS_PATH)]
    authors_out: PathBuf,

    /// Output path for the author-venue table
    #[arg(long, default_value = config::DEFAULT_AUTHOR_VENUES_PATH)]
    venues_out: PathBuf,

    /// Accepted venue (repeatable); replaces the built-in venue list
    #[arg(long = "venue", value_name = "NAME")]
    venues: Vec<String>,

    /// File with one accepted venue per line
    #[arg(long, value_name = "PATH")]
    venues_file: Option<PathBuf>,

    /// Accept records from every venue
    #[arg(long, conflicts_with_all = ["venues", "venues_file"])]
    all_venues: bool,

    /// Stop after this many records (for testing)
    #[arg(long)]
    limit: Option<u64>,

    /// Dry run - parse and count, don't write output files
    #[arg(long)]
    dry_run: bool,

    /// Write run statistics as JSON to this path
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,
}

#[derive(Serialize)]
struct RunSummary<'a> {
    input: &'a str,
    venues: Vec<&'a str>,
    duration_secs: f64,
    stats: &'a ExtractionStats,
}

fn run(cli: Cli) -> Result<()> {
    let venues =
        VenueFilter::resolve(&cli.venues, cli.venues_file.as_deref(), cli.all_venues)?;
    let venue_names: Vec<String> = venues
        .sorted_names()
        .into_iter()
        .map(str::to_string)
        .collect();

    let extract_config = ExtractConfig {
        input: cli.input.clone(),
        outputs: OutputPaths {
            graph: cli.graph_out.clone(),
            authors: cli.authors_out.clone(),
            author_venues: cli.venues_out.clone(),
        },
        venues,
        limit: cli.limit,
        dry_run: cli.dry_run,
    };

    info!(input = %cli.input.display(), "Starting extraction pass");
    let start = Instant::now();
    let stats = run_extraction(extract_config)?;
    let duration = start.elapsed();
    info!(duration_secs = duration.as_secs_f64(), "Extraction complete");

    if let Some(path) = &cli.summary {
        let input = cli.input.to_string_lossy();
        let summary = RunSummary {
            input: &input,
            venues: venue_names.iter().map(String::as_str).collect(),
            duration_secs: duration.as_secs_f64(),
            stats: &stats,
        };
        let file = File::create(path)
            .with_context(|| format!("Failed to create summary file: {}", path.display()))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, &summary)
            .context("Failed to write run summary")?;
        writer.flush().context("Failed to write run summary")?;
        info!(path = %path.display(), "Run summary written");
    }

    println!();
    println!("=== Summary ===");
    println!("Extraction time:    {:.2}s", duration.as_secs_f64());
    println!();
    println!("Records seen:       {}", stats.records());
    println!("Records accepted:   {}", stats.accepted());
    println!("Without title:      {}", stats.untitled());
    println!("Venue rejected:     {}", stats.filtered());
    println!("Edges written:      {}", stats.edges());
    println!("Memberships:        {}", stats.memberships());
    println!("Authors registered: {}", stats.authors());
    println!("Authors written:    {}", stats.authors_written());
    println!();
    if cli.dry_run {
        println!("Dry run complete, no files written.");
    } else {
        println!("DBLP graph is generated!");
    }

    Ok(())
}

/// `-v` count sets the default level; `RUST_LOG` directives take precedence.
fn log_filter(verbose: u8, directives: Option<&str>) -> EnvFilter {
    let level = match verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    EnvFilter::builder()
        .with_default_directive(LevelFilter::from_level(level).into())
        .parse_lossy(directives.unwrap_or_default())
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    let env_directives = std::env::var(EnvFilter::DEFAULT_ENV).ok();
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(log_filter(cli.verbose, env_directives.as_deref()))
        .with_target(false)
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");

    match run(cli) {
        Ok(()) => {
            info!("Completed successfully");
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("Error: {:#}", e);
            eprintln!("Error: {:#}", e);
            ExitCode::FAILURE
        }
    }
}
