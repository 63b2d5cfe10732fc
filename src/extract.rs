use crate::config::PROGRESS_INTERVAL;
use crate::emit::{GraphBuilder, OutputPaths};
use crate::models::VenueFilter;
use crate::parser::RecordReader;
use crate::stats::ExtractionStats;
use anyhow::Result;
use indicatif::ProgressBar;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use tracing::{debug, info};

pub struct ExtractConfig {
    pub input: PathBuf,
    pub outputs: OutputPaths,
    pub venues: VenueFilter,
    pub limit: Option<u64>,
    pub dry_run: bool,
}

/// Runs the single extraction pass: input and outputs are opened up front,
/// every record is fed to the graph builder, and the author table is written
/// once the input is exhausted.
pub fn run_extraction(config: ExtractConfig) -> Result<ExtractionStats> {
    let reader = RecordReader::open(&config.input)?;

    if config.venues.is_accept_all() {
        info!("No venue filter, accepting every record");
    } else {
        info!(venues = ?config.venues.sorted_names(), "Filtering by venue");
    }

    if config.dry_run {
        info!("Dry run, no output files will be written");
        let builder = GraphBuilder::new(io::sink(), io::sink(), io::sink(), config.venues);
        drive(reader, builder, config.limit)
    } else {
        let builder = GraphBuilder::create(&config.outputs, config.venues)?;
        drive(reader, builder, config.limit)
    }
}

fn drive<R: BufRead, W: Write>(
    mut reader: RecordReader<R>,
    mut builder: GraphBuilder<W>,
    limit: Option<u64>,
) -> Result<ExtractionStats> {
    let pb = ProgressBar::new_spinner();
    let mut processed = 0u64;

    for record in reader.by_ref() {
        if limit.is_some_and(|max| processed >= max) {
            info!(limit = processed, "Record limit reached");
            break;
        }
        builder.emit(&record?)?;
        processed += 1;

        if processed % PROGRESS_INTERVAL == 0 {
            pb.set_message(format!(
                "{} records, {} edges",
                processed,
                builder.stats().edges()
            ));
            pb.tick();
        }
    }

    pb.finish_and_clear();
    debug!(lines = reader.lines_read(), records = processed, "Input consumed");

    let output = builder.finish()?;
    info!(
        records = output.stats.records(),
        accepted = output.stats.accepted(),
        edges = output.stats.edges(),
        "Graph written"
    );
    Ok(output.stats)
}
