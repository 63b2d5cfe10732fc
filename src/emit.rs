use crate::config::IO_BUFFER_SIZE;
use crate::models::{Publication, VenueFilter};
use crate::registry::AuthorRegistry;
use crate::stats::ExtractionStats;
use anyhow::{anyhow, Context, Result};
use csv::{QuoteStyle, Terminator, Writer, WriterBuilder};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Destinations of the three output tables.
#[derive(Debug, Clone)]
pub struct OutputPaths {
    pub graph: PathBuf,
    pub authors: PathBuf,
    pub author_venues: PathBuf,
}

/// Sinks and statistics handed back once the author table is written.
pub struct GraphOutput<W> {
    pub graph: W,
    pub authors: W,
    pub author_venues: W,
    pub stats: ExtractionStats,
}

/// Raw tab-separated rows: no header, no quoting, `\n` terminated.
fn tsv_writer<W: Write>(inner: W) -> Writer<W> {
    WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(QuoteStyle::Never)
        .terminator(Terminator::Any(b'\n'))
        .from_writer(inner)
}

fn create_output(path: &Path) -> Result<BufWriter<File>> {
    let file = File::create(path)
        .with_context(|| format!("Failed to create output file: {}", path.display()))?;
    Ok(BufWriter::with_capacity(IO_BUFFER_SIZE, file))
}

/// Per-run context: owns the author registry, the venue filter and the
/// three output sinks.
pub struct GraphBuilder<W: Write> {
    registry: AuthorRegistry,
    filter: VenueFilter,
    graph: Writer<W>,
    authors: Writer<W>,
    author_venues: Writer<W>,
    stats: ExtractionStats,
    ids: Vec<u32>, // scratch for the current record
}

impl GraphBuilder<BufWriter<File>> {
    /// Opens all three output files before any input is processed.
    pub fn create(paths: &OutputPaths, filter: VenueFilter) -> Result<Self> {
        let graph = create_output(&paths.graph)?;
        let authors = create_output(&paths.authors)?;
        let author_venues = create_output(&paths.author_venues)?;
        debug!(
            graph = %paths.graph.display(),
            authors = %paths.authors.display(),
            author_venues = %paths.author_venues.display(),
            "Opened output files"
        );
        Ok(Self::new(graph, authors, author_venues, filter))
    }
}

impl<W: Write> GraphBuilder<W> {
    pub fn new(graph: W, authors: W, author_venues: W, filter: VenueFilter) -> Self {
        Self {
            registry: AuthorRegistry::new(),
            filter,
            graph: tsv_writer(graph),
            authors: tsv_writer(authors),
            author_venues: tsv_writer(author_venues),
            stats: ExtractionStats::new(),
            ids: Vec::new(),
        }
    }

    pub fn registry(&self) -> &AuthorRegistry {
        &self.registry
    }

    pub fn stats(&self) -> &ExtractionStats {
        &self.stats
    }

    /// Registers the record's authors and, if the record is accepted, writes
    /// its venue memberships and co-author edges. Returns whether it was
    /// accepted.
    ///
    /// Author ids are assigned even for rejected records. Edges follow
    /// author-list order, so a name listed twice yields an edge from an id to
    /// itself.
    pub fn emit(&mut self, record: &Publication) -> Result<bool> {
        self.stats.inc_records();

        self.ids.clear();
        for name in &record.authors {
            self.ids.push(self.registry.resolve(name)?);
        }

        if !record.has_title() {
            self.stats.inc_untitled();
            return Ok(false);
        }
        if !self.filter.accepts(record.venue.as_deref()) {
            self.stats.inc_filtered();
            return Ok(false);
        }

        let venue = record.venue.as_deref().unwrap_or("");
        let mut year_buf = itoa::Buffer::new();
        let year = year_buf.format(record.year);
        let mut a_buf = itoa::Buffer::new();
        let mut b_buf = itoa::Buffer::new();

        for (i, &a) in self.ids.iter().enumerate() {
            self.registry.mark_qualified(a);
            let a = a_buf.format(a);
            self.author_venues
                .write_record([a, venue])
                .context("Failed to write author-venue row")?;

            for &b in &self.ids[i + 1..] {
                self.graph
                    .write_record([a, b_buf.format(b), year])
                    .context("Failed to write graph edge")?;
            }
        }

        let n = self.ids.len() as u64;
        self.stats.add_memberships(n);
        self.stats.add_edges(n * n.saturating_sub(1) / 2);
        self.stats.inc_accepted();
        Ok(true)
    }

    /// Writes qualified authors in first-seen order and flushes every sink.
    pub fn finish(mut self) -> Result<GraphOutput<W>> {
        let mut id_buf = itoa::Buffer::new();
        for (id, name) in self.registry.entries() {
            if self.registry.is_qualified(id) {
                self.authors
                    .write_record([id_buf.format(id), name])
                    .context("Failed to write author row")?;
                self.stats.inc_authors_written();
            }
        }
        self.stats.set_authors_registered(self.registry.len() as u64);

        let graph = into_flushed(self.graph, "graph")?;
        let authors = into_flushed(self.authors, "authors")?;
        let author_venues = into_flushed(self.author_venues, "author-venue")?;

        info!(
            authors = self.stats.authors(),
            qualified = self.stats.authors_written(),
            "Author table written"
        );

        Ok(GraphOutput {
            graph,
            authors,
            author_venues,
            stats: self.stats,
        })
    }
}

fn into_flushed<W: Write>(mut writer: Writer<W>, label: &str) -> Result<W> {
    writer
        .flush()
        .with_context(|| format!("Failed to flush {} output", label))?;
    writer
        .into_inner()
        .map_err(|e| anyhow!("Failed to flush {} output: {}", label, e.error()))
}
