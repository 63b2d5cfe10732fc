use crate::config::IO_BUFFER_SIZE;
use crate::models::{LineEvent, Publication};
use anyhow::{Context, Result};
use bzip2::read::BzDecoder;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::mem;
use std::path::Path;
use tracing::debug;

const AUTHOR_TAG: &str = "Author: ";
const TITLE_TAG: &str = "Title: ";
const YEAR_TAG: &str = "Year: ";
const VENUE_TAG: &str = "Booktitle: ";

/// Classifies a line (without its terminator) by its tag prefix.
pub fn classify_line(line: &str) -> LineEvent<'_> {
    if let Some(name) = line.strip_prefix(AUTHOR_TAG) {
        LineEvent::Author(name)
    } else if let Some(title) = line.strip_prefix(TITLE_TAG) {
        LineEvent::Title(title)
    } else if let Some(year) = line
        .strip_prefix(YEAR_TAG)
        .filter(|rest| !rest.contains("Title:"))
    {
        LineEvent::Year(year)
    } else if let Some(venue) = line.strip_prefix(VENUE_TAG) {
        LineEvent::Venue(venue)
    } else {
        LineEvent::Unrecognized
    }
}

/// Opens the dump, decompressing on the fly when the path ends in `.bz2`.
pub fn open_input(path: &Path) -> Result<Box<dyn BufRead>> {
    let file = File::open(path)
        .with_context(|| format!("Failed to open DBLP dump at: {}", path.display()))?;

    if path.extension().is_some_and(|ext| ext == "bz2") {
        debug!(path = %path.display(), "Reading bzip2-compressed input");
        Ok(Box::new(BufReader::with_capacity(
            IO_BUFFER_SIZE,
            BzDecoder::new(file),
        )))
    } else {
        Ok(Box::new(BufReader::with_capacity(IO_BUFFER_SIZE, file)))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordState {
    Empty,
    Accumulating,
}

/// Finite-state accumulator turning line events into publication records.
///
/// A record closes only when an author line arrives after the pending record
/// has seen its `Booktitle:` line. An author line that shows up before the
/// venue is appended to the pending record, so two publications missing a
/// venue between them end up merged. The year is never reset at a boundary;
/// a record without its own `Year:` line keeps the previous one. Year values
/// must be bare integers; surrounding whitespace is a parse error.
#[derive(Debug)]
pub struct RecordAccumulator {
    state: RecordState,
    pending: Publication,
}

impl Default for RecordAccumulator {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordAccumulator {
    pub fn new() -> Self {
        Self {
            state: RecordState::Empty,
            pending: Publication::default(),
        }
    }

    /// Returns the completed record when `event` closes one.
    pub fn feed(&mut self, event: LineEvent<'_>, line_no: u64) -> Result<Option<Publication>> {
        let completed = match event {
            LineEvent::Unrecognized => return Ok(None),
            LineEvent::Author(name) => {
                let completed = if self.pending.venue.is_some() {
                    Some(self.take_pending())
                } else {
                    None
                };
                self.pending.authors.push(name.to_string());
                completed
            }
            LineEvent::Title(title) => {
                self.pending.title = Some(title.to_string());
                None
            }
            LineEvent::Year(year) => {
                self.pending.year = year
                    .parse()
                    .with_context(|| format!("Invalid year {:?} on line {}", year, line_no))?;
                None
            }
            LineEvent::Venue(venue) => {
                self.pending.venue = Some(venue.to_string());
                None
            }
        };

        self.state = RecordState::Accumulating;
        Ok(completed)
    }

    /// Flushes whatever is pending at end of input, complete or not.
    pub fn finish(&mut self) -> Option<Publication> {
        match self.state {
            RecordState::Empty => None,
            RecordState::Accumulating => {
                self.state = RecordState::Empty;
                Some(self.take_pending())
            }
        }
    }

    fn take_pending(&mut self) -> Publication {
        let year = self.pending.year;
        mem::replace(
            &mut self.pending,
            Publication {
                year,
                ..Publication::default()
            },
        )
    }
}

/// Streams publication records out of a tagged DBLP text dump.
///
/// Yields an error and then stops on the first I/O or year parse failure.
pub struct RecordReader<R> {
    input: R,
    buf: String,
    line_no: u64,
    acc: RecordAccumulator,
    done: bool,
}

impl RecordReader<Box<dyn BufRead>> {
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(open_input(path)?))
    }
}

impl<R: BufRead> RecordReader<R> {
    pub fn new(input: R) -> Self {
        Self {
            input,
            buf: String::with_capacity(256),
            line_no: 0,
            acc: RecordAccumulator::new(),
            done: false,
        }
    }

    /// Number of lines consumed so far.
    pub fn lines_read(&self) -> u64 {
        self.line_no
    }
}

impl<R: BufRead> Iterator for RecordReader<R> {
    type Item = Result<Publication>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        loop {
            self.buf.clear();
            match self.input.read_line(&mut self.buf) {
                Ok(0) => {
                    self.done = true;
                    debug!(lines = self.line_no, "Reached end of input");
                    return self.acc.finish().map(Ok);
                }
                Ok(_) => {
                    self.line_no += 1;
                    let line = self.buf.trim_end_matches(['\n', '\r']);
                    match self.acc.feed(classify_line(line), self.line_no) {
                        Ok(Some(record)) => return Some(Ok(record)),
                        Ok(None) => {}
                        Err(e) => {
                            self.done = true;
                            return Some(Err(e));
                        }
                    }
                }
                Err(e) => {
                    self.done = true;
                    let line = self.line_no + 1;
                    return Some(
                        Err(e).with_context(|| format!("Failed to read input line {}", line)),
                    );
                }
            }
        }
    }
}
