use crate::config::DEFAULT_VENUES;
use anyhow::{bail, Context, Result};
use rustc_hash::FxHashSet;
use std::fs;
use std::path::Path;

/// One classified input line. Payloads borrow the text after the tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineEvent<'a> {
    Author(&'a str),
    Title(&'a str),
    Year(&'a str),
    Venue(&'a str),
    Unrecognized,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Publication {
    pub venue: Option<String>,
    pub title: Option<String>,
    pub year: i32,
    pub authors: Vec<String>, // appearance order, duplicates kept
}

impl Publication {
    /// An empty title counts as missing.
    pub fn has_title(&self) -> bool {
        self.title.as_deref().is_some_and(|t| !t.is_empty())
    }
}

/// Set of accepted venue names. An empty filter accepts every record.
#[derive(Debug, Clone, Default)]
pub struct VenueFilter {
    venues: FxHashSet<String>,
}

impl VenueFilter {
    pub fn accept_all() -> Self {
        Self::default()
    }

    pub fn from_names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            venues: names.into_iter().map(Into::into).collect(),
        }
    }

    /// Reads one venue per line; blank lines and `#` comments are skipped.
    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read venues file: {}", path.display()))?;
        Ok(Self::from_names(
            text.lines()
                .map(str::trim)
                .filter(|l| !l.is_empty() && !l.starts_with('#')),
        ))
    }

    /// Builds the run's filter from command-line sources.
    ///
    /// `all_venues` wins and accepts everything. Otherwise `names` and the
    /// venues file are combined; a venues file listing nothing is an error.
    /// With no source at all the built-in venue list applies.
    pub fn resolve(names: &[String], venues_file: Option<&Path>, all_venues: bool) -> Result<Self> {
        if all_venues {
            return Ok(Self::accept_all());
        }

        let mut filter = Self::from_names(names.iter().cloned());
        if let Some(path) = venues_file {
            let from_file = Self::from_file(path)?;
            if from_file.is_empty() {
                bail!("Venues file lists no venues: {}", path.display());
            }
            filter.venues.extend(from_file.venues);
        }

        if filter.is_empty() {
            Ok(Self::from_names(DEFAULT_VENUES.iter().copied()))
        } else {
            Ok(filter)
        }
    }

    pub fn accepts(&self, venue: Option<&str>) -> bool {
        if self.venues.is_empty() {
            return true;
        }
        venue.is_some_and(|v| self.venues.contains(v))
    }

    pub fn is_accept_all(&self) -> bool {
        self.venues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.venues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.venues.is_empty()
    }

    /// Venue names in sorted order, for logging and summaries.
    pub fn sorted_names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.venues.iter().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}
