//! dblpgraph: DBLP text dump to co-authorship graph
//!
//! This crate turns the tagged, line-oriented DBLP text dump into a
//! co-authorship graph restricted to a set of venues, in one streaming pass:
//!
//! 1. **Line classification** -- Each line is tagged as an author, title, year
//!    or venue (`Booktitle:`) event; anything else is ignored
//! 2. **Record accumulation** -- A small state machine rebuilds publication
//!    records, closing one when a new author line follows a venue line
//! 3. **Emission** -- Author names get dense ids in first-seen order; records
//!    with a title and an accepted venue produce venue memberships and one edge
//!    per co-author pair
//! 4. **Author table** -- After the input is exhausted, every author that
//!    appeared in an accepted record is written with its id
//!
//! # Outputs
//!
//! All three files are tab-separated with no header:
//!
//! - `dblp_graph` -- `author_a \t author_b \t year`
//! - `dblp_authors_ids` -- `author_id \t name`
//! - `dblp_authors_conf` -- `author_id \t venue`
//!
//! # Key Modules
//!
//! - [`parser`] -- Line classification and the record state machine
//! - [`registry`] -- Author name to id mapping and the qualified-author set
//! - [`emit`] -- Venue filtering and TSV output
//! - [`extract`] -- The end-to-end extraction pass
//! - [`models`] -- Core data types (LineEvent, Publication, VenueFilter)
//! - [`stats`] -- Extraction counters
//! - [`config`] -- Defaults for paths, venues and buffer sizes
//!
//! # Example Usage
//!
//! ```bash
//! # Default venue list, default file names
//! dblpgraph -i dblp.txt
//!
//! # Two venues, compressed input, custom outputs
//! dblpgraph -i dblp.txt.bz2 --venue VLDB --venue ICDE \
//!     --graph-out out/graph.tsv --authors-out out/authors.tsv --venues-out out/venues.tsv
//!
//! # Every venue
//! dblpgraph -i dblp.txt --all-venues
//! ```

pub mod config;
pub mod emit;
pub mod extract;
pub mod models;
pub mod parser;
pub mod registry;
pub mod stats;
