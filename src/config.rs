/// Default path of the tagged DBLP text dump
pub const DEFAULT_INPUT: &str = "dblp.txt";

/// Default path of the co-author edge list (`a\tb\tyear`)
pub const DEFAULT_GRAPH_PATH: &str = "dblp_graph";

/// Default path of the author table (`id\tname`)
pub const DEFAULT_AUTHORS_PATH: &str = "dblp_authors_ids";

/// Default path of the author-venue table (`id\tvenue`)
pub const DEFAULT_AUTHOR_VENUES_PATH: &str = "dblp_authors_conf";

/// Venues used when no filter is given on the command line
pub const DEFAULT_VENUES: &[&str] = &[
    "ICDE",
    "VLDB",
    "EDBT",
    "SIGMOD Conference",
    "KDD",
    "KDD Cup",
    "WWW",
    "SIGIR",
    "CIKM",
    "SDM",
    "ICDM",
    "WWW (Companion Volume)",
];

/// Progress update interval (tick every N records)
pub const PROGRESS_INTERVAL: u64 = 10_000;

/// Buffer size for the input reader and each output writer
pub const IO_BUFFER_SIZE: usize = 128 * 1024;
