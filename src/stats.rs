use serde::Serialize;

/// Statistics collected during a single extraction pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ExtractionStats {
    pub records_seen: u64,
    pub records_accepted: u64,
    pub records_untitled: u64,
    pub records_filtered: u64,
    pub edges_written: u64,
    pub memberships_written: u64,
    pub authors_registered: u64,
    pub authors_written: u64,
}

impl ExtractionStats {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn inc_records(&mut self) {
        self.records_seen += 1;
    }

    pub fn inc_accepted(&mut self) {
        self.records_accepted += 1;
    }

    pub fn inc_untitled(&mut self) {
        self.records_untitled += 1;
    }

    pub fn inc_filtered(&mut self) {
        self.records_filtered += 1;
    }

    pub fn add_edges(&mut self, count: u64) {
        self.edges_written += count;
    }

    pub fn add_memberships(&mut self, count: u64) {
        self.memberships_written += count;
    }

    pub fn set_authors_registered(&mut self, count: u64) {
        self.authors_registered = count;
    }

    pub fn inc_authors_written(&mut self) {
        self.authors_written += 1;
    }

    pub fn records(&self) -> u64 {
        self.records_seen
    }

    pub fn accepted(&self) -> u64 {
        self.records_accepted
    }

    pub fn untitled(&self) -> u64 {
        self.records_untitled
    }

    pub fn filtered(&self) -> u64 {
        self.records_filtered
    }

    pub fn edges(&self) -> u64 {
        self.edges_written
    }

    pub fn memberships(&self) -> u64 {
        self.memberships_written
    }

    pub fn authors(&self) -> u64 {
        self.authors_registered
    }

    pub fn authors_written(&self) -> u64 {
        self.authors_written
    }
}
