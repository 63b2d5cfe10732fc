use anyhow::{bail, Result};
use rustc_hash::{FxHashMap, FxHashSet};

/// Maps author names to dense ids handed out in first-seen order.
///
/// Ids are never reclaimed: a name that only ever appears in rejected records
/// still consumes its slot. The qualified set records which ids belong to at
/// least one accepted record; only those reach the author table.
#[derive(Debug)]
pub struct AuthorRegistry {
    ids: FxHashMap<String, u32>,
    names: Vec<String>, // indexed by id
    qualified: FxHashSet<u32>,
    max_id: u32,
}

impl Default for AuthorRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl AuthorRegistry {
    pub fn new() -> Self {
        Self::with_max_id(u32::MAX)
    }

    /// Registry that refuses to hand out ids above `max_id`.
    pub fn with_max_id(max_id: u32) -> Self {
        Self {
            ids: FxHashMap::default(),
            names: Vec::new(),
            qualified: FxHashSet::default(),
            max_id,
        }
    }

    /// Returns the id for `name`, assigning the next one on first sight.
    /// Fails once the id space is exhausted.
    pub fn resolve(&mut self, name: &str) -> Result<u32> {
        if let Some(&id) = self.ids.get(name) {
            return Ok(id);
        }
        let id = match u32::try_from(self.names.len()) {
            Ok(id) if id <= self.max_id => id,
            _ => bail!(
                "Author id space exhausted after {} names (at {:?})",
                self.names.len(),
                name
            ),
        };
        self.ids.insert(name.to_string(), id);
        self.names.push(name.to_string());
        Ok(id)
    }

    pub fn get(&self, name: &str) -> Option<u32> {
        self.ids.get(name).copied()
    }

    pub fn mark_qualified(&mut self, id: u32) {
        self.qualified.insert(id);
    }

    pub fn is_qualified(&self, id: u32) -> bool {
        self.qualified.contains(&id)
    }

    /// Every registered `(id, name)` in first-seen order, qualified or not.
    pub fn entries(&self) -> impl Iterator<Item = (u32, &str)> + '_ {
        (0u32..)
            .zip(self.names.iter())
            .map(|(id, name)| (id, name.as_str()))
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn qualified_count(&self) -> usize {
        self.qualified.len()
    }
}
