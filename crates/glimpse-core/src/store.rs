//! Result storage and substring filtering.

use std::collections::BTreeMap;

use crate::types::ImageMetadata;

/// Holds the results of the current scan plus a filtered view of them.
///
/// Results are keyed by filename; the `BTreeMap` gives the display layer a
/// stable, lexicographic ordering. The filtered view is re-derived on every
/// mutation and never feeds back into the full set.
#[derive(Debug, Default)]
pub struct ResultStore {
    results: BTreeMap<String, ImageMetadata>,
    filtered: BTreeMap<String, ImageMetadata>,
    filter: String,
}

impl ResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop all results; called when a new scan starts.
    pub fn clear(&mut self) {
        self.results.clear();
        self.filtered.clear();
    }

    /// Store one result. Latest write wins for a given filename; the
    /// filtered view picks up the entry if it matches the current filter.
    pub fn insert(&mut self, file_name: String, metadata: ImageMetadata) {
        if self.matches(&file_name, &metadata) {
            self.filtered.insert(file_name.clone(), metadata.clone());
        } else {
            self.filtered.remove(&file_name);
        }
        self.results.insert(file_name, metadata);
    }

    /// Set the filter query and rebuild the filtered view.
    ///
    /// An empty query mirrors the full set. Otherwise an entry is kept when
    /// its filename or format label contains the query, case-insensitively.
    pub fn apply_filter(&mut self, query: &str) {
        self.filter = query.to_string();
        self.filtered = self
            .results
            .iter()
            .filter(|(name, meta)| self.matches(name.as_str(), meta))
            .map(|(name, meta)| (name.clone(), meta.clone()))
            .collect();
    }

    fn matches(&self, file_name: &str, metadata: &ImageMetadata) -> bool {
        if self.filter.is_empty() {
            return true;
        }
        let query = self.filter.to_lowercase();
        file_name.to_lowercase().contains(&query)
            || metadata.format.to_lowercase().contains(&query)
    }

    /// The full result set.
    pub fn results(&self) -> &BTreeMap<String, ImageMetadata> {
        &self.results
    }

    /// The filtered view consumed by the display layer.
    pub fn filtered(&self) -> &BTreeMap<String, ImageMetadata> {
        &self.filtered
    }

    /// Current filter query.
    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn len(&self) -> usize {
        self.results.len()
    }

    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }
}
