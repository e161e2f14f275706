//! The in-memory image store.
//!
//! Records are kept in insertion order. That order decides which record a
//! name refers to when several share a key (first match wins) and the order
//! whole-batch operations visit records in.

use crate::error::{PipelineError, PipelineResult};
use crate::record::ImageRecord;

/// Ordered, owning collection of resident images.
#[derive(Debug, Default)]
pub struct ImageStore {
    records: Vec<ImageRecord>,
}

impl ImageStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Move a record into the store, returning its position.
    pub fn insert(&mut self, record: ImageRecord) -> usize {
        tracing::debug!(key = record.key(), bytes = record.byte_size(), "Insert");
        self.records.push(record);
        self.records.len() - 1
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&ImageRecord> {
        self.records.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut ImageRecord> {
        self.records.get_mut(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ImageRecord> {
        self.records.iter()
    }

    /// Position of the first record whose key equals `target`, ignoring case.
    pub fn find(&self, target: &str) -> Option<usize> {
        self.find_nth(target, 1)
    }

    /// Position of the `occurrence`-th (1-based) record with key `target`.
    pub fn find_nth(&self, target: &str, occurrence: usize) -> Option<usize> {
        if occurrence == 0 {
            return None;
        }
        let target = target.to_lowercase();
        self.records
            .iter()
            .enumerate()
            .filter(|(_, r)| r.key() == target)
            .nth(occurrence - 1)
            .map(|(i, _)| i)
    }

    /// Resolve an optional target into the positions an operation applies to.
    ///
    /// - empty store: `EmptyStore`, checked before anything else
    /// - no target (or a blank one): every position, in store order
    /// - `name`: the first record with that key
    /// - `name#N`: the N-th record with that key, for addressing duplicates
    ///
    /// An unmatched target yields `TargetNotFound`.
    pub fn select(&self, target: Option<&str>) -> PipelineResult<Vec<usize>> {
        if self.is_empty() {
            return Err(PipelineError::EmptyStore);
        }

        let target = match target.map(str::trim) {
            None | Some("") => return Ok((0..self.records.len()).collect()),
            Some(t) => t,
        };

        if let Some(index) = self.find(target) {
            return Ok(vec![index]);
        }

        if let Some((name, n)) = target.rsplit_once('#') {
            if let Ok(occurrence) = n.parse::<usize>() {
                if let Some(index) = self.find_nth(name, occurrence) {
                    return Ok(vec![index]);
                }
            }
        }

        Err(PipelineError::TargetNotFound(target.to_string()))
    }

    /// Remove the records at `indices`, returning them by value.
    ///
    /// Positions refer to the store before any removal; they are processed
    /// from highest to lowest so the remaining ones stay valid. Out-of-range
    /// and repeated positions are ignored. The returned records are in
    /// ascending position order.
    pub fn remove_many(&mut self, indices: &[usize]) -> Vec<ImageRecord> {
        let mut sorted: Vec<usize> = indices
            .iter()
            .copied()
            .filter(|&i| i < self.records.len())
            .collect();
        sorted.sort_unstable_by(|a, b| b.cmp(a));
        sorted.dedup();

        let mut removed: Vec<ImageRecord> =
            sorted.into_iter().map(|i| self.records.remove(i)).collect();
        removed.reverse();
        removed
    }

    /// Total bytes held by resident pixel buffers.
    pub fn ram_usage(&self) -> u64 {
        self.records.iter().map(ImageRecord::byte_size).sum()
    }
}
