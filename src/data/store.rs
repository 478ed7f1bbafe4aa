use thiserror::Error;

use super::model::{Interval, IntervalId, Origin};
use super::timecode::to_text;

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("no interval {0}")]
    UnknownInterval(IntervalId),

    #[error("interval position {position} out of range (1..={len})")]
    PositionOutOfRange { position: usize, len: usize },

    #[error("interval ends before it starts ({start}s > {end}s)")]
    Inverted { start: u64, end: u64 },

    #[error("label {0:?} must be non-empty and contain no whitespace")]
    InvalidLabel(String),
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

/// One interval held by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct Entry {
    pub id: IntervalId,
    pub origin: Origin,
    pub interval: Interval,
}

/// A line of the interval selector, derived from the store on demand.
#[derive(Debug, Clone, PartialEq)]
pub struct Choice {
    pub id: IntervalId,
    pub text: String,
}

/// Ordered intervals of the session, each keyed by a stable [`IntervalId`].
#[derive(Debug, Default)]
pub struct IntervalStore {
    entries: Vec<Entry>,
    next_id: u64,
}

impl IntervalStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop everything and take the freshly loaded intervals.
    pub fn replace_loaded(&mut self, intervals: Vec<Interval>) {
        self.entries.clear();
        for interval in intervals {
            let id = self.allocate_id();
            self.entries.push(Entry {
                id,
                origin: Origin::Loaded,
                interval,
            });
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Append a user interval. No ordering or overlap checks.
    pub fn add(&mut self, start: u64, end: u64, label: &str) -> Result<IntervalId, StoreError> {
        let interval = validated(start, end, label)?;
        let id = self.allocate_id();
        log::debug!("add {id}: {interval:?}");
        self.entries.push(Entry {
            id,
            origin: Origin::User,
            interval,
        });
        Ok(id)
    }

    pub fn edit(
        &mut self,
        id: IntervalId,
        start: u64,
        end: u64,
        label: &str,
    ) -> Result<(), StoreError> {
        let interval = validated(start, end, label)?;
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or(StoreError::UnknownInterval(id))?;
        log::debug!("edit {id}: {:?} -> {interval:?}", entry.interval);
        entry.interval = interval;
        Ok(())
    }

    pub fn delete(&mut self, id: IntervalId) -> Result<Interval, StoreError> {
        let pos = self
            .entries
            .iter()
            .position(|e| e.id == id)
            .ok_or(StoreError::UnknownInterval(id))?;
        let removed = self.entries.remove(pos).interval;
        log::debug!("delete {id}: {removed:?}");
        Ok(removed)
    }

    /// Resolve a 1-based display position.
    pub fn id_at(&self, position: usize) -> Result<IntervalId, StoreError> {
        position
            .checked_sub(1)
            .and_then(|i| self.entries.get(i))
            .map(|e| e.id)
            .ok_or(StoreError::PositionOutOfRange {
                position,
                len: self.entries.len(),
            })
    }

    pub fn edit_at(
        &mut self,
        position: usize,
        start: u64,
        end: u64,
        label: &str,
    ) -> Result<(), StoreError> {
        let id = self.id_at(position)?;
        self.edit(id, start, end, label)
    }

    pub fn delete_at(&mut self, position: usize) -> Result<Interval, StoreError> {
        let id = self.id_at(position)?;
        self.delete(id)
    }

    pub fn get(&self, id: IntervalId) -> Option<&Interval> {
        self.entries.iter().find(|e| e.id == id).map(|e| &e.interval)
    }

    pub fn entries(&self) -> &[Entry] {
        &self.entries
    }

    pub fn intervals(&self) -> Vec<Interval> {
        self.entries.iter().map(|e| e.interval.clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Display list, numbered from 1 in store order.
    pub fn choices(&self) -> Vec<Choice> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| Choice {
                id: e.id,
                text: choice_text(i + 1, &e.interval),
            })
            .collect()
    }

    fn allocate_id(&mut self) -> IntervalId {
        let id = IntervalId(self.next_id);
        self.next_id += 1;
        id
    }
}

pub fn choice_text(position: usize, interval: &Interval) -> String {
    format!(
        "{position}: {} - {} ({})",
        to_text(interval.start),
        to_text(interval.end),
        interval.description
    )
}

fn validated(start: u64, end: u64, label: &str) -> Result<Interval, StoreError> {
    if end < start {
        return Err(StoreError::Inverted { start, end });
    }
    if label.is_empty() || label.chars().any(char::is_whitespace) {
        return Err(StoreError::InvalidLabel(label.to_string()));
    }
    Ok(Interval::new(start, end, label))
}
