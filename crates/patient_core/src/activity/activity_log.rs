//! Bounded LIFO activity log.
//!
//! # Responsibility
//! - Keep the most recent manager operations, newest first.
//!
//! # Invariants
//! - `len() <= capacity()` after every push.
//! - Over capacity, the oldest entry is evicted, never the newest.
//! - Empty reads return `None` rather than failing.

use crate::model::activity::ActivityEntry;
use std::collections::VecDeque;

/// Default number of retained entries.
pub const DEFAULT_ACTIVITY_CAPACITY: usize = 100;

/// Ring-buffered stack: front is the top (newest), back is the oldest.
#[derive(Debug)]
pub struct ActivityLog {
    entries: VecDeque<ActivityEntry>,
    capacity: usize,
}

impl Default for ActivityLog {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_ACTIVITY_CAPACITY)
    }
}

impl ActivityLog {
    /// Creates a log retaining at most `capacity` entries (minimum 1).
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Pushes on top; returns the evicted oldest entry, if any.
    pub fn push(&mut self, entry: ActivityEntry) -> Option<ActivityEntry> {
        self.entries.push_front(entry);
        if self.entries.len() > self.capacity {
            return self.entries.pop_back();
        }
        None
    }

    pub fn pop(&mut self) -> Option<ActivityEntry> {
        self.entries.pop_front()
    }

    pub fn peek(&self) -> Option<&ActivityEntry> {
        self.entries.front()
    }

    /// At most `count` entries, newest first.
    pub fn recent(&self, count: usize) -> Vec<ActivityEntry> {
        self.entries.iter().take(count).cloned().collect()
    }

    /// Every retained entry, newest first.
    pub fn all(&self) -> Vec<ActivityEntry> {
        self.entries.iter().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::{ActivityLog, DEFAULT_ACTIVITY_CAPACITY};
    use crate::model::activity::{ActivityEntry, ActivityKind};

    fn entry(id: u32) -> ActivityEntry {
        ActivityEntry::with_timestamp(ActivityKind::Add, id, "P", "", "t")
    }

    #[test]
    fn default_capacity_is_one_hundred() {
        assert_eq!(ActivityLog::default().capacity(), DEFAULT_ACTIVITY_CAPACITY);
        assert_eq!(ActivityLog::with_capacity(0).capacity(), 1);
    }

    #[test]
    fn overflow_evicts_only_the_oldest_entry() {
        let mut log = ActivityLog::with_capacity(5);
        for id in 1..=5 {
            assert!(log.push(entry(id)).is_none());
        }
        let evicted = log.push(entry(6)).expect("sixth push should evict");

        assert_eq!(evicted.patient_id(), 1);
        assert_eq!(log.len(), 5);
        let ids: Vec<u32> = log.all().iter().map(|e| e.patient_id()).collect();
        assert_eq!(ids, vec![6, 5, 4, 3, 2]);
        assert_eq!(log.pop().map(|e| e.patient_id()), Some(6));
    }

    #[test]
    fn recent_is_newest_first_and_bounded() {
        let mut log = ActivityLog::with_capacity(10);
        for id in 1..=4 {
            log.push(entry(id));
        }

        let ids: Vec<u32> = log.recent(2).iter().map(|e| e.patient_id()).collect();
        assert_eq!(ids, vec![4, 3]);
        assert_eq!(log.recent(50).len(), 4);
        assert!(log.recent(0).is_empty());
    }

    #[test]
    fn empty_log_reads_return_none() {
        let mut log = ActivityLog::default();
        assert!(log.pop().is_none());
        assert!(log.peek().is_none());
        assert!(log.all().is_empty());
    }

    #[test]
    fn peek_does_not_remove() {
        let mut log = ActivityLog::default();
        log.push(entry(1));
        assert_eq!(log.peek().map(|e| e.patient_id()), Some(1));
        assert_eq!(log.len(), 1);
    }
}
