//! FIFO schedule queue.
//!
//! # Responsibility
//! - Hold waiting-list entries in arrival order.
//! - Keep the externally visible `position` field dense.
//!
//! # Invariants
//! - Positions are exactly `1..=len` from front to rear after every call.
//! - Dequeue renumbers the remaining entries (O(n)) so position reads stay
//!   O(1) per entry.

use crate::model::patient::PatientId;
use crate::model::schedule::ScheduleEntry;
use std::collections::VecDeque;

#[derive(Debug, Default)]
pub struct ScheduleQueue {
    entries: VecDeque<ScheduleEntry>,
}

impl ScheduleQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Appends at the rear and returns the assigned 1-indexed position.
    pub fn enqueue(&mut self, mut entry: ScheduleEntry) -> u32 {
        let position = self.entries.len() as u32 + 1;
        entry.position = position;
        self.entries.push_back(entry);
        position
    }

    /// Removes the front entry and renumbers what remains.
    pub fn dequeue(&mut self) -> Option<ScheduleEntry> {
        let entry = self.entries.pop_front()?;
        self.renumber();
        Some(entry)
    }

    pub fn peek_front(&self) -> Option<&ScheduleEntry> {
        self.entries.front()
    }

    pub fn is_queued(&self, id: PatientId) -> bool {
        self.entries.iter().any(|entry| entry.patient_id == id)
    }

    pub fn position_of(&self, id: PatientId) -> Option<u32> {
        self.entries
            .iter()
            .find(|entry| entry.patient_id == id)
            .map(|entry| entry.position)
    }

    /// Clones entries front to rear.
    pub fn to_ordered_list(&self) -> Vec<ScheduleEntry> {
        self.entries.iter().cloned().collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    fn renumber(&mut self) {
        for (offset, entry) in self.entries.iter_mut().enumerate() {
            entry.position = offset as u32 + 1;
        }
    }
}
