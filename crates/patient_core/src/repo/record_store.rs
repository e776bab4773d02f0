//! Primary record store.
//!
//! # Responsibility
//! - Own every `Patient` held by the manager.
//! - Keep head-first insertion order for full listings.
//! - Hand out generation-checked handles for O(1) re-resolution.
//!
//! # Invariants
//! - Patient ids are unique within the store (callers check before insert).
//! - A handle resolves only while its record is alive; after delete (or
//!   clear) the slot generation moves on and the old handle yields `None`.
//! - Updates happen in place: handle and id stay valid across updates.

use crate::model::patient::{Patient, PatientFields, PatientId};

/// Stable reference to one stored record.
///
/// Cheap to copy; never borrows the store. Resolve with [`RecordStore::get`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RecordHandle {
    slot: usize,
    generation: u64,
}

#[derive(Debug)]
struct Slot {
    generation: u64,
    entry: Option<Occupied>,
}

#[derive(Debug)]
struct Occupied {
    patient: Patient,
    prev: Option<usize>,
    next: Option<usize>,
}

/// Arena-backed, insertion-ordered patient store.
#[derive(Debug, Default)]
pub struct RecordStore {
    slots: Vec<Slot>,
    free: Vec<usize>,
    head: Option<usize>,
    len: usize,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts a record at the front of the listing order. O(1).
    ///
    /// Does not check for duplicate ids; the manager guards that.
    pub fn insert_front(&mut self, patient: Patient) -> RecordHandle {
        let old_head = self.head;
        let occupied = Occupied {
            patient,
            prev: None,
            next: old_head,
        };

        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index].entry = Some(occupied);
                index
            }
            None => {
                self.slots.push(Slot {
                    generation: 0,
                    entry: Some(occupied),
                });
                self.slots.len() - 1
            }
        };

        if let Some(old) = old_head {
            if let Some(entry) = self.slots[old].entry.as_mut() {
                entry.prev = Some(index);
            }
        }
        self.head = Some(index);
        self.len += 1;

        RecordHandle {
            slot: index,
            generation: self.slots[index].generation,
        }
    }

    /// Resolves a handle in O(1). Stale handles return `None`.
    pub fn get(&self, handle: RecordHandle) -> Option<&Patient> {
        let slot = self.slots.get(handle.slot)?;
        if slot.generation != handle.generation {
            return None;
        }
        slot.entry.as_ref().map(|entry| &entry.patient)
    }

    /// Linear scan by id.
    pub fn find_by_id(&self, id: PatientId) -> Option<&Patient> {
        self.iter().find(|patient| patient.patient_id == id)
    }

    /// Linear scan returning the handle of the record with `id`.
    pub fn locate(&self, id: PatientId) -> Option<RecordHandle> {
        self.position_of(id).map(|index| RecordHandle {
            slot: index,
            generation: self.slots[index].generation,
        })
    }

    pub fn exists_by_id(&self, id: PatientId) -> bool {
        self.position_of(id).is_some()
    }

    /// Replaces the descriptive fields of `id` in place.
    ///
    /// Returns `false` when no record has that id.
    pub fn update_by_id(&mut self, id: PatientId, fields: PatientFields) -> bool {
        let Some(index) = self.position_of(id) else {
            return false;
        };
        match self.slots[index].entry.as_mut() {
            Some(entry) => {
                entry.patient.replace_fields(fields);
                true
            }
            None => false,
        }
    }

    /// Removes the record with `id` and returns it.
    ///
    /// The slot generation advances, so every outstanding handle to the
    /// record stops resolving.
    pub fn take_by_id(&mut self, id: PatientId) -> Option<Patient> {
        let index = self.position_of(id)?;
        self.release_slot(index)
    }

    /// Removes the record with `id`. Returns `false` if not found.
    pub fn delete_by_id(&mut self, id: PatientId) -> bool {
        self.take_by_id(id).is_some()
    }

    /// Drops every record and invalidates every handle issued so far.
    pub fn clear(&mut self) {
        while let Some(index) = self.head {
            self.release_slot(index);
        }
    }

    /// Iterates records head to tail (most recently inserted first).
    pub fn iter(&self) -> Iter<'_> {
        Iter {
            store: self,
            cursor: self.head,
        }
    }

    /// Clones every record head to tail.
    pub fn to_ordered_list(&self) -> Vec<Patient> {
        self.iter().cloned().collect()
    }

    fn position_of(&self, id: PatientId) -> Option<usize> {
        let mut cursor = self.head;
        while let Some(index) = cursor {
            let entry = self.slots[index].entry.as_ref()?;
            if entry.patient.patient_id == id {
                return Some(index);
            }
            cursor = entry.next;
        }
        None
    }

    fn release_slot(&mut self, index: usize) -> Option<Patient> {
        let slot = &mut self.slots[index];
        let entry = slot.entry.take()?;
        slot.generation = slot.generation.wrapping_add(1);

        match entry.prev {
            Some(prev) => {
                if let Some(prev_entry) = self.slots[prev].entry.as_mut() {
                    prev_entry.next = entry.next;
                }
            }
            None => self.head = entry.next,
        }
        if let Some(next) = entry.next {
            if let Some(next_entry) = self.slots[next].entry.as_mut() {
                next_entry.prev = entry.prev;
            }
        }

        self.free.push(index);
        self.len -= 1;
        Some(entry.patient)
    }
}

/// Head-to-tail iterator over stored records.
pub struct Iter<'a> {
    store: &'a RecordStore,
    cursor: Option<usize>,
}

impl<'a> Iterator for Iter<'a> {
    type Item = &'a Patient;

    fn next(&mut self) -> Option<Self::Item> {
        let index = self.cursor?;
        let entry = self.store.slots[index].entry.as_ref()?;
        self.cursor = entry.next;
        Some(&entry.patient)
    }
}
