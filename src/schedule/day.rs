use thiserror::Error;
use tracing::{debug, info};

use crate::schedule::entry::{Category, MinuteOfDay, ScheduleEntry};

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScheduleError {
    #[error("이미 해당 시간에 일정이 있습니다.")]
    Overlap { existing: u64 },
}

/// What the form hands over before an id is assigned.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewEntry {
    pub category: Category,
    pub label: String,
    pub start: MinuteOfDay,
    pub end: MinuteOfDay,
}

/// One day's entries in insertion order.
#[derive(Debug, Default)]
pub struct DayPlan {
    entries: Vec<ScheduleEntry>,
    next_id: u64,
}

impl DayPlan {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first_conflict(&self, start: MinuteOfDay, end: MinuteOfDay) -> Option<&ScheduleEntry> {
        self.entries.iter().find(|e| e.overlaps(start, end))
    }

    pub fn add(&mut self, new: NewEntry) -> Result<u64, ScheduleError> {
        if let Some(existing) = self.first_conflict(new.start, new.end) {
            debug!(existing = existing.id, label = %new.label, "rejected overlapping entry");
            return Err(ScheduleError::Overlap {
                existing: existing.id,
            });
        }
        self.next_id += 1;
        let id = self.next_id;
        info!(
            id,
            category = new.category.key(),
            label = %new.label,
            start = new.start.minutes(),
            end = new.end.minutes(),
            "schedule entry added"
        );
        self.entries.push(ScheduleEntry {
            id,
            category: new.category,
            label: new.label,
            start: new.start,
            end: new.end,
        });
        Ok(id)
    }

    pub fn remove(&mut self, id: u64) -> Option<ScheduleEntry> {
        let pos = self.entries.iter().position(|e| e.id == id)?;
        info!(id, "schedule entry removed");
        Some(self.entries.remove(pos))
    }
}
