use std::collections::VecDeque;

use crate::emotion::model::EmotionId;
use crate::settings::model::RenderSettings;

/// Entries kept before the oldest is evicted.
pub const DEFAULT_CAPACITY: usize = 20;

/// Snapshot restored by undo/redo.
#[derive(Clone, Debug, PartialEq)]
pub struct HistoryEntry {
    pub settings: RenderSettings,
    pub text: String,
    pub current_emotion: EmotionId,
    pub secondary_emotion: EmotionId,
}

/// Bounded undo/redo sequence with a cursor.
///
/// Committing past the cursor drops the redo branch; overflowing evicts the oldest entry.
#[derive(Clone, Debug)]
pub struct HistoryStore<T> {
    entries: VecDeque<T>,
    cursor: Option<usize>,
    capacity: usize,
}

impl<T: Clone> HistoryStore<T> {
    /// Empty store holding at most `capacity` entries (at least one).
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity.max(1)),
            cursor: None,
            capacity: capacity.max(1),
        }
    }

    /// Number of stored entries, including any redo branch.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Entry under the cursor.
    pub fn current(&self) -> Option<&T> {
        self.cursor.and_then(|i| self.entries.get(i))
    }

    /// Appends `entry` after the cursor, dropping any redo branch and evicting the oldest
    /// entry when full.
    pub fn commit(&mut self, entry: T) {
        if let Some(i) = self.cursor {
            self.entries.truncate(i + 1);
        } else {
            self.entries.clear();
        }
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
        self.cursor = Some(self.entries.len() - 1);
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(i) if i > 0)
    }

    pub fn can_redo(&self) -> bool {
        matches!(self.cursor, Some(i) if i + 1 < self.entries.len())
    }

    /// Moves back one entry and returns it; `None` at the oldest entry.
    pub fn undo(&mut self) -> Option<&T> {
        let i = self.cursor.filter(|&i| i > 0)? - 1;
        self.cursor = Some(i);
        self.entries.get(i)
    }

    /// Moves forward one entry and returns it; `None` at the newest entry.
    pub fn redo(&mut self) -> Option<&T> {
        let i = self.cursor.filter(|&i| i + 1 < self.entries.len())? + 1;
        self.cursor = Some(i);
        self.entries.get(i)
    }
}

impl<T: Clone> Default for HistoryStore<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/history/store.rs"]
mod tests;
