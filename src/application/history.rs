// History manager - Bounded undo/redo over dashboard snapshots
use crate::domain::dashboard::Dashboard;
use std::collections::VecDeque;

pub const DEFAULT_HISTORY_CAPACITY: usize = 10;

/// Snapshot stack with a cursor.
///
/// Entries after the cursor are redo states. Recording while the cursor is
/// not at the tail drops them. The oldest entry is evicted once the stack
/// grows past its capacity.
#[derive(Debug, Clone)]
pub struct HistoryManager {
    entries: VecDeque<Dashboard>,
    cursor: Option<usize>,
    capacity: usize,
}

impl Default for HistoryManager {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_CAPACITY)
    }
}

impl HistoryManager {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            cursor: None,
            capacity,
        }
    }

    /// Push a snapshot. Returns `false` when it equals the current entry.
    pub fn record(&mut self, dashboard: &Dashboard) -> bool {
        if let Some(current) = self.current() {
            if current == dashboard {
                return false;
            }
        }

        let keep = self.cursor.map_or(0, |c| c + 1);
        self.entries.truncate(keep);
        self.entries.push_back(dashboard.clone());

        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }

        self.cursor = Some(self.entries.len() - 1);
        true
    }

    pub fn undo(&mut self) -> Option<Dashboard> {
        match self.cursor {
            Some(c) if c > 0 => {
                self.cursor = Some(c - 1);
                self.current().cloned()
            }
            _ => None,
        }
    }

    pub fn redo(&mut self) -> Option<Dashboard> {
        match self.cursor {
            Some(c) if c + 1 < self.entries.len() => {
                self.cursor = Some(c + 1);
                self.current().cloned()
            }
            _ => None,
        }
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    pub fn can_redo(&self) -> bool {
        match self.cursor {
            Some(c) => c + 1 < self.entries.len(),
            None => false,
        }
    }

    /// Forget every snapshot, e.g. when switching to another dashboard.
    pub fn reset(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    fn current(&self) -> Option<&Dashboard> {
        self.cursor.and_then(|c| self.entries.get(c))
    }
}
