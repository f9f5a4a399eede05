// Undo/redo history for committed edits.

use std::collections::VecDeque;
use tracing::{debug, trace, warn};

/// Number of snapshots kept when no capacity is given.
pub const DEFAULT_CAPACITY: usize = 10;

/// Fixed-capacity editing history with a movable cursor.
///
/// `cursor == None` means nothing has been committed yet. Adding after an
/// undo drops the redo branch; adding to a full history evicts the oldest
/// entry.
#[derive(Debug, Clone)]
pub struct ChangesHistory<T> {
    entries: VecDeque<T>,
    cursor: Option<usize>,
    capacity: usize,
}

impl<T: Clone> ChangesHistory<T> {
    pub fn new(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            warn!("history capacity 0 requested, using 1");
            1
        } else {
            capacity
        };

        Self {
            entries: VecDeque::with_capacity(capacity),
            cursor: None,
            capacity,
        }
    }

    /// Record a new snapshot as the most recent entry.
    pub fn add(&mut self, snapshot: T) {
        let keep = self.cursor.map_or(0, |c| c + 1);
        if keep < self.entries.len() {
            debug!(
                dropped = self.entries.len() - keep,
                "discarding redo branch"
            );
            self.entries.truncate(keep);
        }

        if self.entries.len() == self.capacity {
            self.entries.pop_front();
            self.cursor = self.cursor.and_then(|c| c.checked_sub(1));
            trace!(capacity = self.capacity, "evicted oldest history entry");
        }

        self.entries.push_back(snapshot);
        self.cursor = Some(self.entries.len() - 1);
        trace!(cursor = ?self.cursor, len = self.entries.len(), "history entry added");
    }

    /// Step back one entry.
    ///
    /// Returns `None` when nothing was committed, and also when the cursor is
    /// already at the oldest entry (the cursor then stays at 0).
    pub fn undo(&mut self) -> Option<T> {
        let cursor = self.cursor?;
        if cursor == 0 {
            trace!("undo at oldest entry");
            return None;
        }

        self.cursor = Some(cursor - 1);
        self.entries.get(cursor - 1).cloned()
    }

    /// Step forward one entry. Returns `None` at the tail.
    pub fn redo(&mut self) -> Option<T> {
        let next = self.cursor.map_or(0, |c| c + 1);
        if next >= self.entries.len() {
            trace!("redo at newest entry");
            return None;
        }

        self.cursor = Some(next);
        self.entries.get(next).cloned()
    }

    /// Drop every entry and return to the empty state.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.cursor = None;
    }
}

impl<T> ChangesHistory<T> {
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn cursor(&self) -> Option<usize> {
        self.cursor
    }

    /// The entry under the cursor.
    pub fn current(&self) -> Option<&T> {
        self.cursor.and_then(|c| self.entries.get(c))
    }

    pub fn can_undo(&self) -> bool {
        matches!(self.cursor, Some(c) if c > 0)
    }

    pub fn can_redo(&self) -> bool {
        self.cursor.map_or(0, |c| c + 1) < self.entries.len()
    }

    /// Entries from oldest to newest.
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.entries.iter()
    }
}

impl<T: Clone> Default for ChangesHistory<T> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entries(history: &ChangesHistory<char>) -> Vec<char> {
        history.iter().copied().collect()
    }

    #[test]
    fn test_empty_history() {
        let mut history: ChangesHistory<char> = ChangesHistory::default();

        assert_eq!(history.capacity(), DEFAULT_CAPACITY);
        assert_eq!(history.cursor(), None);
        assert_eq!(history.undo(), None);
        assert_eq!(history.cursor(), None);
        assert_eq!(history.redo(), None);
        assert_eq!(history.cursor(), None);
        assert!(!history.can_undo());
        assert!(!history.can_redo());
    }

    #[test]
    fn test_add_moves_cursor_to_tail() {
        let mut history = ChangesHistory::new(5);
        history.add('a');
        history.add('b');

        assert_eq!(history.cursor(), Some(1));
        assert_eq!(history.current(), Some(&'b'));
        assert_eq!(entries(&history), vec!['a', 'b']);
    }

    #[test]
    fn test_undo_clamps_at_oldest() {
        let mut history = ChangesHistory::new(5);
        history.add('a');
        history.add('b');

        assert_eq!(history.undo(), Some('a'));
        assert_eq!(history.undo(), None);
        assert_eq!(history.cursor(), Some(0));
        assert_eq!(history.undo(), None);
        assert_eq!(history.cursor(), Some(0));
    }

    #[test]
    fn test_redo_recovers_entry_after_clamp() {
        let mut history = ChangesHistory::new(5);
        history.add('a');
        history.add('b');

        history.undo();
        history.undo();
        assert_eq!(history.redo(), Some('b'));
        assert_eq!(history.redo(), None);
        assert_eq!(history.cursor(), Some(1));
    }

    #[test]
    fn test_add_after_undo_truncates() {
        let mut history = ChangesHistory::new(5);
        for c in ['a', 'b', 'c', 'd'] {
            history.add(c);
        }
        history.undo();
        history.undo();
        history.add('x');

        assert_eq!(entries(&history), vec!['a', 'b', 'x']);
        assert_eq!(history.cursor(), Some(2));
        assert!(!history.can_redo());
    }

    #[test]
    fn test_eviction_keeps_newest() {
        let mut history = ChangesHistory::new(3);
        for c in ['a', 'b', 'c', 'd', 'e'] {
            history.add(c);
        }

        assert_eq!(entries(&history), vec!['c', 'd', 'e']);
        assert_eq!(history.cursor(), Some(2));
    }

    #[test]
    fn test_truncate_then_evict_only_when_full() {
        // Truncation frees room, so nothing is evicted here.
        let mut history = ChangesHistory::new(3);
        for c in ['a', 'b', 'c'] {
            history.add(c);
        }
        history.undo();
        history.add('d');

        assert_eq!(entries(&history), vec!['a', 'b', 'd']);
    }

    #[test]
    fn test_capacity_one() {
        let mut history = ChangesHistory::new(1);
        history.add('a');
        history.add('b');

        assert_eq!(entries(&history), vec!['b']);
        assert_eq!(history.cursor(), Some(0));
        assert_eq!(history.undo(), None);
        assert_eq!(history.redo(), None);
    }

    #[test]
    fn test_zero_capacity_is_raised() {
        let mut history = ChangesHistory::new(0);
        history.add('a');

        assert_eq!(history.capacity(), 1);
        assert_eq!(history.len(), 1);
    }

    #[test]
    fn test_clear_resets_cursor() {
        let mut history = ChangesHistory::new(3);
        history.add('a');
        history.clear();

        assert!(history.is_empty());
        assert_eq!(history.cursor(), None);
        assert_eq!(history.undo(), None);
    }
}
