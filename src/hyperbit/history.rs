//! Bounded, insertion-ordered history log.
//!
//! A `HistoryLog` keeps at most `capacity` entries.  Pushing onto a full log
//! evicts the oldest entry first, so the log always holds the most recent
//! `capacity` records in the order they were appended.

use std::collections::vec_deque::{self, VecDeque};

use serde::{Serialize, Serializer};

/// Retention cap for a HyperBit's snapshot history.
pub const HYPERBIT_HISTORY_CAPACITY: usize = 100;

/// Retention cap for an agent's interaction memory.
pub const AGENT_MEMORY_CAPACITY: usize = 50;

/// Append-only FIFO log with bounded retention.
#[derive(Debug, Clone, PartialEq)]
pub struct HistoryLog<T> {
    entries: VecDeque<T>,
    capacity: usize,
}

impl<T> HistoryLog<T> {
    /// Create an empty log that retains at most `capacity` entries.
    ///
    /// A capacity of zero is bumped to one; a log that can hold nothing
    /// would silently drop every record.
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append an entry, evicting from the front once the cap is exceeded.
    pub fn push(&mut self, entry: T) {
        self.entries.push_back(entry);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The oldest retained entry.
    pub fn oldest(&self) -> Option<&T> {
        self.entries.front()
    }

    /// The most recently appended entry.
    pub fn latest(&self) -> Option<&T> {
        self.entries.back()
    }

    /// Iterate oldest to newest.
    pub fn iter(&self) -> vec_deque::Iter<'_, T> {
        self.entries.iter()
    }
}

impl<T> Default for HistoryLog<T> {
    fn default() -> Self {
        Self::with_capacity(HYPERBIT_HISTORY_CAPACITY)
    }
}

impl<'a, T> IntoIterator for &'a HistoryLog<T> {
    type Item = &'a T;
    type IntoIter = vec_deque::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

// The cap is an ownership policy, not data: exports carry only the entries.
impl<T: Serialize> Serialize for HistoryLog<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.entries.iter())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_below_capacity_keeps_everything() {
        let mut log = HistoryLog::with_capacity(3);
        log.push(1);
        log.push(2);
        assert_eq!(log.len(), 2);
        assert_eq!(log.oldest(), Some(&1));
        assert_eq!(log.latest(), Some(&2));
    }

    #[test]
    fn test_overflow_evicts_oldest_first() {
        let mut log = HistoryLog::with_capacity(HYPERBIT_HISTORY_CAPACITY);
        for i in 1..=101 {
            log.push(i);
        }
        assert_eq!(log.len(), 100);
        assert_eq!(log.oldest(), Some(&2));
        assert_eq!(log.latest(), Some(&101));
        assert!(!log.iter().any(|&v| v == 1));
    }

    #[test]
    fn test_order_is_insertion_order() {
        let mut log = HistoryLog::with_capacity(AGENT_MEMORY_CAPACITY);
        for i in 0..60 {
            log.push(i);
        }
        let kept: Vec<i32> = log.iter().copied().collect();
        assert_eq!(kept, (10..60).collect::<Vec<_>>());
    }

    #[test]
    fn test_zero_capacity_is_bumped() {
        let mut log = HistoryLog::with_capacity(0);
        log.push("a");
        log.push("b");
        assert_eq!(log.capacity(), 1);
        assert_eq!(log.latest(), Some(&"b"));
    }

    #[test]
    fn test_serializes_as_plain_array() {
        let mut log = HistoryLog::with_capacity(2);
        log.push("x");
        log.push("y");
        log.push("z");
        let json = serde_json::to_value(&log).unwrap();
        assert_eq!(json, serde_json::json!(["y", "z"]));
    }
}
