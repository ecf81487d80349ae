//! Bounded spin history, newest first

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use lw_wheel::SpinOutcome;

/// Entries kept per player
pub const DEFAULT_HISTORY_LEN: usize = 10;

/// One recorded spin
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub segment_id: u32,
    pub label: String,
    pub is_failure: bool,
    /// Landed through the forced entry point
    #[serde(default)]
    pub forced: bool,
    pub final_rotation: f64,
    /// Epoch milliseconds
    pub recorded_at_ms: i64,
}

impl HistoryEntry {
    pub fn from_outcome(outcome: &SpinOutcome, recorded_at_ms: i64) -> Self {
        Self {
            segment_id: outcome.segment.id,
            label: outcome.segment.label.clone(),
            is_failure: outcome.is_failure(),
            forced: outcome.forced,
            final_rotation: outcome.final_rotation,
            recorded_at_ms,
        }
    }
}

/// Ring of the most recent spins
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "StoredHistory")]
pub struct SpinHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

/// Unchecked wire form of [`SpinHistory`]
#[derive(Deserialize)]
struct StoredHistory {
    entries: VecDeque<HistoryEntry>,
    capacity: usize,
}

impl TryFrom<StoredHistory> for SpinHistory {
    type Error = String;

    fn try_from(stored: StoredHistory) -> Result<Self, Self::Error> {
        if stored.capacity == 0 {
            return Err("history capacity must be at least 1".into());
        }
        if stored.entries.len() > stored.capacity {
            return Err(format!(
                "history holds {} entries, capacity is {}",
                stored.entries.len(),
                stored.capacity
            ));
        }
        Ok(Self {
            entries: stored.entries,
            capacity: stored.capacity,
        })
    }
}

impl SpinHistory {
    /// History keeping at most `capacity` entries (at least one)
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Prepend an entry, evicting the oldest past capacity
    pub fn push(&mut self, entry: HistoryEntry) {
        self.entries.push_front(entry);
        self.entries.truncate(self.capacity);
    }

    /// Newest first
    pub fn iter(&self) -> impl Iterator<Item = &HistoryEntry> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&HistoryEntry> {
        self.entries.front()
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

    /// Count of entries that won a prize
    pub fn wins(&self) -> usize {
        self.entries.iter().filter(|e| !e.is_failure).count()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn to_vec(&self) -> Vec<HistoryEntry> {
        self.entries.iter().cloned().collect()
    }
}

impl Default for SpinHistory {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_HISTORY_LEN)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(id: u32, failure: bool, at: i64) -> HistoryEntry {
        HistoryEntry {
            segment_id: id,
            label: format!("#{id}"),
            is_failure: failure,
            forced: false,
            final_rotation: at as f64,
            recorded_at_ms: at,
        }
    }

    #[test]
    fn test_newest_first_and_bounded() {
        let mut history = SpinHistory::default();
        for i in 0..15 {
            history.push(entry(i, false, i64::from(i)));
        }
        assert_eq!(history.len(), DEFAULT_HISTORY_LEN);
        assert_eq!(history.latest().unwrap().segment_id, 14);
        let ids: Vec<u32> = history.iter().map(|e| e.segment_id).collect();
        assert_eq!(ids, (5..15).rev().collect::<Vec<_>>());
    }

    #[test]
    fn test_wins_and_clear() {
        let mut history = SpinHistory::with_capacity(3);
        history.push(entry(7, true, 1));
        history.push(entry(1, false, 2));
        assert_eq!(history.wins(), 1);
        history.clear();
        assert!(history.is_empty());
        assert_eq!(history.capacity(), 3);
    }

    #[test]
    fn test_stored_history_validated() {
        let ok: SpinHistory =
            serde_json::from_str(r#"{"entries": [], "capacity": 3}"#).unwrap();
        assert_eq!(ok.capacity(), 3);

        assert!(serde_json::from_str::<SpinHistory>(r#"{"entries": [], "capacity": 0}"#).is_err());

        let mut full = SpinHistory::with_capacity(2);
        full.push(entry(1, false, 1));
        full.push(entry(2, false, 2));
        let json = serde_json::to_string(&full).unwrap();
        assert_eq!(serde_json::from_str::<SpinHistory>(&json).unwrap(), full);

        let overfull = json.replace("\"capacity\":2", "\"capacity\":1");
        assert_ne!(overfull, json);
        assert!(serde_json::from_str::<SpinHistory>(&overfull).is_err());
    }

    #[test]
    fn test_zero_capacity_keeps_one() {
        let mut history = SpinHistory::with_capacity(0);
        history.push(entry(1, false, 1));
        history.push(entry(2, false, 2));
        assert_eq!(history.to_vec(), vec![entry(2, false, 2)]);
    }
}
