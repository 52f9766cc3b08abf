// history.rs

use std::collections::VecDeque;
use std::sync::Arc;

use crate::calculation::Calculation;
use crate::memento::Snapshot;

/// Chronological log of calculations, capped at `max_size` entries.
///
/// When an append would overflow the cap the oldest entries are dropped first.
pub struct History {
    entries: VecDeque<Arc<Calculation>>,
    max_size: usize,
}

impl History {
    /// `max_size` is clamped to at least one entry.
    pub fn new(max_size: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_size: max_size.max(1),
        }
    }

    pub fn append(&mut self, calc: Arc<Calculation>) {
        self.entries.push_back(calc);
        self.evict();
    }

    fn evict(&mut self) {
        while self.entries.len() > self.max_size {
            self.entries.pop_front();
        }
    }

    pub fn get(&self, n: usize) -> Option<&Arc<Calculation>> {
        self.entries.get(n)
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// An independent copy of the current entries, oldest first.
    pub fn list(&self) -> Vec<Arc<Calculation>> {
        self.entries.iter().cloned().collect()
    }

    /// Swaps in `records` wholesale. If there are more than `max_size` of them,
    /// only the newest are kept.
    pub fn replace_all<I>(&mut self, records: I)
    where
        I: IntoIterator<Item = Arc<Calculation>>,
    {
        let mut next: VecDeque<_> = records.into_iter().collect();
        while next.len() > self.max_size {
            next.pop_front();
        }
        self.entries = next;
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot::new(self.list())
    }

    pub fn restore(&mut self, snapshot: &Snapshot) {
        self.replace_all(snapshot.records().iter().cloned());
    }

    /// True when the log holds the same records as `snapshot`, timestamps aside.
    pub fn matches(&self, snapshot: &Snapshot) -> bool {
        self.entries.len() == snapshot.len()
            && self.entries.iter().zip(snapshot.records()).all(|(a, b)| a == b)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::operations::Operation;
    use chrono::Utc;

    fn add(a: f64, b: f64) -> Arc<Calculation> {
        Arc::new(Calculation::new(Operation::Add, a, b, a + b, Utc::now()))
    }

    #[test]
    fn append_keeps_insertion_order() {
        let mut history = History::new(10);
        history.append(add(1.0, 1.0));
        history.append(add(2.0, 2.0));
        assert_eq!(history.size(), 2);
        assert_eq!(history.get(0).unwrap().result(), 2.0);
        assert_eq!(history.get(1).unwrap().result(), 4.0);
    }

    #[test]
    fn oldest_entries_are_evicted_first() {
        let mut history = History::new(2);
        for i in 1..=3 {
            history.append(add(i as f64, i as f64));
        }
        let results: Vec<f64> = history.list().iter().map(|c| c.result()).collect();
        assert_eq!(results, vec![4.0, 6.0]);
    }

    #[test]
    fn zero_capacity_is_clamped() {
        let mut history = History::new(0);
        history.append(add(1.0, 1.0));
        history.append(add(2.0, 2.0));
        assert_eq!(history.max_size(), 1);
        assert_eq!(history.size(), 1);
    }

    #[test]
    fn list_is_independent_of_the_log() {
        let mut history = History::new(5);
        history.append(add(1.0, 1.0));
        let mut copy = history.list();
        copy.clear();
        assert_eq!(history.size(), 1);
        history.clear();
        assert!(history.is_empty());
    }

    #[test]
    fn replace_all_keeps_the_newest() {
        let mut history = History::new(2);
        history.replace_all(vec![add(1.0, 0.0), add(2.0, 0.0), add(3.0, 0.0)]);
        let results: Vec<f64> = history.list().iter().map(|c| c.result()).collect();
        assert_eq!(results, vec![2.0, 3.0]);
    }

    #[test]
    fn snapshot_survives_later_mutation() {
        let mut history = History::new(5);
        history.append(add(1.0, 1.0));
        let snap = history.snapshot();
        history.append(add(2.0, 2.0));
        assert_eq!(snap.len(), 1);
        assert!(!history.matches(&snap));
        history.restore(&snap);
        assert!(history.matches(&snap));
        assert_eq!(history.size(), 1);
    }
}
