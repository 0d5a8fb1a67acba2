//! Shared state for all monitored topics.

use std::collections::BTreeMap;
use std::sync::Arc;

use busprobe_types::StatisticsReport;
use parking_lot::{Mutex, RwLock};
use tracing::debug;

use crate::handle::TopicHandle;
use crate::TopicStatistics;

/// Statistics for a single topic, behind its own lock.
///
/// `TopicStatistics` does no synchronization of its own; every writer goes
/// through this mutex.
#[derive(Debug)]
pub(crate) struct TopicState {
    pub(crate) stats: Mutex<TopicStatistics>,
}

impl TopicState {
    fn new(sender_capacity: Option<usize>) -> Self {
        let stats = match sender_capacity {
            Some(capacity) => TopicStatistics::with_sender_capacity(capacity),
            None => TopicStatistics::new(),
        };
        Self {
            stats: Mutex::new(stats),
        }
    }
}

/// Thread-safe registry of monitored topics.
///
/// A topic's statistics live from [`enable`](Self::enable) until
/// [`disable`](Self::disable). Handles obtained before a topic was disabled
/// keep working but no longer show up in reports.
///
/// # Example
///
/// ```rust
/// use busprobe_stats::TopicRegistry;
/// use busprobe_types::{Nanoseconds, PublicationMetadata};
///
/// let registry = TopicRegistry::new();
/// let handle = registry.enable("/chatter");
/// handle.record("sender", &PublicationMetadata::new(Nanoseconds::ZERO, 1));
///
/// let report = registry.collect();
/// assert!(report.get("/chatter").is_some());
/// ```
#[derive(Debug, Default)]
pub struct TopicRegistry {
    topics: RwLock<BTreeMap<String, Arc<TopicState>>>,
    sender_capacity: Option<usize>,
}

impl TopicRegistry {
    /// Create a registry whose topics remember every sender.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry whose topics remember at most `capacity` senders each.
    pub fn with_sender_capacity(capacity: usize) -> Self {
        Self {
            topics: RwLock::default(),
            sender_capacity: Some(capacity),
        }
    }

    /// Start monitoring a topic, or get the existing statistics.
    pub fn enable(&self, topic: &str) -> TopicHandle {
        TopicHandle {
            state: self.get_or_create(topic),
            topic: topic.to_string(),
        }
    }

    fn get_or_create(&self, topic: &str) -> Arc<TopicState> {
        // Fast path: check if it exists
        {
            let topics = self.topics.read();
            if let Some(state) = topics.get(topic) {
                return state.clone();
            }
        }

        // Slow path: create it
        let mut topics = self.topics.write();
        topics
            .entry(topic.to_string())
            .or_insert_with(|| {
                debug!("Enabling statistics for topic {}", topic);
                Arc::new(TopicState::new(self.sender_capacity))
            })
            .clone()
    }

    /// Stop monitoring a topic and discard its statistics.
    ///
    /// Returns `true` if the topic was being monitored.
    pub fn disable(&self, topic: &str) -> bool {
        let removed = self.topics.write().remove(topic).is_some();
        if removed {
            debug!("Disabled statistics for topic {}", topic);
        }
        removed
    }

    /// Get a handle to a monitored topic without enabling it.
    pub fn get(&self, topic: &str) -> Option<TopicHandle> {
        self.topics.read().get(topic).map(|state| TopicHandle {
            state: state.clone(),
            topic: topic.to_string(),
        })
    }

    /// Whether a topic is being monitored.
    pub fn is_enabled(&self, topic: &str) -> bool {
        self.topics.read().contains_key(topic)
    }

    /// Names of all monitored topics, in order.
    pub fn topics(&self) -> Vec<String> {
        self.topics.read().keys().cloned().collect()
    }

    /// Collect every monitored topic into a report.
    pub fn collect(&self) -> StatisticsReport {
        let topics = self.topics.read();

        let mut report = StatisticsReport::builder();
        for (name, state) in topics.iter() {
            report = report.topic(name.clone(), state.stats.lock().report());
        }

        report.build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use busprobe_types::{Nanoseconds, PublicationMetadata};

    fn meta(seq: u64) -> PublicationMetadata {
        PublicationMetadata::new(Nanoseconds::from_millis(seq as i64 * 10), seq)
    }

    #[test]
    fn enable_returns_same_state_on_second_call() {
        let registry = TopicRegistry::new();

        let h1 = registry.enable("/a");
        let h2 = registry.enable("/a");
        assert!(Arc::ptr_eq(&h1.state, &h2.state));

        h1.record("s", &meta(1));
        h2.record("s", &meta(3));
        assert_eq!(h1.dropped_message_count(), 1);
    }

    #[test]
    fn disable_removes_topic() {
        let registry = TopicRegistry::new();
        registry.enable("/a");
        registry.enable("/b");

        assert!(registry.disable("/a"));
        assert!(!registry.disable("/a"));
        assert!(!registry.is_enabled("/a"));
        assert_eq!(registry.topics(), vec!["/b".to_string()]);
    }

    #[test]
    fn re_enable_starts_fresh() {
        let registry = TopicRegistry::new();
        let old = registry.enable("/a");
        old.record("s", &meta(1));
        old.record("s", &meta(5));

        registry.disable("/a");
        let fresh = registry.enable("/a");
        assert_eq!(fresh.dropped_message_count(), 0);

        // The old handle still holds its own state.
        assert_eq!(old.dropped_message_count(), 1);
    }

    #[test]
    fn get_does_not_enable() {
        let registry = TopicRegistry::new();
        assert!(registry.get("/a").is_none());
        assert!(!registry.is_enabled("/a"));

        registry.enable("/a");
        assert_eq!(registry.get("/a").map(|h| h.topic().to_string()), Some("/a".to_string()));
    }

    #[test]
    fn collect_includes_every_topic() {
        let registry = TopicRegistry::new();
        let a = registry.enable("/a");
        let b = registry.enable("/b");

        a.record("s", &meta(1));
        a.record("s", &meta(2));
        b.record("s", &meta(1));
        b.record("s", &meta(4));

        let report = registry.collect();
        assert_eq!(report.len(), 2);
        assert_eq!(report.get("/a").unwrap().dropped_message_count, 0);
        assert_eq!(report.get("/b").unwrap().dropped_message_count, 1);
        assert_eq!(report.total_dropped(), 1);
    }

    #[test]
    fn sender_capacity_applies_to_new_topics() {
        let registry = TopicRegistry::with_sender_capacity(1);
        let handle = registry.enable("/a");
        handle.record("s1", &meta(1));
        handle.record("s2", &meta(1));

        assert_eq!(handle.state.stats.lock().sender_count(), 1);
    }

    #[test]
    fn concurrent_updates_are_serialized_per_topic() {
        use std::thread;

        let registry = Arc::new(TopicRegistry::new());
        let mut handles = vec![];
        for t in 0..8u64 {
            let registry = registry.clone();
            handles.push(thread::spawn(move || {
                let topic = registry.enable("/shared");
                let sender = format!("sender-{t}");
                for seq in 1..=250 {
                    topic.record(&sender, &meta(seq));
                }
            }));
        }
        for h in handles {
            h.join().unwrap();
        }

        let handle = registry.get("/shared").unwrap();
        let stats = handle.state.stats.lock();
        assert_eq!(stats.sender_count(), 8);
        assert_eq!(stats.dropped_message_count(), 0);
        assert_eq!(stats.publication().count(), 8 * 250 - 1);
    }
}
