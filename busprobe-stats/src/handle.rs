//! Topic handle for recording publications.

use std::sync::Arc;
use std::time::Instant;

use busprobe_types::{PublicationMetadata, TopicReport};

use crate::state::TopicState;

/// A handle for recording statistics for a specific topic.
///
/// This is the primary interface for feeding a subscriber's deliveries into
/// the statistics engine. Obtain a handle by calling
/// [`Monitor::enable`](crate::Monitor::enable) or
/// [`TopicRegistry::enable`](crate::TopicRegistry::enable). Handles are cheap
/// to clone and can be used from any thread; updates to the same topic are
/// serialized by a per-topic lock.
///
/// # Example
///
/// ```rust
/// use busprobe_stats::Monitor;
/// use busprobe_types::{Nanoseconds, PublicationMetadata};
///
/// let monitor = Monitor::new();
/// let handle = monitor.enable("/imu");
///
/// // Record each delivered publication
/// let sender = "tcp://10.0.0.7:5001";
/// handle.record(sender, &PublicationMetadata::new(Nanoseconds::from_millis(0), 1));
/// handle.record(sender, &PublicationMetadata::new(Nanoseconds::from_millis(10), 2));
///
/// assert_eq!(handle.dropped_message_count(), 0);
/// ```
#[derive(Clone)]
pub struct TopicHandle {
    pub(crate) state: Arc<TopicState>,
    pub(crate) topic: String,
}

impl TopicHandle {
    /// Record a publication received now.
    ///
    /// # Arguments
    ///
    /// * `sender` - Identity of the publisher (e.g. its address)
    /// * `meta` - The publication's stamp and sequence number
    pub fn record(&self, sender: &str, meta: &PublicationMetadata) {
        self.state.stats.lock().update(sender, meta);
    }

    /// Record a publication received at a specific instant.
    pub fn record_at(&self, sender: &str, meta: &PublicationMetadata, now: Instant) {
        self.state.stats.lock().update_at(sender, meta, now);
    }

    /// Forget a sender, e.g. when it disconnects.
    pub fn forget_sender(&self, sender: &str) -> bool {
        self.state.stats.lock().forget_sender(sender)
    }

    /// Total number of dropped messages on this topic.
    pub fn dropped_message_count(&self) -> u64 {
        self.state.stats.lock().dropped_message_count()
    }

    /// Structured form of the topic's statistics.
    pub fn report(&self) -> TopicReport {
        self.state.stats.lock().report()
    }

    /// The topic's statistics as a YAML document.
    pub fn yaml_string(&self) -> Result<String, serde_yaml::Error> {
        self.report().to_yaml()
    }

    /// Get the topic name.
    pub fn topic(&self) -> &str {
        &self.topic
    }
}

impl std::fmt::Debug for TopicHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TopicHandle")
            .field("topic", &self.topic)
            .finish()
    }
}
