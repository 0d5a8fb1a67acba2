//! Per-topic publication and reception statistics.

use std::collections::HashMap;
use std::time::Instant;

use busprobe_types::{Nanoseconds, PublicationMetadata, TopicReport};
use tracing::{debug, trace};

use crate::Statistics;

/// Statistics for a single topic.
///
/// Tracks:
///
/// 1. The number of dropped messages, inferred from gaps in each sender's
///    sequence numbers.
/// 2. Publication statistics: rate, standard deviation, min and max of the
///    interval between publisher stamps.
/// 3. Receive statistics: the same, measured with the local monotonic clock
///    at the time each message is recorded.
///
/// The first update only records a baseline. Intervals and drop checks start
/// with the second update.
///
/// This type does no locking. If several threads deliver messages for the
/// same topic, wrap it in a mutex or use [`TopicRegistry`](crate::TopicRegistry).
///
/// # Example
///
/// ```rust
/// use busprobe_stats::TopicStatistics;
/// use busprobe_types::{Nanoseconds, PublicationMetadata};
///
/// let mut stats = TopicStatistics::new();
/// let sender = "tcp://10.0.0.2:4455";
/// stats.update(sender, &PublicationMetadata::new(Nanoseconds::from_millis(0), 1));
/// stats.update(sender, &PublicationMetadata::new(Nanoseconds::from_millis(100), 3));
///
/// assert_eq!(stats.dropped_message_count(), 1);
/// assert!(stats.yaml_string().unwrap().starts_with("dropped_message_count: 1\n"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct TopicStatistics {
    dropped_msg_count: u64,
    publication: Statistics,
    receive: Statistics,
    baseline: Option<Baseline>,
    senders: HashMap<String, SenderState>,
    sender_capacity: Option<usize>,
    /// Incremented on every update; orders senders for eviction.
    tick: u64,
}

#[derive(Debug, Clone, Copy)]
struct Baseline {
    publication_stamp: Nanoseconds,
    receive_stamp: Instant,
}

#[derive(Debug, Clone, Copy)]
struct SenderState {
    last_seq: u64,
    last_tick: u64,
}

impl TopicStatistics {
    /// Create statistics with an unbounded sender map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create statistics that remember at most `capacity` senders.
    ///
    /// When a new sender arrives and the map is full, the sender updated
    /// least recently is forgotten. If it reappears it is treated as a new
    /// sender. A capacity of zero is treated as one.
    pub fn with_sender_capacity(capacity: usize) -> Self {
        Self {
            sender_capacity: Some(capacity.max(1)),
            ..Self::default()
        }
    }

    /// Record a publication using the current time as the receipt time.
    pub fn update(&mut self, sender: &str, meta: &PublicationMetadata) {
        self.update_at(sender, meta, Instant::now());
    }

    /// Record a publication received at `now`.
    ///
    /// `now` should come from a monotonic clock and never go backwards
    /// between calls; a backwards step is recorded as a zero interval.
    pub fn update_at(&mut self, sender: &str, meta: &PublicationMetadata, now: Instant) {
        self.tick += 1;

        if let Some(baseline) = self.baseline {
            let publication_ms = (meta.stamp - baseline.publication_stamp).as_millis_f64();
            let receive_ms = now
                .saturating_duration_since(baseline.receive_stamp)
                .as_secs_f64()
                * 1e3;
            self.publication.update(publication_ms);
            self.receive.update(receive_ms);

            // An unseen sender counts from zero, so a first message with a
            // sequence other than 1 is reported as a drop.
            let last_seq = self.senders.get(sender).map_or(0, |s| s.last_seq);
            if meta.seq != last_seq.wrapping_add(1) {
                self.dropped_msg_count += 1;
                debug!(
                    "Sequence gap from {}: expected {}, received {}",
                    sender,
                    last_seq.wrapping_add(1),
                    meta.seq
                );
            }
        } else {
            trace!("Recording baseline from {}", sender);
        }

        self.baseline = Some(Baseline {
            publication_stamp: meta.stamp,
            receive_stamp: now,
        });
        self.remember(sender, meta.seq);
    }

    fn remember(&mut self, sender: &str, seq: u64) {
        let state = SenderState {
            last_seq: seq,
            last_tick: self.tick,
        };

        if let Some(existing) = self.senders.get_mut(sender) {
            *existing = state;
            return;
        }

        if let Some(capacity) = self.sender_capacity {
            if self.senders.len() >= capacity {
                self.evict_oldest_sender();
            }
        }
        self.senders.insert(sender.to_string(), state);
    }

    fn evict_oldest_sender(&mut self) {
        let oldest = self
            .senders
            .iter()
            .min_by_key(|(_, s)| s.last_tick)
            .map(|(name, _)| name.clone());

        if let Some(name) = oldest {
            debug!("Sender map full, forgetting {}", name);
            self.senders.remove(&name);
        }
    }

    /// Forget a sender, e.g. when it disconnects.
    ///
    /// Returns `true` if the sender was known.
    pub fn forget_sender(&mut self, sender: &str) -> bool {
        self.senders.remove(sender).is_some()
    }

    /// Last sequence number seen from a sender.
    pub fn last_sequence(&self, sender: &str) -> Option<u64> {
        self.senders.get(sender).map(|s| s.last_seq)
    }

    /// Number of senders currently remembered.
    pub fn sender_count(&self) -> usize {
        self.senders.len()
    }

    /// Maximum number of senders remembered, if bounded.
    pub fn sender_capacity(&self) -> Option<usize> {
        self.sender_capacity
    }

    /// Total number of dropped messages.
    pub fn dropped_message_count(&self) -> u64 {
        self.dropped_msg_count
    }

    /// Intervals between publisher stamps, in milliseconds.
    pub fn publication(&self) -> &Statistics {
        &self.publication
    }

    /// Intervals between local receipt times, in milliseconds.
    pub fn receive(&self) -> &Statistics {
        &self.receive
    }

    /// Structured form of the statistics.
    pub fn report(&self) -> TopicReport {
        TopicReport {
            dropped_message_count: self.dropped_msg_count,
            publication_statistics: self.publication.summary(),
            receive_statistics: self.receive.summary(),
        }
    }

    /// The statistics as a YAML document.
    ///
    /// See [`TopicReport::to_yaml`] for the format.
    pub fn yaml_string(&self) -> Result<String, serde_yaml::Error> {
        self.report().to_yaml()
    }
}
