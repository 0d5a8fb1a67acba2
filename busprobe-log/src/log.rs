//! In-memory message log and time-range queries over it.

use std::collections::BTreeSet;
use std::iter::FusedIterator;
use std::ops::Range;
use std::vec;

use busprobe_types::{Message, Nanoseconds, QualifiedTimeRange};
use tracing::{debug, trace};

use crate::{LogError, RangeMatcher, TimeIndex};

/// Which topics a query returns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TopicSelection {
    /// Every topic in the log.
    #[default]
    All,
    /// Only the named topics.
    Only(BTreeSet<String>),
}

impl TopicSelection {
    /// Whether messages on `topic` are selected.
    pub fn matches(&self, topic: &str) -> bool {
        match self {
            TopicSelection::All => true,
            TopicSelection::Only(topics) => topics.contains(topic),
        }
    }

    fn insert(&mut self, topic: String) {
        match self {
            TopicSelection::All => *self = TopicSelection::Only(BTreeSet::from([topic])),
            TopicSelection::Only(topics) => {
                topics.insert(topic);
            }
        }
    }
}

/// What to read from a [`MessageLog`]: a topic selection and a time range.
///
/// # Example
///
/// ```rust
/// use busprobe_log::QueryOptions;
/// use busprobe_types::{Nanoseconds, QualifiedTime, QualifiedTimeRange};
///
/// let options = QueryOptions::all()
///     .topic("/imu")
///     .topic("/gps")
///     .range(QualifiedTimeRange::from_start(QualifiedTime::at(Nanoseconds::from_secs(5))));
///
/// assert!(options.selection().matches("/imu"));
/// assert!(!options.selection().matches("/chatter"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryOptions {
    topics: TopicSelection,
    range: QualifiedTimeRange,
}

impl QueryOptions {
    /// Every message on every topic.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restrict the query to `topic`, in addition to any topics already named.
    pub fn topic(mut self, topic: impl Into<String>) -> Self {
        self.topics.insert(topic.into());
        self
    }

    /// Restrict the query to several topics.
    pub fn topics<I, S>(mut self, topics: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for topic in topics {
            self.topics.insert(topic.into());
        }
        self
    }

    /// Restrict the query to a time range.
    pub fn range(mut self, range: QualifiedTimeRange) -> Self {
        self.range = range;
        self
    }

    pub fn selection(&self) -> &TopicSelection {
        &self.topics
    }

    pub fn time_range(&self) -> &QualifiedTimeRange {
        &self.range
    }
}

/// Messages held in receipt-time order.
///
/// Every message must be received strictly later than the one appended
/// before it, across all topics. Queries pick the requested topics first and
/// resolve their time range against those messages alone.
///
/// # Example
///
/// ```rust
/// use busprobe_log::{MessageLog, QueryOptions};
/// use busprobe_types::{Message, Nanoseconds};
///
/// let mut log = MessageLog::new();
/// log.append(Message::new(Nanoseconds(10), b"a".to_vec(), "Str", "/chatter")).unwrap();
/// log.append(Message::new(Nanoseconds(20), b"b".to_vec(), "Imu", "/imu")).unwrap();
///
/// let chatter: Vec<_> = log.query(&QueryOptions::all().topic("/chatter")).collect();
/// assert_eq!(chatter.len(), 1);
/// assert_eq!(chatter[0].data(), b"a");
/// ```
#[derive(Debug, Clone, Default)]
pub struct MessageLog {
    index: TimeIndex,
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a log from messages already in receipt-time order.
    pub fn from_messages<I>(messages: I) -> Result<Self, LogError>
    where
        I: IntoIterator<Item = Message>,
    {
        let mut log = Self::new();
        for message in messages {
            log.append(message)?;
        }
        Ok(log)
    }

    /// Append a message received after every message already in the log.
    pub fn append(&mut self, message: Message) -> Result<(), LogError> {
        if let Err(e) = self.index.push(message.time_received()) {
            debug!("Rejected message on {}: {}", message.topic(), e);
            return Err(e);
        }
        self.messages.push(message);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    /// Receipt times of every message, ascending.
    pub fn index(&self) -> &TimeIndex {
        &self.index
    }

    /// Message at `position` in receipt-time order.
    pub fn get(&self, position: usize) -> Option<&Message> {
        self.messages.get(position)
    }

    /// Distinct topic names in the log.
    pub fn topics(&self) -> BTreeSet<&str> {
        self.messages.iter().map(Message::topic).collect()
    }

    /// Messages matching `options`, in receipt-time order.
    ///
    /// The time range resolves against the receipt times of the selected
    /// topics only, so a range edge never lands on another topic's message.
    pub fn query(&self, options: &QueryOptions) -> Batch<'_> {
        let matcher = RangeMatcher::new(options.range);
        let positions = match &options.topics {
            TopicSelection::All => {
                let span = matcher.resolve(&self.index);
                trace!(
                    "Query over {} messages resolved to positions {:?}",
                    self.messages.len(),
                    span
                );
                Positions::Span(span)
            }
            TopicSelection::Only(_) => {
                let selected: Vec<usize> = self
                    .messages
                    .iter()
                    .enumerate()
                    .filter(|(_, m)| options.topics.matches(m.topic()))
                    .map(|(position, _)| position)
                    .collect();
                let times: Vec<Nanoseconds> = selected
                    .iter()
                    .map(|&position| self.messages[position].time_received())
                    .collect();
                let window = matcher.resolve_sorted(&times);
                trace!(
                    "Query over {} of {} messages resolved to {:?}",
                    selected.len(),
                    self.messages.len(),
                    window
                );
                Positions::Picked(selected[window].to_vec().into_iter())
            }
        };
        Batch {
            messages: &self.messages,
            positions,
        }
    }
}

/// Log positions a query yields.
#[derive(Debug, Clone)]
enum Positions {
    Span(Range<usize>),
    Picked(vec::IntoIter<usize>),
}

/// Iterator over the messages selected by a query.
///
/// Yields messages in receipt-time order.
#[derive(Debug, Clone)]
pub struct Batch<'a> {
    messages: &'a [Message],
    positions: Positions,
}

impl<'a> Iterator for Batch<'a> {
    type Item = &'a Message;

    fn next(&mut self) -> Option<Self::Item> {
        let position = match &mut self.positions {
            Positions::Span(span) => span.next(),
            Positions::Picked(picked) => picked.next(),
        }?;
        self.messages.get(position)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        match &self.positions {
            Positions::Span(span) => span.size_hint(),
            Positions::Picked(picked) => picked.size_hint(),
        }
    }
}

impl DoubleEndedIterator for Batch<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let position = match &mut self.positions {
            Positions::Span(span) => span.next_back(),
            Positions::Picked(picked) => picked.next_back(),
        }?;
        self.messages.get(position)
    }
}

impl ExactSizeIterator for Batch<'_> {}

impl FusedIterator for Batch<'_> {}
