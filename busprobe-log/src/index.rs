//! Ascending index of receipt timestamps.

use busprobe_types::Nanoseconds;

use crate::LogError;

/// Strictly ascending sequence of timestamps.
///
/// Range queries rely on the index being sorted and free of duplicates, so
/// both are checked on construction and on every [`push`](Self::push).
///
/// # Example
///
/// ```rust
/// use busprobe_log::TimeIndex;
/// use busprobe_types::Nanoseconds;
///
/// let mut index = TimeIndex::new(vec![Nanoseconds(10), Nanoseconds(20)]).unwrap();
/// index.push(Nanoseconds(30)).unwrap();
/// assert!(index.push(Nanoseconds(30)).is_err());
/// assert_eq!(index.len(), 3);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TimeIndex {
    entries: Vec<Nanoseconds>,
}

impl TimeIndex {
    /// Create an empty index.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build an index from timestamps, rejecting any entry that is not
    /// strictly later than its predecessor.
    pub fn new(entries: Vec<Nanoseconds>) -> Result<Self, LogError> {
        if let Some(position) = entries.windows(2).position(|w| w[1] <= w[0]) {
            return Err(LogError::UnorderedIndex {
                position: position + 1,
                previous: entries[position],
                value: entries[position + 1],
            });
        }
        Ok(Self { entries })
    }

    /// Append a timestamp. It must be later than the last entry.
    pub fn push(&mut self, time: Nanoseconds) -> Result<(), LogError> {
        if let Some(&last) = self.entries.last() {
            if time <= last {
                return Err(LogError::UnorderedIndex {
                    position: self.entries.len(),
                    previous: last,
                    value: time,
                });
            }
        }
        self.entries.push(time);
        Ok(())
    }

    /// The timestamps, in ascending order.
    pub fn as_slice(&self) -> &[Nanoseconds] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn first(&self) -> Option<Nanoseconds> {
        self.entries.first().copied()
    }

    pub fn last(&self) -> Option<Nanoseconds> {
        self.entries.last().copied()
    }
}

impl AsRef<[Nanoseconds]> for TimeIndex {
    fn as_ref(&self) -> &[Nanoseconds] {
        &self.entries
    }
}

impl TryFrom<Vec<Nanoseconds>> for TimeIndex {
    type Error = LogError;

    fn try_from(entries: Vec<Nanoseconds>) -> Result<Self, Self::Error> {
        Self::new(entries)
    }
}
