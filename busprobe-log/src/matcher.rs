//! Resolution of qualified time ranges against a time index.

use std::ops::Range;

use busprobe_types::{Direction, Nanoseconds, QualifiedTime, QualifiedTimeRange};
use tracing::trace;

use crate::TimeIndex;

/// Resolves a [`QualifiedTimeRange`] into the entries of a [`TimeIndex`] it
/// selects.
///
/// Each endpoint is located with a binary search. An exact hit is always
/// included. Otherwise the qualifier picks the neighbouring entry:
///
/// | qualifier family | start edge             | finish edge             |
/// |------------------|------------------------|-------------------------|
/// | before           | greatest entry `< t`   | greatest entry `<= t`   |
/// | after            | smallest entry `> t`   | smallest entry `>= t`   |
///
/// An indeterminate start selects from the first entry and an indeterminate
/// finish selects through the last. If an edge has no neighbour in the
/// required direction, or the resolved bounds cross, nothing is selected.
/// Invalid ranges select nothing.
///
/// # Example
///
/// ```rust
/// use busprobe_log::{RangeMatcher, TimeIndex};
/// use busprobe_types::{Nanoseconds, QualifiedTime, QualifiedTimeRange, Qualifier};
///
/// let times = [10, 20, 30, 40].map(Nanoseconds);
/// let index = TimeIndex::new(times.to_vec()).unwrap();
///
/// let finish = QualifiedTime::new(Nanoseconds(25), Qualifier::ClosestBefore);
/// let range = QualifiedTimeRange::until(finish);
/// let selected = RangeMatcher::new(range).select(&index);
/// assert_eq!(selected, &[Nanoseconds(10), Nanoseconds(20)]);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RangeMatcher {
    range: QualifiedTimeRange,
}

/// Which side of the window an endpoint closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Edge {
    Start,
    Finish,
}

impl RangeMatcher {
    pub const fn new(range: QualifiedTimeRange) -> Self {
        Self { range }
    }

    pub fn range(&self) -> &QualifiedTimeRange {
        &self.range
    }

    /// Positions in `index` selected by the range.
    ///
    /// The returned range is empty when nothing matches.
    pub fn resolve(&self, index: &TimeIndex) -> Range<usize> {
        resolve_slice(&self.range, index.as_slice())
    }

    /// Like [`resolve`](Self::resolve), over timestamps already known to be
    /// strictly ascending.
    pub(crate) fn resolve_sorted(&self, entries: &[Nanoseconds]) -> Range<usize> {
        resolve_slice(&self.range, entries)
    }

    /// Timestamps in `index` selected by the range, in ascending order.
    pub fn select<'a>(&self, index: &'a TimeIndex) -> &'a [Nanoseconds] {
        &index.as_slice()[self.resolve(index)]
    }

    /// Whether `index` holds any entry selected by the range.
    pub fn matches_any(&self, index: &TimeIndex) -> bool {
        !self.resolve(index).is_empty()
    }
}

impl From<QualifiedTimeRange> for RangeMatcher {
    fn from(range: QualifiedTimeRange) -> Self {
        Self::new(range)
    }
}

fn resolve_slice(range: &QualifiedTimeRange, entries: &[Nanoseconds]) -> Range<usize> {
    if !range.is_valid() || entries.is_empty() {
        return 0..0;
    }

    let (Some(lower), Some(upper)) = (
        bound(range.start(), entries, Edge::Start),
        bound(range.finish(), entries, Edge::Finish),
    ) else {
        trace!("Range {:?} has no content at one edge", range);
        return 0..0;
    };

    if lower > upper {
        trace!("Range {:?} resolved to crossed bounds {}..={}", range, lower, upper);
        return 0..0;
    }
    lower..upper + 1
}

/// Position of the entry an endpoint resolves to, if any.
fn bound(endpoint: &QualifiedTime, entries: &[Nanoseconds], edge: Edge) -> Option<usize> {
    let Some((time, qualifier)) = endpoint.get() else {
        return match edge {
            Edge::Start => Some(0),
            Edge::Finish => Some(entries.len() - 1),
        };
    };

    match entries.binary_search(&time) {
        Ok(exact) => Some(exact),
        // `insert` is the first position holding an entry greater than `time`.
        Err(insert) => match qualifier.direction() {
            Direction::Before => insert.checked_sub(1),
            Direction::After => (insert < entries.len()).then_some(insert),
        },
    }
}
