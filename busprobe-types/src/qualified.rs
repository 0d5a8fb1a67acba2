//! Qualified times and time ranges for selecting recorded messages.
//!
//! Time is continuous, so the exact stamp of a desired message is rarely
//! known in advance. A [`QualifiedTime`] pairs a time with a [`Qualifier`]
//! that says how to resolve it against the stamps actually present in a log.
//! Two qualified times make a [`QualifiedTimeRange`].

use crate::Nanoseconds;

/// Determines how a qualified time is matched against recorded stamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
#[cfg_attr(feature = "minicbor", cbor(index_only))]
pub enum Qualifier {
    /// An exact match, or else the closest stamp before the time.
    #[default]
    #[cfg_attr(feature = "minicbor", n(0))]
    OrClosestBefore,

    /// The closest stamp before the time.
    #[cfg_attr(feature = "minicbor", n(1))]
    ClosestBefore,

    /// An exact match, or else the closest stamp after the time.
    #[cfg_attr(feature = "minicbor", n(2))]
    OrClosestAfter,

    /// The closest stamp after the time.
    #[cfg_attr(feature = "minicbor", n(3))]
    ClosestAfter,
}

/// Which side of a time a qualifier searches when there is no exact match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Before,
    After,
}

impl Qualifier {
    /// The side searched when no stamp matches exactly.
    pub const fn direction(&self) -> Direction {
        match self {
            Qualifier::OrClosestBefore | Qualifier::ClosestBefore => Direction::Before,
            Qualifier::OrClosestAfter | Qualifier::ClosestAfter => Direction::After,
        }
    }

    /// Whether the qualifier names exact matches explicitly.
    ///
    /// Range resolution accepts an exact hit for every qualifier, since an
    /// exact hit is trivially the closest stamp. This only reports which
    /// variant was chosen.
    pub const fn accepts_exact(&self) -> bool {
        matches!(self, Qualifier::OrClosestBefore | Qualifier::OrClosestAfter)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
struct TimePoint {
    #[cfg_attr(feature = "minicbor", n(0))]
    time: Nanoseconds,

    #[cfg_attr(feature = "minicbor", n(1))]
    qualifier: Qualifier,
}

/// A time stamp annotated with a [`Qualifier`], or no time at all.
///
/// An indeterminate time means "no bound": as the start of a range it
/// reaches back to the beginning of the log, as the finish it runs to the end.
///
/// Qualified times are not ordered against each other. Ordering only emerges
/// once a range is resolved against concrete stamps.
///
/// # Example
///
/// ```rust
/// use busprobe_types::{Nanoseconds, QualifiedTime, Qualifier};
///
/// let mut t = QualifiedTime::at(Nanoseconds::from_millis(250));
/// assert_eq!(t.qualifier(), Some(Qualifier::OrClosestBefore));
///
/// t.clear();
/// assert!(t.is_indeterminate());
/// assert_eq!(t.time(), None);
/// assert_eq!(t.qualifier(), None);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
#[cfg_attr(feature = "minicbor", cbor(transparent))]
pub struct QualifiedTime {
    #[cfg_attr(feature = "minicbor", n(0))]
    point: Option<TimePoint>,
}

impl QualifiedTime {
    /// Create a determinate qualified time.
    pub const fn new(time: Nanoseconds, qualifier: Qualifier) -> Self {
        Self {
            point: Some(TimePoint { time, qualifier }),
        }
    }

    /// Create a determinate time qualified with [`Qualifier::OrClosestBefore`].
    pub const fn at(time: Nanoseconds) -> Self {
        Self::new(time, Qualifier::OrClosestBefore)
    }

    /// Create an indeterminate time.
    pub const fn indeterminate() -> Self {
        Self { point: None }
    }

    /// Whether no time has been specified.
    pub const fn is_indeterminate(&self) -> bool {
        self.point.is_none()
    }

    /// The time stamp, unless indeterminate.
    pub fn time(&self) -> Option<Nanoseconds> {
        self.point.map(|p| p.time)
    }

    /// The qualifier, unless indeterminate.
    pub fn qualifier(&self) -> Option<Qualifier> {
        self.point.map(|p| p.qualifier)
    }

    /// The time and qualifier together, unless indeterminate.
    pub fn get(&self) -> Option<(Nanoseconds, Qualifier)> {
        self.point.map(|p| (p.time, p.qualifier))
    }

    /// Make this time determinate, replacing any previous value.
    pub fn set_time(&mut self, time: Nanoseconds, qualifier: Qualifier) {
        self.point = Some(TimePoint { time, qualifier });
    }

    /// Make this time indeterminate.
    pub fn clear(&mut self) {
        self.point = None;
    }
}

impl From<Nanoseconds> for QualifiedTime {
    fn from(time: Nanoseconds) -> Self {
        Self::at(time)
    }
}

/// A pair of qualified times forming a selection window.
///
/// Endpoints are always stored as given. Whether the window is currently
/// satisfiable is reported separately by [`is_valid`](Self::is_valid), so a
/// range can be built one endpoint at a time without spurious failures.
///
/// # Example
///
/// ```rust
/// use busprobe_types::{Nanoseconds, QualifiedTime, QualifiedTimeRange};
///
/// let mut range = QualifiedTimeRange::all_time();
///
/// // Setting the finish first leaves the range valid.
/// assert!(range.set_finish(QualifiedTime::at(Nanoseconds::from_secs(10))));
///
/// // A start after the finish is stored, but flagged.
/// assert!(!range.set_start(QualifiedTime::at(Nanoseconds::from_secs(20))));
/// assert_eq!(range.start().time(), Some(Nanoseconds::from_secs(20)));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
pub struct QualifiedTimeRange {
    #[cfg_attr(feature = "minicbor", n(0))]
    start: QualifiedTime,

    #[cfg_attr(feature = "minicbor", n(1))]
    finish: QualifiedTime,
}

impl QualifiedTimeRange {
    /// Create a range from two endpoints.
    pub const fn new(start: QualifiedTime, finish: QualifiedTime) -> Self {
        Self { start, finish }
    }

    /// A range that begins at `start` and never ends.
    pub const fn from_start(start: QualifiedTime) -> Self {
        Self::new(start, QualifiedTime::indeterminate())
    }

    /// A range that ends at `finish` and has no beginning.
    pub const fn until(finish: QualifiedTime) -> Self {
        Self::new(QualifiedTime::indeterminate(), finish)
    }

    /// A range with no beginning or end.
    pub const fn all_time() -> Self {
        Self::new(QualifiedTime::indeterminate(), QualifiedTime::indeterminate())
    }

    /// The start of the range.
    pub fn start(&self) -> &QualifiedTime {
        &self.start
    }

    /// The finish of the range.
    pub fn finish(&self) -> &QualifiedTime {
        &self.finish
    }

    /// Set the start. Returns whether the resulting range is valid.
    pub fn set_start(&mut self, start: QualifiedTime) -> bool {
        self.start = start;
        self.is_valid()
    }

    /// Set the finish. Returns whether the resulting range is valid.
    pub fn set_finish(&mut self, finish: QualifiedTime) -> bool {
        self.finish = finish;
        self.is_valid()
    }

    /// Set both endpoints. Returns whether the resulting range is valid.
    pub fn set_range(&mut self, start: QualifiedTime, finish: QualifiedTime) -> bool {
        self.start = start;
        self.finish = finish;
        self.is_valid()
    }

    /// Whether the finish is not provably earlier than the start.
    ///
    /// Only the raw times are compared; qualifiers play no part. A range with
    /// either endpoint indeterminate is always valid.
    pub fn is_valid(&self) -> bool {
        match (self.start.time(), self.finish.time()) {
            (Some(start), Some(finish)) => finish >= start,
            _ => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ns(v: i64) -> Nanoseconds {
        Nanoseconds::from_nanos(v)
    }

    const QUALIFIERS: [Qualifier; 4] = [
        Qualifier::OrClosestBefore,
        Qualifier::ClosestBefore,
        Qualifier::OrClosestAfter,
        Qualifier::ClosestAfter,
    ];

    #[test]
    fn default_qualifier_is_or_closest_before() {
        let t = QualifiedTime::at(ns(3));
        assert_eq!(t.get(), Some((ns(3), Qualifier::OrClosestBefore)));
        assert_eq!(QualifiedTime::from(ns(3)), t);
    }

    #[test]
    fn indeterminate_exposes_nothing() {
        let t = QualifiedTime::default();
        assert!(t.is_indeterminate());
        assert_eq!(t.time(), None);
        assert_eq!(t.qualifier(), None);
        assert_eq!(t.get(), None);
    }

    #[test]
    fn zero_time_is_determinate() {
        let t = QualifiedTime::at(Nanoseconds::ZERO);
        assert!(!t.is_indeterminate());
        assert_eq!(t.time(), Some(Nanoseconds::ZERO));
    }

    #[test]
    fn set_time_overwrites_and_clear_resets() {
        let mut t = QualifiedTime::indeterminate();
        t.set_time(ns(10), Qualifier::ClosestAfter);
        assert_eq!(t.get(), Some((ns(10), Qualifier::ClosestAfter)));

        t.set_time(ns(-4), Qualifier::ClosestBefore);
        assert_eq!(t.get(), Some((ns(-4), Qualifier::ClosestBefore)));

        t.clear();
        assert!(t.is_indeterminate());
    }

    #[test]
    fn qualifier_families() {
        assert_eq!(Qualifier::OrClosestBefore.direction(), Direction::Before);
        assert_eq!(Qualifier::ClosestBefore.direction(), Direction::Before);
        assert_eq!(Qualifier::OrClosestAfter.direction(), Direction::After);
        assert_eq!(Qualifier::ClosestAfter.direction(), Direction::After);

        assert!(Qualifier::OrClosestBefore.accepts_exact());
        assert!(!Qualifier::ClosestAfter.accepts_exact());
    }

    #[test]
    fn open_ranges_are_always_valid() {
        assert!(QualifiedTimeRange::all_time().is_valid());
        assert!(QualifiedTimeRange::default().is_valid());

        for q in QUALIFIERS {
            for t in [i64::MIN, -1, 0, 1, i64::MAX] {
                let qt = QualifiedTime::new(ns(t), q);
                assert!(QualifiedTimeRange::from_start(qt).is_valid());
                assert!(QualifiedTimeRange::until(qt).is_valid());
            }
        }
    }

    #[test]
    fn reversed_range_is_invalid_regardless_of_qualifiers() {
        for sq in QUALIFIERS {
            for fq in QUALIFIERS {
                let range = QualifiedTimeRange::new(
                    QualifiedTime::new(ns(20), sq),
                    QualifiedTime::new(ns(10), fq),
                );
                assert!(!range.is_valid(), "{sq:?} -> {fq:?}");
            }
        }
    }

    #[test]
    fn coincident_endpoints_are_valid() {
        let range = QualifiedTimeRange::new(
            QualifiedTime::new(ns(5), Qualifier::ClosestAfter),
            QualifiedTime::new(ns(5), Qualifier::ClosestBefore),
        );
        assert!(range.is_valid());
    }

    #[test]
    fn setters_store_even_when_invalid() {
        let mut range = QualifiedTimeRange::from_start(QualifiedTime::at(ns(100)));

        assert!(!range.set_finish(QualifiedTime::at(ns(50))));
        assert_eq!(range.finish().time(), Some(ns(50)));
        assert_eq!(range.start().time(), Some(ns(100)));

        assert!(range.set_start(QualifiedTime::indeterminate()));
        assert!(range.start().is_indeterminate());
    }

    #[test]
    fn set_range_roundtrips_every_combination() {
        let values = [
            QualifiedTime::indeterminate(),
            QualifiedTime::new(ns(1), Qualifier::ClosestBefore),
            QualifiedTime::new(ns(9), Qualifier::OrClosestAfter),
        ];

        for a in values {
            for b in values {
                let mut range = QualifiedTimeRange::all_time();
                let valid = range.set_range(a, b);
                assert_eq!(*range.start(), a);
                assert_eq!(*range.finish(), b);
                assert_eq!(valid, range.is_valid());

                // Repeated reads are stable.
                assert_eq!(range.start(), range.start());
                assert_eq!(range.finish(), range.finish());
            }
        }
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let range = QualifiedTimeRange::new(
            QualifiedTime::new(ns(7), Qualifier::ClosestAfter),
            QualifiedTime::indeterminate(),
        );
        let json = serde_json::to_string(&range).unwrap();
        let parsed: QualifiedTimeRange = serde_json::from_str(&json).unwrap();
        assert_eq!(range, parsed);
    }

    #[cfg(feature = "minicbor")]
    #[test]
    fn test_minicbor_roundtrip() {
        let range =
            QualifiedTimeRange::until(QualifiedTime::new(ns(-3), Qualifier::OrClosestAfter));
        let bytes = minicbor::to_vec(range).unwrap();
        let parsed: QualifiedTimeRange = minicbor::decode(&bytes).unwrap();
        assert_eq!(range, parsed);
    }
}
