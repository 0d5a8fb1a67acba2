//! Time representation shared by messages, publication stamps and queries.
//!
//! Nanoseconds are the canonical unit. Values are signed and measured from an
//! arbitrary epoch, so zero is an ordinary time and never means "unset".

use core::fmt;
use core::ops::{Add, Sub};
use core::time::Duration;

/// Signed nanosecond count since an arbitrary epoch.
///
/// An `i64` covers roughly 292 years either side of the epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
#[cfg_attr(feature = "minicbor", cbor(transparent))]
pub struct Nanoseconds(#[cfg_attr(feature = "minicbor", n(0))] pub i64);

impl Nanoseconds {
    /// The epoch itself.
    pub const ZERO: Self = Self(0);

    /// Create from nanoseconds.
    pub const fn from_nanos(nanos: i64) -> Self {
        Self(nanos)
    }

    /// Create from microseconds, saturating at the `i64` bounds.
    pub const fn from_micros(micros: i64) -> Self {
        Self(micros.saturating_mul(1_000))
    }

    /// Create from milliseconds, saturating at the `i64` bounds.
    pub const fn from_millis(millis: i64) -> Self {
        Self(millis.saturating_mul(1_000_000))
    }

    /// Create from seconds, saturating at the `i64` bounds.
    pub const fn from_secs(secs: i64) -> Self {
        Self(secs.saturating_mul(1_000_000_000))
    }

    /// Get the value in nanoseconds.
    pub const fn as_nanos(&self) -> i64 {
        self.0
    }

    /// Get the value in milliseconds (truncated toward zero).
    pub const fn as_millis(&self) -> i64 {
        self.0 / 1_000_000
    }

    /// Get the value in fractional milliseconds.
    pub fn as_millis_f64(&self) -> f64 {
        self.0 as f64 / 1_000_000.0
    }

    /// Convert to a standard Duration.
    ///
    /// Returns `None` for negative values, which `Duration` cannot hold.
    pub fn to_duration(&self) -> Option<Duration> {
        u64::try_from(self.0).ok().map(Duration::from_nanos)
    }

    /// Signed difference `self - earlier`, or `None` on overflow.
    pub const fn checked_sub(&self, earlier: Nanoseconds) -> Option<Nanoseconds> {
        match self.0.checked_sub(earlier.0) {
            Some(diff) => Some(Self(diff)),
            None => None,
        }
    }
}

impl From<Duration> for Nanoseconds {
    /// Saturates at `i64::MAX` for durations beyond ~292 years.
    fn from(d: Duration) -> Self {
        Self(i64::try_from(d.as_nanos()).unwrap_or(i64::MAX))
    }
}

impl Add for Nanoseconds {
    type Output = Nanoseconds;

    fn add(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sub for Nanoseconds {
    type Output = Nanoseconds;

    fn sub(self, rhs: Self) -> Self::Output {
        Self(self.0.saturating_sub(rhs.0))
    }
}

impl fmt::Display for Nanoseconds {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ns", self.0)
    }
}
