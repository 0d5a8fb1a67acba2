//! # busprobe-log
//!
//! Select recorded messages by time when the exact timestamps you ask for
//! may not exist in the data.
//!
//! A [`QualifiedTimeRange`](busprobe_types::QualifiedTimeRange) names a window
//! whose edges say which neighbouring message to use when nothing was
//! recorded exactly at the edge. [`RangeMatcher`] resolves such a window
//! against a [`TimeIndex`], and [`MessageLog`] applies it to stored messages.
//!
//! ## Example
//!
//! ```rust
//! use busprobe_log::{MessageLog, QueryOptions};
//! use busprobe_types::{Message, Nanoseconds, QualifiedTime, QualifiedTimeRange, Qualifier};
//!
//! let mut log = MessageLog::new();
//! for (t, topic) in [(10, "/imu"), (20, "/gps"), (30, "/imu"), (40, "/imu")] {
//!     log.append(Message::new(Nanoseconds(t), Vec::<u8>::new(), "Sample", topic)).unwrap();
//! }
//!
//! // Everything on /imu up to 25ns, ending at the last message before then.
//! let finish = QualifiedTime::new(Nanoseconds(25), Qualifier::ClosestBefore);
//! let range = QualifiedTimeRange::until(finish);
//! let options = QueryOptions::all().topic("/imu").range(range);
//!
//! let times: Vec<_> = log.query(&options).map(|m| m.time_received()).collect();
//! assert_eq!(times, vec![Nanoseconds(10)]);
//! ```

mod error;
mod index;
mod log;
mod matcher;

pub use error::LogError;
pub use index::TimeIndex;
pub use log::{Batch, MessageLog, QueryOptions, TopicSelection};
pub use matcher::RangeMatcher;
