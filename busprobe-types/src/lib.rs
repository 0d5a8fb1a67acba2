//! # busprobe-types
//!
//! Core types shared by the busprobe telemetry and message-log crates. This
//! crate defines the vocabulary both halves of the system speak: recorded
//! messages, publication metadata, qualified times and ranges used to select
//! messages from a log, and the statistics report emitted per topic.
//!
//! ## Design Goals
//!
//! - **Zero required dependencies**: Core types work without any serialization framework
//! - **Optional serialization**: Enable `serde` and/or `minicbor` features as needed
//! - **Explicit absence**: An indeterminate time is `None`, never a zero timestamp
//! - **Plain values**: Every type is an owned value with private state where it has invariants
//!
//! ## Features
//!
//! - `std` (default): Standard library support
//! - `serde`: JSON/MessagePack/etc. serialization via serde
//! - `minicbor`: Compact binary serialization via CBOR
//! - `all`: Enable all serialization formats
//!
//! ## Example
//!
//! ```rust
//! use busprobe_types::{Nanoseconds, QualifiedTime, QualifiedTimeRange, Qualifier};
//!
//! // Everything recorded from t=25ns onwards, starting at the first
//! // message strictly after 25ns if nothing was recorded exactly then.
//! let range = QualifiedTimeRange::from_start(QualifiedTime::new(
//!     Nanoseconds::from_nanos(25),
//!     Qualifier::ClosestAfter,
//! ));
//!
//! assert!(range.is_valid());
//! assert!(range.finish().is_indeterminate());
//! ```
//!
//! ## Report Format
//!
//! With the `yaml` feature, `TopicReport::to_yaml` produces the fixed-shape
//! YAML document consumed by external display tools. Field names and order
//! never change.

#![cfg_attr(not(feature = "std"), no_std)]

extern crate alloc;

mod message;
mod qualified;
mod report;
mod time;

pub use message::*;
pub use qualified::*;
pub use report::*;
pub use time::*;
