//! # busprobe-stats
//!
//! Per-topic publication statistics for a pub/sub subscriber.
//!
//! Every delivered publication carries the publisher's stamp and sequence
//! number. Feeding those into a [`TopicHandle`] tracks publication and
//! receive intervals, detects dropped messages per sender, and produces
//! reports that can be emitted periodically as YAML or JSON.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use busprobe_stats::{Monitor, Output};
//! use busprobe_types::{Nanoseconds, PublicationMetadata};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() {
//!     // Emit a report every second
//!     let monitor = Monitor::builder()
//!         .output(Output::file("topic_stats.yaml"))
//!         .interval(Duration::from_secs(1))
//!         .build();
//!
//!     // Enable statistics for a topic
//!     let imu = monitor.enable("/imu");
//!
//!     // Record each delivery as the subscriber receives it
//!     let meta = PublicationMetadata::new(Nanoseconds::from_millis(5), 1);
//!     imu.record("tcp://10.0.0.7:5001", &meta);
//!
//!     // Start background emission (non-blocking)
//!     monitor.start();
//!
//!     // ... your subscriber runs ...
//! }
//! ```
//!
//! ## Configuration
//!
//! A [`Monitor`] can also be built from a configuration file, with
//! `BUSPROBE_*` environment variables overriding file values. See
//! [`MonitorConfig`].

mod config;
mod handle;
mod monitor;
mod output;
mod state;
mod statistics;
mod topic;

pub use config::{ConfigError, MonitorConfig, OutputConfig};
pub use handle::TopicHandle;
#[cfg(feature = "tokio")]
pub use monitor::EmissionHandle;
pub use monitor::{Monitor, MonitorBuilder};
pub use output::Output;
pub use state::TopicRegistry;
pub use statistics::Statistics;
pub use topic::TopicStatistics;

// Re-export types for convenience
pub use busprobe_types::{IntervalSummary, PublicationMetadata, StatisticsReport, TopicReport};
