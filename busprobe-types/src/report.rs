//! Statistics reports - the fixed-shape output of topic monitoring.

use alloc::collections::BTreeMap;
use alloc::string::String;

/// Rate and spread of the intervals between consecutive messages.
///
/// Intervals are measured in milliseconds. `min` and `max` are `None` until
/// at least one interval has been observed; `avg_hz` and `std_deviation` are
/// NaN in that case.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
pub struct IntervalSummary {
    /// Average rate in Hz, derived from the average interval.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "nan_from_null"))]
    #[cfg_attr(feature = "minicbor", n(0))]
    pub avg_hz: f64,

    /// Standard deviation of the interval in milliseconds.
    #[cfg_attr(feature = "serde", serde(deserialize_with = "nan_from_null"))]
    #[cfg_attr(feature = "minicbor", n(1))]
    pub std_deviation: f64,

    /// Shortest interval in milliseconds.
    #[cfg_attr(
        feature = "serde",
        serde(serialize_with = "nan_for_none", deserialize_with = "none_from_nan")
    )]
    #[cfg_attr(feature = "minicbor", n(2))]
    pub min: Option<f64>,

    /// Longest interval in milliseconds.
    #[cfg_attr(
        feature = "serde",
        serde(serialize_with = "nan_for_none", deserialize_with = "none_from_nan")
    )]
    #[cfg_attr(feature = "minicbor", n(3))]
    pub max: Option<f64>,
}

impl IntervalSummary {
    /// A summary with no samples.
    pub const fn empty() -> Self {
        Self {
            avg_hz: f64::NAN,
            std_deviation: f64::NAN,
            min: None,
            max: None,
        }
    }

    /// Whether any interval has been observed.
    pub fn has_samples(&self) -> bool {
        self.min.is_some()
    }
}

impl Default for IntervalSummary {
    fn default() -> Self {
        Self::empty()
    }
}

/// Statistics for a single monitored topic.
///
/// # Example
///
/// ```rust
/// # #[cfg(feature = "yaml")] {
/// use busprobe_types::{IntervalSummary, TopicReport};
///
/// let report = TopicReport {
///     dropped_message_count: 2,
///     publication_statistics: IntervalSummary::empty(),
///     receive_statistics: IntervalSummary::empty(),
/// };
///
/// let yaml = report.to_yaml().unwrap();
/// assert!(yaml.starts_with("dropped_message_count: 2\n"));
/// # }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
pub struct TopicReport {
    /// Messages inferred lost from gaps in sender sequence numbers.
    #[cfg_attr(feature = "minicbor", n(0))]
    pub dropped_message_count: u64,

    /// Intervals between publisher stamps.
    #[cfg_attr(feature = "minicbor", n(1))]
    pub publication_statistics: IntervalSummary,

    /// Intervals between local receipt times.
    #[cfg_attr(feature = "minicbor", n(2))]
    pub receive_statistics: IntervalSummary,
}

#[cfg(feature = "yaml")]
impl TopicReport {
    /// Render the report as a YAML document.
    ///
    /// The field set and order are fixed:
    ///
    /// ```yaml
    /// dropped_message_count: 0
    /// publication_statistics:
    ///   avg_hz: 10.0
    ///   std_deviation: 0.0
    ///   min: 100.0
    ///   max: 100.0
    /// receive_statistics:
    ///   avg_hz: 10.0
    ///   std_deviation: 0.0
    ///   min: 100.0
    ///   max: 100.0
    /// ```
    ///
    /// Non-finite values render as `.nan`, `.inf` or `-.inf`. A missing
    /// `min` or `max` renders as `.nan`.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

/// A point-in-time view of every monitored topic.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
pub struct StatisticsReport {
    /// Unix timestamp in milliseconds when this report was collected.
    #[cfg_attr(feature = "minicbor", n(0))]
    pub timestamp_ms: u64,

    /// Report for each topic, keyed by topic name.
    #[cfg_attr(feature = "minicbor", n(1))]
    pub topics: BTreeMap<String, TopicReport>,
}

impl StatisticsReport {
    /// Create an empty report with the current timestamp.
    #[cfg(feature = "std")]
    pub fn new() -> Self {
        Self::with_timestamp(current_timestamp_ms())
    }

    /// Create an empty report with a specific timestamp.
    pub fn with_timestamp(timestamp_ms: u64) -> Self {
        Self {
            timestamp_ms,
            topics: BTreeMap::new(),
        }
    }

    /// Create a builder for constructing reports.
    pub fn builder() -> StatisticsReportBuilder {
        StatisticsReportBuilder::new()
    }

    /// Check if the report is empty (no topics).
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }

    /// Number of topics in the report.
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    /// Get the report for a specific topic.
    pub fn get(&self, topic: &str) -> Option<&TopicReport> {
        self.topics.get(topic)
    }

    /// Total dropped messages across all topics.
    pub fn total_dropped(&self) -> u64 {
        self.topics.values().map(|t| t.dropped_message_count).sum()
    }

    /// Render every topic as one YAML document.
    ///
    /// Each topic's report is nested under its name in a `topics` mapping,
    /// using the same field order as [`TopicReport::to_yaml`].
    #[cfg(feature = "yaml")]
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

#[cfg(feature = "std")]
impl Default for StatisticsReport {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for constructing `StatisticsReport` instances.
#[derive(Debug, Default)]
pub struct StatisticsReportBuilder {
    timestamp_ms: Option<u64>,
    topics: BTreeMap<String, TopicReport>,
}

impl StatisticsReportBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a specific timestamp (milliseconds since Unix epoch).
    pub fn timestamp_ms(mut self, ts: u64) -> Self {
        self.timestamp_ms = Some(ts);
        self
    }

    /// Add a topic report.
    pub fn topic(mut self, name: impl Into<String>, report: TopicReport) -> Self {
        self.topics.insert(name.into(), report);
        self
    }

    /// Build the report.
    #[cfg(feature = "std")]
    pub fn build(self) -> StatisticsReport {
        StatisticsReport {
            timestamp_ms: self.timestamp_ms.unwrap_or_else(current_timestamp_ms),
            topics: self.topics,
        }
    }

    /// Build the report with a specific timestamp (for no_std).
    #[cfg(not(feature = "std"))]
    pub fn build(self) -> StatisticsReport {
        StatisticsReport {
            timestamp_ms: self.timestamp_ms.unwrap_or(0),
            topics: self.topics,
        }
    }
}

/// Get current timestamp in milliseconds since Unix epoch.
#[cfg(feature = "std")]
pub fn current_timestamp_ms() -> u64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// JSON has no NaN; serde_json writes it as `null`.
#[cfg(feature = "serde")]
fn nan_from_null<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

#[cfg(feature = "serde")]
fn nan_for_none<S>(value: &Option<f64>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    serializer.serialize_f64(value.unwrap_or(f64::NAN))
}

/// Accepts `null` (JSON) or `.nan` (YAML) for a missing extremum.
#[cfg(feature = "serde")]
fn none_from_nan<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    use serde::Deserialize;
    Ok(Option::<f64>::deserialize(deserializer)?.filter(|v| !v.is_nan()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(avg_hz: f64, std: f64, min: f64, max: f64) -> IntervalSummary {
        IntervalSummary {
            avg_hz,
            std_deviation: std,
            min: Some(min),
            max: Some(max),
        }
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn topic_yaml_has_fixed_shape() {
        let report = TopicReport {
            dropped_message_count: 3,
            publication_statistics: summary(10.0, 0.5, 99.5, 100.5),
            receive_statistics: summary(20.0, 0.0, 50.0, 50.0),
        };

        let expected = "\
dropped_message_count: 3
publication_statistics:
  avg_hz: 10.0
  std_deviation: 0.5
  min: 99.5
  max: 100.5
receive_statistics:
  avg_hz: 20.0
  std_deviation: 0.0
  min: 50.0
  max: 50.0
";
        assert_eq!(report.to_yaml().unwrap(), expected);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn empty_summary_renders_nan() {
        let yaml = TopicReport::default().to_yaml().unwrap();
        assert_eq!(yaml.lines().count(), 11);
        assert_eq!(yaml.matches(".nan").count(), 8);
        assert!(yaml.starts_with("dropped_message_count: 0\n"));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn infinite_values_render_as_yaml_infinity() {
        let report = TopicReport {
            dropped_message_count: 0,
            publication_statistics: summary(f64::INFINITY, 0.0, 0.0, 0.0),
            receive_statistics: summary(f64::NEG_INFINITY, 0.0, 0.0, 0.0),
        };
        let yaml = report.to_yaml().unwrap();
        assert!(yaml.contains("  avg_hz: .inf\n"));
        assert!(yaml.contains("  avg_hz: -.inf\n"));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn topic_yaml_parses_back() {
        let report = TopicReport {
            dropped_message_count: 9,
            publication_statistics: summary(4.0, 1.25, 200.0, 300.0),
            receive_statistics: IntervalSummary::empty(),
        };

        let parsed: TopicReport = serde_yaml::from_str(&report.to_yaml().unwrap()).unwrap();
        assert_eq!(parsed.dropped_message_count, 9);
        assert_eq!(parsed.publication_statistics, report.publication_statistics);
        assert!(parsed.receive_statistics.avg_hz.is_nan());
        assert_eq!(parsed.receive_statistics.min, None);
        assert_eq!(parsed.receive_statistics.max, None);
    }

    #[test]
    fn summary_has_samples() {
        assert!(!IntervalSummary::empty().has_samples());
        assert!(summary(1.0, 0.0, 1.0, 1.0).has_samples());
    }

    #[test]
    fn test_report_builder() {
        let report = StatisticsReport::builder()
            .timestamp_ms(1703160000000)
            .topic(
                "/a",
                TopicReport {
                    dropped_message_count: 2,
                    ..Default::default()
                },
            )
            .topic(
                "/b",
                TopicReport {
                    dropped_message_count: 5,
                    ..Default::default()
                },
            )
            .build();

        assert_eq!(report.len(), 2);
        assert_eq!(report.timestamp_ms, 1703160000000);
        assert_eq!(report.total_dropped(), 7);
        assert_eq!(report.get("/b").map(|t| t.dropped_message_count), Some(5));
        assert!(report.get("/c").is_none());
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn report_yaml_nests_topics_by_name() {
        let report = StatisticsReport::builder()
            .timestamp_ms(42)
            .topic("/chatter", TopicReport::default())
            .build();

        let yaml = report.to_yaml().unwrap();
        assert!(yaml.starts_with("timestamp_ms: 42\ntopics:\n"));
        assert!(yaml.contains("    dropped_message_count: 0\n"));
        assert!(yaml.contains("      avg_hz: .nan\n"));
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn report_yaml_parses_back_with_unusual_topic_names() {
        let names = [
            "/a\rb",
            "/bell\u{7}",
            "/tab\tx",
            "/odd \"name\"",
            "/line\nbreak",
            "/colon: x",
        ];
        let mut builder = StatisticsReport::builder().timestamp_ms(5);
        for (i, name) in names.iter().enumerate() {
            builder = builder.topic(
                *name,
                TopicReport {
                    dropped_message_count: i as u64,
                    publication_statistics: summary(1.0, 0.0, 1000.0, 1000.0),
                    receive_statistics: summary(2.0, 0.5, 400.0, 600.0),
                },
            );
        }
        let report = builder.build();

        let yaml = report.to_yaml().unwrap();
        let parsed: StatisticsReport = serde_yaml::from_str(&yaml).unwrap();
        assert_eq!(parsed, report);
    }

    #[cfg(feature = "yaml")]
    #[test]
    fn empty_report_yaml() {
        let report = StatisticsReport::with_timestamp(7);
        assert!(report.is_empty());
        assert_eq!(report.to_yaml().unwrap(), "timestamp_ms: 7\ntopics: {}\n");
    }

    #[cfg(feature = "std")]
    #[test]
    fn new_report_has_current_timestamp() {
        let report = StatisticsReport::new();
        assert!(report.timestamp_ms > 0);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_serde_roundtrip() {
        let report = StatisticsReport::builder()
            .timestamp_ms(1)
            .topic(
                "/t",
                TopicReport {
                    dropped_message_count: 1,
                    publication_statistics: summary(5.0, 1.0, 150.0, 250.0),
                    receive_statistics: summary(5.0, 1.0, 150.0, 250.0),
                },
            )
            .build();

        let json = serde_json::to_string(&report).unwrap();
        let parsed: StatisticsReport = serde_json::from_str(&json).unwrap();
        assert_eq!(report, parsed);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn nan_survives_json_as_null() {
        let report = TopicReport::default();
        let json = serde_json::to_string(&report).unwrap();
        assert!(json.contains("\"avg_hz\":null"));

        let parsed: TopicReport = serde_json::from_str(&json).unwrap();
        assert!(parsed.publication_statistics.avg_hz.is_nan());
        assert!(parsed.receive_statistics.std_deviation.is_nan());
        assert_eq!(parsed.publication_statistics.min, None);
    }

    #[cfg(feature = "minicbor")]
    #[test]
    fn test_minicbor_roundtrip() {
        let report = StatisticsReport::builder()
            .timestamp_ms(1)
            .topic("/t", TopicReport::default())
            .build();

        let bytes = minicbor::to_vec(&report).unwrap();
        let parsed: StatisticsReport = minicbor::decode(&bytes).unwrap();

        // NaN never compares equal, so check the parts that can.
        assert_eq!(parsed.timestamp_ms, 1);
        assert_eq!(parsed.get("/t").map(|t| t.dropped_message_count), Some(0));
        assert!(parsed.get("/t").is_some_and(|t| t.publication_statistics.avg_hz.is_nan()));
    }
}
