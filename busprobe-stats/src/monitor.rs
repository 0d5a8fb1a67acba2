//! The main Monitor type for collecting and emitting topic statistics.

use std::sync::Arc;
use std::time::Duration;

use busprobe_types::StatisticsReport;
#[cfg(feature = "tokio")]
use tracing::info;
use tracing::warn;

use crate::config::{ConfigError, MonitorConfig, OutputConfig};
use crate::handle::TopicHandle;
use crate::output::Output;
use crate::state::TopicRegistry;

const DEFAULT_INTERVAL: Duration = Duration::from_secs(1);

/// The main entry point for monitoring subscribed topics.
///
/// A Monitor owns the statistics of every enabled topic and periodically
/// emits a [`StatisticsReport`] to the configured outputs.
///
/// # Example
///
/// ```rust,no_run
/// use busprobe_stats::{Monitor, Output};
/// use busprobe_types::{Nanoseconds, PublicationMetadata};
/// use std::time::Duration;
///
/// #[tokio::main]
/// async fn main() {
///     let monitor = Monitor::builder()
///         .output(Output::file("topic_stats.yaml"))
///         .interval(Duration::from_secs(1))
///         .build();
///
///     let chatter = monitor.enable("/chatter");
///
///     // Start background emission
///     let emission = monitor.start();
///
///     // Feed deliveries from the subscriber
///     let meta = PublicationMetadata::new(Nanoseconds::from_millis(0), 1);
///     chatter.record("tcp://10.0.0.7:5001", &meta);
///
///     tokio::time::sleep(Duration::from_secs(5)).await;
///     emission.stop();
/// }
/// ```
#[derive(Debug)]
pub struct Monitor {
    registry: Arc<TopicRegistry>,
    outputs: Arc<Vec<Output>>,
    interval: Duration,
}

impl Monitor {
    /// Create a monitor with no outputs and a one second interval.
    pub fn new() -> Self {
        Self {
            registry: Arc::new(TopicRegistry::new()),
            outputs: Arc::new(Vec::new()),
            interval: DEFAULT_INTERVAL,
        }
    }

    /// Create a builder for configuring the monitor.
    pub fn builder() -> MonitorBuilder {
        MonitorBuilder::new()
    }

    /// Build a monitor from loaded configuration.
    ///
    /// The configuration is validated first. Every topic listed in it is
    /// enabled immediately.
    pub fn from_config(config: &MonitorConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut builder = Self::builder().interval(config.interval());
        if let Some(capacity) = config.sender_capacity {
            builder = builder.sender_capacity(capacity);
        }
        for output in &config.outputs {
            builder = builder.output(Output::from(output));
        }

        let monitor = builder.build();
        for topic in &config.topics {
            monitor.enable(topic);
        }
        Ok(monitor)
    }

    /// Start monitoring a topic and get a handle for recording publications.
    ///
    /// If the topic is already monitored, returns a handle to the existing
    /// statistics.
    pub fn enable(&self, topic: &str) -> TopicHandle {
        self.registry.enable(topic)
    }

    /// Stop monitoring a topic and discard its statistics.
    ///
    /// Returns `true` if the topic was being monitored. Existing handles keep
    /// recording into their own state, but it no longer appears in reports.
    pub fn disable(&self, topic: &str) -> bool {
        self.registry.disable(topic)
    }

    /// Get a handle to a monitored topic without enabling it.
    pub fn get(&self, topic: &str) -> Option<TopicHandle> {
        self.registry.get(topic)
    }

    /// Names of all monitored topics.
    pub fn topics(&self) -> Vec<String> {
        self.registry.topics()
    }

    /// Collect a report of every monitored topic.
    ///
    /// Useful when reports are emitted manually rather than in the background.
    pub fn collect(&self) -> StatisticsReport {
        self.registry.collect()
    }

    /// Start background emission of reports.
    ///
    /// Spawns a tokio task that collects a report every interval and emits it
    /// to all configured outputs. Must be called from within a tokio runtime.
    ///
    /// Returns a handle that stops the emission.
    #[cfg(feature = "tokio")]
    pub fn start(&self) -> EmissionHandle {
        use tokio::sync::watch;

        let (stop_tx, stop_rx) = watch::channel(false);
        let registry = self.registry.clone();
        let outputs = self.outputs.clone();
        let interval = self.interval;

        info!(
            "Starting statistics emission every {:?} to {} output(s)",
            interval,
            outputs.len()
        );

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            let mut stop_rx = stop_rx;

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let report = registry.collect();
                        emit_all(&outputs, &report).await;
                    }
                    changed = stop_rx.changed() => {
                        if changed.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                }
            }

            info!("Statistics emission stopped");
        });

        EmissionHandle { stop_tx }
    }

    /// Emit a report to all outputs immediately.
    #[cfg(feature = "tokio")]
    pub async fn emit_now(&self) {
        let report = self.registry.collect();
        emit_all(&self.outputs, &report).await;
    }
}

#[cfg(feature = "tokio")]
async fn emit_all(outputs: &[Output], report: &StatisticsReport) {
    for output in outputs {
        if let Err(e) = output.emit(report).await {
            warn!("Failed to emit statistics to {}: {}", output, e);
        }
    }
}

impl Default for Monitor {
    fn default() -> Self {
        Self::new()
    }
}

impl From<&OutputConfig> for Output {
    fn from(config: &OutputConfig) -> Self {
        match config {
            OutputConfig::File { path } => Output::file(path.clone()),
            OutputConfig::Tcp { addr } => Output::tcp(addr.clone()),
            OutputConfig::Stdout => Output::Stdout,
        }
    }
}

/// Builder for configuring a Monitor.
#[derive(Debug, Default)]
pub struct MonitorBuilder {
    outputs: Vec<Output>,
    interval: Option<Duration>,
    sender_capacity: Option<usize>,
}

impl MonitorBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an output destination.
    ///
    /// Multiple outputs can be added; reports are emitted to all of them.
    pub fn output(mut self, output: Output) -> Self {
        self.outputs.push(output);
        self
    }

    /// Set the emission interval.
    ///
    /// Defaults to 1 second if not specified. A zero interval is replaced by
    /// the default when the monitor is built.
    pub fn interval(mut self, interval: Duration) -> Self {
        self.interval = Some(interval);
        self
    }

    /// Bound the number of senders remembered per topic.
    ///
    /// When a topic is at capacity, the least recently seen sender is
    /// forgotten to make room for a new one.
    pub fn sender_capacity(mut self, capacity: usize) -> Self {
        self.sender_capacity = Some(capacity);
        self
    }

    /// Build the monitor.
    pub fn build(self) -> Monitor {
        let registry = match self.sender_capacity {
            Some(capacity) => TopicRegistry::with_sender_capacity(capacity),
            None => TopicRegistry::new(),
        };
        let interval = match self.interval {
            Some(interval) if interval.is_zero() => {
                warn!("Zero emission interval, using {:?}", DEFAULT_INTERVAL);
                DEFAULT_INTERVAL
            }
            Some(interval) => interval,
            None => DEFAULT_INTERVAL,
        };
        Monitor {
            registry: Arc::new(registry),
            outputs: Arc::new(self.outputs),
            interval,
        }
    }
}

/// Handle for controlling background emission.
///
/// Call `stop()` or drop the handle to stop emission.
#[cfg(feature = "tokio")]
#[derive(Debug)]
pub struct EmissionHandle {
    stop_tx: tokio::sync::watch::Sender<bool>,
}

#[cfg(feature = "tokio")]
impl EmissionHandle {
    /// Stop background emission.
    pub fn stop(self) {
        let _ = self.stop_tx.send(true);
    }
}
