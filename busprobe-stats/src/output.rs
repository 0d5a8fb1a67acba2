//! Output backends for emitting statistics reports.

use std::path::PathBuf;

use busprobe_types::StatisticsReport;

/// Output destination for reports.
///
/// Configure where the monitor should emit reports.
#[derive(Debug)]
pub enum Output {
    /// Write reports to a YAML file.
    ///
    /// The file is overwritten with each report.
    File(PathBuf),

    /// Send reports to a TCP server.
    ///
    /// Each report is sent as a newline-delimited JSON message.
    Tcp(String),

    /// Print each report's YAML to standard output.
    Stdout,

    /// Send reports through a channel.
    ///
    /// Use `Output::channel()` to create this variant and get the receiver.
    #[cfg(feature = "tokio")]
    Channel(tokio::sync::mpsc::Sender<StatisticsReport>),
}

impl Output {
    /// Create a file output.
    ///
    /// # Example
    ///
    /// ```rust
    /// use busprobe_stats::Output;
    ///
    /// let output = Output::file("topic_stats.yaml");
    /// ```
    pub fn file(path: impl Into<PathBuf>) -> Self {
        Output::File(path.into())
    }

    /// Create a TCP output.
    ///
    /// # Example
    ///
    /// ```rust
    /// use busprobe_stats::Output;
    ///
    /// let output = Output::tcp("localhost:9090");
    /// ```
    pub fn tcp(addr: impl Into<String>) -> Self {
        Output::Tcp(addr.into())
    }

    /// Create a channel output and return both the output and receiver.
    ///
    /// # Example
    ///
    /// ```rust
    /// use busprobe_stats::Output;
    ///
    /// let (output, mut rx) = Output::channel(16);
    ///
    /// // Later, receive reports
    /// // while let Some(report) = rx.recv().await {
    /// //     println!("{}", report.to_yaml()?);
    /// // }
    /// ```
    #[cfg(feature = "tokio")]
    pub fn channel(buffer: usize) -> (Self, tokio::sync::mpsc::Receiver<StatisticsReport>) {
        let (tx, rx) = tokio::sync::mpsc::channel(buffer);
        (Output::Channel(tx), rx)
    }

    /// Emit a report to this output.
    #[cfg(feature = "tokio")]
    pub(crate) async fn emit(&self, report: &StatisticsReport) -> std::io::Result<()> {
        match self {
            Output::File(path) => {
                let yaml = report.to_yaml().map_err(std::io::Error::other)?;
                tokio::fs::write(path, yaml).await?;
            }
            Output::Tcp(addr) => {
                use tokio::io::AsyncWriteExt;
                use tokio::net::TcpStream;

                let mut stream = TcpStream::connect(addr).await?;
                let mut json = serde_json::to_vec(report)?;
                json.push(b'\n');
                stream.write_all(&json).await?;
            }
            Output::Stdout => {
                use tokio::io::AsyncWriteExt;

                let yaml = report.to_yaml().map_err(std::io::Error::other)?;
                let mut stdout = tokio::io::stdout();
                stdout.write_all(yaml.as_bytes()).await?;
                stdout.flush().await?;
            }
            Output::Channel(tx) => {
                // Best effort send (don't block if channel is full)
                let _ = tx.try_send(report.clone());
            }
        }
        Ok(())
    }
}

impl std::fmt::Display for Output {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Output::File(path) => write!(f, "file {}", path.display()),
            Output::Tcp(addr) => write!(f, "tcp {}", addr),
            Output::Stdout => f.write_str("stdout"),
            #[cfg(feature = "tokio")]
            Output::Channel(_) => f.write_str("channel"),
        }
    }
}
