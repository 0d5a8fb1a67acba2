//! Recorded messages and publication metadata.

use alloc::string::String;
use alloc::vec::Vec;

use crate::Nanoseconds;

/// A single message as stored in a recorded log.
///
/// Messages are immutable once built. The only way to observe one is through
/// its read accessors.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
pub struct Message {
    #[cfg_attr(feature = "minicbor", n(0))]
    time_received: Nanoseconds,

    #[cfg_attr(feature = "minicbor", n(1))]
    data: Vec<u8>,

    #[cfg_attr(feature = "serde", serde(rename = "type"))]
    #[cfg_attr(feature = "minicbor", n(2))]
    message_type: String,

    #[cfg_attr(feature = "minicbor", n(3))]
    topic: String,
}

impl Message {
    /// Create a message.
    ///
    /// # Arguments
    ///
    /// * `time_received` - When the recorder received the message
    /// * `data` - The serialized payload
    /// * `message_type` - Name of the payload's message type
    /// * `topic` - The topic the message was published on
    pub fn new(
        time_received: Nanoseconds,
        data: impl Into<Vec<u8>>,
        message_type: impl Into<String>,
        topic: impl Into<String>,
    ) -> Self {
        Self {
            time_received,
            data: data.into(),
            message_type: message_type.into(),
            topic: topic.into(),
        }
    }

    /// The raw serialized payload.
    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// The message type name.
    pub fn message_type(&self) -> &str {
        &self.message_type
    }

    /// The topic the message was published on.
    pub fn topic(&self) -> &str {
        &self.topic
    }

    /// When the message was received.
    pub fn time_received(&self) -> Nanoseconds {
        self.time_received
    }
}

/// Metadata attached to every publication by its sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "minicbor", derive(minicbor::Encode, minicbor::Decode))]
pub struct PublicationMetadata {
    /// Publisher-assigned time of the publication.
    #[cfg_attr(feature = "minicbor", n(0))]
    pub stamp: Nanoseconds,

    /// Per-sender sequence number, starting at 1 and increasing by one per
    /// publication.
    #[cfg_attr(feature = "minicbor", n(1))]
    pub seq: u64,
}

impl PublicationMetadata {
    /// Create publication metadata.
    pub const fn new(stamp: Nanoseconds, seq: u64) -> Self {
        Self { stamp, seq }
    }
}
