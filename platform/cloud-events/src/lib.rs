//! # CloudEvents
//!
//! Immutable CloudEvents envelopes for publishing and receiving pub/sub events,
//! plus the bus contract a publisher hands them to.
//!
//! ## Envelopes
//!
//! - **CloudEvent**: `id`, `source`, `type`, `subject` and a fixed
//!   `datacontenttype` of `application/cloudevents+json`
//! - **TypedCloudEvent**: a `CloudEvent` composed with a typed `data` payload
//!
//! ## Publication
//!
//! - **EventBus**: the publish contract a transport implements
//! - **CloudEventPublisher**: serializes envelopes onto an `EventBus`
//! - **decode_event** / **decode_typed_event**: parse received payloads
//!
//! ## Usage
//!
//! ```rust,no_run
//! use cloud_events::{
//!     CloudEventOptions, CloudEventPublisher, EventBus, PublisherConfig, TypedCloudEvent,
//! };
//! use std::sync::Arc;
//!
//! # async fn example(bus: Arc<dyn EventBus>) -> Result<(), Box<dyn std::error::Error>> {
//! let publisher = CloudEventPublisher::new(bus, PublisherConfig::from_env()?);
//!
//! let event = TypedCloudEvent::with_options(
//!     serde_json::json!({"order_id": "order-42"}),
//!     "com.example.created",
//!     CloudEventOptions::new().with_source("orders-service"),
//! )?;
//! publisher.publish_typed_event("orders", &event).await?;
//! # Ok(())
//! # }
//! ```

pub mod content_type;
mod envelope;
mod publisher;
pub mod verify;

pub use envelope::{CloudEvent, CloudEventOptions, TypedCloudEvent};
pub use publisher::{decode_event, decode_typed_event, CloudEventPublisher, PublisherConfig};

use async_trait::async_trait;
use std::collections::HashMap;
use std::fmt;

/// Errors raised while constructing or decoding an envelope
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CloudEventError {
    /// A required argument was missing, empty or whitespace-only
    #[error("value cannot be null or empty (parameter '{0}')")]
    InvalidArgument(&'static str),

    #[error("malformed cloud event: {0}")]
    Malformed(String),
}

impl CloudEventError {
    /// Name of the offending parameter, for `InvalidArgument`
    pub fn param(&self) -> Option<&'static str> {
        match self {
            CloudEventError::InvalidArgument(param) => Some(*param),
            CloudEventError::Malformed(_) => None,
        }
    }
}

/// A message carried by the event bus
#[derive(Debug, Clone)]
pub struct BusMessage {
    /// The subject/topic this message was published to
    pub subject: String,
    /// The message payload (raw bytes)
    pub payload: Vec<u8>,
    /// Optional headers, e.g. `content-type`
    pub headers: Option<HashMap<String, String>>,
}

impl BusMessage {
    /// Create a new bus message
    pub fn new(subject: String, payload: Vec<u8>) -> Self {
        Self {
            subject,
            payload,
            headers: None,
        }
    }

    /// Add a single header to the message
    pub fn with_header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HashMap::new)
            .insert(key.into(), value.into());
        self
    }

    /// Look up a header value
    pub fn header(&self, key: &str) -> Option<&str> {
        self.headers
            .as_ref()
            .and_then(|h| h.get(key))
            .map(String::as_str)
    }
}

/// Errors that can occur when using the event bus
#[derive(Debug, thiserror::Error)]
pub enum BusError {
    #[error("failed to publish message: {0}")]
    PublishError(String),

    #[error("serialization error: {0}")]
    SerializationError(String),

    #[error("invalid subject: {0}")]
    InvalidSubject(String),
}

/// Result type for event bus operations
pub type BusResult<T> = Result<T, BusError>;

/// Publish contract the envelope publisher writes to
///
/// Implemented by the transport; the bus carries raw bytes and headers only,
/// envelope encoding happens in [`CloudEventPublisher`].
#[async_trait]
pub trait EventBus: Send + Sync {
    /// Publish a message to its subject
    ///
    /// # Returns
    /// * `Ok(())` if the message was accepted by the bus
    /// * `Err(BusError::PublishError)` if the transport rejected it
    async fn publish(&self, message: BusMessage) -> BusResult<()>;
}

impl fmt::Debug for dyn EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EventBus")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_names_parameter() {
        let err = CloudEventError::InvalidArgument("type");
        assert_eq!(err.param(), Some("type"));
        assert!(err.to_string().contains("'type'"));
        assert_eq!(CloudEventError::Malformed("eof".into()).param(), None);
    }

    #[test]
    fn test_bus_message_headers() {
        let msg = BusMessage::new("pubsub.orders".to_string(), b"{}".to_vec())
            .with_header("content-type", "application/cloudevents+json");

        assert_eq!(msg.header("content-type"), Some("application/cloudevents+json"));
        assert_eq!(msg.header("missing"), None);
        assert_eq!(BusMessage::new("s".to_string(), vec![]).header("content-type"), None);
    }
}
