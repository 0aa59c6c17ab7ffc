//! Publishing envelopes onto an [`EventBus`] and decoding them on receipt
//!
//! Envelopes go out as structured-mode CloudEvents JSON on the subject
//! `<pubsub_name>.<topic>`, tagged with a `content-type` header.

use crate::content_type::{CONTENT_TYPE_CLOUD_EVENT, CONTENT_TYPE_HEADER};
use crate::verify::ensure_not_empty;
use crate::{BusError, BusMessage, BusResult, CloudEvent, CloudEventError, EventBus, TypedCloudEvent};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::env;
use std::sync::Arc;
use tracing::debug;

const DEFAULT_PUBSUB_NAME: &str = "pubsub";

/// Publisher configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublisherConfig {
    /// Name of the pub/sub component, used as the subject prefix
    pub pubsub_name: String,
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            pubsub_name: DEFAULT_PUBSUB_NAME.to_string(),
        }
    }
}

impl PublisherConfig {
    /// Read `PUBSUB_NAME`, defaulting to `pubsub`
    pub fn from_env() -> Result<Self, String> {
        let pubsub_name =
            env::var("PUBSUB_NAME").unwrap_or_else(|_| DEFAULT_PUBSUB_NAME.to_string());

        Self::with_pubsub_name(pubsub_name)
    }

    pub fn with_pubsub_name(pubsub_name: impl Into<String>) -> Result<Self, String> {
        let pubsub_name = pubsub_name.into();
        if pubsub_name.trim().is_empty() {
            return Err("PUBSUB_NAME cannot be empty".to_string());
        }
        if pubsub_name.contains('.') {
            return Err(format!("PUBSUB_NAME must not contain '.', got '{}'", pubsub_name));
        }

        Ok(Self { pubsub_name })
    }
}

/// Serializes envelopes and hands them to an [`EventBus`]
#[derive(Debug, Clone)]
pub struct CloudEventPublisher {
    bus: Arc<dyn EventBus>,
    config: PublisherConfig,
}

impl CloudEventPublisher {
    pub fn new(bus: Arc<dyn EventBus>, config: PublisherConfig) -> Self {
        Self { bus, config }
    }

    pub fn config(&self) -> &PublisherConfig {
        &self.config
    }

    /// Bus subject an event for `topic` is published on
    pub fn subject_for(&self, topic: &str) -> BusResult<String> {
        ensure_not_empty(topic, "topic")
            .map_err(|_| BusError::InvalidSubject("topic cannot be empty".to_string()))?;
        if topic.contains(['*', '>']) {
            return Err(BusError::InvalidSubject(format!(
                "topic must not contain wildcards, got '{}'",
                topic
            )));
        }

        Ok(format!("{}.{}", self.config.pubsub_name, topic))
    }

    /// Publish an envelope without data
    pub async fn publish_event(&self, topic: &str, event: &CloudEvent) -> BusResult<()> {
        let payload = serde_json::to_vec(event)
            .map_err(|e| BusError::SerializationError(e.to_string()))?;
        self.send(topic, event, payload).await
    }

    /// Publish an envelope with its typed `data`
    pub async fn publish_typed_event<T: Serialize + Sync>(
        &self,
        topic: &str,
        event: &TypedCloudEvent<T>,
    ) -> BusResult<()> {
        let payload = serde_json::to_vec(event)
            .map_err(|e| BusError::SerializationError(e.to_string()))?;
        self.send(topic, event.event(), payload).await
    }

    async fn send(&self, topic: &str, event: &CloudEvent, payload: Vec<u8>) -> BusResult<()> {
        let subject = self.subject_for(topic)?;

        debug!(
            event_id = %event.id(),
            event_type = %event.event_type(),
            subject = %subject,
            bytes = payload.len(),
            "Publishing cloud event"
        );

        let message = BusMessage::new(subject, payload)
            .with_header(CONTENT_TYPE_HEADER, CONTENT_TYPE_CLOUD_EVENT);
        self.bus.publish(message).await
    }
}

/// Decode a received bus message into an envelope, ignoring any `data`
pub fn decode_event(message: &BusMessage) -> Result<CloudEvent, CloudEventError> {
    CloudEvent::from_json_slice(&message.payload).inspect_err(|e| {
        debug!(subject = %message.subject, error = %e, "Rejected inbound cloud event");
    })
}

/// Decode a received bus message into a typed envelope
pub fn decode_typed_event<T: DeserializeOwned>(
    message: &BusMessage,
) -> Result<TypedCloudEvent<T>, CloudEventError> {
    TypedCloudEvent::from_json_slice(&message.payload).inspect_err(|e| {
        debug!(subject = %message.subject, error = %e, "Rejected inbound cloud event");
    })
}
