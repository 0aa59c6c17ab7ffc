//! # CloudEvent Envelope
//!
//! Immutable CloudEvents envelopes for pub/sub publication.
//!
//! ## Envelope Fields
//!
//! - `id`: Unique event identifier, a random UUID v4 unless the caller supplies one
//! - `source`: Context that produced the event (optional)
//! - `type`: Event classification, always non-empty
//! - `subject`: Subject of the event within the source's context (optional)
//! - `datacontenttype`: Always [`CONTENT_TYPE_CLOUD_EVENT`]
//!
//! [`TypedCloudEvent`] composes a [`CloudEvent`] with a typed `data` payload.
//!
//! Envelopes are validated on construction and again on deserialization, so a
//! `CloudEvent` value never carries an empty `type` or `id`. Inbound JSON
//! without an `id` gets a freshly generated one, as construction does.

use crate::content_type::CONTENT_TYPE_CLOUD_EVENT;
use crate::verify::ensure_not_empty;
use crate::CloudEventError;
use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::ops::Deref;
use uuid::Uuid;

/// Optional envelope attributes, each absent by default
///
/// # Examples
///
/// ```rust
/// use cloud_events::{CloudEvent, CloudEventOptions};
///
/// let event = CloudEvent::with_options(
///     "com.example.created",
///     CloudEventOptions::new()
///         .with_subject("order-42")
///         .with_source("orders-service"),
/// )
/// .unwrap();
///
/// assert_eq!(event.subject(), Some("order-42"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloudEventOptions {
    subject: Option<String>,
    source: Option<String>,
    id: Option<String>,
}

impl CloudEventOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the event subject
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Set the event source
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Use an explicit event id instead of generating one
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// CloudEvent envelope without data
///
/// Fields are private and only readable through accessors; an envelope never
/// changes after construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudEvent {
    id: String,
    source: Option<String>,
    event_type: String,
    subject: Option<String>,
}

impl CloudEvent {
    /// Create an envelope with a generated id and no source or subject
    ///
    /// # Errors
    ///
    /// Returns [`CloudEventError::InvalidArgument`] naming `type` when
    /// `event_type` is empty or whitespace-only.
    pub fn new(event_type: impl Into<String>) -> Result<Self, CloudEventError> {
        Self::with_options(event_type, CloudEventOptions::default())
    }

    /// Create an envelope with optional subject, source and id
    ///
    /// A supplied id is used verbatim, without any uniqueness check. An
    /// explicitly supplied empty or whitespace-only id is rejected rather than
    /// passed through, so `id()` never returns an empty string. Omit the id
    /// (or leave it out of inbound JSON) to have one generated instead.
    ///
    /// # Errors
    ///
    /// Returns [`CloudEventError::InvalidArgument`] naming `type` for an empty
    /// `event_type`, or naming `id` for an empty supplied id.
    pub fn with_options(
        event_type: impl Into<String>,
        options: CloudEventOptions,
    ) -> Result<Self, CloudEventError> {
        let event_type = event_type.into();
        ensure_not_empty(&event_type, "type")?;

        let id = match options.id {
            Some(id) => {
                ensure_not_empty(&id, "id")?;
                id
            }
            None => Uuid::new_v4().to_string(),
        };

        Ok(Self {
            id,
            source: options.source,
            event_type,
            subject: options.subject,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// The CloudEvents `type` attribute
    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn subject(&self) -> Option<&str> {
        self.subject.as_deref()
    }

    /// Always [`CONTENT_TYPE_CLOUD_EVENT`]
    pub fn data_content_type(&self) -> &'static str {
        CONTENT_TYPE_CLOUD_EVENT
    }

    /// Serialize to CloudEvents JSON
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CloudEventError> {
        serde_json::to_vec(self).map_err(|e| CloudEventError::Malformed(e.to_string()))
    }

    /// Parse CloudEvents JSON, applying the same checks as construction
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, CloudEventError> {
        let wire: CloudEventWire =
            serde_json::from_slice(bytes).map_err(|e| CloudEventError::Malformed(e.to_string()))?;
        Self::from_wire(wire)
    }

    fn from_wire(wire: CloudEventWire) -> Result<Self, CloudEventError> {
        let event_type = wire
            .event_type
            .ok_or(CloudEventError::InvalidArgument("type"))?;

        // inbound datacontenttype is not read, the constant always applies
        Self::with_options(
            event_type,
            CloudEventOptions {
                subject: wire.subject,
                source: wire.source,
                id: wire.id,
            },
        )
    }
}

/// CloudEvent envelope carrying typed `data`
///
/// Dereferences to the inner [`CloudEvent`], so all envelope accessors are
/// available directly.
///
/// # Examples
///
/// ```rust
/// use cloud_events::TypedCloudEvent;
/// use serde::Serialize;
///
/// #[derive(Debug, Serialize)]
/// struct OrderCreated {
///     order_id: String,
///     amount: i64,
/// }
///
/// let event = TypedCloudEvent::new(
///     OrderCreated {
///         order_id: "order-42".to_string(),
///         amount: 1000,
///     },
///     "com.example.created",
/// )
/// .unwrap();
///
/// assert_eq!(event.event_type(), "com.example.created");
/// assert_eq!(event.data().amount, 1000);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypedCloudEvent<T> {
    event: CloudEvent,
    data: T,
}

impl<T> TypedCloudEvent<T> {
    /// Create a typed envelope with a generated id
    pub fn new(data: T, event_type: impl Into<String>) -> Result<Self, CloudEventError> {
        Self::with_options(data, event_type, CloudEventOptions::default())
    }

    /// Create a typed envelope with optional subject, source and id
    pub fn with_options(
        data: T,
        event_type: impl Into<String>,
        options: CloudEventOptions,
    ) -> Result<Self, CloudEventError> {
        let event = CloudEvent::with_options(event_type, options)?;
        Ok(Self::from_parts(event, data))
    }

    /// Attach `data` to an already validated envelope
    pub fn from_parts(event: CloudEvent, data: T) -> Self {
        Self { event, data }
    }

    pub fn event(&self) -> &CloudEvent {
        &self.event
    }

    pub fn data(&self) -> &T {
        &self.data
    }

    pub fn into_data(self) -> T {
        self.data
    }

    pub fn into_parts(self) -> (CloudEvent, T) {
        (self.event, self.data)
    }
}

impl<T: Serialize> TypedCloudEvent<T> {
    /// Serialize to CloudEvents JSON, payload under `data`
    pub fn to_json_bytes(&self) -> Result<Vec<u8>, CloudEventError> {
        serde_json::to_vec(self).map_err(|e| CloudEventError::Malformed(e.to_string()))
    }
}

impl<T: DeserializeOwned> TypedCloudEvent<T> {
    /// Parse CloudEvents JSON with a typed `data` payload
    pub fn from_json_slice(bytes: &[u8]) -> Result<Self, CloudEventError> {
        let wire: TypedCloudEventWire<T> =
            serde_json::from_slice(bytes).map_err(|e| CloudEventError::Malformed(e.to_string()))?;
        let event = CloudEvent::from_wire(wire.event)?;
        Ok(Self::from_parts(event, wire.data))
    }
}

impl<T> Deref for TypedCloudEvent<T> {
    type Target = CloudEvent;

    fn deref(&self) -> &CloudEvent {
        &self.event
    }
}

// ---------------------------------------------------------------------------
// Wire format
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct CloudEventRef<'a> {
    id: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<&'a str>,
    #[serde(rename = "type")]
    event_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    subject: Option<&'a str>,
    datacontenttype: &'static str,
}

impl<'a> From<&'a CloudEvent> for CloudEventRef<'a> {
    fn from(event: &'a CloudEvent) -> Self {
        Self {
            id: &event.id,
            source: event.source.as_deref(),
            event_type: &event.event_type,
            subject: event.subject.as_deref(),
            datacontenttype: CONTENT_TYPE_CLOUD_EVENT,
        }
    }
}

#[derive(Serialize)]
struct TypedCloudEventRef<'a, T> {
    #[serde(flatten)]
    event: CloudEventRef<'a>,
    data: &'a T,
}

/// Inbound shape; unknown attributes such as `specversion` are ignored.
#[derive(Deserialize)]
struct CloudEventWire {
    id: Option<String>,
    source: Option<String>,
    #[serde(rename = "type")]
    event_type: Option<String>,
    subject: Option<String>,
}

#[derive(Deserialize)]
struct TypedCloudEventWire<T> {
    #[serde(flatten)]
    event: CloudEventWire,
    data: T,
}

impl Serialize for CloudEvent {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        CloudEventRef::from(self).serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for CloudEvent {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = CloudEventWire::deserialize(deserializer)?;
        Self::from_wire(wire).map_err(D::Error::custom)
    }
}

impl<T: Serialize> Serialize for TypedCloudEvent<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        TypedCloudEventRef {
            event: CloudEventRef::from(&self.event),
            data: &self.data,
        }
        .serialize(serializer)
    }
}

impl<'de, T: Deserialize<'de>> Deserialize<'de> for TypedCloudEvent<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let wire = TypedCloudEventWire::<T>::deserialize(deserializer)?;
        let event = CloudEvent::from_wire(wire.event).map_err(D::Error::custom)?;
        Ok(Self::from_parts(event, wire.data))
    }
}
