//! Media types shared by every envelope and by the bus publisher.

/// Content type of a structured-mode CloudEvent serialized as JSON.
pub const CONTENT_TYPE_CLOUD_EVENT: &str = "application/cloudevents+json";

/// Header key carrying the content type on a [`crate::BusMessage`].
pub const CONTENT_TYPE_HEADER: &str = "content-type";
