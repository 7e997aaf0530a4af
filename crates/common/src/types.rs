//! Request and payload model shared by the pipeline stages.
//!
//! Request attributes are modelled as a sum type ([`Payload`]) so stages can
//! pattern-match on the wrapped-message variant instead of probing runtime
//! types. An absent attribute is simply a missing key.

use std::collections::{BTreeMap, HashMap};

use {
    bytes::Bytes,
    serde::{Deserialize, Serialize},
    serde_json::Value,
};

// ── Body ────────────────────────────────────────────────────────────────────

/// Raw request or broadcast body.
///
/// Serialized untagged: `null`, a JSON string, or an array of bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Body {
    #[default]
    Empty,
    Text(String),
    Binary(Bytes),
}

impl Body {
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(text) => text.is_empty(),
            Self::Binary(bytes) => bytes.is_empty(),
        }
    }

    /// Returns the body as UTF-8 text when it holds text or valid UTF-8 bytes.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Empty => Some(""),
            Self::Text(text) => Some(text.as_str()),
            Self::Binary(bytes) => std::str::from_utf8(bytes).ok(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        match self {
            Self::Empty => &[],
            Self::Text(text) => text.as_bytes(),
            Self::Binary(bytes) => bytes.as_ref(),
        }
    }
}

impl From<String> for Body {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for Body {
    fn from(value: &str) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<Bytes> for Body {
    fn from(value: Bytes) -> Self {
        Self::Binary(value)
    }
}

impl From<Vec<u8>> for Body {
    fn from(value: Vec<u8>) -> Self {
        Self::Binary(Bytes::from(value))
    }
}

// ── WrappedMessage ──────────────────────────────────────────────────────────

/// A typed envelope produced by an upstream RPC deserializer.
///
/// The metadata is opaque to this workspace and is dropped on unwrap.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrappedMessage {
    #[serde(default)]
    payload: Body,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    metadata: BTreeMap<String, String>,
}

impl WrappedMessage {
    pub fn new(payload: impl Into<Body>) -> Self {
        Self {
            payload: payload.into(),
            metadata: BTreeMap::new(),
        }
    }

    #[must_use]
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn payload(&self) -> &Body {
        &self.payload
    }

    pub fn metadata(&self) -> &BTreeMap<String, String> {
        &self.metadata
    }

    /// Consume the envelope, keeping only the inner payload.
    pub fn into_payload(self) -> Body {
        self.payload
    }
}

// ── Payload ─────────────────────────────────────────────────────────────────

/// A value carried as a request attribute or handed to broadcast filters.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    /// The wrapped-message capability.
    Wrapped(WrappedMessage),
    /// An already plain body.
    Body(Body),
    /// Any other structured value.
    Value(Value),
}

impl Payload {
    pub fn as_wrapped(&self) -> Option<&WrappedMessage> {
        match self {
            Self::Wrapped(message) => Some(message),
            _ => None,
        }
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, Self::Wrapped(_))
    }
}

impl From<WrappedMessage> for Payload {
    fn from(value: WrappedMessage) -> Self {
        Self::Wrapped(value)
    }
}

impl From<Body> for Payload {
    fn from(value: Body) -> Self {
        Self::Body(value)
    }
}

impl From<Value> for Payload {
    fn from(value: Value) -> Self {
        Self::Value(value)
    }
}

// ── Request ─────────────────────────────────────────────────────────────────

/// Per-request envelope owned by the host pipeline.
#[derive(Debug, Clone, Default)]
pub struct Request {
    attributes: HashMap<String, Payload>,
    body: Body,
}

impl Request {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_body(mut self, body: impl Into<Body>) -> Self {
        self.body = body.into();
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Payload>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }

    pub fn attribute(&self, name: &str) -> Option<&Payload> {
        self.attributes.get(name)
    }

    /// Sets an attribute, returning the previous value if any.
    pub fn set_attribute(
        &mut self,
        name: impl Into<String>,
        value: impl Into<Payload>,
    ) -> Option<Payload> {
        self.attributes.insert(name.into(), value.into())
    }

    pub fn remove_attribute(&mut self, name: &str) -> Option<Payload> {
        self.attributes.remove(name)
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn set_body(&mut self, body: impl Into<Body>) {
        self.body = body.into();
    }
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use {super::*, rstest::rstest};

    #[rstest]
    #[case(Body::Empty, true)]
    #[case(Body::Text(String::new()), true)]
    #[case(Body::Text("x".into()), false)]
    #[case(Body::Binary(Bytes::new()), true)]
    #[case(Body::Binary(Bytes::from_static(b"x")), false)]
    fn body_emptiness(#[case] body: Body, #[case] expected: bool) {
        assert_eq!(body.is_empty(), expected);
    }

    #[test]
    fn binary_body_reads_as_text_when_utf8() {
        let body = Body::from(b"hello".to_vec());
        assert_eq!(body.as_text(), Some("hello"));
        assert_eq!(Body::Binary(Bytes::from_static(&[0xff, 0xfe])).as_text(), None);
    }

    #[test]
    fn wrapped_message_drops_metadata_on_unwrap() {
        let message = WrappedMessage::new("hello").with_metadata("serial", "7");
        assert_eq!(message.metadata().get("serial").map(String::as_str), Some("7"));
        assert_eq!(message.into_payload(), Body::Text("hello".into()));
    }

    #[test]
    fn wrapped_binary_payload_is_not_decoded() {
        let frame = Bytes::from_static(&[0xff, 0x00, 0x7f]);
        let message = WrappedMessage::new(frame.clone());
        assert_eq!(message.payload().as_bytes(), frame.as_ref());
        assert_eq!(message.into_payload(), Body::Binary(frame));
    }

    #[test]
    fn wrapped_message_json_shape() {
        let message: WrappedMessage =
            serde_json::from_str(r#"{"payload":"hi","metadata":{"kind":"rpc"}}"#).unwrap();
        assert_eq!(message.payload(), &Body::from("hi"));
        let plain = serde_json::to_value(WrappedMessage::new("hi")).unwrap();
        assert_eq!(plain, serde_json::json!({ "payload": "hi" }));

        let binary: WrappedMessage = serde_json::from_str(r#"{"payload":[1,2,255]}"#).unwrap();
        assert_eq!(binary.into_payload(), Body::from(vec![1u8, 2, 255]));
    }

    #[test]
    fn request_attributes_replace_and_remove() {
        let mut request = Request::new().with_attribute("a", Body::from("one"));
        let previous = request.set_attribute("a", WrappedMessage::new("two"));
        assert_eq!(previous, Some(Payload::Body(Body::from("one"))));
        assert!(request.attribute("a").is_some_and(Payload::is_wrapped));
        assert!(request.remove_attribute("a").is_some());
        assert!(request.attribute("a").is_none());
    }
}
