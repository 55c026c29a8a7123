//! Structured-data codec used for request bodies and response payloads.
//!
//! # Design
//! The client is generic over `Codec` so the serialization format stays a
//! collaborator rather than a hard-wired detail. `JsonCodec` is zero-sized
//! and stateless: one instance lives inside the client and is shared by every
//! call. Codec failures carry a coarse `CodecErrorKind` for diagnostics; the
//! client never exposes it through the error taxonomy.

use serde::de::DeserializeOwned;
use serde::Serialize;
use thiserror::Error;

/// Serialization format for request bodies and response payloads.
pub trait Codec: Send + Sync {
    /// Media type sent as `Content-Type` alongside encoded bodies.
    fn content_type(&self) -> &'static str;

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError>;

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError>;
}

/// What went wrong while encoding or decoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CodecErrorKind {
    /// A value had a different type than the target expects.
    TypeMismatch,
    /// A required value was null.
    ValueNotFound,
    /// A required key was absent.
    KeyNotFound,
    /// The input is not well-formed.
    DataCorrupted,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct CodecError {
    pub kind: CodecErrorKind,
    pub message: String,
    /// Coding path to the failing value, e.g. `items[2].name`. `None` when
    /// the failure is at the root or outside decoding.
    pub path: Option<String>,
    /// One-based position of the failure in the input, when known.
    pub line: Option<usize>,
    pub column: Option<usize>,
}

/// `serde_json` backed codec.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct JsonCodec;

impl Codec for JsonCodec {
    fn content_type(&self) -> &'static str {
        "application/json"
    }

    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>, CodecError> {
        serde_json::to_vec(value).map_err(CodecError::from)
    }

    fn decode<T: DeserializeOwned>(&self, bytes: &[u8]) -> Result<T, CodecError> {
        let mut de = serde_json::Deserializer::from_slice(bytes);
        let value = serde_path_to_error::deserialize(&mut de).map_err(|err| {
            let path = err.path().to_string();
            let mut codec_err = CodecError::from(err.into_inner());
            codec_err.path = (path != ".").then_some(path);
            codec_err
        })?;
        de.end().map_err(CodecError::from)?;
        Ok(value)
    }
}

impl From<serde_json::Error> for CodecError {
    fn from(err: serde_json::Error) -> Self {
        use serde_json::error::Category;

        let message = err.to_string();
        // serde_json only reports `Category::Data` for shape errors. The
        // finer split relies on the messages serde's `de::Error` defaults
        // produce: "missing field `x`", "invalid type: null, expected ..",
        // and "invalid type|value|length: .., expected ..".
        let kind = match err.classify() {
            Category::Syntax | Category::Eof => CodecErrorKind::DataCorrupted,
            Category::Data if message.starts_with("missing field") => CodecErrorKind::KeyNotFound,
            Category::Data if message.starts_with("invalid type: null") => {
                CodecErrorKind::ValueNotFound
            }
            Category::Data
                if message.starts_with("invalid type")
                    || message.starts_with("invalid value")
                    || message.starts_with("invalid length") =>
            {
                CodecErrorKind::TypeMismatch
            }
            Category::Data | Category::Io => CodecErrorKind::Other,
        };

        // serde_json reports line 0 for errors raised outside the parser.
        let position = (err.line() > 0).then(|| (err.line(), err.column()));
        Self {
            kind,
            message,
            path: None,
            line: position.map(|(line, _)| line),
            column: position.map(|(_, column)| column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Item {
        id: u32,
        name: String,
        tags: Vec<String>,
    }

    fn decode_err(raw: &str) -> CodecError {
        JsonCodec.decode::<Item>(raw.as_bytes()).unwrap_err()
    }

    #[test]
    fn roundtrips_through_json() {
        let item = Item {
            id: 7,
            name: "seven".to_string(),
            tags: vec!["a".to_string(), "b".to_string()],
        };
        let bytes = JsonCodec.encode(&item).unwrap();
        let back: Item = JsonCodec.decode(&bytes).unwrap();
        assert_eq!(back, item);
    }

    #[test]
    fn missing_field_is_key_not_found() {
        let err = decode_err(r#"{"id":1,"tags":[]}"#);
        assert_eq!(err.kind, CodecErrorKind::KeyNotFound);
        assert!(err.message.contains("name"), "{}", err.message);
    }

    #[test]
    fn null_field_is_value_not_found() {
        let err = decode_err(r#"{"id":1,"name":null,"tags":[]}"#);
        assert_eq!(err.kind, CodecErrorKind::ValueNotFound);
    }

    #[test]
    fn wrong_type_is_type_mismatch() {
        let err = decode_err(r#"{"id":"one","name":"x","tags":[]}"#);
        assert_eq!(err.kind, CodecErrorKind::TypeMismatch);
        assert_eq!(err.line, Some(1));
        assert!(err.column.is_some());
    }

    #[test]
    fn failures_carry_the_coding_path() {
        let err = decode_err(r#"{"id":1,"name":"x","tags":["a",2]}"#);
        assert_eq!(err.kind, CodecErrorKind::TypeMismatch);
        assert_eq!(err.path.as_deref(), Some("tags[1]"));

        let err = decode_err(r#"{"id":"one","name":"x","tags":[]}"#);
        assert_eq!(err.path.as_deref(), Some("id"));
        assert_eq!(decode_err("not json").path, None);
    }

    #[derive(Debug, Deserialize)]
    struct Page {
        #[allow(dead_code)]
        items: Vec<Item>,
    }

    #[test]
    fn nested_failures_name_the_element() {
        let err = JsonCodec
            .decode::<Page>(
                br#"{"items":[{"id":1,"name":"a","tags":[]},{"id":2,"name":null,"tags":[]}]}"#,
            )
            .unwrap_err();
        assert_eq!(err.kind, CodecErrorKind::ValueNotFound);
        assert_eq!(err.path.as_deref(), Some("items[1].name"));
    }

    #[test]
    fn trailing_input_is_data_corrupted() {
        let err = decode_err(r#"{"id":1,"name":"x","tags":[]} extra"#);
        assert_eq!(err.kind, CodecErrorKind::DataCorrupted);
        assert_eq!(err.path, None);
    }

    #[test]
    fn broken_json_is_data_corrupted() {
        assert_eq!(decode_err("not json").kind, CodecErrorKind::DataCorrupted);
        assert_eq!(decode_err(r#"{"id":1"#).kind, CodecErrorKind::DataCorrupted);
        assert_eq!(decode_err("").kind, CodecErrorKind::DataCorrupted);
    }

    struct Unencodable;

    impl Serialize for Unencodable {
        fn serialize<S: serde::Serializer>(&self, _: S) -> Result<S::Ok, S::Error> {
            Err(serde::ser::Error::custom("refusing to serialize"))
        }
    }

    #[test]
    fn serializer_errors_surface_as_other() {
        let err = JsonCodec.encode(&Unencodable).unwrap_err();
        assert_eq!(err.kind, CodecErrorKind::Other);
        assert_eq!(err.message, "refusing to serialize");
        assert_eq!(err.line, None);
    }
}
