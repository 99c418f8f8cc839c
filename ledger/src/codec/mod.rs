//! Dual wire codecs for [`crate::model::Query`]: a binary form (§ binary)
//! and a JSON text form (§ json). Both convert to and from the same model
//! type, so a query decoded from one wire form and re-encoded in the
//! other still hashes identically (see `model::Query::hash`).

pub mod binary;
pub mod json;

pub use binary::{decode_binary, encode_binary};
pub use json::{decode_json, encode_json};

/// Failure modes a caller can observe when decoding a query off the wire.
/// Codec errors are reported to the caller at decode time; the evaluator
/// never sees a malformed query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CodecError {
    /// Binary decode failure: unknown variant tag, missing field, wrong
    /// fixed-size length, or bad hex.
    MalformedWire,
    /// JSON decode failure: missing/mistyped field or missing signature.
    MalformedJson,
    /// JSON `query_type` outside the closed set of known variant names.
    UnknownQueryType,
}

impl std::fmt::Display for CodecError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CodecError::MalformedWire => write!(f, "malformed binary query wire record"),
            CodecError::MalformedJson => write!(f, "malformed JSON query document"),
            CodecError::UnknownQueryType => write!(f, "unknown query_type discriminator"),
        }
    }
}

impl std::error::Error for CodecError {}
