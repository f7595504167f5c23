//! Wire formats for every supported TV platform.
//!
//! Nothing in this module performs I/O.  Builders return the exact text (JSON
//! or URL) that a brand client puts on the wire, and parsers turn the TV's
//! replies into small enums the clients can `match` on.

pub mod encoding;
pub mod roku;
pub mod samsung;
pub mod sequence;
pub mod webos;

use thiserror::Error;

pub use encoding::base64_encode;
pub use sequence::RequestCounter;

/// Errors from parsing a message received from a TV.
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// The frame is not valid JSON or does not have the expected shape.
    #[error("malformed message: {0}")]
    MalformedJson(#[from] serde_json::Error),

    /// A required field was absent.
    #[error("message is missing field `{0}`")]
    MissingField(&'static str),
}
