//! Error types for the protocol layer.
//!
//! Each crate in rbxjoin defines its own error enum. A `ProtocolError`
//! means the bytes or text were wrong, not the network or the session.

/// Errors that can occur in the protocol layer.
#[derive(Debug, thiserror::Error)]
pub enum ProtocolError {
    /// A response body did not have the expected JSON shape.
    ///
    /// Common causes: an HTML error page instead of JSON, or a field
    /// with the wrong type.
    #[error("decode failed: {0}")]
    Decode(serde_json::Error),

    /// User input could not be understood as a server reference or id.
    #[error("invalid format: {0}")]
    InvalidFormat(String),
}
