/// Errors that can occur in the transport layer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    /// The request never produced a response (DNS, connect, TLS, reset).
    #[error("request failed: {0}")]
    RequestFailed(String),

    /// The request did not complete before its deadline.
    #[error("request timed out")]
    Timeout,

    /// The request could not be built (bad URL, bad header value).
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The response arrived but its body could not be read.
    #[error("failed to read response body: {0}")]
    BodyReadFailed(String),
}

impl TransportError {
    /// Returns `true` for failures worth retrying by hand.
    pub fn is_transient(&self) -> bool {
        !matches!(self, Self::InvalidRequest(_))
    }
}
