//! Error taxonomy for client negotiation.
//!
//! `ApiError` is the per-request error the low-level steps surface raw.
//! `RdiError` is what `create_client` returns: login failures on either
//! protocol path fold into the single `Unauthorized` variant, so callers
//! cannot tell from the error which generation was attempted.

/// Failure of a single HTTP request against the management API.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Transport-level failure: connect refused, timeout, body read error.
    #[error("HTTP: {0}")]
    Http(#[from] reqwest::Error),
    /// The remote answered with a non-2xx status.
    #[error("unexpected status {status} from {path}")]
    Status {
        path: String,
        status: reqwest::StatusCode,
    },
    /// The login response carried a token the client could not decode.
    #[error("malformed access token: {0}")]
    Token(String),
}

/// Failure of a whole `create_client` negotiation.
///
/// Probe misses never appear here; they are an ordinary fallback signal,
/// resolved inside the factory.
#[derive(Debug, thiserror::Error)]
pub enum RdiError {
    /// The instance rejected the supplied credentials, on whichever
    /// protocol path was attempted.
    #[error("unauthorized: cannot connect with these credentials")]
    Unauthorized,
    /// Credentials were accepted but the pipeline listing could not be
    /// read, so the v2 session could not be fully established.
    #[error("session establishment failed: {0}")]
    SessionEstablishment(#[source] ApiError),
    /// Anything outside the classified steps propagates unchanged.
    #[error(transparent)]
    Unexpected(#[from] ApiError),
}
