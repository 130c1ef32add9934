//! Client error types.

use derive_more::{Display, Error};
use tracing::instrument;

/// Category of a client failure.
///
/// Every failure is terminal for the operation that raised it; nothing in
/// the client retries automatically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum ClientErrorKind {
    /// The request never produced a usable HTTP response.
    #[display("transport")]
    Transport,
    /// The server answered with something that does not fit the game contract.
    #[display("protocol")]
    Protocol,
    /// An AI task did not reach a terminal state before its deadline.
    #[display("stalled")]
    Stalled,
    /// The operation was cancelled before it finished.
    #[display("cancelled")]
    Cancelled,
    /// An AI turn is already running.
    #[display("busy")]
    Busy,
    /// Configuration could not be loaded.
    #[display("config")]
    Config,
}

/// Client error with location tracking.
#[derive(Debug, Clone, Display, Error)]
#[display("Client {} error: {} at {}:{}", kind, message, file, line)]
pub struct ClientError {
    /// What went wrong, broadly.
    pub kind: ClientErrorKind,
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ClientError {
    /// Creates a new client error with caller location tracking.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(kind: ClientErrorKind, message: impl Into<String>) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            kind,
            message: message.into(),
            line: loc.line(),
            file: loc.file(),
        }
    }

    /// Shorthand for a [`ClientErrorKind::Transport`] error.
    #[track_caller]
    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Transport, message)
    }

    /// Shorthand for a [`ClientErrorKind::Protocol`] error.
    #[track_caller]
    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ClientErrorKind::Protocol, message)
    }

    /// Shorthand for a [`ClientErrorKind::Cancelled`] error.
    #[track_caller]
    pub fn cancelled() -> Self {
        Self::new(ClientErrorKind::Cancelled, "operation cancelled")
    }

    /// Returns true if this error came from a cancellation.
    pub fn is_cancelled(&self) -> bool {
        self.kind == ClientErrorKind::Cancelled
    }
}

impl From<reqwest::Error> for ClientError {
    #[track_caller]
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::protocol(format!("Malformed response body: {}", err))
        } else {
            Self::transport(format!("HTTP request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for ClientError {
    #[track_caller]
    fn from(err: serde_json::Error) -> Self {
        Self::protocol(format!("Invalid JSON: {}", err))
    }
}
