//! Error Types
//!
//! Two layers of failure exist. [`TransportError`] covers everything that
//! goes wrong delivering a command or reading its reply. [`FilterError`] is
//! what every client operation returns: it wraps transport failures, carries
//! the classified service error replies, and adds the local precondition
//! violations that are rejected before anything is sent.

use crate::protocol::ParseError;
use thiserror::Error;

/// Errors raised while moving a command to the service and a reply back.
#[derive(Debug, Error)]
pub enum TransportError {
    /// I/O error (network issue)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The reply stream was not valid RESP
    #[error("parse error: {0}")]
    Parse(#[from] ParseError),

    /// The service closed the connection between replies
    #[error("connection closed by server")]
    ConnectionClosed,

    /// The connection closed in the middle of a reply
    #[error("unexpected end of stream")]
    UnexpectedEof,

    #[error("reply buffer limit exceeded ({limit} bytes)")]
    BufferFull { limit: usize },

    /// A previous round trip was abandoned mid-flight, so the stream
    /// position is unknown.
    #[error("connection poisoned by an interrupted request")]
    Poisoned,
}

/// Errors returned by filter operations.
#[derive(Debug, Error)]
pub enum FilterError {
    /// The service rejected a parameter or flag combination
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("filter already exists: {0}")]
    FilterAlreadyExists(String),

    #[error("filter not found: {0}")]
    FilterNotFound(String),

    #[error("item too large: {0}")]
    ItemTooLarge(String),

    /// A non-scaling filter reached its capacity
    #[error("capacity exceeded: {0}")]
    CapacityExceeded(String),

    /// Any other error reply, message kept verbatim
    #[error("server error: {0}")]
    Server(String),

    /// The reply did not have the shape the operation promises
    #[error("unexpected reply: {0}")]
    UnexpectedReply(String),

    #[error("transport failure: {0}")]
    Transport(#[from] TransportError),

    /// A batch operation was called with no items
    #[error("'{op}' requires at least one item")]
    EmptyBatch { op: &'static str },

    #[error("invalid {name}: {reason}")]
    InvalidParameter { name: &'static str, reason: String },
}

impl FilterError {
    /// Classifies a service error reply by its message.
    ///
    /// Matching is on the lowercased text, since services differ in the
    /// error class prefix (`ERR`, `WRONGTYPE`) but keep the wording.
    pub fn from_server_message(message: impl Into<String>) -> Self {
        let message = message.into();
        let lower = message.to_ascii_lowercase();

        if lower.contains("item exists") || lower.contains("already exists") {
            FilterError::FilterAlreadyExists(message)
        } else if lower.contains("not found") || lower.contains("no such") {
            FilterError::FilterNotFound(message)
        } else if lower.contains("non scaling filter is full") || lower.contains("capacity exceeded") {
            FilterError::CapacityExceeded(message)
        } else if lower.contains("too large") || lower.contains("too big") {
            FilterError::ItemTooLarge(message)
        } else if lower.starts_with("err bad")
            || lower.contains("syntax error")
            || lower.contains("wrong number of arguments")
            || lower.contains("invalid")
            || lower.contains("should be")
        {
            FilterError::InvalidArgument(message)
        } else {
            FilterError::Server(message)
        }
    }

    /// Returns false for errors raised locally before any submission.
    ///
    /// Separates "never sent" from "sent and rejected". A poisoned
    /// connection refuses the command before writing a byte.
    pub fn was_sent(&self) -> bool {
        !matches!(
            self,
            FilterError::EmptyBatch { .. }
                | FilterError::InvalidParameter { .. }
                | FilterError::Transport(TransportError::Poisoned)
        )
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_known_messages() {
        assert!(matches!(
            FilterError::from_server_message("ERR item exists"),
            FilterError::FilterAlreadyExists(_)
        ));
        assert!(matches!(
            FilterError::from_server_message("ERR not found"),
            FilterError::FilterNotFound(_)
        ));
        assert!(matches!(
            FilterError::from_server_message("ERR non scaling filter is full"),
            FilterError::CapacityExceeded(_)
        ));
        assert!(matches!(
            FilterError::from_server_message("ERR item too large"),
            FilterError::ItemTooLarge(_)
        ));
        assert!(matches!(
            FilterError::from_server_message("ERR bad error rate"),
            FilterError::InvalidArgument(_)
        ));
        assert!(matches!(
            FilterError::from_server_message("ERR (capacity should be larger than 0)"),
            FilterError::InvalidArgument(_)
        ));
    }

    #[test]
    fn test_unknown_message_is_preserved() {
        match FilterError::from_server_message("WRONGTYPE Operation against a key holding the wrong kind of value") {
            FilterError::Server(msg) => assert!(msg.starts_with("WRONGTYPE")),
            other => panic!("unexpected classification: {other:?}"),
        }
    }

    #[test]
    fn test_was_sent() {
        assert!(!FilterError::EmptyBatch { op: "BF.MADD" }.was_sent());
        assert!(!FilterError::InvalidParameter {
            name: "capacity",
            reason: "must be positive".into()
        }
        .was_sent());
        assert!(FilterError::FilterNotFound("ERR not found".into()).was_sent());
        assert!(FilterError::Transport(TransportError::ConnectionClosed).was_sent());
    }

    #[test]
    fn test_poisoned_connection_was_not_sent() {
        assert!(!FilterError::Transport(TransportError::Poisoned).was_sent());
    }
}
