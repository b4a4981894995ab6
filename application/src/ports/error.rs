//! Error shared by every collaborator port

use thiserror::Error;

/// Opaque failure reported by an outbound collaborator.
///
/// The core never retries these; they abort the round in flight.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PortError {
    #[error("Failed to deliver message: {0}")]
    Delivery(String),

    #[error("Failed to register action listener: {0}")]
    Listener(String),

    #[error("Decision failed: {0}")]
    Decision(String),

    #[error("Collaborator closed")]
    Closed,
}
