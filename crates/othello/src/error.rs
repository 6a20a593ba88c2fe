//! Unified error type for the Othello controller.

use othello_protocol::ProtocolError;
use othello_session::SessionError;
use othello_transport::TransportError;

/// Top-level error that wraps all crate-specific errors.
///
/// The `#[from]` attribute on each variant auto-generates `From` impls,
/// so the `?` operator converts sub-crate errors automatically.
#[derive(Debug, thiserror::Error)]
pub enum OthelloError {
    /// A transport-level error (connect, send, recv).
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// A protocol-level error (encode, decode, missing field).
    #[error(transparent)]
    Protocol(#[from] ProtocolError),

    /// A local action was refused by the turn state machine.
    #[error(transparent)]
    Session(#[from] SessionError),

    /// The client has been torn down; no more actions can be dispatched.
    #[error("client is closed")]
    Closed,
}
