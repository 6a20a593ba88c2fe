//! Wire protocol for the Othello controller.
//!
//! This crate defines the frames the controller exchanges with the remote
//! game authority:
//!
//! - **Types** ([`Cell`], [`Board`], [`ColorSelection`], [`MoveRequest`],
//!   [`InboundFrame`], etc.): the structures that travel on the wire.
//! - **Codec** ([`Codec`] trait, [`JsonCodec`]): how those structures
//!   are converted to/from bytes.
//! - **Decoder** ([`classify`], [`Event`]): how a raw inbound frame is
//!   turned into a typed event, using one bit of connection history.
//! - **Errors** ([`ProtocolError`]).
//!
//! # Architecture
//!
//! ```text
//! Transport (bytes) → Protocol (Event) → Session (turn state, board mirror)
//! ```

mod codec;
mod decoder;
mod error;
mod types;

pub use codec::Codec;
#[cfg(feature = "json")]
pub use codec::JsonCodec;
pub use decoder::{Event, GameResult, Snapshot, classify};
pub use error::ProtocolError;
pub use types::{
    BOARD_SIZE, Board, Cell, Color, ColorSelection, InboundFrame, InvalidCode,
    MoveRequest, OutboundFrame, TurnOrder, WinnerField, empty_board,
};
