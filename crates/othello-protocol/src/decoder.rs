//! Classification of inbound frames.
//!
//! Snapshot frames and update frames have the same shape, so the payload
//! alone cannot say which one it is. The decoder therefore takes one bit
//! of connection history, whether the initial snapshot has already been
//! consumed, and applies three rules in order:
//!
//! 1. No snapshot consumed yet → [`Event::InitialSnapshot`], whatever else
//!    the frame carries.
//! 2. A `winner` key is present → [`Event::GameOver`].
//! 3. Otherwise → [`Event::StateUpdate`].
//!
//! A frame that lacks a field its classification requires is an error and
//! must not touch any state, the history bit included.

use crate::{Board, Codec, Color, InboundFrame, ProtocolError};

/// Board and piece counts as reported by the authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    pub board: Board,
    pub black: u32,
    pub white: u32,
}

/// The terminal result reported by the authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameResult {
    /// `None` for a draw (or a winner value the client doesn't recognise).
    pub winner: Option<Color>,
    pub message: String,
    /// Final counts, when the authority includes them.
    pub black: Option<u32>,
    pub white: Option<u32>,
}

/// A classified inbound frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// The first frame of the connection. Seeds the board; no turn change.
    InitialSnapshot(Snapshot),
    /// Any later board frame. Implies a turn transition.
    StateUpdate(Snapshot),
    /// The game has ended.
    GameOver(GameResult),
}

impl Event {
    /// A short name for logging.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InitialSnapshot(_) => "initial_snapshot",
            Self::StateUpdate(_) => "state_update",
            Self::GameOver(_) => "game_over",
        }
    }
}

/// Decodes and classifies one raw inbound frame.
///
/// `snapshot_consumed` is the caller's record of whether an
/// [`Event::InitialSnapshot`] has already been accepted on this
/// connection. The caller flips it after a successful `InitialSnapshot`.
///
/// # Errors
/// `ProtocolError::Decode` for malformed payloads, and
/// `ProtocolError::MissingField` when a required field is absent.
pub fn classify<C: Codec>(
    codec: &C,
    raw: &[u8],
    snapshot_consumed: bool,
) -> Result<Event, ProtocolError> {
    let frame: InboundFrame = codec.decode(raw)?;

    if !snapshot_consumed {
        return into_snapshot(frame).map(Event::InitialSnapshot);
    }

    if let Some(winner) = &frame.winner {
        let winner = winner.color();
        let message = frame.message.ok_or(ProtocolError::MissingField("message"))?;
        return Ok(Event::GameOver(GameResult {
            winner,
            message,
            black: frame.black,
            white: frame.white,
        }));
    }

    into_snapshot(frame).map(Event::StateUpdate)
}

fn into_snapshot(frame: InboundFrame) -> Result<Snapshot, ProtocolError> {
    Ok(Snapshot {
        board: frame.board.ok_or(ProtocolError::MissingField("board"))?,
        black: frame.black.ok_or(ProtocolError::MissingField("black"))?,
        white: frame.white.ok_or(ProtocolError::MissingField("white"))?,
    })
}
