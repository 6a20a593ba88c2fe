//! Session types: the identity the local player negotiated.
//!
//! A "session" here is the client's view of who it is in the current
//! game:
//! - WHICH color it plays (chosen locally, no round trip)
//! - WHEN it moves (first or second, announced to the authority)
//! - WHETHER it may move right now

use othello_protocol::{Color, TurnOrder};

/// The color and turn order fixed once the local player has chosen both.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seat {
    pub color: Color,
    pub order: TurnOrder,
}

/// A read-only snapshot of the local player's session.
///
/// Invariants, upheld by [`crate::TurnStateMachine`]:
/// - `order` is only `Some` when `color` is `Some`.
/// - `is_local_turn` is only ever `true` when `order` is `Some`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Session {
    pub color: Option<Color>,
    pub order: Option<TurnOrder>,
    pub is_local_turn: bool,
}

impl Session {
    /// A session with only the color chosen.
    pub(crate) fn with_color(color: Color) -> Self {
        Self {
            color: Some(color),
            order: None,
            is_local_turn: false,
        }
    }

    /// A session with color and order chosen.
    pub(crate) fn seated(seat: Seat, is_local_turn: bool) -> Self {
        Self {
            color: Some(seat.color),
            order: Some(seat.order),
            is_local_turn,
        }
    }
}
