//! Error types for the session layer.

use othello_protocol::BOARD_SIZE;

/// Why a local action was refused by the turn state machine.
///
/// These are guard rejections, not failures: the action is dropped, no
/// frame is sent, and no state changes. Callers usually log them at
/// `debug` and carry on, since most are ordinary UI races such as a
/// double click while a move is in flight.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    /// A color has already been chosen for this game.
    #[error("color already chosen")]
    ColorAlreadyChosen,

    /// The turn order can only be chosen after the color.
    #[error("choose a color before choosing the turn order")]
    OrderBeforeColor,

    /// The turn order has already been chosen for this game.
    #[error("turn order already chosen")]
    OrderAlreadyChosen,

    /// The action needs to send a frame but the connection is not open.
    #[error("connection is not open")]
    NotConnected,

    /// It is not the local player's move.
    #[error("not the local player's turn")]
    NotLocalTurn,

    /// The target square lies outside the board.
    #[error("({x}, {y}) is outside the {BOARD_SIZE}x{BOARD_SIZE} board")]
    OutOfBounds { x: usize, y: usize },

    /// The target square already holds a stone.
    #[error("cell ({x}, {y}) is occupied")]
    CellOccupied { x: usize, y: usize },

    /// The game has ended; nothing can change any more.
    #[error("game is over")]
    GameOver,

    /// The connection was lost; the game cannot continue.
    #[error("connection lost")]
    Disconnected,
}
