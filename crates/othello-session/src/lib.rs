//! Local game state for the Othello controller.
//!
//! This crate holds everything the controller knows about the game in
//! progress, and the rules for changing it:
//!
//! 1. **Session**: which color the local player chose and when it moves
//!    ([`Session`], [`Seat`])
//! 2. **Board mirror**: the authority's last reported board and counts
//!    ([`BoardMirror`])
//! 3. **Turn state machine**: whose move it is and what may be sent
//!    ([`TurnStateMachine`])
//! 4. **Outcome**: the terminal result, recorded once ([`OutcomeRecord`])
//!
//! # How it fits in the stack
//!
//! ```text
//! Client (above)  ← owns the connection, feeds events in, sends frames out
//!     ↕
//! Session Layer (this crate)  ← pure state, no I/O
//!     ↕
//! Protocol Layer (below)  ← provides Event, Color, MoveRequest, …
//! ```

mod board;
mod error;
mod machine;
mod outcome;
mod session;

pub use board::BoardMirror;
pub use error::SessionError;
pub use machine::{Alternation, Applied, TurnPhase, TurnState, TurnStateMachine};
pub use outcome::{Outcome, OutcomeRecord};
pub use session::{Seat, Session};
