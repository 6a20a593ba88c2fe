//! The observable state handed to the rendering layer.

use othello_session::{BoardMirror, Outcome, Session, SessionError, TurnPhase};

use crate::OthelloError;

/// Everything a renderer needs, published after every change.
///
/// Obtained from [`GameClient::view`](crate::GameClient::view) or
/// [`GameClient::subscribe`](crate::GameClient::subscribe).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViewState {
    pub phase: TurnPhase,
    pub session: Session,
    pub board: BoardMirror,
    /// Human-readable status line.
    pub status: String,
    pub outcome: Option<Outcome>,
    /// `false` after an explicit close or a lost connection.
    pub connected: bool,
    /// `true` once the initial snapshot has been consumed.
    pub snapshot_received: bool,
    /// Number of state updates applied so far.
    pub updates_applied: u64,
    /// Number of inbound frames discarded as undecodable.
    pub frames_rejected: u64,
}

impl Default for ViewState {
    fn default() -> Self {
        Self {
            phase: TurnPhase::SelectingColor,
            session: Session::default(),
            board: BoardMirror::default(),
            status: "please select color".into(),
            outcome: None,
            connected: true,
            snapshot_received: false,
            updates_applied: 0,
            frames_rejected: 0,
        }
    }
}

/// The result of a user action that passed through the turn guard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The action was applied (and its frame, if any, sent).
    Accepted,
    /// The guard refused it. Nothing was sent and nothing changed.
    Rejected(SessionError),
}

impl Verdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }

    /// Converts a rejection into an error, for callers that want `?`.
    pub fn into_result(self) -> Result<(), OthelloError> {
        match self {
            Self::Accepted => Ok(()),
            Self::Rejected(e) => Err(OthelloError::Session(e)),
        }
    }
}

impl From<Result<(), SessionError>> for Verdict {
    fn from(result: Result<(), SessionError>) -> Self {
        match result {
            Ok(()) => Self::Accepted,
            Err(e) => Self::Rejected(e),
        }
    }
}
