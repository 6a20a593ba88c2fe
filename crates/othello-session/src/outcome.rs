//! Terminal game results.

use othello_protocol::{Color, GameResult};

/// How the game ended, as reported by the authority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    /// `None` for a draw.
    pub winner: Option<Color>,
    /// Human-readable result, shown verbatim.
    pub message: String,
    /// Final counts, when the authority sent them.
    pub black: Option<u32>,
    pub white: Option<u32>,
}

impl From<GameResult> for Outcome {
    fn from(result: GameResult) -> Self {
        Self {
            winner: result.winner,
            message: result.message,
            black: result.black,
            white: result.white,
        }
    }
}

/// Holds the game's outcome once one has been reported.
///
/// Recording is idempotent-once: the first outcome wins and every later
/// one is ignored.
#[derive(Debug, Clone, Default)]
pub struct OutcomeRecord {
    outcome: Option<Outcome>,
}

impl OutcomeRecord {
    /// Records `outcome` unless one is already present.
    ///
    /// Returns `true` if this call recorded it.
    pub fn record(&mut self, outcome: Outcome) -> bool {
        if self.outcome.is_some() {
            tracing::debug!(
                ignored = %outcome.message,
                "outcome already recorded, ignoring"
            );
            return false;
        }
        self.outcome = Some(outcome);
        true
    }

    /// Returns `true` once an outcome has been recorded.
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_some()
    }

    /// The recorded outcome, if any.
    pub fn get(&self) -> Option<&Outcome> {
        self.outcome.as_ref()
    }
}
