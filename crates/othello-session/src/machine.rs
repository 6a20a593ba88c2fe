//! The turn state machine: whose move it is, and what may be sent.
//!
//! ```text
//! SelectingColor ──choose_color──→ SelectingOrder ──choose_order──┐
//!                                                                 ▼
//!                         ┌──── LocalTurn ⇄ AwaitingOpponent ─────┘
//!                         │           │            │
//!      any non-terminal ──┴───────────┴────────────┴──(GameOver event)──→ GameOver
//!      any non-terminal ──────────────────────(connection lost)────────→ Disconnected
//!      any non-terminal ──────────────────────(local close)────────────→ Closed
//! ```
//!
//! `GameOver`, `Disconnected` and `Closed` are absorbing: nothing leaves them.
//!
//! # Alternation
//!
//! Every state update after seating grants the local turn, with one
//! exception: the very first update after the order is chosen. For the
//! player who moved first, that update is the echo of their own move,
//! so it must not hand the turn back. The [`Alternation`] flag settles
//! this: it is fixed at order selection to `!local_starts`, consulted
//! only on that first update, and flipped on every update. Its value
//! also drives the status line: an update that finds the flag set
//! announces "Your turn", any other update leaves the status as it was.
//!
//! ```text
//! First:  choose → LocalTurn(flag=false) → submit → Awaiting
//!         → echo (held, flag=true) → opponent (granted, "Your turn", flag=false) …
//! Second: choose → Awaiting(flag=true)
//!         → opponent (granted, "Your turn", flag=false) …
//! ```

use othello_protocol::{
    BOARD_SIZE, ColorSelection, Color, Event, MoveRequest, TurnOrder,
};

use crate::{BoardMirror, Outcome, OutcomeRecord, Seat, Session, SessionError};

/// The state of the local game, with the data each state needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnState {
    /// Nothing chosen yet.
    SelectingColor,

    /// Color chosen locally; waiting for the turn order.
    SelectingOrder { color: Color },

    /// The local player may submit a move. `announced` is `false` when
    /// the turn arrived on an update that did not announce it.
    LocalTurn {
        seat: Seat,
        alternation: Alternation,
        announced: bool,
    },

    /// Waiting for the authority (the opponent's move, or the echo of ours).
    AwaitingOpponent { seat: Seat, alternation: Alternation },

    /// The game has ended. `session` is frozen as it was at that moment.
    GameOver { session: Session },

    /// The connection dropped outside an explicit close.
    Disconnected { session: Session },

    /// The local side closed the connection.
    Closed { session: Session },
}

/// Turn bookkeeping carried by the seated states.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alternation {
    /// Flips on every state update.
    pub flag: bool,
    /// `true` until the first update after order selection is applied.
    pub first_pending: bool,
}

impl Alternation {
    fn after_order(order: TurnOrder) -> Self {
        Self {
            flag: !order.local_starts(),
            first_pending: true,
        }
    }
}

/// [`TurnState`] without its data, for display and matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TurnPhase {
    SelectingColor,
    SelectingOrder,
    LocalTurn,
    AwaitingOpponent,
    GameOver,
    Disconnected,
    Closed,
}

impl TurnState {
    /// The data-less phase of this state.
    pub fn phase(&self) -> TurnPhase {
        match self {
            Self::SelectingColor => TurnPhase::SelectingColor,
            Self::SelectingOrder { .. } => TurnPhase::SelectingOrder,
            Self::LocalTurn { .. } => TurnPhase::LocalTurn,
            Self::AwaitingOpponent { .. } => TurnPhase::AwaitingOpponent,
            Self::GameOver { .. } => TurnPhase::GameOver,
            Self::Disconnected { .. } => TurnPhase::Disconnected,
            Self::Closed { .. } => TurnPhase::Closed,
        }
    }

    /// The session implied by this state.
    pub fn session(&self) -> Session {
        match *self {
            Self::SelectingColor => Session::default(),
            Self::SelectingOrder { color } => Session::with_color(color),
            Self::LocalTurn { seat, .. } => Session::seated(seat, true),
            Self::AwaitingOpponent { seat, .. } => Session::seated(seat, false),
            Self::GameOver { session }
            | Self::Disconnected { session }
            | Self::Closed { session } => session,
        }
    }

    /// Returns `true` for the absorbing states.
    pub fn is_final(&self) -> bool {
        matches!(
            self,
            Self::GameOver { .. } | Self::Disconnected { .. } | Self::Closed { .. }
        )
    }

    /// The state an update moves a seated player into.
    fn after_update(seat: Seat, alternation: Alternation) -> Self {
        let grant = !alternation.first_pending || alternation.flag;
        let next = Alternation {
            flag: !alternation.flag,
            first_pending: false,
        };
        if grant {
            Self::LocalTurn {
                seat,
                alternation: next,
                announced: alternation.flag,
            }
        } else {
            Self::AwaitingOpponent {
                seat,
                alternation: next,
            }
        }
    }
}

impl std::fmt::Display for TurnPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SelectingColor => write!(f, "SelectingColor"),
            Self::SelectingOrder => write!(f, "SelectingOrder"),
            Self::LocalTurn => write!(f, "LocalTurn"),
            Self::AwaitingOpponent => write!(f, "AwaitingOpponent"),
            Self::GameOver => write!(f, "GameOver"),
            Self::Disconnected => write!(f, "Disconnected"),
            Self::Closed => write!(f, "Closed"),
        }
    }
}

/// What [`TurnStateMachine::apply`] did with an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Applied {
    /// The initial snapshot seeded the board. No turn change.
    Seeded,
    /// The board was replaced; `local_turn` tells whether the move is ours.
    Updated { local_turn: bool },
    /// The outcome was recorded and the machine froze.
    Finished,
    /// The machine is final; the event changed nothing.
    Ignored,
}

/// The controller's turn logic.
///
/// Owns the [`TurnState`], the "initial snapshot consumed" bit, and the
/// [`OutcomeRecord`]. The board mirror is owned by the caller and passed
/// in, so the machine decides *whether* it changes but never keeps a copy.
#[derive(Debug, Clone)]
pub struct TurnStateMachine {
    state: TurnState,
    snapshot_consumed: bool,
    outcome: OutcomeRecord,
}

impl Default for TurnStateMachine {
    fn default() -> Self {
        Self::new()
    }
}

impl TurnStateMachine {
    /// A fresh machine: nothing chosen, no snapshot seen.
    pub fn new() -> Self {
        Self {
            state: TurnState::SelectingColor,
            snapshot_consumed: false,
            outcome: OutcomeRecord::default(),
        }
    }

    pub fn state(&self) -> TurnState {
        self.state
    }

    pub fn phase(&self) -> TurnPhase {
        self.state.phase()
    }

    pub fn session(&self) -> Session {
        self.state.session()
    }

    /// Whether the first inbound frame has been consumed as the initial
    /// snapshot. Feed this to [`othello_protocol::classify`].
    pub fn snapshot_consumed(&self) -> bool {
        self.snapshot_consumed
    }

    pub fn outcome(&self) -> Option<&Outcome> {
        self.outcome.get()
    }

    /// Returns `true` once the game has an outcome.
    pub fn is_terminal(&self) -> bool {
        self.outcome.is_terminal()
    }

    /// A human-readable status line for the current state.
    pub fn status(&self) -> String {
        match self.state {
            TurnState::SelectingColor => "please select color".into(),
            TurnState::SelectingOrder { .. } => "first or second?".into(),
            TurnState::LocalTurn { announced: true, .. } => "Your turn".into(),
            TurnState::LocalTurn { announced: false, .. } => {
                "Your opponent's turn.".into()
            }
            TurnState::AwaitingOpponent { .. } => {
                "Your opponent's turn.".into()
            }
            TurnState::GameOver { .. } => self
                .outcome
                .get()
                .map(|o| o.message.clone())
                .unwrap_or_else(|| "game over".into()),
            TurnState::Disconnected { .. } => "connection lost".into(),
            TurnState::Closed { .. } => "connection closed".into(),
        }
    }

    /// Chooses the local player's color. Purely local; nothing is sent.
    pub fn choose_color(&mut self, color: Color) -> Result<(), SessionError> {
        match self.state {
            TurnState::SelectingColor => {
                self.state = TurnState::SelectingOrder { color };
                tracing::debug!(%color, "color chosen");
                Ok(())
            }
            TurnState::GameOver { .. } => Err(SessionError::GameOver),
            TurnState::Disconnected { .. } | TurnState::Closed { .. } => {
                Err(SessionError::Disconnected)
            }
            _ => Err(SessionError::ColorAlreadyChosen),
        }
    }

    /// Chooses the turn order and returns the selection frame to send.
    ///
    /// `connected` must reflect whether the connection can send right now;
    /// the order is announced to the authority, so without a connection
    /// the choice is refused and the state stays put.
    pub fn choose_order(
        &mut self,
        order: TurnOrder,
        connected: bool,
    ) -> Result<ColorSelection, SessionError> {
        match self.state {
            TurnState::SelectingOrder { color } => {
                if !connected {
                    return Err(SessionError::NotConnected);
                }
                let seat = Seat { color, order };
                let alternation = Alternation::after_order(order);
                self.state = if order.local_starts() {
                    TurnState::LocalTurn {
                        seat,
                        alternation,
                        announced: true,
                    }
                } else {
                    TurnState::AwaitingOpponent { seat, alternation }
                };
                tracing::debug!(%color, %order, "turn order chosen");
                Ok(ColorSelection { color, turn: order })
            }
            TurnState::SelectingColor => Err(SessionError::OrderBeforeColor),
            TurnState::LocalTurn { .. } | TurnState::AwaitingOpponent { .. } => {
                Err(SessionError::OrderAlreadyChosen)
            }
            TurnState::GameOver { .. } => Err(SessionError::GameOver),
            TurnState::Disconnected { .. } | TurnState::Closed { .. } => {
                Err(SessionError::Disconnected)
            }
        }
    }

    /// Guards a move and, if it passes, returns the move frame to send.
    ///
    /// A game with an outcome refuses every move. Otherwise the move is
    /// accepted only in `LocalTurn`, with the connection open, inside the
    /// board, onto an empty cell. On success the machine moves
    /// to `AwaitingOpponent` straight away, without waiting for the
    /// authority. Full Othello legality is left to the authority.
    pub fn submit_move(
        &mut self,
        x: usize,
        y: usize,
        board: &BoardMirror,
        connected: bool,
    ) -> Result<MoveRequest, SessionError> {
        if self.is_terminal() {
            return Err(SessionError::GameOver);
        }
        let (seat, alternation) = match self.state {
            TurnState::LocalTurn {
                seat, alternation, ..
            } => (seat, alternation),
            TurnState::Disconnected { .. } | TurnState::Closed { .. } => {
                return Err(SessionError::Disconnected);
            }
            _ => return Err(SessionError::NotLocalTurn),
        };
        if !connected {
            return Err(SessionError::NotConnected);
        }
        if x >= BOARD_SIZE || y >= BOARD_SIZE {
            return Err(SessionError::OutOfBounds { x, y });
        }
        if board.cell(x, y).is_some_and(|cell| !cell.is_empty()) {
            return Err(SessionError::CellOccupied { x, y });
        }

        self.state = TurnState::AwaitingOpponent { seat, alternation };
        Ok(MoveRequest {
            x,
            y,
            color: seat.color,
        })
    }

    /// Applies a classified inbound event.
    ///
    /// Once the machine is final every event is ignored, which also makes
    /// a second `GameOver` a no-op.
    pub fn apply(&mut self, event: Event, board: &mut BoardMirror) -> Applied {
        if self.state.is_final() {
            tracing::debug!(
                kind = event.kind(),
                phase = %self.phase(),
                "ignoring event in final state"
            );
            return Applied::Ignored;
        }

        match event {
            Event::InitialSnapshot(snapshot) => {
                board.replace_from(&snapshot);
                self.snapshot_consumed = true;
                Applied::Seeded
            }
            Event::StateUpdate(snapshot) => {
                board.replace_from(&snapshot);
                self.state = match self.state {
                    TurnState::LocalTurn {
                        seat, alternation, ..
                    }
                    | TurnState::AwaitingOpponent { seat, alternation } => {
                        TurnState::after_update(seat, alternation)
                    }
                    // No seat yet: the board changes, the turn can't.
                    unseated => unseated,
                };
                Applied::Updated {
                    local_turn: self.session().is_local_turn,
                }
            }
            Event::GameOver(result) => {
                let session = self.session();
                self.outcome.record(Outcome::from(result));
                self.state = TurnState::GameOver { session };
                Applied::Finished
            }
        }
    }

    /// Marks the connection as lost.
    ///
    /// Returns `true` if the machine moved to `Disconnected`. A finished
    /// game stays `GameOver`.
    pub fn disconnect(&mut self) -> bool {
        if self.state.is_final() {
            return false;
        }
        self.state = TurnState::Disconnected {
            session: self.session(),
        };
        true
    }

    /// Marks the connection as closed by the local side.
    ///
    /// Returns `true` if the machine moved to `Closed`. A finished game
    /// stays `GameOver` and a lost connection stays `Disconnected`.
    pub fn close(&mut self) -> bool {
        if self.state.is_final() {
            return false;
        }
        self.state = TurnState::Closed {
            session: self.session(),
        };
        true
    }
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use othello_protocol::{Cell, GameResult, Snapshot, empty_board};

    fn snapshot(black: u32, white: u32) -> Snapshot {
        let mut board = empty_board();
        board[3][3] = Cell::White;
        board[4][4] = Cell::White;
        board[3][4] = Cell::Black;
        board[4][3] = Cell::Black;
        Snapshot {
            board,
            black,
            white,
        }
    }

    fn update(black: u32, white: u32) -> Event {
        Event::StateUpdate(snapshot(black, white))
    }

    fn game_over(message: &str) -> Event {
        Event::GameOver(GameResult {
            winner: Some(Color::Black),
            message: message.into(),
            black: Some(40),
            white: Some(24),
        })
    }

    /// A machine that has consumed the initial snapshot and chosen
    /// `color` and `order`.
    fn seated(color: Color, order: TurnOrder) -> (TurnStateMachine, BoardMirror) {
        let mut machine = TurnStateMachine::new();
        let mut board = BoardMirror::default();
        machine.apply(Event::InitialSnapshot(snapshot(2, 2)), &mut board);
        machine.choose_color(color).unwrap();
        machine.choose_order(order, true).unwrap();
        (machine, board)
    }

    // =====================================================================
    // Selection
    // =====================================================================

    #[test]
    fn test_new_machine_selects_color() {
        let machine = TurnStateMachine::new();
        assert_eq!(machine.phase(), TurnPhase::SelectingColor);
        assert_eq!(machine.status(), "please select color");
        assert!(!machine.snapshot_consumed());
    }

    #[test]
    fn test_choose_color_moves_to_order_selection() {
        let mut machine = TurnStateMachine::new();
        machine.choose_color(Color::White).unwrap();
        assert_eq!(
            machine.state(),
            TurnState::SelectingOrder {
                color: Color::White
            }
        );
        assert_eq!(machine.session().color, Some(Color::White));
        assert_eq!(machine.session().order, None);
        assert_eq!(machine.status(), "first or second?");
    }

    #[test]
    fn test_choose_color_twice_is_rejected() {
        let mut machine = TurnStateMachine::new();
        machine.choose_color(Color::Black).unwrap();
        assert_eq!(
            machine.choose_color(Color::White),
            Err(SessionError::ColorAlreadyChosen)
        );
        assert_eq!(machine.session().color, Some(Color::Black));
    }

    #[test]
    fn test_order_before_color_is_rejected() {
        let mut machine = TurnStateMachine::new();
        assert_eq!(
            machine.choose_order(TurnOrder::First, true),
            Err(SessionError::OrderBeforeColor)
        );
        assert_eq!(machine.phase(), TurnPhase::SelectingColor);
    }

    #[test]
    fn test_order_without_connection_is_rejected() {
        let mut machine = TurnStateMachine::new();
        machine.choose_color(Color::Black).unwrap();
        assert_eq!(
            machine.choose_order(TurnOrder::First, false),
            Err(SessionError::NotConnected)
        );
        assert_eq!(machine.phase(), TurnPhase::SelectingOrder);
    }

    #[test]
    fn test_choose_first_grants_local_turn() {
        let mut machine = TurnStateMachine::new();
        machine.choose_color(Color::Black).unwrap();
        let frame = machine.choose_order(TurnOrder::First, true).unwrap();

        assert_eq!(
            frame,
            ColorSelection {
                color: Color::Black,
                turn: TurnOrder::First
            }
        );
        assert!(machine.session().is_local_turn);
        assert_eq!(machine.phase(), TurnPhase::LocalTurn);
        assert_eq!(machine.status(), "Your turn");
    }

    #[test]
    fn test_choose_second_awaits_opponent() {
        let mut machine = TurnStateMachine::new();
        machine.choose_color(Color::White).unwrap();
        let frame = machine.choose_order(TurnOrder::Second, true).unwrap();

        assert_eq!(frame.turn, TurnOrder::Second);
        assert!(!machine.session().is_local_turn);
        assert_eq!(machine.phase(), TurnPhase::AwaitingOpponent);
        assert_eq!(machine.status(), "Your opponent's turn.");
    }

    #[test]
    fn test_choose_order_twice_is_rejected() {
        let (mut machine, _) = seated(Color::Black, TurnOrder::First);
        assert_eq!(
            machine.choose_order(TurnOrder::Second, true),
            Err(SessionError::OrderAlreadyChosen)
        );
    }

    // =====================================================================
    // Snapshots and updates
    // =====================================================================

    #[test]
    fn test_initial_snapshot_seeds_board_without_turn_change() {
        let mut machine = TurnStateMachine::new();
        let mut board = BoardMirror::default();

        let applied =
            machine.apply(Event::InitialSnapshot(snapshot(2, 2)), &mut board);

        assert_eq!(applied, Applied::Seeded);
        assert!(machine.snapshot_consumed());
        assert_eq!((board.black(), board.white()), (2, 2));
        assert_eq!(machine.phase(), TurnPhase::SelectingColor);
        assert_eq!(machine.status(), "please select color");
    }

    #[test]
    fn test_update_before_seating_replaces_board_only() {
        let mut machine = TurnStateMachine::new();
        let mut board = BoardMirror::default();
        machine.choose_color(Color::Black).unwrap();

        let applied = machine.apply(update(3, 1), &mut board);

        assert_eq!(applied, Applied::Updated { local_turn: false });
        assert_eq!(board.black(), 3);
        assert_eq!(machine.phase(), TurnPhase::SelectingOrder);
    }

    #[test]
    fn test_update_replaces_board_exactly() {
        let (mut machine, mut board) = seated(Color::Black, TurnOrder::Second);
        let mut grid = empty_board();
        grid[0][0] = Cell::White;
        machine.apply(
            Event::StateUpdate(Snapshot {
                board: grid,
                black: 0,
                white: 1,
            }),
            &mut board,
        );
        assert_eq!(board.grid(), &grid);
        assert_eq!((board.black(), board.white()), (0, 1));
    }

    #[test]
    fn test_round_trip_when_moving_first() {
        let (mut machine, mut board) = seated(Color::Black, TurnOrder::First);
        assert_eq!(machine.phase(), TurnPhase::LocalTurn);
        assert_eq!(machine.status(), "Your turn");

        let mv = machine.submit_move(2, 3, &board, true).unwrap();
        assert_eq!(
            mv,
            MoveRequest {
                x: 2,
                y: 3,
                color: Color::Black
            }
        );
        assert_eq!(machine.phase(), TurnPhase::AwaitingOpponent);
        assert_eq!(machine.status(), "Your opponent's turn.");

        // First update after seating is the echo of our move: held.
        let applied = machine.apply(update(4, 1), &mut board);
        assert_eq!(applied, Applied::Updated { local_turn: false });
        assert_eq!(machine.phase(), TurnPhase::AwaitingOpponent);

        // Opponent's reply: granted and announced.
        let applied = machine.apply(update(3, 3), &mut board);
        assert_eq!(applied, Applied::Updated { local_turn: true });
        assert_eq!(machine.phase(), TurnPhase::LocalTurn);
        assert_eq!(machine.status(), "Your turn");

        // From here on every update grants the turn. The status only
        // announces it on every other update.
        machine.submit_move(5, 5, &board, true).unwrap();
        let applied = machine.apply(update(5, 2), &mut board);
        assert_eq!(applied, Applied::Updated { local_turn: true });
        assert_eq!(machine.status(), "Your opponent's turn.");
        machine.apply(update(4, 4), &mut board);
        assert!(machine.session().is_local_turn);
        assert_eq!(machine.status(), "Your turn");
    }

    #[test]
    fn test_round_trip_when_moving_second() {
        let (mut machine, mut board) = seated(Color::White, TurnOrder::Second);
        assert_eq!(machine.phase(), TurnPhase::AwaitingOpponent);

        // The opponent opens: the flag is set, so the turn is granted.
        let applied = machine.apply(update(4, 1), &mut board);
        assert_eq!(applied, Applied::Updated { local_turn: true });
        assert_eq!(machine.status(), "Your turn");

        let mv = machine.submit_move(2, 4, &board, true).unwrap();
        assert_eq!(mv.color, Color::White);
        assert_eq!(machine.phase(), TurnPhase::AwaitingOpponent);

        // Later updates grant the turn regardless of the flag.
        machine.apply(update(3, 3), &mut board);
        assert_eq!(machine.phase(), TurnPhase::LocalTurn);
        assert_eq!(machine.status(), "Your opponent's turn.");
        machine.apply(update(5, 2), &mut board);
        assert_eq!(machine.phase(), TurnPhase::LocalTurn);
        assert_eq!(machine.status(), "Your turn");
    }

    #[test]
    fn test_flag_consulted_only_on_first_update() {
        let (mut machine, mut board) = seated(Color::White, TurnOrder::Second);
        let TurnState::AwaitingOpponent { alternation, .. } = machine.state()
        else {
            panic!("expected AwaitingOpponent, got {:?}", machine.state());
        };
        assert_eq!(
            alternation,
            Alternation {
                flag: true,
                first_pending: true
            }
        );

        machine.apply(update(4, 1), &mut board);
        machine.submit_move(2, 2, &board, true).unwrap();
        machine.apply(update(3, 3), &mut board);

        assert!(machine.session().is_local_turn);
        let TurnState::LocalTurn { alternation, .. } = machine.state() else {
            panic!("expected LocalTurn, got {:?}", machine.state());
        };
        assert_eq!(
            alternation,
            Alternation {
                flag: true,
                first_pending: false
            }
        );
    }

    // =====================================================================
    // Move guard
    // =====================================================================

    #[test]
    fn test_submit_while_awaiting_is_rejected() {
        let (mut machine, board) = seated(Color::White, TurnOrder::Second);
        let before = machine.state();
        assert_eq!(
            machine.submit_move(2, 3, &board, true),
            Err(SessionError::NotLocalTurn)
        );
        assert_eq!(machine.state(), before);
    }

    #[test]
    fn test_double_submit_is_rejected() {
        let (mut machine, board) = seated(Color::Black, TurnOrder::First);
        machine.submit_move(2, 3, &board, true).unwrap();
        assert_eq!(
            machine.submit_move(2, 3, &board, true),
            Err(SessionError::NotLocalTurn)
        );
    }

    #[test]
    fn test_submit_before_seating_is_rejected() {
        let mut machine = TurnStateMachine::new();
        let board = BoardMirror::default();
        assert_eq!(
            machine.submit_move(0, 0, &board, true),
            Err(SessionError::NotLocalTurn)
        );
    }

    #[test]
    fn test_submit_onto_occupied_cell_is_rejected() {
        let (mut machine, board) = seated(Color::Black, TurnOrder::First);
        // (3, 3) holds a white stone in the opening position.
        assert_eq!(
            machine.submit_move(3, 3, &board, true),
            Err(SessionError::CellOccupied { x: 3, y: 3 })
        );
        assert_eq!(machine.phase(), TurnPhase::LocalTurn);
    }

    #[test]
    fn test_submit_out_of_bounds_is_rejected() {
        let (mut machine, board) = seated(Color::Black, TurnOrder::First);
        assert_eq!(
            machine.submit_move(8, 0, &board, true),
            Err(SessionError::OutOfBounds { x: 8, y: 0 })
        );
        assert_eq!(
            machine.submit_move(0, 8, &board, true),
            Err(SessionError::OutOfBounds { x: 0, y: 8 })
        );
        assert_eq!(machine.phase(), TurnPhase::LocalTurn);
    }

    #[test]
    fn test_submit_without_connection_is_rejected() {
        let (mut machine, board) = seated(Color::Black, TurnOrder::First);
        assert_eq!(
            machine.submit_move(2, 3, &board, false),
            Err(SessionError::NotConnected)
        );
        assert_eq!(machine.phase(), TurnPhase::LocalTurn);
    }

    // =====================================================================
    // Game over and disconnection
    // =====================================================================

    #[test]
    fn test_game_over_freezes_everything() {
        let (mut machine, mut board) = seated(Color::Black, TurnOrder::First);
        let board_before = board.clone();

        let applied = machine.apply(game_over("Black wins 40-24"), &mut board);

        assert_eq!(applied, Applied::Finished);
        assert_eq!(machine.phase(), TurnPhase::GameOver);
        assert!(machine.is_terminal());
        assert_eq!(machine.status(), "Black wins 40-24");
        // Session is frozen as it was, board untouched by the result frame.
        assert!(machine.session().is_local_turn);
        assert_eq!(board, board_before);

        assert_eq!(
            machine.submit_move(2, 3, &board, true),
            Err(SessionError::GameOver)
        );
        assert_eq!(machine.apply(update(0, 64), &mut board), Applied::Ignored);
        assert_eq!(board, board_before);
    }

    #[test]
    fn test_second_game_over_is_ignored() {
        let (mut machine, mut board) = seated(Color::Black, TurnOrder::First);
        machine.apply(game_over("black win"), &mut board);
        let applied = machine.apply(game_over("white win"), &mut board);

        assert_eq!(applied, Applied::Ignored);
        assert_eq!(machine.outcome().unwrap().message, "black win");
    }

    #[test]
    fn test_game_over_before_selection() {
        let mut machine = TurnStateMachine::new();
        let mut board = BoardMirror::default();
        machine.apply(Event::InitialSnapshot(snapshot(2, 2)), &mut board);

        machine.apply(game_over("draw"), &mut board);

        assert_eq!(machine.phase(), TurnPhase::GameOver);
        assert_eq!(
            machine.choose_color(Color::Black),
            Err(SessionError::GameOver)
        );
    }

    #[test]
    fn test_disconnect_is_distinct_from_game_over() {
        let (mut machine, mut board) = seated(Color::White, TurnOrder::Second);

        assert!(machine.disconnect());
        assert_eq!(machine.phase(), TurnPhase::Disconnected);
        assert!(!machine.is_terminal());
        assert_eq!(machine.status(), "connection lost");
        assert_eq!(machine.session().color, Some(Color::White));

        assert!(!machine.disconnect());
        assert_eq!(machine.apply(update(1, 1), &mut board), Applied::Ignored);
        assert_eq!(
            machine.submit_move(0, 0, &board, true),
            Err(SessionError::Disconnected)
        );
    }

    #[test]
    fn test_close_freezes_session() {
        let (mut machine, mut board) = seated(Color::Black, TurnOrder::First);

        assert!(machine.close());
        assert_eq!(machine.phase(), TurnPhase::Closed);
        assert_eq!(machine.status(), "connection closed");
        assert!(machine.session().is_local_turn);
        assert!(!machine.close());
        assert!(!machine.disconnect());
        assert_eq!(machine.apply(update(1, 1), &mut board), Applied::Ignored);
        assert_eq!(
            machine.submit_move(2, 3, &board, true),
            Err(SessionError::Disconnected)
        );
    }

    #[test]
    fn test_close_after_game_over_keeps_result() {
        let (mut machine, mut board) = seated(Color::Black, TurnOrder::First);
        machine.apply(game_over("black win"), &mut board);

        assert!(!machine.close());
        assert_eq!(machine.status(), "black win");
    }

    #[test]
    fn test_disconnect_after_game_over_keeps_result() {
        let (mut machine, mut board) = seated(Color::Black, TurnOrder::First);
        machine.apply(game_over("black win"), &mut board);

        assert!(!machine.disconnect());
        assert_eq!(machine.phase(), TurnPhase::GameOver);
    }
}
