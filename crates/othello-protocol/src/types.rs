//! Wire types exchanged with the remote game authority.
//!
//! Every type here maps one-to-one onto a JSON shape the authority
//! already speaks. The authority owns that format, so these types follow
//! it exactly: numeric cell codes, lowercase color names in the
//! selection frame, and numeric color codes in the move frame.

use serde::de::{Deserializer, IgnoredAny};
use serde::{Deserialize, Serialize};

use std::fmt;

/// Width and height of the board. No other size is valid.
pub const BOARD_SIZE: usize = 8;

/// A numeric code that does not name any variant of the target type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind} code {code}")]
pub struct InvalidCode {
    /// What was being decoded (`"cell"`, `"color"`, `"turn"`).
    pub kind: &'static str,
    /// The offending value.
    pub code: u8,
}

// ---------------------------------------------------------------------------
// Cell and Board
// ---------------------------------------------------------------------------

/// The contents of one board square.
///
/// On the wire a cell is a bare number: `0` empty, `1` black, `2` white.
/// `#[serde(try_from = "u8", into = "u8")]` routes (de)serialization
/// through the numeric conversions below, so an out-of-range code such
/// as `3` fails to decode instead of silently becoming a default.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum Cell {
    #[default]
    Empty,
    Black,
    White,
}

impl Cell {
    /// Returns `true` if no stone occupies the square.
    pub fn is_empty(self) -> bool {
        matches!(self, Self::Empty)
    }
}

impl From<Cell> for u8 {
    fn from(cell: Cell) -> Self {
        match cell {
            Cell::Empty => 0,
            Cell::Black => 1,
            Cell::White => 2,
        }
    }
}

impl TryFrom<u8> for Cell {
    type Error = InvalidCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            0 => Ok(Self::Empty),
            1 => Ok(Self::Black),
            2 => Ok(Self::White),
            code => Err(InvalidCode { kind: "cell", code }),
        }
    }
}

/// The full 8×8 grid, indexed `board[x][y]`.
///
/// A fixed-size array means serde rejects any row or column count other
/// than eight while decoding.
pub type Board = [[Cell; BOARD_SIZE]; BOARD_SIZE];

/// Returns a board with every square empty.
pub fn empty_board() -> Board {
    [[Cell::Empty; BOARD_SIZE]; BOARD_SIZE]
}

// ---------------------------------------------------------------------------
// Color and TurnOrder
// ---------------------------------------------------------------------------

/// A player's stone color.
///
/// Serializes as `"black"` / `"white"` (the selection frame). Move frames
/// carry the numeric [`Color::code`] instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Color {
    Black,
    White,
}

impl Color {
    /// The numeric code used in move frames: `1` black, `2` white.
    pub fn code(self) -> u8 {
        match self {
            Self::Black => 1,
            Self::White => 2,
        }
    }

    /// Parses a numeric color code.
    pub fn from_code(code: u8) -> Result<Self, InvalidCode> {
        match code {
            1 => Ok(Self::Black),
            2 => Ok(Self::White),
            code => Err(InvalidCode { kind: "color", code }),
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Black => write!(f, "black"),
            Self::White => write!(f, "white"),
        }
    }
}

/// Whether the local player moves before or after the opponent.
///
/// On the wire: `1` = local player moves first, `2` = second.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum TurnOrder {
    First,
    Second,
}

impl TurnOrder {
    /// Returns `true` if the local player opens the game.
    pub fn local_starts(self) -> bool {
        matches!(self, Self::First)
    }
}

impl From<TurnOrder> for u8 {
    fn from(order: TurnOrder) -> Self {
        match order {
            TurnOrder::First => 1,
            TurnOrder::Second => 2,
        }
    }
}

impl TryFrom<u8> for TurnOrder {
    type Error = InvalidCode;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        match code {
            1 => Ok(Self::First),
            2 => Ok(Self::Second),
            code => Err(InvalidCode { kind: "turn", code }),
        }
    }
}

impl fmt::Display for TurnOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::First => write!(f, "first"),
            Self::Second => write!(f, "second"),
        }
    }
}

// ---------------------------------------------------------------------------
// Outbound frames
// ---------------------------------------------------------------------------

/// Client → authority: "I play this color, in this turn order."
///
/// `{ "color": "black", "turn": 1 }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorSelection {
    pub color: Color,
    pub turn: TurnOrder,
}

/// Client → authority: "Place my stone here."
///
/// `{ "x": 2, "y": 3, "color": 1 }`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MoveRequest {
    pub x: usize,
    pub y: usize,
    #[serde(with = "color_code")]
    pub color: Color,
}

/// Every frame the controller can send.
///
/// `#[serde(untagged)]` because the authority tells the two shapes apart
/// by their fields, not by a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum OutboundFrame {
    Selection(ColorSelection),
    Move(MoveRequest),
}

impl From<ColorSelection> for OutboundFrame {
    fn from(selection: ColorSelection) -> Self {
        Self::Selection(selection)
    }
}

impl From<MoveRequest> for OutboundFrame {
    fn from(request: MoveRequest) -> Self {
        Self::Move(request)
    }
}

/// Serializes a [`Color`] as its numeric move-frame code.
mod color_code {
    use serde::de::Error as _;
    use serde::{Deserialize, Deserializer, Serializer};

    use super::Color;

    pub fn serialize<S: Serializer>(
        color: &Color,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(color.code())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Color, D::Error> {
        let code = u8::deserialize(deserializer)?;
        Color::from_code(code).map_err(D::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Inbound frames
// ---------------------------------------------------------------------------

/// The `winner` field of a terminal frame.
///
/// The authority sends a numeric code (`0` draw, `1` black, `2` white),
/// but any value, `null` included, marks the frame as terminal.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum WinnerField {
    Code(i64),
    Name(String),
    Other(IgnoredAny),
}

impl WinnerField {
    /// The winning color, or `None` for a draw or an unrecognised value.
    pub fn color(&self) -> Option<Color> {
        match self {
            Self::Code(1) => Some(Color::Black),
            Self::Code(2) => Some(Color::White),
            Self::Name(name) if name.eq_ignore_ascii_case("black") => {
                Some(Color::Black)
            }
            Self::Name(name) if name.eq_ignore_ascii_case("white") => {
                Some(Color::White)
            }
            _ => None,
        }
    }
}

/// Any frame received from the authority, before classification.
///
/// Every field is optional here: which ones are *required* depends on how
/// the frame is classified, and that depends on connection history (see
/// [`crate::classify`]). Unknown fields such as the authority's `turn`
/// are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InboundFrame {
    #[serde(default)]
    pub board: Option<Board>,
    #[serde(default)]
    pub black: Option<u32>,
    #[serde(default)]
    pub white: Option<u32>,
    /// `Some` whenever the key is present, even with a `null` value.
    #[serde(default, deserialize_with = "present")]
    pub winner: Option<WinnerField>,
    #[serde(default)]
    pub message: Option<String>,
}

/// Maps a present key to `Some`, whatever its value.
///
/// Plain `Option<T>` would turn `"winner": null` into `None`, which would
/// hide a terminal frame.
fn present<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<WinnerField>, D::Error> {
    WinnerField::deserialize(deserializer).map(Some)
}

// =========================================================================
// Tests
// =========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cell_serializes_as_code() {
        assert_eq!(serde_json::to_string(&Cell::Empty).unwrap(), "0");
        assert_eq!(serde_json::to_string(&Cell::Black).unwrap(), "1");
        assert_eq!(serde_json::to_string(&Cell::White).unwrap(), "2");
    }

    #[test]
    fn test_cell_rejects_unknown_code() {
        let result: Result<Cell, _> = serde_json::from_str("3");
        assert!(result.is_err());
    }

    #[test]
    fn test_board_rejects_wrong_size() {
        let seven_rows = serde_json::json!(vec![vec![0; 8]; 7]);
        let result: Result<Board, _> = serde_json::from_value(seven_rows);
        assert!(result.is_err());

        let short_row = {
            let mut rows = vec![vec![0; 8]; 8];
            rows[5].pop();
            serde_json::json!(rows)
        };
        let result: Result<Board, _> = serde_json::from_value(short_row);
        assert!(result.is_err());
    }

    #[test]
    fn test_board_decodes_codes_by_position() {
        let mut rows = vec![vec![0u8; 8]; 8];
        rows[3][4] = 1;
        rows[4][4] = 2;
        let board: Board =
            serde_json::from_value(serde_json::json!(rows)).unwrap();
        assert_eq!(board[3][4], Cell::Black);
        assert_eq!(board[4][4], Cell::White);
        assert_eq!(board[0][0], Cell::Empty);
    }

    #[test]
    fn test_color_selection_json_format() {
        let frame = OutboundFrame::from(ColorSelection {
            color: Color::Black,
            turn: TurnOrder::First,
        });
        let json = serde_json::to_value(frame).unwrap();
        assert_eq!(json, serde_json::json!({ "color": "black", "turn": 1 }));

        let frame = OutboundFrame::from(ColorSelection {
            color: Color::White,
            turn: TurnOrder::Second,
        });
        let json = serde_json::to_value(frame).unwrap();
        assert_eq!(json, serde_json::json!({ "color": "white", "turn": 2 }));
    }

    #[test]
    fn test_move_request_json_format() {
        let frame = OutboundFrame::from(MoveRequest {
            x: 2,
            y: 3,
            color: Color::Black,
        });
        let json = serde_json::to_value(frame).unwrap();
        assert_eq!(json, serde_json::json!({ "x": 2, "y": 3, "color": 1 }));
    }

    #[test]
    fn test_outbound_frame_shapes_are_distinguishable() {
        // The selection carries a color *name*, the move a color *code*.
        let selection: OutboundFrame =
            serde_json::from_str(r#"{"color":"white","turn":2}"#).unwrap();
        assert!(matches!(selection, OutboundFrame::Selection(_)));

        let mv: OutboundFrame =
            serde_json::from_str(r#"{"x":7,"y":0,"color":2}"#).unwrap();
        assert_eq!(
            mv,
            OutboundFrame::Move(MoveRequest {
                x: 7,
                y: 0,
                color: Color::White
            })
        );
    }

    #[test]
    fn test_color_codes() {
        assert_eq!(Color::Black.code(), 1);
        assert_eq!(Color::White.code(), 2);
        assert_eq!(Color::from_code(2).unwrap(), Color::White);
        assert!(Color::from_code(0).is_err());
    }

    #[test]
    fn test_inbound_frame_ignores_unknown_fields() {
        let frame: InboundFrame = serde_json::from_str(
            r#"{"board":[[0,0,0,0,0,0,0,0],[0,0,0,0,0,0,0,0],
                         [0,0,0,0,0,0,0,0],[0,0,0,2,1,0,0,0],
                         [0,0,0,1,2,0,0,0],[0,0,0,0,0,0,0,0],
                         [0,0,0,0,0,0,0,0],[0,0,0,0,0,0,0,0]],
                "turn":1,"black":2,"white":2}"#,
        )
        .unwrap();
        assert!(frame.board.is_some());
        assert_eq!(frame.black, Some(2));
        assert!(frame.winner.is_none());
    }

    #[test]
    fn test_inbound_frame_null_winner_is_present() {
        let frame: InboundFrame =
            serde_json::from_str(r#"{"winner":null,"message":"draw"}"#)
                .unwrap();
        assert!(frame.winner.is_some());
    }

    #[test]
    fn test_winner_field_interpretation() {
        let color = |json: &str| {
            let frame: InboundFrame = serde_json::from_str(json).unwrap();
            frame.winner.expect("winner present").color()
        };
        assert_eq!(color(r#"{"winner":1}"#), Some(Color::Black));
        assert_eq!(color(r#"{"winner":2}"#), Some(Color::White));
        assert_eq!(color(r#"{"winner":0}"#), None);
        assert_eq!(color(r#"{"winner":"black"}"#), Some(Color::Black));
        assert_eq!(color(r#"{"winner":"White"}"#), Some(Color::White));
        assert_eq!(color(r#"{"winner":{"team":"?"}}"#), None);
    }

    #[test]
    fn test_inbound_frame_rejects_negative_count() {
        let result: Result<InboundFrame, _> =
            serde_json::from_str(r#"{"black":-1}"#);
        assert!(result.is_err());
    }
}
