//! # Othello
//!
//! Client-side controller for an Othello game refereed by a remote
//! authority.
//!
//! The authority owns the rules. This crate keeps a local mirror of the
//! board, enforces whose turn it is before anything is sent, and turns the
//! authority's frames into a state a renderer can draw.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use othello::prelude::*;
//!
//! # async fn run() -> Result<(), OthelloError> {
//! let client = GameClient::open(ClientConfig::default()).await?;
//! client.choose_color(Color::White).await?;
//! client.choose_order(TurnOrder::Second).await?;
//!
//! let mut views = client.subscribe();
//! while views.changed().await.is_ok() {
//!     let view = views.borrow_and_update().clone();
//!     println!("{}", view.status);
//!     if view.outcome.is_some() {
//!         break;
//!     }
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Layers
//!
//! ```text
//! GameClient (this crate)  ← handle, dispatcher task, published ViewState
//!     ↕
//! othello-session          ← turn state machine, board mirror, outcome
//!     ↕
//! othello-protocol         ← frames, codec, inbound classification
//!     ↕
//! othello-transport        ← WebSocket connection
//! ```

mod client;
mod config;
mod error;
mod handler;
mod view;

pub use client::GameClient;
pub use config::{ClientConfig, DEFAULT_ENDPOINT};
pub use error::OthelloError;
pub use view::{Verdict, ViewState};

pub use othello_protocol as protocol;
pub use othello_session as session;
pub use othello_transport as transport;

/// The types most callers need.
pub mod prelude {
    pub use crate::{ClientConfig, GameClient, OthelloError, Verdict, ViewState};
    pub use othello_protocol::{BOARD_SIZE, Cell, Color, TurnOrder};
    pub use othello_session::{BoardMirror, Outcome, SessionError, TurnPhase};
}
