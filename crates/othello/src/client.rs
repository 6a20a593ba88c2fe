//! The public handle to a running game.

use std::sync::Arc;

use othello_protocol::{Codec, Color, JsonCodec, TurnOrder};
use othello_session::SessionError;
use othello_transport::{Connection, ConnectionId, WebSocketConnection};
use tokio::sync::{mpsc, oneshot, watch};

use crate::handler::{Command, Dispatcher, read_frames};
use crate::{ClientConfig, OthelloError, Verdict, ViewState};

/// Handle to one game against a remote authority.
///
/// Opening a client connects to the authority and spawns two tasks: a
/// reader that pulls frames off the socket, and a dispatcher that owns
/// the game state. The handle is cheap to clone; every clone talks to the
/// same dispatcher. When the last clone is dropped the dispatcher stops
/// and the connection is closed.
///
/// ```rust,no_run
/// use othello::prelude::*;
///
/// # async fn run() -> Result<(), OthelloError> {
/// let client = GameClient::open(ClientConfig::default()).await?;
/// client.choose_color(Color::Black).await?.into_result()?;
/// client.choose_order(TurnOrder::First).await?.into_result()?;
///
/// let view = client.wait_for(|v| v.session.is_local_turn).await?;
/// println!("{}", view.status);
/// client.submit_move(2, 3).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct GameClient {
    id: ConnectionId,
    commands: mpsc::Sender<Command>,
    view: watch::Receiver<ViewState>,
}

impl GameClient {
    /// Connects to `config.endpoint` and starts the game, speaking JSON.
    ///
    /// # Errors
    /// `OthelloError::Transport` if the connection cannot be established.
    pub async fn open(config: ClientConfig) -> Result<Self, OthelloError> {
        Self::open_with_codec(config, JsonCodec).await
    }

    /// Like [`open`](Self::open), with an explicit codec.
    pub async fn open_with_codec<C: Codec>(
        config: ClientConfig,
        codec: C,
    ) -> Result<Self, OthelloError> {
        let config = config.validated();
        let conn = Arc::new(WebSocketConnection::connect(&config.endpoint).await?);
        let id = conn.id();
        tracing::info!(conn_id = %id, endpoint = %config.endpoint, "connected to authority");

        let (command_tx, command_rx) = mpsc::channel(config.command_capacity);
        let (inbound_tx, inbound_rx) = mpsc::channel(config.inbound_capacity);
        let (view_tx, view_rx) = watch::channel(ViewState::default());

        let reader = tokio::spawn(read_frames(Arc::clone(&conn), inbound_tx));
        let dispatcher = Dispatcher::new(conn, codec, view_tx);
        tokio::spawn(dispatcher.run(reader, command_rx, inbound_rx));

        Ok(Self {
            id,
            commands: command_tx,
            view: view_rx,
        })
    }

    pub fn id(&self) -> ConnectionId {
        self.id
    }

    /// Picks the local player's color. Sends nothing.
    ///
    /// # Errors
    /// `OthelloError::Closed` if the client has been closed.
    pub async fn choose_color(&self, color: Color) -> Result<Verdict, OthelloError> {
        self.request(|reply| Command::ChooseColor { color, reply }).await
    }

    /// Picks who moves first and announces color and order to the authority.
    ///
    /// # Errors
    /// `OthelloError::Closed` if the client has been closed.
    pub async fn choose_order(&self, order: TurnOrder) -> Result<Verdict, OthelloError> {
        self.request(|reply| Command::ChooseOrder { order, reply }).await
    }

    /// Submits a move at column `x`, row `y`.
    ///
    /// A rejected move comes back as [`Verdict::Rejected`] and nothing is
    /// sent. An accepted move hands the turn to the opponent right away.
    ///
    /// # Errors
    /// `OthelloError::Closed` if the client has been closed.
    pub async fn submit_move(&self, x: usize, y: usize) -> Result<Verdict, OthelloError> {
        self.request(|reply| Command::SubmitMove { x, y, reply }).await
    }

    /// Closes the connection and stops the dispatcher. Closing twice is a no-op.
    pub async fn close(&self) -> Result<(), OthelloError> {
        let (reply, done) = oneshot::channel();
        if self.commands.send(Command::Close { reply }).await.is_err() {
            return Ok(());
        }
        // The dispatcher may stop for another reason before replying.
        let _ = done.await;
        Ok(())
    }

    /// The latest published state.
    pub fn view(&self) -> ViewState {
        self.view.borrow().clone()
    }

    /// A receiver that is notified on every published change.
    pub fn subscribe(&self) -> watch::Receiver<ViewState> {
        self.view.clone()
    }

    /// Waits until the published state satisfies `pred` and returns it.
    ///
    /// # Errors
    /// `OthelloError::Closed` if the dispatcher stops first.
    pub async fn wait_for(
        &self,
        pred: impl FnMut(&ViewState) -> bool,
    ) -> Result<ViewState, OthelloError> {
        let mut rx = self.view.clone();
        let view = rx.wait_for(pred).await.map_err(|_| OthelloError::Closed)?;
        Ok(view.clone())
    }

    async fn request(
        &self,
        make: impl FnOnce(oneshot::Sender<Result<(), SessionError>>) -> Command,
    ) -> Result<Verdict, OthelloError> {
        let (reply, verdict) = oneshot::channel();
        self.commands
            .send(make(reply))
            .await
            .map_err(|_| OthelloError::Closed)?;
        let result = verdict.await.map_err(|_| OthelloError::Closed)?;
        Ok(Verdict::from(result))
    }
}

impl std::fmt::Debug for GameClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameClient")
            .field("id", &self.id)
            .field("phase", &self.view.borrow().phase)
            .finish()
    }
}
