//! The dispatcher: the single task that owns all game state.
//!
//! Two channels feed it:
//!   1. `Inbound`: frames read off the socket by the reader task
//!   2. `Command`: user actions sent through a [`GameClient`](crate::GameClient)
//!
//! Each message is handled to completion before the next is taken, so
//! the turn state machine, the board mirror and the outcome only ever
//! have one writer. After every change the dispatcher publishes a fresh
//! [`ViewState`] on a `watch` channel.

use std::sync::Arc;

use othello_protocol::{Codec, OutboundFrame, classify};
use othello_session::{Applied, BoardMirror, SessionError, TurnStateMachine};
use othello_transport::{Connection, TransportError, WebSocketConnection};
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::ViewState;

/// A user action on its way to the dispatcher.
pub(crate) enum Command {
    ChooseColor {
        color: othello_protocol::Color,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    ChooseOrder {
        order: othello_protocol::TurnOrder,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    SubmitMove {
        x: usize,
        y: usize,
        reply: oneshot::Sender<Result<(), SessionError>>,
    },
    Close {
        reply: oneshot::Sender<()>,
    },
}

/// Something the reader task saw on the socket.
pub(crate) enum Inbound {
    Frame(Vec<u8>),
    Closed,
    Failed(TransportError),
}

/// Drop guard that tears the connection down when the dispatcher exits.
///
/// Runs on every exit path: explicit close, all handles dropped, or a
/// panic inside the loop. Since `Drop` is synchronous, the async close is
/// spawned as a fire-and-forget task.
struct ConnectionGuard {
    conn: Arc<WebSocketConnection>,
    reader: JoinHandle<()>,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        self.reader.abort();
        if !self.conn.is_open() {
            return;
        }
        let conn = Arc::clone(&self.conn);
        if let Ok(runtime) = tokio::runtime::Handle::try_current() {
            runtime.spawn(async move {
                if let Err(e) = conn.close().await {
                    tracing::debug!(conn_id = %conn.id(), error = %e, "close on teardown failed");
                }
            });
        }
    }
}

/// Reads frames off the socket and forwards them, in order, to the
/// dispatcher. Stops after the connection ends or the dispatcher is gone.
pub(crate) async fn read_frames(
    conn: Arc<WebSocketConnection>,
    inbound: mpsc::Sender<Inbound>,
) {
    loop {
        let msg = match conn.recv().await {
            Ok(Some(data)) => Inbound::Frame(data),
            Ok(None) => Inbound::Closed,
            Err(e) => Inbound::Failed(e),
        };
        let last = !matches!(msg, Inbound::Frame(_));
        if inbound.send(msg).await.is_err() || last {
            break;
        }
    }
}

pub(crate) struct Dispatcher<C: Codec> {
    conn: Arc<WebSocketConnection>,
    codec: C,
    machine: TurnStateMachine,
    board: BoardMirror,
    updates_applied: u64,
    frames_rejected: u64,
    view: watch::Sender<ViewState>,
}

impl<C: Codec> Dispatcher<C> {
    pub(crate) fn new(
        conn: Arc<WebSocketConnection>,
        codec: C,
        view: watch::Sender<ViewState>,
    ) -> Self {
        Self {
            conn,
            codec,
            machine: TurnStateMachine::new(),
            board: BoardMirror::default(),
            updates_applied: 0,
            frames_rejected: 0,
            view,
        }
    }

    /// Runs the dispatch loop until the client is closed or every handle
    /// has been dropped.
    pub(crate) async fn run(
        mut self,
        reader: JoinHandle<()>,
        mut commands: mpsc::Receiver<Command>,
        mut inbound: mpsc::Receiver<Inbound>,
    ) {
        let conn_id = self.conn.id();
        let _guard = ConnectionGuard {
            conn: Arc::clone(&self.conn),
            reader,
        };
        let mut inbound_open = true;

        tracing::info!(%conn_id, "dispatcher started");

        loop {
            tokio::select! {
                cmd = commands.recv() => match cmd {
                    Some(cmd) => {
                        if !self.handle_command(cmd).await {
                            break;
                        }
                    }
                    None => {
                        tracing::debug!(%conn_id, "all client handles dropped");
                        break;
                    }
                },
                msg = inbound.recv(), if inbound_open => match msg {
                    Some(Inbound::Frame(data)) => self.handle_frame(&data),
                    Some(Inbound::Closed) | None => {
                        tracing::info!(%conn_id, "connection closed by peer");
                        inbound_open = false;
                        self.connection_lost();
                    }
                    Some(Inbound::Failed(e)) => {
                        tracing::info!(%conn_id, error = %e, "connection failed");
                        inbound_open = false;
                        self.connection_lost();
                    }
                },
            }
        }

        tracing::info!(%conn_id, "dispatcher stopped");
        // _guard drops here → reader aborted, connection closed.
    }

    /// Handles one user action. Returns `false` once the client is closed.
    async fn handle_command(&mut self, cmd: Command) -> bool {
        match cmd {
            Command::ChooseColor { color, reply } => {
                let result = self.machine.choose_color(color);
                self.finish_action("choose_color", result, reply);
            }
            Command::ChooseOrder { order, reply } => {
                let result = self
                    .machine
                    .choose_order(order, self.conn.is_open())
                    .map(OutboundFrame::from);
                let result = self.send_accepted(result).await;
                self.finish_action("choose_order", result, reply);
            }
            Command::SubmitMove { x, y, reply } => {
                let result = self
                    .machine
                    .submit_move(x, y, &self.board, self.conn.is_open())
                    .map(OutboundFrame::from);
                let result = self.send_accepted(result).await;
                self.finish_action("submit_move", result, reply);
            }
            Command::Close { reply } => {
                self.close().await;
                let _ = reply.send(());
                return false;
            }
        }
        true
    }

    /// Sends the frame of an accepted action.
    async fn send_accepted(
        &self,
        result: Result<OutboundFrame, SessionError>,
    ) -> Result<(), SessionError> {
        let frame = result?;
        self.send(&frame).await;
        Ok(())
    }

    fn finish_action(
        &self,
        action: &'static str,
        result: Result<(), SessionError>,
        reply: oneshot::Sender<Result<(), SessionError>>,
    ) {
        match &result {
            Ok(()) => self.publish(),
            Err(e) => tracing::debug!(action, reason = %e, "action rejected"),
        }
        let _ = reply.send(result);
    }

    /// Fire-and-forget send. Silently dropped if the connection is not open.
    async fn send(&self, frame: &OutboundFrame) {
        let conn_id = self.conn.id();
        if !self.conn.is_open() {
            tracing::debug!(%conn_id, ?frame, "connection not open, dropping frame");
            return;
        }
        let bytes = match self.codec.encode(frame) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(%conn_id, error = %e, "failed to encode frame");
                return;
            }
        };
        if let Err(e) = self.conn.send(&bytes).await {
            tracing::warn!(%conn_id, error = %e, "failed to send frame");
        }
    }

    fn handle_frame(&mut self, data: &[u8]) {
        let conn_id = self.conn.id();
        let event =
            match classify(&self.codec, data, self.machine.snapshot_consumed()) {
                Ok(event) => event,
                Err(e) => {
                    self.frames_rejected += 1;
                    tracing::warn!(%conn_id, error = %e, "discarding undecodable frame");
                    self.publish();
                    return;
                }
            };

        let kind = event.kind();
        match self.machine.apply(event, &mut self.board) {
            Applied::Seeded => {
                tracing::info!(
                    %conn_id,
                    black = self.board.black(),
                    white = self.board.white(),
                    "initial snapshot received"
                );
            }
            Applied::Updated { local_turn } => {
                self.updates_applied += 1;
                tracing::debug!(
                    %conn_id,
                    local_turn,
                    black = self.board.black(),
                    white = self.board.white(),
                    "board updated"
                );
            }
            Applied::Finished => {
                tracing::info!(%conn_id, status = %self.machine.status(), "game over");
            }
            Applied::Ignored => {
                tracing::debug!(%conn_id, kind, "frame ignored");
            }
        }
        self.publish();
    }

    fn connection_lost(&mut self) {
        if self.machine.disconnect() {
            tracing::info!(conn_id = %self.conn.id(), "game stalled: connection lost");
        }
        self.publish();
    }

    async fn close(&mut self) {
        if let Err(e) = self.conn.close().await {
            tracing::debug!(conn_id = %self.conn.id(), error = %e, "close failed");
        }
        self.machine.close();
        self.publish();
    }

    fn publish(&self) {
        let view = ViewState {
            phase: self.machine.phase(),
            session: self.machine.session(),
            board: self.board.clone(),
            status: self.machine.status(),
            outcome: self.machine.outcome().cloned(),
            connected: self.conn.is_open(),
            snapshot_received: self.machine.snapshot_consumed(),
            updates_applied: self.updates_applied,
            frames_rejected: self.frames_rejected,
        };
        // Receivers may all be gone; the state is still authoritative here.
        let _ = self.view.send_replace(view);
    }
}
