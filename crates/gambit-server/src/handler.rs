//! Per-connection handler: lobby handshake, heartbeats, and routing.
//!
//! Each accepted connection gets its own task running this handler. The
//! flow is:
//!   1. Receive `CreateRoom` or `JoinRoom` → seat the player in a room
//!   2. Spawn a writer task that pumps room events to the socket
//!   3. Loop: receive envelopes → route system messages and game intents
//!   4. On any exit path, report the disconnect so the grace period starts

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use gambit_protocol::{
    Codec, Envelope, Intent, Payload, PlayerId, SystemMessage,
};
use gambit_room::{PlayerSender, RoomError, RoomHandle};
use gambit_transport::{Connection, WebSocketConnection};
use tokio::sync::mpsc;

use crate::ServerError;
use crate::server::ServerState;

/// How long a fresh connection has to ask for a room.
const HANDSHAKE_TIMEOUT: Duration = Duration::from_secs(5);

/// Idle window before a silent connection is dropped. Clients keep alive
/// with `Heartbeat`.
const READ_TIMEOUT: Duration = Duration::from_secs(15);

/// Reports the disconnect when the handler exits, however it exits, so
/// the room can start the player's grace period. `Drop` is synchronous,
/// so the async notification is fired on a detached task.
struct DisconnectGuard {
    player_id: PlayerId,
    room: RoomHandle,
    /// The channel registered at join time, proving which connection the
    /// notification is about.
    sender: PlayerSender,
}

impl Drop for DisconnectGuard {
    fn drop(&mut self) {
        let player_id = self.player_id.clone();
        let room = self.room.clone();
        let sender = self.sender.clone();
        tokio::spawn(async move {
            let _ = room.disconnected(player_id, sender).await;
        });
    }
}

/// Handles a single connection from accept to close.
pub(crate) async fn handle_connection(
    conn: WebSocketConnection,
    state: Arc<ServerState>,
) -> Result<(), ServerError> {
    let conn_id = conn.id();
    tracing::debug!(%conn_id, "handling new connection");

    let start = Instant::now();
    let seq = Arc::new(AtomicU64::new(1));

    // --- Step 1: room handshake ---
    let (player_id, room, sender) =
        perform_room_handshake(&conn, &state, &seq, &start).await?;
    tracing::info!(%conn_id, %player_id, code = %room.code(), "player seated");

    let _guard = DisconnectGuard {
        player_id: player_id.clone(),
        room: room.clone(),
        sender,
    };

    // --- Step 2: message loop ---
    loop {
        let data =
            match tokio::time::timeout(READ_TIMEOUT, conn.recv()).await {
                Ok(Ok(Some(data))) => data,
                Ok(Ok(None)) => {
                    tracing::info!(%player_id, "connection closed cleanly");
                    break;
                }
                Ok(Err(e)) => {
                    tracing::debug!(%player_id, error = %e, "recv error");
                    break;
                }
                Err(_) => {
                    tracing::info!(%player_id, "connection timed out");
                    break;
                }
            };

        let envelope: Envelope = match state.codec.decode(&data) {
            Ok(env) => env,
            Err(e) => {
                tracing::debug!(
                    %player_id, error = %e, "failed to decode envelope"
                );
                continue;
            }
        };

        match envelope.payload {
            Payload::System(msg) => {
                let close = handle_system_message(
                    &conn, &state, &room, &player_id, msg, &seq, &start,
                )
                .await?;
                if close {
                    break;
                }
            }
            Payload::Game(bytes) => {
                let intent: Intent = match state.codec.decode(&bytes) {
                    Ok(intent) => intent,
                    Err(e) => {
                        send_error(
                            &conn,
                            &state,
                            400,
                            &format!("invalid intent: {e}"),
                            &seq,
                            &start,
                        )
                        .await?;
                        continue;
                    }
                };
                if let Err(e) =
                    room.submit(player_id.clone(), intent).await
                {
                    send_error(
                        &conn,
                        &state,
                        503,
                        &e.to_string(),
                        &seq,
                        &start,
                    )
                    .await?;
                }
            }
        }
    }

    // _guard drops here → the room starts the grace period.
    Ok(())
}

/// Waits for the first message, which must be `CreateRoom` or `JoinRoom`,
/// seats the player, spawns the outbound pump, and acknowledges.
async fn perform_room_handshake(
    conn: &WebSocketConnection,
    state: &Arc<ServerState>,
    seq: &Arc<AtomicU64>,
    start: &Instant,
) -> Result<(PlayerId, RoomHandle, PlayerSender), ServerError> {
    let data =
        match tokio::time::timeout(HANDSHAKE_TIMEOUT, conn.recv()).await {
            Ok(Ok(Some(data))) => data,
            Ok(Ok(None)) => {
                return Err(ServerError::Protocol(
                    gambit_protocol::ProtocolError::InvalidMessage(
                        "connection closed before a room request".into(),
                    ),
                ));
            }
            Ok(Err(e)) => return Err(ServerError::Transport(e)),
            Err(_) => {
                return Err(ServerError::Protocol(
                    gambit_protocol::ProtocolError::InvalidMessage(
                        "room request timed out".into(),
                    ),
                ));
            }
        };

    let envelope: Envelope = state.codec.decode(&data)?;
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let registered_tx = events_tx.clone();

    let (player_id, room, reply) = match envelope.payload {
        Payload::System(SystemMessage::CreateRoom {
            nickname,
            player_id,
        }) => {
            let room = state.registry.lock().await.create_room();
            match room
                .join(player_id.clone(), nickname, events_tx)
                .await
            {
                Ok(_) => {
                    let code = room.code().clone();
                    (
                        player_id,
                        room,
                        SystemMessage::RoomCreated { code },
                    )
                }
                Err(e) => {
                    send_error(conn, state, 500, &e.to_string(), seq, start)
                        .await?;
                    return Err(ServerError::Room(e));
                }
            }
        }

        Payload::System(SystemMessage::JoinRoom {
            code,
            nickname,
            player_id,
        }) => {
            let Some(room) = state.registry.lock().await.get(&code)
            else {
                send_error(
                    conn,
                    state,
                    404,
                    &RoomError::NotFound(code.clone()).to_string(),
                    seq,
                    start,
                )
                .await?;
                return Err(ServerError::Room(RoomError::NotFound(code)));
            };
            match room
                .join(player_id.clone(), nickname, events_tx)
                .await
            {
                Ok(kind) => {
                    let code = room.code().clone();
                    let rejoined =
                        kind == gambit_engine::JoinKind::Rejoined;
                    (
                        player_id,
                        room,
                        SystemMessage::RoomJoined { code, rejoined },
                    )
                }
                Err(e) => {
                    send_error(conn, state, 409, &e.to_string(), seq, start)
                        .await?;
                    return Err(ServerError::Room(e));
                }
            }
        }

        _ => {
            send_error(
                conn,
                state,
                400,
                "first message must be CreateRoom or JoinRoom",
                seq,
                start,
            )
            .await?;
            return Err(ServerError::Protocol(
                gambit_protocol::ProtocolError::InvalidMessage(
                    "first message must be a room request".into(),
                ),
            ));
        }
    };

    spawn_event_pump(conn.clone(), state, events_rx, seq, start);

    send_system(conn, state, reply, seq, start).await?;
    Ok((player_id, room, registered_tx))
}

/// Pumps room events to the socket until the room drops the channel (the
/// seat disconnected) or a send fails.
fn spawn_event_pump(
    conn: WebSocketConnection,
    state: &Arc<ServerState>,
    mut events_rx: mpsc::UnboundedReceiver<gambit_engine::Event>,
    seq: &Arc<AtomicU64>,
    start: &Instant,
) {
    let state = Arc::clone(state);
    let seq = Arc::clone(seq);
    let start = *start;
    tokio::spawn(async move {
        while let Some(event) = events_rx.recv().await {
            let bytes = match state.codec.encode(&event) {
                Ok(bytes) => bytes,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to encode event");
                    continue;
                }
            };
            let envelope = Envelope {
                seq: seq.fetch_add(1, Ordering::Relaxed),
                timestamp: start.elapsed().as_millis() as u64,
                payload: Payload::Game(bytes),
            };
            let Ok(bytes) = state.codec.encode(&envelope) else {
                continue;
            };
            if conn.send(&bytes).await.is_err() {
                break;
            }
        }
    });
}

/// Handles a system message. Returns `true` if the connection should
/// close.
async fn handle_system_message(
    conn: &WebSocketConnection,
    state: &Arc<ServerState>,
    room: &RoomHandle,
    player_id: &PlayerId,
    msg: SystemMessage,
    seq: &Arc<AtomicU64>,
    start: &Instant,
) -> Result<bool, ServerError> {
    match msg {
        SystemMessage::Heartbeat { client_time } => {
            send_system(
                conn,
                state,
                SystemMessage::HeartbeatAck {
                    client_time,
                    server_time: start.elapsed().as_millis() as u64,
                },
                seq,
                start,
            )
            .await?;
        }

        SystemMessage::StartGame => {
            if let Err(e) = room.start_game(player_id.clone()).await {
                send_error(conn, state, 503, &e.to_string(), seq, start)
                    .await?;
            }
        }

        SystemMessage::Disconnect { reason } => {
            tracing::info!(%player_id, %reason, "client said goodbye");
            return Ok(true);
        }

        SystemMessage::CreateRoom { .. }
        | SystemMessage::JoinRoom { .. } => {
            send_error(
                conn,
                state,
                400,
                "already seated in a room",
                seq,
                start,
            )
            .await?;
        }

        other => {
            tracing::debug!(
                %player_id,
                ?other,
                "ignoring unexpected system message"
            );
        }
    }
    Ok(false)
}

/// Sends a system message wrapped in an envelope.
async fn send_system(
    conn: &WebSocketConnection,
    state: &Arc<ServerState>,
    msg: SystemMessage,
    seq: &Arc<AtomicU64>,
    start: &Instant,
) -> Result<(), ServerError> {
    let envelope = Envelope {
        seq: seq.fetch_add(1, Ordering::Relaxed),
        timestamp: start.elapsed().as_millis() as u64,
        payload: Payload::System(msg),
    };
    let bytes = state.codec.encode(&envelope)?;
    conn.send(&bytes).await.map_err(ServerError::Transport)
}

/// Sends a `SystemMessage::Error` envelope to the client.
async fn send_error(
    conn: &WebSocketConnection,
    state: &Arc<ServerState>,
    code: u16,
    message: &str,
    seq: &Arc<AtomicU64>,
    start: &Instant,
) -> Result<(), ServerError> {
    send_system(
        conn,
        state,
        SystemMessage::Error {
            code,
            message: message.to_string(),
        },
        seq,
        start,
    )
    .await
}
