//! Room actor: an isolated Tokio task that owns one game.
//!
//! Each room runs in its own task, receiving player intents and firing
//! deadlines through one ordered queue — so all mutations of one `Game`
//! are serialized without locks. The actor sleeps on at most two timers:
//! the game's single phase deadline, and the earliest reconnect-grace
//! expiry among disconnected seats. A deadline that fires after the phase
//! already moved on carries a stale sequence token and is dropped by the
//! engine.

use std::collections::HashMap;
use std::time::Duration;

use gambit_engine::{Event, Game, JoinKind, Timings};
use gambit_protocol::{Intent, PlayerId, RoomCode};
use tokio::sync::{mpsc, oneshot};
use tokio::time::{self, Instant as TokioInstant};

use crate::RoomError;

/// Channel sender for delivering game events to one player's connection.
pub type PlayerSender = mpsc::UnboundedSender<Event>;

/// Commands sent to a room actor through its channel.
pub(crate) enum RoomCommand {
    /// Seat a player (or restore a known seat) and register their outbound
    /// channel.
    Join {
        player_id: PlayerId,
        nickname: String,
        sender: PlayerSender,
        reply: oneshot::Sender<Result<JoinKind, RoomError>>,
    },

    /// A player's connection dropped; start their grace period. The
    /// sender identifies *which* connection dropped, so a notification
    /// from a superseded connection cannot clobber a reconnected seat.
    Disconnected {
        player_id: PlayerId,
        sender: PlayerSender,
    },

    /// Host asks to start (or restart) the game.
    StartGame { player_id: PlayerId },

    /// A player intent from the dispatcher funnel.
    Intent {
        player_id: PlayerId,
        intent: Intent,
    },

    /// Request room metadata.
    Info {
        reply: oneshot::Sender<RoomInfo>,
    },

    /// Shut the room down.
    Shutdown,
}

/// A snapshot of room metadata (not the game state itself).
#[derive(Debug, Clone)]
pub struct RoomInfo {
    pub code: RoomCode,
    pub player_count: usize,
    pub started: bool,
    /// How long ago the game finished, if it has.
    pub finished_for: Option<Duration>,
}

/// Handle to a running room actor. Cheap to clone; the registry holds one
/// per room.
#[derive(Clone)]
pub struct RoomHandle {
    code: RoomCode,
    sender: mpsc::Sender<RoomCommand>,
}

impl RoomHandle {
    pub fn code(&self) -> &RoomCode {
        &self.code
    }

    /// Seats a player in the room and registers their event channel.
    pub async fn join(
        &self,
        player_id: PlayerId,
        nickname: String,
        sender: PlayerSender,
    ) -> Result<JoinKind, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Join {
                player_id,
                nickname,
                sender,
                reply: reply_tx,
            })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?
    }

    /// Reports a dropped connection (fire-and-forget). `sender` must be
    /// the channel that was registered for this player at join time.
    pub async fn disconnected(
        &self,
        player_id: PlayerId,
        sender: PlayerSender,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Disconnected { player_id, sender })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Asks the room to start the game (host check happens inside).
    pub async fn start_game(
        &self,
        player_id: PlayerId,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::StartGame { player_id })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Delivers a player intent (fire-and-forget; rejections go back to
    /// the player as a private event).
    pub async fn submit(
        &self,
        player_id: PlayerId,
        intent: Intent,
    ) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Intent { player_id, intent })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Requests current room metadata.
    pub async fn info(&self) -> Result<RoomInfo, RoomError> {
        let (reply_tx, reply_rx) = oneshot::channel();
        self.sender
            .send(RoomCommand::Info { reply: reply_tx })
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))?;
        reply_rx
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }

    /// Tells the room to shut down.
    pub async fn shutdown(&self) -> Result<(), RoomError> {
        self.sender
            .send(RoomCommand::Shutdown)
            .await
            .map_err(|_| RoomError::Unavailable(self.code.clone()))
    }
}

/// The internal room actor state. Runs inside a Tokio task.
struct RoomActor {
    game: Game,
    /// Per-player outbound channels; absent for disconnected seats.
    senders: HashMap<PlayerId, PlayerSender>,
    /// Grace expiry per disconnected seat.
    graces: HashMap<PlayerId, TokioInstant>,
    receiver: mpsc::Receiver<RoomCommand>,
}

impl RoomActor {
    async fn run(mut self) {
        tracing::info!(code = %self.game.code, "room actor started");

        loop {
            let phase_deadline = self
                .game
                .armed()
                .map(|d| (d.seq, TokioInstant::from_std(d.at)));
            let next_grace = self
                .graces
                .iter()
                .min_by_key(|(_, at)| **at)
                .map(|(id, at)| (id.clone(), *at));

            tokio::select! {
                cmd = self.receiver.recv() => {
                    match cmd {
                        Some(cmd) => {
                            if self.handle_command(cmd) {
                                break;
                            }
                        }
                        None => break,
                    }
                }
                seq = wait_phase_deadline(phase_deadline) => {
                    // Stale tokens come back as None and change nothing.
                    if let Some(notices) = self.game.deadline_elapsed(seq) {
                        self.deliver(notices);
                        self.broadcast();
                    }
                }
                player_id = wait_grace(next_grace) => {
                    self.graces.remove(&player_id);
                    if self.game.grace_elapsed(&player_id) {
                        tracing::info!(
                            code = %self.game.code,
                            %player_id,
                            "grace period elapsed"
                        );
                        self.senders.remove(&player_id);
                        self.broadcast();
                    }
                }
            }
        }

        tracing::info!(code = %self.game.code, "room actor stopped");
    }

    /// Processes one command. Returns `true` to shut the actor down.
    fn handle_command(&mut self, cmd: RoomCommand) -> bool {
        match cmd {
            RoomCommand::Join {
                player_id,
                nickname,
                sender,
                reply,
            } => {
                let result = self
                    .game
                    .join(player_id.clone(), nickname)
                    .map_err(|e| {
                        RoomError::from_join(e, self.game.code.clone())
                    });
                if result.is_ok() {
                    self.senders.insert(player_id.clone(), sender);
                    self.graces.remove(&player_id);
                    tracing::info!(
                        code = %self.game.code,
                        %player_id,
                        players = self.game.players.len(),
                        "player joined"
                    );
                }
                let ok = result.is_ok();
                let _ = reply.send(result);
                if ok {
                    self.broadcast();
                }
            }

            RoomCommand::Disconnected { player_id, sender } => {
                if self.game.player(&player_id).is_none() {
                    return false;
                }
                // A notification from a connection that has already been
                // replaced by a rejoin refers to a dead socket, not the
                // live seat.
                if self
                    .senders
                    .get(&player_id)
                    .is_some_and(|live| !live.same_channel(&sender))
                {
                    return false;
                }
                self.game.mark_disconnected(&player_id);
                self.senders.remove(&player_id);
                let grace = self.game.timings.reconnect_grace;
                self.graces.insert(
                    player_id.clone(),
                    TokioInstant::now() + grace,
                );
                tracing::info!(
                    code = %self.game.code,
                    %player_id,
                    "player disconnected, grace period started"
                );
                self.broadcast();
            }

            RoomCommand::StartGame { player_id } => {
                match self.game.start(&player_id) {
                    Ok(()) => {
                        tracing::info!(
                            code = %self.game.code,
                            players = self.game.players.len(),
                            "game started"
                        );
                        self.broadcast();
                    }
                    Err(e) => self.send_to(
                        &player_id,
                        Event::ActionRejected {
                            reason: e.to_string(),
                        },
                    ),
                }
            }

            RoomCommand::Intent { player_id, intent } => {
                match self.game.submit(&player_id, intent) {
                    Ok(notices) => {
                        self.deliver(notices);
                        self.broadcast();
                    }
                    Err(e) => {
                        tracing::debug!(
                            code = %self.game.code,
                            %player_id,
                            reason = %e,
                            "intent rejected"
                        );
                        self.send_to(
                            &player_id,
                            Event::ActionRejected {
                                reason: e.to_string(),
                            },
                        );
                    }
                }
            }

            RoomCommand::Info { reply } => {
                let _ = reply.send(RoomInfo {
                    code: self.game.code.clone(),
                    player_count: self.game.players.len(),
                    started: self.game.started,
                    finished_for: self
                        .game
                        .finished_at
                        .map(|at| at.elapsed()),
                });
            }

            RoomCommand::Shutdown => {
                tracing::info!(code = %self.game.code, "room shutting down");
                return true;
            }
        }
        false
    }

    /// Sends the full state snapshot to every connected player.
    fn broadcast(&self) {
        let snapshot = Box::new(self.game.clone());
        for sender in self.senders.values() {
            let _ = sender.send(Event::State {
                game: snapshot.clone(),
            });
        }
    }

    /// Delivers private notices to their addressed players.
    fn deliver(&self, notices: Vec<(PlayerId, Event)>) {
        for (player_id, event) in notices {
            self.send_to(&player_id, event);
        }
    }

    /// Sends one event to one player. Silently drops if their channel is
    /// gone (disconnected).
    fn send_to(&self, player_id: &PlayerId, event: Event) {
        if let Some(sender) = self.senders.get(player_id) {
            let _ = sender.send(event);
        }
    }
}

/// Sleeps until the armed phase deadline, yielding its sequence token.
/// With nothing armed this pends forever — `select!` still serves the
/// other branches.
async fn wait_phase_deadline(
    deadline: Option<(u64, TokioInstant)>,
) -> u64 {
    match deadline {
        Some((seq, at)) => {
            time::sleep_until(at).await;
            seq
        }
        None => std::future::pending().await,
    }
}

/// Sleeps until the earliest grace expiry, yielding the player. Pends
/// forever when every seat is connected.
async fn wait_grace(next: Option<(PlayerId, TokioInstant)>) -> PlayerId {
    match next {
        Some((player_id, at)) => {
            time::sleep_until(at).await;
            player_id
        }
        None => std::future::pending().await,
    }
}

/// Spawns a new room actor task and returns a handle to communicate with
/// it. `channel_size` bounds the command queue for backpressure.
pub(crate) fn spawn_room(
    code: RoomCode,
    timings: Timings,
    channel_size: usize,
) -> RoomHandle {
    let (tx, rx) = mpsc::channel(channel_size);

    let actor = RoomActor {
        game: Game::new(code.clone(), timings),
        senders: HashMap::new(),
        graces: HashMap::new(),
        receiver: rx,
    };

    tokio::spawn(actor.run());

    RoomHandle { code, sender: tx }
}
