//! Integration tests for the room actor and registry.
//!
//! Timings are shrunk to tens of milliseconds so deadline-driven defaults
//! resolve quickly; every wait goes through a bounded `recv` with a
//! timeout, never a bare sleep-and-hope.

use std::time::Duration;

use gambit_engine::{Event, Game, JoinKind, Phase, Timings};
use gambit_protocol::{Intent, PlayerId, SkillKind};
use gambit_room::{PlayerSender, RoomError, RoomHandle, RoomRegistry};
use tokio::sync::mpsc;

// =========================================================================
// Helpers
// =========================================================================

fn pid(id: &str) -> PlayerId {
    PlayerId::new(id)
}

/// Window timings small enough that deadline paths resolve within a
/// test; the turn deadline stays long so it never races an assertion
/// (the AFK test shrinks it separately).
fn fast_timings() -> Timings {
    Timings {
        turn: Duration::from_secs(5),
        kill_choice: Duration::from_millis(60),
        block_take2: Duration::from_millis(60),
        block_akali: Duration::from_millis(60),
        tf_swap: Duration::from_millis(60),
        challenge: Duration::from_millis(60),
        proof: Duration::from_millis(60),
        loss: Duration::from_millis(60),
        steal_response: Duration::from_millis(60),
        reconnect_grace: Duration::from_millis(80),
        finished_linger: Duration::from_millis(100),
    }
}

type EventRx = mpsc::UnboundedReceiver<Event>;

/// Joins a player and returns their inbox, the sender that was registered
/// for them (identifies the "connection"), and the join result.
async fn join(
    handle: &RoomHandle,
    id: &str,
) -> (EventRx, PlayerSender, Result<JoinKind, RoomError>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let result = handle.join(pid(id), id.to_string(), tx.clone()).await;
    (rx, tx, result)
}

/// Receives the next event, failing the test after two seconds.
async fn recv(rx: &mut EventRx) -> Event {
    tokio::time::timeout(Duration::from_secs(2), rx.recv())
        .await
        .expect("timed out waiting for an event")
        .expect("room closed the channel")
}

/// Receives until a state snapshot satisfies `pred`, failing after two
/// seconds. Intermediate snapshots and private notices are drained.
async fn recv_state_until(
    rx: &mut EventRx,
    pred: impl Fn(&Game) -> bool,
) -> Box<Game> {
    let deadline = tokio::time::Instant::now() + Duration::from_secs(2);
    loop {
        let remaining = deadline
            .checked_duration_since(tokio::time::Instant::now())
            .expect("timed out waiting for a matching state");
        let event = tokio::time::timeout(remaining, rx.recv())
            .await
            .expect("timed out waiting for a matching state")
            .expect("room closed the channel");
        if let Event::State { game } = event {
            if pred(&game) {
                return game;
            }
        }
    }
}

/// Sets up a started two-player room and drains both inboxes up to the
/// started snapshot. Returns b's registered sender for disconnect tests.
async fn started_room() -> (RoomHandle, EventRx, EventRx, PlayerSender) {
    let mut registry = RoomRegistry::new(fast_timings());
    let handle = registry.create_room();
    let (mut rx_a, _tx_a, res) = join(&handle, "a").await;
    res.expect("host join");
    let (mut rx_b, tx_b, res) = join(&handle, "b").await;
    res.expect("second join");

    handle.start_game(pid("a")).await.expect("start command");
    recv_state_until(&mut rx_a, |g| g.started).await;
    recv_state_until(&mut rx_b, |g| g.started).await;
    (handle, rx_a, rx_b, tx_b)
}

// =========================================================================
// Joining and starting
// =========================================================================

#[tokio::test]
async fn test_join_broadcasts_state_to_all_players() {
    let mut registry = RoomRegistry::new(fast_timings());
    let handle = registry.create_room();

    let (mut rx_a, _tx_a, res) = join(&handle, "a").await;
    assert!(matches!(res, Ok(JoinKind::New)));
    let state = recv(&mut rx_a).await;
    assert!(matches!(state, Event::State { .. }));

    let (_rx_b, _tx_b, res) = join(&handle, "b").await;
    assert!(matches!(res, Ok(JoinKind::New)));
    // a sees b arrive.
    let state =
        recv_state_until(&mut rx_a, |g| g.players.len() == 2).await;
    assert_eq!(state.host, Some(pid("a")));
}

#[tokio::test]
async fn test_join_rejects_seventh_player() {
    let mut registry = RoomRegistry::new(fast_timings());
    let handle = registry.create_room();

    for id in ["a", "b", "c", "d", "e", "f"] {
        let (_rx, _tx, res) = join(&handle, id).await;
        res.expect("first six joins fit");
    }
    let (_rx, _tx, res) = join(&handle, "g").await;
    assert!(matches!(res, Err(RoomError::RoomFull(_))));
}

#[tokio::test]
async fn test_start_rejected_for_non_host_privately() {
    let mut registry = RoomRegistry::new(fast_timings());
    let handle = registry.create_room();
    let (mut rx_a, _tx_a, _) = join(&handle, "a").await;
    let (mut rx_b, _tx_b, _) = join(&handle, "b").await;

    handle.start_game(pid("b")).await.expect("send command");

    // b gets a private rejection; the game never starts.
    loop {
        match recv(&mut rx_b).await {
            Event::ActionRejected { reason } => {
                assert!(reason.contains("host"));
                break;
            }
            Event::State { game } => assert!(!game.started),
            _ => {}
        }
    }
    // a saw no started snapshot (only join broadcasts).
    while let Ok(event) = rx_a.try_recv() {
        if let Event::State { game } = event {
            assert!(!game.started);
        }
    }
}

#[tokio::test]
async fn test_start_deals_and_begins_turn_loop() {
    let mut registry = RoomRegistry::new(fast_timings());
    let handle = registry.create_room();
    let (mut rx_a, _tx_a, _) = join(&handle, "a").await;
    let (_rx_b, _tx_b, _) = join(&handle, "b").await;

    handle.start_game(pid("a")).await.expect("start command");
    let state = recv_state_until(&mut rx_a, |g| g.started).await;

    assert_eq!(state.phase, Phase::Action);
    assert_eq!(state.turn_index, 0);
    for player in &state.players {
        assert_eq!(player.hand.len(), 2);
        assert_eq!(player.coins, 0);
    }
    assert_eq!(state.deck.len(), 11);
    assert!(state.timer_expire > 0);
}

// =========================================================================
// Intents and broadcasts
// =========================================================================

#[tokio::test]
async fn test_take_one_reaches_every_player() {
    let (handle, mut rx_a, mut rx_b, _tx_b) = started_room().await;

    handle.submit(pid("a"), Intent::TakeOne).await.expect("send");

    let state =
        recv_state_until(&mut rx_a, |g| g.players[0].coins == 1).await;
    assert_eq!(state.turn_index, 1);
    recv_state_until(&mut rx_b, |g| g.players[0].coins == 1).await;
}

#[tokio::test]
async fn test_rejected_intent_goes_only_to_requester() {
    let (handle, mut rx_a, mut rx_b, _tx_b) = started_room().await;

    // b acts out of turn.
    handle.submit(pid("b"), Intent::TakeOne).await.expect("send");

    loop {
        if let Event::ActionRejected { reason } = recv(&mut rx_b).await {
            assert!(reason.contains("turn"));
            break;
        }
    }
    // a received nothing new.
    assert!(rx_a.try_recv().is_err());
}

// =========================================================================
// Deadline-driven defaults
// =========================================================================

#[tokio::test]
async fn test_unchallenged_vladimir_resolves_by_deadline() {
    let (handle, mut rx_a, _rx_b, _tx_b) = started_room().await;

    handle
        .submit(
            pid("a"),
            Intent::UseSkill {
                skill: SkillKind::Vladimir,
                target_id: None,
            },
        )
        .await
        .expect("send");

    recv_state_until(&mut rx_a, |g| g.phase == Phase::AwaitChallenge)
        .await;
    // Nobody challenges; the deadline pays out and play moves on.
    let state = recv_state_until(&mut rx_a, |g| {
        g.players[0].coins == 3 && g.phase == Phase::Action
    })
    .await;
    assert_eq!(state.turn_index, 1);
}

#[tokio::test]
async fn test_expired_turns_eventually_eliminate_afk_player() {
    // Very short turns so six expiries fit comfortably in the test.
    let mut timings = fast_timings();
    timings.turn = Duration::from_millis(50);
    let mut registry = RoomRegistry::new(timings);
    let handle = registry.create_room();
    let (mut rx_a, _tx_a, _) = join(&handle, "a").await;
    let (_rx_b, _tx_b, _) = join(&handle, "b").await;
    handle.start_game(pid("a")).await.expect("start command");

    // Nobody ever acts: both players trade AFK strikes until one is
    // eliminated and the other wins.
    let state =
        recv_state_until(&mut rx_a, |g| g.phase == Phase::Finished).await;
    assert!(state.winner.is_some() || state.banner.contains("Draw"));
    assert!(
        state
            .players
            .iter()
            .any(|p| !p.alive && p.afk_streak == 3)
    );
}

// =========================================================================
// Disconnect grace
// =========================================================================

#[tokio::test]
async fn test_disconnect_grace_eliminates_absent_player() {
    let (handle, mut rx_a, rx_b, tx_b) = started_room().await;

    drop(rx_b);
    handle.disconnected(pid("b"), tx_b).await.expect("send");

    let state = recv_state_until(&mut rx_a, |g| {
        g.players.iter().any(|p| p.id == pid("b") && !p.connected)
    })
    .await;
    assert!(state.players.iter().all(|p| p.alive));

    // Grace elapses without a rejoin: b is eliminated, a wins.
    let state =
        recv_state_until(&mut rx_a, |g| g.phase == Phase::Finished).await;
    assert_eq!(state.winner, Some(pid("a")));
}

#[tokio::test]
async fn test_rejoin_within_grace_keeps_the_seat() {
    let (handle, mut rx_a, rx_b, tx_b) = started_room().await;

    drop(rx_b);
    handle.disconnected(pid("b"), tx_b).await.expect("send");
    recv_state_until(&mut rx_a, |g| {
        g.players.iter().any(|p| !p.connected)
    })
    .await;

    // b comes back before the grace deadline.
    let (mut rx_b, _tx_b2, res) = join(&handle, "b").await;
    assert!(matches!(res, Ok(JoinKind::Rejoined)));

    let state = recv_state_until(&mut rx_b, |g| {
        g.players.iter().all(|p| p.connected)
    })
    .await;
    assert_ne!(state.phase, Phase::Finished);
    assert!(state.players.iter().all(|p| p.alive));

    // Well past the original grace deadline, the seat still plays.
    tokio::time::sleep(Duration::from_millis(150)).await;
    handle.submit(pid("a"), Intent::TakeOne).await.expect("send");
    let state =
        recv_state_until(&mut rx_a, |g| g.players[0].coins == 1).await;
    assert_ne!(state.phase, Phase::Finished);
    assert!(state.players.iter().all(|p| p.alive));
}

#[tokio::test]
async fn test_stale_disconnect_from_replaced_connection_is_ignored() {
    let (handle, _rx_a, rx_b, tx_b) = started_room().await;

    // b's first connection is replaced by a rejoin…
    drop(rx_b);
    let (mut rx_b2, _tx_b2, res) = join(&handle, "b").await;
    assert!(matches!(res, Ok(JoinKind::Rejoined)));

    // …then the old connection's disconnect notification arrives late.
    handle.disconnected(pid("b"), tx_b).await.expect("send");

    // The live seat is unaffected: poke the room and observe b still
    // connected in the resulting broadcast.
    handle.submit(pid("a"), Intent::TakeOne).await.expect("send");
    let state =
        recv_state_until(&mut rx_b2, |g| g.players[0].coins == 1).await;
    assert!(
        state
            .players
            .iter()
            .find(|p| p.id == pid("b"))
            .is_some_and(|p| p.connected)
    );
}

// =========================================================================
// Registry garbage collection
// =========================================================================

#[tokio::test]
async fn test_sweep_destroys_finished_rooms_after_linger() {
    let mut registry = RoomRegistry::new(fast_timings());
    let handle = registry.create_room();
    let code = handle.code().clone();
    let (mut rx_a, _tx_a, _) = join(&handle, "a").await;
    let (rx_b, tx_b, _) = join(&handle, "b").await;

    handle.start_game(pid("a")).await.expect("start");
    // b drops and is eliminated; the game finishes.
    drop(rx_b);
    handle.disconnected(pid("b"), tx_b).await.expect("send");
    recv_state_until(&mut rx_a, |g| g.phase == Phase::Finished).await;

    // Before the linger the room survives a sweep.
    registry.sweep().await;
    assert!(registry.get(&code).is_some());

    tokio::time::sleep(Duration::from_millis(150)).await;
    registry.sweep().await;
    assert!(registry.get(&code).is_none());
}

#[tokio::test]
async fn test_registry_codes_are_six_digits_and_unique() {
    let mut registry = RoomRegistry::new(fast_timings());
    let a = registry.create_room().code().clone();
    let b = registry.create_room().code().clone();

    assert_ne!(a, b);
    for code in [&a, &b] {
        assert_eq!(code.0.len(), 6);
        assert!(code.0.chars().all(|c| c.is_ascii_digit()));
    }
    assert_eq!(registry.room_count(), 2);
}
