//! Room registry: allocates room codes, tracks live rooms, and garbage
//! collects finished ones.

use std::collections::HashMap;

use gambit_engine::Timings;
use gambit_protocol::RoomCode;
use rand::Rng;

use crate::room::{RoomHandle, spawn_room};

/// Default command channel size for room actors.
const DEFAULT_CHANNEL_SIZE: usize = 64;

/// Owns every live room, keyed by its six-digit code.
///
/// The registry is the entry point for room lifecycle from the connection
/// layer. It is not internally synchronized — the server wraps it in a
/// mutex and is its only owner.
pub struct RoomRegistry {
    rooms: HashMap<RoomCode, RoomHandle>,
    timings: Timings,
}

impl RoomRegistry {
    pub fn new(timings: Timings) -> Self {
        Self {
            rooms: HashMap::new(),
            timings,
        }
    }

    /// Creates a room under a freshly allocated code and returns its
    /// handle.
    pub fn create_room(&mut self) -> RoomHandle {
        let code = self.allocate_code();
        let handle =
            spawn_room(code.clone(), self.timings.clone(), DEFAULT_CHANNEL_SIZE);
        self.rooms.insert(code.clone(), handle.clone());
        tracing::info!(%code, rooms = self.rooms.len(), "room created");
        handle
    }

    /// Looks up a room by code.
    pub fn get(&self, code: &RoomCode) -> Option<RoomHandle> {
        self.rooms.get(code).cloned()
    }

    pub fn room_count(&self) -> usize {
        self.rooms.len()
    }

    /// Destroys rooms whose game finished longer than the linger ago, and
    /// drops handles whose actor is already gone. Call periodically.
    pub async fn sweep(&mut self) {
        let mut doomed = Vec::new();
        for (code, handle) in &self.rooms {
            match handle.info().await {
                Ok(info) => {
                    if info
                        .finished_for
                        .is_some_and(|d| d >= self.timings.finished_linger)
                    {
                        doomed.push(code.clone());
                    }
                }
                Err(_) => doomed.push(code.clone()),
            }
        }
        for code in doomed {
            if let Some(handle) = self.rooms.remove(&code) {
                let _ = handle.shutdown().await;
                tracing::info!(%code, "room destroyed");
            }
        }
    }

    /// Picks a six-digit code not currently in use.
    fn allocate_code(&self) -> RoomCode {
        loop {
            let code = RoomCode::new(
                rand::rng().random_range(100_000..1_000_000).to_string(),
            );
            if !self.rooms.contains_key(&code) {
                return code;
            }
        }
    }
}
