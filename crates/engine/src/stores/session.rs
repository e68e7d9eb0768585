//! Per-player session storage.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::Mutex;
use xregions_domain::{GroupName, PlayerId, PlayerSessionState};

/// Handle to one player's session. Lock it for the duration of a
/// read-decide-apply sequence so two events for the same player serialize.
pub type SessionHandle = Arc<Mutex<PlayerSessionState>>;

/// Session state for every connected player.
#[derive(Default)]
pub struct SessionStore {
    sessions: DashMap<PlayerId, SessionHandle>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Existing session, or a fresh one seeded with `current_group`.
    pub fn get_or_create(&self, player: PlayerId, current_group: GroupName) -> SessionHandle {
        self.sessions
            .entry(player)
            .or_insert_with(|| {
                tracing::debug!(player = %player, group = %current_group, "Session created");
                Arc::new(Mutex::new(PlayerSessionState::new(current_group)))
            })
            .clone()
    }

    pub fn get(&self, player: PlayerId) -> Option<SessionHandle> {
        self.sessions.get(&player).map(|entry| entry.clone())
    }

    pub fn remove(&self, player: PlayerId) -> Option<SessionHandle> {
        self.sessions.remove(&player).map(|(_, handle)| handle)
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }
}
