//! Player disconnect use case.

use std::sync::Arc;

use xregions_domain::PlayerId;

use crate::infrastructure::ports::PlayerGateway;
use crate::stores::SessionStore;

/// Puts back a player's own group if they leave the server while still
/// substituted, then forgets the session.
pub struct PlayerDisconnect {
    sessions: Arc<SessionStore>,
    players: Arc<dyn PlayerGateway>,
}

impl PlayerDisconnect {
    pub fn new(sessions: Arc<SessionStore>, players: Arc<dyn PlayerGateway>) -> Self {
        Self { sessions, players }
    }

    /// Returns whether the group had to be restored.
    pub async fn execute(&self, player: PlayerId) -> bool {
        let Some(handle) = self.sessions.get(player) else {
            return false;
        };
        // Lock before forgetting the session so an in-flight entry or exit
        // finishes against the same state.
        let session = handle.lock().await;
        self.sessions.remove(player);
        let previous = session.previous_group();

        if self.players.group(player).as_ref() == Some(previous) {
            return false;
        }

        self.players.set_group(player, previous);
        tracing::info!(player = %player, group = %previous, "Group restored on disconnect");
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_fixtures::{group, FakeHost};

    const PLAYER: PlayerId = PlayerId::new(5);

    #[tokio::test]
    async fn restores_substituted_group_and_drops_session() {
        let host = Arc::new(FakeHost::new());
        host.add_player(PLAYER, "default");
        let sessions = Arc::new(SessionStore::new());
        {
            let session = sessions.get_or_create(PLAYER, group("default"));
            session.lock().await.begin_substitution(group("default"));
        }
        // left-region notification never arrived
        host.add_player(PLAYER, "vip");

        let use_case = PlayerDisconnect::new(sessions.clone(), host.clone());
        assert!(use_case.execute(PLAYER).await);
        assert_eq!(host.group_of(PLAYER).as_deref(), Some("default"));
        assert!(sessions.get(PLAYER).is_none());
    }

    #[tokio::test]
    async fn matching_group_is_left_alone() {
        let host = Arc::new(FakeHost::new());
        host.add_player(PLAYER, "default");
        let sessions = Arc::new(SessionStore::new());
        sessions.get_or_create(PLAYER, group("default"));

        let use_case = PlayerDisconnect::new(sessions.clone(), host.clone());
        assert!(!use_case.execute(PLAYER).await);
        assert!(sessions.is_empty());
    }

    #[tokio::test]
    async fn waits_for_in_flight_event_before_restoring() {
        let host = Arc::new(FakeHost::new());
        host.add_player(PLAYER, "default");
        let sessions = Arc::new(SessionStore::new());
        let handle = sessions.get_or_create(PLAYER, group("default"));
        let mut guard = handle.lock().await;

        let use_case = Arc::new(PlayerDisconnect::new(sessions.clone(), host.clone()));
        let disconnecting = tokio::spawn({
            let use_case = use_case.clone();
            async move { use_case.execute(PLAYER).await }
        });
        for _ in 0..8 {
            tokio::task::yield_now().await;
        }
        // session stays registered until the in-flight event is done
        assert!(sessions.get(PLAYER).is_some());

        // an entry finishing its substitution under the lock
        guard.begin_substitution(group("default"));
        host.add_player(PLAYER, "vip");
        drop(guard);

        assert!(disconnecting.await.expect("disconnect task"));
        assert_eq!(host.group_of(PLAYER).as_deref(), Some("default"));
        assert!(sessions.is_empty());
    }

    #[tokio::test]
    async fn unknown_player_is_a_no_op() {
        let host = Arc::new(FakeHost::new());
        let use_case = PlayerDisconnect::new(Arc::new(SessionStore::new()), host.clone());
        assert!(!use_case.execute(PLAYER).await);
    }
}
