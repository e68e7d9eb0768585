//! Leave region use case.

use std::sync::Arc;

use xregions_domain::{evaluator, Directive, PlayerId, RegionName};

use super::notices;
use crate::infrastructure::ports::{MessageKind, PlayerGateway};
use crate::stores::{PolicyStore, SessionStore};

/// Restores the player's own group when they walk out of a temp-group region.
pub struct LeaveRegion {
    policies: Arc<PolicyStore>,
    sessions: Arc<SessionStore>,
    players: Arc<dyn PlayerGateway>,
}

impl LeaveRegion {
    pub fn new(
        policies: Arc<PolicyStore>,
        sessions: Arc<SessionStore>,
        players: Arc<dyn PlayerGateway>,
    ) -> Self {
        Self {
            policies,
            sessions,
            players,
        }
    }

    pub async fn execute(&self, player: PlayerId, region: &RegionName) -> Vec<Directive> {
        let policy = self.policies.get(region.as_str()).await;
        let directives = evaluator::on_region_left(policy.as_ref());
        if directives.is_empty() {
            return directives;
        }

        // Entry always opens a session; a missing one means the host never
        // told us about the entry, so there is nothing known to restore.
        let Some(session) = self.sessions.get(player) else {
            tracing::debug!(player = %player, region = %region, "Left temp-group region without a session");
            return Vec::new();
        };
        let mut session = session.lock().await;

        for directive in &directives {
            if let Directive::RestoreGroup = directive {
                let previous = session.end_substitution().clone();
                self.players.set_group(player, &previous);
                self.players
                    .send_message(player, MessageKind::Info, notices::GROUP_REVERTED);
                tracing::info!(player = %player, region = %region, group = %previous, "Group restored");
            }
        }

        directives
    }
}
