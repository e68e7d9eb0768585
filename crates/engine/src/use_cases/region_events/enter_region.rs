//! Enter region use case.
//!
//! Forces the PvP state a region demands and substitutes the region's
//! temporary group, remembering the player's own group for the way out.

use std::sync::Arc;

use xregions_domain::{evaluator, Directive, PlayerId, RegionName};

use super::notices;
use crate::infrastructure::ports::{MessageKind, PlayerGateway};
use crate::stores::{PolicyStore, SessionStore};

pub struct EnterRegion {
    policies: Arc<PolicyStore>,
    sessions: Arc<SessionStore>,
    players: Arc<dyn PlayerGateway>,
}

impl EnterRegion {
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

    /// Handle a region-entered notification.
    ///
    /// Returns the directives that were applied.
    pub async fn execute(&self, player: PlayerId, region: &RegionName) -> Vec<Directive> {
        let Some(seed_group) = self.players.group(player) else {
            tracing::debug!(player = %player, region = %region, "Region entered by a player without a group");
            return Vec::new();
        };

        // Held until every directive is applied so a concurrent entry or exit
        // for the same player can't interleave with the snapshot.
        let session = self.sessions.get_or_create(player, seed_group);
        let mut session = session.lock().await;

        // Only a read under the lock is a valid snapshot source.
        let Some(current_group) = self.players.group(player) else {
            tracing::debug!(player = %player, region = %region, "Player lost their group before entry was applied");
            return Vec::new();
        };

        let policy = self.policies.get(region.as_str()).await;
        let directives =
            evaluator::on_region_entered(policy.as_ref(), self.players.is_hostile(player));

        for directive in &directives {
            match directive {
                Directive::SetHostile(hostile) => {
                    self.players.set_hostile(player, *hostile);
                    self.players
                        .send_message(player, MessageKind::Info, notices::on_entry(*hostile));
                    tracing::debug!(player = %player, region = %region, hostile, "Forced PvP state on entry");
                }
                Directive::SwapGroup(group) => {
                    if session.begin_substitution(current_group.clone()) {
                        tracing::debug!(player = %player, previous = %current_group, "Snapshotted group before substitution");
                    }
                    self.players.set_group(player, group);
                    self.players.send_message(
                        player,
                        MessageKind::Info,
                        &notices::group_changed(group),
                    );
                    tracing::info!(player = %player, region = %region, group = %group, "Temporary group applied");
                }
                other => {
                    tracing::warn!(directive = ?other, "Unexpected directive on region entry");
                }
            }
        }

        directives
    }
}
