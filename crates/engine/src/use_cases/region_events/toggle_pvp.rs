//! Toggle PvP use case.

use std::sync::Arc;

use xregions_domain::{evaluator, Directive, PlayerId};

use super::notices;
use crate::infrastructure::ports::{MessageKind, PlayerGateway, RegionEngine};
use crate::stores::PolicyStore;

/// Overrides a player's PvP toggle when their region forces a state.
pub struct TogglePvp {
    policies: Arc<PolicyStore>,
    regions: Arc<dyn RegionEngine>,
    players: Arc<dyn PlayerGateway>,
}

impl TogglePvp {
    pub fn new(
        policies: Arc<PolicyStore>,
        regions: Arc<dyn RegionEngine>,
        players: Arc<dyn PlayerGateway>,
    ) -> Self {
        Self {
            policies,
            regions,
            players,
        }
    }

    /// An empty result leaves the request to the host's default handling.
    pub async fn execute(&self, player: PlayerId, requested_pvp_on: bool) -> Vec<Directive> {
        let Some(region) = self.regions.current_region(player) else {
            return Vec::new();
        };
        let policy = self.policies.get(region.as_str()).await;
        let directives = evaluator::on_pvp_toggle_attempt(policy.as_ref(), requested_pvp_on);

        for directive in &directives {
            if let Directive::SetHostile(hostile) = directive {
                self.players.set_hostile(player, *hostile);
                self.players
                    .send_message(player, MessageKind::Info, notices::on_toggle(*hostile));
                tracing::debug!(player = %player, region = %region, hostile = *hostile, "PvP toggle overridden");
            }
        }

        directives
    }
}
