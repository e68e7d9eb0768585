//! Player hurt use case.

use std::sync::Arc;

use xregions_domain::{evaluator, Directive, PlayerId};

use crate::infrastructure::ports::{PlayerGateway, RegionEngine};
use crate::stores::PolicyStore;

/// Heals players who take damage inside a Heal region.
pub struct PlayerHurt {
    policies: Arc<PolicyStore>,
    regions: Arc<dyn RegionEngine>,
    players: Arc<dyn PlayerGateway>,
}

impl PlayerHurt {
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

    pub async fn execute(&self, player: PlayerId) -> Vec<Directive> {
        let Some(region) = self.regions.current_region(player) else {
            return Vec::new();
        };
        let policy = self.policies.get(region.as_str()).await;
        let directives = evaluator::on_player_hurt(policy.as_ref());

        if directives.contains(&Directive::HealToMax) {
            self.players.heal_to_max(player);
            tracing::trace!(player = %player, region = %region, "Healed to max");
        }

        directives
    }
}
