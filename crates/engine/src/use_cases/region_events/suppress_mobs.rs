//! Suppress mobs use case.
//!
//! Runs on the world tick, at most once per configured interval. Ticks that
//! arrive sooner are dropped so the containment scan stays bounded no matter
//! how fast the host ticks.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::Mutex;
use xregions_domain::{evaluator, Directive};

use crate::infrastructure::ports::{ClockPort, WorldGateway};
use crate::stores::PolicyStore;

/// What one world-tick notification amounted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    /// Inside the throttle window; nothing scanned.
    Throttled,
    /// Scan ran and deactivated this many mobs.
    Scanned { deactivated: usize },
}

pub struct SuppressMobs {
    policies: Arc<PolicyStore>,
    world: Arc<dyn WorldGateway>,
    clock: Arc<dyn ClockPort>,
    interval: chrono::Duration,
    stop_after_first: bool,
    last_run: Mutex<Option<DateTime<Utc>>>,
}

impl SuppressMobs {
    pub fn new(
        policies: Arc<PolicyStore>,
        world: Arc<dyn WorldGateway>,
        clock: Arc<dyn ClockPort>,
        interval: Duration,
    ) -> Self {
        let interval = chrono::Duration::from_std(interval).unwrap_or_else(|_| {
            tracing::warn!(?interval, "Tick interval out of range, using one second");
            chrono::Duration::seconds(1)
        });
        Self {
            policies,
            world,
            clock,
            interval,
            stop_after_first: false,
            last_run: Mutex::new(None),
        }
    }

    /// Stop each scan after the first deactivated mob, as older releases did.
    pub fn with_stop_after_first(mut self, stop_after_first: bool) -> Self {
        self.stop_after_first = stop_after_first;
        self
    }

    pub async fn execute(&self) -> TickOutcome {
        if !self.claim_run().await {
            return TickOutcome::Throttled;
        }

        let policies = self.policies.snapshot().await;
        let mobs = self.world.active_mobs();
        let mut directives = evaluator::on_world_tick(&policies, &mobs);
        if self.stop_after_first {
            directives.truncate(1);
        }

        let mut deactivated = 0;
        for directive in directives {
            if let Directive::DeactivateMob(mob) = directive {
                self.world.deactivate_mob(mob);
                deactivated += 1;
            }
        }

        if deactivated > 0 {
            tracing::debug!(deactivated, "Suppressed mobs in NoMob regions");
        }
        TickOutcome::Scanned { deactivated }
    }

    /// Record this tick as the last run unless one happened too recently.
    async fn claim_run(&self) -> bool {
        let now = self.clock.now();
        let mut last_run = self.last_run.lock().await;
        if let Some(previous) = *last_run {
            let elapsed = now - previous;
            // a clock that stepped backwards must not stall the scan forever
            if elapsed >= chrono::Duration::zero() && elapsed < self.interval {
                return false;
            }
        }
        *last_run = Some(now);
        true
    }
}
