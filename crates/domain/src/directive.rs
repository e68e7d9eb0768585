//! Directives produced by the evaluator and the world inputs it reads.

use serde::{Deserialize, Serialize};

use crate::ids::MobId;
use crate::value_objects::{GroupName, RegionName};

/// An instruction for the host adapter. The evaluator never applies these
/// itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Directive {
    /// Set the player's hostile (PvP) state and re-broadcast it.
    SetHostile(bool),
    /// Restore the player's health to maximum.
    HealToMax,
    /// Mark the mob inactive and broadcast the update.
    DeactivateMob(MobId),
    /// Substitute the player's permission group.
    SwapGroup(GroupName),
    /// Put back the group held before the last substitution.
    RestoreGroup,
}

/// One active mob inside one region, as reported by the host for a tick.
///
/// A mob standing in overlapping regions appears once per region.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MobPresence {
    pub mob: MobId,
    pub region: RegionName,
    /// Already suppressed by the host (or a previous tick).
    pub suppressed: bool,
}

impl MobPresence {
    pub fn new(mob: MobId, region: RegionName) -> Self {
        Self {
            mob,
            region,
            suppressed: false,
        }
    }

    pub fn suppressed(mut self) -> Self {
        self.suppressed = true;
        self
    }
}
