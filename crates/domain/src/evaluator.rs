//! Policy evaluator.
//!
//! Pure decision functions: given a region's policy (if any) and the facts of
//! one event, return the directives the host should apply. A missing policy
//! means "no policy configured" and always yields nothing.

use std::collections::{HashMap, HashSet};

use crate::directive::{Directive, MobPresence};
use crate::flags::RegionFlags;
use crate::policy::RegionPolicy;
use crate::value_objects::RegionName;

/// A player entered a region.
///
/// Every applicable rule is emitted; ForcePvp and ForcePvpOff are evaluated
/// independently even though having both is a misconfiguration.
pub fn on_region_entered(policy: Option<&RegionPolicy>, player_was_hostile: bool) -> Vec<Directive> {
    let Some(policy) = policy else {
        return Vec::new();
    };

    let mut directives = Vec::new();
    if policy.has_flag(RegionFlags::FORCE_PVP) && !player_was_hostile {
        directives.push(Directive::SetHostile(true));
    }
    if policy.has_flag(RegionFlags::FORCE_PVP_OFF) && player_was_hostile {
        directives.push(Directive::SetHostile(false));
    }
    if policy.has_flag(RegionFlags::TEMP_GROUP) {
        if let Some(group) = policy.temp_group() {
            directives.push(Directive::SwapGroup(group.clone()));
        }
    }
    directives
}

/// A player left a region. Restoring depends on the flag alone, not on
/// whether a group is currently configured.
pub fn on_region_left(policy: Option<&RegionPolicy>) -> Vec<Directive> {
    match policy {
        Some(policy) if policy.has_flag(RegionFlags::TEMP_GROUP) => vec![Directive::RestoreGroup],
        _ => Vec::new(),
    }
}

/// A player asked to switch PvP on or off. An empty result means the request
/// is honored by the host's default path.
pub fn on_pvp_toggle_attempt(policy: Option<&RegionPolicy>, requested_pvp_on: bool) -> Vec<Directive> {
    let Some(policy) = policy else {
        return Vec::new();
    };

    if !requested_pvp_on && policy.has_flag(RegionFlags::FORCE_PVP) {
        vec![Directive::SetHostile(true)]
    } else if requested_pvp_on && policy.has_flag(RegionFlags::FORCE_PVP_OFF) {
        vec![Directive::SetHostile(false)]
    } else {
        Vec::new()
    }
}

/// A player took damage.
pub fn on_player_hurt(policy: Option<&RegionPolicy>) -> Vec<Directive> {
    match policy {
        Some(policy) if policy.has_flag(RegionFlags::HEAL) => vec![Directive::HealToMax],
        _ => Vec::new(),
    }
}

/// Periodic world scan.
///
/// Emits one `DeactivateMob` per active, unsuppressed mob standing in a
/// NoMob region, in scan order. Every candidate is visited; a mob reported
/// in several NoMob regions is deactivated once.
pub fn on_world_tick(
    policies_by_region: &HashMap<RegionName, RegionPolicy>,
    active_mobs: &[MobPresence],
) -> Vec<Directive> {
    let mut seen = HashSet::new();
    active_mobs
        .iter()
        .filter(|presence| !presence.suppressed)
        .filter(|presence| {
            policies_by_region
                .get(&presence.region)
                .is_some_and(|policy| policy.has_flag(RegionFlags::NO_MOB))
        })
        .filter(|presence| seen.insert(presence.mob))
        .map(|presence| Directive::DeactivateMob(presence.mob))
        .collect()
}
