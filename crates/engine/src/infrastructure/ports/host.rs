//! Ports onto the host game server.
//!
//! The host owns region geometry, permission groups, player objects, and the
//! network. These traits expose only what the policy engine reads or asks
//! for. All calls are expected to be cheap and non-blocking.

use xregions_domain::{GroupName, MobId, MobPresence, PlayerId, RegionName};

/// How a text message should be presented to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
    Success,
}

/// The host's region containment engine.
#[cfg_attr(test, mockall::automock)]
pub trait RegionEngine: Send + Sync {
    /// Whether the host currently knows a region by this exact name.
    fn region_exists(&self, name: &RegionName) -> bool;

    /// The region the player is standing in, if any.
    fn current_region(&self, player: PlayerId) -> Option<RegionName>;
}

/// The host's permission-group catalog.
#[cfg_attr(test, mockall::automock)]
pub trait GroupDirectory: Send + Sync {
    fn group_exists(&self, name: &GroupName) -> bool;
}

/// Player-facing operations.
#[cfg_attr(test, mockall::automock)]
pub trait PlayerGateway: Send + Sync {
    fn is_hostile(&self, player: PlayerId) -> bool;

    /// Set the hostile flag and re-broadcast the player's PvP state so every
    /// client (including the player's own) sees the corrected value.
    fn set_hostile(&self, player: PlayerId, hostile: bool);

    fn heal_to_max(&self, player: PlayerId);

    /// The player's current group. `None` when the slot is empty.
    fn group(&self, player: PlayerId) -> Option<GroupName>;

    fn set_group(&self, player: PlayerId, group: &GroupName);

    fn has_permission(&self, player: PlayerId, permission: &str) -> bool;

    fn send_message(&self, player: PlayerId, kind: MessageKind, text: &str);
}

/// World-level operations used by the periodic mob scan.
#[cfg_attr(test, mockall::automock)]
pub trait WorldGateway: Send + Sync {
    /// Every active mob together with each region containing it.
    fn active_mobs(&self) -> Vec<MobPresence>;

    /// Mark the mob inactive and broadcast its update.
    fn deactivate_mob(&self, mob: MobId);
}
