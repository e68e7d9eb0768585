//! Player-facing notices sent alongside applied directives.

use xregions_domain::GroupName;

pub const PVP_FORCED_ON_ENTRY: &str = "You have entered a PvP area, your PvP is now forced.";
pub const PVP_FORCED_ON_TOGGLE: &str = "You are in a PvP area, your PvP status is forced.";
pub const PVP_DISABLED_ON_ENTRY: &str =
    "You have entered a no-PvP area, your PvP has been turned off.";
pub const PVP_DISABLED_ON_TOGGLE: &str = "You are in a no-PvP area, your PvP status is forced off.";
pub const GROUP_REVERTED: &str = "Your group has been reverted to default.";

pub fn group_changed(group: &GroupName) -> String {
    format!("Your group has been changed to '{}' due to region setup.", group)
}

/// Notice for a hostile change made on region entry.
pub(crate) fn on_entry(hostile: bool) -> &'static str {
    if hostile {
        PVP_FORCED_ON_ENTRY
    } else {
        PVP_DISABLED_ON_ENTRY
    }
}

/// Notice for a hostile change that overrode a toggle request.
pub(crate) fn on_toggle(hostile: bool) -> &'static str {
    if hostile {
        PVP_FORCED_ON_TOGGLE
    } else {
        PVP_DISABLED_ON_TOGGLE
    }
}
