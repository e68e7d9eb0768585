//! RegionPolicy entity - the rules attached to one policy-bearing region.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::flags::RegionFlags;
use crate::value_objects::{GroupName, RegionName};

/// Policy for a single region.
///
/// Mutators only change the in-memory value. Callers are expected to hand the
/// result back to the policy store so it is written through before anyone
/// else observes it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegionPolicy {
    region_name: RegionName,
    flags: RegionFlags,
    temp_group: Option<GroupName>,
    banned_items: BTreeSet<i32>,
    banned_projectiles: BTreeSet<i32>,
}

impl RegionPolicy {
    /// An empty policy: no flags, no group, no bans.
    pub fn new(region_name: RegionName) -> Self {
        Self {
            region_name,
            flags: RegionFlags::empty(),
            temp_group: None,
            banned_items: BTreeSet::new(),
            banned_projectiles: BTreeSet::new(),
        }
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    pub fn with_flags(mut self, flags: RegionFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_temp_group(mut self, group: Option<GroupName>) -> Self {
        self.temp_group = group;
        self
    }

    pub fn with_banned_items(mut self, items: impl IntoIterator<Item = i32>) -> Self {
        self.banned_items = items.into_iter().collect();
        self
    }

    pub fn with_banned_projectiles(mut self, projectiles: impl IntoIterator<Item = i32>) -> Self {
        self.banned_projectiles = projectiles.into_iter().collect();
        self
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn region_name(&self) -> &RegionName {
        &self.region_name
    }

    pub fn flags(&self) -> RegionFlags {
        self.flags
    }

    pub fn has_flag(&self, flag: RegionFlags) -> bool {
        self.flags.contains(flag)
    }

    pub fn temp_group(&self) -> Option<&GroupName> {
        self.temp_group.as_ref()
    }

    pub fn banned_items(&self) -> &BTreeSet<i32> {
        &self.banned_items
    }

    pub fn banned_projectiles(&self) -> &BTreeSet<i32> {
        &self.banned_projectiles
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Add a flag. Returns `false` if it was already present.
    pub fn add_flag(&mut self, flag: RegionFlags) -> bool {
        let changed = !self.flags.contains(flag);
        self.flags.insert(flag);
        changed
    }

    /// Remove a flag. Returns `false` if it was not present.
    pub fn remove_flag(&mut self, flag: RegionFlags) -> bool {
        let changed = self.flags.intersects(flag);
        self.flags.remove(flag);
        changed
    }

    pub fn set_temp_group(&mut self, group: Option<GroupName>) {
        self.temp_group = group;
    }

    pub fn ban_item(&mut self, id: i32) -> bool {
        self.banned_items.insert(id)
    }

    pub fn unban_item(&mut self, id: i32) -> bool {
        self.banned_items.remove(&id)
    }

    pub fn ban_projectile(&mut self, id: i32) -> bool {
        self.banned_projectiles.insert(id)
    }

    pub fn unban_projectile(&mut self, id: i32) -> bool {
        self.banned_projectiles.remove(&id)
    }

    /// ForcePvp and ForcePvpOff together; both still evaluate.
    pub fn has_conflicting_pvp_flags(&self) -> bool {
        self.flags
            .contains(RegionFlags::FORCE_PVP | RegionFlags::FORCE_PVP_OFF)
    }
}

/// Comma-joined storage form of an id set.
pub fn join_ids(ids: &BTreeSet<i32>) -> String {
    ids.iter()
        .map(i32::to_string)
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse the comma-joined storage form. Non-integer entries are skipped.
pub fn parse_ids(value: &str) -> BTreeSet<i32> {
    value
        .split(',')
        .filter_map(|token| token.trim().parse().ok())
        .collect()
}
