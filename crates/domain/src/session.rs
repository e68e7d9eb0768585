//! Per-player session state for temporary group substitution.

use crate::value_objects::GroupName;

/// What the adapter remembers about one connected player.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerSessionState {
    previous_group: GroupName,
    temp_group_active: bool,
}

impl PlayerSessionState {
    /// Start a session; the player's group at this moment is the restore
    /// target until a substitution snapshots a newer one.
    pub fn new(current_group: GroupName) -> Self {
        Self {
            previous_group: current_group,
            temp_group_active: false,
        }
    }

    pub fn previous_group(&self) -> &GroupName {
        &self.previous_group
    }

    pub fn temp_group_active(&self) -> bool {
        self.temp_group_active
    }

    /// Record that a substitution is about to happen.
    ///
    /// The snapshot is only taken on the transition from "no substitution"
    /// to "substituted", so nested temp-group regions never overwrite the
    /// original group with a temporary one. Returns whether a snapshot was
    /// taken.
    pub fn begin_substitution(&mut self, current_group: GroupName) -> bool {
        if self.temp_group_active {
            return false;
        }
        self.previous_group = current_group;
        self.temp_group_active = true;
        true
    }

    /// Clear the substitution marker and return the group to restore.
    pub fn end_substitution(&mut self) -> &GroupName {
        self.temp_group_active = false;
        &self.previous_group
    }
}
