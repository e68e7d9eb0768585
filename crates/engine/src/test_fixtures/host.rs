//! In-memory game server used by scenario tests.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use xregions_domain::{GroupName, MobId, MobPresence, PlayerId, RegionName};

use crate::infrastructure::ports::{
    GroupDirectory, MessageKind, PlayerGateway, RegionEngine, WorldGateway,
};

#[derive(Debug, Default, Clone)]
pub struct FakePlayer {
    pub hostile: bool,
    pub hostile_broadcasts: u32,
    pub heals: u32,
    pub group: Option<GroupName>,
    pub region: Option<RegionName>,
    pub permissions: HashSet<String>,
    pub messages: Vec<(MessageKind, String)>,
}

#[derive(Default)]
struct HostState {
    regions: HashSet<String>,
    groups: HashSet<String>,
    players: HashMap<PlayerId, FakePlayer>,
    mobs: Vec<MobPresence>,
    deactivated: Vec<MobId>,
}

#[derive(Default)]
pub struct FakeHost {
    state: Mutex<HostState>,
}

impl FakeHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn with_state<T>(&self, f: impl FnOnce(&mut HostState) -> T) -> T {
        let mut state = self.state.lock().expect("host state lock");
        f(&mut state)
    }

    fn with_player<T>(&self, player: PlayerId, f: impl FnOnce(&mut FakePlayer) -> T) -> T {
        self.with_state(|state| f(state.players.entry(player).or_default()))
    }

    pub fn add_region(&self, name: &str) {
        self.with_state(|state| state.regions.insert(name.to_string()));
    }

    pub fn delete_region(&self, name: &str) {
        self.with_state(|state| state.regions.remove(name));
    }

    pub fn add_group(&self, name: &str) {
        self.with_state(|state| state.groups.insert(name.to_string()));
    }

    pub fn add_player(&self, player: PlayerId, group: &str) {
        let group = GroupName::new(group).expect("valid group");
        self.with_player(player, |p| p.group = Some(group));
    }

    pub fn grant(&self, player: PlayerId, permission: &str) {
        self.with_player(player, |p| p.permissions.insert(permission.to_string()));
    }

    pub fn move_to(&self, player: PlayerId, region: Option<&str>) {
        let region = region.map(|r| RegionName::new(r).expect("valid region"));
        self.with_player(player, |p| p.region = region);
    }

    pub fn set_player_hostile(&self, player: PlayerId, hostile: bool) {
        self.with_player(player, |p| p.hostile = hostile);
    }

    pub fn spawn_mob(&self, presence: MobPresence) {
        self.with_state(|state| state.mobs.push(presence));
    }

    pub fn player(&self, player: PlayerId) -> FakePlayer {
        self.with_player(player, |p| p.clone())
    }

    pub fn group_of(&self, player: PlayerId) -> Option<String> {
        self.player(player).group.map(|g| g.to_string())
    }

    pub fn messages(&self, player: PlayerId) -> Vec<String> {
        self.player(player)
            .messages
            .into_iter()
            .map(|(_, text)| text)
            .collect()
    }

    pub fn last_message(&self, player: PlayerId) -> Option<(MessageKind, String)> {
        self.player(player).messages.last().cloned()
    }

    pub fn deactivated(&self) -> Vec<MobId> {
        self.with_state(|state| state.deactivated.clone())
    }
}

impl RegionEngine for FakeHost {
    fn region_exists(&self, name: &RegionName) -> bool {
        self.with_state(|state| state.regions.contains(name.as_str()))
    }

    fn current_region(&self, player: PlayerId) -> Option<RegionName> {
        self.with_state(|state| state.players.get(&player).and_then(|p| p.region.clone()))
    }
}

impl GroupDirectory for FakeHost {
    fn group_exists(&self, name: &GroupName) -> bool {
        self.with_state(|state| state.groups.contains(name.as_str()))
    }
}

impl PlayerGateway for FakeHost {
    fn is_hostile(&self, player: PlayerId) -> bool {
        self.with_player(player, |p| p.hostile)
    }

    fn set_hostile(&self, player: PlayerId, hostile: bool) {
        self.with_player(player, |p| {
            p.hostile = hostile;
            p.hostile_broadcasts += 1;
        });
    }

    fn heal_to_max(&self, player: PlayerId) {
        self.with_player(player, |p| p.heals += 1);
    }

    fn group(&self, player: PlayerId) -> Option<GroupName> {
        self.with_state(|state| state.players.get(&player).and_then(|p| p.group.clone()))
    }

    fn set_group(&self, player: PlayerId, group: &GroupName) {
        self.with_player(player, |p| p.group = Some(group.clone()));
    }

    fn has_permission(&self, player: PlayerId, permission: &str) -> bool {
        self.with_player(player, |p| p.permissions.contains(permission))
    }

    fn send_message(&self, player: PlayerId, kind: MessageKind, text: &str) {
        self.with_player(player, |p| p.messages.push((kind, text.to_string())));
    }
}

impl WorldGateway for FakeHost {
    fn active_mobs(&self) -> Vec<MobPresence> {
        self.with_state(|state| state.mobs.clone())
    }

    fn deactivate_mob(&self, mob: MobId) {
        self.with_state(|state| {
            state.deactivated.push(mob);
            for presence in state.mobs.iter_mut().filter(|p| p.mob == mob) {
                presence.suppressed = true;
            }
        });
    }
}
