//! Region event use cases.
//!
//! One handler per host notification. Each handler resolves the policy that
//! applies, asks the evaluator for directives, and applies them through the
//! host ports.

mod delete_region;
mod enter_region;
mod leave_region;
mod player_disconnect;
mod player_hurt;
mod suppress_mobs;
mod toggle_pvp;

pub mod notices;

pub use delete_region::DeleteRegion;
pub use enter_region::EnterRegion;
pub use leave_region::LeaveRegion;
pub use player_disconnect::PlayerDisconnect;
pub use player_hurt::PlayerHurt;
pub use suppress_mobs::{SuppressMobs, TickOutcome};
pub use toggle_pvp::TogglePvp;

use std::sync::Arc;

/// Container for region event use cases.
pub struct RegionEventUseCases {
    pub enter_region: Arc<EnterRegion>,
    pub leave_region: Arc<LeaveRegion>,
    pub delete_region: Arc<DeleteRegion>,
    pub toggle_pvp: Arc<TogglePvp>,
    pub player_hurt: Arc<PlayerHurt>,
    pub suppress_mobs: Arc<SuppressMobs>,
    pub player_disconnect: Arc<PlayerDisconnect>,
}
