//! Port traits for infrastructure boundaries.
//!
//! These are the only abstractions in the engine. Ports exist for:
//! - Policy storage (SQLite today)
//! - The host game server (regions, groups, players, world)
//! - Clock (for testing the tick throttle)

mod error;
mod host;
mod repos;
mod testing;

pub use error::RepoError;
pub use host::{GroupDirectory, MessageKind, PlayerGateway, RegionEngine, WorldGateway};
pub use repos::PolicyRepo;
pub use testing::ClockPort;

#[cfg(test)]
pub use host::{MockGroupDirectory, MockPlayerGateway, MockRegionEngine, MockWorldGateway};
#[cfg(test)]
pub use repos::MockPolicyRepo;
#[cfg(test)]
pub use testing::MockClockPort;
