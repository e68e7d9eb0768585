//! XRegions engine library.
//!
//! Host-side half of the region policy system: durable storage, the event
//! adapter, and the `xregion` command.
//!
//! ## Structure
//!
//! - `stores/` - policy catalog and per-player sessions
//! - `use_cases/` - one handler per host event
//! - `infrastructure/` - ports, SQLite, config, tracing setup
//! - `api/` - packet decoding, commands, event dispatcher
//! - `app` - composition

pub mod api;
pub mod app;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

#[cfg(test)]
mod test_fixtures;

pub use app::{App, HostPorts};
