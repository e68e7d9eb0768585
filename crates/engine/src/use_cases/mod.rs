//! Use cases - event orchestration.
//!
//! Use cases sit between the dispatcher and the stores, applying the
//! evaluator's directives through the host ports.

pub mod region_events;

pub use region_events::RegionEventUseCases;
