//! Infrastructure implementations.
//!
//! Contains port trait implementations for external dependencies.

pub mod clock;
pub mod config;
pub mod ports;
pub mod sqlite;
pub mod telemetry;
