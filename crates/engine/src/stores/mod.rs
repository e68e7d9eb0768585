//! Stateful stores.
//!
//! - `PolicyStore` - write-through catalog of region policies
//! - `SessionStore` - per-player temp-group bookkeeping

pub mod policy;
pub mod session;

pub use policy::{LoadReport, PolicyStore};
pub use session::{SessionHandle, SessionStore};
