//! XRegions domain.
//!
//! Region policies, the flag set they are built from, and the pure evaluator
//! that turns a policy plus an event into directives. Nothing in this crate
//! performs I/O.

extern crate self as xregions_domain;

pub mod directive;
pub mod error;
pub mod evaluator;
pub mod flags;
pub mod ids;
pub mod policy;
pub mod session;
pub mod value_objects;

pub use directive::{Directive, MobPresence};
pub use error::PolicyError;
pub use flags::RegionFlags;
pub use ids::{MobId, PlayerId};
pub use policy::RegionPolicy;
pub use session::PlayerSessionState;
pub use value_objects::{GroupName, RegionName};
