//! Value objects for the policy domain.

mod names;

pub use names::{GroupName, RegionName};
