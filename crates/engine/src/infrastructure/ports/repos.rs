//! Repository port for durable policy storage.

use async_trait::async_trait;
use xregions_domain::{RegionName, RegionPolicy};

use super::error::RepoError;

/// Durable storage of region policies.
///
/// Two logical records per region: flags + temp group, and the ban lists.
/// A missing ban record reads back as empty ban lists.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PolicyRepo: Send + Sync {
    /// Read every stored policy. Unknown flag tokens are dropped.
    async fn load_all(&self) -> Result<Vec<RegionPolicy>, RepoError>;

    /// Persist a newly defined policy.
    async fn insert(&self, policy: &RegionPolicy) -> Result<(), RepoError>;

    /// Rewrite the flag/group record and replace the ban record.
    async fn update(&self, policy: &RegionPolicy) -> Result<(), RepoError>;

    /// Delete both records for a region.
    async fn delete(&self, name: &RegionName) -> Result<(), RepoError>;
}
