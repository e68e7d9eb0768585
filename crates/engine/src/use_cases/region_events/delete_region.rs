//! Delete region use case.

use std::sync::Arc;

use xregions_domain::{PolicyError, RegionName};

use crate::stores::PolicyStore;

/// Drops the policy of a region the host just deleted.
pub struct DeleteRegion {
    policies: Arc<PolicyStore>,
}

impl DeleteRegion {
    pub fn new(policies: Arc<PolicyStore>) -> Self {
        Self { policies }
    }

    /// Returns whether a policy was removed.
    pub async fn execute(&self, region: &RegionName) -> Result<bool, PolicyError> {
        if !self.policies.contains(region.as_str()).await {
            tracing::debug!(region = %region, "Deleted region had no policy");
            return Ok(false);
        }

        self.policies.remove(region).await?;
        tracing::info!(region = %region, "Region '{}' has been removed from the XRegions database.", region);
        Ok(true)
    }
}
