//! Shared test helpers.
//!
//! `FakeHost` stands in for the game server behind every host port, so
//! scenario tests can assert on resulting player and world state instead of
//! scripting call-by-call mock expectations.

pub mod host;

use std::sync::Arc;

use xregions_domain::{GroupName, RegionName, RegionPolicy};

use crate::infrastructure::ports::MockPolicyRepo;
use crate::stores::PolicyStore;

pub use host::FakeHost;

pub fn region(name: &str) -> RegionName {
    RegionName::new(name).expect("valid region name")
}

pub fn group(name: &str) -> GroupName {
    GroupName::new(name).expect("valid group name")
}

/// Repo mock that accepts every write.
pub fn accepting_repo() -> MockPolicyRepo {
    let mut repo = MockPolicyRepo::new();
    repo.expect_load_all().returning(|| Ok(Vec::new()));
    repo.expect_insert().returning(|_| Ok(()));
    repo.expect_update().returning(|_| Ok(()));
    repo.expect_delete().returning(|_| Ok(()));
    repo
}

/// Policy store seeded with `policies`, backed by an accepting repo.
///
/// Every seeded region is also registered with the host.
pub async fn seeded_store(host: &Arc<FakeHost>, policies: Vec<RegionPolicy>) -> Arc<PolicyStore> {
    let store = Arc::new(PolicyStore::new(Arc::new(accepting_repo()), host.clone()));
    for policy in policies {
        host.add_region(policy.region_name().as_str());
        store
            .define(policy.region_name())
            .await
            .expect("define seeded region");
        store.update(policy).await.expect("seed policy");
    }
    store
}
