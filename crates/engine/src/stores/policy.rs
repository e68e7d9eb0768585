//! Region policy store.
//!
//! The in-memory catalog is a write-through cache of the repository. Every
//! mutation holds the catalog write lock across the storage write and only
//! touches the cache once storage succeeded, so readers never see a policy
//! that is not durable and a `list()` snapshot never sees half a mutation.

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use xregions_domain::{GroupName, PolicyError, RegionFlags, RegionName, RegionPolicy};

use crate::infrastructure::ports::{PolicyRepo, RegionEngine};

/// Outcome of [`PolicyStore::load_all`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadReport {
    pub loaded: usize,
    /// Policies kept loaded although the host no longer knows their region.
    pub dangling: Vec<RegionName>,
}

/// Catalog of policy-bearing regions.
pub struct PolicyStore {
    repo: Arc<dyn PolicyRepo>,
    regions: Arc<dyn RegionEngine>,
    catalog: RwLock<HashMap<RegionName, RegionPolicy>>,
}

impl PolicyStore {
    pub fn new(repo: Arc<dyn PolicyRepo>, regions: Arc<dyn RegionEngine>) -> Self {
        Self {
            repo,
            regions,
            catalog: RwLock::new(HashMap::new()),
        }
    }

    /// Replace the catalog with everything in storage.
    ///
    /// Dangling policies are loaded anyway and reported; nothing is pruned.
    pub async fn load_all(&self) -> Result<LoadReport, PolicyError> {
        let mut catalog = self.catalog.write().await;
        let policies = self.repo.load_all().await?;

        catalog.clear();
        let mut dangling = Vec::new();
        for policy in policies {
            let name = policy.region_name().clone();
            if !self.regions.region_exists(&name) {
                tracing::warn!(
                    region = %name,
                    error = %PolicyError::DanglingPolicy(name.to_string()),
                    "Loaded policy for a region the host does not know"
                );
                dangling.push(name.clone());
            }
            if policy.has_conflicting_pvp_flags() {
                tracing::warn!(region = %name, "Policy has both ForcePvp and ForcePvpOff");
            }
            catalog.insert(name, policy);
        }

        dangling.sort();
        let report = LoadReport {
            loaded: catalog.len(),
            dangling,
        };
        tracing::info!(
            loaded = report.loaded,
            dangling = report.dangling.len(),
            "Region policies loaded"
        );
        Ok(report)
    }

    /// Make a host region policy-bearing with an empty policy.
    pub async fn define(&self, name: &RegionName) -> Result<RegionPolicy, PolicyError> {
        if !self.regions.region_exists(name) {
            return Err(PolicyError::UnknownRegion(name.to_string()));
        }

        let mut catalog = self.catalog.write().await;
        if catalog.contains_key(name) {
            return Err(PolicyError::AlreadyDefined(name.to_string()));
        }

        let policy = RegionPolicy::new(name.clone());
        self.repo.insert(&policy).await?;
        catalog.insert(name.clone(), policy.clone());

        tracing::info!(region = %name, "Region defined");
        Ok(policy)
    }

    /// Exact, case-sensitive lookup.
    pub async fn get(&self, name: &str) -> Option<RegionPolicy> {
        self.catalog.read().await.get(name).cloned()
    }

    pub async fn contains(&self, name: &str) -> bool {
        self.catalog.read().await.contains_key(name)
    }

    /// Delete a policy from storage and the catalog.
    ///
    /// Callers check existence first; removing an absent name is not
    /// reported.
    pub async fn remove(&self, name: &RegionName) -> Result<(), PolicyError> {
        let mut catalog = self.catalog.write().await;
        self.repo.delete(name).await?;
        catalog.remove(name);
        tracing::info!(region = %name, "Region policy removed");
        Ok(())
    }

    /// Write a whole policy through and replace the cached copy.
    pub async fn update(&self, policy: RegionPolicy) -> Result<(), PolicyError> {
        let mut catalog = self.catalog.write().await;
        if !catalog.contains_key(policy.region_name()) {
            return Err(PolicyError::NotDefined(policy.region_name().to_string()));
        }
        self.repo.update(&policy).await?;
        catalog.insert(policy.region_name().clone(), policy);
        Ok(())
    }

    /// Read-modify-write under the catalog lock.
    ///
    /// If `apply` fails nothing is written.
    pub async fn modify<T, F>(&self, name: &str, apply: F) -> Result<T, PolicyError>
    where
        F: FnOnce(&mut RegionPolicy) -> Result<T, PolicyError>,
    {
        let mut catalog = self.catalog.write().await;
        let mut policy = catalog
            .get(name)
            .cloned()
            .ok_or_else(|| PolicyError::NotDefined(name.to_string()))?;

        let result = apply(&mut policy)?;
        self.repo.update(&policy).await?;
        catalog.insert(policy.region_name().clone(), policy);
        Ok(result)
    }

    pub async fn add_flag(&self, name: &str, flag: RegionFlags) -> Result<bool, PolicyError> {
        self.modify(name, |policy| Ok(policy.add_flag(flag))).await
    }

    pub async fn remove_flag(&self, name: &str, flag: RegionFlags) -> Result<bool, PolicyError> {
        self.modify(name, |policy| Ok(policy.remove_flag(flag))).await
    }

    pub async fn set_temp_group(
        &self,
        name: &str,
        group: Option<GroupName>,
    ) -> Result<(), PolicyError> {
        self.modify(name, |policy| {
            policy.set_temp_group(group);
            Ok(())
        })
        .await
    }

    pub async fn ban_item(&self, name: &str, id: i32) -> Result<bool, PolicyError> {
        self.modify(name, |policy| Ok(policy.ban_item(id))).await
    }

    pub async fn unban_item(&self, name: &str, id: i32) -> Result<bool, PolicyError> {
        self.modify(name, |policy| Ok(policy.unban_item(id))).await
    }

    pub async fn ban_projectile(&self, name: &str, id: i32) -> Result<bool, PolicyError> {
        self.modify(name, |policy| Ok(policy.ban_projectile(id))).await
    }

    pub async fn unban_projectile(&self, name: &str, id: i32) -> Result<bool, PolicyError> {
        self.modify(name, |policy| Ok(policy.unban_projectile(id))).await
    }

    /// Snapshot of every policy, sorted by region name.
    pub async fn list(&self) -> Vec<RegionPolicy> {
        let mut policies: Vec<RegionPolicy> =
            self.catalog.read().await.values().cloned().collect();
        policies.sort_by(|a, b| a.region_name().cmp(b.region_name()));
        policies
    }

    /// Snapshot keyed by region, for the world-tick scan.
    pub async fn snapshot(&self) -> HashMap<RegionName, RegionPolicy> {
        self.catalog.read().await.clone()
    }

    /// Loaded policies whose region the host does not currently know.
    pub async fn dangling(&self) -> Vec<RegionName> {
        let mut names: Vec<RegionName> = self
            .catalog
            .read()
            .await
            .keys()
            .filter(|name| !self.regions.region_exists(name))
            .cloned()
            .collect();
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::{MockPolicyRepo, MockRegionEngine, RepoError};
    use crate::infrastructure::sqlite::SqlitePolicyRepo;

    fn region(name: &str) -> RegionName {
        RegionName::new(name).expect("valid name")
    }

    fn known_regions(names: &'static [&'static str]) -> MockRegionEngine {
        let mut regions = MockRegionEngine::new();
        regions
            .expect_region_exists()
            .returning(move |name| names.iter().any(|known| *known == name.as_str()));
        regions
    }

    async fn sqlite_store(
        dir: &tempfile::TempDir,
        names: &'static [&'static str],
    ) -> PolicyStore {
        let path = dir.path().join("xregions.db");
        let repo = SqlitePolicyRepo::connect(&path.to_string_lossy())
            .await
            .expect("open repo");
        PolicyStore::new(Arc::new(repo), Arc::new(known_regions(names)))
    }

    #[tokio::test]
    async fn define_unknown_region_fails() {
        let repo = MockPolicyRepo::new();
        let store = PolicyStore::new(Arc::new(repo), Arc::new(known_regions(&["Spawn"])));

        let err = store.define(&region("Nowhere")).await.expect_err("unknown");
        assert_eq!(err, PolicyError::UnknownRegion("Nowhere".into()));
        assert!(store.list().await.is_empty());
    }

    #[tokio::test]
    async fn define_twice_fails_without_touching_storage() {
        let mut repo = MockPolicyRepo::new();
        // exactly one insert: the second define must not reach storage
        repo.expect_insert().times(1).returning(|_| Ok(()));
        let store = PolicyStore::new(Arc::new(repo), Arc::new(known_regions(&["Spawn"])));

        store.define(&region("Spawn")).await.expect("first define");
        let before = store.list().await;

        let err = store.define(&region("Spawn")).await.expect_err("second");
        assert_eq!(err, PolicyError::AlreadyDefined("Spawn".into()));
        assert_eq!(store.list().await, before);
    }

    #[tokio::test]
    async fn failed_write_leaves_catalog_untouched() {
        let mut repo = MockPolicyRepo::new();
        repo.expect_insert().returning(|_| Ok(()));
        repo.expect_update()
            .returning(|_| Err(RepoError::database("update", "disk full")));
        let store = PolicyStore::new(Arc::new(repo), Arc::new(known_regions(&["Spawn"])));

        store.define(&region("Spawn")).await.expect("define");
        let err = store
            .add_flag("Spawn", RegionFlags::HEAL)
            .await
            .expect_err("write fails");
        assert!(matches!(err, PolicyError::Storage(_)));

        let policy = store.get("Spawn").await.expect("still defined");
        assert!(policy.flags().is_empty());
    }

    #[tokio::test]
    async fn modify_on_undefined_region_is_not_defined() {
        let repo = MockPolicyRepo::new();
        let store = PolicyStore::new(Arc::new(repo), Arc::new(known_regions(&["Spawn"])));

        let err = store
            .add_flag("Spawn", RegionFlags::HEAL)
            .await
            .expect_err("not defined");
        assert_eq!(err, PolicyError::NotDefined("Spawn".into()));
    }

    #[tokio::test]
    async fn get_is_case_sensitive() {
        let mut repo = MockPolicyRepo::new();
        repo.expect_insert().returning(|_| Ok(()));
        let store = PolicyStore::new(Arc::new(repo), Arc::new(known_regions(&["Spawn"])));

        store.define(&region("Spawn")).await.expect("define");
        assert!(store.get("Spawn").await.is_some());
        assert!(store.get("spawn").await.is_none());
    }

    #[tokio::test]
    async fn add_then_delete_flag_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = sqlite_store(&dir, &["Spawn"]).await;

        store.define(&region("Spawn")).await.expect("define");
        store
            .add_flag("Spawn", RegionFlags::HEAL)
            .await
            .expect("add heal");
        let before = store.get("Spawn").await.expect("defined").flags();

        assert!(store
            .add_flag("Spawn", RegionFlags::NO_MOB)
            .await
            .expect("add"));
        assert!(store
            .remove_flag("Spawn", RegionFlags::NO_MOB)
            .await
            .expect("remove"));

        assert_eq!(store.get("Spawn").await.expect("defined").flags(), before);
    }

    #[tokio::test]
    async fn update_then_reload_round_trips() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = sqlite_store(&dir, &["Arena"]).await;

        store.define(&region("Arena")).await.expect("define");
        let policy = store
            .get("Arena")
            .await
            .expect("defined")
            .with_flags(RegionFlags::TEMP_GROUP | RegionFlags::PROJECTILE_BAN)
            .with_temp_group(Some(GroupName::new("vip").expect("valid")))
            .with_banned_items([1, 2])
            .with_banned_projectiles([44]);
        store.update(policy.clone()).await.expect("update");

        let report = store.load_all().await.expect("reload");
        assert_eq!(report.loaded, 1);
        assert!(report.dangling.is_empty());
        assert_eq!(store.get("Arena").await, Some(policy));
    }

    #[tokio::test]
    async fn remove_then_get_and_reload_return_nothing() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = sqlite_store(&dir, &["Spawn"]).await;

        store.define(&region("Spawn")).await.expect("define");
        store.remove(&region("Spawn")).await.expect("remove");
        assert!(store.get("Spawn").await.is_none());

        store.load_all().await.expect("reload");
        assert!(store.get("Spawn").await.is_none());
    }

    #[tokio::test]
    async fn dangling_policies_stay_loaded() {
        let dir = tempfile::tempdir().expect("tempdir");
        {
            let store = sqlite_store(&dir, &["Spawn", "Gone"]).await;
            store.define(&region("Spawn")).await.expect("define");
            store.define(&region("Gone")).await.expect("define");
        }

        // "Gone" was deleted from the host while the server was down
        let store = sqlite_store(&dir, &["Spawn"]).await;
        let report = store.load_all().await.expect("load");

        assert_eq!(report.loaded, 2);
        assert_eq!(report.dangling, vec![region("Gone")]);
        assert!(store.get("Gone").await.is_some());
        assert_eq!(store.dangling().await, vec![region("Gone")]);
    }

    #[tokio::test]
    async fn list_is_sorted_snapshot() {
        let mut repo = MockPolicyRepo::new();
        repo.expect_insert().returning(|_| Ok(()));
        let store = PolicyStore::new(
            Arc::new(repo),
            Arc::new(known_regions(&["Spawn", "Arena", "Market"])),
        );

        for name in ["Spawn", "Arena", "Market"] {
            store.define(&region(name)).await.expect("define");
        }
        let snapshot = store.list().await;
        let names: Vec<_> = snapshot.iter().map(|p| p.region_name().as_str()).collect();
        assert_eq!(names, vec!["Arena", "Market", "Spawn"]);

        store.define(&region("Spawn")).await.expect_err("already defined");
        assert_eq!(snapshot.len(), 3);
    }
}
