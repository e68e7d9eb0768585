//! SQLite-backed policy storage.
//!
//! Table and column names match the ones the plugin has always used, so an
//! existing server database loads without migration.

use std::collections::HashMap;

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use xregions_domain::policy::{join_ids, parse_ids};
use xregions_domain::{GroupName, RegionFlags, RegionName, RegionPolicy};

use crate::infrastructure::ports::{PolicyRepo, RepoError};

/// SQLite implementation of [`PolicyRepo`].
pub struct SqlitePolicyRepo {
    pool: SqlitePool,
}

impl SqlitePolicyRepo {
    /// Open (creating if needed) the database and ensure both tables exist.
    pub async fn connect(db_path: &str) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("connect", e))?;

        let repo = Self { pool };
        repo.ensure_schema().await?;
        Ok(repo)
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    async fn ensure_schema(&self) -> Result<(), RepoError> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS XRegions (
                Name TEXT PRIMARY KEY,
                Actions TEXT NOT NULL DEFAULT '',
                TempGroup TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("ensure_schema", e))?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS XRegionBans (
                Name TEXT PRIMARY KEY,
                ItemBans TEXT NOT NULL DEFAULT '',
                ProjectileBans TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(|e| RepoError::database("ensure_schema", e))?;

        Ok(())
    }

    async fn load_bans(&self) -> Result<HashMap<String, (String, String)>, RepoError> {
        let rows = sqlx::query("SELECT Name, ItemBans, ProjectileBans FROM XRegionBans")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("load_bans", e))?;

        let mut bans = HashMap::with_capacity(rows.len());
        for row in rows {
            let name: String = row
                .try_get("Name")
                .map_err(|e| RepoError::serialization(e))?;
            let items: Option<String> = row
                .try_get("ItemBans")
                .map_err(|e| RepoError::serialization(e))?;
            let projectiles: Option<String> = row
                .try_get("ProjectileBans")
                .map_err(|e| RepoError::serialization(e))?;
            bans.insert(
                name,
                (items.unwrap_or_default(), projectiles.unwrap_or_default()),
            );
        }
        Ok(bans)
    }
}

#[async_trait]
impl PolicyRepo for SqlitePolicyRepo {
    async fn load_all(&self) -> Result<Vec<RegionPolicy>, RepoError> {
        let mut bans = self.load_bans().await?;

        let rows = sqlx::query("SELECT Name, Actions, TempGroup FROM XRegions")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("load_all", e))?;

        let mut policies = Vec::with_capacity(rows.len());
        for row in rows {
            let raw_name: String = row
                .try_get("Name")
                .map_err(|e| RepoError::serialization(e))?;
            let actions: Option<String> = row
                .try_get("Actions")
                .map_err(|e| RepoError::serialization(e))?;
            let temp_group: Option<String> = row
                .try_get("TempGroup")
                .map_err(|e| RepoError::serialization(e))?;

            let name = match RegionName::new(raw_name.as_str()) {
                Ok(name) => name,
                Err(e) => {
                    tracing::warn!(name = %raw_name, error = %e, "Skipping stored policy with invalid region name");
                    continue;
                }
            };

            let group = temp_group
                .filter(|g| !g.is_empty())
                .and_then(|g| GroupName::new(g).ok());
            let (items, projectiles) = bans.remove(&raw_name).unwrap_or_default();

            policies.push(
                RegionPolicy::new(name)
                    .with_flags(RegionFlags::parse_list(actions.as_deref().unwrap_or_default()))
                    .with_temp_group(group)
                    .with_banned_items(parse_ids(&items))
                    .with_banned_projectiles(parse_ids(&projectiles)),
            );
        }

        Ok(policies)
    }

    async fn insert(&self, policy: &RegionPolicy) -> Result<(), RepoError> {
        sqlx::query("INSERT INTO XRegions (Name, Actions, TempGroup) VALUES (?, ?, ?)")
            .bind(policy.region_name().as_str())
            .bind(policy.flags().to_list_string())
            .bind(policy.temp_group().map(GroupName::as_str).unwrap_or_default())
            .execute(&self.pool)
            .await
            .map_err(|e| RepoError::database("insert", e))?;
        Ok(())
    }

    async fn update(&self, policy: &RegionPolicy) -> Result<(), RepoError> {
        let name = policy.region_name().as_str();
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("update", e))?;

        sqlx::query("UPDATE XRegions SET Actions = ?, TempGroup = ? WHERE Name = ?")
            .bind(policy.flags().to_list_string())
            .bind(policy.temp_group().map(GroupName::as_str).unwrap_or_default())
            .bind(name)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("update", e))?;

        sqlx::query("DELETE FROM XRegionBans WHERE Name = ?")
            .bind(name)
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("update_bans", e))?;

        sqlx::query("INSERT INTO XRegionBans (Name, ItemBans, ProjectileBans) VALUES (?, ?, ?)")
            .bind(name)
            .bind(join_ids(policy.banned_items()))
            .bind(join_ids(policy.banned_projectiles()))
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("update_bans", e))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("update", e))?;
        Ok(())
    }

    async fn delete(&self, name: &RegionName) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("delete", e))?;

        sqlx::query("DELETE FROM XRegions WHERE Name = ?")
            .bind(name.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("delete", e))?;

        sqlx::query("DELETE FROM XRegionBans WHERE Name = ?")
            .bind(name.as_str())
            .execute(&mut *tx)
            .await
            .map_err(|e| RepoError::database("delete", e))?;

        tx.commit()
            .await
            .map_err(|e| RepoError::database("delete", e))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn open(dir: &tempfile::TempDir) -> SqlitePolicyRepo {
        let path = dir.path().join("xregions.db");
        SqlitePolicyRepo::connect(&path.to_string_lossy())
            .await
            .expect("open repo")
    }

    fn region(name: &str) -> RegionName {
        RegionName::new(name).expect("valid name")
    }

    #[tokio::test]
    async fn update_then_reload_preserves_everything() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = open(&dir).await;

        let policy = RegionPolicy::new(region("Arena"));
        repo.insert(&policy).await.expect("insert");

        let policy = policy
            .with_flags(RegionFlags::TEMP_GROUP | RegionFlags::ITEM_BAN | RegionFlags::NO_MOB)
            .with_temp_group(Some(GroupName::new("vip").expect("valid")))
            .with_banned_items([29, 1])
            .with_banned_projectiles([12]);
        repo.update(&policy).await.expect("update");

        // reopen to prove it hit disk
        drop(repo);
        let repo = open(&dir).await;
        let loaded = repo.load_all().await.expect("load");
        assert_eq!(loaded, vec![policy]);
    }

    #[tokio::test]
    async fn missing_ban_row_reads_as_empty() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = open(&dir).await;

        repo.insert(&RegionPolicy::new(region("Spawn")))
            .await
            .expect("insert");

        let loaded = repo.load_all().await.expect("load");
        assert_eq!(loaded.len(), 1);
        assert!(loaded[0].banned_items().is_empty());
        assert!(loaded[0].banned_projectiles().is_empty());
        assert!(loaded[0].temp_group().is_none());
    }

    #[tokio::test]
    async fn unknown_tokens_and_legacy_numbers_on_load() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = open(&dir).await;

        sqlx::query("INSERT INTO XRegions (Name, Actions, TempGroup) VALUES (?, ?, ?)")
            .bind("Old")
            .bind("Heal,Teleport,4")
            .bind("")
            .execute(repo.pool())
            .await
            .expect("raw insert");
        sqlx::query("INSERT INTO XRegionBans (Name, ItemBans, ProjectileBans) VALUES (?, ?, ?)")
            .bind("Old")
            .bind("1,abc,2")
            .bind("")
            .execute(repo.pool())
            .await
            .expect("raw insert");

        let loaded = repo.load_all().await.expect("load");
        assert_eq!(loaded.len(), 1);
        assert_eq!(
            loaded[0].flags(),
            RegionFlags::HEAL | RegionFlags::TEMP_GROUP
        );
        assert_eq!(loaded[0].banned_items().len(), 2);
    }

    #[tokio::test]
    async fn delete_removes_both_rows() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = open(&dir).await;

        let policy = RegionPolicy::new(region("Spawn")).with_banned_items([5]);
        repo.insert(&policy).await.expect("insert");
        repo.update(&policy).await.expect("update");
        repo.delete(&region("Spawn")).await.expect("delete");

        assert!(repo.load_all().await.expect("load").is_empty());
        let (bans,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM XRegionBans")
            .fetch_one(repo.pool())
            .await
            .expect("count");
        assert_eq!(bans, 0);
    }

    #[tokio::test]
    async fn duplicate_insert_is_rejected() {
        let dir = tempfile::tempdir().expect("tempdir");
        let repo = open(&dir).await;

        let policy = RegionPolicy::new(region("Spawn"));
        repo.insert(&policy).await.expect("insert");
        let err = repo.insert(&policy).await.expect_err("duplicate");
        assert!(matches!(err, RepoError::Database { operation: "insert", .. }));
    }
}
