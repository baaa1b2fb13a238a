//! Share link storage.

use anyhow::Result;

use crate::db::Db;
use crate::db::connection::is_conflict;
use crate::db::schema::{LinkRecord, link_record, user_record};
use crate::types::{ShareToken, UserId};

/// Share link store for database operations.
#[derive(Clone)]
pub struct LinkStore {
    db: Db,
}

impl LinkStore {
    /// Create a new link store.
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Get the link owned by `owner`, if sharing is enabled.
    pub async fn get_link_by_owner(&self, owner: &UserId) -> Result<Option<LinkRecord>> {
        let mut res = self
            .db
            .query("SELECT hash, record::id(user_id) AS owner_id FROM $id")
            .bind(("id", link_record(owner)))
            .await?;

        let links: Vec<LinkRecord> = res.take(0)?;
        Ok(links.into_iter().next())
    }

    /// Look up a link by its share token.
    pub async fn get_link_by_hash(&self, hash: &ShareToken) -> Result<Option<LinkRecord>> {
        let query = r#"
            SELECT hash, record::id(user_id) AS owner_id
            FROM link
            WHERE hash = $hash
            LIMIT 1
        "#;

        let mut res = self
            .db
            .query(query)
            .bind(("hash", hash.to_string()))
            .await?;

        let links: Vec<LinkRecord> = res.take(0)?;
        Ok(links.into_iter().next())
    }

    /// Create the link for `owner` with the given token.
    ///
    /// Returns `false` without writing if the owner already has a link or
    /// the token is already in use. The link is keyed by its owner, so the
    /// create is a single conditional write.
    pub async fn create_link(&self, owner: &UserId, hash: &ShareToken) -> Result<bool> {
        let query = r#"
            CREATE $id CONTENT {
                hash: $hash,
                user_id: $owner
            } RETURN NONE
        "#;

        let res = self
            .db
            .query(query)
            .bind(("id", link_record(owner)))
            .bind(("hash", hash.to_string()))
            .bind(("owner", user_record(owner)))
            .await?
            .check();

        match res {
            Ok(_) => Ok(true),
            Err(e) if is_conflict(&e) => Ok(false),
            Err(e) => Err(e.into()),
        }
    }

    /// Remove the link owned by `owner`. Returns whether one existed.
    pub async fn delete_link(&self, owner: &UserId) -> Result<bool> {
        let mut res = self
            .db
            .query("DELETE link WHERE user_id = $owner RETURN BEFORE")
            .bind(("owner", user_record(owner)))
            .await?;

        let deleted: Vec<serde_json::Value> = res.take(0)?;
        Ok(!deleted.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{DatabaseConfig, create_connection, ensure_schema};

    async fn setup_test_db() -> Db {
        let config = DatabaseConfig {
            url: "memory".to_string(),
            ..Default::default()
        };
        let db = create_connection(config).await.unwrap();
        ensure_schema(&db).await.unwrap();
        db
    }

    #[tokio::test]
    async fn test_create_and_lookup_link() {
        let db = setup_test_db().await;
        let store = LinkStore::new(db);
        let owner = UserId::new("owner1");
        let hash = ShareToken::new("abc123xyz0");

        assert!(store.create_link(&owner, &hash).await.unwrap());

        let by_owner = store.get_link_by_owner(&owner).await.unwrap().unwrap();
        assert_eq!(by_owner.hash, hash);
        assert_eq!(by_owner.owner_id, owner);

        let by_hash = store.get_link_by_hash(&hash).await.unwrap().unwrap();
        assert_eq!(by_hash, by_owner);
    }

    #[tokio::test]
    async fn test_one_link_per_owner() {
        let db = setup_test_db().await;
        let store = LinkStore::new(db);
        let owner = UserId::new("owner1");

        assert!(store.create_link(&owner, &ShareToken::new("first00000")).await.unwrap());
        assert!(!store.create_link(&owner, &ShareToken::new("second0000")).await.unwrap());

        let link = store.get_link_by_owner(&owner).await.unwrap().unwrap();
        assert_eq!(link.hash.as_str(), "first00000");
    }

    #[tokio::test]
    async fn test_hash_is_unique_across_owners() {
        let db = setup_test_db().await;
        let store = LinkStore::new(db);
        let hash = ShareToken::new("samehash00");

        assert!(store.create_link(&UserId::new("a"), &hash).await.unwrap());
        assert!(!store.create_link(&UserId::new("b"), &hash).await.unwrap());
        assert!(store.get_link_by_owner(&UserId::new("b")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_link() {
        let db = setup_test_db().await;
        let store = LinkStore::new(db);
        let owner = UserId::new("owner1");
        let hash = ShareToken::new("abc123xyz0");

        assert!(!store.delete_link(&owner).await.unwrap());

        store.create_link(&owner, &hash).await.unwrap();
        assert!(store.delete_link(&owner).await.unwrap());
        assert!(store.get_link_by_owner(&owner).await.unwrap().is_none());
        assert!(store.get_link_by_hash(&hash).await.unwrap().is_none());

        // Owner can create a new link after deletion
        assert!(store.create_link(&owner, &ShareToken::new("fresh00000")).await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_hash() {
        let db = setup_test_db().await;
        let store = LinkStore::new(db);
        assert!(
            store
                .get_link_by_hash(&ShareToken::new("neverissued"))
                .await
                .unwrap()
                .is_none()
        );
    }
}
