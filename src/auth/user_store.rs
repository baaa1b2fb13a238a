//! User storage and management.

use anyhow::Result;

use crate::db::Db;
use crate::db::connection::is_conflict;
use crate::db::schema::{UserRecord, user_record};
use crate::types::{UserId, Username, new_record_key};

/// User store for database operations.
#[derive(Clone)]
pub struct UserStore {
    db: Db,
}

impl UserStore {
    /// Create a new user store.
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Get a user by username.
    pub async fn get_user_by_username(&self, username: &Username) -> Result<Option<UserRecord>> {
        let query = r#"
            SELECT record::id(id) AS id, username, password AS password_hash
            FROM user
            WHERE username = $username
            LIMIT 1
        "#;

        let mut res = self
            .db
            .query(query)
            .bind(("username", username.to_string()))
            .await?;

        let users: Vec<UserRecord> = res.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Get a user by record key.
    pub async fn get_user_by_id(&self, user_id: &UserId) -> Result<Option<UserRecord>> {
        let query = "SELECT record::id(id) AS id, username, password AS password_hash FROM $id";

        let mut res = self
            .db
            .query(query)
            .bind(("id", user_record(user_id)))
            .await?;

        let users: Vec<UserRecord> = res.take(0)?;
        Ok(users.into_iter().next())
    }

    /// Create a new user.
    ///
    /// Returns `None` if the username is already taken. Uniqueness is
    /// enforced by the `user_username` index, so concurrent signups for the
    /// same name cannot both succeed.
    pub async fn create_user(
        &self,
        username: &Username,
        password_hash: &str,
    ) -> Result<Option<UserRecord>> {
        let id = UserId::new(new_record_key());

        let query = r#"
            CREATE $id CONTENT {
                username: $username,
                password: $password
            } RETURN NONE
        "#;

        let res = self
            .db
            .query(query)
            .bind(("id", user_record(&id)))
            .bind(("username", username.to_string()))
            .bind(("password", password_hash.to_string()))
            .await?
            .check();

        match res {
            Ok(_) => Ok(Some(UserRecord {
                id,
                username: username.clone(),
                password_hash: password_hash.to_string(),
            })),
            Err(e) if is_conflict(&e) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
