use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::env;
use surrealdb::engine::any::Any;
use surrealdb::opt::auth::Root;
use surrealdb::Surreal;

pub type Db = Surreal<Any>;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub namespace: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: env::var("SURREALDB_URL")
                .unwrap_or_else(|_| "memory".to_string()),
            namespace: env::var("SURREALDB_NAMESPACE")
                .unwrap_or_else(|_| "brainly".to_string()),
            database: env::var("SURREALDB_DATABASE")
                .unwrap_or_else(|_| "brain".to_string()),
            username: env::var("SURREALDB_USERNAME").ok(),
            password: env::var("SURREALDB_PASSWORD").ok(),
        }
    }
}

pub async fn create_connection(config: DatabaseConfig) -> Result<Db> {
    let db = surrealdb::engine::any::connect(config.url).await?;

    // Sign in if credentials are provided
    if let (Some(username), Some(password)) = (config.username, config.password) {
        db.signin(Root {
            username: &username,
            password: &password,
        })
        .await?;
    }

    db.use_ns(config.namespace).use_db(config.database).await?;

    Ok(db)
}

pub async fn ensure_schema(db: &Db) -> Result<()> {
    let schema_queries = [
        // Identity store
        "DEFINE TABLE IF NOT EXISTS user SCHEMAFULL;
         DEFINE FIELD IF NOT EXISTS username ON TABLE user TYPE string;
         DEFINE FIELD IF NOT EXISTS password ON TABLE user TYPE string;
         DEFINE FIELD IF NOT EXISTS created_at ON TABLE user VALUE time::now() READONLY;
         DEFINE INDEX IF NOT EXISTS user_username ON TABLE user COLUMNS username UNIQUE;",

        // Tags referenced by content
        "DEFINE TABLE IF NOT EXISTS tag SCHEMAFULL;
         DEFINE FIELD IF NOT EXISTS title ON TABLE tag TYPE string;
         DEFINE INDEX IF NOT EXISTS tag_title ON TABLE tag COLUMNS title UNIQUE;",

        // Saved content
        "DEFINE TABLE IF NOT EXISTS content SCHEMAFULL;
         DEFINE FIELD IF NOT EXISTS link ON TABLE content TYPE string;
         DEFINE FIELD IF NOT EXISTS kind ON TABLE content TYPE string
            ASSERT $value INSIDE ['image', 'video', 'article', 'audio'];
         DEFINE FIELD IF NOT EXISTS title ON TABLE content TYPE string;
         DEFINE FIELD IF NOT EXISTS tags ON TABLE content TYPE array<record<tag>> DEFAULT [];
         DEFINE FIELD IF NOT EXISTS user_id ON TABLE content TYPE record<user>;
         DEFINE FIELD IF NOT EXISTS created_at ON TABLE content VALUE time::now() READONLY;
         DEFINE INDEX IF NOT EXISTS content_user_id ON TABLE content COLUMNS user_id;",

        // Share links, one per owner
        "DEFINE TABLE IF NOT EXISTS link SCHEMAFULL;
         DEFINE FIELD IF NOT EXISTS hash ON TABLE link TYPE string;
         DEFINE FIELD IF NOT EXISTS user_id ON TABLE link TYPE record<user>;
         DEFINE FIELD IF NOT EXISTS created_at ON TABLE link VALUE time::now() READONLY;
         DEFINE INDEX IF NOT EXISTS link_hash ON TABLE link COLUMNS hash UNIQUE;
         DEFINE INDEX IF NOT EXISTS link_user_id ON TABLE link COLUMNS user_id UNIQUE;",
    ];

    for query in schema_queries {
        db.query(query).await?.check()?;
    }

    Ok(())
}

/// Whether a database error was caused by a duplicate record id, a unique
/// index violation, or a write that lost a race with a concurrent
/// transaction.
pub fn is_conflict(err: &surrealdb::Error) -> bool {
    let msg = err.to_string();
    msg.contains("already exists")
        || msg.contains("already contains")
        || msg.contains("can be retried")
}
