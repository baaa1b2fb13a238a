// Core modules
mod config;
mod db;
mod error;
mod types;
mod utils;
mod validation;

pub mod api;
pub mod auth;
pub mod brain;

// Re-export key types and functions
pub use brain::{Brain, SharedBrain};
pub use config::{BrainConfig, DEFAULT_BCRYPT_COST, DEFAULT_SHARE_TOKEN_LENGTH};
pub use db::{
    ContentCreate, ContentKind, ContentView, DatabaseConfig, create_connection, ensure_schema,
};
pub use error::{BrainError, BrainResult};
pub use types::{ContentId, ShareToken, TagId, UserId, Username};
pub use validation::{
    Credentials, PASSWORD_COMPOSITION_MESSAGE, PASSWORD_LENGTH_MESSAGE, USERNAME_LENGTH_MESSAGE,
};

use anyhow::Result;
use std::sync::Arc;

/// Connect to the database and build the HTTP router around a fresh
/// [`Brain`].
pub async fn create_app(db_config: DatabaseConfig, config: &BrainConfig) -> Result<axum::Router> {
    let brain = Brain::connect(db_config, config).await?;
    Ok(api::create_router(Arc::new(brain)))
}
