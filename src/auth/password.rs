//! Password hashing and verification using bcrypt.

use anyhow::{Context, Result};

/// Salted one-way password hasher.
///
/// The cost factor is carried explicitly and applied on every call; bcrypt
/// draws a fresh salt per hash.
#[derive(Debug, Clone, Copy)]
pub struct PasswordHasher {
    cost: u32,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> Self {
        Self { cost }
    }

    /// Hash a password, returning the modular-crypt string to persist.
    ///
    /// Runs on the blocking pool since bcrypt is deliberately slow.
    pub async fn hash(&self, password: &str) -> Result<String> {
        let password = password.to_string();
        let cost = self.cost;
        tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
            .await
            .context("password hashing task failed")?
            .context("password hashing failed")
    }

    /// Check a password against a stored hash.
    ///
    /// The comparison is constant-time. A malformed stored hash is an
    /// error, not a mismatch.
    pub async fn verify(&self, password: &str, password_hash: &str) -> Result<bool> {
        let password = password.to_string();
        let password_hash = password_hash.to_string();
        tokio::task::spawn_blocking(move || bcrypt::verify(password, &password_hash))
            .await
            .context("password verification task failed")?
            .context("password verification failed")
    }
}
