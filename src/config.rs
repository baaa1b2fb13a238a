use serde::{Deserialize, Serialize};

/// Default bcrypt cost factor.
pub const DEFAULT_BCRYPT_COST: u32 = 10;

/// Default number of characters in a share token.
pub const DEFAULT_SHARE_TOKEN_LENGTH: usize = 10;

/// Service-level settings shared by every request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BrainConfig {
    /// HMAC secret used to sign and verify bearer tokens
    pub jwt_secret: String,
    /// bcrypt cost factor applied to every new password hash
    #[serde(default = "default_bcrypt_cost")]
    pub bcrypt_cost: u32,
    /// Length of generated share tokens
    #[serde(default = "default_share_token_length")]
    pub share_token_length: usize,
    /// Bearer token lifetime. `None` issues tokens without an `exp` claim.
    #[serde(default)]
    pub token_ttl_seconds: Option<u64>,
}

fn default_bcrypt_cost() -> u32 {
    DEFAULT_BCRYPT_COST
}

fn default_share_token_length() -> usize {
    DEFAULT_SHARE_TOKEN_LENGTH
}

impl BrainConfig {
    /// Create a config with the given secret and default settings.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            bcrypt_cost: DEFAULT_BCRYPT_COST,
            share_token_length: DEFAULT_SHARE_TOKEN_LENGTH,
            token_ttl_seconds: None,
        }
    }

    /// Reject settings the service cannot run with.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.jwt_secret.is_empty() {
            anyhow::bail!("JWT secret must not be empty");
        }
        if !(4..=31).contains(&self.bcrypt_cost) {
            anyhow::bail!("bcrypt cost must be between 4 and 31, got {}", self.bcrypt_cost);
        }
        if self.share_token_length == 0 {
            anyhow::bail!("share token length must be positive");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_brain_config_defaults() {
        let config = BrainConfig::new("secret");
        assert_eq!(config.jwt_secret, "secret");
        assert_eq!(config.bcrypt_cost, 10);
        assert_eq!(config.share_token_length, 10);
        assert!(config.token_ttl_seconds.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_brain_config_rejects_bad_values() {
        assert!(BrainConfig::new("").validate().is_err());

        let mut config = BrainConfig::new("secret");
        config.bcrypt_cost = 3;
        assert!(config.validate().is_err());

        let mut config = BrainConfig::new("secret");
        config.share_token_length = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_brain_config_deserialization_defaults() {
        let config: BrainConfig = serde_json::from_str(r#"{"jwt_secret": "s3cret"}"#).unwrap();
        assert_eq!(config.bcrypt_cost, DEFAULT_BCRYPT_COST);
        assert_eq!(config.share_token_length, DEFAULT_SHARE_TOKEN_LENGTH);
        assert!(config.token_ttl_seconds.is_none());
    }
}
