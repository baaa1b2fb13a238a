//! Bearer token issuing and verification.

use std::time::{SystemTime, UNIX_EPOCH};

use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::auth::extractor::AuthError;
use crate::types::UserId;

/// Claims carried by a bearer token.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct TokenClaims {
    /// Key of the authenticated user
    #[serde(rename = "userId")]
    pub user_id: String,
    /// Expiration time (Unix timestamp), only set when a lifetime is configured
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub exp: Option<u64>,
}

/// Signs and verifies HS256 bearer tokens with a shared secret.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl_seconds: Option<u64>,
}

impl std::fmt::Debug for TokenIssuer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TokenIssuer")
            .field("ttl_seconds", &self.ttl_seconds)
            .finish_non_exhaustive()
    }
}

impl TokenIssuer {
    pub fn new(secret: &str, ttl_seconds: Option<u64>) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // `exp` is only present when a lifetime is configured; when it is
        // present it is still checked.
        validation.required_spec_claims.clear();
        validation.validate_exp = true;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl_seconds,
        }
    }

    /// Issue a token for `user_id`.
    pub fn issue(&self, user_id: &UserId) -> Result<String, AuthError> {
        let exp = self.ttl_seconds.map(|ttl| now() + ttl);
        let claims = TokenClaims {
            user_id: user_id.to_string(),
            exp,
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::InvalidToken(format!("failed to sign token: {}", e)))
    }

    /// Verify a token's signature and return the user it was issued to.
    pub fn verify(&self, token: &str) -> Result<UserId, AuthError> {
        let data = decode::<TokenClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        if data.claims.user_id.is_empty() {
            return Err(AuthError::InvalidToken("empty user id claim".to_string()));
        }

        Ok(UserId::new(data.claims.user_id))
    }
}

fn now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_roundtrip() {
        let issuer = TokenIssuer::new("secret", None);
        let user_id = UserId::new("abc123");

        let token = issuer.issue(&user_id).unwrap();
        assert_eq!(issuer.verify(&token).unwrap(), user_id);
    }

    #[test]
    fn test_token_without_ttl_has_no_exp() {
        let issuer = TokenIssuer::new("secret", None);
        let token = issuer.issue(&UserId::new("abc123")).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        let data = decode::<TokenClaims>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &validation,
        )
        .unwrap();
        assert!(data.claims.exp.is_none());
    }

    #[test]
    fn test_claims_use_user_id_key() {
        let issuer = TokenIssuer::new("secret", None);
        let token = issuer.issue(&UserId::new("abc123")).unwrap();

        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        let data = decode::<serde_json::Value>(
            &token,
            &DecodingKey::from_secret(b"secret"),
            &validation,
        )
        .unwrap();

        assert_eq!(data.claims["userId"], "abc123");
        assert!(data.claims.get("user_id").is_none());
    }

    #[test]
    fn test_verify_accepts_externally_signed_user_id_claim() {
        let issuer = TokenIssuer::new("secret", None);
        let token = encode(
            &Header::new(Algorithm::HS256),
            &serde_json::json!({ "userId": "u7" }),
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert_eq!(issuer.verify(&token).unwrap(), UserId::new("u7"));
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let issuer = TokenIssuer::new("secret", None);
        let other = TokenIssuer::new("other-secret", None);

        let token = other.issue(&UserId::new("abc123")).unwrap();
        assert!(matches!(
            issuer.verify(&token),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_verify_rejects_garbage() {
        let issuer = TokenIssuer::new("secret", None);
        assert!(issuer.verify("not.a.token").is_err());
        assert!(issuer.verify("").is_err());
    }

    #[test]
    fn test_verify_rejects_expired_token() {
        let issuer = TokenIssuer::new("secret", None);
        let claims = TokenClaims {
            user_id: "abc123".to_string(),
            exp: Some(1),
        };
        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(b"secret"),
        )
        .unwrap();

        assert!(issuer.verify(&token).is_err());
    }

    #[test]
    fn test_token_with_ttl_is_accepted() {
        let issuer = TokenIssuer::new("secret", Some(3600));
        let user_id = UserId::new("abc123");
        let token = issuer.issue(&user_id).unwrap();
        assert_eq!(issuer.verify(&token).unwrap(), user_id);
    }
}
