//! Authentication gate for protected HTTP routes.

use std::fmt;

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use http::header::AUTHORIZATION;
use tracing::{debug, warn};

use crate::api::error::ApiError;
use crate::auth::context::UserContext;
use crate::auth::token::TokenIssuer;

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No token in the `Authorization` header
    MissingToken,
    /// Bad signature, malformed or expired token
    InvalidToken(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingToken => write!(f, "Token not found"),
            Self::InvalidToken(msg) => write!(f, "Invalid token: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

/// Pull the token out of an `Authorization` header value.
///
/// Accepts both `Bearer <token>` and the bare token.
pub fn bearer_token(header: Option<&str>) -> Result<&str, AuthError> {
    let value = header.map(str::trim_start).ok_or(AuthError::MissingToken)?;
    let token = value
        .strip_prefix("Bearer ")
        .or_else(|| value.strip_prefix("bearer "))
        .unwrap_or(value)
        .trim();

    if token.is_empty() {
        return Err(AuthError::MissingToken);
    }
    Ok(token)
}

/// Resolve the caller's identity from an `Authorization` header value.
pub fn authenticate(issuer: &TokenIssuer, header: Option<&str>) -> Result<UserContext, AuthError> {
    let token = bearer_token(header)?;
    let user_id = issuer.verify(token)?;
    debug!("Token verified for user {}", user_id);
    Ok(UserContext::new(user_id))
}

/// Middleware that rejects unauthenticated requests with 401 and otherwise
/// inserts a [`UserContext`] into the request extensions.
pub async fn require_auth(
    State(issuer): State<TokenIssuer>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let header = request
        .headers()
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok());

    let ctx = authenticate(&issuer, header).inspect_err(|e| {
        warn!("Rejected request to {}: {}", request.uri().path(), e);
    })?;

    request.extensions_mut().insert(ctx);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::UserId;

    #[test]
    fn test_bearer_token_forms() {
        assert_eq!(bearer_token(Some("Bearer abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert_eq!(bearer_token(Some("abc.def.ghi")).unwrap(), "abc.def.ghi");
        assert_eq!(bearer_token(Some("  bearer abc  ")).unwrap(), "abc");
    }

    #[test]
    fn test_bearer_token_missing() {
        assert_eq!(bearer_token(None), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(Some("")), Err(AuthError::MissingToken));
        assert_eq!(bearer_token(Some("Bearer ")), Err(AuthError::MissingToken));
    }

    #[test]
    fn test_authenticate_resolves_user() {
        let issuer = TokenIssuer::new("secret", None);
        let token = issuer.issue(&UserId::new("u42")).unwrap();

        let ctx = authenticate(&issuer, Some(&format!("Bearer {}", token))).unwrap();
        assert_eq!(ctx.user_id().as_str(), "u42");
    }

    #[test]
    fn test_authenticate_rejects_tampered_token() {
        let issuer = TokenIssuer::new("secret", None);
        let mut token = issuer.issue(&UserId::new("u42")).unwrap();
        token.push('x');

        assert!(matches!(
            authenticate(&issuer, Some(&token)),
            Err(AuthError::InvalidToken(_))
        ));
    }

    #[test]
    fn test_auth_error_display() {
        assert_eq!(AuthError::MissingToken.to_string(), "Token not found");
        assert_eq!(
            AuthError::InvalidToken("bad".to_string()).to_string(),
            "Invalid token: bad"
        );
    }
}
