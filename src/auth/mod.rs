//! Authentication and user identity module.
//!
//! - **Passwords**: bcrypt hashes with a configurable cost factor
//! - **Bearer tokens**: HS256 JWTs carrying only the user key
//! - **Auth gate**: axum middleware that verifies the token and attaches a
//!   [`UserContext`] to the request
//!
//! ## Usage
//!
//! ```ignore
//! let protected = Router::new()
//!     .route("/content", get(list_content))
//!     .route_layer(middleware::from_fn_with_state(issuer, require_auth));
//! ```

mod context;
mod extractor;
mod password;
mod token;
mod user_store;

pub use context::UserContext;
pub use extractor::{AuthError, authenticate, bearer_token, require_auth};
pub use password::PasswordHasher;
pub use token::{TokenClaims, TokenIssuer};
pub use user_store::UserStore;
