//! User context for request-scoped identity.

use crate::types::UserId;

/// Identity of the caller, attached to the request by the auth gate.
///
/// It is immutable once created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserContext {
    user_id: UserId,
}

impl UserContext {
    pub fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// Get the authenticated user's key.
    pub fn user_id(&self) -> &UserId {
        &self.user_id
    }
}
