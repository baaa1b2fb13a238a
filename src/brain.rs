//! Core service logic: signup, signin, content management and sharing.
//!
//! Every operation is a straight validate → query → respond sequence over
//! the stores. Handlers in [`crate::api`] only translate HTTP to these calls.

use anyhow::Result;
use serde::Serialize;
use tracing::{info, warn};

use crate::auth::{AuthError, PasswordHasher, TokenIssuer, UserStore};
use crate::config::BrainConfig;
use crate::db::{
    ContentCreate, ContentStore, ContentView, DatabaseConfig, Db, LinkStore, create_connection,
    ensure_schema,
};
use crate::error::{BrainError, BrainResult};
use crate::types::{ContentId, ShareToken, UserId, Username};
use crate::utils::random_token;
use crate::validation::Credentials;

/// Attempts at minting a share token before giving up on collisions.
const SHARE_TOKEN_ATTEMPTS: usize = 5;

/// A user's collection as seen through a share link.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct SharedBrain {
    pub username: Username,
    pub content: Vec<ContentView>,
}

/// The service: owns the stores and the credential primitives.
pub struct Brain {
    users: UserStore,
    content: ContentStore,
    links: LinkStore,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
    share_token_length: usize,
}

impl Brain {
    /// Build the service over an already-initialized database.
    pub fn new(db: Db, config: &BrainConfig) -> Self {
        Self {
            users: UserStore::new(db.clone()),
            content: ContentStore::new(db.clone()),
            links: LinkStore::new(db),
            hasher: PasswordHasher::new(config.bcrypt_cost),
            tokens: TokenIssuer::new(&config.jwt_secret, config.token_ttl_seconds),
            share_token_length: config.share_token_length,
        }
    }

    /// Connect to the database, make sure the schema exists, and build the
    /// service.
    pub async fn connect(db_config: DatabaseConfig, config: &BrainConfig) -> Result<Self> {
        config.validate()?;
        let db = create_connection(db_config).await?;
        ensure_schema(&db).await?;
        Ok(Self::new(db, config))
    }

    /// Token issuer shared with the auth gate.
    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Register a new user.
    pub async fn signup(&self, creds: &Credentials) -> BrainResult<UserId> {
        let username = creds.username();

        if self.users.get_user_by_username(&username).await?.is_some() {
            warn!("Signup rejected, username `{}` already exists", username);
            return Err(BrainError::UsernameTaken);
        }

        let password_hash = self.hasher.hash(creds.password()).await?;

        // The unique index catches a signup that raced past the check above
        match self.users.create_user(&username, &password_hash).await? {
            Some(user) => {
                info!("New user created: {}", username);
                Ok(user.id)
            }
            None => {
                warn!("Signup rejected, username `{}` already exists", username);
                Err(BrainError::UsernameTaken)
            }
        }
    }

    /// Check credentials and issue a bearer token.
    pub async fn signin(&self, creds: &Credentials) -> BrainResult<String> {
        let username = creds.username();

        let user = self
            .users
            .get_user_by_username(&username)
            .await?
            .ok_or(BrainError::UnknownUsername)?;

        if !self.hasher.verify(creds.password(), &user.password_hash).await? {
            warn!("Signin rejected for `{}`: wrong password", username);
            return Err(BrainError::WrongPassword);
        }

        let token = self
            .tokens
            .issue(&user.id)
            .map_err(|e| BrainError::Internal(e.to_string()))?;

        info!("User signed in: {}", username);
        Ok(token)
    }

    /// Make sure the user a token was issued to still exists.
    async fn require_user(&self, user_id: &UserId) -> BrainResult<()> {
        match self.users.get_user_by_id(user_id).await? {
            Some(_) => Ok(()),
            None => Err(BrainError::Unauthorized(AuthError::InvalidToken(
                "token names an unknown user".to_string(),
            ))),
        }
    }

    /// Save a content item for `owner`.
    pub async fn add_content(&self, owner: &UserId, data: &ContentCreate) -> BrainResult<ContentId> {
        self.require_user(owner).await?;
        let id = self.content.create_content(owner, data).await?;
        info!("Content {} ({}) added by {}", id, data.kind, owner);
        Ok(id)
    }

    /// List everything `owner` has saved.
    pub async fn list_content(&self, owner: &UserId) -> BrainResult<Vec<ContentView>> {
        Ok(self.content.list_content(owner).await?)
    }

    /// Delete one of `owner`'s content items.
    pub async fn delete_content(&self, owner: &UserId, content_id: &ContentId) -> BrainResult<()> {
        if self.content.delete_content(owner, content_id).await? {
            info!("Content {} deleted by {}", content_id, owner);
            Ok(())
        } else {
            Err(BrainError::ContentNotFound)
        }
    }

    /// Enable sharing for `owner`, returning the share token.
    ///
    /// Idempotent: if a link already exists its token is returned unchanged.
    pub async fn enable_sharing(&self, owner: &UserId) -> BrainResult<ShareToken> {
        if let Some(link) = self.links.get_link_by_owner(owner).await? {
            return Ok(link.hash);
        }

        self.require_user(owner).await?;

        for _ in 0..SHARE_TOKEN_ATTEMPTS {
            let token = ShareToken::new(random_token(self.share_token_length));

            if self.links.create_link(owner, &token).await? {
                info!("Sharing enabled for {}", owner);
                return Ok(token);
            }

            // Either a concurrent request created the owner's link first, or
            // the token collided with another owner's link.
            if let Some(link) = self.links.get_link_by_owner(owner).await? {
                return Ok(link.hash);
            }
        }

        Err(BrainError::Internal(format!(
            "could not mint a unique share token after {} attempts",
            SHARE_TOKEN_ATTEMPTS
        )))
    }

    /// Disable sharing for `owner`. A no-op if sharing was not enabled.
    pub async fn disable_sharing(&self, owner: &UserId) -> BrainResult<()> {
        if self.links.delete_link(owner).await? {
            info!("Sharing disabled for {}", owner);
        }
        Ok(())
    }

    /// Resolve a share token to the owner's username and content.
    pub async fn shared_brain(&self, token: &ShareToken) -> BrainResult<SharedBrain> {
        let link = self
            .links
            .get_link_by_hash(token)
            .await?
            .ok_or(BrainError::InvalidShareLink)?;

        let owner = self
            .users
            .get_user_by_id(&link.owner_id)
            .await?
            .ok_or_else(|| {
                warn!("Share link references missing user {}", link.owner_id);
                BrainError::ShareOwnerMissing
            })?;

        let content = self.content.list_content(&owner.id).await?;

        Ok(SharedBrain {
            username: owner.username,
            content,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ContentKind;

    async fn setup_brain() -> Brain {
        let db_config = DatabaseConfig {
            url: "memory".to_string(),
            ..Default::default()
        };
        let mut config = BrainConfig::new("test-secret");
        config.bcrypt_cost = 4;
        Brain::connect(db_config, &config).await.unwrap()
    }

    fn creds(username: &str, password: &str) -> Credentials {
        Credentials::from_parts(Some(username.to_string()), Some(password.to_string())).unwrap()
    }

    fn link(title: &str) -> ContentCreate {
        ContentCreate {
            link: "https://example.com".to_string(),
            kind: ContentKind::Image,
            title: title.to_string(),
            tags: vec!["pics".to_string()],
        }
    }

    async fn signed_up(brain: &Brain, username: &str) -> UserId {
        brain.signup(&creds(username, "Passw0rd!")).await.unwrap()
    }

    #[tokio::test]
    async fn test_signup_twice_fails() {
        let brain = setup_brain().await;

        assert!(brain.signup(&creds("alice", "Passw0rd!")).await.is_ok());
        assert_eq!(
            brain.signup(&creds("alice", "0therPass!")).await,
            Err(BrainError::UsernameTaken)
        );
    }

    #[tokio::test]
    async fn test_signin_token_resolves_to_signup_user() {
        let brain = setup_brain().await;
        let user_id = signed_up(&brain, "alice").await;

        let token = brain.signin(&creds("alice", "Passw0rd!")).await.unwrap();
        assert_eq!(brain.tokens().verify(&token).unwrap(), user_id);
    }

    #[tokio::test]
    async fn test_signin_failures() {
        let brain = setup_brain().await;
        signed_up(&brain, "alice").await;

        assert_eq!(
            brain.signin(&creds("alice", "Wr0ngPass!")).await,
            Err(BrainError::WrongPassword)
        );
        assert_eq!(
            brain.signin(&creds("bob", "Passw0rd!")).await,
            Err(BrainError::UnknownUsername)
        );
    }

    #[tokio::test]
    async fn test_content_not_deletable_by_other_user() {
        let brain = setup_brain().await;
        let alice = signed_up(&brain, "alice").await;
        let bob = signed_up(&brain, "bob").await;

        let id = brain.add_content(&alice, &link("cat")).await.unwrap();

        assert_eq!(
            brain.delete_content(&bob, &id).await,
            Err(BrainError::ContentNotFound)
        );
        assert_eq!(brain.list_content(&alice).await.unwrap().len(), 1);

        assert!(brain.delete_content(&alice, &id).await.is_ok());
        assert!(brain.list_content(&alice).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_nonexistent_content() {
        let brain = setup_brain().await;
        let alice = signed_up(&brain, "alice").await;

        assert_eq!(
            brain.delete_content(&alice, &ContentId::new("nope")).await,
            Err(BrainError::ContentNotFound)
        );
    }

    #[tokio::test]
    async fn test_add_content_for_unknown_user() {
        let brain = setup_brain().await;
        let res = brain.add_content(&UserId::new("ghost"), &link("x")).await;
        assert!(matches!(res, Err(BrainError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn test_enable_sharing_is_idempotent() {
        let brain = setup_brain().await;
        let alice = signed_up(&brain, "alice").await;

        let first = brain.enable_sharing(&alice).await.unwrap();
        let second = brain.enable_sharing(&alice).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first.as_str().len(), 10);
    }

    #[tokio::test]
    async fn test_concurrent_enable_sharing_yields_one_token() {
        let brain = setup_brain().await;
        let alice = signed_up(&brain, "alice").await;

        let (a, b, c) = tokio::join!(
            brain.enable_sharing(&alice),
            brain.enable_sharing(&alice),
            brain.enable_sharing(&alice),
        );
        let (a, b, c) = (a.unwrap(), b.unwrap(), c.unwrap());

        assert_eq!(a, b);
        assert_eq!(b, c);

        let shared = brain.shared_brain(&a).await.unwrap();
        assert_eq!(shared.username.as_str(), "alice");
        assert_eq!(brain.enable_sharing(&alice).await.unwrap(), a);
    }

    #[tokio::test]
    async fn test_reenable_sharing_mints_new_token() {
        let brain = setup_brain().await;
        let alice = signed_up(&brain, "alice").await;

        let first = brain.enable_sharing(&alice).await.unwrap();
        brain.disable_sharing(&alice).await.unwrap();
        let second = brain.enable_sharing(&alice).await.unwrap();

        assert_ne!(first, second);
        assert_eq!(
            brain.shared_brain(&first).await,
            Err(BrainError::InvalidShareLink)
        );
    }

    #[tokio::test]
    async fn test_disable_sharing_without_link() {
        let brain = setup_brain().await;
        let alice = signed_up(&brain, "alice").await;
        assert!(brain.disable_sharing(&alice).await.is_ok());
    }

    #[tokio::test]
    async fn test_shared_brain_shows_only_owner_content() {
        let brain = setup_brain().await;
        let alice = signed_up(&brain, "alice").await;
        let bob = signed_up(&brain, "bob").await;

        brain.add_content(&alice, &link("a1")).await.unwrap();
        brain.add_content(&alice, &link("a2")).await.unwrap();
        brain.add_content(&bob, &link("b1")).await.unwrap();

        let token = brain.enable_sharing(&alice).await.unwrap();
        let shared = brain.shared_brain(&token).await.unwrap();

        assert_eq!(shared.username.as_str(), "alice");
        assert_eq!(shared.content.len(), 2);
        assert!(shared.content.iter().all(|c| c.owner.id == alice));
        assert!(shared.content.iter().all(|c| c.title.starts_with('a')));
    }

    #[tokio::test]
    async fn test_shared_brain_unknown_token() {
        let brain = setup_brain().await;
        assert_eq!(
            brain.shared_brain(&ShareToken::new("neverissued")).await,
            Err(BrainError::InvalidShareLink)
        );
    }
}
