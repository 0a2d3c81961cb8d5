//! In-memory session table and the session manager built on it.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::SessionManager;
use crate::domain::auth::ports::UserRepository;

/// In-memory session table: opaque token -> user identity.
///
/// Shared, process-wide mutable state. Every operation takes the table lock
/// exactly once, so concurrent creates, lookups, and destroys never tear and
/// a destroy removes its entry exactly once. Unlike the persisted policy,
/// multiple concurrent sessions per user are allowed. Sessions are lost on
/// restart.
#[derive(Clone, Default)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<String, UserId>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Generate an unguessable token and record the token -> user association.
    pub async fn create_session(&self, user_id: UserId) -> String {
        let token = auth::token::generate();
        self.sessions.write().await.insert(token.clone(), user_id);
        token
    }

    /// Pure lookup; `None` when the token is unknown.
    pub async fn lookup_user_id(&self, token: &str) -> Option<UserId> {
        self.sessions.read().await.get(token).copied()
    }

    /// Remove the association. The map removal under the write lock decides
    /// the single winner between concurrent destroys; a second destroy of the
    /// same token returns `false`, it never errors.
    pub async fn destroy_session(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }
}

/// Session manager over the in-memory table.
///
/// Principals still come from the user store; only the token table lives in
/// memory, so tokens never touch the user record and each login adds a
/// session instead of replacing one.
pub struct MemorySessions<R>
where
    R: UserRepository,
{
    store: SessionStore,
    repository: Arc<R>,
}

impl<R> MemorySessions<R>
where
    R: UserRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            store: SessionStore::new(),
            repository,
        }
    }
}

#[async_trait]
impl<R> SessionManager for MemorySessions<R>
where
    R: UserRepository,
{
    async fn open(&self, user: &User) -> Result<String, AuthError> {
        Ok(self.store.create_session(user.id).await)
    }

    async fn resolve(&self, token: &str) -> Result<Option<User>, AuthError> {
        let Some(user_id) = self.store.lookup_user_id(token).await else {
            return Ok(None);
        };
        self.repository.find_by_id(&user_id).await
    }

    async fn close(&self, token: &str) -> Result<bool, AuthError> {
        Ok(self.store.destroy_session(token).await)
    }
}
