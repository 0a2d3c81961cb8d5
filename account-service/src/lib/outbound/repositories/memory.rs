//! In-memory user repository for integration tests and local runs.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::UserRepository;

/// User store backed by a lock-guarded map.
///
/// Email uniqueness is enforced inside the create critical section, matching
/// the relational store's unique-column behavior.
#[derive(Clone, Default)]
pub struct InMemoryUserRepository {
    users: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create(&self, user: User) -> Result<User, AuthError> {
        let mut users = self.users.write().await;
        if users
            .values()
            .any(|u| u.email.as_str() == user.email.as_str())
        {
            return Err(AuthError::AlreadyExists(user.email.as_str().to_string()));
        }
        users.insert(user.id.0, user.clone());
        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError> {
        Ok(self.users.read().await.get(&id.0).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.email.as_str() == email)
            .cloned())
    }

    async fn find_all_by_email(&self, email: &str) -> Result<Vec<User>, AuthError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .filter(|u| u.email.as_str() == email)
            .cloned()
            .collect())
    }

    async fn find_by_session_id(&self, token: &str) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.session_id.as_deref() == Some(token))
            .cloned())
    }

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, AuthError> {
        Ok(self
            .users
            .read()
            .await
            .values()
            .find(|u| u.reset_token.as_deref() == Some(token))
            .cloned())
    }

    async fn update(&self, user: User) -> Result<User, AuthError> {
        let mut users = self.users.write().await;
        match users.get_mut(&user.id.0) {
            Some(slot) => {
                *slot = user.clone();
                Ok(user)
            }
            None => Err(AuthError::NotFound(user.id.to_string())),
        }
    }

    async fn clear_session(&self, token: &str) -> Result<bool, AuthError> {
        let mut users = self.users.write().await;
        for user in users.values_mut() {
            if user.session_id.as_deref() == Some(token) {
                user.session_id = None;
                return Ok(true);
            }
        }
        Ok(false)
    }
}
