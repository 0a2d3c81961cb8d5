use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;
use crate::domain::auth::ports::AuthServicePort;
use crate::domain::auth::ports::SessionManager;
use crate::domain::auth::ports::UserRepository;

/// Authentication facade over an injected user store.
///
/// Composes password hashing, token generation, and the repository. Also
/// implements [`SessionManager`] with the persisted session policy: the
/// current token lives on the user record, so each user has at most one
/// active session and a new login silently invalidates the previous one.
pub struct AuthService<R>
where
    R: UserRepository,
{
    repository: Arc<R>,
    password_hasher: auth::PasswordHasher,
}

impl<R> AuthService<R>
where
    R: UserRepository,
{
    pub fn new(repository: Arc<R>) -> Self {
        Self {
            repository,
            password_hasher: auth::PasswordHasher::new(),
        }
    }
}

#[async_trait]
impl<R> AuthServicePort for AuthService<R>
where
    R: UserRepository,
{
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError> {
        if self
            .repository
            .find_by_email(command.email.as_str())
            .await?
            .is_some()
        {
            return Err(AuthError::AlreadyExists(command.email.as_str().to_string()));
        }

        let password_hash = self.password_hasher.hash(&command.password)?;

        let user = User {
            id: UserId::new(),
            email: command.email,
            password_hash,
            session_id: None,
            reset_token: None,
            created_at: Utc::now(),
        };

        // The store's unique-email constraint backs the check above, so a
        // concurrent duplicate insert surfaces as AlreadyExists here too.
        self.repository.create(user).await
    }

    async fn resolve_principal(&self, email: &str, password: &str) -> Option<User> {
        let candidates = match self.repository.find_all_by_email(email).await {
            Ok(candidates) => candidates,
            Err(e) => {
                tracing::warn!(error = %e, "credential lookup failed, failing closed");
                return None;
            }
        };

        if candidates.is_empty() {
            // Burn a verification so unknown identifiers cost the same as
            // known ones.
            self.password_hasher.verify_discard(password);
            return None;
        }

        for user in candidates {
            match self.password_hasher.verify(password, &user.password_hash) {
                Ok(true) => return Some(user),
                Ok(false) => continue,
                Err(e) => {
                    tracing::warn!(user_id = %user.id, error = %e, "stored hash unparseable, skipping candidate");
                    continue;
                }
            }
        }

        None
    }

    async fn authenticate(&self, email: &str, password: &str) -> bool {
        self.resolve_principal(email, password).await.is_some()
    }

    async fn issue_session(&self, email: &str) -> Result<Option<String>, AuthError> {
        let Some(mut user) = self.repository.find_by_email(email).await? else {
            return Ok(None);
        };

        let token = auth::token::generate();
        user.session_id = Some(token.clone());
        self.repository.update(user).await?;

        Ok(Some(token))
    }

    async fn resolve_session(&self, token: &str) -> Result<Option<User>, AuthError> {
        if token.is_empty() {
            return Ok(None);
        }
        self.repository.find_by_session_id(token).await
    }

    async fn revoke_session(&self, user_id: &UserId) -> Result<(), AuthError> {
        let Some(mut user) = self.repository.find_by_id(user_id).await? else {
            return Ok(());
        };

        if user.session_id.take().is_some() {
            self.repository.update(user).await?;
        }

        Ok(())
    }

    async fn issue_reset_token(&self, email: &str) -> Result<String, AuthError> {
        let Some(mut user) = self.repository.find_by_email(email).await? else {
            return Err(AuthError::NotFound(email.to_string()));
        };

        let token = auth::token::generate();
        user.reset_token = Some(token.clone());
        self.repository.update(user).await?;

        Ok(token)
    }

    async fn consume_reset_token(
        &self,
        token: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if token.is_empty() {
            return Err(AuthError::InvalidToken);
        }

        let Some(mut user) = self.repository.find_by_reset_token(token).await? else {
            return Err(AuthError::InvalidToken);
        };

        user.password_hash = self.password_hasher.hash(new_password)?;
        user.reset_token = None;
        self.repository.update(user).await?;

        Ok(())
    }
}

/// Persisted session policy: the user record holds the one current token.
#[async_trait]
impl<R> SessionManager for AuthService<R>
where
    R: UserRepository,
{
    async fn open(&self, user: &User) -> Result<String, AuthError> {
        self.issue_session(user.email.as_str())
            .await?
            .ok_or_else(|| AuthError::NotFound(user.email.as_str().to_string()))
    }

    async fn resolve(&self, token: &str) -> Result<Option<User>, AuthError> {
        self.resolve_session(token).await
    }

    async fn close(&self, token: &str) -> Result<bool, AuthError> {
        if token.is_empty() {
            return Ok(false);
        }
        self.repository.clear_session(token).await
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;
    use mockall::predicate::*;

    use super::*;
    use crate::domain::auth::models::EmailAddress;

    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, AuthError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError>;
            async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;
            async fn find_all_by_email(&self, email: &str) -> Result<Vec<User>, AuthError>;
            async fn find_by_session_id(&self, token: &str) -> Result<Option<User>, AuthError>;
            async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, AuthError>;
            async fn update(&self, user: User) -> Result<User, AuthError>;
            async fn clear_session(&self, token: &str) -> Result<bool, AuthError>;
        }
    }

    fn user_with_password(email: &str, password: &str) -> User {
        let hasher = auth::PasswordHasher::new();
        User {
            id: UserId::new(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password_hash: hasher.hash(password).unwrap(),
            session_id: None,
            reset_token: None,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_hashes_password() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .with(eq("alice@x.com"))
            .times(1)
            .returning(|_| Ok(None));
        repository
            .expect_create()
            .withf(|user| {
                user.email.as_str() == "alice@x.com"
                    && user.password_hash.starts_with("$argon2")
                    && user.session_id.is_none()
                    && user.reset_token.is_none()
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = AuthService::new(Arc::new(repository));

        let command = RegisterCommand::new(
            EmailAddress::new("alice@x.com".to_string()).unwrap(),
            "secret".to_string(),
        );
        let user = service.register(command).await.unwrap();
        assert_eq!(user.email.as_str(), "alice@x.com");
        assert_ne!(user.password_hash, "secret");
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_email()
            .times(1)
            .returning(|_| Ok(Some(user_with_password("alice@x.com", "secret"))));
        repository.expect_create().times(0);

        let service = AuthService::new(Arc::new(repository));

        let command = RegisterCommand::new(
            EmailAddress::new("alice@x.com".to_string()).unwrap(),
            "secret".to_string(),
        );
        let result = service.register(command).await;
        assert!(matches!(result, Err(AuthError::AlreadyExists(_))));
    }

    #[tokio::test]
    async fn test_resolve_principal_verifies_secret() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_all_by_email()
            .with(eq("alice@x.com"))
            .returning(|_| Ok(vec![user_with_password("alice@x.com", "secret")]));

        let service = AuthService::new(Arc::new(repository));

        let principal = service.resolve_principal("alice@x.com", "secret").await;
        assert!(principal.is_some());
        assert_eq!(principal.unwrap().email.as_str(), "alice@x.com");

        let rejected = service.resolve_principal("alice@x.com", "wrong").await;
        assert!(rejected.is_none());
    }

    #[tokio::test]
    async fn test_resolve_principal_checks_all_candidates() {
        let mut repository = MockTestUserRepository::new();

        // First candidate does not verify; the second does.
        repository.expect_find_all_by_email().returning(|_| {
            Ok(vec![
                user_with_password("shared@x.com", "other_secret"),
                user_with_password("shared@x.com", "secret"),
            ])
        });

        let service = AuthService::new(Arc::new(repository));

        let principal = service.resolve_principal("shared@x.com", "secret").await;
        assert!(principal.is_some());
    }

    #[tokio::test]
    async fn test_authenticate_fails_closed_on_store_error() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_all_by_email()
            .returning(|_| Err(AuthError::Repository("connection reset".to_string())));

        let service = AuthService::new(Arc::new(repository));

        assert!(!service.authenticate("alice@x.com", "secret").await);
    }

    #[tokio::test]
    async fn test_authenticate_unknown_email() {
        let mut repository = MockTestUserRepository::new();

        repository.expect_find_all_by_email().returning(|_| Ok(vec![]));

        let service = AuthService::new(Arc::new(repository));

        assert!(!service.authenticate("nobody@x.com", "secret").await);
    }

    #[tokio::test]
    async fn test_issue_session_overwrites_previous_token() {
        let mut repository = MockTestUserRepository::new();

        repository.expect_find_by_email().returning(|_| {
            let mut user = user_with_password("alice@x.com", "secret");
            user.session_id = Some("old-token".to_string());
            Ok(Some(user))
        });
        repository
            .expect_update()
            .withf(|user| {
                user.session_id.is_some() && user.session_id.as_deref() != Some("old-token")
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = AuthService::new(Arc::new(repository));

        let token = service.issue_session("alice@x.com").await.unwrap();
        assert!(token.is_some());
        assert_ne!(token.unwrap(), "old-token");
    }

    #[tokio::test]
    async fn test_issue_session_unknown_email() {
        let mut repository = MockTestUserRepository::new();

        repository.expect_find_by_email().returning(|_| Ok(None));
        repository.expect_update().times(0);

        let service = AuthService::new(Arc::new(repository));

        let token = service.issue_session("nobody@x.com").await.unwrap();
        assert!(token.is_none());
    }

    #[tokio::test]
    async fn test_resolve_session_empty_token_skips_store() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_session_id().times(0);

        let service = AuthService::new(Arc::new(repository));

        let principal = service.resolve_session("").await.unwrap();
        assert!(principal.is_none());
    }

    #[tokio::test]
    async fn test_revoke_session_is_noop_without_session() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_id()
            .returning(|_| Ok(Some(user_with_password("alice@x.com", "secret"))));
        repository.expect_update().times(0);

        let service = AuthService::new(Arc::new(repository));

        service.revoke_session(&UserId::new()).await.unwrap();
    }

    #[tokio::test]
    async fn test_revoke_session_clears_token() {
        let mut repository = MockTestUserRepository::new();

        repository.expect_find_by_id().returning(|_| {
            let mut user = user_with_password("alice@x.com", "secret");
            user.session_id = Some("token".to_string());
            Ok(Some(user))
        });
        repository
            .expect_update()
            .withf(|user| user.session_id.is_none())
            .times(1)
            .returning(|user| Ok(user));

        let service = AuthService::new(Arc::new(repository));

        service.revoke_session(&UserId::new()).await.unwrap();
    }

    #[tokio::test]
    async fn test_close_unknown_token() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_clear_session()
            .with(eq("gone"))
            .returning(|_| Ok(false));

        let service = AuthService::new(Arc::new(repository));

        assert!(!service.close("gone").await.unwrap());
    }

    #[tokio::test]
    async fn test_issue_reset_token_unknown_email() {
        let mut repository = MockTestUserRepository::new();

        repository.expect_find_by_email().returning(|_| Ok(None));

        let service = AuthService::new(Arc::new(repository));

        let result = service.issue_reset_token("nobody@x.com").await;
        assert!(matches!(result, Err(AuthError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_consume_reset_token_replaces_hash_and_clears_token() {
        let mut repository = MockTestUserRepository::new();

        let old_hash = user_with_password("bob@x.com", "old_password").password_hash;
        let old_hash_for_mock = old_hash.clone();
        repository.expect_find_by_reset_token().returning(move |_| {
            let mut user = user_with_password("bob@x.com", "ignored");
            user.password_hash = old_hash_for_mock.clone();
            user.reset_token = Some("reset-token".to_string());
            Ok(Some(user))
        });
        repository
            .expect_update()
            .withf(move |user| {
                user.reset_token.is_none() && user.password_hash != old_hash
            })
            .times(1)
            .returning(|user| Ok(user));

        let service = AuthService::new(Arc::new(repository));

        service
            .consume_reset_token("reset-token", "new_password")
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn test_consume_reset_token_unknown_token() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_find_by_reset_token()
            .returning(|_| Ok(None));
        repository.expect_update().times(0);

        let service = AuthService::new(Arc::new(repository));

        let result = service.consume_reset_token("gone", "new_password").await;
        assert!(matches!(result, Err(AuthError::InvalidToken)));
    }
}
