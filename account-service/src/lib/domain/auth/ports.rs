use async_trait::async_trait;

use crate::domain::auth::errors::AuthError;
use crate::domain::auth::models::RegisterCommand;
use crate::domain::auth::models::User;
use crate::domain::auth::models::UserId;

/// Port for the authentication facade.
#[async_trait]
pub trait AuthServicePort: Send + Sync + 'static {
    /// Register a new account, hashing the password before it is persisted.
    ///
    /// # Errors
    /// * `AlreadyExists` - Email is already registered
    /// * `Password` - Hashing failed
    /// * `Repository` - Store operation failed
    async fn register(&self, command: RegisterCommand) -> Result<User, AuthError>;

    /// Resolve a principal from an identifier and secret.
    ///
    /// Verifies the secret against every candidate record for the identifier
    /// and returns the first verified match. Unknown identifiers and store
    /// failures resolve to `None` (fail closed); the work done for an unknown
    /// identifier matches the work done for a known one.
    async fn resolve_principal(&self, email: &str, password: &str) -> Option<User>;

    /// Credential check. Fails closed on unknown email and on store errors;
    /// the result never distinguishes the two.
    async fn authenticate(&self, email: &str, password: &str) -> bool;

    /// Issue a session token and persist it onto the user record, overwriting
    /// any prior token: a new login invalidates the previous session.
    ///
    /// Returns `None` when the email is unknown.
    async fn issue_session(&self, email: &str) -> Result<Option<String>, AuthError>;

    /// Resolve a session token to its principal; `None` if absent or unknown.
    async fn resolve_session(&self, token: &str) -> Result<Option<User>, AuthError>;

    /// Clear the stored session token. No-op when the user holds none.
    async fn revoke_session(&self, user_id: &UserId) -> Result<(), AuthError>;

    /// Issue a single-use password-reset token and persist it.
    ///
    /// # Errors
    /// * `NotFound` - Email is unknown
    async fn issue_reset_token(&self, email: &str) -> Result<String, AuthError>;

    /// Consume a reset token: replace the stored hash with a hash of the new
    /// password and invalidate the token (single-use).
    ///
    /// # Errors
    /// * `InvalidToken` - Token is unknown or was already consumed
    /// * `Password` - Hashing failed
    async fn consume_reset_token(&self, token: &str, new_password: &str)
        -> Result<(), AuthError>;
}

/// Persistence port for user records.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user.
    ///
    /// # Errors
    /// * `AlreadyExists` - Unique-email violation. Uniqueness is enforced at
    ///   the store, so a check-then-insert has no duplicate race.
    /// * `Repository` - Store operation failed
    async fn create(&self, user: User) -> Result<User, AuthError>;

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, AuthError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, AuthError>;

    /// All records matching an identifier. The store keeps at most one per
    /// email, but credential resolution verifies every candidate rather than
    /// trusting the first row.
    async fn find_all_by_email(&self, email: &str) -> Result<Vec<User>, AuthError>;

    async fn find_by_session_id(&self, token: &str) -> Result<Option<User>, AuthError>;

    async fn find_by_reset_token(&self, token: &str) -> Result<Option<User>, AuthError>;

    /// Write back the mutable fields (hash, session token, reset token); the
    /// email is immutable after creation.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `Repository` - Store operation failed
    async fn update(&self, user: User) -> Result<User, AuthError>;

    /// Atomically clear a session token wherever it is stored. Returns whether
    /// any record held the token; the single conditional write decides the
    /// winner between concurrent destroys.
    async fn clear_session(&self, token: &str) -> Result<bool, AuthError>;
}

/// Session lifecycle port: open, resolve, and close session tokens.
///
/// Two implementations exist, chosen at configuration time: the persisted
/// policy (token on the user record, one session per user) and the in-memory
/// table (multiple sessions per user, lost on restart).
#[async_trait]
pub trait SessionManager: Send + Sync + 'static {
    /// Bind a fresh opaque token to the user and return it.
    async fn open(&self, user: &User) -> Result<String, AuthError>;

    /// Resolve a token to its principal; `None` if unknown.
    async fn resolve(&self, token: &str) -> Result<Option<User>, AuthError>;

    /// Destroy the session. Returns `false` when the token was absent or
    /// already closed; a repeated close is never an error, and concurrent
    /// closes of the same token report success exactly once.
    async fn close(&self, token: &str) -> Result<bool, AuthError>;
}
