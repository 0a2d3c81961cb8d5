use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::PasswordHash;
use argon2::password_hash::PasswordHasher as Argon2PasswordHasher;
use argon2::password_hash::PasswordVerifier;
use argon2::password_hash::SaltString;
use argon2::Argon2;
use thiserror::Error;

/// Error type for password operations.
#[derive(Debug, Clone, Error)]
pub enum PasswordError {
    #[error("Password hashing failed: {0}")]
    HashingFailed(String),

    #[error("Password verification failed: {0}")]
    VerificationFailed(String),
}

/// One-way salted password hashing.
///
/// Hashes with Argon2id and a random per-password salt, producing PHC string
/// format output (algorithm, parameters, salt, and digest in one string).
/// Digest comparison during verification is constant-time inside the argon2
/// crate, so timing does not reveal matching prefixes.
pub struct PasswordHasher;

impl PasswordHasher {
    /// PHC hash of a throwaway password. Verified against when a lookup finds
    /// no record so that requests for unknown identifiers cost the same as a
    /// real verification.
    const THROWAWAY_HASH: &'static str =
        "$argon2id$v=19$m=19456,t=2,p=1$VE0e3g7DalWHgDwou3nuRA$uC6TER156UQpk0lNQ5+jHM0l5poVjPA1he/Tyn9J4Zw";

    pub fn new() -> Self {
        Self
    }

    /// Hash a plaintext password for storage.
    ///
    /// # Errors
    /// * `HashingFailed` - Argon2 rejected the input or parameters
    pub fn hash(&self, password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| PasswordError::HashingFailed(e.to_string()))
    }

    /// Verify a plaintext password against a stored PHC-format hash.
    ///
    /// Returns `Ok(false)` on a mismatch; errors only when the stored hash
    /// itself cannot be parsed.
    pub fn verify(&self, password: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed_hash = PasswordHash::new(hash).map_err(|e| {
            PasswordError::VerificationFailed(format!("Invalid password hash: {}", e))
        })?;

        Ok(Argon2::default()
            .verify_password(password.as_bytes(), &parsed_hash)
            .is_ok())
    }

    /// Run a full verification against a fixed throwaway hash and discard the
    /// result. Called when no stored hash exists for an identifier, keeping
    /// the work done for unknown and known identifiers indistinguishable.
    pub fn verify_discard(&self, password: &str) {
        let _ = self.verify(password, Self::THROWAWAY_HASH);
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}
