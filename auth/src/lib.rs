//! Authentication utilities library
//!
//! Provides reusable authentication primitives for services:
//! - Password hashing and verification (Argon2id)
//! - Basic-scheme credential envelope parsing
//! - Opaque token generation for sessions and password resets
//!
//! Each service defines its own authentication ports and adapts these
//! implementations; nothing here knows about requests, users, or storage.
//!
//! # Examples
//!
//! ## Password hashing
//! ```
//! use auth::PasswordHasher;
//!
//! let hasher = PasswordHasher::new();
//! let hash = hasher.hash("my_password").unwrap();
//! assert!(hasher.verify("my_password", &hash).unwrap());
//! assert!(!hasher.verify("not_my_password", &hash).unwrap());
//! ```
//!
//! ## Basic credentials
//! ```
//! use auth::BasicCredentials;
//!
//! // base64("alice@x.com:secret")
//! let creds = BasicCredentials::parse("Basic YWxpY2VAeC5jb206c2VjcmV0").unwrap();
//! assert_eq!(creds.identifier, "alice@x.com");
//! assert_eq!(creds.secret, "secret");
//!
//! // Any malformation fails closed to None.
//! assert!(BasicCredentials::parse("Bearer abc").is_none());
//! ```
//!
//! ## Opaque tokens
//! ```
//! let token = auth::token::generate();
//! assert_eq!(token.len(), 36);
//! ```

pub mod basic;
pub mod password;
pub mod token;

// Re-export commonly used items
pub use basic::BasicCredentials;
pub use password::PasswordError;
pub use password::PasswordHasher;
