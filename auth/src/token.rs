//! Opaque token generation for sessions and password resets.

use uuid::Uuid;

/// Generate a collision-resistant, unguessable token.
///
/// UUIDv4 from the OS random source: 122 random bits, rendered in the
/// standard hyphenated form. Callers treat the value as opaque.
pub fn generate() -> String {
    Uuid::new_v4().to_string()
}
