//! Salted adaptive hashing for master passwords and recovery keys.
//!
//! Secrets are Argon2id-hashed with a fresh random salt per call. Stored
//! hashes are PHC strings; verification delegates to the PHC verifier, which
//! compares digests in constant time.

use argon2::{Argon2, PasswordHash, PasswordHasher, PasswordVerifier, password_hash::SaltString};
use rand::rngs::OsRng;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to hash secret")]
    Hash,
    #[error("stored hash is not a valid PHC string")]
    MalformedHash,
}

/// A freshly derived hash plus the salt that produced it.
///
/// The salt is embedded in the PHC string but also returned on its own
/// because the account record stores it as a separate field.
#[derive(Debug, Clone)]
pub struct HashedSecret {
    pub hash: String,
    pub salt: String,
}

/// Hash a secret with a fresh random salt.
///
/// # Errors
///
/// Returns an error if the Argon2id derivation fails.
pub fn hash_secret(secret: &str) -> Result<HashedSecret, Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(secret.as_bytes(), &salt)
        .map_err(|_| Error::Hash)?
        .to_string();

    Ok(HashedSecret {
        hash,
        salt: salt.to_string(),
    })
}

/// Verify a secret against a stored PHC hash.
///
/// # Errors
///
/// Returns an error if the stored hash cannot be parsed as a PHC string.
pub fn verify_secret(secret: &str, stored_hash: &str) -> Result<bool, Error> {
    let parsed = PasswordHash::new(stored_hash).map_err(|_| Error::MalformedHash)?;
    Ok(Argon2::default()
        .verify_password(secret.as_bytes(), &parsed)
        .is_ok())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{Error, hash_secret, verify_secret};

    #[test]
    fn hash_and_verify_round_trip() {
        let hashed = hash_secret("correct horse battery staple").unwrap();
        assert!(verify_secret("correct horse battery staple", &hashed.hash).unwrap());
        assert!(!verify_secret("wrong password", &hashed.hash).unwrap());
    }

    #[test]
    fn equal_inputs_get_distinct_salts() {
        let first = hash_secret("same input").unwrap();
        let second = hash_secret("same input").unwrap();
        assert_ne!(first.hash, second.hash);
        assert_ne!(first.salt, second.salt);
    }

    #[test]
    fn hash_embeds_the_returned_salt() {
        let hashed = hash_secret("secret").unwrap();
        assert!(hashed.hash.starts_with("$argon2id$"));
        assert!(hashed.hash.contains(&hashed.salt));
    }

    #[test]
    fn malformed_stored_hash_is_an_error() {
        let result = verify_secret("secret", "not-a-phc-string");
        assert!(matches!(result, Err(Error::MalformedHash)));
    }
}
