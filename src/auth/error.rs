//! Error taxonomy for the auth flows.
//!
//! Display strings double as the client-facing messages, so the uniform
//! login message lives here in one place.

use thiserror::Error;

use super::{hasher, store::StoreError, token};

#[derive(Debug, Error)]
pub enum Error {
    #[error("Username already exists")]
    UsernameTaken,

    #[error("Invalid username or password")]
    InvalidCredentials,

    #[error("User not found")]
    AccountNotFound,

    #[error("Invalid recovery key")]
    InvalidRecoveryKey,

    #[error("Token expired")]
    ExpiredToken,

    #[error("Invalid token")]
    InvalidToken,

    #[error("{0}")]
    InvalidInput(&'static str),

    #[error("credential store unavailable")]
    StoreUnavailable(#[from] StoreError),

    #[error("failed to process secret")]
    Hashing(#[from] hasher::Error),

    #[error("failed to generate recovery key")]
    RecoveryKey,

    #[error("failed to issue token")]
    TokenIssue(#[source] token::Error),
}

#[cfg(test)]
mod tests {
    use super::Error;

    #[test]
    fn unknown_user_and_bad_password_share_one_message() {
        // Both login failure paths must render identically to the caller.
        assert_eq!(
            Error::InvalidCredentials.to_string(),
            "Invalid username or password"
        );
    }

    #[test]
    fn client_facing_messages() {
        assert_eq!(Error::UsernameTaken.to_string(), "Username already exists");
        assert_eq!(Error::AccountNotFound.to_string(), "User not found");
        assert_eq!(Error::InvalidRecoveryKey.to_string(), "Invalid recovery key");
        assert_eq!(Error::ExpiredToken.to_string(), "Token expired");
        assert_eq!(Error::InvalidToken.to_string(), "Invalid token");
    }
}
