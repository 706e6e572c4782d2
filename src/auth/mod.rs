//! Credential and session flows for vault accounts.
//!
//! The orchestrator composes the hasher, recovery key generator, token
//! service, and credential store into the register / login / recover flows.
//! It owns all policy decisions: which failures are indistinguishable, when
//! a fresh salt is cut, and what a caller is allowed to learn.

pub mod error;
pub mod hasher;
pub mod recovery;
pub mod store;
pub mod token;

pub use error::Error;

use chrono::Utc;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use uuid::Uuid;

use store::{Account, CredentialStore, InsertOutcome};
use token::{Claims, TokenService};

/// A successful authentication: the account identity plus a bearer token.
#[derive(Debug, Clone)]
pub struct Session {
    pub account_id: Uuid,
    pub username: String,
    pub token: String,
}

/// Registration result. The recovery key is plaintext here and nowhere else;
/// it is never persisted or logged.
pub struct Registration {
    pub session: Session,
    pub recovery_key: String,
}

impl std::fmt::Debug for Registration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registration")
            .field("session", &self.session)
            .field("recovery_key", &"***")
            .finish()
    }
}

pub struct Auth {
    store: Arc<dyn CredentialStore>,
    tokens: TokenService,
}

impl Auth {
    #[must_use]
    pub fn new(store: Arc<dyn CredentialStore>, tokens: TokenService) -> Self {
        Self { store, tokens }
    }

    /// Register a new account.
    ///
    /// The pre-insert lookup gives the common case a clean error; two
    /// registrations racing past it are resolved by the store's uniqueness
    /// guarantee, which surfaces as `UsernameTaken` for the loser.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for empty fields, `UsernameTaken` for a duplicate
    /// username, `StoreUnavailable` when persistence is down.
    #[instrument(skip(self, password))]
    pub async fn register(&self, username: &str, password: &str) -> Result<Registration, Error> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(Error::InvalidInput("Username and password are required"));
        }

        if self.store.find_by_username(username).await?.is_some() {
            return Err(Error::UsernameTaken);
        }

        let password_secret = hasher::hash_secret(password)?;
        let recovery_key = recovery::generate().map_err(|_| Error::RecoveryKey)?;
        let normalized = recovery::normalize(&recovery_key).map_err(|_| Error::RecoveryKey)?;
        let recovery_secret = hasher::hash_secret(&normalized)?;

        let account = Account {
            id: Uuid::new_v4(),
            username: username.to_string(),
            password_hash: password_secret.hash,
            password_salt: password_secret.salt,
            recovery_key_hash: recovery_secret.hash,
            created_at: Utc::now(),
        };

        match self.store.insert(&account).await? {
            InsertOutcome::Created => {}
            InsertOutcome::Conflict => {
                // Lost the race to a concurrent registration
                debug!("duplicate username on insert: {username}");
                return Err(Error::UsernameTaken);
            }
        }

        let session = self.open_session(account.id, &account.username)?;
        Ok(Registration {
            session,
            recovery_key,
        })
    }

    /// Authenticate a username/password pair.
    ///
    /// Unknown usernames and wrong passwords are indistinguishable to the
    /// caller: both are `InvalidCredentials` with the same message.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for empty fields, `InvalidCredentials` for any
    /// credential mismatch, `StoreUnavailable` when persistence is down.
    #[instrument(skip(self, password))]
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, Error> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(Error::InvalidInput("Username and password are required"));
        }

        let Some(account) = self.store.find_by_username(username).await? else {
            debug!("invalid credentials for {username}");
            return Err(Error::InvalidCredentials);
        };

        if !hasher::verify_secret(password, &account.password_hash)? {
            debug!("invalid credentials for {username}");
            return Err(Error::InvalidCredentials);
        }

        self.open_session(account.id, &account.username)
    }

    /// Reset the master password with a recovery key.
    ///
    /// Unlike login, this flow tells an unknown username (`AccountNotFound`)
    /// apart from a non-matching key (`InvalidRecoveryKey`): recovery UX has
    /// to distinguish "no such account" from "mistyped key". The recovery
    /// key is not rotated; it stays valid after the reset.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for empty fields, `AccountNotFound`,
    /// `InvalidRecoveryKey`, or `StoreUnavailable`.
    #[instrument(skip(self, recovery_key, new_password))]
    pub async fn recover(
        &self,
        username: &str,
        recovery_key: &str,
        new_password: &str,
    ) -> Result<(), Error> {
        let username = username.trim();
        if username.is_empty() || recovery_key.is_empty() || new_password.is_empty() {
            return Err(Error::InvalidInput(
                "Username, recovery key, and new password are required",
            ));
        }

        let Some(account) = self.store.find_by_username(username).await? else {
            return Err(Error::AccountNotFound);
        };

        let Ok(normalized) = recovery::normalize(recovery_key) else {
            return Err(Error::InvalidRecoveryKey);
        };

        if !hasher::verify_secret(&normalized, &account.recovery_key_hash)? {
            warn!("recovery key mismatch for {username}");
            return Err(Error::InvalidRecoveryKey);
        }

        let new_secret = hasher::hash_secret(new_password)?;
        self.store
            .update_credentials(account.id, &new_secret.hash, &new_secret.salt)
            .await?;

        Ok(())
    }

    /// Validate an `Authorization: Bearer <token>` header value.
    ///
    /// # Errors
    ///
    /// `ExpiredToken` for a well-signed token past its expiry;
    /// `InvalidToken` for everything else (missing scheme, bad format, bad
    /// signature).
    pub fn validate_bearer(
        &self,
        header_value: &str,
        now_unix_seconds: i64,
    ) -> Result<Claims, Error> {
        let token = header_value
            .strip_prefix("Bearer ")
            .ok_or(Error::InvalidToken)?;

        match self.tokens.verify(token, now_unix_seconds) {
            Ok(claims) => Ok(claims),
            Err(token::Error::Expired) => Err(Error::ExpiredToken),
            Err(_) => Err(Error::InvalidToken),
        }
    }

    fn open_session(&self, account_id: Uuid, username: &str) -> Result<Session, Error> {
        let token = self
            .tokens
            .issue(account_id, username, Utc::now().timestamp())
            .map_err(Error::TokenIssue)?;
        Ok(Session {
            account_id,
            username: username.to_string(),
            token,
        })
    }
}
