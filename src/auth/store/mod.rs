//! Credential persistence gateway.
//!
//! The flows only ever need three operations, so the interface stays that
//! narrow: look up an account by username, insert a new account, and replace
//! the password hash and salt of an existing one. Uniqueness is enforced by
//! the storage layer itself, which is what resolves two concurrent
//! registrations racing past the pre-insert check.

use chrono::{DateTime, Utc};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;
use uuid::Uuid;

pub mod memory;
pub mod postgres;

pub use memory::MemoryCredentialStore;
pub use postgres::PgCredentialStore;

/// A single master-credential record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    pub password_hash: String,
    pub password_salt: String,
    pub recovery_key_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Outcome when attempting to insert a new account.
#[derive(Debug)]
pub enum InsertOutcome {
    Created,
    Conflict,
}

/// Store failures are infrastructure problems (pool exhaustion, connection
/// loss, timeouts), never security decisions.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("credential store unavailable: {0}")]
    Unavailable(#[from] sqlx::Error),
}

pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

pub trait CredentialStore: Send + Sync {
    fn find_by_username<'a>(&'a self, username: &'a str) -> StoreFuture<'a, Option<Account>>;

    fn insert<'a>(&'a self, account: &'a Account) -> StoreFuture<'a, InsertOutcome>;

    fn update_credentials<'a>(
        &'a self,
        account_id: Uuid,
        password_hash: &'a str,
        password_salt: &'a str,
    ) -> StoreFuture<'a, ()>;
}

#[cfg(test)]
mod tests {
    use super::{Account, InsertOutcome};
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn insert_outcome_debug_names() {
        assert_eq!(format!("{:?}", InsertOutcome::Created), "Created");
        assert_eq!(format!("{:?}", InsertOutcome::Conflict), "Conflict");
    }

    #[test]
    fn account_holds_values() {
        let account = Account {
            id: Uuid::nil(),
            username: "alice".to_string(),
            password_hash: "$argon2id$hash".to_string(),
            password_salt: "salt".to_string(),
            recovery_key_hash: "$argon2id$recovery".to_string(),
            created_at: Utc::now(),
        };
        assert_eq!(account.id, Uuid::nil());
        assert_eq!(account.username, "alice");
    }
}
