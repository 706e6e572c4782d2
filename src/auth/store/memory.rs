//! In-memory credential store for tests and local development.

use std::collections::HashMap;
use tokio::sync::Mutex;
use uuid::Uuid;

use super::{Account, CredentialStore, InsertOutcome, StoreFuture};

/// Mutex-backed map keyed by username, so concurrent inserts with the same
/// username resolve exactly like a database unique constraint: first one
/// wins, the loser sees `Conflict`.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    accounts: Mutex<HashMap<String, Account>>,
}

impl MemoryCredentialStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn find_by_username<'a>(&'a self, username: &'a str) -> StoreFuture<'a, Option<Account>> {
        Box::pin(async move {
            let accounts = self.accounts.lock().await;
            Ok(accounts.get(username).cloned())
        })
    }

    fn insert<'a>(&'a self, account: &'a Account) -> StoreFuture<'a, InsertOutcome> {
        Box::pin(async move {
            let mut accounts = self.accounts.lock().await;
            if accounts.contains_key(&account.username) {
                return Ok(InsertOutcome::Conflict);
            }
            accounts.insert(account.username.clone(), account.clone());
            Ok(InsertOutcome::Created)
        })
    }

    fn update_credentials<'a>(
        &'a self,
        account_id: Uuid,
        password_hash: &'a str,
        password_salt: &'a str,
    ) -> StoreFuture<'a, ()> {
        Box::pin(async move {
            let mut accounts = self.accounts.lock().await;
            if let Some(account) = accounts
                .values_mut()
                .find(|account| account.id == account_id)
            {
                account.password_hash = password_hash.to_string();
                account.password_salt = password_salt.to_string();
            }
            Ok(())
        })
    }
}
