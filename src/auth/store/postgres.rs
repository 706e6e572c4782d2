//! Postgres-backed credential store.

use sqlx::{PgPool, Row};
use tracing::Instrument;
use uuid::Uuid;

use super::{Account, CredentialStore, InsertOutcome, StoreError, StoreFuture};

pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    match err {
        sqlx::Error::Database(db_err) => db_err.code().is_some_and(|code| code.as_ref() == "23505"),
        _ => false,
    }
}

#[derive(Clone)]
pub struct PgCredentialStore {
    pool: PgPool,
}

impl PgCredentialStore {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn lookup(&self, username: &str) -> Result<Option<Account>, StoreError> {
        let query = r"
            SELECT id, username, password_hash, password_salt, recovery_key_hash, created_at
            FROM accounts
            WHERE username = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "SELECT",
            db.statement = query
        );
        let row = sqlx::query(query)
            .bind(username)
            .fetch_optional(&self.pool)
            .instrument(span)
            .await?;

        Ok(row.map(|row| Account {
            id: row.get("id"),
            username: row.get("username"),
            password_hash: row.get("password_hash"),
            password_salt: row.get("password_salt"),
            recovery_key_hash: row.get("recovery_key_hash"),
            created_at: row.get("created_at"),
        }))
    }

    async fn create(&self, account: &Account) -> Result<InsertOutcome, StoreError> {
        let query = r"
            INSERT INTO accounts
                (id, username, password_hash, password_salt, recovery_key_hash, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "INSERT",
            db.statement = query
        );
        let result = sqlx::query(query)
            .bind(account.id)
            .bind(&account.username)
            .bind(&account.password_hash)
            .bind(&account.password_salt)
            .bind(&account.recovery_key_hash)
            .bind(account.created_at)
            .execute(&self.pool)
            .instrument(span)
            .await;

        match result {
            Ok(_) => Ok(InsertOutcome::Created),
            Err(err) if is_unique_violation(&err) => Ok(InsertOutcome::Conflict),
            Err(err) => Err(StoreError::Unavailable(err)),
        }
    }

    async fn replace_credentials(
        &self,
        account_id: Uuid,
        password_hash: &str,
        password_salt: &str,
    ) -> Result<(), StoreError> {
        // Only the password hash and salt change; the recovery key hash
        // stays valid across resets.
        let query = r"
            UPDATE accounts
            SET password_hash = $2,
                password_salt = $3
            WHERE id = $1
        ";
        let span = tracing::info_span!(
            "db.query",
            db.system = "postgresql",
            db.operation = "UPDATE",
            db.statement = query
        );
        sqlx::query(query)
            .bind(account_id)
            .bind(password_hash)
            .bind(password_salt)
            .execute(&self.pool)
            .instrument(span)
            .await?;

        Ok(())
    }
}

impl CredentialStore for PgCredentialStore {
    fn find_by_username<'a>(&'a self, username: &'a str) -> StoreFuture<'a, Option<Account>> {
        Box::pin(self.lookup(username))
    }

    fn insert<'a>(&'a self, account: &'a Account) -> StoreFuture<'a, InsertOutcome> {
        Box::pin(self.create(account))
    }

    fn update_credentials<'a>(
        &'a self,
        account_id: Uuid,
        password_hash: &'a str,
        password_salt: &'a str,
    ) -> StoreFuture<'a, ()> {
        Box::pin(self.replace_credentials(account_id, password_hash, password_salt))
    }
}

#[cfg(test)]
mod tests {
    use super::is_unique_violation;
    use sqlx::error::{DatabaseError, ErrorKind};
    use std::borrow::Cow;
    use std::error::Error as StdError;
    use std::fmt;

    #[derive(Debug)]
    struct TestDbError {
        code: Option<&'static str>,
    }

    impl fmt::Display for TestDbError {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "test database error")
        }
    }

    impl StdError for TestDbError {}

    impl DatabaseError for TestDbError {
        fn message(&self) -> &'static str {
            "test database error"
        }

        fn code(&self) -> Option<Cow<'_, str>> {
            self.code.map(Cow::Borrowed)
        }

        fn as_error(&self) -> &(dyn StdError + Send + Sync + 'static) {
            self
        }

        fn as_error_mut(&mut self) -> &mut (dyn StdError + Send + Sync + 'static) {
            self
        }

        fn into_error(self: Box<Self>) -> Box<dyn StdError + Send + Sync + 'static> {
            self
        }

        fn kind(&self) -> ErrorKind {
            ErrorKind::UniqueViolation
        }
    }

    #[test]
    fn is_unique_violation_matches_sqlstate() {
        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("23505"),
        }));
        assert!(is_unique_violation(&err));

        let err = sqlx::Error::Database(Box::new(TestDbError {
            code: Some("99999"),
        }));
        assert!(!is_unique_violation(&err));

        let err = sqlx::Error::RowNotFound;
        assert!(!is_unique_violation(&err));
    }
}
