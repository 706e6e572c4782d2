pub mod health;
pub use self::health::health;

pub mod register;
pub use self::register::register;

pub mod login;
pub use self::login::login;

pub mod recover;
pub use self::recover::recover;

pub mod verify;
pub use self::verify::verify;

// common wire types and error mapping for the handlers
use crate::auth::Error;
use axum::{http::StatusCode, Json};
use serde::{Deserialize, Serialize};
use tracing::{debug, error};
use utoipa::ToSchema;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct ErrorBody {
    pub error: String,
}

/// Map a flow error to its HTTP status and client-facing body.
///
/// `Display` strings of the flow errors are already client-safe; internal
/// failures collapse to a generic message and get logged here instead.
pub(crate) fn error_response(err: &Error) -> (StatusCode, Json<ErrorBody>) {
    let status = match err {
        Error::UsernameTaken => StatusCode::CONFLICT,
        Error::InvalidCredentials
        | Error::InvalidRecoveryKey
        | Error::ExpiredToken
        | Error::InvalidToken => StatusCode::UNAUTHORIZED,
        Error::AccountNotFound => StatusCode::NOT_FOUND,
        Error::InvalidInput(_) => StatusCode::BAD_REQUEST,
        Error::StoreUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        Error::Hashing(_) | Error::RecoveryKey | Error::TokenIssue(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };

    let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("request failed: {err}");

        "Internal server error".to_string()
    } else {
        if status == StatusCode::SERVICE_UNAVAILABLE {
            error!("request failed: {err}");
        } else {
            debug!("request rejected: {err}");
        }

        err.to_string()
    };

    (status, Json(ErrorBody { error: message }))
}

#[cfg(test)]
mod tests {
    use super::error_response;
    use crate::auth::{hasher, store::StoreError, Error};
    use axum::http::StatusCode;

    #[test]
    fn statuses_follow_the_error_taxonomy() {
        let cases = [
            (Error::UsernameTaken, StatusCode::CONFLICT),
            (Error::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (Error::AccountNotFound, StatusCode::NOT_FOUND),
            (Error::InvalidRecoveryKey, StatusCode::UNAUTHORIZED),
            (Error::ExpiredToken, StatusCode::UNAUTHORIZED),
            (Error::InvalidToken, StatusCode::UNAUTHORIZED),
            (
                Error::InvalidInput("Username and password are required"),
                StatusCode::BAD_REQUEST,
            ),
            (
                Error::StoreUnavailable(StoreError::Unavailable(sqlx::Error::PoolClosed)),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (Error::RecoveryKey, StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (err, expected) in cases {
            let (status, _) = error_response(&err);
            assert_eq!(status, expected, "wrong status for {err:?}");
        }
    }

    #[test]
    fn internal_errors_hide_their_cause() {
        let (_, body) = error_response(&Error::RecoveryKey);
        assert_eq!(body.error, "Internal server error");

        let malformed = hasher::Error::MalformedHash;
        let (_, body) = error_response(&Error::Hashing(malformed));
        assert_eq!(body.error, "Internal server error");
    }

    #[test]
    fn client_errors_keep_their_message() {
        let (_, body) = error_response(&Error::InvalidCredentials);
        assert_eq!(body.error, "Invalid username or password");
    }
}
