use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{error_response, ErrorBody};
use crate::auth::Auth;

#[derive(ToSchema, Deserialize)]
pub struct RegisterRequest {
    username: String,
    password: String,
}

impl std::fmt::Debug for RegisterRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// The recovery key is returned exactly once, here.
#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RegisterResponse {
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
    pub recovery_key: String,
}

#[utoipa::path(
    post,
    path= "/auth/register",
    request_body = RegisterRequest,
    responses (
        (status = 201, description = "Account created", body = [RegisterResponse], content_type = "application/json"),
        (status = 400, description = "Missing or empty username/password", body = [ErrorBody]),
        (status = 409, description = "Username already exists", body = [ErrorBody]),
        (status = 503, description = "Credential store unavailable", body = [ErrorBody]),
    ),
    tag= "auth"
)]
#[instrument(skip(auth))]
pub async fn register(
    Extension(auth): Extension<Arc<Auth>>,
    payload: Option<Json<RegisterRequest>>,
) -> impl IntoResponse {
    let request = match payload {
        Some(Json(payload)) => payload,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(ErrorBody {
                    error: "Missing payload".to_string(),
                }),
            )
                .into_response()
        }
    };

    match auth.register(&request.username, &request.password).await {
        Ok(registration) => (
            StatusCode::CREATED,
            Json(RegisterResponse {
                token: registration.session.token,
                user_id: registration.session.account_id,
                username: registration.session.username,
                recovery_key: registration.recovery_key,
            }),
        )
            .into_response(),

        Err(err) => error_response(&err).into_response(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{register, RegisterRequest, RegisterResponse};
    use crate::auth::{store::MemoryCredentialStore, token::TokenService, Auth};
    use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
    use secrecy::SecretString;
    use std::sync::Arc;

    fn test_auth() -> Extension<Arc<Auth>> {
        Extension(Arc::new(Auth::new(
            Arc::new(MemoryCredentialStore::new()),
            TokenService::new(SecretString::from("test-secret".to_string())),
        )))
    }

    fn request(username: &str, password: &str) -> Option<Json<RegisterRequest>> {
        Some(Json(RegisterRequest {
            username: username.to_string(),
            password: password.to_string(),
        }))
    }

    #[tokio::test]
    async fn register_created_with_recovery_key() {
        let auth = test_auth();

        let response = register(auth, request("alice", "hunter2"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: RegisterResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.username, "alice");
        assert!(!body.token.is_empty());
        assert_eq!(body.recovery_key.len(), 35);
    }

    #[tokio::test]
    async fn register_missing_payload_is_bad_request() {
        let auth = test_auth();

        let response = register(auth, None).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn register_duplicate_username_conflicts() {
        let auth = test_auth();

        let response = register(auth.clone(), request("alice", "hunter2"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::CREATED);

        let response = register(auth, request("alice", "other"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn register_request_debug_redacts_password() {
        let request = RegisterRequest {
            username: "alice".to_string(),
            password: "hunter2".to_string(),
        };
        let debug = format!("{request:?}");
        assert!(debug.contains("alice"));
        assert!(!debug.contains("hunter2"));
    }
}
