use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{error_response, ErrorBody};
use crate::auth::Auth;

#[derive(ToSchema, Deserialize)]
pub struct LoginRequest {
    username: String,
    password: String,
}

impl std::fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRequest")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct LoginResponse {
    pub token: String,
    pub user_id: Uuid,
    pub username: String,
}

#[utoipa::path(
    post,
    path= "/auth/login",
    request_body = LoginRequest,
    responses (
        (status = 200, description = "Login successful", body = [LoginResponse], content_type = "application/json"),
        (status = 400, description = "Missing payload", body = [ErrorBody]),
        (status = 401, description = "Invalid username or password", body = [ErrorBody]),
        (status = 503, description = "Credential store unavailable", body = [ErrorBody]),
    ),
    tag= "auth"
)]
#[instrument(skip(auth))]
pub async fn login(
    Extension(auth): Extension<Arc<Auth>>,
    payload: Option<Json<LoginRequest>>,
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

    match auth.login(&request.username, &request.password).await {
        Ok(session) => (
            StatusCode::OK,
            Json(LoginResponse {
                token: session.token,
                user_id: session.account_id,
                username: session.username,
            }),
        )
            .into_response(),

        Err(err) => error_response(&err).into_response(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::{login, LoginRequest, LoginResponse};
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

    fn request(username: &str, password: &str) -> Option<Json<LoginRequest>> {
        Some(Json(LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }))
    }

    #[tokio::test]
    async fn login_round_trip() {
        let auth = test_auth();
        auth.0.register("alice", "hunter2").await.unwrap();

        let response = login(auth, request("alice", "hunter2"))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: LoginResponse = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body.username, "alice");
        assert!(!body.token.is_empty());
    }

    #[tokio::test]
    async fn login_failures_share_status_and_message() {
        let auth = test_auth();
        auth.0.register("alice", "hunter2").await.unwrap();

        let wrong_password = login(auth.clone(), request("alice", "wrong"))
            .await
            .into_response();
        let unknown_user = login(auth, request("bob", "hunter2")).await.into_response();

        assert_eq!(wrong_password.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(unknown_user.status(), StatusCode::UNAUTHORIZED);

        let first = axum::body::to_bytes(wrong_password.into_body(), usize::MAX)
            .await
            .unwrap();
        let second = axum::body::to_bytes(unknown_user.into_body(), usize::MAX)
            .await
            .unwrap();

        // An attacker probing for usernames must see identical bodies
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn login_missing_payload_is_bad_request() {
        let auth = test_auth();

        let response = login(auth, None).await.into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }
}
