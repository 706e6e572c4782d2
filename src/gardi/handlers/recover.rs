use axum::{extract::Extension, http::StatusCode, response::IntoResponse, Json};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;

use super::{error_response, ErrorBody};
use crate::auth::Auth;

#[derive(ToSchema, Deserialize)]
pub struct RecoverRequest {
    username: String,
    recovery_key: String,
    new_password: String,
}

impl std::fmt::Debug for RecoverRequest {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoverRequest")
            .field("username", &self.username)
            .field("recovery_key", &"***")
            .field("new_password", &"***")
            .finish()
    }
}

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct RecoverResponse {
    pub message: String,
}

#[utoipa::path(
    post,
    path= "/auth/recover",
    request_body = RecoverRequest,
    responses (
        (status = 200, description = "Password reset successfully", body = [RecoverResponse], content_type = "application/json"),
        (status = 400, description = "Missing payload", body = [ErrorBody]),
        (status = 401, description = "Invalid recovery key", body = [ErrorBody]),
        (status = 404, description = "User not found", body = [ErrorBody]),
        (status = 503, description = "Credential store unavailable", body = [ErrorBody]),
    ),
    tag= "auth"
)]
#[instrument(skip(auth))]
pub async fn recover(
    Extension(auth): Extension<Arc<Auth>>,
    payload: Option<Json<RecoverRequest>>,
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

    match auth
        .recover(
            &request.username,
            &request.recovery_key,
            &request.new_password,
        )
        .await
    {
        Ok(()) => (
            StatusCode::OK,
            Json(RecoverResponse {
                message: "Password reset successfully".to_string(),
            }),
        )
            .into_response(),

        Err(err) => error_response(&err).into_response(),
    }
}
