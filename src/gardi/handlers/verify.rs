use axum::{
    extract::Extension,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::IntoResponse,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::instrument;
use utoipa::ToSchema;
use uuid::Uuid;

use super::{error_response, ErrorBody};
use crate::auth::Auth;

#[derive(ToSchema, Serialize, Deserialize, Debug)]
pub struct VerifyResponse {
    pub user_id: Uuid,
    pub username: String,
}

#[utoipa::path(
    post,
    path= "/auth/verify",
    responses (
        (status = 200, description = "Token is valid", body = [VerifyResponse], content_type = "application/json"),
        (status = 401, description = "Token expired or invalid", body = [ErrorBody]),
    ),
    tag= "auth"
)]
#[instrument(skip_all)]
pub async fn verify(Extension(auth): Extension<Arc<Auth>>, headers: HeaderMap) -> impl IntoResponse {
    let header_value = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    match auth.validate_bearer(header_value, Utc::now().timestamp()) {
        Ok(claims) => (
            StatusCode::OK,
            Json(VerifyResponse {
                user_id: claims.sub,
                username: claims.username,
            }),
        )
            .into_response(),

        Err(err) => error_response(&err).into_response(),
    }
}
