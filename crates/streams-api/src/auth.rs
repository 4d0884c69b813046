use axum::{Extension, Json, extract::State};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use streams_types::api::{
    AuthResponse, LoginRequest, PasswordResetConfirm, PasswordResetRequest, RegisterRequest,
};

use crate::AppState;
use crate::error::ApiResult;
use crate::extract::ApiJson;
use crate::middleware::SessionToken;

// Argon2 work runs off the async runtime.

pub async fn register(
    State(streams): State<AppState>,
    WithRejection(Json(req), _): ApiJson<RegisterRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let auth = tokio::task::spawn_blocking(move || {
        streams.register(&req.email, &req.password, &req.name_first, &req.name_last)
    })
    .await??;
    Ok(Json(auth))
}

pub async fn login(
    State(streams): State<AppState>,
    WithRejection(Json(req), _): ApiJson<LoginRequest>,
) -> ApiResult<Json<AuthResponse>> {
    let auth = tokio::task::spawn_blocking(move || streams.login(&req.email, &req.password)).await??;
    Ok(Json(auth))
}

pub async fn logout(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> ApiResult<Json<Value>> {
    streams.logout(&token)?;
    Ok(Json(json!({})))
}

/// Always answers `{}`; the code only ever leaves through the reset sink.
pub async fn password_reset_request(
    State(streams): State<AppState>,
    WithRejection(Json(req), _): ApiJson<PasswordResetRequest>,
) -> ApiResult<Json<Value>> {
    streams.password_reset_request(&req.email)?;
    Ok(Json(json!({})))
}

pub async fn password_reset(
    State(streams): State<AppState>,
    WithRejection(Json(req), _): ApiJson<PasswordResetConfirm>,
) -> ApiResult<Json<Value>> {
    tokio::task::spawn_blocking(move || streams.password_reset(&req.reset_code, &req.new_password))
        .await??;
    Ok(Json(json!({})))
}

pub async fn clear(State(streams): State<AppState>) -> ApiResult<Json<Value>> {
    streams.clear()?;
    Ok(Json(json!({})))
}
