use axum::{
    Extension, Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use streams_types::api::{
    PermissionChangeRequest, SetEmailRequest, SetHandleRequest, SetNameRequest, UserQuery,
    UserResponse, UsersResponse,
};

use crate::AppState;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::middleware::SessionToken;

pub async fn all(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> ApiResult<Json<UsersResponse>> {
    let users = streams.users_all(&token)?;
    Ok(Json(UsersResponse { users }))
}

pub async fn profile(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Query(q), _): ApiQuery<UserQuery>,
) -> ApiResult<Json<UserResponse>> {
    let user = streams.user_profile(&token, q.u_id)?;
    Ok(Json(UserResponse { user }))
}

pub async fn setname(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<SetNameRequest>,
) -> ApiResult<Json<Value>> {
    streams.user_setname(&token, &req.name_first, &req.name_last)?;
    Ok(Json(json!({})))
}

pub async fn setemail(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<SetEmailRequest>,
) -> ApiResult<Json<Value>> {
    streams.user_setemail(&token, &req.email)?;
    Ok(Json(json!({})))
}

pub async fn sethandle(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<SetHandleRequest>,
) -> ApiResult<Json<Value>> {
    streams.user_sethandle(&token, &req.handle_str)?;
    Ok(Json(json!({})))
}

// -- Admin --

pub async fn remove(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Query(q), _): ApiQuery<UserQuery>,
) -> ApiResult<Json<Value>> {
    streams.admin_user_remove(&token, q.u_id)?;
    Ok(Json(json!({})))
}

pub async fn permission_change(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<PermissionChangeRequest>,
) -> ApiResult<Json<Value>> {
    streams.admin_userpermission_change(&token, req.u_id, req.permission_id)?;
    Ok(Json(json!({})))
}
