use axum::{
    Extension, Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use streams_types::api::{CreateDmRequest, CreateDmResponse, DmMessagesQuery, DmRequest, DmsResponse};
use streams_types::models::{DmDetails, MessagePage};

use crate::AppState;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::middleware::SessionToken;

pub async fn create(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<CreateDmRequest>,
) -> ApiResult<Json<CreateDmResponse>> {
    let dm_id = streams.dm_create(&token, &req.u_ids)?;
    Ok(Json(CreateDmResponse { dm_id }))
}

pub async fn list(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> ApiResult<Json<DmsResponse>> {
    let dms = streams.dm_list(&token)?;
    Ok(Json(DmsResponse { dms }))
}

pub async fn remove(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Query(q), _): ApiQuery<DmRequest>,
) -> ApiResult<Json<Value>> {
    streams.dm_remove(&token, q.dm_id)?;
    Ok(Json(json!({})))
}

pub async fn details(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Query(q), _): ApiQuery<DmRequest>,
) -> ApiResult<Json<DmDetails>> {
    Ok(Json(streams.dm_details(&token, q.dm_id)?))
}

pub async fn leave(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<DmRequest>,
) -> ApiResult<Json<Value>> {
    streams.dm_leave(&token, req.dm_id)?;
    Ok(Json(json!({})))
}

pub async fn messages(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Query(q), _): ApiQuery<DmMessagesQuery>,
) -> ApiResult<Json<MessagePage>> {
    Ok(Json(streams.dm_messages(&token, q.dm_id, q.start)?))
}
