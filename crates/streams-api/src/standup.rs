use axum::{
    Extension, Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use streams_types::api::{ChannelRequest, StandupSendRequest, StandupStartRequest, StandupStartResponse};
use streams_types::models::StandupStatus;

use crate::AppState;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::middleware::SessionToken;

pub async fn start(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<StandupStartRequest>,
) -> ApiResult<Json<StandupStartResponse>> {
    let time_finish = streams.standup_start(&token, req.channel_id, req.length)?;
    Ok(Json(StandupStartResponse { time_finish }))
}

pub async fn active(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Query(q), _): ApiQuery<ChannelRequest>,
) -> ApiResult<Json<StandupStatus>> {
    Ok(Json(streams.standup_active(&token, q.channel_id)?))
}

pub async fn send(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<StandupSendRequest>,
) -> ApiResult<Json<Value>> {
    streams.standup_send(&token, req.channel_id, &req.message)?;
    Ok(Json(json!({})))
}
