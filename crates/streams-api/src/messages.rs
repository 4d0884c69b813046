use axum::{
    Extension, Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use streams_types::api::{
    EditMessageRequest, MessageRequest, ReactRequest, SendDmRequest, SendLaterDmRequest,
    SendLaterRequest, SendMessageRequest, SendMessageResponse, ShareMessageRequest,
    ShareMessageResponse,
};

use crate::AppState;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::middleware::SessionToken;

pub async fn send(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<SendMessageRequest>,
) -> ApiResult<Json<SendMessageResponse>> {
    let message_id = streams.message_send(&token, req.channel_id, &req.message)?;
    Ok(Json(SendMessageResponse { message_id }))
}

pub async fn senddm(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<SendDmRequest>,
) -> ApiResult<Json<SendMessageResponse>> {
    let message_id = streams.message_senddm(&token, req.dm_id, &req.message)?;
    Ok(Json(SendMessageResponse { message_id }))
}

pub async fn edit(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<EditMessageRequest>,
) -> ApiResult<Json<Value>> {
    streams.message_edit(&token, req.message_id, &req.message)?;
    Ok(Json(json!({})))
}

pub async fn remove(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Query(q), _): ApiQuery<MessageRequest>,
) -> ApiResult<Json<Value>> {
    streams.message_remove(&token, q.message_id)?;
    Ok(Json(json!({})))
}

pub async fn share(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<ShareMessageRequest>,
) -> ApiResult<Json<ShareMessageResponse>> {
    let shared_message_id =
        streams.message_share(&token, req.og_message_id, &req.message, req.channel_id, req.dm_id)?;
    Ok(Json(ShareMessageResponse { shared_message_id }))
}

pub async fn react(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<ReactRequest>,
) -> ApiResult<Json<Value>> {
    streams.message_react(&token, req.message_id, req.react_id)?;
    Ok(Json(json!({})))
}

pub async fn unreact(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<ReactRequest>,
) -> ApiResult<Json<Value>> {
    streams.message_unreact(&token, req.message_id, req.react_id)?;
    Ok(Json(json!({})))
}

pub async fn pin(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<MessageRequest>,
) -> ApiResult<Json<Value>> {
    streams.message_pin(&token, req.message_id)?;
    Ok(Json(json!({})))
}

pub async fn unpin(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<MessageRequest>,
) -> ApiResult<Json<Value>> {
    streams.message_unpin(&token, req.message_id)?;
    Ok(Json(json!({})))
}

pub async fn sendlater(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<SendLaterRequest>,
) -> ApiResult<Json<SendMessageResponse>> {
    let message_id = streams.message_sendlater(&token, req.channel_id, &req.message, req.time_sent)?;
    Ok(Json(SendMessageResponse { message_id }))
}

pub async fn sendlaterdm(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<SendLaterDmRequest>,
) -> ApiResult<Json<SendMessageResponse>> {
    let message_id = streams.message_sendlaterdm(&token, req.dm_id, &req.message, req.time_sent)?;
    Ok(Json(SendMessageResponse { message_id }))
}
