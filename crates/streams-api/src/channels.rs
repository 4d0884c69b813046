use axum::{
    Extension, Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;
use serde_json::{Value, json};

use streams_types::api::{
    ChannelMemberRequest, ChannelMessagesQuery, ChannelRequest, ChannelsResponse,
    CreateChannelRequest, CreateChannelResponse,
};
use streams_types::models::{ChannelDetails, MessagePage};

use crate::AppState;
use crate::error::ApiResult;
use crate::extract::{ApiJson, ApiQuery};
use crate::middleware::SessionToken;

pub async fn create(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<CreateChannelRequest>,
) -> ApiResult<Json<CreateChannelResponse>> {
    let channel_id = streams.channels_create(&token, &req.name, req.is_public)?;
    Ok(Json(CreateChannelResponse { channel_id }))
}

pub async fn list(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> ApiResult<Json<ChannelsResponse>> {
    let channels = streams.channels_list(&token)?;
    Ok(Json(ChannelsResponse { channels }))
}

pub async fn listall(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> ApiResult<Json<ChannelsResponse>> {
    let channels = streams.channels_listall(&token)?;
    Ok(Json(ChannelsResponse { channels }))
}

pub async fn details(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Query(q), _): ApiQuery<ChannelRequest>,
) -> ApiResult<Json<ChannelDetails>> {
    Ok(Json(streams.channel_details(&token, q.channel_id)?))
}

pub async fn join(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<ChannelRequest>,
) -> ApiResult<Json<Value>> {
    streams.channel_join(&token, req.channel_id)?;
    Ok(Json(json!({})))
}

pub async fn invite(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<ChannelMemberRequest>,
) -> ApiResult<Json<Value>> {
    streams.channel_invite(&token, req.channel_id, req.u_id)?;
    Ok(Json(json!({})))
}

pub async fn messages(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Query(q), _): ApiQuery<ChannelMessagesQuery>,
) -> ApiResult<Json<MessagePage>> {
    Ok(Json(streams.channel_messages(&token, q.channel_id, q.start)?))
}

pub async fn leave(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<ChannelRequest>,
) -> ApiResult<Json<Value>> {
    streams.channel_leave(&token, req.channel_id)?;
    Ok(Json(json!({})))
}

pub async fn addowner(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<ChannelMemberRequest>,
) -> ApiResult<Json<Value>> {
    streams.channel_addowner(&token, req.channel_id, req.u_id)?;
    Ok(Json(json!({})))
}

pub async fn removeowner(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Json(req), _): ApiJson<ChannelMemberRequest>,
) -> ApiResult<Json<Value>> {
    streams.channel_removeowner(&token, req.channel_id, req.u_id)?;
    Ok(Json(json!({})))
}
