use axum::{
    Extension, Json,
    extract::{Query, State},
};
use axum_extra::extract::WithRejection;

use streams_types::api::{MessagesResponse, NotificationsResponse, SearchQuery};

use crate::AppState;
use crate::error::ApiResult;
use crate::extract::ApiQuery;
use crate::middleware::SessionToken;

pub async fn search(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
    WithRejection(Query(q), _): ApiQuery<SearchQuery>,
) -> ApiResult<Json<MessagesResponse>> {
    let messages = streams.search(&token, &q.query_str)?;
    Ok(Json(MessagesResponse { messages }))
}

pub async fn notifications(
    State(streams): State<AppState>,
    Extension(SessionToken(token)): Extension<SessionToken>,
) -> ApiResult<Json<NotificationsResponse>> {
    let notifications = streams.notifications_get(&token)?;
    Ok(Json(NotificationsResponse { notifications }))
}
