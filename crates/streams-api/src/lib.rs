pub mod auth;
pub mod channels;
pub mod dms;
pub mod error;
pub mod extract;
pub mod messages;
pub mod middleware;
pub mod search;
pub mod standup;
pub mod users;

use std::sync::Arc;

use axum::{
    Router, middleware as axum_middleware,
    routing::{delete, get, post, put},
};

use streams_core::Streams;

use crate::middleware::require_auth;

pub type AppState = Arc<Streams>;

/// Every route the platform serves. Routes outside the public set require an
/// `Authorization: Bearer` header.
pub fn router(streams: AppState) -> Router {
    let public_routes = Router::new()
        .route("/auth/register/v2", post(auth::register))
        .route("/auth/login/v2", post(auth::login))
        .route("/auth/passwordreset/request/v1", post(auth::password_reset_request))
        .route("/auth/passwordreset/reset/v1", post(auth::password_reset))
        .route("/clear/v1", delete(auth::clear))
        .with_state(streams.clone());

    let protected_routes = Router::new()
        .route("/auth/logout/v1", post(auth::logout))
        // Channels
        .route("/channels/create/v2", post(channels::create))
        .route("/channels/list/v2", get(channels::list))
        .route("/channels/listall/v2", get(channels::listall))
        .route("/channel/details/v2", get(channels::details))
        .route("/channel/join/v2", post(channels::join))
        .route("/channel/invite/v2", post(channels::invite))
        .route("/channel/messages/v2", get(channels::messages))
        .route("/channel/leave/v1", post(channels::leave))
        .route("/channel/addowner/v1", post(channels::addowner))
        .route("/channel/removeowner/v1", post(channels::removeowner))
        // DMs
        .route("/dm/create/v1", post(dms::create))
        .route("/dm/list/v1", get(dms::list))
        .route("/dm/remove/v1", delete(dms::remove))
        .route("/dm/details/v1", get(dms::details))
        .route("/dm/leave/v1", post(dms::leave))
        .route("/dm/messages/v1", get(dms::messages))
        // Messages
        .route("/message/send/v1", post(messages::send))
        .route("/message/edit/v1", put(messages::edit))
        .route("/message/remove/v1", delete(messages::remove))
        .route("/message/senddm/v1", post(messages::senddm))
        .route("/message/share/v1", post(messages::share))
        .route("/message/react/v1", post(messages::react))
        .route("/message/unreact/v1", post(messages::unreact))
        .route("/message/pin/v1", post(messages::pin))
        .route("/message/unpin/v1", post(messages::unpin))
        .route("/message/sendlater/v1", post(messages::sendlater))
        .route("/message/sendlaterdm/v1", post(messages::sendlaterdm))
        // Users / admin
        .route("/users/all/v1", get(users::all))
        .route("/user/profile/v1", get(users::profile))
        .route("/user/profile/setname/v1", put(users::setname))
        .route("/user/profile/setemail/v1", put(users::setemail))
        .route("/user/profile/sethandle/v1", put(users::sethandle))
        .route("/admin/user/remove/v1", delete(users::remove))
        .route("/admin/userpermission/change/v1", post(users::permission_change))
        // Search, notifications, standups
        .route("/search/v1", get(search::search))
        .route("/notifications/get/v1", get(search::notifications))
        .route("/standup/start/v1", post(standup::start))
        .route("/standup/active/v1", get(standup::active))
        .route("/standup/send/v1", post(standup::send))
        .layer(axum_middleware::from_fn(require_auth))
        .with_state(streams);

    Router::new().merge(public_routes).merge(protected_routes)
}
