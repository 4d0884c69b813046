use axum::{
    extract::Request,
    middleware::Next,
    response::Response,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};

use streams_core::Error;

use crate::error::ApiError;

/// Raw bearer token of the current request. Resolving it to a user is left
/// to the core operation so a bad token fails with the same error everywhere.
#[derive(Debug, Clone)]
pub struct SessionToken(pub String);

/// Pull the bearer token out of `Authorization` and stash it for handlers.
pub async fn require_auth(
    bearer: Option<TypedHeader<Authorization<Bearer>>>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let TypedHeader(auth) = bearer.ok_or_else(|| ApiError(Error::access("Missing bearer token")))?;

    req.extensions_mut().insert(SessionToken(auth.token().to_string()));
    Ok(next.run(req).await)
}
