use axum::{Json, extract::Query};
use axum_extra::extract::WithRejection;

use crate::error::ApiError;

/// `Json` whose rejections answer with the InputError body.
pub type ApiJson<T> = WithRejection<Json<T>, ApiError>;

/// `Query` whose rejections answer with the InputError body.
pub type ApiQuery<T> = WithRejection<Query<T>, ApiError>;
