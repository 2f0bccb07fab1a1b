//! Error responses and envelope helpers

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use mvista_common::api::ApiResponse;
use thiserror::Error;
use tracing::error;

/// Handler error, rendered as a failure envelope
#[derive(Debug, Error)]
pub enum ApiError {
    /// Malformed request parameter (400)
    #[error("{0}")]
    BadRequest(String),

    /// Unknown resource or route (404)
    #[error("{0}")]
    NotFound(String),

    /// Service failure (500)
    #[error("{source}")]
    Internal {
        context: &'static str,
        #[source]
        source: mvista_common::Error,
    },
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if let ApiError::Internal { context, source } = &self {
            error!("Error in {}: {}", context, source);
        }
        let body = ApiResponse::<()>::failure(self.to_string());
        (self.status(), Json(body)).into_response()
    }
}

/// Attach handler context to a service result
pub trait ServiceResultExt<T> {
    fn or_internal(self, context: &'static str) -> Result<T, ApiError>;
}

impl<T> ServiceResultExt<T> for mvista_common::Result<T> {
    fn or_internal(self, context: &'static str) -> Result<T, ApiError> {
        self.map_err(|e| match e {
            mvista_common::Error::InvalidInput(msg) => ApiError::BadRequest(msg),
            source => ApiError::Internal { context, source },
        })
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

/// Wrap `data` in a success envelope
pub fn ok<T>(data: T) -> ApiResult<T> {
    Ok(Json(ApiResponse::success(data)))
}
