use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use wallboard_core::errors::Error as CoreError;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    BadRequest(String),
}

#[derive(Serialize)]
struct ErrorBody {
    code: u16,
    message: String,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, msg) = match &self {
            ApiError::Core(e) => match e {
                CoreError::InvalidConfigValue(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
                CoreError::CachePayload(_) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            },
            ApiError::BadRequest(reason) => (StatusCode::BAD_REQUEST, reason.clone()),
        };
        let body = Json(ErrorBody {
            code: status.as_u16(),
            message: msg,
        });
        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_core_errors_map_to_status() {
        let invalid = ApiError::from(CoreError::InvalidConfigValue("Invalid data_mode".into()));
        assert_eq!(invalid.into_response().status(), StatusCode::BAD_REQUEST);

        let payload = serde_json::from_str::<u32>("{").unwrap_err();
        let cache = ApiError::from(CoreError::CachePayload(payload));
        assert_eq!(cache.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
