use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Envelope for mutating endpoints: `{"success": true, ...payload}`.
/// Read endpoints return their payload as plain JSON.
#[derive(Serialize)]
pub struct ApiResponse<T> {
    /// Always `true`; failures go through `AppError`.
    pub success: bool,
    /// Fields merged into the top-level object.
    #[serde(flatten)]
    pub data: T,
}

impl<T> ApiResponse<T>
where
    T: Serialize,
{
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

/// Payload for responses that carry nothing beyond the success flag.
#[derive(Serialize)]
pub struct EmptyData {}

impl ApiResponse<EmptyData> {
    pub fn ok() -> Self {
        Self::success(EmptyData {})
    }
}

impl<T> IntoResponse for ApiResponse<T>
where
    T: Serialize,
{
    fn into_response(self) -> Response {
        (StatusCode::OK, Json(self)).into_response()
    }
}
