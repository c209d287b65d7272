use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sonar_core::PayloadError;

use super::models::StatusResponse;

#[derive(Debug)]
pub enum ApiError {
    /// The request carried no body at all.
    NoData,
    /// The body was not a usable push payload.
    Malformed(String),
}

impl From<PayloadError> for ApiError {
    fn from(err: PayloadError) -> Self {
        match err {
            PayloadError::Empty => ApiError::NoData,
            PayloadError::Malformed(e) => ApiError::Malformed(e.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NoData => (
                StatusCode::BAD_REQUEST,
                StatusResponse {
                    success: false,
                    message: "No data received".to_string(),
                    error: None,
                },
            ),
            ApiError::Malformed(detail) => (
                StatusCode::BAD_REQUEST,
                StatusResponse {
                    success: false,
                    message: "Invalid JSON".to_string(),
                    error: Some(detail),
                },
            ),
        };

        (status, Json(body)).into_response()
    }
}
