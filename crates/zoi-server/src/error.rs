use axum::{
    extract::multipart::MultipartError,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;
use zoi_types::{ErrorKind, GatewayError};

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Malformed payload: {0}")]
    MalformedPayload(#[from] MultipartError),

    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match self {
            AppError::MalformedPayload(e) => (e.status(), e.body_text()).into_response(),
            AppError::Gateway(e) => gateway_response(&e),
        }
    }
}

/// JSON for the machine-coded and not-found cases, plain text otherwise
fn gateway_response(err: &GatewayError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let message = err.public_message();

    match (err.code(), err.kind()) {
        (Some(code), _) => (status, Json(json!({ "error": message, "code": code }))).into_response(),
        (None, ErrorKind::NotFound) => (status, Json(json!({ "message": message }))).into_response(),
        _ => (status, message).into_response(),
    }
}
