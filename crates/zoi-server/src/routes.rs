use std::sync::Arc;

use axum::{
    extract::{multipart::MultipartRejection, Multipart, State as AxumState},
    Json,
};
use tracing::{error, info, warn};
use zoi_app::{DispatchMode, UploadResponse, UploadedImage};
use zoi_types::GatewayError;

use super::{error::AppError, state::State};

/// Multipart field carrying the plate image
pub const IMAGE_FIELD: &str = "image";

pub async fn zoi_upload_handler(
    AxumState(state): AxumState<Arc<State>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    dispatch(&state, multipart, DispatchMode::Detector).await
}

pub async fn check_zoi_handler(
    AxumState(state): AxumState<Arc<State>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadResponse>, AppError> {
    dispatch(&state, multipart, DispatchMode::Lookup).await
}

async fn dispatch(
    state: &State,
    multipart: Result<Multipart, MultipartRejection>,
    mode: DispatchMode,
) -> Result<Json<UploadResponse>, AppError> {
    let file = read_image_field(multipart).await?;
    let filename = file.as_ref().map(|f| f.name.clone());

    match state.gateway.handle_upload(file, mode).await {
        Ok(response) => {
            info!("{:?} upload of {} handled", mode, filename.as_deref().unwrap_or("-"));
            Ok(Json(response))
        }
        Err(e) => {
            log_failure(filename.as_deref(), &e);
            Err(e.into())
        }
    }
}

/// Pull the `image` file out of the form. A body that is not multipart at all
/// counts as "no file".
async fn read_image_field(
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Option<UploadedImage>, AppError> {
    let Ok(mut multipart) = multipart else {
        return Ok(None);
    };

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }
        let Some(name) = field.file_name().map(str::to_string) else {
            continue;
        };
        let bytes = field.bytes().await?;
        return Ok(Some(UploadedImage::new(name, bytes.to_vec())));
    }

    Ok(None)
}

fn log_failure(filename: Option<&str>, err: &GatewayError) {
    let filename = filename.unwrap_or("-");
    if err.status_code() < 500 {
        warn!(filename, kind = ?err.kind(), "Upload rejected: {}", err);
    } else {
        error!(filename, kind = ?err.kind(), "Upload failed: {}", err);
    }
}
