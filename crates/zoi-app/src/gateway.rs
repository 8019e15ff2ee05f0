//! Upload Gateway - core use case behind both upload endpoints
//!
//! Every request goes through the same steps:
//! 1. Require a file
//! 2. Check the extension against the allow-list
//! 3. Dispatch:
//!    - detector mode: persist, run the detector, delete, relay the payload
//!    - lookup mode: strip the extension and look the name up in the dataset
//!
//! Nothing touches the filesystem or the dataset before step 2 passes.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, warn};
use zoi_domain::service::{lookup, LookupOptions};
use zoi_domain::Detector;
use zoi_infra::{read_dataset, DatasetLoaderError, UploadStore};
use zoi_types::{DiameterReading, GatewayError};

/// Extensions accepted for upload (compared case-insensitively)
pub const ALLOWED_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg"];

/// An image received from a client
#[derive(Debug, Clone)]
pub struct UploadedImage {
    /// Filename as declared by the client
    pub name: String,
    pub bytes: Vec<u8>,
}

impl UploadedImage {
    pub fn new(name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }
}

/// Which delegate handles a validated upload
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchMode {
    Detector,
    Lookup,
}

/// Detector mode success body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetectionResponse {
    pub message: String,
    pub filename: String,
    pub zoi: serde_json::Value,
    #[serde(rename = "imageUrl")]
    pub image_url: Option<String>,
}

/// Lookup mode success body
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LookupResponse {
    pub message: String,
    pub filename: String,
    pub zoi: Vec<DiameterReading>,
    /// Column name of each entry in `zoi`
    #[serde(skip)]
    pub slots: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum UploadResponse {
    Detection(DetectionResponse),
    Lookup(LookupResponse),
}

/// Validates uploads and hands them to the detector or the lookup service
pub struct UploadGateway {
    store: UploadStore,
    detector: Arc<dyn Detector>,
    dataset_path: PathBuf,
    result_base_url: String,
    lookup_options: LookupOptions,
}

impl UploadGateway {
    pub fn new(
        store: UploadStore,
        detector: Arc<dyn Detector>,
        dataset_path: PathBuf,
        result_base_url: String,
        lookup_options: LookupOptions,
    ) -> Self {
        Self {
            store,
            detector,
            dataset_path,
            result_base_url,
            lookup_options,
        }
    }

    pub fn store(&self) -> &UploadStore {
        &self.store
    }

    pub fn dataset_path(&self) -> &Path {
        &self.dataset_path
    }

    /// Validate `file` and dispatch it according to `mode`
    pub async fn handle_upload(
        &self,
        file: Option<UploadedImage>,
        mode: DispatchMode,
    ) -> Result<UploadResponse, GatewayError> {
        let file = file.ok_or(GatewayError::NoFileUploaded)?;
        validate_extension(&file.name)?;

        match mode {
            DispatchMode::Detector => self.detect(file).await.map(UploadResponse::Detection),
            DispatchMode::Lookup => self.check(file).await.map(UploadResponse::Lookup),
        }
    }

    async fn detect(&self, file: UploadedImage) -> Result<DetectionResponse, GatewayError> {
        let upload = self
            .store
            .persist(&file.name, &file.bytes)
            .await
            .map_err(GatewayError::StorageWriteFailed)?;
        debug!("Stored {} at {}", file.name, upload.path().display());

        let outcome = self.detector.detect(upload.path()).await;

        // Remove the upload whatever the detector returned
        let path = upload.path().to_path_buf();
        if let Err(e) = upload.discard().await {
            warn!("Failed to remove upload {}: {}", path.display(), e);
        }

        let payload = outcome?;
        let image_url = payload
            .detection_image
            .as_deref()
            .and_then(|image| public_image_url(&self.result_base_url, image));

        Ok(DetectionResponse {
            message: "File uploaded and processed!".to_string(),
            filename: file.name,
            zoi: payload.zoi,
            image_url,
        })
    }

    async fn check(&self, file: UploadedImage) -> Result<LookupResponse, GatewayError> {
        let dataset = read_dataset(&self.dataset_path)
            .await
            .map_err(|e| match e {
                DatasetLoaderError::IoError(e) => GatewayError::DatasetUnreadable(e),
                DatasetLoaderError::Invalid(e) => GatewayError::Lookup(e),
            })?;

        let result = lookup(&dataset, base_name(&file.name), &self.lookup_options)?;

        Ok(LookupResponse {
            message: "ZoI data fetched.".to_string(),
            filename: file.name,
            zoi: result.readings(),
            slots: result.records.into_iter().map(|r| r.slot).collect(),
        })
    }
}

/// Reject names whose extension is not in [`ALLOWED_EXTENSIONS`]
pub fn validate_extension(name: &str) -> Result<(), GatewayError> {
    let allowed = Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ALLOWED_EXTENSIONS.contains(&ext.to_lowercase().as_str()))
        .unwrap_or(false);

    if allowed {
        Ok(())
    } else {
        Err(GatewayError::InvalidFileType(name.to_string()))
    }
}

/// Final path component of `name` without its extension
pub fn base_name(name: &str) -> &str {
    Path::new(name)
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or(name)
}

/// Public URL for a detector result image: `<base_url>/<file name>`
pub fn public_image_url(base_url: &str, detection_image: &str) -> Option<String> {
    let file_name = detection_image
        .rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty())?;

    Some(format!("{}/{}", base_url.trim_end_matches('/'), file_name))
}
