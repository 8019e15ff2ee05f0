//! Detector capability
//!
//! The measurement itself happens outside this codebase. Anything that can turn
//! an image on disk into a [`DetectionPayload`] can stand in for it, which is how
//! tests replace the external process.

use std::path::Path;

use async_trait::async_trait;
use zoi_types::{DetectionPayload, DetectorError};

#[async_trait]
pub trait Detector: Send + Sync {
    /// Run detection on the image at `image_path`
    async fn detect(&self, image_path: &Path) -> Result<DetectionPayload, DetectorError>;
}
