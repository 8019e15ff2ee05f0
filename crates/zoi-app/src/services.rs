//! Construction of the runtime services from [`Config`]

use std::sync::Arc;

use zoi_detect::PythonDetector;
use zoi_domain::Detector;
use zoi_infra::UploadStore;

use crate::config::Config;
use crate::gateway::UploadGateway;

/// Open the external Python detector
pub fn open_detector(config: &Config) -> Arc<dyn Detector> {
    Arc::new(PythonDetector::new(config.detector_config()))
}

/// Open the working-directory upload store
pub fn open_upload_store(config: &Config) -> UploadStore {
    UploadStore::new(config.storage_dir.clone(), config.naming)
}

/// Open a gateway backed by the real detector
pub fn open_gateway(config: &Config) -> UploadGateway {
    open_gateway_with(config, open_detector(config))
}

/// Open a gateway with a caller-supplied detector
pub fn open_gateway_with(config: &Config, detector: Arc<dyn Detector>) -> UploadGateway {
    UploadGateway::new(
        open_upload_store(config),
        detector,
        config.dataset_path.clone(),
        config.result_base_url.clone(),
        config.lookup_options(),
    )
}
