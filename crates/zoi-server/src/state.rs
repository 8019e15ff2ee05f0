use std::sync::Arc;

use zoi_app::services::{open_gateway, open_gateway_with};
use zoi_app::{Config, UploadGateway};
use zoi_domain::Detector;

pub struct State {
    pub config: Config,
    pub gateway: UploadGateway,
}

impl State {
    pub fn new(config: Config) -> Arc<Self> {
        let gateway = open_gateway(&config);
        Arc::new(Self { config, gateway })
    }

    /// State whose gateway dispatches to `detector` instead of the Python script
    pub fn with_detector(config: Config, detector: Arc<dyn Detector>) -> Arc<Self> {
        let gateway = open_gateway_with(&config, detector);
        Arc::new(Self { config, gateway })
    }
}
