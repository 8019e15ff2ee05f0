//! External Python detector
//!
//! Runs `<interpreter> <script> <image>` and parses stdout. The child is killed
//! if it outlives the configured timeout.

use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::time::timeout;
use tracing::{debug, info};
use zoi_domain::Detector;
use zoi_types::{DetectionPayload, DetectorError};

use crate::interpreter::{resolve_interpreter, DEFAULT_CANDIDATES};
use crate::output::parse_detector_output;

/// Detector process configuration
#[derive(Debug, Clone)]
pub struct DetectorConfig {
    /// Detection script handed to the interpreter
    pub script: PathBuf,

    /// Explicit interpreter command, tried before the candidates
    pub python_path: Option<String>,

    /// Interpreter commands probed in order
    pub candidates: Vec<String>,

    /// Upper bound on one detector run
    pub timeout: Duration,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            script: PathBuf::from("py").join("zoi_detect.py"),
            python_path: None,
            candidates: DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect(),
            timeout: Duration::from_secs(120),
        }
    }
}

/// [`Detector`] backed by the external Python script
pub struct PythonDetector {
    config: DetectorConfig,
}

impl PythonDetector {
    pub fn new(config: DetectorConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Detector for PythonDetector {
    async fn detect(&self, image_path: &Path) -> Result<DetectionPayload, DetectorError> {
        let interpreter =
            resolve_interpreter(self.config.python_path.as_deref(), &self.config.candidates)
                .await
                .ok_or(DetectorError::Unavailable)?;

        let mut cmd = interpreter.command();
        cmd.arg(&self.config.script)
            .arg(image_path)
            .stdin(Stdio::null())
            .kill_on_drop(true);

        info!(
            "Executing: {} {} {}",
            interpreter.display(),
            self.config.script.display(),
            image_path.display()
        );

        let output = match timeout(self.config.timeout, cmd.output()).await {
            Ok(Ok(output)) => output,
            Ok(Err(e)) => {
                return Err(DetectorError::ExecutionFailed(format!(
                    "failed to start {}: {}",
                    interpreter.program, e
                )))
            }
            Err(_) => return Err(DetectorError::Timeout(self.config.timeout)),
        };

        let stderr = String::from_utf8_lossy(&output.stderr);
        if !stderr.trim().is_empty() {
            debug!("Detector stderr: {}", stderr.trim());
        }

        if !output.status.success() {
            return Err(DetectorError::ExecutionFailed(format!(
                "{}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        debug!("Detector stdout: {}", stdout.trim());
        parse_detector_output(&stdout)
    }
}
