//! Configuration management for zoi-checker
//!
//! Config stored at: ~/.config/zoi-checker/config.json
//!
//! Every key has a default, so an absent or partial file is fine. Environment
//! variables override the file and command-line flags override both.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::info;
use zoi_detect::{DetectorConfig, DEFAULT_CANDIDATES, PYTHON_PATH_ENV};
use zoi_domain::service::{LookupOptions, DEFAULT_UNIT_SUFFIX};
use zoi_types::{ConfigError, MalformedCellPolicy, NamingStrategy, Result, ValueMode};

pub const PORT_ENV: &str = "ZOI_PORT";
pub const DATASET_ENV: &str = "ZOI_DATASET";
pub const STORAGE_DIR_ENV: &str = "ZOI_STORAGE_DIR";
pub const RESULT_DIR_ENV: &str = "ZOI_RESULT_DIR";
pub const RESULT_BASE_URL_ENV: &str = "ZOI_RESULT_BASE_URL";
pub const DETECTOR_TIMEOUT_ENV: &str = "ZOI_DETECTOR_TIMEOUT_SECS";

/// Application configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Interface the HTTP server binds to
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Working directory uploads are written into
    #[serde(default = "default_storage_dir")]
    pub storage_dir: PathBuf,

    /// Directory served under /result
    #[serde(default = "default_result_dir")]
    pub result_dir: PathBuf,

    /// CSV dataset for the lookup endpoint
    #[serde(default = "default_dataset_path")]
    pub dataset_path: PathBuf,

    /// Detection script passed to the interpreter
    #[serde(default = "default_detector_script")]
    pub detector_script: PathBuf,

    /// Interpreter command override (optional)
    #[serde(default)]
    pub python_path: Option<String>,

    /// Interpreter commands probed when no override works
    #[serde(default = "default_python_candidates")]
    pub python_candidates: Vec<String>,

    #[serde(default = "default_detector_timeout_secs")]
    pub detector_timeout_secs: u64,

    /// Public prefix for detection result images
    #[serde(default = "default_result_base_url")]
    pub result_base_url: String,

    #[serde(default)]
    pub naming: NamingStrategy,

    #[serde(default)]
    pub value_mode: ValueMode,

    /// Numeric mode only: fail on a non-numeric cell, or report it as null
    #[serde(default)]
    pub malformed_cells: MalformedCellPolicy,

    #[serde(default = "default_unit_suffix")]
    pub unit_suffix: String,

    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    3005
}

fn default_storage_dir() -> PathBuf {
    PathBuf::from("storage")
}

fn default_result_dir() -> PathBuf {
    PathBuf::from("result")
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from("assets").join("zoi_data.csv")
}

fn default_detector_script() -> PathBuf {
    PathBuf::from("py").join("zoi_detect.py")
}

fn default_python_candidates() -> Vec<String> {
    DEFAULT_CANDIDATES.iter().map(|s| s.to_string()).collect()
}

fn default_detector_timeout_secs() -> u64 {
    120
}

fn default_result_base_url() -> String {
    "http://localhost:3005/result".to_string()
}

fn default_unit_suffix() -> String {
    DEFAULT_UNIT_SUFFIX.to_string()
}

fn default_max_upload_bytes() -> usize {
    25 * 1024 * 1024
}

impl Default for Config {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            storage_dir: default_storage_dir(),
            result_dir: default_result_dir(),
            dataset_path: default_dataset_path(),
            detector_script: default_detector_script(),
            python_path: None,
            python_candidates: default_python_candidates(),
            detector_timeout_secs: default_detector_timeout_secs(),
            result_base_url: default_result_base_url(),
            naming: NamingStrategy::default(),
            value_mode: ValueMode::default(),
            malformed_cells: MalformedCellPolicy::default(),
            unit_suffix: default_unit_suffix(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("zoi-checker");
        Ok(config_dir)
    }

    /// Get the config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.json"))
    }

    /// Load config from the default location, or fall back to defaults
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    /// Load config from `path`, or fall back to defaults if it does not exist
    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            let config: Config = serde_json::from_str(&content)
                .map_err(|e| ConfigError::ParseError(format!("{}: {}", path.display(), e)))?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Save config to `path`
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Apply overrides from the process environment
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides read through `var`
    pub fn apply_overrides<F>(&mut self, var: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str| var(key).filter(|v| !v.trim().is_empty());

        if let Some(python) = var(PYTHON_PATH_ENV) {
            info!("{} set, using interpreter {:?}", PYTHON_PATH_ENV, python);
            self.python_path = Some(python);
        }
        if let Some(port) = var(PORT_ENV) {
            self.port = parse_value(PORT_ENV, &port)?;
        }
        if let Some(dataset) = var(DATASET_ENV) {
            self.dataset_path = PathBuf::from(dataset);
        }
        if let Some(dir) = var(STORAGE_DIR_ENV) {
            self.storage_dir = PathBuf::from(dir);
        }
        if let Some(dir) = var(RESULT_DIR_ENV) {
            self.result_dir = PathBuf::from(dir);
        }
        if let Some(url) = var(RESULT_BASE_URL_ENV) {
            self.result_base_url = url;
        }
        if let Some(secs) = var(DETECTOR_TIMEOUT_ENV) {
            self.detector_timeout_secs = parse_value(DETECTOR_TIMEOUT_ENV, &secs)?;
        }

        Ok(())
    }

    /// Display summary followed by the file the settings were loaded from
    pub fn summary(&self, config_file: &Path) -> String {
        format!("{}\nConfig file:      {}\n", self, config_file.display())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn detector_timeout(&self) -> Duration {
        Duration::from_secs(self.detector_timeout_secs)
    }

    pub fn detector_config(&self) -> DetectorConfig {
        DetectorConfig {
            script: self.detector_script.clone(),
            python_path: self.python_path.clone(),
            candidates: self.python_candidates.clone(),
            timeout: self.detector_timeout(),
        }
    }

    pub fn lookup_options(&self) -> LookupOptions {
        LookupOptions::default()
            .with_mode(self.value_mode)
            .with_malformed_cells(self.malformed_cells)
            .with_unit_suffix(self.unit_suffix.clone())
    }
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<T> {
    value.trim().parse().map_err(|_| {
        ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
        }
        .into()
    })
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "ZoI Checker Configuration")?;
        writeln!(f, "=========================")?;
        writeln!(f)?;
        writeln!(f, "Listen:           {}", self.bind_address())?;
        writeln!(f, "Storage dir:      {}", self.storage_dir.display())?;
        writeln!(f, "Result dir:       {}", self.result_dir.display())?;
        writeln!(f, "Result URL:       {}", self.result_base_url)?;
        writeln!(f, "Dataset:          {}", self.dataset_path.display())?;
        writeln!(f, "Detector script:  {}", self.detector_script.display())?;
        writeln!(
            f,
            "Python:           {}",
            self.python_path.as_deref().unwrap_or("(probe)")
        )?;
        writeln!(f, "Probe order:      {}", self.python_candidates.join(", "))?;
        writeln!(f, "Detector timeout: {}s", self.detector_timeout_secs)?;
        writeln!(f, "Upload naming:    {}", self.naming)?;
        writeln!(f, "Value mode:       {}", self.value_mode)?;
        writeln!(f, "Malformed cells:  {}", self.malformed_cells)?;
        writeln!(f, "Unit suffix:      {}", self.unit_suffix)?;
        writeln!(f, "Max upload:       {} bytes", self.max_upload_bytes)?;

        Ok(())
    }
}
