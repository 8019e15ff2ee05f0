//! Command handlers

use std::path::Path;

use tracing::debug;
use zoi_app::services::open_gateway;
use zoi_app::{Config, DispatchMode, UploadResponse, UploadedImage};
use zoi_types::{Error, Result};

use crate::cli::{Cli, Commands};
use crate::output::output_response;

pub async fn execute(cli: Cli) -> Result<()> {
    let file_config = load_file_config(&cli)?;
    let mut config = file_config.clone();
    config.apply_env()?;
    if let Some(ref dataset) = cli.dataset {
        config.dataset_path = dataset.clone();
    }
    if let Some(ref python) = cli.python {
        config.python_path = Some(python.clone());
    }

    match cli.command {
        Commands::Serve { port, host, naming } => {
            if let Some(port) = port {
                config.port = port;
            }
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(naming) = naming {
                config.naming = naming;
            }
            zoi_server::start_server(config).await
        }
        Commands::Check {
            image,
            value_mode,
            malformed_cells,
        } => {
            if let Some(mode) = value_mode {
                config.value_mode = mode;
            }
            if let Some(policy) = malformed_cells {
                config.malformed_cells = policy;
            }
            let response = run_local(&config, &image, DispatchMode::Lookup).await?;
            output_response(cli.format, &response)
        }
        Commands::Detect { image, timeout } => {
            if let Some(secs) = timeout {
                config.detector_timeout_secs = secs;
            }
            let response = run_local(&config, &image, DispatchMode::Detector).await?;
            output_response(cli.format, &response)
        }
        Commands::Config { init } => {
            let path = match cli.config {
                Some(ref path) => path.clone(),
                None => Config::config_path()?,
            };
            if init {
                file_config.save_to(&path)?;
                println!("Wrote {}", path.display());
            }
            println!("{}", config.summary(&path));
            Ok(())
        }
    }
}

fn load_file_config(cli: &Cli) -> Result<Config> {
    match cli.config {
        Some(ref path) => Config::load_from(path),
        None => Config::load(),
    }
}

/// Push a local image through the gateway exactly as an upload would go
async fn run_local(config: &Config, image: &Path, mode: DispatchMode) -> Result<UploadResponse> {
    if !image.is_file() {
        return Err(Error::FileNotFound(image.display().to_string()));
    }

    let bytes = tokio::fs::read(image).await?;
    let name = image
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or_default()
        .to_string();
    debug!("Dispatching {} ({} bytes) as {:?}", name, bytes.len(), mode);

    let gateway = open_gateway(config);
    Ok(gateway
        .handle_upload(Some(UploadedImage::new(name, bytes)), mode)
        .await?)
}
