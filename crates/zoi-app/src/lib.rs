//! Application service layer - config, wiring and the upload gateway

pub mod config;
pub mod gateway;
pub mod services;

pub use config::Config;
pub use gateway::{DispatchMode, UploadGateway, UploadResponse, UploadedImage};
