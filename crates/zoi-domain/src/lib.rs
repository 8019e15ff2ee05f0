//! Domain layer for zoi-checker
//!
//! Holds the dataset model, the pure lookup service and the [`Detector`]
//! capability the gateway dispatches to.

pub mod detector;
pub mod model;
pub mod service;

pub use detector::Detector;
