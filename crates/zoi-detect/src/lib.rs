//! Detector module - runs the external ZoI detection script
//!
//! The script is a black box: it receives the image path as its only argument
//! and prints JSON on stdout. This crate finds a Python interpreter, runs the
//! script under a timeout and parses what comes back.

pub mod interpreter;
pub mod output;
pub mod python_detector;

pub use interpreter::{resolve_interpreter, Interpreter, DEFAULT_CANDIDATES, PYTHON_PATH_ENV};
pub use output::{extract_json, parse_detector_output};
pub use python_detector::{DetectorConfig, PythonDetector};
