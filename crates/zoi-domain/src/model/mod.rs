//! Domain models

mod dataset;

pub use dataset::Dataset;
