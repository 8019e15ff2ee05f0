//! Core types for zone-of-inhibition checking

mod error;
mod types;

pub use error::*;
pub use types::*;
