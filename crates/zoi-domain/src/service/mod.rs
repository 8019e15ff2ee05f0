//! Domain services

pub mod lookup;

pub use lookup::{
    lookup, parse_diameter, LookupOptions, LookupResult, MeasurementRecord, DEFAULT_UNIT_SUFFIX,
};
