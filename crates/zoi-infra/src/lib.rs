//! Infrastructure layer - dataset loading and upload storage

pub mod dataset_csv;
pub mod upload_store;

pub use dataset_csv::{parse_dataset, read_dataset, DatasetLoaderError};
pub use upload_store::{StoredUpload, UploadStore};
