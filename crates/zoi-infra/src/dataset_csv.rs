//! CSV loader for the ZoI lookup dataset
//!
//! Expected layout:
//! filename,<disk1>,<disk2>,...
//! plateA,12mm,,9mm
//!
//! Rows may be shorter than the header. Blank and whitespace-only lines are
//! skipped before the header is picked. A leading UTF-8 BOM is ignored.

use std::path::Path;

use csv::StringRecord;
use thiserror::Error;
use zoi_domain::model::Dataset;
use zoi_types::LookupError;

#[derive(Error, Debug)]
pub enum DatasetLoaderError {
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    Invalid(#[from] LookupError),
}

/// Parse dataset text
pub fn parse_dataset(content: &str) -> Result<Dataset, LookupError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut lines: Vec<Vec<String>> = Vec::new();
    for (row_idx, result) in reader.records().enumerate() {
        let record = result
            .map_err(|e| LookupError::MalformedDataset(format!("row {}: {}", row_idx + 1, e)))?;
        if is_blank(&record) {
            continue;
        }
        lines.push(record.iter().map(str::to_string).collect());
    }

    let mut lines = lines.into_iter();
    let header = lines.next().ok_or(LookupError::EmptyDataset)?;
    Dataset::new(header, lines.collect())
}

/// Read and parse a dataset file
pub async fn read_dataset<P: AsRef<Path>>(path: P) -> Result<Dataset, DatasetLoaderError> {
    let content = tokio::fs::read_to_string(path).await?;
    Ok(parse_dataset(&content)?)
}

fn is_blank(record: &StringRecord) -> bool {
    record.len() <= 1 && record.iter().all(|field| field.trim().is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;
    use zoi_domain::service::{lookup, LookupOptions};
    use zoi_types::{Diameter, DiameterReading};

    #[test]
    fn test_parse_plate_dataset() {
        let dataset = parse_dataset("filename,Disk1,Disk2\nplateA,12mm,\nplateB,,9mm").unwrap();
        assert_eq!(dataset.slots(), &["Disk1".to_string(), "Disk2".to_string()]);
        assert_eq!(dataset.row_count(), 2);

        let result = lookup(&dataset, "plateB", &LookupOptions::default()).unwrap();
        assert_eq!(
            result.readings(),
            vec![DiameterReading {
                diameter_mm: Diameter::Millimetres(9.0)
            }]
        );
    }

    #[test]
    fn test_blank_lines_are_skipped() {
        let dataset =
            parse_dataset("\n   \nfilename,Disk1\n\n  \t \nplateA,12mm\r\n\r\n").unwrap();
        assert_eq!(dataset.slots(), &["Disk1".to_string()]);
        assert_eq!(dataset.row_count(), 1);
    }

    #[test]
    fn test_header_only_is_empty() {
        assert_eq!(
            parse_dataset("filename,Disk1,Disk2\n\n").unwrap_err(),
            LookupError::EmptyDataset
        );
        assert_eq!(parse_dataset("").unwrap_err(), LookupError::EmptyDataset);
    }

    #[test]
    fn test_bom_and_quoted_fields() {
        let dataset = parse_dataset("\u{feff}filename,\"Disk, left\"\n\"plate A\",7mm\n").unwrap();
        assert_eq!(dataset.slots(), &["Disk, left".to_string()]);
        assert!(dataset.find_row("plate A").is_some());
    }

    #[test]
    fn test_short_rows_are_accepted() {
        let dataset = parse_dataset("filename,D1,D2,D3\nplate,5mm").unwrap();
        assert_eq!(dataset.rows()[0].len(), 2);
    }

    #[tokio::test]
    async fn test_read_dataset_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "filename,Disk1").unwrap();
        writeln!(file, "plateA,11mm").unwrap();

        let dataset = read_dataset(file.path()).await.unwrap();
        assert!(dataset.find_row("plateA").is_some());
    }

    #[tokio::test]
    async fn test_read_missing_file() {
        let err = read_dataset("/nonexistent/zoi_data.csv").await.unwrap_err();
        assert!(matches!(err, DatasetLoaderError::IoError(_)));
    }

    #[tokio::test]
    async fn test_read_dataset_reports_empty() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "filename,Disk1").unwrap();

        let err = read_dataset(file.path()).await.unwrap_err();
        assert!(matches!(
            err,
            DatasetLoaderError::Invalid(LookupError::EmptyDataset)
        ));
    }
}
