//! CSV-backed zone-of-inhibition lookup
//!
//! Given a plate's base name, find its row in the [`Dataset`] and report every
//! non-empty disk column as a diameter. Pure: the same dataset and name always
//! give the same result.

use zoi_types::{Diameter, DiameterReading, LookupError, MalformedCellPolicy, ValueMode};

use crate::model::Dataset;

/// Default unit marker trailing dataset cells
pub const DEFAULT_UNIT_SUFFIX: &str = "mm";

/// How matched cells are turned into diameters
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupOptions {
    pub mode: ValueMode,
    pub unit_suffix: String,
    pub malformed_cells: MalformedCellPolicy,
}

impl Default for LookupOptions {
    fn default() -> Self {
        Self {
            mode: ValueMode::Numeric,
            unit_suffix: DEFAULT_UNIT_SUFFIX.to_string(),
            malformed_cells: MalformedCellPolicy::Reject,
        }
    }
}

impl LookupOptions {
    pub fn with_mode(mut self, mode: ValueMode) -> Self {
        self.mode = mode;
        self
    }

    pub fn with_unit_suffix(mut self, unit_suffix: impl Into<String>) -> Self {
        self.unit_suffix = unit_suffix.into();
        self
    }

    pub fn with_malformed_cells(mut self, policy: MalformedCellPolicy) -> Self {
        self.malformed_cells = policy;
        self
    }
}

/// One reported disk
#[derive(Debug, Clone, PartialEq)]
pub struct MeasurementRecord {
    /// Header name of the column the value came from
    pub slot: String,
    pub diameter: Diameter,
}

/// Records of the matched row, in header order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LookupResult {
    pub records: Vec<MeasurementRecord>,
}

impl LookupResult {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Wire form: one `{diameter_mm}` per record
    pub fn readings(&self) -> Vec<DiameterReading> {
        self.records
            .iter()
            .map(|r| DiameterReading {
                diameter_mm: r.diameter.clone(),
            })
            .collect()
    }
}

/// Look up `base_name` in `dataset`.
///
/// `base_name` must already have its extension stripped; matching is exact and
/// case-sensitive after trimming. Empty cells are skipped, never reported.
/// In numeric mode a cell that is not a number either fails the lookup or is
/// reported as [`Diameter::Unparsed`], per `options.malformed_cells`.
pub fn lookup(
    dataset: &Dataset,
    base_name: &str,
    options: &LookupOptions,
) -> Result<LookupResult, LookupError> {
    let row = dataset
        .find_row(base_name)
        .ok_or_else(|| LookupError::NoMatchingRecord(base_name.trim().to_string()))?;

    let mut records = Vec::new();
    for (idx, slot) in dataset.slots().iter().enumerate() {
        let value = row.get(idx + 1).map(|v| v.trim()).unwrap_or("");
        if value.is_empty() {
            continue;
        }

        let diameter = match options.mode {
            ValueMode::Raw => Diameter::Raw(value.to_string()),
            ValueMode::Numeric => match parse_diameter(value, &options.unit_suffix) {
                Some(mm) => Diameter::Millimetres(mm),
                None => match options.malformed_cells {
                    MalformedCellPolicy::Reject => {
                        return Err(LookupError::MalformedMeasurement {
                            slot: slot.clone(),
                            value: value.to_string(),
                        })
                    }
                    MalformedCellPolicy::Null
                        if strip_unit(value, &options.unit_suffix).is_empty() =>
                    {
                        Diameter::Millimetres(0.0)
                    }
                    MalformedCellPolicy::Null => Diameter::Unparsed,
                },
            },
        };

        records.push(MeasurementRecord {
            slot: slot.clone(),
            diameter,
        });
    }

    Ok(LookupResult { records })
}

/// Remove every occurrence of `unit_suffix` from `value` and parse the rest.
///
/// Returns `None` for anything that is not a finite number.
pub fn parse_diameter(value: &str, unit_suffix: &str) -> Option<f64> {
    strip_unit(value, unit_suffix)
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

fn strip_unit(value: &str, unit_suffix: &str) -> String {
    if unit_suffix.is_empty() {
        value.trim().to_string()
    } else {
        value.replace(unit_suffix, "").trim().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dataset(header: &[&str], rows: &[&[&str]]) -> Dataset {
        Dataset::new(
            header.iter().map(|s| s.to_string()).collect(),
            rows.iter()
                .map(|r| r.iter().map(|s| s.to_string()).collect())
                .collect(),
        )
        .unwrap()
    }

    fn plates() -> Dataset {
        dataset(
            &["filename", "Disk1", "Disk2"],
            &[&["plateA", "12mm", ""], &["plateB", "", "9mm"]],
        )
    }

    #[test]
    fn test_empty_trailing_cell_is_omitted() {
        let ds = dataset(&["filename", "A", "B"], &[&["sample", "5mm", ""]]);
        let result = lookup(&ds, "sample", &LookupOptions::default()).unwrap();
        assert_eq!(
            result.records,
            vec![MeasurementRecord {
                slot: "A".to_string(),
                diameter: Diameter::Millimetres(5.0),
            }]
        );
    }

    #[test]
    fn test_plate_b_reports_only_disk2() {
        let result = lookup(&plates(), "plateB", &LookupOptions::default()).unwrap();
        assert_eq!(result.len(), 1);
        assert_eq!(result.records[0].slot, "Disk2");
        assert_eq!(
            result.readings(),
            vec![DiameterReading {
                diameter_mm: Diameter::Millimetres(9.0)
            }]
        );
    }

    #[test]
    fn test_records_follow_header_order() {
        let ds = dataset(
            &["filename", "D3", "D1", "D2"],
            &[&["plate", "3mm", "1mm", "2mm"]],
        );
        let result = lookup(&ds, "plate", &LookupOptions::default()).unwrap();
        let slots: Vec<&str> = result.records.iter().map(|r| r.slot.as_str()).collect();
        assert_eq!(slots, vec!["D3", "D1", "D2"]);
    }

    #[test]
    fn test_short_row_reads_as_empty() {
        let ds = dataset(&["filename", "D1", "D2", "D3"], &[&["plate", "4mm"]]);
        let result = lookup(&ds, "plate", &LookupOptions::default()).unwrap();
        assert_eq!(result.len(), 1);
    }

    #[test]
    fn test_missing_name_is_no_match() {
        let err = lookup(&plates(), "plateC", &LookupOptions::default()).unwrap_err();
        assert_eq!(err, LookupError::NoMatchingRecord("plateC".to_string()));
    }

    #[test]
    fn test_name_with_extension_does_not_match() {
        let err = lookup(&plates(), "plateA.png", &LookupOptions::default()).unwrap_err();
        assert!(matches!(err, LookupError::NoMatchingRecord(_)));
    }

    #[test]
    fn test_name_is_trimmed_before_matching() {
        let result = lookup(&plates(), "  plateA ", &LookupOptions::default()).unwrap();
        assert_eq!(result.records[0].diameter, Diameter::Millimetres(12.0));
    }

    #[test]
    fn test_raw_mode_keeps_text() {
        let options = LookupOptions::default().with_mode(ValueMode::Raw);
        let result = lookup(&plates(), "plateA", &options).unwrap();
        assert_eq!(result.records[0].diameter, Diameter::Raw("12mm".to_string()));
    }

    #[test]
    fn test_null_policy_keeps_other_readings() {
        let ds = dataset(
            &["filename", "Disk1", "Disk2", "Disk3"],
            &[&["plate", "n/a", "mm", "11mm"]],
        );
        let options = LookupOptions::default().with_malformed_cells(MalformedCellPolicy::Null);
        let result = lookup(&ds, "plate", &options).unwrap();
        let diameters: Vec<Diameter> = result.records.into_iter().map(|r| r.diameter).collect();
        assert_eq!(
            diameters,
            vec![
                Diameter::Unparsed,
                Diameter::Millimetres(0.0),
                Diameter::Millimetres(11.0),
            ]
        );
    }

    #[test]
    fn test_non_numeric_cell_is_malformed() {
        let ds = dataset(&["filename", "Disk1"], &[&["plate", "n/a"]]);
        let err = lookup(&ds, "plate", &LookupOptions::default()).unwrap_err();
        assert_eq!(
            err,
            LookupError::MalformedMeasurement {
                slot: "Disk1".to_string(),
                value: "n/a".to_string(),
            }
        );
    }

    #[test]
    fn test_lookup_is_repeatable() {
        let ds = plates();
        let first = lookup(&ds, "plateA", &LookupOptions::default()).unwrap();
        let second = lookup(&ds, "plateA", &LookupOptions::default()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_parse_diameter() {
        assert_eq!(parse_diameter("12mm", "mm"), Some(12.0));
        assert_eq!(parse_diameter("12.5 mm", "mm"), Some(12.5));
        assert_eq!(parse_diameter("7", "mm"), Some(7.0));
        assert_eq!(parse_diameter("7cm", "cm"), Some(7.0));
        assert_eq!(parse_diameter("7mm", ""), None);
        assert_eq!(parse_diameter("inf", "mm"), None);
        assert_eq!(parse_diameter("mm", "mm"), None);
        assert_eq!(parse_diameter("n/a", "mm"), None);
    }
}
