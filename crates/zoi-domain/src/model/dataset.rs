use zoi_types::LookupError;

/// Lookup table of measured plates
///
/// Column 0 of every row is the image base name; the remaining columns line up
/// with [`Dataset::slots`] by index. Rows may be shorter than the header.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dataset {
    slots: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Dataset {
    /// Build a dataset from a header row and its data rows.
    ///
    /// The first header cell names the key column and is dropped. Fails with
    /// [`LookupError::EmptyDataset`] when there is no data row.
    pub fn new(header: Vec<String>, rows: Vec<Vec<String>>) -> Result<Self, LookupError> {
        if header.is_empty() || rows.is_empty() {
            return Err(LookupError::EmptyDataset);
        }

        let slots = header
            .into_iter()
            .skip(1)
            .map(|h| h.trim().to_string())
            .collect();

        Ok(Self { slots, rows })
    }

    /// Measurement slot names in header order
    pub fn slots(&self) -> &[String] {
        &self.slots
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// First row, in file order, whose trimmed key equals the trimmed `key`
    pub fn find_row(&self, key: &str) -> Option<&[String]> {
        let key = key.trim();
        self.rows
            .iter()
            .find(|row| row.first().map(|k| k.trim()) == Some(key))
            .map(Vec::as_slice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_header_only_is_empty() {
        let result = Dataset::new(strings(&["filename", "Disk1"]), Vec::new());
        assert_eq!(result, Err(LookupError::EmptyDataset));
    }

    #[test]
    fn test_slots_skip_key_column() {
        let dataset = Dataset::new(
            strings(&["filename", " Disk1 ", "Disk2"]),
            vec![strings(&["plateA", "12mm"])],
        )
        .unwrap();
        assert_eq!(dataset.slots(), &["Disk1".to_string(), "Disk2".to_string()]);
        assert_eq!(dataset.row_count(), 1);
    }

    #[test]
    fn test_find_row_first_match_wins() {
        let dataset = Dataset::new(
            strings(&["filename", "Disk1"]),
            vec![
                strings(&[" plateA ", "1mm"]),
                strings(&["plateA", "2mm"]),
            ],
        )
        .unwrap();
        let row = dataset.find_row("plateA").unwrap();
        assert_eq!(row[1], "1mm");
    }

    #[test]
    fn test_find_row_is_case_sensitive() {
        let dataset = Dataset::new(
            strings(&["filename", "Disk1"]),
            vec![strings(&["PlateA", "1mm"])],
        )
        .unwrap();
        assert!(dataset.find_row("platea").is_none());
        assert!(dataset.find_row("PlateA.png").is_none());
    }
}
