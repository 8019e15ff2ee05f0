//! Value types shared between the lookup, detector and gateway layers

use clap::ValueEnum;
use serde::{Deserialize, Serialize};

/// How a matched dataset cell is reported back
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueMode {
    /// Strip the unit suffix and report a number
    #[default]
    Numeric,
    /// Report the trimmed cell text as-is
    Raw,
}

impl std::fmt::Display for ValueMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ValueMode::Numeric => write!(f, "numeric"),
            ValueMode::Raw => write!(f, "raw"),
        }
    }
}

/// What numeric mode does with a cell that is not a number
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedCellPolicy {
    /// Fail the lookup with a dataset parse error
    #[default]
    Reject,
    /// Report the cell as `null`; a cell holding only the unit reads as 0
    Null,
}

impl std::fmt::Display for MalformedCellPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MalformedCellPolicy::Reject => write!(f, "reject"),
            MalformedCellPolicy::Null => write!(f, "null"),
        }
    }
}

/// Output format for CLI results
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Table,
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Table => write!(f, "table"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// How persisted uploads are named inside the working directory
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NamingStrategy {
    /// Keep the declared filename; same-named uploads overwrite each other
    #[default]
    Declared,
    /// Random uuid stem with the declared extension
    Unique,
}

impl std::fmt::Display for NamingStrategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NamingStrategy::Declared => write!(f, "declared"),
            NamingStrategy::Unique => write!(f, "unique"),
        }
    }
}

/// Diameter of one inhibition zone
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Diameter {
    Millimetres(f64),
    Raw(String),
    /// Cell that held no number; serialized as `null`
    Unparsed,
}

impl std::fmt::Display for Diameter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diameter::Millimetres(mm) => write!(f, "{} mm", mm),
            Diameter::Raw(raw) => write!(f, "{}", raw),
            Diameter::Unparsed => write!(f, "-"),
        }
    }
}

/// Wire shape of one lookup measurement: `{"diameter_mm": ...}`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DiameterReading {
    pub diameter_mm: Diameter,
}

/// What a detector run hands back
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DetectionPayload {
    /// Measurement payload, passed through untouched
    pub zoi: serde_json::Value,

    /// Server-local path of the rendered result image
    #[serde(default)]
    pub detection_image: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diameter_serializes_untagged() {
        let numeric = DiameterReading {
            diameter_mm: Diameter::Millimetres(9.0),
        };
        let raw = DiameterReading {
            diameter_mm: Diameter::Raw("9mm".to_string()),
        };
        assert_eq!(
            serde_json::to_value(&numeric).unwrap(),
            serde_json::json!({"diameter_mm": 9.0})
        );
        assert_eq!(
            serde_json::to_value(&raw).unwrap(),
            serde_json::json!({"diameter_mm": "9mm"})
        );
        assert_eq!(
            serde_json::to_value(DiameterReading {
                diameter_mm: Diameter::Unparsed
            })
            .unwrap(),
            serde_json::json!({"diameter_mm": null})
        );
    }

    #[test]
    fn test_output_format_names() {
        assert_eq!(OutputFormat::default().to_string(), "table");
        assert_eq!(
            serde_json::from_str::<OutputFormat>("\"json\"").unwrap(),
            OutputFormat::Json
        );
    }

    #[test]
    fn test_detection_payload_image_is_optional() {
        let payload: DetectionPayload = serde_json::from_str(r#"{"zoi": [1, 2]}"#).unwrap();
        assert_eq!(payload.zoi, serde_json::json!([1, 2]));
        assert!(payload.detection_image.is_none());
    }
}
