//! Parsing of detector stdout

use serde_json::Value;
use zoi_types::{DetectionPayload, DetectorError};

/// Parse detector stdout into a [`DetectionPayload`]
///
/// Current scripts print `{"zoi": ..., "detection_image": ...}`; early ones
/// printed the bare list of zones, which is taken as `zoi` with no image.
pub fn parse_detector_output(stdout: &str) -> Result<DetectionPayload, DetectorError> {
    if stdout.trim().is_empty() {
        return Err(DetectorError::OutputUnparseable("empty output".to_string()));
    }

    let unparseable = |reason: String| {
        let truncated: String = stdout.chars().take(500).collect();
        DetectorError::OutputUnparseable(format!("{} | raw: {}", reason, truncated))
    };

    let json = extract_json(stdout).ok_or_else(|| unparseable("no JSON document".to_string()))?;
    match serde_json::from_str::<Value>(json).map_err(|e| unparseable(e.to_string()))? {
        Value::Array(zones) => Ok(DetectionPayload {
            zoi: Value::Array(zones),
            detection_image: None,
        }),
        Value::Object(map) if map.contains_key("zoi") => {
            serde_json::from_value(Value::Object(map)).map_err(|e| unparseable(e.to_string()))
        }
        _ => Err(unparseable("missing `zoi`".to_string())),
    }
}

/// Slice the first complete JSON document out of `output`
///
/// The whole trimmed output is tried first. Otherwise every `{` or `[` is tried
/// as a start in turn, so bracketed log prefixes such as `[INFO]` and trailing
/// chatter are skipped.
pub fn extract_json(output: &str) -> Option<&str> {
    let output = output.trim();
    if serde_json::from_str::<Value>(output).is_ok() {
        return Some(output);
    }

    output
        .match_indices(['{', '['])
        .find_map(|(start, _)| {
            let rest = &output[start..];
            let mut stream = serde_json::Deserializer::from_str(rest).into_iter::<Value>();
            match stream.next() {
                Some(Ok(_)) => Some(&rest[..stream.byte_offset()]),
                _ => None,
            }
        })
}
