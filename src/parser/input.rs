//! Reading series snapshots from JSON.

use super::schema::RawSeries;
use crate::utils::error::ParseError;
use log::debug;
use serde::Deserialize;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// Read a JSON array of series from a file
///
/// **Public** - main entry point for file input
///
/// # Errors
/// * `ParseError::IoError` - file cannot be opened
/// * `ParseError::JsonError` - content is not a series array
pub fn read_series(input_path: impl AsRef<Path>) -> Result<Vec<RawSeries>, ParseError> {
    let input_path = input_path.as_ref();

    debug!("Reading series from: {}", input_path.display());

    let file = File::open(input_path)?;
    let series: Vec<RawSeries> = serde_json::from_reader(BufReader::new(file))?;

    debug!("Loaded {} series", series.len());

    Ok(series)
}

/// Parse series from an in-memory JSON value
///
/// Accepts either a bare array or an object wrapping the array under
/// `series` or `data`.
pub fn parse_series(raw: &serde_json::Value) -> Result<Vec<RawSeries>, ParseError> {
    let array = match raw {
        serde_json::Value::Array(_) => raw,
        serde_json::Value::Object(obj) => ["series", "data"]
            .iter()
            .find_map(|field| obj.get(*field).filter(|v| v.is_array()))
            .ok_or_else(|| {
                ParseError::InvalidFormat("object has no `series` or `data` array".to_string())
            })?,
        other => {
            return Err(ParseError::InvalidFormat(format!(
                "expected an array of series, found {}",
                json_kind(other)
            )))
        }
    };

    Ok(Vec::<RawSeries>::deserialize(array)?)
}

fn json_kind(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "a boolean",
        serde_json::Value::Number(_) => "a number",
        serde_json::Value::String(_) => "a string",
        serde_json::Value::Array(_) => "an array",
        serde_json::Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_parse_bare_array() {
        let raw = json!([{"SQLDigest": "a", "UnorderedValues": [{"Timestamp": 1, "CPUInMS": 2}]}]);
        let series = parse_series(&raw).unwrap();
        assert_eq!(series.len(), 1);
        assert_eq!(series[0].samples[0].value, 2.0);
    }

    #[test]
    fn test_parse_wrapped_array() {
        let raw = json!({"series": [{"primary_key": "a"}]});
        assert_eq!(parse_series(&raw).unwrap().len(), 1);
    }

    #[test]
    fn test_parse_rejects_scalar() {
        let err = parse_series(&json!(42)).unwrap_err();
        assert!(matches!(err, ParseError::InvalidFormat(_)));
    }

    #[test]
    fn test_read_series_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, r#"[{{"primary_key": "a", "samples": [{{"timestamp": 5, "value": 1.5}}]}}]"#).unwrap();

        let series = read_series(file.path()).unwrap();

        assert_eq!(series[0].primary_key, "a");
        assert_eq!(series[0].samples[0].timestamp, 5);
    }

    #[test]
    fn test_read_series_missing_file() {
        let err = read_series("/nonexistent/series.json").unwrap_err();
        assert!(matches!(err, ParseError::IoError(_)));
    }
}
