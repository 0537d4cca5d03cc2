//! NDJSON codec for driver input and overlay events
//!
//! Input scripts are line-delimited JSON. Blank lines and lines starting
//! with `#` are skipped so recorded gestures can be annotated.

use crate::protocol::{InputRecord, OverlayEvent};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CodecError {
    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
    #[error("Line {line}: {source}")]
    Line {
        line: usize,
        source: serde_json::Error,
    },
}

/// Encode an overlay event into NDJSON format (JSON + newline)
pub fn encode_event(event: &OverlayEvent) -> Result<String, CodecError> {
    let mut json = serde_json::to_string(event)?;
    json.push('\n');
    Ok(json)
}

/// Decode a line of JSON into an InputRecord
pub fn decode_input(line: &str) -> Result<InputRecord, CodecError> {
    let record: InputRecord = serde_json::from_str(line.trim())?;
    Ok(record)
}

/// Whether a line carries no record
pub fn is_skippable(line: &str) -> bool {
    let line = line.trim();
    line.is_empty() || line.starts_with('#')
}

/// Parse a whole script, reporting the 1-based line of the first bad record
pub fn parse_script(text: &str) -> Result<Vec<InputRecord>, CodecError> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !is_skippable(line))
        .map(|(index, line)| {
            serde_json::from_str(line.trim()).map_err(|source| CodecError::Line {
                line: index + 1,
                source,
            })
        })
        .collect()
}
