//! Reply frame parser.
//!
//! A reply looks like:
//!
//! ```text
//! 2024/03/09 07:05:01
//! M001  +1.2345E+00
//! M002  -OVER
//! END
//! ```
//!
//! Only lines that split into exactly two fields on the two-space separator
//! are channel lines; everything else (the terminator, blank lines) is skipped.

use chrono::NaiveDateTime;

use super::error::ProtocolError;
use crate::domain::{Reading, Sample, TIME_FORMAT};

/// Separator between channel label and value.
const FIELD_SEPARATOR: &str = "  ";

/// Parse a complete reply frame into a [`Sample`].
///
/// Values that are not numbers become `None` rather than failing the frame.
pub fn parse_frame(text: &str) -> Result<Sample, ProtocolError> {
    let lines = split_lines(text);
    if lines.len() < 2 {
        return Err(ProtocolError::TooFewLines { found: lines.len() });
    }

    let time = parse_timestamp(lines[0])?;
    let readings = lines[1..].iter().filter_map(|line| parse_reading(line)).collect();

    Ok(Sample::new(time, readings))
}

/// Parse the timestamp line of a reply.
pub fn parse_timestamp(line: &str) -> Result<NaiveDateTime, ProtocolError> {
    NaiveDateTime::parse_from_str(line, TIME_FORMAT).map_err(|e| {
        ProtocolError::InvalidTimestamp {
            line: line.to_string(),
            reason: e.to_string(),
        }
    })
}

/// Parse a `M%03d  %lf` channel line.
///
/// Returns `None` for lines that are not channel lines.
pub fn parse_reading(line: &str) -> Option<Reading> {
    let mut fields = line.split(FIELD_SEPARATOR);
    let (Some(channel), Some(value), None) = (fields.next(), fields.next(), fields.next()) else {
        return None;
    };

    Some(Reading::new(channel, value.trim().parse::<f64>().ok()))
}

/// Split on `\n`, `\r\n` and lone `\r`, without a trailing empty line.
fn split_lines(text: &str) -> Vec<&str> {
    let mut lines = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();
    let mut i = 0;

    while i < bytes.len() {
        match bytes[i] {
            b'\n' => {
                lines.push(&text[start..i]);
                start = i + 1;
            }
            b'\r' => {
                lines.push(&text[start..i]);
                if bytes.get(i + 1) == Some(&b'\n') {
                    i += 1;
                }
                start = i + 1;
            }
            _ => {}
        }
        i += 1;
    }

    if start < text.len() {
        lines.push(&text[start..]);
    }
    lines
}
