//! TSV recording of samples.
//!
//! The file is opened in append mode for every sample so an external tool
//! may rotate or truncate it between samples. A header row is written
//! whenever the file is empty.

use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use tds530_core::{Sample, SampleSink, SinkError};
use tracing::{debug, info};

/// Appends samples to a tab-separated file.
#[derive(Debug)]
pub struct TsvRecorder {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl TsvRecorder {
    /// Create a recorder for `path`, creating parent directories as needed.
    pub fn new(path: impl Into<PathBuf>) -> Result<Self, SinkError> {
        let path = path.into();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| SinkError::Write {
                path: parent.to_path_buf(),
                reason: e.to_string(),
            })?;
        }
        info!(path = %path.display(), "Recording samples");
        Ok(Self {
            path,
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn write_error(&self, e: &std::io::Error) -> SinkError {
        SinkError::Write {
            path: self.path.clone(),
            reason: e.to_string(),
        }
    }
}

impl SampleSink for TsvRecorder {
    fn record(&self, sample: &Sample) -> Result<(), SinkError> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| SinkError::Other("recorder lock poisoned".to_string()))?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| self.write_error(&e))?;

        let is_empty = file.metadata().map_err(|e| self.write_error(&e))?.len() == 0;

        let mut text = String::new();
        if is_empty {
            debug!(path = %self.path.display(), channels = sample.channel_count(), "Writing header");
            text.push_str(&header_row(sample.channel_count()));
        }
        text.push_str(&data_row(sample));

        file.write_all(text.as_bytes())
            .map_err(|e| self.write_error(&e))?;
        Ok(())
    }
}

/// `Time\tCH000\tCH001...` with one column per channel.
pub fn header_row(channels: usize) -> String {
    let mut row = String::from("Time");
    for idx in 0..channels {
        row.push_str(&format!("\tCH{idx:03}"));
    }
    row.push('\n');
    row
}

/// Timestamp followed by each value; missing values are empty cells.
pub fn data_row(sample: &Sample) -> String {
    let mut row = sample.time_string();
    for value in sample.values() {
        row.push('\t');
        if let Some(v) = value {
            row.push_str(&format_value(v));
        }
    }
    row.push('\n');
    row
}

/// Render a value in shortest round-trip form.
///
/// Integral values keep a `.0`. Magnitudes below `1e-4` or from `1e16` up
/// use exponent notation with a signed, two-digit minimum exponent
/// (`1e-07`, `2.5e+16`), the same text other loggers of this instrument write.
pub fn format_value(v: f64) -> String {
    if v.is_nan() {
        return "nan".to_string();
    }
    if v.is_infinite() {
        return if v > 0.0 { "inf" } else { "-inf" }.to_string();
    }

    let magnitude = v.abs();
    if magnitude != 0.0 && !(1e-4..1e16).contains(&magnitude) {
        return exponent_form(v);
    }
    if v.fract() == 0.0 {
        return format!("{v:.1}");
    }
    v.to_string()
}

fn exponent_form(v: f64) -> String {
    let text = format!("{v:e}");
    let Some((mantissa, exponent)) = text.split_once('e') else {
        return text;
    };
    let (sign, digits) = match exponent.strip_prefix('-') {
        Some(digits) => ('-', digits),
        None => ('+', exponent),
    };
    format!("{mantissa}e{sign}{digits:0>2}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use tds530_core::Reading;
    use tempfile::tempdir;

    fn sample(second: u32, values: &[Option<f64>]) -> Sample {
        let time = NaiveDate::from_ymd_opt(2024, 3, 9)
            .unwrap()
            .and_hms_opt(7, 5, second)
            .unwrap();
        let readings = values
            .iter()
            .enumerate()
            .map(|(i, v)| Reading::new(format!("M{:03}", i + 1), *v))
            .collect();
        Sample::new(time, readings)
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(1.0), "1.0");
        assert_eq!(format_value(-0.25), "-0.25");
        assert_eq!(format_value(0.0), "0.0");
        assert_eq!(format_value(1.2345), "1.2345");
        assert_eq!(format_value(1e-5), "1e-05");
        assert_eq!(format_value(1e-7), "1e-07");
        assert_eq!(format_value(-3.5e-12), "-3.5e-12");
        assert_eq!(format_value(2.5e16), "2.5e+16");
        assert_eq!(format_value(1e16), "1e+16");
        assert_eq!(format_value(1.5e300), "1.5e+300");
        assert_eq!(format_value(1e-4), "0.0001");
        assert_eq!(format_value(9_999_999_999_999_998.0), "9999999999999998.0");
        assert_eq!(format_value(f64::NAN), "nan");
        assert_eq!(format_value(f64::NEG_INFINITY), "-inf");
    }

    #[test]
    fn test_header_row() {
        assert_eq!(header_row(3), "Time\tCH000\tCH001\tCH002\n");
        assert_eq!(header_row(0), "Time\n");
    }

    #[test]
    fn test_first_record_writes_header_then_rows_append() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.tsv");
        let recorder = TsvRecorder::new(&path).unwrap();

        recorder.record(&sample(1, &[Some(1.5), None])).unwrap();
        recorder.record(&sample(2, &[Some(2.0), Some(-3.25)])).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "Time\tCH000\tCH001\n\
             2024/03/09 07:05:01\t1.5\t\n\
             2024/03/09 07:05:02\t2.0\t-3.25\n"
        );
    }

    #[test]
    fn test_existing_file_gets_no_second_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("run.tsv");
        fs::write(&path, "Time\tCH000\n2024/03/09 07:05:00\t0.5\n").unwrap();

        let recorder = TsvRecorder::new(&path).unwrap();
        recorder.record(&sample(1, &[Some(1.0)])).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(contents.matches("Time").count(), 1);
        assert!(contents.ends_with("2024/03/09 07:05:01\t1.0\n"));
    }

    #[test]
    fn test_parent_directories_are_created() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("a/b/run.tsv");
        let recorder = TsvRecorder::new(&path).unwrap();
        recorder.record(&sample(1, &[Some(1.0)])).unwrap();
        assert!(path.is_file());
        assert_eq!(recorder.path(), path);
    }

    #[test]
    fn test_unwritable_target_is_sink_error() {
        let dir = tempdir().unwrap();
        // A directory cannot be opened for appending
        let recorder = TsvRecorder::new(dir.path()).unwrap();
        let err = recorder.record(&sample(1, &[Some(1.0)])).unwrap_err();
        assert!(matches!(err, SinkError::Write { .. }));
    }
}
