//! # Session Export Module
//!
//! Writes the sample log of a finished session to disk as CSV: one row
//! per sample, named by the wall-clock export time. Synchronous and
//! best-effort; there is a single writer and at most one session at a
//! time.

use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Result;

use crate::session::Sample;

/// Fixed relative directory the exports land in, created on demand.
pub const EXPORT_DIR: &str = "data";

/// Exports a finished session under `dir`, one file per session named
/// by the integer seconds since the Unix epoch.
///
/// An empty sample log writes nothing at all and returns `Ok(None)`.
pub fn export_samples(samples: &[Sample], dir: &Path) -> Result<Option<PathBuf>> {
    if samples.is_empty() {
        return Ok(None);
    }
    let stamp = SystemTime::now().duration_since(UNIX_EPOCH)?.as_secs();
    let path = dir.join(format!("{stamp}.csv"));
    fs::create_dir_all(dir)?;
    write_samples(&path, samples)?;
    eprintln!("[EXPORT] Wrote {} samples to {}", samples.len(), path.display());
    Ok(Some(path))
}

/// Writes one CSV file: a `tap, ms, bpm, key` header, then one row per
/// sample with integer tap/ms/key fields and a two-decimal BPM.
pub fn write_samples(path: &Path, samples: &[Sample]) -> Result<()> {
    let mut rows = String::from("tap, ms, bpm, key\n");
    for sample in samples {
        rows.push_str(&format!(
            "{},{},{:.2},{}\n",
            sample.index, sample.elapsed_ms as i64, sample.bpm, sample.key
        ));
    }
    let mut file = File::create(path)?;
    file.write_all(rows.as_bytes())?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample(index: usize, elapsed_ms: f64, bpm: f64, key: u32) -> Sample {
        Sample {
            index,
            elapsed_ms,
            bpm,
            key,
        }
    }

    #[test]
    fn empty_log_writes_no_file() {
        let dir = tempfile::tempdir().unwrap();
        let export_dir = dir.path().join("data");
        let written = export_samples(&[], &export_dir).unwrap();
        assert!(written.is_none());
        assert!(!export_dir.exists());
    }

    #[test]
    fn export_creates_directory_and_epoch_named_file() {
        let dir = tempfile::tempdir().unwrap();
        let export_dir = dir.path().join("data");
        let samples = [
            sample(0, 1000.4, 30.0, 65),
            sample(1, 1500.9, 29.951, 66),
        ];
        let path = export_samples(&samples, &export_dir).unwrap().unwrap();
        assert!(path.exists());

        let name = path.file_name().unwrap().to_str().unwrap();
        let stem = name.strip_suffix(".csv").unwrap();
        assert!(stem.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn rows_use_integer_fields_and_two_decimal_bpm() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let samples = [
            sample(0, 1000.4, 30.0, 65),
            sample(1, 1500.9, 29.951, 66),
        ];
        write_samples(&path, &samples).unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "tap, ms, bpm, key");
        assert_eq!(lines[1], "0,1000,30.00,65");
        assert_eq!(lines[2], "1,1500,29.95,66");
    }
}
