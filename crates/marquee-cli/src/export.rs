//! Persist merged records as a JSON array and a CSV table.
//!
//! Both files share a `<prefix>_<YYYYMMDD_HHMM>` stem so one run's outputs
//! sort together.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Local};
use marquee::MergedRecord;
use serde::Serialize;

/// Errors writing export files.
#[derive(thiserror::Error, Debug)]
pub enum ExportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

/// Where one run's artifacts were written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub json: PathBuf,
    pub csv: PathBuf,
}

/// Filename stamp, minute resolution.
pub fn timestamp(now: &DateTime<Local>) -> String {
    now.format("%Y%m%d_%H%M").to_string()
}

pub fn output_paths(dir: &Path, prefix: &str, stamp: &str) -> OutputPaths {
    let stem = format!("{prefix}_{stamp}");
    OutputPaths {
        json: dir.join(format!("{stem}.json")),
        csv: dir.join(format!("{stem}.csv")),
    }
}

/// Write both artifacts into `dir`, creating it if needed.
pub fn export(
    dir: &Path,
    prefix: &str,
    records: &[MergedRecord],
    now: &DateTime<Local>,
) -> Result<OutputPaths, ExportError> {
    fs::create_dir_all(dir)?;
    let paths = output_paths(dir, prefix, &timestamp(now));
    write_json(&paths.json, records)?;
    write_csv(&paths.csv, records)?;
    Ok(paths)
}

/// Pretty-printed JSON array, one object per record.
pub fn write_json(path: &Path, records: &[MergedRecord]) -> Result<(), ExportError> {
    let mut out = BufWriter::new(File::create(path)?);
    serde_json::to_writer_pretty(&mut out, records)?;
    out.write_all(b"\n")?;
    out.flush()?;
    Ok(())
}

/// One CSV row per record; list fields joined with `", "`.
pub fn write_csv(path: &Path, records: &[MergedRecord]) -> Result<(), ExportError> {
    let mut writer = csv::Writer::from_path(path)?;
    for record in records {
        writer.serialize(CsvRow::from(record))?;
    }
    writer.flush()?;
    Ok(())
}

/// Flat view of a record; the csv crate cannot serialize nested sequences.
#[derive(Serialize)]
struct CsvRow<'a> {
    rank: usize,
    title: &'a str,
    detail_ref: &'a str,
    detail_url: Option<&'a str>,
    rating: Option<f64>,
    vote_count: Option<u64>,
    genres: String,
    runtime: Option<&'a str>,
    description: Option<&'a str>,
    director: Option<&'a str>,
    top_actors: String,
    certificate: Option<&'a str>,
    metascore: Option<&'a str>,
    release_info: Option<&'a str>,
    awards: Option<&'a str>,
    budget: Option<&'a str>,
    box_office: Option<&'a str>,
}

impl<'a> From<&'a MergedRecord> for CsvRow<'a> {
    fn from(r: &'a MergedRecord) -> Self {
        Self {
            rank: r.rank,
            title: &r.title,
            detail_ref: &r.detail_ref,
            detail_url: r.detail_url.as_deref(),
            rating: r.rating,
            vote_count: r.vote_count,
            genres: r.genres.join(", "),
            runtime: r.runtime.as_deref(),
            description: r.description.as_deref(),
            director: r.director.as_deref(),
            top_actors: r.top_actors.join(", "),
            certificate: r.certificate.as_deref(),
            metascore: r.metascore.as_deref(),
            release_info: r.release_info.as_deref(),
            awards: r.awards.as_deref(),
            budget: r.budget.as_deref(),
            box_office: r.box_office.as_deref(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_timestamp_format() {
        let now = Local.with_ymd_and_hms(2026, 3, 7, 9, 5, 59).unwrap();
        assert_eq!(timestamp(&now), "20260307_0905");
    }

    #[test]
    fn test_output_paths_share_stem() {
        let paths = output_paths(Path::new("data"), "top_250", "20260307_0905");
        assert_eq!(paths.json, Path::new("data/top_250_20260307_0905.json"));
        assert_eq!(paths.csv, Path::new("data/top_250_20260307_0905.csv"));
    }
}
