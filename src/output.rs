//! Output formatting and persistence for dashboard views.
//!
//! Supports JSON serialization and CSV export with optional gzip
//! compression.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::Result;
use csv::WriterBuilder;
use flate2::Compression;
use flate2::write::GzEncoder;
use serde::Serialize;
use tracing::{debug, info};

use crate::views::types::{GeoAggregate, MonthlyTrend, UtilityTotal};

/// Writes `value` as pretty-printed JSON followed by a newline.
pub fn write_json<W: Write>(mut writer: W, value: &impl Serialize) -> Result<()> {
    serde_json::to_writer_pretty(&mut writer, value)?;
    writeln!(writer)?;
    Ok(())
}

/// Writes `rows` to a new CSV file at `path`, with a header row.
///
/// With `gzip` set the file is compressed and `.gz` is appended to the name.
/// Returns the path actually written.
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T], gzip: bool) -> Result<PathBuf> {
    let mut buf = Vec::new();
    {
        let mut writer = WriterBuilder::new().has_headers(true).from_writer(&mut buf);
        for row in rows {
            writer.serialize(row)?;
        }
        writer.flush()?;
    }

    let (target, body) = if gzip {
        let mut encoder = GzEncoder::new(Vec::new(), Compression::default());
        encoder.write_all(&buf)?;
        let mut name = path.as_os_str().to_owned();
        name.push(".gz");
        (PathBuf::from(name), encoder.finish()?)
    } else {
        (path.to_path_buf(), buf)
    };

    let mut file = File::create(&target)?;
    file.write_all(&body)?;
    debug!(path = %target.display(), rows = rows.len(), gzip, "CSV written");

    Ok(target)
}

/// Writes the three core views into `dir` as `geo.csv`, `totals.csv`, and
/// `monthly.csv`.
pub fn export_views(
    dir: &Path,
    geo: &[GeoAggregate],
    totals: &[UtilityTotal],
    monthly: &[MonthlyTrend],
    gzip: bool,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(dir)?;
    let written = vec![
        write_csv(&dir.join("geo.csv"), geo, gzip)?,
        write_csv(&dir.join("totals.csv"), totals, gzip)?,
        write_csv(&dir.join("monthly.csv"), monthly, gzip)?,
    ];
    info!(dir = %dir.display(), files = written.len(), gzip, "Views exported");
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;
    use flate2::read::GzDecoder;
    use std::env;
    use std::fs;
    use std::io::Read;

    fn temp_path(name: &str) -> PathBuf {
        env::temp_dir().join(name)
    }

    fn totals() -> Vec<UtilityTotal> {
        vec![
            UtilityTotal {
                utility: "dte".to_string(),
                enrolled_users: 3,
            },
            UtilityTotal {
                utility: "xcel".to_string(),
                enrolled_users: 1,
            },
        ]
    }

    #[test]
    fn test_write_json() {
        let mut out = Vec::new();
        write_json(&mut out, &totals()).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.contains("\"Enrolled Users\": 3"));
        assert!(text.ends_with('\n'));
    }

    #[test]
    fn test_write_csv_uses_public_labels() {
        let path = temp_path("charging_enrollment_test_totals.csv");
        let _ = fs::remove_file(&path);

        let written = write_csv(&path, &totals(), false).unwrap();
        assert_eq!(written, path);

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines, vec!["Utility,Enrolled Users", "dte,3", "xcel,1"]);

        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_write_csv_gzip() {
        let path = temp_path("charging_enrollment_test_monthly.csv");
        let rows = vec![MonthlyTrend {
            month: "2022-04".to_string(),
            utility: "National Grid".to_string(),
            enrollments: 2,
        }];

        let written = write_csv(&path, &rows, true).unwrap();
        assert_eq!(written, temp_path("charging_enrollment_test_monthly.csv.gz"));

        let mut decoded = String::new();
        GzDecoder::new(File::open(&written).unwrap())
            .read_to_string(&mut decoded)
            .unwrap();
        assert_eq!(decoded, "Month,Utility,Enrollments\n2022-04,National Grid,2\n");

        fs::remove_file(&written).unwrap();
    }
}
