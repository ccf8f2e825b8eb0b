//! Source locations and the raw byte readers behind them.
//!
//! A source is either a local file or an `http(s)://` URL. URLs are fetched
//! with the blocking client since every load happens inside one synchronous
//! pass.

use std::fmt;
use std::fs::File;
use std::io::{self, BufReader, Cursor, Read};
use std::path::PathBuf;

use tracing::debug;

use crate::error::LoadError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceLocation {
    Path(PathBuf),
    Url(String),
}

impl SourceLocation {
    /// Classifies `raw` as a URL when it carries an http scheme, otherwise as
    /// a filesystem path.
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
            SourceLocation::Url(trimmed.to_string())
        } else {
            SourceLocation::Path(PathBuf::from(trimmed))
        }
    }

    pub fn is_remote(&self) -> bool {
        matches!(self, SourceLocation::Url(_))
    }
}

impl From<&str> for SourceLocation {
    fn from(raw: &str) -> Self {
        SourceLocation::parse(raw)
    }
}

impl From<PathBuf> for SourceLocation {
    fn from(path: PathBuf) -> Self {
        SourceLocation::Path(path)
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceLocation::Path(path) => write!(f, "{}", path.display()),
            SourceLocation::Url(url) => f.write_str(url),
        }
    }
}

/// Downloads `url` and returns the response body.
///
/// # Errors
///
/// Returns an error on transport failure or a non-success status.
pub fn fetch_bytes(url: &str) -> reqwest::Result<Vec<u8>> {
    let resp = reqwest::blocking::get(url)?.error_for_status()?;
    Ok(resp.bytes()?.to_vec())
}

/// Opens a reader over the bytes of `location`.
///
/// A file that does not exist, or a URL answering 404, is reported as
/// [`LoadError::MissingSource`].
pub fn open_source(location: &SourceLocation) -> Result<Box<dyn Read>, LoadError> {
    match location {
        SourceLocation::Path(path) => {
            let file = File::open(path).map_err(|source| match source.kind() {
                io::ErrorKind::NotFound => LoadError::MissingSource {
                    location: location.clone(),
                },
                _ => LoadError::Io {
                    location: location.clone(),
                    source,
                },
            })?;
            debug!(path = %path.display(), "Opened local source");
            Ok(Box::new(BufReader::new(file)))
        }
        SourceLocation::Url(url) => {
            let bytes = fetch_bytes(url).map_err(|source| {
                if source.status() == Some(reqwest::StatusCode::NOT_FOUND) {
                    LoadError::MissingSource {
                        location: location.clone(),
                    }
                } else {
                    LoadError::Fetch {
                        location: location.clone(),
                        source,
                    }
                }
            })?;
            debug!(url = %url, bytes = bytes.len(), "Fetched remote source");
            Ok(Box::new(Cursor::new(bytes)))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::fs;

    #[test]
    fn test_parse_classifies_urls_and_paths() {
        assert_eq!(
            SourceLocation::parse("https://example.com/enrollments.csv"),
            SourceLocation::Url("https://example.com/enrollments.csv".to_string())
        );
        assert_eq!(
            SourceLocation::parse("http_exports/enrollments.csv"),
            SourceLocation::Path(PathBuf::from("http_exports/enrollments.csv"))
        );
        assert!(!SourceLocation::parse("enrollments.csv").is_remote());
    }

    #[test]
    fn test_open_missing_file_is_missing_source() {
        let location = SourceLocation::Path(env::temp_dir().join("charging_enrollment_absent.csv"));
        let err = open_source(&location).err().unwrap();
        assert!(matches!(err, LoadError::MissingSource { .. }));
        assert_eq!(err.location(), &location);
    }

    #[test]
    fn test_open_existing_file_reads_bytes() {
        let path = env::temp_dir().join("charging_enrollment_fetch_open.csv");
        fs::write(&path, "a,b\n1,2\n").unwrap();

        let mut reader = open_source(&SourceLocation::Path(path.clone())).unwrap();
        let mut content = String::new();
        reader.read_to_string(&mut content).unwrap();
        assert_eq!(content, "a,b\n1,2\n");

        fs::remove_file(&path).unwrap();
    }
}
