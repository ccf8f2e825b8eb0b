//! Errors raised while reading a data source.
//!
//! Only source-level failures surface here. Individual malformed rows are
//! dropped by the loader and never become errors.

use crate::fetch::SourceLocation;

#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    #[error("source not found: {location}")]
    MissingSource { location: SourceLocation },

    #[error("failed to read {location}: {source}")]
    Io {
        location: SourceLocation,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to fetch {location}: {source}")]
    Fetch {
        location: SourceLocation,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to read CSV header from {location}: {source}")]
    Csv {
        location: SourceLocation,
        #[source]
        source: csv::Error,
    },

    #[error("{location} has no `{column}` column")]
    MissingColumn {
        location: SourceLocation,
        column: String,
    },
}

impl LoadError {
    /// The source the error refers to.
    pub fn location(&self) -> &SourceLocation {
        match self {
            LoadError::MissingSource { location }
            | LoadError::Io { location, .. }
            | LoadError::Fetch { location, .. }
            | LoadError::Csv { location, .. }
            | LoadError::MissingColumn { location, .. } => location,
        }
    }
}
