//! Memoized source loads.
//!
//! [`SourceCache`] is an ordinary value owned by whoever drives a rendering
//! pass. Entries are keyed by [`SourceLocation`] and tagged with a
//! [`Fingerprint`]; a lookup whose fingerprint no longer matches reloads the
//! source. Remote sources are treated as immutable for the session.

use std::collections::HashMap;
use std::fs;
use std::io;
use std::sync::Arc;
use std::time::SystemTime;

use tracing::debug;

use crate::error::LoadError;
use crate::fetch::SourceLocation;
use crate::loader::{load_electricity_rates, load_enrollments, load_vehicle_summary};
use crate::records::{CleanEnrollment, ElectricityRateSample, VehicleEnrollmentSummary};

/// Cheap identity check for a source's current content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fingerprint {
    File {
        len: u64,
        modified: Option<SystemTime>,
    },
    Remote,
}

impl Fingerprint {
    pub fn of(location: &SourceLocation) -> Result<Self, LoadError> {
        match location {
            SourceLocation::Path(path) => {
                let meta = fs::metadata(path).map_err(|source| match source.kind() {
                    io::ErrorKind::NotFound => LoadError::MissingSource {
                        location: location.clone(),
                    },
                    _ => LoadError::Io {
                        location: location.clone(),
                        source,
                    },
                })?;
                Ok(Fingerprint::File {
                    len: meta.len(),
                    modified: meta.modified().ok(),
                })
            }
            SourceLocation::Url(_) => Ok(Fingerprint::Remote),
        }
    }
}

struct Entry<T> {
    fingerprint: Fingerprint,
    value: Arc<T>,
}

struct Memo<T> {
    entries: HashMap<SourceLocation, Entry<T>>,
}

impl<T> Default for Memo<T> {
    fn default() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }
}

impl<T> Memo<T> {
    fn get_or_load<F>(&mut self, location: &SourceLocation, load: F) -> Result<Arc<T>, LoadError>
    where
        F: FnOnce(&SourceLocation) -> Result<T, LoadError>,
    {
        let fingerprint = Fingerprint::of(location)?;

        if let Some(entry) = self.entries.get(location) {
            if entry.fingerprint == fingerprint {
                debug!(source = %location, "Cache hit");
                return Ok(Arc::clone(&entry.value));
            }
            debug!(source = %location, "Source changed, reloading");
        }

        let value = Arc::new(load(location)?);
        self.entries.insert(
            location.clone(),
            Entry {
                fingerprint,
                value: Arc::clone(&value),
            },
        );
        Ok(value)
    }

    fn remove(&mut self, location: &SourceLocation) -> bool {
        self.entries.remove(location).is_some()
    }
}

/// Parsed sources, one memo per source kind.
#[derive(Default)]
pub struct SourceCache {
    enrollments: Memo<Vec<CleanEnrollment>>,
    vehicles: Memo<Vec<VehicleEnrollmentSummary>>,
    rates: Memo<Vec<ElectricityRateSample>>,
}

impl SourceCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn enrollments(
        &mut self,
        location: &SourceLocation,
    ) -> Result<Arc<Vec<CleanEnrollment>>, LoadError> {
        self.enrollments.get_or_load(location, load_enrollments)
    }

    pub fn vehicle_summary(
        &mut self,
        location: &SourceLocation,
    ) -> Result<Arc<Vec<VehicleEnrollmentSummary>>, LoadError> {
        self.vehicles.get_or_load(location, load_vehicle_summary)
    }

    pub fn electricity_rates(
        &mut self,
        location: &SourceLocation,
    ) -> Result<Arc<Vec<ElectricityRateSample>>, LoadError> {
        self.rates.get_or_load(location, load_electricity_rates)
    }

    /// Drops every entry loaded from `location`. Returns whether any existed.
    pub fn invalidate(&mut self, location: &SourceLocation) -> bool {
        let enrollments = self.enrollments.remove(location);
        let vehicles = self.vehicles.remove(location);
        let rates = self.rates.remove(location);
        enrollments || vehicles || rates
    }

    pub fn clear(&mut self) {
        *self = Self::default();
    }

    pub fn len(&self) -> usize {
        self.enrollments.entries.len() + self.vehicles.entries.len() + self.rates.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
