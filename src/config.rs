//! Source locations, resolved from the environment (after `.env` is loaded).

use crate::fetch::SourceLocation;

pub const ENROLLMENTS_VAR: &str = "ENROLLMENTS_SOURCE";
pub const VEHICLES_VAR: &str = "VEHICLES_SOURCE";
pub const RATES_VAR: &str = "RATES_SOURCE";

pub const DEFAULT_ENROLLMENTS: &str = "enrollments.csv";
pub const DEFAULT_VEHICLES: &str = "total_vins.csv";
pub const DEFAULT_RATES: &str = "electricity_costs_xcel.csv";

/// Where each of the three sources is read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataSources {
    pub enrollments: SourceLocation,
    pub vehicles: SourceLocation,
    pub rates: SourceLocation,
}

impl Default for DataSources {
    fn default() -> Self {
        Self::from_lookup(|_| None)
    }
}

impl DataSources {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves each source through `lookup`, falling back to the defaults
    /// for unset or blank values.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let resolve = |key: &str, default: &str| {
            let raw = lookup(key).filter(|v| !v.trim().is_empty());
            SourceLocation::parse(raw.as_deref().unwrap_or(default))
        };

        Self {
            enrollments: resolve(ENROLLMENTS_VAR, DEFAULT_ENROLLMENTS),
            vehicles: resolve(VEHICLES_VAR, DEFAULT_VEHICLES),
            rates: resolve(RATES_VAR, DEFAULT_RATES),
        }
    }

    /// Replaces any source given explicitly, e.g. from the command line.
    pub fn with_overrides(
        mut self,
        enrollments: Option<&str>,
        vehicles: Option<&str>,
        rates: Option<&str>,
    ) -> Self {
        if let Some(raw) = enrollments {
            self.enrollments = SourceLocation::parse(raw);
        }
        if let Some(raw) = vehicles {
            self.vehicles = SourceLocation::parse(raw);
        }
        if let Some(raw) = rates {
            self.rates = SourceLocation::parse(raw);
        }
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let sources = DataSources::default();
        assert_eq!(sources.enrollments, SourceLocation::parse("enrollments.csv"));
        assert_eq!(sources.vehicles, SourceLocation::parse("total_vins.csv"));
        assert_eq!(sources.rates, SourceLocation::parse("electricity_costs_xcel.csv"));
    }

    #[test]
    fn test_lookup_overrides_defaults() {
        let vars: HashMap<&str, &str> = HashMap::from([
            (ENROLLMENTS_VAR, "https://data.example.com/enrollments.csv"),
            (VEHICLES_VAR, "  "),
        ]);
        let sources = DataSources::from_lookup(|k| vars.get(k).map(|v| v.to_string()));

        assert!(sources.enrollments.is_remote());
        assert_eq!(sources.vehicles, SourceLocation::parse(DEFAULT_VEHICLES));
        assert_eq!(sources.rates, SourceLocation::parse(DEFAULT_RATES));
    }

    #[test]
    fn test_with_overrides() {
        let sources = DataSources::default().with_overrides(None, Some("data/vins.csv"), None);
        assert_eq!(sources.vehicles, SourceLocation::parse("data/vins.csv"));
        assert_eq!(sources.enrollments, SourceLocation::parse(DEFAULT_ENROLLMENTS));
    }
}
