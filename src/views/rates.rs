use serde::Serialize;

use crate::records::{ENROLLED_STATUS, ElectricityRateSample, NOT_ENROLLED_STATUS};
use crate::views::math::{mean, pct};

/// Average rates for enrolled and non-enrolled customers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateComparison {
    pub enrolled_avg: Option<f64>,
    pub not_enrolled_avg: Option<f64>,
    /// How much less enrolled customers pay, as a percentage of the
    /// non-enrolled rate.
    pub savings_percent: Option<f64>,
}

impl RateComparison {
    pub fn from_samples(samples: &[ElectricityRateSample]) -> Self {
        let avg_for = |status: &str| {
            let rates: Vec<f64> = samples
                .iter()
                .filter(|s| s.status == status)
                .map(|s| s.rate_cents_per_kwh)
                .collect();
            mean(&rates)
        };

        let enrolled_avg = avg_for(ENROLLED_STATUS);
        let not_enrolled_avg = avg_for(NOT_ENROLLED_STATUS);

        let savings_percent = match (enrolled_avg, not_enrolled_avg) {
            (Some(enrolled), Some(not_enrolled)) if not_enrolled > 0.0 => {
                Some(pct(not_enrolled - enrolled, not_enrolled))
            }
            _ => None,
        };

        RateComparison {
            enrolled_avg,
            not_enrolled_avg,
            savings_percent,
        }
    }
}
