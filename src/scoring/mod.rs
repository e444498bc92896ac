/// Risk scoring engine for the EcoSentinel environmental analysis service.
///
/// Converts point parameters (coordinates, rainfall, elevation, soil type,
/// area, forecast horizon) into bounded risk scores, categorical levels
/// and fixed recommendation lists for three domains. Every formula here
/// is a compatibility contract: downstream consumers depend on the exact
/// arithmetic and thresholds, so they must not be "improved" in place.
///
/// Assessments are constructed fresh per call and never cached. Where a
/// formula draws random numbers (air-quality forecast, deforestation base
/// risk) the generator is an explicit caller-supplied `rand::Rng` so that
/// seeded runs reproduce byte-identical output.
///
/// Submodules:
/// - `flood` - deterministic multi-factor flood risk.
/// - `air_quality` - synthetic hourly AQI forecast.
/// - `deforestation` - area deforestation risk and tree-loss estimate.

pub mod air_quality;
pub mod deforestation;
pub mod flood;

use crate::model::RiskLevel;

/// Risk score above which an assessment is High.
pub const HIGH_RISK_THRESHOLD: f64 = 0.7;

/// Risk score above which an assessment is Medium.
pub const MEDIUM_RISK_THRESHOLD: f64 = 0.4;

/// Buckets a clamped [0, 1] risk score into a level.
///
/// Cut points are strictly greater than: exactly 0.7 is Medium and
/// exactly 0.4 is Low. The same cut points apply to every risk domain.
pub fn classify_risk_level(score: f64) -> RiskLevel {
    if score > HIGH_RISK_THRESHOLD {
        RiskLevel::High
    } else if score > MEDIUM_RISK_THRESHOLD {
        RiskLevel::Medium
    } else {
        RiskLevel::Low
    }
}

/// Rounds to a fixed number of decimal places for reported scores.
pub(crate) fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Hard validation failures for scoring inputs.
///
/// These cover only truly invalid numeric input. Expected sparsity
/// (no records, short history) and unknown soil-type names never error.
#[derive(Debug, PartialEq)]
pub enum ScoringError {
    /// Rainfall totals cannot be negative.
    NegativeRainfall(f64),
    /// Elevation below sea level is out of the model's domain.
    NegativeElevation(f64),
    /// A forecast needs at least one hour of horizon.
    ZeroForecastHorizon,
    /// Deforestation assessment needs a positive area.
    NonPositiveArea(f64),
}

impl std::fmt::Display for ScoringError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScoringError::NegativeRainfall(mm) => {
                write!(f, "Invalid rainfall: {} mm (must be >= 0)", mm)
            }
            ScoringError::NegativeElevation(m) => {
                write!(f, "Invalid elevation: {} m (must be >= 0)", m)
            }
            ScoringError::ZeroForecastHorizon => {
                write!(f, "Invalid forecast horizon: must be at least 1 hour")
            }
            ScoringError::NonPositiveArea(km2) => {
                write!(f, "Invalid area: {} km2 (must be > 0)", km2)
            }
        }
    }
}

impl std::error::Error for ScoringError {}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
