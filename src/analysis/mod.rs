/// Tabular aggregation for the EcoSentinel environmental analysis service.
///
/// Turns per-region, time-stamped dataset records into statistical
/// summaries at multiple granularities and classifies multi-year trend
/// directions. All operations are total over well-formed input: a region
/// with no matching records yields an explicit "no data" marker (a `None`
/// field) rather than an error, and input order never matters - every
/// operation sorts by date itself.
///
/// Submodules:
/// - `trend` - least-squares trend classification and health-risk rates.
/// - `periodic` - calendar grouping (monthly / yearly / seasonal).
/// - `summary` - rolling-window regional summaries.
/// - `climate` - climate trend reports (weather table).
/// - `air_quality` - air-quality trend reports (air-quality table).
/// - `flood` - flood-risk assessment reports (events + factors + weather).

pub mod air_quality;
pub mod climate;
pub mod flood;
pub mod periodic;
pub mod summary;
pub mod trend;

pub use periodic::{periodic_aggregate, AggregateStat, Granularity, TrendSummary};
pub use summary::{region_summary, RegionSummary};
pub use trend::{classify_trend, health_risk_percentage, linear_slope, TrendDirection};

/// Rounds to a fixed number of decimal places for display-oriented output.
pub(crate) fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    (value * factor).round() / factor
}

/// Arithmetic mean; 0.0 for an empty slice (callers gate on emptiness).
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}
