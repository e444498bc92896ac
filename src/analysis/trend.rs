/// Trend direction classification over yearly aggregate series.
///
/// Fits a first-degree least-squares line against the sequence index
/// (0, 1, 2, ...) and buckets the slope with fixed thresholds. The
/// thresholds are load-bearing compatibility constants: changing them
/// silently relabels every trend in every exported report.

use serde::{Deserialize, Serialize};

/// Slope magnitude below which a series is considered flat.
pub const TREND_SLOPE_THRESHOLD: f64 = 0.1;

/// Direction of a fitted linear trend.
///
/// `InsufficientData` is a valid terminal classification for series with
/// fewer than two points, not an error: a region observed for a single
/// year simply has no trend yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrendDirection {
    Increasing,
    Decreasing,
    Stable,
    #[serde(rename = "Insufficient data")]
    InsufficientData,
}

impl std::fmt::Display for TrendDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TrendDirection::Increasing => write!(f, "Increasing"),
            TrendDirection::Decreasing => write!(f, "Decreasing"),
            TrendDirection::Stable => write!(f, "Stable"),
            TrendDirection::InsufficientData => write!(f, "Insufficient data"),
        }
    }
}

/// Ordinary least-squares slope of `values` against indices 0, 1, 2, ...
///
/// Returns `None` for fewer than two points, where no line is defined.
pub fn linear_slope(values: &[f64]) -> Option<f64> {
    let n = values.len();
    if n < 2 {
        return None;
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = values.iter().sum::<f64>() / n as f64;

    let mut covariance = 0.0;
    let mut x_variance = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        covariance += dx * (y - y_mean);
        x_variance += dx * dx;
    }

    Some(covariance / x_variance)
}

/// Classifies the trend direction of an ordered series of yearly values.
///
/// slope > 0.1 is `Increasing`, slope < -0.1 is `Decreasing`, anything in
/// between is `Stable`. Fewer than two points is `InsufficientData`.
pub fn classify_trend(values: &[f64]) -> TrendDirection {
    match linear_slope(values) {
        None => TrendDirection::InsufficientData,
        Some(slope) if slope > TREND_SLOPE_THRESHOLD => TrendDirection::Increasing,
        Some(slope) if slope < -TREND_SLOPE_THRESHOLD => TrendDirection::Decreasing,
        Some(_) => TrendDirection::Stable,
    }
}

/// Fraction of AQI readings strictly above `threshold_aqi`, as a
/// percentage rounded to one decimal. An empty slice is 0.0% - no
/// readings means no observed unhealthy days, never an error.
pub fn health_risk_percentage(aqi_values: &[f64], threshold_aqi: f64) -> f64 {
    if aqi_values.is_empty() {
        return 0.0;
    }
    let unhealthy = aqi_values.iter().filter(|&&aqi| aqi > threshold_aqi).count();
    super::round_to(unhealthy as f64 / aqi_values.len() as f64 * 100.0, 1)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
