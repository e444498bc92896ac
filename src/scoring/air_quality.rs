/// Air-quality index forecasting.
///
/// Generates a synthetic hour-by-hour AQI series as a random walk: a base
/// value drawn from Normal(65, 15) with independent Normal(0, 5) steps,
/// clamped into the 0-500 AQI range after every step. Health
/// recommendations are selected by the final hour's value. The caller
/// supplies the random generator; a seeded generator reproduces the
/// forecast exactly.

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use rand_distr::{Distribution, Normal};
use serde::{Deserialize, Serialize};

use crate::model::Location;

use super::{round_to, ScoringError};

/// Mean and standard deviation of the starting AQI draw (typical urban air).
const BASE_AQI_MEAN: f64 = 65.0;
const BASE_AQI_STD: f64 = 15.0;

/// Standard deviation of the hourly random-walk step.
const HOURLY_STEP_STD: f64 = 5.0;

/// AQI scale bounds.
const AQI_MIN: f64 = 0.0;
const AQI_MAX: f64 = 500.0;

// ---------------------------------------------------------------------------
// AQI categories
// ---------------------------------------------------------------------------

/// US EPA AQI category bands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AqiCategory {
    Good,
    Moderate,
    #[serde(rename = "Unhealthy for Sensitive Groups")]
    UnhealthyForSensitiveGroups,
    Unhealthy,
    #[serde(rename = "Very Unhealthy")]
    VeryUnhealthy,
    Hazardous,
}

impl AqiCategory {
    /// Maps an AQI value to its category band. Breakpoints are inclusive
    /// upper bounds: exactly 50 is still Good.
    pub fn from_aqi(aqi: f64) -> AqiCategory {
        if aqi <= 50.0 {
            AqiCategory::Good
        } else if aqi <= 100.0 {
            AqiCategory::Moderate
        } else if aqi <= 150.0 {
            AqiCategory::UnhealthyForSensitiveGroups
        } else if aqi <= 200.0 {
            AqiCategory::Unhealthy
        } else if aqi <= 300.0 {
            AqiCategory::VeryUnhealthy
        } else {
            AqiCategory::Hazardous
        }
    }
}

impl std::fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AqiCategory::Good => write!(f, "Good"),
            AqiCategory::Moderate => write!(f, "Moderate"),
            AqiCategory::UnhealthyForSensitiveGroups => {
                write!(f, "Unhealthy for Sensitive Groups")
            }
            AqiCategory::Unhealthy => write!(f, "Unhealthy"),
            AqiCategory::VeryUnhealthy => write!(f, "Very Unhealthy"),
            AqiCategory::Hazardous => write!(f, "Hazardous"),
        }
    }
}

// ---------------------------------------------------------------------------
// Forecast types
// ---------------------------------------------------------------------------

/// One forecast hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HourlyAqi {
    pub timestamp: String,
    pub aqi: f64,
    pub category: String,
}

/// A synthetic AQI forecast for one location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityForecast {
    pub location: Location,
    pub predictions: Vec<HourlyAqi>,
    pub average_aqi: f64,
    pub health_recommendations: Vec<String>,
    pub updated_at: String,
}

// ---------------------------------------------------------------------------
// Forecasting
// ---------------------------------------------------------------------------

/// Forecasts AQI for the next `hours_ahead` whole hours.
///
/// The coordinates are carried through for output labeling only; the walk
/// itself is location-independent. A zero-hour horizon is a hard
/// validation failure.
pub fn forecast_air_quality<R: Rng + ?Sized>(
    rng: &mut R,
    location: Location,
    hours_ahead: u32,
    now: DateTime<Utc>,
) -> Result<AirQualityForecast, ScoringError> {
    if hours_ahead == 0 {
        return Err(ScoringError::ZeroForecastHorizon);
    }

    let base = Normal::new(BASE_AQI_MEAN, BASE_AQI_STD).expect("std is positive");
    let step = Normal::new(0.0, HOURLY_STEP_STD).expect("std is positive");

    let mut current_aqi = base.sample(rng);
    let mut predictions = Vec::with_capacity(hours_ahead as usize);

    for hour in 0..hours_ahead {
        current_aqi += step.sample(rng);
        current_aqi = current_aqi.clamp(AQI_MIN, AQI_MAX);

        let timestamp = now + Duration::hours(hour as i64);
        predictions.push(HourlyAqi {
            timestamp: timestamp.to_rfc3339(),
            aqi: round_to(current_aqi, 1),
            category: AqiCategory::from_aqi(current_aqi).to_string(),
        });
    }

    let average = predictions.iter().map(|p| p.aqi).sum::<f64>() / predictions.len() as f64;

    Ok(AirQualityForecast {
        location,
        average_aqi: round_to(average, 1),
        health_recommendations: health_recommendations(current_aqi),
        predictions,
        updated_at: now.to_rfc3339(),
    })
}

/// Health advice for the forecast's final-hour AQI. The three bands above
/// 150 share the emergency-conditions text.
fn health_recommendations(aqi: f64) -> Vec<String> {
    let advice: &[&str] = match AqiCategory::from_aqi(aqi) {
        AqiCategory::Good => &["Air quality is good. Enjoy outdoor activities!"],
        AqiCategory::Moderate => &[
            "Air quality is acceptable for most people",
            "Sensitive individuals should consider limiting prolonged outdoor exertion",
        ],
        AqiCategory::UnhealthyForSensitiveGroups => &[
            "Members of sensitive groups may experience health effects",
            "General public is not likely to be affected",
            "Reduce prolonged or heavy outdoor exertion",
        ],
        _ => &[
            "Health warnings of emergency conditions",
            "Everyone should avoid outdoor activities",
            "Stay indoors with windows closed",
            "Use air purifiers if available",
        ],
    };
    advice.iter().map(|a| a.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
