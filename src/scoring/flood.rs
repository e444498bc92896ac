/// Flood risk scoring.
///
/// A deterministic multi-factor formula: recent rainfall, elevation and
/// soil permeability each contribute a multiplicative factor, scaled by
/// 0.5 and clamped into [0, 1]. The factor constants and the 50 mm / 2000 m
/// normalization baselines are part of the compatibility contract.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::alert::flood_alert_message;
use crate::model::{Location, RiskLevel, SoilType};

use super::{classify_risk_level, round_to, ScoringError};

/// Static model confidence reported with every flood assessment.
/// A placeholder until a trained model supplies real confidence values.
pub const MODEL_CONFIDENCE: f64 = 0.87;

/// Rainfall normalization baseline: 50 mm in 24 h maps to factor 1.0,
/// capped at factor 2.0 (100 mm or more).
const RAINFALL_BASELINE_MM: f64 = 50.0;
const RAINFALL_FACTOR_CAP: f64 = 2.0;

/// Elevation normalization: risk falls off linearly up to 2000 m, with a
/// floor of 0.1 so high-altitude locations keep a residual risk.
const ELEVATION_BASELINE_M: f64 = 2000.0;
const ELEVATION_FACTOR_FLOOR: f64 = 0.1;

/// Multiplicative soil permeability factor: clay drains worst, sand best.
fn soil_factor(soil_type: SoilType) -> f64 {
    match soil_type {
        SoilType::Clay => 1.3,
        SoilType::Loam => 1.0,
        SoilType::Sand => 0.7,
    }
}

// ---------------------------------------------------------------------------
// Assessment type
// ---------------------------------------------------------------------------

/// Echo of the inputs a flood assessment was computed from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloodFactors {
    pub rainfall_24h_mm: f64,
    pub elevation_m: f64,
    pub soil_type: SoilType,
}

/// A flood risk assessment for one location. Immutable once produced;
/// every call recomputes from scratch.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloodRiskAssessment {
    pub location: Location,
    pub risk_score: f64,
    pub risk_level: RiskLevel,
    pub confidence: f64,
    pub factors: FloodFactors,
    pub recommendations: Vec<String>,
    pub alert_message: String,
    pub updated_at: String,
}

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Predicts flood risk for a location.
///
/// ```text
/// soil_factor      = clay 1.3 | loam 1.0 | sand 0.7
/// elevation_factor = max(0.1, 1 - elevation / 2000)
/// rainfall_factor  = min(2.0, rainfall_24h / 50)
/// risk_score       = min(1.0, rainfall_factor * elevation_factor * soil_factor * 0.5)
/// ```
///
/// Negative rainfall or elevation is a hard validation failure. The
/// reported score is rounded to three decimals; the level is derived
/// from the unrounded score.
pub fn predict_flood_risk(
    location: Location,
    rainfall_24h_mm: f64,
    elevation_m: f64,
    soil_type: SoilType,
    now: DateTime<Utc>,
) -> Result<FloodRiskAssessment, ScoringError> {
    if rainfall_24h_mm < 0.0 {
        return Err(ScoringError::NegativeRainfall(rainfall_24h_mm));
    }
    if elevation_m < 0.0 {
        return Err(ScoringError::NegativeElevation(elevation_m));
    }

    let elevation_factor = (1.0 - elevation_m / ELEVATION_BASELINE_M).max(ELEVATION_FACTOR_FLOOR);
    let rainfall_factor = (rainfall_24h_mm / RAINFALL_BASELINE_MM).min(RAINFALL_FACTOR_CAP);
    let risk_score =
        (rainfall_factor * elevation_factor * soil_factor(soil_type) * 0.5).min(1.0);

    let risk_level = classify_risk_level(risk_score);

    Ok(FloodRiskAssessment {
        location,
        risk_score: round_to(risk_score, 3),
        risk_level,
        confidence: MODEL_CONFIDENCE,
        factors: FloodFactors {
            rainfall_24h_mm,
            elevation_m,
            soil_type,
        },
        recommendations: flood_recommendations(risk_level),
        alert_message: flood_alert_message(risk_level, location),
        updated_at: now.to_rfc3339(),
    })
}

/// Household-level advice per risk level. Order matters: callers display
/// the first entry as the headline action.
fn flood_recommendations(level: RiskLevel) -> Vec<String> {
    let actions: &[&str] = match level {
        RiskLevel::High => &[
            "Evacuate low-lying areas immediately",
            "Avoid crossing flooded roads or bridges",
            "Move to higher ground",
            "Keep emergency supplies ready",
        ],
        RiskLevel::Medium => &[
            "Monitor weather updates closely",
            "Prepare emergency evacuation kit",
            "Clear drainage around your property",
            "Avoid unnecessary travel",
        ],
        RiskLevel::Low => &[
            "Continue normal activities with caution",
            "Keep informed about weather conditions",
            "Ensure drainage systems are clear",
        ],
    };
    actions.iter().map(|a| a.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
