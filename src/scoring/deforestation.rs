/// Deforestation risk analysis.
///
/// Draws a base risk uniformly from [0.1, 0.8) and applies an extra
/// pressure factor of Uniform(1.0, 1.5) when the location falls inside
/// the Kenya bounding box, where urban and agricultural expansion drive
/// clearing. The caller supplies the random generator; a seeded generator
/// reproduces the assessment exactly.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::model::{Location, RiskLevel};

use super::{classify_risk_level, round_to, ScoringError};

/// Approximate Kenya bounding box (exclusive bounds).
const KENYA_LAT_MIN: f64 = -1.5;
const KENYA_LAT_MAX: f64 = 1.5;
const KENYA_LON_MIN: f64 = 34.0;
const KENYA_LON_MAX: f64 = 42.0;

/// Tree density assumed when converting risk to an absolute loss estimate.
const TREES_PER_KM2: f64 = 1000.0;

// ---------------------------------------------------------------------------
// Assessment type
// ---------------------------------------------------------------------------

/// A deforestation risk assessment for one area.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DeforestationAssessment {
    pub location: Location,
    pub area_km2: f64,
    pub deforestation_risk: f64,
    pub risk_level: RiskLevel,
    pub estimated_tree_loss: u64,
    pub conservation_actions: Vec<String>,
    pub monitoring_frequency: String,
    pub updated_at: String,
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

/// Analyzes deforestation risk for an area centered on `location`.
///
/// A non-positive area is a hard validation failure. The reported score
/// is rounded to three decimals; the level, tree-loss estimate and
/// monitoring cadence derive from the unrounded score.
pub fn assess_deforestation_risk<R: Rng + ?Sized>(
    rng: &mut R,
    location: Location,
    area_km2: f64,
    now: DateTime<Utc>,
) -> Result<DeforestationAssessment, ScoringError> {
    if area_km2 <= 0.0 {
        return Err(ScoringError::NonPositiveArea(area_km2));
    }

    let mut risk: f64 = rng.gen_range(0.1..0.8);

    if in_kenya_bounds(location) {
        // Pressure from nearby urban areas and agricultural zones.
        risk *= rng.gen_range(1.0..1.5);
    }
    let risk = risk.min(1.0);

    let risk_level = classify_risk_level(risk);
    let monitoring_frequency = if risk_level == RiskLevel::High {
        "weekly"
    } else {
        "monthly"
    };

    Ok(DeforestationAssessment {
        location,
        area_km2,
        deforestation_risk: round_to(risk, 3),
        risk_level,
        estimated_tree_loss: (area_km2 * TREES_PER_KM2 * risk).round() as u64,
        conservation_actions: conservation_actions(risk_level),
        monitoring_frequency: monitoring_frequency.to_string(),
        updated_at: now.to_rfc3339(),
    })
}

fn in_kenya_bounds(location: Location) -> bool {
    location.latitude > KENYA_LAT_MIN
        && location.latitude < KENYA_LAT_MAX
        && location.longitude > KENYA_LON_MIN
        && location.longitude < KENYA_LON_MAX
}

/// Conservation action list per risk level: five urgent interventions for
/// High, four preparedness actions for Medium, three stewardship actions
/// for Low.
fn conservation_actions(level: RiskLevel) -> Vec<String> {
    let actions: &[&str] = match level {
        RiskLevel::High => &[
            "Immediate intervention required",
            "Deploy rapid response conservation team",
            "Implement emergency tree planting program",
            "Engage local community leaders",
            "Monitor with daily satellite imagery",
        ],
        RiskLevel::Medium => &[
            "Increase community awareness programs",
            "Plan reforestation activities",
            "Strengthen law enforcement patrols",
            "Develop alternative livelihood programs",
        ],
        RiskLevel::Low => &[
            "Continue regular monitoring",
            "Maintain community education programs",
            "Support sustainable forestry practices",
        ],
    };
    actions.iter().map(|a| a.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
