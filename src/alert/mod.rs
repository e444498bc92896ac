/// Alert text and reading freshness checks.
///
/// Submodules:
/// - `staleness` - current-weather reading age checks with clock injection.

pub mod staleness;

use crate::model::{Location, RiskLevel};

/// Renders the localized flood alert line for an assessed risk level.
///
/// Coordinates stand in for a place name until geocoding is wired up.
pub fn flood_alert_message(level: RiskLevel, location: Location) -> String {
    let place = format!("Location {:.2}, {:.2}", location.latitude, location.longitude);
    match level {
        RiskLevel::High => format!("⚠️ HIGH flood risk in {}. Immediate action required!", place),
        RiskLevel::Medium => format!("⚡ MEDIUM flood risk in {}. Stay alert!", place),
        RiskLevel::Low => format!("✅ LOW flood risk in {}. Conditions normal.", place),
    }
}
