/// Flood-risk assessment reports.
///
/// Combines three independent views of a region's flood exposure:
/// historical event counts, the static risk-factor table with
/// score-banded mitigation recommendations, and recent rainfall patterns
/// from the weather table. Each section is optional - whichever tables
/// are present contribute, and an event-free region simply omits the
/// historical section.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dataset::Datasets;
use crate::model::{FloodEvent, FloodRiskFactors, FloodSeverity, RiskLevel, WeatherRecord};
use crate::scoring::{HIGH_RISK_THRESHOLD, MEDIUM_RISK_THRESHOLD};

use super::trend::TrendDirection;
use super::{mean, round_to};

/// Daily rainfall above this counts as a heavy-rainfall day.
pub const HEAVY_RAINFALL_MM: f64 = 20.0;

/// Number of most-recent weather records examined for rainfall patterns.
pub const RAINFALL_WINDOW: usize = 90;

/// Sub-window compared against the window start to call the short-term
/// rainfall direction.
const RAINFALL_COMPARISON_WINDOW: usize = 30;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LastMajorEvent {
    pub date: String,
    pub severity: FloodSeverity,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoricalFloodAnalysis {
    pub total_events: usize,
    pub severity_breakdown: BTreeMap<String, usize>,
    pub average_affected_area_km2: f64,
    pub last_major_event: Option<LastMajorEvent>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContributingFactors {
    pub elevation_risk: f64,
    pub population_density_risk: f64,
    pub water_proximity_risk: f64,
    pub drainage_infrastructure: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskFactorAnalysis {
    pub overall_risk_score: f64,
    pub risk_category: RiskLevel,
    pub contributing_factors: ContributingFactors,
    pub recommendations: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RainfallPatternAnalysis {
    pub recent_heavy_rainfall_days: usize,
    pub average_daily_rainfall_mm: f64,
    pub max_daily_rainfall_mm: f64,
    /// Short-term direction: recent 30-day mean versus the window start.
    pub rainfall_trend: TrendDirection,
}

/// Flood-risk assessment for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloodRiskReport {
    pub region: String,
    pub assessment_date: String,
    pub historical_analysis: Option<HistoricalFloodAnalysis>,
    pub risk_factors: Option<RiskFactorAnalysis>,
    pub weather_patterns: Option<RainfallPatternAnalysis>,
}

// ---------------------------------------------------------------------------
// Assessment
// ---------------------------------------------------------------------------

/// Builds the flood-risk assessment for `region` from whatever tables are
/// loaded. Total over sparse data: each section is independently optional.
pub fn generate_flood_risk_assessment(
    datasets: &Datasets,
    region: &str,
    today: NaiveDate,
) -> FloodRiskReport {
    let historical_analysis = datasets
        .flood_events
        .as_deref()
        .and_then(|events| historical_analysis(events, region));

    let risk_factors = datasets.flood_risk_factors.as_deref().and_then(|factors| {
        factors
            .iter()
            .find(|f| f.region == region)
            .map(risk_factor_analysis)
    });

    let weather_patterns = datasets
        .weather
        .as_deref()
        .and_then(|records| rainfall_patterns(records, region));

    FloodRiskReport {
        region: region.to_string(),
        assessment_date: today.format("%Y-%m-%d").to_string(),
        historical_analysis,
        risk_factors,
        weather_patterns,
    }
}

fn historical_analysis(events: &[FloodEvent], region: &str) -> Option<HistoricalFloodAnalysis> {
    let matching: Vec<&FloodEvent> = events.iter().filter(|e| e.region == region).collect();
    if matching.is_empty() {
        return None;
    }

    let mut severity_breakdown: BTreeMap<String, usize> = BTreeMap::new();
    for event in &matching {
        *severity_breakdown.entry(event.severity.to_string()).or_insert(0) += 1;
    }

    let areas: Vec<f64> = matching.iter().map(|e| e.affected_area_km2).collect();

    let last_major_event = matching
        .iter()
        .filter(|e| e.severity == FloodSeverity::Severe)
        .max_by_key(|e| e.date)
        .map(|e| LastMajorEvent {
            date: e.date.format("%Y-%m-%d").to_string(),
            severity: e.severity,
        });

    Some(HistoricalFloodAnalysis {
        total_events: matching.len(),
        severity_breakdown,
        average_affected_area_km2: round_to(mean(&areas), 1),
        last_major_event,
    })
}

fn risk_factor_analysis(factors: &FloodRiskFactors) -> RiskFactorAnalysis {
    RiskFactorAnalysis {
        overall_risk_score: factors.overall_flood_risk_score,
        risk_category: factors.risk_category,
        contributing_factors: ContributingFactors {
            elevation_risk: factors.elevation_risk_factor,
            population_density_risk: factors.population_risk_factor,
            water_proximity_risk: factors.water_proximity_risk_factor,
            drainage_infrastructure: factors.drainage_infrastructure_score,
        },
        recommendations: mitigation_recommendations(factors.overall_flood_risk_score),
    }
}

fn rainfall_patterns(records: &[WeatherRecord], region: &str) -> Option<RainfallPatternAnalysis> {
    let mut matching: Vec<&WeatherRecord> =
        records.iter().filter(|r| r.region == region).collect();
    if matching.is_empty() {
        return None;
    }
    matching.sort_by_key(|r| r.date);

    let window_start = matching.len().saturating_sub(RAINFALL_WINDOW);
    let rainfall: Vec<f64> = matching[window_start..].iter().map(|r| r.rainfall_mm).collect();

    let heavy_days = rainfall.iter().filter(|&&mm| mm > HEAVY_RAINFALL_MM).count();
    let max_rainfall = rainfall.iter().copied().fold(f64::NEG_INFINITY, f64::max);

    // Recent month versus the window start. With a short window the two
    // sub-slices overlap, which matches treating the whole history as
    // both "then" and "now".
    let recent = &rainfall[rainfall.len().saturating_sub(RAINFALL_COMPARISON_WINDOW)..];
    let earliest = &rainfall[..RAINFALL_COMPARISON_WINDOW.min(rainfall.len())];
    let rainfall_trend = if mean(recent) > mean(earliest) {
        TrendDirection::Increasing
    } else {
        TrendDirection::Decreasing
    };

    Some(RainfallPatternAnalysis {
        recent_heavy_rainfall_days: heavy_days,
        average_daily_rainfall_mm: round_to(mean(&rainfall), 2),
        max_daily_rainfall_mm: round_to(max_rainfall, 2),
        rainfall_trend,
    })
}

/// Region-level mitigation recommendations for an overall risk score.
///
/// These are infrastructure-planning actions, distinct from the
/// household-level advice attached to point flood assessments by the
/// scoring engine.
pub fn mitigation_recommendations(risk_score: f64) -> Vec<String> {
    let actions: &[&str] = if risk_score > HIGH_RISK_THRESHOLD {
        &[
            "Implement early warning systems",
            "Improve drainage infrastructure",
            "Develop evacuation plans",
            "Consider flood-resistant construction",
        ]
    } else if risk_score > MEDIUM_RISK_THRESHOLD {
        &[
            "Monitor rainfall patterns closely",
            "Maintain existing drainage systems",
            "Prepare emergency response plans",
        ]
    } else {
        &[
            "Continue regular monitoring",
            "Maintain preventive measures",
        ]
    };
    actions.iter().map(|a| a.to_string()).collect()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(y: i32, m: u32, severity: FloodSeverity, area: f64) -> FloodEvent {
        FloodEvent {
            date: date(y, m, 10),
            region: "Kisumu".to_string(),
            latitude: -0.09,
            longitude: 34.77,
            severity,
            affected_area_km2: area,
            estimated_affected_population: 10_000,
            duration_hours: 36,
            max_water_level_m: 2.0,
            economic_impact_usd: 500_000,
        }
    }

    fn weather(day_offset: u32, rainfall: f64) -> WeatherRecord {
        WeatherRecord {
            date: date(2024, 1, 1) + chrono::Duration::days(day_offset as i64),
            region: "Kisumu".to_string(),
            latitude: -0.09,
            longitude: 34.77,
            elevation_m: 1131.0,
            temperature_c: 24.0,
            rainfall_mm: rainfall,
            humidity_percent: 65.0,
            wind_speed_kmh: 6.0,
            pressure_hpa: 1011.0,
        }
    }

    #[test]
    fn test_historical_analysis_counts_and_breakdown() {
        let events = vec![
            event(2020, 5, FloodSeverity::Severe, 45.0),
            event(2022, 4, FloodSeverity::Moderate, 15.0),
            event(2023, 11, FloodSeverity::Severe, 30.0),
        ];
        let analysis = historical_analysis(&events, "Kisumu").unwrap();
        assert_eq!(analysis.total_events, 3);
        assert_eq!(analysis.severity_breakdown["Severe"], 2);
        assert_eq!(analysis.severity_breakdown["Moderate"], 1);
        assert_relative_eq!(analysis.average_affected_area_km2, 30.0);

        let major = analysis.last_major_event.unwrap();
        assert_eq!(major.date, "2023-11-10");
        assert_eq!(major.severity, FloodSeverity::Severe);
    }

    #[test]
    fn test_no_severe_events_means_no_major_event() {
        let events = vec![event(2022, 4, FloodSeverity::Minor, 8.0)];
        let analysis = historical_analysis(&events, "Kisumu").unwrap();
        assert!(analysis.last_major_event.is_none());
    }

    #[test]
    fn test_event_free_region_has_no_historical_section() {
        let events = vec![event(2022, 4, FloodSeverity::Severe, 8.0)];
        assert!(historical_analysis(&events, "Nyeri").is_none());
    }

    #[test]
    fn test_mitigation_recommendations_by_band() {
        let high = mitigation_recommendations(0.8);
        assert_eq!(high.len(), 4);
        assert_eq!(high[0], "Implement early warning systems");

        let medium = mitigation_recommendations(0.5);
        assert_eq!(medium.len(), 3);
        assert_eq!(medium[0], "Monitor rainfall patterns closely");

        let low = mitigation_recommendations(0.1);
        assert_eq!(low.len(), 2);
        assert_eq!(low[0], "Continue regular monitoring");

        // Boundary scores belong to the band below.
        assert_eq!(mitigation_recommendations(0.7).len(), 3);
        assert_eq!(mitigation_recommendations(0.4).len(), 2);
    }

    #[test]
    fn test_rainfall_patterns_heavy_days_and_trend() {
        // 60 dry days followed by 30 wet days: rising rainfall.
        let mut records: Vec<WeatherRecord> = (0..60).map(|i| weather(i, 1.0)).collect();
        records.extend((60..90).map(|i| weather(i, 25.0)));

        let patterns = rainfall_patterns(&records, "Kisumu").unwrap();
        assert_eq!(patterns.recent_heavy_rainfall_days, 30);
        assert_relative_eq!(patterns.max_daily_rainfall_mm, 25.0);
        assert_eq!(patterns.rainfall_trend, TrendDirection::Increasing);
    }

    #[test]
    fn test_rainfall_patterns_decreasing_trend() {
        let mut records: Vec<WeatherRecord> = (0..30).map(|i| weather(i, 25.0)).collect();
        records.extend((30..90).map(|i| weather(i, 1.0)));

        let patterns = rainfall_patterns(&records, "Kisumu").unwrap();
        assert_eq!(patterns.rainfall_trend, TrendDirection::Decreasing);
    }

    #[test]
    fn test_rainfall_patterns_limits_to_window() {
        // 100 heavy days then 90 dry days: only the last 90 are examined.
        let mut records: Vec<WeatherRecord> = (0..100).map(|i| weather(i, 30.0)).collect();
        records.extend((100..190).map(|i| weather(i, 0.5)));

        let patterns = rainfall_patterns(&records, "Kisumu").unwrap();
        assert_eq!(patterns.recent_heavy_rainfall_days, 0);
        assert_relative_eq!(patterns.average_daily_rainfall_mm, 0.5);
    }

    #[test]
    fn test_full_report_with_missing_tables() {
        let datasets = Datasets {
            weather: None,
            air_quality: None,
            flood_events: Some(vec![event(2020, 5, FloodSeverity::Severe, 45.0)]),
            flood_risk_factors: None,
            environmental_indicators: None,
        };
        let report = generate_flood_risk_assessment(&datasets, "Kisumu", date(2024, 6, 1));
        assert!(report.historical_analysis.is_some());
        assert!(report.risk_factors.is_none());
        assert!(report.weather_patterns.is_none());
        assert_eq!(report.assessment_date, "2024-06-01");
    }
}
