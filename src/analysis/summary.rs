/// Rolling-window regional summaries.
///
/// Produces the at-a-glance environmental summary for one region: recent
/// weather and air-quality averages over the last `SUMMARY_WINDOW`
/// records, flood history counts, and echoes of the static risk-factor
/// and indicator tables. Every field group is optional - a region with no
/// matching records in a table gets `None` for that group, and the
/// availability flags say which tables contributed.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::dataset::Datasets;
use crate::model::{AirQualityRecord, FloodEvent, FloodSeverity, RiskLevel, WeatherRecord};

use super::{mean, round_to};

/// Number of most-recent records summarized for weather and air quality.
/// Records are daily, so this approximates the last 30 days.
pub const SUMMARY_WINDOW: usize = 30;

// ---------------------------------------------------------------------------
// Summary types
// ---------------------------------------------------------------------------

/// Recent-weather statistics for a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherWindowSummary {
    pub avg_temperature_c: f64,
    pub total_rainfall_mm: f64,
    pub avg_humidity_percent: f64,
    pub avg_wind_speed_kmh: f64,
    /// Total records for the region in the table, not just the window.
    pub data_records: usize,
}

/// Recent air-quality statistics for a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityWindowSummary {
    pub avg_aqi: f64,
    pub avg_pm25_ugm3: f64,
    pub avg_pm10_ugm3: f64,
    /// Most frequent category in the window; ties resolve to the
    /// lexicographically smallest category.
    pub dominant_category: String,
    pub data_records: usize,
}

/// Flood event history counts for a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloodHistorySummary {
    pub total_events: usize,
    /// Date of the most recent event, if any.
    pub last_event: Option<String>,
    pub severe_events: usize,
}

/// Echo of the static flood-risk factor row for a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloodRiskSummary {
    pub overall_risk_score: f64,
    pub risk_category: RiskLevel,
    pub elevation_m: f64,
    pub drainage_score: f64,
}

/// Echo of the environmental indicator row for a region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentalHealthSummary {
    pub forest_cover_percent: f64,
    pub water_quality_index: f64,
    pub soil_health_index: f64,
    pub biodiversity_index: f64,
    pub waste_management_score: f64,
}

/// Which dataset tables contributed to a summary.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataAvailability {
    pub weather: bool,
    pub air_quality: bool,
    pub flood_events: bool,
    pub flood_risk: bool,
    pub environmental_indicators: bool,
}

/// Comprehensive environmental summary for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegionSummary {
    pub region: String,
    pub analysis_date: String,
    pub data_availability: DataAvailability,
    pub weather: Option<WeatherWindowSummary>,
    pub air_quality: Option<AirQualityWindowSummary>,
    pub flood_history: Option<FloodHistorySummary>,
    pub flood_risk: Option<FloodRiskSummary>,
    pub environmental_health: Option<EnvironmentalHealthSummary>,
}

// ---------------------------------------------------------------------------
// Windowed summaries
// ---------------------------------------------------------------------------

/// Summarizes the most recent `window` weather records for `region`.
///
/// Returns `None` when the region has no records at all. With fewer than
/// `window` records, all of them are used - short history is reported,
/// never rejected.
pub fn weather_window_summary(
    records: &[WeatherRecord],
    region: &str,
    window: usize,
) -> Option<WeatherWindowSummary> {
    let mut matching: Vec<&WeatherRecord> =
        records.iter().filter(|r| r.region == region).collect();
    if matching.is_empty() {
        return None;
    }
    matching.sort_by_key(|r| r.date);

    let total = matching.len();
    let recent = &matching[total.saturating_sub(window)..];

    let temps: Vec<f64> = recent.iter().map(|r| r.temperature_c).collect();
    let humidity: Vec<f64> = recent.iter().map(|r| r.humidity_percent).collect();
    let wind: Vec<f64> = recent.iter().map(|r| r.wind_speed_kmh).collect();
    let rainfall_total: f64 = recent.iter().map(|r| r.rainfall_mm).sum();

    Some(WeatherWindowSummary {
        avg_temperature_c: round_to(mean(&temps), 1),
        total_rainfall_mm: round_to(rainfall_total, 1),
        avg_humidity_percent: round_to(mean(&humidity), 1),
        avg_wind_speed_kmh: round_to(mean(&wind), 1),
        data_records: total,
    })
}

/// Summarizes the most recent `window` air-quality records for `region`.
pub fn air_quality_window_summary(
    records: &[AirQualityRecord],
    region: &str,
    window: usize,
) -> Option<AirQualityWindowSummary> {
    let mut matching: Vec<&AirQualityRecord> =
        records.iter().filter(|r| r.region == region).collect();
    if matching.is_empty() {
        return None;
    }
    matching.sort_by_key(|r| r.date);

    let total = matching.len();
    let recent = &matching[total.saturating_sub(window)..];

    let aqi: Vec<f64> = recent.iter().map(|r| r.aqi).collect();
    let pm25: Vec<f64> = recent.iter().map(|r| r.pm25_ugm3).collect();
    let pm10: Vec<f64> = recent.iter().map(|r| r.pm10_ugm3).collect();
    let categories: Vec<&str> = recent.iter().map(|r| r.aqi_category.as_str()).collect();

    Some(AirQualityWindowSummary {
        avg_aqi: round_to(mean(&aqi), 0),
        avg_pm25_ugm3: round_to(mean(&pm25), 1),
        avg_pm10_ugm3: round_to(mean(&pm10), 1),
        dominant_category: dominant_category(&categories),
        data_records: total,
    })
}

/// Flood history counts for `region`. `None` only when the events table
/// itself is absent; an event-free region reports zero counts.
pub fn flood_history_summary(events: &[FloodEvent], region: &str) -> FloodHistorySummary {
    let matching: Vec<&FloodEvent> = events.iter().filter(|e| e.region == region).collect();

    FloodHistorySummary {
        total_events: matching.len(),
        last_event: matching
            .iter()
            .map(|e| e.date)
            .max()
            .map(|d| d.format("%Y-%m-%d").to_string()),
        severe_events: matching
            .iter()
            .filter(|e| e.severity == FloodSeverity::Severe)
            .count(),
    }
}

/// Most frequent value; ties resolve to the lexicographically smallest.
fn dominant_category(categories: &[&str]) -> String {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for &category in categories {
        *counts.entry(category).or_insert(0) += 1;
    }

    let mut best: Option<(&str, usize)> = None;
    for (category, count) in counts {
        // Strictly greater keeps the first (smallest) key on ties.
        if best.map_or(true, |(_, best_count)| count > best_count) {
            best = Some((category, count));
        }
    }
    best.map(|(category, _)| category.to_string())
        .unwrap_or_else(|| "Unknown".to_string())
}

// ---------------------------------------------------------------------------
// Region summary assembly
// ---------------------------------------------------------------------------

/// Builds the comprehensive environmental summary for `region` from
/// whatever tables are loaded. Total over sparse data: absent tables and
/// record-free regions surface as `None` fields with availability flags.
pub fn region_summary(datasets: &Datasets, region: &str, today: NaiveDate) -> RegionSummary {
    let mut availability = DataAvailability::default();

    let weather = datasets.weather.as_deref().and_then(|records| {
        let summary = weather_window_summary(records, region, SUMMARY_WINDOW);
        availability.weather = summary.is_some();
        summary
    });

    let air_quality = datasets.air_quality.as_deref().and_then(|records| {
        let summary = air_quality_window_summary(records, region, SUMMARY_WINDOW);
        availability.air_quality = summary.is_some();
        summary
    });

    let flood_history = datasets.flood_events.as_deref().map(|events| {
        availability.flood_events = true;
        flood_history_summary(events, region)
    });

    let flood_risk = datasets.flood_risk_factors.as_deref().and_then(|factors| {
        let row = factors.iter().find(|f| f.region == region);
        availability.flood_risk = row.is_some();
        row.map(|f| FloodRiskSummary {
            overall_risk_score: f.overall_flood_risk_score,
            risk_category: f.risk_category,
            elevation_m: f.elevation_m,
            drainage_score: f.drainage_infrastructure_score,
        })
    });

    let environmental_health =
        datasets.environmental_indicators.as_deref().and_then(|indicators| {
            let row = indicators.iter().find(|i| i.region == region);
            availability.environmental_indicators = row.is_some();
            row.map(|i| EnvironmentalHealthSummary {
                forest_cover_percent: i.forest_cover_percent,
                water_quality_index: i.water_quality_index,
                soil_health_index: i.soil_health_index,
                biodiversity_index: i.biodiversity_index,
                waste_management_score: i.waste_management_score,
            })
        });

    RegionSummary {
        region: region.to_string(),
        analysis_date: today.format("%Y-%m-%d").to_string(),
        data_availability: availability,
        weather,
        air_quality,
        flood_history,
        flood_risk,
        environmental_health,
    }
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

    fn weather_record(region: &str, day: u32, temp: f64, rain: f64) -> WeatherRecord {
        WeatherRecord {
            date: date(2024, 1, day),
            region: region.to_string(),
            latitude: -1.29,
            longitude: 36.82,
            elevation_m: 1795.0,
            temperature_c: temp,
            rainfall_mm: rain,
            humidity_percent: 60.0,
            wind_speed_kmh: 8.0,
            pressure_hpa: 1013.0,
        }
    }

    fn aqi_record(region: &str, day: u32, aqi: f64, category: &str) -> AirQualityRecord {
        AirQualityRecord {
            date: date(2024, 1, day),
            region: region.to_string(),
            latitude: -1.29,
            longitude: 36.82,
            pm25_ugm3: 20.0,
            pm10_ugm3: 35.0,
            no2_ugm3: 15.0,
            so2_ugm3: 8.0,
            o3_ugm3: 80.0,
            aqi,
            aqi_category: category.to_string(),
        }
    }

    #[test]
    fn test_weather_summary_uses_window_but_counts_all_records() {
        // 5 records, window of 3: averages cover the 3 most recent days
        // but data_records reports all 5.
        let records: Vec<WeatherRecord> = (1..=5)
            .map(|day| weather_record("Nairobi", day, 20.0 + day as f64, 1.0))
            .collect();

        let summary = weather_window_summary(&records, "Nairobi", 3).unwrap();
        // Days 3, 4, 5: temps 23, 24, 25.
        assert_relative_eq!(summary.avg_temperature_c, 24.0);
        assert_relative_eq!(summary.total_rainfall_mm, 3.0);
        assert_eq!(summary.data_records, 5);
    }

    #[test]
    fn test_weather_summary_with_fewer_records_than_window() {
        let records = vec![weather_record("Nairobi", 1, 20.0, 2.5)];
        let summary = weather_window_summary(&records, "Nairobi", 30).unwrap();
        assert_relative_eq!(summary.avg_temperature_c, 20.0);
        assert_eq!(summary.data_records, 1);
    }

    #[test]
    fn test_weather_summary_ignores_other_regions() {
        let records = vec![
            weather_record("Nairobi", 1, 20.0, 0.0),
            weather_record("Mombasa", 1, 30.0, 0.0),
        ];
        let summary = weather_window_summary(&records, "Nairobi", 30).unwrap();
        assert_relative_eq!(summary.avg_temperature_c, 20.0);
        assert_eq!(summary.data_records, 1);
    }

    #[test]
    fn test_weather_summary_no_records_is_none() {
        let records = vec![weather_record("Mombasa", 1, 30.0, 0.0)];
        assert!(weather_window_summary(&records, "Nairobi", 30).is_none());
        assert!(weather_window_summary(&[], "Nairobi", 30).is_none());
    }

    #[test]
    fn test_weather_summary_sorts_unordered_input() {
        // Latest day first in the input; the window must still pick the
        // chronologically latest records.
        let records = vec![
            weather_record("Nairobi", 5, 25.0, 0.0),
            weather_record("Nairobi", 1, 11.0, 0.0),
            weather_record("Nairobi", 4, 24.0, 0.0),
        ];
        let summary = weather_window_summary(&records, "Nairobi", 2).unwrap();
        assert_relative_eq!(summary.avg_temperature_c, 24.5); // days 4 and 5
    }

    #[test]
    fn test_aqi_summary_rounds_aqi_to_integer() {
        let records = vec![
            aqi_record("Nairobi", 1, 60.0, "Moderate"),
            aqi_record("Nairobi", 2, 61.0, "Moderate"),
        ];
        let summary = air_quality_window_summary(&records, "Nairobi", 30).unwrap();
        assert_relative_eq!(summary.avg_aqi, 61.0); // 60.5 rounds up
        assert_eq!(summary.dominant_category, "Moderate");
    }

    #[test]
    fn test_dominant_category_tie_resolves_lexicographically() {
        let records = vec![
            aqi_record("Nairobi", 1, 40.0, "Good"),
            aqi_record("Nairobi", 2, 60.0, "Moderate"),
        ];
        let summary = air_quality_window_summary(&records, "Nairobi", 30).unwrap();
        assert_eq!(summary.dominant_category, "Good");
    }

    #[test]
    fn test_flood_history_counts() {
        let event = |day: u32, severity: FloodSeverity| FloodEvent {
            date: date(2023, 4, day),
            region: "Kisumu".to_string(),
            latitude: -0.09,
            longitude: 34.77,
            severity,
            affected_area_km2: 45.0,
            estimated_affected_population: 45_000,
            duration_hours: 24,
            max_water_level_m: 1.5,
            economic_impact_usd: 1_000_000,
        };
        let events = vec![
            event(10, FloodSeverity::Severe),
            event(20, FloodSeverity::Minor),
        ];

        let summary = flood_history_summary(&events, "Kisumu");
        assert_eq!(summary.total_events, 2);
        assert_eq!(summary.severe_events, 1);
        assert_eq!(summary.last_event.as_deref(), Some("2023-04-20"));

        let empty = flood_history_summary(&events, "Nyeri");
        assert_eq!(empty.total_events, 0);
        assert_eq!(empty.last_event, None);
    }

    #[test]
    fn test_region_summary_marks_missing_tables() {
        let datasets = Datasets {
            weather: Some(vec![weather_record("Nairobi", 1, 20.0, 1.0)]),
            air_quality: None,
            flood_events: None,
            flood_risk_factors: None,
            environmental_indicators: None,
        };

        let summary = region_summary(&datasets, "Nairobi", date(2024, 6, 1));
        assert!(summary.data_availability.weather);
        assert!(!summary.data_availability.air_quality);
        assert!(summary.weather.is_some());
        assert!(summary.air_quality.is_none());
        assert!(summary.flood_history.is_none());
        assert_eq!(summary.analysis_date, "2024-06-01");
    }

    #[test]
    fn test_region_summary_is_idempotent() {
        let datasets = Datasets {
            weather: Some(vec![weather_record("Nairobi", 1, 20.0, 1.0)]),
            air_quality: Some(vec![aqi_record("Nairobi", 1, 60.0, "Moderate")]),
            flood_events: Some(vec![]),
            flood_risk_factors: None,
            environmental_indicators: None,
        };
        let today = date(2024, 6, 1);
        assert_eq!(
            region_summary(&datasets, "Nairobi", today),
            region_summary(&datasets, "Nairobi", today)
        );
    }
}
