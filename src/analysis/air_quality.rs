/// Air-quality trend analysis and health impact rates.
///
/// Summarizes a region's AQI history (distribution, monthly trend,
/// pollutant statistics against WHO guideline values) and derives the
/// health-risk rate: the share of days whose AQI exceeded the unhealthy
/// threshold, mapped to a canned recommendation band.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::model::AirQualityRecord;

use super::climate::AnalysisPeriod;
use super::periodic::{trend_summary, AggregateStat, Granularity, TrendSummary};
use super::trend::health_risk_percentage;
use super::{mean, round_to};

/// AQI above which a day counts toward the health-risk rate.
pub const UNHEALTHY_AQI_THRESHOLD: f64 = 100.0;

/// WHO 24-hour guideline values, µg/m³.
pub const WHO_PM25_LIMIT_UGM3: f64 = 15.0;
pub const WHO_PM10_LIMIT_UGM3: f64 = 45.0;

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AqiSummary {
    pub average_aqi: f64,
    pub min_aqi: f64,
    pub max_aqi: f64,
    pub category_distribution: BTreeMap<String, usize>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthAssessment {
    pub unhealthy_days: usize,
    pub health_risk_percentage: f64,
    pub recommendation: String,
}

/// Statistics for one particulate pollutant against its WHO guideline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutantStats {
    pub average: f64,
    pub max: f64,
    pub days_above_who_limit: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PollutantAnalysis {
    pub pm25: PollutantStats,
    pub pm10: PollutantStats,
}

/// Air-quality trend report for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityTrendReport {
    pub region: String,
    pub analysis_period: AnalysisPeriod,
    pub aqi_summary: AqiSummary,
    pub health_assessment: HealthAssessment,
    pub pollutant_analysis: PollutantAnalysis,
    /// Year+month mean AQI series with its fitted direction.
    pub monthly_trends: TrendSummary,
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Analyzes air-quality trends for `region`.
///
/// Returns `None` when the region has no air-quality records.
pub fn analyze_air_quality_trends(
    records: &[AirQualityRecord],
    region: &str,
) -> Option<AirQualityTrendReport> {
    let mut matching: Vec<&AirQualityRecord> =
        records.iter().filter(|r| r.region == region).collect();
    if matching.is_empty() {
        return None;
    }
    matching.sort_by_key(|r| r.date);

    let aqi_values: Vec<f64> = matching.iter().map(|r| r.aqi).collect();
    let aqi_samples: Vec<(NaiveDate, f64)> = matching.iter().map(|r| (r.date, r.aqi)).collect();
    let pm25: Vec<f64> = matching.iter().map(|r| r.pm25_ugm3).collect();
    let pm10: Vec<f64> = matching.iter().map(|r| r.pm10_ugm3).collect();

    let mut category_distribution: BTreeMap<String, usize> = BTreeMap::new();
    for record in &matching {
        *category_distribution.entry(record.aqi_category.clone()).or_insert(0) += 1;
    }

    let unhealthy_days = aqi_values
        .iter()
        .filter(|&&aqi| aqi > UNHEALTHY_AQI_THRESHOLD)
        .count();
    let risk_percentage = health_risk_percentage(&aqi_values, UNHEALTHY_AQI_THRESHOLD);

    Some(AirQualityTrendReport {
        region: region.to_string(),
        analysis_period: AnalysisPeriod {
            start: matching[0].date.format("%Y-%m-%d").to_string(),
            end: matching[matching.len() - 1].date.format("%Y-%m-%d").to_string(),
            total_days: matching.len(),
        },
        aqi_summary: AqiSummary {
            average_aqi: round_to(mean(&aqi_values), 1),
            min_aqi: round_to(aqi_values.iter().copied().fold(f64::INFINITY, f64::min), 1),
            max_aqi: round_to(aqi_values.iter().copied().fold(f64::NEG_INFINITY, f64::max), 1),
            category_distribution,
        },
        health_assessment: HealthAssessment {
            unhealthy_days,
            health_risk_percentage: risk_percentage,
            recommendation: health_recommendation(risk_percentage).to_string(),
        },
        pollutant_analysis: PollutantAnalysis {
            pm25: pollutant_stats(&pm25, WHO_PM25_LIMIT_UGM3),
            pm10: pollutant_stats(&pm10, WHO_PM10_LIMIT_UGM3),
        },
        monthly_trends: trend_summary(
            "aqi",
            &aqi_samples,
            Granularity::Monthly,
            AggregateStat::Mean,
            1,
        ),
    })
}

fn pollutant_stats(values: &[f64], who_limit: f64) -> PollutantStats {
    PollutantStats {
        average: round_to(mean(values), 1),
        max: round_to(values.iter().copied().fold(f64::NEG_INFINITY, f64::max), 1),
        days_above_who_limit: values.iter().filter(|&&v| v > who_limit).count(),
    }
}

/// Canned health recommendation for a health-risk percentage band.
pub fn health_recommendation(risk_percentage: f64) -> &'static str {
    if risk_percentage < 10.0 {
        "Low risk - Air quality is generally good for outdoor activities"
    } else if risk_percentage < 25.0 {
        "Moderate risk - Sensitive individuals should limit prolonged outdoor exertion"
    } else if risk_percentage < 50.0 {
        "High risk - Everyone should limit prolonged outdoor activities"
    } else {
        "Very high risk - Avoid outdoor activities when possible"
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
