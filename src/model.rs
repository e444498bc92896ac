/// Core data types for the EcoSentinel environmental analysis service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains the record shapes of the five datasets, the categorical
/// enums used across analysis and scoring, and the weather-API error type.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Dataset record types
// ---------------------------------------------------------------------------

/// One daily weather observation for a region.
///
/// Corresponds to one row of `weather_data.csv`. Records are not guaranteed
/// to arrive in date order; the aggregator sorts before windowing.
#[derive(Debug, Clone, PartialEq)]
pub struct WeatherRecord {
    pub date: NaiveDate,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation_m: f64,
    pub temperature_c: f64,
    pub rainfall_mm: f64,
    pub humidity_percent: f64,
    pub wind_speed_kmh: f64,
    pub pressure_hpa: f64,
}

/// One daily air-quality observation for a region.
///
/// Corresponds to one row of `air_quality_data.csv`. The `aqi_category`
/// string is stored as written by the generator so the dominant-category
/// mode can be computed without re-deriving it from the AQI value.
#[derive(Debug, Clone, PartialEq)]
pub struct AirQualityRecord {
    pub date: NaiveDate,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub pm25_ugm3: f64,
    pub pm10_ugm3: f64,
    pub no2_ugm3: f64,
    pub so2_ugm3: f64,
    pub o3_ugm3: f64,
    pub aqi: f64,
    pub aqi_category: String,
}

/// A historical flood event with its impact assessment.
///
/// Corresponds to one row of `flood_events.csv`.
#[derive(Debug, Clone, PartialEq)]
pub struct FloodEvent {
    pub date: NaiveDate,
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub severity: FloodSeverity,
    pub affected_area_km2: f64,
    pub estimated_affected_population: u64,
    pub duration_hours: u32,
    pub max_water_level_m: f64,
    pub economic_impact_usd: u64,
}

/// Static flood-risk factors for a region.
///
/// Corresponds to one row of `flood_risk_factors.csv`. The overall score is
/// the mean of the four contributing factors (drainage inverted) and the
/// category is derived from it with the standard 0.7/0.4 cut points.
#[derive(Debug, Clone, PartialEq)]
pub struct FloodRiskFactors {
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub elevation_m: f64,
    pub population: u64,
    pub elevation_risk_factor: f64,
    pub population_risk_factor: f64,
    pub water_proximity_risk_factor: f64,
    pub drainage_infrastructure_score: f64,
    pub overall_flood_risk_score: f64,
    pub risk_category: RiskLevel,
}

/// Annual environmental health indicators for a region.
///
/// Corresponds to one row of `environmental_indicators.csv`.
#[derive(Debug, Clone, PartialEq)]
pub struct EnvironmentalIndicators {
    pub region: String,
    pub latitude: f64,
    pub longitude: f64,
    pub forest_cover_percent: f64,
    pub water_quality_index: f64,
    pub soil_health_index: f64,
    pub biodiversity_index: f64,
    pub air_quality_annual_avg: f64,
    pub waste_management_score: f64,
    pub renewable_energy_percent: f64,
    pub last_updated: String,
}

// ---------------------------------------------------------------------------
// Categorical enums
// ---------------------------------------------------------------------------

/// Flood event severity, in ascending order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FloodSeverity {
    Minor,
    Moderate,
    Severe,
}

impl FloodSeverity {
    /// Parses the severity label used in `flood_events.csv`.
    /// Returns `None` for anything other than the three known labels.
    pub fn from_name(name: &str) -> Option<FloodSeverity> {
        match name {
            "Minor" => Some(FloodSeverity::Minor),
            "Moderate" => Some(FloodSeverity::Moderate),
            "Severe" => Some(FloodSeverity::Severe),
            _ => None,
        }
    }
}

impl std::fmt::Display for FloodSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FloodSeverity::Minor => write!(f, "Minor"),
            FloodSeverity::Moderate => write!(f, "Moderate"),
            FloodSeverity::Severe => write!(f, "Severe"),
        }
    }
}

/// Categorical risk bucket derived from a continuous [0, 1] risk score.
///
/// Thresholds are strictly greater than: score > 0.7 is High, score > 0.4
/// is Medium, everything else (including exactly 0.7 and 0.4) is the band
/// below. See `scoring::classify_risk_level`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Upper-case label used in alert messages ("HIGH flood risk in ...").
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::Low => "LOW",
            RiskLevel::Medium => "MEDIUM",
            RiskLevel::High => "HIGH",
        }
    }

    /// Parses the title-case label used in `flood_risk_factors.csv`.
    pub fn from_name(name: &str) -> Option<RiskLevel> {
        match name {
            "Low" => Some(RiskLevel::Low),
            "Medium" => Some(RiskLevel::Medium),
            "High" => Some(RiskLevel::High),
            _ => None,
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "Low"),
            RiskLevel::Medium => write!(f, "Medium"),
            RiskLevel::High => write!(f, "High"),
        }
    }
}

/// Soil permeability class used by the flood-risk formula.
///
/// Unrecognized soil names silently map to `Loam` (factor 1.0). This is
/// intentional default-on-unknown behavior, not an error path: callers
/// passing free-form soil strings still get a usable assessment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    Clay,
    Loam,
    Sand,
}

impl SoilType {
    /// Parses a soil-type name, falling back to `Loam` for unknown names.
    pub fn from_name(name: &str) -> SoilType {
        match name {
            "clay" => SoilType::Clay,
            "sand" => SoilType::Sand,
            _ => SoilType::Loam,
        }
    }
}

impl std::fmt::Display for SoilType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SoilType::Clay => write!(f, "clay"),
            SoilType::Loam => write!(f, "loam"),
            SoilType::Sand => write!(f, "sand"),
        }
    }
}

/// A WGS84 point, echoed into every risk assessment for output labeling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub latitude: f64,
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// Current weather reading
// ---------------------------------------------------------------------------

/// A single current-weather reading for a region, from either the live
/// AccuWeather client or the simulated provider.
///
/// `observed_at` is kept as the ISO 8601 string reported by the source;
/// `alert::staleness` parses it when checking reading age. The 24-hour
/// rainfall total is the only field the flood-scoring formula consumes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurrentWeather {
    pub city: String,
    pub temperature_c: f64,
    pub humidity_percent: Option<f64>,
    pub rainfall_24h_mm: f64,
    pub wind_speed_kmh: Option<f64>,
    pub conditions: String,
    pub observed_at: String, // ISO 8601, e.g. "2024-05-01T12:00:00+03:00"
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when fetching or processing AccuWeather data.
#[derive(Debug, PartialEq)]
pub enum WeatherApiError {
    /// No API key configured and none found in the environment.
    MissingApiKey,
    /// The request never produced a response (DNS, connect, timeout).
    RequestFailed(String),
    /// Non-2xx HTTP response from the AccuWeather API.
    HttpError(u16),
    /// The response body could not be deserialized.
    ParseError(String),
    /// The city search returned no match for the query.
    CityNotFound(String),
    /// The location resolved but returned no current conditions.
    NoDataAvailable(String),
}

impl std::fmt::Display for WeatherApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherApiError::MissingApiKey => write!(f, "No AccuWeather API key configured"),
            WeatherApiError::RequestFailed(msg) => write!(f, "Request failed: {}", msg),
            WeatherApiError::HttpError(code) => write!(f, "HTTP error: {}", code),
            WeatherApiError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            WeatherApiError::CityNotFound(city) => write!(f, "City not found: {}", city),
            WeatherApiError::NoDataAvailable(key) => {
                write!(f, "No current conditions available for location: {}", key)
            }
        }
    }
}

impl std::error::Error for WeatherApiError {}
