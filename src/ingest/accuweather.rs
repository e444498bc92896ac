/// AccuWeather API client.
///
/// Resolves region names to AccuWeather location keys via the city search
/// endpoint, then fetches current conditions including the past-24-hour
/// precipitation total that feeds the flood-risk formula.
///
/// API documentation: https://developer.accuweather.com/apis
/// City search:        /locations/v1/cities/search
/// Current conditions: /currentconditions/v1/{locationKey}

use serde::Deserialize;

use crate::model::{CurrentWeather, WeatherApiError};
use crate::regions::Region;

use super::{WeatherProvider, WeatherSource};

const ACCUWEATHER_BASE_URL: &str = "https://dataservice.accuweather.com";

// ============================================================================
// AccuWeather API Response Structures
// ============================================================================

/// One entry of a city search response.
#[derive(Debug, Deserialize)]
pub struct CitySearchEntry {
    #[serde(rename = "Key")]
    pub key: String,
    #[serde(rename = "LocalizedName")]
    pub localized_name: String,
    #[serde(rename = "Country")]
    pub country: CountryInfo,
    #[serde(rename = "GeoPosition")]
    pub geo_position: GeoPosition,
}

#[derive(Debug, Deserialize)]
pub struct CountryInfo {
    #[serde(rename = "LocalizedName")]
    pub localized_name: String,
}

#[derive(Debug, Deserialize)]
pub struct GeoPosition {
    #[serde(rename = "Latitude")]
    pub latitude: f64,
    #[serde(rename = "Longitude")]
    pub longitude: f64,
}

/// One entry of a current-conditions response (the API returns an array
/// with a single element).
#[derive(Debug, Deserialize)]
struct CurrentConditionsEntry {
    #[serde(rename = "LocalObservationDateTime")]
    local_observation_date_time: String,
    #[serde(rename = "WeatherText")]
    weather_text: String,
    #[serde(rename = "RelativeHumidity")]
    relative_humidity: Option<f64>,
    #[serde(rename = "Temperature")]
    temperature: MetricValueHolder,
    #[serde(rename = "Wind")]
    wind: Option<WindInfo>,
    #[serde(rename = "PrecipitationSummary")]
    precipitation_summary: Option<PrecipitationSummary>,
}

#[derive(Debug, Deserialize)]
struct MetricValueHolder {
    #[serde(rename = "Metric")]
    metric: MetricValue,
}

#[derive(Debug, Deserialize)]
struct MetricValue {
    #[serde(rename = "Value")]
    value: f64,
}

#[derive(Debug, Deserialize)]
struct WindInfo {
    #[serde(rename = "Speed")]
    speed: MetricValueHolder,
}

#[derive(Debug, Deserialize)]
struct PrecipitationSummary {
    #[serde(rename = "Past24Hours")]
    past_24_hours: Option<MetricValueHolder>,
}

/// A resolved city from the search endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct CityMatch {
    pub key: String,
    pub name: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
}

// ============================================================================
// URL construction
// ============================================================================

pub fn build_city_search_url(api_key: &str, query: &str) -> String {
    format!(
        "{}/locations/v1/cities/search?apikey={}&q={}",
        ACCUWEATHER_BASE_URL, api_key, query
    )
}

pub fn build_current_conditions_url(api_key: &str, location_key: &str) -> String {
    // details=true is required for the precipitation summary block.
    format!(
        "{}/currentconditions/v1/{}?apikey={}&details=true",
        ACCUWEATHER_BASE_URL, location_key, api_key
    )
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Searches for cities matching `query`, best match first.
pub fn search_cities(
    client: &reqwest::blocking::Client,
    api_key: &str,
    query: &str,
) -> Result<Vec<CityMatch>, WeatherApiError> {
    let url = build_city_search_url(api_key, query);
    let response = client
        .get(&url)
        .send()
        .map_err(|e| WeatherApiError::RequestFailed(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(WeatherApiError::HttpError(status.as_u16()));
    }

    let body = response
        .text()
        .map_err(|e| WeatherApiError::RequestFailed(format!("failed to read body: {}", e)))?;
    parse_city_search_response(&body)
}

/// Fetches current conditions for a resolved location key.
pub fn fetch_current_weather(
    client: &reqwest::blocking::Client,
    api_key: &str,
    location_key: &str,
    city_name: &str,
) -> Result<CurrentWeather, WeatherApiError> {
    let url = build_current_conditions_url(api_key, location_key);
    let response = client
        .get(&url)
        .send()
        .map_err(|e| WeatherApiError::RequestFailed(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        return Err(WeatherApiError::HttpError(status.as_u16()));
    }

    let body = response
        .text()
        .map_err(|e| WeatherApiError::RequestFailed(format!("failed to read body: {}", e)))?;
    parse_current_conditions(&body, location_key, city_name)
}

// ============================================================================
// Response parsing
// ============================================================================

pub fn parse_city_search_response(body: &str) -> Result<Vec<CityMatch>, WeatherApiError> {
    let entries: Vec<CitySearchEntry> =
        serde_json::from_str(body).map_err(|e| WeatherApiError::ParseError(e.to_string()))?;

    Ok(entries
        .into_iter()
        .map(|entry| CityMatch {
            key: entry.key,
            name: entry.localized_name,
            country: entry.country.localized_name,
            latitude: entry.geo_position.latitude,
            longitude: entry.geo_position.longitude,
        })
        .collect())
}

/// Parses a current-conditions response into our reading shape.
///
/// A missing precipitation block means the station reported no rain, not
/// an error: the 24-hour total defaults to 0.0 mm.
pub fn parse_current_conditions(
    body: &str,
    location_key: &str,
    city_name: &str,
) -> Result<CurrentWeather, WeatherApiError> {
    let entries: Vec<CurrentConditionsEntry> =
        serde_json::from_str(body).map_err(|e| WeatherApiError::ParseError(e.to_string()))?;

    let entry = entries
        .into_iter()
        .next()
        .ok_or_else(|| WeatherApiError::NoDataAvailable(location_key.to_string()))?;

    let rainfall_24h_mm = entry
        .precipitation_summary
        .and_then(|p| p.past_24_hours)
        .map(|h| h.metric.value)
        .unwrap_or(0.0);

    Ok(CurrentWeather {
        city: city_name.to_string(),
        temperature_c: entry.temperature.metric.value,
        humidity_percent: entry.relative_humidity,
        rainfall_24h_mm,
        wind_speed_kmh: entry.wind.map(|w| w.speed.metric.value),
        conditions: entry.weather_text,
        observed_at: entry.local_observation_date_time,
    })
}

// ============================================================================
// Provider
// ============================================================================

/// Live weather provider backed by the AccuWeather API.
pub struct AccuWeatherProvider {
    client: reqwest::blocking::Client,
    api_key: String,
}

impl AccuWeatherProvider {
    pub fn new(api_key: String) -> AccuWeatherProvider {
        AccuWeatherProvider {
            client: reqwest::blocking::Client::new(),
            api_key,
        }
    }

    /// Builds a provider from a configured key, erroring when none is
    /// available so callers can fall back to the simulated provider.
    pub fn from_key(api_key: Option<String>) -> Result<AccuWeatherProvider, WeatherApiError> {
        api_key
            .map(AccuWeatherProvider::new)
            .ok_or(WeatherApiError::MissingApiKey)
    }
}

impl WeatherProvider for AccuWeatherProvider {
    fn current_weather(&self, region: &Region) -> Result<CurrentWeather, WeatherApiError> {
        let cities = search_cities(&self.client, &self.api_key, region.name)?;
        let city = cities
            .into_iter()
            .next()
            .ok_or_else(|| WeatherApiError::CityNotFound(region.name.to_string()))?;

        fetch_current_weather(&self.client, &self.api_key, &city.key, &city.name)
    }

    fn source(&self) -> WeatherSource {
        WeatherSource::Live
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    const CITY_SEARCH_FIXTURE: &str = r#"[
        {
            "Key": "224758",
            "LocalizedName": "Nairobi",
            "Country": { "LocalizedName": "Kenya" },
            "GeoPosition": { "Latitude": -1.283, "Longitude": 36.817 }
        },
        {
            "Key": "980921",
            "LocalizedName": "Nairobi Hill",
            "Country": { "LocalizedName": "Kenya" },
            "GeoPosition": { "Latitude": -1.3, "Longitude": 36.8 }
        }
    ]"#;

    const CONDITIONS_FIXTURE: &str = r#"[
        {
            "LocalObservationDateTime": "2024-05-01T16:00:00+03:00",
            "WeatherText": "Partly sunny",
            "RelativeHumidity": 64,
            "Temperature": { "Metric": { "Value": 23.3, "Unit": "C" } },
            "Wind": { "Speed": { "Metric": { "Value": 14.8 } } },
            "PrecipitationSummary": {
                "Past24Hours": { "Metric": { "Value": 12.5 } }
            }
        }
    ]"#;

    #[test]
    fn test_parse_city_search_keeps_api_order() {
        let cities = parse_city_search_response(CITY_SEARCH_FIXTURE).unwrap();
        assert_eq!(cities.len(), 2);
        assert_eq!(cities[0].key, "224758");
        assert_eq!(cities[0].name, "Nairobi");
        assert_eq!(cities[0].country, "Kenya");
        assert!((cities[0].latitude - (-1.283)).abs() < 1e-9);
    }

    #[test]
    fn test_parse_city_search_empty_result() {
        let cities = parse_city_search_response("[]").unwrap();
        assert!(cities.is_empty());
    }

    #[test]
    fn test_parse_city_search_malformed_body() {
        let err = parse_city_search_response("{not json").unwrap_err();
        assert!(matches!(err, WeatherApiError::ParseError(_)));
    }

    #[test]
    fn test_parse_current_conditions() {
        let weather = parse_current_conditions(CONDITIONS_FIXTURE, "224758", "Nairobi").unwrap();
        assert_eq!(weather.city, "Nairobi");
        assert_eq!(weather.temperature_c, 23.3);
        assert_eq!(weather.humidity_percent, Some(64.0));
        assert_eq!(weather.rainfall_24h_mm, 12.5);
        assert_eq!(weather.wind_speed_kmh, Some(14.8));
        assert_eq!(weather.conditions, "Partly sunny");
        assert_eq!(weather.observed_at, "2024-05-01T16:00:00+03:00");
    }

    #[test]
    fn test_missing_precipitation_block_defaults_to_zero() {
        let body = r#"[
            {
                "LocalObservationDateTime": "2024-05-01T16:00:00+03:00",
                "WeatherText": "Sunny",
                "RelativeHumidity": 40,
                "Temperature": { "Metric": { "Value": 27.0, "Unit": "C" } }
            }
        ]"#;
        let weather = parse_current_conditions(body, "224758", "Nairobi").unwrap();
        assert_eq!(weather.rainfall_24h_mm, 0.0);
        assert_eq!(weather.wind_speed_kmh, None);
    }

    #[test]
    fn test_empty_conditions_array_is_no_data() {
        let err = parse_current_conditions("[]", "224758", "Nairobi").unwrap_err();
        assert_eq!(err, WeatherApiError::NoDataAvailable("224758".to_string()));
    }

    #[test]
    fn test_provider_requires_api_key() {
        let result = AccuWeatherProvider::from_key(None);
        assert!(matches!(result, Err(WeatherApiError::MissingApiKey)));
        assert!(AccuWeatherProvider::from_key(Some("abc123".to_string())).is_ok());
    }

    #[test]
    fn test_url_construction() {
        let url = build_city_search_url("testkey", "Nairobi");
        assert!(url.contains("cities/search"));
        assert!(url.contains("apikey=testkey"));
        assert!(url.contains("q=Nairobi"));

        let url = build_current_conditions_url("testkey", "224758");
        assert!(url.contains("currentconditions/v1/224758"));
        assert!(url.contains("details=true"));
    }
}
