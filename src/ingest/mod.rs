/// Weather data ingest for the EcoSentinel service.
///
/// The scoring engine only ever consumes a plain weather reading; where
/// that reading comes from is a capability-selection concern handled
/// here. `WeatherProvider` is the seam: the live AccuWeather client and
/// the deterministic simulated provider (`dev_mode`) implement the same
/// trait, and callers pick one without the engine knowing the difference.
///
/// Submodules:
/// - `accuweather` - blocking AccuWeather API client.

pub mod accuweather;

use serde::{Deserialize, Serialize};

use crate::model::{CurrentWeather, WeatherApiError};
use crate::regions::Region;

/// Where a weather reading came from. Reports carry this tag so a reader
/// can tell live observations from simulated fallback data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeatherSource {
    Live,
    Simulated,
}

impl std::fmt::Display for WeatherSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WeatherSource::Live => write!(f, "live"),
            WeatherSource::Simulated => write!(f, "simulated"),
        }
    }
}

/// A source of current-weather readings for registered regions.
pub trait WeatherProvider {
    /// Fetches the current reading for a region.
    fn current_weather(&self, region: &Region) -> Result<CurrentWeather, WeatherApiError>;

    /// Which kind of source this provider is.
    fn source(&self) -> WeatherSource;
}
