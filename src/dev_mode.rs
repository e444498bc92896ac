/// Development-mode weather provider.
///
/// When no AccuWeather key is configured, or the live API is down or
/// stale, this provider synthesizes a plausible current reading for a
/// region from the same statistical model as the historical weather
/// tables. Readings are deterministic per (seed, region, date): asking
/// twice for the same region on the same day returns the same reading.

use chrono::{Datelike, NaiveDate, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::ingest::{WeatherProvider, WeatherSource};
use crate::model::{CurrentWeather, WeatherApiError};
use crate::regions::Region;
use crate::simulate::simulate_daily_weather;

/// Configuration for simulated current-weather readings.
pub struct SimulatedWeatherProvider {
    seed: u64,
    /// The date readings are generated for.
    date: NaiveDate,
}

impl SimulatedWeatherProvider {
    /// Creates a provider for a fixed date. Use this in tests and replay
    /// scenarios to keep readings deterministic.
    pub fn new(seed: u64, date: NaiveDate) -> SimulatedWeatherProvider {
        SimulatedWeatherProvider { seed, date }
    }

    /// Convenience constructor for "today" in UTC.
    /// Use `new` in tests to keep them deterministic.
    pub fn for_today(seed: u64) -> SimulatedWeatherProvider {
        SimulatedWeatherProvider::new(seed, Utc::now().date_naive())
    }

    /// Derives a per-(region, date) stream seed so each region gets an
    /// independent but reproducible draw.
    fn stream_seed(&self, region: &Region) -> u64 {
        // FNV-1a over the region name, mixed with the base seed and the
        // day number.
        let mut hash: u64 = 0xcbf2_9ce4_8422_2325;
        for byte in region.name.bytes() {
            hash ^= byte as u64;
            hash = hash.wrapping_mul(0x0000_0100_0000_01b3);
        }
        self.seed
            .wrapping_add(hash)
            .wrapping_add(self.date.num_days_from_ce() as u64)
    }
}

impl WeatherProvider for SimulatedWeatherProvider {
    fn current_weather(&self, region: &Region) -> Result<CurrentWeather, WeatherApiError> {
        let mut rng = StdRng::seed_from_u64(self.stream_seed(region));
        let record = simulate_daily_weather(&mut rng, region, self.date);

        let conditions = if record.rainfall_mm > 10.0 {
            "Rain showers"
        } else if record.rainfall_mm > 1.0 {
            "Scattered showers"
        } else if record.humidity_percent > 75.0 {
            "Mostly cloudy"
        } else {
            "Partly sunny"
        };

        // Simulated observations are stamped at local midday.
        let observed_at = format!("{}T12:00:00+03:00", self.date.format("%Y-%m-%d"));

        Ok(CurrentWeather {
            city: region.name.to_string(),
            temperature_c: record.temperature_c,
            humidity_percent: Some(record.humidity_percent),
            rainfall_24h_mm: record.rainfall_mm,
            wind_speed_kmh: Some(record.wind_speed_kmh),
            conditions: conditions.to_string(),
            observed_at,
        })
    }

    fn source(&self) -> WeatherSource {
        WeatherSource::Simulated
    }
}
