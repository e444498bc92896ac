/// Sample-dataset simulation for the EcoSentinel service.
///
/// Generates the five dataset tables with realistic regional patterns:
/// elevation-driven temperatures with seasonal sine cycles, bimodal rainy
/// seasons (March-May and October-December), dust-driven dry-season
/// pollution spikes, the fixed historical flood event list, derived
/// flood-risk factors, and per-region environmental indicators.
///
/// Every generator draws from a caller-supplied `rand::Rng`. Seeding that
/// generator makes the whole dataset reproducible; nothing here touches a
/// process-wide random source.

use chrono::{Datelike, NaiveDate};
use rand::Rng;
use rand_distr::{Distribution, Exp, Normal};

use crate::analysis::round_to;
use crate::dataset::Datasets;
use crate::model::{
    AirQualityRecord, EnvironmentalIndicators, FloodEvent, FloodRiskFactors, FloodSeverity,
    WeatherRecord,
};
use crate::regions::{ClimateZone, Region, REGION_REGISTRY};
use crate::scoring::air_quality::AqiCategory;
use crate::scoring::classify_risk_level;

/// Default temporal coverage of the generated datasets.
pub fn default_start_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).expect("valid date")
}

pub fn default_end_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 12, 31).expect("valid date")
}

fn normal<R: Rng + ?Sized>(rng: &mut R, mean: f64, std_dev: f64) -> f64 {
    Normal::new(mean, std_dev).expect("std_dev is positive").sample(rng)
}

/// Exponential draw parameterized by scale (mean), not rate.
fn exponential<R: Rng + ?Sized>(rng: &mut R, scale: f64) -> f64 {
    Exp::new(1.0 / scale).expect("scale is positive").sample(rng)
}

// ---------------------------------------------------------------------------
// Weather
// ---------------------------------------------------------------------------

/// Months of the two Kenyan rainy seasons (long rains Mar-May, short
/// rains Oct-Dec).
fn is_wet_month(month: u32) -> bool {
    matches!(month, 3..=5 | 10..=12)
}

/// Generates one day of weather for a region.
///
/// Shared by the bulk generator and the simulated weather provider so a
/// dev-mode "current" reading has the same statistical shape as the
/// historical tables.
pub fn simulate_daily_weather<R: Rng + ?Sized>(
    rng: &mut R,
    region: &Region,
    date: NaiveDate,
) -> WeatherRecord {
    let day_of_year = date.ordinal() as f64;
    let annual_cycle = (2.0 * std::f64::consts::PI * day_of_year / 365.0).sin();

    // Temperature falls with elevation; the seasonal swing lags the
    // calendar by an eighth of a year.
    let base_temp = 25.0 - region.elevation_m / 300.0;
    let seasonal_temp = 3.0
        * (2.0 * std::f64::consts::PI * day_of_year / 365.0 - std::f64::consts::FRAC_PI_4).sin();
    let temperature = base_temp + seasonal_temp + normal(rng, 0.0, 2.0);

    let base_rainfall = match region.zone {
        ClimateZone::Arid => 0.5,
        ClimateZone::Coastal => 3.0,
        ClimateZone::Highland => 2.0,
    };
    let rainfall = if is_wet_month(date.month()) {
        base_rainfall * (2.0 + exponential(rng, 1.0))
    } else {
        base_rainfall * exponential(rng, 0.3)
    };

    let humidity = match region.zone {
        ClimateZone::Coastal => 70.0 + 15.0 * annual_cycle + normal(rng, 0.0, 5.0),
        ClimateZone::Arid => 30.0 + 10.0 * annual_cycle + normal(rng, 0.0, 3.0),
        ClimateZone::Highland => 50.0 + 20.0 * annual_cycle + normal(rng, 0.0, 5.0),
    };
    let humidity = humidity.clamp(10.0, 95.0);

    let wind_speed = (5.0 + 3.0 * annual_cycle + normal(rng, 0.0, 2.0)).max(0.0);

    WeatherRecord {
        date,
        region: region.name.to_string(),
        latitude: region.latitude,
        longitude: region.longitude,
        elevation_m: region.elevation_m,
        temperature_c: round_to(temperature, 1),
        rainfall_mm: round_to(rainfall.max(0.0), 2),
        humidity_percent: round_to(humidity, 1),
        wind_speed_kmh: round_to(wind_speed, 1),
        pressure_hpa: round_to(1013.0 + normal(rng, 0.0, 10.0), 1),
    }
}

/// Generates daily weather for every registered region over a date range.
pub fn simulate_weather<R: Rng + ?Sized>(
    rng: &mut R,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<WeatherRecord> {
    let mut records = Vec::new();
    for region in REGION_REGISTRY {
        let mut date = start;
        while date <= end {
            records.push(simulate_daily_weather(rng, region, date));
            date = date.succ_opt().expect("date range within calendar bounds");
        }
    }
    records
}

// ---------------------------------------------------------------------------
// Air quality
// ---------------------------------------------------------------------------

/// Pollutant whose concentration is being converted to an AQI value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pollutant {
    Pm25,
    Pm10,
}

/// US EPA AQI breakpoints: (concentration lo, hi, AQI lo, hi).
const PM25_BREAKPOINTS: &[(f64, f64, f64, f64)] = &[
    (0.0, 12.0, 0.0, 50.0),
    (12.1, 35.4, 51.0, 100.0),
    (35.5, 55.4, 101.0, 150.0),
    (55.5, 150.4, 151.0, 200.0),
    (150.5, 250.4, 201.0, 300.0),
    (250.5, 500.4, 301.0, 500.0),
];

const PM10_BREAKPOINTS: &[(f64, f64, f64, f64)] = &[
    (0.0, 54.0, 0.0, 50.0),
    (55.0, 154.0, 51.0, 100.0),
    (155.0, 254.0, 101.0, 150.0),
    (255.0, 354.0, 151.0, 200.0),
    (355.0, 424.0, 201.0, 300.0),
    (425.0, 604.0, 301.0, 500.0),
];

/// Piecewise-linear AQI for a particulate concentration in µg/m³.
/// Concentrations above the top breakpoint saturate at 500.
pub fn aqi_from_concentration(concentration: f64, pollutant: Pollutant) -> f64 {
    let breakpoints = match pollutant {
        Pollutant::Pm25 => PM25_BREAKPOINTS,
        Pollutant::Pm10 => PM10_BREAKPOINTS,
    };

    for &(bp_lo, bp_hi, aqi_lo, aqi_hi) in breakpoints {
        if concentration <= bp_hi {
            let clamped = concentration.max(bp_lo);
            return (aqi_hi - aqi_lo) / (bp_hi - bp_lo) * (clamped - bp_lo) + aqi_lo;
        }
    }
    500.0
}

/// Dry months carry more dust: Dec-Feb and Jun-Aug.
fn dry_season_factor(month: u32) -> f64 {
    if matches!(month, 12 | 1 | 2 | 6..=8) {
        1.3
    } else {
        0.8
    }
}

/// Baseline particulate levels (PM2.5, PM10) by region character.
fn baseline_particulates(region: &Region) -> (f64, f64) {
    match region.name {
        "Nairobi" => (25.0, 40.0),  // major city traffic and industry
        "Mombasa" => (20.0, 35.0),  // coastal city, sea breeze dilution
        _ if region.zone == ClimateZone::Arid => (30.0, 60.0), // dust
        _ => (15.0, 25.0),          // rural and smaller towns
    }
}

/// Generates daily air-quality records for every region over a date range.
pub fn simulate_air_quality<R: Rng + ?Sized>(
    rng: &mut R,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<AirQualityRecord> {
    let mut records = Vec::new();
    for region in REGION_REGISTRY {
        let (base_pm25, base_pm10) = baseline_particulates(region);

        let mut date = start;
        while date <= end {
            let seasonal = dry_season_factor(date.month());

            let pm25 = (base_pm25 * seasonal + normal(rng, 0.0, 5.0)).max(5.0);
            // PM10 includes the PM2.5 fraction, so it can never be smaller.
            let pm10 = (base_pm10 * seasonal + normal(rng, 0.0, 8.0)).max(pm25);

            let aqi = round_to(
                aqi_from_concentration(pm25, Pollutant::Pm25)
                    .max(aqi_from_concentration(pm10, Pollutant::Pm10)),
                0,
            );

            records.push(AirQualityRecord {
                date,
                region: region.name.to_string(),
                latitude: region.latitude,
                longitude: region.longitude,
                pm25_ugm3: round_to(pm25, 1),
                pm10_ugm3: round_to(pm10, 1),
                no2_ugm3: round_to((15.0 + normal(rng, 0.0, 5.0)).max(5.0), 1),
                so2_ugm3: round_to((8.0 + normal(rng, 0.0, 3.0)).max(1.0), 1),
                o3_ugm3: round_to((80.0 + normal(rng, 0.0, 15.0)).max(20.0), 1),
                aqi,
                aqi_category: AqiCategory::from_aqi(aqi).to_string(),
            });
            date = date.succ_opt().expect("date range within calendar bounds");
        }
    }
    records
}

// ---------------------------------------------------------------------------
// Flood events and risk factors
// ---------------------------------------------------------------------------

/// The documented historical flood events: (year, month, day, region,
/// severity, affected area km²). Impact fields not on record are drawn
/// randomly per generation.
const HISTORICAL_FLOODS: &[(i32, u32, u32, &str, FloodSeverity, f64)] = &[
    (2020, 4, 15, "Nairobi", FloodSeverity::Moderate, 25.0),
    (2020, 5, 20, "Kisumu", FloodSeverity::Severe, 45.0),
    (2021, 3, 10, "Mombasa", FloodSeverity::Moderate, 15.0),
    (2021, 11, 8, "Turkana", FloodSeverity::Severe, 120.0),
    (2022, 4, 22, "Eldoret", FloodSeverity::Minor, 8.0),
    (2022, 10, 12, "Nakuru", FloodSeverity::Moderate, 18.0),
    (2023, 3, 18, "Kitui", FloodSeverity::Severe, 35.0),
    (2023, 11, 25, "Machakos", FloodSeverity::Minor, 12.0),
    (2024, 4, 5, "Nyeri", FloodSeverity::Moderate, 22.0),
];

/// Generates the historical flood event table.
pub fn simulate_flood_events<R: Rng + ?Sized>(rng: &mut R) -> Vec<FloodEvent> {
    HISTORICAL_FLOODS
        .iter()
        .filter_map(|&(year, month, day, name, severity, area_km2)| {
            let region = crate::regions::find_region(name)?;
            Some(FloodEvent {
                date: NaiveDate::from_ymd_opt(year, month, day).expect("valid event date"),
                region: name.to_string(),
                latitude: region.latitude,
                longitude: region.longitude,
                severity,
                affected_area_km2: area_km2,
                estimated_affected_population: region
                    .population
                    .min((area_km2 * 1000.0) as u64),
                duration_hours: rng.gen_range(6..72),
                max_water_level_m: round_to(rng.gen_range(0.5..3.0), 1),
                economic_impact_usd: rng.gen_range(100_000..5_000_000),
            })
        })
        .collect()
}

/// Derives the static flood-risk factor table from the region registry.
/// Fully deterministic: geography and infrastructure, no random draws.
pub fn derive_flood_risk_factors() -> Vec<FloodRiskFactors> {
    REGION_REGISTRY
        .iter()
        .map(|region| {
            let elevation_risk = (1.0 - region.elevation_m / 2000.0).max(0.0);
            let population_risk = (region.population as f64 / 1_000_000.0).min(1.0);
            let overall = (elevation_risk
                + population_risk
                + region.water_proximity_risk
                + (1.0 - region.drainage_score))
                / 4.0;

            FloodRiskFactors {
                region: region.name.to_string(),
                latitude: region.latitude,
                longitude: region.longitude,
                elevation_m: region.elevation_m,
                population: region.population,
                elevation_risk_factor: round_to(elevation_risk, 2),
                population_risk_factor: round_to(population_risk, 2),
                water_proximity_risk_factor: round_to(region.water_proximity_risk, 2),
                drainage_infrastructure_score: round_to(region.drainage_score, 2),
                overall_flood_risk_score: round_to(overall, 2),
                risk_category: classify_risk_level(overall),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Environmental indicators
// ---------------------------------------------------------------------------

/// Generates the annual environmental indicator table.
pub fn simulate_environmental_indicators<R: Rng + ?Sized>(
    rng: &mut R,
) -> Vec<EnvironmentalIndicators> {
    REGION_REGISTRY
        .iter()
        .map(|region| {
            let arid = region.zone == ClimateZone::Arid;

            let forest_cover = match region.name {
                "Nyeri" | "Eldoret" => rng.gen_range(15.0..35.0), // forested highlands
                "Nairobi" | "Nakuru" => rng.gen_range(5.0..15.0), // urbanized
                _ if arid => rng.gen_range(1.0..5.0),
                _ => rng.gen_range(8.0..20.0),
            };
            let water_quality = match region.name {
                "Nairobi" | "Mombasa" => rng.gen_range(45.0..65.0), // urban pollution
                _ if arid => rng.gen_range(35.0..55.0),             // scarcity stress
                _ => rng.gen_range(60.0..85.0),
            };
            let soil_health = match region.name {
                _ if arid => rng.gen_range(25.0..45.0),
                "Nyeri" | "Kitui" => rng.gen_range(65.0..85.0), // agricultural belts
                _ => rng.gen_range(50.0..70.0),
            };
            let biodiversity = match region.name {
                "Mombasa" | "Turkana" => rng.gen_range(70.0..90.0), // unique ecosystems
                "Nairobi" => rng.gen_range(30.0..50.0),
                _ => rng.gen_range(50.0..75.0),
            };

            EnvironmentalIndicators {
                region: region.name.to_string(),
                latitude: region.latitude,
                longitude: region.longitude,
                forest_cover_percent: round_to(forest_cover, 1),
                water_quality_index: round_to(water_quality, 1),
                soil_health_index: round_to(soil_health, 1),
                biodiversity_index: round_to(biodiversity, 1),
                air_quality_annual_avg: round_to(rng.gen_range(15.0..45.0), 1),
                waste_management_score: round_to(rng.gen_range(30.0..80.0), 1),
                renewable_energy_percent: round_to(rng.gen_range(10.0..60.0), 1),
                last_updated: "2024-12-01".to_string(),
            }
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Full bundle
// ---------------------------------------------------------------------------

/// Generates all five tables over a date range.
pub fn simulate_datasets<R: Rng + ?Sized>(
    rng: &mut R,
    start: NaiveDate,
    end: NaiveDate,
) -> Datasets {
    Datasets {
        weather: Some(simulate_weather(rng, start, end)),
        air_quality: Some(simulate_air_quality(rng, start, end)),
        flood_events: Some(simulate_flood_events(rng)),
        flood_risk_factors: Some(derive_flood_risk_factors()),
        environmental_indicators: Some(simulate_environmental_indicators(rng)),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::RiskLevel;
    use approx::assert_relative_eq;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn short_range() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2023, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2023, 1, 31).unwrap(),
        )
    }

    #[test]
    fn test_weather_covers_every_region_and_day() {
        let (start, end) = short_range();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let records = simulate_weather(&mut rng, start, end);
        assert_eq!(records.len(), REGION_REGISTRY.len() * 31);
    }

    #[test]
    fn test_weather_values_within_physical_bounds() {
        let (start, end) = short_range();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for record in simulate_weather(&mut rng, start, end) {
            assert!(record.rainfall_mm >= 0.0, "negative rainfall in {}", record.region);
            assert!(
                (10.0..=95.0).contains(&record.humidity_percent),
                "humidity {} out of clamp range",
                record.humidity_percent
            );
            assert!(record.wind_speed_kmh >= 0.0);
        }
    }

    #[test]
    fn test_weather_is_reproducible_under_fixed_seed() {
        let (start, end) = short_range();
        let mut rng_a = ChaCha8Rng::seed_from_u64(42);
        let mut rng_b = ChaCha8Rng::seed_from_u64(42);
        assert_eq!(
            simulate_weather(&mut rng_a, start, end),
            simulate_weather(&mut rng_b, start, end)
        );
    }

    #[test]
    fn test_highland_is_cooler_than_coast_on_average() {
        // Elevation drives the temperature baseline: Eldoret at 2085 m
        // must average well below Mombasa at sea level.
        let (start, end) = short_range();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let records = simulate_weather(&mut rng, start, end);

        let avg = |name: &str| {
            let temps: Vec<f64> = records
                .iter()
                .filter(|r| r.region == name)
                .map(|r| r.temperature_c)
                .collect();
            temps.iter().sum::<f64>() / temps.len() as f64
        };
        assert!(avg("Eldoret") + 5.0 < avg("Mombasa"));
    }

    #[test]
    fn test_aqi_breakpoint_interpolation() {
        assert_relative_eq!(aqi_from_concentration(0.0, Pollutant::Pm25), 0.0);
        assert_relative_eq!(aqi_from_concentration(12.0, Pollutant::Pm25), 50.0);
        assert_relative_eq!(aqi_from_concentration(35.4, Pollutant::Pm25), 100.0);
        assert_relative_eq!(aqi_from_concentration(54.0, Pollutant::Pm10), 50.0);
        // Saturates above the top of the table.
        assert_relative_eq!(aqi_from_concentration(700.0, Pollutant::Pm25), 500.0);
        assert_relative_eq!(aqi_from_concentration(700.0, Pollutant::Pm10), 500.0);
    }

    #[test]
    fn test_air_quality_invariants() {
        let (start, end) = short_range();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for record in simulate_air_quality(&mut rng, start, end) {
            assert!(record.pm25_ugm3 >= 5.0);
            assert!(
                record.pm10_ugm3 >= record.pm25_ugm3,
                "PM10 {} below PM2.5 {} in {}",
                record.pm10_ugm3,
                record.pm25_ugm3,
                record.region
            );
            assert!((0.0..=500.0).contains(&record.aqi));
            assert_eq!(
                record.aqi_category,
                AqiCategory::from_aqi(record.aqi).to_string(),
                "stored category inconsistent with AQI value"
            );
        }
    }

    #[test]
    fn test_arid_regions_dustier_than_rural_highlands() {
        let (start, end) = short_range();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let records = simulate_air_quality(&mut rng, start, end);

        let avg_pm10 = |name: &str| {
            let values: Vec<f64> = records
                .iter()
                .filter(|r| r.region == name)
                .map(|r| r.pm10_ugm3)
                .collect();
            values.iter().sum::<f64>() / values.len() as f64
        };
        assert!(avg_pm10("Mandera") > avg_pm10("Nyeri"));
    }

    #[test]
    fn test_flood_events_match_the_historical_record() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let events = simulate_flood_events(&mut rng);
        assert_eq!(events.len(), 9);

        let kisumu: Vec<_> = events.iter().filter(|e| e.region == "Kisumu").collect();
        assert_eq!(kisumu.len(), 1);
        assert_eq!(kisumu[0].severity, FloodSeverity::Severe);
        assert_relative_eq!(kisumu[0].affected_area_km2, 45.0);
        assert_eq!(kisumu[0].date, NaiveDate::from_ymd_opt(2020, 5, 20).unwrap());
    }

    #[test]
    fn test_flood_event_random_fields_within_ranges() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        for event in simulate_flood_events(&mut rng) {
            assert!((6..72).contains(&event.duration_hours));
            assert!((0.5..=3.0).contains(&event.max_water_level_m));
            assert!((100_000..5_000_000).contains(&event.economic_impact_usd));
            assert!(event.estimated_affected_population > 0);
        }
    }

    #[test]
    fn test_risk_factors_worked_examples() {
        let factors = derive_flood_risk_factors();
        let mombasa = factors.iter().find(|f| f.region == "Mombasa").unwrap();
        // elevation 17 m -> 0.99, population 1.2M -> capped at 1.0,
        // water 0.8, drainage 0.7: overall (0.99 + 1.0 + 0.8 + 0.3)/4.
        assert_relative_eq!(mombasa.elevation_risk_factor, 0.99);
        assert_relative_eq!(mombasa.population_risk_factor, 1.0);
        assert_relative_eq!(mombasa.overall_flood_risk_score, 0.77);
        assert_eq!(mombasa.risk_category, RiskLevel::High);

        let nairobi = factors.iter().find(|f| f.region == "Nairobi").unwrap();
        assert_relative_eq!(nairobi.overall_flood_risk_score, 0.5);
        assert_eq!(nairobi.risk_category, RiskLevel::Medium);
    }

    #[test]
    fn test_risk_factors_are_deterministic() {
        assert_eq!(derive_flood_risk_factors(), derive_flood_risk_factors());
    }

    #[test]
    fn test_indicators_cover_every_region_with_bounded_values() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let indicators = simulate_environmental_indicators(&mut rng);
        assert_eq!(indicators.len(), REGION_REGISTRY.len());
        for row in &indicators {
            assert!((0.0..=100.0).contains(&row.forest_cover_percent));
            assert!((0.0..=100.0).contains(&row.water_quality_index));
            assert!((0.0..=100.0).contains(&row.soil_health_index));
            assert!((0.0..=100.0).contains(&row.biodiversity_index));
            assert_eq!(row.last_updated, "2024-12-01");
        }
    }

    #[test]
    fn test_full_bundle_populates_all_tables() {
        let (start, end) = short_range();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let datasets = simulate_datasets(&mut rng, start, end);
        assert!(datasets.weather.is_some());
        assert!(datasets.air_quality.is_some());
        assert!(datasets.flood_events.is_some());
        assert!(datasets.flood_risk_factors.is_some());
        assert!(datasets.environmental_indicators.is_some());
    }
}
