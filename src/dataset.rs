/// Dataset CSV storage for the EcoSentinel service.
///
/// Reads and writes the five dataset tables under a data directory. The
/// format is plain comma-separated text with a header row; none of the
/// values contain commas, so no quoting is needed. Loading is
/// header-aware: columns are located by name, so column order in a file
/// does not matter.
///
/// A missing file is not an error - the corresponding table is simply
/// `None` and downstream analysis marks it unavailable. A present but
/// malformed file IS an error: the loader is the validation boundary, and
/// the aggregator downstream assumes well-formed records.

use std::fs;
use std::path::Path;

use chrono::NaiveDate;

use crate::model::{
    AirQualityRecord, EnvironmentalIndicators, FloodEvent, FloodRiskFactors, FloodSeverity,
    RiskLevel, WeatherRecord,
};

/// Table file names under the data directory.
pub const WEATHER_FILE: &str = "weather_data.csv";
pub const AIR_QUALITY_FILE: &str = "air_quality_data.csv";
pub const FLOOD_EVENTS_FILE: &str = "flood_events.csv";
pub const FLOOD_RISK_FILE: &str = "flood_risk_factors.csv";
pub const INDICATORS_FILE: &str = "environmental_indicators.csv";

/// The in-memory dataset bundle handed to the aggregator. Each table is
/// `None` when its file was absent at load time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Datasets {
    pub weather: Option<Vec<WeatherRecord>>,
    pub air_quality: Option<Vec<AirQualityRecord>>,
    pub flood_events: Option<Vec<FloodEvent>>,
    pub flood_risk_factors: Option<Vec<FloodRiskFactors>>,
    pub environmental_indicators: Option<Vec<EnvironmentalIndicators>>,
}

impl Datasets {
    /// Number of tables present.
    pub fn loaded_tables(&self) -> usize {
        [
            self.weather.is_some(),
            self.air_quality.is_some(),
            self.flood_events.is_some(),
            self.flood_risk_factors.is_some(),
            self.environmental_indicators.is_some(),
        ]
        .iter()
        .filter(|&&present| present)
        .count()
    }
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise when reading or writing dataset files.
#[derive(Debug, PartialEq)]
pub enum DatasetError {
    /// Filesystem failure reading or writing a table file.
    Io { file: String, message: String },
    /// A required column is missing from a file's header row.
    MissingColumn { file: String, column: String },
    /// A row contains a value that cannot be parsed (1-based line number).
    Parse { file: String, line: usize, message: String },
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Io { file, message } => write!(f, "I/O error in {}: {}", file, message),
            DatasetError::MissingColumn { file, column } => {
                write!(f, "Missing column '{}' in {}", column, file)
            }
            DatasetError::Parse { file, line, message } => {
                write!(f, "Parse error in {} line {}: {}", file, line, message)
            }
        }
    }
}

impl std::error::Error for DatasetError {}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

/// Loads whichever dataset files exist under `dir`.
pub fn load_datasets(dir: &Path) -> Result<Datasets, DatasetError> {
    Ok(Datasets {
        weather: load_optional(dir, WEATHER_FILE, parse_weather_csv)?,
        air_quality: load_optional(dir, AIR_QUALITY_FILE, parse_air_quality_csv)?,
        flood_events: load_optional(dir, FLOOD_EVENTS_FILE, parse_flood_events_csv)?,
        flood_risk_factors: load_optional(dir, FLOOD_RISK_FILE, parse_flood_risk_csv)?,
        environmental_indicators: load_optional(dir, INDICATORS_FILE, parse_indicators_csv)?,
    })
}

fn load_optional<T>(
    dir: &Path,
    file: &str,
    parser: fn(&str, &str) -> Result<Vec<T>, DatasetError>,
) -> Result<Option<Vec<T>>, DatasetError> {
    let path = dir.join(file);
    if !path.exists() {
        return Ok(None);
    }
    let text = fs::read_to_string(&path).map_err(|e| DatasetError::Io {
        file: file.to_string(),
        message: e.to_string(),
    })?;
    parser(&text, file).map(Some)
}

/// Locates each required column's position in a header row.
fn header_indices(
    header: &str,
    required: &[&str],
    file: &str,
) -> Result<Vec<usize>, DatasetError> {
    let columns: Vec<&str> = header.split(',').map(str::trim).collect();
    required
        .iter()
        .map(|&name| {
            columns
                .iter()
                .position(|&c| c == name)
                .ok_or_else(|| DatasetError::MissingColumn {
                    file: file.to_string(),
                    column: name.to_string(),
                })
        })
        .collect()
}

/// Splits a data row and checks it covers every required column index.
fn split_row<'a>(
    row: &'a str,
    indices: &[usize],
    file: &str,
    line: usize,
) -> Result<Vec<&'a str>, DatasetError> {
    let fields: Vec<&str> = row.split(',').map(str::trim).collect();
    let needed = indices.iter().copied().max().unwrap_or(0);
    if fields.len() <= needed {
        return Err(DatasetError::Parse {
            file: file.to_string(),
            line,
            message: format!("expected at least {} fields, got {}", needed + 1, fields.len()),
        });
    }
    Ok(fields)
}

fn parse_f64(field: &str, file: &str, line: usize) -> Result<f64, DatasetError> {
    field.parse().map_err(|_| DatasetError::Parse {
        file: file.to_string(),
        line,
        message: format!("expected a number, got '{}'", field),
    })
}

fn parse_u64(field: &str, file: &str, line: usize) -> Result<u64, DatasetError> {
    field.parse().map_err(|_| DatasetError::Parse {
        file: file.to_string(),
        line,
        message: format!("expected an integer, got '{}'", field),
    })
}

fn parse_u32(field: &str, file: &str, line: usize) -> Result<u32, DatasetError> {
    field.parse().map_err(|_| DatasetError::Parse {
        file: file.to_string(),
        line,
        message: format!("expected an integer, got '{}'", field),
    })
}

fn parse_date(field: &str, file: &str, line: usize) -> Result<NaiveDate, DatasetError> {
    NaiveDate::parse_from_str(field, "%Y-%m-%d").map_err(|_| DatasetError::Parse {
        file: file.to_string(),
        line,
        message: format!("expected a YYYY-MM-DD date, got '{}'", field),
    })
}

/// Runs `build` over every data row of a CSV text, with 1-based line
/// numbers for error reporting. Blank lines are skipped.
fn parse_rows<T>(
    text: &str,
    file: &str,
    required: &[&str],
    build: impl Fn(&[&str], &[usize], usize) -> Result<T, DatasetError>,
) -> Result<Vec<T>, DatasetError> {
    let mut lines = text.lines();
    let header = lines.next().ok_or_else(|| DatasetError::Parse {
        file: file.to_string(),
        line: 1,
        message: "empty file (missing header row)".to_string(),
    })?;
    let indices = header_indices(header, required, file)?;

    let mut records = Vec::new();
    for (offset, row) in lines.enumerate() {
        let line = offset + 2; // 1-based, after the header
        if row.trim().is_empty() {
            continue;
        }
        let fields = split_row(row, &indices, file, line)?;
        records.push(build(&fields, &indices, line)?);
    }
    Ok(records)
}

fn parse_weather_csv(text: &str, file: &str) -> Result<Vec<WeatherRecord>, DatasetError> {
    const COLUMNS: &[&str] = &[
        "date", "region", "latitude", "longitude", "elevation",
        "temperature_c", "rainfall_mm", "humidity_percent", "wind_speed_kmh", "pressure_hpa",
    ];
    parse_rows(text, file, COLUMNS, |fields, idx, line| {
        Ok(WeatherRecord {
            date: parse_date(fields[idx[0]], file, line)?,
            region: fields[idx[1]].to_string(),
            latitude: parse_f64(fields[idx[2]], file, line)?,
            longitude: parse_f64(fields[idx[3]], file, line)?,
            elevation_m: parse_f64(fields[idx[4]], file, line)?,
            temperature_c: parse_f64(fields[idx[5]], file, line)?,
            rainfall_mm: parse_f64(fields[idx[6]], file, line)?,
            humidity_percent: parse_f64(fields[idx[7]], file, line)?,
            wind_speed_kmh: parse_f64(fields[idx[8]], file, line)?,
            pressure_hpa: parse_f64(fields[idx[9]], file, line)?,
        })
    })
}

fn parse_air_quality_csv(text: &str, file: &str) -> Result<Vec<AirQualityRecord>, DatasetError> {
    const COLUMNS: &[&str] = &[
        "date", "region", "latitude", "longitude", "pm25_ugm3", "pm10_ugm3",
        "no2_ugm3", "so2_ugm3", "o3_ugm3", "aqi", "aqi_category",
    ];
    parse_rows(text, file, COLUMNS, |fields, idx, line| {
        Ok(AirQualityRecord {
            date: parse_date(fields[idx[0]], file, line)?,
            region: fields[idx[1]].to_string(),
            latitude: parse_f64(fields[idx[2]], file, line)?,
            longitude: parse_f64(fields[idx[3]], file, line)?,
            pm25_ugm3: parse_f64(fields[idx[4]], file, line)?,
            pm10_ugm3: parse_f64(fields[idx[5]], file, line)?,
            no2_ugm3: parse_f64(fields[idx[6]], file, line)?,
            so2_ugm3: parse_f64(fields[idx[7]], file, line)?,
            o3_ugm3: parse_f64(fields[idx[8]], file, line)?,
            aqi: parse_f64(fields[idx[9]], file, line)?,
            aqi_category: fields[idx[10]].to_string(),
        })
    })
}

fn parse_flood_events_csv(text: &str, file: &str) -> Result<Vec<FloodEvent>, DatasetError> {
    const COLUMNS: &[&str] = &[
        "date", "region", "latitude", "longitude", "severity", "affected_area_km2",
        "estimated_affected_population", "duration_hours", "max_water_level_m",
        "economic_impact_usd",
    ];
    parse_rows(text, file, COLUMNS, |fields, idx, line| {
        let severity_name = fields[idx[4]];
        let severity =
            FloodSeverity::from_name(severity_name).ok_or_else(|| DatasetError::Parse {
                file: file.to_string(),
                line,
                message: format!("unknown flood severity '{}'", severity_name),
            })?;
        Ok(FloodEvent {
            date: parse_date(fields[idx[0]], file, line)?,
            region: fields[idx[1]].to_string(),
            latitude: parse_f64(fields[idx[2]], file, line)?,
            longitude: parse_f64(fields[idx[3]], file, line)?,
            severity,
            affected_area_km2: parse_f64(fields[idx[5]], file, line)?,
            estimated_affected_population: parse_u64(fields[idx[6]], file, line)?,
            duration_hours: parse_u32(fields[idx[7]], file, line)?,
            max_water_level_m: parse_f64(fields[idx[8]], file, line)?,
            economic_impact_usd: parse_u64(fields[idx[9]], file, line)?,
        })
    })
}

fn parse_flood_risk_csv(text: &str, file: &str) -> Result<Vec<FloodRiskFactors>, DatasetError> {
    const COLUMNS: &[&str] = &[
        "region", "latitude", "longitude", "elevation", "population",
        "elevation_risk_factor", "population_risk_factor", "water_proximity_risk_factor",
        "drainage_infrastructure_score", "overall_flood_risk_score", "risk_category",
    ];
    parse_rows(text, file, COLUMNS, |fields, idx, line| {
        let category_name = fields[idx[10]];
        let risk_category =
            RiskLevel::from_name(category_name).ok_or_else(|| DatasetError::Parse {
                file: file.to_string(),
                line,
                message: format!("unknown risk category '{}'", category_name),
            })?;
        Ok(FloodRiskFactors {
            region: fields[idx[0]].to_string(),
            latitude: parse_f64(fields[idx[1]], file, line)?,
            longitude: parse_f64(fields[idx[2]], file, line)?,
            elevation_m: parse_f64(fields[idx[3]], file, line)?,
            population: parse_u64(fields[idx[4]], file, line)?,
            elevation_risk_factor: parse_f64(fields[idx[5]], file, line)?,
            population_risk_factor: parse_f64(fields[idx[6]], file, line)?,
            water_proximity_risk_factor: parse_f64(fields[idx[7]], file, line)?,
            drainage_infrastructure_score: parse_f64(fields[idx[8]], file, line)?,
            overall_flood_risk_score: parse_f64(fields[idx[9]], file, line)?,
            risk_category,
        })
    })
}

fn parse_indicators_csv(
    text: &str,
    file: &str,
) -> Result<Vec<EnvironmentalIndicators>, DatasetError> {
    const COLUMNS: &[&str] = &[
        "region", "latitude", "longitude", "forest_cover_percent", "water_quality_index",
        "soil_health_index", "biodiversity_index", "air_quality_annual_avg",
        "waste_management_score", "renewable_energy_percent", "last_updated",
    ];
    parse_rows(text, file, COLUMNS, |fields, idx, line| {
        Ok(EnvironmentalIndicators {
            region: fields[idx[0]].to_string(),
            latitude: parse_f64(fields[idx[1]], file, line)?,
            longitude: parse_f64(fields[idx[2]], file, line)?,
            forest_cover_percent: parse_f64(fields[idx[3]], file, line)?,
            water_quality_index: parse_f64(fields[idx[4]], file, line)?,
            soil_health_index: parse_f64(fields[idx[5]], file, line)?,
            biodiversity_index: parse_f64(fields[idx[6]], file, line)?,
            air_quality_annual_avg: parse_f64(fields[idx[7]], file, line)?,
            waste_management_score: parse_f64(fields[idx[8]], file, line)?,
            renewable_energy_percent: parse_f64(fields[idx[9]], file, line)?,
            last_updated: fields[idx[10]].to_string(),
        })
    })
}

// ---------------------------------------------------------------------------
// Writing
// ---------------------------------------------------------------------------

/// Writes every present table under `dir`, creating the directory if
/// needed. Absent tables are skipped, not deleted.
pub fn write_datasets(dir: &Path, datasets: &Datasets) -> Result<(), DatasetError> {
    fs::create_dir_all(dir).map_err(|e| DatasetError::Io {
        file: dir.display().to_string(),
        message: e.to_string(),
    })?;

    if let Some(records) = &datasets.weather {
        write_table(dir, WEATHER_FILE, weather_csv(records))?;
    }
    if let Some(records) = &datasets.air_quality {
        write_table(dir, AIR_QUALITY_FILE, air_quality_csv(records))?;
    }
    if let Some(events) = &datasets.flood_events {
        write_table(dir, FLOOD_EVENTS_FILE, flood_events_csv(events))?;
    }
    if let Some(factors) = &datasets.flood_risk_factors {
        write_table(dir, FLOOD_RISK_FILE, flood_risk_csv(factors))?;
    }
    if let Some(indicators) = &datasets.environmental_indicators {
        write_table(dir, INDICATORS_FILE, indicators_csv(indicators))?;
    }
    Ok(())
}

fn write_table(dir: &Path, file: &str, contents: String) -> Result<(), DatasetError> {
    fs::write(dir.join(file), contents).map_err(|e| DatasetError::Io {
        file: file.to_string(),
        message: e.to_string(),
    })
}

fn weather_csv(records: &[WeatherRecord]) -> String {
    let mut out = String::from(
        "date,region,latitude,longitude,elevation,temperature_c,rainfall_mm,\
         humidity_percent,wind_speed_kmh,pressure_hpa\n",
    );
    for r in records {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{}\n",
            r.date.format("%Y-%m-%d"),
            r.region,
            r.latitude,
            r.longitude,
            r.elevation_m,
            r.temperature_c,
            r.rainfall_mm,
            r.humidity_percent,
            r.wind_speed_kmh,
            r.pressure_hpa,
        ));
    }
    out
}

fn air_quality_csv(records: &[AirQualityRecord]) -> String {
    let mut out = String::from(
        "date,region,latitude,longitude,pm25_ugm3,pm10_ugm3,no2_ugm3,so2_ugm3,\
         o3_ugm3,aqi,aqi_category\n",
    );
    for r in records {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{}\n",
            r.date.format("%Y-%m-%d"),
            r.region,
            r.latitude,
            r.longitude,
            r.pm25_ugm3,
            r.pm10_ugm3,
            r.no2_ugm3,
            r.so2_ugm3,
            r.o3_ugm3,
            r.aqi,
            r.aqi_category,
        ));
    }
    out
}

fn flood_events_csv(events: &[FloodEvent]) -> String {
    let mut out = String::from(
        "date,region,latitude,longitude,severity,affected_area_km2,\
         estimated_affected_population,duration_hours,max_water_level_m,economic_impact_usd\n",
    );
    for e in events {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{}\n",
            e.date.format("%Y-%m-%d"),
            e.region,
            e.latitude,
            e.longitude,
            e.severity,
            e.affected_area_km2,
            e.estimated_affected_population,
            e.duration_hours,
            e.max_water_level_m,
            e.economic_impact_usd,
        ));
    }
    out
}

fn flood_risk_csv(factors: &[FloodRiskFactors]) -> String {
    let mut out = String::from(
        "region,latitude,longitude,elevation,population,elevation_risk_factor,\
         population_risk_factor,water_proximity_risk_factor,drainage_infrastructure_score,\
         overall_flood_risk_score,risk_category\n",
    );
    for f in factors {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{}\n",
            f.region,
            f.latitude,
            f.longitude,
            f.elevation_m,
            f.population,
            f.elevation_risk_factor,
            f.population_risk_factor,
            f.water_proximity_risk_factor,
            f.drainage_infrastructure_score,
            f.overall_flood_risk_score,
            f.risk_category,
        ));
    }
    out
}

fn indicators_csv(indicators: &[EnvironmentalIndicators]) -> String {
    let mut out = String::from(
        "region,latitude,longitude,forest_cover_percent,water_quality_index,\
         soil_health_index,biodiversity_index,air_quality_annual_avg,\
         waste_management_score,renewable_energy_percent,last_updated\n",
    );
    for i in indicators {
        out.push_str(&format!(
            "{},{},{},{},{},{},{},{},{},{},{}\n",
            i.region,
            i.latitude,
            i.longitude,
            i.forest_cover_percent,
            i.water_quality_index,
            i.soil_health_index,
            i.biodiversity_index,
            i.air_quality_annual_avg,
            i.waste_management_score,
            i.renewable_energy_percent,
            i.last_updated,
        ));
    }
    out
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_weather_rows() {
        let csv = "date,region,latitude,longitude,elevation,temperature_c,rainfall_mm,\
                   humidity_percent,wind_speed_kmh,pressure_hpa\n\
                   2023-01-05,Nairobi,-1.2921,36.8219,1795,19.1,2.35,61.2,6.4,1012.7\n";
        let records = parse_weather_csv(csv, WEATHER_FILE).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].region, "Nairobi");
        assert_eq!(records[0].temperature_c, 19.1);
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2023, 1, 5).unwrap());
    }

    #[test]
    fn test_parse_tolerates_reordered_columns() {
        // Columns located by name, not position.
        let csv = "region,date,latitude,longitude,elevation,temperature_c,rainfall_mm,\
                   humidity_percent,wind_speed_kmh,pressure_hpa\n\
                   Nairobi,2023-01-05,-1.2921,36.8219,1795,19.1,2.35,61.2,6.4,1012.7\n";
        let records = parse_weather_csv(csv, WEATHER_FILE).unwrap();
        assert_eq!(records[0].region, "Nairobi");
        assert_eq!(records[0].date, NaiveDate::from_ymd_opt(2023, 1, 5).unwrap());
    }

    #[test]
    fn test_parse_skips_blank_lines() {
        let csv = "date,region,latitude,longitude,elevation,temperature_c,rainfall_mm,\
                   humidity_percent,wind_speed_kmh,pressure_hpa\n\
                   \n\
                   2023-01-05,Nairobi,-1.2921,36.8219,1795,19.1,2.35,61.2,6.4,1012.7\n\
                   \n";
        let records = parse_weather_csv(csv, WEATHER_FILE).unwrap();
        assert_eq!(records.len(), 1);
    }

    #[test]
    fn test_malformed_number_reports_file_and_line() {
        let csv = "date,region,latitude,longitude,elevation,temperature_c,rainfall_mm,\
                   humidity_percent,wind_speed_kmh,pressure_hpa\n\
                   2023-01-05,Nairobi,-1.2921,36.8219,1795,not-a-number,2.35,61.2,6.4,1012.7\n";
        let err = parse_weather_csv(csv, WEATHER_FILE).unwrap_err();
        match err {
            DatasetError::Parse { file, line, message } => {
                assert_eq!(file, WEATHER_FILE);
                assert_eq!(line, 2);
                assert!(message.contains("not-a-number"));
            }
            other => panic!("expected Parse error, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_column_is_reported() {
        let csv = "date,region\n2023-01-05,Nairobi\n";
        let err = parse_weather_csv(csv, WEATHER_FILE).unwrap_err();
        assert_eq!(
            err,
            DatasetError::MissingColumn {
                file: WEATHER_FILE.to_string(),
                column: "latitude".to_string(),
            }
        );
    }

    #[test]
    fn test_truncated_row_is_a_parse_error() {
        let csv = "date,region,latitude,longitude,elevation,temperature_c,rainfall_mm,\
                   humidity_percent,wind_speed_kmh,pressure_hpa\n\
                   2023-01-05,Nairobi,-1.2921\n";
        let err = parse_weather_csv(csv, WEATHER_FILE).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_unknown_flood_severity_is_a_parse_error() {
        let csv = "date,region,latitude,longitude,severity,affected_area_km2,\
                   estimated_affected_population,duration_hours,max_water_level_m,\
                   economic_impact_usd\n\
                   2020-05-20,Kisumu,-0.0917,34.768,Apocalyptic,45,45000,36,2.1,1000000\n";
        let err = parse_flood_events_csv(csv, FLOOD_EVENTS_FILE).unwrap_err();
        assert!(matches!(err, DatasetError::Parse { line: 2, .. }));
    }

    #[test]
    fn test_load_missing_directory_yields_empty_bundle() {
        let datasets =
            load_datasets(Path::new("/nonexistent/ecosentinel-data")).expect("missing files are not errors");
        assert_eq!(datasets.loaded_tables(), 0);
        assert!(datasets.weather.is_none());
    }

    #[test]
    fn test_write_then_load_roundtrip() {
        let dir = std::env::temp_dir().join(format!(
            "ecosentinel_dataset_test_{}",
            std::process::id()
        ));

        let weather = WeatherRecord {
            date: NaiveDate::from_ymd_opt(2023, 1, 5).unwrap(),
            region: "Mombasa".to_string(),
            latitude: -4.0435,
            longitude: 39.6682,
            elevation_m: 17.0,
            temperature_c: 28.4,
            rainfall_mm: 6.25,
            humidity_percent: 78.0,
            wind_speed_kmh: 11.2,
            pressure_hpa: 1009.3,
        };
        let datasets = Datasets {
            weather: Some(vec![weather.clone()]),
            ..Datasets::default()
        };

        write_datasets(&dir, &datasets).expect("write should succeed");
        let loaded = load_datasets(&dir).expect("load should succeed");
        fs::remove_dir_all(&dir).ok();

        assert_eq!(loaded.weather, Some(vec![weather]));
        // Tables that were never written stay absent.
        assert!(loaded.air_quality.is_none());
        assert_eq!(loaded.loaded_tables(), 1);
    }
}
