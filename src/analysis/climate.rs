/// Climate trend analysis over the weather table.
///
/// Produces per-region overall statistics, yearly aggregate series with
/// fitted trend directions, and seasonal (month-of-year) patterns.
/// Temperature and humidity aggregate as means; rainfall accumulates as a
/// yearly sum but averages per month-of-year in the seasonal view.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::model::WeatherRecord;

use super::periodic::{trend_summary, AggregateStat, Granularity, TrendSummary};
use super::trend::TrendDirection;
use super::{mean, round_to};

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

/// Date coverage of an analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisPeriod {
    pub start: String,
    pub end: String,
    pub total_days: usize,
}

/// Whole-period weather statistics, rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OverallClimate {
    pub avg_temperature_c: f64,
    pub min_temperature_c: f64,
    pub max_temperature_c: f64,
    pub total_rainfall_mm: f64,
    pub avg_humidity_percent: f64,
}

/// Yearly trend directions per tracked metric.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateTrends {
    pub temperature_trend: TrendDirection,
    pub rainfall_trend: TrendDirection,
    pub humidity_trend: TrendDirection,
}

/// Climate trend report for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClimateTrendReport {
    pub region: String,
    pub analysis_period: AnalysisPeriod,
    pub overall_statistics: OverallClimate,
    pub trends: ClimateTrends,
    /// Month-of-year patterns, collapsed across years.
    pub seasonal_patterns: Vec<TrendSummary>,
    /// Per-calendar-year aggregates; trend directions are fitted on these.
    pub yearly_summary: Vec<TrendSummary>,
}

// ---------------------------------------------------------------------------
// Analysis
// ---------------------------------------------------------------------------

/// Analyzes climate trends for `region` over an optional date range.
///
/// Returns `None` when the region has no weather records in the range -
/// an explicit no-data outcome, not an error.
pub fn analyze_climate_trends(
    records: &[WeatherRecord],
    region: &str,
    start_date: Option<NaiveDate>,
    end_date: Option<NaiveDate>,
) -> Option<ClimateTrendReport> {
    let mut matching: Vec<&WeatherRecord> = records
        .iter()
        .filter(|r| r.region == region)
        .filter(|r| start_date.map_or(true, |start| r.date >= start))
        .filter(|r| end_date.map_or(true, |end| r.date <= end))
        .collect();
    if matching.is_empty() {
        return None;
    }
    matching.sort_by_key(|r| r.date);

    let temps: Vec<(NaiveDate, f64)> =
        matching.iter().map(|r| (r.date, r.temperature_c)).collect();
    let rainfall: Vec<(NaiveDate, f64)> =
        matching.iter().map(|r| (r.date, r.rainfall_mm)).collect();
    let humidity: Vec<(NaiveDate, f64)> =
        matching.iter().map(|r| (r.date, r.humidity_percent)).collect();

    let temp_values: Vec<f64> = temps.iter().map(|(_, v)| *v).collect();
    let humidity_values: Vec<f64> = humidity.iter().map(|(_, v)| *v).collect();

    let yearly = vec![
        trend_summary("temperature_c", &temps, Granularity::Yearly, AggregateStat::Mean, 2),
        trend_summary("rainfall_mm", &rainfall, Granularity::Yearly, AggregateStat::Sum, 2),
        trend_summary("humidity_percent", &humidity, Granularity::Yearly, AggregateStat::Mean, 2),
    ];
    let seasonal = vec![
        trend_summary("temperature_c", &temps, Granularity::Seasonal, AggregateStat::Mean, 2),
        trend_summary("rainfall_mm", &rainfall, Granularity::Seasonal, AggregateStat::Mean, 2),
        trend_summary("humidity_percent", &humidity, Granularity::Seasonal, AggregateStat::Mean, 2),
    ];

    Some(ClimateTrendReport {
        region: region.to_string(),
        analysis_period: AnalysisPeriod {
            start: matching[0].date.format("%Y-%m-%d").to_string(),
            end: matching[matching.len() - 1].date.format("%Y-%m-%d").to_string(),
            total_days: matching.len(),
        },
        overall_statistics: OverallClimate {
            avg_temperature_c: round_to(mean(&temp_values), 2),
            min_temperature_c: round_to(
                temp_values.iter().copied().fold(f64::INFINITY, f64::min),
                2,
            ),
            max_temperature_c: round_to(
                temp_values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
                2,
            ),
            total_rainfall_mm: round_to(rainfall.iter().map(|(_, v)| v).sum(), 2),
            avg_humidity_percent: round_to(mean(&humidity_values), 2),
        },
        trends: ClimateTrends {
            temperature_trend: yearly[0].direction,
            rainfall_trend: yearly[1].direction,
            humidity_trend: yearly[2].direction,
        },
        seasonal_patterns: seasonal,
        yearly_summary: yearly,
    })
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn record(y: i32, m: u32, d: u32, temp: f64, rain: f64) -> WeatherRecord {
        WeatherRecord {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            region: "Nakuru".to_string(),
            latitude: -0.3,
            longitude: 36.08,
            elevation_m: 1850.0,
            temperature_c: temp,
            rainfall_mm: rain,
            humidity_percent: 55.0,
            wind_speed_kmh: 7.0,
            pressure_hpa: 1012.0,
        }
    }

    #[test]
    fn test_no_matching_records_returns_none() {
        let records = vec![record(2020, 1, 1, 20.0, 1.0)];
        assert!(analyze_climate_trends(&records, "Mombasa", None, None).is_none());
    }

    #[test]
    fn test_analysis_period_covers_sorted_range() {
        let records = vec![
            record(2021, 6, 15, 21.0, 0.0),
            record(2020, 1, 1, 20.0, 1.0),
            record(2022, 3, 10, 22.0, 3.0),
        ];
        let report = analyze_climate_trends(&records, "Nakuru", None, None).unwrap();
        assert_eq!(report.analysis_period.start, "2020-01-01");
        assert_eq!(report.analysis_period.end, "2022-03-10");
        assert_eq!(report.analysis_period.total_days, 3);
    }

    #[test]
    fn test_date_range_filters_records() {
        let records = vec![
            record(2020, 1, 1, 10.0, 0.0),
            record(2021, 1, 1, 20.0, 0.0),
            record(2022, 1, 1, 30.0, 0.0),
        ];
        let report = analyze_climate_trends(
            &records,
            "Nakuru",
            Some(NaiveDate::from_ymd_opt(2021, 1, 1).unwrap()),
            Some(NaiveDate::from_ymd_opt(2021, 12, 31).unwrap()),
        )
        .unwrap();
        assert_eq!(report.analysis_period.total_days, 1);
        assert_relative_eq!(report.overall_statistics.avg_temperature_c, 20.0);
    }

    #[test]
    fn test_warming_years_classified_increasing() {
        // One record per year, warming 2 degrees per year.
        let records: Vec<WeatherRecord> = (0..4)
            .map(|i| record(2020 + i, 1, 1, 20.0 + 2.0 * i as f64, 1.0))
            .collect();
        let report = analyze_climate_trends(&records, "Nakuru", None, None).unwrap();
        assert_eq!(report.trends.temperature_trend, TrendDirection::Increasing);
        assert_eq!(report.yearly_summary[0].series.len(), 4);
    }

    #[test]
    fn test_yearly_rainfall_is_summed_not_averaged() {
        let records = vec![
            record(2020, 3, 1, 20.0, 10.0),
            record(2020, 4, 1, 20.0, 30.0),
            record(2021, 3, 1, 20.0, 5.0),
        ];
        let report = analyze_climate_trends(&records, "Nakuru", None, None).unwrap();
        let rainfall = &report.yearly_summary[1];
        assert_eq!(rainfall.metric, "rainfall_mm");
        assert_relative_eq!(rainfall.series["2020"], 40.0);
        assert_relative_eq!(rainfall.series["2021"], 5.0);
    }

    #[test]
    fn test_seasonal_rainfall_is_averaged_across_years() {
        let records = vec![
            record(2020, 3, 1, 20.0, 10.0),
            record(2021, 3, 1, 20.0, 30.0),
        ];
        let report = analyze_climate_trends(&records, "Nakuru", None, None).unwrap();
        let seasonal_rain = &report.seasonal_patterns[1];
        assert_relative_eq!(seasonal_rain.series["03"], 20.0);
    }

    #[test]
    fn test_overall_min_max_temperature() {
        let records = vec![
            record(2020, 1, 1, 14.5, 0.0),
            record(2020, 6, 1, 27.25, 0.0),
        ];
        let report = analyze_climate_trends(&records, "Nakuru", None, None).unwrap();
        assert_relative_eq!(report.overall_statistics.min_temperature_c, 14.5);
        assert_relative_eq!(report.overall_statistics.max_temperature_c, 27.25);
    }

    #[test]
    fn test_single_year_trend_is_insufficient_data() {
        let records = vec![record(2020, 1, 1, 20.0, 1.0)];
        let report = analyze_climate_trends(&records, "Nakuru", None, None).unwrap();
        assert_eq!(report.trends.temperature_trend, TrendDirection::InsufficientData);
    }
}
