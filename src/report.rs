/// Analysis report assembly and JSON export.
///
/// Merges the aggregator's four per-region outputs into one serializable
/// report structure and writes it as pretty-printed JSON. Sections backed
/// by absent tables serialize as `null` rather than being dropped, so a
/// report always has the same shape regardless of data availability.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::analysis::air_quality::{analyze_air_quality_trends, AirQualityTrendReport};
use crate::analysis::climate::{analyze_climate_trends, ClimateTrendReport};
use crate::analysis::flood::{generate_flood_risk_assessment, FloodRiskReport};
use crate::analysis::summary::{region_summary, RegionSummary};
use crate::dataset::Datasets;

/// Report format version.
pub const REPORT_VERSION: &str = "1.0.0";

// ---------------------------------------------------------------------------
// Report types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub title: String,
    pub generated_date: String,
    pub region: String,
    pub version: String,
}

/// The full analysis report for one region.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub report_metadata: ReportMetadata,
    pub regional_summary: RegionSummary,
    pub climate_analysis: Option<ClimateTrendReport>,
    pub air_quality_analysis: Option<AirQualityTrendReport>,
    pub flood_risk_assessment: FloodRiskReport,
}

// ---------------------------------------------------------------------------
// Assembly and export
// ---------------------------------------------------------------------------

/// Builds the full analysis report for `region` at time `now`.
pub fn build_region_report(
    datasets: &Datasets,
    region: &str,
    now: DateTime<Utc>,
) -> AnalysisReport {
    let today = now.date_naive();

    AnalysisReport {
        report_metadata: ReportMetadata {
            title: format!("EcoSentinel Environmental Analysis Report - {}", region),
            generated_date: now.to_rfc3339(),
            region: region.to_string(),
            version: REPORT_VERSION.to_string(),
        },
        regional_summary: region_summary(datasets, region, today),
        climate_analysis: datasets
            .weather
            .as_deref()
            .and_then(|records| analyze_climate_trends(records, region, None, None)),
        air_quality_analysis: datasets
            .air_quality
            .as_deref()
            .and_then(|records| analyze_air_quality_trends(records, region)),
        flood_risk_assessment: generate_flood_risk_assessment(datasets, region, today),
    }
}

/// Default export path: `analysis_report_<region>_<YYYYMMDD>.json` under `dir`.
pub fn default_report_path(dir: &Path, region: &str, now: DateTime<Utc>) -> PathBuf {
    dir.join(format!(
        "analysis_report_{}_{}.json",
        region,
        now.format("%Y%m%d")
    ))
}

/// Builds and writes the report for `region` as pretty-printed JSON.
/// Returns the path written.
pub fn export_region_report(
    datasets: &Datasets,
    region: &str,
    now: DateTime<Utc>,
    output: &Path,
) -> io::Result<PathBuf> {
    let report = build_region_report(datasets, region, now);
    let json = serde_json::to_string_pretty(&report)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    fs::write(output, json)?;
    Ok(output.to_path_buf())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
