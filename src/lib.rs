//! EcoSentinel environmental analysis service.
//!
//! Simulates environmental datasets for Kenyan regions, aggregates them
//! into regional, climate, air-quality and flood summaries, scores flood,
//! air-quality and deforestation risk with fixed rule-based formulas, and
//! wraps the AccuWeather API behind a provider seam with a deterministic
//! simulated fallback.
//!
//! Module map:
//! - `model` - shared domain types and the weather-API error type.
//! - `regions` - the canonical Kenyan region registry.
//! - `config` - TOML settings with environment overrides.
//! - `logging` - structured logger with failure classification.
//! - `simulate` - seeded generation of the five dataset tables.
//! - `dataset` - CSV read/write and the in-memory dataset bundle.
//! - `analysis` - the tabular aggregator (summaries, trends, reports).
//! - `scoring` - the risk scoring engine (flood, AQI, deforestation).
//! - `ingest` - the weather-provider seam and the AccuWeather client.
//! - `dev_mode` - deterministic simulated weather provider.
//! - `alert` - alert text and reading staleness checks.
//! - `report` - per-region report assembly and JSON export.
//! - `verify` - live-API verification harness for the region registry.

pub mod alert;
pub mod analysis;
pub mod config;
pub mod dataset;
pub mod dev_mode;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod regions;
pub mod report;
pub mod scoring;
pub mod simulate;
pub mod verify;
