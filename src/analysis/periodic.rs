/// Calendar-period grouping and aggregation.
///
/// Groups dated samples into monthly (year+month), yearly, or seasonal
/// (month-of-year, collapsed across years) buckets and reduces each bucket
/// with a mean or sum. Period keys are zero-padded strings so that
/// lexicographic order is chronological order and the resulting maps
/// iterate in ascending period-start order.

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use super::trend::{classify_trend, TrendDirection};
use super::{mean, round_to};

/// Calendar grouping unit for aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Granularity {
    /// One bucket per calendar year+month ("2020-03"). Records from March
    /// of different years land in different buckets.
    Monthly,
    /// One bucket per calendar year ("2020").
    Yearly,
    /// One bucket per month-of-year ("03"), collapsed across years -
    /// March 2020 and March 2024 share a bucket.
    Seasonal,
}

impl std::fmt::Display for Granularity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Granularity::Monthly => write!(f, "Monthly"),
            Granularity::Yearly => write!(f, "Yearly"),
            Granularity::Seasonal => write!(f, "Seasonal"),
        }
    }
}

/// How a period's samples are reduced to a single value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateStat {
    Mean,
    /// For accumulative fields (rainfall): the period total.
    Sum,
}

/// A metric's aggregate series at one granularity, plus its fitted trend
/// direction over the series in ascending period order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendSummary {
    pub metric: String,
    pub granularity: Granularity,
    pub series: BTreeMap<String, f64>,
    pub direction: TrendDirection,
}

/// The grouping key for a date at a granularity. Zero-padded so string
/// order matches chronological order.
pub fn period_key(date: NaiveDate, granularity: Granularity) -> String {
    match granularity {
        Granularity::Monthly => format!("{:04}-{:02}", date.year(), date.month()),
        Granularity::Yearly => format!("{:04}", date.year()),
        Granularity::Seasonal => format!("{:02}", date.month()),
    }
}

/// Groups `samples` by calendar period and reduces each group with `stat`.
///
/// Input order is irrelevant; the output map iterates in ascending period
/// order. Empty input produces an empty map - never an error.
pub fn periodic_aggregate(
    samples: &[(NaiveDate, f64)],
    granularity: Granularity,
    stat: AggregateStat,
) -> BTreeMap<String, f64> {
    let mut groups: BTreeMap<String, Vec<f64>> = BTreeMap::new();
    for (date, value) in samples {
        groups.entry(period_key(*date, granularity)).or_default().push(*value);
    }

    groups
        .into_iter()
        .map(|(key, values)| {
            let aggregate = match stat {
                AggregateStat::Mean => mean(&values),
                AggregateStat::Sum => values.iter().sum(),
            };
            (key, aggregate)
        })
        .collect()
}

/// Builds a [`TrendSummary`] for one metric: aggregate, round each period
/// value to `decimals`, and classify the direction over the rounded series
/// in ascending period order.
pub fn trend_summary(
    metric: &str,
    samples: &[(NaiveDate, f64)],
    granularity: Granularity,
    stat: AggregateStat,
    decimals: u32,
) -> TrendSummary {
    let series: BTreeMap<String, f64> = periodic_aggregate(samples, granularity, stat)
        .into_iter()
        .map(|(key, value)| (key, round_to(value, decimals)))
        .collect();
    let ordered: Vec<f64> = series.values().copied().collect();

    TrendSummary {
        metric: metric.to_string(),
        granularity,
        direction: classify_trend(&ordered),
        series,
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
