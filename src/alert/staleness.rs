/// Current-weather reading staleness detection.
///
/// AccuWeather observations update roughly hourly. An old reading feeding
/// the flood formula understates risk during a developing storm, so the
/// provider layer flags readings past a freshness threshold and falls
/// back to the simulated provider.
///
/// # Clock injection
/// All functions accept a `now: DateTime<Utc>` parameter rather than
/// calling `Utc::now()` internally. This makes staleness purely
/// deterministic in tests without mocking or time manipulation.

use crate::model::CurrentWeather;

// ---------------------------------------------------------------------------
// Staleness check
// ---------------------------------------------------------------------------

/// Returns `true` if the reading's observation time is older than
/// `max_age_minutes` relative to `now`.
///
/// Staleness is defined as strictly greater than the threshold:
///   age > max_age_minutes  →  stale
///   age == max_age_minutes →  not stale
///
/// Returns an error if the reading's `observed_at` string cannot be
/// parsed. Callers should treat parse failures as stale (fail-safe
/// default). Readings timestamped in the future are not stale.
pub fn is_stale_at(
    reading: &CurrentWeather,
    max_age_minutes: u64,
    now: chrono::DateTime<chrono::Utc>,
) -> Result<bool, String> {
    let observed = chrono::DateTime::parse_from_rfc3339(&reading.observed_at)
        .map_err(|e| format!("unparseable observation time '{}': {}", reading.observed_at, e))?
        .with_timezone(&chrono::Utc);

    let age_minutes = (now - observed).num_minutes();
    Ok(age_minutes > max_age_minutes as i64)
}

/// Convenience wrapper that uses the real current time.
/// Use `is_stale_at` in tests to keep them deterministic.
pub fn is_stale(reading: &CurrentWeather, max_age_minutes: u64) -> Result<bool, String> {
    is_stale_at(reading, max_age_minutes, chrono::Utc::now())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
