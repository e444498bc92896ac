/// Structured logging for the EcoSentinel service.
///
/// Provides context-rich logging with region identifiers, timestamps and
/// severity levels. Supports both console output and file-based logging
/// for scheduled report generation.

use chrono::Utc;
use std::fmt;
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Mutex;

// ---------------------------------------------------------------------------
// Log Levels
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum LogLevel {
    Debug,
    Info,
    Warning,
    Error,
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogLevel::Debug => write!(f, "DEBUG"),
            LogLevel::Info => write!(f, "INFO"),
            LogLevel::Warning => write!(f, "WARN"),
            LogLevel::Error => write!(f, "ERROR"),
        }
    }
}

// ---------------------------------------------------------------------------
// Data Source Types
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    Accuweather,
    Dataset,
    Simulator,
    Report,
    System,
}

impl fmt::Display for DataSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DataSource::Accuweather => write!(f, "ACCU"),
            DataSource::Dataset => write!(f, "DATA"),
            DataSource::Simulator => write!(f, "SIM"),
            DataSource::Report => write!(f, "REPORT"),
            DataSource::System => write!(f, "SYS"),
        }
    }
}

// ---------------------------------------------------------------------------
// Failure Classification
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureType {
    /// Expected failure - no API key configured, service falls back to
    /// the simulated provider.
    Expected,
    /// Unexpected failure - indicates service degradation, a revoked key,
    /// or an API contract change.
    Unexpected,
    /// Unknown - cannot determine if this is expected or not.
    Unknown,
}

impl fmt::Display for FailureType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureType::Expected => write!(f, "EXPECTED"),
            FailureType::Unexpected => write!(f, "UNEXPECTED"),
            FailureType::Unknown => write!(f, "UNKNOWN"),
        }
    }
}

// ---------------------------------------------------------------------------
// Logger Configuration
// ---------------------------------------------------------------------------

/// Global logger instance
static LOGGER: Mutex<Option<Logger>> = Mutex::new(None);

pub struct Logger {
    /// Minimum log level to display
    min_level: LogLevel,
    /// Optional file path for logging
    log_file: Option<String>,
    /// Whether to include timestamps in console output
    console_timestamps: bool,
}

impl Logger {
    /// Initialize the global logger
    pub fn init(min_level: LogLevel, log_file: Option<String>, console_timestamps: bool) {
        let logger = Logger {
            min_level,
            log_file,
            console_timestamps,
        };

        *LOGGER.lock().unwrap() = Some(logger);
    }

    /// Log a message with the global logger
    fn log(&self, level: LogLevel, source: &DataSource, region: Option<&str>, message: &str) {
        if level < self.min_level {
            return;
        }

        let timestamp = Utc::now().format("%Y-%m-%d %H:%M:%S UTC");

        let region_part = region.map(|r| format!(" [{}]", r)).unwrap_or_default();
        let log_entry = format!(
            "{} {} {}{}: {}",
            timestamp,
            level,
            source,
            region_part,
            message
        );

        // Console output
        if self.console_timestamps {
            match level {
                LogLevel::Error => eprintln!("{}", log_entry),
                LogLevel::Warning => eprintln!("   {}", log_entry),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => println!("   [DEBUG] {}", message),
            }
        } else {
            match level {
                LogLevel::Error => eprintln!("   ✗ {}{}: {}", source, region_part, message),
                LogLevel::Warning => eprintln!("   ⚠ {}{}: {}", source, region_part, message),
                LogLevel::Info => println!("   {}", message),
                LogLevel::Debug => {} // Skip debug in non-timestamp mode
            }
        }

        // File output
        if let Some(ref path) = self.log_file {
            if let Err(e) = Self::append_to_file(path, &log_entry) {
                eprintln!("Failed to write to log file {}: {}", path, e);
            }
        }
    }

    fn append_to_file(path: &str, entry: &str) -> std::io::Result<()> {
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)?;
        writeln!(file, "{}", entry)?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Public Logging Functions
// ---------------------------------------------------------------------------

/// Initialize the global logger
pub fn init_logger(min_level: LogLevel, log_file: Option<&str>, console_timestamps: bool) {
    Logger::init(min_level, log_file.map(String::from), console_timestamps);
}

/// Log a general informational message
pub fn info(source: DataSource, region: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Info, &source, region, message);
    }
}

/// Log a warning message
pub fn warn(source: DataSource, region: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Warning, &source, region, message);
    }
}

/// Log an error message
pub fn error(source: DataSource, region: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Error, &source, region, message);
    }
}

/// Log a debug message
pub fn debug(source: DataSource, region: Option<&str>, message: &str) {
    if let Some(logger) = LOGGER.lock().unwrap().as_ref() {
        logger.log(LogLevel::Debug, &source, region, message);
    }
}

// ---------------------------------------------------------------------------
// Failure Classification Helpers
// ---------------------------------------------------------------------------

/// Classify an AccuWeather failure based on the error message.
pub fn classify_weather_api_failure(_region: &str, error_message: &str) -> FailureType {
    // No key configured: the service is designed to run without one,
    // falling back to the simulated provider.
    if error_message.contains("No AccuWeather API key") {
        FailureType::Expected
    }
    // Auth and quota failures mean a bad or exhausted key.
    else if error_message.contains("HTTP error: 401")
        || error_message.contains("HTTP error: 403")
        || error_message.contains("HTTP error: 503") {
        FailureType::Unexpected
    }
    // Other HTTP errors might indicate service issues.
    else if error_message.contains("HTTP error") {
        FailureType::Unexpected
    }
    // Connect and timeout failures are often transient network blips.
    else if error_message.contains("Request failed") {
        FailureType::Unknown
    }
    // Parse errors suggest API changes or bugs.
    else if error_message.contains("Parse error") {
        FailureType::Unexpected
    }
    // A region name the city search cannot resolve may be a registry
    // entry AccuWeather spells differently.
    else if error_message.contains("City not found")
        || error_message.contains("No current conditions") {
        FailureType::Unknown
    }
    else {
        FailureType::Unknown
    }
}

// ---------------------------------------------------------------------------
// Structured Failure Logging
// ---------------------------------------------------------------------------

/// Log a weather-API failure with automatic classification.
pub fn log_weather_api_failure(region: &str, operation: &str, err: &dyn std::error::Error) {
    let error_msg = err.to_string();
    let failure_type = classify_weather_api_failure(region, &error_msg);

    let message = format!(
        "{} failed [{}]: {}",
        operation,
        failure_type,
        error_msg
    );

    match failure_type {
        FailureType::Expected => debug(DataSource::Accuweather, Some(region), &message),
        FailureType::Unexpected => error(DataSource::Accuweather, Some(region), &message),
        FailureType::Unknown => warn(DataSource::Accuweather, Some(region), &message),
    }
}

/// Log a dataset load/parse failure.
pub fn log_dataset_failure(file: &str, err: &dyn std::error::Error) {
    error(DataSource::Dataset, Some(file), &err.to_string());
}

// ---------------------------------------------------------------------------
// Summary Logging
// ---------------------------------------------------------------------------

/// Log a summary of a dataset load.
pub fn log_dataset_load_summary(loaded: usize, total: usize) {
    let message = format!("Dataset load complete: {}/{} tables present", loaded, total);

    if loaded == total {
        info(DataSource::Dataset, None, &message);
    } else if loaded == 0 {
        error(DataSource::Dataset, None, &message);
    } else {
        warn(DataSource::Dataset, None, &message);
    }
}

/// Log a summary of report exports.
pub fn log_export_summary(total: usize, successful: usize, failed: usize) {
    let message = format!(
        "Report export complete: {}/{} successful, {} failed",
        successful,
        total,
        failed
    );

    if failed == 0 {
        info(DataSource::Report, None, &message);
    } else if successful == 0 {
        error(DataSource::Report, None, &message);
    } else {
        warn(DataSource::Report, None, &message);
    }
}
