use chrono::NaiveDate;

/// Arithmetic failures inside the biological rate functions.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum NumericError {
    #[error(
        "sporangia survival denominator {denominator} is degenerate at {temperature} C / {relative_humidity}% RH"
    )]
    DegenerateSurvivalDenominator {
        temperature: f64,
        relative_humidity: f64,
        denominator: f64,
    },

    #[error("zoospore survival fraction requires at least one wet hour")]
    ZeroWetHours,

    #[error("{quantity} became non-finite ({value})")]
    NonFinite { quantity: &'static str, value: f64 },
}

/// Errors surfaced by a simulation run. Any of these aborts the run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum SimulationError {
    #[error("end date {end} must be after start date {start}")]
    InvalidDateRange { start: NaiveDate, end: NaiveDate },

    #[error("weather series has {available} hourly samples but the window needs {required}")]
    InsufficientWeather { required: usize, available: usize },

    #[error(
        "weather series lengths differ (temperature {temperature}, rainfall {rainfall}, relative_humidity {relative_humidity}, leaf_litter_moist {leaf_litter_moist})"
    )]
    MismatchedWeatherSeries {
        temperature: usize,
        rainfall: usize,
        relative_humidity: usize,
        leaf_litter_moist: usize,
    },

    #[error("invalid {field} value {value} at hour {hour}")]
    InvalidWeatherValue {
        hour: usize,
        field: &'static str,
        value: f64,
    },

    #[error("invalid model parameters: {0}")]
    InvalidParameters(String),

    #[error("invalid synthetic weather settings: {0}")]
    InvalidSyntheticWeather(String),

    #[error("numeric error at hour {hour} in cohort {cohort}: {source}")]
    Numeric {
        hour: usize,
        cohort: usize,
        #[source]
        source: NumericError,
    },
}

/// Failures while reading a weather file from disk.
#[derive(Debug, thiserror::Error)]
pub enum WeatherLoadError {
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("weather JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("weather YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("unsupported weather file extension '{0}' (expected json, yaml or yml)")]
    UnsupportedFormat(String),
}
