//! Tunable model constants and logging settings.

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

fn default_hydro_thermal_time_min() -> f64 {
    1.3
}

fn default_hydro_thermal_time_max() -> f64 {
    8.6
}

fn default_germination_complete() -> f64 {
    1.0
}

fn default_sporangia_survival_threshold() -> f64 {
    1.0
}

fn default_rain_event_mm() -> f64 {
    0.2
}

fn default_infection_threshold() -> f64 {
    60.0
}

/// Biological thresholds of the life-cycle model.
///
/// Every field can be overridden individually from a scenario file; omitted
/// fields keep the published calibration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelParameters {
    /// Lowest hydro-thermal time at which rain can start a cohort (inclusive).
    #[serde(default = "default_hydro_thermal_time_min")]
    pub hydro_thermal_time_min: f64,
    /// Highest hydro-thermal time at which rain can start a cohort (inclusive).
    #[serde(default = "default_hydro_thermal_time_max")]
    pub hydro_thermal_time_max: f64,
    #[serde(default = "default_germination_complete")]
    pub germination_complete: f64,
    /// Sporangia survival at or below which zoospores can be released.
    #[serde(default = "default_sporangia_survival_threshold")]
    pub sporangia_survival_threshold: f64,
    /// Hourly rainfall (mm) that counts as a rain event.
    #[serde(default = "default_rain_event_mm")]
    pub rain_event_mm: f64,
    /// Degree-hours of leaf wetness needed for infection.
    #[serde(default = "default_infection_threshold")]
    pub infection_threshold: f64,
}

impl Default for ModelParameters {
    fn default() -> Self {
        Self {
            hydro_thermal_time_min: default_hydro_thermal_time_min(),
            hydro_thermal_time_max: default_hydro_thermal_time_max(),
            germination_complete: default_germination_complete(),
            sporangia_survival_threshold: default_sporangia_survival_threshold(),
            rain_event_mm: default_rain_event_mm(),
            infection_threshold: default_infection_threshold(),
        }
    }
}

impl ModelParameters {
    pub fn validate(&self) -> Result<(), SimulationError> {
        let fields = [
            ("hydro_thermal_time_min", self.hydro_thermal_time_min),
            ("hydro_thermal_time_max", self.hydro_thermal_time_max),
            ("germination_complete", self.germination_complete),
            ("sporangia_survival_threshold", self.sporangia_survival_threshold),
            ("rain_event_mm", self.rain_event_mm),
            ("infection_threshold", self.infection_threshold),
        ];
        for (name, value) in fields {
            if !value.is_finite() {
                return Err(SimulationError::InvalidParameters(format!(
                    "{name} must be finite, got {value}"
                )));
            }
        }

        if self.hydro_thermal_time_min > self.hydro_thermal_time_max {
            return Err(SimulationError::InvalidParameters(format!(
                "hydro_thermal_time_min ({}) exceeds hydro_thermal_time_max ({})",
                self.hydro_thermal_time_min, self.hydro_thermal_time_max
            )));
        }
        if self.germination_complete <= 0.0 {
            return Err(SimulationError::InvalidParameters(
                "germination_complete must be greater than zero".into(),
            ));
        }
        if self.rain_event_mm < 0.0 {
            return Err(SimulationError::InvalidParameters(
                "rain_event_mm must not be negative".into(),
            ));
        }
        Ok(())
    }

    /// Whether the shared clock currently allows a rain event to start a cohort.
    pub fn in_dormancy_window(&self, hydro_thermal_time: f64) -> bool {
        (self.hydro_thermal_time_min..=self.hydro_thermal_time_max).contains(&hydro_thermal_time)
    }

    pub fn is_rain_event(&self, rainfall_mm: f64) -> bool {
        rainfall_mm >= self.rain_event_mm
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
