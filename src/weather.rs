//! Hourly weather input of the simulation.

use std::f64::consts::PI;
use std::fs;
use std::path::Path;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::error::{SimulationError, WeatherLoadError};
use crate::rng::{RngManager, StreamId};
use crate::window::HOURS_PER_DAY;

/// One hour of observations, shared by every cohort during that hour.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HourlyWeather {
    pub temperature: f64,
    pub rainfall: f64,
    pub relative_humidity: f64,
    pub leaf_litter_moist: bool,
}

/// Column-oriented hourly weather. Index `h` is the same hour in every column.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct WeatherSeries {
    temperature: Vec<f64>,
    rainfall: Vec<f64>,
    relative_humidity: Vec<f64>,
    leaf_litter_moist: Vec<bool>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum WeatherFile {
    Columns(WeatherSeries),
    Records(Vec<HourlyWeather>),
}

impl WeatherSeries {
    /// Builds a series from columns. Lengths are checked by [`validate`](Self::validate).
    pub fn from_columns(
        temperature: Vec<f64>,
        rainfall: Vec<f64>,
        relative_humidity: Vec<f64>,
        leaf_litter_moist: Vec<bool>,
    ) -> Self {
        Self {
            temperature,
            rainfall,
            relative_humidity,
            leaf_litter_moist,
        }
    }

    pub fn from_records(records: impl IntoIterator<Item = HourlyWeather>) -> Self {
        let mut series = Self::default();
        for record in records {
            series.temperature.push(record.temperature);
            series.rainfall.push(record.rainfall);
            series.relative_humidity.push(record.relative_humidity);
            series.leaf_litter_moist.push(record.leaf_litter_moist);
        }
        series
    }

    /// Reads a JSON or YAML weather file, either as four columns or as a list
    /// of hourly records.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, WeatherLoadError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        let text = fs::read_to_string(path)?;
        let file: WeatherFile = match extension.as_str() {
            "json" => serde_json::from_str(&text)?,
            "yaml" | "yml" => serde_yaml::from_str(&text)?,
            _ => return Err(WeatherLoadError::UnsupportedFormat(extension)),
        };
        Ok(match file {
            WeatherFile::Columns(series) => series,
            WeatherFile::Records(records) => Self::from_records(records),
        })
    }

    /// Number of complete hours, i.e. the shortest column.
    pub fn len(&self) -> usize {
        self.temperature
            .len()
            .min(self.rainfall.len())
            .min(self.relative_humidity.len())
            .min(self.leaf_litter_moist.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sample(&self, hour: usize) -> Option<HourlyWeather> {
        Some(HourlyWeather {
            temperature: *self.temperature.get(hour)?,
            rainfall: *self.rainfall.get(hour)?,
            relative_humidity: *self.relative_humidity.get(hour)?,
            leaf_litter_moist: *self.leaf_litter_moist.get(hour)?,
        })
    }

    pub fn iter(&self) -> impl Iterator<Item = HourlyWeather> + '_ {
        (0..self.len()).filter_map(move |hour| self.sample(hour))
    }

    pub fn rainfall(&self) -> &[f64] {
        &self.rainfall
    }

    pub fn leaf_litter_moist(&self) -> &[bool] {
        &self.leaf_litter_moist
    }

    /// Checks that the series can drive `required_hours` of simulation.
    ///
    /// Only the first `required_hours` samples are inspected for value
    /// errors; trailing data is ignored by the engine.
    pub fn validate(&self, required_hours: usize) -> Result<(), SimulationError> {
        let lengths = [
            self.temperature.len(),
            self.rainfall.len(),
            self.relative_humidity.len(),
            self.leaf_litter_moist.len(),
        ];
        if lengths.iter().any(|&len| len != lengths[0]) {
            return Err(SimulationError::MismatchedWeatherSeries {
                temperature: lengths[0],
                rainfall: lengths[1],
                relative_humidity: lengths[2],
                leaf_litter_moist: lengths[3],
            });
        }
        if lengths[0] < required_hours {
            return Err(SimulationError::InsufficientWeather {
                required: required_hours,
                available: lengths[0],
            });
        }

        for hour in 0..required_hours {
            let temperature = self.temperature[hour];
            if !temperature.is_finite() {
                return Err(invalid(hour, "temperature", temperature));
            }
            let rainfall = self.rainfall[hour];
            if !rainfall.is_finite() || rainfall < 0.0 {
                return Err(invalid(hour, "rainfall", rainfall));
            }
            let humidity = self.relative_humidity[hour];
            if !(0.0..=100.0).contains(&humidity) {
                return Err(invalid(hour, "relative_humidity", humidity));
            }
        }
        Ok(())
    }
}

fn invalid(hour: usize, field: &'static str, value: f64) -> SimulationError {
    SimulationError::InvalidWeatherValue { hour, field, value }
}

fn default_seed() -> u64 {
    7
}

fn default_mean_temperature() -> f64 {
    14.0
}

fn default_diurnal_amplitude() -> f64 {
    5.0
}

fn default_temperature_noise() -> f64 {
    2.0
}

fn default_mean_relative_humidity() -> f64 {
    78.0
}

fn default_humidity_noise() -> f64 {
    8.0
}

fn default_rain_probability() -> f64 {
    0.35
}

fn default_rain_intensity_mm() -> f64 {
    1.2
}

fn default_moist_hours_after_rain() -> usize {
    36
}

/// Seeded generator of plausible spring weather, for demos and scenario
/// tests when no observations are at hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyntheticWeather {
    #[serde(default = "default_seed")]
    pub seed: u64,
    #[serde(default = "default_mean_temperature")]
    pub mean_temperature: f64,
    /// Half the peak-to-trough daily temperature swing.
    #[serde(default = "default_diurnal_amplitude")]
    pub diurnal_amplitude: f64,
    /// Maximum day-to-day shift of the mean temperature.
    #[serde(default = "default_temperature_noise")]
    pub temperature_noise: f64,
    #[serde(default = "default_mean_relative_humidity")]
    pub mean_relative_humidity: f64,
    #[serde(default = "default_humidity_noise")]
    pub humidity_noise: f64,
    /// Chance that a given day has a shower.
    #[serde(default = "default_rain_probability")]
    pub rain_probability: f64,
    #[serde(default = "default_rain_intensity_mm")]
    pub rain_intensity_mm: f64,
    /// How long leaf litter stays moist after the last rain.
    #[serde(default = "default_moist_hours_after_rain")]
    pub moist_hours_after_rain: usize,
}

impl Default for SyntheticWeather {
    fn default() -> Self {
        Self {
            seed: default_seed(),
            mean_temperature: default_mean_temperature(),
            diurnal_amplitude: default_diurnal_amplitude(),
            temperature_noise: default_temperature_noise(),
            mean_relative_humidity: default_mean_relative_humidity(),
            humidity_noise: default_humidity_noise(),
            rain_probability: default_rain_probability(),
            rain_intensity_mm: default_rain_intensity_mm(),
            moist_hours_after_rain: default_moist_hours_after_rain(),
        }
    }
}

/// Humidity at or above which litter counts as moist without rain (dew).
const DEW_HUMIDITY: f64 = 95.0;
const RAIN_HUMIDITY: f64 = 97.0;
/// Hour of the daily temperature peak.
const PEAK_HOUR: f64 = 15.0;
const MAX_SHOWER_HOURS: usize = 6;

impl SyntheticWeather {
    /// Rejects settings the random draws cannot be built from.
    pub fn validate(&self) -> Result<(), SimulationError> {
        let non_negative = [
            ("diurnal_amplitude", self.diurnal_amplitude),
            ("temperature_noise", self.temperature_noise),
            ("humidity_noise", self.humidity_noise),
            ("rain_intensity_mm", self.rain_intensity_mm),
        ];
        for (name, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(SimulationError::InvalidSyntheticWeather(format!(
                    "{name} must be finite and non-negative, got {value}"
                )));
            }
        }
        if !self.mean_temperature.is_finite() {
            return Err(SimulationError::InvalidSyntheticWeather(format!(
                "mean_temperature must be finite, got {}",
                self.mean_temperature
            )));
        }
        if !(0.0..=100.0).contains(&self.mean_relative_humidity) {
            return Err(SimulationError::InvalidSyntheticWeather(format!(
                "mean_relative_humidity must lie in [0, 100], got {}",
                self.mean_relative_humidity
            )));
        }
        if !(0.0..=1.0).contains(&self.rain_probability) {
            return Err(SimulationError::InvalidSyntheticWeather(format!(
                "rain_probability must lie in [0, 1], got {}",
                self.rain_probability
            )));
        }
        Ok(())
    }

    /// Generates `hours` of weather. Same configuration, same series.
    pub fn generate(&self, hours: usize) -> Result<WeatherSeries, SimulationError> {
        self.validate()?;
        let rng = RngManager::new(self.seed);
        let days = hours.div_ceil(HOURS_PER_DAY);

        let mut records = Vec::with_capacity(days * HOURS_PER_DAY);
        let mut last_rain: Option<usize> = None;
        for day in 0..days {
            let mut temperature_rng = rng.daily_stream(StreamId::Temperature, day as u64);
            let mut humidity_rng = rng.daily_stream(StreamId::Humidity, day as u64);
            let mut rain_rng = rng.daily_stream(StreamId::Rain, day as u64);

            let day_mean = self.mean_temperature
                + temperature_rng.gen_range(-self.temperature_noise..=self.temperature_noise);
            let day_humidity = self.mean_relative_humidity
                + humidity_rng.gen_range(-self.humidity_noise..=self.humidity_noise);
            let shower = if rain_rng.gen_bool(self.rain_probability) {
                let start = rain_rng.gen_range(0..HOURS_PER_DAY);
                let length = rain_rng.gen_range(1..=MAX_SHOWER_HOURS);
                let intensity = self.rain_intensity_mm * rain_rng.gen_range(0.5..=1.5);
                Some((start, (start + length).min(HOURS_PER_DAY), intensity))
            } else {
                None
            };

            for hour_of_day in 0..HOURS_PER_DAY {
                let hour = day * HOURS_PER_DAY + hour_of_day;
                let phase = 2.0 * PI * (hour_of_day as f64 - PEAK_HOUR) / HOURS_PER_DAY as f64;
                let swing = self.diurnal_amplitude * phase.cos();
                let temperature = day_mean + swing;

                let rainfall = match shower {
                    Some((start, end, intensity)) if (start..end).contains(&hour_of_day) => {
                        intensity
                    }
                    _ => 0.0,
                };
                let relative_humidity = if rainfall > 0.0 {
                    RAIN_HUMIDITY
                } else {
                    // Air dries out in the afternoon and saturates before dawn.
                    (day_humidity - 2.0 * swing).clamp(0.0, 100.0)
                };

                if rainfall > 0.0 {
                    last_rain = Some(hour);
                }
                let recently_wet = last_rain
                    .map(|rained| hour - rained <= self.moist_hours_after_rain)
                    .unwrap_or(false);

                records.push(HourlyWeather {
                    temperature,
                    rainfall,
                    relative_humidity,
                    leaf_litter_moist: recently_wet || relative_humidity >= DEW_HUMIDITY,
                });
            }
        }
        records.truncate(hours);
        Ok(WeatherSeries::from_records(records))
    }
}
