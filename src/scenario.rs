use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::Deserialize;

use crate::{
    config::{LoggingConfig, ModelParameters},
    weather::{SyntheticWeather, WeatherSeries},
    window::SimulationWindow,
};

/// Where a scenario takes its hourly weather from.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WeatherSource {
    /// JSON or YAML file, relative to the scenario file.
    File(PathBuf),
    Synthetic(SyntheticWeather),
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(with = "serde_yaml::with::singleton_map")]
    pub weather: WeatherSource,
    #[serde(default)]
    pub parameters: ModelParameters,
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Directory of the scenario file, used to resolve weather paths.
    #[serde(skip)]
    pub base_dir: PathBuf,
}

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let mut scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario.base_dir = path
            .parent()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.base_dir.clone());
        Ok(scenario)
    }
}

impl Scenario {
    /// Applies command-line date overrides.
    pub fn with_dates(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        if let Some(start) = start {
            self.start_date = start;
        }
        if let Some(end) = end {
            self.end_date = end;
        }
        self
    }

    pub fn window(&self) -> Result<SimulationWindow> {
        SimulationWindow::new(self.start_date, self.end_date)
            .with_context(|| format!("Scenario '{}' has an invalid date range", self.name))
    }

    /// Loads or generates the weather covering the scenario window.
    pub fn weather(&self) -> Result<WeatherSeries> {
        match &self.weather {
            WeatherSource::File(file) => {
                let path = self.base_dir.join(file);
                WeatherSeries::load(&path)
                    .with_context(|| format!("Failed to load weather {}", path.display()))
            }
            WeatherSource::Synthetic(config) => config
                .generate(self.window()?.num_hours())
                .with_context(|| {
                    format!("Scenario '{}' has an invalid synthetic weather block", self.name)
                }),
        }
    }
}
