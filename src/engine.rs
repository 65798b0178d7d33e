use chrono::NaiveDate;
use tracing::{debug, info, trace};

use crate::cohort::OosporeCohort;
use crate::config::ModelParameters;
use crate::error::SimulationError;
use crate::rates::hydro_thermal_increment;
use crate::weather::{HourlyWeather, WeatherSeries};
use crate::window::SimulationWindow;

/// Everything a run accumulates, threaded through each hourly step.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SimulationState {
    hour: usize,
    hydro_thermal_time: f64,
    cohorts: Vec<OosporeCohort>,
}

/// What happened during one simulated hour.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourReport {
    pub hour: usize,
    pub hydro_thermal_time: f64,
    pub spawned: bool,
    pub releases: usize,
    pub dispersals: usize,
    pub infections: usize,
    pub cohort_count: usize,
}

impl SimulationState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of hours already stepped.
    pub fn hour(&self) -> usize {
        self.hour
    }

    pub fn hydro_thermal_time(&self) -> f64 {
        self.hydro_thermal_time
    }

    pub fn cohorts(&self) -> &[OosporeCohort] {
        &self.cohorts
    }

    pub fn into_cohorts(self) -> Vec<OosporeCohort> {
        self.cohorts
    }

    /// Advances the run by one hour: clock first, then the spawn check, then
    /// every cohort in creation order.
    ///
    /// The hour is applied to a working copy and committed only on success,
    /// so a failed step leaves the state exactly as it was.
    pub fn step(
        &mut self,
        weather: &HourlyWeather,
        params: &ModelParameters,
    ) -> Result<HourReport, SimulationError> {
        let hour = self.hour;
        let hydro_thermal_time = self.hydro_thermal_time
            + hydro_thermal_increment(weather.temperature, weather.leaf_litter_moist);

        let mut cohorts = self.cohorts.clone();
        let spawned =
            params.in_dormancy_window(hydro_thermal_time) && params.is_rain_event(weather.rainfall);
        if spawned {
            let cohort = OosporeCohort::spawn(hour, hydro_thermal_time);
            debug!(
                hour,
                cohort = cohorts.len(),
                hydro_thermal_time,
                dormancy_breaking = cohort.dormancy_breaking_progress,
                "Cohort spawned"
            );
            cohorts.push(cohort);
        }

        let mut report = HourReport {
            hour,
            hydro_thermal_time,
            spawned,
            releases: 0,
            dispersals: 0,
            infections: 0,
            cohort_count: cohorts.len(),
        };
        for (index, cohort) in cohorts.iter_mut().enumerate() {
            let events = cohort
                .advance(hour, weather, params)
                .map_err(|source| SimulationError::Numeric {
                    hour,
                    cohort: index,
                    source,
                })?;
            if events.released {
                debug!(
                    hour,
                    cohort = index,
                    ratio = cohort.zoospore_release_ratio,
                    "Zoospores released"
                );
                report.releases += 1;
            }
            if events.dispersed {
                report.dispersals += 1;
            }
            if events.infected {
                debug!(hour, cohort = index, "Oil spots on leaves");
                report.infections += 1;
            }
        }

        self.hydro_thermal_time = hydro_thermal_time;
        self.cohorts = cohorts;
        self.hour += 1;
        trace!(
            hour,
            hydro_thermal_time,
            cohorts = self.cohorts.len(),
            "Hour simulated"
        );
        Ok(report)
    }
}

/// Drives [`SimulationState`] over a weather series.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    params: ModelParameters,
}

impl Engine {
    pub fn new(params: ModelParameters) -> Result<Self, SimulationError> {
        params.validate()?;
        Ok(Self { params })
    }

    pub fn params(&self) -> &ModelParameters {
        &self.params
    }

    pub fn run(
        &self,
        weather: &WeatherSeries,
        window: &SimulationWindow,
    ) -> Result<SimulationState, SimulationError> {
        self.run_with_hook(weather, window, |_| {})
    }

    /// Runs the whole window, calling `hook` after every hour.
    ///
    /// Inputs are validated before the first step, so a failing run never
    /// produces partial output.
    pub fn run_with_hook<F>(
        &self,
        weather: &WeatherSeries,
        window: &SimulationWindow,
        mut hook: F,
    ) -> Result<SimulationState, SimulationError>
    where
        F: FnMut(&HourReport),
    {
        let hours = window.num_hours();
        weather.validate(hours)?;
        info!(
            start = %window.start(),
            end = %window.end(),
            hours,
            "Simulation started"
        );

        let mut state = SimulationState::new();
        for sample in weather.iter().take(hours) {
            let report = state.step(&sample, &self.params)?;
            hook(&report);
        }

        let infected = state
            .cohorts
            .iter()
            .filter(|cohort| cohort.oil_spots_on_leaves)
            .count();
        info!(
            hours = state.hour,
            hydro_thermal_time = state.hydro_thermal_time,
            cohorts = state.cohorts.len(),
            infected,
            "Simulation finished"
        );
        Ok(state)
    }
}

/// Runs the model with default parameters and returns every cohort in
/// creation order, as it stands at the end of the window.
pub fn run_simulation(
    weather: &WeatherSeries,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<OosporeCohort>, SimulationError> {
    let window = SimulationWindow::new(start, end)?;
    let state = Engine::default().run(weather, &window)?;
    Ok(state.into_cohorts())
}
