//! Serializable summary of a finished run.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::cohort::{CohortStage, OosporeCohort};
use crate::config::ModelParameters;
use crate::engine::SimulationState;
use crate::window::SimulationWindow;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CohortSummary {
    pub index: usize,
    pub stage: CohortStage,
    pub spawned_at: NaiveDateTime,
    pub released_at: Option<NaiveDateTime>,
    pub infected_at: Option<NaiveDateTime>,
    #[serde(flatten)]
    pub cohort: OosporeCohort,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CohortTotals {
    pub cohorts: usize,
    pub germinated: usize,
    pub released: usize,
    pub dispersed: usize,
    pub infected: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub scenario: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub hours: usize,
    pub hydro_thermal_time: f64,
    pub parameters: ModelParameters,
    pub totals: CohortTotals,
    pub first_infection: Option<NaiveDateTime>,
    pub cohorts: Vec<CohortSummary>,
}

impl SimulationReport {
    pub fn from_run(
        scenario: &str,
        window: &SimulationWindow,
        params: &ModelParameters,
        state: &SimulationState,
    ) -> Self {
        let mut totals = CohortTotals::default();
        let mut cohorts = Vec::with_capacity(state.cohorts().len());
        for (index, cohort) in state.cohorts().iter().enumerate() {
            let stage = cohort.stage(params);
            totals.cohorts += 1;
            if stage >= CohortStage::Germinated {
                totals.germinated += 1;
            }
            if stage >= CohortStage::Released {
                totals.released += 1;
            }
            if cohort.zoospore_dispersal_ratio > 0.0 {
                totals.dispersed += 1;
            }
            if stage == CohortStage::Infected {
                totals.infected += 1;
            }
            cohorts.push(CohortSummary {
                index,
                stage,
                spawned_at: window.timestamp(cohort.germination_start_hour),
                released_at: cohort.release_hour.map(|hour| window.timestamp(hour)),
                infected_at: cohort.infection_hour.map(|hour| window.timestamp(hour)),
                cohort: cohort.clone(),
            });
        }

        let first_infection = cohorts.iter().filter_map(|summary| summary.infected_at).min();

        Self {
            scenario: scenario.to_string(),
            start_date: window.start(),
            end_date: window.end(),
            hours: state.hour(),
            hydro_thermal_time: state.hydro_thermal_time(),
            parameters: *params,
            totals,
            first_infection,
            cohorts,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize simulation report")
    }

    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        fs::write(path, self.to_json()?)
            .with_context(|| format!("Failed to write report {}", path.display()))
    }
}
