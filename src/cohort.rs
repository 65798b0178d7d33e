//! Oospore cohorts and their hourly life-cycle transitions.

use serde::{Deserialize, Serialize};

use crate::config::ModelParameters;
use crate::error::NumericError;
use crate::rates::{
    dormancy_breaking_fraction, hydro_thermal_increment, is_infection_threshold_met,
    sporangia_survival_rate, zoospore_survival_fraction,
};
use crate::weather::HourlyWeather;

/// Coarse life-cycle position of a cohort, derived from its state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CohortStage {
    Germinating,
    Germinated,
    Released,
    Dispersed,
    Infected,
}

/// Population of oospores that started dormancy breaking in the same hour.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OosporeCohort {
    pub germination_level: f64,
    pub sporangia_survival: f64,
    /// Tracked for reporting only; no transition reads it.
    pub zoospore_survival: f64,
    pub zoospores_released: bool,
    pub zoospore_release_ratio: f64,
    pub zoospore_dispersal_ratio: f64,
    pub zoospore_infection_ratio: f64,
    pub oil_spots_on_leaves: bool,
    /// Dormancy-breaking fraction at the spawn hour. Never updated.
    pub dormancy_breaking_progress: f64,
    pub germination_start_hour: usize,
    pub release_hour: Option<usize>,
    pub infection_hour: Option<usize>,
    pub hours_since_release: u32,
    pub wet_hours_since_release: u32,
}

/// Transitions a cohort went through during one hour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CohortEvents {
    pub released: bool,
    pub dispersed: bool,
    /// First infection of this cohort; later infection hours are not reported.
    pub infected: bool,
}

impl OosporeCohort {
    pub fn spawn(hour: usize, hydro_thermal_time: f64) -> Self {
        Self {
            germination_level: 0.0,
            sporangia_survival: 0.0,
            zoospore_survival: 0.0,
            zoospores_released: false,
            zoospore_release_ratio: 0.0,
            zoospore_dispersal_ratio: 0.0,
            zoospore_infection_ratio: 0.0,
            oil_spots_on_leaves: false,
            dormancy_breaking_progress: dormancy_breaking_fraction(hydro_thermal_time),
            germination_start_hour: hour,
            release_hour: None,
            infection_hour: None,
            hours_since_release: 0,
            wet_hours_since_release: 0,
        }
    }

    pub fn is_germinated(&self, params: &ModelParameters) -> bool {
        self.germination_level >= params.germination_complete
    }

    pub fn stage(&self, params: &ModelParameters) -> CohortStage {
        if self.oil_spots_on_leaves {
            CohortStage::Infected
        } else if self.zoospores_released && self.zoospore_dispersal_ratio > 0.0 {
            CohortStage::Dispersed
        } else if self.zoospores_released {
            CohortStage::Released
        } else if self.is_germinated(params) {
            CohortStage::Germinated
        } else {
            CohortStage::Germinating
        }
    }

    /// Applies one hour of weather to the cohort.
    ///
    /// On error the cohort keeps the values it had before the failing
    /// accumulator was touched; callers abort the run.
    pub fn advance(
        &mut self,
        hour: usize,
        weather: &HourlyWeather,
        params: &ModelParameters,
    ) -> Result<CohortEvents, NumericError> {
        let mut events = CohortEvents::default();

        if !self.is_germinated(params) {
            let level = self.germination_level
                + hydro_thermal_increment(weather.temperature, weather.leaf_litter_moist);
            self.germination_level = finite("germination_level", level)?;
        } else {
            let rate = sporangia_survival_rate(weather.temperature, weather.relative_humidity)?;
            self.sporangia_survival = finite("sporangia_survival", self.sporangia_survival + rate)?;
        }

        if !self.zoospores_released
            && self.is_germinated(params)
            && self.sporangia_survival <= params.sporangia_survival_threshold
            && weather.leaf_litter_moist
        {
            self.zoospores_released = true;
            self.release_hour = Some(hour);
            self.zoospore_release_ratio = self.germination_level;
            events.released = true;
        }

        if !self.zoospores_released {
            return Ok(events);
        }

        if !events.released {
            self.hours_since_release += 1;
        }
        if weather.leaf_litter_moist {
            self.wet_hours_since_release += 1;
        }
        self.zoospore_survival =
            zoospore_survival_fraction(self.hours_since_release, self.wet_hours_since_release)?;

        if params.is_rain_event(weather.rainfall) {
            self.zoospore_dispersal_ratio = self.zoospore_release_ratio;
            events.dispersed = true;
            if is_infection_threshold_met(
                self.sporangia_survival,
                weather.temperature,
                params.infection_threshold,
            ) {
                if !self.oil_spots_on_leaves {
                    self.infection_hour = Some(hour);
                    events.infected = true;
                }
                self.oil_spots_on_leaves = true;
                self.zoospore_infection_ratio = self.zoospore_dispersal_ratio;
            }
        }

        Ok(events)
    }
}

fn finite(quantity: &'static str, value: f64) -> Result<f64, NumericError> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(NumericError::NonFinite { quantity, value })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn weather(temperature: f64, rainfall: f64, moist: bool) -> HourlyWeather {
        HourlyWeather {
            temperature,
            rainfall,
            relative_humidity: 80.0,
            leaf_litter_moist: moist,
        }
    }

    #[test]
    fn spawn_freezes_dormancy_progress() {
        let cohort = OosporeCohort::spawn(12, 2.0);
        assert_eq!(cohort.germination_start_hour, 12);
        assert_eq!(cohort.dormancy_breaking_progress, dormancy_breaking_fraction(2.0));
        assert_eq!(cohort.germination_level, 0.0);
        assert!(!cohort.zoospores_released);
        assert_eq!(cohort.stage(&ModelParameters::default()), CohortStage::Germinating);
    }

    #[test]
    fn germination_accumulates_the_hydro_thermal_increment() {
        let params = ModelParameters::default();
        let mut cohort = OosporeCohort::spawn(0, 2.0);
        cohort.advance(0, &weather(15.0, 0.0, true), &params).unwrap();
        assert_eq!(cohort.germination_level, hydro_thermal_increment(15.0, true));

        cohort.advance(1, &weather(15.0, 0.0, false), &params).unwrap();
        assert_eq!(cohort.germination_level, hydro_thermal_increment(15.0, true));
        assert_eq!(cohort.sporangia_survival, 0.0);
    }

    #[test]
    fn germinated_cohort_releases_on_moist_hour() {
        let params = ModelParameters::default();
        let mut cohort = OosporeCohort::spawn(0, 2.0);
        cohort.germination_level = 1.0;

        let events = cohort.advance(5, &weather(15.0, 0.0, false), &params).unwrap();
        assert!(!events.released, "dry litter must not release");
        assert_eq!(cohort.germination_level, 1.0, "germination is frozen");
        assert!(cohort.sporangia_survival > 0.0);

        let events = cohort.advance(6, &weather(15.0, 0.0, true), &params).unwrap();
        assert!(events.released);
        assert_eq!(cohort.release_hour, Some(6));
        assert_eq!(cohort.zoospore_release_ratio, 1.0);
        assert_eq!(cohort.zoospore_survival, 0.0);
        assert_eq!(cohort.stage(&params), CohortStage::Released);
    }

    #[test]
    fn survival_above_threshold_blocks_release() {
        let params = ModelParameters::default();
        let mut cohort = OosporeCohort::spawn(0, 2.0);
        cohort.germination_level = 1.0;
        cohort.sporangia_survival = 1.5;

        let events = cohort.advance(1, &weather(15.0, 0.0, true), &params).unwrap();
        assert!(!events.released);
        assert!(!cohort.zoospores_released);
    }

    #[test]
    fn rain_disperses_and_warm_wetness_infects() {
        let params = ModelParameters {
            infection_threshold: 0.1,
            ..ModelParameters::default()
        };
        let mut cohort = OosporeCohort::spawn(0, 2.0);
        cohort.germination_level = 1.0;
        cohort.advance(1, &weather(15.0, 0.0, true), &params).unwrap();
        assert!(cohort.zoospores_released);

        let events = cohort.advance(2, &weather(15.0, 0.5, true), &params).unwrap();
        assert!(events.dispersed);
        assert!(events.infected);
        assert_eq!(cohort.zoospore_dispersal_ratio, cohort.zoospore_release_ratio);
        assert_eq!(cohort.zoospore_infection_ratio, cohort.zoospore_dispersal_ratio);
        assert_eq!(cohort.infection_hour, Some(2));
        assert_eq!(cohort.stage(&params), CohortStage::Infected);

        let events = cohort.advance(3, &weather(15.0, 0.5, true), &params).unwrap();
        assert!(!events.infected, "only the first infection is reported");
        assert!(cohort.oil_spots_on_leaves);
        assert_eq!(cohort.infection_hour, Some(2));
    }

    #[test]
    fn dispersal_without_threshold_leaves_no_oil_spots() {
        let params = ModelParameters::default();
        let mut cohort = OosporeCohort::spawn(0, 2.0);
        cohort.germination_level = 1.0;
        cohort.advance(1, &weather(15.0, 0.0, true), &params).unwrap();

        let events = cohort.advance(2, &weather(15.0, 1.0, true), &params).unwrap();
        assert!(events.dispersed);
        assert!(!events.infected);
        assert!(!cohort.oil_spots_on_leaves);
        assert_eq!(cohort.zoospore_infection_ratio, 0.0);
        assert_eq!(cohort.stage(&params), CohortStage::Dispersed);
    }

    #[test]
    fn zoospore_survival_tracks_wet_share_since_release() {
        let params = ModelParameters::default();
        let mut cohort = OosporeCohort::spawn(0, 2.0);
        cohort.germination_level = 1.0;
        cohort.advance(1, &weather(15.0, 0.0, true), &params).unwrap();
        cohort.advance(2, &weather(15.0, 0.0, false), &params).unwrap();
        cohort.advance(3, &weather(15.0, 0.0, true), &params).unwrap();

        assert_eq!(cohort.hours_since_release, 2);
        assert_eq!(cohort.wet_hours_since_release, 2);
        assert_eq!(cohort.zoospore_survival, 1.0);
    }

    #[test]
    fn degenerate_survival_rate_is_an_error() {
        let params = ModelParameters::default();
        let mut cohort = OosporeCohort::spawn(0, 2.0);
        cohort.germination_level = 1.0;
        let hot_dry = HourlyWeather {
            temperature: 35.0,
            rainfall: 0.0,
            relative_humidity: 20.0,
            leaf_litter_moist: false,
        };

        let err = cohort.advance(1, &hot_dry, &params).unwrap_err();
        assert!(matches!(err, NumericError::DegenerateSurvivalDenominator { .. }));
        assert_eq!(cohort.sporangia_survival, 0.0);
    }
}
