use chrono::{Duration, NaiveDate, NaiveDateTime, NaiveTime};
use serde::Serialize;

use crate::error::SimulationError;

pub const HOURS_PER_DAY: usize = 24;

/// Half-open calendar range `[start, end)` simulated hour by hour from
/// midnight of `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SimulationWindow {
    start: NaiveDate,
    end: NaiveDate,
}

impl SimulationWindow {
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, SimulationError> {
        if end <= start {
            return Err(SimulationError::InvalidDateRange { start, end });
        }
        Ok(Self { start, end })
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    pub fn days(&self) -> usize {
        // Positive by construction.
        (self.end - self.start).num_days() as usize
    }

    pub fn num_hours(&self) -> usize {
        HOURS_PER_DAY * self.days()
    }

    /// Wall-clock time of hour index `hour`.
    pub fn timestamp(&self, hour: usize) -> NaiveDateTime {
        self.start.and_time(NaiveTime::MIN) + Duration::hours(hour as i64)
    }
}
