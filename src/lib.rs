pub mod cohort;
pub mod config;
pub mod engine;
pub mod error;
pub mod rates;
pub mod report;
pub mod rng;
pub mod scenario;
pub mod weather;
pub mod window;

pub use cohort::{CohortStage, OosporeCohort};
pub use config::ModelParameters;
pub use engine::{run_simulation, Engine, HourReport, SimulationState};
pub use error::{NumericError, SimulationError};
pub use weather::{HourlyWeather, WeatherSeries};
pub use window::SimulationWindow;
