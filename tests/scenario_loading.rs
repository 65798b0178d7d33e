use std::fs;

use mildew::{
    cohort::CohortStage,
    engine::Engine,
    report::SimulationReport,
    scenario::{ScenarioLoader, WeatherSource},
    weather::{HourlyWeather, WeatherSeries},
};
use tempfile::tempdir;

#[test]
fn bundled_scenario_runs_and_reports() {
    let loader = ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"));
    let scenario = loader.load("scenarios/vineyard_spring.yaml").unwrap();
    assert_eq!(scenario.name, "vineyard_spring");
    assert!(matches!(scenario.weather, WeatherSource::Synthetic(_)));
    assert_eq!(scenario.parameters.infection_threshold, 60.0);
    assert_eq!(scenario.parameters.hydro_thermal_time_min, 1.3);

    let window = scenario.window().unwrap();
    let weather = scenario.weather().unwrap();
    assert_eq!(weather.len(), window.num_hours());

    let engine = Engine::new(scenario.parameters).unwrap();
    let state = engine.run(&weather, &window).unwrap();
    let report = SimulationReport::from_run(&scenario.name, &window, engine.params(), &state);

    assert_eq!(report.hours, window.num_hours());
    assert_eq!(report.totals.cohorts, state.cohorts().len());
    assert!(report.totals.germinated >= report.totals.released);
    assert!(report.totals.released >= report.totals.infected);
    assert_eq!(
        report.totals.infected,
        report
            .cohorts
            .iter()
            .filter(|c| c.stage == CohortStage::Infected)
            .count()
    );
}

#[test]
fn weather_file_is_resolved_next_to_scenario() {
    let temp = tempdir().expect("tempdir");
    let hours = 48;
    let records: Vec<HourlyWeather> = (0..hours)
        .map(|hour| HourlyWeather {
            temperature: 12.0,
            rainfall: if hour == 30 { 1.0 } else { 0.0 },
            relative_humidity: 85.0,
            leaf_litter_moist: true,
        })
        .collect();
    fs::create_dir_all(temp.path().join("data")).unwrap();
    fs::write(
        temp.path().join("data/weather.json"),
        serde_json::to_string(&records).unwrap(),
    )
    .unwrap();
    fs::write(
        temp.path().join("scenario.yaml"),
        "name: file_weather\n\
         start_date: 2024-04-01\n\
         end_date: 2024-04-03\n\
         weather:\n  file: data/weather.json\n\
         parameters:\n  hydro_thermal_time_min: 0.0\n",
    )
    .unwrap();

    let scenario = ScenarioLoader::new(temp.path()).load("scenario.yaml").unwrap();
    let weather = scenario.weather().unwrap();
    assert_eq!(weather, WeatherSeries::from_records(records));

    let state = Engine::new(scenario.parameters)
        .unwrap()
        .run(&weather, &scenario.window().unwrap())
        .unwrap();
    assert_eq!(state.cohorts().len(), 1);
    assert_eq!(state.cohorts()[0].germination_start_hour, 30);
}

#[test]
fn column_weather_yaml_loads() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("weather.yaml");
    fs::write(
        &path,
        "temperature: [10.0, 11.0]\n\
         rainfall: [0.0, 0.4]\n\
         relative_humidity: [90.0, 95.0]\n\
         leaf_litter_moist: [false, true]\n",
    )
    .unwrap();

    let weather = WeatherSeries::load(&path).unwrap();
    assert_eq!(weather.len(), 2);
    assert_eq!(
        weather.sample(1),
        Some(HourlyWeather {
            temperature: 11.0,
            rainfall: 0.4,
            relative_humidity: 95.0,
            leaf_litter_moist: true,
        })
    );
}

#[test]
fn unsupported_weather_extension_is_an_error() {
    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("weather.csv");
    fs::write(&path, "temperature,rainfall\n").unwrap();
    assert!(WeatherSeries::load(&path).is_err());
}

#[test]
fn date_overrides_are_validated() {
    let loader = ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"));
    let scenario = loader.load("scenarios/vineyard_spring.yaml").unwrap();
    let start = scenario.start_date;
    let inverted = scenario.with_dates(None, Some(start));
    assert!(inverted.window().is_err());
}

#[test]
fn report_round_trips_through_file() {
    let loader = ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"));
    let scenario = loader
        .load("scenarios/vineyard_spring.yaml")
        .unwrap()
        .with_dates(None, Some(chrono::NaiveDate::from_ymd_opt(2024, 4, 1).unwrap()));
    let window = scenario.window().unwrap();
    let engine = Engine::new(scenario.parameters).unwrap();
    let state = engine.run(&scenario.weather().unwrap(), &window).unwrap();
    let report = SimulationReport::from_run(&scenario.name, &window, engine.params(), &state);

    let temp = tempdir().expect("tempdir");
    let path = temp.path().join("reports/run.json");
    report.write(&path).unwrap();
    let loaded: SimulationReport =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(loaded.totals, report.totals);
    assert_eq!(loaded.cohorts.len(), report.cohorts.len());
}
