use std::path::PathBuf;

use anyhow::Result;
use chrono::NaiveDate;
use clap::Parser;
use tracing_subscriber::EnvFilter;

use mildew::{engine::Engine, report::SimulationReport, scenario::ScenarioLoader};

#[derive(Debug, Parser)]
#[command(author, version, about = "Hourly oospore life-cycle simulator")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/vineyard_spring.yaml")]
    scenario: PathBuf,

    /// Override the first simulated day (YYYY-MM-DD)
    #[arg(long)]
    start: Option<NaiveDate>,

    /// Override the day after the last simulated day (YYYY-MM-DD)
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Write the JSON report here ("-" for stdout)
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let scenario = loader.load(&cli.scenario)?.with_dates(cli.start, cli.end);

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&scenario.logging.level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let window = scenario.window()?;
    let weather = scenario.weather()?;
    let engine = Engine::new(scenario.parameters)?;
    let state = engine.run(&weather, &window)?;
    let report = SimulationReport::from_run(&scenario.name, &window, engine.params(), &state);

    match cli.output {
        Some(path) if path.as_os_str() == "-" => println!("{}", report.to_json()?),
        Some(path) => report.write(&path)?,
        None => {}
    }

    eprintln!(
        "Scenario '{}' simulated {} hours: {} cohorts, {} released, {} infected (first infection: {})",
        scenario.name,
        report.hours,
        report.totals.cohorts,
        report.totals.released,
        report.totals.infected,
        report
            .first_infection
            .map(|at| at.to_string())
            .unwrap_or_else(|| "none".into())
    );
    Ok(())
}
