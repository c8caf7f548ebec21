use std::path::PathBuf;
use std::process::ExitCode;

use airlog::{
    Acquisition, AcquisitionService, AirLogConfig, AirLogError, AnalysisResult, Analyzer, Ledger,
};
use anyhow::Result;
use clap::{Parser, Subcommand};

/// Weather and air-quality logger
#[derive(Debug, Parser)]
#[command(name = "airlog", version, about)]
struct Cli {
    /// Path to a TOML config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Only log warnings and errors
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch current weather and air quality for a city and log it
    Fetch {
        /// City or place name
        city: String,
    },
    /// Plot-ready trend and correlation matrix over the logged data
    Analyze,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            match e.downcast_ref::<AirLogError>() {
                Some(err) => {
                    tracing::debug!("{err}");
                    eprintln!("Error: {}", err.user_message());
                }
                None => eprintln!("Error: {e:#}"),
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let config = match cli.config {
        Some(path) => AirLogConfig::load_from_path(Some(path))?,
        None => AirLogConfig::load()?,
    };
    airlog::logging::init(&config.logging, cli.verbose, cli.quiet);

    match cli.command {
        Commands::Fetch { city } => {
            let service = AcquisitionService::from_config(&config)?;
            let acquisition = service.acquire(&city)?;
            print_acquisition(&acquisition);
        }
        Commands::Analyze => {
            let analyzer = Analyzer::new(Ledger::new(config.ledger.path.clone()));
            let result = analyzer.analyze()?;
            print_analysis(&result);
        }
    }
    Ok(())
}

fn print_acquisition(acquisition: &Acquisition) {
    let weather = &acquisition.weather;
    let air = &acquisition.air_quality;

    println!("{}", acquisition.record.city);
    println!(
        "Weather: {}, {}",
        weather.format_temperature(),
        weather.format_description()
    );
    println!("Icon: {}", weather.icon_url());
    println!("Air quality index (AQI): {} ({})", air.aqi, air.category());
    println!("{}", air.format_pollutants());
}

fn print_analysis(result: &AnalysisResult) {
    println!("Temperature vs. Air Quality Index Over Time");
    println!("{:<20} {:>12} {:>5}", "Time", "Temperature", "AQI");
    for point in &result.trend {
        println!(
            "{:<20} {:>12} {:>5}",
            point.timestamp.format(airlog::models::TIMESTAMP_FORMAT).to_string(),
            point.temperature_c,
            point.aqi
        );
    }
    println!();
    println!("Correlation Matrix:");
    print!("{}", result.correlation.render());
}
