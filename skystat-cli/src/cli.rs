use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use chrono::Utc;
use clap::{Parser, Subcommand};
use inquire::Password;

use skystat_core::{
    Config, OpenWeatherFetcher, SummaryStatistics, WeatherRecord, WeatherSource, WeatherTable,
    celsius_to_kelvin, save_summary_to_json,
};

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(name = "skystat", version, about = "Fetch and summarize city weather observations")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store the OpenWeatherMap API key.
    Configure,

    /// Fetch current weather for one or more cities and print a summary.
    Report {
        /// City names, e.g. "Kyiv" "London".
        #[arg(required = true)]
        cities: Vec<String>,

        /// Write the summary statistics to this JSON file.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Summarize observations from a JSON file (an array of objects with
    /// city, temp, humidity and pressure).
    Analyze {
        /// Input JSON file.
        input: PathBuf,

        /// Write the summary statistics to this JSON file.
        #[arg(long)]
        out: Option<PathBuf>,
    },

    /// Convert a Celsius temperature to Kelvin.
    Convert {
        /// Temperature in °C.
        temp_c: f64,
    },
}

impl Cli {
    pub async fn run(self) -> anyhow::Result<()> {
        match self.command {
            Command::Configure => configure(),
            Command::Report { cities, out } => report(&cities, out).await,
            Command::Analyze { input, out } => analyze(&input, out),
            Command::Convert { temp_c } => {
                println!("{temp_c:.2} °C = {:.2} K", celsius_to_kelvin(temp_c)?);
                Ok(())
            }
        }
    }
}

fn configure() -> anyhow::Result<()> {
    let mut config = Config::load()?;

    let api_key = Password::new("OpenWeatherMap API key:")
        .without_confirmation()
        .prompt()
        .context("Failed to read API key")?;

    // Rejects empty keys before they reach the config file.
    OpenWeatherFetcher::new(api_key.clone())?;

    config.set_api_key(api_key);
    config.save()?;

    println!("Saved configuration to {}", Config::config_file_path()?.display());
    Ok(())
}

async fn report(cities: &[String], out: Option<PathBuf>) -> anyhow::Result<()> {
    let config = Config::load()?;
    let fetcher = OpenWeatherFetcher::new(config.require_api_key()?)?;

    let records = collect_records(&fetcher, cities).await;
    if records.is_empty() {
        bail!("No observations could be fetched, nothing to summarize");
    }

    let table = WeatherTable::from_records(&records)?;
    summarize(&table, out.or(config.default_output))
}

fn analyze(input: &Path, out: Option<PathBuf>) -> anyhow::Result<()> {
    let config = Config::load()?;

    let contents = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input.display()))?;
    let rows: Vec<serde_json::Value> = serde_json::from_str(&contents)
        .with_context(|| format!("Input file is not a JSON array: {}", input.display()))?;

    let table = WeatherTable::from_rows(&rows)?;
    summarize(&table, out.or(config.default_output))
}

/// Fetch each city once, skipping the ones that fail.
async fn collect_records(source: &dyn WeatherSource, cities: &[String]) -> Vec<WeatherRecord> {
    let mut records = Vec::with_capacity(cities.len());
    for city in cities {
        match source.current_weather(city).await {
            Ok(record) => {
                println!(
                    "{}: {:.1} °C, {:.0}% humidity, {:.0} hPa",
                    record.city, record.temp, record.humidity, record.pressure
                );
                records.push(record);
            }
            Err(e) => eprintln!("Warning: skipping '{city}': {e}"),
        }
    }
    records
}

fn summarize(table: &WeatherTable, out: Option<PathBuf>) -> anyhow::Result<()> {
    let cleaned = table.clean();
    let stats = cleaned.summary_statistics()?;

    print_summary(&stats, cleaned.len());

    if let Some(path) = out {
        save_summary_to_json(&stats, &path)?;
        println!("\nWrote summary to {}", path.display());
    }

    Ok(())
}

fn print_summary(stats: &SummaryStatistics, rows: usize) {
    println!();
    println!(
        "Summary over {rows} observation(s), generated {}",
        Utc::now().format("%Y-%m-%d %H:%M UTC")
    );
    for (indicator, s) in stats {
        println!(
            "  {indicator:<9} mean {:>9.2}  min {:>9.2}  max {:>9.2}",
            s.mean, s.min, s.max
        );
    }
}
