//! Core library for the `skystat` CLI.
//!
//! This crate defines:
//! - Fetching current observations from OpenWeatherMap
//! - Cleaning and summarization of observation batches
//! - Configuration & credentials handling
//! - Shared domain models and the crate error type
//!
//! It is used by `skystat-cli`, but can also be reused by other binaries or
//! services.

pub mod analyzer;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod model;

pub use analyzer::{CleanedTable, WeatherTable, celsius_to_kelvin, save_summary_to_json};
pub use config::Config;
pub use error::{Result, WeatherError};
pub use fetcher::{OpenWeatherFetcher, WeatherSource};
pub use model::{IndicatorStats, SummaryStatistics, WeatherRecord};
