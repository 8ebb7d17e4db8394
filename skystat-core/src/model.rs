use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WeatherError};

/// One current-weather observation for a single city, in metric units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city: String,
    /// Air temperature, °C.
    pub temp: f64,
    /// Relative humidity, percent.
    pub humidity: f64,
    /// Atmospheric pressure, hPa.
    pub pressure: f64,
}

impl WeatherRecord {
    /// Build a record, rejecting malformed fields at the boundary.
    ///
    /// Range checks (humidity within 0..=100, positive pressure) are not
    /// applied here; out-of-range observations are kept and filtered later
    /// by [`crate::analyzer::WeatherTable::clean`].
    pub fn new(
        city: impl Into<String>,
        temp: f64,
        humidity: f64,
        pressure: f64,
    ) -> Result<Self> {
        let city = city.into();
        if city.trim().is_empty() {
            return Err(WeatherError::InvalidInput(
                "city name must be a non-empty string".into(),
            ));
        }

        for (field, value) in [("temp", temp), ("humidity", humidity), ("pressure", pressure)] {
            if !value.is_finite() {
                return Err(WeatherError::InvalidInput(format!(
                    "{field} must be a finite number, got {value}"
                )));
            }
        }

        Ok(Self { city, temp, humidity, pressure })
    }
}

/// Mean, minimum and maximum of one indicator over a cleaned table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IndicatorStats {
    pub mean: f64,
    pub min: f64,
    pub max: f64,
}

/// Indicator name (`temp`, `humidity`, `pressure`) to its statistics.
///
/// A `BTreeMap` keeps serialized output deterministic.
pub type SummaryStatistics = BTreeMap<String, IndicatorStats>;
