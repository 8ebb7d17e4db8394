//! Cleaning and summarization of observation batches.
//!
//! Every operation here is a stateless transformation over its explicit
//! inputs; nothing is retained between calls.

use std::fs;
use std::path::Path;

use serde::Serialize;
use serde_json::{Value, ser::PrettyFormatter};
use tracing::debug;

use crate::error::{Result, WeatherError};
use crate::model::{IndicatorStats, SummaryStatistics, WeatherRecord};

/// Columnar table of observations.
///
/// A numeric cell that failed coercion holds `None` and is dropped later by
/// [`WeatherTable::clean`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WeatherTable {
    city: Vec<String>,
    temp: Vec<Option<f64>>,
    humidity: Vec<Option<f64>>,
    pressure: Vec<Option<f64>>,
}

impl WeatherTable {
    /// Build a table from loosely-typed JSON rows.
    ///
    /// Each row must be an object; `temp`, `humidity` and `pressure` are
    /// coerced to numbers. A value that cannot be read as a number becomes a
    /// missing cell instead of failing the whole batch.
    pub fn from_rows(rows: &[Value]) -> Result<Self> {
        if rows.is_empty() {
            return Err(WeatherError::Analysis(
                "input record list cannot be empty".into(),
            ));
        }

        let mut table = Self::default();
        for (idx, row) in rows.iter().enumerate() {
            let obj = row
                .as_object()
                .ok_or_else(|| WeatherError::Analysis(format!("record {idx} is not an object")))?;

            let city = obj
                .get("city")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string();

            table.city.push(city);
            table.temp.push(coerce_numeric(obj.get("temp")));
            table.humidity.push(coerce_numeric(obj.get("humidity")));
            table.pressure.push(coerce_numeric(obj.get("pressure")));
        }

        Ok(table)
    }

    /// Build a table from already-validated records. No cell can be missing.
    pub fn from_records(records: &[WeatherRecord]) -> Result<Self> {
        if records.is_empty() {
            return Err(WeatherError::Analysis(
                "input record list cannot be empty".into(),
            ));
        }

        let mut table = Self::default();
        for record in records {
            table.city.push(record.city.clone());
            table.temp.push(Some(record.temp));
            table.humidity.push(Some(record.humidity));
            table.pressure.push(Some(record.pressure));
        }

        Ok(table)
    }

    pub fn len(&self) -> usize {
        self.city.len()
    }

    pub fn is_empty(&self) -> bool {
        self.city.is_empty()
    }

    /// Drop rows with a missing numeric cell, then rows with humidity outside
    /// 0..=100 or pressure <= 0. Row order is preserved; an empty result is
    /// valid.
    pub fn clean(&self) -> CleanedTable {
        let mut kept = Self::default();
        for i in 0..self.len() {
            let (Some(temp), Some(humidity), Some(pressure)) =
                (self.temp[i], self.humidity[i], self.pressure[i])
            else {
                continue;
            };

            if !(0.0..=100.0).contains(&humidity) || pressure <= 0.0 {
                continue;
            }

            kept.city.push(self.city[i].clone());
            kept.temp.push(Some(temp));
            kept.humidity.push(Some(humidity));
            kept.pressure.push(Some(pressure));
        }

        debug!(
            kept = kept.len(),
            dropped = self.len() - kept.len(),
            "cleaned observation table"
        );

        CleanedTable(kept)
    }
}

/// A table whose rows all passed [`WeatherTable::clean`].
#[derive(Debug, Clone, PartialEq)]
pub struct CleanedTable(WeatherTable);

impl CleanedTable {
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_table(&self) -> &WeatherTable {
        &self.0
    }

    /// Mean, min and max per indicator, each rounded to two decimal places
    /// (halves away from zero).
    pub fn summary_statistics(&self) -> Result<SummaryStatistics> {
        if self.is_empty() {
            return Err(WeatherError::Analysis(
                "cannot calculate statistics: table is empty after cleaning".into(),
            ));
        }

        let columns = [
            ("temp", &self.0.temp),
            ("humidity", &self.0.humidity),
            ("pressure", &self.0.pressure),
        ];

        let mut stats = SummaryStatistics::new();
        for (indicator, column) in columns {
            let mut sum = 0.0;
            let mut min = f64::INFINITY;
            let mut max = f64::NEG_INFINITY;

            // Every cell is Some by construction.
            for value in column.iter().flatten() {
                sum += value;
                min = min.min(*value);
                max = max.max(*value);
            }

            let mean = sum / self.len() as f64;

            stats.insert(
                indicator.to_string(),
                IndicatorStats {
                    mean: round2(mean),
                    min: round2(min),
                    max: round2(max),
                },
            );
        }

        Ok(stats)
    }
}

/// Write summary statistics as UTF-8 JSON with 4-space indentation,
/// overwriting any existing file at `path`.
pub fn save_summary_to_json(stats: &SummaryStatistics, path: impl AsRef<Path>) -> Result<()> {
    if stats.is_empty() {
        return Err(WeatherError::Analysis(
            "statistics are empty, nothing to save".into(),
        ));
    }

    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    stats.serialize(&mut ser).map_err(|e| {
        WeatherError::Analysis(format!("failed to serialize statistics: {e}"))
    })?;

    let path = path.as_ref();
    fs::write(path, buf).map_err(|e| {
        WeatherError::Analysis(format!(
            "failed to write statistics file {}: {e}",
            path.display()
        ))
    })?;

    Ok(())
}

/// Convert a Celsius temperature to Kelvin.
pub fn celsius_to_kelvin(temp_c: f64) -> Result<f64> {
    if !temp_c.is_finite() {
        return Err(WeatherError::InvalidInput(format!(
            "temperature must be a finite number, got {temp_c}"
        )));
    }

    Ok(temp_c + 273.15)
}

fn coerce_numeric(value: Option<&Value>) -> Option<f64> {
    match value {
        Some(Value::Number(n)) => n.as_f64(),
        // A string that parses to NaN or an infinity is still a missing cell.
        Some(Value::String(s)) => s.trim().parse().ok().filter(|v: &f64| v.is_finite()),
        _ => None,
    }
}

/// Round to two decimal places, halves away from zero.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
