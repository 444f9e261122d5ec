//! Raw form input parsing

use crate::bmi::Measurement;
use crate::errors::{AdvisorError, Result};
use serde::{Deserialize, Serialize};

/// Height and weight exactly as typed by the user
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormInput {
    pub height: String,
    pub weight: String,
}

impl FormInput {
    pub fn new(height: impl Into<String>, weight: impl Into<String>) -> Self {
        Self {
            height: height.into(),
            weight: weight.into(),
        }
    }

    /// Parse and validate into a measurement
    pub fn parse(&self) -> Result<Measurement> {
        let height = parse_number("height", &self.height)?;
        let weight = parse_number("weight", &self.weight)?;
        Measurement::new(height, weight)
    }

    pub fn clear(&mut self) {
        self.height.clear();
        self.weight.clear();
    }
}

fn parse_number(name: &str, raw: &str) -> Result<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AdvisorError::invalid_measurement(format!("{} is required", name)));
    }
    trimmed.parse::<f64>().map_err(|_| {
        AdvisorError::invalid_measurement(format!("{} must be a number, got '{}'", name, trimmed))
    })
}
