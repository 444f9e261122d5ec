//! BMI computation
//!
//! `bmi = weight_kg / (height_cm / 100)^2`, rounded half away from zero to
//! one decimal place. The category is derived from the rounded value so the
//! label shown next to a number always agrees with that number.

use crate::bmi::category::Category;
use crate::errors::{AdvisorError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest accepted height in centimeters (inclusive)
pub const MAX_HEIGHT_CM: f64 = 300.0;

/// Largest accepted weight in kilograms (inclusive)
pub const MAX_WEIGHT_KG: f64 = 350.0;

/// A validated height/weight pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
    height_cm: f64,
    weight_kg: f64,
}

impl Measurement {
    /// Validate and build a measurement
    ///
    /// Accepts `0 < height <= 300` and `0 < weight <= 350` whose BMI is finite.
    pub fn new(height_cm: f64, weight_kg: f64) -> Result<Self> {
        ensure_positive_finite("height", height_cm)?;
        ensure_positive_finite("weight", weight_kg)?;

        if height_cm > MAX_HEIGHT_CM {
            return Err(AdvisorError::invalid_measurement(format!(
                "height must be at most {} cm, got {}",
                MAX_HEIGHT_CM, height_cm
            )));
        }
        if weight_kg > MAX_WEIGHT_KG {
            return Err(AdvisorError::invalid_measurement(format!(
                "weight must be at most {} kg, got {}",
                MAX_WEIGHT_KG, weight_kg
            )));
        }

        ensure_representable(height_cm, weight_kg)?;

        Ok(Self {
            height_cm,
            weight_kg,
        })
    }

    pub fn height_cm(&self) -> f64 {
        self.height_cm
    }

    pub fn weight_kg(&self) -> f64 {
        self.weight_kg
    }

    /// Height converted to meters
    pub fn height_m(&self) -> f64 {
        self.height_cm / 100.0
    }

    /// Compute the BMI for this measurement
    ///
    /// Infallible: `new` already rejected pairs whose ratio is not finite.
    pub fn bmi(&self) -> BmiResult {
        let height_m = self.height_m();
        BmiResult::from_raw(self.weight_kg / (height_m * height_m))
    }
}

/// BMI value and its category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BmiResult {
    /// Rounded to one decimal place
    pub value: f64,
    /// Unrounded ratio, kept for diagnostics only
    pub raw: f64,
    pub category: Category,
}

impl BmiResult {
    fn from_raw(raw: f64) -> Self {
        let value = round_one_decimal(raw);
        Self {
            value,
            raw,
            category: Category::classify(value),
        }
    }

    /// The value formatted to exactly one decimal place, e.g. `"22.5"`
    pub fn display_value(&self) -> String {
        format!("{:.1}", self.value)
    }
}

impl fmt::Display for BmiResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1} ({})", self.value, self.category)
    }
}

/// Compute BMI from raw numbers
///
/// Rejects non-finite or non-positive input and ratios that overflow; range
/// checks belong to [`Measurement::new`].
pub fn compute(height_cm: f64, weight_kg: f64) -> Result<BmiResult> {
    ensure_positive_finite("height", height_cm)?;
    ensure_positive_finite("weight", weight_kg)?;

    let raw = ensure_representable(height_cm, weight_kg)?;
    Ok(BmiResult::from_raw(raw))
}

/// Round half away from zero to one decimal place
pub fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Unrounded ratio, rejected when it overflows to infinity
fn ensure_representable(height_cm: f64, weight_kg: f64) -> Result<f64> {
    let height_m = height_cm / 100.0;
    let raw = weight_kg / (height_m * height_m);
    if !raw.is_finite() {
        return Err(AdvisorError::invalid_measurement(format!(
            "BMI is not representable for height {:e} cm and weight {:e} kg",
            height_cm, weight_kg
        )));
    }
    Ok(raw)
}

fn ensure_positive_finite(name: &str, value: f64) -> Result<()> {
    if !value.is_finite() {
        return Err(AdvisorError::invalid_measurement(format!(
            "{} must be a finite number",
            name
        )));
    }
    if value <= 0.0 {
        return Err(AdvisorError::invalid_measurement(format!(
            "{} must be greater than 0, got {}",
            name, value
        )));
    }
    Ok(())
}
