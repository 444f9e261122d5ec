//! Weight-status categories and their fixed BMI thresholds

use serde::{Deserialize, Serialize};
use std::fmt;

/// Lower bound of the Normal range
pub const NORMAL_MIN: f64 = 18.5;

/// Lower bound of the Overweight range
pub const OVERWEIGHT_MIN: f64 = 24.0;

/// Lower bound of the Obese range
pub const OBESE_MIN: f64 = 28.0;

/// Weight-status label derived from a BMI value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    /// BMI below 18.5
    Underweight,

    /// 18.5 up to (not including) 24
    Normal,

    /// 24 up to (not including) 28
    Overweight,

    /// 28 and above
    Obese,
}

impl Category {
    /// Classify a BMI value using the fixed thresholds
    ///
    /// Total over finite inputs; NaN falls through to `Obese` because every
    /// comparison with it is false, so callers must only pass finite values.
    pub fn classify(bmi: f64) -> Category {
        if bmi < NORMAL_MIN {
            Category::Underweight
        } else if bmi < OVERWEIGHT_MIN {
            Category::Normal
        } else if bmi < OBESE_MIN {
            Category::Overweight
        } else {
            Category::Obese
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Category::Underweight => "Underweight",
            Category::Normal => "Normal",
            Category::Overweight => "Overweight",
            Category::Obese => "Obese",
        }
    }

    /// Half-open BMI range covered by this category
    pub fn range(&self) -> (Option<f64>, Option<f64>) {
        match self {
            Category::Underweight => (None, Some(NORMAL_MIN)),
            Category::Normal => (Some(NORMAL_MIN), Some(OVERWEIGHT_MIN)),
            Category::Overweight => (Some(OVERWEIGHT_MIN), Some(OBESE_MIN)),
            Category::Obese => (Some(OBESE_MIN), None),
        }
    }

    /// All categories in ascending BMI order
    pub fn all() -> [Category; 4] {
        [
            Category::Underweight,
            Category::Normal,
            Category::Overweight,
            Category::Obese,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
