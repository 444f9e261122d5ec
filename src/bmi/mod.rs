//! BMI engine
//!
//! Pure, synchronous and side-effect free. Safe to call from any thread.

pub mod category;
pub mod engine;

pub use category::Category;
pub use engine::{compute, round_one_decimal, BmiResult, Measurement, MAX_HEIGHT_CM, MAX_WEIGHT_KG};
