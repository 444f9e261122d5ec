//! bmi-advisor v0.5.0 - BMI calculator with AI health advice
//!
//! Computes a Body Mass Index from height and weight, classifies it, and
//! renders untrusted advice text from a chat-completion endpoint as a small,
//! escaped HTML fragment.
//!
//! # Architecture
//!
//! - **bmi**: measurement validation, computation and categories
//! - **advice**: chat client, prompt builder and the advice formatter
//! - **calculator**: single-button `{Ready, Result}` state machine
//! - **cli** / **repl**: command line and interactive terminal front ends

pub mod errors;

pub mod bmi;
pub mod advice;
pub mod calculator;

pub mod cli;
pub mod repl;

// Re-export commonly used types
pub use errors::{AdvisorError, Result};
pub use bmi::{compute, BmiResult, Category, Measurement};
pub use advice::{format_advice, AdviceFormatter, AdviceFragment};
pub use calculator::{Calculator, CalculatorState, View};
