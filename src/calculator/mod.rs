//! Calculator controller
//!
//! Owns the `{Ready, Result}` state machine and routes every button press
//! through [`Calculator::press`]. A press in `Ready` validates input,
//! computes the BMI and asks the advice source; a press in `Result` resets.
//!
//! Advice failures never hide the BMI: they degrade to a fallback message.

pub mod input;
pub mod render;
pub mod state;

pub use input::FormInput;
pub use state::{CalculatorEvent, CalculatorState};

use crate::advice::{AdviceFormatter, AdviceFragment, AdviceSource};
use crate::bmi::{BmiResult, Measurement};
use crate::errors::{AdvisorError, Result};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What happened to the advice request
#[derive(Debug, Clone, PartialEq)]
pub enum AdviceOutcome {
    /// Advice was fetched and formatted
    Ready(AdviceFragment),

    /// The source failed; the reason is for logs, not for display
    Unavailable { reason: String },

    /// No advice source is configured
    Skipped,
}

impl AdviceOutcome {
    pub fn fragment(&self) -> Option<&AdviceFragment> {
        match self {
            AdviceOutcome::Ready(fragment) => Some(fragment),
            _ => None,
        }
    }

    pub fn is_unavailable(&self) -> bool {
        matches!(self, AdviceOutcome::Unavailable { .. })
    }
}

/// What the result area shows after a press
#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// Empty form, waiting for input
    Form,

    /// Input was rejected
    Invalid { reason: String },

    /// BMI computed, with or without advice
    Computed {
        measurement: Measurement,
        bmi: BmiResult,
        /// Raw advice text as returned by the source
        advice_text: Option<String>,
        advice: AdviceOutcome,
    },
}

impl View {
    /// HTML for the result area
    pub fn to_html(&self) -> String {
        match self {
            View::Form => String::new(),
            View::Invalid { .. } => render::invalid_input_html(),
            View::Computed { bmi, advice, .. } => match advice {
                AdviceOutcome::Ready(fragment) if !fragment.is_empty() => {
                    render::advice_html(bmi, fragment.as_str())
                }
                AdviceOutcome::Skipped => render::bmi_html(bmi),
                _ => render::fallback_html(bmi),
            },
        }
    }

    pub fn bmi(&self) -> Option<&BmiResult> {
        match self {
            View::Computed { bmi, .. } => Some(bmi),
            _ => None,
        }
    }
}

/// Single-button BMI calculator
pub struct Calculator {
    state: CalculatorState,
    input: FormInput,
    source: Option<Arc<dyn AdviceSource>>,
    formatter: AdviceFormatter,
    view: View,
}

impl Calculator {
    /// Calculator without an advice source
    pub fn new(formatter: AdviceFormatter) -> Self {
        Self {
            state: CalculatorState::Ready,
            input: FormInput::default(),
            source: None,
            formatter,
            view: View::Form,
        }
    }

    /// Calculator that fetches advice after each computation
    pub fn with_advice_source(formatter: AdviceFormatter, source: Arc<dyn AdviceSource>) -> Self {
        let mut calculator = Self::new(formatter);
        calculator.source = Some(source);
        calculator
    }

    pub fn state(&self) -> CalculatorState {
        self.state
    }

    pub fn view(&self) -> &View {
        &self.view
    }

    pub fn input(&self) -> &FormInput {
        &self.input
    }

    /// Replace the typed input; ignored unless the state accepts input
    pub fn set_input(&mut self, input: FormInput) -> bool {
        if !self.state.accepts_input() {
            return false;
        }
        self.input = input;
        true
    }

    /// Press the button
    pub async fn press(&mut self) -> Result<&View> {
        self.press_with_progress(|_| {}).await
    }

    /// Press the button, reporting the BMI before advice is requested
    ///
    /// `on_computed` runs once the BMI is known and before the advice call,
    /// so a front end can show the number while waiting.
    pub async fn press_with_progress<F>(&mut self, on_computed: F) -> Result<&View>
    where
        F: FnOnce(&BmiResult),
    {
        let event = self.state.press_event();
        let next = self.state.transition(event)?;

        self.view = match event {
            CalculatorEvent::Calculate => self.calculate(on_computed).await,
            CalculatorEvent::Reset => {
                self.input.clear();
                View::Form
            }
        };
        debug!(from = ?self.state, to = ?next, "calculator transition");
        self.state = next;

        Ok(&self.view)
    }

    async fn calculate<F>(&self, on_computed: F) -> View
    where
        F: FnOnce(&BmiResult),
    {
        let measurement = match self.input.parse() {
            Ok(measurement) => measurement,
            Err(AdvisorError::InvalidMeasurement { reason }) => {
                info!(%reason, "rejected measurement");
                return View::Invalid { reason };
            }
            Err(other) => {
                return View::Invalid {
                    reason: other.to_string(),
                }
            }
        };

        let bmi = measurement.bmi();
        info!(bmi = %bmi.display_value(), category = %bmi.category, "bmi computed");
        on_computed(&bmi);

        let (advice_text, advice) = match &self.source {
            None => (None, AdviceOutcome::Skipped),
            Some(source) => match source.fetch_advice(&measurement, &bmi).await {
                Ok(text) => {
                    let fragment = self.formatter.format(&text);
                    (Some(text), AdviceOutcome::Ready(fragment))
                }
                Err(e) => {
                    warn!(error = %e, "advice unavailable");
                    (
                        None,
                        AdviceOutcome::Unavailable {
                            reason: e.to_string(),
                        },
                    )
                }
            },
        };

        View::Computed {
            measurement,
            bmi,
            advice_text,
            advice,
        }
    }
}
