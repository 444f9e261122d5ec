//! Calculator state machine
//!
//! Two states and one button. The button's meaning depends on the state:
//!
//! Valid transitions:
//! 1. Ready  -> Result (on: Calculate)
//! 2. Result -> Ready  (on: Reset)
//!
//! Every other pair is rejected, so a result can never be computed twice
//! without an intervening reset.

use crate::errors::{AdvisorError, Result};
use serde::{Deserialize, Serialize};

/// Calculator states
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculatorState {
    /// Waiting for height and weight
    #[default]
    Ready,

    /// Showing a result or an input error; the next press resets
    Result,
}

/// Events that trigger state transitions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalculatorEvent {
    Calculate,
    Reset,
}

impl CalculatorState {
    /// Attempt state transition with validation
    pub fn transition(&self, event: CalculatorEvent) -> Result<CalculatorState> {
        match (self, event) {
            (CalculatorState::Ready, CalculatorEvent::Calculate) => Ok(CalculatorState::Result),
            (CalculatorState::Result, CalculatorEvent::Reset) => Ok(CalculatorState::Ready),
            (from, event) => Err(AdvisorError::InvalidTransition {
                from: format!("{:?}", from),
                event: format!("{:?}", event),
            }),
        }
    }

    /// The event a button press stands for in this state
    pub fn press_event(&self) -> CalculatorEvent {
        match self {
            CalculatorState::Ready => CalculatorEvent::Calculate,
            CalculatorState::Result => CalculatorEvent::Reset,
        }
    }

    /// Whether height and weight may be edited
    pub fn accepts_input(&self) -> bool {
        matches!(self, CalculatorState::Ready)
    }

    /// Button caption
    pub fn button_label(&self) -> &'static str {
        match self {
            CalculatorState::Ready => "Calculate BMI",
            CalculatorState::Result => "Retry",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_transitions() {
        assert_eq!(
            CalculatorState::Ready.transition(CalculatorEvent::Calculate).unwrap(),
            CalculatorState::Result
        );
        assert_eq!(
            CalculatorState::Result.transition(CalculatorEvent::Reset).unwrap(),
            CalculatorState::Ready
        );
    }

    #[test]
    fn test_invalid_transitions() {
        assert!(CalculatorState::Ready.transition(CalculatorEvent::Reset).is_err());
        assert!(CalculatorState::Result.transition(CalculatorEvent::Calculate).is_err());
    }

    #[test]
    fn test_press_event_always_valid() {
        for state in [CalculatorState::Ready, CalculatorState::Result] {
            assert!(state.transition(state.press_event()).is_ok());
        }
    }

    #[test]
    fn test_labels_and_input() {
        assert_eq!(CalculatorState::default(), CalculatorState::Ready);
        assert!(CalculatorState::Ready.accepts_input());
        assert!(!CalculatorState::Result.accepts_input());
        assert_eq!(CalculatorState::Result.button_label(), "Retry");
    }
}
