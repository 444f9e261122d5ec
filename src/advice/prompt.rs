//! Prompt construction for the advice request

use crate::advice::formatter::DEFAULT_SECTION_TITLES;
use crate::advice::types::ChatMessage;
use crate::bmi::{BmiResult, Measurement};

/// Default system prompt
pub const DEFAULT_SYSTEM_PROMPT: &str =
    "You are a senior medical weight consultant who gives scientific, healthy weight-management advice.";

/// Builds the system and user messages sent to the advice endpoint
#[derive(Debug, Clone)]
pub struct PromptBuilder {
    system_prompt: String,
    sections: Vec<String>,
}

impl Default for PromptBuilder {
    fn default() -> Self {
        Self {
            system_prompt: DEFAULT_SYSTEM_PROMPT.to_string(),
            sections: DEFAULT_SECTION_TITLES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl PromptBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = system_prompt.into();
        self
    }

    /// Sections the model is asked to cover, normally the formatter's titles
    pub fn with_sections(mut self, sections: &[String]) -> Self {
        self.sections = sections.to_vec();
        self
    }

    /// User prompt for a measurement and its BMI
    ///
    /// The BMI is quoted with one decimal so the model sees the same number
    /// as the user.
    pub fn user_prompt(&self, measurement: &Measurement, bmi: &BmiResult) -> String {
        let mut prompt = format!(
            "The user's height is {} cm, weight is {} kg, and BMI is {} ({}).\n",
            measurement.height_cm(),
            measurement.weight_kg(),
            bmi.display_value(),
            bmi.category
        );
        if !self.sections.is_empty() {
            prompt.push_str(&format!(
                "Based on the user's condition, please provide: {}.\n",
                self.sections.join(", ")
            ));
        }
        prompt.push_str("Reply in the voice of a leading medical weight consultant ");
        prompt.push_str("advising the user, in detail.\n");
        prompt.push_str("Leave a blank line between points and make the key points stand out.");
        prompt
    }

    /// Full message list: system prompt followed by the user prompt
    pub fn messages(&self, measurement: &Measurement, bmi: &BmiResult) -> Vec<ChatMessage> {
        vec![
            ChatMessage::system(self.system_prompt.clone()),
            ChatMessage::user(self.user_prompt(measurement, bmi)),
        ]
    }
}
