//! HTML views of calculator results

use crate::advice::formatter::escape_html;
use crate::bmi::BmiResult;

/// Shown in place of advice when the advice service fails
pub const ADVICE_FALLBACK: &str = "Unable to fetch advice right now. Please try again later.";

/// Shown when height or weight is rejected
pub const INVALID_INPUT_MESSAGE: &str =
    "Please enter valid values:<br>height (0-300 cm), weight (0-350 kg)";

/// Shown while advice is being fetched
pub const LOADING_MESSAGE: &str = "Fetching personalised advice...";

/// `Your BMI is: 22.5 (Normal)`
pub fn bmi_line(bmi: &BmiResult) -> String {
    format!("Your BMI is: {} ({})", bmi.display_value(), bmi.category)
}

pub fn bmi_html(bmi: &BmiResult) -> String {
    format!(r#"<div class="bmi-result">{}</div>"#, bmi_line(bmi))
}

/// BMI result plus a loading indicator
pub fn loading_html(bmi: &BmiResult) -> String {
    format!(
        r#"{}<div class="loading"><div class="loading-spinner"></div>{}</div>"#,
        bmi_html(bmi),
        LOADING_MESSAGE
    )
}

/// BMI result plus an already-sanitized advice fragment
pub fn advice_html(bmi: &BmiResult, advice_fragment: &str) -> String {
    format!(
        r#"{}<div class="ai-advice">{}</div>"#,
        bmi_html(bmi),
        advice_fragment
    )
}

/// BMI result with the fallback message
pub fn fallback_html(bmi: &BmiResult) -> String {
    advice_html(bmi, &escape_html(ADVICE_FALLBACK))
}

pub fn invalid_input_html() -> String {
    format!(r#"<div class="input-error">{}</div>"#, INVALID_INPUT_MESSAGE)
}
