//! End-to-end calculator flow with stubbed advice sources

use async_trait::async_trait;
use bmi_advisor::advice::{AdviceFormatter, AdviceSource};
use bmi_advisor::bmi::{BmiResult, Category, Measurement};
use bmi_advisor::calculator::render::ADVICE_FALLBACK;
use bmi_advisor::calculator::{AdviceOutcome, Calculator, CalculatorState, FormInput, View};
use bmi_advisor::{AdvisorError, Result};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Records every request and replies with a canned answer
struct RecordingAdvice {
    reply: std::result::Result<String, String>,
    seen: Mutex<Vec<(f64, f64, String)>>,
}

impl RecordingAdvice {
    fn ok(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn failing(reason: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(reason.to_string()),
            seen: Mutex::new(Vec::new()),
        })
    }

    fn calls(&self) -> usize {
        self.seen.lock().unwrap().len()
    }
}

#[async_trait]
impl AdviceSource for RecordingAdvice {
    async fn fetch_advice(&self, measurement: &Measurement, bmi: &BmiResult) -> Result<String> {
        self.seen.lock().unwrap().push((
            measurement.height_cm(),
            measurement.weight_kg(),
            bmi.display_value(),
        ));
        self.reply
            .clone()
            .map_err(AdvisorError::AdviceUnavailable)
    }
}

fn calculator_with(source: Arc<RecordingAdvice>) -> Calculator {
    Calculator::with_advice_source(AdviceFormatter::default(), source)
}

#[tokio::test]
async fn test_full_cycle_with_advice() {
    let source = RecordingAdvice::ok("Overall Analysis: healthy\n- keep walking\n- sleep 8h");
    let mut calculator = calculator_with(source.clone());

    assert_eq!(calculator.state(), CalculatorState::Ready);
    assert_eq!(calculator.view(), &View::Form);

    calculator.set_input(FormInput::new(" 170 ", "65"));
    let html = calculator.press().await.unwrap().to_html();

    assert_eq!(calculator.state(), CalculatorState::Result);
    assert!(html.starts_with(r#"<div class="bmi-result">Your BMI is: 22.5 (Normal)</div>"#));
    assert!(html.contains(r#"<div class="ai-advice"><div class="ai-advice-container">"#));
    assert!(html.contains("<ul><li>keep walking</li><li>sleep 8h</li></ul>"));
    assert_eq!(source.seen.lock().unwrap()[0], (170.0, 65.0, "22.5".to_string()));

    calculator.press().await.unwrap();
    assert_eq!(calculator.state(), CalculatorState::Ready);
    assert_eq!(calculator.view(), &View::Form);
    assert_eq!(calculator.input(), &FormInput::default());
}

#[tokio::test]
async fn test_invalid_input_skips_advice() {
    let source = RecordingAdvice::ok("unused");
    let mut calculator = calculator_with(source.clone());

    for (height, weight) in [("", "65"), ("170", "heavy"), ("0", "65"), ("170", "400")] {
        calculator.set_input(FormInput::new(height, weight));
        let view = calculator.press().await.unwrap();
        assert!(
            matches!(view, View::Invalid { .. }),
            "{:?}/{:?} should be invalid",
            height,
            weight
        );
        assert_eq!(calculator.state(), CalculatorState::Result);
        calculator.press().await.unwrap();
        assert_eq!(calculator.state(), CalculatorState::Ready);
    }

    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn test_tiny_height_never_renders_infinity() {
    let source = RecordingAdvice::ok("unused");
    let mut calculator = calculator_with(source.clone());

    assert!(FormInput::new("1e-160", "350").parse().is_err());

    calculator.set_input(FormInput::new("1e-160", "350"));
    let view = calculator.press().await.unwrap();
    assert!(matches!(view, View::Invalid { .. }), "unexpected view: {:?}", view);

    let html = view.to_html();
    assert!(!html.contains("inf"));
    assert!(html.contains("0-300 cm"));
    assert_eq!(calculator.state(), CalculatorState::Result);
    assert_eq!(source.calls(), 0);
}

#[tokio::test]
async fn test_advice_failure_shows_fallback() {
    let source = RecordingAdvice::failing("HTTP 502");
    let mut calculator = calculator_with(source.clone());
    calculator.set_input(FormInput::new("175", "75"));

    let view = calculator.press().await.unwrap();
    match view {
        View::Computed { bmi, advice, advice_text, .. } => {
            assert_eq!(bmi.category, Category::Overweight);
            assert!(advice_text.is_none());
            assert_eq!(
                advice,
                &AdviceOutcome::Unavailable {
                    reason: "Advice unavailable: HTTP 502".to_string()
                }
            );
        }
        other => panic!("unexpected view: {:?}", other),
    }

    let html = view.to_html();
    assert!(html.contains("Your BMI is: 24.5 (Overweight)"));
    assert!(html.contains(ADVICE_FALLBACK));
    assert!(!html.contains("HTTP 502"));
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_hostile_advice_is_escaped() {
    let source = RecordingAdvice::ok("<script>steal()</script>");
    let mut calculator = calculator_with(source);
    calculator.set_input(FormInput::new("170", "65"));

    let html = calculator.press().await.unwrap().to_html();
    assert!(!html.contains("<script>"));
    assert!(html.contains("&lt;script&gt;steal()&lt;/script&gt;"));
}

#[tokio::test]
async fn test_progress_runs_before_advice() {
    let source = RecordingAdvice::ok("fine");
    let mut calculator = calculator_with(source.clone());
    calculator.set_input(FormInput::new("180", "55"));

    let progress_calls = AtomicUsize::new(0);
    let view = calculator
        .press_with_progress(|bmi| {
            assert_eq!(bmi.display_value(), "17.0");
            assert_eq!(source.calls(), 0);
            progress_calls.fetch_add(1, Ordering::SeqCst);
        })
        .await
        .unwrap();

    assert_eq!(view.bmi().map(|b| b.category), Some(Category::Underweight));
    assert_eq!(progress_calls.load(Ordering::SeqCst), 1);
    assert_eq!(source.calls(), 1);
}

#[tokio::test]
async fn test_without_source_only_bmi_is_shown() {
    let mut calculator = Calculator::new(AdviceFormatter::default());
    calculator.set_input(FormInput::new("160", "80"));

    let html = calculator.press().await.unwrap().to_html();
    assert_eq!(html, r#"<div class="bmi-result">Your BMI is: 31.3 (Obese)</div>"#);
}
