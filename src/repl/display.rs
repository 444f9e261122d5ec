//! Terminal rendering for the calculator
//!
//! Color-coded BMI lines, spinners while advice is pending, and plain or
//! HTML advice output.

use crate::advice::formatter::normalize;
use crate::bmi::{BmiResult, Category};
use crate::calculator::render::{self, ADVICE_FALLBACK};
use crate::calculator::{AdviceOutcome, View};
use crate::repl::commands::help_entries;
use colored::*;
use crossterm::{
    cursor, execute,
    terminal::{Clear, ClearType},
};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::time::Duration;

/// How advice is printed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdviceStyle {
    /// Normalized plain text
    Text,
    /// The sanitized HTML view
    Html,
}

/// Display manager for the terminal UI
pub struct DisplayManager {
    show_progress: bool,
    tick: Duration,
}

impl DisplayManager {
    pub fn new(show_progress: bool) -> Self {
        DisplayManager {
            show_progress,
            tick: Duration::from_millis(100),
        }
    }

    /// Show welcome banner
    pub fn show_banner(&self, version: &str, advice_target: Option<&str>) {
        let width = 64;
        let rule = "=".repeat(width);
        let title = format!("  bmi-advisor {} - Interactive BMI Calculator", version);
        let info = match advice_target {
            Some(target) => format!("  Advice: {}", target),
            None => "  Advice: disabled".to_string(),
        };

        println!("\n{}", rule.cyan());
        println!("{}", title.bold().cyan());
        println!("{}", info.dimmed());
        println!("{}\n", rule.cyan());
        println!(
            "Enter height and weight (or {} for commands, {} to quit)\n",
            "/help".green(),
            "/exit".green()
        );
    }

    /// Spinner shown while advice is being fetched
    pub fn start_spinner(&self, message: &str) -> Option<ProgressBar> {
        if !self.show_progress {
            return None;
        }
        let pb = ProgressBar::new_spinner();
        let style = ProgressStyle::with_template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        pb.set_style(style);
        pb.set_message(message.to_string());
        pb.enable_steady_tick(self.tick);
        Some(pb)
    }

    /// `Your BMI is: 22.5 (Normal)` colored by category
    pub fn show_bmi(&self, bmi: &BmiResult) {
        let label = match bmi.category {
            Category::Underweight => bmi.category.label().cyan(),
            Category::Normal => bmi.category.label().green(),
            Category::Overweight => bmi.category.label().yellow(),
            Category::Obese => bmi.category.label().red(),
        };
        println!(
            "{} {} ({})",
            "Your BMI is:".bold(),
            bmi.display_value().bold(),
            label.bold()
        );
    }

    /// Print the advice part of a computed view
    pub fn show_advice(&self, view: &View, style: AdviceStyle) {
        let View::Computed {
            advice_text,
            advice,
            ..
        } = view
        else {
            return;
        };

        match style {
            AdviceStyle::Html => println!("{}", view.to_html()),
            AdviceStyle::Text => match (advice, advice_text) {
                (AdviceOutcome::Ready(_), Some(text)) => {
                    println!();
                    println!("{}", advice_as_text(text));
                    println!();
                }
                (AdviceOutcome::Skipped, _) => {}
                _ => self.show_warning(ADVICE_FALLBACK),
            },
        }
    }

    /// Print a whole view: BMI line, advice, or the input error
    pub fn show_view(&self, view: &View, style: AdviceStyle) {
        match view {
            View::Form => {}
            View::Invalid { reason } => match style {
                AdviceStyle::Html => println!("{}", render::invalid_input_html()),
                AdviceStyle::Text => {
                    self.show_error(reason);
                    let ranges = "Valid ranges: height (0-300 cm), weight (0-350 kg)";
                    println!("{}", ranges.dimmed());
                }
            },
            View::Computed { bmi, .. } => {
                if style == AdviceStyle::Text {
                    self.show_bmi(bmi);
                }
                self.show_advice(view, style);
            }
        }
    }

    /// Display error message
    pub fn show_error(&self, error: &str) {
        println!("{} {}", "Error:".red().bold(), error.red());
    }

    /// Display warning message
    pub fn show_warning(&self, warning: &str) {
        println!("{} {}", "Warning:".yellow().bold(), warning.yellow());
    }

    /// Display info message
    pub fn show_info(&self, info: &str) {
        println!("{} {}", "Info:".cyan(), info);
    }

    pub fn show_help(&self) {
        println!("\n{}", "Commands".bold().cyan());
        println!("{}", "-".repeat(40).cyan());
        for (name, description) in help_entries() {
            println!("  {:<10} {}", name.green(), description);
        }
        println!();
    }

    /// Clear screen
    pub fn clear_screen(&self) -> io::Result<()> {
        execute!(io::stdout(), Clear(ClearType::All), cursor::MoveTo(0, 0))
    }
}

/// Plain-text rendition of raw advice for the terminal
///
/// Control characters other than newline and tab are dropped so model
/// output cannot emit escape sequences.
pub fn advice_as_text(raw: &str) -> String {
    let printable: String = normalize(raw)
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\t'))
        .collect();
    printable.trim().to_string()
}
