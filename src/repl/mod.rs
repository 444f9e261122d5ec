//! Interactive calculator session
//!
//! Prompts for height and weight while the calculator is `Ready`, shows the
//! result, then waits for one more press to reset. The calculator's state
//! machine decides what each press means; this loop only collects input.

pub mod commands;
pub mod display;
pub mod input;

use anyhow::Result;
use tracing::debug;

use crate::calculator::render::LOADING_MESSAGE;
use crate::calculator::{Calculator, CalculatorState, FormInput, View};
use crate::repl::commands::{is_command, Command};
pub use crate::repl::display::{AdviceStyle, DisplayManager};
use crate::repl::input::{InputHandler, Line};

/// Outcome of reading one prompt
enum Prompted {
    Value(String),
    Handled,
    Quit,
}

/// REPL session coordinator
pub struct ReplSession {
    input_handler: InputHandler,
    display: DisplayManager,
    calculator: Calculator,
    fetches_advice: bool,
}

impl ReplSession {
    pub fn new(
        calculator: Calculator,
        display: DisplayManager,
        fetches_advice: bool,
    ) -> Result<Self> {
        Ok(ReplSession {
            input_handler: InputHandler::new()?,
            display,
            calculator,
            fetches_advice,
        })
    }

    /// Show welcome banner
    pub fn show_welcome(&self, version: &str, advice_target: Option<&str>) {
        self.display.show_banner(version, advice_target);
    }

    /// Run until `/exit`, Ctrl-D or Ctrl-C
    pub async fn run(&mut self) -> Result<()> {
        loop {
            let keep_going = match self.calculator.state() {
                CalculatorState::Ready => self.collect_and_calculate().await?,
                CalculatorState::Result => self.wait_for_reset().await?,
            };
            if !keep_going {
                return Ok(());
            }
        }
    }

    async fn collect_and_calculate(&mut self) -> Result<bool> {
        let height = match self.prompt("height (cm)> ")? {
            Prompted::Value(value) => value,
            Prompted::Handled => return Ok(true),
            Prompted::Quit => return Ok(false),
        };
        let weight = match self.prompt("weight (kg)> ")? {
            Prompted::Value(value) => value,
            Prompted::Handled => return Ok(true),
            Prompted::Quit => return Ok(false),
        };

        self.calculator.set_input(FormInput::new(height, weight));

        let display = &self.display;
        let fetches_advice = self.fetches_advice;
        let mut spinner = None;
        let view = self
            .calculator
            .press_with_progress(|bmi| {
                display.show_bmi(bmi);
                if fetches_advice {
                    spinner = display.start_spinner(LOADING_MESSAGE);
                }
            })
            .await?;
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        match view {
            View::Computed { .. } => display.show_advice(view, AdviceStyle::Text),
            other => display.show_view(other, AdviceStyle::Text),
        }
        Ok(true)
    }

    async fn wait_for_reset(&mut self) -> Result<bool> {
        let label = self.calculator.state().button_label();
        let prompt = format!("[Enter] {}> ", label);
        match self.prompt(&prompt)? {
            Prompted::Quit => Ok(false),
            Prompted::Handled => Ok(true),
            Prompted::Value(_) => {
                self.calculator.press().await?;
                debug!("calculator reset");
                println!();
                Ok(true)
            }
        }
    }

    fn prompt(&mut self, label: &str) -> Result<Prompted> {
        let text = match self.input_handler.read(label)? {
            Line::Text(text) => text,
            Line::Eof | Line::Interrupted => return Ok(Prompted::Quit),
        };

        if !is_command(&text) {
            return Ok(Prompted::Value(text));
        }

        match commands::parse(&text) {
            Command::Help => self.display.show_help(),
            Command::Clear => self.display.clear_screen()?,
            Command::Exit => return Ok(Prompted::Quit),
            Command::Unknown { input } => {
                self.display
                    .show_warning(&format!("Unknown command: {} (try /help)", input));
            }
        }
        Ok(Prompted::Handled)
    }
}
