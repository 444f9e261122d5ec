//! bmi-advisor - Main CLI Entry Point

use anyhow::{anyhow, Context, Result};
use bmi_advisor::advice::AdviceSource;
use bmi_advisor::calculator::{AdviceOutcome, FormInput};
use bmi_advisor::cli::{Args, Commands, Config, OutputFormat, Verbosity};
use bmi_advisor::repl::{AdviceStyle, DisplayManager, ReplSession};
use bmi_advisor::{AdviceFormatter, Calculator, View};
use clap::Parser;
use serde::Serialize;
use std::io::Read;
use std::path::Path;
use std::sync::Arc;
use tracing::debug;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let verbosity = args.verbosity();

    let mut config = Config::load(args.config.clone())?;
    config.apply_env();
    config.apply_overrides(args.endpoint.clone(), args.model.clone());
    config.validate()?;

    let use_color = !args.no_color && config.display.color_output;
    if !use_color {
        colored::control::set_override(false);
    }
    init_tracing(verbosity, use_color)?;
    debug!(verbosity = verbosity.as_str(), "configuration loaded");

    match &args.command {
        Some(Commands::Start) | None => run_repl(&config, verbosity).await?,
        Some(Commands::Calc {
            height,
            weight,
            no_advice,
            format,
        }) => {
            run_calc(&config, verbosity, height, weight, *no_advice, *format).await?;
        }
        Some(Commands::Format { file }) => run_format(&config, file.as_deref())?,
        Some(Commands::Config { init }) => show_config(&config, *init)?,
    }

    Ok(())
}

fn init_tracing(verbosity: Verbosity, ansi: bool) -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(verbosity.log_filter()));
    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .without_time()
        .with_ansi(ansi)
        .compact()
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow!("failed to initialize logging: {error}"))
}

fn build_calculator(config: &Config, with_advice: bool) -> Result<Calculator> {
    let formatter = config.build_formatter()?;
    if !with_advice {
        return Ok(Calculator::new(formatter));
    }
    let source: Arc<dyn AdviceSource> = Arc::new(config.build_client()?);
    Ok(Calculator::with_advice_source(formatter, source))
}

async fn run_repl(config: &Config, verbosity: Verbosity) -> Result<()> {
    let calculator = build_calculator(config, true)?;
    let show_progress = config.display.show_progress && verbosity.show_progress();
    let display = DisplayManager::new(show_progress);

    let mut session = ReplSession::new(calculator, display, true)?;
    let target = format!("{} via {}", config.advice.model, config.advice.endpoint);
    session.show_welcome(env!("CARGO_PKG_VERSION"), Some(target.as_str()));
    session.run().await?;

    println!("Goodbye!");
    Ok(())
}

/// Machine-readable result for `calc --format json`
#[derive(Debug, Serialize)]
struct CalcReport {
    height_cm: f64,
    weight_kg: f64,
    bmi: String,
    category: bmi_advisor::Category,
    #[serde(skip_serializing_if = "Option::is_none")]
    advice_html: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    advice_error: Option<String>,
}

async fn run_calc(
    config: &Config,
    verbosity: Verbosity,
    height: &str,
    weight: &str,
    no_advice: bool,
    format: OutputFormat,
) -> Result<()> {
    let mut calculator = build_calculator(config, !no_advice)?;
    calculator.set_input(FormInput::new(height, weight));

    let display = DisplayManager::new(
        config.display.show_progress && verbosity.show_progress() && format == OutputFormat::Text,
    );
    let mut spinner = None;
    let view = calculator
        .press_with_progress(|_| {
            if !no_advice {
                spinner = display.start_spinner(bmi_advisor::calculator::render::LOADING_MESSAGE);
            }
        })
        .await?;
    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    if let View::Invalid { reason } = view {
        if format == OutputFormat::Html {
            println!("{}", view.to_html());
        }
        return Err(anyhow!("invalid measurement: {}", reason));
    }

    match format {
        OutputFormat::Text => display.show_view(view, AdviceStyle::Text),
        OutputFormat::Html => println!("{}", view.to_html()),
        OutputFormat::Json => {
            if let View::Computed {
                measurement,
                bmi,
                advice,
                ..
            } = view
            {
                let report = CalcReport {
                    height_cm: measurement.height_cm(),
                    weight_kg: measurement.weight_kg(),
                    bmi: bmi.display_value(),
                    category: bmi.category,
                    advice_html: advice.fragment().map(|f| f.to_string()),
                    advice_error: match advice {
                        AdviceOutcome::Unavailable { reason } => Some(reason.clone()),
                        _ => None,
                    },
                };
                println!("{}", serde_json::to_string_pretty(&report)?);
            }
        }
    }

    Ok(())
}

fn run_format(config: &Config, file: Option<&Path>) -> Result<()> {
    let raw = match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };

    let formatter: AdviceFormatter = config.build_formatter()?;
    println!("{}", formatter.format(&raw));
    Ok(())
}

fn show_config(config: &Config, init: bool) -> Result<()> {
    let display = DisplayManager::new(false);

    if init {
        let path = Config::default_path()
            .ok_or_else(|| anyhow!("could not determine home directory"))?;
        if path.exists() {
            display.show_warning(&format!("{} already exists, leaving it alone", path.display()));
        } else {
            Config::default().save(&path)?;
            display.show_info(&format!("Wrote default configuration to {}", path.display()));
        }
    }

    if let Some(path) = Config::default_path() {
        println!("# {}", path.display());
    }
    print!("{}", config.redacted().to_toml()?);
    Ok(())
}
