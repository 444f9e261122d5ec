//! Built-in commands for the interactive calculator

/// Interactive commands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Help,
    Clear,
    Exit,
    Unknown { input: String },
}

/// Check whether input is a command rather than a value
pub fn is_command(input: &str) -> bool {
    input.trim_start().starts_with('/')
}

/// Parse a `/command`
pub fn parse(input: &str) -> Command {
    let trimmed = input.trim();
    let name = trimmed
        .strip_prefix('/')
        .and_then(|rest| rest.split_whitespace().next())
        .map(|s| s.to_lowercase());

    match name.as_deref() {
        Some("help") | Some("h") => Command::Help,
        Some("clear") | Some("cls") => Command::Clear,
        Some("exit") | Some("quit") | Some("q") => Command::Exit,
        _ => Command::Unknown {
            input: input.to_string(),
        },
    }
}

/// Help text lines as (command, description)
pub fn help_entries() -> &'static [(&'static str, &'static str)] {
    &[
        ("/help", "Show this help"),
        ("/clear", "Clear the screen"),
        ("/exit", "Quit the calculator"),
    ]
}
