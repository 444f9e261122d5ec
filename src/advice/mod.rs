//! Health advice: prompt, remote request and HTML formatting

pub mod client;
pub mod formatter;
pub mod prompt;
pub mod types;

pub use client::{AdviceClient, AdviceSource};
pub use formatter::{format_advice, AdviceFormatter, AdviceFragment};
pub use prompt::PromptBuilder;
