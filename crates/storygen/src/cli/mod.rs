//! CLI command handlers.

mod analyze;
mod chat;
mod commands;
mod console;
mod render;
mod studio;

pub use analyze::{AnalyzeArgs, run_analyze};
pub use chat::run_chat;
pub use commands::{Cli, Commands};
pub use console::{ConsoleInput, TerminalKeyPrompt};
pub use render::run_render;
pub use studio::run_studio;
