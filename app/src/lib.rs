pub mod cli;
pub mod commands;
pub mod output;

pub use cli::Cli;
pub use commands::{resolve_settings, run};
