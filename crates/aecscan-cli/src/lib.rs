mod args;
mod commands;
mod handlers;
mod output;

pub use args::{Cli, Commands, OutputFormat};
pub use commands::run;
