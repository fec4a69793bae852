//! Severity filtering for line-oriented log writers: classify each line by
//! its bracketed tag, drop lines below a minimum level, and optionally
//! colorize the survivors on their way to the sink.

pub mod cli;
pub mod config;
pub mod filter;
pub mod style;

pub use cli::{Cli, ColorMode, cli_parse};
pub use config::{ConfigError, LevelSpec, SieveConfig};
pub use filter::{LevelFilter, Transform};
pub use style::{Color, LineStyle};
