use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Filter line-oriented logs by their bracketed severity tag
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Log file to filter (reads stdin when omitted)
    pub file: Option<PathBuf>,

    /// Severity labels from least to most severe, overriding the config
    #[arg(short, long, value_delimiter = ',')]
    pub levels: Vec<String>,

    /// Lowest severity forwarded to stdout
    #[arg(short, long)]
    pub min_level: Option<String>,

    /// Filter config file (TOML)
    #[arg(short, long, env = "LOG_SIEVE_CONFIG")]
    pub config: Option<PathBuf>,

    /// When to emit ANSI colors
    #[arg(long, value_enum, default_value_t = ColorMode::Auto)]
    pub color: ColorMode,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    Auto,
    Always,
    Never,
}

pub fn cli_parse() -> Cli {
    Cli::parse()
}
