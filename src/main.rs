use anyhow::Context;
use log_sieve::{ColorMode, LevelSpec, SieveConfig, cli_parse};
use std::fs::File;
use std::io::{self, BufRead, BufReader, Write};

fn main() -> anyhow::Result<()> {
    let cli = cli_parse();

    match cli.color {
        ColorMode::Auto => {}
        ColorMode::Always => colored::control::set_override(true),
        ColorMode::Never => colored::control::set_override(false),
    }

    let mut config = match &cli.config {
        Some(path) => SieveConfig::load(path)?,
        None => SieveConfig::default(),
    };
    if !cli.levels.is_empty() {
        config.levels = cli.levels.iter().map(|name| LevelSpec::plain(name)).collect();
    }
    if let Some(min_level) = &cli.min_level {
        config.min_level = min_level.clone();
    }

    let stdout = io::stdout();
    let mut filter = config.into_filter(stdout.lock())?;

    match &cli.file {
        Some(path) => {
            let file = File::open(path)
                .with_context(|| format!("failed to open log file {}", path.display()))?;
            copy_lines(BufReader::new(file), &mut filter)?;
        }
        None => copy_lines(io::stdin().lock(), &mut filter)?,
    }
    filter.flush()?;

    Ok(())
}

/// Feeds the filter one complete line per write, as its contract requires.
fn copy_lines<R: BufRead, W: Write>(mut reader: R, filter: &mut W) -> io::Result<()> {
    let mut line = Vec::new();
    loop {
        line.clear();
        if reader.read_until(b'\n', &mut line)? == 0 {
            return Ok(());
        }
        filter.write_all(&line)?;
    }
}
