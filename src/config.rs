use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

use crate::filter::{LevelFilter, Transform};
use crate::style::{Color, LineStyle};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Failed to parse config file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: toml::de::Error,
    },
    #[error(
        "Unknown color '{0}'. Valid colors are: black, red, green, yellow, blue, magenta, cyan, white, and their bright- variants"
    )]
    UnknownColor(String),
}

/// On-disk filter configuration.
///
/// ```toml
/// min_level = "WARN"
///
/// [[levels]]
/// name = "DEBUG"
///
/// [[levels]]
/// name = "WARN"
/// color = "yellow"
///
/// [[levels]]
/// name = "ERROR"
/// color = "red"
/// bold = true
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SieveConfig {
    /// Severity labels from least to most severe, with optional styling.
    pub levels: Vec<LevelSpec>,
    /// The lowest severity forwarded to the sink.
    pub min_level: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelSpec {
    pub name: String,
    pub color: Option<String>,
    pub background: Option<String>,
    pub bold: bool,
}

impl Default for SieveConfig {
    fn default() -> Self {
        Self {
            levels: vec![
                LevelSpec::plain("DEBUG"),
                LevelSpec::plain("INFO"),
                LevelSpec {
                    name: "WARN".to_string(),
                    color: Some("yellow".to_string()),
                    ..LevelSpec::default()
                },
                LevelSpec {
                    name: "ERROR".to_string(),
                    color: Some("red".to_string()),
                    bold: true,
                    ..LevelSpec::default()
                },
            ],
            min_level: "INFO".to_string(),
        }
    }
}

impl SieveConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        toml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// Builds the configured filter around `sink`.
    pub fn into_filter<W>(self, sink: W) -> Result<LevelFilter<W>, ConfigError> {
        let mut transforms: Vec<Option<Transform>> = Vec::with_capacity(self.levels.len());
        for spec in &self.levels {
            transforms.push(spec.transform()?);
        }
        Ok(LevelFilter::new(sink)
            .with_levels(self.levels.into_iter().map(|spec| spec.name))
            .with_transforms(transforms)
            .with_min_level(self.min_level))
    }
}

impl LevelSpec {
    pub fn plain(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    fn transform(&self) -> Result<Option<Transform>, ConfigError> {
        if self.color.is_none() && self.background.is_none() && !self.bold {
            return Ok(None);
        }
        let mut style = LineStyle::new();
        if let Some(name) = &self.color {
            style = style.fg(parse_color(name)?);
        }
        if let Some(name) = &self.background {
            style = style.bg(parse_color(name)?);
        }
        if self.bold {
            style = style.bold();
        }
        Ok(Some(style.into_transform()))
    }
}

fn parse_color(name: &str) -> Result<Color, ConfigError> {
    let color = match name.to_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" | "purple" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "bright-black" | "gray" | "grey" => Color::BrightBlack,
        "bright-red" => Color::BrightRed,
        "bright-green" => Color::BrightGreen,
        "bright-yellow" => Color::BrightYellow,
        "bright-blue" => Color::BrightBlue,
        "bright-magenta" => Color::BrightMagenta,
        "bright-cyan" => Color::BrightCyan,
        "bright-white" => Color::BrightWhite,
        _ => return Err(ConfigError::UnknownColor(name.to_string())),
    };
    Ok(color)
}
