//! Configuration type definitions.

use crate::correlate::CorrelationWindow;
use crate::error::{Error, Result};
use crate::fusion::ColorSpeciesMapping;
use serde::{Deserialize, Serialize};

/// Complete application configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Correlation window used by `correlate`.
    pub correlation: CorrelationWindow,

    /// Color to species mapping. `None` means not configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub colors: Option<ColorSpeciesMapping>,
}

impl Config {
    /// The configured color mapping.
    ///
    /// An absent `[colors]` table is reported, not replaced with a guess.
    pub fn color_mapping(&self) -> Result<ColorSpeciesMapping> {
        self.colors
            .clone()
            .ok_or_else(|| Error::MissingConfiguration {
                reason: "no [colors] table in configuration (run 'colonyfuse colors init')"
                    .to_string(),
            })
    }
}

/// How command results are printed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputMode {
    /// Aligned text for a terminal.
    #[default]
    Human,
    /// One JSON result envelope on stdout.
    Json,
}

impl OutputMode {
    /// True for machine-readable output.
    pub const fn is_structured(self) -> bool {
        matches!(self, Self::Json)
    }
}

impl std::fmt::Display for OutputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Human => write!(f, "human"),
            Self::Json => write!(f, "json"),
        }
    }
}
