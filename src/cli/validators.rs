//! CLI argument validators.
//!
//! Shared validation functions for CLI argument parsing.

use crate::fusion::Color;

/// Parse a finite value strictly greater than zero.
pub fn parse_positive_float(s: &str) -> Result<f64, String> {
    let value: f64 = s
        .parse()
        .map_err(|_| format!("'{s}' is not a valid number"))?;

    if !value.is_finite() || value <= 0.0 {
        return Err(format!("value must be greater than 0, got {value}"));
    }

    Ok(value)
}

/// Parse a color class name.
pub fn parse_color(s: &str) -> Result<Color, String> {
    s.parse::<Color>().map_err(|e| e.to_string())
}
