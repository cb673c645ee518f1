//! Configuration validation.

use crate::config::Config;
use crate::correlate::CorrelationWindow;
use crate::error::{Error, Result};

/// Validate the entire configuration.
pub fn validate_config(config: &Config) -> Result<()> {
    validate_window(&config.correlation)?;
    if let Some(mapping) = &config.colors {
        mapping.validate()?;
    }
    Ok(())
}

/// Validate a correlation window.
pub fn validate_window(window: &CorrelationWindow) -> Result<()> {
    if !(window.max_distance_m.is_finite() && window.max_distance_m > 0.0) {
        return Err(Error::ConfigValidation {
            message: format!(
                "max_distance_m must be a positive number, got {}",
                window.max_distance_m
            ),
        });
    }

    if !(window.max_time_delta_min.is_finite() && window.max_time_delta_min > 0.0) {
        return Err(Error::ConfigValidation {
            message: format!(
                "max_time_delta_min must be a positive number, got {}",
                window.max_time_delta_min
            ),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_valid_config() {
        let config = Config::default();
        assert!(validate_config(&config).is_ok());
    }

    #[test]
    fn test_validate_zero_distance() {
        let mut config = Config::default();
        config.correlation.max_distance_m = 0.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_negative_minutes() {
        let mut config = Config::default();
        config.correlation.max_time_delta_min = -5.0;
        assert!(validate_config(&config).is_err());
    }

    #[test]
    fn test_validate_nan_distance() {
        let window = CorrelationWindow {
            max_distance_m: f64::NAN,
            max_time_delta_min: 30.0,
        };
        assert!(matches!(
            validate_window(&window),
            Err(Error::ConfigValidation { .. })
        ));
    }
}
