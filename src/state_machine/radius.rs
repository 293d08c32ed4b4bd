//! Radius input grammar: a positive number, optionally suffixed with `m`

use thiserror::Error;

/// Radius used when none was given or the input was invalid
pub const DEFAULT_RADIUS_M: f64 = 500.0;

#[derive(Debug, Error, PartialEq)]
pub enum RadiusError {
    #[error("not a number: {0:?}")]
    NotANumber(String),
    #[error("radius must be positive, got {0}")]
    NotPositive(f64),
}

/// Parse `"1500"` or `"1500m"` into meters
pub fn parse_radius(input: &str) -> Result<f64, RadiusError> {
    let trimmed = input.trim();
    let number = trimmed.strip_suffix('m').unwrap_or(trimmed).trim();

    let value: f64 = number
        .parse()
        .map_err(|_| RadiusError::NotANumber(input.to_string()))?;
    if !value.is_finite() {
        return Err(RadiusError::NotANumber(input.to_string()));
    }
    if value <= 0.0 {
        return Err(RadiusError::NotPositive(value));
    }
    Ok(value)
}
