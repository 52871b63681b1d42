/*
 * Error Module
 *
 * Validation errors for the simulation core. Only bad configuration and bad
 * arguments are errors: degenerate geometry (zero-length vectors, overlapping
 * agents) degrades to a zero contribution instead, and positions outside the
 * grid are handled by the out-of-bounds cell.
 */

use thiserror::Error;

use crate::spatial_grid::{AgentId, ObstacleId};

/// Errors raised by the simulation core.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SteerError {
    /// A tunable was rejected at construction or update time.
    #[error("invalid configuration: {field} = {value} ({reason})")]
    InvalidConfiguration {
        field: &'static str,
        value: f32,
        reason: &'static str,
    },
    /// A call received an argument it cannot work with (e.g. a negative query radius).
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("no agent registered under {0:?}")]
    UnknownAgent(AgentId),
    #[error("no obstacle registered under {0:?}")]
    UnknownObstacle(ObstacleId),
}

pub type Result<T> = std::result::Result<T, SteerError>;

// Shared validation helpers

pub(crate) fn require_finite(field: &'static str, value: f32) -> Result<f32> {
    if value.is_finite() {
        Ok(value)
    } else {
        Err(SteerError::InvalidConfiguration {
            field,
            value,
            reason: "must be finite",
        })
    }
}

pub(crate) fn require_positive(field: &'static str, value: f32) -> Result<f32> {
    require_finite(field, value)?;
    if value > 0.0 {
        Ok(value)
    } else {
        Err(SteerError::InvalidConfiguration {
            field,
            value,
            reason: "must be greater than zero",
        })
    }
}

pub(crate) fn require_non_negative(field: &'static str, value: f32) -> Result<f32> {
    require_finite(field, value)?;
    if value >= 0.0 {
        Ok(value)
    } else {
        Err(SteerError::InvalidConfiguration {
            field,
            value,
            reason: "must not be negative",
        })
    }
}

pub(crate) fn require_unit_interval(field: &'static str, value: f32) -> Result<f32> {
    require_finite(field, value)?;
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(SteerError::InvalidConfiguration {
            field,
            value,
            reason: "must lie in [0, 1]",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn helpers_reject_bad_values() {
        assert!(require_positive("radius", 0.0).is_err());
        assert!(require_positive("radius", f32::NAN).is_err());
        assert!(require_non_negative("distance", -0.5).is_err());
        assert_eq!(require_non_negative("distance", 0.0), Ok(0.0));
        assert!(require_unit_interval("view_arc", 1.5).is_err());
    }

    #[test]
    fn configuration_error_names_the_field() {
        let err = require_positive("max_speed", -1.0).unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid configuration: max_speed = -1 (must be greater than zero)"
        );
    }
}
