//! Scenario validation logic.

use crate::schema::Scenario;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_scenario(scenario: &Scenario) -> Result<(), ValidationError> {
    if scenario.version > crate::migrate::LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: scenario.version,
        });
    }

    if scenario.name.trim().is_empty() {
        return Err(ValidationError::InvalidValue {
            field: "name".to_string(),
            value: format!("{:?}", scenario.name),
            reason: "must not be empty".to_string(),
        });
    }

    scenario
        .parameters
        .validate()
        .map_err(|e| ValidationError::InvalidValue {
            field: "parameters".to_string(),
            value: format!("{:?}", scenario.parameters),
            reason: e.to_string(),
        })?;

    if !scenario.ambient_temperature_k.is_finite() || scenario.ambient_temperature_k <= 0.0 {
        return Err(ValidationError::InvalidValue {
            field: "ambient_temperature_k".to_string(),
            value: scenario.ambient_temperature_k.to_string(),
            reason: "must be a positive temperature in kelvin".to_string(),
        });
    }

    if let Some(sweep) = &scenario.sweep {
        sweep.validate().map_err(|e| ValidationError::InvalidValue {
            field: "sweep".to_string(),
            value: format!("{:?}", sweep),
            reason: e.to_string(),
        })?;
    }

    Ok(())
}
