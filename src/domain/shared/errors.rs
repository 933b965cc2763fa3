use uuid::Uuid;

// ============================================================================
// General Validation Errors
// ============================================================================
//
// Shared by every value object and aggregate constructor. The `code` is the
// machine-readable kind, `Display` is the human-readable message.
//
// ============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GeneralError {
    #[error("Value is required for {0}")]
    ValueIsRequired(&'static str),

    #[error("Value is invalid for {param}: {reason}")]
    ValueIsInvalid {
        param: &'static str,
        reason: &'static str,
    },

    #[error("Value {value} is out of range for {param}, expected {min}..={max}")]
    ValueIsOutOfRange {
        param: &'static str,
        value: i32,
        min: i32,
        max: i32,
    },
}

impl GeneralError {
    pub fn code(&self) -> &'static str {
        match self {
            GeneralError::ValueIsRequired(_) => "value.is.required",
            GeneralError::ValueIsInvalid { .. } => "value.is.invalid",
            GeneralError::ValueIsOutOfRange { .. } => "value.is.out.of.range",
        }
    }
}

// ============================================================================
// Guards
// ============================================================================

pub fn against_blank(value: &str, param: &'static str) -> Result<(), GeneralError> {
    if value.trim().is_empty() {
        return Err(GeneralError::ValueIsRequired(param));
    }
    Ok(())
}

pub fn against_nil(id: Uuid, param: &'static str) -> Result<(), GeneralError> {
    if id.is_nil() {
        return Err(GeneralError::ValueIsRequired(param));
    }
    Ok(())
}

pub fn against_zero_or_negative(value: i32, param: &'static str) -> Result<(), GeneralError> {
    if value <= 0 {
        return Err(GeneralError::ValueIsInvalid {
            param,
            reason: "must be > 0",
        });
    }
    Ok(())
}

pub fn against_out_of_range(
    value: i32,
    min: i32,
    max: i32,
    param: &'static str,
) -> Result<(), GeneralError> {
    if value < min || value > max {
        return Err(GeneralError::ValueIsOutOfRange { param, value, min, max });
    }
    Ok(())
}
