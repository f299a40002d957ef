//! Error types for the plan builder.
//!
//! Every variant is a pre-spawn validation failure: the batch runner
//! rejects the request before any external process is started.

use thiserror::Error;

/// Validation error raised while mapping a request to tool arguments.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlanError {
    /// No target format was selected.
    #[error("No target format selected")]
    MissingTargetFormat,

    /// Custom resize was selected without both dimensions.
    #[error("Custom resize requires both width and height")]
    MissingCustomDimensions,
}

/// Result type for plan operations.
pub type PlanResult<T> = Result<T, PlanError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn errors_display_messages() {
        assert_eq!(
            PlanError::MissingCustomDimensions.to_string(),
            "Custom resize requires both width and height"
        );
        assert_eq!(
            PlanError::MissingTargetFormat.to_string(),
            "No target format selected"
        );
    }
}
