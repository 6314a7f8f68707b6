use thiserror::Error;

/// Errors raised by a property type's encoder when it rejects a value
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The value has the wrong JSON kind for the property type
    #[error("Expected {expected}, got {actual}")]
    TypeMismatch {
        expected: &'static str,
        actual: &'static str,
    },

    /// A numeric value is outside the accepted bounds
    #[error("{value} is out of range [{min}, {max}]")]
    OutOfRange {
        value: String,
        min: String,
        max: String,
    },

    /// The value is not in the type's accepted set
    #[error("{value} is not one of {accepted}")]
    NotAccepted { value: String, accepted: String },

    /// The arguments bound to a parametrized type are unusable
    #[error("Invalid arguments for property type '{type_name}': {reason}")]
    InvalidArguments {
        type_name: &'static str,
        reason: &'static str,
    },

    /// Rejection raised by a user-registered type
    #[error("{0}")]
    Custom(String),
}
