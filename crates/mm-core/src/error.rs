//! Error types for the minmax data model.

/// Alias for `Result<T, CoreError>`.
pub type CoreResult<T> = Result<T, CoreError>;

/// Errors raised while building or mutating characters, actions, and resources.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CoreError {
    /// A field's value is outside its fixed enumeration.
    #[error("{field} must be one of [{}], got '{value}'", accepted.join(", "))]
    DomainValue {
        /// The field being validated (e.g. "damage type").
        field: &'static str,
        /// The rejected value.
        value: String,
        /// Every value the field accepts.
        accepted: Vec<&'static str>,
    },

    /// A numeric field required to be non-negative was negative.
    #[error("{field} must be a non-negative integer, got {value}")]
    NonNegative {
        /// The field being validated.
        field: &'static str,
        /// The rejected value.
        value: i64,
    },

    /// A die was given fewer than one side.
    #[error("a die needs at least one side, got {0}")]
    InvalidDie(i64),

    /// A field required by another field's value was not supplied.
    #[error("{context} requires {field}")]
    MissingField {
        /// The missing field.
        field: &'static str,
        /// What required it (e.g. "hit roll").
        context: &'static str,
    },

    /// A consumable resource was used when none remained.
    #[error("no {0} remaining")]
    ExhaustedResource(String),

    /// The character has no ability with this name.
    #[error("unknown ability: \"{0}\"")]
    UnknownAbility(String),
}
