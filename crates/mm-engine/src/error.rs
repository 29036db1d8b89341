//! Error types for the minmax engine.

use mm_core::{CoreError, DamageType};

/// Errors that can occur while computing statistics, tables, or rankings.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// A data-model error surfaced while computing.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A target is flagged as more than one of vulnerable, resistant, and
    /// immune to the same damage type.
    #[error("conflicting damage modifiers for {damage_type}")]
    ExclusivityViolation {
        /// The damage type with conflicting flags.
        damage_type: DamageType,
    },

    /// A hit or save ability was evaluated without a defense value.
    #[error("'{ability}' rolls against a defense value, but none was given")]
    MissingCheckValue {
        /// The ability being evaluated.
        ability: String,
    },

    /// A caller-supplied argument is outside what the operation accepts.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// A defense value lies outside the table's range.
    #[error("defense value {value} is outside {min}..={max}")]
    DefenseOutOfRange {
        /// The requested value.
        value: i32,
        /// Lowest value in the table.
        min: i32,
        /// Highest value in the table.
        max: i32,
    },

    /// The engine configuration is malformed.
    #[error("invalid engine config: {0}")]
    InvalidConfig(String),

    /// A session operation needs a participant that has not been selected.
    #[error("no {0} selected")]
    NoSession(&'static str),
}

/// Convenience result type for engine operations.
pub type EngineResult<T> = Result<T, EngineError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages() {
        assert_eq!(
            EngineError::ExclusivityViolation {
                damage_type: DamageType::Fire
            }
            .to_string(),
            "conflicting damage modifiers for Fire"
        );
        assert_eq!(
            EngineError::DefenseOutOfRange {
                value: 31,
                min: -30,
                max: 30
            }
            .to_string(),
            "defense value 31 is outside -30..=30"
        );
        assert_eq!(EngineError::NoSession("target").to_string(), "no target selected");
    }

    #[test]
    fn core_errors_pass_through() {
        let err: EngineError = CoreError::UnknownAbility("Smite".to_string()).into();
        assert_eq!(err.to_string(), "unknown ability: \"Smite\"");
    }
}
