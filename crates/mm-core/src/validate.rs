//! Boundary validation shared by record conversion.
//!
//! Records arrive with loosely typed fields (signed integers, free-form
//! strings). These helpers turn them into checked values or fail with the
//! matching [`CoreError`], so no partially validated value escapes.

use crate::domain::DomainValue;
use crate::error::{CoreError, CoreResult};

/// Require `value >= 0` and narrow it to `u32`.
pub fn non_negative(field: &'static str, value: i64) -> CoreResult<u32> {
    if value < 0 {
        return Err(CoreError::NonNegative { field, value });
    }
    u32::try_from(value).map_err(|_| CoreError::NonNegative { field, value })
}

/// [`non_negative`] for an optional field. `None` passes through.
pub fn optional_non_negative(field: &'static str, value: Option<i64>) -> CoreResult<Option<u32>> {
    value.map(|v| non_negative(field, v)).transpose()
}

/// Highest spell level a slot or spell can have.
pub const MAX_SPELL_LEVEL: u8 = 9;

const SPELL_LEVELS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// Require a spell level in `0..=9`.
pub fn spell_level(value: i64) -> CoreResult<u8> {
    let level = non_negative("spell level", value)?;
    match u8::try_from(level) {
        Ok(level) if level <= MAX_SPELL_LEVEL => Ok(level),
        _ => Err(CoreError::DomainValue {
            field: "spell level",
            value: value.to_string(),
            accepted: SPELL_LEVELS.to_vec(),
        }),
    }
}

/// Parse a label from a fixed domain.
pub fn one_of<D: DomainValue>(label: &str) -> CoreResult<D> {
    D::parse(label)
}

/// [`one_of`] for an optional field. `None` passes through.
pub fn optional_one_of<D: DomainValue>(label: Option<&str>) -> CoreResult<Option<D>> {
    label.map(D::parse).transpose()
}

/// Parse every label in a list, failing on the first unknown one.
pub fn all_of<D: DomainValue, S: AsRef<str>>(labels: &[S]) -> CoreResult<Vec<D>> {
    labels.iter().map(|l| D::parse(l.as_ref())).collect()
}

/// Unwrap a field that another field made mandatory.
pub fn required<T>(value: Option<T>, field: &'static str, context: &'static str) -> CoreResult<T> {
    value.ok_or(CoreError::MissingField { field, context })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Ability, DamageType};

    #[test]
    fn non_negative_accepts_zero() {
        assert_eq!(non_negative("count", 0), Ok(0));
        assert_eq!(non_negative("count", 7), Ok(7));
    }

    #[test]
    fn non_negative_rejects_negative() {
        let err = non_negative("flat damage", -2).unwrap_err();
        assert_eq!(
            err,
            CoreError::NonNegative {
                field: "flat damage",
                value: -2
            }
        );
        assert_eq!(
            err.to_string(),
            "flat damage must be a non-negative integer, got -2"
        );
    }

    #[test]
    fn optional_passes_none() {
        assert_eq!(optional_non_negative("uses", None), Ok(None));
        assert!(optional_non_negative("uses", Some(-1)).is_err());
    }

    #[test]
    fn spell_level_bounds() {
        assert_eq!(spell_level(0), Ok(0));
        assert_eq!(spell_level(9), Ok(9));
        assert!(matches!(
            spell_level(-1),
            Err(CoreError::NonNegative { field: "spell level", value: -1 })
        ));
        assert!(matches!(
            spell_level(10),
            Err(CoreError::DomainValue { field: "spell level", .. })
        ));
    }

    #[test]
    fn one_of_rejects_unknown_label() {
        let err = one_of::<DamageType>("Sonic").unwrap_err();
        assert!(matches!(err, CoreError::DomainValue { field: "damage type", .. }));
        assert!(err.to_string().contains("got 'Sonic'"));
    }

    #[test]
    fn all_of_stops_at_first_bad_label() {
        assert_eq!(
            all_of::<Ability, _>(&["STR", "WIS"]).unwrap(),
            vec![Ability::Str, Ability::Wis]
        );
        assert!(all_of::<Ability, _>(&["STR", "LUCK"]).is_err());
    }

    #[test]
    fn required_reports_context() {
        let err = required::<i64>(None, "hit_bonus", "hit roll").unwrap_err();
        assert_eq!(err.to_string(), "hit roll requires hit_bonus");
    }
}
