//! Chance that an ability lands on its target.
//!
//! Every roll is a single d20 against a fixed number, so the chance is a
//! linear function of the gap between the two, clamped to `[0.05, 1.0]`:
//! a natural 20 always succeeds for the attacker.

use mm_core::{Action, Check};

use crate::error::{EngineError, EngineResult};

/// Lowest chance any rolled ability can have.
pub const MIN_PROBABILITY: f64 = 0.05;

/// Chance that an attack with `hit_bonus` hits `armor_class`.
pub fn hit_chance(hit_bonus: i32, armor_class: i32) -> f64 {
    let raw = (20.0 - (f64::from(armor_class) - f64::from(hit_bonus))) / 20.0;
    clamp(raw)
}

/// Chance that a target with `save_modifier` fails a save against `dc`.
pub fn save_fail_chance(dc: u32, save_modifier: i32) -> f64 {
    let raw = 1.0 - (20.0 - (f64::from(dc) - f64::from(save_modifier))) / 20.0;
    clamp(raw)
}

/// Chance that `action` succeeds against `check_value`.
///
/// `check_value` is the target's armor class for hit rolls and its saving
/// throw modifier for save rolls. Abilities without a roll always land and
/// ignore it.
pub fn success_probability(action: &Action, check_value: Option<i32>) -> EngineResult<f64> {
    match action.check() {
        Check::NoRoll => Ok(1.0),
        Check::Hit { bonus } => Ok(hit_chance(bonus, required(action, check_value)?)),
        Check::Save { dc, .. } => Ok(save_fail_chance(dc, required(action, check_value)?)),
    }
}

fn required(action: &Action, check_value: Option<i32>) -> EngineResult<i32> {
    check_value.ok_or_else(|| EngineError::MissingCheckValue {
        ability: action.name().to_string(),
    })
}

fn clamp(raw: f64) -> f64 {
    raw.clamp(MIN_PROBABILITY, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::{Ability, ActionTime};
    use proptest::prelude::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-12
    }

    #[test]
    fn hit_midpoint() {
        assert!(close(hit_chance(5, 15), 0.5));
        assert!(close(hit_chance(0, 10), 0.5));
        assert!(close(hit_chance(7, 13), 0.7));
    }

    #[test]
    fn hit_clamps() {
        assert!(close(hit_chance(5, 100), MIN_PROBABILITY));
        assert!(close(hit_chance(5, -100), 1.0));
        assert!(close(hit_chance(-3, 30), MIN_PROBABILITY));
    }

    #[test]
    fn save_midpoint_and_clamps() {
        assert!(close(save_fail_chance(15, 5), 0.5));
        assert!(close(save_fail_chance(15, 2), 0.65));
        assert!(close(save_fail_chance(15, 30), MIN_PROBABILITY));
        assert!(close(save_fail_chance(15, -30), 1.0));
    }

    #[test]
    fn no_roll_always_lands() {
        let action = Action::new("Magic Missile", ActionTime::Action, Check::NoRoll);
        assert!(close(success_probability(&action, None).unwrap(), 1.0));
        assert!(close(success_probability(&action, Some(100)).unwrap(), 1.0));
    }

    #[test]
    fn rolled_checks_need_a_value() {
        let strike = Action::new("Strike", ActionTime::Action, Check::Hit { bonus: 5 });
        assert_eq!(
            success_probability(&strike, None),
            Err(EngineError::MissingCheckValue {
                ability: "Strike".to_string()
            })
        );
        let hold = Action::new(
            "Hold Person",
            ActionTime::Action,
            Check::Save {
                ability: Ability::Wis,
                dc: 15,
            },
        );
        assert!(success_probability(&hold, None).is_err());
        assert!(close(success_probability(&hold, Some(0)).unwrap(), 0.75));
    }

    proptest! {
        #[test]
        fn prop_hit_in_bounds(bonus in -50i32..50, ac in -100i32..100) {
            let p = hit_chance(bonus, ac);
            prop_assert!((MIN_PROBABILITY..=1.0).contains(&p));
        }

        #[test]
        fn prop_hit_monotone_in_ac(bonus in -20i32..20, ac in -40i32..40) {
            prop_assert!(hit_chance(bonus, ac + 1) <= hit_chance(bonus, ac));
        }

        #[test]
        fn prop_save_in_bounds_and_monotone(dc in 0u32..40, modifier in -40i32..40) {
            let p = save_fail_chance(dc, modifier);
            prop_assert!((MIN_PROBABILITY..=1.0).contains(&p));
            prop_assert!(save_fail_chance(dc, modifier + 1) <= p);
        }
    }
}
