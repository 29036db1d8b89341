//! Expected damage of an ability against a target.

use mm_core::{Action, DamageModifiers, DamageProfile, DamageType};
use rand::rngs::StdRng;

use crate::error::{EngineError, EngineResult};

/// Damage multiplier for a set of damage modifiers.
///
/// Vulnerable doubles, immune zeroes, resistant halves. At most one
/// modifier may be set.
pub fn damage_multiplier(modifiers: DamageModifiers, damage_type: DamageType) -> EngineResult<f64> {
    if modifiers.active_count() > 1 {
        return Err(EngineError::ExclusivityViolation { damage_type });
    }
    Ok(if modifiers.vulnerable {
        2.0
    } else if modifiers.immune {
        0.0
    } else if modifiers.resistant {
        0.5
    } else {
        1.0
    })
}

/// Damage of a single hit: every damage die rolled once plus the flat bonus.
pub fn per_hit_damage(profile: &DamageProfile, mut rng: Option<&mut StdRng>) -> f64 {
    let dice: f64 = match profile.die {
        Some(die) => (0..profile.dice_count)
            .map(|_| die.roll(rng.as_deref_mut()))
            .sum(),
        None => 0.0,
    };
    dice + f64::from(profile.flat_bonus)
}

/// Damage dealt if every attack roll lands, before modifiers.
pub fn total_damage(action: &Action, rng: Option<&mut StdRng>) -> f64 {
    match action.damage() {
        Some(profile) => per_hit_damage(profile, rng) * f64::from(action.attack_rolls()),
        None => 0.0,
    }
}

/// Expected damage given the chance the ability lands and the target's
/// modifiers for its damage type.
///
/// Abilities that deal half damage on a successful save still deal half of
/// the total on a miss.
pub fn expected_damage(
    action: &Action,
    probability: f64,
    modifiers: DamageModifiers,
    rng: Option<&mut StdRng>,
) -> EngineResult<f64> {
    let multiplier = match action.damage_type() {
        Some(damage_type) => damage_multiplier(modifiers, damage_type)?,
        None => 1.0,
    };
    let total = total_damage(action, rng);
    let landed = if action.half_damage_on_fail() {
        total * probability + total * 0.5 * (1.0 - probability)
    } else {
        total * probability
    };
    Ok(landed * multiplier)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::{Ability, ActionTime, Check, Die};
    use rand::SeedableRng;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn longsword() -> Action {
        Action::new("Longsword", ActionTime::Action, Check::Hit { bonus: 5 })
            .with_damage(DamageProfile::dice(1, Die::D8).plus(3), 1)
            .with_damage_type(DamageType::Slashing)
    }

    fn fireball() -> Action {
        Action::new(
            "Fireball",
            ActionTime::Action,
            Check::Save {
                ability: Ability::Dex,
                dc: 15,
            },
        )
        .as_spell(3)
        .with_damage(DamageProfile::dice(8, Die::D6), 1)
        .with_damage_type(DamageType::Fire)
        .with_half_damage_on_fail()
    }

    fn only(flag: &str) -> DamageModifiers {
        DamageModifiers {
            vulnerable: flag == "v",
            resistant: flag == "r",
            immune: flag == "i",
        }
    }

    #[test]
    fn longsword_at_half_chance() {
        let expected =
            expected_damage(&longsword(), 0.5, DamageModifiers::default(), None).unwrap();
        assert!(close(expected, 3.75));
    }

    #[test]
    fn multipliers() {
        let fire = DamageType::Fire;
        assert!(close(damage_multiplier(only("v"), fire).unwrap(), 2.0));
        assert!(close(damage_multiplier(only("r"), fire).unwrap(), 0.5));
        assert!(close(damage_multiplier(only("i"), fire).unwrap(), 0.0));
        assert!(close(damage_multiplier(only(""), fire).unwrap(), 1.0));
    }

    #[test]
    fn two_modifiers_is_an_error() {
        let both = DamageModifiers {
            vulnerable: true,
            resistant: true,
            immune: false,
        };
        assert_eq!(
            damage_multiplier(both, DamageType::Cold),
            Err(EngineError::ExclusivityViolation {
                damage_type: DamageType::Cold
            })
        );
        assert!(expected_damage(&longsword(), 0.5, both, None).is_err());
    }

    #[test]
    fn half_damage_on_successful_save() {
        // 8d6 averages 28; half of it still lands on a save.
        let expected =
            expected_damage(&fireball(), 0.5, DamageModifiers::default(), None).unwrap();
        assert!(close(expected, 28.0 * 0.5 + 28.0 * 0.5 * 0.5));
        let resisted = expected_damage(&fireball(), 0.5, only("r"), None).unwrap();
        assert!(close(resisted, expected / 2.0));
    }

    #[test]
    fn attack_rolls_multiply() {
        let missiles = Action::new("Magic Missile", ActionTime::Action, Check::NoRoll)
            .as_spell(1)
            .with_damage(DamageProfile::dice(1, Die::D4).plus(1), 3)
            .with_damage_type(DamageType::Force);
        assert!(close(total_damage(&missiles, None), 10.5));
        let no_rolls = Action::new("Feint", ActionTime::Bonus, Check::NoRoll)
            .with_damage(DamageProfile::flat(4), 0);
        assert!(close(total_damage(&no_rolls, None), 0.0));
    }

    #[test]
    fn no_damage_profile_is_zero() {
        let shove = Action::new("Shove", ActionTime::Action, Check::Hit { bonus: 3 });
        assert!(close(
            expected_damage(&shove, 0.9, DamageModifiers::default(), None).unwrap(),
            0.0
        ));
    }

    #[test]
    fn simulated_per_hit_within_bounds() {
        let mut rng = StdRng::seed_from_u64(3);
        let profile = DamageProfile::dice(2, Die::D6).plus(2);
        for _ in 0..200 {
            let value = per_hit_damage(&profile, Some(&mut rng));
            assert!((4.0..=14.0).contains(&value));
        }
        assert!(close(per_hit_damage(&profile, None), 9.0));
    }
}
