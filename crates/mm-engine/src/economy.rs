//! Action economy: how much damage and utility an ability buys per unit of
//! turn time and spell-slot pressure.

use mm_core::{Action, ActionTime, Character};

/// Share of a turn an action time costs.
pub fn time_cost(action_time: ActionTime) -> f64 {
    match action_time {
        ActionTime::Action => 1.0,
        ActionTime::Bonus => 0.5,
        ActionTime::Reaction => 0.0,
        ActionTime::LongAction => 2.0,
    }
}

/// How scarce slots of `level` are relative to every remaining slot,
/// raised to `coefficient`.
///
/// Positive infinity when the caster has no slot of that level left: the
/// spell cannot be cast, so its economy score sinks to negative infinity.
pub fn slot_scarcity(caster: &Character, level: u8, coefficient: f64) -> f64 {
    let at_level = caster.remaining_slots_at(level);
    if at_level == 0 {
        return f64::INFINITY;
    }
    let ratio = f64::from(caster.remaining_slots()) / f64::from(at_level);
    ratio.powf(coefficient)
}

/// Total cost of using `action`: `(spell level + time cost) × scarcity`,
/// or 1 when that comes to zero.
pub fn action_cost(action: &Action, caster: &Character, coefficient: f64) -> f64 {
    let time = time_cost(action.action_time());
    let cost = match action.spell_level() {
        Some(level) if level > 0 => {
            (f64::from(level) + time) * slot_scarcity(caster, level, coefficient)
        }
        _ => time,
    };
    if cost == 0.0 { 1.0 } else { cost }
}

/// `ln((expected damage + utility) / sqrt(cost))`.
///
/// Zero damage and zero utility, or an infinite cost, give negative
/// infinity.
pub fn economy_score(expected_damage: f64, utility: u32, cost: f64) -> f64 {
    ((expected_damage + f64::from(utility)) / cost.sqrt()).ln()
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::{CharacterRecord, Check};
    use std::collections::BTreeMap;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    fn caster(slots: &[(i64, i64)]) -> Character {
        let record = CharacterRecord {
            spell_slots: slots.iter().copied().collect::<BTreeMap<_, _>>(),
            ..CharacterRecord::uniform("Caster", 10, 12, 20)
        };
        Character::from_record(&record).unwrap()
    }

    #[test]
    fn time_costs() {
        assert!(close(time_cost(ActionTime::Action), 1.0));
        assert!(close(time_cost(ActionTime::Bonus), 0.5));
        assert!(close(time_cost(ActionTime::Reaction), 0.0));
        assert!(close(time_cost(ActionTime::LongAction), 2.0));
    }

    #[test]
    fn mundane_and_cantrips_cost_their_time() {
        let c = caster(&[]);
        let swing = Action::new("Swing", ActionTime::Bonus, Check::Hit { bonus: 2 });
        assert!(close(action_cost(&swing, &c, 0.45), 0.5));
        let bolt = Action::new("Fire Bolt", ActionTime::Action, Check::Hit { bonus: 5 }).as_spell(0);
        assert!(close(action_cost(&bolt, &c, 0.45), 1.0));
    }

    #[test]
    fn zero_cost_becomes_one() {
        let c = caster(&[]);
        let riposte = Action::new("Riposte", ActionTime::Reaction, Check::Hit { bonus: 5 });
        assert!(close(action_cost(&riposte, &c, 0.45), 1.0));
    }

    #[test]
    fn leveled_spell_scales_with_scarcity() {
        let c = caster(&[(1, 4), (2, 3), (3, 2)]);
        let fireball = Action::new("Fireball", ActionTime::Action, Check::NoRoll).as_spell(3);
        let expected = 4.0 * (9.0_f64 / 2.0).powf(0.45);
        assert!(close(action_cost(&fireball, &c, 0.45), expected));
        let flat = action_cost(&fireball, &c, 0.0);
        assert!(close(flat, 4.0));
    }

    #[test]
    fn spell_without_slots_scores_last() {
        let c = caster(&[(1, 2)]);
        let fireball = Action::new("Fireball", ActionTime::Action, Check::NoRoll).as_spell(3);
        assert_eq!(slot_scarcity(&c, 3, 0.45), f64::INFINITY);
        let cost = action_cost(&fireball, &c, 0.45);
        assert_eq!(cost, f64::INFINITY);
        assert_eq!(economy_score(28.0, 0, cost), f64::NEG_INFINITY);
        assert_eq!(economy_score(0.0, 0, cost), f64::NEG_INFINITY);
        // A spent level does not affect spells of a level that still has slots.
        assert!(close(slot_scarcity(&c, 1, 0.0), 1.0));
    }

    #[test]
    fn score() {
        assert!(close(economy_score(3.75, 0, 1.0), 3.75_f64.ln()));
        assert!(close(economy_score(2.0, 2, 4.0), 2.0_f64.ln()));
        assert_eq!(economy_score(0.0, 0, 1.0), f64::NEG_INFINITY);
    }
}
