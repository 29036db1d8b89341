//! The three statistics and the single entry point that computes them.

use std::fmt;
use std::str::FromStr;

use mm_core::{Action, Character, Check, DamageModifiers};
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::config::EngineConfig;
use crate::damage;
use crate::economy;
use crate::error::{EngineError, EngineResult};
use crate::probability;

/// What an outcome table measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Statistic {
    /// Chance the ability lands.
    #[serde(rename = "phit")]
    HitProbability,
    /// Expected damage per use.
    #[serde(rename = "ehit")]
    ExpectedDamage,
    /// Action economy score.
    #[serde(rename = "econ")]
    EconomyScore,
}

impl Statistic {
    /// Every statistic, in table order.
    pub const ALL: [Self; 3] = [Self::HitProbability, Self::ExpectedDamage, Self::EconomyScore];

    /// Short tag used in records and logs.
    pub fn tag(self) -> &'static str {
        match self {
            Self::HitProbability => "phit",
            Self::ExpectedDamage => "ehit",
            Self::EconomyScore => "econ",
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Statistic {
    type Err = EngineError;

    fn from_str(s: &str) -> EngineResult<Self> {
        Self::ALL
            .into_iter()
            .find(|stat| stat.tag() == s)
            .ok_or_else(|| {
                EngineError::InvalidArgument(format!(
                    "statistic must be one of [phit, ehit, econ], got '{s}'"
                ))
            })
    }
}

/// The acting character and the character it targets.
#[derive(Debug, Clone, Copy)]
pub struct Matchup<'a> {
    /// Owner of the abilities being evaluated.
    pub actor: &'a Character,
    /// The creature the abilities are used against.
    pub target: &'a Character,
}

impl<'a> Matchup<'a> {
    /// Pair an actor with a target.
    pub fn new(actor: &'a Character, target: &'a Character) -> Self {
        Self { actor, target }
    }

    /// The number `action` rolls against: the target's armor class for hit
    /// rolls, its saving throw for save rolls. `check_override` replaces
    /// either. Abilities without a roll get the armor class.
    pub fn check_value(&self, action: &Action, check_override: Option<i32>) -> i32 {
        check_override.unwrap_or_else(|| match action.check() {
            Check::Save { ability, .. } => self.target.saving_throw(ability),
            Check::Hit { .. } | Check::NoRoll => self.target.armor_class(),
        })
    }

    /// The target's damage modifiers for `action`'s damage type, checked
    /// for exclusivity.
    pub fn damage_modifiers(&self, action: &Action) -> EngineResult<DamageModifiers> {
        let Some(damage_type) = action.damage_type() else {
            return Ok(DamageModifiers::default());
        };
        let modifiers = self.target.damage_modifiers(damage_type);
        damage::damage_multiplier(modifiers, damage_type)?;
        Ok(modifiers)
    }
}

/// Compute `statistic` for `action` in `matchup`.
///
/// `check_override` replaces the target's armor class or saving throw.
/// With an RNG, damage dice are rolled instead of averaged.
pub fn compute_stat(
    action: &Action,
    matchup: Matchup<'_>,
    statistic: Statistic,
    check_override: Option<i32>,
    config: &EngineConfig,
    rng: Option<&mut StdRng>,
) -> EngineResult<f64> {
    let modifiers = matchup.damage_modifiers(action)?;
    let check_value = matchup.check_value(action, check_override);
    let probability = probability::success_probability(action, Some(check_value))?;

    match statistic {
        Statistic::HitProbability => Ok(probability),
        Statistic::ExpectedDamage => damage::expected_damage(action, probability, modifiers, rng),
        Statistic::EconomyScore => {
            let cost = economy::action_cost(action, matchup.actor, config.scarcity_coefficient);
            let expected = damage::expected_damage(action, probability, modifiers, rng)?;
            Ok(economy::economy_score(
                expected,
                action.utility().unwrap_or(0),
                cost,
            ))
        }
    }
}
