//! Actions a character can take on their turn.
//!
//! An [`Action`] is an immutable description of one usable ability: when it
//! can be used, how it lands (attack roll, saving throw, or automatically),
//! and what it does. Spells are the same shape with [`ActionKind::Spell`]
//! binding them to a spell-slot level.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::dice::Die;
use crate::domain::{Ability, ActionTime, DamageType, RollType};
use crate::error::{CoreError, CoreResult};
use crate::validate;

/// A named status an action imposes (e.g. "Prone", "Frightened").
///
/// Carries no behavior beyond its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StatusEffect(pub String);

impl StatusEffect {
    /// Create a status effect.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// The status name.
    pub fn name(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StatusEffect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// How an action's success is decided.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Check {
    /// An attack roll against the target's armor class.
    Hit {
        /// Bonus added to the attack roll.
        bonus: i32,
    },
    /// The target rolls a saving throw against a difficulty class.
    Save {
        /// Which saving throw the target makes.
        ability: Ability,
        /// Difficulty class the target must meet.
        dc: u32,
    },
    /// The action lands without a roll.
    NoRoll,
}

impl Check {
    /// The roll type this check belongs to.
    pub fn roll_type(self) -> RollType {
        match self {
            Self::Hit { .. } => RollType::Hit,
            Self::Save { .. } => RollType::Save,
            Self::NoRoll => RollType::NoRoll,
        }
    }

    /// The saving throw this check targets, if it is a save.
    pub fn save_ability(self) -> Option<Ability> {
        match self {
            Self::Save { ability, .. } => Some(ability),
            _ => None,
        }
    }
}

/// Dice and flat bonus rolled for each hit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DamageProfile {
    /// Die rolled for damage, if any.
    pub die: Option<Die>,
    /// How many of `die` are rolled per hit.
    pub dice_count: u32,
    /// Flat damage added per hit.
    pub flat_bonus: u32,
}

impl DamageProfile {
    /// `count` dice of `die` with no flat bonus.
    pub fn dice(count: u32, die: Die) -> Self {
        Self {
            die: Some(die),
            dice_count: count,
            flat_bonus: 0,
        }
    }

    /// A flat amount with no dice.
    pub fn flat(amount: u32) -> Self {
        Self {
            die: None,
            dice_count: 0,
            flat_bonus: amount,
        }
    }

    /// Add a flat bonus per hit.
    pub fn plus(mut self, amount: u32) -> Self {
        self.flat_bonus = amount;
        self
    }
}

impl fmt::Display for DamageProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.die {
            Some(die) if self.flat_bonus > 0 => {
                write!(f, "{}{die}+{}", self.dice_count, self.flat_bonus)
            }
            Some(die) => write!(f, "{}{die}", self.dice_count),
            None => write!(f, "{}", self.flat_bonus),
        }
    }
}

/// Whether an action is mundane or a spell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionKind {
    /// A mundane ability (weapon attack, class feature).
    Mundane,
    /// A spell. Level 0 is a cantrip and uses no slot.
    Spell {
        /// Spell level.
        level: u8,
    },
}

/// One usable ability.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    name: String,
    kind: ActionKind,
    action_time: ActionTime,
    check: Check,
    damage: Option<DamageProfile>,
    attack_rolls: u32,
    damage_type: Option<DamageType>,
    half_damage_on_fail: bool,
    imposed_status: Option<StatusEffect>,
    utility: Option<u32>,
    uses: Option<u32>,
    is_combat: bool,
}

impl Action {
    /// Create a mundane combat action with no damage.
    pub fn new(name: impl Into<String>, action_time: ActionTime, check: Check) -> Self {
        Self {
            name: name.into(),
            kind: ActionKind::Mundane,
            action_time,
            check,
            damage: None,
            attack_rolls: 0,
            damage_type: None,
            half_damage_on_fail: false,
            imposed_status: None,
            utility: None,
            uses: None,
            is_combat: true,
        }
    }

    /// Make this a spell of the given level.
    pub fn as_spell(mut self, level: u8) -> Self {
        self.kind = ActionKind::Spell { level };
        self
    }

    /// Set the damage rolled per hit and how many attack rolls are made.
    pub fn with_damage(mut self, damage: DamageProfile, attack_rolls: u32) -> Self {
        self.damage = Some(damage);
        self.attack_rolls = attack_rolls;
        self
    }

    /// Set the damage type.
    pub fn with_damage_type(mut self, damage_type: DamageType) -> Self {
        self.damage_type = Some(damage_type);
        self
    }

    /// The target still takes half damage on a successful save.
    pub fn with_half_damage_on_fail(mut self) -> Self {
        self.half_damage_on_fail = true;
        self
    }

    /// Set the status this action imposes.
    pub fn with_status(mut self, status: StatusEffect) -> Self {
        self.imposed_status = Some(status);
        self
    }

    /// Set a flat utility value for non-damage effects.
    pub fn with_utility(mut self, utility: u32) -> Self {
        self.utility = Some(utility);
        self
    }

    /// Limit the action to `uses` per long rest.
    pub fn with_uses(mut self, uses: u32) -> Self {
        self.uses = Some(uses);
        self
    }

    /// Mark the action as usable outside combat only.
    pub fn non_combat(mut self) -> Self {
        self.is_combat = false;
        self
    }

    /// Validate an ability record and build the action it describes.
    pub fn from_record(record: &AbilityRecord) -> CoreResult<Self> {
        let action_time: ActionTime = validate::one_of(&record.action_time)?;
        let roll_type: RollType = validate::one_of(&record.roll_type)?;

        let check = match roll_type {
            RollType::Hit => Check::Hit {
                bonus: validate::required(record.hit_bonus, "hit_bonus", "hit roll")?,
            },
            RollType::Save => {
                let ability = validate::required(record.dc_type.as_deref(), "DC_type", "save roll")?;
                let dc = validate::required(record.dc, "DC", "save roll")?;
                Check::Save {
                    ability: validate::one_of(ability)?,
                    dc: validate::non_negative("DC", dc)?,
                }
            }
            RollType::NoRoll => Check::NoRoll,
        };

        let mut action = Self::new(record.name.clone(), action_time, check);
        action.is_combat = record.is_combat;

        let dice_count = validate::optional_non_negative("n_damage_die", record.n_damage_die)?;
        let flat_bonus = validate::optional_non_negative("flat_damage", record.flat_damage)?;
        let attack_rolls = validate::optional_non_negative("n_hit_rolls", record.n_hit_rolls)?;
        let die = record.damage_die.map(Die::from_record).transpose()?;
        if die.is_some() && dice_count.is_none() {
            return Err(CoreError::MissingField {
                field: "n_damage_die",
                context: "damage_die",
            });
        }
        if die.is_some() || flat_bonus.is_some() {
            let damage = DamageProfile {
                die,
                dice_count: dice_count.unwrap_or(0),
                flat_bonus: flat_bonus.unwrap_or(0),
            };
            action = action.with_damage(damage, attack_rolls.unwrap_or(0));
        } else {
            action.attack_rolls = attack_rolls.unwrap_or(0);
        }

        action.damage_type = validate::optional_one_of(record.damage_type.as_deref())?;
        action.half_damage_on_fail = record.half_damage_on_fail;
        action.imposed_status = record.imposed_status.as_deref().map(StatusEffect::new);
        action.utility = validate::optional_non_negative("utility", record.utility)?;
        action.uses = validate::optional_non_negative("n_uses", record.n_uses)?;

        if record.is_spell {
            let level = validate::required(record.spell_level, "spell_level", "spell")?;
            action = action.as_spell(validate::spell_level(level)?);
        }

        Ok(action)
    }

    /// The ability's name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Mundane or spell.
    pub fn kind(&self) -> ActionKind {
        self.kind
    }

    /// Spell level, or `None` for mundane actions.
    pub fn spell_level(&self) -> Option<u8> {
        match self.kind {
            ActionKind::Spell { level } => Some(level),
            ActionKind::Mundane => None,
        }
    }

    /// Returns true if this action is a spell (including cantrips).
    pub fn is_spell(&self) -> bool {
        matches!(self.kind, ActionKind::Spell { .. })
    }

    /// When during a turn the action is used.
    pub fn action_time(&self) -> ActionTime {
        self.action_time
    }

    /// How the action lands.
    pub fn check(&self) -> Check {
        self.check
    }

    /// Damage rolled per hit, if any.
    pub fn damage(&self) -> Option<&DamageProfile> {
        self.damage.as_ref()
    }

    /// How many times damage is applied (0 means no damage).
    pub fn attack_rolls(&self) -> u32 {
        self.attack_rolls
    }

    /// Damage type, if any.
    pub fn damage_type(&self) -> Option<DamageType> {
        self.damage_type
    }

    /// Returns true if a successful save still takes half damage.
    pub fn half_damage_on_fail(&self) -> bool {
        self.half_damage_on_fail
    }

    /// Status imposed on the target, if any.
    pub fn imposed_status(&self) -> Option<&StatusEffect> {
        self.imposed_status.as_ref()
    }

    /// Flat utility value, if any.
    pub fn utility(&self) -> Option<u32> {
        self.utility
    }

    /// Uses per long rest, or `None` if unlimited.
    pub fn uses(&self) -> Option<u32> {
        self.uses
    }

    /// Returns true if the action is meant for combat.
    pub fn is_combat(&self) -> bool {
        self.is_combat
    }
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.check {
            Check::Hit { bonus } => write!(f, "{} ({bonus:+})", self.name)?,
            Check::Save { ability, dc } => write!(f, "{} ({ability} {dc})", self.name)?,
            Check::NoRoll => write!(f, "{}", self.name)?,
        }

        let mut parts = Vec::new();
        if let Some(damage) = &self.damage {
            match self.damage_type {
                Some(kind) => parts.push(format!("{kind} {damage}")),
                None => parts.push(damage.to_string()),
            }
        }
        if let Some(status) = &self.imposed_status {
            parts.push(status.to_string());
        }
        if !parts.is_empty() {
            write!(f, ": {}", parts.join(", "))?;
        }
        Ok(())
    }
}

fn default_true() -> bool {
    true
}

/// One row of an ability sheet, as handed over by the loading layer.
///
/// Field names follow the sheet's column headers. Numeric fields are signed
/// so that negative values reach validation instead of failing to parse.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AbilityRecord {
    /// Ability name.
    pub name: String,
    /// Action-time code: `A`, `B`, `R`, or `L`.
    pub action_time: String,
    /// Roll type: `hit`, `save`, or `no_roll`.
    pub roll_type: String,
    /// Whether the row describes a spell.
    #[serde(rename = "IS_SPELL", alias = "is_spell")]
    pub is_spell: bool,
    /// Spell level (spells only).
    pub spell_level: Option<i64>,
    /// Whether the ability is used in combat.
    #[serde(default = "default_true")]
    pub is_combat: bool,
    /// Attack bonus (hit rolls).
    pub hit_bonus: Option<i32>,
    /// Save difficulty class (save rolls).
    #[serde(rename = "DC", alias = "dc")]
    pub dc: Option<i64>,
    /// Saving throw the target makes (save rolls).
    #[serde(rename = "DC_type", alias = "dc_type")]
    pub dc_type: Option<String>,
    /// Number of sides on the damage die.
    pub damage_die: Option<i64>,
    /// Number of damage dice per hit.
    pub n_damage_die: Option<i64>,
    /// Flat damage per hit.
    pub flat_damage: Option<i64>,
    /// Number of attack rolls (damage applications).
    pub n_hit_rolls: Option<i64>,
    /// Damage type label.
    pub damage_type: Option<String>,
    /// Half damage when the target succeeds its save.
    pub half_damage_on_fail: bool,
    /// Status imposed on the target.
    pub imposed_status: Option<String>,
    /// Flat utility value.
    pub utility: Option<i64>,
    /// Uses per long rest.
    pub n_uses: Option<i64>,
}

impl AbilityRecord {
    /// A record with the mandatory columns filled in and everything else empty.
    pub fn new(
        name: impl Into<String>,
        action_time: impl Into<String>,
        roll_type: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            action_time: action_time.into(),
            roll_type: roll_type.into(),
            is_combat: true,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn longsword() -> AbilityRecord {
        AbilityRecord {
            hit_bonus: Some(5),
            damage_die: Some(8),
            n_damage_die: Some(1),
            flat_damage: Some(3),
            n_hit_rolls: Some(1),
            damage_type: Some("Slashing".to_string()),
            ..AbilityRecord::new("Longsword", "A", "hit")
        }
    }

    fn fireball() -> AbilityRecord {
        AbilityRecord {
            is_spell: true,
            spell_level: Some(3),
            dc: Some(15),
            dc_type: Some("DEX".to_string()),
            damage_die: Some(6),
            n_damage_die: Some(8),
            n_hit_rolls: Some(1),
            damage_type: Some("Fire".to_string()),
            half_damage_on_fail: true,
            ..AbilityRecord::new("Fireball", "A", "save")
        }
    }

    #[test]
    fn hit_record_builds_mundane_action() {
        let action = Action::from_record(&longsword()).unwrap();
        assert_eq!(action.name(), "Longsword");
        assert_eq!(action.kind(), ActionKind::Mundane);
        assert_eq!(action.check(), Check::Hit { bonus: 5 });
        assert_eq!(action.action_time(), ActionTime::Action);
        assert_eq!(
            action.damage(),
            Some(&DamageProfile::dice(1, Die::D8).plus(3))
        );
        assert_eq!(action.attack_rolls(), 1);
        assert_eq!(action.damage_type(), Some(DamageType::Slashing));
        assert_eq!(action.spell_level(), None);
        assert!(action.is_combat());
    }

    #[test]
    fn save_record_builds_spell() {
        let action = Action::from_record(&fireball()).unwrap();
        assert_eq!(action.kind(), ActionKind::Spell { level: 3 });
        assert_eq!(
            action.check(),
            Check::Save {
                ability: Ability::Dex,
                dc: 15
            }
        );
        assert!(action.half_damage_on_fail());
        assert_eq!(action.check().save_ability(), Some(Ability::Dex));
    }

    #[test]
    fn spell_level_ignored_for_mundane_rows() {
        let record = AbilityRecord {
            spell_level: Some(2),
            ..longsword()
        };
        assert_eq!(Action::from_record(&record).unwrap().spell_level(), None);
    }

    #[test]
    fn unknown_action_time_rejected() {
        let record = AbilityRecord {
            action_time: "X".to_string(),
            ..longsword()
        };
        assert!(matches!(
            Action::from_record(&record),
            Err(CoreError::DomainValue {
                field: "action time",
                ..
            })
        ));
    }

    #[test]
    fn unknown_damage_type_rejected() {
        let record = AbilityRecord {
            damage_type: Some("Sonic".to_string()),
            ..longsword()
        };
        assert!(matches!(
            Action::from_record(&record),
            Err(CoreError::DomainValue {
                field: "damage type",
                ..
            })
        ));
    }

    #[test]
    fn negative_counts_rejected() {
        let record = AbilityRecord {
            n_hit_rolls: Some(-1),
            ..longsword()
        };
        assert_eq!(
            Action::from_record(&record),
            Err(CoreError::NonNegative {
                field: "n_hit_rolls",
                value: -1
            })
        );

        let record = AbilityRecord {
            spell_level: Some(-1),
            ..fireball()
        };
        assert!(matches!(
            Action::from_record(&record),
            Err(CoreError::NonNegative {
                field: "spell level",
                ..
            })
        ));
    }

    #[test]
    fn missing_check_fields_rejected() {
        let record = AbilityRecord {
            hit_bonus: None,
            ..longsword()
        };
        assert_eq!(
            Action::from_record(&record),
            Err(CoreError::MissingField {
                field: "hit_bonus",
                context: "hit roll"
            })
        );

        let record = AbilityRecord {
            dc: None,
            ..fireball()
        };
        assert!(Action::from_record(&record).is_err());
    }

    #[test]
    fn die_without_count_rejected() {
        let record = AbilityRecord {
            n_damage_die: None,
            ..longsword()
        };
        assert!(matches!(
            Action::from_record(&record),
            Err(CoreError::MissingField {
                field: "n_damage_die",
                ..
            })
        ));
    }

    #[test]
    fn record_from_sheet_row_json() {
        let record: AbilityRecord = serde_json::from_str(
            r#"{
                "name": "Hold Person",
                "action_time": "A",
                "roll_type": "save",
                "IS_SPELL": true,
                "spell_level": 2,
                "DC": 15,
                "DC_type": "WIS",
                "imposed_status": "Paralyzed",
                "utility": 8
            }"#,
        )
        .unwrap();
        let action = Action::from_record(&record).unwrap();
        assert_eq!(action.spell_level(), Some(2));
        assert_eq!(action.utility(), Some(8));
        assert_eq!(action.damage(), None);
        assert_eq!(
            action.imposed_status().map(StatusEffect::name),
            Some("Paralyzed")
        );
    }

    #[test]
    fn display_summaries() {
        let sword = Action::from_record(&longsword()).unwrap();
        insta::assert_snapshot!(sword.to_string(), @"Longsword (+5): Slashing 1d8+3");

        let fireball = Action::from_record(&fireball()).unwrap();
        insta::assert_snapshot!(fireball.to_string(), @"Fireball (DEX 15): Fire 8d6");

        let hold = Action::new(
            "Hold Person",
            ActionTime::Action,
            Check::Save {
                ability: Ability::Wis,
                dc: 15,
            },
        )
        .as_spell(2)
        .with_status(StatusEffect::new("Paralyzed"));
        insta::assert_snapshot!(hold.to_string(), @"Hold Person (WIS 15): Paralyzed");

        let missile = Action::new("Magic Missile", ActionTime::Action, Check::NoRoll)
            .as_spell(1)
            .with_damage(DamageProfile::dice(1, Die::D4).plus(1), 3)
            .with_damage_type(DamageType::Force);
        insta::assert_snapshot!(missile.to_string(), @"Magic Missile: Force 1d4+1");

        let shove = Action::new("Shove", ActionTime::Bonus, Check::Hit { bonus: -1 });
        insta::assert_snapshot!(shove.to_string(), @"Shove (-1)");
    }
}
