//! Characters: ability scores, defenses, resources, and abilities.
//!
//! A [`Character`] is built from a [`CharacterRecord`] and owns its spell
//! slot pools, limited-use charges, and its named [`Action`]s. Actions do
//! not point back at their owner; engines take the character explicitly.

pub mod record;

pub use record::CharacterRecord;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::action::{AbilityRecord, Action};
use crate::domain::{Ability, Condition, DamageType, DomainValue, Immunity, Resistance, Skill};
use crate::error::{CoreError, CoreResult};
use crate::flags::FlagMap;
use crate::resource::{ChargePool, SpellSlotPool};
use crate::validate;

/// How proficient a character is in a skill.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub enum ProficiencyLevel {
    /// Untrained.
    #[default]
    None,
    /// Half the proficiency bonus, rounded down.
    Half,
    /// The full proficiency bonus.
    Proficient,
    /// Twice the proficiency bonus.
    Expertise,
}

impl ProficiencyLevel {
    /// The bonus this level adds for a given proficiency bonus.
    pub fn bonus(self, proficiency_bonus: i32) -> i32 {
        match self {
            Self::None => 0,
            Self::Half => proficiency_bonus.div_euclid(2),
            Self::Proficient => proficiency_bonus,
            Self::Expertise => proficiency_bonus * 2,
        }
    }
}

/// Which damage modifiers apply to one damage type on one creature.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DamageModifiers {
    /// Takes double damage.
    pub vulnerable: bool,
    /// Takes half damage.
    pub resistant: bool,
    /// Takes no damage.
    pub immune: bool,
}

impl DamageModifiers {
    /// How many of the three modifiers are set.
    pub fn active_count(self) -> usize {
        [self.vulnerable, self.resistant, self.immune]
            .into_iter()
            .filter(|set| *set)
            .count()
    }
}

/// Modifier for an ability score: `floor((score - 10) / 2)`.
pub fn ability_modifier(score: u32) -> i32 {
    let offset = i64::from(score) - 10;
    i32::try_from(offset.div_euclid(2)).unwrap_or(i32::MAX)
}

/// A character's full mechanical state.
#[derive(Debug, Clone)]
pub struct Character {
    name: String,
    scores: BTreeMap<Ability, u32>,
    modifiers: BTreeMap<Ability, i32>,
    saving_throws: BTreeMap<Ability, i32>,
    armor_class: i32,
    max_hp: u32,
    proficiency_bonus: i32,
    skills: BTreeMap<Skill, ProficiencyLevel>,
    save_proficiencies: FlagMap<Ability>,
    resistances: FlagMap<Resistance>,
    vulnerabilities: FlagMap<DamageType>,
    immunities: FlagMap<Immunity>,
    conditions: FlagMap<Condition>,
    spell_slots: BTreeMap<u8, SpellSlotPool>,
    abilities: BTreeMap<String, Action>,
    charges: BTreeMap<String, ChargePool>,
}

impl Character {
    /// Validate a character record and build the character.
    ///
    /// Fails on the first negative number or unknown label. Spell slot
    /// pools are only created for levels above zero with a positive count.
    pub fn from_record(record: &CharacterRecord) -> CoreResult<Self> {
        let raw_scores = [
            (Ability::Str, record.strength),
            (Ability::Dex, record.dexterity),
            (Ability::Con, record.constitution),
            (Ability::Int, record.intelligence),
            (Ability::Wis, record.wisdom),
            (Ability::Cha, record.charisma),
        ];
        let mut scores = BTreeMap::new();
        for (ability, value) in raw_scores {
            scores.insert(ability, validate::non_negative(ability.full_name(), value)?);
        }
        let modifiers: BTreeMap<Ability, i32> = scores
            .iter()
            .map(|(ability, score)| (*ability, ability_modifier(*score)))
            .collect();

        let max_hp = validate::non_negative("hp", record.hp)?;
        let armor_class = to_i32(validate::non_negative("ac", record.ac)?);
        let proficiency_bonus =
            to_i32(validate::non_negative("proficiency_bonus", record.proficiency_bonus)?);

        let mut skills: BTreeMap<Skill, ProficiencyLevel> =
            Skill::ALL.iter().map(|s| (*s, ProficiencyLevel::None)).collect();
        let graded = [
            (&record.proficiencies, ProficiencyLevel::Proficient),
            (&record.half_proficiencies, ProficiencyLevel::Half),
            (&record.expertise, ProficiencyLevel::Expertise),
        ];
        for (labels, level) in graded {
            for skill in validate::all_of::<Skill, _>(labels)? {
                let entry = skills.entry(skill).or_default();
                *entry = (*entry).max(level);
            }
        }

        let save_proficiencies =
            FlagMap::from_labels(Ability::ALL.iter().copied(), &record.st_proficiencies)?;
        let saving_throws = modifiers
            .iter()
            .map(|(ability, modifier)| {
                let bonus = if save_proficiencies.get(*ability) {
                    proficiency_bonus
                } else {
                    0
                };
                (*ability, modifier + bonus)
            })
            .collect();

        let resistances =
            FlagMap::from_labels(Resistance::ALL.iter().copied(), &record.resistances)?;
        let vulnerabilities =
            FlagMap::from_labels(DamageType::vulnerability_domain(), &record.vulnerabilities)?;
        let immunities =
            FlagMap::from_labels(Immunity::domain().iter().copied(), &record.immunities)?;
        let conditions =
            FlagMap::from_labels(Condition::ALL.iter().copied(), &record.conditions)?;

        let mut spell_slots = BTreeMap::new();
        for (&level, &count) in &record.spell_slots {
            if level <= 0 {
                continue;
            }
            let level = validate::spell_level(level)?;
            let count = validate::non_negative("spell slot count", count)?;
            if count > 0 {
                spell_slots.insert(level, SpellSlotPool::spell_slots(level, count));
            }
        }

        Ok(Self {
            name: record.name.clone(),
            scores,
            modifiers,
            saving_throws,
            armor_class,
            max_hp,
            proficiency_bonus,
            skills,
            save_proficiencies,
            resistances,
            vulnerabilities,
            immunities,
            conditions,
            spell_slots,
            abilities: BTreeMap::new(),
            charges: BTreeMap::new(),
        })
    }

    /// Character name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw ability score.
    pub fn score(&self, ability: Ability) -> u32 {
        self.scores.get(&ability).copied().unwrap_or(0)
    }

    /// Ability modifier.
    pub fn modifier(&self, ability: Ability) -> i32 {
        self.modifiers.get(&ability).copied().unwrap_or(0)
    }

    /// Saving throw modifier: ability modifier plus proficiency if proficient.
    pub fn saving_throw(&self, ability: Ability) -> i32 {
        self.saving_throws.get(&ability).copied().unwrap_or(0)
    }

    /// Returns true if the character is proficient in this saving throw.
    pub fn is_save_proficient(&self, ability: Ability) -> bool {
        self.save_proficiencies.get(ability)
    }

    /// Armor class.
    pub fn armor_class(&self) -> i32 {
        self.armor_class
    }

    /// Maximum hit points.
    pub fn max_hp(&self) -> u32 {
        self.max_hp
    }

    /// Proficiency bonus.
    pub fn proficiency_bonus(&self) -> i32 {
        self.proficiency_bonus
    }

    /// Proficiency level in a skill.
    pub fn proficiency(&self, skill: Skill) -> ProficiencyLevel {
        self.skills.get(&skill).copied().unwrap_or_default()
    }

    /// Skill modifier: governing ability modifier plus proficiency.
    pub fn skill_modifier(&self, skill: Skill) -> i32 {
        self.modifier(skill.ability()) + self.proficiency(skill).bonus(self.proficiency_bonus)
    }

    /// Resistance flags.
    pub fn resistances(&self) -> &FlagMap<Resistance> {
        &self.resistances
    }

    /// Vulnerability flags.
    pub fn vulnerabilities(&self) -> &FlagMap<DamageType> {
        &self.vulnerabilities
    }

    /// Immunity flags (damage types and conditions).
    pub fn immunities(&self) -> &FlagMap<Immunity> {
        &self.immunities
    }

    /// Active conditions.
    pub fn conditions(&self) -> &FlagMap<Condition> {
        &self.conditions
    }

    /// Switch conditions on or off.
    pub fn toggle_conditions(&mut self, conditions: &[Condition], active: bool) -> CoreResult<()> {
        for condition in conditions {
            self.conditions.set(*condition, active)?;
        }
        Ok(())
    }

    /// The raw vulnerable/resistant/immune flags for one damage type.
    ///
    /// Flags are reported as stored; exclusivity is checked by the caller.
    pub fn damage_modifiers(&self, damage_type: DamageType) -> DamageModifiers {
        DamageModifiers {
            vulnerable: self.vulnerabilities.get(damage_type),
            resistant: Resistance::for_damage(damage_type)
                .is_some_and(|r| self.resistances.get(r)),
            immune: self.immunities.get(Immunity::Damage(damage_type)),
        }
    }

    /// Spell slot pools by level.
    pub fn spell_slots(&self) -> &BTreeMap<u8, SpellSlotPool> {
        &self.spell_slots
    }

    /// Slots remaining across every level.
    pub fn remaining_slots(&self) -> u32 {
        self.spell_slots.values().map(SpellSlotPool::remaining).sum()
    }

    /// Slots remaining at one level (zero if the character has none).
    pub fn remaining_slots_at(&self, level: u8) -> u32 {
        self.spell_slots
            .get(&level)
            .map(SpellSlotPool::remaining)
            .unwrap_or(0)
    }

    /// Spend a spell slot of `level`.
    ///
    /// See [`crate::resource::ResourcePool::consume`] for the `graceful`
    /// contract. A level without a pool counts as exhausted.
    pub fn consume_spell_slot(&mut self, level: u8, graceful: bool) -> CoreResult<bool> {
        match self.spell_slots.get_mut(&level) {
            Some(pool) => pool.consume(graceful),
            None if graceful => Ok(false),
            None => Err(CoreError::ExhaustedResource(format!(
                "level {level} spell slot"
            ))),
        }
    }

    /// Named abilities.
    pub fn abilities(&self) -> &BTreeMap<String, Action> {
        &self.abilities
    }

    /// Look up an ability by name.
    pub fn ability(&self, name: &str) -> CoreResult<&Action> {
        self.abilities
            .get(name)
            .ok_or_else(|| CoreError::UnknownAbility(name.to_string()))
    }

    /// Remaining charges for a limited-use ability.
    pub fn charges(&self, name: &str) -> Option<&ChargePool> {
        self.charges.get(name)
    }

    /// Attach an action, replacing any ability with the same name.
    ///
    /// Limited-use actions get a fresh charge pool.
    pub fn add_action(&mut self, action: Action) -> Option<Action> {
        let name = action.name().to_string();
        match action.uses() {
            Some(uses) => {
                self.charges
                    .insert(name.clone(), ChargePool::charges(&name, uses));
            }
            None => {
                self.charges.remove(&name);
            }
        }
        tracing::debug!(character = %self.name, ability = %name, "added ability");
        self.abilities.insert(name, action)
    }

    /// Validate an ability record and attach it.
    pub fn add_ability(&mut self, record: &AbilityRecord) -> CoreResult<Option<Action>> {
        let action = Action::from_record(record)?;
        Ok(self.add_action(action))
    }

    /// Validate every record, then attach them all. Nothing is attached if
    /// any record is invalid. Returns the number of abilities added.
    pub fn add_abilities(&mut self, records: &[AbilityRecord]) -> CoreResult<usize> {
        let actions = records
            .iter()
            .map(Action::from_record)
            .collect::<CoreResult<Vec<_>>>()?;
        let count = actions.len();
        for action in actions {
            self.add_action(action);
        }
        Ok(count)
    }

    /// Spend whatever resources using `name` requires: a spell slot for
    /// leveled spells and a charge for limited-use abilities.
    ///
    /// Availability is checked before anything is spent. When something is
    /// missing, returns `Ok(false)` if `graceful`, otherwise fails with
    /// [`CoreError::ExhaustedResource`].
    pub fn expend(&mut self, name: &str, graceful: bool) -> CoreResult<bool> {
        let action = self.ability(name)?;
        let slot_level = action.spell_level().filter(|level| *level > 0);
        let limited = action.uses().is_some();

        let missing = if let Some(level) = slot_level.filter(|l| self.remaining_slots_at(*l) == 0)
        {
            Some(format!("level {level} spell slot"))
        } else if limited && self.charges.get(name).is_none_or(ChargePool::is_exhausted) {
            Some(format!("uses of {name}"))
        } else {
            None
        };

        if let Some(what) = missing {
            if graceful {
                return Ok(false);
            }
            return Err(CoreError::ExhaustedResource(what));
        }

        if let Some(level) = slot_level {
            self.consume_spell_slot(level, false)?;
        }
        if let Some(pool) = self.charges.get_mut(name) {
            pool.consume(false)?;
        }
        Ok(true)
    }

    /// Restore every spell slot and charge.
    pub fn long_rest(&mut self) {
        for pool in self.spell_slots.values_mut() {
            pool.reset();
        }
        for pool in self.charges.values_mut() {
            pool.reset();
        }
        tracing::debug!(character = %self.name, "long rest");
    }
}

impl fmt::Display for Character {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}:", self.name)?;
        let scores: Vec<String> = Ability::ALL
            .iter()
            .map(|a| format!("{a}:{}", self.score(*a)))
            .collect();
        writeln!(f, "{}", scores.join("\t"))?;
        write!(f, "AC:{}\tMax HP:{}", self.armor_class, self.max_hp)
    }
}

fn to_i32(value: u32) -> i32 {
    i32::try_from(value).unwrap_or(i32::MAX)
}
