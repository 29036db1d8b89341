//! The structured character record handed over by the loading layer.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Character attributes as stored in a character sheet.
///
/// Numeric fields are signed so negative values reach validation. Every
/// list holds labels from the matching fixed domain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterRecord {
    /// Character name.
    pub name: String,
    /// Strength score.
    pub strength: i64,
    /// Dexterity score.
    pub dexterity: i64,
    /// Constitution score.
    pub constitution: i64,
    /// Intelligence score.
    pub intelligence: i64,
    /// Wisdom score.
    pub wisdom: i64,
    /// Charisma score.
    pub charisma: i64,
    /// Maximum hit points.
    pub hp: i64,
    /// Armor class.
    pub ac: i64,
    /// Proficiency bonus.
    pub proficiency_bonus: i64,
    /// Spell level → number of slots. Levels at or below zero are ignored.
    pub spell_slots: BTreeMap<i64, i64>,
    /// Saving throws the character is proficient in (`"STR"`, ...).
    pub st_proficiencies: Vec<String>,
    /// Skills with half proficiency.
    pub half_proficiencies: Vec<String>,
    /// Skills with proficiency.
    pub proficiencies: Vec<String>,
    /// Skills with expertise.
    pub expertise: Vec<String>,
    /// Resistances.
    pub resistances: Vec<String>,
    /// Vulnerabilities.
    pub vulnerabilities: Vec<String>,
    /// Immunities (damage types and conditions).
    pub immunities: Vec<String>,
    /// Conditions currently affecting the character.
    pub conditions: Vec<String>,
}

impl CharacterRecord {
    /// A record with every ability score set to `score`, no proficiencies,
    /// and no spell slots.
    pub fn uniform(name: impl Into<String>, score: i64, ac: i64, hp: i64) -> Self {
        Self {
            name: name.into(),
            strength: score,
            dexterity: score,
            constitution: score,
            intelligence: score,
            wisdom: score,
            charisma: score,
            hp,
            ac,
            ..Self::default()
        }
    }
}
