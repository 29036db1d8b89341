//! Fixed enumerations every record field is validated against.
//!
//! Each domain is a plain `Copy` enum whose variants carry the exact label
//! used in ability sheets and character records (`"STR"`, `"Fire"`,
//! `"Bludgeoning (NM)"`). Parsing is exact: an unknown label is a
//! [`CoreError::DomainValue`], never silently ignored.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A value drawn from a fixed, labelled domain.
pub trait DomainValue: Copy + Ord + fmt::Debug + 'static {
    /// Human-readable field name used in error messages.
    const FIELD: &'static str;

    /// Every accepted value, in declaration order.
    fn domain() -> &'static [Self];

    /// The label this value is written as in records.
    fn label(self) -> &'static str;

    /// Every accepted label, in declaration order.
    fn accepted() -> Vec<&'static str> {
        Self::domain().iter().map(|v| v.label()).collect()
    }

    /// Parse an exact label.
    fn parse(label: &str) -> CoreResult<Self> {
        Self::domain()
            .iter()
            .copied()
            .find(|v| v.label() == label)
            .ok_or_else(|| CoreError::DomainValue {
                field: Self::FIELD,
                value: label.to_string(),
                accepted: Self::accepted(),
            })
    }
}

macro_rules! domain_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $field:literal {
            $( $(#[$vmeta:meta])* $variant:ident => $label:literal ),+ $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub enum $name {
            $( $(#[$vmeta])* #[serde(rename = $label)] $variant, )+
        }

        impl $name {
            /// Every variant, in declaration order.
            pub const ALL: &'static [Self] = &[$(Self::$variant),+];
        }

        impl DomainValue for $name {
            const FIELD: &'static str = $field;

            fn domain() -> &'static [Self] {
                Self::ALL
            }

            fn label(self) -> &'static str {
                match self {
                    $(Self::$variant => $label,)+
                }
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.label())
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            fn from_str(s: &str) -> CoreResult<Self> {
                <Self as DomainValue>::parse(s)
            }
        }
    };
}

domain_enum! {
    /// One of the six ability scores. Also names a saving throw.
    Ability, "ability" {
        /// Strength.
        Str => "STR",
        /// Dexterity.
        Dex => "DEX",
        /// Constitution.
        Con => "CON",
        /// Intelligence.
        Int => "INT",
        /// Wisdom.
        Wis => "WIS",
        /// Charisma.
        Cha => "CHA",
    }
}

impl Ability {
    /// The unabbreviated name, e.g. "Strength".
    pub fn full_name(self) -> &'static str {
        match self {
            Self::Str => "Strength",
            Self::Dex => "Dexterity",
            Self::Con => "Constitution",
            Self::Int => "Intelligence",
            Self::Wis => "Wisdom",
            Self::Cha => "Charisma",
        }
    }
}

domain_enum! {
    /// The kind of damage an action deals.
    DamageType, "damage type" {
        /// Acid damage.
        Acid => "Acid",
        /// Cold damage.
        Cold => "Cold",
        /// Fire damage.
        Fire => "Fire",
        /// Force damage.
        Force => "Force",
        /// Lightning damage.
        Lightning => "Lightning",
        /// Necrotic damage.
        Necrotic => "Necrotic",
        /// Poison damage.
        Poison => "Poison",
        /// Psychic damage.
        Psychic => "Psychic",
        /// Radiant damage.
        Radiant => "Radiant",
        /// Thunder damage.
        Thunder => "Thunder",
        /// Bludgeoning damage.
        Bludgeoning => "Bludgeoning",
        /// Piercing damage.
        Piercing => "Piercing",
        /// Slashing damage.
        Slashing => "Slashing",
        /// The action deals no damage.
        NoDamage => "No Damage",
    }
}

impl DamageType {
    /// Damage types a creature can be vulnerable to.
    pub fn vulnerability_domain() -> impl Iterator<Item = Self> {
        Self::ALL.iter().copied().filter(|d| *d != Self::NoDamage)
    }
}

domain_enum! {
    /// When during a turn an action may be used.
    ActionTime, "action time" {
        /// A full action.
        Action => "A",
        /// A bonus action.
        Bonus => "B",
        /// A reaction.
        Reaction => "R",
        /// An action taking longer than one turn.
        LongAction => "L",
    }
}

domain_enum! {
    /// How an action's success is decided.
    RollType, "roll type" {
        /// An attack roll against armor class.
        Hit => "hit",
        /// The target makes a saving throw against a DC.
        Save => "save",
        /// The action always lands.
        NoRoll => "no_roll",
    }
}

domain_enum! {
    /// A skill a character can be proficient in.
    Skill, "skill" {
        /// Acrobatics (DEX).
        Acrobatics => "Acrobatics",
        /// Animal Handling (WIS).
        AnimalHandling => "Animal Handling",
        /// Arcana (INT).
        Arcana => "Arcana",
        /// Athletics (STR).
        Athletics => "Athletics",
        /// Deception (CHA).
        Deception => "Deception",
        /// History (INT).
        History => "History",
        /// Insight (WIS).
        Insight => "Insight",
        /// Intimidation (CHA).
        Intimidation => "Intimidation",
        /// Investigation (INT).
        Investigation => "Investigation",
        /// Medicine (WIS).
        Medicine => "Medicine",
        /// Nature (INT).
        Nature => "Nature",
        /// Perception (WIS).
        Perception => "Perception",
        /// Performance (CHA).
        Performance => "Performance",
        /// Persuasion (CHA).
        Persuasion => "Persuasion",
        /// Religion (INT).
        Religion => "Religion",
        /// Sleight of Hand (DEX).
        SleightOfHand => "Sleight of Hand",
        /// Stealth (DEX).
        Stealth => "Stealth",
        /// Survival (WIS).
        Survival => "Survival",
    }
}

impl Skill {
    /// The ability score this skill keys off.
    pub fn ability(self) -> Ability {
        match self {
            Self::Athletics => Ability::Str,
            Self::Acrobatics | Self::SleightOfHand | Self::Stealth => Ability::Dex,
            Self::Arcana | Self::History | Self::Investigation | Self::Nature | Self::Religion => {
                Ability::Int
            }
            Self::AnimalHandling
            | Self::Insight
            | Self::Medicine
            | Self::Perception
            | Self::Survival => Ability::Wis,
            Self::Deception | Self::Intimidation | Self::Performance | Self::Persuasion => {
                Ability::Cha
            }
        }
    }
}

domain_enum! {
    /// A damage source a creature can resist.
    ///
    /// Wider than [`DamageType`]: it also covers magical/non-magical
    /// variants and source categories such as traps or breath weapons.
    Resistance, "resistance" {
        /// Acid damage.
        Acid => "Acid",
        /// Bludgeoning damage.
        Bludgeoning => "Bludgeoning",
        /// Bludgeoning damage from magical sources.
        BludgeoningMagical => "Bludgeoning (M)",
        /// Bludgeoning damage from non-magical sources.
        BludgeoningNonmagical => "Bludgeoning (NM)",
        /// Cold damage.
        Cold => "Cold",
        /// Damage dealt by traps.
        TrapDamage => "Damage (Trap)",
        /// Damage dealt by spells.
        SpellDamage => "Damage (Spells)",
        /// Damage dealt by breath weapons.
        BreathDamage => "Damage (Breath)",
        /// Fire damage.
        Fire => "Fire",
        /// Force damage.
        Force => "Force",
        /// Lightning damage.
        Lightning => "Lightning",
        /// Necrotic damage.
        Necrotic => "Necrotic",
        /// Piercing damage.
        Piercing => "Piercing",
        /// Piercing damage from non-magical sources.
        PiercingNonmagical => "Piercing (NM)",
        /// Poison damage.
        Poison => "Poison",
        /// Psychic damage.
        Psychic => "Psychic",
        /// Radiant damage.
        Radiant => "Radiant",
        /// Damage from ranged attacks.
        RangedAttacks => "Ranged Attacks",
        /// Slashing damage.
        Slashing => "Slashing",
        /// Slashing damage from magical sources.
        SlashingMagical => "Slashing (M)",
        /// Thunder damage.
        Thunder => "Thunder",
    }
}

impl Resistance {
    /// The resistance entry matching a damage type, if there is one.
    pub fn for_damage(damage: DamageType) -> Option<Self> {
        Self::parse(damage.label()).ok()
    }
}

domain_enum! {
    /// A condition that can be active on a creature.
    Condition, "condition" {
        /// Blinded.
        Blinded => "Blinded",
        /// Charmed.
        Charmed => "Charmed",
        /// Deafened.
        Deafened => "Deafened",
        /// Exhaustion.
        Exhaustion => "Exhaustion",
        /// Frightened.
        Frightened => "Frightened",
        /// Grappled.
        Grappled => "Grappled",
        /// Incapacitated.
        Incapacitated => "Incapacitated",
        /// Invisible.
        Invisible => "Invisible",
        /// Paralyzed.
        Paralyzed => "Paralyzed",
        /// Petrified.
        Petrified => "Petrified",
        /// Poisoned.
        Poisoned => "Poisoned",
        /// Prone.
        Prone => "Prone",
        /// Restrained.
        Restrained => "Restrained",
        /// Stunned.
        Stunned => "Stunned",
        /// Unconscious.
        Unconscious => "Unconscious",
    }
}

/// Something a creature can be immune to: a damage type or a condition.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Immunity {
    /// Immunity to a damage type.
    Damage(DamageType),
    /// Immunity to non-magical bludgeoning damage.
    BludgeoningNonmagical,
    /// Immunity to a condition.
    Condition(Condition),
}

const IMMUNITIES: [Immunity; 29] = [
    Immunity::Damage(DamageType::Acid),
    Immunity::Damage(DamageType::Cold),
    Immunity::Damage(DamageType::Fire),
    Immunity::Damage(DamageType::Force),
    Immunity::Damage(DamageType::Lightning),
    Immunity::Damage(DamageType::Necrotic),
    Immunity::Damage(DamageType::Poison),
    Immunity::Damage(DamageType::Psychic),
    Immunity::Damage(DamageType::Radiant),
    Immunity::Damage(DamageType::Thunder),
    Immunity::Damage(DamageType::Bludgeoning),
    Immunity::Damage(DamageType::Piercing),
    Immunity::Damage(DamageType::Slashing),
    Immunity::BludgeoningNonmagical,
    Immunity::Condition(Condition::Blinded),
    Immunity::Condition(Condition::Charmed),
    Immunity::Condition(Condition::Deafened),
    Immunity::Condition(Condition::Exhaustion),
    Immunity::Condition(Condition::Frightened),
    Immunity::Condition(Condition::Grappled),
    Immunity::Condition(Condition::Incapacitated),
    Immunity::Condition(Condition::Invisible),
    Immunity::Condition(Condition::Paralyzed),
    Immunity::Condition(Condition::Petrified),
    Immunity::Condition(Condition::Poisoned),
    Immunity::Condition(Condition::Prone),
    Immunity::Condition(Condition::Restrained),
    Immunity::Condition(Condition::Stunned),
    Immunity::Condition(Condition::Unconscious),
];

impl DomainValue for Immunity {
    const FIELD: &'static str = "immunity";

    fn domain() -> &'static [Self] {
        &IMMUNITIES
    }

    fn label(self) -> &'static str {
        match self {
            Self::Damage(d) => d.label(),
            Self::BludgeoningNonmagical => "Bludgeoning (NM)",
            Self::Condition(c) => c.label(),
        }
    }
}

impl fmt::Display for Immunity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Immunity {
    type Err = CoreError;

    fn from_str(s: &str) -> CoreResult<Self> {
        <Self as DomainValue>::parse(s)
    }
}
