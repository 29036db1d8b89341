//! Data model for minmax: domains, dice, resources, actions, and characters.
//!
//! This crate holds the values the engine computes over. It never touches a
//! file or a socket: callers hand it already-parsed records
//! ([`AbilityRecord`], [`CharacterRecord`]) and get validated, strongly
//! typed values back, or a [`CoreError`] naming the offending field.

/// Actions (abilities and spells) and the ability sheet row they load from.
pub mod action;
/// Characters and the character record.
pub mod character;
/// Dice with simulated and expected rolls.
pub mod dice;
/// Fixed enumerations: abilities, damage types, skills, conditions, ...
pub mod domain;
/// Error types used throughout the crate.
pub mod error;
/// Boolean maps over a fixed domain.
pub mod flags;
/// Spell slots, limited-use charges, and their pools.
pub mod resource;
/// Boundary validation for record fields.
pub mod validate;

/// Re-export action types.
pub use action::{AbilityRecord, Action, ActionKind, Check, DamageProfile, StatusEffect};
/// Re-export character types.
pub use character::{Character, CharacterRecord, DamageModifiers, ProficiencyLevel};
/// Re-export the die type.
pub use dice::Die;
/// Re-export domain enumerations.
pub use domain::{
    Ability, ActionTime, Condition, DamageType, DomainValue, Immunity, Resistance, RollType, Skill,
};
/// Re-export error types.
pub use error::{CoreError, CoreResult};
/// Re-export the flag map.
pub use flags::FlagMap;
/// Re-export resource types.
pub use resource::{
    Charge, ChargePool, Consumable, ResourcePool, ResourceState, SpellSlot, SpellSlotPool,
};
