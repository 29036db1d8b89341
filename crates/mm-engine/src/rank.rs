//! Filtering and ranking abilities out of an outcome table.
//!
//! Filters combine as AND across categories and OR within one: an ability
//! passes an action-time selection of `[A, B]` if it takes either.

use std::collections::{BTreeMap, BTreeSet};

use mm_core::{Ability, Action, ActionTime, Check, DamageType, DomainValue, validate};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};
use crate::table::OutcomeTable;

/// Label that selects every value of a category.
pub const ALL: &str = "all";

/// Label that selects hit-roll abilities in a check filter.
pub const ARMOR_CLASS: &str = "AC";

/// Either every value or an explicit allow-set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection<T: Ord> {
    /// Everything passes, including abilities without a value.
    All,
    /// Only listed values pass. An empty set passes nothing.
    Only(BTreeSet<T>),
}

impl<T: Ord> Selection<T> {
    /// Returns true if `value` passes.
    pub fn allows(&self, value: &T) -> bool {
        match self {
            Self::All => true,
            Self::Only(set) => set.contains(value),
        }
    }

    /// Like [`Selection::allows`], but a missing value only passes `All`.
    pub fn allows_optional(&self, value: Option<&T>) -> bool {
        match (self, value) {
            (Self::All, _) => true,
            (Self::Only(set), Some(value)) => set.contains(value),
            (Self::Only(_), None) => false,
        }
    }
}

impl<T: Ord> Default for Selection<T> {
    fn default() -> Self {
        Self::All
    }
}

impl<T: Ord> FromIterator<T> for Selection<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::Only(iter.into_iter().collect())
    }
}

/// Which kind of roll an ability must make.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CheckFilter {
    /// Any roll, or none.
    #[default]
    All,
    /// Attack rolls against armor class.
    ArmorClass,
    /// Saves of one ability.
    Save(Ability),
}

impl CheckFilter {
    /// Returns true if `check` passes.
    pub fn matches(self, check: Check) -> bool {
        match self {
            Self::All => true,
            Self::ArmorClass => matches!(check, Check::Hit { .. }),
            Self::Save(ability) => check.save_ability() == Some(ability),
        }
    }

    /// Every check type a ranking is reported for: armor class, then each
    /// saving throw.
    pub fn per_defense() -> impl Iterator<Item = Self> {
        std::iter::once(Self::ArmorClass).chain(Ability::ALL.iter().copied().map(Self::Save))
    }

    /// Label naming this filter (`all`, `AC`, or an ability).
    pub fn label(self) -> &'static str {
        match self {
            Self::All => ALL,
            Self::ArmorClass => ARMOR_CLASS,
            Self::Save(ability) => ability.label(),
        }
    }
}

/// Parsed filter selection applied before ranking.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AbilityFilters {
    /// Roll kind.
    pub check: CheckFilter,
    /// Allowed action times.
    pub action_times: Selection<ActionTime>,
    /// Allowed spell levels. Mundane abilities fail an explicit selection.
    pub spell_levels: Selection<u8>,
    /// Allowed damage types. Abilities without one fail an explicit selection.
    pub damage_types: Selection<DamageType>,
}

impl AbilityFilters {
    /// Restrict to one check type.
    pub fn with_check(mut self, check: CheckFilter) -> Self {
        self.check = check;
        self
    }

    /// Returns true if `action` passes every category.
    pub fn matches(&self, action: &Action) -> bool {
        self.check.matches(action.check())
            && self.action_times.allows(&action.action_time())
            && self
                .spell_levels
                .allows_optional(action.spell_level().as_ref())
            && self
                .damage_types
                .allows_optional(action.damage_type().as_ref())
    }
}

/// One spell-level filter entry: a level or the `all` label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SpellLevelEntry {
    /// A spell level.
    Level(i64),
    /// A label; only `all` is accepted.
    Label(String),
}

/// Filter selection as submitted by a form or request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterRecord {
    /// `all`, `AC`, or an ability abbreviation.
    pub roll_filter: String,
    /// Action-time codes, or `all`.
    pub action_time_filter: Vec<String>,
    /// Spell levels, or `all`.
    pub spell_level_filter: Vec<SpellLevelEntry>,
    /// Damage type labels, or `all`.
    pub damage_type_filter: Vec<String>,
}

impl Default for FilterRecord {
    fn default() -> Self {
        Self {
            roll_filter: ALL.to_string(),
            action_time_filter: vec![ALL.to_string()],
            spell_level_filter: vec![SpellLevelEntry::Label(ALL.to_string())],
            damage_type_filter: vec![ALL.to_string()],
        }
    }
}

impl FilterRecord {
    /// Validate every entry and build the filters.
    pub fn parse(&self) -> EngineResult<AbilityFilters> {
        let check = match self.roll_filter.as_str() {
            ALL => CheckFilter::All,
            ARMOR_CLASS => CheckFilter::ArmorClass,
            other => CheckFilter::Save(validate::one_of(other).map_err(invalid)?),
        };
        Ok(AbilityFilters {
            check,
            action_times: labels(&self.action_time_filter)?,
            spell_levels: levels(&self.spell_level_filter)?,
            damage_types: labels(&self.damage_type_filter)?,
        })
    }
}

fn invalid(err: mm_core::CoreError) -> EngineError {
    EngineError::InvalidArgument(err.to_string())
}

fn labels<D: DomainValue>(entries: &[String]) -> EngineResult<Selection<D>> {
    let named: Vec<&str> = entries
        .iter()
        .map(String::as_str)
        .filter(|e| *e != ALL)
        .collect();
    // Named entries are checked even when "all" widens the selection.
    let values = validate::all_of::<D, _>(&named).map_err(invalid)?;
    if named.len() < entries.len() {
        return Ok(Selection::All);
    }
    Ok(values.into_iter().collect())
}

fn levels(entries: &[SpellLevelEntry]) -> EngineResult<Selection<u8>> {
    let mut set = BTreeSet::new();
    let mut all = false;
    for entry in entries {
        match entry {
            SpellLevelEntry::Label(label) if label == ALL => all = true,
            SpellLevelEntry::Label(label) => {
                return Err(EngineError::InvalidArgument(format!(
                    "spell level filter must be a spell level or '{ALL}', got '{label}'"
                )));
            }
            SpellLevelEntry::Level(level) => {
                set.insert(validate::spell_level(*level).map_err(invalid)?);
            }
        }
    }
    Ok(if all { Selection::All } else { Selection::Only(set) })
}

/// The `n` highest values at `check_value` among abilities passing
/// `filters`, in ascending order.
///
/// Ties keep name order. Use [`best_first`] for descending order.
pub fn rank_top_candidates(
    table: &OutcomeTable,
    abilities: &BTreeMap<String, Action>,
    check_value: i32,
    filters: &AbilityFilters,
    n: usize,
) -> EngineResult<Vec<(String, f64)>> {
    let mut candidates = Vec::new();
    for (name, value) in table.column(check_value)? {
        let action = abilities
            .get(name)
            .ok_or_else(|| mm_core::CoreError::UnknownAbility(name.to_string()))?;
        if filters.matches(action) {
            candidates.push((name.to_string(), value));
        }
    }
    candidates.sort_by(|a, b| a.1.total_cmp(&b.1));
    let skip = candidates.len().saturating_sub(n);
    Ok(candidates.split_off(skip))
}

/// Reverse an ascending ranking so the best candidate comes first.
pub fn best_first(mut ranking: Vec<(String, f64)>) -> Vec<(String, f64)> {
    ranking.reverse();
    ranking
}
