//! Outcome tables: one statistic for every ability at every defense value.

use std::collections::BTreeMap;

use rand::rngs::StdRng;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::stat::{Matchup, Statistic, compute_stat};

/// A statistic swept over every defense value in a fixed range.
///
/// Tables are built whole by [`build_outcome_table`] and never patched.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutcomeTable {
    statistic: Statistic,
    defense_min: i32,
    defense_max: i32,
    rows: BTreeMap<String, Vec<f64>>,
}

impl OutcomeTable {
    /// The statistic in every cell.
    pub fn statistic(&self) -> Statistic {
        self.statistic
    }

    /// Defense values covered, lowest first.
    pub fn defense_range(&self) -> std::ops::RangeInclusive<i32> {
        self.defense_min..=self.defense_max
    }

    /// Ability names with a row, in name order.
    pub fn abilities(&self) -> impl Iterator<Item = &str> {
        self.rows.keys().map(String::as_str)
    }

    /// Number of abilities in the table.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns true if the table has no abilities.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Every value for one ability, lowest defense first.
    pub fn row(&self, ability: &str) -> Option<&[f64]> {
        self.rows.get(ability).map(Vec::as_slice)
    }

    /// The value for `ability` at `defense`.
    pub fn get(&self, ability: &str, defense: i32) -> EngineResult<f64> {
        let index = self.index(defense)?;
        let row = self
            .rows
            .get(ability)
            .ok_or_else(|| mm_core::CoreError::UnknownAbility(ability.to_string()))?;
        row.get(index).copied().ok_or(EngineError::DefenseOutOfRange {
            value: defense,
            min: self.defense_min,
            max: self.defense_max,
        })
    }

    /// Every ability's value at `defense`, in name order.
    pub fn column(&self, defense: i32) -> EngineResult<Vec<(&str, f64)>> {
        let index = self.index(defense)?;
        Ok(self
            .rows
            .iter()
            .filter_map(|(name, row)| row.get(index).map(|value| (name.as_str(), *value)))
            .collect())
    }

    fn index(&self, defense: i32) -> EngineResult<usize> {
        if !self.defense_range().contains(&defense) {
            return Err(EngineError::DefenseOutOfRange {
                value: defense,
                min: self.defense_min,
                max: self.defense_max,
            });
        }
        usize::try_from(i64::from(defense) - i64::from(self.defense_min))
            .map_err(|_| EngineError::InvalidArgument(format!("defense value {defense}")))
    }
}

/// Compute `statistic` for every ability the actor has at every defense
/// value in the configured range.
///
/// The defense value overrides the target's armor class or saving throw.
/// The first failing cell aborts the build.
pub fn build_outcome_table(
    matchup: Matchup<'_>,
    statistic: Statistic,
    config: &EngineConfig,
    mut rng: Option<&mut StdRng>,
) -> EngineResult<OutcomeTable> {
    config.validate()?;
    let mut rows = BTreeMap::new();
    for (name, action) in matchup.actor.abilities() {
        let row = config
            .defense_range()
            .map(|defense| {
                compute_stat(
                    action,
                    matchup,
                    statistic,
                    Some(defense),
                    config,
                    rng.as_deref_mut(),
                )
            })
            .collect::<EngineResult<Vec<_>>>()?;
        rows.insert(name.clone(), row);
    }
    tracing::debug!(
        %statistic,
        actor = matchup.actor.name(),
        target = matchup.target.name(),
        abilities = rows.len(),
        "built outcome table"
    );
    Ok(OutcomeTable {
        statistic,
        defense_min: config.defense_min,
        defense_max: config.defense_max,
        rows,
    })
}
