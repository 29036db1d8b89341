//! A working session: one acting character, one target, and the outcome
//! tables computed between them.
//!
//! Tables are rebuilt whole whenever the actor, the target, or the actor's
//! resources change. A failed rebuild leaves no tables behind.

use std::collections::BTreeMap;

use mm_core::Character;
use serde::Serialize;

use crate::config::EngineConfig;
use crate::error::{EngineError, EngineResult};
use crate::rank::{AbilityFilters, CheckFilter, best_first, rank_top_candidates};
use crate::stat::{Matchup, Statistic, compute_stat};
use crate::table::{OutcomeTable, build_outcome_table};

/// Best candidates for one statistic against one defense.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CandidateReport {
    /// The statistic ranked.
    pub statistic: Statistic,
    /// `AC` or the saving throw the candidates roll against.
    pub check: &'static str,
    /// The target's actual defense value used as the check value.
    pub check_value: i32,
    /// Ability name and value, best first.
    pub ranking: Vec<(String, f64)>,
}

/// Actor, target, and the three outcome tables between them.
#[derive(Debug, Clone)]
pub struct Session {
    config: EngineConfig,
    actor: Option<Character>,
    target: Option<Character>,
    tables: Option<BTreeMap<Statistic, OutcomeTable>>,
    filters: AbilityFilters,
}

impl Session {
    /// Start an empty session.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self {
            config,
            actor: None,
            target: None,
            tables: None,
            filters: AbilityFilters::default(),
        })
    }

    /// The engine configuration.
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// The acting character, if selected.
    pub fn actor(&self) -> Option<&Character> {
        self.actor.as_ref()
    }

    /// The target, if selected.
    pub fn target(&self) -> Option<&Character> {
        self.target.as_ref()
    }

    /// Make `actor` the acting character and rebuild.
    pub fn select_actor(&mut self, actor: Character) -> EngineResult<()> {
        tracing::info!(actor = actor.name(), "selected actor");
        self.actor = Some(actor);
        self.rebuild()
    }

    /// Make `target` the target and rebuild.
    pub fn set_target(&mut self, target: Character) -> EngineResult<()> {
        tracing::info!(target = target.name(), "selected target");
        self.target = Some(target);
        self.rebuild()
    }

    /// Drop the acting character and its tables.
    pub fn clear_actor(&mut self) -> Option<Character> {
        tracing::info!("cleared actor");
        self.tables = None;
        self.actor.take()
    }

    /// Drop the target and the tables.
    pub fn clear_target(&mut self) -> Option<Character> {
        tracing::info!("cleared target");
        self.tables = None;
        self.target.take()
    }

    /// The three outcome tables, present only while both actor and target
    /// are selected and the last rebuild succeeded.
    pub fn tables(&self) -> Option<&BTreeMap<Statistic, OutcomeTable>> {
        self.tables.as_ref()
    }

    /// One outcome table.
    pub fn table(&self, statistic: Statistic) -> EngineResult<&OutcomeTable> {
        self.tables
            .as_ref()
            .and_then(|tables| tables.get(&statistic))
            .ok_or(EngineError::NoSession("outcome table"))
    }

    /// Spend the resources `ability` needs and rebuild.
    ///
    /// See [`Character::expend`] for the `graceful` contract.
    pub fn expend(&mut self, ability: &str, graceful: bool) -> EngineResult<bool> {
        let actor = self.actor.as_mut().ok_or(EngineError::NoSession("actor"))?;
        let spent = actor.expend(ability, graceful)?;
        if spent {
            tracing::info!(actor = actor.name(), ability, "expended");
            self.rebuild()?;
        }
        Ok(spent)
    }

    /// Restore every resource of the acting character and rebuild.
    pub fn long_rest(&mut self) -> EngineResult<()> {
        let actor = self.actor.as_mut().ok_or(EngineError::NoSession("actor"))?;
        actor.long_rest();
        tracing::info!(actor = actor.name(), "long rest");
        self.rebuild()
    }

    /// Store the filters [`Session::top_candidates_default`] uses.
    pub fn set_filters(&mut self, filters: AbilityFilters) {
        self.filters = filters;
    }

    /// The stored filters.
    pub fn filters(&self) -> &AbilityFilters {
        &self.filters
    }

    /// For every statistic and every defense (armor class, then each
    /// saving throw), the best `n` abilities at the target's actual value.
    ///
    /// The check category of `filters` is replaced per defense.
    pub fn top_candidates(
        &self,
        filters: &AbilityFilters,
        n: usize,
    ) -> EngineResult<Vec<CandidateReport>> {
        let actor = self.actor.as_ref().ok_or(EngineError::NoSession("actor"))?;
        let target = self.target.as_ref().ok_or(EngineError::NoSession("target"))?;
        let mut reports = Vec::new();
        for statistic in Statistic::ALL {
            let table = self.table(statistic)?;
            for check in CheckFilter::per_defense() {
                let check_value = match check {
                    CheckFilter::Save(ability) => target.saving_throw(ability),
                    CheckFilter::All | CheckFilter::ArmorClass => target.armor_class(),
                };
                let filters = filters.clone().with_check(check);
                let ranking =
                    rank_top_candidates(table, actor.abilities(), check_value, &filters, n)?;
                reports.push(CandidateReport {
                    statistic,
                    check: check.label(),
                    check_value,
                    ranking: best_first(ranking),
                });
            }
        }
        Ok(reports)
    }

    /// [`Session::top_candidates`] with the stored filters.
    pub fn top_candidates_default(&self, n: usize) -> EngineResult<Vec<CandidateReport>> {
        self.top_candidates(&self.filters, n)
    }

    /// Compute `statistic` for one of the actor's abilities against the
    /// target's actual defenses.
    pub fn evaluate(&self, ability: &str, statistic: Statistic) -> EngineResult<f64> {
        let actor = self.actor.as_ref().ok_or(EngineError::NoSession("actor"))?;
        let target = self.target.as_ref().ok_or(EngineError::NoSession("target"))?;
        let action = actor.ability(ability)?;
        let mut rng = self.config.rng();
        compute_stat(
            action,
            Matchup::new(actor, target),
            statistic,
            None,
            &self.config,
            rng.as_mut(),
        )
    }

    fn rebuild(&mut self) -> EngineResult<()> {
        self.tables = None;
        let (Some(actor), Some(target)) = (&self.actor, &self.target) else {
            return Ok(());
        };
        let matchup = Matchup::new(actor, target);
        let mut rng = self.config.rng();
        let built = Statistic::ALL
            .into_iter()
            .map(|statistic| {
                build_outcome_table(matchup, statistic, &self.config, rng.as_mut())
                    .map(|table| (statistic, table))
            })
            .collect::<EngineResult<BTreeMap<_, _>>>();
        match built {
            Ok(tables) => {
                tracing::info!(
                    actor = actor.name(),
                    target = target.name(),
                    "rebuilt outcome tables"
                );
                self.tables = Some(tables);
                Ok(())
            }
            Err(err) => {
                tracing::warn!(error = %err, "outcome table rebuild failed");
                Err(err)
            }
        }
    }
}
