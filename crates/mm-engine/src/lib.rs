//! Combat statistics engine for minmax.
//!
//! Turns characters and their abilities into numbers: the chance an ability
//! lands, the damage it is expected to deal, and an action economy score
//! that weighs both against turn time and spell-slot scarcity. Outcome
//! tables sweep those statistics over every defense value, and the ranker
//! picks the best abilities out of a table under user-selected filters.
//! A [`Session`] ties an actor, a target, and their tables together.

pub mod config;
pub mod damage;
pub mod economy;
pub mod error;
pub mod probability;
pub mod rank;
pub mod session;
pub mod stat;
pub mod table;

pub use config::EngineConfig;
pub use error::{EngineError, EngineResult};
pub use rank::{
    AbilityFilters, CheckFilter, FilterRecord, Selection, SpellLevelEntry, best_first,
    rank_top_candidates,
};
pub use session::{CandidateReport, Session};
pub use stat::{Matchup, Statistic, compute_stat};
pub use table::{OutcomeTable, build_outcome_table};
