//! Engine configuration.
//!
//! Every field has a default, so an empty JSON object is a valid config.

use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Tunable constants and the rolling mode.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Exponent applied to the spell-slot scarcity ratio.
    pub scarcity_coefficient: f64,
    /// Lowest defense value swept by an outcome table.
    pub defense_min: i32,
    /// Highest defense value swept by an outcome table.
    pub defense_max: i32,
    /// Roll dice instead of using their expectations.
    pub simulated: bool,
    /// Seed for simulated rolls. `None` seeds from the OS.
    pub seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            scarcity_coefficient: 0.45,
            defense_min: -30,
            defense_max: 30,
            simulated: false,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> EngineResult<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| EngineError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Check the coefficient is finite and non-negative and the defense
    /// range is not empty.
    pub fn validate(&self) -> EngineResult<()> {
        if !self.scarcity_coefficient.is_finite() || self.scarcity_coefficient < 0.0 {
            return Err(EngineError::InvalidConfig(format!(
                "scarcity_coefficient must be a finite non-negative number, got {}",
                self.scarcity_coefficient
            )));
        }
        if self.defense_min > self.defense_max {
            return Err(EngineError::InvalidConfig(format!(
                "defense_min ({}) exceeds defense_max ({})",
                self.defense_min, self.defense_max
            )));
        }
        Ok(())
    }

    /// Every defense value an outcome table covers, lowest first.
    pub fn defense_range(&self) -> std::ops::RangeInclusive<i32> {
        self.defense_min..=self.defense_max
    }

    /// The random source for this config: `None` in expectation mode.
    pub fn rng(&self) -> Option<StdRng> {
        if !self.simulated {
            return None;
        }
        Some(match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mm_core::Die;

    #[test]
    fn defaults_from_empty_json() {
        let config = EngineConfig::from_json("{}").unwrap();
        assert_eq!(config, EngineConfig::default());
        assert!((config.scarcity_coefficient - 0.45).abs() < f64::EPSILON);
        assert_eq!(config.defense_range().count(), 61);
        assert!(config.rng().is_none());
    }

    #[test]
    fn partial_override() {
        let config =
            EngineConfig::from_json(r#"{"defense_min": 0, "defense_max": 25, "seed": 7}"#)
                .unwrap();
        assert_eq!(config.defense_range(), 0..=25);
        assert_eq!(config.seed, Some(7));
        assert!(!config.simulated);
    }

    #[test]
    fn rejects_bad_values() {
        assert!(matches!(
            EngineConfig::from_json(r#"{"scarcity_coefficient": -1.0}"#),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::from_json(r#"{"defense_min": 5, "defense_max": 4}"#),
            Err(EngineError::InvalidConfig(_))
        ));
        assert!(matches!(
            EngineConfig::from_json("not json"),
            Err(EngineError::InvalidConfig(_))
        ));
    }

    #[test]
    fn seeded_rng_repeats() {
        let config = EngineConfig {
            simulated: true,
            seed: Some(42),
            ..EngineConfig::default()
        };
        let mut a = config.rng().unwrap();
        let mut b = config.rng().unwrap();
        for _ in 0..10 {
            assert_eq!(Die::D20.roll(Some(&mut a)), Die::D20.roll(Some(&mut b)));
        }
    }
}
