//! Dice and rolling.
//!
//! A [`Die`] either produces a uniform random draw (when handed an RNG) or
//! its closed-form expectation. Every damage formula goes through
//! [`Die::roll`], so the same code path serves Monte-Carlo estimates and
//! analytic expectations.

use rand::Rng;
use rand::rngs::StdRng;
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// A die with a fixed number of sides (at least one).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u32", into = "u32")]
pub struct Die {
    sides: u32,
}

impl Die {
    /// Four-sided die.
    pub const D4: Self = Self { sides: 4 };
    /// Six-sided die.
    pub const D6: Self = Self { sides: 6 };
    /// Eight-sided die.
    pub const D8: Self = Self { sides: 8 };
    /// Ten-sided die.
    pub const D10: Self = Self { sides: 10 };
    /// Twelve-sided die.
    pub const D12: Self = Self { sides: 12 };
    /// Twenty-sided die.
    pub const D20: Self = Self { sides: 20 };
    /// Percentile die (1-100).
    pub const D100: Self = Self { sides: 100 };

    /// Create a die with the given number of sides.
    pub fn new(sides: u32) -> CoreResult<Self> {
        if sides == 0 {
            return Err(CoreError::InvalidDie(0));
        }
        Ok(Self { sides })
    }

    /// Create a die from a record field, rejecting zero and negative sizes.
    pub fn from_record(sides: i64) -> CoreResult<Self> {
        let sides = u32::try_from(sides).map_err(|_| CoreError::InvalidDie(sides))?;
        Self::new(sides)
    }

    /// Returns the number of sides on this die.
    pub fn sides(self) -> u32 {
        self.sides
    }

    /// Mean of a single roll: `(sides + 1) / 2`.
    pub fn expected_value(self) -> f64 {
        (f64::from(self.sides) + 1.0) / 2.0
    }

    /// Variance of a single roll: `(sides - 1)² / 12`.
    pub fn variance(self) -> f64 {
        let span = f64::from(self.sides) - 1.0;
        span * span / 12.0
    }

    /// Roll once. With an RNG the result is uniform in `[1, sides]`;
    /// without one it is [`Die::expected_value`].
    pub fn roll(self, rng: Option<&mut StdRng>) -> f64 {
        match rng {
            Some(rng) => f64::from(rng.random_range(1..=self.sides)),
            None => self.expected_value(),
        }
    }

    /// Parse a die from a string like "d20", "d6", "d100".
    pub fn from_str_tag(s: &str) -> Option<Self> {
        let s = s.trim().to_lowercase();
        let sides = s.strip_prefix('d')?.parse::<u32>().ok()?;
        Self::new(sides).ok()
    }
}

impl TryFrom<u32> for Die {
    type Error = CoreError;

    fn try_from(sides: u32) -> CoreResult<Self> {
        Self::new(sides)
    }
}

impl From<Die> for u32 {
    fn from(die: Die) -> Self {
        die.sides
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "d{}", self.sides)
    }
}
