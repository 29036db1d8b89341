//! Consumable resources: spell slots and limited-use charges.
//!
//! A resource is either available or used. Pools hold `n` independent
//! resources, so consuming one never changes the state of another.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult};

/// The two states a consumable resource can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResourceState {
    /// Ready to be spent.
    #[default]
    Available,
    /// Spent until the next reset.
    Used,
}

/// A single-use resource that can be spent and restored.
pub trait Consumable {
    /// Short name used in error messages (e.g. "level 3 spell slot").
    fn describe(&self) -> String;

    /// Current state.
    fn state(&self) -> ResourceState;

    /// Overwrite the current state.
    fn set_state(&mut self, state: ResourceState);

    /// Returns true if the resource can be spent.
    fn is_available(&self) -> bool {
        self.state() == ResourceState::Available
    }

    /// Spend the resource. Fails without changing state if already used.
    fn consume(&mut self) -> CoreResult<()> {
        if !self.is_available() {
            return Err(CoreError::ExhaustedResource(self.describe()));
        }
        self.set_state(ResourceState::Used);
        Ok(())
    }

    /// Make the resource available again.
    fn reset(&mut self) {
        self.set_state(ResourceState::Available);
    }
}

/// One spell slot of a fixed level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpellSlot {
    /// Spell level this slot casts at (1 or higher).
    pub level: u8,
    state: ResourceState,
}

impl SpellSlot {
    /// Create an available slot.
    pub fn new(level: u8) -> Self {
        Self {
            level,
            state: ResourceState::Available,
        }
    }
}

impl Consumable for SpellSlot {
    fn describe(&self) -> String {
        format!("level {} spell slot", self.level)
    }

    fn state(&self) -> ResourceState {
        self.state
    }

    fn set_state(&mut self, state: ResourceState) {
        self.state = state;
    }
}

/// One use of a limited-use ability (e.g. "twice per long rest").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Charge {
    /// Name of the ability this charge belongs to.
    pub ability: String,
    state: ResourceState,
}

impl Charge {
    /// Create an available charge.
    pub fn new(ability: impl Into<String>) -> Self {
        Self {
            ability: ability.into(),
            state: ResourceState::Available,
        }
    }
}

impl Consumable for Charge {
    fn describe(&self) -> String {
        format!("uses of {}", self.ability)
    }

    fn state(&self) -> ResourceState {
        self.state
    }

    fn set_state(&mut self, state: ResourceState) {
        self.state = state;
    }
}

/// An ordered collection of independent resources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool<R> {
    slots: Vec<R>,
}

/// All spell slots of one level.
pub type SpellSlotPool = ResourcePool<SpellSlot>;

/// All charges of one limited-use ability.
pub type ChargePool = ResourcePool<Charge>;

impl<R: Consumable> ResourcePool<R> {
    /// Build a pool of `n` resources, each made by a separate call to `make`.
    pub fn with_capacity(n: u32, mut make: impl FnMut() -> R) -> Self {
        Self {
            slots: (0..n).map(|_| make()).collect(),
        }
    }

    /// Total number of resources in the pool.
    pub fn capacity(&self) -> u32 {
        u32::try_from(self.slots.len()).unwrap_or(u32::MAX)
    }

    /// Number of resources still available.
    pub fn remaining(&self) -> u32 {
        u32::try_from(self.slots.iter().filter(|s| s.is_available()).count()).unwrap_or(u32::MAX)
    }

    /// Returns true if no resource is available.
    pub fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Spend one available resource.
    ///
    /// Returns `Ok(true)` if a resource was spent. When none is available,
    /// returns `Ok(false)` if `graceful`, otherwise fails with
    /// [`CoreError::ExhaustedResource`].
    pub fn consume(&mut self, graceful: bool) -> CoreResult<bool> {
        match self.slots.iter_mut().find(|s| s.is_available()) {
            Some(slot) => {
                slot.consume()?;
                tracing::debug!(resource = %slot.describe(), "consumed resource");
                Ok(true)
            }
            None if graceful => Ok(false),
            None => Err(CoreError::ExhaustedResource(self.describe_empty())),
        }
    }

    /// Make every resource in the pool available again.
    pub fn reset(&mut self) {
        for slot in &mut self.slots {
            slot.reset();
        }
    }

    /// The individual resources, in order.
    pub fn slots(&self) -> &[R] {
        &self.slots
    }

    fn describe_empty(&self) -> String {
        self.slots
            .first()
            .map(|s| s.describe())
            .unwrap_or_else(|| "resources".to_string())
    }
}

impl SpellSlotPool {
    /// Build `n` independent slots at `level`.
    pub fn spell_slots(level: u8, n: u32) -> Self {
        Self::with_capacity(n, || SpellSlot::new(level))
    }
}

impl ChargePool {
    /// Build `n` independent charges for `ability`.
    pub fn charges(ability: &str, n: u32) -> Self {
        Self::with_capacity(n, || Charge::new(ability))
    }
}

impl<R: Consumable> fmt::Display for ResourcePool<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let marks: Vec<&str> = self
            .slots
            .iter()
            .map(|s| if s.is_available() { "[ ]" } else { "[X]" })
            .collect();
        write!(f, "{}", marks.join("  "))
    }
}
