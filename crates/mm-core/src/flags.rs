//! Boolean maps over a fixed domain.
//!
//! Resistances, vulnerabilities, immunities, conditions, and saving-throw
//! proficiencies are all "every domain value is a key, each key is on or
//! off". A [`FlagMap`] keeps every key present and refuses keys outside its
//! domain.

use std::collections::BTreeMap;

use crate::domain::DomainValue;
use crate::error::{CoreError, CoreResult};

/// A boolean map whose key set is fixed at construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlagMap<D: DomainValue> {
    flags: BTreeMap<D, bool>,
}

impl<D: DomainValue> FlagMap<D> {
    /// Create a map over `domain` with every flag off.
    pub fn new(domain: impl IntoIterator<Item = D>) -> Self {
        Self {
            flags: domain.into_iter().map(|key| (key, false)).collect(),
        }
    }

    /// Create a map over the full domain of `D` with every flag off.
    pub fn full() -> Self {
        Self::new(D::domain().iter().copied())
    }

    /// Create a map over `domain` and switch on every listed label.
    pub fn from_labels<S: AsRef<str>>(
        domain: impl IntoIterator<Item = D>,
        labels: &[S],
    ) -> CoreResult<Self> {
        let mut map = Self::new(domain);
        for label in labels {
            let key = D::parse(label.as_ref())?;
            map.set(key, true)?;
        }
        Ok(map)
    }

    /// Whether `key` is switched on. Keys outside the domain are off.
    pub fn get(&self, key: D) -> bool {
        self.flags.get(&key).copied().unwrap_or(false)
    }

    /// Whether `key` belongs to this map's domain.
    pub fn contains_key(&self, key: D) -> bool {
        self.flags.contains_key(&key)
    }

    /// Switch `key` on or off.
    pub fn set(&mut self, key: D, value: bool) -> CoreResult<()> {
        match self.flags.get_mut(&key) {
            Some(flag) => {
                *flag = value;
                Ok(())
            }
            None => Err(CoreError::DomainValue {
                field: D::FIELD,
                value: key.label().to_string(),
                accepted: self.flags.keys().map(|k| k.label()).collect(),
            }),
        }
    }

    /// Keys that are switched on, in domain order.
    pub fn active(&self) -> impl Iterator<Item = D> + '_ {
        self.flags.iter().filter(|(_, on)| **on).map(|(k, _)| *k)
    }

    /// Every key with its state, in domain order.
    pub fn iter(&self) -> impl Iterator<Item = (D, bool)> + '_ {
        self.flags.iter().map(|(k, v)| (*k, *v))
    }
}
