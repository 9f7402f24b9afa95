use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use crate::rotor::Rotor;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Machine geometry plus the rotors available to install.
///
/// A catalog is immutable once built and is meant to be shared through an
/// `Arc`. Machines clone the templates they install, so a catalog never
/// holds live rotor state.
#[derive(Debug, Clone)]
pub struct Catalog {
    alphabet: Arc<Alphabet>,
    slots: usize,
    pawls: usize,
    rotors: BTreeMap<String, Rotor>,
}

impl Catalog {
    /// Create an empty catalog for machines with `slots` rotor slots, `pawls`
    /// of which hold moving rotors.
    pub fn new(alphabet: Arc<Alphabet>, slots: usize, pawls: usize) -> Result<Self> {
        if slots < 2 {
            return Err(EnigmaError::InvalidConfig(format!(
                "a machine needs at least 2 rotor slots, got {}",
                slots
            )));
        }
        if pawls >= slots {
            return Err(EnigmaError::InvalidConfig(format!(
                "{} pawls leave no slot for the reflector in a {}-slot machine",
                pawls, slots
            )));
        }
        Ok(Self {
            alphabet,
            slots,
            pawls,
            rotors: BTreeMap::new(),
        })
    }

    /// Register a rotor template. Names must be unique.
    pub fn add(&mut self, rotor: Rotor) -> Result<()> {
        if rotor.permutation().alphabet().as_ref() != self.alphabet.as_ref() {
            return Err(EnigmaError::InvalidConfig(format!(
                "rotor {} uses a different alphabet",
                rotor.name()
            )));
        }
        if self.rotors.contains_key(rotor.name()) {
            return Err(EnigmaError::DuplicateRotor(rotor.name().to_string()));
        }
        self.rotors.insert(rotor.name().to_string(), rotor);
        Ok(())
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    pub fn slots(&self) -> usize {
        self.slots
    }

    pub fn pawls(&self) -> usize {
        self.pawls
    }

    pub fn get(&self, name: &str) -> Option<&Rotor> {
        self.rotors.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rotors.contains_key(name)
    }

    /// Rotor templates in name order.
    pub fn rotors(&self) -> impl Iterator<Item = &Rotor> {
        self.rotors.values()
    }

    pub fn len(&self) -> usize {
        self.rotors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rotors.is_empty()
    }
}
