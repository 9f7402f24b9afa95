use crate::alphabet::Alphabet;
use crate::catalog::Catalog;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;
use crate::rotor::Rotor;
use crate::trace::{NoTrace, Stage, TraceSink};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// A complete rotor machine: installed rotor slots plus a plugboard.
///
/// Slot 0 holds the reflector and the last slot holds the fastest rotor.
/// Every conversion steps the rotors first, so the machine is stateful and
/// order-dependent. Configuration methods validate their whole input before
/// touching any state.
#[derive(Debug, Clone)]
pub struct Machine {
    catalog: Arc<Catalog>,
    slots: Vec<Rotor>,
    plugboard: Rotor,
}

impl Machine {
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let plugboard = Rotor::fixed(
            "Plugboard",
            Permutation::identity(catalog.alphabet().clone()),
        );
        Self {
            catalog,
            slots: Vec::new(),
            plugboard,
        }
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        self.catalog.alphabet()
    }

    pub fn num_slots(&self) -> usize {
        self.catalog.slots()
    }

    pub fn num_pawls(&self) -> usize {
        self.catalog.pawls()
    }

    /// Rotor in slot `k`, once rotors are installed.
    pub fn rotor(&self, k: usize) -> Option<&Rotor> {
        self.slots.get(k)
    }

    pub fn rotors(&self) -> &[Rotor] {
        &self.slots
    }

    pub fn plugboard(&self) -> &Permutation {
        self.plugboard.permutation()
    }

    /// Install the rotors named `names`, reflector first.
    ///
    /// Each rotor is a fresh copy of its catalog template at position 0.
    pub fn install_rotors<S: AsRef<str>>(&mut self, names: &[S]) -> Result<()> {
        if names.len() != self.num_slots() {
            return Err(EnigmaError::SettingLengthMismatch {
                expected: self.num_slots(),
                found: names.len(),
            });
        }

        let mut seen = HashSet::with_capacity(names.len());
        let mut installed = Vec::with_capacity(names.len());
        for (slot, name) in names.iter().enumerate() {
            let name = name.as_ref();
            let template = self
                .catalog
                .get(name)
                .ok_or_else(|| EnigmaError::UnknownRotor(name.to_string()))?;
            if !seen.insert(name) {
                return Err(EnigmaError::DuplicateRotor(name.to_string()));
            }
            if template.is_reflector() != (slot == 0) {
                let reason = if slot == 0 {
                    format!("slot 0 holds {} instead of a reflector", name)
                } else {
                    format!("reflector {} placed in slot {}", name, slot)
                };
                return Err(EnigmaError::MisplacedReflector(reason));
            }

            let mut rotor = template.clone();
            rotor.reset();
            installed.push(rotor);
        }

        let moving = installed.iter().filter(|r| r.can_rotate()).count();
        if moving != self.num_pawls() {
            return Err(EnigmaError::PawlCountMismatch {
                expected: self.num_pawls(),
                found: moving,
            });
        }

        let order: Vec<&str> = installed.iter().map(Rotor::name).collect();
        debug!(rotors = ?order, "installed rotors");
        self.slots = installed;
        Ok(())
    }

    /// Set window positions, one symbol per non-reflector slot, left to right.
    pub fn set_positions(&mut self, setting: &str) -> Result<()> {
        let indices = self.slot_indices(setting)?;
        for (rotor, idx) in self.slots.iter_mut().skip(1).zip(indices) {
            rotor.set_position(idx)?;
        }
        debug!(setting, "set rotor positions");
        Ok(())
    }

    /// Apply ring settings, one symbol per non-reflector slot, left to right.
    pub fn set_rings(&mut self, rings: &str) -> Result<()> {
        let indices = self.slot_indices(rings)?;
        for (rotor, idx) in self.slots.iter_mut().skip(1).zip(indices) {
            rotor.set_ring_offset(idx)?;
        }
        debug!(rings, "set ring offsets");
        Ok(())
    }

    /// Resolve a per-slot symbol string, checking shape and membership.
    fn slot_indices(&self, setting: &str) -> Result<Vec<usize>> {
        if self.slots.is_empty() {
            return Err(EnigmaError::RotorsNotInstalled);
        }
        let expected = self.num_slots() - 1;
        let found = setting.chars().count();
        if found != expected {
            return Err(EnigmaError::SettingLengthMismatch { expected, found });
        }
        let alphabet = self.alphabet();
        setting.chars().map(|c| alphabet.to_index(c)).collect()
    }

    /// Replace the plugboard wiring. It must be made of swap pairs.
    pub fn set_plugboard(&mut self, permutation: Permutation) -> Result<()> {
        if !permutation.is_involution() {
            return Err(EnigmaError::MalformedCycle(format!(
                "plugboard {} must consist of two-symbol cycles",
                permutation.cycles()
            )));
        }
        self.plugboard.set_permutation(permutation)?;
        debug!(plugboard = %self.plugboard.permutation().cycles(), "set plugboard");
        Ok(())
    }

    pub fn reset_plugboard(&mut self) {
        self.plugboard = Rotor::fixed(
            "Plugboard",
            Permutation::identity(self.alphabet().clone()),
        );
    }

    /// Window symbols of every non-reflector slot, left to right.
    pub fn positions(&self) -> String {
        let symbols = self.alphabet().symbols();
        self.slots
            .iter()
            .skip(1)
            .map(|r| symbols[r.position()])
            .collect()
    }

    /// Advance the rotors for one key press, including the double step.
    ///
    /// Notch state is sampled for every slot before anything moves. The
    /// rightmost moving rotor always advances. Any other moving rotor
    /// advances when its right neighbour was at a notch, or when it was at
    /// its own notch and the rotor to its left moves (that rotor's pawl
    /// catches the notch and pushes both).
    pub fn step(&mut self) {
        let at_notch: Vec<bool> = self.slots.iter().map(Rotor::is_at_notch).collect();
        let moving: Vec<bool> = self.slots.iter().map(Rotor::can_rotate).collect();
        let Some(rightmost) = moving.iter().rposition(|&m| m) else {
            return;
        };

        let advances: Vec<bool> = (0..self.slots.len())
            .map(|i| {
                if !moving[i] {
                    return false;
                }
                let driven_by_right = at_notch.get(i + 1).copied().unwrap_or(false);
                let double_step = i > 0 && moving[i - 1] && at_notch[i];
                i == rightmost || driven_by_right || double_step
            })
            .collect();

        for (rotor, advance) in self.slots.iter_mut().zip(advances) {
            if advance {
                rotor.advance();
            }
        }
    }

    /// Step, then convert the contact index `index`.
    pub fn convert(&mut self, index: usize) -> Result<usize> {
        self.convert_traced(index, &mut NoTrace)
    }

    /// [`convert`](Self::convert), reporting each stage to `sink`.
    pub fn convert_traced(&mut self, index: usize, sink: &mut dyn TraceSink) -> Result<usize> {
        if self.slots.is_empty() {
            return Err(EnigmaError::RotorsNotInstalled);
        }
        let alphabet = self.catalog.alphabet().clone();
        let input = alphabet.to_symbol(index)?;

        self.step();
        sink.stepped(&self.positions());
        sink.stage(Stage::Input, input);

        let mut c = self.plugboard.convert_forward(index)?;
        sink.stage(Stage::PlugboardIn, alphabet.to_symbol(c)?);

        for (slot, rotor) in self.slots.iter().enumerate().rev() {
            c = rotor.convert_forward(c)?;
            sink.stage(Stage::Forward(slot), alphabet.to_symbol(c)?);
        }
        for (slot, rotor) in self.slots.iter().enumerate().skip(1) {
            c = rotor.convert_backward(c)?;
            sink.stage(Stage::Backward(slot), alphabet.to_symbol(c)?);
        }

        c = self.plugboard.convert_forward(c)?;
        sink.stage(Stage::PlugboardOut, alphabet.to_symbol(c)?);
        sink.finished();
        Ok(c)
    }

    pub fn convert_symbol(&mut self, symbol: char) -> Result<char> {
        self.convert_symbol_traced(symbol, &mut NoTrace)
    }

    pub fn convert_symbol_traced(&mut self, symbol: char, sink: &mut dyn TraceSink) -> Result<char> {
        let alphabet = self.catalog.alphabet().clone();
        let index = alphabet.to_index(symbol)?;
        let out = self.convert_traced(index, sink)?;
        alphabet.to_symbol(out)
    }

    /// Convert every symbol of `msg` in order, threading rotor state.
    pub fn convert_message(&mut self, msg: &str) -> Result<String> {
        self.convert_message_traced(msg, &mut NoTrace)
    }

    pub fn convert_message_traced(&mut self, msg: &str, sink: &mut dyn TraceSink) -> Result<String> {
        msg.chars()
            .map(|c| self.convert_symbol_traced(c, sink))
            .collect()
    }
}
