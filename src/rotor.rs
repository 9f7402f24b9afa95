use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Rotor variants
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RotorKind {
    /// Slot 0 only, never moves, wiring is an involution
    Reflector,
    /// Settable position, never advances
    Fixed,
    /// Advances on stepping, has notches
    Moving,
}

impl RotorKind {
    pub fn can_rotate(self) -> bool {
        matches!(self, Self::Moving)
    }

    pub fn is_reflector(self) -> bool {
        matches!(self, Self::Reflector)
    }

    /// Single-letter tag used by the catalog text format.
    pub fn tag(self) -> char {
        match self {
            Self::Reflector => 'R',
            Self::Fixed => 'N',
            Self::Moving => 'M',
        }
    }

    pub fn from_tag(tag: char) -> Result<Self> {
        match tag {
            'R' => Ok(Self::Reflector),
            'N' => Ok(Self::Fixed),
            'M' => Ok(Self::Moving),
            other => Err(EnigmaError::UnsupportedRotorKind(other.to_string())),
        }
    }
}

impl std::str::FromStr for RotorKind {
    type Err = EnigmaError;
    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "reflector" | "r" => Ok(Self::Reflector),
            "fixed" | "n" => Ok(Self::Fixed),
            "moving" | "m" => Ok(Self::Moving),
            _ => Err(EnigmaError::UnsupportedRotorKind(s.to_string())),
        }
    }
}

impl fmt::Display for RotorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Reflector => "reflector",
            Self::Fixed => "fixed",
            Self::Moving => "moving",
        };
        f.write_str(name)
    }
}

/// A wired wheel with a rotational position.
///
/// All three variants share the same fields; [`RotorKind`] selects how
/// `advance`, `is_at_notch` and position changes behave.
#[derive(Debug, Clone)]
pub struct Rotor {
    name: String,
    kind: RotorKind,
    permutation: Permutation,
    position: usize,
    /// Notches relative to ring setting 0
    base_notches: Vec<usize>,
    /// Notches after the current ring offset
    notches: Vec<usize>,
}

impl Rotor {
    /// A reflector. Its wiring must pair symbols up.
    pub fn reflector(name: impl Into<String>, permutation: Permutation) -> Result<Self> {
        let name = name.into();
        if !permutation.is_involution() {
            return Err(EnigmaError::MalformedCycle(format!(
                "reflector {} must consist of two-symbol cycles",
                name
            )));
        }
        Ok(Self::with_kind(name, RotorKind::Reflector, permutation, Vec::new()))
    }

    pub fn fixed(name: impl Into<String>, permutation: Permutation) -> Self {
        Self::with_kind(name.into(), RotorKind::Fixed, permutation, Vec::new())
    }

    /// A moving rotor whose notches sit at the symbols in `notches`.
    pub fn moving(
        name: impl Into<String>,
        permutation: Permutation,
        notches: &str,
    ) -> Result<Self> {
        let name = name.into();
        if notches.is_empty() {
            return Err(EnigmaError::InvalidNotch {
                rotor: name,
                reason: "moving rotors need at least one notch".into(),
            });
        }

        let alphabet = permutation.alphabet();
        let mut positions = Vec::with_capacity(notches.len());
        for ch in notches.chars() {
            match alphabet.to_index(ch) {
                Ok(idx) if !positions.contains(&idx) => positions.push(idx),
                Ok(_) => {
                    return Err(EnigmaError::InvalidNotch {
                        rotor: name,
                        reason: format!("notch '{}' repeated", ch),
                    })
                }
                Err(_) => {
                    return Err(EnigmaError::InvalidNotch {
                        rotor: name,
                        reason: format!("notch '{}' is not in the alphabet", ch),
                    })
                }
            }
        }

        Ok(Self::with_kind(name, RotorKind::Moving, permutation, positions))
    }

    fn with_kind(
        name: String,
        kind: RotorKind,
        permutation: Permutation,
        notches: Vec<usize>,
    ) -> Self {
        Self {
            name,
            kind,
            permutation,
            position: 0,
            notches: notches.clone(),
            base_notches: notches,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> RotorKind {
        self.kind
    }

    pub fn can_rotate(&self) -> bool {
        self.kind.can_rotate()
    }

    pub fn is_reflector(&self) -> bool {
        self.kind.is_reflector()
    }

    pub fn permutation(&self) -> &Permutation {
        &self.permutation
    }

    /// Replace the wiring wholesale. Used for the plugboard.
    pub fn set_permutation(&mut self, permutation: Permutation) -> Result<()> {
        if permutation.size() != self.size() {
            return Err(EnigmaError::InvalidConfig(format!(
                "rotor {} expects an alphabet of {} symbols, got {}",
                self.name,
                self.size(),
                permutation.size()
            )));
        }
        self.permutation = permutation;
        Ok(())
    }

    pub fn size(&self) -> usize {
        self.permutation.size()
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// Window symbol for the current position.
    pub fn position_symbol(&self) -> Result<char> {
        self.permutation.alphabet().to_symbol(self.position)
    }

    pub fn set_position(&mut self, position: usize) -> Result<()> {
        let out_of_range = position >= self.size();
        if out_of_range || (self.is_reflector() && position != 0) {
            return Err(EnigmaError::PositionOutOfRange {
                rotor: self.name.clone(),
                position,
            });
        }
        self.position = position;
        Ok(())
    }

    pub fn set_position_symbol(&mut self, symbol: char) -> Result<()> {
        let position = self.permutation.alphabet().to_index(symbol)?;
        self.set_position(position)
    }

    /// Shift the position and notches by `-ring`.
    ///
    /// A reflector accepts the call but stays at position 0.
    pub fn set_ring_offset(&mut self, ring: usize) -> Result<()> {
        if ring >= self.size() {
            return Err(EnigmaError::PositionOutOfRange {
                rotor: self.name.clone(),
                position: ring,
            });
        }
        if self.is_reflector() {
            return Ok(());
        }

        let shift = -(ring as i64);
        self.position = self.permutation.wrap(self.position as i64 + shift);
        self.notches = self
            .base_notches
            .iter()
            .map(|&n| self.permutation.wrap(n as i64 + shift))
            .collect();
        Ok(())
    }

    pub fn reset(&mut self) {
        self.position = 0;
        self.notches = self.base_notches.clone();
    }

    pub fn advance(&mut self) {
        if self.can_rotate() {
            self.position = self.permutation.wrap(self.position as i64 + 1);
        }
    }

    pub fn is_at_notch(&self) -> bool {
        self.can_rotate() && self.notches.contains(&self.position)
    }

    /// Ring-adjusted notch positions as symbols.
    pub fn notches(&self) -> String {
        self.symbols_of(&self.notches)
    }

    /// Notch symbols at ring setting 0.
    pub fn base_notches(&self) -> String {
        self.symbols_of(&self.base_notches)
    }

    fn symbols_of(&self, positions: &[usize]) -> String {
        let symbols = self.permutation.alphabet().symbols();
        positions.iter().map(|&n| symbols[n]).collect()
    }

    /// Pass a contact index right-to-left through the wiring.
    pub fn convert_forward(&self, p: usize) -> Result<usize> {
        let offset = self.position as i64;
        let out = self.permutation.permute(p as i64 + offset)?;
        Ok(self.permutation.wrap(out as i64 - offset))
    }

    /// Pass a contact index left-to-right through the inverse wiring.
    pub fn convert_backward(&self, e: usize) -> Result<usize> {
        let offset = self.position as i64;
        let out = self.permutation.invert(e as i64 + offset)?;
        Ok(self.permutation.wrap(out as i64 - offset))
    }
}

impl fmt::Display for Rotor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Rotor {}", self.name)
    }
}
