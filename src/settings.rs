use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::permutation::Permutation;
use std::fmt;

/// Session settings: which rotors, where they start, rings and plugboard.
///
/// Written as `* B I II III AXL [RINGS] [(AB) (CD) ...]`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Settings {
    /// Rotor names, reflector first
    pub rotors: Vec<String>,
    /// One window symbol per non-reflector slot
    pub positions: String,
    pub rings: Option<String>,
    /// Plugboard pairs in cycle notation
    pub plugboard: Option<String>,
}

impl Settings {
    /// True if `line` starts a settings line, well formed or not.
    pub fn is_settings_line(line: &str) -> bool {
        line.trim_start().starts_with('*')
    }

    /// Parse a settings line for a machine with `slots` rotor slots.
    pub fn parse(line: &str, slots: usize) -> Result<Self> {
        let mut tokens = line.split_whitespace().peekable();
        if tokens.next() != Some("*") {
            return Err(EnigmaError::InvalidSetting(format!(
                "settings must start with '*': {}",
                line.trim()
            )));
        }

        let rotors: Vec<String> = tokens.by_ref().take(slots).map(String::from).collect();
        if rotors.len() != slots {
            return Err(EnigmaError::InvalidSetting(format!(
                "expected {} rotor names, found {}",
                slots,
                rotors.len()
            )));
        }

        let positions = tokens
            .next()
            .filter(|tok| !tok.starts_with('('))
            .ok_or_else(|| EnigmaError::InvalidSetting("missing rotor positions".into()))?
            .to_string();

        let has_rings = tokens.peek().is_some_and(|tok| !tok.starts_with('('));
        let rings = if has_rings {
            tokens.next().map(String::from)
        } else {
            None
        };

        let cycles: Vec<&str> = tokens.collect();
        if let Some(stray) = cycles.iter().find(|t| !t.starts_with('(')) {
            return Err(EnigmaError::InvalidSetting(format!(
                "unexpected token '{}'",
                stray
            )));
        }
        let plugboard = if cycles.is_empty() {
            None
        } else {
            Some(cycles.join(" "))
        };

        Ok(Self {
            rotors,
            positions,
            rings,
            plugboard,
        })
    }

    /// Configure `machine`.
    ///
    /// Rotors are installed, positions set, then rings applied (a ring
    /// offset rewrites the stored position, so it must come after), then the
    /// plugboard is replaced; without plugboard pairs it becomes the
    /// identity. On error `machine` is left exactly as it was.
    pub fn apply(&self, machine: &mut Machine) -> Result<()> {
        let mut staged = machine.clone();
        staged.install_rotors(&self.rotors)?;
        staged.set_positions(&self.positions)?;
        if let Some(rings) = &self.rings {
            staged.set_rings(rings)?;
        }
        match &self.plugboard {
            Some(cycles) => {
                let wiring = Permutation::new(cycles, staged.alphabet().clone())?;
                staged.set_plugboard(wiring)?;
            }
            None => staged.reset_plugboard(),
        }
        *machine = staged;
        Ok(())
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "* {} {}", self.rotors.join(" "), self.positions)?;
        if let Some(rings) = &self.rings {
            write!(f, " {}", rings)?;
        }
        if let Some(plugboard) = &self.plugboard {
            write!(f, " {}", plugboard)?;
        }
        Ok(())
    }
}
