use crate::error::{EnigmaError, Result};
use std::collections::HashMap;
use std::fmt;

/// Symbols that carry meaning in cycle notation and setting lines.
pub const RESERVED: [char; 3] = ['(', ')', '*'];

/// Ordered, duplicate-free set of single-character symbols.
///
/// The K-th symbol has index K. An alphabet is immutable once built and is
/// shared by `Arc` between every permutation, rotor and machine derived
/// from it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Alphabet {
    symbols: Vec<char>,
    index: HashMap<char, usize>,
}

impl Alphabet {
    /// Build an alphabet from `chars`.
    ///
    /// Fails with [`EnigmaError::InvalidAlphabet`] when `chars` is empty,
    /// contains whitespace or a reserved symbol, or repeats a symbol.
    pub fn new(chars: &str) -> Result<Self> {
        if chars.is_empty() {
            return Err(EnigmaError::InvalidAlphabet("alphabet is empty".into()));
        }

        let mut symbols = Vec::with_capacity(chars.len());
        let mut index = HashMap::with_capacity(chars.len());
        for ch in chars.chars() {
            if ch.is_whitespace() || RESERVED.contains(&ch) {
                return Err(EnigmaError::InvalidAlphabet(format!(
                    "reserved symbol {:?}",
                    ch
                )));
            }
            if index.insert(ch, symbols.len()).is_some() {
                return Err(EnigmaError::InvalidAlphabet(format!(
                    "duplicate symbol '{}'",
                    ch
                )));
            }
            symbols.push(ch);
        }

        Ok(Self { symbols, index })
    }

    pub fn size(&self) -> usize {
        self.symbols.len()
    }

    pub fn contains(&self, symbol: char) -> bool {
        self.index.contains_key(&symbol)
    }

    /// Index of `symbol`, the inverse of [`to_symbol`](Self::to_symbol).
    pub fn to_index(&self, symbol: char) -> Result<usize> {
        self.index
            .get(&symbol)
            .copied()
            .ok_or(EnigmaError::SymbolNotInAlphabet(symbol))
    }

    /// Symbol number `index`, where `0 <= index < size()`.
    pub fn to_symbol(&self, index: usize) -> Result<char> {
        self.symbols
            .get(index)
            .copied()
            .ok_or(EnigmaError::OutOfRange {
                index: index as i64,
                size: self.size(),
            })
    }

    pub fn symbols(&self) -> &[char] {
        &self.symbols
    }
}

impl Default for Alphabet {
    /// The upper-case Latin letters `A` through `Z`.
    fn default() -> Self {
        let symbols: Vec<char> = ('A'..='Z').collect();
        let index = symbols.iter().enumerate().map(|(i, &c)| (c, i)).collect();
        Self { symbols, index }
    }
}

impl fmt::Display for Alphabet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for ch in &self.symbols {
            write!(f, "{}", ch)?;
        }
        Ok(())
    }
}

impl std::str::FromStr for Alphabet {
    type Err = EnigmaError;
    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}
