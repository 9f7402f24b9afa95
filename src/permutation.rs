use crate::alphabet::Alphabet;
use crate::error::{EnigmaError, Result};
use std::sync::Arc;

/// A bijection over the indices of an [`Alphabet`], written in cycle notation.
///
/// `"(ABC) (DE)"` sends A→B→C→A and D↔E; every symbol outside the cycles
/// maps to itself. The forward and inverse tables are both kept so that
/// either direction is a single lookup.
#[derive(Debug, Clone)]
pub struct Permutation {
    alphabet: Arc<Alphabet>,
    forward: Vec<usize>,
    inverse: Vec<usize>,
}

impl Permutation {
    /// Parse `cycles` over `alphabet`. Whitespace is ignored.
    pub fn new(cycles: &str, alphabet: Arc<Alphabet>) -> Result<Self> {
        let size = alphabet.size();
        let mut forward: Vec<Option<usize>> = vec![None; size];

        for cycle in split_cycles(cycles)? {
            if cycle.len() < 2 {
                return Err(EnigmaError::MalformedCycle(format!(
                    "cycle ({}) needs at least two symbols",
                    cycle.iter().collect::<String>()
                )));
            }

            let mut members = Vec::with_capacity(cycle.len());
            for &ch in &cycle {
                let idx = alphabet.to_index(ch).map_err(|_| {
                    EnigmaError::MalformedCycle(format!("'{}' is not in the alphabet", ch))
                })?;
                if forward[idx].is_some() || members.contains(&idx) {
                    return Err(EnigmaError::MalformedCycle(format!(
                        "'{}' appears in more than one place",
                        ch
                    )));
                }
                members.push(idx);
            }

            for (i, &from) in members.iter().enumerate() {
                let to = members[(i + 1) % members.len()];
                forward[from] = Some(to);
            }
        }

        let forward: Vec<usize> = forward
            .into_iter()
            .enumerate()
            .map(|(i, mapped)| mapped.unwrap_or(i))
            .collect();
        let mut inverse = vec![0usize; size];
        for (from, &to) in forward.iter().enumerate() {
            inverse[to] = from;
        }

        Ok(Self {
            alphabet,
            forward,
            inverse,
        })
    }

    /// The permutation that maps every symbol to itself.
    pub fn identity(alphabet: Arc<Alphabet>) -> Self {
        let forward: Vec<usize> = (0..alphabet.size()).collect();
        Self {
            inverse: forward.clone(),
            forward,
            alphabet,
        }
    }

    pub fn alphabet(&self) -> &Arc<Alphabet> {
        &self.alphabet
    }

    pub fn size(&self) -> usize {
        self.forward.len()
    }

    /// `p` modulo `size()`, always non-negative.
    pub fn wrap(&self, p: i64) -> usize {
        p.rem_euclid(self.size() as i64) as usize
    }

    /// Apply the permutation to index `p` (taken modulo the size).
    pub fn permute(&self, p: i64) -> Result<usize> {
        let idx = self.wrap(p);
        self.forward
            .get(idx)
            .copied()
            .ok_or(EnigmaError::OutOfRange {
                index: p,
                size: self.size(),
            })
    }

    /// Apply the inverse permutation to index `c` (taken modulo the size).
    pub fn invert(&self, c: i64) -> Result<usize> {
        let idx = self.wrap(c);
        self.inverse
            .get(idx)
            .copied()
            .ok_or(EnigmaError::OutOfRange {
                index: c,
                size: self.size(),
            })
    }

    pub fn permute_symbol(&self, p: char) -> Result<char> {
        let idx = self.alphabet.to_index(p)?;
        self.alphabet.to_symbol(self.forward[idx])
    }

    pub fn invert_symbol(&self, c: char) -> Result<char> {
        let idx = self.alphabet.to_index(c)?;
        self.alphabet.to_symbol(self.inverse[idx])
    }

    /// True iff no symbol maps to itself.
    pub fn is_derangement(&self) -> bool {
        self.forward.iter().enumerate().all(|(i, &to)| i != to)
    }

    /// True iff applying the permutation twice is the identity.
    pub fn is_involution(&self) -> bool {
        self.forward
            .iter()
            .enumerate()
            .all(|(i, &to)| self.forward[to] == i)
    }

    /// Cycle notation for this permutation, fixed points omitted.
    pub fn cycles(&self) -> String {
        let symbols = self.alphabet.symbols();
        let mut seen = vec![false; self.size()];
        let mut out = Vec::new();

        for start in 0..self.size() {
            if seen[start] || self.forward[start] == start {
                seen[start] = true;
                continue;
            }
            let mut cycle = String::from("(");
            let mut current = start;
            while !seen[current] {
                seen[current] = true;
                cycle.push(symbols[current]);
                current = self.forward[current];
            }
            cycle.push(')');
            out.push(cycle);
        }

        out.join(" ")
    }
}

/// Split cycle text into its parenthesised groups.
fn split_cycles(text: &str) -> Result<Vec<Vec<char>>> {
    let mut cycles = Vec::new();
    let mut current: Option<Vec<char>> = None;

    for ch in text.chars() {
        if ch.is_whitespace() {
            continue;
        }
        match ch {
            '(' => {
                if current.is_some() {
                    return Err(EnigmaError::MalformedCycle("nested '('".into()));
                }
                current = Some(Vec::new());
            }
            ')' => match current.take() {
                Some(cycle) => cycles.push(cycle),
                None => {
                    return Err(EnigmaError::MalformedCycle("unbalanced ')'".into()));
                }
            },
            other => match current.as_mut() {
                Some(cycle) => cycle.push(other),
                None => {
                    return Err(EnigmaError::MalformedCycle(format!(
                        "'{}' outside of a cycle",
                        other
                    )));
                }
            },
        }
    }

    if current.is_some() {
        return Err(EnigmaError::MalformedCycle("unclosed '('".into()));
    }
    Ok(cycles)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn upper() -> Arc<Alphabet> {
        Arc::new(Alphabet::default())
    }

    fn abcd() -> Arc<Alphabet> {
        Arc::new(Alphabet::new("ABCD").unwrap())
    }

    #[test]
    fn test_single_cycle_forward_and_inverse() {
        let perm = Permutation::new("(ABCD)", abcd()).unwrap();
        assert_eq!(perm.permute(0).unwrap(), 1);
        assert_eq!(perm.invert(0).unwrap(), 3);
        assert_eq!(perm.permute_symbol('D').unwrap(), 'A');
        assert_eq!(perm.invert_symbol('B').unwrap(), 'A');
    }

    #[test]
    fn test_indices_wrap_before_lookup() {
        let perm = Permutation::new("(BACD)", abcd()).unwrap();
        assert_eq!(perm.invert(0).unwrap(), 1);
        assert_eq!(perm.permute(1).unwrap(), 0);
        assert_eq!(perm.invert(3).unwrap(), 2);
        assert_eq!(perm.invert(5).unwrap(), 3);
        assert_eq!(perm.invert(-1).unwrap(), 2);
    }

    #[test]
    fn test_identity_for_empty_cycles() {
        let perm = Permutation::new("", upper()).unwrap();
        for i in 0..26 {
            assert_eq!(perm.permute(i).unwrap(), i as usize);
            assert_eq!(perm.invert(i).unwrap(), i as usize);
        }
        assert!(!perm.is_derangement());
        assert_eq!(perm.cycles(), "");
    }

    #[test]
    fn test_multiple_cycles_with_whitespace() {
        let perm = Permutation::new("(HIG) ( A C T Y )\n(SU)", upper()).unwrap();
        assert_eq!(perm.invert_symbol('C').unwrap(), 'A');
        assert_eq!(perm.permute_symbol('Y').unwrap(), 'A');
        assert_eq!(perm.permute_symbol('G').unwrap(), 'H');
        assert_eq!(perm.permute_symbol('Z').unwrap(), 'Z');
    }

    #[test]
    fn test_wrap_range() {
        let perm = Permutation::identity(abcd());
        assert_eq!(perm.wrap(-1), 3);
        assert_eq!(perm.wrap(-8), 0);
        assert_eq!(perm.wrap(9), 1);
        assert_eq!(perm.wrap(i64::MIN), perm.wrap(perm.wrap(i64::MIN) as i64));
    }

    #[test]
    fn test_symbol_outside_alphabet() {
        let perm = Permutation::new("(AB)", abcd()).unwrap();
        assert!(matches!(
            perm.permute_symbol('F'),
            Err(EnigmaError::SymbolNotInAlphabet('F'))
        ));
        assert!(matches!(
            Permutation::new("(AF)", abcd()),
            Err(EnigmaError::MalformedCycle(_))
        ));
    }

    #[test]
    fn test_malformed_cycles() {
        for bad in ["(A)", "()", "(AB) (BC)", "(ABA)", "(AB", "AB)", "A(BC)", "((AB))"] {
            assert!(
                matches!(
                    Permutation::new(bad, abcd()),
                    Err(EnigmaError::MalformedCycle(_))
                ),
                "{:?} should be malformed",
                bad
            );
        }
    }

    #[test]
    fn test_derangement_and_involution() {
        let swap = Permutation::new("(AB) (CD)", abcd()).unwrap();
        assert!(swap.is_derangement());
        assert!(swap.is_involution());

        let rotate = Permutation::new("(ABCD)", abcd()).unwrap();
        assert!(rotate.is_derangement());
        assert!(!rotate.is_involution());

        let partial = Permutation::new("(AB)", abcd()).unwrap();
        assert!(!partial.is_derangement());
        assert!(partial.is_involution());
    }

    #[test]
    fn test_cycles_render_canonically() {
        let perm = Permutation::new("(DC) (BA)", abcd()).unwrap();
        assert_eq!(perm.cycles(), "(AB) (CD)");
        let again = Permutation::new(&perm.cycles(), abcd()).unwrap();
        for i in 0..4 {
            assert_eq!(again.permute(i).unwrap(), perm.permute(i).unwrap());
        }
    }
}
