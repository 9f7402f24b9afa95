//! Observers for the signal path.
//!
//! A [`TraceSink`] is handed to [`Machine::convert_traced`](crate::Machine::convert_traced)
//! and receives one `stepped` call, a series of `stage` calls and one
//! `finished` call per converted symbol. Sinks only observe; they cannot
//! influence the result.

/// Point in the signal path at which a symbol is reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Input,
    PlugboardIn,
    /// Leaving slot `n` on the right-to-left pass
    Forward(usize),
    /// Leaving slot `n` on the left-to-right pass
    Backward(usize),
    PlugboardOut,
}

pub trait TraceSink {
    /// Window symbols of every non-reflector slot after stepping.
    fn stepped(&mut self, _positions: &str) {}

    fn stage(&mut self, _stage: Stage, _symbol: char) {}

    fn finished(&mut self) {}
}

/// Sink that ignores everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoTrace;

impl TraceSink for NoTrace {}

/// Collects one human-readable line per converted symbol.
///
/// Lines look like `[AAB] A -> A -> ... -> Q`: the window after stepping,
/// the input symbol, then the symbol after every stage in order.
#[derive(Debug, Default, Clone)]
pub struct Transcript {
    lines: Vec<String>,
    current: Vec<char>,
    window: String,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Take the collected lines, leaving the transcript empty.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.lines)
    }
}

impl TraceSink for Transcript {
    fn stepped(&mut self, positions: &str) {
        self.window = positions.to_string();
        self.current.clear();
    }

    fn stage(&mut self, _stage: Stage, symbol: char) {
        self.current.push(symbol);
    }

    fn finished(&mut self) {
        let path: Vec<String> = self.current.iter().map(|c| c.to_string()).collect();
        self.lines
            .push(format!("[{}] {}", self.window, path.join(" -> ")));
        self.current.clear();
    }
}
