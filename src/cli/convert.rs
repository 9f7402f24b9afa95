use crate::catalog::Catalog;
use crate::config::read_catalog;
use crate::error::{EnigmaError, Result};
use crate::machine::Machine;
use crate::settings::Settings;
use crate::trace::{NoTrace, TraceSink, Transcript};
use std::io::{Read, Write};
use std::path::Path;
use std::sync::Arc;
use tracing::info;

/// Options for the convert command
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Record a trace line for every converted symbol
    pub verbose: bool,
    /// Output group width; 0 disables grouping
    pub group: usize,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            group: 5,
        }
    }
}

/// Result of converting a message stream
#[derive(Debug, Clone, Default)]
pub struct ConvertReport {
    pub output: String,
    pub trace: Vec<String>,
    /// Settings lines applied
    pub sessions: usize,
    /// Symbols converted
    pub symbols: usize,
}

/// Convert a message stream.
///
/// Lines starting with `*` reconfigure the machine, blank lines are echoed,
/// and every other line is a message: whitespace is dropped, the symbols
/// are converted in order and written back in groups.
pub fn convert_text(
    catalog: Arc<Catalog>,
    input: &str,
    options: &ConvertOptions,
) -> Result<ConvertReport> {
    let mut machine = Machine::new(catalog.clone());
    let mut configured = false;
    let mut transcript = Transcript::new();
    let mut quiet = NoTrace;
    let mut report = ConvertReport::default();

    for line in input.lines() {
        if Settings::is_settings_line(line) {
            Settings::parse(line, catalog.slots())?.apply(&mut machine)?;
            configured = true;
            report.sessions += 1;
            continue;
        }

        let message: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        if message.is_empty() {
            report.output.push_str(line);
            report.output.push('\n');
            continue;
        }
        if !configured {
            return Err(EnigmaError::InvalidSetting(
                "message appears before any settings line".into(),
            ));
        }

        let sink: &mut dyn TraceSink = if options.verbose {
            &mut transcript
        } else {
            &mut quiet
        };
        let converted = machine.convert_message_traced(&message, sink)?;
        report.symbols += message.chars().count();
        report.output.push_str(&group_symbols(&converted, options.group));
        report.output.push('\n');
    }

    report.trace = transcript.drain();
    Ok(report)
}

/// Convert messages from `input` (stdin when `None`) with the catalog at
/// `config`, writing to `output` (stdout when `None`).
pub fn convert_files(
    config: &Path,
    input: Option<&Path>,
    output: Option<&Path>,
    options: &ConvertOptions,
) -> Result<ConvertReport> {
    let catalog = Arc::new(read_catalog(config)?);

    let text = match input {
        Some(path) => std::fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let report = convert_text(catalog, &text, options)?;

    match output {
        Some(path) => std::fs::write(path, &report.output)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(report.output.as_bytes())?;
            stdout.flush()?;
        }
    }

    info!(
        sessions = report.sessions,
        symbols = report.symbols,
        "conversion finished"
    );
    Ok(report)
}

/// Split `text` into space-separated groups of `width` symbols.
pub fn group_symbols(text: &str, width: usize) -> String {
    if width == 0 {
        return text.to_string();
    }
    let chars: Vec<char> = text.chars().collect();
    chars
        .chunks(width)
        .map(|chunk| chunk.iter().collect::<String>())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CatalogSpec;
    use tempfile::tempdir;

    const CONF: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ\n4 3\n\
        I MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ)\n\
        II ME (BJ) (CDKLHUP) (ESZ) (FIXVYOMW) (GR) (NT)\n\
        III MV (ABDHPEJT) (CFLVMZOYQIRWUKXSG)\n\
        B R (AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)\n";

    fn catalog() -> Arc<Catalog> {
        Arc::new(CatalogSpec::parse(CONF).unwrap().build().unwrap())
    }

    #[test]
    fn test_group_symbols() {
        assert_eq!(group_symbols("ABCDEFGHIJKL", 5), "ABCDE FGHIJ KL");
        assert_eq!(group_symbols("ABCDE", 5), "ABCDE");
        assert_eq!(group_symbols("ABC", 0), "ABC");
        assert_eq!(group_symbols("", 5), "");
    }

    #[test]
    fn test_convert_text_threads_state_across_lines() {
        let input = "* B I II III AAA\nHELLO\nWORLD\n";
        let report = convert_text(catalog(), input, &ConvertOptions::default()).unwrap();
        assert_eq!(report.output, "ILBDA\nAMTAZ\n");
        assert_eq!(report.sessions, 1);
        assert_eq!(report.symbols, 10);
        assert!(report.trace.is_empty());
    }

    #[test]
    fn test_settings_line_restarts_session() {
        let input = "* B I II III AAA\nAAAAA\n\n* B I II III AAA\nAA AAA\n";
        let report = convert_text(catalog(), input, &ConvertOptions::default()).unwrap();
        assert_eq!(report.output, "BDZGO\n\nBDZGO\n");
        assert_eq!(report.sessions, 2);
    }

    #[test]
    fn test_verbose_collects_trace() {
        let options = ConvertOptions {
            verbose: true,
            ..Default::default()
        };
        let report = convert_text(catalog(), "* B I II III AAA\nAAA\n", &options).unwrap();
        assert_eq!(report.trace.len(), 3);
        assert!(report.trace[0].starts_with("[AAB] A -> "));
        assert!(report.trace[2].starts_with("[AAD] A -> "));
    }

    #[test]
    fn test_message_before_settings_fails() {
        let result = convert_text(catalog(), "HELLO\n", &ConvertOptions::default());
        assert!(matches!(result, Err(EnigmaError::InvalidSetting(_))));
    }

    #[test]
    fn test_glued_star_is_a_bad_settings_line() {
        for input in ["*B I II III AAA\nHELLO\n", "* B I II III AAA\nHELLO\n*B I II III AAA\n"] {
            match convert_text(catalog(), input, &ConvertOptions::default()) {
                Err(EnigmaError::InvalidSetting(msg)) => {
                    assert!(msg.contains("must start with"), "{}", msg)
                }
                other => panic!("unexpected result for {:?}: {:?}", input, other.map(|r| r.output)),
            }
        }
    }

    #[test]
    fn test_symbol_outside_alphabet_fails() {
        let result = convert_text(
            catalog(),
            "* B I II III AAA\nhello\n",
            &ConvertOptions::default(),
        );
        assert!(matches!(result, Err(EnigmaError::SymbolNotInAlphabet('h'))));
    }

    #[test]
    fn test_convert_files_roundtrip() {
        let dir = tempdir().unwrap();
        let config = dir.path().join("m3.conf");
        let plain = dir.path().join("plain.in");
        let cipher = dir.path().join("cipher.out");
        let recovered = dir.path().join("recovered.out");

        std::fs::write(&config, CONF).unwrap();
        std::fs::write(&plain, "* B II I III KCU DLE (AQ) (EJ)\nATTACK AT DAWN\n").unwrap();

        let options = ConvertOptions::default();
        convert_files(&config, Some(&plain), Some(&cipher), &options).unwrap();
        let encrypted = std::fs::read_to_string(&cipher).unwrap();
        assert_ne!(encrypted, "ATTAC KATDA WN\n");

        let replay = format!("* B II I III KCU DLE (AQ) (EJ)\n{}", encrypted);
        std::fs::write(&cipher, replay).unwrap();
        convert_files(&config, Some(&cipher), Some(&recovered), &options).unwrap();
        assert_eq!(
            std::fs::read_to_string(&recovered).unwrap(),
            "ATTAC KATDA WN\n"
        );
    }
}
