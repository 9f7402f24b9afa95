use crate::alphabet::Alphabet;
use crate::catalog::Catalog;
use crate::error::{EnigmaError, Result};
use crate::permutation::Permutation;
use crate::rotor::{Rotor, RotorKind};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::Arc;
use tracing::debug;

/// One catalog entry: `(name, kind, notches, cycles)`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RotorSpec {
    pub name: String,
    pub kind: RotorKind,
    /// Notch symbols, moving rotors only
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub notches: String,
    /// Wiring in cycle notation
    #[serde(default)]
    pub cycles: String,
}

impl RotorSpec {
    pub fn build(&self, alphabet: &Arc<Alphabet>) -> Result<Rotor> {
        if !self.kind.can_rotate() && !self.notches.is_empty() {
            return Err(EnigmaError::InvalidNotch {
                rotor: self.name.clone(),
                reason: format!("{} rotors have no notches", self.kind),
            });
        }
        let permutation = Permutation::new(&self.cycles, alphabet.clone())?;
        match self.kind {
            RotorKind::Reflector => Rotor::reflector(&self.name, permutation),
            RotorKind::Fixed => Ok(Rotor::fixed(&self.name, permutation)),
            RotorKind::Moving => Rotor::moving(&self.name, permutation, &self.notches),
        }
    }

    fn from_rotor(rotor: &Rotor) -> Self {
        Self {
            name: rotor.name().to_string(),
            kind: rotor.kind(),
            notches: rotor.base_notches(),
            cycles: rotor.permutation().cycles(),
        }
    }
}

/// Serializable description of a [`Catalog`].
///
/// Text layout:
///
/// ```text
/// ABCDEFGHIJKLMNOPQRSTUVWXYZ
/// 4 3
/// I MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ)
/// B R (AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)
/// ```
///
/// The alphabet, then slot and pawl counts, then one entry per rotor: a
/// name, a kind tag (`M` followed by notches, `N`, or `R`) and the wiring
/// cycles, which may continue on the following lines.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogSpec {
    pub alphabet: String,
    pub slots: usize,
    pub pawls: usize,
    pub rotors: Vec<RotorSpec>,
}

impl CatalogSpec {
    /// Parse the text layout.
    pub fn parse(text: &str) -> Result<Self> {
        let mut lines = text.lines().filter(|l| !l.trim().is_empty());

        let alphabet = lines
            .next()
            .ok_or_else(|| EnigmaError::InvalidConfig("configuration file is empty".into()))?
            .trim()
            .to_string();

        let counts: Vec<&str> = lines
            .next()
            .ok_or_else(|| EnigmaError::InvalidConfig("missing slot and pawl counts".into()))?
            .split_whitespace()
            .collect();
        let (slots, pawls) = match counts.as_slice() {
            [slots, pawls] => (parse_count(slots)?, parse_count(pawls)?),
            _ => {
                return Err(EnigmaError::InvalidConfig(format!(
                    "expected slot and pawl counts, got {:?}",
                    counts.join(" ")
                )))
            }
        };

        let tokens: Vec<&str> = lines.flat_map(str::split_whitespace).collect();
        let mut rotors = Vec::new();
        let mut i = 0;
        while i < tokens.len() {
            let name = tokens[i];
            if name.starts_with('(') {
                return Err(EnigmaError::InvalidConfig(format!(
                    "expected a rotor name, found {}",
                    name
                )));
            }
            let tag = tokens.get(i + 1).ok_or_else(|| {
                EnigmaError::InvalidConfig(format!("rotor {} is missing its kind", name))
            })?;
            i += 2;

            let mut chars = tag.chars();
            let kind = match chars.next() {
                Some(c) => RotorKind::from_tag(c)?,
                None => return Err(EnigmaError::UnsupportedRotorKind(tag.to_string())),
            };
            let notches: String = chars.collect();

            let mut cycles = Vec::new();
            while i < tokens.len() && tokens[i].starts_with('(') {
                cycles.push(tokens[i]);
                i += 1;
            }

            rotors.push(RotorSpec {
                name: name.to_string(),
                kind,
                notches,
                cycles: cycles.join(" "),
            });
        }

        Ok(Self {
            alphabet,
            slots,
            pawls,
            rotors,
        })
    }

    /// Render the text layout accepted by [`parse`](Self::parse).
    pub fn to_text(&self) -> String {
        let mut out = format!("{}\n{} {}\n", self.alphabet, self.slots, self.pawls);
        for rotor in &self.rotors {
            out.push_str(&format!(
                "{} {}{} {}\n",
                rotor.name,
                rotor.kind.tag(),
                rotor.notches,
                rotor.cycles
            ));
        }
        out
    }

    /// Build the catalog, validating every rotor.
    pub fn build(&self) -> Result<Catalog> {
        let alphabet = Arc::new(Alphabet::new(&self.alphabet)?);
        let mut catalog = Catalog::new(alphabet.clone(), self.slots, self.pawls)?;
        for spec in &self.rotors {
            catalog.add(spec.build(&alphabet)?)?;
        }
        if catalog.is_empty() {
            return Err(EnigmaError::InvalidConfig("no rotors defined".into()));
        }
        debug!(
            rotors = catalog.len(),
            slots = catalog.slots(),
            pawls = catalog.pawls(),
            "built rotor catalog"
        );
        Ok(catalog)
    }

    pub fn from_catalog(catalog: &Catalog) -> Self {
        Self {
            alphabet: catalog.alphabet().to_string(),
            slots: catalog.slots(),
            pawls: catalog.pawls(),
            rotors: catalog.rotors().map(RotorSpec::from_rotor).collect(),
        }
    }
}

impl std::str::FromStr for CatalogSpec {
    type Err = EnigmaError;
    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

fn parse_count(token: &str) -> Result<usize> {
    token
        .parse()
        .map_err(|_| EnigmaError::InvalidConfig(format!("'{}' is not a count", token)))
}

/// Read a catalog spec from `path`, in JSON or the text layout.
///
/// JSON is recognised by a `.json` extension or a leading `{`.
pub fn read_catalog_spec(path: &Path) -> Result<CatalogSpec> {
    let text = std::fs::read_to_string(path)?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"))
        || text.trim_start().starts_with('{');
    if is_json {
        Ok(serde_json::from_str(&text)?)
    } else {
        CatalogSpec::parse(&text)
    }
}

/// Read and build the catalog stored at `path`.
pub fn read_catalog(path: &Path) -> Result<Catalog> {
    read_catalog_spec(path)?.build()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const SMALL: &str = "ABCD\n3 1\nR R (AB) (CD)\nF N (ABC)\nM MC (AD)\n  (BC)\n";

    #[test]
    fn test_parse_text_layout() {
        let spec = CatalogSpec::parse(SMALL).unwrap();
        assert_eq!(spec.alphabet, "ABCD");
        assert_eq!((spec.slots, spec.pawls), (3, 1));
        assert_eq!(spec.rotors.len(), 3);
        assert_eq!(spec.rotors[2].kind, RotorKind::Moving);
        assert_eq!(spec.rotors[2].notches, "C");
        assert_eq!(spec.rotors[2].cycles, "(AD) (BC)");

        let catalog = spec.build().unwrap();
        assert_eq!(catalog.len(), 3);
        assert!(catalog.get("R").unwrap().is_reflector());
    }

    #[test]
    fn test_text_layout_roundtrips_through_catalog() {
        let catalog = CatalogSpec::parse(SMALL).unwrap().build().unwrap();
        let spec = CatalogSpec::from_catalog(&catalog);
        let reparsed = CatalogSpec::parse(&spec.to_text()).unwrap();
        assert_eq!(reparsed, spec);
    }

    #[test]
    fn test_parse_errors() {
        assert!(matches!(
            CatalogSpec::parse(""),
            Err(EnigmaError::InvalidConfig(_))
        ));
        assert!(matches!(
            CatalogSpec::parse("ABCD\n3\n"),
            Err(EnigmaError::InvalidConfig(_))
        ));
        assert!(matches!(
            CatalogSpec::parse("ABCD\n3 x\n"),
            Err(EnigmaError::InvalidConfig(_))
        ));
        assert!(matches!(
            CatalogSpec::parse("ABCD\n3 1\nR"),
            Err(EnigmaError::InvalidConfig(_))
        ));
        assert!(matches!(
            CatalogSpec::parse("ABCD\n3 1\nR X (AB)"),
            Err(EnigmaError::UnsupportedRotorKind(_))
        ));
    }

    #[test]
    fn test_build_errors() {
        let dup = CatalogSpec::parse("ABCD\n3 1\nR R (AB)\nR N (AB)\n").unwrap();
        assert!(matches!(dup.build(), Err(EnigmaError::DuplicateRotor(_))));

        let bad_cycle = CatalogSpec::parse("ABCD\n3 1\nR R (AB) (BC)\n").unwrap();
        assert!(matches!(
            bad_cycle.build(),
            Err(EnigmaError::MalformedCycle(_))
        ));

        let notched_reflector = CatalogSpec::parse("ABCD\n3 1\nR RA (AB)").unwrap();
        assert!(matches!(
            notched_reflector.build(),
            Err(EnigmaError::InvalidNotch { .. })
        ));

        let empty = CatalogSpec::parse("ABCD\n3 1\n").unwrap();
        assert!(matches!(empty.build(), Err(EnigmaError::InvalidConfig(_))));
    }

    #[test]
    fn test_read_catalog_json_and_text() {
        let dir = tempdir().unwrap();
        let spec = CatalogSpec::parse(SMALL).unwrap();

        let text_path = dir.path().join("small.conf");
        std::fs::write(&text_path, spec.to_text()).unwrap();
        assert_eq!(read_catalog_spec(&text_path).unwrap(), spec);

        let json_path = dir.path().join("small.json");
        std::fs::write(&json_path, serde_json::to_string_pretty(&spec).unwrap()).unwrap();
        assert_eq!(read_catalog_spec(&json_path).unwrap(), spec);
        assert_eq!(read_catalog(&json_path).unwrap().len(), 3);
    }

    #[test]
    fn test_json_notches_on_fixed_rotor_rejected() {
        let json = r#"{
            "alphabet": "ABCD",
            "slots": 3,
            "pawls": 1,
            "rotors": [
                {"name": "R", "kind": "reflector", "cycles": "(AB) (CD)"},
                {"name": "F", "kind": "fixed", "notches": "B", "cycles": "(ABC)"},
                {"name": "M", "kind": "moving", "notches": "C", "cycles": "(AD)"}
            ]
        }"#;
        let spec: CatalogSpec = serde_json::from_str(json).unwrap();
        match spec.build() {
            Err(EnigmaError::InvalidNotch { rotor, .. }) => assert_eq!(rotor, "F"),
            other => panic!("expected InvalidNotch, got {:?}", other.map(|c| c.len())),
        }

        let dir = tempdir().unwrap();
        let path = dir.path().join("notched.json");
        std::fs::write(&path, json).unwrap();
        assert!(matches!(
            read_catalog(&path),
            Err(EnigmaError::InvalidNotch { .. })
        ));
    }

    #[test]
    fn test_json_uses_lowercase_kinds() {
        let spec = CatalogSpec::parse(SMALL).unwrap();
        let json = serde_json::to_string(&spec).unwrap();
        assert!(json.contains("\"kind\":\"reflector\""));
        assert!(json.contains("\"kind\":\"moving\""));
    }
}
