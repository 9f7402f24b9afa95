use crate::config::{read_catalog_spec, CatalogSpec};
use crate::error::Result;
use std::path::Path;

/// Describe the rotor catalog stored at `path`.
///
/// The catalog is fully built (and so validated) before anything is
/// reported. With `json` set the output is the catalog in JSON form.
pub fn show_info(path: &Path, json: bool) -> Result<String> {
    let spec = read_catalog_spec(path)?;
    let catalog = spec.build()?;
    let spec = CatalogSpec::from_catalog(&catalog);

    if json {
        let mut out = serde_json::to_string_pretty(&spec)?;
        out.push('\n');
        return Ok(out);
    }

    let mut output = String::new();
    output.push_str("Enigma Rotor Catalog\n");
    output.push_str("====================\n\n");

    output.push_str(&format!("File: {}\n", path.display()));
    output.push_str(&format!(
        "Alphabet: {} ({} symbols)\n",
        spec.alphabet,
        catalog.alphabet().size()
    ));
    output.push_str(&format!("Rotor slots: {}\n", spec.slots));
    output.push_str(&format!("Pawls: {}\n", spec.pawls));
    output.push('\n');

    let width = spec.rotors.iter().map(|r| r.name.len()).max().unwrap_or(4).max(4);
    output.push_str(&format!("Rotors ({}):\n", spec.rotors.len()));
    for rotor in &spec.rotors {
        let notches = if rotor.notches.is_empty() {
            "-".to_string()
        } else {
            rotor.notches.clone()
        };
        output.push_str(&format!(
            "  {:<width$}  {:<9}  {:<4}  {}\n",
            rotor.name,
            rotor.kind.to_string(),
            notches,
            rotor.cycles,
            width = width
        ));
    }

    Ok(output)
}
