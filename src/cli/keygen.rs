use crate::catalog::Catalog;
use crate::config::read_catalog;
use crate::error::{EnigmaError, Result};
use crate::rotor::{Rotor, RotorKind};
use crate::settings::Settings;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use std::path::Path;

/// Options for the keygen command
#[derive(Debug, Clone)]
pub struct KeygenOptions {
    /// Fixed seed for reproducible settings; entropy when `None`
    pub seed: Option<u64>,
    /// Number of plugboard pairs
    pub plugs: usize,
    /// Randomise ring settings as well
    pub rings: bool,
}

impl Default for KeygenOptions {
    fn default() -> Self {
        Self {
            seed: None,
            plugs: 10,
            rings: true,
        }
    }
}

/// Pick a random valid session configuration for `catalog`.
///
/// One reflector, enough fixed rotors to fill the slots between it and the
/// moving rotors, then one moving rotor per pawl, all distinct.
pub fn generate_settings(catalog: &Catalog, options: &KeygenOptions) -> Result<Settings> {
    let mut rng = match options.seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    };

    let of_kind = |kind: RotorKind| {
        catalog
            .rotors()
            .filter(|r| r.kind() == kind)
            .collect::<Vec<_>>()
    };
    let fixed_slots = catalog.slots() - 1 - catalog.pawls();

    let mut rotors = Vec::with_capacity(catalog.slots());
    rotors.extend(pick(&mut rng, &of_kind(RotorKind::Reflector), 1, "reflector")?);
    rotors.extend(pick(&mut rng, &of_kind(RotorKind::Fixed), fixed_slots, "fixed")?);
    rotors.extend(pick(
        &mut rng,
        &of_kind(RotorKind::Moving),
        catalog.pawls(),
        "moving",
    )?);

    let symbols = catalog.alphabet().symbols();
    let random_window = |rng: &mut StdRng| -> String {
        (1..catalog.slots())
            .map(|_| symbols[rng.gen_range(0..symbols.len())])
            .collect()
    };
    let positions = random_window(&mut rng);
    let rings = if options.rings {
        Some(random_window(&mut rng))
    } else {
        None
    };

    let plugs = options.plugs.min(symbols.len() / 2);
    let plugboard = if plugs == 0 {
        None
    } else {
        let mut shuffled = symbols.to_vec();
        shuffled.shuffle(&mut rng);
        let pairs: Vec<String> = shuffled
            .chunks_exact(2)
            .take(plugs)
            .map(|pair| format!("({}{})", pair[0], pair[1]))
            .collect();
        Some(pairs.join(" "))
    };

    Ok(Settings {
        rotors,
        positions,
        rings,
        plugboard,
    })
}

/// Choose `count` distinct rotor names from `pool`.
fn pick(rng: &mut StdRng, pool: &[&Rotor], count: usize, what: &str) -> Result<Vec<String>> {
    if pool.len() < count {
        return Err(EnigmaError::InvalidConfig(format!(
            "catalog has {} {} rotors, {} needed",
            pool.len(),
            what,
            count
        )));
    }
    Ok(pool
        .choose_multiple(rng, count)
        .map(|r| r.name().to_string())
        .collect())
}

/// Generate a settings line for the catalog stored at `config`.
pub fn keygen(config: &Path, options: &KeygenOptions) -> Result<String> {
    let catalog = read_catalog(config)?;
    Ok(generate_settings(&catalog, options)?.to_string())
}
