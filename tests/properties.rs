use enigma::{Alphabet, CatalogSpec, Machine, Permutation, Rotor, Settings};
use proptest::prelude::*;
use std::sync::Arc;

const M3: &str = include_str!("../resources/enigma-m3.conf");

/// Render a mapping of indices as disjoint cycles over A-Z.
fn cycles_of(mapping: &[usize]) -> String {
    let symbols: Vec<char> = ('A'..='Z').collect();
    let mut seen = vec![false; mapping.len()];
    let mut out = String::new();
    for start in 0..mapping.len() {
        if seen[start] || mapping[start] == start {
            continue;
        }
        out.push('(');
        let mut i = start;
        while !seen[i] {
            seen[i] = true;
            out.push(symbols[i]);
            i = mapping[i];
        }
        out.push(')');
    }
    out
}

fn arb_mapping() -> impl Strategy<Value = Vec<usize>> {
    Just((0..26).collect::<Vec<usize>>()).prop_shuffle()
}

fn arb_settings() -> impl Strategy<Value = String> {
    (
        prop::sample::select(vec!["B", "C"]),
        prop::sample::subsequence(vec!["I", "II", "III", "IV", "V", "VI", "VII", "VIII"], 3)
            .prop_shuffle(),
        "[A-Z]{3}",
        "[A-Z]{3}",
    )
        .prop_map(|(reflector, rotors, positions, rings)| {
            format!("* {} {} {} {} (AM) (QT)", reflector, rotors.join(" "), positions, rings)
        })
}

fn machine(settings: &str) -> Machine {
    let catalog = Arc::new(CatalogSpec::parse(M3).unwrap().build().unwrap());
    let mut machine = Machine::new(catalog);
    Settings::parse(settings, 4).unwrap().apply(&mut machine).unwrap();
    machine
}

proptest! {
    #[test]
    fn prop_permutation_is_bijection(mapping in arb_mapping()) {
        let alphabet = Arc::new(Alphabet::default());
        let perm = Permutation::new(&cycles_of(&mapping), alphabet).unwrap();
        for (i, &target) in mapping.iter().enumerate() {
            prop_assert_eq!(perm.permute(i as i64).unwrap(), target);
            prop_assert_eq!(perm.invert(target as i64).unwrap(), i);
        }
        // Canonical rendering parses back to the same wiring
        let again = Permutation::new(&perm.cycles(), perm.alphabet().clone()).unwrap();
        prop_assert_eq!(again.cycles(), perm.cycles());
    }

    #[test]
    fn prop_wrap_lands_in_range(x in -10_000i64..10_000) {
        let perm = Permutation::identity(Arc::new(Alphabet::default()));
        let w = perm.wrap(x);
        prop_assert!(w < 26);
        prop_assert_eq!(perm.wrap(w as i64), w);
        prop_assert_eq!(perm.wrap(x + 26), w);
    }

    #[test]
    fn prop_rotor_backward_undoes_forward(
        mapping in arb_mapping(),
        position in 0usize..26,
        ring in 0usize..26,
        contact in 0usize..26,
    ) {
        let alphabet = Arc::new(Alphabet::default());
        let perm = Permutation::new(&cycles_of(&mapping), alphabet).unwrap();
        let mut rotor = Rotor::moving("X", perm, "Q").unwrap();
        rotor.set_position(position).unwrap();
        rotor.set_ring_offset(ring).unwrap();

        let out = rotor.convert_forward(contact).unwrap();
        prop_assert_eq!(rotor.convert_backward(out).unwrap(), contact);
    }

    #[test]
    fn prop_machine_is_self_inverse(settings in arb_settings(), message in "[A-Z]{1,80}") {
        let cipher = machine(&settings).convert_message(&message).unwrap();
        prop_assert_eq!(cipher.len(), message.len());
        let plain = machine(&settings).convert_message(&cipher).unwrap();
        prop_assert_eq!(plain, message);
    }

    #[test]
    fn prop_no_symbol_encrypts_to_itself(settings in arb_settings(), message in "[A-Z]{1,80}") {
        let cipher = machine(&settings).convert_message(&message).unwrap();
        for (p, c) in message.chars().zip(cipher.chars()) {
            prop_assert_ne!(p, c);
        }
    }
}
