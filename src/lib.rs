//! Enigma - Rotor Cipher Machine Simulator
//!
//! Simulates an electromechanical rotor cipher machine: an alphabet, an
//! ordered stack of interchangeable rotors, a reflector and a plugboard.
//! Every key press first steps the rotors (reproducing the historical
//! double-stepping anomaly) and then routes the symbol through the
//! machine and back.
//!
//! ## Signal Path
//!
//! ```text
//! Input → Plugboard → Rotors (right to left) → Reflector → Rotors (left to right) → Plugboard → Output
//! ```
//!
//! - **Alphabet**: symbols and their dense indices
//! - **Permutation**: wiring in disjoint-cycle notation, forward and inverse
//! - **Rotor**: reflector, fixed or moving wheel with position and ring offset
//! - **Catalog**: shared table of rotor templates and machine geometry
//! - **Machine**: installed rotors, stepping and conversion
//!
//! ## Example
//!
//! ```
//! use enigma::{CatalogSpec, Machine, Settings};
//! use std::sync::Arc;
//!
//! let spec = CatalogSpec::parse(
//!     "ABCDEFGHIJKLMNOPQRSTUVWXYZ\n4 3\n\
//!      I MQ (AELTPHQXRU) (BKNW) (CMOY) (DFG) (IV) (JZ)\n\
//!      II ME (BJ) (CDKLHUP) (ESZ) (FIXVYOMW) (GR) (NT)\n\
//!      III MV (ABDHPEJT) (CFLVMZOYQIRWUKXSG)\n\
//!      B R (AY) (BR) (CU) (DH) (EQ) (FS) (GL) (IP) (JX) (KN) (MO) (TZ) (VW)\n",
//! ).unwrap();
//! let catalog = Arc::new(spec.build().unwrap());
//!
//! let mut machine = Machine::new(catalog);
//! Settings::parse("* B I II III AAA", 4).unwrap().apply(&mut machine).unwrap();
//! assert_eq!(machine.convert_message("AAAAA").unwrap(), "BDZGO");
//! ```

pub mod alphabet;
pub mod catalog;
pub mod cli;
pub mod config;
pub mod error;
pub mod machine;
pub mod permutation;
pub mod rotor;
pub mod settings;
pub mod trace;

pub use alphabet::Alphabet;
pub use catalog::Catalog;
pub use config::{read_catalog, CatalogSpec, RotorSpec};
pub use error::{EnigmaError, Result};
pub use machine::Machine;
pub use permutation::Permutation;
pub use rotor::{Rotor, RotorKind};
pub use settings::Settings;
pub use trace::{NoTrace, Stage, TraceSink, Transcript};
