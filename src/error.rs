use thiserror::Error;

#[derive(Error, Debug)]
pub enum EnigmaError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid alphabet: {0}")]
    InvalidAlphabet(String),

    #[error("Malformed cycle: {0}")]
    MalformedCycle(String),

    #[error("Symbol '{0}' is not in the alphabet")]
    SymbolNotInAlphabet(char),

    #[error("Index {index} out of range for alphabet of size {size}")]
    OutOfRange { index: i64, size: usize },

    #[error("Unknown rotor: {0}")]
    UnknownRotor(String),

    #[error("Duplicate rotor: {0}")]
    DuplicateRotor(String),

    #[error("Misplaced reflector: {0}")]
    MisplacedReflector(String),

    #[error("Expected {expected} moving rotors, found {found}")]
    PawlCountMismatch { expected: usize, found: usize },

    #[error("Expected {expected} settings, found {found}")]
    SettingLengthMismatch { expected: usize, found: usize },

    #[error("Position {position} out of range for rotor {rotor}")]
    PositionOutOfRange { rotor: String, position: usize },

    #[error("Invalid notch for rotor {rotor}: {reason}")]
    InvalidNotch { rotor: String, reason: String },

    #[error("No rotors installed")]
    RotorsNotInstalled,

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid setting line: {0}")]
    InvalidSetting(String),

    #[error("Unsupported rotor kind: {0}")]
    UnsupportedRotorKind(String),
}

pub type Result<T> = std::result::Result<T, EnigmaError>;
