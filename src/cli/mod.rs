pub mod convert;
pub mod info;
pub mod keygen;

pub use convert::*;
pub use info::*;
pub use keygen::*;
