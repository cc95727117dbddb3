mod minor_units;
pub mod op;
mod secret;

pub use minor_units::{MinorUnits, MinorUnitsConversionError};
pub use secret::Secret;
