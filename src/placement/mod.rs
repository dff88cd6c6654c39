//! Player start placement.

pub mod config;
pub mod starts;

pub use config::{FertilitySpacedConfig, StartPlacementStrategy};
pub use starts::PlacementInputs;
