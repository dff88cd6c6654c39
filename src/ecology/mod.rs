//! Biomes and vegetation from the refined climate.

pub mod biome;
pub mod config;
pub mod vegetation;

pub use biome::{biome_preview_rgb, BiomeId, ClimateInputs};
pub use config::{BiomeStrategy, MoistureTemperatureConfig, VegetationStrategy, WhittakerConfig};
pub use vegetation::VegetationInputs;
