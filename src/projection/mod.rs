//! Projection of the physical layers onto game-map terrain, rivers and features.

pub mod config;
pub mod features;
pub mod rivers;
pub mod terrain;

pub use config::{
    DensityConfig, FeatureProjectionStrategy, RiverProjectionStrategy, StandardTerrainConfig,
    TerrainProjectionStrategy,
};
pub use features::{FeatureInputs, FeatureType};
pub use terrain::TerrainType;
