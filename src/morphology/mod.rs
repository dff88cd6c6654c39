//! Landform layers derived from the tectonic substrate.
//!
//! - Base elevation and crust type from plate potentials
//! - Sea level and the land mask
//! - Hills and mountains
//! - Distance to the coast

pub mod coast;
pub mod config;
pub mod elevation;
pub mod landmask;
pub mod relief;

pub use config::{
    BaseElevationStrategy, CoastDistanceStrategy, CrustUpliftConfig, FixedSeaLevelConfig, HexBfsConfig,
    LandmaskStrategy, ReliefStrategy, TargetWaterConfig, UpliftThresholdConfig,
};
pub use relief::ReliefClass;
