//! Climate layers: temperature, wind, rainfall and aridity.
//!
//! The baseline pass runs before rivers exist; the refine pass revisits
//! rainfall once the hydrography is known.

pub mod aridity;
pub mod config;
pub mod precipitation;
pub mod refine;
pub mod swatches;
pub mod temperature;
pub mod util;
pub mod wind;

pub use config::{
    AridityStrategy, LatitudeBandsConfig, LatitudeLapseConfig, MacroBeltsConfig, MoistureAdvectionConfig,
    PetRatioConfig, PrecipitationStrategy, RefineConfig, RefinePrecipitationStrategy, SwatchStrategy,
    TemperatureStrategy, ThreeCellConfig, WindStrategy,
};
pub use precipitation::SurfaceInputs;
pub use refine::RefineInputs;
