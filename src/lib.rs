//! Tectonic hex-map generator.
//!
//! This crate meshes tectonic plates over a wrapping offset hex grid and runs
//! a staged, recipe-driven pipeline on top of them: morphology, climate,
//! hydrology, ecology, game-map projection and start placement.
//!
//! ```no_run
//! use hexworld::geometry::HexGrid;
//! use hexworld::pipeline::run_recipe;
//! use hexworld::recipe::Recipe;
//!
//! let recipe = Recipe::from_toml_str("[foundation.knobs]\nplates = \"few\"\n")?;
//! let world = run_recipe(HexGrid::new(84, 54), &recipe.compile()?, 7)?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```

pub mod climate;
pub mod ecology;
pub mod export;
pub mod geometry;
pub mod hydrology;
pub mod morphology;
pub mod pipeline;
pub mod placement;
pub mod projection;
pub mod recipe;
pub mod schema;
pub mod tectonics;
pub mod util;

pub use geometry::HexGrid;
pub use pipeline::{run_recipe, FieldId, Pipeline, PipelineError, WorldMap, WorldSummary};
pub use recipe::{CompiledRecipe, Recipe};
pub use schema::ConfigError;
pub use tectonics::{generate_plates, GenerationParams, PlateConfig, PlateGeneration, TectonicError};
