//! Staged generation over the hex grid.
//!
//! Stages run in a fixed order. Each one reads layers published by earlier
//! stages from the map's [`FieldStore`] and publishes its own, exactly once.

mod fields;
mod stage;
pub mod stages;
mod world;

pub use fields::{FieldData, FieldId, FieldKind, FieldStore};
pub use stage::{GenerationStage, Pipeline, PipelineError, StageContext, StageId, StageOutput};
pub use world::{WorldMap, WorldSummary};

use log::{info, Level};

use self::stages::*;
use crate::geometry::HexGrid;
use crate::recipe::CompiledRecipe;
use crate::util::Timed;

impl Pipeline {
    /// All twelve stages configured from a compiled recipe.
    pub fn from_recipe(recipe: &CompiledRecipe) -> Self {
        let mut pipeline = Pipeline::new();
        pipeline
            .add_stage(FoundationStage { config: recipe.foundation.clone() })
            .add_stage(MorphologyPreStage { config: recipe.morphology_pre.clone() })
            .add_stage(MorphologyMidStage { config: recipe.morphology_mid.clone() })
            .add_stage(MorphologyPostStage { config: recipe.morphology_post.clone() })
            .add_stage(ClimateBaselineStage { config: recipe.climate_baseline.clone() })
            .add_stage(HydrographyStage { config: recipe.hydrography.clone() })
            .add_stage(ClimateRefineStage { config: recipe.climate_refine.clone() })
            .add_stage(EcologyStage { config: recipe.ecology.clone() })
            .add_stage(MapMorphologyStage { config: recipe.map_morphology.clone() })
            .add_stage(MapHydrologyStage { config: recipe.map_hydrology.clone() })
            .add_stage(MapEcologyStage { config: recipe.map_ecology.clone() })
            .add_stage(PlacementStage { config: recipe.placement.clone() });
        pipeline
    }
}

/// Generates a full map from a compiled recipe.
///
/// # Arguments
/// * `grid` - Map dimensions
/// * `recipe` - Validated configuration with knobs applied
/// * `engine_seed` - Host seed; plate seeding may override it per the recipe
pub fn run_recipe(grid: HexGrid, recipe: &CompiledRecipe, engine_seed: u64) -> Result<WorldMap, PipelineError> {
    let _t = Timed::new(Level::Info, "generate");
    info!("generating {}x{} map, seed {engine_seed}", grid.width, grid.height);
    let mut world = WorldMap::new(grid, engine_seed);
    Pipeline::from_recipe(recipe).run_with_callbacks(
        &mut world,
        |name, i, total| info!("[{}/{}] {name}", i + 1, total),
        |_, _, _| {},
    )?;
    Ok(world)
}
