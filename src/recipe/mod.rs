//! Generation recipes.
//!
//! A recipe is a closed tree with one node per pipeline stage. Each node
//! holds coarse knobs and an `advanced` table of sub-stage configs, each
//! naming its algorithm with a `strategy` key:
//!
//! ```toml
//! [foundation.knobs]
//! plates = "many"
//!
//! [hydrology-climate-baseline.advanced.compute-precipitation]
//! strategy = "latitude-bands"
//! equator_mm = 2400.0
//! ```
//!
//! Every key is optional. Unknown keys and out-of-range values are rejected
//! with the dotted path of the offending node.

pub mod knobs;
pub mod stages;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::schema::{self, ConfigError, ConfigPath, Issues, Validate};
pub use stages::*;

/// Authored generation settings for every stage.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields, default, rename_all = "kebab-case")]
pub struct Recipe {
    pub foundation: FoundationConfig,
    pub morphology_pre: MorphologyPreConfig,
    pub morphology_mid: MorphologyMidConfig,
    pub morphology_post: MorphologyPostConfig,
    pub hydrology_climate_baseline: ClimateBaselineConfig,
    pub hydrology_hydrography: HydrographyConfig,
    pub hydrology_climate_refine: ClimateRefineConfig,
    pub ecology: EcologyConfig,
    pub map_morphology: MapMorphologyConfig,
    pub map_hydrology: MapHydrologyConfig,
    pub map_ecology: MapEcologyConfig,
    pub placement: PlacementConfig,
}

impl Validate for Recipe {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        self.foundation.validate(&path.child("foundation"), issues);
        self.morphology_pre.validate(&path.child("morphology-pre"), issues);
        self.morphology_mid.validate(&path.child("morphology-mid"), issues);
        self.morphology_post.validate(&path.child("morphology-post"), issues);
        self.hydrology_climate_baseline
            .validate(&path.child("hydrology-climate-baseline"), issues);
        self.hydrology_hydrography
            .validate(&path.child("hydrology-hydrography"), issues);
        self.hydrology_climate_refine
            .validate(&path.child("hydrology-climate-refine"), issues);
        self.ecology.validate(&path.child("ecology"), issues);
        self.map_morphology.validate(&path.child("map-morphology"), issues);
        self.map_hydrology.validate(&path.child("map-hydrology"), issues);
        self.map_ecology.validate(&path.child("map-ecology"), issues);
        self.placement.validate(&path.child("placement"), issues);
    }
}

impl Recipe {
    /// Loads and validates a TOML recipe.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Self::from_value(&schema::parse_toml(text)?)
    }

    /// Loads and validates a JSON recipe.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        Self::from_value(&schema::parse_json(text)?)
    }

    fn from_value(value: &serde_json::Value) -> Result<Self, ConfigError> {
        let recipe: Recipe = schema::decode(value, &ConfigPath::root())?;
        recipe.validate_at_root()?;
        Ok(recipe)
    }

    /// Fully-defaulted TOML document.
    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Fully-defaulted JSON document.
    pub fn to_json_string(&self) -> Result<String, ConfigError> {
        serde_json::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))
    }

    /// Applies knobs and validates the result.
    ///
    /// Knobs can push values past their bounds (a "many" plate count on top
    /// of an already large count), so validation runs again after they apply.
    pub fn compile(&self) -> Result<CompiledRecipe, ConfigError> {
        self.validate_at_root()?;
        let compiled = CompiledRecipe {
            foundation: self.foundation.resolve(),
            morphology_pre: self.morphology_pre.resolve(),
            morphology_mid: self.morphology_mid.advanced.clone(),
            morphology_post: self.morphology_post.advanced.clone(),
            climate_baseline: self.hydrology_climate_baseline.resolve(),
            hydrography: self.hydrology_hydrography.resolve(),
            climate_refine: self.hydrology_climate_refine.resolve(),
            ecology: self.ecology.advanced.clone(),
            map_morphology: self.map_morphology.advanced.clone(),
            map_hydrology: self.map_hydrology.advanced.clone(),
            map_ecology: self.map_ecology.resolve(),
            placement: self.placement.advanced.clone(),
        };
        compiled.validate_at_root()?;
        debug!(
            "compiled recipe: {} plates, knobs folded into {} stages",
            compiled.foundation.compute_plates.voronoi().plates.count,
            crate::pipeline::StageId::ORDER.len()
        );
        Ok(compiled)
    }
}

/// Sub-stage configs with knobs applied, ready to run.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct CompiledRecipe {
    pub foundation: FoundationAdvanced,
    pub morphology_pre: MorphologyPreAdvanced,
    pub morphology_mid: MorphologyMidAdvanced,
    pub morphology_post: MorphologyPostAdvanced,
    pub climate_baseline: ClimateBaselineAdvanced,
    pub hydrography: HydrographyAdvanced,
    pub climate_refine: ClimateRefineAdvanced,
    pub ecology: EcologyAdvanced,
    pub map_morphology: MapMorphologyAdvanced,
    pub map_hydrology: MapHydrologyAdvanced,
    pub map_ecology: MapEcologyAdvanced,
    pub placement: PlacementAdvanced,
}

impl Validate for CompiledRecipe {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        let advanced = |stage: &str| path.child(stage).child("advanced");
        self.foundation.validate(&advanced("foundation"), issues);
        self.morphology_pre.validate(&advanced("morphology-pre"), issues);
        self.morphology_mid.validate(&advanced("morphology-mid"), issues);
        self.morphology_post.validate(&advanced("morphology-post"), issues);
        self.climate_baseline
            .validate(&advanced("hydrology-climate-baseline"), issues);
        self.hydrography.validate(&advanced("hydrology-hydrography"), issues);
        self.climate_refine
            .validate(&advanced("hydrology-climate-refine"), issues);
        self.ecology.validate(&advanced("ecology"), issues);
        self.map_morphology.validate(&advanced("map-morphology"), issues);
        self.map_hydrology.validate(&advanced("map-hydrology"), issues);
        self.map_ecology.validate(&advanced("map-ecology"), issues);
        self.placement.validate(&advanced("placement"), issues);
    }
}
