//! Per-stage recipe nodes: knobs plus the advanced sub-stage tree.

use serde::{Deserialize, Serialize};

use super::knobs::{
    ActivityKnob, DrynessKnob, FeaturesKnob, PlatesKnob, RiversKnob, StoryKnob, SwatchesKnob, TemperatureKnob,
    WaterKnob,
};
use crate::climate::{
    AridityStrategy, PrecipitationStrategy, RefinePrecipitationStrategy, SwatchStrategy, TemperatureStrategy,
    WindStrategy,
};
use crate::ecology::{BiomeStrategy, VegetationStrategy};
use crate::hydrology::{FlowStrategy, RiverStrategy};
use crate::morphology::{BaseElevationStrategy, CoastDistanceStrategy, LandmaskStrategy, ReliefStrategy};
use crate::placement::StartPlacementStrategy;
use crate::projection::{FeatureProjectionStrategy, RiverProjectionStrategy, TerrainProjectionStrategy};
use crate::schema::{ConfigPath, Issues, Validate};
use crate::tectonics::{GenerationParams, PlateConfig};

/// Plate layout plus meshing and retry parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields, default)]
pub struct VoronoiPlatesConfig {
    pub plates: PlateConfig,
    pub generation: GenerationParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "kebab-case")]
pub enum PlateStrategy {
    Voronoi(VoronoiPlatesConfig),
}

impl Default for PlateStrategy {
    fn default() -> Self {
        PlateStrategy::Voronoi(VoronoiPlatesConfig::default())
    }
}

impl Validate for PlateStrategy {
    fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
        match self {
            PlateStrategy::Voronoi(c) => {
                c.plates.validate(&path.child("plates"), issues);
                c.generation.validate(&path.child("generation"), issues);
            }
        }
    }
}

impl PlateStrategy {
    pub fn voronoi(&self) -> &VoronoiPlatesConfig {
        match self {
            PlateStrategy::Voronoi(c) => c,
        }
    }

    pub fn voronoi_mut(&mut self) -> &mut VoronoiPlatesConfig {
        match self {
            PlateStrategy::Voronoi(c) => c,
        }
    }
}

/// Declares a stage node `{ knobs, advanced }` and its validation.
///
/// Advanced fields are sub-stage strategy slots, keyed in kebab-case.
macro_rules! stage_config {
    (
        $(#[$meta:meta])*
        $config:ident {
            knobs $knobs:ident { $($knob:ident: $knob_ty:ty),* $(,)? }
            advanced $advanced:ident { $($slot:ident: $slot_ty:ty),+ $(,)? }
        }
    ) => {
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
        #[serde(deny_unknown_fields, default)]
        pub struct $knobs {
            $(pub $knob: $knob_ty,)*
        }

        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
        #[serde(deny_unknown_fields, default, rename_all = "kebab-case")]
        pub struct $advanced {
            $(pub $slot: $slot_ty,)+
        }

        impl Validate for $advanced {
            fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
                $(self.$slot.validate(&path.child(stringify!($slot).replace('_', "-")), issues);)+
            }
        }

        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
        #[serde(deny_unknown_fields, default)]
        pub struct $config {
            pub knobs: $knobs,
            pub advanced: $advanced,
        }

        impl Validate for $config {
            fn validate(&self, path: &ConfigPath, issues: &mut Issues) {
                self.advanced.validate(&path.child("advanced"), issues);
            }
        }
    };
}

stage_config! {
    /// Tectonic plates.
    FoundationConfig {
        knobs FoundationKnobs { plates: PlatesKnob, activity: ActivityKnob }
        advanced FoundationAdvanced { compute_plates: PlateStrategy }
    }
}

stage_config! {
    /// Base elevation and land mask.
    MorphologyPreConfig {
        knobs MorphologyPreKnobs { water: WaterKnob }
        advanced MorphologyPreAdvanced {
            compute_base_elevation: BaseElevationStrategy,
            compute_landmask: LandmaskStrategy,
        }
    }
}

stage_config! {
    /// Hills and mountains.
    MorphologyMidConfig {
        knobs MorphologyMidKnobs {}
        advanced MorphologyMidAdvanced { compute_relief: ReliefStrategy }
    }
}

stage_config! {
    /// Coast distance.
    MorphologyPostConfig {
        knobs MorphologyPostKnobs {}
        advanced MorphologyPostAdvanced { compute_coast_distance: CoastDistanceStrategy }
    }
}

stage_config! {
    /// Temperature, wind and baseline rainfall.
    ClimateBaselineConfig {
        knobs ClimateBaselineKnobs { dryness: DrynessKnob, temperature: TemperatureKnob }
        advanced ClimateBaselineAdvanced {
            compute_temperature: TemperatureStrategy,
            compute_wind: WindStrategy,
            compute_precipitation: PrecipitationStrategy,
        }
    }
}

stage_config! {
    /// Drainage and rivers.
    HydrographyConfig {
        knobs HydrographyKnobs { rivers: RiversKnob }
        advanced HydrographyAdvanced {
            compute_flow: FlowStrategy,
            compute_rivers: RiverStrategy,
        }
    }
}

stage_config! {
    /// Rainfall refinement and aridity.
    ClimateRefineConfig {
        knobs ClimateRefineKnobs { story: StoryKnob, swatches: SwatchesKnob }
        advanced ClimateRefineAdvanced {
            compute_precipitation: RefinePrecipitationStrategy,
            apply_swatches: SwatchStrategy,
            compute_aridity: AridityStrategy,
        }
    }
}

stage_config! {
    /// Biomes and vegetation.
    EcologyConfig {
        knobs EcologyKnobs {}
        advanced EcologyAdvanced {
            classify_biomes: BiomeStrategy,
            compute_vegetation: VegetationStrategy,
        }
    }
}

stage_config! {
    /// Game-map terrain.
    MapMorphologyConfig {
        knobs MapMorphologyKnobs {}
        advanced MapMorphologyAdvanced { project_terrain: TerrainProjectionStrategy }
    }
}

stage_config! {
    /// Game-map rivers.
    MapHydrologyConfig {
        knobs MapHydrologyKnobs {}
        advanced MapHydrologyAdvanced { project_rivers: RiverProjectionStrategy }
    }
}

stage_config! {
    /// Game-map features.
    MapEcologyConfig {
        knobs MapEcologyKnobs { features: FeaturesKnob }
        advanced MapEcologyAdvanced { project_features: FeatureProjectionStrategy }
    }
}

stage_config! {
    /// Player starts.
    PlacementConfig {
        knobs PlacementKnobs {}
        advanced PlacementAdvanced { place_starts: StartPlacementStrategy }
    }
}

impl FoundationConfig {
    /// Advanced tree with the knobs folded in.
    pub fn resolve(&self) -> FoundationAdvanced {
        let mut advanced = self.advanced.clone();
        let voronoi = advanced.compute_plates.voronoi_mut();
        self.knobs.plates.apply(&mut voronoi.plates);
        self.knobs.activity.apply(&mut voronoi.plates, &mut voronoi.generation);
        advanced
    }
}

impl MorphologyPreConfig {
    pub fn resolve(&self) -> MorphologyPreAdvanced {
        let mut advanced = self.advanced.clone();
        self.knobs.water.apply(&mut advanced.compute_landmask);
        advanced
    }
}

impl ClimateBaselineConfig {
    pub fn resolve(&self) -> ClimateBaselineAdvanced {
        let mut advanced = self.advanced.clone();
        self.knobs.dryness.apply(&mut advanced.compute_precipitation);
        match &mut advanced.compute_temperature {
            TemperatureStrategy::LatitudeLapse(c) => self.knobs.temperature.apply(c),
        }
        advanced
    }
}

impl HydrographyConfig {
    pub fn resolve(&self) -> HydrographyAdvanced {
        let mut advanced = self.advanced.clone();
        self.knobs.rivers.apply(&mut advanced.compute_rivers);
        advanced
    }
}

impl ClimateRefineConfig {
    pub fn resolve(&self) -> ClimateRefineAdvanced {
        let mut advanced = self.advanced.clone();
        self.knobs.story.apply(&mut advanced.compute_precipitation);
        self.knobs.swatches.apply(&mut advanced.apply_swatches);
        advanced
    }
}

impl MapEcologyConfig {
    pub fn resolve(&self) -> MapEcologyAdvanced {
        let mut advanced = self.advanced.clone();
        self.knobs.features.apply(&mut advanced.project_features);
        advanced
    }
}
