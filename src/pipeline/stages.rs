//! The generation stages, one per recipe node.
//!
//! Each stage holds its compiled sub-stage configs, dispatches on the
//! selected strategies, and publishes the layers it owns.

use log::{debug, info, warn};

use super::fields::{FieldData, FieldId};
use super::stage::{GenerationStage, PipelineError, StageContext, StageId};
use crate::climate::{
    aridity, precipitation, refine, swatches, temperature, wind, AridityStrategy, PrecipitationStrategy,
    RefineInputs, RefinePrecipitationStrategy, SurfaceInputs, SwatchStrategy, TemperatureStrategy, WindStrategy,
};
use crate::ecology::{biome, vegetation, BiomeStrategy, ClimateInputs, VegetationInputs, VegetationStrategy};
use crate::hydrology::{flood, flow, rivers, FlowStrategy, RiverStrategy};
use crate::morphology::elevation::{crust_uplift, TectonicInputs};
use crate::morphology::{
    coast, landmask, relief, BaseElevationStrategy, CoastDistanceStrategy, LandmaskStrategy, ReliefStrategy,
};
use crate::placement::{starts, PlacementInputs, StartPlacementStrategy};
use crate::projection::{
    features, rivers as river_projection, terrain, FeatureInputs, FeatureProjectionStrategy,
    TerrainProjectionStrategy,
};
use crate::recipe::{
    ClimateBaselineAdvanced, ClimateRefineAdvanced, EcologyAdvanced, FoundationAdvanced, HydrographyAdvanced,
    MapEcologyAdvanced, MapHydrologyAdvanced, MapMorphologyAdvanced, MorphologyMidAdvanced, MorphologyPostAdvanced,
    MorphologyPreAdvanced, PlacementAdvanced,
};
use crate::tectonics::generate_plates;

/// Tectonic plates and boundary influence.
pub struct FoundationStage {
    pub config: FoundationAdvanced,
}

const FOUNDATION_FIELDS: &[FieldId] = &[
    FieldId::PlateId,
    FieldId::BoundaryCloseness,
    FieldId::BoundaryType,
    FieldId::TectonicStress,
    FieldId::UpliftPotential,
    FieldId::RiftPotential,
    FieldId::ShieldStability,
    FieldId::BoundaryDistance,
    FieldId::PlateMovementU,
    FieldId::PlateMovementV,
    FieldId::PlateRotation,
];

impl GenerationStage for FoundationStage {
    fn id(&self) -> StageId {
        StageId::Foundation
    }

    fn publishes(&self) -> &[FieldId] {
        FOUNDATION_FIELDS
    }

    fn execute(&self, ctx: &mut StageContext<'_>) -> Result<(), PipelineError> {
        let voronoi = self.config.compute_plates.voronoi();
        let generation = generate_plates(ctx.grid(), &voronoi.plates, &voronoi.generation, ctx.seed())?;

        let meta = &generation.metadata;
        if meta.accepted {
            info!(
                "{} plates accepted on attempt {} of {}",
                generation.plate_count(),
                meta.chosen_attempt + 1,
                meta.attempts.len()
            );
        } else {
            warn!(
                "every plate layout saturated; keeping attempt {} ({} plates)",
                meta.chosen_attempt + 1,
                generation.plate_count()
            );
        }

        let f = generation.fields;
        ctx.publish(FieldId::PlateId, FieldData::U8(f.plate_id))?;
        ctx.publish(FieldId::BoundaryCloseness, FieldData::U8(f.boundary_closeness))?;
        ctx.publish(FieldId::BoundaryType, FieldData::U8(f.boundary_type))?;
        ctx.publish(FieldId::TectonicStress, FieldData::U8(f.tectonic_stress))?;
        ctx.publish(FieldId::UpliftPotential, FieldData::U8(f.uplift_potential))?;
        ctx.publish(FieldId::RiftPotential, FieldData::U8(f.rift_potential))?;
        ctx.publish(FieldId::ShieldStability, FieldData::U8(f.shield_stability))?;
        ctx.publish(FieldId::BoundaryDistance, FieldData::U8(f.distance_field))?;
        ctx.publish(FieldId::PlateMovementU, FieldData::I8(f.plate_movement_u))?;
        ctx.publish(FieldId::PlateMovementV, FieldData::I8(f.plate_movement_v))?;
        ctx.publish(FieldId::PlateRotation, FieldData::I8(f.plate_rotation))?;
        ctx.record_plates(generation.plates, generation.metadata);
        Ok(())
    }
}

/// Base elevation, crust type and land mask.
pub struct MorphologyPreStage {
    pub config: MorphologyPreAdvanced,
}

impl GenerationStage for MorphologyPreStage {
    fn id(&self) -> StageId {
        StageId::MorphologyPre
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Foundation]
    }

    fn publishes(&self) -> &[FieldId] {
        &[FieldId::Elevation, FieldId::Crust, FieldId::LandMask]
    }

    fn execute(&self, ctx: &mut StageContext<'_>) -> Result<(), PipelineError> {
        let plate_id = ctx.u8(FieldId::PlateId)?;
        let inputs = TectonicInputs {
            plate_id,
            uplift: ctx.u8(FieldId::UpliftPotential)?,
            rift: ctx.u8(FieldId::RiftPotential)?,
            shield: ctx.u8(FieldId::ShieldStability)?,
        };
        let plate_count = match ctx.plates() {
            Some(plates) => plates.len(),
            None => plate_id.iter().map(|&p| p as usize + 1).max().unwrap_or(0),
        };

        let (mut elevation, crust) = match &self.config.compute_base_elevation {
            BaseElevationStrategy::CrustUplift(cfg) => {
                crust_uplift(ctx.grid(), inputs, plate_count, cfg, &mut ctx.rng(0))
            }
        };

        let sea_level = match &self.config.compute_landmask {
            LandmaskStrategy::TargetWater(cfg) => landmask::sea_level_for_water(&elevation, cfg.water_percent),
            LandmaskStrategy::FixedSeaLevel(cfg) => cfg.sea_level_m,
        };
        let land = landmask::apply_sea_level(&mut elevation, sea_level);
        debug!("sea level {sea_level:.0} m");

        ctx.publish(FieldId::Elevation, FieldData::F32(elevation))?;
        ctx.publish(FieldId::Crust, FieldData::U8(crust))?;
        ctx.publish(FieldId::LandMask, FieldData::U8(land))?;
        Ok(())
    }
}

/// Hills and mountains.
pub struct MorphologyMidStage {
    pub config: MorphologyMidAdvanced,
}

impl GenerationStage for MorphologyMidStage {
    fn id(&self) -> StageId {
        StageId::MorphologyMid
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::MorphologyPre]
    }

    fn publishes(&self) -> &[FieldId] {
        &[FieldId::Relief]
    }

    fn execute(&self, ctx: &mut StageContext<'_>) -> Result<(), PipelineError> {
        let relief = match &self.config.compute_relief {
            ReliefStrategy::UpliftThreshold(cfg) => relief::uplift_threshold(
                ctx.f32(FieldId::Elevation)?,
                ctx.u8(FieldId::LandMask)?,
                ctx.u8(FieldId::UpliftPotential)?,
                ctx.u8(FieldId::RiftPotential)?,
                cfg,
            ),
        };
        ctx.publish(FieldId::Relief, FieldData::U8(relief))
    }
}

/// Distance to the shoreline.
pub struct MorphologyPostStage {
    pub config: MorphologyPostAdvanced,
}

impl GenerationStage for MorphologyPostStage {
    fn id(&self) -> StageId {
        StageId::MorphologyPost
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::MorphologyPre]
    }

    fn publishes(&self) -> &[FieldId] {
        &[FieldId::CoastDistance]
    }

    fn execute(&self, ctx: &mut StageContext<'_>) -> Result<(), PipelineError> {
        let distance = match &self.config.compute_coast_distance {
            CoastDistanceStrategy::HexBfs(cfg) => {
                coast::coast_distance(ctx.grid(), ctx.u8(FieldId::LandMask)?, cfg.max_distance)
            }
        };
        ctx.publish(FieldId::CoastDistance, FieldData::U8(distance))
    }
}

/// Temperature, prevailing wind and baseline rainfall.
pub struct ClimateBaselineStage {
    pub config: ClimateBaselineAdvanced,
}

impl GenerationStage for ClimateBaselineStage {
    fn id(&self) -> StageId {
        StageId::ClimateBaseline
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::MorphologyMid, StageId::MorphologyPost]
    }

    fn publishes(&self) -> &[FieldId] {
        &[FieldId::Temperature, FieldId::WindU, FieldId::WindV, FieldId::Rainfall]
    }

    fn execute(&self, ctx: &mut StageContext<'_>) -> Result<(), PipelineError> {
        let grid = *ctx.grid();
        let surface = SurfaceInputs {
            elevation: ctx.f32(FieldId::Elevation)?,
            land_mask: ctx.u8(FieldId::LandMask)?,
            relief: ctx.u8(FieldId::Relief)?,
            coast_distance: ctx.u8(FieldId::CoastDistance)?,
        };

        let temp = match &self.config.compute_temperature {
            TemperatureStrategy::LatitudeLapse(cfg) => temperature::latitude_lapse(
                &grid,
                surface.elevation,
                surface.land_mask,
                surface.coast_distance,
                cfg,
            ),
        };
        let (wind_u, wind_v) = match &self.config.compute_wind {
            WindStrategy::ThreeCell(cfg) => wind::three_cell(&grid, cfg),
        };
        let rainfall = match &self.config.compute_precipitation {
            PrecipitationStrategy::LatitudeBands(cfg) => precipitation::latitude_bands(&grid, surface, cfg),
            PrecipitationStrategy::MoistureAdvection(cfg) => {
                precipitation::moisture_advection(&grid, surface, &temp, &wind_u, &wind_v, cfg)
            }
        };

        ctx.publish(FieldId::Temperature, FieldData::F32(temp))?;
        ctx.publish(FieldId::WindU, FieldData::F32(wind_u))?;
        ctx.publish(FieldId::WindV, FieldData::F32(wind_v))?;
        ctx.publish(FieldId::Rainfall, FieldData::F32(rainfall))?;
        Ok(())
    }
}

/// Drainage network and river classes.
pub struct HydrographyStage {
    pub config: HydrographyAdvanced,
}

impl GenerationStage for HydrographyStage {
    fn id(&self) -> StageId {
        StageId::Hydrography
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::ClimateBaseline]
    }

    fn publishes(&self) -> &[FieldId] {
        &[FieldId::FlowDirection, FieldId::FlowAccumulation, FieldId::RiverClass]
    }

    fn execute(&self, ctx: &mut StageContext<'_>) -> Result<(), PipelineError> {
        let grid = *ctx.grid();
        let elevation = ctx.f32(FieldId::Elevation)?;
        let land = ctx.u8(FieldId::LandMask)?;

        let (down, accumulation) = match &self.config.compute_flow {
            FlowStrategy::SteepestDescent(cfg) => {
                let surface = if cfg.fill_depressions {
                    flood::priority_flood_fill(&grid, elevation, land, cfg.epsilon_m)
                } else {
                    elevation.to_vec()
                };
                let down = flow::flow_directions(&grid, &surface, land);
                let accumulation = flow::flow_accumulation(&surface, &down);
                (down, accumulation)
            }
        };

        let classes = match &self.config.compute_rivers {
            RiverStrategy::AccumulationThreshold(cfg) => {
                rivers::accumulation_threshold(&accumulation, land, ctx.f32(FieldId::Rainfall)?, cfg)
            }
        };
        debug!("{} river tiles", classes.iter().filter(|&&c| c > 0).count());

        ctx.publish(FieldId::FlowDirection, FieldData::U32(down))?;
        ctx.publish(FieldId::FlowAccumulation, FieldData::U32(accumulation))?;
        ctx.publish(FieldId::RiverClass, FieldData::U8(classes))?;
        Ok(())
    }
}

/// Rainfall refinement, macro belts and aridity.
pub struct ClimateRefineStage {
    pub config: ClimateRefineAdvanced,
}

impl GenerationStage for ClimateRefineStage {
    fn id(&self) -> StageId {
        StageId::ClimateRefine
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Hydrography]
    }

    fn publishes(&self) -> &[FieldId] {
        &[FieldId::RainfallRefined, FieldId::Aridity]
    }

    fn execute(&self, ctx: &mut StageContext<'_>) -> Result<(), PipelineError> {
        let grid = *ctx.grid();
        let baseline = ctx.f32(FieldId::Rainfall)?;

        let mut rainfall = match &self.config.compute_precipitation {
            RefinePrecipitationStrategy::Refine(cfg) => {
                let inputs = RefineInputs {
                    land_mask: ctx.u8(FieldId::LandMask)?,
                    relief: ctx.u8(FieldId::Relief)?,
                    coast_distance: ctx.u8(FieldId::CoastDistance)?,
                    river_class: ctx.u8(FieldId::RiverClass)?,
                    wind_u: ctx.f32(FieldId::WindU)?,
                    wind_v: ctx.f32(FieldId::WindV)?,
                };
                refine::refine(&grid, baseline, inputs, cfg)
            }
            RefinePrecipitationStrategy::Passthrough(_) => baseline.to_vec(),
        };

        match &self.config.apply_swatches {
            SwatchStrategy::None(_) => {}
            SwatchStrategy::MacroBelts(cfg) => swatches::macro_belts(&grid, &mut rainfall, cfg, &mut ctx.rng(1)),
        }

        let aridity = match &self.config.compute_aridity {
            AridityStrategy::PetRatio(cfg) => aridity::pet_ratio(&rainfall, ctx.f32(FieldId::Temperature)?, cfg),
        };

        ctx.publish(FieldId::RainfallRefined, FieldData::F32(rainfall))?;
        ctx.publish(FieldId::Aridity, FieldData::F32(aridity))?;
        Ok(())
    }
}

/// Biomes and vegetation density.
pub struct EcologyStage {
    pub config: EcologyAdvanced,
}

impl GenerationStage for EcologyStage {
    fn id(&self) -> StageId {
        StageId::Ecology
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::ClimateRefine]
    }

    fn publishes(&self) -> &[FieldId] {
        &[FieldId::Biome, FieldId::Vegetation]
    }

    fn execute(&self, ctx: &mut StageContext<'_>) -> Result<(), PipelineError> {
        let grid = *ctx.grid();
        let temperature = ctx.f32(FieldId::Temperature)?;
        let rainfall = ctx.f32(FieldId::RainfallRefined)?;

        let biomes = match &self.config.classify_biomes {
            BiomeStrategy::Whittaker(cfg) => {
                let inputs = ClimateInputs {
                    elevation: ctx.f32(FieldId::Elevation)?,
                    land_mask: ctx.u8(FieldId::LandMask)?,
                    temperature,
                    rainfall,
                };
                biome::whittaker(&grid, inputs, cfg, &mut ctx.rng(0))
            }
        };

        let density = match &self.config.compute_vegetation {
            VegetationStrategy::MoistureTemperature(cfg) => vegetation::moisture_temperature(
                VegetationInputs {
                    biome: &biomes,
                    temperature,
                    rainfall,
                    aridity: ctx.f32(FieldId::Aridity)?,
                    river_class: ctx.u8(FieldId::RiverClass)?,
                },
                cfg,
            ),
        };

        ctx.publish(FieldId::Biome, FieldData::U8(biomes))?;
        ctx.publish(FieldId::Vegetation, FieldData::U8(density))?;
        Ok(())
    }
}

/// Game-map terrain types.
pub struct MapMorphologyStage {
    pub config: MapMorphologyAdvanced,
}

impl GenerationStage for MapMorphologyStage {
    fn id(&self) -> StageId {
        StageId::MapMorphology
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::ClimateRefine]
    }

    fn publishes(&self) -> &[FieldId] {
        &[FieldId::Terrain]
    }

    fn execute(&self, ctx: &mut StageContext<'_>) -> Result<(), PipelineError> {
        let terrain = match &self.config.project_terrain {
            TerrainProjectionStrategy::Standard(cfg) => terrain::standard(
                ctx.grid(),
                ctx.u8(FieldId::LandMask)?,
                ctx.f32(FieldId::Temperature)?,
                ctx.f32(FieldId::Aridity)?,
                cfg,
            ),
        };
        ctx.publish(FieldId::Terrain, FieldData::U8(terrain))
    }
}

/// Game-map rivers.
pub struct MapHydrologyStage {
    pub config: MapHydrologyAdvanced,
}

impl GenerationStage for MapHydrologyStage {
    fn id(&self) -> StageId {
        StageId::MapHydrology
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Hydrography]
    }

    fn publishes(&self) -> &[FieldId] {
        &[FieldId::RiverMask]
    }

    fn execute(&self, ctx: &mut StageContext<'_>) -> Result<(), PipelineError> {
        let mask = river_projection::project_rivers(ctx.u8(FieldId::RiverClass)?, self.config.project_rivers);
        ctx.publish(FieldId::RiverMask, FieldData::U8(mask))
    }
}

/// Game-map features.
pub struct MapEcologyStage {
    pub config: MapEcologyAdvanced,
}

impl GenerationStage for MapEcologyStage {
    fn id(&self) -> StageId {
        StageId::MapEcology
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::Ecology, StageId::MapMorphology, StageId::MapHydrology]
    }

    fn publishes(&self) -> &[FieldId] {
        &[FieldId::Feature]
    }

    fn execute(&self, ctx: &mut StageContext<'_>) -> Result<(), PipelineError> {
        let placed = match &self.config.project_features {
            FeatureProjectionStrategy::Density(cfg) => {
                let inputs = FeatureInputs {
                    terrain: ctx.u8(FieldId::Terrain)?,
                    relief: ctx.u8(FieldId::Relief)?,
                    biome: ctx.u8(FieldId::Biome)?,
                    vegetation: ctx.u8(FieldId::Vegetation)?,
                    temperature: ctx.f32(FieldId::Temperature)?,
                    river_mask: ctx.u8(FieldId::RiverMask)?,
                };
                features::density(ctx.grid(), inputs, cfg, &mut ctx.rng(0))
            }
        };
        ctx.publish(FieldId::Feature, FieldData::U8(placed))
    }
}

/// Player start tiles.
pub struct PlacementStage {
    pub config: PlacementAdvanced,
}

impl GenerationStage for PlacementStage {
    fn id(&self) -> StageId {
        StageId::Placement
    }

    fn dependencies(&self) -> &[StageId] {
        &[StageId::MapEcology]
    }

    fn publishes(&self) -> &[FieldId] {
        &[FieldId::StartTiles]
    }

    fn execute(&self, ctx: &mut StageContext<'_>) -> Result<(), PipelineError> {
        let chosen = match &self.config.place_starts {
            StartPlacementStrategy::FertilitySpaced(cfg) => {
                let inputs = PlacementInputs {
                    terrain: ctx.u8(FieldId::Terrain)?,
                    relief: ctx.u8(FieldId::Relief)?,
                    vegetation: ctx.u8(FieldId::Vegetation)?,
                    river_mask: ctx.u8(FieldId::RiverMask)?,
                    coast_distance: ctx.u8(FieldId::CoastDistance)?,
                };
                starts::fertility_spaced(ctx.grid(), inputs, cfg)
            }
        };
        info!("{} start tiles placed", chosen.len());
        ctx.publish(FieldId::StartTiles, FieldData::Indices(chosen))
    }
}
