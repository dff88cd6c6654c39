//! Generation stage trait and pipeline orchestration.

use log::Level;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use thiserror::Error;

use super::fields::{FieldData, FieldId, FieldKind};
use super::world::WorldMap;
use crate::geometry::HexGrid;
use crate::schema::ConfigError;
use crate::tectonics::{GenerationMetadata, PlateRegion, TectonicError};
use crate::util::Timed;

/// Unique identifier for generation stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StageId {
    /// Tectonic plates and boundary influence.
    Foundation,
    /// Base elevation and land mask.
    MorphologyPre,
    /// Hills and mountains.
    MorphologyMid,
    /// Distance to the coast.
    MorphologyPost,
    /// Temperature, wind and first-pass rainfall.
    ClimateBaseline,
    /// Drainage and rivers.
    Hydrography,
    /// Rainfall refinement and aridity.
    ClimateRefine,
    /// Biomes and vegetation.
    Ecology,
    /// Terrain types.
    MapMorphology,
    /// River placement.
    MapHydrology,
    /// Features such as forests and marshes.
    MapEcology,
    /// Start positions.
    Placement,
}

impl StageId {
    /// Every stage in execution order.
    pub const ORDER: [StageId; 12] = [
        StageId::Foundation,
        StageId::MorphologyPre,
        StageId::MorphologyMid,
        StageId::MorphologyPost,
        StageId::ClimateBaseline,
        StageId::Hydrography,
        StageId::ClimateRefine,
        StageId::Ecology,
        StageId::MapMorphology,
        StageId::MapHydrology,
        StageId::MapEcology,
        StageId::Placement,
    ];

    /// Returns the name of the stage.
    pub fn name(&self) -> &'static str {
        match self {
            StageId::Foundation => "foundation",
            StageId::MorphologyPre => "morphology-pre",
            StageId::MorphologyMid => "morphology-mid",
            StageId::MorphologyPost => "morphology-post",
            StageId::ClimateBaseline => "hydrology-climate-baseline",
            StageId::Hydrography => "hydrology-hydrography",
            StageId::ClimateRefine => "hydrology-climate-refine",
            StageId::Ecology => "ecology",
            StageId::MapMorphology => "map-morphology",
            StageId::MapHydrology => "map-hydrology",
            StageId::MapEcology => "map-ecology",
            StageId::Placement => "placement",
        }
    }

    /// Position in [`StageId::ORDER`].
    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Errors that can occur during pipeline execution.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Stage '{0}' failed: {1}")]
    StageFailed(String, String),
    #[error("Missing dependency: stage '{0}' requires '{1}'")]
    MissingDependency(String, String),
    #[error("field '{field}' has not been published")]
    MissingField { field: FieldId },
    #[error("field '{field}' was already published")]
    FieldAlreadyPublished { field: FieldId },
    #[error("stage '{stage}' may not publish field '{field}'")]
    FieldNotOwned { stage: &'static str, field: FieldId },
    #[error("field '{field}' holds {actual} values, expected {expected}")]
    WrongFieldKind {
        field: FieldId,
        expected: FieldKind,
        actual: FieldKind,
    },
    #[error("field '{field}' has {actual} entries, expected {expected}")]
    WrongFieldLength {
        field: FieldId,
        expected: usize,
        actual: usize,
    },
    #[error(transparent)]
    Tectonic(#[from] TectonicError),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Everything one stage produced, committed after it returns.
#[derive(Debug, Default)]
pub struct StageOutput {
    fields: Vec<(FieldId, FieldData)>,
    plates: Option<(Vec<PlateRegion>, GenerationMetadata)>,
}

/// Read access to earlier layers and write access to the stage's own.
pub struct StageContext<'a> {
    stage: StageId,
    owned: &'a [FieldId],
    world: &'a WorldMap,
    output: StageOutput,
}

impl<'a> StageContext<'a> {
    pub fn new(stage: StageId, owned: &'a [FieldId], world: &'a WorldMap) -> Self {
        Self {
            stage,
            owned,
            world,
            output: StageOutput::default(),
        }
    }

    pub fn grid(&self) -> &HexGrid {
        &self.world.grid
    }

    pub fn seed(&self) -> u64 {
        self.world.seed
    }

    /// Random stream for this stage; `salt` separates sub-stages.
    pub fn rng(&self, salt: u64) -> ChaCha8Rng {
        let mut rng = ChaCha8Rng::seed_from_u64(self.world.seed);
        rng.set_stream(((self.stage.index() as u64) << 8) | (salt & 0xff));
        rng
    }

    pub fn u8(&self, id: FieldId) -> Result<&'a [u8], PipelineError> {
        self.world.fields.u8(id)
    }

    pub fn i8(&self, id: FieldId) -> Result<&'a [i8], PipelineError> {
        self.world.fields.i8(id)
    }

    pub fn u32(&self, id: FieldId) -> Result<&'a [u32], PipelineError> {
        self.world.fields.u32(id)
    }

    pub fn f32(&self, id: FieldId) -> Result<&'a [f32], PipelineError> {
        self.world.fields.f32(id)
    }

    pub fn plates(&self) -> Option<&'a [PlateRegion]> {
        self.world.plates.as_deref()
    }

    /// Queues a layer for publication. Only fields the stage owns are accepted.
    pub fn publish(&mut self, id: FieldId, data: FieldData) -> Result<(), PipelineError> {
        if !self.owned.contains(&id) {
            return Err(PipelineError::FieldNotOwned {
                stage: self.stage.name(),
                field: id,
            });
        }
        if self.output.fields.iter().any(|(f, _)| *f == id) {
            return Err(PipelineError::FieldAlreadyPublished { field: id });
        }
        self.world.fields.check(id, &data)?;
        self.output.fields.push((id, data));
        Ok(())
    }

    /// Hands the accepted plate layout to the map.
    pub fn record_plates(&mut self, plates: Vec<PlateRegion>, metadata: GenerationMetadata) {
        self.output.plates = Some((plates, metadata));
    }

    pub fn finish(self) -> StageOutput {
        self.output
    }
}

impl WorldMap {
    /// Commits a stage's output.
    pub fn commit(&mut self, output: StageOutput) -> Result<(), PipelineError> {
        for (id, data) in output.fields {
            self.fields.publish(id, data)?;
        }
        if let Some((plates, metadata)) = output.plates {
            self.plates = Some(plates);
            self.plate_metadata = Some(metadata);
        }
        Ok(())
    }
}

/// Trait for implementing generation stages.
///
/// Each stage reads layers published by earlier stages and publishes its own.
/// A stage never sees its own output before it returns, and cannot touch
/// layers it does not own.
pub trait GenerationStage: Send + Sync {
    /// Returns the unique identifier for this stage.
    fn id(&self) -> StageId;

    /// Returns a human-readable name for the stage.
    fn name(&self) -> &str {
        self.id().name()
    }

    /// Returns the stage IDs that must be executed before this stage.
    fn dependencies(&self) -> &[StageId] {
        &[]
    }

    /// Fields this stage is allowed to publish.
    fn publishes(&self) -> &[FieldId];

    /// Executes the generation stage.
    ///
    /// # Arguments
    /// * `ctx` - Access to earlier layers and the stage's own outputs
    fn execute(&self, ctx: &mut StageContext<'_>) -> Result<(), PipelineError>;
}

/// Orchestrates multiple generation stages into a complete pipeline.
#[derive(Default)]
pub struct Pipeline {
    stages: Vec<Box<dyn GenerationStage>>,
}

impl Pipeline {
    /// Creates a new empty pipeline.
    pub fn new() -> Self {
        Self { stages: Vec::new() }
    }

    /// Adds a stage to the pipeline.
    pub fn add_stage<S: GenerationStage + 'static>(&mut self, stage: S) -> &mut Self {
        self.stages.push(Box::new(stage));
        self
    }

    /// Returns the number of stages in the pipeline.
    pub fn stage_count(&self) -> usize {
        self.stages.len()
    }

    pub fn stage_ids(&self) -> Vec<StageId> {
        self.stages.iter().map(|s| s.id()).collect()
    }

    /// Executes all stages in order on the given map.
    pub fn run(&self, world: &mut WorldMap) -> Result<(), PipelineError> {
        self.run_with_callbacks(world, |_, _, _| {}, |_, _, _| {})
    }

    /// Executes all stages with progress callbacks.
    ///
    /// # Arguments
    /// * `world` - The map to generate
    /// * `on_stage_start` - Called when each stage begins
    /// * `on_stage_complete` - Called when each stage finishes
    pub fn run_with_callbacks<F1, F2>(
        &self,
        world: &mut WorldMap,
        mut on_stage_start: F1,
        mut on_stage_complete: F2,
    ) -> Result<(), PipelineError>
    where
        F1: FnMut(&str, usize, usize),
        F2: FnMut(&str, usize, usize),
    {
        let total = self.stages.len();
        let mut completed: Vec<StageId> = Vec::new();

        for (i, stage) in self.stages.iter().enumerate() {
            on_stage_start(stage.name(), i, total);

            for dep in stage.dependencies() {
                if !completed.contains(dep) {
                    return Err(PipelineError::MissingDependency(
                        stage.name().to_string(),
                        dep.name().to_string(),
                    ));
                }
            }

            let output = {
                let _t = Timed::new(Level::Debug, stage.id().name());
                let mut ctx = StageContext::new(stage.id(), stage.publishes(), world);
                stage.execute(&mut ctx)?;
                ctx.finish()
            };
            world.commit(output)?;
            completed.push(stage.id());

            on_stage_complete(stage.name(), i, total);
        }

        Ok(())
    }
}
