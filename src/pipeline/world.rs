//! The map being generated.

use serde::{Deserialize, Serialize};

use super::fields::{FieldId, FieldStore};
use super::stage::PipelineError;
use crate::geometry::HexGrid;
use crate::tectonics::{GenerationMetadata, PlateRegion};

/// Grid plus every layer published by the stages run so far.
#[derive(Debug, Clone)]
pub struct WorldMap {
    pub grid: HexGrid,
    /// Host seed the run was started with.
    pub seed: u64,
    pub fields: FieldStore,
    /// Plates of the accepted tectonic attempt (populated by the foundation stage).
    pub plates: Option<Vec<PlateRegion>>,
    /// Diagnostics of the tectonic attempts (populated by the foundation stage).
    pub plate_metadata: Option<GenerationMetadata>,
}

impl WorldMap {
    pub fn new(grid: HexGrid, seed: u64) -> Self {
        Self {
            grid,
            seed,
            fields: FieldStore::new(grid.len()),
            plates: None,
            plate_metadata: None,
        }
    }

    /// Returns true if the foundation stage has run.
    pub fn has_tectonics(&self) -> bool {
        self.plates.is_some() && self.fields.contains(FieldId::PlateId)
    }

    /// Number of plates, or 0 before the foundation stage.
    pub fn num_plates(&self) -> usize {
        self.plates.as_ref().map(|p| p.len()).unwrap_or(0)
    }

    /// Share of land tiles, once the land mask exists.
    pub fn land_share(&self) -> Result<f32, PipelineError> {
        let mask = self.fields.u8(FieldId::LandMask)?;
        let land = mask.iter().filter(|&&m| m != 0).count();
        Ok(land as f32 / mask.len().max(1) as f32)
    }

    /// Min and max of an `f32` field.
    pub fn range_f32(&self, id: FieldId) -> Result<(f32, f32), PipelineError> {
        let values = self.fields.f32(id)?;
        Ok(values
            .iter()
            .fold((f32::MAX, f32::MIN), |(lo, hi), &v| (lo.min(v), hi.max(v))))
    }
}

/// Summary of a finished run, for logs and the `info` command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldSummary {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    pub plates: usize,
    pub plates_accepted: bool,
    pub land_share: Option<f32>,
    pub start_count: usize,
    pub fields: Vec<FieldId>,
}

impl WorldSummary {
    pub fn of(world: &WorldMap) -> Self {
        Self {
            width: world.grid.width,
            height: world.grid.height,
            seed: world.seed,
            plates: world.num_plates(),
            plates_accepted: world.plate_metadata.as_ref().map(|m| m.accepted).unwrap_or(false),
            land_share: world.land_share().ok(),
            start_count: world
                .fields
                .indices(FieldId::StartTiles)
                .map(|s| s.len())
                .unwrap_or(0),
            fields: world.fields.published().collect(),
        }
    }
}
