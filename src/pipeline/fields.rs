//! Publish-once store of grid-sized layers.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::stage::PipelineError;

/// Storage type of a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldKind {
    U8,
    I8,
    U32,
    F32,
    /// A list of tile indices rather than one value per tile.
    Indices,
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FieldKind::U8 => "u8",
            FieldKind::I8 => "i8",
            FieldKind::U32 => "u32",
            FieldKind::F32 => "f32",
            FieldKind::Indices => "indices",
        };
        f.write_str(name)
    }
}

macro_rules! field_ids {
    ($($variant:ident => ($name:literal, $kind:ident)),+ $(,)?) => {
        /// Identifier of a published layer.
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "kebab-case")]
        pub enum FieldId {
            $($variant),+
        }

        impl FieldId {
            /// Every field, in publication order.
            pub const ALL: &'static [FieldId] = &[$(FieldId::$variant),+];

            pub fn name(&self) -> &'static str {
                match self {
                    $(FieldId::$variant => $name),+
                }
            }

            pub fn kind(&self) -> FieldKind {
                match self {
                    $(FieldId::$variant => FieldKind::$kind),+
                }
            }
        }
    };
}

field_ids! {
    PlateId => ("plate-id", U8),
    BoundaryCloseness => ("boundary-closeness", U8),
    BoundaryType => ("boundary-type", U8),
    TectonicStress => ("tectonic-stress", U8),
    UpliftPotential => ("uplift-potential", U8),
    RiftPotential => ("rift-potential", U8),
    ShieldStability => ("shield-stability", U8),
    PlateMovementU => ("plate-movement-u", I8),
    PlateMovementV => ("plate-movement-v", I8),
    PlateRotation => ("plate-rotation", I8),
    BoundaryDistance => ("boundary-distance", U8),
    Elevation => ("elevation", F32),
    Crust => ("crust", U8),
    LandMask => ("land-mask", U8),
    Relief => ("relief", U8),
    CoastDistance => ("coast-distance", U8),
    Temperature => ("temperature", F32),
    WindU => ("wind-u", F32),
    WindV => ("wind-v", F32),
    Rainfall => ("rainfall", F32),
    FlowDirection => ("flow-direction", U32),
    FlowAccumulation => ("flow-accumulation", U32),
    RiverClass => ("river-class", U8),
    RainfallRefined => ("rainfall-refined", F32),
    Aridity => ("aridity", F32),
    Biome => ("biome", U8),
    Vegetation => ("vegetation", U8),
    Terrain => ("terrain", U8),
    RiverMask => ("river-mask", U8),
    Feature => ("feature", U8),
    StartTiles => ("start-tiles", Indices),
}

impl fmt::Display for FieldId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Values of one layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FieldData {
    U8(Vec<u8>),
    I8(Vec<i8>),
    U32(Vec<u32>),
    F32(Vec<f32>),
    Indices(Vec<usize>),
}

impl FieldData {
    pub fn kind(&self) -> FieldKind {
        match self {
            FieldData::U8(_) => FieldKind::U8,
            FieldData::I8(_) => FieldKind::I8,
            FieldData::U32(_) => FieldKind::U32,
            FieldData::F32(_) => FieldKind::F32,
            FieldData::Indices(_) => FieldKind::Indices,
        }
    }

    pub fn len(&self) -> usize {
        match self {
            FieldData::U8(v) => v.len(),
            FieldData::I8(v) => v.len(),
            FieldData::U32(v) => v.len(),
            FieldData::F32(v) => v.len(),
            FieldData::Indices(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Layers published so far, each written exactly once.
#[derive(Debug, Clone, Default)]
pub struct FieldStore {
    tile_count: usize,
    fields: BTreeMap<FieldId, FieldData>,
}

impl FieldStore {
    pub fn new(tile_count: usize) -> Self {
        Self {
            tile_count,
            fields: BTreeMap::new(),
        }
    }

    pub fn tile_count(&self) -> usize {
        self.tile_count
    }

    pub fn contains(&self, id: FieldId) -> bool {
        self.fields.contains_key(&id)
    }

    pub fn published(&self) -> impl Iterator<Item = FieldId> + '_ {
        self.fields.keys().copied()
    }

    /// Checks that `data` may be stored as `id`, without storing it.
    pub fn check(&self, id: FieldId, data: &FieldData) -> Result<(), PipelineError> {
        if self.contains(id) {
            return Err(PipelineError::FieldAlreadyPublished { field: id });
        }
        if data.kind() != id.kind() {
            return Err(PipelineError::WrongFieldKind {
                field: id,
                expected: id.kind(),
                actual: data.kind(),
            });
        }
        if id.kind() != FieldKind::Indices && data.len() != self.tile_count {
            return Err(PipelineError::WrongFieldLength {
                field: id,
                expected: self.tile_count,
                actual: data.len(),
            });
        }
        Ok(())
    }

    /// Stores a layer. A field can be published only once.
    pub fn publish(&mut self, id: FieldId, data: FieldData) -> Result<(), PipelineError> {
        self.check(id, &data)?;
        self.fields.insert(id, data);
        Ok(())
    }

    pub fn get(&self, id: FieldId) -> Result<&FieldData, PipelineError> {
        self.fields.get(&id).ok_or(PipelineError::MissingField { field: id })
    }

    pub fn u8(&self, id: FieldId) -> Result<&[u8], PipelineError> {
        match self.get(id)? {
            FieldData::U8(v) => Ok(v),
            other => Err(wrong_kind(id, other)),
        }
    }

    pub fn i8(&self, id: FieldId) -> Result<&[i8], PipelineError> {
        match self.get(id)? {
            FieldData::I8(v) => Ok(v),
            other => Err(wrong_kind(id, other)),
        }
    }

    pub fn u32(&self, id: FieldId) -> Result<&[u32], PipelineError> {
        match self.get(id)? {
            FieldData::U32(v) => Ok(v),
            other => Err(wrong_kind(id, other)),
        }
    }

    pub fn f32(&self, id: FieldId) -> Result<&[f32], PipelineError> {
        match self.get(id)? {
            FieldData::F32(v) => Ok(v),
            other => Err(wrong_kind(id, other)),
        }
    }

    pub fn indices(&self, id: FieldId) -> Result<&[usize], PipelineError> {
        match self.get(id)? {
            FieldData::Indices(v) => Ok(v),
            other => Err(wrong_kind(id, other)),
        }
    }
}

fn wrong_kind(id: FieldId, data: &FieldData) -> PipelineError {
    PipelineError::WrongFieldKind {
        field: id,
        expected: id.kind(),
        actual: data.kind(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fields_are_publish_once() {
        let mut store = FieldStore::new(4);
        store.publish(FieldId::LandMask, FieldData::U8(vec![0, 1, 1, 0])).unwrap();
        let err = store.publish(FieldId::LandMask, FieldData::U8(vec![1; 4])).unwrap_err();
        assert!(matches!(err, PipelineError::FieldAlreadyPublished { field: FieldId::LandMask }));
        assert_eq!(store.u8(FieldId::LandMask).unwrap(), &[0, 1, 1, 0]);
    }

    #[test]
    fn kind_and_length_are_checked() {
        let mut store = FieldStore::new(3);
        let err = store.publish(FieldId::Elevation, FieldData::U8(vec![0; 3])).unwrap_err();
        assert!(matches!(err, PipelineError::WrongFieldKind { .. }));
        let err = store.publish(FieldId::Elevation, FieldData::F32(vec![0.0; 2])).unwrap_err();
        assert!(matches!(err, PipelineError::WrongFieldLength { expected: 3, actual: 2, .. }));
        store.publish(FieldId::StartTiles, FieldData::Indices(vec![2])).unwrap();
        assert_eq!(store.indices(FieldId::StartTiles).unwrap(), &[2]);
    }

    #[test]
    fn reading_an_unpublished_field_fails() {
        let store = FieldStore::new(3);
        assert!(matches!(
            store.f32(FieldId::Rainfall),
            Err(PipelineError::MissingField { field: FieldId::Rainfall })
        ));
    }

    #[test]
    fn field_names_are_unique() {
        let mut names: Vec<_> = FieldId::ALL.iter().map(FieldId::name).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), FieldId::ALL.len());
    }
}
