//! Tectonic plate meshing on the hex grid.
//!
//! This module implements:
//! - Planar Voronoi meshing with Lloyd relaxation and a k-d tree index
//! - Nearest-seed plate assignment for cells and tiles
//! - Rigid-body plate kinematics
//! - Boundary detection, distance fields and convergent/divergent/transform classification
//! - Diffusion of boundary influence into stress, uplift, rift and shield layers
//! - A bounded retry loop that rejects saturated layouts

pub mod assign;
pub mod boundary;
mod config;
mod error;
pub mod generator;
pub mod influence;
pub mod kdtree;
mod plate;
pub mod voronoi;

pub use assign::RegionCell;
pub use boundary::{BoundaryMotion, BoundaryType};
pub use config::{BoundaryThresholds, GenerationParams, PlateConfig, SeedConfig, SeedMode, ValidationLimits};
pub use error::TectonicError;
pub use generator::{generate_plates, AttemptParams, AttemptStats, GenerationMetadata, PlateGeneration};
pub use influence::TectonicFields;
pub use kdtree::KdTree;
pub use plate::{DirectionalityBias, PlateRegion};
pub use voronoi::{VoronoiCell, VoronoiMesh};
