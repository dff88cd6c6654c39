//! Structural failures of a plate generation attempt.

use thiserror::Error;

/// Fatal, attempt-local errors.
///
/// These are never absorbed by the saturation retry loop: a structurally broken
/// attempt means the inputs are wrong, not that the parameters are too fine.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TectonicError {
    #[error("Voronoi diagram is empty ({sites} sites, {cells} non-degenerate cells)")]
    EmptyDiagram { sites: usize, cells: usize },
    #[error("plate {plate} has a non-finite seed ({sites} sites, {cells} cells)")]
    NonFiniteSeed { plate: usize, sites: usize, cells: usize },
    #[error("tile {tile} was assigned plate {plate_id}, but only {plate_count} plates exist")]
    PlateIdOutOfRange {
        tile: usize,
        plate_id: usize,
        plate_count: usize,
    },
    #[error("nearest-cell lookup failed for tile {tile} ({cells} cells)")]
    NearestCellLookupFailed { tile: usize, cells: usize },
    #[error("grid {width}x{height} is too small for plate generation")]
    InvalidGrid { width: u32, height: u32 },
    #[error("invalid generation parameters: {0}")]
    InvalidParams(String),
}
