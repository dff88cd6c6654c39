//! Offset hex grid geometry.
//!
//! Provides tile indexing, wrap-aware neighbor enumeration and distances for
//! the cylindrical map.

pub mod hex;

pub use hex::{HexGrid, Neighbors};
