//! Configuration errors reported when floors or overlays are loaded.
//!
//! Searches never fail with these; they report a [`crate::path::PathStatus`] instead.
use thiserror::Error;

use crate::FloorId;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum NavError {
    #[error("floor {floor} has zero-sized dimensions {width}x{height}")]
    ZeroDimension {
        floor: FloorId,
        width: u32,
        height: u32,
    },
    #[error(
        "floor {floor} dimensions {width}x{height} exceed the addressable tile count or world range"
    )]
    DimensionOverflow {
        floor: FloorId,
        width: u32,
        height: u32,
    },
    #[error("floor {floor} walkability bitmap holds {actual} bytes, {expected} required")]
    BitmapTooShort {
        floor: FloorId,
        expected: usize,
        actual: usize,
    },
    #[error("floor {0} is not loaded")]
    FloorNotLoaded(FloorId),
}
