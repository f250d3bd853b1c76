//! # MaskCheck Core
//!
//! Layer set, rectangle shapes with stable identities, grid snapping, an
//! R-tree spatial index, and the sketch model with an undo/redo journal.
//!
//! The DRC engine in `maskcheck-drc` consumes the shape slices produced here.

pub mod commands;
pub mod geometry;
pub mod layer;
pub mod sketch;
pub mod spatial;

pub use geometry::{BBox, Point, Shape, ShapeId, Snap};
pub use layer::{Layer, UnknownLayer};
pub use sketch::{Sketch, SketchError};
pub use spatial::{SpatialEntry, SpatialIndex};
