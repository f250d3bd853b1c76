use thiserror::Error;

use crate::commands::{
    AddShapeCommand, Command, CommandHistory, MoveShapeCommand, RemoveShapeCommand,
};
use crate::geometry::{Point, Shape, ShapeId, Snap};
use crate::layer::Layer;
use crate::spatial::{SpatialEntry, SpatialIndex};

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SketchError {
    #[error("Shape {0} is not in the sketch")]
    UnknownShape(ShapeId),

    #[error("Shape {0} is already in the sketch")]
    DuplicateShape(ShapeId),

    #[error("Degenerate shape {width}x{height} rejected")]
    Degenerate { width: f64, height: f64 },
}

/// The editor-side model of a layout sketch: an ordered list of shapes with
/// stable identities, grid snapping and an undo/redo journal.
///
/// DRC runs against [`Sketch::shapes`] or an owned [`Sketch::snapshot`].
#[derive(Debug, Default)]
pub struct Sketch {
    shapes: Vec<Shape>,
    snap: Snap,
    history: CommandHistory,
}

impl Sketch {
    pub fn new(snap: Snap) -> Self {
        Self {
            shapes: Vec::new(),
            snap,
            history: CommandHistory::new(),
        }
    }

    pub fn snap(&self) -> Snap {
        self.snap
    }

    // ── Editing ──────────────────────────────────────────────────────

    /// Draw a rectangle dragged from `anchor` to `corner`.
    ///
    /// Both points are snapped, a drag in any direction is normalized, and a
    /// drag that collapses to zero area after snapping adds nothing.
    pub fn draw(&mut self, layer: Layer, anchor: Point, corner: Point) -> Option<ShapeId> {
        let shape = Shape::from_corners(layer, self.snap.point(anchor), self.snap.point(corner));
        if shape.is_degenerate() {
            log::debug!("Ignoring zero-area {} drag at ({}, {})", layer, anchor.x, anchor.y);
            return None;
        }
        let id = shape.id;
        self.execute(Box::new(AddShapeCommand::new(shape)));
        Some(id)
    }

    /// Add an already-built shape, keeping its identity. Coordinates are not snapped.
    pub fn insert(&mut self, shape: Shape) -> Result<ShapeId, SketchError> {
        if shape.is_degenerate() {
            return Err(SketchError::Degenerate {
                width: shape.width,
                height: shape.height,
            });
        }
        if self.get(shape.id).is_some() {
            return Err(SketchError::DuplicateShape(shape.id));
        }
        let id = shape.id;
        self.execute(Box::new(AddShapeCommand::new(shape)));
        Ok(id)
    }

    /// Move a shape's top-left corner to the snapped position.
    pub fn move_to(&mut self, id: ShapeId, x: f64, y: f64) -> Result<(), SketchError> {
        if self.get(id).is_none() {
            return Err(SketchError::UnknownShape(id));
        }
        let to = self.snap.point(Point::new(x, y));
        self.execute(Box::new(MoveShapeCommand::new(id, to)));
        Ok(())
    }

    pub fn remove(&mut self, id: ShapeId) -> Result<Shape, SketchError> {
        let shape = self.get(id).cloned().ok_or(SketchError::UnknownShape(id))?;
        self.execute(Box::new(RemoveShapeCommand::new(id)));
        Ok(shape)
    }

    fn execute(&mut self, command: Box<dyn Command>) {
        log::debug!("{}", command.description());
        self.history.execute(command, &mut self.shapes);
    }

    // ── Undo / Redo ──────────────────────────────────────────────────

    pub fn undo(&mut self) -> bool {
        self.history.undo(&mut self.shapes)
    }

    pub fn redo(&mut self) -> bool {
        self.history.redo(&mut self.shapes)
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn undo_description(&self) -> Option<&str> {
        self.history.undo_description()
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn get(&self, id: ShapeId) -> Option<&Shape> {
        self.shapes.iter().find(|s| s.id == id)
    }

    /// Shapes in drawing order.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// An owned copy of the shapes, safe to check on another thread while
    /// editing continues.
    pub fn snapshot(&self) -> Vec<Shape> {
        self.shapes.clone()
    }

    pub fn on_layer(&self, layer: Layer) -> impl Iterator<Item = &Shape> {
        self.shapes.iter().filter(move |s| s.layer == layer)
    }

    /// Identities of shapes under `point`, in drawing order (topmost last).
    pub fn shapes_at(&self, point: Point) -> Vec<ShapeId> {
        let index = SpatialIndex::build(
            self.shapes
                .iter()
                .enumerate()
                .map(|(index, s)| SpatialEntry { index, bbox: s.bbox() })
                .collect(),
        );
        let mut hits: Vec<usize> = index.query_point(&point).iter().map(|e| e.index).collect();
        hits.sort_unstable();
        hits.into_iter().map(|i| self.shapes[i].id).collect()
    }

    pub fn len(&self) -> usize {
        self.shapes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.shapes.is_empty()
    }
}
