use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::layer::Layer;

/// A 2D point in sketch coordinates (grid units, y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn translate(&self, dx: f64, dy: f64) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
        }
    }
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BBox {
    pub min: Point,
    pub max: Point,
}

impl BBox {
    pub fn new(min: Point, max: Point) -> Self {
        Self { min, max }
    }

    pub fn center(&self) -> Point {
        Point::new(
            (self.min.x + self.max.x) / 2.0,
            (self.min.y + self.max.y) / 2.0,
        )
    }

    pub fn intersects(&self, other: &BBox) -> bool {
        self.min.x <= other.max.x
            && self.max.x >= other.min.x
            && self.min.y <= other.max.y
            && self.max.y >= other.min.y
    }

    pub fn union(&self, other: &BBox) -> Self {
        Self {
            min: Point::new(self.min.x.min(other.min.x), self.min.y.min(other.min.y)),
            max: Point::new(self.max.x.max(other.max.x), self.max.y.max(other.max.y)),
        }
    }

    /// Grow the box by `margin` on every side.
    pub fn expand(&self, margin: f64) -> Self {
        Self {
            min: self.min.translate(-margin, -margin),
            max: self.max.translate(margin, margin),
        }
    }
}

/// Stable identity of a shape. Survives moves; never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ShapeId(Uuid);

impl ShapeId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ShapeId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ShapeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A layer-tagged rectangle anchored at its top-left corner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Shape {
    pub id: ShapeId,
    pub layer: Layer,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Shape {
    /// Create a shape with a fresh identity.
    pub fn new(layer: Layer, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::with_id(ShapeId::new(), layer, x, y, width, height)
    }

    pub fn with_id(id: ShapeId, layer: Layer, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id,
            layer,
            x,
            y,
            width,
            height,
        }
    }

    /// Build a shape from two opposite corners, in any drag direction.
    pub fn from_corners(layer: Layer, a: Point, b: Point) -> Self {
        Self::new(
            layer,
            a.x.min(b.x),
            a.y.min(b.y),
            (b.x - a.x).abs(),
            (b.y - a.y).abs(),
        )
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn bbox(&self) -> BBox {
        BBox::new(Point::new(self.x, self.y), Point::new(self.right(), self.bottom()))
    }

    pub fn area(&self) -> f64 {
        self.width * self.height
    }

    /// True for zero-area, negative or non-finite rectangles.
    pub fn is_degenerate(&self) -> bool {
        let finite = self.x.is_finite()
            && self.y.is_finite()
            && self.width.is_finite()
            && self.height.is_finite();
        !(finite && self.width > 0.0 && self.height > 0.0)
    }
}

/// Grid snapping for editor input.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snap {
    pub grid: f64,
}

impl Snap {
    /// One lambda on the default canvas is 20 units.
    pub const DEFAULT_GRID: f64 = 20.0;

    pub fn new(grid: f64) -> Self {
        Self { grid }
    }

    /// Round to the nearest grid line. A non-positive grid disables snapping.
    pub fn value(&self, v: f64) -> f64 {
        if self.grid > 0.0 {
            (v / self.grid).round() * self.grid
        } else {
            v
        }
    }

    pub fn point(&self, p: Point) -> Point {
        Point::new(self.value(p.x), self.value(p.y))
    }
}

impl Default for Snap {
    fn default() -> Self {
        Self::new(Self::DEFAULT_GRID)
    }
}
