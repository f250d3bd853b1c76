use std::fmt;

use serde::{Deserialize, Serialize};

use maskcheck_core::{BBox, Layer, ShapeId};

/// Which rule family a violation belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViolationKind {
    Width,
    Spacing,
    Enclosure,
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            ViolationKind::Width => "width",
            ViolationKind::Spacing => "spacing",
            ViolationKind::Enclosure => "enclosure",
        })
    }
}

/// The shape(s) a violation points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Offenders {
    Pair { shape1: ShapeId, shape2: ShapeId },
    Single { shape: ShapeId },
}

impl Offenders {
    pub fn contains(&self, id: ShapeId) -> bool {
        match *self {
            Offenders::Single { shape } => shape == id,
            Offenders::Pair { shape1, shape2 } => shape1 == id || shape2 == id,
        }
    }

    pub fn ids(&self) -> Vec<ShapeId> {
        match *self {
            Offenders::Single { shape } => vec![shape],
            Offenders::Pair { shape1, shape2 } => vec![shape1, shape2],
        }
    }
}

/// A single DRC violation.
///
/// For enclosure violations `layer` is the enclosing layer that failed to
/// surround the cut; for width and spacing it is the offending shapes' layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DrcViolation {
    pub kind: ViolationKind,
    pub layer: Layer,
    pub message: String,
    #[serde(flatten)]
    pub offenders: Offenders,
    /// The rule value that was not met, in length units.
    pub threshold: f64,
    /// Union of the offending shapes' boxes, for fit-to-violation in the UI.
    pub bbox: BBox,
}

impl DrcViolation {
    pub fn involves(&self, id: ShapeId) -> bool {
        self.offenders.contains(id)
    }

    pub fn shape_ids(&self) -> Vec<ShapeId> {
        self.offenders.ids()
    }
}
