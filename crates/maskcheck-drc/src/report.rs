use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use maskcheck_core::ShapeId;

use crate::violation::{DrcViolation, ViolationKind};

/// The result of one DRC run, shaped for the results panel and for
/// highlighting offending shapes on the canvas.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DrcReport {
    pub violations: Vec<DrcViolation>,
}

impl DrcReport {
    pub fn new(violations: Vec<DrcViolation>) -> Self {
        Self { violations }
    }

    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn len(&self) -> usize {
        self.violations.len()
    }

    pub fn is_empty(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }

    /// Every shape referenced by at least one violation.
    pub fn flagged_shapes(&self) -> BTreeSet<ShapeId> {
        self.violations
            .iter()
            .flat_map(|v| v.shape_ids())
            .collect()
    }

    pub fn violations_for(&self, id: ShapeId) -> impl Iterator<Item = &DrcViolation> {
        self.violations.iter().filter(move |v| v.involves(id))
    }

    /// One line per violation, `<message> | Type: <kind> | Layer: <layer>`.
    pub fn summary_lines(&self) -> Vec<String> {
        self.violations
            .iter()
            .map(|v| format!("{} | Type: {} | Layer: {}", v.message, v.kind, v.layer))
            .collect()
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
