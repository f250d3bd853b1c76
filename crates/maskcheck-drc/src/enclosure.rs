use std::collections::BTreeMap;

use maskcheck_core::{Layer, Shape, SpatialEntry, SpatialIndex};

use crate::rules::RuleTable;
use crate::violation::{DrcViolation, Offenders, ViolationKind};

/// Whether `outer` surrounds `inner` with at least `margin` on every side.
pub fn encloses(outer: &Shape, inner: &Shape, margin: f64) -> bool {
    inner.x >= outer.x - margin
        && inner.y >= outer.y - margin
        && inner.x + inner.width <= outer.x + outer.width + margin
        && inner.y + inner.height <= outer.y + outer.height + margin
}

/// Shapes of one enclosing layer, indexed by their envelopes grown by the margin.
///
/// Any shape that encloses a cut has a grown envelope containing the cut's
/// centre, so the index only narrows candidates; [`encloses`] decides.
struct EnclosingGroup<'a> {
    margin: f64,
    members: Vec<&'a Shape>,
    index: SpatialIndex,
}

impl<'a> EnclosingGroup<'a> {
    fn build(shapes: &'a [Shape], layer: Layer, margin: f64) -> Self {
        let members: Vec<&Shape> = shapes
            .iter()
            .filter(|s| s.layer == layer && !s.is_degenerate())
            .collect();
        let index = SpatialIndex::build(
            members
                .iter()
                .enumerate()
                .map(|(index, s)| SpatialEntry {
                    index,
                    bbox: s.bbox().expand(margin),
                })
                .collect(),
        );
        Self {
            margin,
            members,
            index,
        }
    }

    fn encloses(&self, cut: &Shape) -> bool {
        self.index
            .query_point(&cut.bbox().center())
            .iter()
            .any(|entry| encloses(self.members[entry.index], cut, self.margin))
    }
}

/// Enclosure pass.
///
/// Every non-degenerate shape on an enclosed layer is tested against each of
/// its configured enclosing layers independently. A layer with no shapes at
/// all counts as not enclosing. Output is ordered by cut shape in input
/// order, then by enclosing layer.
pub fn check_enclosure(shapes: &[Shape], rules: &RuleTable) -> Vec<DrcViolation> {
    // enclosed layer → enclosing layer → group
    let mut groups: BTreeMap<Layer, BTreeMap<Layer, EnclosingGroup<'_>>> = BTreeMap::new();
    for enclosed in rules.enclosed_layers() {
        let own = groups.entry(enclosed).or_default();
        for (enclosing, margin) in rules.enclosing_layers(enclosed) {
            own.insert(enclosing, EnclosingGroup::build(shapes, enclosing, margin));
        }
    }
    if groups.is_empty() {
        return Vec::new();
    }

    let mut violations = Vec::new();
    for cut in shapes.iter().filter(|s| !s.is_degenerate()) {
        let Some(own_groups) = groups.get(&cut.layer) else {
            continue;
        };
        for (enclosing, group) in own_groups {
            log::trace!(
                "enclosure {} by {}: {} candidates, margin {}",
                cut.id,
                enclosing,
                group.members.len(),
                group.margin
            );
            if group.encloses(cut) {
                continue;
            }
            violations.push(DrcViolation {
                kind: ViolationKind::Enclosure,
                layer: *enclosing,
                message: format!(
                    "{} not properly enclosed by {} ({})",
                    cut.layer,
                    enclosing,
                    rules.format_length(group.margin)
                ),
                offenders: Offenders::Single { shape: cut.id },
                threshold: group.margin,
                bbox: cut.bbox(),
            });
        }
    }
    violations
}
